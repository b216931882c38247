use super::distribution::Distribution;
use super::metrics::round_to;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub key: String,
    pub count: usize,
    pub share_pct: f64,
}

/// Chart legends that show each bucket's share of its distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewLegends {
    pub gender: Vec<LegendEntry>,
    pub terms: Vec<LegendEntry>,
    pub divisions: Vec<LegendEntry>,
    pub residency: Vec<LegendEntry>,
}

impl Distribution {
    /// Buckets with their share rounded to one decimal place.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.buckets()
            .iter()
            .map(|bucket| LegendEntry {
                key: bucket.key.clone(),
                count: bucket.count,
                share_pct: round_to(self.share(&bucket.key), 1),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_rounds_shares() {
        let distribution: Distribution = [
            ("Fall".to_string(), 2),
            ("Spring".to_string(), 1),
        ]
        .into_iter()
        .collect();

        let legend = distribution.legend();
        assert_eq!(legend[0].share_pct, 66.7);
        assert_eq!(legend[1].share_pct, 33.3);
        assert_eq!(legend[1].count, 1);
    }
}
