use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub count: usize,
}

/// Named counts in first-seen order unless a distribution states its own ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Distribution {
    buckets: Vec<Bucket>,
}

impl Distribution {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.key.as_str())
    }

    pub fn count(&self, key: &str) -> usize {
        self.buckets
            .iter()
            .find(|bucket| bucket.key == key)
            .map_or(0, |bucket| bucket.count)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    /// Percentage of the distribution's total held by `key`; `0.0` for an empty total.
    pub fn share(&self, key: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(key) as f64 / total as f64 * 100.0
        }
    }

    pub(crate) fn sort_by_key_ascending(mut self) -> Self {
        self.buckets.sort_by(|a, b| a.key.cmp(&b.key));
        self
    }

    /// Descending by count; ties keep first-seen order.
    pub(crate) fn sort_by_count_descending(mut self) -> Self {
        self.buckets.sort_by(|a, b| b.count.cmp(&a.count));
        self
    }

    pub(crate) fn truncate(mut self, limit: usize) -> Self {
        self.buckets.truncate(limit);
        self
    }
}

impl FromIterator<(String, usize)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for (key, count) in iter {
            tally.add_many(key, count);
        }
        tally.finish()
    }
}

/// Insertion-ordered counter backing every distribution.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    buckets: Vec<Bucket>,
    index: HashMap<String, usize>,
}

impl Tally {
    /// Tally whose buckets exist up front, in the given order, even when they stay at zero.
    pub(crate) fn with_keys(keys: &[&str]) -> Self {
        let mut tally = Self::default();
        for key in keys {
            tally.add_many((*key).to_string(), 0);
        }
        tally
    }

    pub(crate) fn add(&mut self, key: impl Into<String>) {
        self.add_many(key.into(), 1);
    }

    fn add_many(&mut self, key: String, count: usize) {
        match self.index.get(&key) {
            Some(&position) => self.buckets[position].count += count,
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push(Bucket { key, count });
            }
        }
    }

    pub(crate) fn finish(self) -> Distribution {
        Distribution {
            buckets: self.buckets,
        }
    }
}

pub const GPA_BANDS: [&str; 5] = ["0.0-1.0", "1.0-2.0", "2.0-3.0", "3.0-3.5", "3.5-4.0"];

/// Band for a parsed GPA. The top band is closed at 4.0; values outside `[0, 4]` have none.
pub fn gpa_band(gpa: f64) -> Option<&'static str> {
    if (0.0..1.0).contains(&gpa) {
        Some(GPA_BANDS[0])
    } else if (1.0..2.0).contains(&gpa) {
        Some(GPA_BANDS[1])
    } else if (2.0..3.0).contains(&gpa) {
        Some(GPA_BANDS[2])
    } else if (3.0..3.5).contains(&gpa) {
        Some(GPA_BANDS[3])
    } else if (3.5..=4.0).contains(&gpa) {
        Some(GPA_BANDS[4])
    } else {
        None
    }
}

pub const AGE_BANDS: [&str; 5] = ["18-20", "21-23", "24-26", "27-30", "31+"];

/// Band for an age; anything under 18 (including a defaulted 0) has none.
pub fn age_band(age: f64) -> Option<&'static str> {
    if (18.0..=20.0).contains(&age) {
        Some(AGE_BANDS[0])
    } else if (21.0..=23.0).contains(&age) {
        Some(AGE_BANDS[1])
    } else if (24.0..=26.0).contains(&age) {
        Some(AGE_BANDS[2])
    } else if (27.0..=30.0).contains(&age) {
        Some(AGE_BANDS[3])
    } else if age >= 31.0 {
        Some(AGE_BANDS[4])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_keeps_first_seen_order() {
        let mut tally = Tally::default();
        for key in ["F", "M", "F", "Undefined", "M", "F"] {
            tally.add(key);
        }
        let distribution = tally.finish();

        assert_eq!(distribution.keys().collect::<Vec<_>>(), ["F", "M", "Undefined"]);
        assert_eq!(distribution.count("F"), 3);
        assert_eq!(distribution.total(), 6);
        assert_eq!(distribution.count("X"), 0);
    }

    #[test]
    fn count_sort_is_stable_for_ties() {
        let distribution: Distribution = [
            ("FR".to_string(), 40),
            ("MA".to_string(), 120),
            ("US".to_string(), 40),
        ]
        .into_iter()
        .collect();

        let sorted = distribution.sort_by_count_descending();
        assert_eq!(sorted.keys().collect::<Vec<_>>(), ["MA", "FR", "US"]);
    }

    #[test]
    fn gpa_bands_are_half_open_except_the_last() {
        assert_eq!(gpa_band(0.0), Some("0.0-1.0"));
        assert_eq!(gpa_band(1.0), Some("1.0-2.0"));
        assert_eq!(gpa_band(2.99), Some("2.0-3.0"));
        assert_eq!(gpa_band(3.0), Some("3.0-3.5"));
        assert_eq!(gpa_band(3.5), Some("3.5-4.0"));
        assert_eq!(gpa_band(4.0), Some("3.5-4.0"));
        assert_eq!(gpa_band(4.01), None);
        assert_eq!(gpa_band(-0.5), None);
    }

    #[test]
    fn age_bands_are_inclusive() {
        assert_eq!(age_band(18.0), Some("18-20"));
        assert_eq!(age_band(20.0), Some("18-20"));
        assert_eq!(age_band(21.0), Some("21-23"));
        assert_eq!(age_band(30.0), Some("27-30"));
        assert_eq!(age_band(31.0), Some("31+"));
        assert_eq!(age_band(64.0), Some("31+"));
        assert_eq!(age_band(0.0), None);
        assert_eq!(age_band(17.0), None);
    }

    #[test]
    fn share_handles_empty_totals() {
        let empty = Tally::with_keys(&["Domestic", "International"]).finish();
        assert_eq!(empty.len(), 2);
        assert_eq!(empty.share("Domestic"), 0.0);

        let mut tally = Tally::with_keys(&["Domestic", "International"]);
        tally.add("Domestic");
        tally.add("Domestic");
        tally.add("Domestic");
        tally.add("International");
        assert_eq!(tally.finish().share("Domestic"), 75.0);
    }
}
