mod distribution;
mod metrics;
mod performance;
pub mod views;

pub use distribution::{age_band, gpa_band, Bucket, Distribution, AGE_BANDS, GPA_BANDS};
pub use metrics::{KeyMetrics, GOOD_STANDING_GPA, ON_TRACK_GPA};
pub use performance::{ProgramPerformance, YearRetention, GPA_DISPLAY_SCALE};
pub use views::{LegendEntry, OverviewLegends};

use crate::records::normalizer::{keys, NormalizedRecord};
use distribution::Tally;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Bucket label for records whose grouping field is missing.
pub const UNDEFINED_BUCKET: &str = "Undefined";
pub const DOMESTIC: &str = "Domestic";
pub const INTERNATIONAL: &str = "International";
/// Hard cap on the country distribution.
pub const COUNTRY_LIMIT: usize = 5;

/// Academic-year selection applied to every filtered metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum YearFilter {
    #[default]
    All,
    Year(String),
}

impl YearFilter {
    /// `"all"` (any case) or a blank value selects every year.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Year(trimmed.to_string())
        }
    }

    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        match self {
            Self::All => true,
            Self::Year(year) => record.text(keys::YEAR).as_deref() == Some(year.as_str()),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Year(year) => f.write_str(year),
        }
    }
}

impl From<String> for YearFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<YearFilter> for String {
    fn from(value: YearFilter) -> Self {
        value.to_string()
    }
}

/// Everything the analytics view renders for one dataset and year selection.
///
/// `enrollment_by_year` and `retention_by_year` always cover the full dataset;
/// every other field is computed over the filtered slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBundle {
    pub year_filter: YearFilter,
    pub key_metrics: KeyMetrics,
    pub enrollment_by_year: Distribution,
    pub gender: Distribution,
    pub programs: Distribution,
    pub gpa_bands: Distribution,
    pub residency: Distribution,
    pub age_bands: Distribution,
    pub departments: Distribution,
    pub class_levels: Distribution,
    pub divisions: Distribution,
    pub terms: Distribution,
    pub countries: Distribution,
    pub program_performance: Vec<ProgramPerformance>,
    pub retention_by_year: Vec<YearRetention>,
}

impl AggregateBundle {
    /// True when the filtered slice held no records; not an error.
    pub fn is_empty(&self) -> bool {
        self.key_metrics.total_enrollment == 0
    }

    pub fn legends(&self) -> OverviewLegends {
        OverviewLegends {
            gender: self.gender.legend(),
            terms: self.terms.legend(),
            divisions: self.divisions.legend(),
            residency: self.residency.legend(),
        }
    }
}

/// Builds the analytics bundle. Pure: the same inputs always give the same bundle.
pub fn aggregate(records: &[NormalizedRecord], year_filter: &YearFilter) -> AggregateBundle {
    let slice: Vec<&NormalizedRecord> = records
        .iter()
        .filter(|record| year_filter.matches(record))
        .collect();

    AggregateBundle {
        year_filter: year_filter.clone(),
        key_metrics: KeyMetrics::compute(&slice),
        enrollment_by_year: enrollment_by_year(records),
        gender: group_by(&slice, keys::GENDER),
        programs: group_by(&slice, keys::PROGRAM),
        gpa_bands: gpa_distribution(&slice),
        residency: residency_distribution(&slice),
        age_bands: age_distribution(&slice),
        departments: group_by(&slice, keys::DEPARTMENT).sort_by_count_descending(),
        class_levels: group_by(&slice, keys::CLASS_LEVEL),
        divisions: group_by(&slice, keys::DIVISION),
        terms: group_by(&slice, keys::TERM),
        countries: group_by(&slice, keys::COUNTRY)
            .sort_by_count_descending()
            .truncate(COUNTRY_LIMIT),
        program_performance: performance::program_performance(&slice),
        retention_by_year: performance::retention_by_year(records),
    }
}

/// Distinct years present in the dataset, ascending.
pub fn available_years(records: &[NormalizedRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.text(keys::YEAR))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records per year over the whole dataset; records without a year are skipped.
fn enrollment_by_year(records: &[NormalizedRecord]) -> Distribution {
    let mut tally = Tally::default();
    for year in records.iter().filter_map(|record| record.text(keys::YEAR)) {
        tally.add(year);
    }
    tally.finish().sort_by_key_ascending()
}

fn group_by(slice: &[&NormalizedRecord], key: &str) -> Distribution {
    let mut tally = Tally::default();
    for record in slice {
        tally.add(record.bucket_key(key));
    }
    tally.finish()
}

fn gpa_distribution(slice: &[&NormalizedRecord]) -> Distribution {
    let mut tally = Tally::with_keys(&GPA_BANDS);
    for band in slice.iter().filter_map(|record| gpa_band(record.gpa())) {
        tally.add(band);
    }
    tally.finish()
}

/// Exact `"Domestic"` / `"International"` matches only; other values count toward neither.
fn residency_distribution(slice: &[&NormalizedRecord]) -> Distribution {
    let mut tally = Tally::with_keys(&[DOMESTIC, INTERNATIONAL]);
    for record in slice {
        match record.text(keys::RESIDENCY).as_deref() {
            Some(DOMESTIC) => tally.add(DOMESTIC),
            Some(INTERNATIONAL) => tally.add(INTERNATIONAL),
            _ => {}
        }
    }
    tally.finish()
}

/// Missing or non-numeric ages read as 0 and land in no band.
fn age_distribution(slice: &[&NormalizedRecord]) -> Distribution {
    let mut tally = Tally::with_keys(&AGE_BANDS);
    for record in slice {
        let age = record.number(keys::AGE).unwrap_or(0.0);
        if let Some(band) = age_band(age) {
            tally.add(band);
        }
    }
    tally.finish()
}
