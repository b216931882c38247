use crate::records::normalizer::NormalizedRecord;
use serde::Serialize;

/// GPA at or above which a student counts toward retention ("good standing").
pub const GOOD_STANDING_GPA: f64 = 2.0;
/// GPA at or above which a student counts toward graduation ("on track").
pub const ON_TRACK_GPA: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_enrollment: usize,
    pub average_gpa: f64,
    pub retention_rate: String,
    pub graduation_rate: String,
}

impl KeyMetrics {
    pub(crate) fn compute(slice: &[&NormalizedRecord]) -> Self {
        let total_enrollment = slice.len();
        let gpa_sum: f64 = slice.iter().map(|record| record.gpa()).sum();
        let good_standing = count_at_or_above(slice, GOOD_STANDING_GPA);
        let on_track = count_at_or_above(slice, ON_TRACK_GPA);

        Self {
            total_enrollment,
            average_gpa: round_to(gpa_sum / total_enrollment.max(1) as f64, 2),
            retention_rate: fixed(percentage(good_standing, total_enrollment), 2),
            graduation_rate: fixed(percentage(on_track, total_enrollment), 2),
        }
    }
}

pub(crate) fn count_at_or_above(slice: &[&NormalizedRecord], threshold: f64) -> usize {
    slice
        .iter()
        .filter(|record| record.gpa() >= threshold)
        .count()
}

/// `part / whole * 100`, with an empty whole treated as 1.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 / whole.max(1) as f64 * 100.0
}

/// Rounds half away from zero, so `3.125` becomes `3.13`.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fixed-point text with ties rounded up rather than to the even digit.
pub(crate) fn fixed(value: f64, decimals: usize) -> String {
    let places = i32::try_from(decimals).unwrap_or(i32::MAX);
    format!("{:.*}", decimals, round_to(value, places))
}
