use super::metrics::{fixed, percentage, GOOD_STANDING_GPA, ON_TRACK_GPA};
use crate::records::normalizer::{keys, NormalizedRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Maps the 0-4 GPA scale onto the 0-100 range used by radar charts.
pub const GPA_DISPLAY_SCALE: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramPerformance {
    pub program: String,
    pub scaled_gpa: f64,
    pub retention_pct: f64,
    pub graduation_pct: f64,
    pub students: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRetention {
    pub year: String,
    pub rate: String,
    pub good_standing: usize,
    pub total: usize,
}

#[derive(Debug, Default)]
struct Accumulator {
    gpa_sum: f64,
    good_standing: usize,
    on_track: usize,
    total: usize,
}

impl Accumulator {
    fn record(&mut self, gpa: f64) {
        self.gpa_sum += gpa;
        self.total += 1;
        if gpa >= GOOD_STANDING_GPA {
            self.good_standing += 1;
        }
        if gpa >= ON_TRACK_GPA {
            self.on_track += 1;
        }
    }
}

/// One row per program seen in `slice`, in first-seen order.
pub(crate) fn program_performance(slice: &[&NormalizedRecord]) -> Vec<ProgramPerformance> {
    let mut order: Vec<String> = Vec::new();
    let mut programs: HashMap<String, Accumulator> = HashMap::new();

    for record in slice {
        let program = record.bucket_key(keys::PROGRAM);
        if !programs.contains_key(&program) {
            order.push(program.clone());
        }
        programs.entry(program).or_default().record(record.gpa());
    }

    order
        .into_iter()
        .filter_map(|program| {
            let totals = programs.remove(&program)?;
            Some(ProgramPerformance {
                scaled_gpa: totals.gpa_sum / totals.total.max(1) as f64 * GPA_DISPLAY_SCALE,
                retention_pct: percentage(totals.good_standing, totals.total),
                graduation_pct: percentage(totals.on_track, totals.total),
                students: totals.total,
                program,
            })
        })
        .collect()
}

/// Good-standing rate per academic year, ascending by year. Records without a year are skipped.
pub(crate) fn retention_by_year(records: &[NormalizedRecord]) -> Vec<YearRetention> {
    let mut years: HashMap<String, Accumulator> = HashMap::new();
    for record in records {
        if let Some(year) = record.text(keys::YEAR) {
            years.entry(year).or_default().record(record.gpa());
        }
    }

    let mut trend: Vec<YearRetention> = years
        .into_iter()
        .map(|(year, totals)| YearRetention {
            rate: fixed(percentage(totals.good_standing, totals.total), 1),
            good_standing: totals.good_standing,
            total: totals.total,
            year,
        })
        .collect();
    trend.sort_by(|a, b| a.year.cmp(&b.year));
    trend
}
