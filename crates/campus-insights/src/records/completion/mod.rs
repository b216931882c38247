mod checklist;
pub mod views;

pub use checklist::{
    FieldChecklist, CANDIDACY_CHECKLIST, INFO_CHECKLIST, OVERALL_FIELD_COUNT, STUDENT_CHECKLIST,
};

use crate::records::normalizer::{NormalizedRecord, RecordCategory};
use crate::records::profile::{PersonRecord, SourceData};
use serde::Serialize;
use views::{CategoryProgressView, MissingFieldView, ProgressSummary};

/// Completeness of one record against its category checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub percent: u8,
    pub missing_fields: Vec<&'static str>,
    pub filled_count: usize,
    pub total_count: usize,
}

impl CompletionResult {
    /// Result for a category whose data was never fetched: every checklist field is missing.
    pub fn not_fetched(category: RecordCategory) -> Self {
        let checklist = FieldChecklist::for_category(category);
        Self {
            percent: 0,
            missing_fields: checklist.fields.to_vec(),
            filled_count: 0,
            total_count: checklist.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count == self.total_count
    }
}

/// Scores `record` against the fixed checklist of `category`.
pub fn score_category(category: RecordCategory, record: &NormalizedRecord) -> CompletionResult {
    let checklist = FieldChecklist::for_category(category);
    let missing_fields: Vec<&'static str> = checklist
        .fields
        .iter()
        .copied()
        .filter(|key| record.is_missing(key))
        .collect();
    let filled_count = checklist.len() - missing_fields.len();

    CompletionResult {
        percent: rounded_percent(filled_count, checklist.len()),
        missing_fields,
        filled_count,
        total_count: checklist.len(),
    }
}

/// Scores a candidacy collection by its first record only.
///
/// An empty collection scores 0% with no missing fields listed.
pub fn score_candidacy(records: &[NormalizedRecord]) -> CompletionResult {
    match records.first() {
        Some(first) => score_category(RecordCategory::Candidacy, first),
        None => CompletionResult {
            percent: 0,
            missing_fields: Vec::new(),
            filled_count: 0,
            total_count: CANDIDACY_CHECKLIST.len(),
        },
    }
}

/// Combined score over all three categories for one person.
pub fn score_overall(
    student: &CompletionResult,
    info: &CompletionResult,
    candidacy: &CompletionResult,
) -> u8 {
    let total_filled = student.filled_count + info.filled_count + candidacy.filled_count;
    rounded_percent(total_filled, OVERALL_FIELD_COUNT)
}

/// Half-up rounded `part / whole * 100`.
pub(crate) fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let scaled = (part * 200 + whole) / (2 * whole);
    scaled.min(100) as u8
}

/// Per-category and combined completion for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub student: CompletionResult,
    pub info: CompletionResult,
    pub candidacy: CompletionResult,
    pub overall: u8,
    pub candidacy_records: usize,
    pub fetched: [bool; 3],
}

impl ProgressReport {
    pub fn for_person(person: &PersonRecord) -> Self {
        let student = match &person.student {
            SourceData::Fetched(record) => score_category(RecordCategory::Student, record),
            SourceData::NotFetched => CompletionResult::not_fetched(RecordCategory::Student),
        };
        let info = match &person.info {
            SourceData::Fetched(record) => score_category(RecordCategory::PersonalInfo, record),
            SourceData::NotFetched => CompletionResult::not_fetched(RecordCategory::PersonalInfo),
        };
        let (candidacy, candidacy_records) = match &person.candidacy {
            SourceData::Fetched(records) => (score_candidacy(records), records.len()),
            SourceData::NotFetched => (CompletionResult::not_fetched(RecordCategory::Candidacy), 0),
        };
        let overall = score_overall(&student, &info, &candidacy);

        Self {
            student,
            info,
            candidacy,
            overall,
            candidacy_records,
            fetched: [
                person.student.is_fetched(),
                person.info.is_fetched(),
                person.candidacy.is_fetched(),
            ],
        }
    }

    pub fn result_for(&self, category: RecordCategory) -> &CompletionResult {
        match category {
            RecordCategory::Student => &self.student,
            RecordCategory::PersonalInfo => &self.info,
            RecordCategory::Candidacy => &self.candidacy,
        }
    }

    pub fn summary(&self) -> ProgressSummary {
        let categories = RecordCategory::ordered()
            .into_iter()
            .zip(self.fetched)
            .map(|(category, fetched)| {
                let result = self.result_for(category);
                let checklist = FieldChecklist::for_category(category);
                CategoryProgressView {
                    category,
                    category_label: category.label(),
                    fetched,
                    percent: result.percent,
                    filled_count: result.filled_count,
                    total_count: result.total_count,
                    missing: result
                        .missing_fields
                        .iter()
                        .map(|&key| MissingFieldView {
                            key,
                            label: checklist.label(key),
                        })
                        .collect(),
                }
            })
            .collect();

        ProgressSummary {
            overall_percent: self.overall,
            candidacy_records: self.candidacy_records,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::normalizer::{normalize, RawRecord};
    use serde_json::{json, Value};

    fn filled(checklist: &FieldChecklist) -> NormalizedRecord {
        let mut raw = RawRecord::new();
        for key in checklist.fields {
            raw.insert((*key).to_string(), Value::from("x"));
        }
        normalize(checklist.category, &raw)
    }

    fn record(category: RecordCategory, value: Value) -> NormalizedRecord {
        normalize(category, value.as_object().expect("object literal"))
    }

    #[test]
    fn zero_counts_as_filled() {
        let student = record(
            RecordCategory::Student,
            json!({ "idNum": "1", "numOfCourses": 0, "hoursEnrolled": "", "careerGpa": null }),
        );
        let result = score_category(RecordCategory::Student, &student);

        assert_eq!(result.filled_count, 2);
        assert!(!result.missing_fields.contains(&"numOfCourses"));
        assert!(result.missing_fields.contains(&"hoursEnrolled"));
        assert!(result.missing_fields.contains(&"careerGpa"));
        assert_eq!(result.filled_count + result.missing_fields.len(), result.total_count);
        assert_eq!(result.percent, 13);
    }

    #[test]
    fn raw_casing_does_not_change_the_score() {
        let upper = record(
            RecordCategory::PersonalInfo,
            json!({ "ID_NUM": "7", "LAST_NAME": "Alaoui", "FIRST_NAME": "Yassine", "APPID": "" }),
        );
        let lower = record(
            RecordCategory::PersonalInfo,
            json!({ "id_num": "7", "last_name": "Alaoui", "first_name": "Yassine", "appid": "" }),
        );

        let upper = score_category(RecordCategory::PersonalInfo, &upper);
        assert_eq!(upper, score_category(RecordCategory::PersonalInfo, &lower));
        assert_eq!(upper.percent, 30);
        assert_eq!(upper.missing_fields[0], "middle_name");
    }

    #[test]
    fn half_values_round_up() {
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 40), 3);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(0, 38), 0);
        assert_eq!(rounded_percent(63, 63), 100);
    }

    #[test]
    fn empty_candidacy_collection_scores_zero_without_missing_list() {
        let result = score_candidacy(&[]);
        assert_eq!(result.percent, 0);
        assert_eq!(result.filled_count, 0);
        assert_eq!(result.total_count, 38);
        assert!(result.missing_fields.is_empty());
    }

    #[test]
    fn only_first_candidacy_record_is_scored() {
        let sparse = record(RecordCategory::Candidacy, json!({ "idNum": "9", "stage": "ADM" }));
        let complete = filled(&CANDIDACY_CHECKLIST);

        let pair = score_candidacy(&[sparse.clone(), complete.clone()]);
        assert_eq!(pair, score_candidacy(&[sparse]));
        assert_eq!(pair.filled_count, 2);

        let reversed = score_candidacy(&[complete]);
        assert_eq!(reversed.percent, 100);
    }

    #[test]
    fn not_fetched_lists_the_full_checklist() {
        let result = CompletionResult::not_fetched(RecordCategory::Candidacy);
        assert_eq!(result.missing_fields.len(), 38);
        assert_eq!(result.percent, 0);
        assert_ne!(result, score_candidacy(&[]));
    }

    #[test]
    fn fully_filled_person_scores_one_hundred() {
        let student = score_category(RecordCategory::Student, &filled(&STUDENT_CHECKLIST));
        let info = score_category(RecordCategory::PersonalInfo, &filled(&INFO_CHECKLIST));
        let candidacy = score_candidacy(&[filled(&CANDIDACY_CHECKLIST)]);

        assert!(student.is_complete() && info.is_complete() && candidacy.is_complete());
        assert_eq!(score_overall(&student, &info, &candidacy), 100);
    }

    #[test]
    fn overall_counts_filled_fields_across_categories() {
        let student = score_category(RecordCategory::Student, &filled(&STUDENT_CHECKLIST));
        let info = CompletionResult::not_fetched(RecordCategory::PersonalInfo);
        let candidacy = score_candidacy(&[]);

        // 15 of 63
        assert_eq!(score_overall(&student, &info, &candidacy), 24);
    }

    #[test]
    fn progress_report_distinguishes_missing_sources() {
        let person = PersonRecord {
            student: SourceData::Fetched(filled(&STUDENT_CHECKLIST)),
            info: SourceData::NotFetched,
            candidacy: SourceData::Fetched(Vec::new()),
        };

        let report = ProgressReport::for_person(&person);
        assert_eq!(report.student.percent, 100);
        assert_eq!(report.info.missing_fields.len(), 10);
        assert!(report.candidacy.missing_fields.is_empty());
        assert_eq!(report.fetched, [true, false, true]);

        let summary = report.summary();
        assert_eq!(summary.categories.len(), 3);
        assert_eq!(summary.categories[1].missing[0].label, "ID Number");
        assert!(!summary.categories[1].fetched);
        assert_eq!(summary.overall_percent, 24);
    }
}
