use crate::records::normalizer::RecordCategory;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MissingFieldView {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgressView {
    pub category: RecordCategory,
    pub category_label: &'static str,
    pub fetched: bool,
    pub percent: u8,
    pub filled_count: usize,
    pub total_count: usize,
    pub missing: Vec<MissingFieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub overall_percent: u8,
    pub candidacy_records: usize,
    pub categories: Vec<CategoryProgressView>,
}
