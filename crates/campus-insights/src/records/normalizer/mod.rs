mod aliases;
mod value;

pub use aliases::FieldSpec;
pub use value::{gpa_or_zero, is_missing, FieldValue};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Loosely typed record as delivered by upstream sources.
pub type RawRecord = Map<String, Value>;

/// Canonical keys read by the analytics pipeline from student records.
pub mod keys {
    pub const ID: &str = "idNum";
    pub const YEAR: &str = "yearCode";
    pub const GPA: &str = "careerGpa";
    pub const GENDER: &str = "gender";
    pub const PROGRAM: &str = "major1";
    pub const RESIDENCY: &str = "international";
    pub const AGE: &str = "age";
    pub const DEPARTMENT: &str = "programCode";
    pub const CLASS_LEVEL: &str = "seniority";
    pub const DIVISION: &str = "divisionCode";
    pub const TERM: &str = "entranceTerm";
    pub const COUNTRY: &str = "country";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    Student,
    PersonalInfo,
    Candidacy,
}

impl RecordCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Student, Self::PersonalInfo, Self::Candidacy]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::PersonalInfo => "Personal Info",
            Self::Candidacy => "Candidacy",
        }
    }

    /// Every canonical field the category recognizes, in display order.
    pub fn fields(self) -> &'static [FieldSpec] {
        aliases::fields_for(self)
    }

    pub fn field_label(self, key: &str) -> Option<&'static str> {
        aliases::spec_for(self, key).map(|spec| spec.label)
    }
}

/// A raw record re-keyed onto its category's canonical field names.
///
/// Fields the category does not recognize are kept in `extras` under their
/// raw key; scoring and aggregation never look at them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    category: RecordCategory,
    fields: BTreeMap<&'static str, FieldValue>,
    extras: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn category(&self) -> RecordCategory {
        self.category
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn is_missing(&self, key: &str) -> bool {
        is_missing(self.get(key))
    }

    /// Present value rendered as text; `None` when the field is missing.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|value| !is_missing(Some(value)))
            .map(FieldValue::as_key)
    }

    /// Grouping label for distributions: missing values fall into `"Undefined"`.
    pub fn bucket_key(&self, key: &str) -> String {
        self.text(key)
            .unwrap_or_else(|| crate::records::analytics::UNDEFINED_BUCKET.to_string())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    pub fn gpa(&self) -> f64 {
        gpa_or_zero(self.get(keys::GPA))
    }

    pub fn extras(&self) -> &BTreeMap<String, FieldValue> {
        &self.extras
    }
}

/// Re-keys `raw` onto the canonical names of `category`.
///
/// When several raw spellings of one field are present, the first non-missing
/// value in raw key order wins.
pub fn normalize(category: RecordCategory, raw: &RawRecord) -> NormalizedRecord {
    let mut fields: BTreeMap<&'static str, FieldValue> = BTreeMap::new();
    let mut extras = BTreeMap::new();

    for (name, value) in raw {
        let value = FieldValue::from_json(value);
        match aliases::canonical_key(category, name) {
            Some(key) => {
                let replace = fields
                    .get(key)
                    .map_or(true, |current| is_missing(Some(current)) && !is_missing(Some(&value)));
                if replace {
                    fields.insert(key, value);
                }
            }
            None => {
                extras.insert(name.clone(), value);
            }
        }
    }

    NormalizedRecord {
        category,
        fields,
        extras,
    }
}

pub fn normalize_all(category: RecordCategory, raw: &[RawRecord]) -> Vec<NormalizedRecord> {
    raw.iter().map(|record| normalize(category, record)).collect()
}
