use super::normalizer::{keys, normalize, normalize_all, NormalizedRecord, RawRecord, RecordCategory};
use serde::{Deserialize, Serialize, Serializer};

/// Whether a category's data reached the core at all.
///
/// `NotFetched` is distinct from a fetched-but-empty payload: an unfetched
/// candidacy scores with the full checklist missing, an empty candidacy list
/// scores 0% with nothing listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceData<T> {
    NotFetched,
    Fetched(T),
}

impl<T> SourceData<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn fetched(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(value) => Some(value),
        }
    }
}

impl<T> Default for SourceData<T> {
    fn default() -> Self {
        Self::NotFetched
    }
}

impl<T> From<Option<T>> for SourceData<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFetched, Self::Fetched)
    }
}

impl<T: Serialize> Serialize for SourceData<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotFetched => serializer.serialize_none(),
            Self::Fetched(value) => serializer.serialize_some(value),
        }
    }
}

/// Person bundle as returned by the upstream search endpoint.
///
/// A `null` or absent category means it was not fetched. `candiday` is the
/// upstream spelling of `candidacy`; when both keys arrive, `candidacy` wins
/// unless it is `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PersonPayload")]
pub struct RawPersonRecord {
    pub student: Option<RawRecord>,
    pub info: Option<RawRecord>,
    pub candidacy: Option<Vec<RawRecord>>,
}

#[derive(Deserialize)]
struct PersonPayload {
    #[serde(default)]
    student: Option<RawRecord>,
    #[serde(default)]
    info: Option<RawRecord>,
    #[serde(default)]
    candidacy: Option<Vec<RawRecord>>,
    #[serde(default)]
    candiday: Option<Vec<RawRecord>>,
}

impl From<PersonPayload> for RawPersonRecord {
    fn from(payload: PersonPayload) -> Self {
        Self {
            student: payload.student,
            info: payload.info,
            candidacy: payload.candidacy.or(payload.candiday),
        }
    }
}

/// One person's normalized records across the three categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PersonRecord {
    pub student: SourceData<NormalizedRecord>,
    pub info: SourceData<NormalizedRecord>,
    pub candidacy: SourceData<Vec<NormalizedRecord>>,
}

impl PersonRecord {
    pub fn from_raw(raw: &RawPersonRecord) -> Self {
        Self {
            student: raw
                .student
                .as_ref()
                .map(|record| normalize(RecordCategory::Student, record))
                .into(),
            info: raw
                .info
                .as_ref()
                .map(|record| normalize(RecordCategory::PersonalInfo, record))
                .into(),
            candidacy: raw
                .candidacy
                .as_ref()
                .map(|records| normalize_all(RecordCategory::Candidacy, records))
                .into(),
        }
    }

    /// True when there is no student, no personal info and no candidacy record.
    pub fn is_empty(&self) -> bool {
        !self.student.is_fetched()
            && !self.info.is_fetched()
            && self.candidacy.fetched().map_or(true, Vec::is_empty)
    }

    pub fn first_candidacy(&self) -> Option<&NormalizedRecord> {
        self.candidacy.fetched().and_then(|records| records.first())
    }

    /// Every ID value this person carries, across categories.
    pub fn ids(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some(student) = self.student.fetched() {
            candidates.extend(student.text(keys::ID));
        }
        if let Some(info) = self.info.fetched() {
            candidates.extend(info.text("id_num"));
        }
        if let Some(records) = self.candidacy.fetched() {
            candidates.extend(records.iter().filter_map(|record| record.text("idNum")));
        }

        let mut ids: Vec<String> = Vec::with_capacity(candidates.len());
        for id in candidates {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn primary_id(&self) -> Option<String> {
        self.ids().into_iter().next()
    }

    /// `(first, middle, last)` from personal info, falling back to the first candidacy record.
    pub fn name_parts(&self) -> (Option<String>, Option<String>, Option<String>) {
        if let Some(info) = self.info.fetched() {
            let parts = (
                info.text("first_name"),
                info.text("middle_name"),
                info.text("last_name"),
            );
            if parts.0.is_some() || parts.2.is_some() {
                return parts;
            }
        }

        match self.first_candidacy() {
            Some(candidacy) => (
                candidacy.text("firstName"),
                None,
                candidacy.text("lastName"),
            ),
            None => (None, None, None),
        }
    }

    pub fn display_name(&self) -> Option<String> {
        let (first, middle, last) = self.name_parts();
        let name = [first, middle, last]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

impl From<&RawPersonRecord> for PersonRecord {
    fn from(raw: &RawPersonRecord) -> Self {
        Self::from_raw(raw)
    }
}
