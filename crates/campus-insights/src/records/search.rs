use super::completion::ProgressReport;
use super::dataset::DatasetError;
use super::profile::{PersonRecord, RawPersonRecord};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search query must not be empty")]
    EmptyQuery,
    #[error("page {page} is out of range (1..={total_pages})")]
    InvalidPage { page: usize, total_pages: usize },
}

/// What a search resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    NoResults,
    Single(PersonRecord),
    Multiple {
        page: usize,
        total_pages: usize,
        total_results: usize,
        people: Vec<PersonRecord>,
    },
}

impl SearchOutcome {
    pub fn total_results(&self) -> usize {
        match self {
            Self::NoResults => 0,
            Self::Single(_) => 1,
            Self::Multiple { total_results, .. } => *total_results,
        }
    }
}

/// One row of a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonMatchView {
    pub id: Option<String>,
    pub name: Option<String>,
    pub overall_percent: u8,
}

impl PersonMatchView {
    pub fn from_person(person: &PersonRecord) -> Self {
        Self {
            id: person.primary_id(),
            name: person.display_name(),
            overall_percent: ProgressReport::for_person(person).overall,
        }
    }
}

/// People that search runs against.
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    people: Vec<PersonRecord>,
}

impl StudentDirectory {
    pub fn new(people: Vec<PersonRecord>) -> Self {
        Self { people }
    }

    pub fn from_raw(raw: &[RawPersonRecord]) -> Self {
        Self::new(raw.iter().map(PersonRecord::from_raw).collect())
    }

    /// Reads a JSON array of person bundles (`student`, `info`, `candidacy`).
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_reader(reader)?;
        let Value::Array(items) = value else {
            return Err(DatasetError::NotAnArray);
        };

        let mut raw = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                return Err(DatasetError::NotAnObject { index });
            }
            raw.push(serde_json::from_value::<RawPersonRecord>(item)?);
        }

        let directory = Self::from_raw(&raw);
        info!(people = directory.len(), "loaded student directory");
        Ok(directory)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn people(&self) -> &[PersonRecord] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Resolves `query` against IDs (exact) and first/last names
    /// (case-insensitive substring). `page` is 1-based; a `limit` of 0 is treated as 1.
    pub fn search(&self, query: &str, page: usize, limit: usize) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let needle = query.to_lowercase();
        let matches: Vec<&PersonRecord> = self
            .people
            .iter()
            .filter(|person| matches_query(person, query, &needle))
            .collect();
        debug!(query, matches = matches.len(), "student search resolved");

        match matches.as_slice() {
            [] => Ok(SearchOutcome::NoResults),
            [person] => Ok(SearchOutcome::Single((*person).clone())),
            _ => {
                let limit = limit.max(1);
                let total_results = matches.len();
                let total_pages = total_results.div_ceil(limit);
                if page == 0 || page > total_pages {
                    return Err(SearchError::InvalidPage { page, total_pages });
                }

                let people = matches
                    .into_iter()
                    .skip((page - 1) * limit)
                    .take(limit)
                    .cloned()
                    .collect();
                Ok(SearchOutcome::Multiple {
                    page,
                    total_pages,
                    total_results,
                    people,
                })
            }
        }
    }
}

fn matches_query(person: &PersonRecord, query: &str, needle: &str) -> bool {
    if person.is_empty() {
        return false;
    }
    if person.ids().iter().any(|id| id == query) {
        return true;
    }
    name_candidates(person)
        .iter()
        .any(|name| name.to_lowercase().contains(needle))
}

fn name_candidates(person: &PersonRecord) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(info) = person.info.fetched() {
        names.extend(info.text("first_name"));
        names.extend(info.text("last_name"));
    }
    if let Some(candidacy) = person.first_candidacy() {
        names.extend(candidacy.text("firstName"));
        names.extend(candidacy.text("lastName"));
    }
    names
}
