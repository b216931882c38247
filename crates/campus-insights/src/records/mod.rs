//! Student records: normalization, completeness scoring and dataset analytics.

pub mod analytics;
pub mod completion;
pub mod dataset;
pub mod normalizer;
pub mod profile;
pub mod search;

pub use analytics::{aggregate, available_years, AggregateBundle, Distribution, YearFilter};
pub use completion::{CompletionResult, ProgressReport};
pub use dataset::{DatasetError, StudentDataset};
pub use normalizer::{normalize, NormalizedRecord, RawRecord, RecordCategory};
pub use profile::{PersonRecord, RawPersonRecord, SourceData};
pub use search::{SearchError, SearchOutcome, StudentDirectory};
