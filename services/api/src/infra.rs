use campus_insights::records::{AggregateBundle, StudentDataset, StudentDirectory, YearFilter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) records: Arc<RecordStore>,
}

/// Data loaded at startup plus the aggregate cache built on top of it.
pub(crate) struct RecordStore {
    pub(crate) dataset: StudentDataset,
    pub(crate) directory: StudentDirectory,
    pub(crate) search_page_size: usize,
    pub(crate) cache: AggregateCache,
}

impl RecordStore {
    pub(crate) fn new(
        dataset: StudentDataset,
        directory: StudentDirectory,
        search_page_size: usize,
    ) -> Self {
        Self {
            dataset,
            directory,
            search_page_size,
            cache: AggregateCache::default(),
        }
    }

    pub(crate) fn overview(&self, year_filter: &YearFilter) -> Arc<AggregateBundle> {
        self.cache.get_or_compute(&self.dataset, year_filter)
    }
}

/// Aggregates keyed on the year selection and the dataset version they were built from.
#[derive(Default, Clone)]
pub(crate) struct AggregateCache {
    entries: Arc<Mutex<HashMap<(YearFilter, u64), Arc<AggregateBundle>>>>,
}

impl AggregateCache {
    pub(crate) fn get_or_compute(
        &self,
        dataset: &StudentDataset,
        year_filter: &YearFilter,
    ) -> Arc<AggregateBundle> {
        let key = (year_filter.clone(), dataset.version());
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bundle) = guard.get(&key) {
            debug!(year = %year_filter, version = dataset.version(), "aggregate cache hit");
            return Arc::clone(bundle);
        }

        guard.retain(|(_, version), _| *version == dataset.version());
        let bundle = Arc::new(dataset.aggregate(year_filter));
        guard.insert(key, Arc::clone(&bundle));
        debug!(year = %year_filter, entries = guard.len(), "aggregate cached");
        bundle
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
