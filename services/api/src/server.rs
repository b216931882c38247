use crate::cli::ServeArgs;
use crate::infra::{AppState, RecordStore};
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use campus_insights::config::{AppConfig, DataConfig};
use campus_insights::error::AppError;
use campus_insights::records::{StudentDataset, StudentDirectory};
use campus_insights::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        records: Arc::new(load_records(&config.data)?),
    };

    let app = router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campus insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_records(data: &DataConfig) -> Result<RecordStore, AppError> {
    let dataset = match &data.dataset_path {
        Some(path) => StudentDataset::from_path(path)?,
        None => {
            warn!("CAMPUS_DATASET_PATH not set; serving an empty dataset");
            StudentDataset::default()
        }
    };
    let directory = match &data.directory_path {
        Some(path) => StudentDirectory::from_path(path)?,
        None => {
            warn!("CAMPUS_DIRECTORY_PATH not set; search has no people to match");
            StudentDirectory::default()
        }
    };

    info!(
        records = dataset.len(),
        people = directory.len(),
        years = ?dataset.available_years(),
        "student records loaded"
    );
    Ok(RecordStore::new(dataset, directory, data.search_page_size))
}
