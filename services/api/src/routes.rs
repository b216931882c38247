use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use campus_insights::error::AppError;
use campus_insights::records::analytics::OverviewLegends;
use campus_insights::records::completion::views::ProgressSummary;
use campus_insights::records::search::PersonMatchView;
use campus_insights::records::{
    AggregateBundle, PersonRecord, ProgressReport, RawPersonRecord, SearchOutcome, StudentDataset,
    YearFilter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OverviewQuery {
    #[serde(default)]
    pub(crate) year: YearFilter,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverviewRequest {
    pub(crate) records: Value,
    #[serde(default)]
    pub(crate) year: YearFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OverviewSource {
    Dataset,
    Request,
}

#[derive(Debug, Serialize)]
pub(crate) struct OverviewResponse {
    pub(crate) source: OverviewSource,
    pub(crate) loaded_at: DateTime<Utc>,
    pub(crate) available_years: Vec<String>,
    pub(crate) overview: AggregateBundle,
    pub(crate) legends: OverviewLegends,
}

impl OverviewResponse {
    fn new(source: OverviewSource, dataset: &StudentDataset, overview: AggregateBundle) -> Self {
        Self {
            source,
            loaded_at: dataset.loaded_at(),
            available_years: dataset.available_years(),
            legends: overview.legends(),
            overview,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) student_id: Option<String>,
    pub(crate) display_name: Option<String>,
    pub(crate) progress: ProgressSummary,
}

impl ProgressResponse {
    fn for_person(person: &PersonRecord) -> Self {
        Self {
            student_id: person.primary_id(),
            display_name: person.display_name(),
            progress: ProgressReport::for_person(person).summary(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) query: String,
    pub(crate) page: Option<usize>,
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum SearchResponse {
    NoResults,
    Single {
        person: PersonMatchView,
        progress: ProgressSummary,
    },
    Multiple {
        page: usize,
        total_pages: usize,
        total_results: usize,
        people: Vec<PersonMatchView>,
    },
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::NoResults => Self::NoResults,
            SearchOutcome::Single(person) => Self::Single {
                person: PersonMatchView::from_person(&person),
                progress: ProgressReport::for_person(&person).summary(),
            },
            SearchOutcome::Multiple {
                page,
                total_pages,
                total_results,
                people,
            } => Self::Multiple {
                page,
                total_pages,
                total_results,
                people: people.iter().map(PersonMatchView::from_person).collect(),
            },
        }
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/overview",
            get(dataset_overview_endpoint).post(posted_overview_endpoint),
        )
        .route("/api/v1/years", get(years_endpoint))
        .route("/api/v1/progress", post(progress_endpoint))
        .route("/api/v1/search", get(search_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({
            "status": "ready",
            "records": state.records.dataset.len(),
            "people": state.records.directory.len(),
        })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dataset_overview_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Json<OverviewResponse> {
    let store = &state.records;
    let overview = store.overview(&query.year);
    Json(OverviewResponse::new(
        OverviewSource::Dataset,
        &store.dataset,
        AggregateBundle::clone(&overview),
    ))
}

pub(crate) async fn posted_overview_endpoint(
    Json(payload): Json<OverviewRequest>,
) -> Result<Json<OverviewResponse>, AppError> {
    let dataset = StudentDataset::from_json_value(payload.records)?;
    let overview = dataset.aggregate(&payload.year);
    Ok(Json(OverviewResponse::new(
        OverviewSource::Request,
        &dataset,
        overview,
    )))
}

pub(crate) async fn years_endpoint(Extension(state): Extension<AppState>) -> Json<Vec<String>> {
    let mut years = vec![YearFilter::All.to_string()];
    years.extend(state.records.dataset.available_years());
    Json(years)
}

pub(crate) async fn progress_endpoint(
    Json(payload): Json<RawPersonRecord>,
) -> Json<ProgressResponse> {
    let person = PersonRecord::from_raw(&payload);
    Json(ProgressResponse::for_person(&person))
}

pub(crate) async fn search_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let store = &state.records;
    let outcome = store.directory.search(
        &query.query,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(store.search_page_size),
    )?;
    Ok(Json(outcome.into()))
}
