use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::clock::Clock;
use super::domain::{CandidateId, CheckSubmission, RegistrationRequest, VerificationStatus};
use super::report::{self, DashboardSummary, ReportFilter};
use super::repository::CandidateRepository;
use super::service::{VerificationError, VerificationService};

/// Router builder exposing the candidate lifecycle and report endpoints.
pub fn candidate_router<R, C>(service: Arc<VerificationService<R, C>>) -> Router
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/candidates",
            get(list_handler::<R, C>).post(register_handler::<R, C>),
        )
        .route("/api/v1/candidates/:candidate_id", get(detail_handler::<R, C>))
        .route(
            "/api/v1/candidates/:candidate_id/checks",
            axum::routing::post(append_check_handler::<R, C>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<R, C>))
        .route(
            "/api/v1/reports/candidates.csv",
            get(csv_report_handler::<R, C>),
        )
        .route(
            "/api/v1/reports/turnaround",
            get(turnaround_handler::<R, C>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
}

/// Query string for the CSV export. `statuses` is a comma-separated list of labels.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
    #[serde(default)]
    statuses: Option<String>,
}

impl ReportQuery {
    fn into_filter(self) -> Result<ReportFilter, String> {
        let statuses = match self.statuses {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| {
                    VerificationStatus::parse(value)
                        .ok_or_else(|| format!("unknown verification status '{value}'"))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(ReportFilter {
            start: self.start,
            end: self.end,
            statuses,
        })
    }
}

fn error_response(error: VerificationError) -> Response {
    let status = match &error {
        VerificationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        VerificationError::NotFound(_) => StatusCode::NOT_FOUND,
        VerificationError::DuplicateCheck { .. } => StatusCode::CONFLICT,
        VerificationError::InvalidState(_) | VerificationError::Repository(_) => {
            warn!(error = %error, "candidate operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn list_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    match service.list_candidates() {
        Ok(candidates) => {
            let candidates = match query.q.as_deref() {
                Some(term) => report::search(&candidates, term),
                None => candidates,
            };
            (StatusCode::OK, axum::Json(candidates)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
    axum::Json(request): axum::Json<RegistrationRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    match service.register_candidate(request.profile, &request.checks) {
        Ok(candidate) => (StatusCode::CREATED, axum::Json(candidate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    match service.get_candidate(&CandidateId(candidate_id)) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn append_check_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
    Path(candidate_id): Path<String>,
    axum::Json(submission): axum::Json<CheckSubmission>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    match service.append_check(&CandidateId(candidate_id), submission) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    match service.list_candidates() {
        Ok(candidates) => {
            let summary = DashboardSummary::from_candidates(&candidates);
            (StatusCode::OK, axum::Json(summary)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn turnaround_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    match service.list_candidates() {
        Ok(candidates) => {
            let entries = report::turnaround_by_month(&candidates);
            (StatusCode::OK, axum::Json(entries)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn csv_report_handler<R, C>(
    State(service): State<Arc<VerificationService<R, C>>>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    R: CandidateRepository + 'static,
    C: Clock + 'static,
{
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(message) => {
            return error_response(VerificationError::Validation(message));
        }
    };

    let candidates = match service.list_candidates() {
        Ok(candidates) => filter.apply(&candidates),
        Err(error) => return error_response(error),
    };

    match report::csv_string(&candidates) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
