use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use verifyhub::config::FixtureConfig;
use verifyhub::screening::{
    FixtureBuilder, InMemoryCandidateRepository, VerificationError, VerificationStatus,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the in-memory store, optionally pre-loaded with demo candidates.
pub(crate) fn build_repository(
    fixtures: &FixtureConfig,
) -> Result<InMemoryCandidateRepository, VerificationError> {
    if !fixtures.seed_demo_data {
        return Ok(InMemoryCandidateRepository::new());
    }

    let candidates =
        FixtureBuilder::new(fixtures.seed, Utc::now()).build(fixtures.random_candidates)?;
    info!(
        seed = fixtures.seed,
        candidates = candidates.len(),
        "seeded demo candidates"
    );
    Ok(InMemoryCandidateRepository::with_candidates(candidates))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_status(raw: &str) -> Result<VerificationStatus, String> {
    VerificationStatus::parse(raw).ok_or_else(|| {
        format!("unknown status '{raw}' (expected pending, in-progress, completed, or failed)")
    })
}
