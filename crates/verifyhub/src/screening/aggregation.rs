//! Roll-up of per-check statuses into a single candidate status.
//!
//! Severity is evaluated worst-first: any failure dominates, then outstanding
//! (pending) work, then work underway. Only a uniformly completed set yields
//! `Completed`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{VerificationCheck, VerificationStatus};

/// Result of aggregating a candidate's checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRollup {
    pub overall_status: VerificationStatus,
    pub completed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("cannot aggregate an empty set of verification checks")]
    EmptyChecks,
}

/// Computes the overall status for `checks`, stamping `now` on terminal outcomes.
pub fn aggregate(
    checks: &[VerificationCheck],
    now: DateTime<Utc>,
) -> Result<StatusRollup, AggregationError> {
    if checks.is_empty() {
        return Err(AggregationError::EmptyChecks);
    }

    let any = |status: VerificationStatus| checks.iter().any(|check| check.status == status);

    let overall_status = if any(VerificationStatus::Failed) {
        VerificationStatus::Failed
    } else if any(VerificationStatus::Pending) {
        VerificationStatus::Pending
    } else if any(VerificationStatus::InProgress) {
        VerificationStatus::InProgress
    } else {
        VerificationStatus::Completed
    };

    let completed_date = match overall_status {
        VerificationStatus::Failed | VerificationStatus::Completed => Some(now),
        VerificationStatus::Pending | VerificationStatus::InProgress => None,
    };

    Ok(StatusRollup {
        overall_status,
        completed_date,
    })
}
