use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::aggregation::{aggregate, AggregationError};
use super::clock::{Clock, SystemClock};
use super::domain::{
    Candidate, CandidateId, CandidateProfile, CheckId, CheckSubmission, CheckType,
    VerificationCheck, VerificationStatus,
};
use super::repository::{CandidateRepository, RepositoryError};

const INITIATED_DETAILS: &str = "Initiated";

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CHECK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

fn next_check_id() -> CheckId {
    let id = CHECK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CheckId(format!("chk-{id:06}"))
}

/// Lifecycle service: the only writer of candidate and check state.
pub struct VerificationService<R, C = SystemClock> {
    repository: Arc<R>,
    clock: C,
    candidate_locks: Mutex<HashMap<CandidateId, Arc<Mutex<()>>>>,
}

impl<R> VerificationService<R, SystemClock>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R, C> VerificationService<R, C>
where
    R: CandidateRepository + 'static,
    C: Clock,
{
    pub fn with_clock(repository: Arc<R>, clock: C) -> Self {
        Self {
            repository,
            clock,
            candidate_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Register a candidate with one pending check per requested type.
    pub fn register_candidate(
        &self,
        profile: CandidateProfile,
        check_types: &[CheckType],
    ) -> Result<Candidate, VerificationError> {
        let profile = validate_profile(profile)?;
        validate_check_types(check_types)?;

        let now = self.clock.now();
        let checks: Vec<VerificationCheck> = check_types
            .iter()
            .map(|check_type| VerificationCheck {
                id: next_check_id(),
                check_type: *check_type,
                status: VerificationStatus::Pending,
                updated_at: now,
                verifier: None,
                details: INITIATED_DETAILS.to_string(),
            })
            .collect();

        let rollup = aggregate(&checks, now)?;
        let mut candidate = Candidate {
            id: next_candidate_id(),
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            requested_date: now,
            completed_date: None,
            overall_status: VerificationStatus::Pending,
            checks,
        };
        candidate.apply_rollup(rollup);

        let stored = self.repository.insert(candidate)?;
        info!(
            candidate_id = %stored.id,
            checks = stored.checks.len(),
            "registered candidate"
        );
        Ok(stored)
    }

    /// Append a new check to an existing candidate and re-aggregate its status.
    pub fn append_check(
        &self,
        candidate_id: &CandidateId,
        submission: CheckSubmission,
    ) -> Result<Candidate, VerificationError> {
        if self.repository.fetch(candidate_id)?.is_none() {
            return Err(VerificationError::NotFound(candidate_id.clone()));
        }

        let lock = self.candidate_lock(candidate_id)?;
        let outcome = match lock.lock() {
            Ok(_serialized) => self.append_serialized(candidate_id, submission),
            Err(_) => Err(lock_poisoned()),
        };
        self.release_lock(candidate_id, lock);
        outcome
    }

    /// Runs with the candidate's lock held; re-reads so concurrent appends are observed.
    fn append_serialized(
        &self,
        candidate_id: &CandidateId,
        submission: CheckSubmission,
    ) -> Result<Candidate, VerificationError> {
        let mut candidate = self
            .repository
            .fetch(candidate_id)?
            .ok_or_else(|| VerificationError::NotFound(candidate_id.clone()))?;

        if candidate.has_check(submission.check_type) {
            return Err(VerificationError::DuplicateCheck {
                candidate_id: candidate_id.clone(),
                check_type: submission.check_type,
            });
        }

        let submission = validate_submission(submission)?;
        let now = self.clock.now();
        candidate.checks.push(VerificationCheck {
            id: next_check_id(),
            check_type: submission.check_type,
            status: submission.status,
            updated_at: now,
            verifier: submission.verifier,
            details: submission.details,
        });

        let previous = candidate.overall_status;
        let rollup = aggregate(&candidate.checks, now)?;
        candidate.apply_rollup(rollup);
        debug!(
            candidate_id = %candidate.id,
            from = %previous,
            to = %candidate.overall_status,
            "re-aggregated candidate status"
        );

        self.repository.update(candidate.clone())?;
        info!(
            candidate_id = %candidate.id,
            check_type = %submission.check_type,
            status = %submission.status,
            overall_status = %candidate.overall_status,
            "appended verification check"
        );
        Ok(candidate)
    }

    /// All candidates, newest registration first.
    pub fn list_candidates(&self) -> Result<Vec<Candidate>, VerificationError> {
        Ok(self.repository.list()?)
    }

    pub fn get_candidate(&self, candidate_id: &CandidateId) -> Result<Candidate, VerificationError> {
        self.repository
            .fetch(candidate_id)?
            .ok_or_else(|| VerificationError::NotFound(candidate_id.clone()))
    }

    fn candidate_lock(&self, candidate_id: &CandidateId) -> Result<Arc<Mutex<()>>, VerificationError> {
        let mut locks = self.candidate_locks.lock().map_err(|_| lock_poisoned())?;
        Ok(locks
            .entry(candidate_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Drops the table entry once no other caller holds or waits on it.
    fn release_lock(&self, candidate_id: &CandidateId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.candidate_locks.lock() else {
            return;
        };
        drop(lock);
        if locks
            .get(candidate_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(candidate_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.candidate_locks
            .lock()
            .map(|locks| locks.len())
            .unwrap_or_default()
    }
}

fn lock_poisoned() -> VerificationError {
    VerificationError::Repository(RepositoryError::Unavailable(
        "candidate lock poisoned".to_string(),
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn validate_profile(profile: CandidateProfile) -> Result<CandidateProfile, VerificationError> {
    let name = profile.name.trim().to_string();
    if name.is_empty() {
        return Err(VerificationError::Validation(
            "candidate name is required".to_string(),
        ));
    }

    let email = profile.email.trim().to_string();
    if email.is_empty() {
        return Err(VerificationError::Validation(
            "candidate email is required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(VerificationError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }

    Ok(CandidateProfile {
        name,
        email,
        phone: non_blank(profile.phone),
    })
}

fn validate_check_types(check_types: &[CheckType]) -> Result<(), VerificationError> {
    if check_types.is_empty() {
        return Err(VerificationError::Validation(
            "at least one verification check must be requested".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(check_types.len());
    for check_type in check_types {
        if !seen.insert(*check_type) {
            return Err(VerificationError::Validation(format!(
                "check type '{check_type}' requested more than once"
            )));
        }
    }
    Ok(())
}

fn validate_submission(submission: CheckSubmission) -> Result<CheckSubmission, VerificationError> {
    let details = submission.details.trim().to_string();
    if details.is_empty() {
        return Err(VerificationError::Validation(
            "check details are required".to_string(),
        ));
    }

    let verifier = non_blank(submission.verifier);
    if verifier.is_some() && submission.status == VerificationStatus::Pending {
        return Err(VerificationError::Validation(
            "a verifier can only be assigned once a check leaves Pending".to_string(),
        ));
    }

    Ok(CheckSubmission {
        details,
        verifier,
        ..submission
    })
}

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("candidate '{0}' not found")]
    NotFound(CandidateId),
    #[error("candidate '{candidate_id}' already has a '{check_type}' check")]
    DuplicateCheck {
        candidate_id: CandidateId,
        check_type: CheckType,
    },
    #[error("invalid state: {0}")]
    InvalidState(#[from] AggregationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
