use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::screening::clock::Clock;
use crate::screening::domain::{
    Candidate, CandidateId, CandidateProfile, CheckId, CheckSubmission, CheckType,
    VerificationCheck, VerificationStatus,
};
use crate::screening::repository::{
    CandidateRepository, InMemoryCandidateRepository, RepositoryError,
};
use crate::screening::{candidate_router, VerificationService};

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Clock pinned to a settable instant so tests can assert stamped dates.
#[derive(Clone)]
pub(super) struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub(super) fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub(super) fn advance(&self, by: Duration) -> DateTime<Utc> {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
        *guard
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) type TestService = VerificationService<InMemoryCandidateRepository, FixedClock>;

pub(super) fn build_service() -> (TestService, Arc<InMemoryCandidateRepository>, FixedClock) {
    let repository = Arc::new(InMemoryCandidateRepository::default());
    let clock = FixedClock::new(at(2024, 3, 1));
    let service = VerificationService::with_clock(repository.clone(), clock.clone());
    (service, repository, clock)
}

pub(super) fn profile(name: &str, email: &str) -> CandidateProfile {
    CandidateProfile {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

pub(super) fn submission(
    check_type: CheckType,
    status: VerificationStatus,
    details: &str,
) -> CheckSubmission {
    let verifier = match status {
        VerificationStatus::Pending => None,
        _ => Some("Jane Smith".to_string()),
    };
    CheckSubmission {
        check_type,
        status,
        details: details.to_string(),
        verifier,
    }
}

pub(super) fn check(check_type: CheckType, status: VerificationStatus) -> VerificationCheck {
    VerificationCheck {
        id: CheckId(format!("chk-{}", check_type.label())),
        check_type,
        status,
        updated_at: at(2024, 1, 15),
        verifier: None,
        details: "fixture".to_string(),
    }
}

pub(super) fn checks(statuses: &[VerificationStatus]) -> Vec<VerificationCheck> {
    statuses
        .iter()
        .zip(CheckType::ALL)
        .map(|(status, check_type)| check(check_type, *status))
        .collect()
}

/// Seeds the store with a candidate whose single check already completed.
pub(super) fn seed_completed_candidate(
    repository: &InMemoryCandidateRepository,
    id: &str,
) -> Candidate {
    let completed = stored_candidate(
        id,
        at(2024, 1, 10),
        Some(at(2024, 1, 20)),
        VerificationStatus::Completed,
    );
    repository
        .insert(completed.clone())
        .expect("seed completed candidate");
    completed
}

pub(super) fn stored_candidate(
    id: &str,
    requested: DateTime<Utc>,
    completed: Option<DateTime<Utc>>,
    status: VerificationStatus,
) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: format!("Candidate {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        requested_date: requested,
        completed_date: completed,
        overall_status: status,
        checks: vec![check(CheckType::IdVerification, status)],
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _candidate: Candidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _candidate: Candidate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    candidate_router(Arc::new(service))
}
