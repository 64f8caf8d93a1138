//! Candidate screening: verification checks, status roll-up, and the
//! lifecycle service that keeps the two consistent.

pub mod aggregation;
pub mod clock;
pub mod domain;
pub mod fixtures;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregation::{aggregate, AggregationError, StatusRollup};
pub use clock::{Clock, SystemClock};
pub use domain::{
    Candidate, CandidateId, CandidateProfile, CheckId, CheckSubmission, CheckType,
    RegistrationRequest, VerificationCheck, VerificationStatus,
};
pub use fixtures::FixtureBuilder;
pub use report::{DashboardSummary, ReportError, ReportFilter, TurnaroundEntry};
pub use repository::{CandidateRepository, InMemoryCandidateRepository, RepositoryError};
pub use router::candidate_router;
pub use service::{VerificationError, VerificationService};
