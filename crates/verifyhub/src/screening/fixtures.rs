//! Demo fixture builder.
//!
//! Produces sample candidates for local runs and demos. Nothing in the
//! lifecycle service depends on this module; statuses here are random, but
//! every generated candidate still carries the roll-up `aggregate` would
//! compute for its checks.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::aggregation::{aggregate, AggregationError};
use super::domain::{
    Candidate, CandidateId, CheckId, CheckType, VerificationCheck, VerificationStatus,
};

const VERIFIERS: [&str; 3] = ["John Doe", "Jane Smith", "Alex Ray"];
const RANDOM_CHECK_TYPES: [CheckType; 3] = [
    CheckType::IdVerification,
    CheckType::EmploymentHistory,
    CheckType::EducationCheck,
];
const TURNAROUND_DAYS: i64 = 7;

/// Seeded generator for demo candidates.
pub struct FixtureBuilder {
    rng: StdRng,
    anchor: DateTime<Utc>,
}

impl FixtureBuilder {
    /// `anchor` is the latest instant any generated timestamp may fall on.
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            anchor,
        }
    }

    /// The four hand-written showcase candidates followed by `random_count` generated ones.
    pub fn build(&mut self, random_count: usize) -> Result<Vec<Candidate>, AggregationError> {
        let mut candidates = showcase_candidates()?;
        let offset = candidates.len();
        for index in 0..random_count {
            candidates.push(self.random_candidate(offset + index + 1)?);
        }
        Ok(candidates)
    }

    fn random_candidate(&mut self, ordinal: usize) -> Result<Candidate, AggregationError> {
        let window_start = utc(2023, 9, 1, 0, 0);
        let requested_date = self.random_instant(window_start, self.anchor);

        let checks: Vec<VerificationCheck> = RANDOM_CHECK_TYPES
            .iter()
            .enumerate()
            .map(|(position, check_type)| {
                self.random_check(ordinal, position, *check_type, requested_date)
            })
            .collect();

        let completed_at = (requested_date + Duration::days(TURNAROUND_DAYS)).min(self.anchor);
        let mut candidate = Candidate {
            id: CandidateId(format!("cand-demo-{ordinal:02}")),
            name: format!("User {ordinal}"),
            email: format!("user.{ordinal}@example.com"),
            phone: Some(format!("555-01{ordinal:02}")),
            requested_date,
            completed_date: None,
            overall_status: VerificationStatus::Pending,
            checks,
        };
        candidate.apply_rollup(aggregate(&candidate.checks, completed_at)?);
        Ok(candidate)
    }

    fn random_check(
        &mut self,
        ordinal: usize,
        position: usize,
        check_type: CheckType,
        requested_date: DateTime<Utc>,
    ) -> VerificationCheck {
        let status = *VerificationStatus::ALL
            .choose(&mut self.rng)
            .unwrap_or(&VerificationStatus::Pending);
        let verifier = if status == VerificationStatus::Pending {
            None
        } else {
            VERIFIERS
                .choose(&mut self.rng)
                .map(|name| (*name).to_string())
        };
        let details = match status {
            VerificationStatus::Completed => "Verified successfully.",
            VerificationStatus::Failed => "Discrepancy found.",
            VerificationStatus::Pending | VerificationStatus::InProgress => "Awaiting documents.",
        };

        VerificationCheck {
            id: CheckId(format!("chk-demo-{ordinal:02}{}", check_suffix(position))),
            check_type,
            status,
            updated_at: self.random_instant(requested_date, self.anchor),
            verifier,
            details: details.to_string(),
        }
    }

    fn random_instant(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + Duration::seconds(self.rng.gen_range(0..span))
    }
}

fn check_suffix(position: usize) -> char {
    char::from(b'a' + (position % 26) as u8)
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn check(
    id: &str,
    check_type: CheckType,
    status: VerificationStatus,
    updated_at: DateTime<Utc>,
    verifier: Option<&str>,
    details: &str,
) -> VerificationCheck {
    VerificationCheck {
        id: CheckId(id.to_string()),
        check_type,
        status,
        updated_at,
        verifier: verifier.map(str::to_string),
        details: details.to_string(),
    }
}

/// Candidate whose roll-up is computed as of its latest check update.
pub(super) fn settled(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    requested_date: DateTime<Utc>,
    checks: Vec<VerificationCheck>,
) -> Result<Candidate, AggregationError> {
    let settled_at = checks
        .iter()
        .map(|check| check.updated_at)
        .max()
        .unwrap_or(requested_date);
    let mut candidate = Candidate {
        id: CandidateId(id.to_string()),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some(phone.to_string()),
        requested_date,
        completed_date: None,
        overall_status: VerificationStatus::Pending,
        checks,
    };
    candidate.apply_rollup(aggregate(&candidate.checks, settled_at)?);
    Ok(candidate)
}

fn showcase_candidates() -> Result<Vec<Candidate>, AggregationError> {
    use CheckType::*;
    use VerificationStatus::*;

    Ok(vec![
        settled(
            "cand-demo-01",
            "Alice Johnson",
            "alice.j@example.com",
            "555-0101",
            utc(2023, 10, 28, 10, 0),
            vec![
                check(
                    "chk-demo-01a",
                    IdVerification,
                    Completed,
                    utc(2023, 10, 29, 11, 0),
                    Some("Jane Smith"),
                    "Government ID verified.",
                ),
                check(
                    "chk-demo-01b",
                    EmploymentHistory,
                    Completed,
                    utc(2023, 11, 2, 16, 20),
                    Some("John Doe"),
                    "Previous employment at TechCorp confirmed.",
                ),
                check(
                    "chk-demo-01c",
                    EducationCheck,
                    Completed,
                    utc(2023, 11, 5, 14, 30),
                    Some("Jane Smith"),
                    "Degree from University of Example verified.",
                ),
            ],
        )?,
        settled(
            "cand-demo-02",
            "Bob Williams",
            "bob.w@example.com",
            "555-0102",
            utc(2023, 11, 10, 9, 0),
            vec![
                check(
                    "chk-demo-02a",
                    IdVerification,
                    Completed,
                    utc(2023, 11, 11, 12, 0),
                    Some("Jane Smith"),
                    "Tax ID verified.",
                ),
                check(
                    "chk-demo-02b",
                    EmploymentHistory,
                    InProgress,
                    utc(2023, 11, 12, 10, 5),
                    Some("John Doe"),
                    "Contacting previous employer.",
                ),
                check(
                    "chk-demo-02c",
                    AddressVerification,
                    Pending,
                    utc(2023, 11, 10, 9, 0),
                    None,
                    "Awaiting utility bill submission.",
                ),
            ],
        )?,
        settled(
            "cand-demo-03",
            "Charlie Brown",
            "charlie.b@example.com",
            "555-0103",
            utc(2023, 11, 15, 11, 30),
            vec![check(
                "chk-demo-03a",
                IdVerification,
                Pending,
                utc(2023, 11, 15, 11, 30),
                None,
                "Awaiting document upload.",
            )],
        )?,
        settled(
            "cand-demo-04",
            "Diana Prince",
            "diana.p@example.com",
            "555-0104",
            utc(2023, 10, 20, 14, 0),
            vec![
                check(
                    "chk-demo-04a",
                    IdVerification,
                    Completed,
                    utc(2023, 10, 21, 10, 0),
                    Some("Jane Smith"),
                    "Passport verified.",
                ),
                check(
                    "chk-demo-04b",
                    CourtRecords,
                    Failed,
                    utc(2023, 10, 25, 18, 0),
                    Some("Alex Ray"),
                    "Record found in district court database.",
                ),
            ],
        )?,
    ])
}
