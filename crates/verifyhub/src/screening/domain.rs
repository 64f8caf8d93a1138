use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregation::StatusRollup;

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a single verification check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckId(pub String);

/// Kinds of verification a candidate can be screened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckType {
    #[serde(rename = "ID Verification")]
    IdVerification,
    #[serde(rename = "Employment History")]
    EmploymentHistory,
    #[serde(rename = "Education Check")]
    EducationCheck,
    #[serde(rename = "Address Verification")]
    AddressVerification,
    #[serde(rename = "Court Records")]
    CourtRecords,
}

impl CheckType {
    pub const ALL: [CheckType; 5] = [
        CheckType::IdVerification,
        CheckType::EmploymentHistory,
        CheckType::EducationCheck,
        CheckType::AddressVerification,
        CheckType::CourtRecords,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            CheckType::IdVerification => "ID Verification",
            CheckType::EmploymentHistory => "Employment History",
            CheckType::EducationCheck => "Education Check",
            CheckType::AddressVerification => "Address Verification",
            CheckType::CourtRecords => "Court Records",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status tracked on each check and rolled up per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Failed,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 4] = [
        VerificationStatus::Pending,
        VerificationStatus::InProgress,
        VerificationStatus::Completed,
        VerificationStatus::Failed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "Pending",
            VerificationStatus::InProgress => "In Progress",
            VerificationStatus::Completed => "Completed",
            VerificationStatus::Failed => "Failed",
        }
    }

    /// Terminal statuses stamp a completion date on the candidate.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            VerificationStatus::Completed | VerificationStatus::Failed
        )
    }

    /// Parses either the display label or a snake/kebab-case spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "pending" => Some(Self::Pending),
            "inprogress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One verification task on one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCheck {
    pub id: CheckId,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub status: VerificationStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
    pub details: String,
}

/// The verification subject together with its rolled-up status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub requested_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    pub overall_status: VerificationStatus,
    pub checks: Vec<VerificationCheck>,
}

impl Candidate {
    pub fn has_check(&self, check_type: CheckType) -> bool {
        self.checks.iter().any(|check| check.check_type == check_type)
    }

    pub fn check_types(&self) -> Vec<CheckType> {
        self.checks.iter().map(|check| check.check_type).collect()
    }

    /// Check types that can still be appended, in declaration order.
    pub fn available_check_types(&self) -> Vec<CheckType> {
        CheckType::ALL
            .into_iter()
            .filter(|check_type| !self.has_check(*check_type))
            .collect()
    }

    /// Writes the derived fields. Nothing else may touch them.
    pub(crate) fn apply_rollup(&mut self, rollup: StatusRollup) {
        self.overall_status = rollup.overall_status;
        self.completed_date = rollup.completed_date;
    }
}

/// Contact details captured when a candidate is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Registration payload accepted by the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub checks: Vec<CheckType>,
}

/// Data for a check appended to an existing candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSubmission {
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub status: VerificationStatus,
    pub details: String,
    #[serde(default)]
    pub verifier: Option<String>,
}
