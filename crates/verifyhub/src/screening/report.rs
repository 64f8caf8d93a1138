//! Read-only views over stored candidates: dashboard counts, search, report
//! filtering, turnaround statistics, and CSV export.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::domain::{Candidate, VerificationStatus};

const RECENT_LIMIT: usize = 5;
const TURNAROUND_MONTHS: usize = 6;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Headline counts shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
    pub recent: Vec<Candidate>,
}

impl DashboardSummary {
    /// Expects `candidates` in store order (newest first).
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let count = |status: VerificationStatus| {
            candidates
                .iter()
                .filter(|candidate| candidate.overall_status == status)
                .count()
        };

        Self {
            total: candidates.len(),
            pending: count(VerificationStatus::Pending),
            in_progress: count(VerificationStatus::InProgress),
            completed: count(VerificationStatus::Completed),
            failed: count(VerificationStatus::Failed),
            recent: candidates.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

/// Case-insensitive match on name or email. A blank term matches everything.
pub fn search(candidates: &[Candidate], term: &str) -> Vec<Candidate> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return candidates.to_vec();
    }

    candidates
        .iter()
        .filter(|candidate| {
            candidate.name.to_lowercase().contains(&needle)
                || candidate.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Filters applied before exporting a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub statuses: Vec<VerificationStatus>,
}

impl ReportFilter {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        let requested = candidate.requested_date;

        if let Some(start) = self.start {
            if requested < start.and_time(NaiveTime::MIN).and_utc() {
                return false;
            }
        }

        if let Some(end) = self.end {
            let next_day = end
                .succ_opt()
                .map(|day| day.and_time(NaiveTime::MIN).and_utc());
            if let Some(bound) = next_day {
                if requested >= bound {
                    return false;
                }
            }
        }

        self.statuses.is_empty() || self.statuses.contains(&candidate.overall_status)
    }

    pub fn apply(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        candidates
            .iter()
            .filter(|candidate| self.matches(candidate))
            .cloned()
            .collect()
    }
}

/// Average days from request to completion for candidates requested in `month`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnaroundEntry {
    /// `YYYY-MM` of the request date.
    pub month: String,
    pub average_days: f64,
    pub completed_candidates: usize,
}

/// Groups terminal candidates by request month; returns the latest six months, oldest first.
pub fn turnaround_by_month(candidates: &[Candidate]) -> Vec<TurnaroundEntry> {
    let mut buckets: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();

    for candidate in candidates {
        let Some(completed) = candidate.completed_date else {
            continue;
        };
        let elapsed = completed - candidate.requested_date;
        let days = elapsed.num_seconds() as f64 / SECONDS_PER_DAY;
        let key = (
            candidate.requested_date.year(),
            candidate.requested_date.month(),
        );
        let bucket = buckets.entry(key).or_insert((0.0, 0));
        bucket.0 += days;
        bucket.1 += 1;
    }

    let skip = buckets.len().saturating_sub(TURNAROUND_MONTHS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, month), (total_days, count))| TurnaroundEntry {
            month: format!("{year:04}-{month:02}"),
            average_days: round_tenths(total_days / count as f64),
            completed_candidates: count,
        })
        .collect()
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

const CSV_HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Status",
    "Requested Date",
    "Completed Date",
];

/// Writes one row per candidate, preceded by the header row.
pub fn write_csv<W: Write>(writer: W, candidates: &[Candidate]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for candidate in candidates {
        let requested = format_timestamp(candidate.requested_date);
        let completed = candidate
            .completed_date
            .map(format_timestamp)
            .unwrap_or_else(|| "N/A".to_string());
        csv_writer.write_record([
            candidate.id.0.as_str(),
            candidate.name.as_str(),
            candidate.email.as_str(),
            candidate.phone.as_deref().unwrap_or(""),
            candidate.overall_status.label(),
            requested.as_str(),
            completed.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders the export into an in-memory string.
pub fn csv_string(candidates: &[Candidate]) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, candidates)?;
    String::from_utf8(buffer).map_err(|_| ReportError::Encoding)
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV report: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV report was not valid UTF-8")]
    Encoding,
}
