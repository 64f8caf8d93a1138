use chrono::{Duration, NaiveDate};

use super::common::*;
use crate::screening::domain::VerificationStatus;
use crate::screening::report::{
    csv_string, search, turnaround_by_month, DashboardSummary, ReportFilter,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn dashboard_counts_statuses_and_keeps_five_recent() {
    let mut candidates = Vec::new();
    for (index, status) in [
        VerificationStatus::Pending,
        VerificationStatus::InProgress,
        VerificationStatus::InProgress,
        VerificationStatus::Completed,
        VerificationStatus::Failed,
        VerificationStatus::Completed,
    ]
    .into_iter()
    .enumerate()
    {
        candidates.push(stored_candidate(
            &format!("cand-{index}"),
            at(2024, 1, 1),
            None,
            status,
        ));
    }

    let summary = DashboardSummary::from_candidates(&candidates);
    assert_eq!(summary.total, 6);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.in_progress, 2);
    assert_eq!(summary.completed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.recent.len(), 5);
    assert_eq!(summary.recent[0].id, candidates[0].id);
}

#[test]
fn search_matches_name_or_email_case_insensitively() {
    let mut alice = stored_candidate("cand-a", at(2024, 1, 1), None, VerificationStatus::Pending);
    alice.name = "Alice Johnson".to_string();
    alice.email = "alice.j@example.com".to_string();
    let mut bob = stored_candidate("cand-b", at(2024, 1, 1), None, VerificationStatus::Pending);
    bob.name = "Bob Williams".to_string();
    bob.email = "bw@corp.test".to_string();
    let candidates = vec![alice, bob];

    let by_name = search(&candidates, "JOHNSON");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Alice Johnson");

    let by_email = search(&candidates, "corp.test");
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].name, "Bob Williams");

    assert_eq!(search(&candidates, "  ").len(), 2);
    assert!(search(&candidates, "zed").is_empty());
}

#[test]
fn report_filter_includes_whole_end_day_and_status_set() {
    let early = stored_candidate("cand-early", at(2024, 1, 31), None, VerificationStatus::Pending);
    let mut late_evening = stored_candidate(
        "cand-late",
        at(2024, 2, 29),
        Some(at(2024, 3, 2)),
        VerificationStatus::Completed,
    );
    late_evening.requested_date += Duration::hours(14);
    let failed = stored_candidate(
        "cand-failed",
        at(2024, 2, 10),
        Some(at(2024, 2, 12)),
        VerificationStatus::Failed,
    );
    let candidates = vec![early, late_evening, failed];

    let february = ReportFilter {
        start: Some(date(2024, 2, 1)),
        end: Some(date(2024, 2, 29)),
        statuses: Vec::new(),
    };
    let ids: Vec<String> = february
        .apply(&candidates)
        .into_iter()
        .map(|candidate| candidate.id.0)
        .collect();
    assert_eq!(ids, vec!["cand-late".to_string(), "cand-failed".to_string()]);

    let failed_only = ReportFilter {
        statuses: vec![VerificationStatus::Failed],
        ..ReportFilter::default()
    };
    let filtered = failed_only.apply(&candidates);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id.0, "cand-failed");

    assert_eq!(ReportFilter::default().apply(&candidates).len(), 3);
}

#[test]
fn turnaround_averages_by_request_month() {
    let candidates = vec![
        stored_candidate(
            "cand-1",
            at(2024, 1, 1),
            Some(at(2024, 1, 3)),
            VerificationStatus::Completed,
        ),
        stored_candidate(
            "cand-2",
            at(2024, 1, 10),
            Some(at(2024, 1, 15)),
            VerificationStatus::Failed,
        ),
        stored_candidate(
            "cand-3",
            at(2024, 2, 1),
            Some(at(2024, 2, 8)),
            VerificationStatus::Completed,
        ),
        stored_candidate("cand-4", at(2024, 2, 2), None, VerificationStatus::Pending),
    ];

    let entries = turnaround_by_month(&candidates);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].month, "2024-01");
    assert_eq!(entries[0].average_days, 3.5);
    assert_eq!(entries[0].completed_candidates, 2);
    assert_eq!(entries[1].month, "2024-02");
    assert_eq!(entries[1].average_days, 7.0);
}

#[test]
fn turnaround_keeps_latest_six_months() {
    let candidates: Vec<_> = (1..=8)
        .map(|month| {
            stored_candidate(
                &format!("cand-{month}"),
                at(2023, month, 1),
                Some(at(2023, month, 2)),
                VerificationStatus::Completed,
            )
        })
        .collect();

    let entries = turnaround_by_month(&candidates);
    let months: Vec<&str> = entries.iter().map(|entry| entry.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2023-03", "2023-04", "2023-05", "2023-06", "2023-07", "2023-08"]
    );
}

#[test]
fn csv_export_writes_headers_and_placeholders() {
    let mut open = stored_candidate("cand-open", at(2024, 1, 5), None, VerificationStatus::Pending);
    open.name = "Lee, Ann".to_string();
    let mut done = stored_candidate(
        "cand-done",
        at(2024, 1, 6),
        Some(at(2024, 1, 9)),
        VerificationStatus::Completed,
    );
    done.phone = Some("555-0101".to_string());

    let csv = csv_string(&[open, done]).expect("csv renders");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "ID,Name,Email,Phone,Status,Requested Date,Completed Date"
    );
    assert_eq!(
        lines[1],
        "cand-open,\"Lee, Ann\",cand-open@example.com,,Pending,2024-01-05T09:00:00Z,N/A"
    );
    assert_eq!(
        lines[2],
        "cand-done,Candidate cand-done,cand-done@example.com,555-0101,Completed,2024-01-06T09:00:00Z,2024-01-09T09:00:00Z"
    );
}
