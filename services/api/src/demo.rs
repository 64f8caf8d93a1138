use crate::infra::{parse_date, parse_status};
use chrono::{NaiveDate, Utc};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use verifyhub::error::AppError;
use verifyhub::screening::report::{self, DashboardSummary, ReportFilter};
use verifyhub::screening::{
    Candidate, CandidateId, CandidateProfile, CheckSubmission, CheckType, FixtureBuilder,
    InMemoryCandidateRepository, VerificationError, VerificationService, VerificationStatus,
};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_RANDOM_CANDIDATES: usize = 16;
const SHOWCASE_COMPLETED_ID: &str = "cand-demo-01";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Seed for the generated demo candidates
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,
    /// Number of randomly generated candidates added after the showcase set
    #[arg(long, default_value_t = DEFAULT_RANDOM_CANDIDATES)]
    pub(crate) random_candidates: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Seed for the generated demo candidates
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,
    /// Number of randomly generated candidates added after the showcase set
    #[arg(long, default_value_t = DEFAULT_RANDOM_CANDIDATES)]
    pub(crate) random_candidates: usize,
    /// Earliest request date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Latest request date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Only include candidates with this overall status (repeatable)
    #[arg(long = "status", value_parser = parse_status)]
    pub(crate) statuses: Vec<VerificationStatus>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn seeded_service(
    seed: u64,
    random_candidates: usize,
) -> Result<VerificationService<InMemoryCandidateRepository>, VerificationError> {
    let candidates = FixtureBuilder::new(seed, Utc::now()).build(random_candidates)?;
    let repository = Arc::new(InMemoryCandidateRepository::with_candidates(candidates));
    Ok(VerificationService::new(repository))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        random_candidates,
    } = args;
    let service = seeded_service(seed, random_candidates)?;

    println!("Background verification demo (seed {seed})");
    render_dashboard(&DashboardSummary::from_candidates(
        &service.list_candidates()?,
    ));

    println!("\nRegistering a new candidate");
    let registered = service.register_candidate(
        CandidateProfile {
            name: "Ann Example".to_string(),
            email: "ann@example.com".to_string(),
            phone: None,
        },
        &[CheckType::IdVerification, CheckType::EducationCheck],
    )?;
    render_candidate(&registered);

    println!("\nEmployment history comes back verified; the pending checks still hold the roll-up");
    let updated = service.append_check(
        &registered.id,
        CheckSubmission {
            check_type: CheckType::EmploymentHistory,
            status: VerificationStatus::Completed,
            details: "Previous employer confirmed dates.".to_string(),
            verifier: Some("John Doe".to_string()),
        },
    )?;
    render_candidate(&updated);

    println!("\nAttempting to add a second education check");
    match service.append_check(
        &registered.id,
        CheckSubmission {
            check_type: CheckType::EducationCheck,
            status: VerificationStatus::Completed,
            details: "Duplicate submission.".to_string(),
            verifier: Some("Jane Smith".to_string()),
        },
    ) {
        Err(err @ VerificationError::DuplicateCheck { .. }) => println!("- rejected: {err}"),
        Err(other) => return Err(other.into()),
        Ok(_) => println!("- unexpectedly accepted"),
    }

    let showcase = CandidateId(SHOWCASE_COMPLETED_ID.to_string());
    let before = service.get_candidate(&showcase)?;
    println!(
        "\n{} was {}; a court record search now fails",
        before.name, before.overall_status
    );
    let failed = service.append_check(
        &showcase,
        CheckSubmission {
            check_type: CheckType::CourtRecords,
            status: VerificationStatus::Failed,
            details: "Record found in district court database.".to_string(),
            verifier: Some("Alex Ray".to_string()),
        },
    )?;
    render_candidate(&failed);

    let candidates = service.list_candidates()?;
    println!("\nAfter the walkthrough");
    render_dashboard(&DashboardSummary::from_candidates(&candidates));

    let turnaround = report::turnaround_by_month(&candidates);
    if !turnaround.is_empty() {
        println!("\nAverage turnaround by request month");
        for entry in turnaround {
            println!(
                "- {}: {:.1} days across {} candidate(s)",
                entry.month, entry.average_days, entry.completed_candidates
            );
        }
    }

    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        seed,
        random_candidates,
        start,
        end,
        statuses,
        output,
    } = args;

    let service = seeded_service(seed, random_candidates)?;
    let filter = ReportFilter {
        start,
        end,
        statuses,
    };
    let candidates = filter.apply(&service.list_candidates()?);

    match output {
        Some(path) => {
            let file = File::create(&path)?;
            report::write_csv(BufWriter::new(file), &candidates)?;
            println!(
                "Wrote {} candidate(s) to {}",
                candidates.len(),
                path.display()
            );
        }
        None => report::write_csv(io::stdout().lock(), &candidates)?,
    }

    Ok(())
}

fn render_dashboard(summary: &DashboardSummary) {
    println!(
        "- {} candidates | {} pending | {} in progress | {} completed | {} failed",
        summary.total, summary.pending, summary.in_progress, summary.completed, summary.failed
    );
    println!("Most recent:");
    for candidate in &summary.recent {
        println!(
            "  - {} <{}>: {}",
            candidate.name, candidate.email, candidate.overall_status
        );
    }
}

fn render_candidate(candidate: &Candidate) {
    let completed = candidate
        .completed_date
        .map(|date| date.to_rfc3339())
        .unwrap_or_else(|| "open".to_string());
    println!(
        "- {} [{}] overall {} (completed: {})",
        candidate.name, candidate.id, candidate.overall_status, completed
    );
    for check in &candidate.checks {
        let verifier = check.verifier.as_deref().unwrap_or("unassigned");
        println!(
            "  - {}: {} ({}; {})",
            check.check_type, check.status, check.details, verifier
        );
    }
}
