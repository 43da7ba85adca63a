use crate::infra::{badge_style, InMemoryDealRepository, InMemoryNotificationPublisher};
use chrono::NaiveDate;
use clap::Args;
use nil_deals::error::AppError;
use nil_deals::workflows::deals::{
    AppealResolution, ComplianceDecision, DealComplianceService, DealId, DealRepository,
    DealServiceError, DealSubmission, RepositoryError, ScoreOverride,
};
use nil_deals::workflows::roster::{RosterOptions, RosterReport, RosterValidator};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors and warnings printed per roster audit before the output truncates.
const MAX_PRINTED_ISSUES: usize = 10;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the roster intake portion of the demo.
    #[arg(long)]
    pub(crate) skip_roster: bool,
    /// Roster CSV export to audit instead of the built-in sample.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RosterAuditArgs {
    /// Roster CSV export to validate
    pub(crate) csv: PathBuf,
    /// School applied to rows that do not carry one
    #[arg(long)]
    pub(crate) default_school: Option<String>,
    /// Reference date for graduation-year checks (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_roster_audit(args: RosterAuditArgs) -> Result<(), AppError> {
    let RosterAuditArgs {
        csv,
        default_school,
        today,
    } = args;

    let options = RosterOptions {
        default_school,
        today,
    };
    let report = RosterValidator::from_path(csv, &options)?;
    render_roster_report(&report);
    Ok(())
}

type DemoService = DealComplianceService<InMemoryDealRepository, InMemoryNotificationPublisher>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_roster,
        roster_csv,
    } = args;

    println!("NIL deal compliance demo");

    let repository = Arc::new(InMemoryDealRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = Arc::new(DealComplianceService::new(
        repository.clone(),
        notifications.clone(),
    ));

    let deal_id = match walk_review_lifecycle(&service, &repository) {
        Ok(deal_id) => deal_id,
        Err(err) => {
            println!("  Lifecycle step failed: {}", err);
            return Ok(());
        }
    };

    println!("\nPortfolio statistics");
    match service.stats() {
        Ok(stats) => match serde_json::to_string_pretty(&stats.view()) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("  Stats payload unavailable: {}", err),
        },
        Err(err) => println!("  Stats unavailable: {}", err),
    }

    let events = notifications.events();
    if events.is_empty() {
        println!("\nNotifications: none dispatched");
    } else {
        println!("\nNotifications dispatched for {}", deal_id.0);
        for event in events {
            println!("  - template={} deal={}", event.template, event.deal_id.0);
        }
    }

    if skip_roster {
        return Ok(());
    }

    println!("\nRoster intake demo");
    let report = match roster_csv {
        Some(path) => RosterValidator::from_path(path, &RosterOptions::default())?,
        None => RosterValidator::from_reader(
            Cursor::new(SAMPLE_ROSTER_CSV.as_bytes()),
            &RosterOptions {
                default_school: Some("Iowa Valley High".to_string()),
                today: None,
            },
        )?,
    };
    render_roster_report(&report);

    Ok(())
}

/// Drive one deal through the full review story: intake, information
/// request, re-review, rejection, appeal, and reversal.
fn walk_review_lifecycle(
    service: &DemoService,
    repository: &InMemoryDealRepository,
) -> Result<DealId, DealServiceError> {
    let submission = DealSubmission {
        athlete_id: "ath-0042".to_string(),
        athlete_name: "Jordan Ellis".to_string(),
        counterparty: "Hawkeye Motors".to_string(),
        description: "Three sponsored posts featuring the fall truck lineup".to_string(),
        value_cents: 250_000,
    };

    let record = service.submit(submission)?;
    let deal_id = record.deal_id.clone();
    print_step(service, &deal_id, "Athlete opens a deal")?;

    service.submit_for_review(&deal_id)?;
    print_step(service, &deal_id, "Deal enters the officer queue")?;

    service.review(
        &deal_id,
        ComplianceDecision::InfoRequested,
        Some("Provide the signed sponsorship contract".to_string()),
        None,
    )?;
    print_step(service, &deal_id, "Officer requests more information")?;

    let request = repository
        .info_requests_for(&deal_id)?
        .pop()
        .ok_or(RepositoryError::NotFound)?;
    service.respond_to_info(&deal_id, &request.request_id, "Contract attached as PDF")?;
    print_step(service, &deal_id, "Athlete responds")?;

    service.review(
        &deal_id,
        ComplianceDecision::Rejected,
        Some("The contract grants usage rights the state NIL rules prohibit".to_string()),
        Some(ScoreOverride {
            score: 35,
            justification:
                "Category conflict with the school's exclusive apparel sponsor, confirmed with the athletic department"
                    .to_string(),
        }),
    )?;
    print_step(service, &deal_id, "Officer rejects on re-review")?;

    let appeal = service.submit_appeal(
        &deal_id,
        "The flagged clause was removed in a revised contract countersigned by the sponsor and approved by our athletics department",
    )?;
    print_step(service, &deal_id, "Athlete appeals the rejection")?;

    service.resolve_appeal(
        &appeal.appeal_id,
        AppealResolution::Reversed,
        "Revised contract resolves the category conflict",
        Some(ComplianceDecision::Approved),
    )?;
    print_step(service, &deal_id, "Officer reverses on appeal")?;

    Ok(deal_id)
}

fn print_step(
    service: &DemoService,
    deal_id: &DealId,
    label: &str,
) -> Result<(), DealServiceError> {
    let display = service.display_status(deal_id)?;
    let badge = badge_style(display.category);
    println!(
        "- {label}: \"{}\" [{} | {}/{}]",
        display.friendly_label,
        display.category.label(),
        badge.bg_class,
        badge.text_class
    );
    Ok(())
}

fn render_roster_report(report: &RosterReport) {
    let summary = &report.summary;
    println!(
        "Rows: {} total | {} valid | {} invalid | {} with warnings | {} duplicate emails",
        summary.total_rows,
        summary.valid_rows,
        summary.invalid_rows,
        summary.rows_with_warnings,
        summary.duplicate_emails
    );

    if report.errors.is_empty() {
        println!("Errors: none");
    } else {
        println!("Errors (first {MAX_PRINTED_ISSUES}):");
        for error in report.errors.iter().take(MAX_PRINTED_ISSUES) {
            println!("  - row {} [{}] {}", error.row, error.field, error.message);
        }
    }

    if report.warnings.is_empty() {
        println!("Warnings: none");
    } else {
        println!("Warnings (first {MAX_PRINTED_ISSUES}):");
        for warning in report.warnings.iter().take(MAX_PRINTED_ISSUES) {
            println!(
                "  - row {} [{}] {}",
                warning.row, warning.field, warning.message
            );
        }
    }

    if !report.candidates.is_empty() {
        println!("Ready to enroll:");
        for candidate in &report.candidates {
            println!(
                "  - {} {} <{}> ({}, {})",
                candidate.first_name,
                candidate.last_name,
                candidate.email,
                candidate.sport,
                candidate.state
            );
        }
    }
}

const SAMPLE_ROSTER_CSV: &str = "\
Email Address,First,Last Name,Sport,State,Grad Year,Phone,Instagram
jordan.ellis@example.edu,Jordan,Ellis,Basketball,IA,2027,(515) 555-0142,@jellis24
sam.reyes@example.edu,Sam,Reyes,Surfing,TX,2028,,@sreyes
sam.reyes@example.edu,Sam,Reyes,Soccer,TX,2028,,
casey.nguyen@example.edu,Casey,Nguyen,Volleyball,ZZ,2026,,
";
