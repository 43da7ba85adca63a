//! Bulk athlete roster intake: CSV parsing with header aliasing, per-row
//! validation, and the report a compliance office reviews before enrolling
//! a school's athletes.

mod mapping;
mod normalizer;
mod parser;
mod report;

pub use report::{RosterCandidate, RosterIssue, RosterReport, RosterSummary};

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use parser::RawRosterRow;

/// Hard cap on data rows per file; larger exports are rejected outright.
pub const MAX_ROSTER_ROWS: usize = 2000;

/// Two-letter US state codes, including DC.
const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Sports with first-class platform support. Anything else imports as-is
/// with a warning.
const SUPPORTED_SPORTS: &[&str] = &[
    "Basketball",
    "Football",
    "Soccer",
    "Baseball",
    "Softball",
    "Volleyball",
    "Tennis",
    "Golf",
    "Swimming",
    "Track & Field",
    "Cross Country",
    "Wrestling",
    "Lacrosse",
    "Hockey",
    "Field Hockey",
    "Gymnastics",
    "Cheerleading",
    "Dance",
    "Esports",
    "Other",
];

const GRADUATION_YEAR_HORIZON: i32 = 10;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    TooManyRows { found: usize, max: usize },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::TooManyRows { found, max } => {
                write!(f, "too many rows: maximum allowed is {}, received {}", max, found)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::TooManyRows { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Knobs a caller can set per validation run.
#[derive(Debug, Clone, Default)]
pub struct RosterOptions {
    /// Applied to rows that carry no school of their own, typically the
    /// compliance officer's institution.
    pub default_school: Option<String>,
    /// Reference date for graduation-year checks; defaults to today.
    pub today: Option<NaiveDate>,
}

pub struct RosterValidator;

impl RosterValidator {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: &RosterOptions,
    ) -> Result<RosterReport, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, options)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        options: &RosterOptions,
    ) -> Result<RosterReport, RosterImportError> {
        let rows = parser::parse_rows(reader)?;
        if rows.len() > MAX_ROSTER_ROWS {
            return Err(RosterImportError::TooManyRows {
                found: rows.len(),
                max: MAX_ROSTER_ROWS,
            });
        }

        let today = options
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        Ok(validate_rows(rows, options.default_school.as_deref(), today))
    }
}

fn validate_rows(rows: Vec<RawRosterRow>, default_school: Option<&str>, today: NaiveDate) -> RosterReport {
    let mut report = RosterReport {
        summary: RosterSummary {
            total_rows: rows.len(),
            ..RosterSummary::default()
        },
        ..RosterReport::default()
    };
    let mut seen_emails: HashSet<String> = HashSet::new();

    for (index, row) in rows.into_iter().enumerate() {
        // 1-indexed plus the header row, matching what the spreadsheet shows.
        let row_number = index + 2;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let email = check_email(&row, row_number, &mut seen_emails, &mut errors, &mut report);
        let first_name = require(&row.first_name, row_number, "first_name", "First name is required", &mut errors);
        let last_name = require(&row.last_name, row_number, "last_name", "Last name is required", &mut errors);
        let sport = check_sport(&row, row_number, &mut errors, &mut warnings);
        let state = check_state(&row, row_number, &mut errors);
        let graduation_year = check_graduation_year(&row, row_number, today, &mut errors);
        let date_of_birth = check_date_of_birth(&row, row_number, &mut errors);
        let phone = check_phone(&row, row_number, &mut warnings);

        if !warnings.is_empty() {
            report.summary.rows_with_warnings += 1;
        }

        let row_valid = errors.is_empty();
        report.errors.append(&mut errors);
        report.warnings.append(&mut warnings);

        if !row_valid {
            report.summary.invalid_rows += 1;
            continue;
        }

        report.summary.valid_rows += 1;
        report.candidates.push(RosterCandidate {
            row: row_number,
            email: email.unwrap_or_default(),
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            sport: sport.unwrap_or_default(),
            state: state.unwrap_or_default(),
            school: row
                .school
                .or_else(|| default_school.map(str::to_string)),
            position: row.position,
            graduation_year,
            phone,
            instagram: row.instagram.as_deref().map(normalizer::normalize_handle),
            tiktok: row.tiktok.as_deref().map(normalizer::normalize_handle),
            twitter: row.twitter.as_deref().map(normalizer::normalize_handle),
            date_of_birth,
        });
    }

    report
}

fn issue(row: usize, field: &'static str, value: &str, message: impl Into<String>) -> RosterIssue {
    RosterIssue {
        row,
        field,
        value: value.to_string(),
        message: message.into(),
    }
}

fn require(
    value: &Option<String>,
    row: usize,
    field: &'static str,
    message: &str,
    errors: &mut Vec<RosterIssue>,
) -> Option<String> {
    match value {
        Some(text) => Some(text.clone()),
        None => {
            errors.push(issue(row, field, "", message));
            None
        }
    }
}

fn check_email(
    row: &RawRosterRow,
    row_number: usize,
    seen: &mut HashSet<String>,
    errors: &mut Vec<RosterIssue>,
    report: &mut RosterReport,
) -> Option<String> {
    let Some(email) = row.email.as_deref() else {
        errors.push(issue(row_number, "email", "", "Email is required"));
        return None;
    };

    if !looks_like_email(email) {
        errors.push(issue(row_number, "email", email, "Invalid email format"));
        return None;
    }

    // First occurrence stays valid; later duplicates error.
    if !seen.insert(email.to_ascii_lowercase()) {
        errors.push(issue(row_number, "email", email, "Duplicate email in file"));
        report.summary.duplicate_emails += 1;
        return None;
    }

    Some(email.to_string())
}

/// Mirrors the shape check the import UI applies: one `@`, no whitespace,
/// and a dotted domain.
fn looks_like_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || local.contains(char::is_whitespace) {
        return false;
    }

    let (host, tld) = match domain.rsplit_once('.') {
        Some(split) => split,
        None => return false,
    };

    !host.is_empty()
        && !tld.is_empty()
        && !domain.contains(char::is_whitespace)
}

fn check_sport(
    row: &RawRosterRow,
    row_number: usize,
    errors: &mut Vec<RosterIssue>,
    warnings: &mut Vec<RosterIssue>,
) -> Option<String> {
    let Some(sport) = row.sport.as_deref() else {
        errors.push(issue(row_number, "sport", "", "Sport is required"));
        return None;
    };

    let recognized = SUPPORTED_SPORTS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(sport));
    if !recognized {
        warnings.push(issue(
            row_number,
            "sport",
            sport,
            format!("Sport \"{sport}\" not in standard list. Will be imported as-is."),
        ));
    }

    Some(sport.to_string())
}

fn check_state(
    row: &RawRosterRow,
    row_number: usize,
    errors: &mut Vec<RosterIssue>,
) -> Option<String> {
    let Some(state) = row.state.as_deref() else {
        errors.push(issue(row_number, "state", "", "State is required"));
        return None;
    };

    let upper = state.trim().to_ascii_uppercase();
    if !US_STATE_CODES.contains(&upper.as_str()) {
        errors.push(issue(
            row_number,
            "state",
            state,
            "Invalid state code. Must be a valid US state abbreviation (e.g., CA, NY)",
        ));
        return None;
    }

    Some(upper)
}

fn check_graduation_year(
    row: &RawRosterRow,
    row_number: usize,
    today: NaiveDate,
    errors: &mut Vec<RosterIssue>,
) -> Option<i32> {
    let raw = row.graduation_year.as_deref()?;

    let current_year = today.year();
    let parsed = raw.trim().parse::<i32>().ok();
    match parsed {
        Some(year) if (current_year..=current_year + GRADUATION_YEAR_HORIZON).contains(&year) => {
            Some(year)
        }
        _ => {
            errors.push(issue(
                row_number,
                "graduation_year",
                raw,
                format!(
                    "Invalid graduation year. Must be between {current_year} and {}.",
                    current_year + GRADUATION_YEAR_HORIZON
                ),
            ));
            None
        }
    }
}

fn check_date_of_birth(
    row: &RawRosterRow,
    row_number: usize,
    errors: &mut Vec<RosterIssue>,
) -> Option<String> {
    let raw = row.date_of_birth.as_deref()?;

    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date.to_string()),
        Err(_) => {
            errors.push(issue(
                row_number,
                "date_of_birth",
                raw,
                "Invalid date format. Use YYYY-MM-DD format.",
            ));
            None
        }
    }
}

fn check_phone(
    row: &RawRosterRow,
    row_number: usize,
    warnings: &mut Vec<RosterIssue>,
) -> Option<String> {
    let raw = row.phone.as_deref()?;

    let digits = normalizer::digits_only(raw);
    if digits.len() < 10 || digits.len() > 11 {
        warnings.push(issue(
            row_number,
            "phone",
            raw,
            "Phone number may be invalid. Expected 10-11 digits.",
        ));
    }

    Some(digits)
}
