use serde::Serialize;

/// A problem found on a single row. Errors block the row from import;
/// warnings do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterIssue {
    pub row: usize,
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

/// An athlete row that passed validation, with normalized contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterCandidate {
    pub row: usize,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub sport: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

/// Roll-up counters for the import preview screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub rows_with_warnings: usize,
    pub duplicate_emails: usize,
}

/// Outcome of validating one roster export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RosterReport {
    pub summary: RosterSummary,
    pub errors: Vec<RosterIssue>,
    pub warnings: Vec<RosterIssue>,
    pub candidates: Vec<RosterCandidate>,
}

impl RosterReport {
    /// True when every row could be imported as-is.
    pub fn is_valid(&self) -> bool {
        self.summary.invalid_rows == 0
    }
}
