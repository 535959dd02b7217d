// src/models.rs
// Wire shapes for the REST API

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Number of two-hour slots in a day
pub const SLOT_COUNT: usize = 12;

// ═══════════════════════════════════════
// AUTH
// ═══════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Registration form as filled in by the user
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub address_ln1: String,
    pub email: String,
    pub pincode: String,
    pub state: String,
    pub district: String,
}

/// Registration body sent to the server. No password confirmation,
/// numeric pincode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub password: String,
    pub address_ln1: String,
    pub email: String,
    pub pincode: u32,
    pub state: String,
    pub district: String,
}

impl RegisterForm {
    /// Check the form locally and build the request body
    pub fn into_request(self) -> Result<RegisterRequest> {
        if self.password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match".into()));
        }

        let pincode = self
            .pincode
            .trim()
            .parse::<u32>()
            .map_err(|_| ClientError::Validation("Pincode must be a number".into()))?;

        Ok(RegisterRequest {
            firstname: self.firstname,
            lastname: self.lastname,
            phone: self.phone,
            password: self.password,
            address_ln1: self.address_ln1,
            email: self.email,
            pincode,
            state: self.state,
            district: self.district,
        })
    }
}

/// Error body the API sends alongside non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: Option<String>,
}

// ═══════════════════════════════════════
// TIMESHEET
// ═══════════════════════════════════════

/// Timesheet entry as returned by the server.
///
/// Kept loose on purpose: the server owns this shape, so absent fields
/// default and `reports` may hold any number of slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimesheetEntry {
    pub date: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub achieved: bool,
    #[serde(default)]
    pub reports: Vec<String>,
}

impl TimesheetEntry {
    /// Reports paired with their slot labels; extra reports get `None`
    pub fn labelled_reports(&self) -> impl Iterator<Item = (Option<String>, &str)> {
        self.reports
            .iter()
            .enumerate()
            .map(|(i, report)| (slot_label(i), report.as_str()))
    }
}

/// Entry being created: one day, twelve two-hour slots
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTimesheetEntry {
    pub date: NaiveDate,
    pub goal: String,
    pub target: String,
    pub achieved: bool,
    pub reports: [String; SLOT_COUNT],
}

impl NewTimesheetEntry {
    pub fn new(date: NaiveDate, goal: impl Into<String>) -> Self {
        Self {
            date,
            goal: goal.into(),
            target: String::new(),
            achieved: false,
            reports: Default::default(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_achieved(mut self, achieved: bool) -> Self {
        self.achieved = achieved;
        self
    }

    /// Fill slot `index` (0-based)
    pub fn set_slot(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let slot = self.reports.get_mut(index).ok_or_else(|| {
            ClientError::Validation(format!(
                "Slot {} out of range (expected 1-{})",
                index + 1,
                SLOT_COUNT
            ))
        })?;
        *slot = text.into();
        Ok(())
    }

    pub fn slot(&self, index: usize) -> Option<&str> {
        self.reports.get(index).map(String::as_str)
    }
}

/// Label for slot `index`, e.g. `"08:00-10:00"`
pub fn slot_label(index: usize) -> Option<String> {
    (index < SLOT_COUNT).then(|| format!("{:02}:00-{:02}:00", index * 2, index * 2 + 2))
}

/// Inclusive day range used to filter the timesheet list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ClientError::Validation(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Start of the first day, UTC
    pub fn start_timestamp(&self) -> String {
        to_timestamp(self.start.and_time(NaiveTime::MIN).and_utc())
    }

    /// Last millisecond of the final day, UTC
    pub fn end_timestamp(&self) -> String {
        let end_of_day =
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        to_timestamp(self.end.and_time(end_of_day).and_utc())
    }

    /// Query parameters understood by `GET timesheet`
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("startDate", self.start_timestamp()),
            ("endDate", self.end_timestamp()),
        ]
    }
}

fn to_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn form() -> RegisterForm {
        RegisterForm {
            firstname: "Asha".into(),
            lastname: "Rao".into(),
            phone: "9876543210".into(),
            password: "hunter2".into(),
            confirm_password: "hunter2".into(),
            address_ln1: "12 MG Road".into(),
            email: "asha@example.com".into(),
            pincode: "560001".into(),
            state: "Karnataka".into(),
            district: "Bengaluru".into(),
        }
    }

    #[test]
    fn test_register_request_shape() {
        let body = serde_json::to_value(form().into_request().unwrap()).unwrap();
        assert_eq!(body["pincode"], json!(560001));
        assert_eq!(body["addressLn1"], json!("12 MG Road"));
        assert!(body.get("confirmPassword").is_none());
        assert!(body.get("confirm_password").is_none());
    }

    #[test]
    fn test_register_password_mismatch() {
        let mut form = form();
        form.confirm_password = "hunter3".into();
        let err = form.into_request().unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_register_bad_pincode() {
        let mut form = form();
        form.pincode = "56O001".into();
        assert!(matches!(
            form.into_request(),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_register_empty_pincode() {
        let mut form = form();
        form.pincode = "  ".into();
        let err = form.into_request().unwrap_err();
        assert_eq!(err.display_message("Registration failed"), "Pincode must be a number");
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(0).as_deref(), Some("00:00-02:00"));
        assert_eq!(slot_label(4).as_deref(), Some("08:00-10:00"));
        assert_eq!(slot_label(11).as_deref(), Some("22:00-24:00"));
        assert!(slot_label(12).is_none());
    }

    #[test]
    fn test_new_entry_serialization() {
        let mut entry = NewTimesheetEntry::new(date("2025-06-10"), "Ship the release")
            .with_target("Close 3 tickets")
            .with_achieved(true);
        entry.set_slot(4, "Standup and triage").unwrap();

        let body = serde_json::to_value(&entry).unwrap();
        assert_eq!(body["date"], json!("2025-06-10"));
        assert_eq!(body["achieved"], json!(true));
        assert_eq!(body["reports"].as_array().unwrap().len(), SLOT_COUNT);
        assert_eq!(body["reports"][4], json!("Standup and triage"));
        assert_eq!(body["reports"][0], json!(""));
    }

    #[test]
    fn test_set_slot_out_of_range() {
        let mut entry = NewTimesheetEntry::new(date("2025-06-10"), "goal");
        assert!(entry.set_slot(SLOT_COUNT, "late night").is_err());
        assert_eq!(entry.slot(0), Some(""));
    }

    #[test]
    fn test_entry_tolerates_missing_fields() {
        let entry: TimesheetEntry =
            serde_json::from_value(json!({"date": "2025-06-10", "goal": "Focus", "reports": ["a", "b"]}))
                .unwrap();
        assert_eq!(entry.target, "");
        assert!(!entry.achieved);

        let labelled: Vec<_> = entry.labelled_reports().collect();
        assert_eq!(labelled[1], (Some("02:00-04:00".to_string()), "b"));
    }

    #[test]
    fn test_date_range_query() {
        let range = DateRange::new(date("2025-06-01"), date("2025-06-07")).unwrap();
        let [(start_key, start), (end_key, end)] = range.query();
        assert_eq!(start_key, "startDate");
        assert_eq!(start, "2025-06-01T00:00:00.000Z");
        assert_eq!(end_key, "endDate");
        assert_eq!(end, "2025-06-07T23:59:59.999Z");
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        assert!(DateRange::new(date("2025-06-07"), date("2025-06-01")).is_err());
        assert!(DateRange::new(date("2025-06-07"), date("2025-06-07")).is_ok());
    }
}
