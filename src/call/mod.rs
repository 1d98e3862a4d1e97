//! Call type definitions
//!
//! Provides the call request/response types, the scheduled-call entity, and
//! phone number normalization.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod schedule;

pub use builder::CallRequestBuilder;
pub use schedule::CallSchedule;

/// Status of a scheduled call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Waiting for its scheduled time
    Pending,
    /// Placement attempted and accepted by the voice API
    Executed,
    /// Placement attempted and failed
    Failed,
}

impl Default for CallStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl CallStatus {
    /// Terminal statuses are never re-attempted
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Executed | CallStatus::Failed)
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::Pending => write!(f, "pending"),
            CallStatus::Executed => write!(f, "executed"),
            CallStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Payload needed to place one outbound call
///
/// Immutable once stored; every entry point runs [`CallRequest::normalize`]
/// before the request reaches the store or the voice API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    /// Recipient display name
    pub customer_name: String,
    /// Recipient number in E.164 format
    pub phone_number: String,
    /// Assistant (voice profile) identifier
    pub assistant_id: String,
    /// Outbound line identifier
    pub phone_number_id: String,
    /// Free-form metadata passed through to the voice API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CallRequest {
    /// Create a new call request builder
    #[must_use]
    pub fn builder() -> CallRequestBuilder {
        CallRequestBuilder::new()
    }

    /// Validate the request and normalize the phone number to E.164
    ///
    /// String fields are trimmed and must be non-empty. Phone numbers accept
    /// common formatting separators; a bare 10-digit number is assumed to be
    /// a US number.
    pub fn normalize(mut self) -> Result<Self> {
        self.customer_name = self.customer_name.trim().to_string();
        self.assistant_id = self.assistant_id.trim().to_string();
        self.phone_number_id = self.phone_number_id.trim().to_string();

        if self.customer_name.is_empty() {
            return Err(Error::Validation("customer_name cannot be empty".into()));
        }
        if self.assistant_id.is_empty() {
            return Err(Error::Validation("assistant_id cannot be empty".into()));
        }
        if self.phone_number_id.is_empty() {
            return Err(Error::Validation("phone_number_id cannot be empty".into()));
        }

        self.phone_number = normalize_phone_number(&self.phone_number)?;
        Ok(self)
    }
}

/// Normalize a phone number to E.164
///
/// Formatting separators (spaces, dashes, dots, parentheses) are stripped
/// before the shape rules run:
/// - `+` followed by 8-15 digits is accepted as-is
/// - a bare 10-digit number is assumed US and prefixed `+1`
/// - an 11-digit number starting with `1` is prefixed `+`
/// - anything else is rejected
pub fn normalize_phone_number(input: &str) -> Result<String> {
    let stripped: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if let Some(rest) = stripped.strip_prefix('+') {
        if rest.len() >= 8 && rest.len() <= 15 && rest.chars().all(|c| c.is_ascii_digit()) {
            return Ok(stripped);
        }
        return Err(Error::Validation(format!(
            "invalid E.164 phone number: {input}"
        )));
    }

    if !stripped.chars().all(|c| c.is_ascii_digit()) || stripped.is_empty() {
        return Err(Error::Validation(format!("invalid phone number: {input}")));
    }

    match stripped.len() {
        10 => Ok(format!("+1{stripped}")),
        11 if stripped.starts_with('1') => Ok(format!("+{stripped}")),
        _ => Err(Error::Validation(format!(
            "phone number must be E.164 or a US 10/11-digit number: {input}"
        ))),
    }
}

/// Response for an immediate or scheduled call
///
/// Immediate placements carry the voice API's call id and status; scheduled
/// calls reuse the same shape with `status = "scheduled"` so callers can
/// treat both paths uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResponse {
    /// Call identifier (voice API call id, or the scheduled-call id)
    pub id: String,
    /// Status string reported by the voice API, or `"scheduled"`
    pub status: String,
    /// Resolved execution time for scheduled calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// A call waiting in (or retained by) the scheduler's in-memory store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledCall {
    /// Unique id, generated at schedule time
    pub id: String,
    /// Absolute instant at which the call becomes due; immutable
    pub scheduled_time: DateTime<Utc>,
    /// The placement payload; immutable
    pub request: CallRequest,
    /// Current status
    pub status: CallStatus,
    /// Insertion time
    pub created_at: DateTime<Utc>,
    /// Failure detail recorded when placement fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ScheduledCall {
    /// A call is due once its scheduled time is at or before `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == CallStatus::Pending && self.scheduled_time <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(number: &str) -> CallRequest {
        CallRequest {
            customer_name: "Jordan Reyes".to_string(),
            phone_number: number.to_string(),
            assistant_id: "asst_01".to_string(),
            phone_number_id: "line_01".to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_normalize_bare_ten_digits() {
        assert_eq!(
            normalize_phone_number("4155550000").unwrap(),
            "+14155550000"
        );
    }

    #[test]
    fn test_normalize_eleven_digits_leading_one() {
        assert_eq!(
            normalize_phone_number("14155550000").unwrap(),
            "+14155550000"
        );
    }

    #[test]
    fn test_normalize_formatted_input() {
        assert_eq!(
            normalize_phone_number("(415) 555-0000").unwrap(),
            "+14155550000"
        );
        assert_eq!(
            normalize_phone_number("415.555.0000").unwrap(),
            "+14155550000"
        );
    }

    #[test]
    fn test_normalize_e164_passthrough() {
        assert_eq!(
            normalize_phone_number("+442071838750").unwrap(),
            "+442071838750"
        );
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        assert!(normalize_phone_number("555-0000").is_err());
        assert!(normalize_phone_number("25551234567").is_err());
        assert!(normalize_phone_number("not a number").is_err());
        assert!(normalize_phone_number("+1call").is_err());
        assert!(normalize_phone_number("").is_err());
    }

    #[test]
    fn test_request_normalize() {
        let normalized = request(" 4155550000 ").normalize().unwrap();
        assert_eq!(normalized.phone_number, "+14155550000");
        assert_eq!(normalized.customer_name, "Jordan Reyes");
    }

    #[test]
    fn test_request_normalize_empty_field() {
        let mut req = request("4155550000");
        req.assistant_id = "   ".to_string();
        assert!(req.normalize().unwrap_err().is_validation());
    }

    #[test]
    fn test_status_display_and_terminal() {
        assert_eq!(CallStatus::Pending.to_string(), "pending");
        assert_eq!(CallStatus::Executed.to_string(), "executed");
        assert_eq!(CallStatus::Failed.to_string(), "failed");
        assert!(!CallStatus::Pending.is_terminal());
        assert!(CallStatus::Executed.is_terminal());
        assert!(CallStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&CallStatus::Executed).unwrap(),
            "\"executed\""
        );
    }
}
