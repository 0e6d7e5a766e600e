//! The waitlist API contract.
//! Request and response bodies, route paths and the email validation rule live here so that the
//! server handlers and the `client` module validate against exactly the same definition.

use chrono::{DateTime, Utc};
use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

pub const API_WAITLIST_PATH: &str = "/api/waitlist";
pub const API_WAITLIST_COUNT_PATH: &str = "/api/waitlist/count";

pub const EMAIL_FIELD: &str = "email";
pub const INVALID_EMAIL_MSG: &str = "Please enter a valid email address";
pub const REQUIRED_MSG: &str = "Required";

const EMAIL_MAX_GRAPHEMES: usize = 256;

// ###################################
// ->   STRUCTS
// ###################################
/// Request body of `POST /api/waitlist`.
/// Can be (de)serialized but the email has not been validated yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWaitlistEntry {
    pub email: String,
}

impl NewWaitlistEntry {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn validate(self) -> Result<ValidNewEntry, ValidationError> {
        self.try_into()
    }
}

/// Accepts any JSON value, the way the server receives it, and reports
/// which part of the contract it breaks.
impl TryFrom<&Value> for NewWaitlistEntry {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ValidationError::new(None, "Expected object"));
        };

        match map.get(EMAIL_FIELD) {
            None | Some(Value::Null) => Err(ValidationError::email(REQUIRED_MSG)),
            Some(Value::String(email)) => Ok(NewWaitlistEntry::new(email.as_str())),
            Some(other) => Err(ValidationError::email(format!(
                "Expected string, received {}",
                json_type_name(other)
            ))),
        }
    }
}

/// Validated request to join the waitlist.
#[derive(Debug, Clone)]
pub struct ValidNewEntry {
    pub email: ValidEmail,
}

impl TryFrom<NewWaitlistEntry> for ValidNewEntry {
    type Error = ValidationError;

    fn try_from(entry: NewWaitlistEntry) -> Result<Self, Self::Error> {
        Ok(ValidNewEntry {
            email: ValidEmail::parse(entry.email)?,
        })
    }
}

/// Validated email address.
/// Stored exactly as received, uniqueness is decided on the `lowercase` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, ValidationError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.graphemes(true).count() > EMAIL_MAX_GRAPHEMES {
            return Err(ValidationError::email(INVALID_EMAIL_MSG));
        }

        if value.validate_email() && Self::is_strict(value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(ValidationError::email(INVALID_EMAIL_MSG))
        }
    }

    /// Narrower than the HTML5 rule: a restricted local-part alphabet without leading or
    /// doubled dots, and a dotted domain ending in an alphabetic TLD.
    fn is_strict(value: &str) -> bool {
        let Some((local, domain)) = value.rsplit_once('@') else {
            return false;
        };

        !local.starts_with('.')
            && !local.contains("..")
            && regex_is_match!(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]$", local)
            && regex_is_match!(r"^([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$", domain)
    }

    /// The form used for uniqueness comparisons.
    pub fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A stored waitlist entry, as returned by `POST /api/waitlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Response body of `GET /api/waitlist/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Body of every non-2xx response.
/// `field` is only present for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    fn email(message: impl Into<String>) -> Self {
        Self::new(Some(EMAIL_FIELD), message)
    }
}

impl From<ValidationError> for ErrorBody {
    fn from(er: ValidationError) -> Self {
        ErrorBody {
            message: er.message,
            field: er.field,
        }
    }
}

// ###################################
// ->   HELPERS
// ###################################
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
