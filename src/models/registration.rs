use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// ASCII digits only, `\d` would also accept other scripts' digits
static ORDER_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{3}-[0-9]{7}-[0-9]{7}$").expect("order id pattern compiles")
});

/// Body of `POST /api/register-warranty` as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrationSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub order_id: Option<String>,
}

/// A submission that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub order_id: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingField,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid Amazon Order ID format")]
    InvalidOrderId,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_order_id(order_id: &str) -> bool {
    ORDER_ID_PATTERN.is_match(order_id)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<RegistrationSubmission> for RegistrationRequest {
    type Error = ValidationError;

    fn try_from(submission: RegistrationSubmission) -> Result<Self, Self::Error> {
        let (Some(first_name), Some(last_name), Some(email), Some(order_id)) = (
            present(submission.first_name),
            present(submission.last_name),
            present(submission.email),
            present(submission.order_id),
        ) else {
            return Err(ValidationError::MissingField);
        };

        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        if !is_valid_order_id(&order_id) {
            return Err(ValidationError::InvalidOrderId);
        }

        Ok(RegistrationRequest {
            first_name,
            last_name,
            email,
            order_id,
        })
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationData {
    pub email: String,
    #[serde(rename = "registrationDate")]
    pub registration_date: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: RegistrationData,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        RegistrationResponse {
            success: true,
            message: "Warranty registered successfully",
            data: RegistrationData {
                email: registration.email,
                registration_date: registration
                    .registration_date
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

/// Body of every non-2xx answer from the registration endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}
