// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact form validator.
//!
//! Checks every field of a submission and reports all violations at once:
//! - `name`: 2 to 100 characters after trimming
//! - `email`: address shape
//! - `company`: optional, unconstrained
//! - `projectType`: non-empty
//! - `message`: 10 to 2000 characters

use crate::config::ValidationConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// One violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A submission that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub project_type: String,
    pub message: String,
}

impl ContactSubmission {
    /// Display label for the project type chosen on the site's form.
    pub fn project_label(&self) -> &str {
        match self.project_type.as_str() {
            "automation" => "Test Automation",
            "performance" => "Performance Testing",
            "security" => "Security Testing",
            "consulting" => "QA Consulting",
            "other" => "Other",
            other => other,
        }
    }
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Every field passed
    Valid(ContactSubmission),
    /// At least one field failed; all failures are listed
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Valid(_) => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<ContactSubmission, Vec<FieldError>> {
        match self {
            ValidationResult::Valid(submission) => Ok(submission),
            ValidationResult::Invalid(errors) => Err(errors),
        }
    }
}

/// Contact form validator.
pub struct ContactValidator {
    config: ValidationConfig,
}

impl ContactValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a decoded request body.
    ///
    /// Anything other than a JSON object is treated as an empty object.
    pub fn validate(&self, raw: &Value) -> ValidationResult {
        let empty = Map::new();
        let fields = raw.as_object().unwrap_or(&empty);
        let mut errors = Vec::new();

        let name = required_string(fields, "name", &mut errors);
        if let Some(name) = name {
            let len = name.trim().chars().count();
            if len < self.config.name_min_len {
                errors.push(FieldError::new(
                    "name",
                    format!("Name must be at least {} characters", self.config.name_min_len),
                ));
            } else if len > self.config.name_max_len {
                errors.push(FieldError::new(
                    "name",
                    format!("Name must be less than {} characters", self.config.name_max_len),
                ));
            }
        }

        let email = required_string(fields, "email", &mut errors);
        if let Some(email) = email {
            if !is_email_shaped(email) {
                errors.push(FieldError::new("email", "Invalid email address"));
            }
        }

        let company = match fields.get("company") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                errors.push(FieldError::new("company", "Expected string"));
                None
            }
        };

        let project_type = required_string(fields, "projectType", &mut errors);
        if let Some(project_type) = project_type {
            if project_type.is_empty() {
                errors.push(FieldError::new("projectType", "Project type is required"));
            }
        }

        let message = required_string(fields, "message", &mut errors);
        if let Some(message) = message {
            let len = message.chars().count();
            if len < self.config.message_min_len {
                errors.push(FieldError::new(
                    "message",
                    format!(
                        "Message must be at least {} characters",
                        self.config.message_min_len
                    ),
                ));
            } else if len > self.config.message_max_len {
                errors.push(FieldError::new(
                    "message",
                    format!(
                        "Message must be less than {} characters",
                        self.config.message_max_len
                    ),
                ));
            }
        }

        match (name, email, project_type, message) {
            (Some(name), Some(email), Some(project_type), Some(message)) if errors.is_empty() => {
                ValidationResult::Valid(ContactSubmission {
                    name: name.to_string(),
                    email: email.to_string(),
                    company: company.map(str::to_string),
                    project_type: project_type.to_string(),
                    message: message.to_string(),
                })
            }
            _ => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
                debug!(?fields, "Submission invalid");
                ValidationResult::Invalid(errors)
            }
        }
    }
}

/// Fetch a required string field, recording an error when it is missing or
/// has the wrong type.
fn required_string<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match fields.get(field) {
        Some(Value::String(s)) => Some(s.as_str()),
        None => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(field, "Expected string"));
            None
        }
    }
}

/// Check that `email` has the shape of an address: `local@domain.tld`.
pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}
