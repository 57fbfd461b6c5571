//! Submission validation.
//!
//! Rules are checked in order and the first failure wins:
//! name, then email presence and shape, then message presence and length.

use regex::Regex;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::record::{NewFeedback, ValidFeedback};

/// Shape an email address must have: `local@domain.tld`, no whitespace.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Checks submissions before they reach the store.
#[derive(Debug)]
pub struct Validator {
    email: Regex,
    min_message_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl Validator {
    /// Create a validator from configuration.
    ///
    /// # Panics
    ///
    /// Panics if [`EMAIL_PATTERN`] fails to compile, which it does not.
    #[must_use]
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            email: Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"),
            min_message_length: config.min_message_length,
        }
    }

    /// Minimum message length in characters.
    #[must_use]
    pub fn min_message_length(&self) -> usize {
        self.min_message_length
    }

    /// Check whether `email` has the expected shape.
    #[must_use]
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    /// Validate a submission.
    ///
    /// The returned fields keep the submitted text as given; trimming is
    /// only used to decide presence and length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first unmet rule.
    pub fn validate(&self, submission: NewFeedback) -> Result<ValidFeedback> {
        let name = required(submission.name, "name", "Full name is required")?;

        let email = required(submission.email, "email", "Email is required")?;
        if !self.is_valid_email(&email) {
            return Err(reject("email", "Please enter a valid email address"));
        }

        let message = required(submission.message, "message", "Feedback message is required")?;
        let length = message.trim().chars().count();
        if length < self.min_message_length {
            return Err(reject(
                "message",
                format!(
                    "Message must be at least {} characters",
                    self.min_message_length
                ),
            ));
        }

        Ok(ValidFeedback {
            name,
            email,
            message,
        })
    }
}

fn required(value: Option<String>, field: &'static str, message: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(reject(field, message)),
    }
}

fn reject(field: &'static str, message: impl Into<String>) -> Error {
    let err = Error::validation(field, message);
    debug!(field, error = %err, "Submission rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, message: &str) -> NewFeedback {
        NewFeedback::new(name, email, message)
    }

    fn rejected_field(result: Result<ValidFeedback>) -> &'static str {
        result.unwrap_err().field().expect("validation error")
    }

    #[test]
    fn test_valid_submission() {
        let validator = Validator::default();
        let valid = validator
            .validate(submission("Ann", "ann@x.com", "Great service, thank you!"))
            .unwrap();

        assert_eq!(valid.name(), "Ann");
        assert_eq!(valid.email(), "ann@x.com");
        assert_eq!(valid.message(), "Great service, thank you!");
    }

    #[test]
    fn test_fields_are_kept_as_submitted() {
        let validator = Validator::default();
        let valid = validator
            .validate(submission("  Ann  ", "ann@x.com", "  Great service!  "))
            .unwrap();

        assert_eq!(valid.name(), "  Ann  ");
        assert_eq!(valid.message(), "  Great service!  ");
    }

    #[test]
    fn test_missing_name() {
        let validator = Validator::default();
        let payload = NewFeedback {
            name: None,
            ..submission("", "ann@x.com", "Great service, thank you!")
        };

        assert_eq!(rejected_field(validator.validate(payload)), "name");
    }

    #[test]
    fn test_blank_name() {
        let validator = Validator::default();
        let err = validator
            .validate(submission("   ", "ann@x.com", "Great service, thank you!"))
            .unwrap_err();

        assert_eq!(err.to_string(), "Full name is required");
    }

    #[test]
    fn test_missing_email() {
        let validator = Validator::default();
        let err = validator
            .validate(submission("Ann", " ", "Great service, thank you!"))
            .unwrap_err();

        assert_eq!(err.field(), Some("email"));
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn test_malformed_email() {
        let validator = Validator::default();
        for email in ["ann", "ann@x", "ann@@x.com", "a nn@x.com", "@x.com", "ann@x."] {
            let err = validator
                .validate(submission("Ann", email, "Great service, thank you!"))
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Please enter a valid email address",
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepted_email_shapes() {
        let validator = Validator::default();
        for email in ["ann@x.com", "a.b+c@mail.example.org", "x@y.z"] {
            assert!(validator.is_valid_email(email), "{email} should pass");
        }
    }

    #[test]
    fn test_missing_message() {
        let validator = Validator::default();
        let err = validator
            .validate(submission("Ann", "ann@x.com", "\n\t "))
            .unwrap_err();

        assert_eq!(err.field(), Some("message"));
        assert_eq!(err.to_string(), "Feedback message is required");
    }

    #[test]
    fn test_short_message() {
        let validator = Validator::default();
        let err = validator
            .validate(submission("Ann", "ann@x.com", "  too short  "))
            .unwrap_err();

        assert_eq!(err.to_string(), "Message must be at least 10 characters");
    }

    #[test]
    fn test_message_length_counts_characters() {
        let validator = Validator::default();
        // Ten characters, twenty bytes
        let message = "é".repeat(10);
        assert!(validator
            .validate(submission("Ann", "ann@x.com", &message))
            .is_ok());
        assert!(validator
            .validate(submission("Ann", "ann@x.com", &"é".repeat(9)))
            .is_err());
    }

    #[test]
    fn test_min_length_disabled() {
        let validator = Validator::new(&ValidationConfig {
            min_message_length: 0,
        });
        assert_eq!(validator.min_message_length(), 0);
        assert!(validator
            .validate(submission("Ann", "ann@x.com", "ok"))
            .is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let validator = Validator::default();
        assert_eq!(
            rejected_field(validator.validate(NewFeedback::default())),
            "name"
        );
        assert_eq!(
            rejected_field(validator.validate(submission("Ann", "bad", ""))),
            "email"
        );
    }
}
