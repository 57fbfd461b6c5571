//! Core feedback types.
//!
//! This module defines the stored record and the submission payload it is
//! built from.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A single stored submission.
///
/// Records are created on submit and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Unique identifier, derived from the creation time in milliseconds.
    pub id: i64,

    /// Submitter's name.
    pub name: String,

    /// Submitter's email address.
    pub email: String,

    /// The feedback text.
    pub message: String,

    /// When the record was stored.
    pub date: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Build a record from validated fields.
    ///
    /// The timestamp is truncated to millisecond precision so that `date`
    /// serializes as `2024-05-01T12:34:56.789Z`.
    #[must_use]
    pub fn new(id: i64, fields: ValidFeedback, date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            message: fields.message,
            date: date.trunc_subsecs(3),
        }
    }

    /// Whether any text field contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A submission as received on the wire.
///
/// Every field is optional so that a missing field surfaces as a validation
/// failure naming it, rather than a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    /// Submitter's name.
    #[serde(default)]
    pub name: Option<String>,
    /// Submitter's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// The feedback text.
    #[serde(default)]
    pub message: Option<String>,
}

impl NewFeedback {
    /// Create a submission with all three fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
        }
    }
}

/// A submission that passed validation.
///
/// Only [`crate::validation::Validator`] constructs this, so holding one is
/// proof the rules were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFeedback {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) message: String,
}

impl ValidFeedback {
    /// Submitter's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submitter's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The feedback text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Pick the id for a record created at `now`.
///
/// Ids follow the clock in milliseconds but never repeat or go backwards:
/// when the clock hasn't moved past `floor`, the next integer is used.
/// Returns `None` once `floor` is `i64::MAX`.
#[must_use]
pub fn next_id(now: DateTime<Utc>, floor: Option<i64>) -> Option<i64> {
    let millis = now.timestamp_millis();
    match floor {
        Some(last) if millis <= last => last.checked_add(1),
        _ => Some(millis),
    }
}
