//! Command types for the Elm-style architecture
//!
//! Commands represent effects the host should perform after an update.

use std::fmt;

use serde::Serialize;

/// Title used for validation failure alerts
pub const VALIDATION_ALERT_TITLE: &str = "Validation Failure";

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Saved,
    Cancelled,
    Deleted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Saved => write!(f, "saved"),
            Outcome::Cancelled => write!(f, "cancelled"),
            Outcome::Deleted => write!(f, "deleted"),
        }
    }
}

/// A user-facing alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    /// A validation failure alert with the standard title
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            title: VALIDATION_ALERT_TITLE.to_string(),
            message: message.into(),
        }
    }

    /// Alert for whole-element validation messages, joined by blank lines
    pub fn from_messages(messages: &[String]) -> Self {
        Self::validation(messages.join("\n\n"))
    }

    /// Alert for fields that still fail their field-level checks
    pub fn invalid_fields(count: usize) -> Self {
        Self::validation(format!(
            "{} field(s) require valid values before you can save.",
            count
        ))
    }
}

/// Effects requested by a session update.
///
/// `update` returns `Option<Cmd>`; `None` means the message had no effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Validation state or title changed; re-render the detail view
    Redraw,
    /// Show an alert
    PresentAlert(Alert),
    /// End the episode (dismiss the sheet / pop the detail view)
    CloseEpisode(Outcome),
}

impl Cmd {
    /// The outcome, if this command closes the episode
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Cmd::CloseEpisode(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// The alert, if this command presents one
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Cmd::PresentAlert(alert) => Some(alert),
            _ => None,
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Cmd::Redraw | Cmd::PresentAlert(_))
    }
}
