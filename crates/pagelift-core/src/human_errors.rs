// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people scanning pages.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::PageliftError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must do something (pick another photo, fix a setting).
    ActionRequired,
    /// Cannot be fixed by retrying the same input.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

impl Severity {
    /// Lead-in shown before the message.
    pub fn label(self) -> &'static str {
        match self {
            Severity::ActionRequired => "Action needed",
            Severity::Permanent => "Scan failed",
        }
    }
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}\n{}", self.severity.label(), self.message, self.suggestion)
    }
}

/// Convert a `PageliftError` into a `HumanError`.
pub fn humanize_error(err: &PageliftError) -> HumanError {
    match err {
        PageliftError::ImageError(detail) => HumanError {
            message: "We couldn't read this picture.".into(),
            suggestion: format!(
                "Make sure the file is a photo (JPEG, PNG, TIFF) and isn't damaged. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        PageliftError::EmptyImage { .. } => HumanError {
            message: "This picture is empty.".into(),
            suggestion: "Take the photo again so the page is visible.".into(),
            severity: Severity::ActionRequired,
        },

        PageliftError::DegenerateQuad(_) => HumanError {
            message: "The page outline doesn't make sense.".into(),
            suggestion: "Retake the photo with the whole page in view.".into(),
            severity: Severity::ActionRequired,
        },

        PageliftError::InvalidConfig(detail) => HumanError {
            message: "A scanner setting is wrong.".into(),
            suggestion: format!("Check your configuration file. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PageliftError::PageLimitExceeded { limit, .. } => HumanError {
            message: "Too many pages for one scan.".into(),
            suggestion: format!("Scan at most {limit} pages at a time."),
            severity: Severity::ActionRequired,
        },

        PageliftError::Worker(_) => HumanError {
            message: "Something went wrong while straightening a page.".into(),
            suggestion: "Try scanning that page again.".into(),
            severity: Severity::Permanent,
        },

        PageliftError::Io(io_err) => HumanError {
            message: "We couldn't read or save a file.".into(),
            suggestion: format!("Check the file exists and the folder is writable. ({io_err})"),
            severity: Severity::ActionRequired,
        },

        PageliftError::Serialization(_) => HumanError {
            message: "A settings or report file is malformed.".into(),
            suggestion: "Fix or remove the file and try again.".into(),
            severity: Severity::Permanent,
        },
    }
}
