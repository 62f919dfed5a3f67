//! Field-scoped validation results

use docform_store::FieldPath;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// One failed check, attached to the value (or section) it concerns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Offending value or section
    pub path: FieldPath,
    /// Message shown beneath the control
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All failed checks of one validation pass, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Create empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a failure; an identical message for the same path is kept once
    pub fn push(&mut self, path: FieldPath, message: impl Into<String>) {
        let error = FieldError {
            path,
            message: message.into(),
        };
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    /// Whether every check passed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures in order
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages for one path
    pub fn messages_for<'a>(&'a self, path: &'a FieldPath) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| &e.path == path)
            .map(|e| e.message.as_str())
    }

    /// Number of failures
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are no failures
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
