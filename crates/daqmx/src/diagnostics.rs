//! Driver warnings.
//!
//! A positive status means the call succeeded with a caveat. The
//! interpreter logs every warning at `warn` level and hands it to each
//! registered [`WarningSink`].

use std::fmt;

use parking_lot::Mutex;

use crate::error_codes::ErrorCode;

/// A positive status returned by a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverWarning {
    /// Raw status.
    pub code: i32,
    /// The catalog entry for `code`, when there is one.
    pub error_code: Option<ErrorCode>,
    /// Symbolic name, or `UNKNOWN` for codes missing from the catalog.
    pub name: String,
    /// Catalog description, or the driver's own string.
    pub description: String,
    /// Entry point that warned.
    pub function: String,
    /// Attribute id, for attribute calls.
    pub attribute: Option<i32>,
}

impl fmt::Display for DriverWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) in {}", self.name, self.code, self.function)?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        Ok(())
    }
}

/// Receives warnings in addition to the log.
pub trait WarningSink: Send + Sync {
    /// Called once per warning, on the thread that made the call.
    fn on_warning(&self, warning: &DriverWarning);
}

/// Keeps every warning it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<DriverWarning>>,
}

impl CollectingSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the warnings received so far.
    #[must_use]
    pub fn warnings(&self) -> Vec<DriverWarning> {
        self.warnings.lock().clone()
    }

    /// Removes and returns the warnings received so far.
    pub fn take(&self) -> Vec<DriverWarning> {
        std::mem::take(&mut *self.warnings.lock())
    }
}

impl WarningSink for CollectingSink {
    fn on_warning(&self, warning: &DriverWarning) {
        self.warnings.lock().push(warning.clone());
    }
}
