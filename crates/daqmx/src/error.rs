//! Error types for the NI-DAQmx façade.

use std::fmt;

use thiserror::Error;

use crate::error_codes::ErrorCode;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A negative status returned by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverError {
    /// Raw status.
    pub code: i32,
    /// The catalog entry for `code`, when there is one.
    pub error_code: Option<ErrorCode>,
    /// Symbolic name, or `UNKNOWN` for codes missing from the catalog.
    pub name: String,
    /// Catalog description, or the driver's own error string.
    pub description: String,
    /// Entry point that failed, e.g. `DAQmxGetChanAttribute`.
    pub function: String,
    /// Attribute id, for attribute calls.
    pub attribute: Option<i32>,
    /// `DAQmxGetExtendedErrorInfo` captured right after the failure.
    pub extended: Option<String>,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) in {}", self.name, self.code, self.function)?;
        if let Some(attribute) = self.attribute {
            write!(f, " [attribute {attribute:#x}]")?;
        }
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        Ok(())
    }
}

impl std::error::Error for DriverError {}

/// Errors that can occur when talking to NI-DAQmx.
#[derive(Debug, Error)]
pub enum Error {
    /// The driver returned an error status.
    #[error("{0}")]
    Driver(#[from] DriverError),

    /// A variable-size attribute kept changing size between the probe and
    /// the read.
    #[error("size of attribute {attribute:#x} via {function} kept changing after {attempts} attempts")]
    BufferChurn {
        /// Entry point being read.
        function: String,
        /// Attribute id.
        attribute: i32,
        /// Probe/read cycles tried.
        attempts: u32,
    },

    /// The driver returned a value that is not a member of the expected
    /// enum.
    #[error("{value} is not a valid {enum_name}")]
    UnknownEnumValue {
        /// Public enum name.
        enum_name: &'static str,
        /// Raw value received.
        value: i32,
    },

    /// A call was addressed through a null task handle or an empty name.
    #[error("{function} called with an empty {component}")]
    EmptyHandle {
        /// Entry point that was about to be called.
        function: String,
        /// `"task handle"` or `"name"`.
        component: &'static str,
    },

    /// The handle arguments match none of the driver's call shapes.
    #[error("{function} has no entry point taking these handle arguments")]
    InvalidHandles {
        /// Entry point that was about to be called.
        function: String,
    },

    /// A string passed to the driver contained an interior NUL byte.
    #[error("string {0:?} contains a NUL byte")]
    InvalidString(String),

    /// A collection lookup found no item of that name or index.
    #[error("no {kind} named {name}")]
    NotFound {
        /// Item type of the collection.
        kind: &'static str,
        /// Name or index looked up.
        name: String,
    },

    /// The driver library could not be loaded or lacks an entry point.
    #[error(transparent)]
    Library(#[from] daqmx_sys::LoadError),

    /// Interpreter configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The raw driver status, for [`Error::Driver`].
    #[must_use]
    pub fn driver_code(&self) -> Option<i32> {
        match self {
            Self::Driver(e) => Some(e.code),
            _ => None,
        }
    }

    /// Whether this is the driver error `code`.
    #[must_use]
    pub fn is(&self, code: ErrorCode) -> bool {
        self.driver_code() == Some(code.code())
    }
}
