//! The local driver installation.

use std::fmt;

use crate::interpreter::Interpreter;
use crate::Result;

/// Installed driver version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DriverVersion {
    #[allow(missing_docs)]
    pub major: u32,
    #[allow(missing_docs)]
    pub minor: u32,
    #[allow(missing_docs)]
    pub update: u32,
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.update)
    }
}

impl System {
    /// The system on the process-wide interpreter.
    pub fn local() -> Result<Self> {
        Ok(Self::new(Interpreter::global()?))
    }

    /// Major, minor and update version of the installed driver.
    pub fn driver_version(&self) -> Result<DriverVersion> {
        Ok(DriverVersion {
            major: self.driver_major_version()?,
            minor: self.driver_minor_version()?,
            update: self.driver_update_version()?,
        })
    }
}

include!(concat!(env!("OUT_DIR"), "/system.rs"));
