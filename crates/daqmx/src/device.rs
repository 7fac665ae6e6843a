//! Devices.

use tracing::info;

use crate::driver::NamedCall;
use crate::Result;

impl Device {
    /// Aborts every task using the device and returns it to its
    /// power-on state.
    pub fn reset_device(&self) -> Result<()> {
        self.interpreter.named_call(NamedCall::ResetDevice, &self.name)?;
        info!(device = %self.name, "device reset");
        Ok(())
    }

    /// Runs the device's self test. A failure is reported as a driver
    /// error.
    pub fn self_test_device(&self) -> Result<()> {
        self.interpreter
            .named_call(NamedCall::SelfTestDevice, &self.name)
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

include!(concat!(env!("OUT_DIR"), "/device.rs"));
