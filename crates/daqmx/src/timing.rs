//! Sample timing.

use crate::driver::Configure;
use crate::enums::{AcquisitionType, Edge};
use crate::Result;

impl Timing {
    /// Sets the source, rate and number of samples of the sample clock.
    /// An empty `source` selects the onboard clock.
    pub fn cfg_samp_clk_timing(
        &self,
        rate: f64,
        source: &str,
        active_edge: Edge,
        sample_mode: AcquisitionType,
        samps_per_chan: u64,
    ) -> Result<()> {
        let spec = Configure::SampClkTiming {
            source,
            rate,
            active_edge: active_edge.value(),
            sample_mode: sample_mode.value(),
            samps_per_chan,
        };
        self.interpreter.configure(self.task_handle, &spec)
    }

    /// Sets only the number of samples, for tasks timed by their channels
    /// (buffered counter operations, for example).
    pub fn cfg_implicit_timing(&self, sample_mode: AcquisitionType, samps_per_chan: u64) -> Result<()> {
        let spec = Configure::ImplicitTiming {
            sample_mode: sample_mode.value(),
            samps_per_chan,
        };
        self.interpreter.configure(self.task_handle, &spec)
    }
}

include!(concat!(env!("OUT_DIR"), "/timing.rs"));
