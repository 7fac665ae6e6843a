//! Start trigger.

use crate::driver::{Configure, TaskCall};
use crate::enums::{Edge, Slope};
use crate::Result;

impl StartTrigger {
    /// Starts the task on an edge of the digital signal at `source`.
    pub fn cfg_dig_edge_start_trig(&self, source: &str, edge: Edge) -> Result<()> {
        let spec = Configure::DigEdgeStartTrig {
            source,
            edge: edge.value(),
        };
        self.interpreter.configure(self.task_handle, &spec)
    }

    /// Starts the task when the analog signal at `source` crosses `level`
    /// with the given slope.
    pub fn cfg_anlg_edge_start_trig(&self, source: &str, slope: Slope, level: f64) -> Result<()> {
        let spec = Configure::AnlgEdgeStartTrig {
            source,
            slope: slope.value(),
            level,
        };
        self.interpreter.configure(self.task_handle, &spec)
    }

    /// Starts the task as soon as it is started.
    pub fn disable_start_trig(&self) -> Result<()> {
        self.interpreter
            .task_call(TaskCall::DisableStartTrig, self.task_handle)
    }
}

include!(concat!(env!("OUT_DIR"), "/start_trigger.rs"));
