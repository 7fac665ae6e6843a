//! Reference trigger.

use crate::driver::{Configure, TaskCall};
use crate::enums::Edge;
use crate::Result;

impl ReferenceTrigger {
    /// Marks the reference point on an edge at `source`, keeping
    /// `pretrigger_samples` samples per channel from before it.
    pub fn cfg_dig_edge_ref_trig(&self, source: &str, pretrigger_samples: u32, edge: Edge) -> Result<()> {
        let spec = Configure::DigEdgeRefTrig {
            source,
            edge: edge.value(),
            pretrigger_samples,
        };
        self.interpreter.configure(self.task_handle, &spec)
    }

    /// Removes the reference trigger.
    pub fn disable_ref_trig(&self) -> Result<()> {
        self.interpreter
            .task_call(TaskCall::DisableRefTrig, self.task_handle)
    }
}

include!(concat!(env!("OUT_DIR"), "/reference_trigger.rs"));
