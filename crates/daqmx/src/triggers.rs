//! The triggers of a task, grouped.

use std::sync::Arc;

use crate::arm_start_trigger::ArmStartTrigger;
use crate::interpreter::Interpreter;
use crate::pause_trigger::PauseTrigger;
use crate::reference_trigger::ReferenceTrigger;
use crate::start_trigger::StartTrigger;
use crate::TaskHandle;

/// Entry point to the triggers of one task.
#[derive(Debug, Clone)]
pub struct Triggers {
    interpreter: Arc<Interpreter>,
    task_handle: TaskHandle,
}

impl Triggers {
    pub(crate) fn new(interpreter: Arc<Interpreter>, task_handle: TaskHandle) -> Self {
        Self {
            interpreter,
            task_handle,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn start_trigger(&self) -> StartTrigger {
        StartTrigger::new(Arc::clone(&self.interpreter), self.task_handle)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn reference_trigger(&self) -> ReferenceTrigger {
        ReferenceTrigger::new(Arc::clone(&self.interpreter), self.task_handle)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn pause_trigger(&self) -> PauseTrigger {
        PauseTrigger::new(Arc::clone(&self.interpreter), self.task_handle)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn arm_start_trigger(&self) -> ArmStartTrigger {
        ArmStartTrigger::new(Arc::clone(&self.interpreter), self.task_handle)
    }
}
