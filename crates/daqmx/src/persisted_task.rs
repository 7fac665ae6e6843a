//! Tasks saved in NI MAX.

use tracing::info;

use crate::driver::NamedCall;
use crate::task::Task;
use crate::Result;

impl PersistedTask {
    /// Loads the saved task into a new runtime task.
    ///
    /// The returned task is not cleared on drop; call [`Task::close`] when
    /// done with it.
    pub fn load(&self) -> Result<Task> {
        let handle = self.interpreter.load_task(&self.name)?;
        info!(name = %self.name, handle = %handle, "loaded saved task");
        Ok(Task::from_handle(std::sync::Arc::clone(&self.interpreter), handle, false))
    }

    /// Deletes the task from NI MAX.
    pub fn delete(&self) -> Result<()> {
        self.interpreter
            .named_call(NamedCall::DeleteSavedTask, &self.name)
    }
}

include!(concat!(env!("OUT_DIR"), "/persisted_task.rs"));
