//! Tasks: creation, lifecycle and the objects hanging off a task.

use std::sync::Arc;
use std::time::Duration;

use daqmx_sys::DAQMX_VAL_WAIT_INFINITELY;
use tracing::{debug, warn};

use crate::driver::TaskCall;
use crate::enums::{SaveOptions, TaskMode};
use crate::in_stream::InStream;
use crate::interpreter::Interpreter;
use crate::out_stream::OutStream;
use crate::timing::Timing;
use crate::triggers::Triggers;
use crate::{Result, TaskHandle};

/// A driver task: a set of virtual channels plus timing, triggering and
/// stream settings.
///
/// A task created by [`Task::new`] or [`Task::with_interpreter`] is cleared
/// when dropped. Call [`Task::close`] to see the error, if any.
///
/// ```no_run
/// use daqmx::Task;
///
/// # fn main() -> daqmx::Result<()> {
/// let task = Task::new("")?;
/// task.ai_channels().add_ai_voltage_chan("Dev1/ai0", &Default::default())?;
/// task.start()?;
/// task.wait_until_done(None)?;
/// task.close()
/// # }
/// ```
#[derive(Debug)]
pub struct Task {
    pub(crate) interpreter: Arc<Interpreter>,
    pub(crate) task_handle: TaskHandle,
    close_on_drop: bool,
    closed: bool,
}

impl Task {
    /// Creates a task on the process-wide interpreter. An empty name lets
    /// the driver choose one.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_interpreter(Interpreter::global()?, name)
    }

    /// Creates a task on `interpreter`.
    pub fn with_interpreter(interpreter: Arc<Interpreter>, name: &str) -> Result<Self> {
        let task_handle = interpreter.create_task(name)?;
        debug!(name, handle = %task_handle, "created task");
        Ok(Self::from_handle(interpreter, task_handle, true))
    }

    /// Wraps an existing handle. With `close_on_drop` unset the handle is
    /// left open when the value is dropped.
    #[must_use]
    pub fn from_handle(interpreter: Arc<Interpreter>, task_handle: TaskHandle, close_on_drop: bool) -> Self {
        Self {
            interpreter,
            task_handle,
            close_on_drop,
            closed: false,
        }
    }

    /// The interpreter calls go through.
    #[must_use]
    pub fn interpreter(&self) -> &Arc<Interpreter> {
        &self.interpreter
    }

    /// The driver's handle for this task.
    #[must_use]
    pub fn task_handle(&self) -> TaskHandle {
        self.task_handle
    }

    /// Transitions the task to the running state.
    pub fn start(&self) -> Result<()> {
        self.interpreter.task_call(TaskCall::Start, self.task_handle)
    }

    /// Stops the task and returns it to the state it was in before
    /// [`Task::start`].
    pub fn stop(&self) -> Result<()> {
        self.interpreter.task_call(TaskCall::Stop, self.task_handle)
    }

    /// Clears the task, releasing its resources.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.interpreter.task_call(TaskCall::Clear, self.task_handle)
    }

    /// Moves the task through the driver state model.
    pub fn control(&self, action: TaskMode) -> Result<()> {
        self.interpreter.task_control(self.task_handle, action)
    }

    /// Waits for a finite task to finish. `None` waits indefinitely.
    pub fn wait_until_done(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.map_or(DAQMX_VAL_WAIT_INFINITELY, |t| t.as_secs_f64());
        self.interpreter.wait_until_task_done(self.task_handle, timeout)
    }

    /// Whether the task has finished. Also reports errors from a task that
    /// stopped on its own.
    pub fn is_task_done(&self) -> Result<bool> {
        self.interpreter.is_task_done(self.task_handle)
    }

    /// Saves the task to NI MAX under `save_as`, or under its own name when
    /// `save_as` is empty.
    pub fn save(&self, save_as: &str, author: &str, options: &[SaveOptions]) -> Result<()> {
        let options = u32::try_from(SaveOptions::compose(options)).unwrap_or_default();
        self.interpreter
            .save_task(self.task_handle, save_as, author, options)
    }

    /// Adds global virtual channels saved in NI MAX.
    pub fn add_global_channels(&self, channels: &[&str]) -> Result<()> {
        let names = crate::utils::flatten_channel_string(channels);
        self.interpreter
            .add_global_chans_to_task(self.task_handle, &names)
    }

    /// Sample timing.
    #[must_use]
    pub fn timing(&self) -> Timing {
        Timing::new(Arc::clone(&self.interpreter), self.task_handle)
    }

    /// Read settings.
    #[must_use]
    pub fn in_stream(&self) -> InStream {
        InStream::new(Arc::clone(&self.interpreter), self.task_handle)
    }

    /// Write settings.
    #[must_use]
    pub fn out_stream(&self) -> OutStream {
        OutStream::new(Arc::clone(&self.interpreter), self.task_handle)
    }

    /// Start, reference, pause and arm start triggers.
    #[must_use]
    pub fn triggers(&self) -> Triggers {
        Triggers::new(Arc::clone(&self.interpreter), self.task_handle)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.task_handle == other.task_handle
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if self.closed || !self.close_on_drop || self.task_handle.is_null() {
            return;
        }
        if let Err(err) = self.interpreter.task_call(TaskCall::Clear, self.task_handle) {
            warn!(handle = %self.task_handle, error = %err, "failed to clear task on drop");
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/task.rs"));
