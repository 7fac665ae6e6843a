//! Dispatches façade calls to the driver and turns statuses into results.
//!
//! Every generated accessor builds an [`AttributeCall`] (entry point stem,
//! handle arguments, attribute id) and hands it to one typed method here.
//! Variable-size values are read in two passes: a probe with an empty
//! buffer for the size, then the read. If the value grows in between, the
//! pair is retried up to [`InterpreterConfig::max_sizing_attempts`] times.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::InterpreterConfig;
use crate::diagnostics::{DriverWarning, WarningSink};
use crate::driver::{
    AttributeValue, AttributeValueMut, Configure, CreateChannel, DriverApi, LibraryDriver,
    NamedCall, TaskCall,
};
use crate::enums::TaskMode;
use crate::error::{DriverError, Error, Result};
use crate::error_codes::ErrorCode;
use crate::utils::unflatten_channel_string;
use crate::TaskHandle;

const UNKNOWN: &str = "UNKNOWN";

/// One leading argument of an attribute entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleArg<'a> {
    /// A task handle.
    Task(TaskHandle),
    /// A device, channel, terminal or scale name.
    Name(&'a str),
}

/// Which attribute to address and how.
#[derive(Debug, Clone, Copy)]
pub struct AttributeCall<'a> {
    stem: &'a str,
    handles: &'a [HandleArg<'a>],
    attribute: i32,
}

impl<'a> AttributeCall<'a> {
    /// `stem` selects the `DAQmxGet<stem>` family, `handles` are its
    /// leading arguments in C order.
    #[must_use]
    pub fn new(stem: &'a str, handles: &'a [HandleArg<'a>], attribute: i32) -> Self {
        Self {
            stem,
            handles,
            attribute,
        }
    }

    /// Entry point stem, e.g. `ChanAttribute`.
    #[must_use]
    pub fn stem(&self) -> &'a str {
        self.stem
    }

    /// Leading handle arguments.
    #[must_use]
    pub fn handles(&self) -> &'a [HandleArg<'a>] {
        self.handles
    }

    /// Attribute id.
    #[must_use]
    pub fn attribute(&self) -> i32 {
        self.attribute
    }

    /// Symbol name for `verb` (`Get`, `Set` or `Reset`).
    #[must_use]
    pub fn function(&self, verb: &str) -> String {
        daqmx_sys::attribute_symbol(verb, self.stem)
    }
}

/// Scalar attribute types.
pub trait ScalarElement: Copy + Default {
    /// Read destination for one value.
    fn slot(value: &mut Self) -> AttributeValueMut<'_>;
    /// Write value.
    fn value(self) -> AttributeValue<'static>;
}

/// Element types of list attributes.
pub trait ListElement: Copy + Default {
    /// Read destination for a buffer of values.
    fn slot(buffer: &mut [Self]) -> AttributeValueMut<'_>;
    /// Write value.
    fn values(values: &[Self]) -> AttributeValue<'_>;
}

macro_rules! element {
    ($ty:ty, $scalar:ident, $list:ident) => {
        impl ScalarElement for $ty {
            fn slot(value: &mut Self) -> AttributeValueMut<'_> {
                AttributeValueMut::$scalar(value)
            }
            fn value(self) -> AttributeValue<'static> {
                AttributeValue::$scalar(self)
            }
        }

        impl ListElement for $ty {
            fn slot(buffer: &mut [Self]) -> AttributeValueMut<'_> {
                AttributeValueMut::$list(buffer)
            }
            fn values(values: &[Self]) -> AttributeValue<'_> {
                AttributeValue::$list(values)
            }
        }
    };
}

element!(i32, I32, I32List);
element!(u32, U32, U32List);
element!(i64, I64, I64List);
element!(u64, U64, U64List);
element!(f64, F64, F64List);

impl ScalarElement for bool {
    fn slot(value: &mut Self) -> AttributeValueMut<'_> {
        AttributeValueMut::Bool(value)
    }
    fn value(self) -> AttributeValue<'static> {
        AttributeValue::Bool(self)
    }
}

impl ListElement for u8 {
    fn slot(buffer: &mut [Self]) -> AttributeValueMut<'_> {
        AttributeValueMut::Bytes(buffer)
    }
    fn values(values: &[Self]) -> AttributeValue<'_> {
        AttributeValue::Bytes(values)
    }
}

/// Whether a read status means the buffer was too small for the value.
fn is_size_change(status: i32) -> bool {
    [
        ErrorCode::BufferTooSmallForString,
        ErrorCode::ReadBufferTooSmall,
        ErrorCode::CapiStringTruncatedToFitBuffer,
    ]
    .iter()
    .any(|c| c.code() == status)
}

fn c_string(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

static GLOBAL: OnceCell<Arc<Interpreter>> = OnceCell::new();

/// Typed front end over a [`DriverApi`].
pub struct Interpreter {
    driver: Arc<dyn DriverApi>,
    config: InterpreterConfig,
    sinks: RwLock<Vec<Arc<dyn WarningSink>>>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("driver", &self.driver)
            .field("config", &self.config)
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}

impl Interpreter {
    /// Wraps `driver` with the default configuration.
    #[must_use]
    pub fn new(driver: Arc<dyn DriverApi>) -> Self {
        Self::with_config(driver, InterpreterConfig::default())
    }

    /// Wraps `driver`.
    #[must_use]
    pub fn with_config(driver: Arc<dyn DriverApi>, config: InterpreterConfig) -> Self {
        Self {
            driver,
            config,
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Opens the driver library named by `config`.
    pub fn from_config(config: InterpreterConfig) -> Result<Self> {
        let driver = LibraryDriver::open(config.library_path())?;
        Ok(Self::with_config(Arc::new(driver), config))
    }

    /// The process-wide interpreter, created from
    /// [`InterpreterConfig::load`] on first use.
    pub fn global() -> Result<Arc<Self>> {
        GLOBAL
            .get_or_try_init(|| {
                let config = InterpreterConfig::load()?;
                info!(library = %config.library_path().display(), "initializing NI-DAQmx interpreter");
                Self::from_config(config).map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The driver calls go to.
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn DriverApi> {
        &self.driver
    }

    /// Registers a sink that receives every later warning.
    pub fn add_warning_sink(&self, sink: Arc<dyn WarningSink>) {
        self.sinks.write().push(sink);
    }

    // ------------------------------------------------------------------
    // Status handling
    // ------------------------------------------------------------------

    /// Zero is success, negative an error, positive a warning that is
    /// reported and otherwise ignored.
    fn check(&self, status: i32, function: &str, attribute: Option<i32>) -> Result<()> {
        debug!(function, attribute, status, "driver call");
        match status {
            0 => Ok(()),
            s if s < 0 => Err(self.driver_error(s, function, attribute).into()),
            s => {
                self.report_warning(s, function, attribute);
                Ok(())
            }
        }
    }

    fn describe(&self, code: i32) -> (Option<ErrorCode>, String, String) {
        match ErrorCode::from_code(code) {
            Some(known) => (
                Some(known),
                known.name().to_string(),
                known.description().to_string(),
            ),
            None => (
                None,
                UNKNOWN.to_string(),
                self.error_string(code).unwrap_or_default(),
            ),
        }
    }

    fn driver_error(&self, code: i32, function: &str, attribute: Option<i32>) -> DriverError {
        let (error_code, name, description) = self.describe(code);
        let extended = self.extended_error_info().filter(|s| !s.is_empty());
        DriverError {
            code,
            error_code,
            name,
            description,
            function: function.to_string(),
            attribute,
            extended,
        }
    }

    fn report_warning(&self, code: i32, function: &str, attribute: Option<i32>) {
        let (error_code, name, description) = self.describe(code);
        let warning = DriverWarning {
            code,
            error_code,
            name,
            description,
            function: function.to_string(),
            attribute,
        };
        warn!(code, name = %warning.name, function, attribute, "{}", warning.description);
        for sink in self.sinks.read().iter() {
            sink.on_warning(&warning);
        }
    }

    /// Two-pass read of a driver string outside attribute calls.
    fn driver_text(&self, mut call: impl FnMut(&mut [u8]) -> Result<i32>) -> Option<String> {
        let size = call(&mut []).ok()?;
        let size = usize::try_from(size).ok().filter(|&s| s > 0)?;
        let mut buffer = vec![0u8; size];
        let status = call(&mut buffer).ok()?;
        (status >= 0).then(|| c_string(&buffer))
    }

    /// The driver's description of `code`.
    pub fn error_string(&self, code: i32) -> Option<String> {
        self.driver_text(|buffer| self.driver.error_string(code, buffer))
    }

    /// Extended information about the most recent error on this thread.
    pub fn extended_error_info(&self) -> Option<String> {
        self.driver_text(|buffer| self.driver.extended_error_info(buffer))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// The leading handle must name something. A channel selector after a
    /// task handle may be empty; the driver reads that as every channel.
    fn ensure_handles(call: &AttributeCall<'_>, function: &str) -> Result<()> {
        let component = match call.handles().first() {
            Some(HandleArg::Task(task)) if task.is_null() => "task handle",
            Some(HandleArg::Name(name)) if name.is_empty() => "name",
            _ => return Ok(()),
        };
        Err(Error::EmptyHandle {
            function: function.to_string(),
            component,
        })
    }

    fn get_scalar<T: ScalarElement>(&self, call: &AttributeCall<'_>) -> Result<T> {
        let function = call.function("Get");
        Self::ensure_handles(call, &function)?;
        let mut value = T::default();
        let status = self.driver.get_attribute(call, T::slot(&mut value))?;
        self.check(status, &function, Some(call.attribute()))?;
        Ok(value)
    }

    fn set_value(&self, call: &AttributeCall<'_>, value: AttributeValue<'_>) -> Result<()> {
        let function = call.function("Set");
        Self::ensure_handles(call, &function)?;
        let status = self.driver.set_attribute(call, value)?;
        self.check(status, &function, Some(call.attribute()))
    }

    /// Reads a `bool32` attribute.
    pub fn get_bool(&self, call: &AttributeCall<'_>) -> Result<bool> {
        self.get_scalar(call)
    }

    /// Reads an `int32` attribute.
    pub fn get_i32(&self, call: &AttributeCall<'_>) -> Result<i32> {
        self.get_scalar(call)
    }

    /// Reads a `uInt32` attribute.
    pub fn get_u32(&self, call: &AttributeCall<'_>) -> Result<u32> {
        self.get_scalar(call)
    }

    /// Reads an `int64` attribute.
    pub fn get_i64(&self, call: &AttributeCall<'_>) -> Result<i64> {
        self.get_scalar(call)
    }

    /// Reads a `uInt64` attribute.
    pub fn get_u64(&self, call: &AttributeCall<'_>) -> Result<u64> {
        self.get_scalar(call)
    }

    /// Reads a `float64` attribute.
    pub fn get_f64(&self, call: &AttributeCall<'_>) -> Result<f64> {
        self.get_scalar(call)
    }

    /// Reads a string attribute, sizing the buffer with a probe.
    pub fn get_string(&self, call: &AttributeCall<'_>) -> Result<String> {
        let bytes = self.get_list::<u8>(call)?;
        Ok(c_string(&bytes))
    }

    /// Reads a comma-separated list attribute and expands it.
    pub fn get_string_list(&self, call: &AttributeCall<'_>) -> Result<Vec<String>> {
        Ok(unflatten_channel_string(&self.get_string(call)?))
    }

    /// Reads a list whose length the driver reports, probing first.
    pub fn get_list<T: ListElement>(&self, call: &AttributeCall<'_>) -> Result<Vec<T>> {
        let function = call.function("Get");
        Self::ensure_handles(call, &function)?;
        let attempts = self.config.max_sizing_attempts.max(1);

        for attempt in 1..=attempts {
            let size = self.driver.get_attribute(call, T::slot(&mut []))?;
            if size < 0 {
                self.check(size, &function, Some(call.attribute()))?;
            }
            let size = usize::try_from(size).unwrap_or_default();
            if size == 0 {
                debug!(function = %function, attribute = call.attribute(), "empty value");
                return Ok(Vec::new());
            }

            let mut buffer = vec![T::default(); size];
            let status = self.driver.get_attribute(call, T::slot(&mut buffer))?;
            if is_size_change(status) {
                debug!(
                    function = %function,
                    attribute = call.attribute(),
                    attempt,
                    size,
                    "value grew between probe and read"
                );
                continue;
            }
            self.check(status, &function, Some(call.attribute()))?;
            return Ok(buffer);
        }

        Err(Error::BufferChurn {
            function,
            attribute: call.attribute(),
            attempts,
        })
    }

    /// Reads exactly `size` elements without probing.
    pub fn get_list_sized<T: ListElement>(
        &self,
        call: &AttributeCall<'_>,
        size: usize,
    ) -> Result<Vec<T>> {
        let function = call.function("Get");
        Self::ensure_handles(call, &function)?;
        let mut buffer = vec![T::default(); size];
        let status = self.driver.get_attribute(call, T::slot(&mut buffer))?;
        self.check(status, &function, Some(call.attribute()))?;
        Ok(buffer)
    }

    /// Writes a `bool32` attribute.
    pub fn set_bool(&self, call: &AttributeCall<'_>, value: bool) -> Result<()> {
        self.set_value(call, value.value())
    }

    /// Writes an `int32` attribute.
    pub fn set_i32(&self, call: &AttributeCall<'_>, value: i32) -> Result<()> {
        self.set_value(call, value.value())
    }

    /// Writes a `uInt32` attribute.
    pub fn set_u32(&self, call: &AttributeCall<'_>, value: u32) -> Result<()> {
        self.set_value(call, value.value())
    }

    /// Writes an `int64` attribute.
    pub fn set_i64(&self, call: &AttributeCall<'_>, value: i64) -> Result<()> {
        self.set_value(call, value.value())
    }

    /// Writes a `uInt64` attribute.
    pub fn set_u64(&self, call: &AttributeCall<'_>, value: u64) -> Result<()> {
        self.set_value(call, value.value())
    }

    /// Writes a `float64` attribute.
    pub fn set_f64(&self, call: &AttributeCall<'_>, value: f64) -> Result<()> {
        self.set_value(call, value.value())
    }

    /// Writes a string attribute.
    pub fn set_string(&self, call: &AttributeCall<'_>, value: &str) -> Result<()> {
        self.set_value(call, AttributeValue::String(value))
    }

    /// Writes a list attribute.
    pub fn set_list<T: ListElement>(&self, call: &AttributeCall<'_>, values: &[T]) -> Result<()> {
        self.set_value(call, T::values(values))
    }

    /// Writes a list of names as one comma-separated string.
    pub fn set_string_list(&self, call: &AttributeCall<'_>, values: &[&str]) -> Result<()> {
        self.set_string(call, &values.join(", "))
    }

    /// Restores an attribute's default.
    pub fn reset(&self, call: &AttributeCall<'_>) -> Result<()> {
        let function = call.function("Reset");
        Self::ensure_handles(call, &function)?;
        let status = self.driver.reset_attribute(call)?;
        self.check(status, &function, Some(call.attribute()))
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn ensure_task(task: TaskHandle, function: &str) -> Result<()> {
        if task.is_null() {
            return Err(Error::EmptyHandle {
                function: function.to_string(),
                component: "task handle",
            });
        }
        Ok(())
    }

    fn ensure_name(name: &str, function: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyHandle {
                function: function.to_string(),
                component: "name",
            });
        }
        Ok(())
    }

    /// `DAQmxCreateTask`. An empty name lets the driver pick one.
    pub fn create_task(&self, name: &str) -> Result<TaskHandle> {
        let (status, handle) = self.driver.create_task(name)?;
        self.check(status, "DAQmxCreateTask", None)?;
        Ok(handle)
    }

    /// `DAQmxLoadTask`
    pub fn load_task(&self, name: &str) -> Result<TaskHandle> {
        Self::ensure_name(name, "DAQmxLoadTask")?;
        let (status, handle) = self.driver.load_task(name)?;
        self.check(status, "DAQmxLoadTask", None)?;
        Ok(handle)
    }

    /// Entry points taking only a task handle.
    pub fn task_call(&self, call: TaskCall, task: TaskHandle) -> Result<()> {
        Self::ensure_task(task, call.function())?;
        let status = self.driver.task_call(call, task)?;
        self.check(status, call.function(), None)
    }

    /// `DAQmxTaskControl`
    pub fn task_control(&self, task: TaskHandle, action: TaskMode) -> Result<()> {
        Self::ensure_task(task, "DAQmxTaskControl")?;
        let status = self.driver.task_control(task, action.value())?;
        self.check(status, "DAQmxTaskControl", None)
    }

    /// `DAQmxWaitUntilTaskDone`; negative `timeout` waits forever.
    pub fn wait_until_task_done(&self, task: TaskHandle, timeout: f64) -> Result<()> {
        Self::ensure_task(task, "DAQmxWaitUntilTaskDone")?;
        let status = self.driver.wait_until_task_done(task, timeout)?;
        self.check(status, "DAQmxWaitUntilTaskDone", None)
    }

    /// `DAQmxIsTaskDone`
    pub fn is_task_done(&self, task: TaskHandle) -> Result<bool> {
        Self::ensure_task(task, "DAQmxIsTaskDone")?;
        let (status, done) = self.driver.is_task_done(task)?;
        self.check(status, "DAQmxIsTaskDone", None)?;
        Ok(done)
    }

    /// `DAQmxSaveTask`
    pub fn save_task(&self, task: TaskHandle, save_as: &str, author: &str, options: u32) -> Result<()> {
        Self::ensure_task(task, "DAQmxSaveTask")?;
        let status = self.driver.save_task(task, save_as, author, options)?;
        self.check(status, "DAQmxSaveTask", None)
    }

    /// `DAQmxAddGlobalChansToTask`
    pub fn add_global_chans_to_task(&self, task: TaskHandle, channels: &str) -> Result<()> {
        Self::ensure_task(task, "DAQmxAddGlobalChansToTask")?;
        let status = self.driver.add_global_chans_to_task(task, channels)?;
        self.check(status, "DAQmxAddGlobalChansToTask", None)
    }

    /// `DAQmxCreate*Chan`
    pub fn create_channel(&self, task: TaskHandle, spec: &CreateChannel<'_>) -> Result<()> {
        Self::ensure_task(task, spec.function())?;
        let status = self.driver.create_channel(task, spec)?;
        self.check(status, spec.function(), None)
    }

    /// `DAQmxCfg*`
    pub fn configure(&self, task: TaskHandle, spec: &Configure<'_>) -> Result<()> {
        Self::ensure_task(task, spec.function())?;
        let status = self.driver.configure(task, spec)?;
        self.check(status, spec.function(), None)
    }

    /// Entry points taking only an object name.
    pub fn named_call(&self, call: NamedCall, name: &str) -> Result<()> {
        Self::ensure_name(name, call.function())?;
        let status = self.driver.named_call(call, name)?;
        self.check(status, call.function(), None)
    }

    /// `DAQmxCreateLinScale`
    pub fn create_lin_scale(
        &self,
        name: &str,
        slope: f64,
        y_intercept: f64,
        pre_scaled_units: i32,
        scaled_units: &str,
    ) -> Result<()> {
        let status = self
            .driver
            .create_lin_scale(name, slope, y_intercept, pre_scaled_units, scaled_units)?;
        self.check(status, "DAQmxCreateLinScale", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_call_names_its_entry_points() {
        let handles = [HandleArg::Task(TaskHandle::from_raw(1)), HandleArg::Name("ai0")];
        let call = AttributeCall::new("ChanAttribute", &handles, 0x1801);
        assert_eq!(call.function("Get"), "DAQmxGetChanAttribute");
        assert_eq!(call.function("Reset"), "DAQmxResetChanAttribute");
        assert_eq!(call.handles().len(), 2);
    }

    #[test]
    fn c_string_stops_at_nul() {
        assert_eq!(c_string(b"Dev1\0junk"), "Dev1");
        assert_eq!(c_string(b"Dev1"), "Dev1");
    }

    #[test]
    fn size_change_statuses() {
        assert!(is_size_change(-200228));
        assert!(is_size_change(-200229));
        assert!(is_size_change(200026));
        assert!(!is_size_change(-200077));
    }
}
