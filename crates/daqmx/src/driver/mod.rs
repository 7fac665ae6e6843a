//! The boundary between the interpreter and the driver.
//!
//! [`DriverApi`] mirrors the C entry points one to one: every method
//! returns the raw status (zero, a positive warning, a negative error, or a
//! required buffer size for probes) and leaves interpretation to
//! [`crate::interpreter::Interpreter`]. An `Err` means the call never
//! reached the driver.
//!
//! [`LibraryDriver`] calls the real library. The `daqmx-mock` crate
//! provides an in-memory implementation for tests and machines without NI
//! hardware.

mod library;

pub use library::LibraryDriver;

use crate::error::Result;
use crate::interpreter::AttributeCall;
use crate::TaskHandle;

/// Destination of an attribute read.
///
/// Buffer variants pass their length as the buffer size; an empty buffer
/// asks the driver for the required size.
#[derive(Debug)]
pub enum AttributeValueMut<'a> {
    /// `bool32`
    Bool(&'a mut bool),
    /// `int32`
    I32(&'a mut i32),
    /// `uInt32`
    U32(&'a mut u32),
    /// `int64`
    I64(&'a mut i64),
    /// `uInt64`
    U64(&'a mut u64),
    /// `float64`
    F64(&'a mut f64),
    /// NUL-terminated string buffer.
    Bytes(&'a mut [u8]),
    /// `int32[]`
    I32List(&'a mut [i32]),
    /// `uInt32[]`
    U32List(&'a mut [u32]),
    /// `int64[]`
    I64List(&'a mut [i64]),
    /// `uInt64[]`
    U64List(&'a mut [u64]),
    /// `float64[]`
    F64List(&'a mut [f64]),
}

impl AttributeValueMut<'_> {
    /// Buffer length for buffer variants, `None` for scalars.
    #[must_use]
    pub fn buffer_len(&self) -> Option<usize> {
        match self {
            Self::Bytes(b) => Some(b.len()),
            Self::I32List(b) => Some(b.len()),
            Self::U32List(b) => Some(b.len()),
            Self::I64List(b) => Some(b.len()),
            Self::U64List(b) => Some(b.len()),
            Self::F64List(b) => Some(b.len()),
            _ => None,
        }
    }
}

/// Value of an attribute write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    /// `bool32`
    Bool(bool),
    /// `int32`
    I32(i32),
    /// `uInt32`
    U32(u32),
    /// `int64`
    I64(i64),
    /// `uInt64`
    U64(u64),
    /// `float64`
    F64(f64),
    /// A string, converted to a C string by the driver layer.
    String(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
    /// `int32[]`
    I32List(&'a [i32]),
    /// `uInt32[]`
    U32List(&'a [u32]),
    /// `int64[]`
    I64List(&'a [i64]),
    /// `uInt64[]`
    U64List(&'a [u64]),
    /// `float64[]`
    F64List(&'a [f64]),
}

/// Entry points taking only a task handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskCall {
    /// `DAQmxClearTask`
    Clear,
    /// `DAQmxStartTask`
    Start,
    /// `DAQmxStopTask`
    Stop,
    /// `DAQmxDisableStartTrig`
    DisableStartTrig,
    /// `DAQmxDisableRefTrig`
    DisableRefTrig,
}

impl TaskCall {
    /// Exported symbol name.
    #[must_use]
    pub fn function(self) -> &'static str {
        match self {
            Self::Clear => "DAQmxClearTask",
            Self::Start => "DAQmxStartTask",
            Self::Stop => "DAQmxStopTask",
            Self::DisableStartTrig => "DAQmxDisableStartTrig",
            Self::DisableRefTrig => "DAQmxDisableRefTrig",
        }
    }
}

/// Entry points taking only an object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCall {
    /// `DAQmxResetDevice`
    ResetDevice,
    /// `DAQmxSelfTestDevice`
    SelfTestDevice,
    /// `DAQmxDeleteSavedTask`
    DeleteSavedTask,
    /// `DAQmxDeleteSavedGlobalChan`
    DeleteSavedGlobalChan,
    /// `DAQmxDeleteSavedScale`
    DeleteSavedScale,
}

impl NamedCall {
    /// Exported symbol name.
    #[must_use]
    pub fn function(self) -> &'static str {
        match self {
            Self::ResetDevice => "DAQmxResetDevice",
            Self::SelfTestDevice => "DAQmxSelfTestDevice",
            Self::DeleteSavedTask => "DAQmxDeleteSavedTask",
            Self::DeleteSavedGlobalChan => "DAQmxDeleteSavedGlobalChan",
            Self::DeleteSavedScale => "DAQmxDeleteSavedScale",
        }
    }
}

/// Arguments of a `DAQmxCreate*Chan` call, after the task handle.
///
/// Enum-typed arguments are carried as their raw driver values.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreateChannel<'a> {
    AIVoltage {
        physical_channel: &'a str,
        name_to_assign: &'a str,
        terminal_config: i32,
        min_val: f64,
        max_val: f64,
        units: i32,
        custom_scale_name: &'a str,
    },
    AICurrent {
        physical_channel: &'a str,
        name_to_assign: &'a str,
        terminal_config: i32,
        min_val: f64,
        max_val: f64,
        units: i32,
        shunt_resistor_loc: i32,
        ext_shunt_resistor_val: f64,
        custom_scale_name: &'a str,
    },
    AIThrmcpl {
        physical_channel: &'a str,
        name_to_assign: &'a str,
        min_val: f64,
        max_val: f64,
        units: i32,
        thermocouple_type: i32,
        cjc_source: i32,
        cjc_val: f64,
        cjc_channel: &'a str,
    },
    AOVoltage {
        physical_channel: &'a str,
        name_to_assign: &'a str,
        min_val: f64,
        max_val: f64,
        units: i32,
        custom_scale_name: &'a str,
    },
    AOCurrent {
        physical_channel: &'a str,
        name_to_assign: &'a str,
        min_val: f64,
        max_val: f64,
        units: i32,
        custom_scale_name: &'a str,
    },
    CICountEdges {
        counter: &'a str,
        name_to_assign: &'a str,
        edge: i32,
        initial_count: u32,
        count_direction: i32,
    },
    CIFreq {
        counter: &'a str,
        name_to_assign: &'a str,
        min_val: f64,
        max_val: f64,
        units: i32,
        edge: i32,
        meas_method: i32,
        meas_time: f64,
        divisor: u32,
        custom_scale_name: &'a str,
    },
    COPulseFreq {
        counter: &'a str,
        name_to_assign: &'a str,
        units: i32,
        idle_state: i32,
        initial_delay: f64,
        freq: f64,
        duty_cycle: f64,
    },
    COPulseTime {
        counter: &'a str,
        name_to_assign: &'a str,
        units: i32,
        idle_state: i32,
        initial_delay: f64,
        low_time: f64,
        high_time: f64,
    },
    DI {
        lines: &'a str,
        name_to_assign: &'a str,
        line_grouping: i32,
    },
    DO {
        lines: &'a str,
        name_to_assign: &'a str,
        line_grouping: i32,
    },
}

impl CreateChannel<'_> {
    /// Exported symbol name.
    #[must_use]
    pub fn function(&self) -> &'static str {
        match self {
            Self::AIVoltage { .. } => "DAQmxCreateAIVoltageChan",
            Self::AICurrent { .. } => "DAQmxCreateAICurrentChan",
            Self::AIThrmcpl { .. } => "DAQmxCreateAIThrmcplChan",
            Self::AOVoltage { .. } => "DAQmxCreateAOVoltageChan",
            Self::AOCurrent { .. } => "DAQmxCreateAOCurrentChan",
            Self::CICountEdges { .. } => "DAQmxCreateCICountEdgesChan",
            Self::CIFreq { .. } => "DAQmxCreateCIFreqChan",
            Self::COPulseFreq { .. } => "DAQmxCreateCOPulseChanFreq",
            Self::COPulseTime { .. } => "DAQmxCreateCOPulseChanTime",
            Self::DI { .. } => "DAQmxCreateDIChan",
            Self::DO { .. } => "DAQmxCreateDOChan",
        }
    }

    /// The terminal, counter or line string the channels are created on.
    #[must_use]
    pub fn physical_channel(&self) -> &str {
        match *self {
            Self::AIVoltage { physical_channel, .. }
            | Self::AICurrent { physical_channel, .. }
            | Self::AIThrmcpl { physical_channel, .. }
            | Self::AOVoltage { physical_channel, .. }
            | Self::AOCurrent { physical_channel, .. } => physical_channel,
            Self::CICountEdges { counter, .. }
            | Self::CIFreq { counter, .. }
            | Self::COPulseFreq { counter, .. }
            | Self::COPulseTime { counter, .. } => counter,
            Self::DI { lines, .. } | Self::DO { lines, .. } => lines,
        }
    }

    /// The requested virtual channel name; empty to use the physical names.
    #[must_use]
    pub fn name_to_assign(&self) -> &str {
        match *self {
            Self::AIVoltage { name_to_assign, .. }
            | Self::AICurrent { name_to_assign, .. }
            | Self::AIThrmcpl { name_to_assign, .. }
            | Self::AOVoltage { name_to_assign, .. }
            | Self::AOCurrent { name_to_assign, .. }
            | Self::CICountEdges { name_to_assign, .. }
            | Self::CIFreq { name_to_assign, .. }
            | Self::COPulseFreq { name_to_assign, .. }
            | Self::COPulseTime { name_to_assign, .. }
            | Self::DI { name_to_assign, .. }
            | Self::DO { name_to_assign, .. } => name_to_assign,
        }
    }
}

/// Arguments of a timing or trigger configuration call, after the task
/// handle.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Configure<'a> {
    SampClkTiming {
        source: &'a str,
        rate: f64,
        active_edge: i32,
        sample_mode: i32,
        samps_per_chan: u64,
    },
    ImplicitTiming {
        sample_mode: i32,
        samps_per_chan: u64,
    },
    DigEdgeStartTrig {
        source: &'a str,
        edge: i32,
    },
    AnlgEdgeStartTrig {
        source: &'a str,
        slope: i32,
        level: f64,
    },
    DigEdgeRefTrig {
        source: &'a str,
        edge: i32,
        pretrigger_samples: u32,
    },
}

impl Configure<'_> {
    /// Exported symbol name.
    #[must_use]
    pub fn function(&self) -> &'static str {
        match self {
            Self::SampClkTiming { .. } => "DAQmxCfgSampClkTiming",
            Self::ImplicitTiming { .. } => "DAQmxCfgImplicitTiming",
            Self::DigEdgeStartTrig { .. } => "DAQmxCfgDigEdgeStartTrig",
            Self::AnlgEdgeStartTrig { .. } => "DAQmxCfgAnlgEdgeStartTrig",
            Self::DigEdgeRefTrig { .. } => "DAQmxCfgDigEdgeRefTrig",
        }
    }
}

/// The driver entry points the façade uses.
pub trait DriverApi: Send + Sync + std::fmt::Debug {
    /// `DAQmxGet<stem>`
    fn get_attribute(&self, call: &AttributeCall<'_>, value: AttributeValueMut<'_>) -> Result<i32>;

    /// `DAQmxSet<stem>`
    fn set_attribute(&self, call: &AttributeCall<'_>, value: AttributeValue<'_>) -> Result<i32>;

    /// `DAQmxReset<stem>`
    fn reset_attribute(&self, call: &AttributeCall<'_>) -> Result<i32>;

    /// `DAQmxCreateTask`
    fn create_task(&self, name: &str) -> Result<(i32, TaskHandle)>;

    /// `DAQmxLoadTask`
    fn load_task(&self, name: &str) -> Result<(i32, TaskHandle)>;

    /// Entry points taking only the task handle.
    fn task_call(&self, call: TaskCall, task: TaskHandle) -> Result<i32>;

    /// `DAQmxTaskControl`
    fn task_control(&self, task: TaskHandle, action: i32) -> Result<i32>;

    /// `DAQmxWaitUntilTaskDone`; negative `timeout` waits forever.
    fn wait_until_task_done(&self, task: TaskHandle, timeout: f64) -> Result<i32>;

    /// `DAQmxIsTaskDone`
    fn is_task_done(&self, task: TaskHandle) -> Result<(i32, bool)>;

    /// `DAQmxSaveTask`
    fn save_task(&self, task: TaskHandle, save_as: &str, author: &str, options: u32) -> Result<i32>;

    /// `DAQmxAddGlobalChansToTask`
    fn add_global_chans_to_task(&self, task: TaskHandle, channels: &str) -> Result<i32>;

    /// `DAQmxCreate*Chan`
    fn create_channel(&self, task: TaskHandle, spec: &CreateChannel<'_>) -> Result<i32>;

    /// `DAQmxCfg*`
    fn configure(&self, task: TaskHandle, spec: &Configure<'_>) -> Result<i32>;

    /// Entry points taking only an object name.
    fn named_call(&self, call: NamedCall, name: &str) -> Result<i32>;

    /// `DAQmxCreateLinScale`
    fn create_lin_scale(
        &self,
        name: &str,
        slope: f64,
        y_intercept: f64,
        pre_scaled_units: i32,
        scaled_units: &str,
    ) -> Result<i32>;

    /// `DAQmxGetErrorString`; an empty buffer asks for the size.
    fn error_string(&self, code: i32, buffer: &mut [u8]) -> Result<i32>;

    /// `DAQmxGetExtendedErrorInfo`; an empty buffer asks for the size.
    fn extended_error_info(&self, buffer: &mut [u8]) -> Result<i32>;
}
