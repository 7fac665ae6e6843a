//! Low-level declarations for the NI-DAQmx C API.
//!
//! The driver library is not linked at build time. Instead [`Library`]
//! opens `nicaiu.dll` / `libnidaqmx.so` at runtime and resolves each entry
//! point by name, so crates depending on this one build on machines that
//! have no NI software installed.
//!
//! # Attribute families
//!
//! Every attribute is reached through one of a small number of variadic
//! entry points, `DAQmxGet<stem>`, `DAQmxSet<stem>` and `DAQmxReset<stem>`,
//! where the stem names the owning family (`ChanAttribute`,
//! `TimingAttribute`, ...). The leading handle arguments differ per family;
//! the four shapes in use are covered by the `*System*`, `*Task*`,
//! `*Named*` and `*Chan*` function-pointer types below.
//!
//! # Safety
//!
//! All function pointers in this crate are raw FFI entry points. For a safe
//! wrapper, use the `daqmx` crate instead.
//!
//! # Example (unsafe)
//!
//! ```no_run
//! use daqmx_sys::{Library, CreateTaskFn, TaskHandle};
//! use std::ffi::CString;
//! use std::ptr;
//!
//! let lib = Library::open(daqmx_sys::DEFAULT_LIBRARY_NAME).unwrap();
//! unsafe {
//!     let create: CreateTaskFn = lib.symbol("DAQmxCreateTask").unwrap();
//!     let name = CString::new("").unwrap();
//!     let mut task: TaskHandle = ptr::null_mut();
//!     let status = create(name.as_ptr(), &mut task);
//!     println!("DAQmxCreateTask returned {status}");
//! }
//! ```

#![allow(non_camel_case_types)]
#![allow(unsafe_code)]

mod library;

pub use library::{Library, LoadError};

use std::os::raw::{c_char, c_void};

/// Signed 32-bit integer as declared by `NIDAQmx.h`.
pub type int32 = i32;
/// Unsigned 32-bit integer as declared by `NIDAQmx.h`.
pub type uInt32 = u32;
/// Signed 64-bit integer as declared by `NIDAQmx.h`.
pub type int64 = i64;
/// Unsigned 64-bit integer as declared by `NIDAQmx.h`.
pub type uInt64 = u64;
/// 64-bit float as declared by `NIDAQmx.h`.
pub type float64 = f64;
/// Boolean carried as a 32-bit integer; any non-zero value is true.
pub type bool32 = u32;

/// Opaque task handle owned by the driver.
pub type TaskHandle = *mut c_void;

/// Library file name searched for when no explicit path is configured.
#[cfg(windows)]
pub const DEFAULT_LIBRARY_NAME: &str = "nicaiu.dll";
/// Library file name searched for when no explicit path is configured.
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY_NAME: &str = "nidaqmx.framework/nidaqmx";
/// Library file name searched for when no explicit path is configured.
#[cfg(all(unix, not(target_os = "macos")))]
pub const DEFAULT_LIBRARY_NAME: &str = "libnidaqmx.so.1";

/// `DAQmx_Val_WaitInfinitely`
pub const DAQMX_VAL_WAIT_INFINITELY: float64 = -1.0;
/// `DAQmx_Val_Cfg_Default`
pub const DAQMX_VAL_CFG_DEFAULT: int32 = -1;

// ============================================================================
// Attribute families
// ============================================================================

/// `DAQmxGet<stem>(int32 attribute, void *value, ...)`
pub type GetSystemAttributeFn = unsafe extern "C" fn(attribute: int32, value: *mut c_void, ...) -> int32;
/// `DAQmxGet<stem>(TaskHandle task, int32 attribute, void *value, ...)`
pub type GetTaskAttributeFn =
    unsafe extern "C" fn(task: TaskHandle, attribute: int32, value: *mut c_void, ...) -> int32;
/// `DAQmxGet<stem>(const char name[], int32 attribute, void *value, ...)`
pub type GetNamedAttributeFn =
    unsafe extern "C" fn(name: *const c_char, attribute: int32, value: *mut c_void, ...) -> int32;
/// `DAQmxGet<stem>(TaskHandle task, const char channel[], int32 attribute, void *value, ...)`
pub type GetChanAttributeFn = unsafe extern "C" fn(
    task: TaskHandle,
    channel: *const c_char,
    attribute: int32,
    value: *mut c_void,
    ...
) -> int32;

/// `DAQmxSet<stem>(int32 attribute, ...)`
pub type SetSystemAttributeFn = unsafe extern "C" fn(attribute: int32, ...) -> int32;
/// `DAQmxSet<stem>(TaskHandle task, int32 attribute, ...)`
pub type SetTaskAttributeFn = unsafe extern "C" fn(task: TaskHandle, attribute: int32, ...) -> int32;
/// `DAQmxSet<stem>(const char name[], int32 attribute, ...)`
pub type SetNamedAttributeFn = unsafe extern "C" fn(name: *const c_char, attribute: int32, ...) -> int32;
/// `DAQmxSet<stem>(TaskHandle task, const char channel[], int32 attribute, ...)`
pub type SetChanAttributeFn =
    unsafe extern "C" fn(task: TaskHandle, channel: *const c_char, attribute: int32, ...) -> int32;

/// `DAQmxReset<stem>(int32 attribute)`
pub type ResetSystemAttributeFn = unsafe extern "C" fn(attribute: int32) -> int32;
/// `DAQmxReset<stem>(TaskHandle task, int32 attribute)`
pub type ResetTaskAttributeFn = unsafe extern "C" fn(task: TaskHandle, attribute: int32) -> int32;
/// `DAQmxReset<stem>(const char name[], int32 attribute)`
pub type ResetNamedAttributeFn = unsafe extern "C" fn(name: *const c_char, attribute: int32) -> int32;
/// `DAQmxReset<stem>(TaskHandle task, const char channel[], int32 attribute)`
pub type ResetChanAttributeFn =
    unsafe extern "C" fn(task: TaskHandle, channel: *const c_char, attribute: int32) -> int32;

/// Builds the exported symbol name of an attribute entry point, e.g.
/// `attribute_symbol("Get", "ChanAttribute")` is `DAQmxGetChanAttribute`.
pub fn attribute_symbol(verb: &str, stem: &str) -> String {
    format!("DAQmx{verb}{stem}")
}

// ============================================================================
// Task lifecycle
// ============================================================================

/// `DAQmxCreateTask` / `DAQmxLoadTask`
pub type CreateTaskFn = unsafe extern "C" fn(name: *const c_char, task: *mut TaskHandle) -> int32;
/// `DAQmxClearTask`, `DAQmxStartTask`, `DAQmxStopTask`, `DAQmxDisableStartTrig`, `DAQmxDisableRefTrig`
pub type TaskFn = unsafe extern "C" fn(task: TaskHandle) -> int32;
/// `DAQmxTaskControl`
pub type TaskControlFn = unsafe extern "C" fn(task: TaskHandle, action: int32) -> int32;
/// `DAQmxWaitUntilTaskDone`
pub type WaitUntilTaskDoneFn = unsafe extern "C" fn(task: TaskHandle, timeout: float64) -> int32;
/// `DAQmxIsTaskDone`
pub type IsTaskDoneFn = unsafe extern "C" fn(task: TaskHandle, done: *mut bool32) -> int32;
/// `DAQmxSaveTask`
pub type SaveTaskFn = unsafe extern "C" fn(
    task: TaskHandle,
    save_as: *const c_char,
    author: *const c_char,
    options: uInt32,
) -> int32;
/// `DAQmxAddGlobalChansToTask`
pub type AddGlobalChansToTaskFn = unsafe extern "C" fn(task: TaskHandle, channels: *const c_char) -> int32;

// ============================================================================
// Channel creation
// ============================================================================

/// `DAQmxCreateAIVoltageChan`
pub type CreateAIVoltageChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    physical_channel: *const c_char,
    name_to_assign: *const c_char,
    terminal_config: int32,
    min_val: float64,
    max_val: float64,
    units: int32,
    custom_scale_name: *const c_char,
) -> int32;
/// `DAQmxCreateAICurrentChan`
pub type CreateAICurrentChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    physical_channel: *const c_char,
    name_to_assign: *const c_char,
    terminal_config: int32,
    min_val: float64,
    max_val: float64,
    units: int32,
    shunt_resistor_loc: int32,
    ext_shunt_resistor_val: float64,
    custom_scale_name: *const c_char,
) -> int32;
/// `DAQmxCreateAIThrmcplChan`
pub type CreateAIThrmcplChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    physical_channel: *const c_char,
    name_to_assign: *const c_char,
    min_val: float64,
    max_val: float64,
    units: int32,
    thermocouple_type: int32,
    cjc_source: int32,
    cjc_val: float64,
    cjc_channel: *const c_char,
) -> int32;
/// `DAQmxCreateAOVoltageChan` / `DAQmxCreateAOCurrentChan`
pub type CreateAOChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    physical_channel: *const c_char,
    name_to_assign: *const c_char,
    min_val: float64,
    max_val: float64,
    units: int32,
    custom_scale_name: *const c_char,
) -> int32;
/// `DAQmxCreateCICountEdgesChan`
pub type CreateCICountEdgesChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    counter: *const c_char,
    name_to_assign: *const c_char,
    edge: int32,
    initial_count: uInt32,
    count_direction: int32,
) -> int32;
/// `DAQmxCreateCIFreqChan`
pub type CreateCIFreqChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    counter: *const c_char,
    name_to_assign: *const c_char,
    min_val: float64,
    max_val: float64,
    units: int32,
    edge: int32,
    meas_method: int32,
    meas_time: float64,
    divisor: uInt32,
    custom_scale_name: *const c_char,
) -> int32;
/// `DAQmxCreateCOPulseChanFreq`
pub type CreateCOPulseChanFreqFn = unsafe extern "C" fn(
    task: TaskHandle,
    counter: *const c_char,
    name_to_assign: *const c_char,
    units: int32,
    idle_state: int32,
    initial_delay: float64,
    freq: float64,
    duty_cycle: float64,
) -> int32;
/// `DAQmxCreateCOPulseChanTime`
pub type CreateCOPulseChanTimeFn = unsafe extern "C" fn(
    task: TaskHandle,
    counter: *const c_char,
    name_to_assign: *const c_char,
    units: int32,
    idle_state: int32,
    initial_delay: float64,
    low_time: float64,
    high_time: float64,
) -> int32;
/// `DAQmxCreateDIChan` / `DAQmxCreateDOChan`
pub type CreateDigitalChanFn = unsafe extern "C" fn(
    task: TaskHandle,
    lines: *const c_char,
    name_to_assign: *const c_char,
    line_grouping: int32,
) -> int32;

// ============================================================================
// Timing and triggering
// ============================================================================

/// `DAQmxCfgSampClkTiming`
pub type CfgSampClkTimingFn = unsafe extern "C" fn(
    task: TaskHandle,
    source: *const c_char,
    rate: float64,
    active_edge: int32,
    sample_mode: int32,
    samps_per_chan: uInt64,
) -> int32;
/// `DAQmxCfgImplicitTiming`
pub type CfgImplicitTimingFn =
    unsafe extern "C" fn(task: TaskHandle, sample_mode: int32, samps_per_chan: uInt64) -> int32;
/// `DAQmxCfgDigEdgeStartTrig`
pub type CfgDigEdgeStartTrigFn =
    unsafe extern "C" fn(task: TaskHandle, trigger_source: *const c_char, trigger_edge: int32) -> int32;
/// `DAQmxCfgAnlgEdgeStartTrig`
pub type CfgAnlgEdgeStartTrigFn = unsafe extern "C" fn(
    task: TaskHandle,
    trigger_source: *const c_char,
    trigger_slope: int32,
    trigger_level: float64,
) -> int32;
/// `DAQmxCfgDigEdgeRefTrig`
pub type CfgDigEdgeRefTrigFn = unsafe extern "C" fn(
    task: TaskHandle,
    trigger_source: *const c_char,
    trigger_edge: int32,
    pretrigger_samples: uInt32,
) -> int32;

// ============================================================================
// System, devices, scales and persisted objects
// ============================================================================

/// `DAQmxResetDevice`, `DAQmxSelfTestDevice`, `DAQmxDeleteSavedTask`,
/// `DAQmxDeleteSavedGlobalChan`, `DAQmxDeleteSavedScale`
pub type NamedFn = unsafe extern "C" fn(name: *const c_char) -> int32;
/// `DAQmxCreateLinScale`
pub type CreateLinScaleFn = unsafe extern "C" fn(
    name: *const c_char,
    slope: float64,
    y_intercept: float64,
    pre_scaled_units: int32,
    scaled_units: *const c_char,
) -> int32;

// ============================================================================
// Error reporting
// ============================================================================

/// `DAQmxGetErrorString`
pub type GetErrorStringFn =
    unsafe extern "C" fn(error_code: int32, buffer: *mut c_char, buffer_size: uInt32) -> int32;
/// `DAQmxGetExtendedErrorInfo`
pub type GetExtendedErrorInfoFn = unsafe extern "C" fn(buffer: *mut c_char, buffer_size: uInt32) -> int32;
