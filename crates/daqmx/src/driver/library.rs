//! [`DriverApi`] over the dynamically loaded NI-DAQmx library.

#![allow(unsafe_code)]

use std::collections::HashMap;
use std::ffi::{c_void, CString};
use std::path::Path;
use std::ptr;

use daqmx_sys as sys;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{AttributeValue, AttributeValueMut, Configure, CreateChannel, DriverApi, NamedCall, TaskCall};
use crate::error::{Error, Result};
use crate::interpreter::{AttributeCall, HandleArg};
use crate::TaskHandle;

fn c_string(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidString(s.to_string()))
}

fn raw_task(task: TaskHandle) -> sys::TaskHandle {
    task.as_raw() as sys::TaskHandle
}

fn buffer_size(len: usize) -> sys::uInt32 {
    sys::uInt32::try_from(len).unwrap_or(sys::uInt32::MAX)
}

/// Null for an empty buffer, so the driver treats the call as a size probe.
fn buffer_ptr<T>(buffer: &mut [T]) -> *mut c_void {
    if buffer.is_empty() {
        ptr::null_mut()
    } else {
        buffer.as_mut_ptr().cast()
    }
}

/// The leading arguments of an attribute entry point.
enum Shape {
    System,
    Task(sys::TaskHandle),
    Named(CString),
    Chan(sys::TaskHandle, CString),
}

impl Shape {
    fn of(call: &AttributeCall<'_>, function: &str) -> Result<Self> {
        match call.handles() {
            [] => Ok(Self::System),
            [HandleArg::Task(task)] => Ok(Self::Task(raw_task(*task))),
            [HandleArg::Name(name)] => Ok(Self::Named(c_string(name)?)),
            [HandleArg::Task(task), HandleArg::Name(name)] => {
                Ok(Self::Chan(raw_task(*task), c_string(name)?))
            }
            _ => Err(Error::InvalidHandles {
                function: function.to_string(),
            }),
        }
    }
}

/// Calls `DAQmxGet<stem>` through the entry point matching `$shape`.
macro_rules! get_attribute {
    ($driver:expr, $shape:expr, $function:expr, $attribute:expr, $($arg:expr),+) => {
        // SAFETY: the symbol is the `DAQmxGet<stem>` entry point whose
        // leading arguments are described by `$shape`, and every pointer
        // argument outlives the call.
        unsafe {
            match $shape {
                Shape::System => {
                    let f: sys::GetSystemAttributeFn = $driver.symbol($function)?;
                    f($attribute, $($arg),+)
                }
                Shape::Task(task) => {
                    let f: sys::GetTaskAttributeFn = $driver.symbol($function)?;
                    f(*task, $attribute, $($arg),+)
                }
                Shape::Named(name) => {
                    let f: sys::GetNamedAttributeFn = $driver.symbol($function)?;
                    f(name.as_ptr(), $attribute, $($arg),+)
                }
                Shape::Chan(task, name) => {
                    let f: sys::GetChanAttributeFn = $driver.symbol($function)?;
                    f(*task, name.as_ptr(), $attribute, $($arg),+)
                }
            }
        }
    };
}

/// Calls `DAQmxSet<stem>` through the entry point matching `$shape`.
macro_rules! set_attribute {
    ($driver:expr, $shape:expr, $function:expr, $attribute:expr, $($arg:expr),+) => {
        // SAFETY: as for `get_attribute!`; the value is passed by value or
        // as a pointer into a live buffer.
        unsafe {
            match $shape {
                Shape::System => {
                    let f: sys::SetSystemAttributeFn = $driver.symbol($function)?;
                    f($attribute, $($arg),+)
                }
                Shape::Task(task) => {
                    let f: sys::SetTaskAttributeFn = $driver.symbol($function)?;
                    f(*task, $attribute, $($arg),+)
                }
                Shape::Named(name) => {
                    let f: sys::SetNamedAttributeFn = $driver.symbol($function)?;
                    f(name.as_ptr(), $attribute, $($arg),+)
                }
                Shape::Chan(task, name) => {
                    let f: sys::SetChanAttributeFn = $driver.symbol($function)?;
                    f(*task, name.as_ptr(), $attribute, $($arg),+)
                }
            }
        }
    };
}

/// Calls into the NI-DAQmx shared library.
///
/// Entry points are resolved on first use and cached by name.
#[derive(Debug)]
pub struct LibraryDriver {
    library: sys::Library,
    symbols: Mutex<HashMap<String, usize>>,
}

impl LibraryDriver {
    /// Opens the library at `path`, or by bare name through the platform
    /// search path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let library = sys::Library::open(path)?;
        info!(path = library.path(), "opened NI-DAQmx library");
        Ok(Self {
            library,
            symbols: Mutex::new(HashMap::new()),
        })
    }

    fn address(&self, name: &str) -> Result<*mut c_void> {
        let mut symbols = self.symbols.lock();
        if let Some(&address) = symbols.get(name) {
            return Ok(address as *mut c_void);
        }
        let raw = self.library.raw_symbol(name)?;
        debug!(symbol = name, "resolved entry point");
        symbols.insert(name.to_string(), raw as usize);
        Ok(raw)
    }

    /// # Safety
    ///
    /// `T` must be the function-pointer type of the symbol `name`.
    unsafe fn symbol<T: Copy>(&self, name: &str) -> Result<T> {
        let raw = self.address(name)?;
        Ok(std::mem::transmute_copy(&raw))
    }

    fn task_fn(&self, name: &str, task: TaskHandle) -> Result<i32> {
        // SAFETY: `name` is one of the entry points typed `TaskFn`.
        unsafe {
            let f: sys::TaskFn = self.symbol(name)?;
            Ok(f(raw_task(task)))
        }
    }

    fn task_handle_fn(&self, symbol: &str, name: &str) -> Result<(i32, TaskHandle)> {
        let name = c_string(name)?;
        let mut raw: sys::TaskHandle = ptr::null_mut();
        // SAFETY: `symbol` is typed `CreateTaskFn`; `raw` outlives the call.
        let status = unsafe {
            let f: sys::CreateTaskFn = self.symbol(symbol)?;
            f(name.as_ptr(), &mut raw)
        };
        Ok((status, TaskHandle::from_raw(raw as usize)))
    }
}

impl DriverApi for LibraryDriver {
    fn get_attribute(&self, call: &AttributeCall<'_>, value: AttributeValueMut<'_>) -> Result<i32> {
        let function = call.function("Get");
        let shape = Shape::of(call, &function)?;
        let attribute = call.attribute();

        let status = match value {
            AttributeValueMut::Bool(out) => {
                let mut flag: sys::bool32 = 0;
                let ptr: *mut c_void = ptr::addr_of_mut!(flag).cast();
                let status = get_attribute!(self, &shape, &function, attribute, ptr);
                *out = flag != 0;
                status
            }
            AttributeValueMut::I32(out) => {
                let ptr: *mut c_void = ptr::from_mut(out).cast();
                get_attribute!(self, &shape, &function, attribute, ptr)
            }
            AttributeValueMut::U32(out) => {
                let ptr: *mut c_void = ptr::from_mut(out).cast();
                get_attribute!(self, &shape, &function, attribute, ptr)
            }
            AttributeValueMut::I64(out) => {
                let ptr: *mut c_void = ptr::from_mut(out).cast();
                get_attribute!(self, &shape, &function, attribute, ptr)
            }
            AttributeValueMut::U64(out) => {
                let ptr: *mut c_void = ptr::from_mut(out).cast();
                get_attribute!(self, &shape, &function, attribute, ptr)
            }
            AttributeValueMut::F64(out) => {
                let ptr: *mut c_void = ptr::from_mut(out).cast();
                get_attribute!(self, &shape, &function, attribute, ptr)
            }
            AttributeValueMut::Bytes(buffer) => {
                let size = buffer_size(buffer.len());
                let ptr = buffer_ptr(buffer);
                get_attribute!(self, &shape, &function, attribute, ptr, size)
            }
            AttributeValueMut::I32List(buffer) => {
                let size = buffer_size(buffer.len());
                let ptr = buffer_ptr(buffer);
                get_attribute!(self, &shape, &function, attribute, ptr, size)
            }
            AttributeValueMut::U32List(buffer) => {
                let size = buffer_size(buffer.len());
                let ptr = buffer_ptr(buffer);
                get_attribute!(self, &shape, &function, attribute, ptr, size)
            }
            AttributeValueMut::I64List(buffer) => {
                let size = buffer_size(buffer.len());
                let ptr = buffer_ptr(buffer);
                get_attribute!(self, &shape, &function, attribute, ptr, size)
            }
            AttributeValueMut::U64List(buffer) => {
                let size = buffer_size(buffer.len());
                let ptr = buffer_ptr(buffer);
                get_attribute!(self, &shape, &function, attribute, ptr, size)
            }
            AttributeValueMut::F64List(buffer) => {
                let size = buffer_size(buffer.len());
                let ptr = buffer_ptr(buffer);
                get_attribute!(self, &shape, &function, attribute, ptr, size)
            }
        };
        Ok(status)
    }

    fn set_attribute(&self, call: &AttributeCall<'_>, value: AttributeValue<'_>) -> Result<i32> {
        let function = call.function("Set");
        let shape = Shape::of(call, &function)?;
        let attribute = call.attribute();

        let status = match value {
            AttributeValue::Bool(v) => {
                let flag = sys::bool32::from(v);
                set_attribute!(self, &shape, &function, attribute, flag)
            }
            AttributeValue::I32(v) => set_attribute!(self, &shape, &function, attribute, v),
            AttributeValue::U32(v) => set_attribute!(self, &shape, &function, attribute, v),
            AttributeValue::I64(v) => set_attribute!(self, &shape, &function, attribute, v),
            AttributeValue::U64(v) => set_attribute!(self, &shape, &function, attribute, v),
            AttributeValue::F64(v) => set_attribute!(self, &shape, &function, attribute, v),
            AttributeValue::String(v) => {
                let text = c_string(v)?;
                set_attribute!(self, &shape, &function, attribute, text.as_ptr())
            }
            AttributeValue::Bytes(v) => {
                let size = buffer_size(v.len());
                set_attribute!(self, &shape, &function, attribute, v.as_ptr(), size)
            }
            AttributeValue::I32List(v) => {
                let size = buffer_size(v.len());
                set_attribute!(self, &shape, &function, attribute, v.as_ptr(), size)
            }
            AttributeValue::U32List(v) => {
                let size = buffer_size(v.len());
                set_attribute!(self, &shape, &function, attribute, v.as_ptr(), size)
            }
            AttributeValue::I64List(v) => {
                let size = buffer_size(v.len());
                set_attribute!(self, &shape, &function, attribute, v.as_ptr(), size)
            }
            AttributeValue::U64List(v) => {
                let size = buffer_size(v.len());
                set_attribute!(self, &shape, &function, attribute, v.as_ptr(), size)
            }
            AttributeValue::F64List(v) => {
                let size = buffer_size(v.len());
                set_attribute!(self, &shape, &function, attribute, v.as_ptr(), size)
            }
        };
        Ok(status)
    }

    fn reset_attribute(&self, call: &AttributeCall<'_>) -> Result<i32> {
        let function = call.function("Reset");
        let shape = Shape::of(call, &function)?;
        let attribute = call.attribute();
        // SAFETY: `function` is the `DAQmxReset<stem>` entry point matching
        // `shape`.
        let status = unsafe {
            match &shape {
                Shape::System => {
                    let f: sys::ResetSystemAttributeFn = self.symbol(&function)?;
                    f(attribute)
                }
                Shape::Task(task) => {
                    let f: sys::ResetTaskAttributeFn = self.symbol(&function)?;
                    f(*task, attribute)
                }
                Shape::Named(name) => {
                    let f: sys::ResetNamedAttributeFn = self.symbol(&function)?;
                    f(name.as_ptr(), attribute)
                }
                Shape::Chan(task, name) => {
                    let f: sys::ResetChanAttributeFn = self.symbol(&function)?;
                    f(*task, name.as_ptr(), attribute)
                }
            }
        };
        Ok(status)
    }

    fn create_task(&self, name: &str) -> Result<(i32, TaskHandle)> {
        self.task_handle_fn("DAQmxCreateTask", name)
    }

    fn load_task(&self, name: &str) -> Result<(i32, TaskHandle)> {
        self.task_handle_fn("DAQmxLoadTask", name)
    }

    fn task_call(&self, call: TaskCall, task: TaskHandle) -> Result<i32> {
        self.task_fn(call.function(), task)
    }

    fn task_control(&self, task: TaskHandle, action: i32) -> Result<i32> {
        // SAFETY: typed per `NIDAQmx.h`.
        unsafe {
            let f: sys::TaskControlFn = self.symbol("DAQmxTaskControl")?;
            Ok(f(raw_task(task), action))
        }
    }

    fn wait_until_task_done(&self, task: TaskHandle, timeout: f64) -> Result<i32> {
        // SAFETY: typed per `NIDAQmx.h`.
        unsafe {
            let f: sys::WaitUntilTaskDoneFn = self.symbol("DAQmxWaitUntilTaskDone")?;
            Ok(f(raw_task(task), timeout))
        }
    }

    fn is_task_done(&self, task: TaskHandle) -> Result<(i32, bool)> {
        let mut done: sys::bool32 = 0;
        // SAFETY: typed per `NIDAQmx.h`; `done` outlives the call.
        let status = unsafe {
            let f: sys::IsTaskDoneFn = self.symbol("DAQmxIsTaskDone")?;
            f(raw_task(task), &mut done)
        };
        Ok((status, done != 0))
    }

    fn save_task(&self, task: TaskHandle, save_as: &str, author: &str, options: u32) -> Result<i32> {
        let save_as = c_string(save_as)?;
        let author = c_string(author)?;
        // SAFETY: typed per `NIDAQmx.h`; the strings outlive the call.
        unsafe {
            let f: sys::SaveTaskFn = self.symbol("DAQmxSaveTask")?;
            Ok(f(raw_task(task), save_as.as_ptr(), author.as_ptr(), options))
        }
    }

    fn add_global_chans_to_task(&self, task: TaskHandle, channels: &str) -> Result<i32> {
        let channels = c_string(channels)?;
        // SAFETY: typed per `NIDAQmx.h`; `channels` outlives the call.
        unsafe {
            let f: sys::AddGlobalChansToTaskFn = self.symbol("DAQmxAddGlobalChansToTask")?;
            Ok(f(raw_task(task), channels.as_ptr()))
        }
    }

    fn create_channel(&self, task: TaskHandle, spec: &CreateChannel<'_>) -> Result<i32> {
        let task = raw_task(task);
        let function = spec.function();
        let physical = c_string(spec.physical_channel())?;
        let name = c_string(spec.name_to_assign())?;

        // SAFETY: each arm resolves the entry point named by `function` with
        // its `NIDAQmx.h` signature; all C strings outlive the call.
        let status = unsafe {
            match *spec {
                CreateChannel::AIVoltage {
                    terminal_config,
                    min_val,
                    max_val,
                    units,
                    custom_scale_name,
                    ..
                } => {
                    let scale = c_string(custom_scale_name)?;
                    let f: sys::CreateAIVoltageChanFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        terminal_config,
                        min_val,
                        max_val,
                        units,
                        scale.as_ptr(),
                    )
                }
                CreateChannel::AICurrent {
                    terminal_config,
                    min_val,
                    max_val,
                    units,
                    shunt_resistor_loc,
                    ext_shunt_resistor_val,
                    custom_scale_name,
                    ..
                } => {
                    let scale = c_string(custom_scale_name)?;
                    let f: sys::CreateAICurrentChanFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        terminal_config,
                        min_val,
                        max_val,
                        units,
                        shunt_resistor_loc,
                        ext_shunt_resistor_val,
                        scale.as_ptr(),
                    )
                }
                CreateChannel::AIThrmcpl {
                    min_val,
                    max_val,
                    units,
                    thermocouple_type,
                    cjc_source,
                    cjc_val,
                    cjc_channel,
                    ..
                } => {
                    let cjc_channel = c_string(cjc_channel)?;
                    let f: sys::CreateAIThrmcplChanFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        min_val,
                        max_val,
                        units,
                        thermocouple_type,
                        cjc_source,
                        cjc_val,
                        cjc_channel.as_ptr(),
                    )
                }
                CreateChannel::AOVoltage {
                    min_val,
                    max_val,
                    units,
                    custom_scale_name,
                    ..
                }
                | CreateChannel::AOCurrent {
                    min_val,
                    max_val,
                    units,
                    custom_scale_name,
                    ..
                } => {
                    let scale = c_string(custom_scale_name)?;
                    let f: sys::CreateAOChanFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        min_val,
                        max_val,
                        units,
                        scale.as_ptr(),
                    )
                }
                CreateChannel::CICountEdges {
                    edge,
                    initial_count,
                    count_direction,
                    ..
                } => {
                    let f: sys::CreateCICountEdgesChanFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        edge,
                        initial_count,
                        count_direction,
                    )
                }
                CreateChannel::CIFreq {
                    min_val,
                    max_val,
                    units,
                    edge,
                    meas_method,
                    meas_time,
                    divisor,
                    custom_scale_name,
                    ..
                } => {
                    let scale = c_string(custom_scale_name)?;
                    let f: sys::CreateCIFreqChanFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        min_val,
                        max_val,
                        units,
                        edge,
                        meas_method,
                        meas_time,
                        divisor,
                        scale.as_ptr(),
                    )
                }
                CreateChannel::COPulseFreq {
                    units,
                    idle_state,
                    initial_delay,
                    freq,
                    duty_cycle,
                    ..
                } => {
                    let f: sys::CreateCOPulseChanFreqFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        units,
                        idle_state,
                        initial_delay,
                        freq,
                        duty_cycle,
                    )
                }
                CreateChannel::COPulseTime {
                    units,
                    idle_state,
                    initial_delay,
                    low_time,
                    high_time,
                    ..
                } => {
                    let f: sys::CreateCOPulseChanTimeFn = self.symbol(function)?;
                    f(
                        task,
                        physical.as_ptr(),
                        name.as_ptr(),
                        units,
                        idle_state,
                        initial_delay,
                        low_time,
                        high_time,
                    )
                }
                CreateChannel::DI { line_grouping, .. } | CreateChannel::DO { line_grouping, .. } => {
                    let f: sys::CreateDigitalChanFn = self.symbol(function)?;
                    f(task, physical.as_ptr(), name.as_ptr(), line_grouping)
                }
            }
        };
        Ok(status)
    }

    fn configure(&self, task: TaskHandle, spec: &Configure<'_>) -> Result<i32> {
        let task = raw_task(task);
        let function = spec.function();
        // SAFETY: each arm resolves the entry point named by `function` with
        // its `NIDAQmx.h` signature; all C strings outlive the call.
        let status = unsafe {
            match *spec {
                Configure::SampClkTiming {
                    source,
                    rate,
                    active_edge,
                    sample_mode,
                    samps_per_chan,
                } => {
                    let source = c_string(source)?;
                    let f: sys::CfgSampClkTimingFn = self.symbol(function)?;
                    f(task, source.as_ptr(), rate, active_edge, sample_mode, samps_per_chan)
                }
                Configure::ImplicitTiming {
                    sample_mode,
                    samps_per_chan,
                } => {
                    let f: sys::CfgImplicitTimingFn = self.symbol(function)?;
                    f(task, sample_mode, samps_per_chan)
                }
                Configure::DigEdgeStartTrig { source, edge } => {
                    let source = c_string(source)?;
                    let f: sys::CfgDigEdgeStartTrigFn = self.symbol(function)?;
                    f(task, source.as_ptr(), edge)
                }
                Configure::AnlgEdgeStartTrig {
                    source,
                    slope,
                    level,
                } => {
                    let source = c_string(source)?;
                    let f: sys::CfgAnlgEdgeStartTrigFn = self.symbol(function)?;
                    f(task, source.as_ptr(), slope, level)
                }
                Configure::DigEdgeRefTrig {
                    source,
                    edge,
                    pretrigger_samples,
                } => {
                    let source = c_string(source)?;
                    let f: sys::CfgDigEdgeRefTrigFn = self.symbol(function)?;
                    f(task, source.as_ptr(), edge, pretrigger_samples)
                }
            }
        };
        Ok(status)
    }

    fn named_call(&self, call: NamedCall, name: &str) -> Result<i32> {
        let name = c_string(name)?;
        // SAFETY: every `NamedCall` entry point is typed `NamedFn`.
        unsafe {
            let f: sys::NamedFn = self.symbol(call.function())?;
            Ok(f(name.as_ptr()))
        }
    }

    fn create_lin_scale(
        &self,
        name: &str,
        slope: f64,
        y_intercept: f64,
        pre_scaled_units: i32,
        scaled_units: &str,
    ) -> Result<i32> {
        let name = c_string(name)?;
        let scaled_units = c_string(scaled_units)?;
        // SAFETY: typed per `NIDAQmx.h`; the strings outlive the call.
        unsafe {
            let f: sys::CreateLinScaleFn = self.symbol("DAQmxCreateLinScale")?;
            Ok(f(
                name.as_ptr(),
                slope,
                y_intercept,
                pre_scaled_units,
                scaled_units.as_ptr(),
            ))
        }
    }

    fn error_string(&self, code: i32, buffer: &mut [u8]) -> Result<i32> {
        let size = buffer_size(buffer.len());
        // SAFETY: typed per `NIDAQmx.h`; `size` bounds the write.
        unsafe {
            let f: sys::GetErrorStringFn = self.symbol("DAQmxGetErrorString")?;
            Ok(f(code, buffer_ptr(buffer).cast(), size))
        }
    }

    fn extended_error_info(&self, buffer: &mut [u8]) -> Result<i32> {
        let size = buffer_size(buffer.len());
        // SAFETY: typed per `NIDAQmx.h`; `size` bounds the write.
        unsafe {
            let f: sys::GetExtendedErrorInfoFn = self.symbol("DAQmxGetExtendedErrorInfo")?;
            Ok(f(buffer_ptr(buffer).cast(), size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_follow_the_handle_arguments() {
        let task = TaskHandle::from_raw(0x10);
        let handles = [HandleArg::Task(task), HandleArg::Name("ai0")];
        let call = AttributeCall::new("ChanAttribute", &handles, 1);
        assert!(matches!(Shape::of(&call, "f"), Ok(Shape::Chan(..))));

        let none: [HandleArg<'_>; 0] = [];
        let call = AttributeCall::new("SystemInfoAttribute", &none, 1);
        assert!(matches!(Shape::of(&call, "f"), Ok(Shape::System)));

        let backwards = [HandleArg::Name("ai0"), HandleArg::Task(task)];
        let call = AttributeCall::new("ChanAttribute", &backwards, 1);
        assert!(matches!(Shape::of(&call, "f"), Err(Error::InvalidHandles { .. })));
    }

    #[test]
    fn interior_nul_is_rejected_before_the_driver() {
        let handles = [HandleArg::Name("Dev\01")];
        let call = AttributeCall::new("DeviceAttribute", &handles, 1);
        assert!(matches!(Shape::of(&call, "f"), Err(Error::InvalidString(_))));
    }

    #[test]
    fn missing_library_is_a_load_error() {
        let err = LibraryDriver::open("/definitely/not/libnidaqmx.so").unwrap_err();
        assert!(matches!(err, Error::Library(_)));
    }
}
