//! In-memory [`DriverApi`] for tests and machines without NI hardware.
//!
//! Hand a [`MockDriver`] to [`daqmx::Interpreter::new`] and every façade
//! object works against a simulated `Dev1` (a `PCIe-6363`).
//!
//! Attribute values live in a map keyed by entry point stem, handle
//! arguments and attribute id. Task, system and persisted-object attributes
//! the driver computes (channel lists, device names, ...) are derived from
//! the mock's own bookkeeping. Statuses can be scripted with
//! [`MockDriver::inject`] and buffer growth with [`MockDriver::churn`].

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use parking_lot::Mutex;
use tracing::debug;

use daqmx::driver::{
    AttributeValue, AttributeValueMut, Configure, CreateChannel, DriverApi, NamedCall, TaskCall,
};
use daqmx::enums::{
    ChannelType, LineGrouping, SampleTimingType, SaveOptions, ScaleType, TaskMode, TriggerType,
    UsageTypeAI, UsageTypeAO, UsageTypeCI, UsageTypeCO,
};
use daqmx::error::Result;
use daqmx::interpreter::{AttributeCall, HandleArg};
use daqmx::utils::{flatten_channel_string, unflatten_channel_string};
use daqmx::{ErrorCode, TaskHandle};

const CHAN: &str = "ChanAttribute";
const TASK: &str = "TaskAttribute";
const TIMING: &str = "TimingAttribute";
const TRIG: &str = "TrigAttribute";
const SYSTEM: &str = "SystemInfoAttribute";
const DEVICE: &str = "DeviceAttribute";
const SCALE: &str = "ScaleAttribute";
const PERSISTED_TASK: &str = "PersistedTaskAttribute";
const PERSISTED_CHAN: &str = "PersistedChanAttribute";
const PERSISTED_SCALE: &str = "PersistedScaleAttribute";

mod id {
    pub const CHAN_TYPE: i32 = 6271;
    pub const PHYSICAL_CHANNEL: i32 = 6389;
    pub const CHAN_IS_GLOBAL: i32 = 8964;
    pub const AI_MEAS_TYPE: i32 = 6148;
    pub const AI_TERM_CFG: i32 = 4247;
    pub const AI_MAX: i32 = 6109;
    pub const AI_MIN: i32 = 6110;
    pub const AI_CUSTOM_SCALE: i32 = 6112;
    pub const AI_VOLTAGE_UNITS: i32 = 6240;
    pub const AI_CURRENT_UNITS: i32 = 6242;
    pub const AI_TEMP_UNITS: i32 = 4147;
    pub const AI_THRMCPL_TYPE: i32 = 4144;
    pub const AI_THRMCPL_CJC_SRC: i32 = 4176;
    pub const AI_THRMCPL_CJC_VAL: i32 = 4149;
    pub const AI_THRMCPL_CJC_CHAN: i32 = 4148;
    pub const AO_OUTPUT_TYPE: i32 = 4361;
    pub const AO_VOLTAGE_UNITS: i32 = 4484;
    pub const AO_MAX: i32 = 4486;
    pub const AO_MIN: i32 = 4487;
    pub const CI_MEAS_TYPE: i32 = 6304;
    pub const CI_COUNT_EDGES_ACTIVE_EDGE: i32 = 1687;
    pub const CI_COUNT_EDGES_INITIAL_CNT: i32 = 1688;
    pub const CI_COUNT_EDGES_DIR: i32 = 1690;
    pub const CI_MAX: i32 = 6300;
    pub const CI_MIN: i32 = 6301;
    pub const CI_FREQ_UNITS: i32 = 6306;
    pub const CO_OUTPUT_TYPE: i32 = 6390;
    pub const CO_PULSE_IDLE_STATE: i32 = 6392;
    pub const CO_PULSE_HIGH_TIME: i32 = 6395;
    pub const CO_PULSE_LOW_TIME: i32 = 6396;
    pub const CO_PULSE_DUTY_CYC: i32 = 6398;
    pub const CO_PULSE_FREQ: i32 = 6400;
    pub const DI_NUM_LINES: i32 = 8568;
    pub const DO_NUM_LINES: i32 = 4404;

    pub const TASK_CHANNEL_NAMES: i32 = 4723;
    pub const TASK_COMPLETE: i32 = 4724;
    pub const TASK_NAME: i32 = 4726;
    pub const TASK_NUM_CHANS: i32 = 8577;
    pub const TASK_DEVICES: i32 = 8974;
    pub const TASK_NUM_DEVICES: i32 = 10682;

    pub const SAMP_QUANT_SAMP_MODE: i32 = 4864;
    pub const SAMP_CLK_ACTIVE_EDGE: i32 = 4865;
    pub const SAMP_QUANT_SAMP_PER_CHAN: i32 = 4880;
    pub const SAMP_CLK_RATE: i32 = 4932;
    pub const SAMP_TIMING_TYPE: i32 = 4935;
    pub const SAMP_CLK_SRC: i32 = 6226;

    pub const START_TRIG_TYPE: i32 = 5011;
    pub const ANLG_EDGE_START_TRIG_LVL: i32 = 5014;
    pub const ANLG_EDGE_START_TRIG_SLOPE: i32 = 5015;
    pub const ANLG_EDGE_START_TRIG_SRC: i32 = 5016;
    pub const DIG_EDGE_START_TRIG_EDGE: i32 = 5124;
    pub const DIG_EDGE_START_TRIG_SRC: i32 = 5127;
    pub const REF_TRIG_TYPE: i32 = 5145;
    pub const DIG_EDGE_REF_TRIG_EDGE: i32 = 5168;
    pub const DIG_EDGE_REF_TRIG_SRC: i32 = 5172;
    pub const REF_TRIG_PRETRIG_SAMPLES: i32 = 5189;
    pub const PAUSE_TRIG_TYPE: i32 = 4966;
    pub const ARM_START_TRIG_TYPE: i32 = 5140;

    pub const SYS_GLOBAL_CHANS: i32 = 4709;
    pub const SYS_SCALES: i32 = 4710;
    pub const SYS_TASKS: i32 = 4711;
    pub const SYS_DEV_NAMES: i32 = 6459;
    pub const SYS_DRIVER_MAJOR_VERSION: i32 = 4722;
    pub const SYS_DRIVER_MINOR_VERSION: i32 = 6435;
    pub const SYS_DRIVER_UPDATE_VERSION: i32 = 12066;

    pub const DEV_PRODUCT_TYPE: i32 = 1585;
    pub const DEV_IS_SIMULATED: i32 = 8906;
    pub const DEV_AI_PHYSICAL_CHANS: i32 = 8990;
    pub const DEV_AO_PHYSICAL_CHANS: i32 = 8991;
    pub const DEV_DI_LINES: i32 = 8992;
    pub const DEV_DI_PORTS: i32 = 8993;
    pub const DEV_DO_LINES: i32 = 8994;
    pub const DEV_DO_PORTS: i32 = 8995;
    pub const DEV_CI_PHYSICAL_CHANS: i32 = 8996;
    pub const DEV_CO_PHYSICAL_CHANS: i32 = 8997;

    pub const SCALE_DESCR: i32 = 4646;
    pub const SCALE_LIN_SLOPE: i32 = 4647;
    pub const SCALE_LIN_Y_INTERCEPT: i32 = 4648;
    pub const SCALE_PRE_SCALED_UNITS: i32 = 6391;
    pub const SCALE_SCALED_UNITS: i32 = 6427;
    pub const SCALE_TYPE: i32 = 6441;

    pub const PERSISTED_TASK_AUTHOR: i32 = 8908;
    pub const PERSISTED_TASK_ALLOW_EDITING: i32 = 8909;
    pub const PERSISTED_TASK_ALLOW_DELETION: i32 = 8910;
    pub const PERSISTED_CHAN_AUTHOR: i32 = 8912;
    pub const PERSISTED_CHAN_ALLOW_EDITING: i32 = 8913;
    pub const PERSISTED_CHAN_ALLOW_DELETION: i32 = 8914;
    pub const PERSISTED_SCALE_AUTHOR: i32 = 8916;
    pub const PERSISTED_SCALE_ALLOW_EDITING: i32 = 8917;
    pub const PERSISTED_SCALE_ALLOW_DELETION: i32 = 8918;
}

/// A stored attribute value.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    I32List(Vec<i32>),
    U32List(Vec<u32>),
    I64List(Vec<i64>),
    U64List(Vec<u64>),
    F64List(Vec<f64>),
}

impl From<&str> for MockValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<AttributeValue<'_>> for MockValue {
    fn from(value: AttributeValue<'_>) -> Self {
        match value {
            AttributeValue::Bool(v) => Self::Bool(v),
            AttributeValue::I32(v) => Self::I32(v),
            AttributeValue::U32(v) => Self::U32(v),
            AttributeValue::I64(v) => Self::I64(v),
            AttributeValue::U64(v) => Self::U64(v),
            AttributeValue::F64(v) => Self::F64(v),
            AttributeValue::String(v) => Self::String(v.to_string()),
            AttributeValue::Bytes(v) => Self::String(String::from_utf8_lossy(v).into_owned()),
            AttributeValue::I32List(v) => Self::I32List(v.to_vec()),
            AttributeValue::U32List(v) => Self::U32List(v.to_vec()),
            AttributeValue::I64List(v) => Self::I64List(v.to_vec()),
            AttributeValue::U64List(v) => Self::U64List(v.to_vec()),
            AttributeValue::F64List(v) => Self::F64List(v.to_vec()),
        }
    }
}

/// One call the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Entry point, e.g. `DAQmxGetChanAttribute`.
    pub function: String,
    /// Attribute id, for attribute calls.
    pub attribute: Option<i32>,
    /// Buffer length, for buffered reads.
    pub buffer_len: Option<usize>,
    /// Status returned.
    pub status: i32,
}

impl MockCall {
    /// Whether this was a size probe (a buffered read with no buffer).
    #[must_use]
    pub fn is_probe(&self) -> bool {
        self.buffer_len == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum HandleKey {
    Task(usize),
    Name(String),
}

impl From<&HandleArg<'_>> for HandleKey {
    fn from(arg: &HandleArg<'_>) -> Self {
        match *arg {
            HandleArg::Task(task) => Self::Task(task.as_raw()),
            HandleArg::Name(name) => Self::Name(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    stem: String,
    handles: Vec<HandleKey>,
    attribute: i32,
}

impl Key {
    fn new(stem: &str, handles: Vec<HandleKey>, attribute: i32) -> Self {
        Self {
            stem: stem.to_string(),
            handles,
            attribute,
        }
    }

    fn of(call: &AttributeCall<'_>) -> Self {
        Self::new(
            call.stem(),
            call.handles().iter().map(HandleKey::from).collect(),
            call.attribute(),
        )
    }

    fn task(&self) -> Option<usize> {
        match self.handles.first() {
            Some(HandleKey::Task(task)) => Some(*task),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct MockTask {
    name: String,
    channels: Vec<String>,
    running: bool,
}

/// Channels and task-scoped attributes of a saved task.
#[derive(Debug, Clone)]
struct SavedTask {
    channels: Vec<String>,
    attributes: Vec<(String, Vec<HandleKey>, i32, MockValue)>,
}

#[derive(Debug, Clone)]
struct Injection {
    function: String,
    attribute: Option<i32>,
    status: i32,
}

#[derive(Debug, Default)]
struct MockState {
    next_task: usize,
    unnamed_tasks: usize,
    tasks: BTreeMap<usize, MockTask>,
    values: HashMap<Key, MockValue>,
    baseline: HashMap<Key, MockValue>,
    defaults: HashMap<(String, i32), MockValue>,
    devices: BTreeSet<String>,
    saved_tasks: BTreeMap<String, SavedTask>,
    global_channels: BTreeMap<String, i32>,
    scales: BTreeSet<String>,
    injections: VecDeque<Injection>,
    churn: HashMap<i32, u32>,
    calls: Vec<MockCall>,
    last_error: Option<String>,
}

fn code(error: ErrorCode) -> i32 {
    error.code()
}

/// Copies `source` into a driver-style list buffer.
fn fill<T: Copy>(source: &[T], buffer: &mut [T]) -> i32 {
    if buffer.is_empty() {
        return i32::try_from(source.len()).unwrap_or(i32::MAX);
    }
    if buffer.len() < source.len() {
        return code(ErrorCode::ReadBufferTooSmall);
    }
    buffer[..source.len()].copy_from_slice(source);
    0
}

fn joined<'a>(names: impl Iterator<Item = &'a String>) -> MockValue {
    MockValue::String(names.map(String::as_str).collect::<Vec<_>>().join(", "))
}

fn write_value(value: &MockValue, slot: AttributeValueMut<'_>) -> i32 {
    match (value, slot) {
        (MockValue::Bool(v), AttributeValueMut::Bool(out)) => *out = *v,
        (MockValue::I32(v), AttributeValueMut::I32(out)) => *out = *v,
        (MockValue::U32(v), AttributeValueMut::U32(out)) => *out = *v,
        (MockValue::I64(v), AttributeValueMut::I64(out)) => *out = *v,
        (MockValue::U64(v), AttributeValueMut::U64(out)) => *out = *v,
        (MockValue::F64(v), AttributeValueMut::F64(out)) => *out = *v,
        (MockValue::String(s), AttributeValueMut::Bytes(buffer)) => {
            let required = s.len() + 1;
            if buffer.is_empty() {
                return i32::try_from(required).unwrap_or(i32::MAX);
            }
            if buffer.len() < required {
                return code(ErrorCode::BufferTooSmallForString);
            }
            buffer[..s.len()].copy_from_slice(s.as_bytes());
            buffer[s.len()] = 0;
        }
        (MockValue::I32List(v), AttributeValueMut::I32List(buffer)) => return fill(v, buffer),
        (MockValue::U32List(v), AttributeValueMut::U32List(buffer)) => return fill(v, buffer),
        (MockValue::I64List(v), AttributeValueMut::I64List(buffer)) => return fill(v, buffer),
        (MockValue::U64List(v), AttributeValueMut::U64List(buffer)) => return fill(v, buffer),
        (MockValue::F64List(v), AttributeValueMut::F64List(buffer)) => return fill(v, buffer),
        _ => return code(ErrorCode::InvalidAttributeValue),
    }
    0
}

impl MockState {
    fn record(&mut self, function: &str, attribute: Option<i32>, buffer_len: Option<usize>, status: i32) -> i32 {
        debug!(function, attribute, status, "mock driver call");
        if status < 0 {
            self.last_error = Some(format!("Status Code: {status}\nFunction: {function}"));
        }
        self.calls.push(MockCall {
            function: function.to_string(),
            attribute,
            buffer_len,
            status,
        });
        status
    }

    fn take_injection(&mut self, function: &str, attribute: Option<i32>) -> Option<i32> {
        let index = self.injections.iter().position(|i| {
            i.function == function && (i.attribute.is_none() || i.attribute == attribute)
        })?;
        self.injections.remove(index).map(|i| i.status)
    }

    /// Runs `op` unless a scripted error is due; a scripted warning
    /// replaces a zero status.
    fn scripted(
        &mut self,
        function: &str,
        attribute: Option<i32>,
        buffer_len: Option<usize>,
        op: impl FnOnce(&mut Self) -> i32,
    ) -> i32 {
        let injected = if buffer_len == Some(0) {
            None
        } else {
            self.take_injection(function, attribute)
        };
        let status = match injected {
            Some(s) if s < 0 => s,
            Some(s) => match op(self) {
                0 => s,
                other => other,
            },
            None => op(self),
        };
        self.record(function, attribute, buffer_len, status)
    }

    fn task(&self, task: usize) -> Option<&MockTask> {
        self.tasks.get(&task)
    }

    /// The stored addresses `key` stands for. A channel selector may name
    /// a list or range of channels, lines inside a multi-line channel, or
    /// be empty for every channel in the task.
    fn resolve(&self, key: &Key) -> std::result::Result<Vec<Key>, i32> {
        let Some(task) = key.task() else {
            return Ok(vec![key.clone()]);
        };
        let Some(state) = self.task(task) else {
            return Err(code(ErrorCode::InvalidTask));
        };
        let selector = match key.handles.get(1) {
            Some(HandleKey::Name(selector)) if key.stem == CHAN => selector,
            _ => return Ok(vec![key.clone()]),
        };

        let owners: Vec<&String> = if selector.is_empty() {
            state.channels.iter().collect()
        } else if state.channels.contains(selector) {
            vec![selector]
        } else {
            let mut owners = Vec::new();
            for name in unflatten_channel_string(selector) {
                let owner = state.channels.iter().find(|c| {
                    **c == name || unflatten_channel_string(c).contains(&name)
                });
                match owner {
                    Some(owner) if !owners.contains(&owner) => owners.push(owner),
                    Some(_) => {}
                    None => return Err(code(ErrorCode::ChannelNotInTask)),
                }
            }
            owners
        };
        if owners.is_empty() {
            return Err(code(ErrorCode::CannotPerformOpWhenNoChansInTask));
        }
        Ok(owners
            .into_iter()
            .map(|owner| {
                let handles = vec![HandleKey::Task(task), HandleKey::Name(owner.clone())];
                Key::new(CHAN, handles, key.attribute)
            })
            .collect())
    }

    fn derived(&self, key: &Key) -> Option<MockValue> {
        match (key.stem.as_str(), key.attribute) {
            (SYSTEM, id::SYS_DEV_NAMES) => Some(joined(self.devices.iter())),
            (SYSTEM, id::SYS_TASKS) => Some(joined(self.saved_tasks.keys())),
            (SYSTEM, id::SYS_GLOBAL_CHANS) => Some(joined(self.global_channels.keys())),
            (SYSTEM, id::SYS_SCALES) => Some(joined(self.scales.iter())),
            (TASK, attribute) => {
                let raw = key.task()?;
                let task = self.task(raw)?;
                match attribute {
                    id::TASK_DEVICES => Some(joined(self.task_devices(raw, task).iter())),
                    id::TASK_NUM_DEVICES => Some(MockValue::U32(
                        u32::try_from(self.task_devices(raw, task).len()).unwrap_or(u32::MAX),
                    )),
                    id::TASK_CHANNEL_NAMES => {
                        Some(MockValue::String(flatten_channel_string(&task.channels)))
                    }
                    id::TASK_NAME => Some(MockValue::String(task.name.clone())),
                    id::TASK_NUM_CHANS => Some(MockValue::U32(
                        u32::try_from(task.channels.len()).unwrap_or(u32::MAX),
                    )),
                    id::TASK_COMPLETE => Some(MockValue::Bool(!task.running)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Devices the task's channels live on, in first-use order.
    fn task_devices(&self, raw: usize, task: &MockTask) -> Vec<String> {
        let mut devices: Vec<String> = Vec::new();
        for channel in &task.channels {
            let handles = vec![HandleKey::Task(raw), HandleKey::Name(channel.clone())];
            let key = Key::new(CHAN, handles, id::PHYSICAL_CHANNEL);
            if let Some(MockValue::String(physical)) = self.values.get(&key) {
                let device = physical.split('/').next().unwrap_or_default().to_string();
                if !devices.contains(&device) {
                    devices.push(device);
                }
            }
        }
        devices
    }

    fn lookup(&self, key: &Key) -> Option<MockValue> {
        self.derived(key)
            .or_else(|| self.values.get(key).cloned())
            .or_else(|| {
                self.defaults
                    .get(&(key.stem.clone(), key.attribute))
                    .cloned()
            })
    }

    fn put(&mut self, stem: &str, handles: Vec<HandleKey>, attribute: i32, value: MockValue) {
        self.values.insert(Key::new(stem, handles, attribute), value);
    }

    /// Stores a value that a reset restores.
    fn put_initial(&mut self, stem: &str, handles: Vec<HandleKey>, attribute: i32, value: MockValue) {
        let key = Key::new(stem, handles, attribute);
        self.baseline.insert(key.clone(), value.clone());
        self.values.insert(key, value);
    }

    fn put_task(&mut self, stem: &str, task: usize, attribute: i32, value: MockValue) {
        self.put(stem, vec![HandleKey::Task(task)], attribute, value);
    }

    fn put_named(&mut self, stem: &str, name: &str, attribute: i32, value: MockValue) {
        self.put(stem, vec![HandleKey::Name(name.to_string())], attribute, value);
    }

    fn remove_named(&mut self, stem: &str, name: &str) {
        self.values.retain(|key, _| {
            !(key.stem == stem && key.handles == [HandleKey::Name(name.to_string())])
        });
    }

    fn running(&self, key: &Key) -> bool {
        key.task()
            .and_then(|task| self.task(task))
            .is_some_and(|task| task.running)
    }

    fn device_exists(&self, physical: &str) -> bool {
        let device = physical.split('/').next().unwrap_or_default();
        self.devices.contains(device)
    }
}

/// Virtual channel names and physical channels for a create call.
fn created_channels(spec: &CreateChannel<'_>) -> Vec<(String, String)> {
    let physical = unflatten_channel_string(spec.physical_channel());
    let name = spec.name_to_assign();
    let all_lines = matches!(
        spec,
        CreateChannel::DI { line_grouping, .. } | CreateChannel::DO { line_grouping, .. }
            if *line_grouping == LineGrouping::ChanForAllLines.value()
    );

    if all_lines {
        let lines = spec.physical_channel().to_string();
        let virtual_name = if name.is_empty() { lines.clone() } else { name.to_string() };
        return vec![(virtual_name, lines)];
    }
    if name.is_empty() {
        return physical.into_iter().map(|p| (p.clone(), p)).collect();
    }
    if physical.len() == 1 {
        return vec![(name.to_string(), physical[0].clone())];
    }
    physical
        .into_iter()
        .enumerate()
        .map(|(i, p)| (format!("{name}{i}"), p))
        .collect()
}

/// Attribute values a freshly created channel reports.
fn channel_attributes(spec: &CreateChannel<'_>, lines: usize) -> (i32, Vec<(i32, MockValue)>) {
    use MockValue::{F64, I32, U32};

    let lines = U32(u32::try_from(lines).unwrap_or(u32::MAX));
    match *spec {
        CreateChannel::AIVoltage {
            terminal_config,
            min_val,
            max_val,
            units,
            custom_scale_name,
            ..
        } => (
            ChannelType::AnalogInput.value(),
            vec![
                (id::AI_MEAS_TYPE, I32(UsageTypeAI::Voltage.value())),
                (id::AI_TERM_CFG, I32(terminal_config)),
                (id::AI_MIN, F64(min_val)),
                (id::AI_MAX, F64(max_val)),
                (id::AI_VOLTAGE_UNITS, I32(units)),
                (id::AI_CUSTOM_SCALE, custom_scale_name.into()),
            ],
        ),
        CreateChannel::AICurrent {
            terminal_config,
            min_val,
            max_val,
            units,
            custom_scale_name,
            ..
        } => (
            ChannelType::AnalogInput.value(),
            vec![
                (id::AI_MEAS_TYPE, I32(UsageTypeAI::Current.value())),
                (id::AI_TERM_CFG, I32(terminal_config)),
                (id::AI_MIN, F64(min_val)),
                (id::AI_MAX, F64(max_val)),
                (id::AI_CURRENT_UNITS, I32(units)),
                (id::AI_CUSTOM_SCALE, custom_scale_name.into()),
            ],
        ),
        CreateChannel::AIThrmcpl {
            min_val,
            max_val,
            units,
            thermocouple_type,
            cjc_source,
            cjc_val,
            cjc_channel,
            ..
        } => (
            ChannelType::AnalogInput.value(),
            vec![
                (id::AI_MEAS_TYPE, I32(UsageTypeAI::TemperatureThermocouple.value())),
                (id::AI_MIN, F64(min_val)),
                (id::AI_MAX, F64(max_val)),
                (id::AI_TEMP_UNITS, I32(units)),
                (id::AI_THRMCPL_TYPE, I32(thermocouple_type)),
                (id::AI_THRMCPL_CJC_SRC, I32(cjc_source)),
                (id::AI_THRMCPL_CJC_VAL, F64(cjc_val)),
                (id::AI_THRMCPL_CJC_CHAN, cjc_channel.into()),
            ],
        ),
        CreateChannel::AOVoltage {
            min_val,
            max_val,
            units,
            ..
        } => (
            ChannelType::AnalogOutput.value(),
            vec![
                (id::AO_OUTPUT_TYPE, I32(UsageTypeAO::Voltage.value())),
                (id::AO_MIN, F64(min_val)),
                (id::AO_MAX, F64(max_val)),
                (id::AO_VOLTAGE_UNITS, I32(units)),
            ],
        ),
        CreateChannel::AOCurrent {
            min_val, max_val, ..
        } => (
            ChannelType::AnalogOutput.value(),
            vec![
                (id::AO_OUTPUT_TYPE, I32(UsageTypeAO::Current.value())),
                (id::AO_MIN, F64(min_val)),
                (id::AO_MAX, F64(max_val)),
            ],
        ),
        CreateChannel::CICountEdges {
            edge,
            initial_count,
            count_direction,
            ..
        } => (
            ChannelType::CounterInput.value(),
            vec![
                (id::CI_MEAS_TYPE, I32(UsageTypeCI::CountEdges.value())),
                (id::CI_COUNT_EDGES_ACTIVE_EDGE, I32(edge)),
                (id::CI_COUNT_EDGES_INITIAL_CNT, U32(initial_count)),
                (id::CI_COUNT_EDGES_DIR, I32(count_direction)),
            ],
        ),
        CreateChannel::CIFreq {
            min_val,
            max_val,
            units,
            ..
        } => (
            ChannelType::CounterInput.value(),
            vec![
                (id::CI_MEAS_TYPE, I32(UsageTypeCI::Frequency.value())),
                (id::CI_MIN, F64(min_val)),
                (id::CI_MAX, F64(max_val)),
                (id::CI_FREQ_UNITS, I32(units)),
            ],
        ),
        CreateChannel::COPulseFreq {
            idle_state,
            freq,
            duty_cycle,
            ..
        } => (
            ChannelType::CounterOutput.value(),
            vec![
                (id::CO_OUTPUT_TYPE, I32(UsageTypeCO::PulseFrequency.value())),
                (id::CO_PULSE_IDLE_STATE, I32(idle_state)),
                (id::CO_PULSE_FREQ, F64(freq)),
                (id::CO_PULSE_DUTY_CYC, F64(duty_cycle)),
            ],
        ),
        CreateChannel::COPulseTime {
            idle_state,
            low_time,
            high_time,
            ..
        } => (
            ChannelType::CounterOutput.value(),
            vec![
                (id::CO_OUTPUT_TYPE, I32(UsageTypeCO::PulseTime.value())),
                (id::CO_PULSE_IDLE_STATE, I32(idle_state)),
                (id::CO_PULSE_LOW_TIME, F64(low_time)),
                (id::CO_PULSE_HIGH_TIME, F64(high_time)),
            ],
        ),
        CreateChannel::DI { .. } => (
            ChannelType::DigitalInput.value(),
            vec![(id::DI_NUM_LINES, lines)],
        ),
        CreateChannel::DO { .. } => (
            ChannelType::DigitalOutput.value(),
            vec![(id::DO_NUM_LINES, lines)],
        ),
    }
}

fn range(spec: &CreateChannel<'_>) -> Option<(f64, f64)> {
    match *spec {
        CreateChannel::AIVoltage { min_val, max_val, .. }
        | CreateChannel::AICurrent { min_val, max_val, .. }
        | CreateChannel::AIThrmcpl { min_val, max_val, .. }
        | CreateChannel::AOVoltage { min_val, max_val, .. }
        | CreateChannel::AOCurrent { min_val, max_val, .. }
        | CreateChannel::CIFreq { min_val, max_val, .. } => Some((min_val, max_val)),
        _ => None,
    }
}

/// In-memory driver.
#[derive(Debug)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// A driver with no devices, tasks or saved objects, reporting version
    /// 24.5.0.
    #[must_use]
    pub fn new() -> Self {
        let driver = Self {
            state: Mutex::new(MockState {
                next_task: 1,
                ..MockState::default()
            }),
        };
        let none = MockValue::I32(TriggerType::None.value());
        for attribute in [
            id::START_TRIG_TYPE,
            id::REF_TRIG_TYPE,
            id::PAUSE_TRIG_TYPE,
            id::ARM_START_TRIG_TYPE,
        ] {
            driver.set_default(TRIG, attribute, none.clone());
        }
        for (stem, attribute) in [
            (PERSISTED_CHAN, id::PERSISTED_CHAN_ALLOW_EDITING),
            (PERSISTED_CHAN, id::PERSISTED_CHAN_ALLOW_DELETION),
            (PERSISTED_SCALE, id::PERSISTED_SCALE_ALLOW_EDITING),
            (PERSISTED_SCALE, id::PERSISTED_SCALE_ALLOW_DELETION),
        ] {
            driver.set_default(stem, attribute, MockValue::Bool(true));
        }
        for (attribute, part) in [
            (id::SYS_DRIVER_MAJOR_VERSION, 24),
            (id::SYS_DRIVER_MINOR_VERSION, 5),
            (id::SYS_DRIVER_UPDATE_VERSION, 0),
        ] {
            driver.set_default(SYSTEM, attribute, MockValue::U32(part));
        }
        driver
    }

    /// A driver with one simulated X Series device, `Dev1`.
    #[must_use]
    pub fn simulated() -> Self {
        let driver = Self::new();
        driver.add_device("Dev1", "PCIe-6363");
        driver
    }

    /// Adds a simulated device with the usual X Series terminals.
    pub fn add_device(&self, name: &str, product_type: &str) {
        let mut state = self.state.lock();
        state.devices.insert(name.to_string());
        let terminals = [
            (id::DEV_AI_PHYSICAL_CHANS, format!("{name}/ai0:15")),
            (id::DEV_AO_PHYSICAL_CHANS, format!("{name}/ao0:3")),
            (id::DEV_DI_LINES, format!("{name}/port0/line0:31")),
            (id::DEV_DI_PORTS, format!("{name}/port0")),
            (id::DEV_DO_LINES, format!("{name}/port0/line0:31")),
            (id::DEV_DO_PORTS, format!("{name}/port0")),
            (id::DEV_CI_PHYSICAL_CHANS, format!("{name}/ctr0:3")),
            (id::DEV_CO_PHYSICAL_CHANS, format!("{name}/ctr0:3")),
        ];
        for (attribute, value) in terminals {
            state.put_named(DEVICE, name, attribute, MockValue::String(value));
        }
        state.put_named(DEVICE, name, id::DEV_PRODUCT_TYPE, product_type.into());
        state.put_named(DEVICE, name, id::DEV_IS_SIMULATED, MockValue::Bool(true));
    }

    /// Adds a saved global channel of type `chan_type`.
    pub fn add_global_channel(&self, name: &str, chan_type: ChannelType, author: &str) {
        let mut state = self.state.lock();
        state
            .global_channels
            .insert(name.to_string(), chan_type.value());
        state.put_named(PERSISTED_CHAN, name, id::PERSISTED_CHAN_AUTHOR, author.into());
    }

    /// Stores `value` at an exact address.
    pub fn set_value(&self, stem: &str, handles: &[HandleArg<'_>], attribute: i32, value: MockValue) {
        let handles = handles.iter().map(HandleKey::from).collect();
        self.state.lock().put(stem, handles, attribute, value);
    }

    /// The value stored at an exact address, ignoring defaults.
    #[must_use]
    pub fn value(&self, stem: &str, handles: &[HandleArg<'_>], attribute: i32) -> Option<MockValue> {
        let handles = handles.iter().map(HandleKey::from).collect();
        self.state
            .lock()
            .values
            .get(&Key::new(stem, handles, attribute))
            .cloned()
    }

    /// Value returned for `attribute` on any object of the `stem` family
    /// that has no stored value.
    pub fn set_default(&self, stem: &str, attribute: i32, value: MockValue) {
        self.state
            .lock()
            .defaults
            .insert((stem.to_string(), attribute), value);
    }

    /// Makes the next call of `function` (for `attribute`, when given)
    /// return `status`. Errors skip the operation; warnings replace a
    /// successful status. Size probes are never affected.
    pub fn inject(&self, function: &str, attribute: Option<i32>, status: i32) {
        self.state.lock().injections.push_back(Injection {
            function: function.to_string(),
            attribute,
            status,
        });
    }

    /// Makes the next `times` buffered reads of `attribute` fail as if the
    /// value had grown since the probe.
    pub fn churn(&self, attribute: i32, times: u32) {
        self.state.lock().churn.insert(attribute, times);
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Forgets the call log.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Names of the open tasks.
    #[must_use]
    pub fn open_tasks(&self) -> Vec<String> {
        self.state
            .lock()
            .tasks
            .values()
            .map(|t| t.name.clone())
            .collect()
    }

    /// Whether `task` is open and running.
    #[must_use]
    pub fn is_running(&self, task: TaskHandle) -> bool {
        self.state
            .lock()
            .tasks
            .get(&task.as_raw())
            .is_some_and(|t| t.running)
    }

    fn open_task(state: &mut MockState, name: &str) -> std::result::Result<usize, i32> {
        let name = if name.is_empty() {
            let name = format!("_unnamedTask<{}>", state.unnamed_tasks);
            state.unnamed_tasks += 1;
            name
        } else {
            name.to_string()
        };
        if state.tasks.values().any(|t| t.name == name) {
            return Err(code(ErrorCode::TaskNameAlreadyUsed));
        }
        let handle = state.next_task;
        state.next_task += 1;
        state.tasks.insert(
            handle,
            MockTask {
                name,
                channels: Vec::new(),
                running: false,
            },
        );
        Ok(handle)
    }
}

impl DriverApi for MockDriver {
    fn get_attribute(&self, call: &AttributeCall<'_>, value: AttributeValueMut<'_>) -> Result<i32> {
        let function = call.function("Get");
        let attribute = call.attribute();
        let buffer_len = value.buffer_len();
        let key = Key::of(call);
        let mut state = self.state.lock();

        Ok(state.scripted(&function, Some(attribute), buffer_len, |state| {
            let keys = match state.resolve(&key) {
                Ok(keys) => keys,
                Err(status) => return status,
            };
            if buffer_len.is_some_and(|len| len > 0) {
                if let Some(remaining) = state.churn.get_mut(&attribute).filter(|r| **r > 0) {
                    *remaining -= 1;
                    return match value {
                        AttributeValueMut::Bytes(_) => code(ErrorCode::BufferTooSmallForString),
                        _ => code(ErrorCode::ReadBufferTooSmall),
                    };
                }
            }

            // A list of channels reads as one value only when they agree.
            let mut found: Option<MockValue> = None;
            for key in &keys {
                let Some(stored) = state.lookup(key) else {
                    return code(ErrorCode::PropertyNotSupported);
                };
                if found.as_ref().is_some_and(|f| *f != stored) {
                    return code(ErrorCode::InvalidAttributeValue);
                }
                found = Some(stored);
            }
            match found {
                Some(stored) => write_value(&stored, value),
                None => code(ErrorCode::PropertyNotSupported),
            }
        }))
    }

    fn set_attribute(&self, call: &AttributeCall<'_>, value: AttributeValue<'_>) -> Result<i32> {
        let function = call.function("Set");
        let key = Key::of(call);
        let mut state = self.state.lock();

        Ok(state.scripted(&function, Some(call.attribute()), None, |state| {
            let keys = match state.resolve(&key) {
                Ok(keys) => keys,
                Err(status) => return status,
            };
            if state.running(&key) {
                return code(ErrorCode::AttributeNotSettableWhenTaskRunning);
            }
            for key in keys {
                state.values.insert(key, MockValue::from(value));
            }
            0
        }))
    }

    fn reset_attribute(&self, call: &AttributeCall<'_>) -> Result<i32> {
        let function = call.function("Reset");
        let key = Key::of(call);
        let mut state = self.state.lock();

        Ok(state.scripted(&function, Some(call.attribute()), None, |state| {
            let keys = match state.resolve(&key) {
                Ok(keys) => keys,
                Err(status) => return status,
            };
            if state.running(&key) {
                return code(ErrorCode::AttributeNotSettableWhenTaskRunning);
            }
            for key in keys {
                match state.baseline.get(&key).cloned() {
                    Some(initial) => state.values.insert(key, initial),
                    None => state.values.remove(&key),
                };
            }
            0
        }))
    }

    fn create_task(&self, name: &str) -> Result<(i32, TaskHandle)> {
        let mut state = self.state.lock();
        let mut handle = TaskHandle::NULL;
        let status = state.scripted("DAQmxCreateTask", None, None, |state| {
            match Self::open_task(state, name) {
                Ok(raw) => {
                    handle = TaskHandle::from_raw(raw);
                    0
                }
                Err(status) => status,
            }
        });
        Ok((status, handle))
    }

    fn load_task(&self, name: &str) -> Result<(i32, TaskHandle)> {
        let mut state = self.state.lock();
        let mut handle = TaskHandle::NULL;
        let status = state.scripted("DAQmxLoadTask", None, None, |state| {
            let Some(saved) = state.saved_tasks.get(name).cloned() else {
                return code(ErrorCode::PersistedObjectNotFound);
            };
            let raw = match Self::open_task(state, name) {
                Ok(raw) => raw,
                Err(status) => return status,
            };
            if let Some(task) = state.tasks.get_mut(&raw) {
                task.channels = saved.channels;
            }
            for (stem, rest, attribute, value) in saved.attributes {
                let mut handles = vec![HandleKey::Task(raw)];
                handles.extend(rest);
                state.put(&stem, handles, attribute, value);
            }
            handle = TaskHandle::from_raw(raw);
            0
        });
        Ok((status, handle))
    }

    fn task_call(&self, call: TaskCall, task: TaskHandle) -> Result<i32> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted(call.function(), None, None, |state| {
            let Some(entry) = state.tasks.get_mut(&raw) else {
                return code(ErrorCode::InvalidTask);
            };
            match call {
                TaskCall::Clear => {
                    state.tasks.remove(&raw);
                    state.values.retain(|key, _| key.task() != Some(raw));
                    state.baseline.retain(|key, _| key.task() != Some(raw));
                }
                TaskCall::Start => {
                    if entry.channels.is_empty() {
                        return code(ErrorCode::CannotPerformOpWhenNoChansInTask);
                    }
                    entry.running = true;
                }
                TaskCall::Stop => entry.running = false,
                TaskCall::DisableStartTrig => state.put_task(
                    TRIG,
                    raw,
                    id::START_TRIG_TYPE,
                    MockValue::I32(TriggerType::None.value()),
                ),
                TaskCall::DisableRefTrig => state.put_task(
                    TRIG,
                    raw,
                    id::REF_TRIG_TYPE,
                    MockValue::I32(TriggerType::None.value()),
                ),
            }
            0
        }))
    }

    fn task_control(&self, task: TaskHandle, action: i32) -> Result<i32> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted("DAQmxTaskControl", None, None, |state| {
            let Some(entry) = state.tasks.get_mut(&raw) else {
                return code(ErrorCode::InvalidTask);
            };
            if action == TaskMode::TaskStart.value() {
                entry.running = true;
            } else if action == TaskMode::TaskStop.value() || action == TaskMode::TaskAbort.value() {
                entry.running = false;
            }
            0
        }))
    }

    fn wait_until_task_done(&self, task: TaskHandle, _timeout: f64) -> Result<i32> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted("DAQmxWaitUntilTaskDone", None, None, |state| {
            match state.tasks.get_mut(&raw) {
                Some(entry) => {
                    entry.running = false;
                    0
                }
                None => code(ErrorCode::InvalidTask),
            }
        }))
    }

    fn is_task_done(&self, task: TaskHandle) -> Result<(i32, bool)> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        let mut done = false;
        let status = state.scripted("DAQmxIsTaskDone", None, None, |state| {
            match state.tasks.get(&raw) {
                Some(entry) => {
                    done = !entry.running;
                    0
                }
                None => code(ErrorCode::InvalidTask),
            }
        });
        Ok((status, done))
    }

    fn save_task(&self, task: TaskHandle, save_as: &str, author: &str, options: u32) -> Result<i32> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted("DAQmxSaveTask", None, None, |state| {
            let Some(entry) = state.tasks.get(&raw) else {
                return code(ErrorCode::InvalidTask);
            };
            let name = if save_as.is_empty() {
                entry.name.clone()
            } else {
                save_as.to_string()
            };
            let options = i32::try_from(options).unwrap_or_default();
            let overwrite = options & SaveOptions::Overwrite.value() != 0;
            if state.saved_tasks.contains_key(&name) && !overwrite {
                return code(ErrorCode::TaskNameAlreadyUsed);
            }

            let attributes = state
                .values
                .iter()
                .filter(|(key, _)| key.task() == Some(raw))
                .map(|(key, value)| {
                    (
                        key.stem.clone(),
                        key.handles[1..].to_vec(),
                        key.attribute,
                        value.clone(),
                    )
                })
                .collect();
            let saved = SavedTask {
                channels: entry.channels.clone(),
                attributes,
            };
            state.saved_tasks.insert(name.clone(), saved);

            state.put_named(PERSISTED_TASK, &name, id::PERSISTED_TASK_AUTHOR, author.into());
            let flags = [
                (id::PERSISTED_TASK_ALLOW_EDITING, SaveOptions::AllowInteractiveEditing),
                (id::PERSISTED_TASK_ALLOW_DELETION, SaveOptions::AllowInteractiveDeletion),
            ];
            for (attribute, flag) in flags {
                let set = options & flag.value() != 0;
                state.put_named(PERSISTED_TASK, &name, attribute, MockValue::Bool(set));
            }
            0
        }))
    }

    fn add_global_chans_to_task(&self, task: TaskHandle, channels: &str) -> Result<i32> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted("DAQmxAddGlobalChansToTask", None, None, |state| {
            if !state.tasks.contains_key(&raw) {
                return code(ErrorCode::InvalidTask);
            }
            let names = unflatten_channel_string(channels);
            let mut types = Vec::with_capacity(names.len());
            for name in &names {
                match state.global_channels.get(name) {
                    Some(&chan_type) => types.push(chan_type),
                    None => return code(ErrorCode::InvalidGlobalChan),
                }
            }
            for (name, chan_type) in names.into_iter().zip(types) {
                let handles = vec![HandleKey::Task(raw), HandleKey::Name(name.clone())];
                state.put(CHAN, handles.clone(), id::CHAN_TYPE, MockValue::I32(chan_type));
                state.put(CHAN, handles, id::CHAN_IS_GLOBAL, MockValue::Bool(true));
                if let Some(entry) = state.tasks.get_mut(&raw) {
                    entry.channels.push(name);
                }
            }
            0
        }))
    }

    fn create_channel(&self, task: TaskHandle, spec: &CreateChannel<'_>) -> Result<i32> {
        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted(spec.function(), None, None, |state| {
            let Some(entry) = state.tasks.get(&raw) else {
                return code(ErrorCode::InvalidTask);
            };
            if entry.running {
                return code(ErrorCode::AttributeNotSettableWhenTaskRunning);
            }
            if let Some((min, max)) = range(spec) {
                if min >= max {
                    return code(ErrorCode::MinNotLessThanMax);
                }
            }
            let physical = unflatten_channel_string(spec.physical_channel());
            if physical.is_empty() || !physical.iter().all(|p| state.device_exists(p)) {
                return code(ErrorCode::InvalidPhysicalChanString);
            }

            let created = created_channels(spec);
            if created.iter().any(|(name, _)| entry.channels.contains(name)) {
                return code(ErrorCode::DuplicatePhysChansNotSupported);
            }
            for (name, physical_channel) in created {
                let lines = unflatten_channel_string(&physical_channel).len();
                let (chan_type, attributes) = channel_attributes(spec, lines);
                let handles = vec![HandleKey::Task(raw), HandleKey::Name(name.clone())];
                state.put_initial(CHAN, handles.clone(), id::CHAN_TYPE, MockValue::I32(chan_type));
                state.put_initial(CHAN, handles.clone(), id::CHAN_IS_GLOBAL, MockValue::Bool(false));
                state.put_initial(
                    CHAN,
                    handles.clone(),
                    id::PHYSICAL_CHANNEL,
                    MockValue::String(physical_channel),
                );
                for (attribute, value) in attributes {
                    state.put_initial(CHAN, handles.clone(), attribute, value);
                }
                if let Some(entry) = state.tasks.get_mut(&raw) {
                    entry.channels.push(name);
                }
            }
            0
        }))
    }

    fn configure(&self, task: TaskHandle, spec: &Configure<'_>) -> Result<i32> {
        use MockValue::{F64, I32, U32, U64};

        let raw = task.as_raw();
        let mut state = self.state.lock();
        Ok(state.scripted(spec.function(), None, None, |state| {
            if !state.tasks.contains_key(&raw) {
                return code(ErrorCode::InvalidTask);
            }
            let (stem, values): (&str, Vec<(i32, MockValue)>) = match *spec {
                Configure::SampClkTiming {
                    source,
                    rate,
                    active_edge,
                    sample_mode,
                    samps_per_chan,
                } => {
                    if rate <= 0.0 {
                        return code(ErrorCode::InvalidSampRate);
                    }
                    (
                        TIMING,
                        vec![
                            (id::SAMP_TIMING_TYPE, I32(SampleTimingType::SampleClock.value())),
                            (id::SAMP_CLK_SRC, source.into()),
                            (id::SAMP_CLK_RATE, F64(rate)),
                            (id::SAMP_CLK_ACTIVE_EDGE, I32(active_edge)),
                            (id::SAMP_QUANT_SAMP_MODE, I32(sample_mode)),
                            (id::SAMP_QUANT_SAMP_PER_CHAN, U64(samps_per_chan)),
                        ],
                    )
                }
                Configure::ImplicitTiming {
                    sample_mode,
                    samps_per_chan,
                } => (
                    TIMING,
                    vec![
                        (id::SAMP_TIMING_TYPE, I32(SampleTimingType::Implicit.value())),
                        (id::SAMP_QUANT_SAMP_MODE, I32(sample_mode)),
                        (id::SAMP_QUANT_SAMP_PER_CHAN, U64(samps_per_chan)),
                    ],
                ),
                Configure::DigEdgeStartTrig { source, edge } => (
                    TRIG,
                    vec![
                        (id::START_TRIG_TYPE, I32(TriggerType::DigitalEdge.value())),
                        (id::DIG_EDGE_START_TRIG_SRC, source.into()),
                        (id::DIG_EDGE_START_TRIG_EDGE, I32(edge)),
                    ],
                ),
                Configure::AnlgEdgeStartTrig {
                    source,
                    slope,
                    level,
                } => (
                    TRIG,
                    vec![
                        (id::START_TRIG_TYPE, I32(TriggerType::AnalogEdge.value())),
                        (id::ANLG_EDGE_START_TRIG_SRC, source.into()),
                        (id::ANLG_EDGE_START_TRIG_SLOPE, I32(slope)),
                        (id::ANLG_EDGE_START_TRIG_LVL, F64(level)),
                    ],
                ),
                Configure::DigEdgeRefTrig {
                    source,
                    edge,
                    pretrigger_samples,
                } => (
                    TRIG,
                    vec![
                        (id::REF_TRIG_TYPE, I32(TriggerType::DigitalEdge.value())),
                        (id::DIG_EDGE_REF_TRIG_SRC, source.into()),
                        (id::DIG_EDGE_REF_TRIG_EDGE, I32(edge)),
                        (id::REF_TRIG_PRETRIG_SAMPLES, U32(pretrigger_samples)),
                    ],
                ),
            };
            for (attribute, value) in values {
                state.put_task(stem, raw, attribute, value);
            }
            0
        }))
    }

    fn named_call(&self, call: NamedCall, name: &str) -> Result<i32> {
        let mut state = self.state.lock();
        Ok(state.scripted(call.function(), None, None, |state| match call {
            NamedCall::ResetDevice | NamedCall::SelfTestDevice => {
                if state.devices.contains(name) {
                    0
                } else {
                    code(ErrorCode::DeviceIdInvalid)
                }
            }
            NamedCall::DeleteSavedTask => {
                if state.saved_tasks.remove(name).is_none() {
                    return code(ErrorCode::PersistedObjectNotFound);
                }
                state.remove_named(PERSISTED_TASK, name);
                0
            }
            NamedCall::DeleteSavedGlobalChan => {
                if state.global_channels.remove(name).is_none() {
                    return code(ErrorCode::PersistedObjectNotFound);
                }
                state.remove_named(PERSISTED_CHAN, name);
                0
            }
            NamedCall::DeleteSavedScale => {
                if !state.scales.remove(name) {
                    return code(ErrorCode::PersistedObjectNotFound);
                }
                state.remove_named(PERSISTED_SCALE, name);
                state.remove_named(SCALE, name);
                0
            }
        }))
    }

    fn create_lin_scale(
        &self,
        name: &str,
        slope: f64,
        y_intercept: f64,
        pre_scaled_units: i32,
        scaled_units: &str,
    ) -> Result<i32> {
        use MockValue::{F64, I32};

        let mut state = self.state.lock();
        Ok(state.scripted("DAQmxCreateLinScale", None, None, |state| {
            if state.scales.contains(name) {
                return code(ErrorCode::ScaleNameAlreadyUsed);
            }
            state.scales.insert(name.to_string());
            let values = [
                (id::SCALE_TYPE, I32(ScaleType::Linear.value())),
                (id::SCALE_LIN_SLOPE, F64(slope)),
                (id::SCALE_LIN_Y_INTERCEPT, F64(y_intercept)),
                (id::SCALE_PRE_SCALED_UNITS, I32(pre_scaled_units)),
                (id::SCALE_SCALED_UNITS, scaled_units.into()),
                (id::SCALE_DESCR, "".into()),
            ];
            for (attribute, value) in values {
                state.put_named(SCALE, name, attribute, value);
            }
            state.put_named(PERSISTED_SCALE, name, id::PERSISTED_SCALE_AUTHOR, "".into());
            0
        }))
    }

    fn error_string(&self, code: i32, buffer: &mut [u8]) -> Result<i32> {
        let text = match ErrorCode::from_code(code) {
            Some(known) => known.description().to_string(),
            None => format!("Simulated driver status {code}."),
        };
        Ok(write_value(&MockValue::String(text), AttributeValueMut::Bytes(buffer)))
    }

    fn extended_error_info(&self, buffer: &mut [u8]) -> Result<i32> {
        let text = self.state.lock().last_error.clone().unwrap_or_default();
        Ok(write_value(&MockValue::String(text), AttributeValueMut::Bytes(buffer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chan_call<'a>(handles: &'a [HandleArg<'a>], attribute: i32) -> AttributeCall<'a> {
        AttributeCall::new(CHAN, handles, attribute)
    }

    #[test]
    fn string_reads_probe_then_fill() {
        let driver = MockDriver::simulated();
        let handles = [HandleArg::Name("Dev1")];
        let call = AttributeCall::new(DEVICE, &handles, id::DEV_PRODUCT_TYPE);

        let size = driver.get_attribute(&call, AttributeValueMut::Bytes(&mut [])).unwrap();
        assert_eq!(size, 10);
        let mut small = [0u8; 4];
        let status = driver.get_attribute(&call, AttributeValueMut::Bytes(&mut small)).unwrap();
        assert_eq!(status, ErrorCode::BufferTooSmallForString.code());
        let mut buffer = vec![0u8; 10];
        let status = driver.get_attribute(&call, AttributeValueMut::Bytes(&mut buffer)).unwrap();
        assert_eq!(status, 0);
        assert_eq!(&buffer[..9], b"PCIe-6363");
    }

    #[test]
    fn channel_attributes_need_a_channel_in_the_task() {
        let driver = MockDriver::simulated();
        let (_, task) = driver.create_task("t").unwrap();
        let handles = [HandleArg::Task(task), HandleArg::Name("Dev1/ai0")];
        let mut value = 0.0;
        let status = driver
            .get_attribute(&chan_call(&handles, id::AI_MAX), AttributeValueMut::F64(&mut value))
            .unwrap();
        assert_eq!(status, ErrorCode::ChannelNotInTask.code());
    }

    #[test]
    fn created_channel_names() {
        let spec = CreateChannel::DI {
            lines: "Dev1/port0/line0:3",
            name_to_assign: "",
            line_grouping: LineGrouping::ChanForAllLines.value(),
        };
        assert_eq!(
            created_channels(&spec),
            [("Dev1/port0/line0:3".to_string(), "Dev1/port0/line0:3".to_string())]
        );

        let spec = CreateChannel::AIVoltage {
            physical_channel: "Dev1/ai0:1",
            name_to_assign: "v",
            terminal_config: -1,
            min_val: -5.0,
            max_val: 5.0,
            units: 10348,
            custom_scale_name: "",
        };
        let names: Vec<String> = created_channels(&spec).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["v0", "v1"]);
    }

    #[test]
    fn injected_warning_keeps_the_value() {
        let driver = MockDriver::simulated();
        driver.inject("DAQmxGetDeviceAttribute", Some(id::DEV_IS_SIMULATED), 200010);
        let handles = [HandleArg::Name("Dev1")];
        let call = AttributeCall::new(DEVICE, &handles, id::DEV_IS_SIMULATED);
        let mut simulated = false;
        let status = driver
            .get_attribute(&call, AttributeValueMut::Bool(&mut simulated))
            .unwrap();
        assert_eq!(status, 200010);
        assert!(simulated);
    }
}
