//! Name-indexed views over channels, devices, terminals and saved objects,
//! plus the channel factories of the task collections.
//!
//! Each factory takes the physical channel string and an options struct
//! whose `Default` matches the driver's documented defaults:
//!
//! ```no_run
//! use daqmx::collections::AIVoltageChanOptions;
//! use daqmx::enums::TerminalConfiguration;
//! use daqmx::Task;
//!
//! # fn main() -> daqmx::Result<()> {
//! let task = Task::new("")?;
//! let channel = task.ai_channels().add_ai_voltage_chan(
//!     "Dev1/ai0:3",
//!     &AIVoltageChanOptions {
//!         terminal_config: TerminalConfiguration::Diff,
//!         min_val: -10.0,
//!         max_val: 10.0,
//!         ..Default::default()
//!     },
//! )?;
//! assert_eq!(channel.name(), "Dev1/ai0:3");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::ai_channel::AIChannel;
use crate::ao_channel::AOChannel;
use crate::ci_channel::CIChannel;
use crate::co_channel::COChannel;
use crate::di_channel::DIChannel;
use crate::do_channel::DOChannel;
use crate::driver::CreateChannel;
use crate::enums::{
    CJCSource, CountDirection, CounterFrequencyMethod, CurrentShuntResistorLocation, CurrentUnits,
    Edge, FrequencyUnits, Level, LineGrouping, TemperatureUnits, TerminalConfiguration,
    ThermocoupleType, TimeUnits, VoltageUnits,
};
use crate::interpreter::Interpreter;
use crate::utils::unflatten_channel_string;
use crate::{Result, TaskHandle};

/// Name of the channel (or channel list) a create call produces.
///
/// With no name the channels are named after their terminals. A name given
/// for several terminals is suffixed `0..N-1`.
fn created_name(physical_channel: &str, name_to_assign: &str, one_channel: bool) -> String {
    if name_to_assign.is_empty() {
        return physical_channel.to_string();
    }
    let count = unflatten_channel_string(physical_channel).len();
    if one_channel || count <= 1 {
        name_to_assign.to_string()
    } else {
        format!("{name_to_assign}0:{}", count - 1)
    }
}

fn create(
    interpreter: &Arc<Interpreter>,
    task_handle: TaskHandle,
    spec: &CreateChannel<'_>,
    one_channel: bool,
) -> Result<String> {
    interpreter.create_channel(task_handle, spec)?;
    let name = created_name(spec.physical_channel(), spec.name_to_assign(), one_channel);
    info!(function = spec.function(), channel = %name, "created channel");
    Ok(name)
}

/// Options for [`AIChannelCollection::add_ai_voltage_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AIVoltageChanOptions {
    pub name_to_assign: String,
    pub terminal_config: TerminalConfiguration,
    pub min_val: f64,
    pub max_val: f64,
    pub units: VoltageUnits,
    pub custom_scale_name: String,
}

impl Default for AIVoltageChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            terminal_config: TerminalConfiguration::Default,
            min_val: -5.0,
            max_val: 5.0,
            units: VoltageUnits::Volts,
            custom_scale_name: String::new(),
        }
    }
}

/// Options for [`AIChannelCollection::add_ai_current_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AICurrentChanOptions {
    pub name_to_assign: String,
    pub terminal_config: TerminalConfiguration,
    pub min_val: f64,
    pub max_val: f64,
    pub units: CurrentUnits,
    pub shunt_resistor_loc: CurrentShuntResistorLocation,
    pub ext_shunt_resistor_val: f64,
    pub custom_scale_name: String,
}

impl Default for AICurrentChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            terminal_config: TerminalConfiguration::Default,
            min_val: -0.01,
            max_val: 0.01,
            units: CurrentUnits::Amps,
            shunt_resistor_loc: CurrentShuntResistorLocation::LetDriverChoose,
            ext_shunt_resistor_val: 249.0,
            custom_scale_name: String::new(),
        }
    }
}

/// Options for [`AIChannelCollection::add_ai_thrmcpl_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AIThrmcplChanOptions {
    pub name_to_assign: String,
    pub min_val: f64,
    pub max_val: f64,
    pub units: TemperatureUnits,
    pub thermocouple_type: ThermocoupleType,
    pub cjc_source: CJCSource,
    pub cjc_val: f64,
    pub cjc_channel: String,
}

impl Default for AIThrmcplChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            min_val: 0.0,
            max_val: 100.0,
            units: TemperatureUnits::DegC,
            thermocouple_type: ThermocoupleType::J,
            cjc_source: CJCSource::ConstantUserValue,
            cjc_val: 25.0,
            cjc_channel: String::new(),
        }
    }
}

impl AIChannelCollection {
    /// Creates voltage input channels.
    pub fn add_ai_voltage_chan(&self, physical_channel: &str, options: &AIVoltageChanOptions) -> Result<AIChannel> {
        let spec = CreateChannel::AIVoltage {
            physical_channel,
            name_to_assign: &options.name_to_assign,
            terminal_config: options.terminal_config.value(),
            min_val: options.min_val,
            max_val: options.max_val,
            units: options.units.value(),
            custom_scale_name: &options.custom_scale_name,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(AIChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }

    /// Creates current input channels.
    pub fn add_ai_current_chan(&self, physical_channel: &str, options: &AICurrentChanOptions) -> Result<AIChannel> {
        let spec = CreateChannel::AICurrent {
            physical_channel,
            name_to_assign: &options.name_to_assign,
            terminal_config: options.terminal_config.value(),
            min_val: options.min_val,
            max_val: options.max_val,
            units: options.units.value(),
            shunt_resistor_loc: options.shunt_resistor_loc.value(),
            ext_shunt_resistor_val: options.ext_shunt_resistor_val,
            custom_scale_name: &options.custom_scale_name,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(AIChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }

    /// Creates thermocouple temperature channels.
    pub fn add_ai_thrmcpl_chan(&self, physical_channel: &str, options: &AIThrmcplChanOptions) -> Result<AIChannel> {
        let spec = CreateChannel::AIThrmcpl {
            physical_channel,
            name_to_assign: &options.name_to_assign,
            min_val: options.min_val,
            max_val: options.max_val,
            units: options.units.value(),
            thermocouple_type: options.thermocouple_type.value(),
            cjc_source: options.cjc_source.value(),
            cjc_val: options.cjc_val,
            cjc_channel: &options.cjc_channel,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(AIChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }
}

/// Options for [`AOChannelCollection::add_ao_voltage_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AOVoltageChanOptions {
    pub name_to_assign: String,
    pub min_val: f64,
    pub max_val: f64,
    pub units: VoltageUnits,
    pub custom_scale_name: String,
}

impl Default for AOVoltageChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            min_val: -10.0,
            max_val: 10.0,
            units: VoltageUnits::Volts,
            custom_scale_name: String::new(),
        }
    }
}

/// Options for [`AOChannelCollection::add_ao_current_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AOCurrentChanOptions {
    pub name_to_assign: String,
    pub min_val: f64,
    pub max_val: f64,
    pub units: CurrentUnits,
    pub custom_scale_name: String,
}

impl Default for AOCurrentChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            min_val: 0.0,
            max_val: 0.02,
            units: CurrentUnits::Amps,
            custom_scale_name: String::new(),
        }
    }
}

impl AOChannelCollection {
    /// Creates voltage output channels.
    pub fn add_ao_voltage_chan(&self, physical_channel: &str, options: &AOVoltageChanOptions) -> Result<AOChannel> {
        let spec = CreateChannel::AOVoltage {
            physical_channel,
            name_to_assign: &options.name_to_assign,
            min_val: options.min_val,
            max_val: options.max_val,
            units: options.units.value(),
            custom_scale_name: &options.custom_scale_name,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(AOChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }

    /// Creates current output channels.
    pub fn add_ao_current_chan(&self, physical_channel: &str, options: &AOCurrentChanOptions) -> Result<AOChannel> {
        let spec = CreateChannel::AOCurrent {
            physical_channel,
            name_to_assign: &options.name_to_assign,
            min_val: options.min_val,
            max_val: options.max_val,
            units: options.units.value(),
            custom_scale_name: &options.custom_scale_name,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(AOChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }
}

/// Options for [`CIChannelCollection::add_ci_count_edges_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct CICountEdgesChanOptions {
    pub name_to_assign: String,
    pub edge: Edge,
    pub initial_count: u32,
    pub count_direction: CountDirection,
}

impl Default for CICountEdgesChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            edge: Edge::Rising,
            initial_count: 0,
            count_direction: CountDirection::CountUp,
        }
    }
}

/// Options for [`CIChannelCollection::add_ci_freq_chan`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct CIFreqChanOptions {
    pub name_to_assign: String,
    pub min_val: f64,
    pub max_val: f64,
    pub units: FrequencyUnits,
    pub edge: Edge,
    pub meas_method: CounterFrequencyMethod,
    pub meas_time: f64,
    pub divisor: u32,
    pub custom_scale_name: String,
}

impl Default for CIFreqChanOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            min_val: 2.0,
            max_val: 100.0,
            units: FrequencyUnits::Hz,
            edge: Edge::Rising,
            meas_method: CounterFrequencyMethod::LowFrequency1Counter,
            meas_time: 0.001,
            divisor: 4,
            custom_scale_name: String::new(),
        }
    }
}

impl CIChannelCollection {
    /// Creates an edge-counting channel on `counter`.
    pub fn add_ci_count_edges_chan(&self, counter: &str, options: &CICountEdgesChanOptions) -> Result<CIChannel> {
        let spec = CreateChannel::CICountEdges {
            counter,
            name_to_assign: &options.name_to_assign,
            edge: options.edge.value(),
            initial_count: options.initial_count,
            count_direction: options.count_direction.value(),
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(CIChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }

    /// Creates a frequency measurement channel on `counter`.
    pub fn add_ci_freq_chan(&self, counter: &str, options: &CIFreqChanOptions) -> Result<CIChannel> {
        let spec = CreateChannel::CIFreq {
            counter,
            name_to_assign: &options.name_to_assign,
            min_val: options.min_val,
            max_val: options.max_val,
            units: options.units.value(),
            edge: options.edge.value(),
            meas_method: options.meas_method.value(),
            meas_time: options.meas_time,
            divisor: options.divisor,
            custom_scale_name: &options.custom_scale_name,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(CIChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }
}

/// Options for [`COChannelCollection::add_co_pulse_chan_freq`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct COPulseChanFreqOptions {
    pub name_to_assign: String,
    pub units: FrequencyUnits,
    pub idle_state: Level,
    pub initial_delay: f64,
    pub freq: f64,
    pub duty_cycle: f64,
}

impl Default for COPulseChanFreqOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            units: FrequencyUnits::Hz,
            idle_state: Level::Low,
            initial_delay: 0.0,
            freq: 1.0,
            duty_cycle: 0.5,
        }
    }
}

/// Options for [`COChannelCollection::add_co_pulse_chan_time`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct COPulseChanTimeOptions {
    pub name_to_assign: String,
    pub units: TimeUnits,
    pub idle_state: Level,
    pub initial_delay: f64,
    pub low_time: f64,
    pub high_time: f64,
}

impl Default for COPulseChanTimeOptions {
    fn default() -> Self {
        Self {
            name_to_assign: String::new(),
            units: TimeUnits::Seconds,
            idle_state: Level::Low,
            initial_delay: 0.0,
            low_time: 0.01,
            high_time: 0.01,
        }
    }
}

impl COChannelCollection {
    /// Creates a pulse generation channel defined by frequency and duty
    /// cycle.
    pub fn add_co_pulse_chan_freq(&self, counter: &str, options: &COPulseChanFreqOptions) -> Result<COChannel> {
        let spec = CreateChannel::COPulseFreq {
            counter,
            name_to_assign: &options.name_to_assign,
            units: options.units.value(),
            idle_state: options.idle_state.value(),
            initial_delay: options.initial_delay,
            freq: options.freq,
            duty_cycle: options.duty_cycle,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(COChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }

    /// Creates a pulse generation channel defined by high and low time.
    pub fn add_co_pulse_chan_time(&self, counter: &str, options: &COPulseChanTimeOptions) -> Result<COChannel> {
        let spec = CreateChannel::COPulseTime {
            counter,
            name_to_assign: &options.name_to_assign,
            units: options.units.value(),
            idle_state: options.idle_state.value(),
            initial_delay: options.initial_delay,
            low_time: options.low_time,
            high_time: options.high_time,
        };
        let name = create(&self.interpreter, self.task_handle, &spec, false)?;
        Ok(COChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }
}

impl DIChannelCollection {
    /// Creates digital input channels on `lines`.
    pub fn add_di_chan(&self, lines: &str, name_to_assign: &str, line_grouping: LineGrouping) -> Result<DIChannel> {
        let spec = CreateChannel::DI {
            lines,
            name_to_assign,
            line_grouping: line_grouping.value(),
        };
        let one_channel = line_grouping == LineGrouping::ChanForAllLines;
        let name = create(&self.interpreter, self.task_handle, &spec, one_channel)?;
        Ok(DIChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }
}

impl DOChannelCollection {
    /// Creates digital output channels on `lines`.
    pub fn add_do_chan(&self, lines: &str, name_to_assign: &str, line_grouping: LineGrouping) -> Result<DOChannel> {
        let spec = CreateChannel::DO {
            lines,
            name_to_assign,
            line_grouping: line_grouping.value(),
        };
        let one_channel = line_grouping == LineGrouping::ChanForAllLines;
        let name = create(&self.interpreter, self.task_handle, &spec, one_channel)?;
        Ok(DOChannel::new(Arc::clone(&self.interpreter), self.task_handle, name))
    }
}

include!(concat!(env!("OUT_DIR"), "/collections.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_names() {
        assert_eq!(created_name("Dev1/ai0:3", "", false), "Dev1/ai0:3");
        assert_eq!(created_name("Dev1/ai0", "temp", false), "temp");
        assert_eq!(created_name("Dev1/ai0:2", "v", false), "v0:2");
        assert_eq!(created_name("Dev1/port0/line0:7", "port", true), "port");
    }
}
