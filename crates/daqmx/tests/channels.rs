//! Channel creation and the typed channel collections of a task.

mod common;

use daqmx::collections::{
    AIThrmcplChanOptions, AIVoltageChanOptions, CICountEdgesChanOptions, COPulseChanFreqOptions,
    COPulseChanTimeOptions,
};
use daqmx::enums::{
    CJCSource, ChannelType, CountDirection, Edge, FrequencyUnits, Level, LineGrouping,
    TerminalConfiguration, ThermocoupleType, UsageTypeAI, UsageTypeAO, UsageTypeCI, UsageTypeCO,
    VoltageUnits,
};
use daqmx::{Error, ErrorCode};

/// A voltage channel over a range of terminals is one channel object
/// addressing every terminal, with the driver defaults applied.
#[test]
fn test_ai_voltage_defaults() {
    let (_driver, task) = common::task("ai");

    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0:3", &Default::default())
        .unwrap();
    assert_eq!(channel.name(), "Dev1/ai0:3");
    assert_eq!(channel.chan_type().unwrap(), ChannelType::AnalogInput);
    assert_eq!(channel.ai_meas_type().unwrap(), UsageTypeAI::Voltage);
    assert_eq!(channel.ai_term_cfg().unwrap(), TerminalConfiguration::Default);
    assert_eq!(channel.ai_voltage_units().unwrap(), VoltageUnits::Volts);
    assert_eq!(channel.ai_min().unwrap(), -5.0);
    assert_eq!(channel.ai_max().unwrap(), 5.0);

    let collection = task.ai_channels();
    assert_eq!(collection.len().unwrap(), 4);
    assert_eq!(
        collection.names().unwrap(),
        ["Dev1/ai0", "Dev1/ai1", "Dev1/ai2", "Dev1/ai3"]
    );
}

/// Setting through a multi-channel object reaches every channel; reset
/// restores the creation value.
#[test]
fn test_settings_apply_to_every_channel() {
    let (_driver, task) = common::task("set");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0:1", &Default::default())
        .unwrap();

    channel.set_ai_max(2.5).unwrap();
    let collection = task.ai_channels();
    for single in collection.iter().unwrap() {
        assert_eq!(single.ai_max().unwrap(), 2.5);
    }

    collection.get("Dev1/ai1").unwrap().set_ai_max(1.0).unwrap();
    let err = channel.ai_max().unwrap_err();
    assert!(err.is(ErrorCode::InvalidAttributeValue));

    channel.reset_ai_max().unwrap();
    assert_eq!(channel.ai_max().unwrap(), 5.0);
}

/// Assigned names get an index suffix when several terminals are given.
#[test]
fn test_assigned_names() {
    let (_driver, task) = common::task("named");
    let options = AIVoltageChanOptions {
        name_to_assign: "v".into(),
        min_val: -1.0,
        max_val: 1.0,
        ..Default::default()
    };
    let pair = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0:1", &options)
        .unwrap();
    assert_eq!(pair.name(), "v0:1");

    let options = AIVoltageChanOptions {
        name_to_assign: "single".into(),
        ..Default::default()
    };
    let single = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai5", &options)
        .unwrap();
    assert_eq!(single.name(), "single");

    let collection = task.ai_channels();
    assert_eq!(collection.names().unwrap(), ["v0", "v1", "single"]);
    assert_eq!(collection.get("v1").unwrap().ai_max().unwrap(), 1.0);
    assert_eq!(single.physical_channel().unwrap().name(), "Dev1/ai5");
}

/// Lookups by name, range and index.
#[test]
fn test_collection_lookup() {
    let (_driver, task) = common::task("lookup");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0:2", &Default::default())
        .unwrap();
    let collection = task.ai_channels();

    assert!(collection.contains("Dev1/ai1").unwrap());
    assert!(collection.contains("Dev1/ai0:2").unwrap());
    assert!(!collection.contains("Dev1/ai0:3").unwrap());
    assert!(!collection.contains("").unwrap());

    assert_eq!(collection.get_index(2).unwrap().name(), "Dev1/ai2");
    match collection.get_index(3) {
        Err(Error::NotFound { kind, name }) => {
            assert_eq!(kind, "AIChannel");
            assert_eq!(name, "3");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(
        collection.get("Dev1/ai9"),
        Err(Error::NotFound { .. })
    ));
    assert_eq!(collection.all().unwrap().name(), "Dev1/ai0:2");
}

/// Each typed collection only lists channels of its own type.
#[test]
fn test_collections_filter_by_type() {
    let (_driver, task) = common::task("mixed");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    task.ao_channels()
        .add_ao_voltage_chan("Dev1/ao0", &Default::default())
        .unwrap();
    task.ci_channels()
        .add_ci_count_edges_chan("Dev1/ctr0", &Default::default())
        .unwrap();
    task.do_channels()
        .add_do_chan("Dev1/port0/line0", "", LineGrouping::ChanPerLine)
        .unwrap();

    assert_eq!(task.ai_channels().names().unwrap(), ["Dev1/ai0"]);
    assert_eq!(task.ao_channels().names().unwrap(), ["Dev1/ao0"]);
    assert_eq!(task.ci_channels().names().unwrap(), ["Dev1/ctr0"]);
    assert!(task.co_channels().is_empty().unwrap());
    assert!(task.di_channels().is_empty().unwrap());
    assert_eq!(task.do_channels().names().unwrap(), ["Dev1/port0/line0"]);
    assert_eq!(task.channels().len().unwrap(), 4);
    assert_eq!(
        task.channels().get("Dev1/ao0").unwrap().chan_type().unwrap(),
        ChannelType::AnalogOutput
    );
}

/// Thermocouple channels, including an object-valued attribute.
#[test]
fn test_thermocouple_channel() {
    let (_driver, task) = common::task("thermo");
    let options = AIThrmcplChanOptions {
        thermocouple_type: ThermocoupleType::K,
        cjc_source: CJCSource::ScannableChannel,
        cjc_channel: "Dev1/ai3".into(),
        ..Default::default()
    };
    let channel = task
        .ai_channels()
        .add_ai_thrmcpl_chan("Dev1/ai0", &options)
        .unwrap();

    assert_eq!(channel.ai_meas_type().unwrap(), UsageTypeAI::TemperatureThermocouple);
    assert_eq!(channel.ai_thrmcpl_type().unwrap(), ThermocoupleType::K);
    assert_eq!(channel.ai_thrmcpl_cjc_src().unwrap(), CJCSource::ScannableChannel);

    let cjc = channel.ai_thrmcpl_cjc_chan().unwrap();
    assert_eq!(cjc.name(), "Dev1/ai3");
    assert_eq!(cjc.task_handle(), task.task_handle());

    let default = task
        .ai_channels()
        .add_ai_thrmcpl_chan("Dev1/ai1", &Default::default())
        .unwrap();
    assert_eq!(default.ai_thrmcpl_type().unwrap(), ThermocoupleType::J);
    assert_eq!(default.ai_thrmcpl_cjc_val().unwrap(), 25.0);
}

/// Output and counter channels carry their measurement types.
#[test]
fn test_output_and_counter_channels() {
    let (_driver, task) = common::task("outputs");

    let ao = task
        .ao_channels()
        .add_ao_current_chan("Dev1/ao1", &Default::default())
        .unwrap();
    assert_eq!(ao.ao_output_type().unwrap(), UsageTypeAO::Current);
    assert_eq!(ao.ao_max().unwrap(), 0.02);

    let options = CICountEdgesChanOptions {
        edge: Edge::Falling,
        initial_count: 10,
        count_direction: CountDirection::CountDown,
        ..Default::default()
    };
    let ci = task
        .ci_channels()
        .add_ci_count_edges_chan("Dev1/ctr0", &options)
        .unwrap();
    assert_eq!(ci.ci_meas_type().unwrap(), UsageTypeCI::CountEdges);
    assert_eq!(ci.ci_count_edges_active_edge().unwrap(), Edge::Falling);
    assert_eq!(ci.ci_count_edges_initial_cnt().unwrap(), 10);
    assert_eq!(ci.ci_count_edges_dir().unwrap(), CountDirection::CountDown);

    let freq = task
        .ci_channels()
        .add_ci_freq_chan("Dev1/ctr1", &Default::default())
        .unwrap();
    assert_eq!(freq.ci_meas_type().unwrap(), UsageTypeCI::Frequency);
    assert_eq!(freq.ci_freq_units().unwrap(), FrequencyUnits::Hz);
    assert_eq!(freq.ci_min().unwrap(), 2.0);

    let options = COPulseChanFreqOptions {
        freq: 250.0,
        duty_cycle: 0.25,
        ..Default::default()
    };
    let co = task
        .co_channels()
        .add_co_pulse_chan_freq("Dev1/ctr2", &options)
        .unwrap();
    assert_eq!(co.co_output_type().unwrap(), UsageTypeCO::PulseFrequency);
    assert_eq!(co.co_pulse_freq().unwrap(), 250.0);
    assert_eq!(co.co_pulse_duty_cyc().unwrap(), 0.25);
    assert_eq!(co.co_pulse_idle_state().unwrap(), Level::Low);

    let options = COPulseChanTimeOptions {
        idle_state: Level::High,
        ..Default::default()
    };
    let timed = task
        .co_channels()
        .add_co_pulse_chan_time("Dev1/ctr3", &options)
        .unwrap();
    assert_eq!(timed.co_output_type().unwrap(), UsageTypeCO::PulseTime);
    assert_eq!(timed.co_pulse_idle_state().unwrap(), Level::High);
    assert_eq!(timed.co_pulse_high_time().unwrap(), 0.01);
}

/// Line grouping decides how many digital channels are created.
#[test]
fn test_digital_line_grouping() {
    let (_driver, task) = common::task("digital");

    let port = task
        .di_channels()
        .add_di_chan("Dev1/port0/line0:7", "", LineGrouping::ChanForAllLines)
        .unwrap();
    assert_eq!(port.name(), "Dev1/port0/line0:7");
    assert_eq!(port.di_num_lines().unwrap(), 8);
    assert_eq!(task.number_of_channels().unwrap(), 1);

    let lines = task
        .do_channels()
        .add_do_chan("Dev1/port0/line8:9", "out", LineGrouping::ChanPerLine)
        .unwrap();
    assert_eq!(lines.name(), "out0:1");
    assert_eq!(task.do_channels().names().unwrap(), ["out0", "out1"]);
    assert_eq!(lines.do_num_lines().unwrap(), 1);
}

/// Driver validation of channel creation arguments.
#[test]
fn test_invalid_channel_arguments() {
    let (_driver, task) = common::task("invalid");
    let collection = task.ai_channels();

    let err = collection
        .add_ai_voltage_chan("Dev9/ai0", &Default::default())
        .unwrap_err();
    assert!(err.is(ErrorCode::InvalidPhysicalChanString));

    let options = AIVoltageChanOptions {
        min_val: 1.0,
        max_val: 1.0,
        ..Default::default()
    };
    let err = collection
        .add_ai_voltage_chan("Dev1/ai0", &options)
        .unwrap_err();
    assert!(err.is(ErrorCode::MinNotLessThanMax));

    collection
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let err = collection
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap_err();
    assert!(err.is(ErrorCode::DuplicatePhysChansNotSupported));
    assert_eq!(task.number_of_channels().unwrap(), 1);
}

/// String attributes are writable and resettable on channels.
#[test]
fn test_channel_description() {
    let (_driver, task) = common::task("described");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();

    channel.set_description("inlet pressure").unwrap();
    assert_eq!(channel.description().unwrap(), "inlet pressure");
    assert!(!channel.chan_is_global().unwrap());
}
