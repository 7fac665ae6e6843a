//! Generated attribute accessors on a channel, end to end through the mock.

mod common;

use daqmx::enums::{DataJustification, TerminalConfigurations, ThermocoupleType};
use daqmx::interpreter::HandleArg;
use daqmx::physical_channel::PhysicalChannel;
use daqmx::{Error, ErrorCode};
use daqmx_mock::MockValue;

const AI_RAW_SAMP_JUSTIFICATION: i32 = 80;
const AI_ATTEN: i32 = 6145;
const AI_BRIDGE_POLY_FORWARD_COEFF: i32 = 12176;
const AI_THRMCPL_TYPE: i32 = 4144;
const AI_MAX: i32 = 6109;
const PHYS_AI_TERM_CFGS: i32 = 9026;

#[test]
fn test_float_attribute_set_get_reset() {
    let (driver, task) = common::task("atten");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();

    channel.set_ai_atten(2.5).unwrap();
    assert_eq!(channel.ai_atten().unwrap(), 2.5);

    channel.reset_ai_atten().unwrap();
    let handles = [HandleArg::Task(task.task_handle()), HandleArg::Name("Dev1/ai0")];
    assert_eq!(driver.value("ChanAttribute", &handles, AI_ATTEN), None);
    let err = channel.ai_atten().unwrap_err();
    assert!(err.is(ErrorCode::PropertyNotSupported));
}

#[test]
fn test_read_only_enum_attribute() {
    let (driver, task) = common::task("justified");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let handles = [HandleArg::Task(task.task_handle()), HandleArg::Name("Dev1/ai0")];

    driver.set_value(
        "ChanAttribute",
        &handles,
        AI_RAW_SAMP_JUSTIFICATION,
        MockValue::I32(10279),
    );
    assert_eq!(
        channel.ai_raw_samp_justification().unwrap(),
        DataJustification::Right
    );

    driver.set_value(
        "ChanAttribute",
        &handles,
        AI_RAW_SAMP_JUSTIFICATION,
        MockValue::I32(10209),
    );
    assert_eq!(
        channel.ai_raw_samp_justification().unwrap(),
        DataJustification::Left
    );
}

#[test]
fn test_float_list_attribute() {
    let (driver, task) = common::task("bridge");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();

    channel
        .set_ai_bridge_poly_forward_coeff(&[0.0, 1.5, -0.25, 0.125])
        .unwrap();
    driver.clear_calls();
    assert_eq!(
        channel.ai_bridge_poly_forward_coeff().unwrap(),
        [0.0, 1.5, -0.25, 0.125]
    );

    let calls = driver.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].is_probe());
    assert_eq!(calls[0].attribute, Some(AI_BRIDGE_POLY_FORWARD_COEFF));
    assert_eq!(calls[1].buffer_len, Some(4));

    channel.set_ai_bridge_poly_forward_coeff(&[]).unwrap();
    assert!(channel.ai_bridge_poly_forward_coeff().unwrap().is_empty());
}

#[test]
fn test_rejected_value_keeps_previous_setting() {
    let (driver, task) = common::task("rejected");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    channel.set_ai_max(4.0).unwrap();

    driver.inject(
        "DAQmxSetChanAttribute",
        Some(6109),
        ErrorCode::InvalidAttributeValue.code(),
    );
    let err = channel.set_ai_max(1.0e9).unwrap_err();
    let Error::Driver(driver_error) = err else {
        panic!("expected a driver error");
    };
    assert_eq!(driver_error.code, -200_077);
    assert_eq!(driver_error.error_code, Some(ErrorCode::InvalidAttributeValue));
    assert_eq!(driver_error.function, "DAQmxSetChanAttribute");
    assert_eq!(driver_error.attribute, Some(6109));

    assert_eq!(channel.ai_max().unwrap(), 4.0);
}

#[test]
fn test_enum_attribute_round_trips_every_member() {
    let (driver, task) = common::task("thermocouples");
    let channel = task
        .ai_channels()
        .add_ai_thrmcpl_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let handles = [HandleArg::Task(task.task_handle()), HandleArg::Name("Dev1/ai0")];

    for &member in ThermocoupleType::ALL {
        channel.set_ai_thrmcpl_type(member).unwrap();
        assert_eq!(channel.ai_thrmcpl_type().unwrap(), member);
        assert_eq!(
            driver.value("ChanAttribute", &handles, AI_THRMCPL_TYPE),
            Some(MockValue::I32(member.value()))
        );
    }
}

#[test]
fn test_bitfield_attribute_decodes_every_combination() {
    let (driver, interpreter) = common::simulated();
    let terminal = PhysicalChannel::new(interpreter, "Dev1/ai0");
    let handles = [HandleArg::Name("Dev1/ai0")];
    let all = TerminalConfigurations::ALL;

    for mask in 0..(1u32 << all.len()) {
        let members: Vec<TerminalConfigurations> = all
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, m)| *m)
            .collect();
        let composed = TerminalConfigurations::compose(&members);
        driver.set_value(
            "PhysicalChanAttribute",
            &handles,
            PHYS_AI_TERM_CFGS,
            MockValue::I32(composed),
        );

        assert_eq!(terminal.ai_term_cfgs().unwrap(), members);
        assert_eq!(TerminalConfigurations::decompose(composed), members);
    }
}

#[test]
fn test_writing_back_a_read_value_changes_nothing() {
    let (driver, task) = common::task("idempotent");
    let channel = task
        .ai_channels()
        .add_ai_thrmcpl_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let handles = [HandleArg::Task(task.task_handle()), HandleArg::Name("Dev1/ai0")];
    let stored = |attribute| driver.value("ChanAttribute", &handles, attribute);

    let max_before = stored(AI_MAX);
    channel.set_ai_max(channel.ai_max().unwrap()).unwrap();
    assert_eq!(stored(AI_MAX), max_before);
    assert_eq!(channel.ai_max().unwrap(), 100.0);

    let type_before = stored(AI_THRMCPL_TYPE);
    channel
        .set_ai_thrmcpl_type(channel.ai_thrmcpl_type().unwrap())
        .unwrap();
    assert_eq!(stored(AI_THRMCPL_TYPE), type_before);
    assert_eq!(channel.ai_thrmcpl_type().unwrap(), ThermocoupleType::J);

    channel.set_description("oven").unwrap();
    channel.set_description(&channel.description().unwrap()).unwrap();
    assert_eq!(channel.description().unwrap(), "oven");
}
