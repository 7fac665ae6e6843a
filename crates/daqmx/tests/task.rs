//! Task lifecycle, timing and triggering against the mock driver.

mod common;

use std::time::Duration;

use daqmx::collections::AIVoltageChanOptions;
use daqmx::enums::{AcquisitionType, Edge, SampleTimingType, Slope, TaskMode, TriggerType};
use daqmx::{Error, ErrorCode, Task};

/// A named task reports its name; an unnamed one gets a driver name.
#[test]
fn test_task_names() {
    let (driver, interpreter) = common::simulated();

    let named = Task::with_interpreter(interpreter.clone(), "acquire").unwrap();
    assert_eq!(named.name().unwrap(), "acquire");

    let unnamed = Task::with_interpreter(interpreter.clone(), "").unwrap();
    assert_eq!(unnamed.name().unwrap(), "_unnamedTask<0>");
    assert_ne!(named, unnamed);

    let err = Task::with_interpreter(interpreter, "acquire").unwrap_err();
    assert!(err.is(ErrorCode::TaskNameAlreadyUsed));
    assert_eq!(driver.open_tasks().len(), 2);
}

/// Start, stop and the done flags track the task state.
#[test]
fn test_start_stop() {
    let (driver, task) = common::task("run");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();

    assert!(task.is_task_done().unwrap());
    task.start().unwrap();
    assert!(driver.is_running(task.task_handle()));
    assert!(!task.is_task_done().unwrap());
    assert!(!task.task_complete().unwrap());

    task.stop().unwrap();
    assert!(!driver.is_running(task.task_handle()));
    assert!(task.task_complete().unwrap());
}

/// Waiting for a finite task leaves it done.
#[test]
fn test_wait_until_done() {
    let (_driver, task) = common::task("finite");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    task.timing()
        .cfg_samp_clk_timing(1000.0, "", Edge::Rising, AcquisitionType::Finite, 100)
        .unwrap();

    task.start().unwrap();
    task.wait_until_done(Some(Duration::from_secs(1))).unwrap();
    assert!(task.is_task_done().unwrap());

    task.start().unwrap();
    task.wait_until_done(None).unwrap();
    assert!(task.is_task_done().unwrap());
}

/// State transitions through `control`.
#[test]
fn test_control() {
    let (driver, task) = common::task("control");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();

    task.control(TaskMode::TaskCommit).unwrap();
    assert!(!driver.is_running(task.task_handle()));
    task.control(TaskMode::TaskStart).unwrap();
    assert!(driver.is_running(task.task_handle()));
    task.control(TaskMode::TaskAbort).unwrap();
    assert!(!driver.is_running(task.task_handle()));
}

/// Channel settings cannot change while the task runs.
#[test]
fn test_running_task_rejects_settings() {
    let (_driver, task) = common::task("locked");
    let channel = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    task.start().unwrap();

    let err = channel.set_ai_max(1.0).unwrap_err();
    assert!(err.is(ErrorCode::AttributeNotSettableWhenTaskRunning));
    assert_eq!(err.driver_code(), Some(-200_557));
    let err = task
        .ai_channels()
        .add_ai_voltage_chan("Dev1/ai1", &Default::default())
        .unwrap_err();
    assert!(err.is(ErrorCode::AttributeNotSettableWhenTaskRunning));

    task.stop().unwrap();
    channel.set_ai_max(1.0).unwrap();
    assert_eq!(channel.ai_max().unwrap(), 1.0);
}

/// Closing and dropping both clear the driver task; borrowed handles do not.
#[test]
fn test_close_and_drop() {
    let (driver, interpreter) = common::simulated();

    let task = Task::with_interpreter(interpreter.clone(), "closed").unwrap();
    task.close().unwrap();
    assert!(driver.open_tasks().is_empty());

    let task = Task::with_interpreter(interpreter.clone(), "dropped").unwrap();
    drop(task);
    assert!(driver.open_tasks().is_empty());

    let owner = Task::with_interpreter(interpreter.clone(), "owner").unwrap();
    let borrowed = Task::from_handle(interpreter, owner.task_handle(), false);
    assert_eq!(borrowed, owner);
    assert_eq!(borrowed.name().unwrap(), "owner");
    drop(borrowed);
    assert_eq!(driver.open_tasks(), ["owner"]);
}

/// A task's channel and device lists follow its channels.
#[test]
fn test_task_channel_lists() {
    let (_driver, task) = common::task("lists");
    let options = AIVoltageChanOptions {
        name_to_assign: "v".into(),
        ..Default::default()
    };
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0:2", &options)
        .unwrap();
    task.ao_channels()
        .add_ao_voltage_chan("Dev1/ao0", &Default::default())
        .unwrap();

    assert_eq!(task.channel_names().unwrap(), ["v0", "v1", "v2", "Dev1/ao0"]);
    assert_eq!(task.number_of_channels().unwrap(), 4);
    assert_eq!(task.devices().unwrap(), ["Dev1"]);
    assert_eq!(task.number_of_devices().unwrap(), 1);
}

/// Sample clock timing is readable back through the timing attributes.
#[test]
fn test_sample_clock_timing() {
    let (_driver, task) = common::task("timed");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let timing = task.timing();

    timing
        .cfg_samp_clk_timing(
            2500.0,
            "/Dev1/PFI0",
            Edge::Falling,
            AcquisitionType::Continuous,
            5000,
        )
        .unwrap();
    assert_eq!(timing.samp_timing_type().unwrap(), SampleTimingType::SampleClock);
    assert_eq!(timing.samp_clk_rate().unwrap(), 2500.0);
    assert_eq!(timing.samp_clk_src().unwrap(), "/Dev1/PFI0");
    assert_eq!(timing.samp_clk_active_edge().unwrap(), Edge::Falling);
    assert_eq!(timing.samp_quant_samp_mode().unwrap(), AcquisitionType::Continuous);
    assert_eq!(timing.samp_quant_samp_per_chan().unwrap(), 5000);

    timing.set_samp_quant_samp_per_chan(200).unwrap();
    assert_eq!(timing.samp_quant_samp_per_chan().unwrap(), 200);

    let err = timing
        .cfg_samp_clk_timing(0.0, "", Edge::Rising, AcquisitionType::Finite, 10)
        .unwrap_err();
    assert!(err.is(ErrorCode::InvalidSampRate));
}

/// Implicit timing only sets the sample quantity.
#[test]
fn test_implicit_timing() {
    let (_driver, task) = common::task("implicit");
    task.ci_channels()
        .add_ci_freq_chan("Dev1/ctr0", &Default::default())
        .unwrap();
    let timing = task.timing();

    timing
        .cfg_implicit_timing(AcquisitionType::Finite, 50)
        .unwrap();
    assert_eq!(timing.samp_timing_type().unwrap(), SampleTimingType::Implicit);
    assert_eq!(timing.samp_quant_samp_mode().unwrap(), AcquisitionType::Finite);
    assert_eq!(timing.samp_quant_samp_per_chan().unwrap(), 50);
}

/// Start trigger configuration and removal.
#[test]
fn test_start_trigger() {
    let (_driver, task) = common::task("triggered");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let trigger = task.triggers().start_trigger();
    assert_eq!(trigger.trig_type().unwrap(), TriggerType::None);

    trigger
        .cfg_dig_edge_start_trig("/Dev1/PFI1", Edge::Falling)
        .unwrap();
    assert_eq!(trigger.trig_type().unwrap(), TriggerType::DigitalEdge);
    assert_eq!(trigger.dig_edge_src().unwrap(), "/Dev1/PFI1");
    assert_eq!(trigger.dig_edge_edge().unwrap(), Edge::Falling);

    trigger
        .cfg_anlg_edge_start_trig("APFI0", Slope::Rising, 1.25)
        .unwrap();
    assert_eq!(trigger.trig_type().unwrap(), TriggerType::AnalogEdge);
    assert_eq!(trigger.anlg_edge_src().unwrap(), "APFI0");
    assert_eq!(trigger.anlg_edge_slope().unwrap(), Slope::Rising);
    assert_eq!(trigger.anlg_edge_lvl().unwrap(), 1.25);

    trigger.disable_start_trig().unwrap();
    assert_eq!(trigger.trig_type().unwrap(), TriggerType::None);
}

/// Reference trigger configuration and removal.
#[test]
fn test_reference_trigger() {
    let (_driver, task) = common::task("reference");
    task.ai_channels()
        .add_ai_voltage_chan("Dev1/ai0", &Default::default())
        .unwrap();
    let triggers = task.triggers();
    let trigger = triggers.reference_trigger();

    trigger
        .cfg_dig_edge_ref_trig("/Dev1/PFI2", 100, Edge::Rising)
        .unwrap();
    assert_eq!(trigger.trig_type().unwrap(), TriggerType::DigitalEdge);
    assert_eq!(trigger.pretrig_samples().unwrap(), 100);
    assert_eq!(trigger.dig_edge_src().unwrap(), "/Dev1/PFI2");

    trigger.disable_ref_trig().unwrap();
    assert_eq!(trigger.trig_type().unwrap(), TriggerType::None);
    assert_eq!(triggers.pause_trigger().trig_type().unwrap(), TriggerType::None);
    assert_eq!(triggers.arm_start_trigger().trig_type().unwrap(), TriggerType::None);
}

/// Operations on a cleared task fail with the driver's invalid-task error.
#[test]
fn test_cleared_handle_is_invalid() {
    let (_driver, interpreter) = common::simulated();
    let task = Task::with_interpreter(interpreter.clone(), "gone").unwrap();
    let stale = Task::from_handle(interpreter, task.task_handle(), false);
    task.close().unwrap();

    let err = stale.start().unwrap_err();
    assert!(err.is(ErrorCode::InvalidTask));
    assert!(matches!(err, Error::Driver(_)));
}
