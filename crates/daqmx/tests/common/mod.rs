//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use daqmx::driver::DriverApi;
use daqmx::{Interpreter, Task};
use daqmx_mock::MockDriver;

/// A mock with `Dev1` and an interpreter talking to it.
pub fn simulated() -> (Arc<MockDriver>, Arc<Interpreter>) {
    let driver = Arc::new(MockDriver::simulated());
    let api: Arc<dyn DriverApi> = driver.clone();
    (driver, Arc::new(Interpreter::new(api)))
}

/// A fresh task on a fresh simulated driver.
pub fn task(name: &str) -> (Arc<MockDriver>, Task) {
    let (driver, interpreter) = simulated();
    let task = Task::with_interpreter(interpreter, name).unwrap();
    (driver, task)
}
