//! Custom scales.

use std::sync::Arc;

use tracing::info;

use crate::enums::UnitsPreScaled;
use crate::interpreter::Interpreter;
use crate::Result;

impl Scale {
    /// Creates a linear scale `y = slope * x + y_intercept` and returns it.
    ///
    /// The scale exists for the life of the process unless saved in NI MAX.
    pub fn create_lin_scale(
        interpreter: Arc<Interpreter>,
        name: &str,
        slope: f64,
        y_intercept: f64,
        pre_scaled_units: UnitsPreScaled,
        scaled_units: &str,
    ) -> Result<Self> {
        interpreter.create_lin_scale(name, slope, y_intercept, pre_scaled_units.value(), scaled_units)?;
        info!(name, slope, y_intercept, "created linear scale");
        Ok(Self::new(interpreter, name))
    }
}

include!(concat!(env!("OUT_DIR"), "/scale.rs"));
