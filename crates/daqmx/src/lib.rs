//! `daqmx`
//!
//! Typed access to NI-DAQmx. Most of the API is generated at build time
//! from the metadata catalog in `daqmx-metadata`: one type per driver
//! object class with a getter, setter and reset method per attribute, the
//! driver's enums and status codes, and name-indexed collections. Task
//! lifecycle, channel creation, timing and trigger configuration, and the
//! persisted-object operations are written by hand on top.
//!
//! Every call goes through an [`Interpreter`], which owns a [`driver::DriverApi`]
//! implementation. [`driver::LibraryDriver`] loads the NI shared library at
//! runtime; `daqmx-mock` provides an in-memory driver for tests.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use daqmx::enums::{AcquisitionType, Edge};
//! use daqmx::Task;
//!
//! # fn main() -> daqmx::Result<()> {
//! let task = Task::new("")?;
//! let channel = task
//!     .ai_channels()
//!     .add_ai_voltage_chan("Dev1/ai0", &Default::default())?;
//! channel.set_ai_max(2.0)?;
//! task.timing()
//!     .cfg_samp_clk_timing(1000.0, "", Edge::Rising, AcquisitionType::Finite, 100)?;
//! task.start()?;
//! task.wait_until_done(Some(Duration::from_secs(2)))?;
//! task.close()
//! # }
//! ```
//!
//! # Configuration
//!
//! The process-wide interpreter behind [`Task::new`] and [`System::local`]
//! reads [`config::InterpreterConfig`] from `daqmx.toml` and `DAQMX_*`
//! environment variables.

pub mod collections;
pub mod config;
pub mod device;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod interpreter;
pub mod persisted_channel;
pub mod persisted_scale;
pub mod persisted_task;
pub mod reference_trigger;
pub mod scale;
pub mod start_trigger;
pub mod system;
pub mod task;
pub mod timing;
pub mod triggers;
pub mod utils;

mod handle;

/// Driver enumerations.
#[allow(clippy::all)]
pub mod enums {
    include!(concat!(env!("OUT_DIR"), "/enums.rs"));
}

/// Driver status codes.
#[allow(clippy::all)]
pub mod error_codes {
    include!(concat!(env!("OUT_DIR"), "/error_codes.rs"));
}

/// Virtual channels of any type.
pub mod channel {
    include!(concat!(env!("OUT_DIR"), "/channel.rs"));
}

/// Analog input channels.
pub mod ai_channel {
    include!(concat!(env!("OUT_DIR"), "/ai_channel.rs"));
}

/// Analog output channels.
pub mod ao_channel {
    include!(concat!(env!("OUT_DIR"), "/ao_channel.rs"));
}

/// Counter input channels.
pub mod ci_channel {
    include!(concat!(env!("OUT_DIR"), "/ci_channel.rs"));
}

/// Counter output channels.
pub mod co_channel {
    include!(concat!(env!("OUT_DIR"), "/co_channel.rs"));
}

/// Digital input channels.
pub mod di_channel {
    include!(concat!(env!("OUT_DIR"), "/di_channel.rs"));
}

/// Digital output channels.
pub mod do_channel {
    include!(concat!(env!("OUT_DIR"), "/do_channel.rs"));
}

/// Device terminals.
pub mod physical_channel {
    include!(concat!(env!("OUT_DIR"), "/physical_channel.rs"));
}

/// Read settings.
pub mod in_stream {
    include!(concat!(env!("OUT_DIR"), "/in_stream.rs"));
}

/// Write settings.
pub mod out_stream {
    include!(concat!(env!("OUT_DIR"), "/out_stream.rs"));
}

/// Pause trigger.
pub mod pause_trigger {
    include!(concat!(env!("OUT_DIR"), "/pause_trigger.rs"));
}

/// Arm start trigger.
pub mod arm_start_trigger {
    include!(concat!(env!("OUT_DIR"), "/arm_start_trigger.rs"));
}

pub use device::Device;
pub use error::{DriverError, Error, Result};
pub use error_codes::ErrorCode;
pub use handle::TaskHandle;
pub use interpreter::Interpreter;
pub use system::{DriverVersion, System};
pub use task::Task;
