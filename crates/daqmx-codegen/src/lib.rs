//! `daqmx-codegen`
//!
//! Emits the typed NI-DAQmx façade from the metadata catalog: one Rust
//! module per class, the enum and status-code modules, and the collection
//! views. The `daqmx` crate runs it from its build script; the
//! `daqmx-codegen` binary runs it by hand and checks checked-in output for
//! drift.
//!
//! ```no_run
//! use std::path::Path;
//! use daqmx_codegen::{CodegenConfig, Generator};
//! use daqmx_metadata::MetadataStore;
//!
//! # fn main() -> Result<(), daqmx_codegen::CodegenError> {
//! let store = MetadataStore::bundled()?;
//! let config = CodegenConfig::load(Path::new("codegen.toml"))?;
//! Generator::new(&store, &config).write_to(Path::new("generated"))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod naming;
pub mod writer;

pub use config::{CodegenConfig, CopySpec, ModuleSpec, Template};
pub use error::CodegenError;
pub use generator::{Drift, Generator};
