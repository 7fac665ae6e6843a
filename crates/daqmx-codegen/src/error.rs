//! Generator errors.

use std::io;
use std::path::PathBuf;

use daqmx_metadata::MetadataError;
use thiserror::Error;

/// Everything that can stop a generator run.
///
/// Every variant names the module, class or catalog record it concerns;
/// generation never skips a record it cannot handle.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The catalog failed to load or validate.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// The generator configuration could not be read.
    #[error("failed to load generator config {path}: {message}")]
    Config {
        /// Config file.
        path: String,
        /// Figment's message.
        message: String,
    },

    /// A module entry lacks a field its template needs.
    #[error("module {output}: template `{template}` requires `{field}`")]
    MissingTemplateField {
        /// Output path of the module entry.
        output: String,
        /// Template name.
        template: &'static str,
        /// Missing field.
        field: &'static str,
    },

    /// A module entry names a class the catalog lacks.
    #[error("module {output}: class `{class}` is not in the catalog")]
    UnknownClass {
        /// Output path of the module entry.
        output: String,
        /// Requested class.
        class: String,
    },

    /// Two module or copy entries write the same file.
    #[error("output {0} is produced more than once")]
    DuplicateOutput(String),

    /// A generated method would clash with another generated or
    /// hand-written method of the same type.
    #[error("{location}: `{class}::{name}` is defined more than once")]
    NameCollision {
        /// Record that introduced the second definition.
        location: String,
        /// Rust type.
        class: String,
        /// Method or variant name.
        name: String,
    },

    /// A record refers to a class or enum the emitter cannot find.
    #[error("{location}: unresolved reference `{name}`")]
    UnresolvedReference {
        /// Record location.
        location: String,
        /// Missing name.
        name: String,
    },

    /// An attribute's shape has no dispatcher method.
    #[error("{location}: attribute shape cannot be generated")]
    UnsupportedAttribute {
        /// Attribute location.
        location: String,
    },

    /// Reading a copy source or writing output failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
