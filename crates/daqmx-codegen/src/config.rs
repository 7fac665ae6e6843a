//! Generator configuration (`codegen.toml`).
//!
//! ```toml
//! header = "// Generated from the metadata catalog. Do not edit."
//!
//! [[modules]]
//! output = "enums.rs"
//! template = "enums"
//!
//! [[modules]]
//! output = "ai_channel.rs"
//! template = "class"
//! class = "AIChannel"
//!
//! [[copy]]
//! source = "static/prelude.rs"
//! output = "prelude.rs"
//! ```
//!
//! Values can be overridden with `DAQMX_CODEGEN_*` environment variables
//! (for example `DAQMX_CODEGEN_HEADER`).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::CodegenError;

/// Header written at the top of every generated module.
pub const DEFAULT_HEADER: &str =
    "// Generated by daqmx-codegen from the metadata catalog. Do not edit.";

/// What a module entry emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// One class: struct, constructor, handle accessors and attributes.
    Class,
    /// Every enum in the catalog.
    Enums,
    /// The closed status-code enum.
    Errors,
    /// Every collection plus the owner accessors.
    Collections,
}

impl Template {
    /// Name used in `codegen.toml`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Enums => "enums",
            Self::Errors => "errors",
            Self::Collections => "collections",
        }
    }
}

/// A module to generate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// File name, relative to the output directory.
    pub output: PathBuf,
    /// Template to render.
    pub template: Template,
    /// Class rendered by the `class` template.
    #[serde(default)]
    pub class: Option<String>,
}

/// A file copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopySpec {
    /// Source, relative to the config file.
    pub source: PathBuf,
    /// Destination, relative to the output directory.
    pub output: PathBuf,
}

/// Parsed `codegen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodegenConfig {
    /// Generated modules, rendered in order.
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    /// Verbatim copies.
    #[serde(default)]
    pub copy: Vec<CopySpec>,
    /// Overrides [`DEFAULT_HEADER`].
    #[serde(default)]
    pub header: Option<String>,
    /// Directory copy sources are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl CodegenConfig {
    /// Loads a config file, then applies `DAQMX_CODEGEN_*` overrides.
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        debug!(path = %path.display(), "loading generator config");
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("DAQMX_CODEGEN_"));
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::extract(figment, path.display().to_string(), base_dir)
    }

    /// Parses config text; copy sources resolve against `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, CodegenError> {
        Self::extract(
            Figment::from(Toml::string(text)),
            "<inline>".to_string(),
            base_dir.into(),
        )
    }

    fn extract(figment: Figment, path: String, base_dir: PathBuf) -> Result<Self, CodegenError> {
        let mut config: Self = figment.extract().map_err(|e| CodegenError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        config.base_dir = base_dir;
        config.check()?;
        Ok(config)
    }

    /// Header text for generated files.
    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(DEFAULT_HEADER)
    }

    /// Absolute (or config-relative) path of a copy source.
    pub fn source_path(&self, copy: &CopySpec) -> PathBuf {
        self.base_dir.join(&copy.source)
    }

    fn check(&self) -> Result<(), CodegenError> {
        let mut outputs = BTreeSet::new();
        let all_outputs = self
            .modules
            .iter()
            .map(|m| &m.output)
            .chain(self.copy.iter().map(|c| &c.output));
        for output in all_outputs {
            if !outputs.insert(output) {
                return Err(CodegenError::DuplicateOutput(output.display().to_string()));
            }
        }

        for module in &self.modules {
            if module.template == Template::Class && module.class.is_none() {
                return Err(CodegenError::MissingTemplateField {
                    output: module.output.display().to_string(),
                    template: module.template.as_str(),
                    field: "class",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modules_and_copies() {
        let config = CodegenConfig::from_toml_str(
            r#"
            [[modules]]
            output = "enums.rs"
            template = "enums"

            [[modules]]
            output = "ai_channel.rs"
            template = "class"
            class = "AIChannel"

            [[copy]]
            source = "static/a.rs"
            output = "a.rs"
            "#,
            "/cfg",
        )
        .unwrap();

        assert_eq!(config.modules.len(), 2);
        assert_eq!(config.modules[1].class.as_deref(), Some("AIChannel"));
        assert_eq!(config.source_path(&config.copy[0]), Path::new("/cfg/static/a.rs"));
        assert_eq!(config.header(), DEFAULT_HEADER);
    }

    #[test]
    fn class_template_requires_class() {
        let err = CodegenConfig::from_toml_str(
            "[[modules]]\noutput = \"x.rs\"\ntemplate = \"class\"\n",
            ".",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::MissingTemplateField { field: "class", .. }
        ));
    }

    #[test]
    fn duplicate_outputs_are_rejected() {
        let err = CodegenConfig::from_toml_str(
            r#"
            [[modules]]
            output = "x.rs"
            template = "enums"

            [[copy]]
            source = "y.rs"
            output = "x.rs"
            "#,
            ".",
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateOutput(ref p) if p == "x.rs"));
    }

    #[test]
    fn unknown_template_is_a_config_error() {
        let err = CodegenConfig::from_toml_str(
            "[[modules]]\noutput = \"x.rs\"\ntemplate = \"python\"\n",
            ".",
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::Config { .. }));
    }
}
