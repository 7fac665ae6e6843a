//! The `errors` template: the closed status-code enum.

use std::collections::BTreeMap;

use daqmx_metadata::MetadataStore;

use crate::error::CodegenError;
use crate::naming::camel_case;
use crate::writer::CodeWriter;

/// Renders `ErrorCode` with one variant per catalog status, by value.
pub fn render(store: &MetadataStore) -> Result<String, CodegenError> {
    let mut seen = BTreeMap::new();
    let mut codes = Vec::new();
    for code in store.errors() {
        let variant = camel_case(&code.name);
        if seen.insert(variant.clone(), ()).is_some() {
            return Err(CodegenError::NameCollision {
                location: format!("errors: {} ({})", code.name, code.value),
                class: "ErrorCode".to_string(),
                name: variant,
            });
        }
        codes.push((variant, code));
    }

    let mut w = CodeWriter::new();
    w.doc("Status codes the driver reports. Negative codes are errors, positive codes are warnings.");
    w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    w.line("#[repr(i32)]");
    w.open("pub enum ErrorCode {");
    for (variant, code) in &codes {
        w.doc(&code.description);
        w.line(format!("{variant} = {},", code.value));
    }
    w.close("}");
    w.blank();

    w.open("impl ErrorCode {");
    w.doc("Every known code, ascending.");
    w.open("pub const ALL: &'static [Self] = &[");
    for (variant, _) in &codes {
        w.line(format!("Self::{variant},"));
    }
    w.close("];");
    w.blank();

    w.doc("Looks up a status returned by the driver.");
    w.line("#[must_use]");
    w.open("pub fn from_code(code: i32) -> Option<Self> {");
    w.open("match code {");
    for (variant, code) in &codes {
        w.line(format!("{} => Some(Self::{variant}),", code.value));
    }
    w.line("_ => None,");
    w.close("}");
    w.close("}");
    w.blank();

    w.doc("The numeric status.");
    w.line("#[must_use]");
    w.open("pub fn code(self) -> i32 {");
    w.line("self as i32");
    w.close("}");
    w.blank();

    w.doc("The driver's symbolic name.");
    w.line("#[must_use]");
    w.open("pub fn name(self) -> &'static str {");
    w.open("match self {");
    for (variant, code) in &codes {
        w.line(format!("Self::{variant} => {:?},", code.name));
    }
    w.close("}");
    w.close("}");
    w.blank();

    w.doc("Human-readable description.");
    w.line("#[must_use]");
    w.open("pub fn description(self) -> &'static str {");
    w.open("match self {");
    for (variant, code) in &codes {
        w.line(format!("Self::{variant} => {:?},", code.description));
    }
    w.close("}");
    w.close("}");
    w.blank();

    w.doc("Whether the code is a warning rather than an error.");
    w.line("#[must_use]");
    w.open("pub fn is_warning(self) -> bool {");
    w.line("self.code() > 0");
    w.close("}");
    w.close("}");
    w.blank();

    w.open("impl std::fmt::Display for ErrorCode {");
    w.open("fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {");
    w.line("write!(f, \"{} ({})\", self.name(), self.code())");
    w.close("}");
    w.close("}");
    Ok(w.finish())
}
