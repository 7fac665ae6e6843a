//! Templates. Each renders one module body from the store.
//!
//! Generated modules are spliced into the runtime crate with `include!`, so
//! they use fully qualified paths, no `use` items and no inner attributes.

pub mod class;
pub mod collections;
pub mod enums;
pub mod errors;

use daqmx_metadata::{HandleKind, HandleParameter, MetadataStore, ScalarKind};

use crate::error::CodegenError;
use crate::writer::CodeWriter;

pub(crate) const INTERPRETER: &str = "std::sync::Arc<crate::interpreter::Interpreter>";
pub(crate) const HANDLE_ARG: &str = "crate::interpreter::HandleArg";
pub(crate) const ATTRIBUTE_CALL: &str = "crate::interpreter::AttributeCall";

/// Rust type of a scalar element.
pub(crate) fn scalar_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::Int32 => "i32",
        ScalarKind::Uint32 => "u32",
        ScalarKind::Int64 => "i64",
        ScalarKind::Uint64 => "u64",
        ScalarKind::Float64 => "f64",
        ScalarKind::String => "String",
    }
}

/// Suffix of the interpreter's scalar methods (`get_f64`, `set_string`).
pub(crate) fn scalar_suffix(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "string",
        other => scalar_type(other),
    }
}

/// Rust type of a handle field.
pub(crate) fn handle_field_type(kind: HandleKind) -> &'static str {
    match kind {
        HandleKind::Task => "crate::TaskHandle",
        HandleKind::String => "String",
    }
}

/// Emits `let handles = [...];` reading fields of `receiver`.
pub(crate) fn handle_array(w: &mut CodeWriter, receiver: &str, params: &[HandleParameter]) {
    if params.is_empty() {
        w.line(format!("let handles: [{HANDLE_ARG}<'_>; 0] = [];"));
        return;
    }
    w.open("let handles = [");
    for param in params {
        match param.kind {
            HandleKind::Task => w.line(format!("{HANDLE_ARG}::Task({receiver}.{}),", param.name)),
            HandleKind::String => {
                w.line(format!("{HANDLE_ARG}::Name(&{receiver}.{}),", param.name))
            }
        };
    }
    w.close("];");
}

/// Emits `let call = AttributeCall::new(stem, &handles, id);`.
pub(crate) fn attribute_call(w: &mut CodeWriter, stem: &str, id: i32) {
    w.line(format!("let call = {ATTRIBUTE_CALL}::new({stem:?}, &handles, {id});"));
}

/// Fully qualified paths of catalog types.
pub(crate) struct Paths<'a> {
    pub store: &'a MetadataStore,
}

impl<'a> Paths<'a> {
    pub fn new(store: &'a MetadataStore) -> Self {
        Self { store }
    }

    /// `crate::enums::<TypeName>` for a driver-facing enum name.
    pub fn enum_type(&self, name: &str, location: &str) -> Result<String, CodegenError> {
        self.store
            .enum_descriptor(name)
            .map(|e| format!("crate::enums::{}", e.type_name()))
            .ok_or_else(|| CodegenError::UnresolvedReference {
                location: location.to_string(),
                name: name.to_string(),
            })
    }

    /// `crate::<module>::<Class>`.
    pub fn class_type(&self, name: &str, location: &str) -> Result<String, CodegenError> {
        self.store
            .class(name)
            .map(|c| format!("crate::{}::{}", c.module, c.name))
            .ok_or_else(|| CodegenError::UnresolvedReference {
                location: location.to_string(),
                name: name.to_string(),
            })
    }
}

/// Joins constructor arguments: the interpreter clone, then handle fields.
pub(crate) fn constructor_args(receiver: &str, fields: &[&HandleParameter]) -> Vec<String> {
    let mut args = vec![format!("std::sync::Arc::clone(&{receiver}.interpreter)")];
    args.extend(fields.iter().map(|p| match p.kind {
        HandleKind::Task => format!("{receiver}.{}", p.name),
        HandleKind::String => format!("{receiver}.{}.clone()", p.name),
    }));
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, kind: HandleKind) -> HandleParameter {
        HandleParameter {
            name: name.into(),
            c_name: name.into(),
            kind,
        }
    }

    #[test]
    fn handle_array_for_task_and_name() {
        let mut w = CodeWriter::new();
        handle_array(
            &mut w,
            "self",
            &[param("task_handle", HandleKind::Task), param("name", HandleKind::String)],
        );
        assert_eq!(
            w.finish(),
            "let handles = [\n    crate::interpreter::HandleArg::Task(self.task_handle),\n    crate::interpreter::HandleArg::Name(&self.name),\n];\n"
        );
    }

    #[test]
    fn handle_array_without_parameters_is_typed() {
        let mut w = CodeWriter::new();
        handle_array(&mut w, "self", &[]);
        assert_eq!(
            w.finish(),
            "let handles: [crate::interpreter::HandleArg<'_>; 0] = [];\n"
        );
    }
}
