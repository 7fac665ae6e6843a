//! The `enums` template.

use std::collections::BTreeMap;

use daqmx_metadata::{EnumDescriptor, EnumMember, MetadataStore};

use crate::error::CodegenError;
use crate::naming::camel_case;
use crate::writer::CodeWriter;

/// Renders every enum in the catalog, ordered by public type name.
pub fn render(store: &MetadataStore) -> Result<String, CodegenError> {
    let by_type: BTreeMap<&str, &EnumDescriptor> =
        store.enums().map(|e| (e.type_name(), e)).collect();

    let mut w = CodeWriter::new();
    for (i, descriptor) in by_type.values().enumerate() {
        if i > 0 {
            w.blank();
        }
        emit_enum(&mut w, descriptor)?;
    }
    Ok(w.finish())
}

/// Members sorted by name, paired with their variant identifiers.
fn variants(descriptor: &EnumDescriptor) -> Result<Vec<(String, &EnumMember)>, CodegenError> {
    let mut members: Vec<&EnumMember> = descriptor.values.iter().collect();
    members.sort_by(|a, b| a.name.cmp(&b.name));

    let mut seen = BTreeMap::new();
    let mut out = Vec::with_capacity(members.len());
    for member in members {
        let variant = camel_case(&member.name);
        if seen.insert(variant.clone(), &member.name).is_some() {
            return Err(CodegenError::NameCollision {
                location: format!("{}: {}.{}", descriptor.source, descriptor.name, member.name),
                class: descriptor.type_name().to_string(),
                name: variant,
            });
        }
        out.push((variant, member));
    }
    Ok(out)
}

fn emit_enum(w: &mut CodeWriter, descriptor: &EnumDescriptor) -> Result<(), CodegenError> {
    let ty = descriptor.type_name();
    let variants = variants(descriptor)?;

    w.doc(&descriptor.doc);
    w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    w.line("#[repr(i32)]");
    w.open(format!("pub enum {ty} {{"));
    for (variant, member) in &variants {
        w.doc(&member.doc);
        w.line(format!("{variant} = {},", member.value));
    }
    w.close("}");
    w.blank();

    w.open(format!("impl {ty} {{"));
    w.doc("Every member, ordered by driver name.");
    w.open("pub const ALL: &'static [Self] = &[");
    for (variant, _) in &variants {
        w.line(format!("Self::{variant},"));
    }
    w.close("];");
    w.blank();
    w.doc("The driver's constant name.");
    w.line("#[must_use]");
    w.open("pub fn name(self) -> &'static str {");
    w.open("match self {");
    for (variant, member) in &variants {
        w.line(format!("Self::{variant} => {:?},", member.name));
    }
    w.close("}");
    w.close("}");
    w.blank();
    w.doc("The driver's numeric value.");
    w.line("#[must_use]");
    w.open("pub fn value(self) -> i32 {");
    w.line("self as i32");
    w.close("}");

    if descriptor.bitfield {
        w.blank();
        w.doc("Members whose bit is set in `mask`. Unknown bits are ignored.");
        w.line("#[must_use]");
        w.open("pub fn decompose(mask: i32) -> Vec<Self> {");
        w.line("Self::ALL.iter().copied().filter(|m| mask & m.value() != 0).collect()");
        w.close("}");
        w.blank();
        w.doc("ORs `members` into a mask.");
        w.line("#[must_use]");
        w.open("pub fn compose(members: &[Self]) -> i32 {");
        w.line("members.iter().fold(0, |mask, m| mask | m.value())");
        w.close("}");
    }
    w.close("}");
    w.blank();

    w.open(format!("impl std::convert::TryFrom<i32> for {ty} {{"));
    w.line("type Error = crate::Error;");
    w.blank();
    w.open("fn try_from(value: i32) -> crate::Result<Self> {");
    w.open("match value {");
    for (variant, member) in &variants {
        w.line(format!("{} => Ok(Self::{variant}),", member.value));
    }
    w.line(format!(
        "_ => Err(crate::Error::UnknownEnumValue {{ enum_name: {ty:?}, value }}),"
    ));
    w.close("}");
    w.close("}");
    w.close("}");
    w.blank();

    w.open(format!("impl From<{ty}> for i32 {{"));
    w.open(format!("fn from(value: {ty}) -> Self {{"));
    w.line("value as i32");
    w.close("}");
    w.close("}");
    w.blank();

    w.open(format!("impl std::fmt::Display for {ty} {{"));
    w.open("fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {");
    w.line("f.write_str(self.name())");
    w.close("}");
    w.close("}");
    Ok(())
}
