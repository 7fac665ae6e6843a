//! The `class` template: one façade type and its attribute accessors.

use daqmx_metadata::{
    AttributeDescriptor, AttributeKind, ClassDescriptor, HandleParameter, ListElement, ListSizing,
    MetadataStore, ScalarKind,
};

use super::{
    attribute_call, constructor_args, handle_array, handle_field_type, scalar_suffix, scalar_type,
    Paths, INTERPRETER,
};
use crate::error::CodegenError;
use crate::naming;
use crate::writer::CodeWriter;

/// Renders `class`: the struct (unless hand-written), its constructor and
/// handle accessors, then every attribute visible on the class in
/// ascending id order.
pub fn render(store: &MetadataStore, class: &ClassDescriptor) -> Result<String, CodegenError> {
    let paths = Paths::new(store);
    let mut w = CodeWriter::new();

    if !class.hand_written_struct {
        emit_struct(&mut w, class);
        w.blank();
    }

    w.open(format!("impl {} {{", class.name));
    let mut first = true;
    if !class.hand_written_struct {
        emit_constructor(&mut w, class);
        first = false;
    }
    for attribute in store.effective_attributes(&class.name) {
        if !first {
            w.blank();
        }
        first = false;
        emit_attribute(&mut w, &paths, class, attribute)?;
    }
    w.close("}");

    if let Some(parent) = class.extends.as_deref().and_then(|p| store.class(p)) {
        if !parent.hand_written_struct {
            w.blank();
            emit_upcast(&mut w, &paths, class, parent)?;
        }
    }

    Ok(w.finish())
}

fn emit_struct(w: &mut CodeWriter, class: &ClassDescriptor) {
    w.doc(&class.doc);
    w.line("#[derive(Debug, Clone)]");
    w.open(format!("pub struct {} {{", class.name));
    w.line(format!("pub(crate) interpreter: {INTERPRETER},"));
    for param in &class.handle_parameters {
        w.line(format!("pub(crate) {}: {},", param.name, handle_field_type(param.kind)));
    }
    w.close("}");
}

fn emit_constructor(w: &mut CodeWriter, class: &ClassDescriptor) {
    let mut params = vec![format!("interpreter: {INTERPRETER}")];
    for param in &class.handle_parameters {
        params.push(match param.kind {
            daqmx_metadata::HandleKind::Task => format!("{}: crate::TaskHandle", param.name),
            daqmx_metadata::HandleKind::String => format!("{}: impl Into<String>", param.name),
        });
    }

    w.doc("Addresses an existing driver object. No driver call is made.");
    w.line("#[must_use]");
    w.open(format!("pub fn new({}) -> Self {{", params.join(", ")));
    w.open("Self {");
    w.line("interpreter,");
    for param in &class.handle_parameters {
        match param.kind {
            daqmx_metadata::HandleKind::Task => w.line(format!("{},", param.name)),
            daqmx_metadata::HandleKind::String => {
                w.line(format!("{0}: {0}.into(),", param.name))
            }
        };
    }
    w.close("}");
    w.close("}");

    for param in &class.handle_parameters {
        w.blank();
        w.doc(&format!("The `{}` this object is addressed by.", param.c_name));
        w.line("#[must_use]");
        match param.kind {
            daqmx_metadata::HandleKind::Task => {
                w.open(format!("pub fn {}(&self) -> crate::TaskHandle {{", param.name));
                w.line(format!("self.{}", param.name));
            }
            daqmx_metadata::HandleKind::String => {
                w.open(format!("pub fn {}(&self) -> &str {{", param.name));
                w.line(format!("&self.{}", param.name));
            }
        }
        w.close("}");
    }
}

fn emit_attribute(
    w: &mut CodeWriter,
    paths: &Paths<'_>,
    class: &ClassDescriptor,
    attribute: &AttributeDescriptor,
) -> Result<(), CodegenError> {
    let location = attribute.location();
    let kind = attribute
        .kind()
        .ok_or_else(|| CodegenError::UnsupportedAttribute {
            location: location.clone(),
        })?;

    let mut wrote = false;
    if attribute.access.readable() {
        emit_getter(w, paths, class, attribute, kind, &location)?;
        wrote = true;
    }
    if attribute.access.writable() {
        if wrote {
            w.blank();
        }
        emit_setter(w, paths, attribute, kind, &location)?;
        wrote = true;
    }
    if attribute.resettable {
        if wrote {
            w.blank();
        }
        emit_reset(w, attribute);
    }
    Ok(())
}

fn prologue(w: &mut CodeWriter, attribute: &AttributeDescriptor) {
    handle_array(w, "self", &attribute.handle_parameters);
    attribute_call(w, &attribute.c_function_stem, attribute.id);
}

fn emit_getter(
    w: &mut CodeWriter,
    paths: &Paths<'_>,
    class: &ClassDescriptor,
    attribute: &AttributeDescriptor,
    kind: AttributeKind<'_>,
    location: &str,
) -> Result<(), CodegenError> {
    let name = &attribute.name;
    w.doc(&attribute.doc);

    match kind {
        AttributeKind::Scalar(scalar) => {
            w.open(format!(
                "pub fn {name}(&self) -> crate::Result<{}> {{",
                scalar_type(scalar)
            ));
            prologue(w, attribute);
            w.line(format!("self.interpreter.get_{}(&call)", scalar_suffix(scalar)));
        }
        AttributeKind::Enum(enum_name) => {
            let ty = paths.enum_type(enum_name, location)?;
            w.open(format!("pub fn {name}(&self) -> crate::Result<{ty}> {{"));
            prologue(w, attribute);
            w.line("let value = self.interpreter.get_i32(&call)?;");
            w.line(format!("{ty}::try_from(value)"));
        }
        AttributeKind::Bitfield(enum_name) => {
            let ty = paths.enum_type(enum_name, location)?;
            w.open(format!("pub fn {name}(&self) -> crate::Result<Vec<{ty}>> {{"));
            prologue(w, attribute);
            w.line("let mask = self.interpreter.get_i32(&call)?;");
            w.line(format!("Ok({ty}::decompose(mask))"));
        }
        AttributeKind::Object {
            class: target,
            forwarded,
        } => {
            let ty = paths.class_type(target, location)?;
            let fields = forwarded
                .iter()
                .map(|p| {
                    class
                        .handle_parameter(p)
                        .ok_or_else(|| CodegenError::UnresolvedReference {
                            location: location.to_string(),
                            name: p.clone(),
                        })
                })
                .collect::<Result<Vec<&HandleParameter>, _>>()?;
            let mut args = constructor_args("self", &fields);
            args.push("name".to_string());

            w.open(format!("pub fn {name}(&self) -> crate::Result<{ty}> {{"));
            prologue(w, attribute);
            w.line("let name = self.interpreter.get_string(&call)?;");
            w.line(format!("Ok({ty}::new({}))", args.join(", ")));
        }
        AttributeKind::List { element, sizing } => {
            let (element_ty, convert) = match element {
                ListElement::Scalar(ScalarKind::String) => {
                    w.open(format!("pub fn {name}(&self) -> crate::Result<Vec<String>> {{"));
                    prologue(w, attribute);
                    w.line("self.interpreter.get_string_list(&call)");
                    w.close("}");
                    return Ok(());
                }
                ListElement::Scalar(scalar) => (scalar_type(scalar).to_string(), None),
                ListElement::Enum(enum_name) => {
                    ("i32".to_string(), Some(paths.enum_type(enum_name, location)?))
                }
            };
            let returned = convert.clone().unwrap_or_else(|| element_ty.clone());

            w.open(format!("pub fn {name}(&self) -> crate::Result<Vec<{returned}>> {{"));
            if let ListSizing::Attribute(sibling) = sizing {
                w.line(format!("let size = self.{sibling}()?;"));
                w.line("let size = usize::try_from(size).unwrap_or_default();");
            }
            prologue(w, attribute);
            let read = match sizing {
                ListSizing::Explicit => {
                    format!("self.interpreter.get_list::<{element_ty}>(&call)")
                }
                ListSizing::Fixed(n) => {
                    format!("self.interpreter.get_list_sized::<{element_ty}>(&call, {n})")
                }
                ListSizing::Attribute(_) => {
                    format!("self.interpreter.get_list_sized::<{element_ty}>(&call, size)")
                }
            };
            match convert {
                None => w.line(read),
                Some(ty) => {
                    w.line(format!("let values = {read}?;"));
                    w.line(format!("values.into_iter().map({ty}::try_from).collect()"))
                }
            };
        }
    }
    w.close("}");
    Ok(())
}

fn emit_setter(
    w: &mut CodeWriter,
    paths: &Paths<'_>,
    attribute: &AttributeDescriptor,
    kind: AttributeKind<'_>,
    location: &str,
) -> Result<(), CodegenError> {
    let name = naming::setter(&attribute.name);
    if attribute.access.readable() {
        w.doc(&format!("Sets [`Self::{}`].", attribute.name));
    } else {
        w.doc(&attribute.doc);
    }

    match kind {
        AttributeKind::Scalar(ScalarKind::String) => {
            w.open(format!("pub fn {name}(&self, value: &str) -> crate::Result<()> {{"));
            prologue(w, attribute);
            w.line("self.interpreter.set_string(&call, value)");
        }
        AttributeKind::Scalar(scalar) => {
            w.open(format!(
                "pub fn {name}(&self, value: {}) -> crate::Result<()> {{",
                scalar_type(scalar)
            ));
            prologue(w, attribute);
            w.line(format!("self.interpreter.set_{}(&call, value)", scalar_suffix(scalar)));
        }
        AttributeKind::Enum(enum_name) => {
            let ty = paths.enum_type(enum_name, location)?;
            w.open(format!("pub fn {name}(&self, value: {ty}) -> crate::Result<()> {{"));
            prologue(w, attribute);
            w.line("self.interpreter.set_i32(&call, i32::from(value))");
        }
        AttributeKind::Bitfield(enum_name) => {
            let ty = paths.enum_type(enum_name, location)?;
            w.open(format!("pub fn {name}(&self, value: &[{ty}]) -> crate::Result<()> {{"));
            prologue(w, attribute);
            w.line(format!("self.interpreter.set_i32(&call, {ty}::compose(value))"));
        }
        AttributeKind::Object { class: target, .. } => {
            let ty = paths.class_type(target, location)?;
            let selector = paths
                .store
                .class(target)
                .and_then(|c| c.handle_parameters.last())
                .ok_or_else(|| CodegenError::UnresolvedReference {
                    location: location.to_string(),
                    name: target.to_string(),
                })?;
            w.open(format!("pub fn {name}(&self, value: &{ty}) -> crate::Result<()> {{"));
            prologue(w, attribute);
            w.line(format!(
                "self.interpreter.set_string(&call, value.{}())",
                selector.name
            ));
        }
        AttributeKind::List { element, .. } => match element {
            ListElement::Scalar(ScalarKind::String) => {
                w.open(format!(
                    "pub fn {name}(&self, value: &[&str]) -> crate::Result<()> {{"
                ));
                prologue(w, attribute);
                w.line("self.interpreter.set_string_list(&call, value)");
            }
            ListElement::Scalar(scalar) => {
                w.open(format!(
                    "pub fn {name}(&self, value: &[{}]) -> crate::Result<()> {{",
                    scalar_type(scalar)
                ));
                prologue(w, attribute);
                w.line("self.interpreter.set_list(&call, value)");
            }
            ListElement::Enum(enum_name) => {
                let ty = paths.enum_type(enum_name, location)?;
                w.open(format!("pub fn {name}(&self, value: &[{ty}]) -> crate::Result<()> {{"));
                w.line("let raw: Vec<i32> = value.iter().copied().map(i32::from).collect();");
                prologue(w, attribute);
                w.line("self.interpreter.set_list(&call, &raw)");
            }
        },
    }
    w.close("}");
    Ok(())
}

fn emit_reset(w: &mut CodeWriter, attribute: &AttributeDescriptor) {
    if attribute.access.readable() {
        w.doc(&format!(
            "Restores the driver default of [`Self::{}`].",
            attribute.name
        ));
    } else {
        w.doc(&format!("Restores the driver default of `{}`.", attribute.name));
    }
    w.open(format!(
        "pub fn {}(&self) -> crate::Result<()> {{",
        naming::resetter(&attribute.name)
    ));
    prologue(w, attribute);
    w.line("self.interpreter.reset(&call)");
    w.close("}");
}

fn emit_upcast(
    w: &mut CodeWriter,
    paths: &Paths<'_>,
    class: &ClassDescriptor,
    parent: &ClassDescriptor,
) -> Result<(), CodegenError> {
    let parent_ty = paths.class_type(&parent.name, &class.location())?;
    let mut args = vec!["value.interpreter".to_string()];
    args.extend(
        parent
            .handle_parameters
            .iter()
            .map(|p| format!("value.{}", p.name)),
    );

    w.open(format!("impl From<{}> for {parent_ty} {{", class.name));
    w.open(format!("fn from(value: {}) -> Self {{", class.name));
    w.line(format!("Self::new({})", args.join(", ")));
    w.close("}");
    w.close("}");
    Ok(())
}
