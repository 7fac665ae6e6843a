//! The `collections` template: name-indexed views over string-list
//! attributes, plus the accessor each owner exposes.

use daqmx_metadata::{CollectionDescriptor, HandleKind, HandleParameter, MetadataStore};

use super::{attribute_call, constructor_args, handle_array, handle_field_type, Paths, INTERPRETER};
use crate::error::CodegenError;
use crate::naming::camel_case;
use crate::writer::CodeWriter;

/// Renders every collection, by name.
pub fn render(store: &MetadataStore) -> Result<String, CodegenError> {
    let paths = Paths::new(store);
    let mut w = CodeWriter::new();
    for (i, collection) in store.collections().enumerate() {
        if i > 0 {
            w.blank();
        }
        emit_collection(&mut w, &paths, collection)?;
    }
    Ok(w.finish())
}

fn unresolved(collection: &CollectionDescriptor, name: &str) -> CodegenError {
    CodegenError::UnresolvedReference {
        location: collection.location(),
        name: name.to_string(),
    }
}

fn emit_collection(
    w: &mut CodeWriter,
    paths: &Paths<'_>,
    collection: &CollectionDescriptor,
) -> Result<(), CodegenError> {
    let store = paths.store;
    let location = collection.location();
    let name = &collection.name;
    let owner = store
        .class(&collection.owner)
        .ok_or_else(|| unresolved(collection, &collection.owner))?;
    let item_ty = paths.class_type(&collection.item, &location)?;
    let owner_ty = paths.class_type(&owner.name, &location)?;
    let names_attribute = store
        .resolve(&collection.names_attribute)
        .ok_or_else(|| unresolved(collection, &collection.names_attribute.to_string()))?;
    let forwarded = collection
        .forward
        .iter()
        .map(|f| owner.handle_parameter(f).ok_or_else(|| unresolved(collection, f)))
        .collect::<Result<Vec<&HandleParameter>, _>>()?;

    w.doc(&collection.doc);
    w.line("#[derive(Debug, Clone)]");
    w.open(format!("pub struct {name} {{"));
    w.line(format!("interpreter: {INTERPRETER},"));
    for param in &owner.handle_parameters {
        w.line(format!("{}: {},", param.name, handle_field_type(param.kind)));
    }
    w.close("}");
    w.blank();

    w.open(format!("impl {name} {{"));

    let mut params = vec![format!("interpreter: {INTERPRETER}")];
    params.extend(
        owner
            .handle_parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, handle_field_type(p.kind))),
    );
    let mut fields = vec!["interpreter".to_string()];
    fields.extend(owner.handle_parameters.iter().map(|p| p.name.clone()));
    w.open(format!("pub(crate) fn new({}) -> Self {{", params.join(", ")));
    w.line(format!("Self {{ {} }}", fields.join(", ")));
    w.close("}");
    w.blank();

    w.doc(&format!(
        "Names of the items, read from `{}`{}.",
        collection.names_attribute,
        if collection.filter.is_some() { " and filtered" } else { "" }
    ));
    w.open("pub fn names(&self) -> crate::Result<Vec<String>> {");
    handle_array(w, "self", &names_attribute.handle_parameters);
    attribute_call(w, &names_attribute.c_function_stem, names_attribute.id);
    match &collection.filter {
        None => {
            w.line("self.interpreter.get_string_list(&call)");
        }
        Some(filter) => {
            let wanted = format!(
                "{}::{}",
                paths.enum_type(&filter.value.enum_name, &location)?,
                camel_case(&filter.value.member)
            );
            w.line("let names = self.interpreter.get_string_list(&call)?;");
            w.line("let mut kept = Vec::with_capacity(names.len());");
            w.open("for name in names {");
            w.open(format!(
                "if self.item(name.clone()).{}()? == {wanted} {{",
                filter.attribute.attribute
            ));
            w.line("kept.push(name);");
            w.close("}");
            w.close("}");
            w.line("Ok(kept)");
        }
    }
    w.close("}");
    w.blank();

    w.doc("Number of items.");
    w.open("pub fn len(&self) -> crate::Result<usize> {");
    w.line("Ok(self.names()?.len())");
    w.close("}");
    w.blank();

    w.doc("Whether the collection has no items.");
    w.open("pub fn is_empty(&self) -> crate::Result<bool> {");
    w.line("Ok(self.names()?.is_empty())");
    w.close("}");
    w.blank();

    w.doc("Whether every name in `name` (which may be a list or range) is an item.");
    w.open("pub fn contains(&self, name: &str) -> crate::Result<bool> {");
    w.line("let wanted = crate::utils::unflatten_channel_string(name);");
    w.line("let names = self.names()?;");
    w.line("Ok(!wanted.is_empty() && wanted.iter().all(|n| names.contains(n)))");
    w.close("}");
    w.blank();

    w.doc("The item (or list of items) called `name`.");
    w.open(format!("pub fn get(&self, name: &str) -> crate::Result<{item_ty}> {{"));
    w.open("if self.contains(name)? {");
    w.line("Ok(self.item(name.to_string()))");
    w.reopen("} else {");
    w.line(format!(
        "Err(crate::Error::NotFound {{ kind: {:?}, name: name.to_string() }})",
        collection.item
    ));
    w.close("}");
    w.close("}");
    w.blank();

    w.doc("The item at `index`, in driver order.");
    w.open(format!("pub fn get_index(&self, index: usize) -> crate::Result<{item_ty}> {{"));
    w.line("self.names()?");
    w.line("    .into_iter()");
    w.line("    .nth(index)");
    w.line("    .map(|name| self.item(name))");
    w.line(format!(
        "    .ok_or_else(|| crate::Error::NotFound {{ kind: {:?}, name: index.to_string() }})",
        collection.item
    ));
    w.close("}");
    w.blank();

    w.doc("Every item, in driver order.");
    w.open(format!(
        "pub fn iter(&self) -> crate::Result<impl Iterator<Item = {item_ty}> + '_> {{"
    ));
    w.line("let names = self.names()?;");
    w.line("Ok(names.into_iter().map(move |name| self.item(name)))");
    w.close("}");
    w.blank();

    w.doc("One item addressing every name at once.");
    w.open(format!("pub fn all(&self) -> crate::Result<{item_ty}> {{"));
    w.line("let names = self.names()?;");
    w.line("Ok(self.item(crate::utils::flatten_channel_string(&names)))");
    w.close("}");
    w.blank();

    let mut args = constructor_args("self", &forwarded);
    args.push("name".to_string());
    w.open(format!("fn item(&self, name: String) -> {item_ty} {{"));
    w.line(format!("{item_ty}::new({})", args.join(", ")));
    w.close("}");
    w.close("}");

    if let Some(accessor) = &collection.accessor {
        let mut args = vec!["std::sync::Arc::clone(&self.interpreter)".to_string()];
        args.extend(owner.handle_parameters.iter().map(|p| match p.kind {
            HandleKind::Task => format!("self.{}", p.name),
            HandleKind::String => format!("self.{}.clone()", p.name),
        }));

        w.blank();
        w.open(format!("impl {owner_ty} {{"));
        w.doc(&collection.doc);
        w.line("#[must_use]");
        w.open(format!("pub fn {accessor}(&self) -> {name} {{"));
        w.line(format!("{name}::new({})", args.join(", ")));
        w.close("}");
        w.close("}");
    }
    Ok(())
}
