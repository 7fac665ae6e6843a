//! The resolved, validated catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{IssueList, MetadataError, Rule, ValidationIssue};
use crate::loader::{bundled_sources, read_dir_sources, CatalogSource};
use crate::model::{
    AttributeDescriptor, AttributeRef, ClassDescriptor, CollectionDescriptor, CollectionFilter,
    EnumDescriptor, EnumValueRef, ErrorCode, HandleParameter,
};
use crate::schema::{CatalogFile, RawAttribute, RawCollection};
use crate::validation;

/// Read-only view over every class, attribute, enum, status code and
/// collection in a catalog.
///
/// All iteration is in a stable order (classes, enums and collections by
/// name; attributes by id; status codes by value), so anything generated
/// from a store is byte-for-byte reproducible.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    classes: BTreeMap<String, ClassDescriptor>,
    attributes: BTreeMap<String, BTreeMap<i32, AttributeDescriptor>>,
    enums: BTreeMap<String, EnumDescriptor>,
    errors: BTreeMap<i32, ErrorCode>,
    collections: BTreeMap<String, CollectionDescriptor>,
}

impl MetadataStore {
    /// Loads the catalog compiled into this crate.
    pub fn bundled() -> Result<Self, MetadataError> {
        Self::from_sources(bundled_sources())
    }

    /// Loads every `*.toml` file under `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, MetadataError> {
        Self::from_sources(read_dir_sources(dir)?)
    }

    /// Parses, resolves and validates the given sources.
    ///
    /// Parse errors abort at the first broken file. Resolution and
    /// validation problems are gathered and reported together.
    pub fn from_sources(
        sources: impl IntoIterator<Item = CatalogSource>,
    ) -> Result<Self, MetadataError> {
        let mut files = Vec::new();
        for source in sources {
            let file = source.parse()?;
            files.push((source.name, file));
        }

        let mut builder = Builder::default();
        for (name, file) in &files {
            builder.add_definitions(name, file);
        }
        for (name, file) in &files {
            builder.add_references(name, file);
        }
        let Builder {
            store,
            mut issues,
        } = builder;

        issues.extend(validation::validate(&store));
        if !issues.is_empty() {
            return Err(MetadataError::Invalid(IssueList(issues)));
        }

        info!(
            classes = store.classes.len(),
            attributes = store.attribute_count(),
            enums = store.enums.len(),
            errors = store.errors.len(),
            collections = store.collections.len(),
            "loaded metadata catalog"
        );
        Ok(store)
    }

    /// All classes, by name.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    /// Looks up a class.
    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    /// Attributes declared directly on `owner`, by id.
    pub fn attributes(&self, owner: &str) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.get(owner).into_iter().flat_map(BTreeMap::values)
    }

    /// Looks up an attribute declared directly on `owner`.
    pub fn attribute(&self, owner: &str, id: i32) -> Option<&AttributeDescriptor> {
        self.attributes.get(owner)?.get(&id)
    }

    /// Total number of attributes across all classes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.values().map(BTreeMap::len).sum()
    }

    /// Classes `class` extends, nearest first. Stops at the first repeat,
    /// so a cyclic hierarchy yields a finite list.
    pub fn ancestors(&self, class: &str) -> Vec<&ClassDescriptor> {
        let mut seen = BTreeSet::from([class]);
        let mut chain = Vec::new();
        let mut current = self.classes.get(class);
        while let Some(parent) = current
            .and_then(|c| c.extends.as_deref())
            .filter(|p| seen.insert(*p))
            .and_then(|p| self.classes.get(p))
        {
            chain.push(parent);
            current = Some(parent);
        }
        chain
    }

    /// Attributes visible on `class`: its own plus those of every ancestor,
    /// ordered by id.
    pub fn effective_attributes(&self, class: &str) -> Vec<&AttributeDescriptor> {
        let mut merged: BTreeMap<i32, &AttributeDescriptor> = BTreeMap::new();
        for ancestor in self.ancestors(class).into_iter().rev() {
            merged.extend(self.attributes(&ancestor.name).map(|a| (a.id, a)));
        }
        merged.extend(self.attributes(class).map(|a| (a.id, a)));
        merged.into_values().collect()
    }

    /// Finds an attribute visible on `class` by name.
    pub fn find_attribute(&self, class: &str, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes(class).find(|a| a.name == name).or_else(|| {
            self.ancestors(class)
                .into_iter()
                .find_map(|c| self.attributes(&c.name).find(|a| a.name == name))
        })
    }

    /// Resolves a `Class.attribute` reference against the class hierarchy.
    pub fn resolve(&self, reference: &AttributeRef) -> Option<&AttributeDescriptor> {
        self.find_attribute(&reference.class, &reference.attribute)
    }

    /// All enums, by driver-facing name.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.values()
    }

    /// Looks up an enum by driver-facing name.
    pub fn enum_descriptor(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.get(name)
    }

    /// Looks up the numeric value of `Enum.MEMBER`.
    pub fn enum_value(&self, reference: &EnumValueRef) -> Option<i32> {
        self.enums
            .get(&reference.enum_name)?
            .member(&reference.member)
            .map(|m| m.value)
    }

    /// All status codes, by value.
    pub fn errors(&self) -> impl Iterator<Item = &ErrorCode> {
        self.errors.values()
    }

    /// Looks up a status code by value.
    pub fn error(&self, value: i32) -> Option<&ErrorCode> {
        self.errors.get(&value)
    }

    /// Looks up a status code by symbolic name.
    pub fn error_by_name(&self, name: &str) -> Option<&ErrorCode> {
        self.errors.values().find(|e| e.name == name)
    }

    /// All collections, by name.
    pub fn collections(&self) -> impl Iterator<Item = &CollectionDescriptor> {
        self.collections.values()
    }

    /// Looks up a collection.
    pub fn collection(&self, name: &str) -> Option<&CollectionDescriptor> {
        self.collections.get(name)
    }
}

/// Two-phase assembly: definitions (classes, enums, errors) from every file
/// first, then records that refer to them (attributes, collections).
#[derive(Default)]
struct Builder {
    store: MetadataStore,
    issues: Vec<ValidationIssue>,
}

impl Builder {
    fn add_definitions(&mut self, file: &str, catalog: &CatalogFile) {
        for (name, raw) in &catalog.classes {
            let location = format!("{file}: {name}");
            if self.store.classes.contains_key(name) {
                self.issue(location, Rule::DuplicateClass { name: name.clone() });
                continue;
            }
            self.store.classes.insert(
                name.clone(),
                ClassDescriptor {
                    name: name.clone(),
                    module: raw.module.clone(),
                    c_function_stem: raw.c_function_stem.clone(),
                    handle_parameters: raw.handle_parameters.clone(),
                    extends: raw.extends.clone(),
                    hand_written_struct: raw.hand_written_struct,
                    hand_written: raw.hand_written.clone(),
                    doc: raw.doc.clone(),
                    source: file.to_string(),
                },
            );
        }

        for (name, raw) in &catalog.enums {
            let location = format!("{file}: {name}");
            if self.store.enums.contains_key(name) {
                self.issue(location, Rule::DuplicateEnum { name: name.clone() });
                continue;
            }
            self.store.enums.insert(
                name.clone(),
                EnumDescriptor {
                    name: name.clone(),
                    alias: raw.alias.clone(),
                    doc: raw.doc.clone(),
                    bitfield: raw.bitfield,
                    values: raw.values.clone(),
                    source: file.to_string(),
                },
            );
        }

        for raw in &catalog.errors {
            let location = format!("{file}: {} ({})", raw.name, raw.value);
            if raw.value == 0 {
                self.issue(location, Rule::ZeroErrorCode);
                continue;
            }
            if self.store.errors.contains_key(&raw.value) {
                self.issue(location, Rule::DuplicateErrorValue { value: raw.value });
                continue;
            }
            if self.store.error_by_name(&raw.name).is_some() {
                self.issue(location, Rule::DuplicateErrorName { name: raw.name.clone() });
                continue;
            }
            self.store.errors.insert(
                raw.value,
                ErrorCode {
                    name: raw.name.clone(),
                    value: raw.value,
                    description: raw.description.clone(),
                },
            );
        }
    }

    fn add_references(&mut self, file: &str, catalog: &CatalogFile) {
        for raw in &catalog.attributes {
            self.add_attribute(file, raw);
        }
        for (name, raw) in &catalog.collections {
            self.add_collection(file, name, raw);
        }
    }

    fn add_attribute(&mut self, file: &str, raw: &RawAttribute) {
        let location = format!("{file}: {}.{} ({})", raw.owner_class, raw.name, raw.id);
        let Some(class) = self.store.classes.get(&raw.owner_class) else {
            self.issue(location, Rule::UnknownClass { name: raw.owner_class.clone() });
            return;
        };
        let class_stem = class.c_function_stem.clone();
        let class_params = class.handle_parameters.clone();

        let handle_parameters = match &raw.handle_parameters {
            None => class_params,
            Some(names) => {
                let mut resolved: Vec<HandleParameter> = Vec::with_capacity(names.len());
                let mut missing = Vec::new();
                for name in names {
                    match class_params.iter().find(|p| &p.name == name) {
                        Some(p) => resolved.push(p.clone()),
                        None => missing.push(name.clone()),
                    }
                }
                for name in missing {
                    self.issue(location.clone(), Rule::UndeclaredHandleParameter { name });
                }
                resolved
            }
        };
        let c_function_stem = raw.c_function_stem.clone().unwrap_or(class_stem);

        let descriptor = AttributeDescriptor {
            id: raw.id,
            owner_class: raw.owner_class.clone(),
            name: raw.name.clone(),
            access: raw.access,
            resettable: raw.resettable,
            element_type: raw.element_type.clone(),
            is_list: raw.is_list,
            has_explicit_read_buffer_size: raw.has_explicit_read_buffer_size,
            read_buffer_size: raw.read_buffer_size.clone(),
            handle_parameters,
            object_constructor_params: raw.object_constructor_params.clone(),
            c_function_stem,
            doc: raw.doc.clone(),
            source: file.to_string(),
        };

        let owned = self.store.attributes.entry(raw.owner_class.clone()).or_default();
        if owned.contains_key(&raw.id) {
            let class = raw.owner_class.clone();
            self.issue(location, Rule::DuplicateAttributeId { class, id: raw.id });
            return;
        }
        if owned.values().any(|a| a.name == raw.name) {
            let class = raw.owner_class.clone();
            self.issue(location, Rule::DuplicateAttributeName { class, name: raw.name.clone() });
            return;
        }
        debug!(attribute = %descriptor.location(), "resolved attribute");
        owned.insert(raw.id, descriptor);
    }

    fn add_collection(&mut self, file: &str, name: &str, raw: &RawCollection) {
        let location = format!("{file}: {name}");
        if self.store.collections.contains_key(name) {
            self.issue(location, Rule::DuplicateCollection { name: name.to_string() });
            return;
        }

        let names_attribute = match raw.names_attribute.parse::<AttributeRef>() {
            Ok(r) => r,
            Err(message) => {
                self.issue(location, Rule::MalformedReference { message });
                return;
            }
        };
        let filter = match &raw.filter {
            None => None,
            Some(f) => match (f.attribute.parse::<AttributeRef>(), f.value.parse::<EnumValueRef>()) {
                (Ok(attribute), Ok(value)) => Some(CollectionFilter { attribute, value }),
                (Err(message), _) | (_, Err(message)) => {
                    self.issue(location, Rule::MalformedReference { message });
                    return;
                }
            },
        };
        let forward = match &raw.forward {
            Some(forward) => forward.clone(),
            None => self
                .store
                .classes
                .get(&raw.owner)
                .map(|c| c.handle_parameters.iter().map(|p| p.name.clone()).collect())
                .unwrap_or_default(),
        };

        self.store.collections.insert(
            name.to_string(),
            CollectionDescriptor {
                name: name.to_string(),
                owner: raw.owner.clone(),
                item: raw.item.clone(),
                names_attribute,
                forward,
                filter,
                accessor: raw.accessor.clone(),
                doc: raw.doc.clone(),
                source: file.to_string(),
            },
        );
    }

    fn issue(&mut self, location: String, rule: Rule) {
        self.issues.push(ValidationIssue::new(location, rule));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSES: &str = r#"
        [classes.Channel]
        module = "channel"
        c_function_stem = "ChanAttribute"
        handle_parameters = [
            { name = "task_handle", c_name = "taskHandle", kind = "task" },
            { name = "name", c_name = "channel", kind = "string" },
        ]

        [classes.AIChannel]
        module = "ai_channel"
        c_function_stem = "ChanAttribute"
        extends = "Channel"
        handle_parameters = [
            { name = "task_handle", c_name = "taskHandle", kind = "task" },
            { name = "name", c_name = "channel", kind = "string" },
        ]
    "#;

    const ATTRIBUTES: &str = r#"
        [[attributes]]
        id = 6182
        owner_class = "Channel"
        name = "description"
        access = "read-write"
        resettable = true
        type = "string"

        [[attributes]]
        id = 6145
        owner_class = "AIChannel"
        name = "ai_atten"
        access = "read-write"
        resettable = true
        type = "float64"

        [[attributes]]
        id = 6110
        owner_class = "AIChannel"
        name = "ai_min"
        access = "read-write"
        type = "float64"
        c_function_stem = "SpecialAttribute"
    "#;

    fn store() -> MetadataStore {
        MetadataStore::from_sources([
            CatalogSource::new("classes.toml", CLASSES),
            CatalogSource::new("attributes.toml", ATTRIBUTES),
        ])
        .unwrap()
    }

    #[test]
    fn attributes_inherit_class_defaults() {
        let store = store();
        let atten = store.attribute("AIChannel", 6145).unwrap();
        assert_eq!(atten.c_function_stem, "ChanAttribute");
        assert_eq!(atten.handle_parameters.len(), 2);
        assert_eq!(atten.source, "attributes.toml");
        assert_eq!(store.attribute("AIChannel", 6110).unwrap().c_function_stem, "SpecialAttribute");
    }

    #[test]
    fn effective_attributes_merge_parents_in_id_order() {
        let store = store();
        let ids: Vec<_> = store.effective_attributes("AIChannel").iter().map(|a| a.id).collect();
        assert_eq!(ids, [6110, 6145, 6182]);
        assert_eq!(store.find_attribute("AIChannel", "description").unwrap().owner_class, "Channel");
        assert!(store.find_attribute("Channel", "ai_atten").is_none());
    }

    #[test]
    fn duplicate_ids_are_reported_with_location() {
        let dup = r#"
            [[attributes]]
            id = 6145
            owner_class = "AIChannel"
            name = "ai_atten_again"
            access = "read"
            type = "float64"
        "#;
        let err = MetadataStore::from_sources([
            CatalogSource::new("classes.toml", CLASSES),
            CatalogSource::new("attributes.toml", ATTRIBUTES),
            CatalogSource::new("dup.toml", dup),
        ])
        .unwrap_err();

        let issue = &err.issues()[0];
        assert_eq!(issue.location, "dup.toml: AIChannel.ai_atten_again (6145)");
        assert!(matches!(issue.rule, Rule::DuplicateAttributeId { id: 6145, .. }));
    }

    #[test]
    fn unknown_owner_is_reported() {
        let orphan = r#"
            [[attributes]]
            id = 1
            owner_class = "Nope"
            name = "x"
            access = "read"
            type = "float64"
        "#;
        let err = MetadataStore::from_sources([CatalogSource::new("orphan.toml", orphan)]).unwrap_err();
        assert!(matches!(&err.issues()[0].rule, Rule::UnknownClass { name } if name == "Nope"));
    }

    #[test]
    fn error_zero_and_duplicates_are_rejected() {
        let errors = r#"
            [[errors]]
            name = "OK"
            value = 0

            [[errors]]
            name = "A"
            value = -1

            [[errors]]
            name = "B"
            value = -1

            [[errors]]
            name = "A"
            value = -2
        "#;
        let err = MetadataStore::from_sources([CatalogSource::new("errors.toml", errors)]).unwrap_err();
        let rules: Vec<_> = err.issues().iter().map(|i| i.rule.clone()).collect();
        assert_eq!(
            rules,
            [
                Rule::ZeroErrorCode,
                Rule::DuplicateErrorValue { value: -1 },
                Rule::DuplicateErrorName { name: "A".into() },
            ]
        );
    }
}
