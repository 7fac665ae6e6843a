//! Cross-record consistency rules.
//!
//! Runs after every record has been resolved, so references can be checked
//! in any direction. Each function appends to a shared issue list instead of
//! returning early; one pass reports everything that is wrong.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Rule, ValidationIssue};
use crate::model::{
    AttributeDescriptor, ClassDescriptor, CollectionDescriptor, ElementType, HandleKind,
    HandleParameter, ReadBufferSize, ScalarKind,
};
use crate::store::MetadataStore;

/// Runs every rule over `store`.
pub fn validate(store: &MetadataStore) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for class in store.classes() {
        validate_class(store, class, &mut issues);
    }
    for class in store.classes() {
        for attribute in store.attributes(&class.name) {
            validate_attribute(store, class, attribute, &mut issues);
        }
    }
    validate_enums(store, &mut issues);
    for collection in store.collections() {
        validate_collection(store, collection, &mut issues);
    }
    issues
}

/// Rust keywords, strict and reserved, that cannot be used as identifiers.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// `snake_case` identifier usable as a method or field name.
pub fn is_snake_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && name != "_"
        && !KEYWORDS.contains(&name)
}

/// `CamelCase` identifier usable as a type name.
pub fn is_camel_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
        && !KEYWORDS.contains(&name)
}

/// `UPPER_SNAKE` driver constant name.
pub fn is_upper_snake(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn check_identifier(
    name: &str,
    valid: fn(&str) -> bool,
    expected: &'static str,
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if !valid(name) {
        issues.push(ValidationIssue::new(
            location,
            Rule::InvalidIdentifier {
                name: name.to_string(),
                expected,
            },
        ));
    }
}

/// Handle kinds each driver attribute family takes, in call order.
fn stem_shape(stem: &str) -> Option<&'static [HandleKind]> {
    match stem {
        "SystemInfoAttribute" => Some(&[]),
        "TaskAttribute" | "TimingAttribute" | "TrigAttribute" | "ReadAttribute"
        | "WriteAttribute" | "BufferAttribute" | "ExportedSignalAttribute" => {
            Some(&[HandleKind::Task])
        }
        "ChanAttribute" => Some(&[HandleKind::Task, HandleKind::String]),
        "DeviceAttribute" | "PhysicalChanAttribute" | "ScaleAttribute"
        | "PersistedTaskAttribute" | "PersistedChanAttribute" | "PersistedScaleAttribute" => {
            Some(&[HandleKind::String])
        }
        _ => None,
    }
}

fn shape_string(kinds: &[HandleKind]) -> String {
    kinds
        .iter()
        .map(|kind| match kind {
            HandleKind::Task => "task",
            HandleKind::String => "string",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Known stems take exactly their own shape. Any other stem takes one of
/// the non-empty shapes; only the system family has no handles.
fn check_handle_shape(stem: &str, params: &[HandleParameter]) -> Option<Rule> {
    let kinds: Vec<HandleKind> = params.iter().map(|p| p.kind).collect();
    match stem_shape(stem) {
        Some(expected) if kinds.as_slice() != expected => Some(Rule::HandleShapeMismatch {
            stem: stem.to_string(),
            shape: shape_string(&kinds),
            expected: shape_string(expected),
        }),
        Some(_) => None,
        None => match kinds.as_slice() {
            [HandleKind::Task] | [HandleKind::String] | [HandleKind::Task, HandleKind::String] => None,
            _ => Some(Rule::UnsupportedHandleShape {
                shape: shape_string(&kinds),
            }),
        },
    }
}

fn validate_handle_parameters(
    stem: &str,
    params: &[HandleParameter],
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = BTreeSet::new();
    for param in params {
        check_identifier(&param.name, is_snake_identifier, "snake_case", location, issues);
        if !seen.insert(param.name.as_str()) {
            issues.push(ValidationIssue::new(
                location,
                Rule::DuplicateHandleParameter {
                    name: param.name.clone(),
                },
            ));
        }
    }
    if let Some(rule) = check_handle_shape(stem, params) {
        issues.push(ValidationIssue::new(location, rule));
    }
}

fn validate_class(store: &MetadataStore, class: &ClassDescriptor, issues: &mut Vec<ValidationIssue>) {
    let location = class.location();
    check_identifier(&class.name, is_camel_identifier, "CamelCase", &location, issues);
    check_identifier(&class.module, is_snake_identifier, "snake_case", &location, issues);
    for method in &class.hand_written {
        check_identifier(method, is_snake_identifier, "snake_case", &location, issues);
    }
    validate_handle_parameters(
        &class.c_function_stem,
        &class.handle_parameters,
        &location,
        issues,
    );

    if let Some(parent_name) = &class.extends {
        match store.class(parent_name) {
            None => issues.push(ValidationIssue::new(
                &location,
                Rule::UnknownClass {
                    name: parent_name.clone(),
                },
            )),
            Some(parent) => {
                if parent.handle_parameters != class.handle_parameters {
                    issues.push(ValidationIssue::new(
                        &location,
                        Rule::ParentHandleMismatch {
                            name: class.name.clone(),
                            parent: parent.name.clone(),
                        },
                    ));
                }
                let ancestors = store.ancestors(&class.name);
                let cyclic = ancestors
                    .last()
                    .and_then(|root| root.extends.as_deref())
                    .is_some_and(|next| store.class(next).is_some());
                if cyclic {
                    issues.push(ValidationIssue::new(
                        &location,
                        Rule::CyclicExtends {
                            name: class.name.clone(),
                        },
                    ));
                }
            }
        }
    }

    // Names and ids must be unique across the whole visible hierarchy.
    let mut ids: BTreeMap<i32, &str> = BTreeMap::new();
    let mut names: BTreeMap<&str, &str> = BTreeMap::new();
    let chain: Vec<&ClassDescriptor> = store
        .ancestors(&class.name)
        .into_iter()
        .rev()
        .chain(std::iter::once(class))
        .collect();
    for owner in chain {
        for attribute in store.attributes(&owner.name) {
            if let Some(previous) = ids.insert(attribute.id, &attribute.owner_class) {
                if previous != attribute.owner_class {
                    issues.push(ValidationIssue::new(
                        attribute.location(),
                        Rule::DuplicateAttributeId {
                            class: class.name.clone(),
                            id: attribute.id,
                        },
                    ));
                }
            }
            if let Some(previous) = names.insert(&attribute.name, &attribute.owner_class) {
                if previous != attribute.owner_class {
                    issues.push(ValidationIssue::new(
                        attribute.location(),
                        Rule::DuplicateAttributeName {
                            class: class.name.clone(),
                            name: attribute.name.clone(),
                        },
                    ));
                }
            }
        }
    }
}

fn validate_attribute(
    store: &MetadataStore,
    class: &ClassDescriptor,
    attribute: &AttributeDescriptor,
    issues: &mut Vec<ValidationIssue>,
) {
    let location = attribute.location();
    let mut push = |rule| issues.push(ValidationIssue::new(&location, rule));

    if !is_snake_identifier(&attribute.name) {
        push(Rule::InvalidIdentifier {
            name: attribute.name.clone(),
            expected: "snake_case",
        });
    }
    if attribute.resettable && !attribute.access.writable() {
        push(Rule::ResettableReadOnly);
    }
    for param in &attribute.handle_parameters {
        if class.handle_parameter(&param.name).is_none() {
            push(Rule::UndeclaredHandleParameter {
                name: param.name.clone(),
            });
        }
    }
    if let Some(rule) = check_handle_shape(&attribute.c_function_stem, &attribute.handle_parameters) {
        push(rule);
    }

    match &attribute.element_type {
        ElementType::Scalar(_) => {}
        ElementType::Enum(name) => match store.enum_descriptor(name) {
            None => push(Rule::UnknownEnum { name: name.clone() }),
            Some(e) if e.bitfield => push(Rule::BitfieldAsEnum { name: name.clone() }),
            Some(_) => {}
        },
        ElementType::Bitfield(name) => match store.enum_descriptor(name) {
            None => push(Rule::UnknownEnum { name: name.clone() }),
            Some(e) if !e.bitfield => push(Rule::NotABitfield { name: name.clone() }),
            Some(_) => {}
        },
        ElementType::Object(target) => {
            if attribute.is_list {
                push(Rule::ObjectList);
            }
            match (store.class(target), &attribute.object_constructor_params) {
                (None, _) => push(Rule::UnknownClass {
                    name: target.clone(),
                }),
                (Some(_), None) => push(Rule::MissingConstructorParams),
                (Some(target_class), Some(forwarded)) => {
                    let mut resolved = Vec::new();
                    for name in forwarded {
                        match attribute.handle_parameters.iter().find(|p| &p.name == name) {
                            Some(p) => resolved.push(p),
                            None => push(Rule::UndeclaredHandleParameter { name: name.clone() }),
                        }
                    }
                    if target_class.hand_written_struct {
                        push(Rule::HandWrittenTarget {
                            class: target.clone(),
                        });
                    } else if !constructible_from(target_class, &resolved) {
                        push(Rule::ConstructorShapeMismatch {
                            class: target.clone(),
                            forwarded: forwarded.join(", "),
                        });
                    }
                }
            }
        }
    }

    let string = attribute.element_type == ElementType::Scalar(ScalarKind::String);
    if attribute.is_list {
        match &attribute.element_type {
            ElementType::Scalar(ScalarKind::Bool) | ElementType::Bitfield(_) => {
                push(Rule::UnsupportedListElement {
                    element: attribute.element_type.to_string(),
                });
            }
            _ => {}
        }
        match (attribute.has_explicit_read_buffer_size, &attribute.read_buffer_size) {
            (true, Some(_)) => push(Rule::ConflictingSizing),
            (false, None) => push(Rule::ListWithoutSizing),
            (false, Some(_)) if string => push(Rule::StringListNeedsExplicitSizing),
            (false, Some(ReadBufferSize::Attribute(sibling))) => {
                let valid = store
                    .find_attribute(&class.name, sibling)
                    .is_some_and(|s| {
                        !s.is_list
                            && s.access.readable()
                            && matches!(s.element_type, ElementType::Scalar(k) if k.is_integer())
                            && s.handle_parameters == attribute.handle_parameters
                    });
                if !valid {
                    push(Rule::InvalidSizingAttribute {
                        name: sibling.clone(),
                    });
                }
            }
            _ => {}
        }
    } else {
        if attribute.has_explicit_read_buffer_size && !string {
            push(Rule::ExplicitSizingOnScalar);
        }
        if attribute.read_buffer_size.is_some() {
            push(Rule::ReadBufferSizeOnScalar);
        }
    }
}

/// True when `target`'s handle parameters are `forwarded` (same kinds, same
/// order) followed by exactly one string.
fn constructible_from(target: &ClassDescriptor, forwarded: &[&HandleParameter]) -> bool {
    let params = &target.handle_parameters;
    params.len() == forwarded.len() + 1
        && params
            .iter()
            .zip(forwarded)
            .all(|(t, f)| t.name == f.name && t.kind == f.kind)
        && params.last().is_some_and(|p| p.kind == HandleKind::String)
}

fn validate_enums(store: &MetadataStore, issues: &mut Vec<ValidationIssue>) {
    let mut type_names: BTreeMap<&str, &str> = BTreeMap::new();
    for descriptor in store.enums() {
        let location = format!("{}: {}", descriptor.source, descriptor.name);
        check_identifier(descriptor.type_name(), is_camel_identifier, "CamelCase", &location, issues);
        if let Some(other) = type_names.insert(descriptor.type_name(), &descriptor.name) {
            if other != descriptor.name {
                issues.push(ValidationIssue::new(
                    &location,
                    Rule::DuplicateEnum {
                        name: descriptor.type_name().to_string(),
                    },
                ));
            }
        }
        if descriptor.values.is_empty() {
            issues.push(ValidationIssue::new(&location, Rule::EmptyEnum));
        }

        let mut names = BTreeSet::new();
        let mut values = BTreeSet::new();
        for member in &descriptor.values {
            let member_location = format!("{location}.{}", member.name);
            check_identifier(&member.name, is_upper_snake, "UPPER_SNAKE", &member_location, issues);
            if !names.insert(member.name.as_str()) {
                issues.push(ValidationIssue::new(
                    &member_location,
                    Rule::DuplicateEnumMember {
                        name: member.name.clone(),
                    },
                ));
            }
            if !values.insert(member.value) {
                issues.push(ValidationIssue::new(
                    &member_location,
                    Rule::DuplicateEnumValue {
                        value: member.value,
                    },
                ));
            }
            if descriptor.bitfield && (member.value <= 0 || member.value.count_ones() != 1) {
                issues.push(ValidationIssue::new(
                    &member_location,
                    Rule::BitfieldValueNotSingleBit {
                        name: member.name.clone(),
                        value: member.value,
                    },
                ));
            }
        }
    }
}

fn validate_collection(
    store: &MetadataStore,
    collection: &CollectionDescriptor,
    issues: &mut Vec<ValidationIssue>,
) {
    let location = collection.location();
    let mut push = |rule| issues.push(ValidationIssue::new(&location, rule));

    if !is_camel_identifier(&collection.name) {
        push(Rule::InvalidIdentifier {
            name: collection.name.clone(),
            expected: "CamelCase",
        });
    }
    if let Some(accessor) = &collection.accessor {
        if !is_snake_identifier(accessor) {
            push(Rule::InvalidIdentifier {
                name: accessor.clone(),
                expected: "snake_case",
            });
        }
    }

    let (Some(owner), Some(item)) = (store.class(&collection.owner), store.class(&collection.item)) else {
        for name in [&collection.owner, &collection.item] {
            if store.class(name).is_none() {
                push(Rule::UnknownClass { name: name.clone() });
            }
        }
        return;
    };

    let mut forwarded = Vec::new();
    for name in &collection.forward {
        match owner.handle_parameter(name) {
            Some(p) => forwarded.push(p),
            None => push(Rule::UndeclaredHandleParameter { name: name.clone() }),
        }
    }
    if item.hand_written_struct {
        push(Rule::HandWrittenTarget {
            class: item.name.clone(),
        });
    } else if !constructible_from(item, &forwarded) {
        push(Rule::ConstructorShapeMismatch {
            class: item.name.clone(),
            forwarded: collection.forward.join(", "),
        });
    }

    let names_ref = &collection.names_attribute;
    let owner_sees_names = names_ref.class == owner.name
        || store.ancestors(&owner.name).iter().any(|c| c.name == names_ref.class);
    match store.resolve(names_ref) {
        None => push(Rule::UnknownAttribute {
            reference: names_ref.to_string(),
        }),
        Some(attr) => {
            let string_list = attr.is_list
                && attr.access.readable()
                && attr.element_type == ElementType::Scalar(ScalarKind::String);
            if !string_list || !owner_sees_names {
                push(Rule::NamesAttributeNotStringList {
                    reference: names_ref.to_string(),
                });
            }
        }
    }

    if let Some(filter) = &collection.filter {
        let item_sees_filter = filter.attribute.class == item.name
            || store.ancestors(&item.name).iter().any(|c| c.name == filter.attribute.class);
        match store.resolve(&filter.attribute) {
            None => push(Rule::UnknownAttribute {
                reference: filter.attribute.to_string(),
            }),
            Some(attr) => {
                let matches_enum = !attr.is_list
                    && attr.access.readable()
                    && attr.element_type == ElementType::Enum(filter.value.enum_name.clone());
                if !matches_enum || !item_sees_filter {
                    push(Rule::FilterTypeMismatch {
                        reference: filter.attribute.to_string(),
                        enum_name: filter.value.enum_name.clone(),
                    });
                }
            }
        }
        if store.enum_value(&filter.value).is_none() {
            push(Rule::UnknownEnumMember {
                enum_name: filter.value.enum_name.clone(),
                member: filter.value.member.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CatalogSource;

    const CLASSES: &str = r#"
        [classes.Task]
        module = "task"
        c_function_stem = "TaskAttribute"
        hand_written_struct = true
        handle_parameters = [{ name = "task_handle", c_name = "taskHandle", kind = "task" }]

        [classes.Channel]
        module = "channel"
        c_function_stem = "ChanAttribute"
        handle_parameters = [
            { name = "task_handle", c_name = "taskHandle", kind = "task" },
            { name = "name", c_name = "channel", kind = "string" },
        ]

        [classes.Scale]
        module = "scale"
        c_function_stem = "ScaleAttribute"
        handle_parameters = [{ name = "name", c_name = "scaleName", kind = "string" }]

        [enums.ChannelType]
        values = [{ name = "ANALOG_INPUT", value = 10100 }, { name = "ANALOG_OUTPUT", value = 10102 }]

        [enums.TermCfg]
        bitfield = true
        values = [{ name = "RSE", value = 1 }, { name = "DIFF", value = 4 }]
    "#;

    fn issues(attributes: &str) -> Vec<Rule> {
        match MetadataStore::from_sources([
            CatalogSource::new("classes.toml", CLASSES),
            CatalogSource::new("attributes.toml", attributes),
        ]) {
            Ok(_) => Vec::new(),
            Err(err) => err.issues().iter().map(|i| i.rule.clone()).collect(),
        }
    }

    #[test]
    fn identifiers() {
        assert!(is_snake_identifier("ai_atten"));
        assert!(!is_snake_identifier("type"));
        assert!(!is_snake_identifier("AiAtten"));
        assert!(!is_snake_identifier("_"));
        assert!(is_camel_identifier("AIChannel"));
        assert!(!is_camel_identifier("Self"));
        assert!(is_upper_snake("LOW_FREQUENCY_1_COUNTER"));
        assert!(!is_upper_snake("Rising"));
    }

    #[test]
    fn valid_catalog_has_no_issues() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 4148
            owner_class = "Channel"
            name = "ai_thrmcpl_cjc_chan"
            access = "read"
            type = "object(Channel)"
            object_constructor_params = ["task_handle"]

            [[attributes]]
            id = 6271
            owner_class = "Channel"
            name = "chan_type"
            access = "read"
            type = "enum(ChannelType)"
            "#,
        );
        assert!(rules.is_empty(), "{rules:?}");
    }

    #[test]
    fn object_without_constructor_params_is_rejected() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 6112
            owner_class = "Channel"
            name = "ai_custom_scale"
            access = "read-write"
            type = "object(Scale)"
            "#,
        );
        assert_eq!(rules, [Rule::MissingConstructorParams]);
    }

    #[test]
    fn object_constructor_shape_must_match_target() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 6112
            owner_class = "Channel"
            name = "ai_custom_scale"
            access = "read-write"
            type = "object(Scale)"
            object_constructor_params = ["task_handle"]
            "#,
        );
        assert!(matches!(&rules[..], [Rule::ConstructorShapeMismatch { class, .. }] if class == "Scale"));
    }

    #[test]
    fn object_targets_must_be_generated_structs() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 1
            owner_class = "Scale"
            name = "owning_task"
            access = "read"
            type = "object(Task)"
            object_constructor_params = []
            "#,
        );
        assert!(matches!(&rules[..], [Rule::HandWrittenTarget { .. }]));
    }

    #[test]
    fn enum_and_bitfield_bindings_are_checked() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 1
            owner_class = "Channel"
            name = "a"
            access = "read"
            type = "enum(TermCfg)"

            [[attributes]]
            id = 2
            owner_class = "Channel"
            name = "b"
            access = "read"
            type = "bitfield(ChannelType)"

            [[attributes]]
            id = 3
            owner_class = "Channel"
            name = "c"
            access = "read"
            type = "enum(Missing)"
            "#,
        );
        assert_eq!(
            rules,
            [
                Rule::BitfieldAsEnum { name: "TermCfg".into() },
                Rule::NotABitfield { name: "ChannelType".into() },
                Rule::UnknownEnum { name: "Missing".into() },
            ]
        );
    }

    #[test]
    fn list_sizing_rules() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 1
            owner_class = "Scale"
            name = "no_sizing"
            access = "read"
            type = "float64"
            is_list = true

            [[attributes]]
            id = 2
            owner_class = "Scale"
            name = "scalar_probe"
            access = "read"
            type = "float64"
            has_explicit_read_buffer_size = true

            [[attributes]]
            id = 3
            owner_class = "Scale"
            name = "names"
            access = "read"
            type = "string"
            is_list = true
            read_buffer_size = 8

            [[attributes]]
            id = 4
            owner_class = "Scale"
            name = "by_sibling"
            access = "read"
            type = "float64"
            is_list = true
            read_buffer_size = "descr"

            [[attributes]]
            id = 5
            owner_class = "Scale"
            name = "descr"
            access = "read"
            type = "string"
            "#,
        );
        assert_eq!(
            rules,
            [
                Rule::ListWithoutSizing,
                Rule::ExplicitSizingOnScalar,
                Rule::StringListNeedsExplicitSizing,
                Rule::InvalidSizingAttribute { name: "descr".into() },
            ]
        );
    }

    #[test]
    fn read_only_attributes_cannot_be_reset() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 1
            owner_class = "Scale"
            name = "scale_type"
            access = "read"
            resettable = true
            type = "int32"
            "#,
        );
        assert_eq!(rules, [Rule::ResettableReadOnly]);
    }

    #[test]
    fn keywords_are_not_attribute_names() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 1
            owner_class = "Scale"
            name = "type"
            access = "read"
            type = "int32"
            "#,
        );
        assert!(matches!(&rules[..], [Rule::InvalidIdentifier { name, .. }] if name == "type"));
    }

    #[test]
    fn handle_override_must_match_stem() {
        let rules = issues(
            r#"
            [[attributes]]
            id = 1
            owner_class = "Channel"
            name = "task_only"
            access = "read"
            type = "float64"
            handle_parameters = ["task_handle"]

            [[attributes]]
            id = 2
            owner_class = "Channel"
            name = "through_task"
            access = "read"
            type = "float64"
            handle_parameters = ["task_handle"]
            c_function_stem = "TaskAttribute"
            "#,
        );
        assert_eq!(
            rules,
            [Rule::HandleShapeMismatch {
                stem: "ChanAttribute".into(),
                shape: "task".into(),
                expected: "task, string".into(),
            }]
        );
    }

    #[test]
    fn only_system_attributes_take_no_handles() {
        let store = MetadataStore::from_sources([CatalogSource::new(
            "classes.toml",
            r#"
            [classes.System]
            module = "system"
            c_function_stem = "SystemInfoAttribute"
            handle_parameters = []

            [classes.Rack]
            module = "rack"
            c_function_stem = "RackAttribute"
            handle_parameters = []

            [classes.Cabinet]
            module = "cabinet"
            c_function_stem = "DeviceAttribute"
            handle_parameters = []
            "#,
        )]);
        let rules: Vec<Rule> = store
            .unwrap_err()
            .issues()
            .iter()
            .map(|i| i.rule.clone())
            .collect();
        assert_eq!(
            rules,
            [
                Rule::HandleShapeMismatch {
                    stem: "DeviceAttribute".into(),
                    shape: String::new(),
                    expected: "string".into(),
                },
                Rule::UnsupportedHandleShape {
                    shape: String::new()
                },
            ]
        );
    }

    #[test]
    fn stem_shapes() {
        assert_eq!(stem_shape("SystemInfoAttribute"), Some(&[][..]));
        assert_eq!(stem_shape("TrigAttribute"), Some(&[HandleKind::Task][..]));
        assert_eq!(
            stem_shape("ChanAttribute"),
            Some(&[HandleKind::Task, HandleKind::String][..])
        );
        assert_eq!(stem_shape("PersistedScaleAttribute"), Some(&[HandleKind::String][..]));
        assert_eq!(stem_shape("WidgetAttribute"), None);
    }
}
