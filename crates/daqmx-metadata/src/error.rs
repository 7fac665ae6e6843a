//! Catalog loading errors.

use std::fmt;

use thiserror::Error;

/// Failure to load a catalog.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A catalog file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File or directory being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A catalog file is not valid TOML or does not match the record schema.
    #[error("failed to parse {file}: {message}")]
    Parse {
        /// Catalog file name.
        file: String,
        /// Parser message, including line and column.
        message: String,
    },

    /// The catalog parsed but violates one or more consistency rules.
    #[error("catalog validation failed with {0}")]
    Invalid(IssueList),
}

impl MetadataError {
    /// Validation issues, empty for I/O and parse failures.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Invalid(issues) => &issues.0,
            _ => &[],
        }
    }
}

/// Every issue found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueList(pub Vec<ValidationIssue>);

impl fmt::Display for IssueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} issue(s):", self.0.len())?;
        for issue in &self.0 {
            writeln!(f, "  - {issue}")?;
        }
        Ok(())
    }
}

/// A single rule violation and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {rule}")]
pub struct ValidationIssue {
    /// `file: Class.attribute (id)` or similar.
    pub location: String,
    /// The rule that was violated.
    pub rule: Rule,
}

impl ValidationIssue {
    pub(crate) fn new(location: impl Into<String>, rule: Rule) -> Self {
        Self {
            location: location.into(),
            rule,
        }
    }
}

/// Catalog consistency rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rule {
    /// A name is not a usable identifier or is a keyword.
    #[error("{name:?} is not a valid {expected} identifier")]
    InvalidIdentifier {
        /// Offending name.
        name: String,
        /// Expected casing, e.g. `snake_case`.
        expected: &'static str,
    },
    /// A referenced class is not declared.
    #[error("unknown class {name}")]
    UnknownClass {
        /// Referenced name.
        name: String,
    },
    /// A referenced enum is not declared.
    #[error("unknown enum {name}")]
    UnknownEnum {
        /// Referenced name.
        name: String,
    },
    /// A referenced enum member is not declared.
    #[error("enum {enum_name} has no member {member}")]
    UnknownEnumMember {
        /// Enum name.
        enum_name: String,
        /// Member name.
        member: String,
    },
    /// A referenced attribute is not declared on the class or its parents.
    #[error("unknown attribute {reference}")]
    UnknownAttribute {
        /// `Class.attribute`.
        reference: String,
    },
    /// A reference string is malformed.
    #[error("malformed reference: {message}")]
    MalformedReference {
        /// Parser message.
        message: String,
    },
    /// Two classes share a name.
    #[error("class {name} is declared more than once")]
    DuplicateClass {
        /// Class name.
        name: String,
    },
    /// Two enums share a driver-facing or public type name.
    #[error("enum name {name} is declared more than once")]
    DuplicateEnum {
        /// Enum name.
        name: String,
    },
    /// Two collections share a name.
    #[error("collection {name} is declared more than once")]
    DuplicateCollection {
        /// Collection name.
        name: String,
    },
    /// Two attributes visible on a class share an id.
    #[error("attribute id {id} is already used on {class}")]
    DuplicateAttributeId {
        /// Class on which the clash is visible.
        class: String,
        /// Clashing id.
        id: i32,
    },
    /// Two attributes visible on a class share a name.
    #[error("attribute name {name} is already used on {class}")]
    DuplicateAttributeName {
        /// Class on which the clash is visible.
        class: String,
        /// Clashing name.
        name: String,
    },
    /// Two members of an enum share a name.
    #[error("member {name} is declared more than once")]
    DuplicateEnumMember {
        /// Member name.
        name: String,
    },
    /// Two members of an enum share a value.
    #[error("value {value} is used by more than one member")]
    DuplicateEnumValue {
        /// Clashing value.
        value: i32,
    },
    /// An enum has no members.
    #[error("enum has no members")]
    EmptyEnum,
    /// A bitfield member is not a single set bit.
    #[error("bitfield member {name} = {value} is not a single bit")]
    BitfieldValueNotSingleBit {
        /// Member name.
        name: String,
        /// Member value.
        value: i32,
    },
    /// Two status codes share a name.
    #[error("error name {name} is declared more than once")]
    DuplicateErrorName {
        /// Error name.
        name: String,
    },
    /// Two status codes share a value.
    #[error("error value {value} is declared more than once")]
    DuplicateErrorValue {
        /// Clashing value.
        value: i32,
    },
    /// Status 0 means success and cannot be catalogued.
    #[error("status 0 is success, not an error")]
    ZeroErrorCode,
    /// `bitfield(E)` references a non-bitfield enum.
    #[error("{name} is not a bitfield enum")]
    NotABitfield {
        /// Enum name.
        name: String,
    },
    /// `enum(E)` references a bitfield enum.
    #[error("{name} is a bitfield enum; use bitfield({name})")]
    BitfieldAsEnum {
        /// Enum name.
        name: String,
    },
    /// Lists of this element type are not supported.
    #[error("lists of {element} are not supported")]
    UnsupportedListElement {
        /// Element type spelling.
        element: String,
    },
    /// A list declares neither explicit nor implicit sizing.
    #[error("list attribute needs has_explicit_read_buffer_size or read_buffer_size")]
    ListWithoutSizing,
    /// A list declares both explicit and implicit sizing.
    #[error("list attribute declares both explicit and implicit sizing")]
    ConflictingSizing,
    /// String lists are always probed.
    #[error("string lists must use explicit read-buffer sizing")]
    StringListNeedsExplicitSizing,
    /// Explicit sizing on a scalar other than a string.
    #[error("explicit read-buffer sizing only applies to lists and strings")]
    ExplicitSizingOnScalar,
    /// `read_buffer_size` on a scalar.
    #[error("read_buffer_size only applies to lists")]
    ReadBufferSizeOnScalar,
    /// Sibling sizing attribute is not a readable integer scalar.
    #[error("sizing attribute {name} must be a readable integer scalar")]
    InvalidSizingAttribute {
        /// Sibling attribute name.
        name: String,
    },
    /// A handle parameter name is repeated.
    #[error("handle parameter {name} is declared more than once")]
    DuplicateHandleParameter {
        /// Parameter name.
        name: String,
    },
    /// An attribute uses a handle parameter its class does not declare.
    #[error("handle parameter {name} is not declared by the owning class")]
    UndeclaredHandleParameter {
        /// Parameter name.
        name: String,
    },
    /// Handle parameters do not form one of the supported call shapes.
    #[error("unsupported handle parameter shape [{shape}]; expected [task], [string] or [task, string]")]
    UnsupportedHandleShape {
        /// Kinds in order.
        shape: String,
    },
    /// Handle parameters do not match the arguments of the function family.
    #[error("DAQmxGet{stem} takes [{expected}], not [{shape}]")]
    HandleShapeMismatch {
        /// Function stem the attribute is reached through.
        stem: String,
        /// Kinds declared, in order.
        shape: String,
        /// Kinds the stem takes, in order.
        expected: String,
    },
    /// `object(..)` attribute lacks `object_constructor_params`.
    #[error("object attribute needs object_constructor_params")]
    MissingConstructorParams,
    /// Constructor parameters are not owner params followed by one string.
    #[error("{class} is not constructible from [{forwarded}] plus a name")]
    ConstructorShapeMismatch {
        /// Target class.
        class: String,
        /// Forwarded parameter names.
        forwarded: String,
    },
    /// Objects cannot target a class whose struct is written by hand.
    #[error("{class} cannot be the target of an object attribute or collection")]
    HandWrittenTarget {
        /// Target class.
        class: String,
    },
    /// Lists of objects are not supported.
    #[error("lists of objects are not supported")]
    ObjectList,
    /// A read-only attribute cannot be reset.
    #[error("only writable attributes can be resettable")]
    ResettableReadOnly,
    /// `extends` forms a cycle.
    #[error("class hierarchy through {name} is cyclic")]
    CyclicExtends {
        /// Class at which the cycle was detected.
        name: String,
    },
    /// A child class does not share its parent's handle parameters.
    #[error("{name} must declare the same handle parameters as its parent {parent}")]
    ParentHandleMismatch {
        /// Child class.
        name: String,
        /// Parent class.
        parent: String,
    },
    /// A collection's names attribute is not a readable string list.
    #[error("{reference} must be a readable string list")]
    NamesAttributeNotStringList {
        /// `Class.attribute`.
        reference: String,
    },
    /// A collection filter attribute is not an enum attribute of the expected enum.
    #[error("filter attribute {reference} must be a readable enum({enum_name})")]
    FilterTypeMismatch {
        /// `Class.attribute`.
        reference: String,
        /// Enum named by the filter value.
        enum_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_issue() {
        let err = MetadataError::Invalid(IssueList(vec![
            ValidationIssue::new("a.toml: X", Rule::EmptyEnum),
            ValidationIssue::new("b.toml: Y", Rule::ZeroErrorCode),
        ]));
        let text = err.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("a.toml: X: enum has no members"));
        assert!(text.contains("b.toml: Y: status 0 is success"));
        assert_eq!(err.issues().len(), 2);
    }
}
