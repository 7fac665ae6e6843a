//! Resolved catalog records.
//!
//! These are the shapes the generator consumes. They are produced by the
//! loader from the raw TOML records in [`crate::schema`] after defaults have
//! been filled in from the owning class.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which of getter / setter a generated property exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    /// Getter only.
    Read,
    /// Setter only.
    Write,
    /// Getter and setter.
    ReadWrite,
}

impl Access {
    /// True when a getter is emitted.
    pub fn readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// True when a setter is emitted.
    pub fn writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Plain driver-facing scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool32`
    Bool,
    /// `int32`
    Int32,
    /// `uInt32`
    Uint32,
    /// `int64`
    Int64,
    /// `uInt64`
    Uint64,
    /// `float64`
    Float64,
    /// NUL-terminated `char[]`
    String,
}

impl ScalarKind {
    /// Catalog spelling of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float64 => "float64",
            Self::String => "string",
        }
    }

    /// True for the integer and float kinds.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::String)
    }

    /// True for the integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int32 | Self::Uint32 | Self::Int64 | Self::Uint64)
    }
}

/// Element type of an attribute as written in the catalog: one of the
/// scalar spellings, or `enum(Name)`, `bitfield(Name)`, `object(Class)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementType {
    /// Plain scalar.
    Scalar(ScalarKind),
    /// Integer interpreted through the named enum.
    Enum(String),
    /// Integer mask interpreted through the named bitfield enum.
    Bitfield(String),
    /// String naming an instance of the named class.
    Object(String),
}

impl ElementType {
    /// Enum referenced by an `enum(..)` or `bitfield(..)` type.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Self::Enum(name) | Self::Bitfield(name) => Some(name),
            _ => None,
        }
    }

    /// Class referenced by an `object(..)` type.
    pub fn object_class(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name),
            _ => None,
        }
    }
}

/// Error returned when an element type string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element type {0:?}")]
pub struct ElementTypeParseError(pub String);

impl FromStr for ElementType {
    type Err = ElementTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scalar = match s {
            "bool" => Some(ScalarKind::Bool),
            "int32" => Some(ScalarKind::Int32),
            "uint32" => Some(ScalarKind::Uint32),
            "int64" => Some(ScalarKind::Int64),
            "uint64" => Some(ScalarKind::Uint64),
            "float64" => Some(ScalarKind::Float64),
            "string" => Some(ScalarKind::String),
            _ => None,
        };
        if let Some(kind) = scalar {
            return Ok(Self::Scalar(kind));
        }

        let wrapped = |prefix: &str| {
            s.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(')'))
                .filter(|inner| !inner.is_empty())
                .map(str::to_string)
        };
        if let Some(name) = wrapped("enum(") {
            Ok(Self::Enum(name))
        } else if let Some(name) = wrapped("bitfield(") {
            Ok(Self::Bitfield(name))
        } else if let Some(name) = wrapped("object(") {
            Ok(Self::Object(name))
        } else {
            Err(ElementTypeParseError(s.to_string()))
        }
    }
}

impl TryFrom<String> for ElementType {
    type Error = ElementTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementType> for String {
    fn from(value: ElementType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.as_str()),
            Self::Enum(name) => write!(f, "enum({name})"),
            Self::Bitfield(name) => write!(f, "bitfield({name})"),
            Self::Object(name) => write!(f, "object({name})"),
        }
    }
}

/// How a handle parameter is passed to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// A `TaskHandle`.
    Task,
    /// A `const char[]` name.
    String,
}

/// One leading argument of an attribute call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandleParameter {
    /// Field name on the owning object.
    pub name: String,
    /// Parameter name in the C prototype.
    pub c_name: String,
    /// Marshaling kind.
    pub kind: HandleKind,
}

/// Size used for implicitly sized list reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadBufferSize {
    /// A fixed element count.
    Fixed(u32),
    /// The value of a sibling integer attribute on the same object.
    Attribute(String),
}

/// A single readable and/or writable property of a driver object.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    /// Driver attribute id, unique within the owning class.
    pub id: i32,
    /// Class the attribute belongs to.
    pub owner_class: String,
    /// Property name (snake_case).
    pub name: String,
    /// Getter / setter availability.
    pub access: Access,
    /// Whether a `reset_*` method is emitted.
    pub resettable: bool,
    /// Element type.
    pub element_type: ElementType,
    /// Whether the value is an array of `element_type`.
    pub is_list: bool,
    /// Whether reads use the probe-then-fill protocol.
    pub has_explicit_read_buffer_size: bool,
    /// Element count for implicitly sized list reads.
    pub read_buffer_size: Option<ReadBufferSize>,
    /// Leading handle arguments, inherited from the owning class unless overridden.
    pub handle_parameters: Vec<HandleParameter>,
    /// Owner fields forwarded to the constructor of an `object(..)` result.
    pub object_constructor_params: Option<Vec<String>>,
    /// Stem of the `DAQmxGet/Set/Reset<stem>` entry points.
    pub c_function_stem: String,
    /// Documentation copied onto the generated accessors.
    pub doc: String,
    /// Catalog file the record was read from.
    pub source: String,
}

impl AttributeDescriptor {
    /// `file: Class.name (id)` for diagnostics.
    pub fn location(&self) -> String {
        format!("{}: {}.{} ({})", self.source, self.owner_class, self.name, self.id)
    }

    /// Enum binding of an `enum(..)` or `bitfield(..)` attribute.
    pub fn enum_binding(&self) -> Option<&str> {
        self.element_type.enum_name()
    }

    /// Classifies the attribute by the dispatcher method it needs.
    ///
    /// Returns `None` for combinations the catalog validator rejects
    /// (lists of objects, bitfields or bools, unsized lists).
    pub fn kind(&self) -> Option<AttributeKind<'_>> {
        if !self.is_list {
            return Some(match &self.element_type {
                ElementType::Scalar(kind) => AttributeKind::Scalar(*kind),
                ElementType::Enum(name) => AttributeKind::Enum(name),
                ElementType::Bitfield(name) => AttributeKind::Bitfield(name),
                ElementType::Object(class) => AttributeKind::Object {
                    class,
                    forwarded: self.object_constructor_params.as_deref().unwrap_or(&[]),
                },
            });
        }

        let element = match &self.element_type {
            ElementType::Scalar(ScalarKind::Bool) => return None,
            ElementType::Scalar(kind) => ListElement::Scalar(*kind),
            ElementType::Enum(name) => ListElement::Enum(name),
            ElementType::Bitfield(_) | ElementType::Object(_) => return None,
        };
        let sizing = if self.has_explicit_read_buffer_size {
            ListSizing::Explicit
        } else {
            match self.read_buffer_size.as_ref()? {
                ReadBufferSize::Fixed(n) => ListSizing::Fixed(*n),
                ReadBufferSize::Attribute(name) => ListSizing::Attribute(name),
            }
        };
        Some(AttributeKind::List { element, sizing })
    }
}

/// An attribute's shape as far as code generation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind<'a> {
    /// Plain scalar value.
    Scalar(ScalarKind),
    /// Integer mapped through an enum.
    Enum(&'a str),
    /// Integer mask mapped through a bitfield enum.
    Bitfield(&'a str),
    /// Name of another driver object.
    Object {
        /// Target class.
        class: &'a str,
        /// Owner fields forwarded to the target's constructor.
        forwarded: &'a [String],
    },
    /// Array of numbers, strings or enum members.
    List {
        /// Element shape.
        element: ListElement<'a>,
        /// How the read buffer is sized.
        sizing: ListSizing<'a>,
    },
}

/// Element of a list attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListElement<'a> {
    /// Numeric or string element.
    Scalar(ScalarKind),
    /// Enum member.
    Enum(&'a str),
}

/// Read-buffer sizing of a list attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSizing<'a> {
    /// Probe for the size, then fill.
    Explicit,
    /// Fixed element count.
    Fixed(u32),
    /// Element count read from a sibling attribute.
    Attribute(&'a str),
}

/// A façade object type and how it addresses the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Rust type name.
    pub name: String,
    /// Module the type lives in.
    pub module: String,
    /// Default stem for the class's attributes.
    pub c_function_stem: String,
    /// Fields identifying an instance.
    pub handle_parameters: Vec<HandleParameter>,
    /// Parent class whose attributes are merged in.
    pub extends: Option<String>,
    /// The struct definition is written by hand; only accessors are generated.
    pub hand_written_struct: bool,
    /// Hand-written method names that generated names must not collide with.
    pub hand_written: Vec<String>,
    /// Type documentation.
    pub doc: String,
    /// Catalog file the record was read from.
    pub source: String,
}

impl ClassDescriptor {
    /// `file: Class` for diagnostics.
    pub fn location(&self) -> String {
        format!("{}: {}", self.source, self.name)
    }

    /// Looks up a handle parameter by field name.
    pub fn handle_parameter(&self, name: &str) -> Option<&HandleParameter> {
        self.handle_parameters.iter().find(|p| p.name == name)
    }
}

/// A named driver constant set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Driver-facing name, used by `enum(..)` references.
    pub name: String,
    /// Public type name when it differs from `name`.
    pub alias: Option<String>,
    /// Type documentation.
    pub doc: String,
    /// Members are single bits of a mask.
    pub bitfield: bool,
    /// Members in declaration order.
    pub values: Vec<EnumMember>,
    /// Catalog file the record was read from.
    pub source: String,
}

impl EnumDescriptor {
    /// Name of the generated Rust type.
    pub fn type_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Looks up a member by driver-facing name.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.values.iter().find(|m| m.name == name)
    }
}

/// One value of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumMember {
    /// UPPER_SNAKE driver name.
    pub name: String,
    /// Numeric value.
    pub value: i32,
    /// Member documentation.
    #[serde(default)]
    pub doc: String,
}

/// A driver status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode {
    /// UPPER_SNAKE symbolic name.
    pub name: String,
    /// Status value; negative for errors, positive for warnings.
    pub value: i32,
    /// Human-readable description.
    pub description: String,
}

impl ErrorCode {
    /// Severity implied by the sign of the value.
    pub fn severity(&self) -> Severity {
        if self.value < 0 {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

/// Severity of a driver status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Negative status; the operation failed.
    Error,
    /// Positive status; the operation completed with a caveat.
    Warning,
}

/// `Class.attribute` reference used by collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    /// Class name.
    pub class: String,
    /// Attribute name.
    pub attribute: String,
}

impl FromStr for AttributeRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((class, attribute)) if !class.is_empty() && !attribute.is_empty() => Ok(Self {
                class: class.to_string(),
                attribute: attribute.to_string(),
            }),
            _ => Err(format!("expected `Class.attribute`, got {s:?}")),
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.attribute)
    }
}

/// `Enum.MEMBER` reference used by collection filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValueRef {
    /// Driver-facing enum name.
    pub enum_name: String,
    /// Member name.
    pub member: String,
}

impl FromStr for EnumValueRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((enum_name, member)) if !enum_name.is_empty() && !member.is_empty() => Ok(Self {
                enum_name: enum_name.to_string(),
                member: member.to_string(),
            }),
            _ => Err(format!("expected `Enum.MEMBER`, got {s:?}")),
        }
    }
}

impl fmt::Display for EnumValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enum_name, self.member)
    }
}

/// Restricts a collection to items whose enum attribute has a given value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFilter {
    /// Attribute read from each candidate item.
    pub attribute: AttributeRef,
    /// Required value.
    pub value: EnumValueRef,
}

/// A typed, name-indexed view over a string-list attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDescriptor {
    /// Rust type name.
    pub name: String,
    /// Class the collection hangs off.
    pub owner: String,
    /// Class of each item.
    pub item: String,
    /// String-list attribute of the owner enumerating the item names.
    pub names_attribute: AttributeRef,
    /// Owner fields forwarded to each item's constructor.
    pub forward: Vec<String>,
    /// Optional membership filter.
    pub filter: Option<CollectionFilter>,
    /// Method emitted on the owner returning the collection.
    pub accessor: Option<String>,
    /// Type documentation.
    pub doc: String,
    /// Catalog file the record was read from.
    pub source: String,
}

impl CollectionDescriptor {
    /// `file: Collection` for diagnostics.
    pub fn location(&self) -> String {
        format!("{}: {}", self.source, self.name)
    }
}
