//! On-disk record layout of catalog files.
//!
//! Every catalog file may carry any of the five top-level tables:
//!
//! ```toml
//! [classes.AIChannel]
//! module = "ai_channel"
//! c_function_stem = "ChanAttribute"
//! extends = "Channel"
//! handle_parameters = [
//!     { name = "task_handle", c_name = "taskHandle", kind = "task" },
//!     { name = "name", c_name = "channel", kind = "string" },
//! ]
//!
//! [[attributes]]
//! id = 6145
//! owner_class = "AIChannel"
//! name = "ai_atten"
//! access = "read-write"
//! resettable = true
//! type = "float64"
//!
//! [enums.DataJustification1]
//! alias = "DataJustification"
//! values = [{ name = "RIGHT", value = 10279 }, { name = "LEFT", value = 10209 }]
//!
//! [[errors]]
//! name = "INVALID_ATTRIBUTE_VALUE"
//! value = -200077
//!
//! [collections.AIChannelCollection]
//! owner = "Task"
//! item = "AIChannel"
//! names_attribute = "Task.channel_names"
//! ```
//!
//! Unknown keys are rejected so typos surface as parse errors with a line
//! number instead of silently dropping data.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::{Access, ElementType, EnumMember, HandleParameter, ReadBufferSize};

/// Contents of one catalog file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// `[classes.<Name>]` tables.
    #[serde(default)]
    pub classes: BTreeMap<String, RawClass>,
    /// `[[attributes]]` records.
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
    /// `[enums.<Name>]` tables.
    #[serde(default)]
    pub enums: BTreeMap<String, RawEnum>,
    /// `[[errors]]` records.
    #[serde(default)]
    pub errors: Vec<RawError>,
    /// `[collections.<Name>]` tables.
    #[serde(default)]
    pub collections: BTreeMap<String, RawCollection>,
}

/// A class record before resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawClass {
    /// Module the type lives in.
    pub module: String,
    /// Default attribute stem.
    pub c_function_stem: String,
    /// Fields identifying an instance.
    #[serde(default)]
    pub handle_parameters: Vec<HandleParameter>,
    /// Parent class.
    pub extends: Option<String>,
    /// The struct is hand-written.
    #[serde(default)]
    pub hand_written_struct: bool,
    /// Hand-written method names.
    #[serde(default)]
    pub hand_written: Vec<String>,
    /// Type documentation.
    #[serde(default)]
    pub doc: String,
}

/// An attribute record before defaults are filled in from its class.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAttribute {
    /// Driver attribute id.
    pub id: i32,
    /// Owning class.
    pub owner_class: String,
    /// Property name.
    pub name: String,
    /// Getter / setter availability.
    pub access: Access,
    /// Emit `reset_*`.
    #[serde(default)]
    pub resettable: bool,
    /// Element type spelling.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Array attribute.
    #[serde(default)]
    pub is_list: bool,
    /// Probe-then-fill reads.
    #[serde(default)]
    pub has_explicit_read_buffer_size: bool,
    /// Implicit list size.
    pub read_buffer_size: Option<ReadBufferSize>,
    /// Overrides the class's handle parameters.
    pub handle_parameters: Option<Vec<String>>,
    /// Owner fields forwarded to an `object(..)` constructor.
    pub object_constructor_params: Option<Vec<String>>,
    /// Overrides the class's stem.
    pub c_function_stem: Option<String>,
    /// Documentation.
    #[serde(default)]
    pub doc: String,
}

/// An enum record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEnum {
    /// Public type name.
    pub alias: Option<String>,
    /// Type documentation.
    #[serde(default)]
    pub doc: String,
    /// Members are mask bits.
    #[serde(default)]
    pub bitfield: bool,
    /// Members.
    pub values: Vec<EnumMember>,
}

/// A status code record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawError {
    /// Symbolic name.
    pub name: String,
    /// Status value.
    pub value: i32,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// A collection record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCollection {
    /// Owning class.
    pub owner: String,
    /// Item class.
    pub item: String,
    /// `Class.attribute` of the names list.
    pub names_attribute: String,
    /// Owner fields forwarded to items; defaults to all of them.
    pub forward: Option<Vec<String>>,
    /// Membership filter.
    pub filter: Option<RawFilter>,
    /// Method emitted on the owner.
    pub accessor: Option<String>,
    /// Type documentation.
    #[serde(default)]
    pub doc: String,
}

/// A collection filter record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFilter {
    /// `Class.attribute` read from each item.
    pub attribute: String,
    /// `Enum.MEMBER` the attribute must equal.
    pub value: String,
}
