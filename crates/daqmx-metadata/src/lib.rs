//! `daqmx-metadata`
//!
//! The declarative description of the NI-DAQmx object model: which classes
//! exist, which attributes each exposes and how they are marshaled, the
//! enums attribute values are drawn from, the driver status codes, and the
//! typed collections layered over string-list attributes.
//!
//! The catalog is a set of TOML files (see [`schema`] for the record
//! layout). [`MetadataStore::bundled`] loads the copy compiled into this
//! crate; [`MetadataStore::from_dir`] loads an on-disk tree. Either way every
//! record is resolved against its class and checked by [`validation`]
//! before a store is handed out, so downstream consumers can assume every
//! reference resolves.
//!
//! ```
//! use daqmx_metadata::MetadataStore;
//!
//! let store = MetadataStore::bundled().unwrap();
//! let atten = store.find_attribute("AIChannel", "ai_atten").unwrap();
//! assert_eq!(atten.id, 6145);
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod schema;
pub mod store;
pub mod validation;

pub use error::{IssueList, MetadataError, Rule, ValidationIssue};
pub use loader::CatalogSource;
pub use model::{
    Access, AttributeDescriptor, AttributeKind, AttributeRef, ClassDescriptor, CollectionDescriptor,
    CollectionFilter, ElementType, EnumDescriptor, EnumMember, EnumValueRef, ErrorCode, HandleKind,
    HandleParameter, ListElement, ListSizing, ReadBufferSize, ScalarKind, Severity,
};
pub use store::MetadataStore;
