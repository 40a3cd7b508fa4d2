#![deny(unused_must_use)]
#![forbid(unsafe_code)]
//! Bidirectional mapping between model types and their wire forms.
//!
//! Every model type carries a static [`TypeDescriptor`] listing its fields:
//! wire key, cardinality, element kind, and optionally a primitive projection
//! and an XML selector. Two walkers use the descriptors:
//!
//! * the JSON walker serializes instances to `serde_json` values and back,
//!   collapsing single-element collections and expanding bare values on the
//!   way in;
//! * the XML walker populates instances from a namespace-resolved element
//!   tree, following each field's selector.
//!
//! Problems below the root of a document never abort a call. They are logged
//! and returned next to the value as [`FieldIssue`]s.
//!
//! ```
//! use pubwire::{Mapper, OneOrMany};
//! use pubwire::model::Link;
//!
//! let mapper = Mapper::new();
//! let mut link = mapper
//!     .deserialize_str::<Link>(r#"{"href": "/chapter1", "rel": ["next"]}"#)
//!     .unwrap()
//!     .value;
//! assert_eq!(link.rel, OneOrMany::One("next".to_owned()));
//!
//! link.add_rel("alternate");
//! let json = mapper.serialize(&link).unwrap().value;
//! assert_eq!(json["rel"], serde_json::json!(["next", "alternate"]));
//! ```

mod macros;

pub mod canonical;
pub mod cardinality;
pub mod coerce;
pub mod descriptor;
pub mod diagnostics;
pub mod err;
pub mod mapper;
pub mod model;
pub mod xml;

mod json;
mod slot;

pub use crate::cardinality::OneOrMany;
pub use crate::coerce::Primitive;
pub use crate::descriptor::{
    Accessor, Cardinality, ElementKind, FieldDescriptor, FieldMeta, Model, PrimitiveKind,
    TypeDescriptor, describe,
};
pub use crate::diagnostics::Diagnostics;
pub use crate::err::{FieldIssue, MappingError, Result};
pub use crate::mapper::{Mapped, Mapper, MapperSettings};

use serde_json::Value;

/// Serializes `instance` with default settings.
pub fn to_json<T: Model>(instance: &T) -> Result<Mapped<Value>> {
    Mapper::new().serialize(instance)
}

/// Deserializes a JSON document with default settings.
pub fn from_json<T: Model>(json: &str) -> Result<Mapped<T>> {
    Mapper::new().deserialize_str(json)
}

/// Deserializes an XML document with default settings.
pub fn from_xml<T: Model>(xml: &str) -> Result<Mapped<T>> {
    Mapper::new().deserialize_xml(xml)
}
