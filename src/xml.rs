//! Namespace-aware XML input.

pub mod node;
pub mod selector;
pub(crate) mod walker;

pub use self::node::{QualifiedName, XmlAttribute, XmlElement, XmlName, XmlNode};
pub use self::selector::{Hit, Selector};
