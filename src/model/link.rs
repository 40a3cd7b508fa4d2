use crate::access;
use crate::cardinality::OneOrMany;
use crate::descriptor::{FieldDescriptor, Model, TypeDescriptor};
use crate::diagnostics::Diagnostics;

use std::sync::LazyLock;

/// Rendering hints attached to a manifest link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    pub contains: Vec<String>,
    pub layout: Option<String>,
    pub media_overlay: Option<String>,
    pub orientation: Option<String>,
    pub overflow: Option<String>,
    pub page: Option<String>,
    pub spread: Option<String>,
}

impl Model for Properties {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Properties>> = LazyLock::new(|| {
            TypeDescriptor::new("Properties")
                .field(FieldDescriptor::list("contains", access!(Properties, contains)))
                .field(FieldDescriptor::scalar("layout", access!(Properties, layout)))
                .field(FieldDescriptor::scalar(
                    "media-overlay",
                    access!(Properties, media_overlay),
                ))
                .field(FieldDescriptor::scalar(
                    "orientation",
                    access!(Properties, orientation),
                ))
                .field(FieldDescriptor::scalar("overflow", access!(Properties, overflow)))
                .field(FieldDescriptor::scalar("page", access!(Properties, page)))
                .field(FieldDescriptor::scalar("spread", access!(Properties, spread)))
        });
        &DESCRIPTOR
    }
}

/// A link of a publication manifest.
///
/// `rel` keeps the shape it was given: a single relation or a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub href: Option<String>,
    pub type_link: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub title: Option<String>,
    pub properties: Option<Properties>,
    pub duration: Option<f64>,
    pub templated: Option<bool>,
    pub children: Vec<Link>,
    pub bitrate: Option<f64>,
    pub rel: OneOrMany<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: Some(href.into()),
            ..Default::default()
        }
    }

    pub fn add_rel(&mut self, rel: impl Into<String>) {
        self.rel.push(rel.into());
    }

    pub fn add_rels<I, S>(&mut self, rels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rel.extend(rels.into_iter().map(Into::into));
    }

    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.iter().any(|candidate| candidate == rel)
    }
}

impl Model for Link {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Link>> = LazyLock::new(|| {
            TypeDescriptor::new("Link")
                .field(FieldDescriptor::scalar("href", access!(Link, href)).required())
                .field(FieldDescriptor::scalar("type", access!(Link, type_link)))
                .field(FieldDescriptor::scalar("height", access!(Link, height)))
                .field(FieldDescriptor::scalar("width", access!(Link, width)))
                .field(FieldDescriptor::scalar("title", access!(Link, title)))
                .field(FieldDescriptor::object("properties", access!(Link, properties)))
                .field(FieldDescriptor::scalar("duration", access!(Link, duration)))
                .field(FieldDescriptor::scalar("templated", access!(Link, templated)))
                .field(FieldDescriptor::objects("children", access!(Link, children)))
                .field(FieldDescriptor::scalar("bitrate", access!(Link, bitrate)))
                .field(FieldDescriptor::flexible("rel", access!(Link, rel)))
        });
        &DESCRIPTOR
    }

    fn on_deserialized(&mut self, _diagnostics: &mut Diagnostics) {
        self.rel.collapse();
    }
}
