//! OPDS 2 catalog feeds (JSON).

use crate::access;
use crate::cardinality::OneOrMany;
use crate::descriptor::{FieldDescriptor, Model, TypeDescriptor};
use crate::diagnostics::Diagnostics;
use crate::model::publication::Publication;

use jiff::Timestamp;
use std::sync::LazyLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsPrice {
    pub currency: Option<String>,
    pub value: Option<f64>,
}

impl Model for OpdsPrice {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsPrice>> = LazyLock::new(|| {
            TypeDescriptor::new("OpdsPrice")
                .field(FieldDescriptor::scalar("currency", access!(OpdsPrice, currency)))
                .field(FieldDescriptor::scalar("value", access!(OpdsPrice, value)))
        });
        &DESCRIPTOR
    }
}

/// The media type chain a client walks through before reaching the acquired resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsIndirectAcquisition {
    pub type_acquisition: Option<String>,
    pub children: Vec<OpdsIndirectAcquisition>,
}

impl OpdsIndirectAcquisition {
    pub fn new(type_acquisition: impl Into<String>) -> Self {
        OpdsIndirectAcquisition {
            type_acquisition: Some(type_acquisition.into()),
            children: Vec::new(),
        }
    }
}

impl Model for OpdsIndirectAcquisition {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsIndirectAcquisition>> =
            LazyLock::new(|| {
                TypeDescriptor::new("OpdsIndirectAcquisition")
                    .field(FieldDescriptor::scalar(
                        "type",
                        access!(OpdsIndirectAcquisition, type_acquisition),
                    ))
                    .field(
                        FieldDescriptor::objects(
                            "child",
                            access!(OpdsIndirectAcquisition, children),
                        )
                        .project("type"),
                    )
            });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsProperties {
    pub number_of_items: Option<u64>,
    pub price: Option<OpdsPrice>,
    pub indirect_acquisition: Vec<OpdsIndirectAcquisition>,
}

impl Model for OpdsProperties {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsProperties>> = LazyLock::new(|| {
            TypeDescriptor::new("OpdsProperties")
                .field(FieldDescriptor::scalar(
                    "numberOfItems",
                    access!(OpdsProperties, number_of_items),
                ))
                .field(FieldDescriptor::object("price", access!(OpdsProperties, price)))
                .field(
                    FieldDescriptor::objects(
                        "indirectAcquisition",
                        access!(OpdsProperties, indirect_acquisition),
                    )
                    .project("type"),
                )
        });
        &DESCRIPTOR
    }
}

/// A link of an OPDS 2 feed. Shares the manifest link's shape but carries catalog properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsLink {
    pub href: Option<String>,
    pub type_link: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub title: Option<String>,
    pub properties: Option<OpdsProperties>,
    pub duration: Option<f64>,
    pub templated: Option<bool>,
    pub children: Vec<OpdsLink>,
    pub bitrate: Option<f64>,
    pub rel: OneOrMany<String>,
}

impl OpdsLink {
    pub fn new(href: impl Into<String>) -> Self {
        OpdsLink {
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

impl Model for OpdsLink {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsLink>> = LazyLock::new(|| {
            TypeDescriptor::new("OpdsLink")
                .field(FieldDescriptor::scalar("href", access!(OpdsLink, href)).required())
                .field(FieldDescriptor::scalar("type", access!(OpdsLink, type_link)))
                .field(FieldDescriptor::scalar("height", access!(OpdsLink, height)))
                .field(FieldDescriptor::scalar("width", access!(OpdsLink, width)))
                .field(FieldDescriptor::scalar("title", access!(OpdsLink, title)))
                .field(FieldDescriptor::object("properties", access!(OpdsLink, properties)))
                .field(FieldDescriptor::scalar("duration", access!(OpdsLink, duration)))
                .field(FieldDescriptor::scalar("templated", access!(OpdsLink, templated)))
                .field(FieldDescriptor::objects("children", access!(OpdsLink, children)))
                .field(FieldDescriptor::scalar("bitrate", access!(OpdsLink, bitrate)))
                .field(FieldDescriptor::flexible("rel", access!(OpdsLink, rel)))
        });
        &DESCRIPTOR
    }

    fn on_deserialized(&mut self, _diagnostics: &mut Diagnostics) {
        self.rel.collapse();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsMetadata {
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub number_of_items: Option<u64>,
    pub items_per_page: Option<u64>,
    pub current_page: Option<u64>,
    pub modified: Option<Timestamp>,
}

impl Model for OpdsMetadata {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsMetadata>> = LazyLock::new(|| {
            TypeDescriptor::new("OpdsMetadata")
                .field(FieldDescriptor::scalar("@type", access!(OpdsMetadata, rdf_type)))
                .field(FieldDescriptor::scalar("title", access!(OpdsMetadata, title)))
                .field(FieldDescriptor::scalar(
                    "numberOfItems",
                    access!(OpdsMetadata, number_of_items),
                ))
                .field(FieldDescriptor::scalar(
                    "itemsPerPage",
                    access!(OpdsMetadata, items_per_page),
                ))
                .field(FieldDescriptor::scalar(
                    "currentPage",
                    access!(OpdsMetadata, current_page),
                ))
                .field(FieldDescriptor::scalar("modified", access!(OpdsMetadata, modified)))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsGroup {
    pub metadata: Option<OpdsMetadata>,
    pub links: Vec<OpdsLink>,
    pub publications: Vec<Publication>,
    pub navigation: Vec<OpdsLink>,
}

impl Model for OpdsGroup {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsGroup>> = LazyLock::new(|| {
            TypeDescriptor::new("OpdsGroup")
                .field(FieldDescriptor::object("metadata", access!(OpdsGroup, metadata)))
                .field(FieldDescriptor::objects("links", access!(OpdsGroup, links)))
                .field(FieldDescriptor::objects(
                    "publications",
                    access!(OpdsGroup, publications),
                ))
                .field(FieldDescriptor::objects(
                    "navigation",
                    access!(OpdsGroup, navigation),
                ))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpdsFeed {
    pub context: Vec<String>,
    pub metadata: Option<OpdsMetadata>,
    pub links: Vec<OpdsLink>,
    pub publications: Vec<Publication>,
    pub navigation: Vec<OpdsLink>,
    pub groups: Vec<OpdsGroup>,
}

impl Model for OpdsFeed {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<OpdsFeed>> = LazyLock::new(|| {
            TypeDescriptor::new("OpdsFeed")
                .field(FieldDescriptor::list("@context", access!(OpdsFeed, context)))
                .field(FieldDescriptor::object("metadata", access!(OpdsFeed, metadata)))
                .field(FieldDescriptor::objects("links", access!(OpdsFeed, links)))
                .field(FieldDescriptor::objects(
                    "publications",
                    access!(OpdsFeed, publications),
                ))
                .field(FieldDescriptor::objects("navigation", access!(OpdsFeed, navigation)))
                .field(FieldDescriptor::objects("groups", access!(OpdsFeed, groups)))
        });
        &DESCRIPTOR
    }
}
