//! OPDS 1 catalog feeds (Atom XML).

use crate::access;
use crate::descriptor::{FieldDescriptor, Model, TypeDescriptor};

use jiff::Timestamp;
use std::sync::LazyLock;

/// Prefixes available to every OPDS 1 selector.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("app", "http://www.w3.org/2007/app"),
    ("atom", "http://www.w3.org/2005/Atom"),
    ("bibframe", "http://bibframe.org/vocab/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("odl", "http://opds-spec.org/odl"),
    ("opds", "http://opds-spec.org/2010/catalog"),
    ("opensearch", "http://a9.com/-/spec/opensearch/1.1/"),
    (
        "relevance",
        "http://a9.com/-/opensearch/extensions/relevance/1.0/",
    ),
    ("schema", "http://schema.org"),
    ("thr", "http://purl.org/syndication/thread/1.0"),
    ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndirectAcquisition {
    pub type_acquisition: Option<String>,
    pub children: Vec<IndirectAcquisition>,
}

impl Model for IndirectAcquisition {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<IndirectAcquisition>> = LazyLock::new(|| {
            TypeDescriptor::new("IndirectAcquisition")
                .namespaces(NAMESPACES)
                .field(
                    FieldDescriptor::scalar("type", access!(IndirectAcquisition, type_acquisition))
                        .select("@type"),
                )
                .field(
                    FieldDescriptor::objects("child", access!(IndirectAcquisition, children))
                        .select("opds:indirectAcquisition"),
                )
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Price {
    pub currency_code: Option<String>,
    pub value: Option<f64>,
}

impl Model for Price {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Price>> = LazyLock::new(|| {
            TypeDescriptor::new("Price")
                .namespaces(NAMESPACES)
                .field(
                    FieldDescriptor::scalar("currency", access!(Price, currency_code))
                        .select("@currencycode"),
                )
                .field(FieldDescriptor::scalar("value", access!(Price, value)).select("text()"))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub type_link: Option<String>,
    pub title: Option<String>,
    pub prices: Vec<Price>,
    pub indirect_acquisitions: Vec<IndirectAcquisition>,
    pub count: Option<u64>,
    pub facet_group: Option<String>,
    pub active_facet: Option<bool>,
}

impl Model for Link {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Link>> = LazyLock::new(|| {
            TypeDescriptor::new("Link")
                .namespaces(NAMESPACES)
                .field(
                    FieldDescriptor::scalar("href", access!(Link, href))
                        .select("@href")
                        .required(),
                )
                .field(FieldDescriptor::scalar("rel", access!(Link, rel)).select("@rel"))
                .field(FieldDescriptor::scalar("type", access!(Link, type_link)).select("@type"))
                .field(FieldDescriptor::scalar("title", access!(Link, title)).select("@title"))
                .field(FieldDescriptor::objects("price", access!(Link, prices)).select("opds:price"))
                .field(
                    FieldDescriptor::objects(
                        "indirectAcquisition",
                        access!(Link, indirect_acquisitions),
                    )
                    .select("opds:indirectAcquisition"),
                )
                .field(FieldDescriptor::scalar("count", access!(Link, count)).select("@thr:count"))
                .field(
                    FieldDescriptor::scalar("facetGroup", access!(Link, facet_group))
                        .select("@opds:facetGroup"),
                )
                .field(
                    FieldDescriptor::scalar("activeFacet", access!(Link, active_facet))
                        .select("@opds:activeFacet"),
                )
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub name: Option<String>,
    pub uri: Option<String>,
}

impl Model for Author {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Author>> = LazyLock::new(|| {
            TypeDescriptor::new("Author")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("name", access!(Author, name)).select("atom:name"))
                .field(FieldDescriptor::scalar("uri", access!(Author, uri)).select("atom:uri"))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub term: Option<String>,
    pub label: Option<String>,
    pub scheme: Option<String>,
}

impl Model for Category {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Category>> = LazyLock::new(|| {
            TypeDescriptor::new("Category")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("term", access!(Category, term)).select("@term"))
                .field(FieldDescriptor::scalar("label", access!(Category, label)).select("@label"))
                .field(
                    FieldDescriptor::scalar("scheme", access!(Category, scheme)).select("@scheme"),
                )
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<Timestamp>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub links: Vec<Link>,
    /// Kept as text, catalogs often give a bare year.
    pub issued: Option<String>,
    pub language: Vec<String>,
    pub publishers: Vec<Author>,
}

impl Model for Entry {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Entry>> = LazyLock::new(|| {
            TypeDescriptor::new("Entry")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("id", access!(Entry, id)).select("atom:id"))
                .field(FieldDescriptor::scalar("title", access!(Entry, title)).select("atom:title"))
                .field(
                    FieldDescriptor::scalar("updated", access!(Entry, updated))
                        .select("atom:updated"),
                )
                .field(
                    FieldDescriptor::scalar("summary", access!(Entry, summary))
                        .select("atom:summary"),
                )
                .field(
                    FieldDescriptor::scalar("content", access!(Entry, content))
                        .select("atom:content"),
                )
                .field(
                    FieldDescriptor::objects("author", access!(Entry, authors))
                        .select("atom:author"),
                )
                .field(
                    FieldDescriptor::objects("category", access!(Entry, categories))
                        .select("atom:category"),
                )
                .field(FieldDescriptor::objects("link", access!(Entry, links)).select("atom:link"))
                .field(
                    FieldDescriptor::scalar("issued", access!(Entry, issued))
                        .select("dcterms:issued"),
                )
                .field(
                    FieldDescriptor::list("language", access!(Entry, language))
                        .select("dcterms:language"),
                )
                .field(
                    FieldDescriptor::objects("publisher", access!(Entry, publishers))
                        .select("dcterms:publisher/text()")
                        .project("name"),
                )
        });
        &DESCRIPTOR
    }
}

/// An OPDS 1 acquisition or navigation feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<Timestamp>,
    pub icon: Option<String>,
    pub authors: Vec<Author>,
    pub links: Vec<Link>,
    pub entries: Vec<Entry>,
    pub total_results: Option<u64>,
    pub items_per_page: Option<u64>,
}

impl Model for Feed {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Feed>> = LazyLock::new(|| {
            TypeDescriptor::new("Feed")
                .namespaces(NAMESPACES)
                .root("atom:feed")
                .field(FieldDescriptor::scalar("id", access!(Feed, id)).select("atom:id"))
                .field(FieldDescriptor::scalar("title", access!(Feed, title)).select("atom:title"))
                .field(
                    FieldDescriptor::scalar("updated", access!(Feed, updated))
                        .select("atom:updated"),
                )
                .field(FieldDescriptor::scalar("icon", access!(Feed, icon)).select("atom:icon"))
                .field(
                    FieldDescriptor::objects("author", access!(Feed, authors)).select("atom:author"),
                )
                .field(FieldDescriptor::objects("link", access!(Feed, links)).select("atom:link"))
                .field(
                    FieldDescriptor::objects("entry", access!(Feed, entries)).select("atom:entry"),
                )
                .field(
                    FieldDescriptor::scalar("totalResults", access!(Feed, total_results))
                        .select("opensearch:totalResults"),
                )
                .field(
                    FieldDescriptor::scalar("itemsPerPage", access!(Feed, items_per_page))
                        .select("opensearch:itemsPerPage"),
                )
        });
        &DESCRIPTOR
    }
}
