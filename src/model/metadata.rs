use crate::access;
use crate::descriptor::{FieldDescriptor, Model, TypeDescriptor};

use jiff::Timestamp;
use std::sync::LazyLock;

/// A person or organization credited on a publication.
///
/// On the wire a contributor may be given as a bare name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributor {
    pub name: Option<String>,
    pub sort_as: Option<String>,
    pub identifier: Option<String>,
    pub role: Option<String>,
}

impl Contributor {
    pub fn named(name: impl Into<String>) -> Self {
        Contributor {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Model for Contributor {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Contributor>> = LazyLock::new(|| {
            TypeDescriptor::new("Contributor")
                .field(FieldDescriptor::scalar("name", access!(Contributor, name)))
                .field(FieldDescriptor::scalar("sortAs", access!(Contributor, sort_as)))
                .field(FieldDescriptor::scalar(
                    "identifier",
                    access!(Contributor, identifier),
                ))
                .field(FieldDescriptor::scalar("role", access!(Contributor, role)))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subject {
    pub name: Option<String>,
    pub sort_as: Option<String>,
    pub scheme: Option<String>,
    pub code: Option<String>,
}

impl Model for Subject {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Subject>> = LazyLock::new(|| {
            TypeDescriptor::new("Subject")
                .field(FieldDescriptor::scalar("name", access!(Subject, name)))
                .field(FieldDescriptor::scalar("sortAs", access!(Subject, sort_as)))
                .field(FieldDescriptor::scalar("scheme", access!(Subject, scheme)))
                .field(FieldDescriptor::scalar("code", access!(Subject, code)))
        });
        &DESCRIPTOR
    }
}

/// A series or collection the publication is part of.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub name: Option<String>,
    pub sort_as: Option<String>,
    pub identifier: Option<String>,
    pub position: Option<f64>,
}

impl Model for Collection {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Collection>> = LazyLock::new(|| {
            TypeDescriptor::new("Collection")
                .field(FieldDescriptor::scalar("name", access!(Collection, name)))
                .field(FieldDescriptor::scalar("sortAs", access!(Collection, sort_as)))
                .field(FieldDescriptor::scalar(
                    "identifier",
                    access!(Collection, identifier),
                ))
                .field(FieldDescriptor::scalar("position", access!(Collection, position)))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BelongsTo {
    pub series: Vec<Collection>,
    pub collection: Vec<Collection>,
}

impl Model for BelongsTo {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<BelongsTo>> = LazyLock::new(|| {
            TypeDescriptor::new("BelongsTo")
                .field(
                    FieldDescriptor::objects("series", access!(BelongsTo, series)).project("name"),
                )
                .field(
                    FieldDescriptor::objects("collection", access!(BelongsTo, collection))
                        .project("name"),
                )
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub identifier: Option<String>,

    pub author: Vec<Contributor>,
    pub translator: Vec<Contributor>,
    pub editor: Vec<Contributor>,
    pub artist: Vec<Contributor>,
    pub illustrator: Vec<Contributor>,
    pub letterer: Vec<Contributor>,
    pub penciler: Vec<Contributor>,
    pub colorist: Vec<Contributor>,
    pub inker: Vec<Contributor>,
    pub narrator: Vec<Contributor>,
    pub contributor: Vec<Contributor>,
    pub publisher: Vec<Contributor>,
    pub imprint: Vec<Contributor>,

    pub language: Vec<String>,
    pub modified: Option<Timestamp>,
    pub published: Option<Timestamp>,
    pub description: Option<String>,
    pub direction: Option<String>,
    pub source: Option<String>,
    pub rights: Option<String>,
    pub subject: Vec<Subject>,
    pub belongs_to: Option<BelongsTo>,
    /// Total reading time in seconds.
    pub duration: Option<f64>,
}

/// Contributor roles, each of which may be a single contributor, a list, or bare names.
macro_rules! contributor_roles {
    ($descriptor: expr, $($role: ident),+ $(,)?) => {
        $descriptor
            $(.field(
                FieldDescriptor::objects(stringify!($role), access!(Metadata, $role))
                    .project("name"),
            ))+
    };
}

impl Model for Metadata {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Metadata>> = LazyLock::new(|| {
            let descriptor = TypeDescriptor::new("Metadata")
                .field(FieldDescriptor::scalar("@type", access!(Metadata, rdf_type)))
                .field(FieldDescriptor::scalar("title", access!(Metadata, title)))
                .field(FieldDescriptor::scalar(
                    "identifier",
                    access!(Metadata, identifier),
                ));

            contributor_roles!(
                descriptor,
                author,
                translator,
                editor,
                artist,
                illustrator,
                letterer,
                penciler,
                colorist,
                inker,
                narrator,
                contributor,
                publisher,
                imprint,
            )
            .field(FieldDescriptor::list("language", access!(Metadata, language)))
            .field(FieldDescriptor::scalar("modified", access!(Metadata, modified)))
            .field(FieldDescriptor::scalar("published", access!(Metadata, published)))
            .field(FieldDescriptor::scalar(
                "description",
                access!(Metadata, description),
            ))
            .field(FieldDescriptor::scalar("direction", access!(Metadata, direction)))
            .field(FieldDescriptor::scalar("source", access!(Metadata, source)))
            .field(FieldDescriptor::scalar("rights", access!(Metadata, rights)))
            .field(FieldDescriptor::objects("subject", access!(Metadata, subject)).project("name"))
            .field(FieldDescriptor::object("belongsTo", access!(Metadata, belongs_to)))
            .field(FieldDescriptor::scalar("duration", access!(Metadata, duration)))
        });
        &DESCRIPTOR
    }
}
