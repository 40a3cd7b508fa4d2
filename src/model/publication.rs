use crate::access;
use crate::descriptor::{FieldDescriptor, Model, TypeDescriptor};
use crate::err::Result;
use crate::mapper::{Mapped, Mapper};
use crate::model::link::Link;
use crate::model::metadata::Metadata;

use log::debug;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub const WEBPUB_MEDIA_TYPE: &str = "application/webpub+json";

/// Media types worth fetching ahead of the reading order.
const PREFETCH_MEDIA_TYPES: [&str; 3] = ["text/css", "application/vnd.ms-opentype", "text/javascript"];

/// A web publication manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Publication {
    pub context: Vec<String>,
    pub metadata: Option<Metadata>,
    pub links: Vec<Link>,
    pub spine: Vec<Link>,
    pub resources: Vec<Link>,
    pub toc: Vec<Link>,
    pub page_list: Vec<Link>,
    pub landmarks: Vec<Link>,
}

impl Model for Publication {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Publication>> = LazyLock::new(|| {
            TypeDescriptor::new("Publication")
                .field(FieldDescriptor::list("@context", access!(Publication, context)))
                .field(FieldDescriptor::object("metadata", access!(Publication, metadata)))
                .field(FieldDescriptor::objects("links", access!(Publication, links)))
                .field(FieldDescriptor::objects("spine", access!(Publication, spine)))
                .field(FieldDescriptor::objects(
                    "resources",
                    access!(Publication, resources),
                ))
                .field(FieldDescriptor::objects("toc", access!(Publication, toc)))
                .field(FieldDescriptor::objects(
                    "page-list",
                    access!(Publication, page_list),
                ))
                .field(FieldDescriptor::objects(
                    "landmarks",
                    access!(Publication, landmarks),
                ))
        });
        &DESCRIPTOR
    }
}

impl Publication {
    pub fn add_link(
        &mut self,
        type_link: &str,
        rels: &[&str],
        href: impl Into<String>,
        templated: bool,
    ) {
        let mut link = Link::new(href);
        link.type_link = Some(type_link.to_owned());
        link.add_rels(rels.iter().copied());
        if templated {
            link.templated = Some(true);
        }
        self.links.push(link);
    }

    /// Advertises the manifest's own location.
    pub fn add_self_link(&mut self, href: impl Into<String>) {
        self.add_link(WEBPUB_MEDIA_TYPE, &["self"], href, false);
    }

    /// The first link with rel `cover`, searching resources, then spine, then links.
    pub fn cover(&self) -> Option<&Link> {
        self.resources
            .iter()
            .chain(&self.spine)
            .chain(&self.links)
            .find(|link| link.has_rel("cover"))
    }

    pub fn prefetch_resources(&self) -> Vec<&Link> {
        self.resources
            .iter()
            .filter(|link| {
                link.type_link
                    .as_deref()
                    .is_some_and(|media_type| PREFETCH_MEDIA_TYPES.contains(&media_type))
            })
            .collect()
    }

    /// Spine items that declare a media overlay.
    pub fn media_overlays(&self) -> Vec<&Link> {
        self.spine
            .iter()
            .filter(|link| {
                link.properties
                    .as_ref()
                    .is_some_and(|properties| properties.media_overlay.is_some())
            })
            .collect()
    }

    pub fn has_media_overlay(&self) -> bool {
        !self.media_overlays().is_empty()
    }

    /// Serializes one part of the manifest. A missing or empty part is `{}`.
    pub fn section(&self, mapper: &Mapper, section: ManifestSection) -> Result<Mapped<Value>> {
        debug!("serializing manifest section `{}`", section);
        let empty = || Mapped {
            value: Value::Object(Map::new()),
            issues: Vec::new(),
        };
        let links = |links: &[Link]| {
            if links.is_empty() {
                Ok(empty())
            } else {
                mapper.serialize_all(links)
            }
        };

        match section {
            ManifestSection::All => mapper.serialize(self),
            ManifestSection::Cover => self.cover().map_or_else(|| Ok(empty()), |link| mapper.serialize(link)),
            ManifestSection::MediaOverlays => {
                let overlays: Vec<Link> = self.media_overlays().into_iter().cloned().collect();
                links(&overlays)
            }
            ManifestSection::Spine => links(&self.spine),
            ManifestSection::PageList => links(&self.page_list),
            ManifestSection::Landmarks => links(&self.landmarks),
            ManifestSection::Links => links(&self.links),
            ManifestSection::Resources => links(&self.resources),
            ManifestSection::Toc => links(&self.toc),
            ManifestSection::Metadata => self
                .metadata
                .as_ref()
                .map_or_else(|| Ok(empty()), |metadata| mapper.serialize(metadata)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSection {
    All,
    Cover,
    MediaOverlays,
    Spine,
    PageList,
    Landmarks,
    Links,
    Resources,
    Toc,
    Metadata,
}

impl ManifestSection {
    pub const NAMES: [&'static str; 10] = [
        "all",
        "cover",
        "mediaoverlays",
        "spine",
        "pagelist",
        "landmarks",
        "links",
        "resources",
        "toc",
        "metadata",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ManifestSection::All => "all",
            ManifestSection::Cover => "cover",
            ManifestSection::MediaOverlays => "mediaoverlays",
            ManifestSection::Spine => "spine",
            ManifestSection::PageList => "pagelist",
            ManifestSection::Landmarks => "landmarks",
            ManifestSection::Links => "links",
            ManifestSection::Resources => "resources",
            ManifestSection::Toc => "toc",
            ManifestSection::Metadata => "metadata",
        }
    }
}

impl fmt::Display for ManifestSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ManifestSection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let section = match s.to_ascii_lowercase().as_str() {
            "all" => ManifestSection::All,
            "cover" => ManifestSection::Cover,
            "mediaoverlays" => ManifestSection::MediaOverlays,
            "spine" => ManifestSection::Spine,
            "pagelist" => ManifestSection::PageList,
            "landmarks" => ManifestSection::Landmarks,
            "links" => ManifestSection::Links,
            "resources" => ManifestSection::Resources,
            "toc" => ManifestSection::Toc,
            "metadata" => ManifestSection::Metadata,
            other => {
                return Err(format!(
                    "unknown manifest section `{}`, expected one of {}",
                    other,
                    Self::NAMES.join(", ")
                ));
            }
        };
        Ok(section)
    }
}
