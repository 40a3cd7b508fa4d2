//! Concrete model types for publication manifests, OPDS catalogs and SMIL media overlays.

pub mod link;
pub mod metadata;
pub mod opds1;
pub mod opds2;
pub mod publication;
pub mod smil;

pub use self::link::{Link, Properties};
pub use self::metadata::{BelongsTo, Collection, Contributor, Metadata, Subject};
pub use self::opds2::{
    OpdsFeed, OpdsGroup, OpdsIndirectAcquisition, OpdsLink, OpdsMetadata, OpdsPrice,
    OpdsProperties,
};
pub use self::publication::{ManifestSection, Publication};
pub use self::smil::{Par, Seq, Smil, SmilAudio, SmilText};
