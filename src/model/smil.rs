//! SMIL media overlay documents (XML).

use crate::access;
use crate::descriptor::{FieldDescriptor, Model, TypeDescriptor};

use std::sync::LazyLock;

pub const NAMESPACES: &[(&str, &str)] = &[
    ("epub", "http://www.idpf.org/2007/ops"),
    ("smil", "http://www.w3.org/ns/SMIL"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmilText {
    pub src: Option<String>,
    pub id: Option<String>,
}

impl Model for SmilText {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<SmilText>> = LazyLock::new(|| {
            TypeDescriptor::new("SmilText")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("src", access!(SmilText, src)).select("@src"))
                .field(FieldDescriptor::scalar("id", access!(SmilText, id)).select("@id"))
        });
        &DESCRIPTOR
    }
}

/// An audio clip. Clock values are kept as written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmilAudio {
    pub src: Option<String>,
    pub clip_begin: Option<String>,
    pub clip_end: Option<String>,
}

impl Model for SmilAudio {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<SmilAudio>> = LazyLock::new(|| {
            TypeDescriptor::new("SmilAudio")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("src", access!(SmilAudio, src)).select("@src"))
                .field(
                    FieldDescriptor::scalar("clipBegin", access!(SmilAudio, clip_begin))
                        .select("@clipBegin"),
                )
                .field(
                    FieldDescriptor::scalar("clipEnd", access!(SmilAudio, clip_end))
                        .select("@clipEnd"),
                )
        });
        &DESCRIPTOR
    }
}

/// A text fragment synchronized with an audio clip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Par {
    pub id: Option<String>,
    pub epub_type: Option<String>,
    pub text: Option<SmilText>,
    pub audio: Option<SmilAudio>,
}

impl Model for Par {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Par>> = LazyLock::new(|| {
            TypeDescriptor::new("Par")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("id", access!(Par, id)).select("@id"))
                .field(
                    FieldDescriptor::scalar("epub:type", access!(Par, epub_type))
                        .select("@epub:type"),
                )
                .field(FieldDescriptor::object("text", access!(Par, text)).select("smil:text"))
                .field(FieldDescriptor::object("audio", access!(Par, audio)).select("smil:audio"))
        });
        &DESCRIPTOR
    }
}

/// A sequence of parallel blocks and nested sequences. The document body is a `Seq` too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seq {
    pub id: Option<String>,
    pub text_ref: Option<String>,
    pub epub_type: Option<String>,
    pub seqs: Vec<Seq>,
    pub pars: Vec<Par>,
}

impl Seq {
    /// All `par` blocks under this sequence: its own first, then those of nested sequences.
    pub fn pars_in_order(&self) -> Vec<&Par> {
        let mut collected = Vec::new();
        self.collect_pars(&mut collected);
        collected
    }

    fn collect_pars<'a>(&'a self, collected: &mut Vec<&'a Par>) {
        collected.extend(self.pars.iter());
        for seq in &self.seqs {
            seq.collect_pars(collected);
        }
    }
}

impl Model for Seq {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Seq>> = LazyLock::new(|| {
            TypeDescriptor::new("Seq")
                .namespaces(NAMESPACES)
                .field(FieldDescriptor::scalar("id", access!(Seq, id)).select("@id"))
                .field(
                    FieldDescriptor::scalar("epub:textref", access!(Seq, text_ref))
                        .select("@epub:textref"),
                )
                .field(
                    FieldDescriptor::scalar("epub:type", access!(Seq, epub_type))
                        .select("@epub:type"),
                )
                .field(FieldDescriptor::objects("seq", access!(Seq, seqs)).select("smil:seq"))
                .field(FieldDescriptor::objects("par", access!(Seq, pars)).select("smil:par"))
        });
        &DESCRIPTOR
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Smil {
    pub version: Option<String>,
    pub body: Option<Seq>,
}

impl Model for Smil {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: LazyLock<TypeDescriptor<Smil>> = LazyLock::new(|| {
            TypeDescriptor::new("Smil")
                .namespaces(NAMESPACES)
                .root("smil:smil")
                .field(FieldDescriptor::scalar("version", access!(Smil, version)).select("@version"))
                .field(FieldDescriptor::object("body", access!(Smil, body)).select("smil:body"))
        });
        &DESCRIPTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn par(id: &str) -> Par {
        Par {
            id: Some(id.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_pars_in_order_visits_own_pars_before_nested_sequences() {
        let body = Seq {
            pars: vec![par("a"), par("b")],
            seqs: vec![Seq {
                pars: vec![par("c")],
                seqs: vec![Seq {
                    pars: vec![par("d")],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let ids: Vec<_> = body
            .pars_in_order()
            .into_iter()
            .filter_map(|par| par.id.as_deref())
            .collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }
}
