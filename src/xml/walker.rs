//! Populates model instances from an [`XmlElement`] tree.
//!
//! Each field's selector is evaluated against the element of the instance
//! being built; the hits are handed to the field's slot.

use crate::coerce::describe_text;
use crate::descriptor::{Model, TypeDescriptor};
use crate::diagnostics::Diagnostics;
use crate::err::{MappingError, Result};
use crate::mapper::MapperSettings;
use crate::xml::node::XmlElement;
use crate::xml::selector::Hit;

use log::trace;
use std::borrow::Cow;

pub(crate) struct XmlDeserializer<'s> {
    settings: &'s MapperSettings,
    depth: usize,
    diagnostics: Diagnostics,
}

impl<'s> XmlDeserializer<'s> {
    pub(crate) fn new(settings: &'s MapperSettings) -> Self {
        XmlDeserializer {
            settings,
            depth: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    pub(crate) fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// The textual value of a hit. Text content is trimmed when the settings
    /// ask for it; attribute values never are.
    pub(crate) fn text_of<'h>(&self, hit: &'h Hit<'_>) -> Cow<'h, str> {
        let text: Cow<'h, str> = match hit {
            Hit::Element(element) => element.text(),
            Hit::Text(text) => Cow::Borrowed(text.as_ref()),
            Hit::Attribute(value) => return Cow::Borrowed(*value),
        };

        if self.settings.should_trim_xml_text() && text.trim().len() != text.len() {
            Cow::Owned(text.trim().to_owned())
        } else {
            text
        }
    }

    /// Entry point for a document root; checks it against the type's root selector.
    pub(crate) fn deserialize_root<M: Model>(&mut self, root: &XmlElement) -> Result<M> {
        let descriptor = M::descriptor();
        if let Some(expected) = descriptor.plan()?.root {
            if !root.name.matches(&expected) {
                return Err(MappingError::MalformedInput {
                    type_name: descriptor.name(),
                    expected: "the declared root element",
                    found: format!("<{}>", root.name),
                });
            }
        }

        self.deserialize_element(root)
    }

    pub(crate) fn deserialize_element<M: Model>(&mut self, element: &XmlElement) -> Result<M> {
        let descriptor = M::descriptor();
        if self.depth >= self.settings.get_max_depth() {
            return Err(MappingError::DepthLimitExceeded {
                max_depth: self.settings.get_max_depth(),
            });
        }

        self.depth += 1;
        let mut instance = M::default();
        let result = self.read_fields(descriptor, &mut instance, element);
        self.depth -= 1;
        result?;

        descriptor.finish(&mut instance, &mut self.diagnostics);
        Ok(instance)
    }

    fn read_fields<M: Model>(
        &mut self,
        descriptor: &TypeDescriptor<M>,
        instance: &mut M,
        element: &XmlElement,
    ) -> Result<()> {
        let plan = descriptor.plan()?;

        for (field, selector) in descriptor.fields().iter().zip(&plan.selectors) {
            let Some(selector) = selector else {
                continue;
            };

            let hits = selector.select(element);
            if hits.is_empty() {
                continue;
            }

            let meta = field.meta();
            self.diagnostics.enter_key(meta.wire_key);
            let outcome = field.access.read_xml(instance, meta, &hits, self);
            let outcome = self.diagnostics.absorb(outcome);
            self.diagnostics.leave();
            outcome?;
        }
        Ok(())
    }

    /// Builds an `M` whose only populated field is `key`, set from attribute or text content.
    pub(crate) fn project<M: Model>(&mut self, key: &'static str, hit: &Hit<'_>) -> Result<M> {
        let descriptor = M::descriptor();
        let field = descriptor
            .field_by_key(key)
            .ok_or_else(|| MappingError::UnknownType {
                type_name: descriptor.name(),
                reason: format!("no field `{}` to project into", key),
            })?;

        trace!(
            "projecting {} into `{}.{}`",
            describe_text(&self.text_of(hit)),
            descriptor.name(),
            key
        );

        let mut instance = M::default();
        field
            .access
            .read_xml(&mut instance, field.meta(), std::slice::from_ref(hit), self)?;
        descriptor.finish(&mut instance, &mut self.diagnostics);
        Ok(instance)
    }
}
