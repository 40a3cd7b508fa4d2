//! Per-field glue between an accessor, a codec and a cardinality rule.
//!
//! Slots erase the field's in-memory type so a descriptor can hold all of its
//! fields in one list.

use crate::cardinality::{OneOrMany, collapse, expand};
use crate::coerce::Codec;
use crate::descriptor::{Accessor, FieldMeta, Reachable};
use crate::diagnostics::Diagnostics;
use crate::err::Result;
use crate::json::{JsonDeserializer, JsonSerializer};
use crate::xml::selector::Hit;
use crate::xml::walker::XmlDeserializer;

use log::trace;
use serde_json::Value;
use std::marker::PhantomData;

pub(crate) trait FieldAccess<T>: Send + Sync {
    fn is_empty(&self, owner: &T) -> bool;

    /// The wire value of the field, `None` when it is absent.
    fn write_json(&self, owner: &T, cx: &mut JsonSerializer<'_>) -> Result<Option<Value>>;

    fn read_json(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        wire: &Value,
        cx: &mut JsonDeserializer<'_>,
    ) -> Result<()>;

    fn read_xml(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        hits: &[Hit<'_>],
        cx: &mut XmlDeserializer<'_>,
    ) -> Result<()>;

    fn check(&self, meta: &FieldMeta) -> std::result::Result<(), String>;

    fn validate_target(&self, reachable: &mut Reachable) -> Result<()>;
}

/// Decodes every element, reporting failures at their index.
///
/// Returns `None` if any element failed.
fn decode_each<I, F>(
    count: usize,
    diagnostics: impl Fn(&mut F) -> &mut Diagnostics,
    cx: &mut F,
    mut decode: impl FnMut(usize, &mut F) -> Result<I>,
) -> Result<Option<Vec<I>>> {
    let mut items = Vec::with_capacity(count);
    let mut failed = false;

    for index in 0..count {
        diagnostics(cx).enter_index(index);
        let outcome = decode(index, cx);
        let outcome = diagnostics(cx).absorb(outcome);
        diagnostics(cx).leave();

        match outcome? {
            Some(item) => items.push(item),
            None => failed = true,
        }
    }

    Ok(if failed { None } else { Some(items) })
}

pub(crate) struct ScalarSlot<T, C: Codec> {
    accessor: Accessor<T, Option<C::Item>>,
    codec: PhantomData<fn() -> C>,
}

impl<T, C: Codec> ScalarSlot<T, C> {
    pub(crate) fn new(accessor: Accessor<T, Option<C::Item>>) -> Self {
        ScalarSlot {
            accessor,
            codec: PhantomData,
        }
    }
}

impl<T: 'static, C: Codec> FieldAccess<T> for ScalarSlot<T, C> {
    fn is_empty(&self, owner: &T) -> bool {
        self.accessor.get(owner).is_none()
    }

    fn write_json(&self, owner: &T, cx: &mut JsonSerializer<'_>) -> Result<Option<Value>> {
        match self.accessor.get(owner) {
            Some(item) => C::encode(item, cx).map(Some),
            None => Ok(None),
        }
    }

    fn read_json(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        wire: &Value,
        cx: &mut JsonDeserializer<'_>,
    ) -> Result<()> {
        let item = C::decode_json(wire, meta, cx)?;
        *self.accessor.get_mut(owner) = Some(item);
        Ok(())
    }

    fn read_xml(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        hits: &[Hit<'_>],
        cx: &mut XmlDeserializer<'_>,
    ) -> Result<()> {
        if let Some(first) = hits.first() {
            if hits.len() > 1 {
                trace!(
                    "`{}` matched {} nodes, keeping the first",
                    meta.wire_key,
                    hits.len()
                );
            }
            let item = C::decode_xml(first, meta, cx)?;
            *self.accessor.get_mut(owner) = Some(item);
        }
        Ok(())
    }

    fn check(&self, meta: &FieldMeta) -> std::result::Result<(), String> {
        C::check(meta)
    }

    fn validate_target(&self, reachable: &mut Reachable) -> Result<()> {
        C::validate_target(reachable)
    }
}

pub(crate) struct CollectionSlot<T, C: Codec> {
    accessor: Accessor<T, Vec<C::Item>>,
    codec: PhantomData<fn() -> C>,
}

impl<T, C: Codec> CollectionSlot<T, C> {
    pub(crate) fn new(accessor: Accessor<T, Vec<C::Item>>) -> Self {
        CollectionSlot {
            accessor,
            codec: PhantomData,
        }
    }
}

impl<T: 'static, C: Codec> FieldAccess<T> for CollectionSlot<T, C> {
    fn is_empty(&self, owner: &T) -> bool {
        self.accessor.get(owner).is_empty()
    }

    fn write_json(&self, owner: &T, cx: &mut JsonSerializer<'_>) -> Result<Option<Value>> {
        let items = self.accessor.get(owner);
        let mut values = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            cx.diagnostics().enter_index(index);
            let outcome = C::encode(item, cx);
            let outcome = cx.diagnostics().absorb(outcome);
            cx.diagnostics().leave();

            if let Some(value) = outcome? {
                values.push(value);
            }
        }

        let collapse_single = cx.settings().should_collapse_single_item_collections();
        Ok(collapse(values, collapse_single))
    }

    fn read_json(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        wire: &Value,
        cx: &mut JsonDeserializer<'_>,
    ) -> Result<()> {
        let elements = expand(wire);
        if !wire.is_array() {
            trace!("`{}` holds a bare value, reading it as one element", meta.wire_key);
        }

        let decoded = decode_each(
            elements.len(),
            JsonDeserializer::diagnostics,
            cx,
            |index, cx| C::decode_json(&elements[index], meta, cx),
        )?;

        *self.accessor.get_mut(owner) = decoded.unwrap_or_default();
        Ok(())
    }

    fn read_xml(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        hits: &[Hit<'_>],
        cx: &mut XmlDeserializer<'_>,
    ) -> Result<()> {
        let decoded = decode_each(
            hits.len(),
            XmlDeserializer::diagnostics,
            cx,
            |index, cx| C::decode_xml(&hits[index], meta, cx),
        )?;

        *self.accessor.get_mut(owner) = decoded.unwrap_or_default();
        Ok(())
    }

    fn check(&self, meta: &FieldMeta) -> std::result::Result<(), String> {
        C::check(meta)
    }

    fn validate_target(&self, reachable: &mut Reachable) -> Result<()> {
        C::validate_target(reachable)
    }
}

pub(crate) struct FlexibleSlot<T, C: Codec> {
    accessor: Accessor<T, OneOrMany<C::Item>>,
    codec: PhantomData<fn() -> C>,
}

impl<T, C: Codec> FlexibleSlot<T, C> {
    pub(crate) fn new(accessor: Accessor<T, OneOrMany<C::Item>>) -> Self {
        FlexibleSlot {
            accessor,
            codec: PhantomData,
        }
    }
}

impl<T: 'static, C: Codec> FieldAccess<T> for FlexibleSlot<T, C> {
    fn is_empty(&self, owner: &T) -> bool {
        self.accessor.get(owner).is_empty()
    }

    /// Mirrors the in-memory shape; a one-item `Many` stays a list.
    ///
    /// Elements that fail to encode are reported and left out.
    fn write_json(&self, owner: &T, cx: &mut JsonSerializer<'_>) -> Result<Option<Value>> {
        match self.accessor.get(owner) {
            OneOrMany::One(item) => C::encode(item, cx).map(Some),
            OneOrMany::Many(items) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    cx.diagnostics().enter_index(index);
                    let outcome = C::encode(item, cx);
                    let outcome = cx.diagnostics().absorb(outcome);
                    cx.diagnostics().leave();

                    if let Some(value) = outcome? {
                        values.push(value);
                    }
                }

                if values.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::Array(values)))
                }
            }
        }
    }

    fn read_json(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        wire: &Value,
        cx: &mut JsonDeserializer<'_>,
    ) -> Result<()> {
        let value = match wire {
            Value::Array(elements) => {
                let decoded = decode_each(
                    elements.len(),
                    JsonDeserializer::diagnostics,
                    cx,
                    |index, cx| C::decode_json(&elements[index], meta, cx),
                )?;
                OneOrMany::Many(decoded.unwrap_or_default())
            }
            single => OneOrMany::One(C::decode_json(single, meta, cx)?),
        };

        *self.accessor.get_mut(owner) = value;
        Ok(())
    }

    fn read_xml(
        &self,
        owner: &mut T,
        meta: &FieldMeta,
        hits: &[Hit<'_>],
        cx: &mut XmlDeserializer<'_>,
    ) -> Result<()> {
        let value = match hits {
            [single] => OneOrMany::One(C::decode_xml(single, meta, cx)?),
            _ => {
                let decoded = decode_each(
                    hits.len(),
                    XmlDeserializer::diagnostics,
                    cx,
                    |index, cx| C::decode_xml(&hits[index], meta, cx),
                )?;
                OneOrMany::Many(decoded.unwrap_or_default())
            }
        };

        *self.accessor.get_mut(owner) = value;
        Ok(())
    }

    fn check(&self, meta: &FieldMeta) -> std::result::Result<(), String> {
        C::check(meta)
    }

    fn validate_target(&self, reachable: &mut Reachable) -> Result<()> {
        C::validate_target(reachable)
    }
}
