//! Leaf value conversion between wire values and in-memory primitives.
//!
//! JSON decoding is strict: a wire value whose JSON type disagrees with the
//! declared primitive is a [`MappingError::Coercion`]. XML decoding is lexical,
//! since attribute values and text nodes only ever carry strings.

use crate::descriptor::{Cardinality, ElementKind, FieldMeta, Model, PrimitiveKind, Reachable};
use crate::err::{MappingError, Result};
use crate::json::{JsonDeserializer, JsonSerializer};
use crate::xml::selector::Hit;
use crate::xml::walker::XmlDeserializer;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use serde_json::{Number, Value};
use std::fmt::Debug;
use std::marker::PhantomData;

pub trait Primitive: Clone + PartialEq + Debug + Send + Sync + 'static {
    const KIND: PrimitiveKind;

    fn to_json(&self) -> Result<Value>;

    fn from_json(value: &Value) -> Result<Self>;

    fn from_text(text: &str) -> Result<Self>;
}

impl Primitive for String {
    const KIND: PrimitiveKind = PrimitiveKind::String;

    fn to_json(&self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(MappingError::coercion(Self::KIND, describe_json(other))),
        }
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(text.to_owned())
    }
}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Boolean;

    fn to_json(&self) -> Result<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| MappingError::coercion(Self::KIND, describe_json(value)))
    }

    fn from_text(text: &str) -> Result<Self> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(MappingError::coercion(Self::KIND, describe_text(other))),
        }
    }
}

macro_rules! impl_integer_primitive {
    ($ty: ty, $kind: expr, $as_wide: ident) => {
        impl Primitive for $ty {
            const KIND: PrimitiveKind = $kind;

            fn to_json(&self) -> Result<Value> {
                Ok(Value::from(*self))
            }

            fn from_json(value: &Value) -> Result<Self> {
                value
                    .$as_wide()
                    .and_then(|wide| <$ty>::try_from(wide).ok())
                    .ok_or_else(|| MappingError::coercion(Self::KIND, describe_json(value)))
            }

            fn from_text(text: &str) -> Result<Self> {
                text.trim()
                    .parse::<$ty>()
                    .map_err(|_| MappingError::coercion(Self::KIND, describe_text(text)))
            }
        }
    };
}

impl_integer_primitive!(i64, PrimitiveKind::Integer, as_i64);
impl_integer_primitive!(u32, PrimitiveKind::Unsigned, as_u64);
impl_integer_primitive!(u64, PrimitiveKind::Unsigned, as_u64);

impl Primitive for f64 {
    const KIND: PrimitiveKind = PrimitiveKind::Number;

    fn to_json(&self) -> Result<Value> {
        Number::from_f64(*self)
            .map(Value::Number)
            .ok_or_else(|| MappingError::coercion(Self::KIND, format!("non-finite number {}", self)))
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| MappingError::coercion(Self::KIND, describe_json(value)))
    }

    fn from_text(text: &str) -> Result<Self> {
        match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number),
            _ => Err(MappingError::coercion(Self::KIND, describe_text(text))),
        }
    }
}

impl Primitive for Timestamp {
    const KIND: PrimitiveKind = PrimitiveKind::Timestamp;

    fn to_json(&self) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Self::from_text(s),
            other => Err(MappingError::coercion(Self::KIND, describe_json(other))),
        }
    }

    /// RFC 3339, or a civil date/datetime taken as UTC.
    fn from_text(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Ok(timestamp) = text.parse::<Timestamp>() {
            return Ok(timestamp);
        }

        let civil = text
            .parse::<DateTime>()
            .or_else(|_| text.parse::<Date>().map(|date| date.to_datetime(jiff::civil::time(0, 0, 0, 0))));

        civil
            .and_then(|datetime| datetime.to_zoned(TimeZone::UTC))
            .map(|zoned| zoned.timestamp())
            .map_err(|_| MappingError::coercion(Self::KIND, describe_text(text)))
    }
}

/// Short human description of a JSON value, used in diagnostics.
pub(crate) fn describe_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => describe_text(s),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".to_owned(),
    }
}

pub(crate) fn describe_text(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    if text.chars().count() > MAX_CHARS {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("string {:?}...", head)
    } else {
        format!("string {:?}", text)
    }
}

/// Converts one element of a field between its wire form and memory.
pub(crate) trait Codec: 'static {
    type Item: Send + Sync + 'static;

    fn encode(item: &Self::Item, cx: &mut JsonSerializer<'_>) -> Result<Value>;

    fn decode_json(
        wire: &Value,
        meta: &FieldMeta,
        cx: &mut JsonDeserializer<'_>,
    ) -> Result<Self::Item>;

    fn decode_xml(
        hit: &Hit<'_>,
        meta: &FieldMeta,
        cx: &mut XmlDeserializer<'_>,
    ) -> Result<Self::Item>;

    /// Checks the parts of `meta` that refer to other descriptors.
    fn check(meta: &FieldMeta) -> std::result::Result<(), String>;

    fn validate_target(_reachable: &mut Reachable) -> Result<()> {
        Ok(())
    }
}

pub(crate) struct PrimitiveCodec<P>(PhantomData<fn() -> P>);

impl<P: Primitive> Codec for PrimitiveCodec<P> {
    type Item = P;

    fn encode(item: &P, _cx: &mut JsonSerializer<'_>) -> Result<Value> {
        item.to_json()
    }

    fn decode_json(wire: &Value, _meta: &FieldMeta, _cx: &mut JsonDeserializer<'_>) -> Result<P> {
        P::from_json(wire)
    }

    fn decode_xml(hit: &Hit<'_>, _meta: &FieldMeta, cx: &mut XmlDeserializer<'_>) -> Result<P> {
        P::from_text(&cx.text_of(hit))
    }

    fn check(meta: &FieldMeta) -> std::result::Result<(), String> {
        match meta.projection {
            Some(projection) => Err(format!(
                "primitive field `{}` cannot project into `{}`",
                meta.wire_key, projection
            )),
            None => Ok(()),
        }
    }
}

pub(crate) struct ObjectCodec<M>(PhantomData<fn() -> M>);

impl<M: Model> ObjectCodec<M> {
    fn incompatible(found: String) -> MappingError {
        MappingError::IncompatibleShape {
            type_name: M::descriptor().name(),
            found,
        }
    }
}

impl<M: Model> Codec for ObjectCodec<M> {
    type Item = M;

    fn encode(item: &M, cx: &mut JsonSerializer<'_>) -> Result<Value> {
        cx.serialize_object(item)
    }

    fn decode_json(wire: &Value, meta: &FieldMeta, cx: &mut JsonDeserializer<'_>) -> Result<M> {
        match (wire, meta.projection) {
            (Value::Object(map), _) => cx.deserialize_object(map),
            (Value::Array(_) | Value::Null, _) | (_, None) => {
                Err(Self::incompatible(describe_json(wire)))
            }
            (primitive, Some(projection)) => cx.project(projection, primitive),
        }
    }

    fn decode_xml(hit: &Hit<'_>, meta: &FieldMeta, cx: &mut XmlDeserializer<'_>) -> Result<M> {
        match (hit, meta.projection) {
            (Hit::Element(element), _) => cx.deserialize_element(element),
            (text, Some(projection)) => cx.project(projection, text),
            (Hit::Attribute(text), None) => Err(Self::incompatible(describe_text(text))),
            (Hit::Text(text), None) => Err(Self::incompatible(describe_text(text))),
        }
    }

    fn check(meta: &FieldMeta) -> std::result::Result<(), String> {
        let Some(projection) = meta.projection else {
            return Ok(());
        };

        let target = M::descriptor();
        match target.field_by_key(projection).map(|field| field.meta()) {
            Some(FieldMeta {
                cardinality: Cardinality::Scalar,
                element: ElementKind::Primitive(_),
                ..
            }) => Ok(()),
            Some(_) => Err(format!(
                "projection `{}` of `{}` is not a scalar primitive field",
                projection,
                target.name()
            )),
            None => Err(format!(
                "`{}` has no field `{}` to project into",
                target.name(),
                projection
            )),
        }
    }

    fn validate_target(reachable: &mut Reachable) -> Result<()> {
        M::descriptor().validate(reachable)
    }
}
