use crate::descriptor::{Model, describe};
use crate::err::{FieldIssue, Result};
use crate::json::{JsonDeserializer, JsonSerializer};
use crate::xml::XmlElement;
use crate::xml::walker::XmlDeserializer;

use log::debug;
use serde_json::Value;

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperSettings {
    max_depth: usize,
    collapse_single_item_collections: bool,
    trim_xml_text: bool,
    indent: bool,
}

impl Default for MapperSettings {
    fn default() -> Self {
        MapperSettings {
            max_depth: DEFAULT_MAX_DEPTH,
            collapse_single_item_collections: true,
            trim_xml_text: true,
            indent: true,
        }
    }
}

impl MapperSettings {
    pub fn new() -> Self {
        MapperSettings::default()
    }

    /// Sets the deepest object nesting the walkers will follow.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// When false, one-element collections are written as one-element arrays.
    pub fn collapse_single_item_collections(mut self, collapse: bool) -> Self {
        self.collapse_single_item_collections = collapse;
        self
    }

    /// Trims element text. Attribute values are never trimmed.
    pub fn trim_xml_text(mut self, trim: bool) -> Self {
        self.trim_xml_text = trim;
        self
    }

    /// Controls pretty-printing in [`Mapper::to_string`].
    pub fn indent(mut self, pretty: bool) -> Self {
        self.indent = pretty;
        self
    }

    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn should_collapse_single_item_collections(&self) -> bool {
        self.collapse_single_item_collections
    }

    pub fn should_trim_xml_text(&self) -> bool {
        self.trim_xml_text
    }

    pub fn should_indent(&self) -> bool {
        self.indent
    }
}

/// A mapping result together with the field-level issues hit while producing it.
#[derive(Debug)]
pub struct Mapped<T> {
    pub value: T,
    pub issues: Vec<FieldIssue>,
}

impl<T> Mapped<T> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mapped<U> {
        Mapped {
            value: f(self.value),
            issues: self.issues,
        }
    }
}

/// Entry points of the engine.
///
/// ```
/// use pubwire::Mapper;
/// use pubwire::model::Publication;
///
/// let mapper = Mapper::new();
/// let mapped = mapper
///     .deserialize_str::<Publication>(r#"{"metadata": {"title": "Moby Dick"}}"#)
///     .unwrap();
/// assert!(mapped.is_clean());
///
/// let json = mapper.serialize(&mapped.value).unwrap().value;
/// assert_eq!(json["metadata"]["title"], "Moby Dick");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    settings: MapperSettings,
}

impl Mapper {
    pub fn new() -> Self {
        Mapper::default()
    }

    pub fn with_configuration(mut self, settings: MapperSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &MapperSettings {
        &self.settings
    }

    pub fn serialize<T: Model>(&self, instance: &T) -> Result<Mapped<Value>> {
        let descriptor = describe::<T>()?;
        debug!("serializing `{}`", descriptor.name());

        let mut serializer = JsonSerializer::new(&self.settings);
        let value = serializer.serialize_object(instance)?;
        Ok(Mapped {
            value,
            issues: serializer.into_diagnostics().into_issues(),
        })
    }

    /// Serializes every instance into one JSON array.
    pub fn serialize_all<T: Model>(&self, instances: &[T]) -> Result<Mapped<Value>> {
        let descriptor = describe::<T>()?;
        debug!("serializing {} `{}` instances", instances.len(), descriptor.name());

        let mut serializer = JsonSerializer::new(&self.settings);
        let mut values = Vec::with_capacity(instances.len());
        for (index, instance) in instances.iter().enumerate() {
            serializer.diagnostics().enter_index(index);
            let value = serializer.serialize_object(instance);
            serializer.diagnostics().leave();
            values.push(value?);
        }

        Ok(Mapped {
            value: Value::Array(values),
            issues: serializer.into_diagnostics().into_issues(),
        })
    }

    /// Serializes `instance` straight to text, honoring [`MapperSettings::indent`].
    pub fn to_string<T: Model>(&self, instance: &T) -> Result<Mapped<String>> {
        let mapped = self.serialize(instance)?;
        let text = if self.settings.should_indent() {
            serde_json::to_string_pretty(&mapped.value)?
        } else {
            serde_json::to_string(&mapped.value)?
        };
        Ok(Mapped {
            value: text,
            issues: mapped.issues,
        })
    }

    pub fn deserialize<T: Model>(&self, wire: &Value) -> Result<Mapped<T>> {
        let descriptor = describe::<T>()?;
        debug!("deserializing `{}` from JSON", descriptor.name());

        let mut deserializer = JsonDeserializer::new(&self.settings);
        let value = deserializer.deserialize_root(wire)?;
        Ok(Mapped {
            value,
            issues: deserializer.into_diagnostics().into_issues(),
        })
    }

    pub fn deserialize_str<T: Model>(&self, json: &str) -> Result<Mapped<T>> {
        let wire: Value = serde_json::from_str(json)?;
        self.deserialize(&wire)
    }

    pub fn deserialize_xml<T: Model>(&self, xml: &str) -> Result<Mapped<T>> {
        let root = XmlElement::parse(xml, &self.settings)?;
        self.deserialize_element(&root)
    }

    pub fn deserialize_element<T: Model>(&self, root: &XmlElement) -> Result<Mapped<T>> {
        let descriptor = describe::<T>()?;
        debug!("deserializing `{}` from <{}>", descriptor.name(), root.name());

        let mut deserializer = XmlDeserializer::new(&self.settings);
        let value = deserializer.deserialize_root(root)?;
        Ok(Mapped {
            value,
            issues: deserializer.into_diagnostics().into_issues(),
        })
    }
}
