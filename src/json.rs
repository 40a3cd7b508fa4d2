//! Descriptor-driven walker between model instances and `serde_json` values.

use crate::coerce::describe_json;
use crate::descriptor::{Model, TypeDescriptor};
use crate::diagnostics::Diagnostics;
use crate::err::{MappingError, Result};
use crate::mapper::MapperSettings;

use log::{Level, log_enabled, trace};
use serde_json::{Map, Value};

pub(crate) struct JsonSerializer<'s> {
    settings: &'s MapperSettings,
    depth: usize,
    diagnostics: Diagnostics,
}

impl<'s> JsonSerializer<'s> {
    pub(crate) fn new(settings: &'s MapperSettings) -> Self {
        JsonSerializer {
            settings,
            depth: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    pub(crate) fn settings(&self) -> &'s MapperSettings {
        self.settings
    }

    pub(crate) fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Emits the fields of `instance` in declaration order, skipping absent ones.
    pub(crate) fn serialize_object<M: Model>(&mut self, instance: &M) -> Result<Value> {
        let descriptor = M::descriptor();
        if self.depth >= self.settings.get_max_depth() {
            return Err(MappingError::DepthLimitExceeded {
                max_depth: self.settings.get_max_depth(),
            });
        }

        self.depth += 1;
        let mut map = Map::new();
        let result = self.write_fields(descriptor, instance, &mut map);
        self.depth -= 1;

        result.map(|_| Value::Object(map))
    }

    fn write_fields<M: Model>(
        &mut self,
        descriptor: &TypeDescriptor<M>,
        instance: &M,
        map: &mut Map<String, Value>,
    ) -> Result<()> {
        for field in descriptor.fields() {
            let key = field.meta().wire_key;
            self.diagnostics.enter_key(key);
            let outcome = field.access.write_json(instance, self);
            let outcome = self.diagnostics.absorb(outcome);
            self.diagnostics.leave();

            if let Some(Some(value)) = outcome? {
                map.insert(key.to_owned(), value);
            }
        }
        Ok(())
    }
}

pub(crate) struct JsonDeserializer<'s> {
    settings: &'s MapperSettings,
    depth: usize,
    diagnostics: Diagnostics,
}

impl<'s> JsonDeserializer<'s> {
    pub(crate) fn new(settings: &'s MapperSettings) -> Self {
        JsonDeserializer {
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

    /// Entry point for a document root, which must be a JSON object.
    pub(crate) fn deserialize_root<M: Model>(&mut self, wire: &Value) -> Result<M> {
        match wire {
            Value::Object(map) => self.deserialize_object(map),
            other => Err(MappingError::MalformedInput {
                type_name: M::descriptor().name(),
                expected: "a JSON object",
                found: describe_json(other),
            }),
        }
    }

    pub(crate) fn deserialize_object<M: Model>(&mut self, map: &Map<String, Value>) -> Result<M> {
        let descriptor = M::descriptor();
        if self.depth >= self.settings.get_max_depth() {
            return Err(MappingError::DepthLimitExceeded {
                max_depth: self.settings.get_max_depth(),
            });
        }

        if log_enabled!(Level::Trace) {
            for key in map.keys() {
                if descriptor.field_by_key(key).is_none() {
                    trace!("ignoring unknown key `{}` of `{}`", key, descriptor.name());
                }
            }
        }

        self.depth += 1;
        let mut instance = M::default();
        let result = self.read_fields(descriptor, &mut instance, map);
        self.depth -= 1;
        result?;

        descriptor.finish(&mut instance, &mut self.diagnostics);
        Ok(instance)
    }

    fn read_fields<M: Model>(
        &mut self,
        descriptor: &TypeDescriptor<M>,
        instance: &mut M,
        map: &Map<String, Value>,
    ) -> Result<()> {
        for field in descriptor.fields() {
            let meta = field.meta();
            let wire = match map.get(meta.wire_key) {
                None | Some(Value::Null) => continue,
                Some(wire) => wire,
            };

            self.diagnostics.enter_key(meta.wire_key);
            let outcome = field.access.read_json(instance, meta, wire, self);
            let outcome = self.diagnostics.absorb(outcome);
            self.diagnostics.leave();
            outcome?;
        }
        Ok(())
    }

    /// Builds an `M` whose only populated field is `key`, set from a bare primitive.
    pub(crate) fn project<M: Model>(&mut self, key: &'static str, wire: &Value) -> Result<M> {
        let descriptor = M::descriptor();
        let field = descriptor
            .field_by_key(key)
            .ok_or_else(|| MappingError::UnknownType {
                type_name: descriptor.name(),
                reason: format!("no field `{}` to project into", key),
            })?;

        trace!(
            "projecting {} into `{}.{}`",
            describe_json(wire),
            descriptor.name(),
            key
        );

        let mut instance = M::default();
        field.access.read_json(&mut instance, field.meta(), wire, self)?;
        descriptor.finish(&mut instance, &mut self.diagnostics);
        Ok(instance)
    }
}
