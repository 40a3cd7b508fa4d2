//! Static mapping metadata for model types.
//!
//! Every model type owns exactly one [`TypeDescriptor`], built once in a
//! `LazyLock` and never mutated afterwards. A descriptor is an ordered list of
//! [`FieldDescriptor`]s; each one pairs the plain mapping record
//! ([`FieldMeta`]: wire key, cardinality, element kind, projection, XML
//! selector) with a typed accessor into the owning struct.
//!
//! [`describe`] validates the descriptors reachable from a root type before
//! any walker touches them. Everything a descriptor refers to by name (a
//! projection field, a namespace prefix) is checked there, so walkers can
//! assume a consistent table.

use crate::cardinality::OneOrMany;
use crate::coerce::{ObjectCodec, Primitive, PrimitiveCodec};
use crate::diagnostics::Diagnostics;
use crate::err::{MappingError, Result};
use crate::slot::{CollectionSlot, FieldAccess, FlexibleSlot, ScalarSlot};
use crate::xml::node::QualifiedName;
use crate::xml::selector::Selector;

use ahash::RandomState;
use hashbrown::HashMap as FastMap;
use log::trace;
use std::any::TypeId;
use std::fmt;
use std::sync::OnceLock;

/// A type that can be walked by the JSON and XML mappers.
pub trait Model: Default + Send + Sync + 'static {
    fn descriptor() -> &'static TypeDescriptor<Self>;

    /// Runs once per instance, after all of its fields are populated.
    fn on_deserialized(&mut self, _diagnostics: &mut Diagnostics) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Scalar,
    /// Logically multi-valued, even when the wire carries a bare value.
    Collection,
    /// Scalar or collection in memory, mirrored as-is on the wire.
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Integer,
    Unsigned,
    Number,
    Timestamp,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Unsigned => "unsigned integer",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Primitive(PrimitiveKind),
    Object { type_name: &'static str },
}

/// The data half of a field descriptor.
#[derive(Debug, Clone)]
pub struct FieldMeta {
    pub wire_key: &'static str,
    pub cardinality: Cardinality,
    pub element: ElementKind,
    /// Field of the target type that receives a bare primitive.
    pub projection: Option<&'static str>,
    /// Namespace-qualified path used by the XML walker.
    pub selector: Option<&'static str>,
    pub required: bool,
}

/// Typed getters for one field of `T`, holding a value of type `F`.
pub struct Accessor<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Accessor<T, F> {
    pub fn new(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Accessor { get, get_mut }
    }

    pub fn get<'a>(&self, owner: &'a T) -> &'a F {
        (self.get)(owner)
    }

    pub fn get_mut<'a>(&self, owner: &'a mut T) -> &'a mut F {
        (self.get_mut)(owner)
    }
}

impl<T, F> Clone for Accessor<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for Accessor<T, F> {}

pub struct FieldDescriptor<T> {
    meta: FieldMeta,
    pub(crate) access: Box<dyn FieldAccess<T>>,
}

impl<T: Model> FieldDescriptor<T> {
    fn with_access(
        wire_key: &'static str,
        cardinality: Cardinality,
        element: ElementKind,
        access: Box<dyn FieldAccess<T>>,
    ) -> Self {
        FieldDescriptor {
            meta: FieldMeta {
                wire_key,
                cardinality,
                element,
                projection: None,
                selector: None,
                required: false,
            },
            access,
        }
    }

    /// An optional primitive value.
    pub fn scalar<P: Primitive>(wire_key: &'static str, accessor: Accessor<T, Option<P>>) -> Self {
        Self::with_access(
            wire_key,
            Cardinality::Scalar,
            ElementKind::Primitive(P::KIND),
            Box::new(ScalarSlot::<T, PrimitiveCodec<P>>::new(accessor)),
        )
    }

    /// A collection of primitives.
    pub fn list<P: Primitive>(wire_key: &'static str, accessor: Accessor<T, Vec<P>>) -> Self {
        Self::with_access(
            wire_key,
            Cardinality::Collection,
            ElementKind::Primitive(P::KIND),
            Box::new(CollectionSlot::<T, PrimitiveCodec<P>>::new(accessor)),
        )
    }

    /// A primitive that may hold one value or many.
    pub fn flexible<P: Primitive>(
        wire_key: &'static str,
        accessor: Accessor<T, OneOrMany<P>>,
    ) -> Self {
        Self::with_access(
            wire_key,
            Cardinality::Flexible,
            ElementKind::Primitive(P::KIND),
            Box::new(FlexibleSlot::<T, PrimitiveCodec<P>>::new(accessor)),
        )
    }

    /// An optional nested model.
    pub fn object<M: Model>(wire_key: &'static str, accessor: Accessor<T, Option<M>>) -> Self {
        Self::with_access(
            wire_key,
            Cardinality::Scalar,
            ElementKind::Object {
                type_name: short_type_name::<M>(),
            },
            Box::new(ScalarSlot::<T, ObjectCodec<M>>::new(accessor)),
        )
    }

    /// A collection of nested models.
    pub fn objects<M: Model>(wire_key: &'static str, accessor: Accessor<T, Vec<M>>) -> Self {
        Self::with_access(
            wire_key,
            Cardinality::Collection,
            ElementKind::Object {
                type_name: short_type_name::<M>(),
            },
            Box::new(CollectionSlot::<T, ObjectCodec<M>>::new(accessor)),
        )
    }

    /// A bare primitive on the wire becomes a target instance with `field` set.
    pub fn project(mut self, field: &'static str) -> Self {
        self.meta.projection = Some(field);
        self
    }

    pub fn select(mut self, selector: &'static str) -> Self {
        self.meta.selector = Some(selector);
        self
    }

    pub fn required(mut self) -> Self {
        self.meta.required = true;
        self
    }
}

impl<T> FieldDescriptor<T> {
    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Selectors resolved against the namespace table, aligned with the field list.
#[derive(Debug)]
pub(crate) struct XmlPlan {
    pub(crate) root: Option<QualifiedName<'static>>,
    pub(crate) selectors: Vec<Option<Selector>>,
}

pub struct TypeDescriptor<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    index: FastMap<&'static str, usize, RandomState>,
    namespaces: FastMap<&'static str, &'static str, RandomState>,
    root: Option<&'static str>,
    plan: OnceLock<std::result::Result<XmlPlan, String>>,
    validated: OnceLock<()>,
}

impl<T: Model> TypeDescriptor<T> {
    pub fn new(name: &'static str) -> Self {
        TypeDescriptor {
            name,
            fields: Vec::new(),
            index: FastMap::with_hasher(RandomState::new()),
            namespaces: FastMap::with_hasher(RandomState::new()),
            root: None,
            plan: OnceLock::new(),
            validated: OnceLock::new(),
        }
    }

    /// Declares a prefix usable in selectors. The empty prefix is the default namespace.
    pub fn namespace(mut self, prefix: &'static str, uri: &'static str) -> Self {
        self.namespaces.insert(prefix, uri);
        self
    }

    pub fn namespaces(mut self, table: &[(&'static str, &'static str)]) -> Self {
        self.namespaces.extend(table.iter().copied());
        self
    }

    /// The element a document must start with when this type is an XML root.
    pub fn root(mut self, selector: &'static str) -> Self {
        self.root = Some(selector);
        self
    }

    pub fn field(mut self, field: FieldDescriptor<T>) -> Self {
        self.index.insert(field.meta.wire_key, self.fields.len());
        self.fields.push(field);
        self
    }

    /// Checks this descriptor and walks into its targets. Nothing is marked
    /// valid here, see [`describe`].
    pub(crate) fn validate(&'static self, reachable: &mut Reachable) -> Result<()> {
        let id = TypeId::of::<T>();
        if self.validated.get().is_some() || reachable.seen.contains(&id) {
            return Ok(());
        }
        reachable.seen.push(id);

        self.plan()?;
        for field in &self.fields {
            field.access.validate_target(reachable)?;
        }

        trace!("descriptor for `{}` checked", self.name);
        reachable.passed.push(&self.validated);
        Ok(())
    }

    /// Runs the per-instance epilogue: required field checks, then the hook.
    pub(crate) fn finish(&self, instance: &mut T, diagnostics: &mut Diagnostics) {
        for field in &self.fields {
            if field.meta.required && field.access.is_empty(instance) {
                diagnostics.report(MappingError::MissingRequiredField {
                    type_name: self.name,
                    wire_key: field.meta.wire_key,
                });
            }
        }
        instance.on_deserialized(diagnostics);
    }
}

impl<T> TypeDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn field_by_key(&self, wire_key: &str) -> Option<&FieldDescriptor<T>> {
        self.index.get(wire_key).map(|&position| &self.fields[position])
    }

    pub fn namespace_uri(&self, prefix: &str) -> Option<&'static str> {
        self.namespaces.get(prefix).copied()
    }

    pub(crate) fn plan(&self) -> Result<&XmlPlan> {
        self.plan
            .get_or_init(|| self.compile())
            .as_ref()
            .map_err(|reason| MappingError::UnknownType {
                type_name: self.name,
                reason: reason.clone(),
            })
    }

    fn compile(&self) -> std::result::Result<XmlPlan, String> {
        let resolve = |prefix: &str| self.namespace_uri(prefix);

        let root = match self.root {
            Some(source) => Some(Selector::compile(source, resolve)?.as_root()?),
            None => None,
        };

        let mut selectors = Vec::with_capacity(self.fields.len());
        for (position, field) in self.fields.iter().enumerate() {
            if self.index.get(field.meta.wire_key) != Some(&position) {
                return Err(format!("wire key `{}` is declared twice", field.meta.wire_key));
            }
            field.access.check(&field.meta)?;
            let selector = match field.meta.selector {
                Some(source) => Some(Selector::compile(source, resolve)?),
                None => None,
            };
            selectors.push(selector);
        }

        Ok(XmlPlan { root, selectors })
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Descriptors visited by one [`describe`] call.
#[derive(Default)]
pub(crate) struct Reachable {
    seen: Vec<TypeId>,
    passed: Vec<&'static OnceLock<()>>,
}

/// Resolves and validates the descriptor of `T` and of every type reachable from it.
///
/// A type is remembered as valid only once its whole reachable graph passed,
/// so later calls are a lookup.
pub fn describe<T: Model>() -> Result<&'static TypeDescriptor<T>> {
    let descriptor = T::descriptor();
    let mut reachable = Reachable::default();
    descriptor.validate(&mut reachable)?;

    for validated in reachable.passed {
        let _ = validated.set(());
    }
    Ok(descriptor)
}

fn short_type_name<M>() -> &'static str {
    let full = std::any::type_name::<M>();
    full.rsplit("::").next().unwrap_or(full)
}
