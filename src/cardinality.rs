//! Wire shape of multi-valued fields.
//!
//! A collection with exactly one element travels as the bare element; an
//! empty collection does not travel at all. On the way in, a bare value is a
//! one-element collection.

use serde_json::Value;
use std::slice;

/// Builds the wire value of a collection field, or `None` when it has no elements.
pub fn collapse(mut values: Vec<Value>, collapse_single: bool) -> Option<Value> {
    match values.len() {
        0 => None,
        1 if collapse_single => values.pop(),
        _ => Some(Value::Array(values)),
    }
}

/// The elements a wire value contributes to a collection field.
pub fn expand(wire: &Value) -> &[Value] {
    match wire {
        Value::Array(items) => items,
        Value::Null => &[],
        other => slice::from_ref(other),
    }
}

/// A value that is either a single item or a list, kept in whichever shape it
/// was given.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T: PartialEq> OneOrMany<T> {
    /// Adds `value` unless it is already present.
    ///
    /// An empty value becomes `One`, `One` becomes a two-item `Many`.
    pub fn push(&mut self, value: T) {
        if self.contains(&value) {
            return;
        }

        match self {
            OneOrMany::One(_) => {
                if let OneOrMany::One(first) = std::mem::take(self) {
                    *self = OneOrMany::Many(vec![first, value]);
                }
            }
            OneOrMany::Many(items) if !items.is_empty() => items.push(value),
            OneOrMany::Many(_) => *self = OneOrMany::One(value),
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }
}

impl<T> OneOrMany<T> {
    /// Turns a one-item `Many` into `One`.
    pub fn collapse(&mut self) {
        if let OneOrMany::Many(items) = self {
            if items.len() == 1 {
                if let Some(only) = items.pop() {
                    *self = OneOrMany::One(only);
                }
            }
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => slice::from_ref(value),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T: PartialEq> Extend<T> for OneOrMany<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
