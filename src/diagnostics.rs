//! Field-level anomaly log.
//!
//! Walkers keep the current wire path here while they descend, so that a
//! failure deep inside a graph can be recorded as `$.metadata.imprint[1].name`
//! without aborting the surrounding instance.

use crate::err::{FieldIssue, MappingError, Result};

use log::warn;
use std::fmt::Write;

#[derive(Debug, Clone, Copy)]
enum Segment {
    Key(&'static str),
    Index(usize),
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    path: Vec<Segment>,
    issues: Vec<FieldIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// The wire path of the value currently being mapped.
    pub fn path(&self) -> String {
        let mut rendered = String::from("$");
        for segment in &self.path {
            // Writing into a `String` cannot fail.
            let _ = match segment {
                Segment::Key(key) => write!(rendered, ".{}", key),
                Segment::Index(index) => write!(rendered, "[{}]", index),
            };
        }
        rendered
    }

    /// Records a non-fatal error against the current path.
    pub fn report(&mut self, error: MappingError) {
        let path = self.path();
        warn!("{}: {}", path, error);
        self.issues.push(FieldIssue { path, error });
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }

    /// Records a field-level error at the current path; other errors are handed back.
    pub(crate) fn absorb<V>(&mut self, outcome: Result<V>) -> Result<Option<V>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_field_level() => {
                self.report(e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) fn enter_key(&mut self, key: &'static str) {
        self.path.push(Segment::Key(key));
    }

    pub(crate) fn enter_index(&mut self, index: usize) {
        self.path.push(Segment::Index(index));
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_path_tracks_keys_and_indices() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.enter_key("metadata");
        diagnostics.enter_key("imprint");
        diagnostics.enter_index(1);
        diagnostics.enter_key("name");
        assert_eq!(diagnostics.path(), "$.metadata.imprint[1].name");

        diagnostics.report(MappingError::coercion(PrimitiveKind::String, "number 3"));
        diagnostics.leave();
        diagnostics.leave();
        assert_eq!(diagnostics.path(), "$.metadata.imprint");

        let issues = diagnostics.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "$.metadata.imprint[1].name");
    }
}
