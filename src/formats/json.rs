//! Canonical JSON rendering
//!
//! Compact output with a fixed key order per object:
//!
//! ```text
//! Rule    cookie, table, priority, meta, filters, actions
//! Field   k, v
//! Term    f, a (only with argument slots), k (only when labeled)
//! Group   group_id, type, meta (only when non-empty), buckets
//! Bucket  id, meta (only when non-empty), actions
//! ```
//!
//! Empty rule `meta`/`filters` render as `null`, while empty group and
//! bucket `meta` are left out entirely. Consumers rely on both shapes.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::ast::{Bucket, Field, Group, Rule, Term};
use crate::error::ParseError;

/// Render any parsed tree as compact JSON.
pub fn to_string<T: Serialize>(value: &T) -> Result<String, ParseError> {
    serde_json::to_string(value).map_err(|err| ParseError::Render(err.to_string()))
}

fn null_if_empty(fields: &[Field]) -> Option<&[Field]> {
    (!fields.is_empty()).then_some(fields)
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rule", 6)?;
        state.serialize_field("cookie", &self.cookie)?;
        state.serialize_field("table", &self.table)?;
        state.serialize_field("priority", &self.priority)?;
        state.serialize_field("meta", &null_if_empty(&self.meta))?;
        state.serialize_field("filters", &null_if_empty(&self.filters))?;
        state.serialize_field("actions", &self.actions)?;
        state.end()
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Field", 2)?;
        state.serialize_field("k", &self.key)?;
        state.serialize_field("v", &self.value)?;
        state.end()
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let args = self.args();
        let len = 1 + usize::from(!args.is_empty()) + usize::from(self.label.is_some());

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("f", self.name())?;
        if !args.is_empty() {
            map.serialize_entry("a", args)?;
        }
        if let Some(label) = &self.label {
            map.serialize_entry("k", label)?;
        }
        map.end()
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Group", 4)?;
        state.serialize_field("group_id", &self.group_id)?;
        state.serialize_field("type", &self.group_type)?;
        if self.meta.is_empty() {
            state.skip_field("meta")?;
        } else {
            state.serialize_field("meta", &self.meta)?;
        }
        state.serialize_field("buckets", &self.buckets)?;
        state.end()
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Bucket", 3)?;
        state.serialize_field("id", &self.id)?;
        if self.meta.is_empty() {
            state.skip_field("meta")?;
        } else {
            state.serialize_field("meta", &self.meta)?;
        }
        state.serialize_field("actions", &self.actions)?;
        state.end()
    }
}
