use std::rc::Rc;

use tracing::trace;

use crate::types::{EditError, Map, Path, Policy, Value};

/// Returns `true` if `value` is a list or a mapping.
pub fn is_container(value: &Value) -> bool {
    value.is_container()
}

/// Returns `true` if `segment` can address a list element.
///
/// Decides whether an auto-created container is a list or a mapping.
pub fn looks_like_index(segment: &str) -> bool {
    index_of(segment).is_some()
}

/// Most `Null` slots a single list write may pad in front of the new element.
pub const MAX_LIST_GAP: usize = 1024;

/// Only canonical spellings are indices: `"01"` is a key, not element 1.
fn index_of(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

/// Recursively copies `value`.
///
/// Every list and mapping in the result is a fresh allocation; primitives are
/// copied as they are.
pub fn clone_deep(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::list(items.iter().map(clone_deep).collect()),
        Value::Map(entries) => Value::map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), clone_deep(v)))
                .collect(),
        ),
        primitive => primitive.clone(),
    }
}

/// Follows `segments` from `root`. Mapping keys are matched literally; list
/// segments must be indices.
pub(crate) fn lookup<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |current, key| match current {
        Value::Map(entries) => entries.get(key),
        Value::List(items) => index_of(key).and_then(|i| items.get(i)),
        _ => None,
    })
}

/// The terminal operation applied at the last segment.
#[derive(Debug)]
pub(crate) enum Edit {
    Set(Value),
    Merge(Rc<Map>),
    Delete,
}

/// Rebuilds the spine from `root` to the target of `path`, applying `edit` at the end.
///
/// Each container on the path is shallow-copied before it is modified, so `root`
/// itself is left untouched and siblings of the path are shared.
pub(crate) fn rewrite(
    root: &Value,
    path: &Path,
    edit: &Edit,
    policy: Policy,
) -> Result<Value, EditError> {
    if path.is_empty() {
        return Ok(root.clone());
    }
    Walk { path, edit, policy }.rewrite(root, 0)
}

#[derive(Debug, PartialEq)]
enum PutError {
    NotAnIndex,
    OutOfRange { index: usize, len: usize },
}

/// Owned shallow copy of a container on the edited spine.
enum Container {
    Map(Map),
    List(Vec<Value>),
}

impl Container {
    fn copy_of(value: &Value) -> Option<Self> {
        match value {
            Value::Map(entries) => Some(Container::Map(Map::clone(entries))),
            Value::List(items) => Some(Container::List(Vec::clone(items))),
            _ => None,
        }
    }

    /// An empty container suited to be indexed by `segment`.
    fn for_segment(segment: &str) -> Self {
        if looks_like_index(segment) {
            Container::List(Vec::new())
        } else {
            Container::Map(Map::new())
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Container::Map(entries) => entries.get(key),
            Container::List(items) => index_of(key).and_then(|i| items.get(i)),
        }
    }

    /// Stores `value` under `key`. Lists are padded with `Null` up to the index,
    /// by at most [`MAX_LIST_GAP`] slots.
    fn put(&mut self, key: &str, value: Value) -> Result<(), PutError> {
        match self {
            Container::Map(entries) => {
                entries.insert(key.to_string(), value);
            }
            Container::List(items) => {
                let index = index_of(key).ok_or(PutError::NotAnIndex)?;
                let len = items.len();
                let needed = index
                    .checked_add(1)
                    .filter(|&needed| needed <= len.saturating_add(MAX_LIST_GAP + 1))
                    .ok_or(PutError::OutOfRange { index, len })?;
                if needed > len {
                    items.resize(needed, Value::Null);
                }
                items[index] = value;
            }
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Container::Map(entries) => entries.shift_remove(key),
            Container::List(items) => match index_of(key) {
                Some(index) if index < items.len() => Some(items.remove(index)),
                _ => None,
            },
        }
    }

    fn into_value(self) -> Value {
        match self {
            Container::Map(entries) => Value::map(entries),
            Container::List(items) => Value::list(items),
        }
    }
}

struct Walk<'a> {
    path: &'a Path,
    edit: &'a Edit,
    policy: Policy,
}

impl Walk<'_> {
    fn rewrite(&self, node: &Value, depth: usize) -> Result<Value, EditError> {
        let segments = self.path.segments();
        let key = segments[depth].as_str();

        let mut container = match Container::copy_of(node) {
            Some(container) => container,
            None => match (self.policy, self.edit) {
                (Policy::Strict, _) => return Err(self.not_found(depth)),
                (Policy::Vivify, Edit::Delete) => return Ok(node.clone()),
                (Policy::Vivify, _) => {
                    trace!(path = %self.path.prefix(depth), segment = key, "creating container");
                    Container::for_segment(key)
                }
            },
        };

        if depth + 1 == segments.len() {
            self.apply(&mut container, depth)?;
            return Ok(container.into_value());
        }

        let child = match container.get(key) {
            Some(child) => child.clone(),
            None if self.policy == Policy::Strict => return Err(self.not_found(depth)),
            None if matches!(self.edit, Edit::Delete) => return Ok(container.into_value()),
            None => Value::Null,
        };
        let child = self.rewrite(&child, depth + 1)?;
        self.put(&mut container, depth, child)?;
        Ok(container.into_value())
    }

    fn apply(&self, container: &mut Container, depth: usize) -> Result<(), EditError> {
        let key = self.path.segments()[depth].as_str();
        let existing = container.get(key);
        if existing.is_none() && self.policy == Policy::Strict {
            return Err(self.not_found(depth));
        }

        match self.edit {
            Edit::Set(value) => {
                if existing.is_some_and(|current| current.same(value)) {
                    trace!(path = %self.path, "value unchanged, skipping write");
                    return Ok(());
                }
                self.put(container, depth, value.clone())
            }
            Edit::Merge(entries) => {
                let mut merged = existing
                    .and_then(Value::as_map)
                    .cloned()
                    .unwrap_or_default();
                for (k, v) in entries.iter() {
                    merged.insert(k.clone(), v.clone());
                }
                self.put(container, depth, Value::map(merged))
            }
            Edit::Delete => {
                container.remove(key);
                Ok(())
            }
        }
    }

    fn put(&self, container: &mut Container, depth: usize, value: Value) -> Result<(), EditError> {
        let key = self.path.segments()[depth].as_str();
        container.put(key, value).map_err(|err| match err {
            PutError::NotAnIndex => EditError::InvalidIndex {
                path: self.path.prefix(depth),
                segment: key.to_string(),
            },
            PutError::OutOfRange { index, len } => EditError::IndexOutOfRange {
                path: self.path.prefix(depth),
                index,
                len,
            },
        })
    }

    fn not_found(&self, depth: usize) -> EditError {
        EditError::PathNotFound(self.path.prefix(depth + 1))
    }
}
