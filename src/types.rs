use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;
use tracing::debug;

use crate::manipulators::{lookup, rewrite, Edit};
use crate::parse::parse_path;

/// Mapping from string keys to values, iterated in insertion order.
pub type Map = IndexMap<String, Value>;

/// A nested value.
///
/// Containers are reference counted, so cloning a `Value` is cheap and the clone
/// shares every subtree with the original. `PartialEq` compares structurally; use
/// [`Value::same`] when container identity matters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Rc<Vec<Value>>),
    Map(Rc<Map>),
}

impl Value {
    /// Builds a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    /// Builds a mapping value.
    pub fn map(entries: Map) -> Self {
        Value::Map(Rc::new(entries))
    }

    /// Returns `true` for lists and mappings.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The equality used to decide whether a write would change anything.
    ///
    /// Primitives compare by value, containers by identity: two structurally equal
    /// but separately allocated maps are not the same.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::List(_) | Value::Map(_), _) | (_, Value::List(_) | Value::Map(_)) => false,
            (a, b) => a == b,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => serde_json::Value::Array(
                items.iter().cloned().map(serde_json::Value::from).collect(),
            ),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no numeric representation and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        Value::map(entries)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A parsed path: the ordered key/index segments of a string such as `a.b[0].c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Path { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<String> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A path made only of separators has no segments and addresses the root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders the first `len` segments, as reported in [`EditError::PathNotFound`].
    pub fn prefix(&self, len: usize) -> String {
        let len = len.min(self.segments.len());
        self.segments[..len].join(".")
    }
}

impl FromStr for Path {
    type Err = EditError;

    /// Parses a path string.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pathedit::Path;
    ///
    /// let path = "a.b[0].c".parse::<Path>().unwrap();
    /// assert_eq!(path.segments(), ["a", "b", "0", "c"]);
    /// ```
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_path(input)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix(self.segments.len()))
    }
}

/// What a write does when a segment along the path is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Create missing or primitive intermediates: a list when the following segment
    /// looks like an index, a mapping otherwise. Deleting a missing path does nothing.
    #[default]
    Vivify,
    /// Every segment, the last one included, must already exist.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub policy: Policy,
}

impl EditorOptions {
    pub fn strict() -> Self {
        EditorOptions {
            policy: Policy::Strict,
        }
    }
}

/// An immutable view over a root value.
///
/// Every edit returns a new `Editor`; the receiver and the value it wraps are
/// never modified. Containers along the edited path are shallow-copied, every
/// other subtree is shared with the previous root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Editor {
    root: Value,
    options: EditorOptions,
}

impl Editor {
    /// Wraps `root` without copying it.
    pub fn new(root: impl Into<Value>) -> Self {
        Self::with_options(root, EditorOptions::default())
    }

    pub fn with_options(root: impl Into<Value>, options: EditorOptions) -> Self {
        Editor {
            root: root.into(),
            options,
        }
    }

    pub fn options(&self) -> EditorOptions {
        self.options
    }

    /// The wrapped root. This is the pathless form of [`Editor::get`].
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    /// Returns the value at `path`, or `None` when any segment is missing.
    ///
    /// Nothing is copied; the result borrows from the root.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pathedit::{Editor, Value};
    /// use serde_json::json;
    ///
    /// let editor = Editor::new(Value::from(json!({"a": {"b": [1, 2, 3]}})));
    /// assert_eq!(editor.get("a.b[2]").unwrap(), Some(&Value::from(3i64)));
    /// assert_eq!(editor.get("a.b[7]").unwrap(), None);
    /// ```
    pub fn get(&self, path: &str) -> Result<Option<&Value>, EditError> {
        let path = parse_path(path)?;
        Ok(lookup(&self.root, path.segments()))
    }

    /// Returns a new editor with `value` stored at `path`.
    ///
    /// If the current value at `path` is already [`Value::same`] as `value`, the
    /// write is skipped, but the containers on the path are still copied.
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<Editor, EditError> {
        let path = parse_path(path)?;
        debug!(path = %path, "set");
        self.apply(&path, &Edit::Set(value.into()))
    }

    /// Returns a new editor with the entry at `path` removed.
    ///
    /// Removing a list element shifts the following elements down by one.
    pub fn delete(&self, path: &str) -> Result<Editor, EditError> {
        let path = parse_path(path)?;
        debug!(path = %path, "delete");
        self.apply(&path, &Edit::Delete)
    }

    /// Returns a new editor where the mapping at `path` is shallow-merged with `value`.
    ///
    /// Keys of `value` win on collision. A missing or non-mapping target is treated
    /// as an empty mapping.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pathedit::{Editor, Value};
    /// use serde_json::json;
    ///
    /// let editor = Editor::new(Value::from(json!({"a": {"x": 1, "y": 2}})));
    /// let merged = editor.merge("a", Value::from(json!({"y": 3, "z": 4}))).unwrap();
    /// assert_eq!(
    ///     merged.get("a").unwrap(),
    ///     Some(&Value::from(json!({"x": 1, "y": 3, "z": 4})))
    /// );
    /// ```
    pub fn merge(&self, path: &str, value: impl Into<Value>) -> Result<Editor, EditError> {
        let path = parse_path(path)?;
        let Value::Map(entries) = value.into() else {
            return Err(EditError::InvalidMergeValue);
        };
        debug!(path = %path, keys = entries.len(), "merge");
        self.apply(&path, &Edit::Merge(entries))
    }

    fn apply(&self, path: &Path, edit: &Edit) -> Result<Editor, EditError> {
        let root = rewrite(&self.root, path, edit, self.options.policy)?;
        Ok(Editor {
            root,
            options: self.options,
        })
    }
}

impl From<Value> for Editor {
    fn from(root: Value) -> Self {
        Editor::new(root)
    }
}

/// Why a path could not be read or edited. The editor is left unchanged.
#[derive(Error, Debug, PartialEq)]
pub enum EditError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Path '{0}' does not exist")]
    PathNotFound(String),
    #[error("Value must be an object")]
    InvalidMergeValue,
    #[error("Segment '{segment}' of '{path}' is not a list index")]
    InvalidIndex { path: String, segment: String },
    #[error("Index {index} of '{path}' is too far past the end of a list of length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}
