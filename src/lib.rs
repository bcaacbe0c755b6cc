//! # pathedit
//!
//! Copy-on-write editing of nested values addressed by path strings.
//!
//! An [`Editor`] wraps a root [`Value`] and exposes `get`, `set`, `merge` and `delete`
//! at paths such as `a.b[0].c`. Edits never touch the wrapped value: each one returns
//! a new `Editor` whose root shares every subtree that was not on the edited path.
//!
//! ## Features
//!
//! - **Dotted and bracketed paths:** `a.b[0].c`, `a[b].c` and `a.b.0.c` all address the same location.
//! - **Structural sharing:** only the containers between the root and the target are copied.
//! - **Auto-vivification:** writes create missing intermediates, choosing a list when the next segment is an index (see [`Policy`]).
//! - **Strict mode:** alternatively, refuse to write through paths that do not exist yet.
//!
//! ## Examples
//!
//! ### Basic usage:
//!
//! ```rust
//! use pathedit::{Editor, Value};
//! use serde_json::json;
//!
//! let editor = Editor::new(Value::from(json!({"a": {"b": [1, 2, 3]}, "other": {"x": 1}})));
//! let updated = editor.set("a.b[1]", 9i64).unwrap();
//!
//! assert_eq!(updated.get("a.b").unwrap(), Some(&Value::from(json!([1, 9, 3]))));
//! // The original is unchanged
//! assert_eq!(editor.get("a.b").unwrap(), Some(&Value::from(json!([1, 2, 3]))));
//! // and untouched subtrees are shared
//! assert!(editor.get("other").unwrap().unwrap().same(updated.get("other").unwrap().unwrap()));
//! ```
//!
//! ### Creating intermediate containers
//!
//! ```rust
//! use pathedit::{Editor, Value};
//! use serde_json::json;
//!
//! let editor = Editor::new(Value::Null)
//!     .set("servers[0].name", "alpha")
//!     .unwrap();
//!
//! assert_eq!(editor.root(), &Value::from(json!({"servers": [{"name": "alpha"}]})));
//! ```
//!
//! ### Strict mode
//!
//! ```rust
//! use pathedit::{EditError, Editor, EditorOptions, Value};
//! use serde_json::json;
//!
//! let editor = Editor::with_options(Value::from(json!({})), EditorOptions::strict());
//!
//! assert_eq!(
//!     editor.set("a.b.c", 1i64),
//!     Err(EditError::PathNotFound("a".to_string()))
//! );
//! ```

mod manipulators;
mod parse;
mod types;

pub use manipulators::{clone_deep, is_container, looks_like_index, MAX_LIST_GAP};
pub use parse::parse_path;
pub use types::{EditError, Editor, EditorOptions, Map, Path, Policy, Value};
