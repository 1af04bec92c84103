//! Defines the [`Node`] type and its append-only field bag ([`Fields`]).
//! Nodes are created by the host's ingestion step and then annotated by
//! callbacks such as [`crate::assign::on_create_node`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The type tag of nodes backed directly by a source file.
pub const FILE_TYPE: &str = "File";

/// Uniquely identifies a [`Node`] within a store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> NodeId {
        NodeId(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> NodeId {
        NodeId::new(id)
    }
}

/// Bookkeeping owned by the host rather than by any callback.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Internal {
    /// The type discriminator, e.g. `File` or `MarkdownRemark`.
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A unit of ingested content.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,

    /// The node this one was derived from. A markdown node's parent is the
    /// [`FILE_TYPE`] node holding its source.
    pub parent: Option<NodeId>,

    pub internal: Internal,

    /// For file nodes, the `/`-separated path of the file relative to the
    /// source root (e.g. `posts/2023/hello.md`).
    pub relative_path: Option<String>,

    /// Derived fields attached after creation.
    pub fields: Fields,
}

impl Node {
    /// Creates a file node for a source file at `relative_path`.
    pub fn file(id: impl Into<NodeId>, relative_path: impl Into<String>) -> Node {
        Node {
            id: id.into(),
            parent: None,
            internal: Internal {
                type_name: FILE_TYPE.to_owned(),
            },
            relative_path: Some(relative_path.into()),
            fields: Fields::default(),
        }
    }

    /// Creates a node of type `type_name` derived from `parent`.
    pub fn child(
        id: impl Into<NodeId>,
        type_name: impl Into<String>,
        parent: impl Into<NodeId>,
    ) -> Node {
        Node {
            id: id.into(),
            parent: Some(parent.into()),
            internal: Internal {
                type_name: type_name.into(),
            },
            relative_path: None,
            fields: Fields::default(),
        }
    }

    pub fn is_type(&self, type_name: &str) -> bool {
        self.internal.type_name == type_name
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> NodeId {
        NodeId(id)
    }
}

/// The mutable field bag of a [`Node`]. Fields can be added but never
/// replaced or removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Adds `name` to the bag. Fails without modifying the bag if the field
    /// is already present.
    pub fn insert(&mut self, name: &str, value: Value) -> Result<(), FieldError> {
        if self.0.contains_key(name) {
            return Err(FieldError::AlreadySet(name.to_owned()));
        }
        self.0.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Represents an attempt to modify an existing field.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    /// Returned when the field already holds a value.
    #[error("field `{0}` is already set")]
    AlreadySet(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_append_only() -> Result<(), FieldError> {
        let mut fields = Fields::default();
        fields.insert("slug", json!("/posts/a/"))?;
        assert_eq!(
            Err(FieldError::AlreadySet("slug".to_owned())),
            fields.insert("slug", json!("/posts/b/")),
        );
        assert_eq!(Some(&json!("/posts/a/")), fields.get("slug"));
        assert_eq!(1, fields.len());
        Ok(())
    }

    #[test]
    fn test_child_node() {
        let node = Node::child("md", "MarkdownRemark", "file");
        assert!(node.is_type("MarkdownRemark"));
        assert_eq!(Some(NodeId::new("file")), node.parent);
        assert!(node.relative_path.is_none());
        assert!(node.fields.is_empty());
    }
}
