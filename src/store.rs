//! An in-memory node store. It plays the host's part: nodes are created into
//! it, field actions are applied to it, and it answers [`Query`]s.

use crate::actions::Action;
use crate::node::{FieldError, Node, NodeId};
use crate::query::{Query, QueryError, QueryHandle, QueryResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Resolves nodes by id.
pub trait NodeLookup {
    fn get_node(&self, id: &NodeId) -> Option<&Node>;

    /// The number of nodes that can be resolved.
    fn len(&self) -> usize;
}

/// Holds nodes in creation order. Query results follow that order.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl NodeStore {
    pub fn new() -> NodeStore {
        NodeStore::default()
    }

    /// Adds `node` to the store. A node's parent, if any, must already be
    /// present.
    pub fn create_node(&mut self, node: Node) -> Result<&Node> {
        if self.index.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        if let Some(parent) = &node.parent {
            if !self.index.contains_key(parent) {
                return Err(Error::UnknownParent {
                    node: node.id,
                    parent: parent.clone(),
                });
            }
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Applies a field action. Page actions aren't about nodes and are
    /// ignored.
    pub fn apply(&mut self, action: &Action) -> Result<()> {
        if let Action::CreateNodeField { node, name, value } = action {
            let i = *self
                .index
                .get(node)
                .ok_or_else(|| Error::UnknownNode(node.clone()))?;
            self.nodes[i]
                .fields
                .insert(name, value.clone())
                .map_err(|err| Error::Field {
                    node: node.clone(),
                    err,
                })?;
        }
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

impl NodeLookup for NodeStore {
    fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl QueryHandle for NodeStore {
    fn query(&self, query: &Query) -> QueryResult {
        if query.projection.is_empty() {
            return QueryResult {
                nodes: Vec::new(),
                errors: vec![QueryError::new(format!(
                    "Field \"node\" of \"{}\" must have a selection of subfields.",
                    query.connection()
                ))],
            };
        }

        let mut result = QueryResult::default();
        for node in self.nodes.iter().filter(|n| n.is_type(&query.type_name)) {
            match serde_json::to_value(node) {
                Ok(value) => result.nodes.push(project(&value, &query.projection)),
                Err(err) => result.errors.push(QueryError::new(format!(
                    "serializing node `{}`: {}",
                    node.id, err
                ))),
            }
        }
        result
    }
}

// Picks the value at `path` out of `value`, keeping the nesting. Missing
// fields resolve to null.
fn project(value: &Value, path: &[String]) -> Value {
    match path.split_first() {
        None => value.clone(),
        Some((head, rest)) => {
            let inner = value.get(head.as_str()).unwrap_or(&Value::Null);
            let mut object = Map::new();
            object.insert(
                head.clone(),
                match (inner, rest.is_empty()) {
                    (Value::Null, false) => Value::Null,
                    _ => project(inner, rest),
                },
            );
            Value::Object(object)
        }
    }
}

/// The result of a store operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error creating or annotating nodes.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Returned when a node id is reused.
    #[error("node `{0}` already exists")]
    DuplicateNode(NodeId),

    /// Returned when a node names a parent that hasn't been created.
    #[error("node `{node}` refers to unknown parent `{parent}`")]
    UnknownParent { node: NodeId, parent: NodeId },

    /// Returned when an action targets a node the store doesn't hold.
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),

    /// Returned when a field action would overwrite an existing field.
    #[error("setting field on node `{node}`: {err}")]
    Field { node: NodeId, err: FieldError },
}
