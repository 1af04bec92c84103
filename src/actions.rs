//! The action-dispatch handle passed to callbacks. Callbacks never mutate the
//! host directly; they record [`Action`]s which the host applies afterwards.

use crate::node::{Node, NodeId};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

/// A declarative instruction to materialize one output page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageRequest {
    /// The output path of the page, e.g. `/posts/2023/hello/`.
    pub path: String,

    /// The template with which the page is rendered.
    pub component: PathBuf,

    /// Data made available to the template.
    pub context: Map<String, Value>,

    /// Asks the host to render the page outside the main build pass. Passed
    /// through as-is.
    pub defer: bool,
}

/// Something a callback asked the host to do.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateNodeField {
        node: NodeId,
        name: String,
        value: Value,
    },
    CreatePage(PageRequest),
}

/// Records [`Action`]s in dispatch order.
#[derive(Debug, Default)]
pub struct Actions {
    queue: Vec<Action>,
}

impl Actions {
    pub fn new() -> Actions {
        Actions::default()
    }

    /// Asks the host to add `name` to the field bag of `node`.
    pub fn create_node_field(&mut self, node: &Node, name: &str, value: Value) {
        debug!(node = %node.id, field = name, %value, "create node field");
        self.queue.push(Action::CreateNodeField {
            node: node.id.clone(),
            name: name.to_owned(),
            value,
        });
    }

    /// Asks the host to materialize a page.
    pub fn create_page(&mut self, page: PageRequest) {
        debug!(path = %page.path, component = %page.component.display(), defer = page.defer, "create page");
        self.queue.push(Action::CreatePage(page));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.queue)
    }

    /// The page requests recorded so far, in dispatch order.
    pub fn pages(&self) -> impl Iterator<Item = &PageRequest> {
        self.queue.iter().filter_map(|action| match action {
            Action::CreatePage(page) => Some(page),
            Action::CreateNodeField { .. } => None,
        })
    }
}
