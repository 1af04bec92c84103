//! Derives path-shaped slugs from the location of a node's source file. See
//! [`create_file_path`].

use crate::node::{Node, NodeId, FILE_TYPE};
use crate::store::NodeLookup;
use thiserror::Error;

/// Derives the slug for `node` from its backing file, relative to
/// `base_path`.
///
/// The backing file is `node` itself if it is a file node; otherwise the
/// parent chain is walked until a file node turns up. The file must live
/// under `{base_path}/`. Its path keeps that prefix, loses its extension, and
/// an `index` file contributes no segment of its own. The result always has a
/// trailing slash:
///
/// * `posts/2023/hello.md` => `/posts/2023/hello/`
/// * `posts/2023/index.md` => `/posts/2023/`
/// * `2023/hello.md` => [`Error::OutsideBase`]
pub fn create_file_path<L: NodeLookup + ?Sized>(
    node: &Node,
    lookup: &L,
    base_path: &str,
) -> Result<String> {
    let file = find_file_node(node, lookup)?;
    let relative_path = file
        .relative_path
        .as_deref()
        .ok_or_else(|| Error::MissingRelativePath(file.id.clone()))?;
    derive(relative_path, base_path)
}

fn find_file_node<'a, L: NodeLookup + ?Sized>(
    node: &'a Node,
    lookup: &'a L,
) -> Result<&'a Node> {
    let mut current = node;
    // Bounded by the store size so a parent cycle can't loop forever.
    for _ in 0..=lookup.len() {
        if current.is_type(FILE_TYPE) {
            return Ok(current);
        }
        let parent = current
            .parent
            .as_ref()
            .ok_or_else(|| Error::NoFileNode(node.id.clone()))?;
        current = lookup
            .get_node(parent)
            .ok_or_else(|| Error::UnknownParent {
                node: current.id.clone(),
                parent: parent.clone(),
            })?;
    }
    Err(Error::NoFileNode(node.id.clone()))
}

fn derive(relative_path: &str, base_path: &str) -> Result<String> {
    let base = base_path.trim_matches('/');
    let normalized = relative_path.replace('\\', "/");
    let relative = match base.is_empty() {
        true => normalized.as_str(),
        false => normalized
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| Error::OutsideBase {
                path: relative_path.to_owned(),
                base: base.to_owned(),
            })?,
    };

    let mut segments: Vec<&str> = relative.split('/').collect();
    let file_name = segments.pop().unwrap_or_default();
    let stem = match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[..i],
        _ => file_name,
    };
    if stem != "index" {
        segments.push(stem);
    }

    let mut slug = String::with_capacity(relative_path.len() + base.len() + 2);
    slug.push('/');
    if !base.is_empty() {
        slug.push_str(base);
        slug.push('/');
    }
    for segment in segments {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(Error::MalformedPath(relative_path.to_owned()));
        }
        slug.push_str(segment);
        slug.push('/');
    }
    Ok(slug)
}

/// The result of a slug derivation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error deriving a slug.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Returned when neither the node nor any of its ancestors is a file.
    #[error("could not find a file node for node `{0}`")]
    NoFileNode(NodeId),

    /// Returned when a node names a parent the store doesn't know.
    #[error("node `{node}` refers to unknown parent `{parent}`")]
    UnknownParent { node: NodeId, parent: NodeId },

    /// Returned when a file node has no relative path.
    #[error("file node `{0}` has no relative path")]
    MissingRelativePath(NodeId),

    /// Returned when the source file doesn't live under the base segment.
    #[error("source path `{path}` is not under `{base}/`")]
    OutsideBase { path: String, base: String },

    /// Returned for empty, `.` or `..` path segments.
    #[error("malformed source path `{0}`")]
    MalformedPath(String),
}
