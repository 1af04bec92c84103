//! The node-creation callback: attaches a slug to every content node.

use crate::actions::Actions;
use crate::config::SiteConfig;
use crate::file_path::{create_file_path, Result};
use crate::node::Node;
use crate::store::NodeLookup;
use serde_json::Value;
use tracing::debug;

/// Called once for each newly created node. If `node` is of the content type,
/// its slug is derived with [`create_file_path`] and dispatched as a single
/// field action under `config.slug_field`. Any other node is left alone.
/// Derivation errors are returned as-is; they end the build.
pub fn on_create_node<L: NodeLookup + ?Sized>(
    node: &Node,
    actions: &mut Actions,
    lookup: &L,
    config: &SiteConfig,
) -> Result<()> {
    if !node.is_type(&config.content_type) {
        return Ok(());
    }

    let slug = create_file_path(node, lookup, &config.base_path)?;
    debug!(node = %node.id, %slug, "assigned slug");
    actions.create_node_field(node, &config.slug_field, Value::String(slug));
    Ok(())
}
