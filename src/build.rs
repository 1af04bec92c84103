//! Exports [`Site`], which drives the two callbacks the way a host build
//! does, and [`build_site`], which stitches together the high-level steps:
//! ingesting source files as nodes ([`ingest`]), assigning slugs as each node
//! is created ([`crate::assign`]), and enumerating pages once every node
//! exists ([`crate::pages`]).

use crate::actions::{Action, Actions, PageRequest};
use crate::assign::on_create_node;
use crate::config::{Config, SiteConfig};
use crate::node::{Node, NodeId};
use crate::pages::create_pages;
use crate::store::{NodeLookup, NodeStore};
use crate::{file_path, pages, store};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// The type tag the markdown transformer gives the nodes it derives from
/// markdown files.
pub const MARKDOWN_TYPE: &str = "MarkdownRemark";

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// A build in progress: the node store plus the identifiers the callbacks
/// need.
pub struct Site {
    store: NodeStore,
    config: SiteConfig,

    /// The node holding each slug assigned so far.
    slugs: HashMap<String, NodeId>,
}

impl Site {
    pub fn new(config: SiteConfig) -> Site {
        Site {
            store: NodeStore::new(),
            config,
            slugs: HashMap::new(),
        }
    }

    /// Adds `node` to the store, runs the node-creation callback on it and
    /// applies the field actions it dispatched before returning. A slug
    /// already held by another node is rejected.
    pub fn create_node(&mut self, node: Node) -> Result<()> {
        let id = node.id.clone();
        self.store.create_node(node)?;

        let mut actions = Actions::new();
        if let Some(node) = self.store.get_node(&id) {
            on_create_node(node, &mut actions, &self.store, &self.config)?;
        }
        for action in actions.drain() {
            if let Action::CreateNodeField { node, name, value } = &action {
                if *name == self.config.slug_field {
                    if let Some(slug) = value.as_str() {
                        self.claim_slug(slug, node)?;
                    }
                }
            }
            self.store.apply(&action)?;
        }
        Ok(())
    }

    fn claim_slug(&mut self, slug: &str, node: &NodeId) -> Result<()> {
        if let Some(first) = self.slugs.get(slug) {
            return Err(Error::DuplicateSlug {
                slug: slug.to_owned(),
                first: first.clone(),
                second: node.clone(),
            });
        }
        self.slugs.insert(slug.to_owned(), node.clone());
        Ok(())
    }

    /// Runs the page-building callback against the current node set and
    /// returns the page requests in dispatch order. Only call this once all
    /// nodes have been created.
    pub fn create_pages(&self) -> Result<Vec<PageRequest>> {
        let mut actions = Actions::new();
        create_pages(&self.store, &mut actions, &self.config)?;
        Ok(actions
            .drain()
            .into_iter()
            .filter_map(|action| match action {
                Action::CreatePage(page) => Some(page),
                Action::CreateNodeField { .. } => None,
            })
            .collect())
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }
}

/// Creates a file node for every file under `source_directory`, and a
/// markdown node beneath each markdown file, in file-name order. Returns the
/// number of nodes created.
pub fn ingest(site: &mut Site, source_directory: &Path) -> Result<usize> {
    let mut created = 0;
    for result in WalkDir::new(source_directory).sort_by_file_name() {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }

        // strip_prefix shouldn't fail since `source_directory` is always an
        // ancestor of the entry
        let relative = entry
            .path()
            .strip_prefix(source_directory)
            .unwrap_or_else(|_| entry.path());
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::NonUtf8Path(entry.path().to_owned()))?
            .join("/");

        let file_id = format!("file:{}", relative_path);
        site.create_node(Node::file(file_id.as_str(), relative_path.as_str()))?;
        created += 1;

        let is_markdown = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| MARKDOWN_EXTENSIONS.contains(&ext));
        if is_markdown {
            let markdown_id = format!("markdown:{}", relative_path);
            site.create_node(Node::child(markdown_id, MARKDOWN_TYPE, file_id))?;
            created += 1;
        }
        debug!(path = %relative_path, markdown = is_markdown, "ingested");
    }
    Ok(created)
}

/// Builds the page list for a project from a [`Config`]: ingests the source
/// directory, then enumerates pages.
pub fn build_site(config: &Config) -> Result<Vec<PageRequest>> {
    let mut site = Site::new(config.site.clone());
    let created = ingest(&mut site, &config.source_directory)?;
    info!(
        nodes = created,
        source = %config.source_directory.display(),
        "created nodes"
    );

    let pages = site.create_pages()?;
    info!(pages = pages.len(), "build complete");
    Ok(pages)
}

/// The result of a build step.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Every error aborts the build.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned for errors walking the source directory.
    #[error("walking source directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Returned when a source path isn't valid UTF-8.
    #[error("source path `{}` is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    /// Returned for errors creating or annotating nodes.
    #[error(transparent)]
    Store(#[from] store::Error),

    /// Returned for errors deriving slugs.
    #[error("assigning slug: {0}")]
    Slug(#[from] file_path::Error),

    /// Returned when two nodes derive the same slug.
    #[error("nodes `{first}` and `{second}` both have slug `{slug}`")]
    DuplicateSlug {
        slug: String,
        first: NodeId,
        second: NodeId,
    },

    /// Returned for errors enumerating pages.
    #[error(transparent)]
    Pages(#[from] pages::Error),
}
