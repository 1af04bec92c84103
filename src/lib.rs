//! The library code for `postpages`, which implements the two callbacks a
//! static site's build hands its content to:
//!
//! 1. Assigning slugs to content nodes as they are created
//!    ([`crate::assign`])
//! 2. Enumerating one page per content node, plus fixed extra pages, once
//!    every node exists ([`crate::pages`])
//!
//! Neither callback touches the host directly. Nodes are resolved through a
//! [`store::NodeLookup`], data is read through a [`query::QueryHandle`], and
//! every change is recorded as an [`actions::Action`] for the host to apply.
//! The slug itself is derived from the location of a node's source file
//! ([`crate::file_path`]).
//!
//! [`crate::build`] plays the host's part: it owns the node store, applies
//! field actions as soon as each node's callback returns, and only runs the
//! page callback after all nodes have been created.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod actions;
pub mod assign;
pub mod build;
pub mod config;
pub mod file_path;
pub mod node;
pub mod pages;
pub mod query;
pub mod store;
