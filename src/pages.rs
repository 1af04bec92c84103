//! The page-building callback: turns every content node into a page request,
//! followed by the configured extra pages.

use crate::actions::{Actions, PageRequest};
use crate::config::SiteConfig;
use crate::query::{Query, QueryError, QueryHandle};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info};

/// Called once per build, after every node has been created and annotated.
///
/// Queries all content nodes with their slugs and dispatches, in query
/// order, one request per node for `config.post_template` with the slug as
/// both the output path and the template context. The extra pages follow,
/// always last. Requests are only dispatched once every node has produced
/// one, so a failed call leaves `actions` untouched.
pub fn create_pages<Q: QueryHandle + ?Sized>(
    graphql: &Q,
    actions: &mut Actions,
    config: &SiteConfig,
) -> Result<()> {
    let query = Query::all_of(&config.content_type, ["fields", config.slug_field.as_str()]);
    let result = graphql.query(&query);
    if !result.errors.is_empty() {
        for err in &result.errors {
            error!(query = %query, error = %err, "query failed");
        }
        return Err(Error::Query(result.errors));
    }

    let mut pages = Vec::with_capacity(result.nodes.len() + config.extra_pages.len());
    for (i, node) in result.nodes.iter().enumerate() {
        let slug = node
            .get("fields")
            .and_then(|fields| fields.get(&config.slug_field))
            .and_then(Value::as_str)
            .filter(|slug| !slug.is_empty())
            .ok_or(Error::MissingSlug { position: i })?;

        let mut context = Map::new();
        context.insert(config.slug_field.clone(), Value::String(slug.to_owned()));
        pages.push(PageRequest {
            path: slug.to_owned(),
            component: config.post_template.clone(),
            context,
            defer: false,
        });
    }

    pages.extend(config.extra_pages.iter().map(|page| PageRequest {
        path: page.path.clone(),
        component: page.component.clone(),
        context: Map::new(),
        defer: page.defer,
    }));

    info!(
        posts = result.nodes.len(),
        extra = config.extra_pages.len(),
        "creating pages"
    );
    for page in pages {
        actions.create_page(page);
    }
    Ok(())
}

/// The result of enumerating pages.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error enumerating pages.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Returned when the query reports any errors.
    #[error("could not query content nodes: {}", join(.0))]
    Query(Vec<QueryError>),

    /// Returned when a node has no slug. The query only projects slugs, so
    /// the node is named by its zero-based position in the query result.
    #[error("content node #{position} in query order has no slug")]
    MissingSlug { position: usize },
}

fn join(errors: &[QueryError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::query::QueryResult;
    use serde_json::json;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Answers every query with a canned result and remembers the queries.
    struct Canned {
        result: QueryResult,
        seen: RefCell<Vec<String>>,
    }

    impl Canned {
        fn slugs(slugs: &[&str]) -> Canned {
            Canned::new(QueryResult {
                nodes: slugs
                    .iter()
                    .map(|slug| json!({"fields": {"slug": slug}}))
                    .collect(),
                errors: Vec::new(),
            })
        }

        fn new(result: QueryResult) -> Canned {
            Canned {
                result,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl QueryHandle for Canned {
        fn query(&self, query: &Query) -> QueryResult {
            self.seen.borrow_mut().push(query.to_string());
            self.result.clone()
        }
    }

    fn paths(actions: &Actions) -> Vec<&str> {
        actions.pages().map(|page| page.path.as_str()).collect()
    }

    #[test]
    fn test_one_page_per_node_then_extra_page() -> Result<()> {
        let graphql = Canned::slugs(&["/posts/b/", "/posts/a/", "/posts/c/"]);
        let mut actions = Actions::new();
        create_pages(&graphql, &mut actions, &SiteConfig::default())?;

        assert_eq!(
            vec!["/posts/b/", "/posts/a/", "/posts/c/", "/using-dsg"],
            paths(&actions),
        );
        assert_eq!(
            vec!["{ allMarkdownRemark { edges { node { fields { slug } } } } }"],
            *graphql.seen.borrow(),
        );
        Ok(())
    }

    #[test]
    fn test_page_requests() -> Result<()> {
        let graphql = Canned::slugs(&["/posts/2023/hello/"]);
        let mut actions = Actions::new();
        create_pages(&graphql, &mut actions, &SiteConfig::default())?;

        let pages: Vec<&PageRequest> = actions.pages().collect();
        let mut context = Map::new();
        context.insert("slug".to_owned(), json!("/posts/2023/hello/"));
        assert_eq!(
            &PageRequest {
                path: "/posts/2023/hello/".to_owned(),
                component: PathBuf::from("src/templates/blog-post.js"),
                context,
                defer: false,
            },
            pages[0],
        );
        assert_eq!(
            &PageRequest {
                path: "/using-dsg".to_owned(),
                component: PathBuf::from("src/templates/using-dsg.js"),
                context: Map::new(),
                defer: true,
            },
            pages[1],
        );
        Ok(())
    }

    #[test]
    fn test_no_nodes() -> Result<()> {
        let graphql = Canned::slugs(&[]);
        let mut actions = Actions::new();
        create_pages(&graphql, &mut actions, &SiteConfig::default())?;
        assert_eq!(vec!["/using-dsg"], paths(&actions));
        Ok(())
    }

    #[test]
    fn test_query_errors_are_fatal() {
        let graphql = Canned::new(QueryResult {
            nodes: vec![json!({"fields": {"slug": "/posts/a/"}})],
            errors: vec![QueryError::new("boom")],
        });
        let mut actions = Actions::new();
        assert_eq!(
            Err(Error::Query(vec![QueryError::new("boom")])),
            create_pages(&graphql, &mut actions, &SiteConfig::default()),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_missing_slug_dispatches_nothing() {
        let graphql = Canned::new(QueryResult {
            nodes: vec![
                json!({"fields": {"slug": "/posts/a/"}}),
                json!({"fields": {"slug": null}}),
            ],
            errors: Vec::new(),
        });
        let mut actions = Actions::new();
        assert_eq!(
            Err(Error::MissingSlug { position: 1 }),
            create_pages(&graphql, &mut actions, &SiteConfig::default()),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_idempotent() -> Result<()> {
        let graphql = Canned::slugs(&["/posts/x/", "/posts/y/"]);
        let mut first = Actions::new();
        let mut second = Actions::new();
        create_pages(&graphql, &mut first, &SiteConfig::default())?;
        create_pages(&graphql, &mut second, &SiteConfig::default())?;
        assert_eq!(first.drain(), second.drain());
        Ok(())
    }
}
