//! Defines the typed [`Query`] issued against the host's node index and the
//! [`QueryHandle`] seam through which it is executed.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Selects every node of one type, projecting a single nested field. Its
/// [`fmt::Display`] implementation renders the query text in the host's query
/// language, e.g.
/// `{ allMarkdownRemark { edges { node { fields { slug } } } } }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// The node type to select.
    pub type_name: String,

    /// The path of the projected field, outermost first (e.g. `fields`,
    /// `slug`).
    pub projection: Vec<String>,
}

impl Query {
    pub fn all_of<I, S>(type_name: &str, projection: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query {
            type_name: type_name.to_owned(),
            projection: projection.into_iter().map(Into::into).collect(),
        }
    }

    /// The name of the connection field, e.g. `allMarkdownRemark`.
    pub fn connection(&self) -> String {
        format!("all{}", self.type_name)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{ {} {{ edges {{ node {{", self.connection())?;
        for (i, field) in self.projection.iter().enumerate() {
            write!(f, " {}", field)?;
            if i + 1 < self.projection.len() {
                f.write_str(" {")?;
            }
        }
        for _ in 1..self.projection.len() {
            f.write_str(" }")?;
        }
        f.write_str(" } } } }")
    }
}

/// A single error reported by the query layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> QueryError {
        QueryError {
            message: message.into(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for QueryError {}

/// What a [`QueryHandle`] returns: the projected nodes in index order, and
/// any errors. A non-empty `errors` means `nodes` must not be trusted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    /// One object per matching node, shaped like the projection (e.g.
    /// `{"fields": {"slug": "/posts/a/"}}`).
    pub nodes: Vec<Value>,

    pub errors: Vec<QueryError>,
}

impl QueryResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Executes queries against the host's node index. Calls block until the
/// result is available.
pub trait QueryHandle {
    fn query(&self, query: &Query) -> QueryResult;
}
