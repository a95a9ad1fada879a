//! A JSONPath (RFC 9535) engine: a parser, a static well-typedness checker, and an evaluator that
//! produces a list of located nodes from a `serde_json::Value` document.
//!
//! ```
//! use jsonpath_rfc9535::Environment;
//! use serde_json::json;
//!
//! let value = json!({"store": {"book": [{"price": 8.95}, {"price": 22.99}]}});
//! let env = Environment::new();
//! let nodes = env.find("$.store.book[?@.price < 10].price", &value).unwrap();
//! assert_eq!(nodes.len(), 1);
//! ```
//!
//! Queries are compiled once and may be evaluated against any number of documents:
//!
//! ```
//! use jsonpath_rfc9535::Environment;
//! use serde_json::json;
//!
//! let env = Environment::new();
//! let query = env.compile("$..author").unwrap();
//! let value = json!({"author": "A", "book": {"author": "B"}});
//! assert_eq!(query.query(&value).unwrap().len(), 2);
//! ```
//!
//! Custom functions can be registered before the first query is compiled:
//!
//! ```
//! use jsonpath_rfc9535::{Environment, ExpressionKind, FunctionDef};
//! use jsonpath_rfc9535::eval::FilterValue;
//!
//! let mut env = Environment::new();
//! env.register(
//!     "is_even",
//!     FunctionDef::new(vec![ExpressionKind::Value], ExpressionKind::Logical, |mut args| {
//!         match args.pop() {
//!             Some(FilterValue::Value(v)) => {
//!                 FilterValue::Bool(v.as_value().as_i64().map(|i| i % 2 == 0).unwrap_or(false))
//!             }
//!             _ => FilterValue::Bool(false),
//!         }
//!     }),
//! );
//! ```

mod ast;
mod checker;
mod env;
mod error;
pub mod eval;
mod functions;
mod integer;
mod iregexp;
mod node;
mod parser;
mod path;

pub use env::{Environment, Query, DEFAULT_MAX_RECURSION_DEPTH};
pub use error::Error;
pub use functions::{ExpressionKind, FunctionDef};
pub use node::{AtMostOneError, ExactlyOneError, Node, NodeList, NodeValue};
pub use path::{NormalizedPath, PathElement};
