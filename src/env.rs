//! The environment: a function registry plus parsing configuration, from which queries are
//! compiled.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::ast;
use crate::checker;
use crate::error::Error;
use crate::eval;
use crate::functions::{register_standard_functions, FunctionDef};
use crate::node::NodeList;
use crate::parser;

/// Default limit on the depth of a descendant-segment (`..`) traversal.
///
/// The original JSONPath implementation this engine was modeled on left descendant recursion
/// unbounded; a document containing a cycle-free but sufficiently deep or wide structure can
/// still exhaust the stack, so a configurable ceiling is enforced here instead.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 100;

/// Holds the function registry and parsing configuration that queries are compiled against.
///
/// An `Environment` starts out seeded with the five standard functions from RFC 9535 §2.4.
/// Additional functions may be [`register`][Environment::register]ed up until the first call to
/// [`compile`][Environment::compile]; after that the registry is frozen; a [`Query`] captures an
/// independent snapshot of the registry as it stood at compile time, so registering a function
/// later never changes the behavior of a query compiled earlier.
pub struct Environment {
    registry: HashMap<String, FunctionDef>,
    strict: bool,
    max_recursion_depth: usize,
    compiled: AtomicBool,
}

impl Environment {
    /// A permissive environment: both RFC 9535 syntax and the non-standard `~` key selectors are
    /// accepted.
    pub fn new() -> Self {
        let mut registry = HashMap::new();
        register_standard_functions(&mut registry);
        Self {
            registry,
            strict: false,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            compiled: AtomicBool::new(false),
        }
    }

    /// A strict environment: only RFC 9535 syntax is accepted; the non-standard `~` key
    /// selectors are a syntax error.
    pub fn strict() -> Self {
        let mut env = Self::new();
        env.strict = true;
        env
    }

    /// Override the maximum depth a descendant-segment traversal may reach before evaluation
    /// fails with [`Error::Recursion`].
    pub fn with_max_recursion_depth(mut self, max_recursion_depth: usize) -> Self {
        self.max_recursion_depth = max_recursion_depth;
        self
    }

    /// Register a custom function under `name`.
    ///
    /// # Panics
    ///
    /// Panics if this environment has already compiled a query; the registry is frozen at that
    /// point so that every query compiled against this environment observes a consistent set of
    /// functions.
    pub fn register(&mut self, name: impl Into<String>, def: FunctionDef) {
        assert!(
            !self.compiled.load(Ordering::SeqCst),
            "cannot register a function after this environment has compiled a query"
        );
        self.registry.insert(name.into(), def);
    }

    /// Parse and type-check `expr`, producing a [`Query`] that can be evaluated against any
    /// number of documents.
    pub fn compile(&self, expr: &str) -> Result<Query, Error> {
        self.compiled.store(true, Ordering::SeqCst);
        let query = parser::parse(expr, self.strict)?;
        checker::check(&query, &self.registry)?;
        Ok(Query {
            ast: query,
            registry: Arc::new(self.registry.clone()),
            max_recursion_depth: self.max_recursion_depth,
        })
    }

    /// Parse, check, and immediately evaluate `expr` against `value`.
    ///
    /// Equivalent to `self.compile(expr)?.query(value)`, provided for one-shot use.
    pub fn find<'v>(&self, expr: &str, value: &'v Value) -> Result<NodeList<'v>, Error> {
        self.compile(expr)?.query(value)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed, type-checked JSONPath query, ready to be evaluated against any number of documents.
///
/// A `Query` is cheap to clone and safe to share across threads: it owns an immutable snapshot
/// of the function registry it was compiled against.
#[derive(Clone)]
pub struct Query {
    ast: ast::Query,
    registry: Arc<HashMap<String, FunctionDef>>,
    max_recursion_depth: usize,
}

impl Query {
    /// Evaluate this query against `value`, returning every node it selects.
    pub fn query<'v>(&self, value: &'v Value) -> Result<NodeList<'v>, Error> {
        eval::evaluate(&self.ast, value, &self.registry, self.max_recursion_depth)
    }
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query").field("ast", &self.ast).finish_non_exhaustive()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ast)
    }
}

/// Serializes to the query string; the registry snapshot and recursion limit are not part of the
/// serialized form.
impl serde::Serialize for Query {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Deserializes from a query string by compiling it against a fresh, default [`Environment`].
/// Custom functions registered on some other `Environment` are not available to a query
/// deserialized this way; only the standard RFC 9535 §2.4 functions are.
impl<'de> serde::Deserialize<'de> for Query {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct QueryVisitor;

        impl<'de> serde::de::Visitor<'de> for QueryVisitor {
            type Value = Query;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a string containing a JSONPath query")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Environment::new().compile(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(QueryVisitor)
    }
}
