//! The function extension registry: declares the kind system used to type-check function calls
//! in filter expressions, and the five standard functions from RFC 9535 §2.4.

use std::sync::Arc;

use serde_json::Value;

use crate::eval::FilterValue;

/// The kind of value a filter (sub-)expression produces or a function argument/return expects.
///
/// RFC 9535 names these `ValueType`, `LogicalType`, and `NodesType`; this collapses the four
/// concrete wrapper types a compile-time-checked registry needs (`NodesType`/`ValueType`/
/// `LogicalType`/`JsonPathType`) down to a plain enum, since there is no static type system to
/// preserve once functions are registered at runtime instead of linked in at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    Value,
    Logical,
    Nodes,
}

/// A callable registered in an [`Environment`][crate::env::Environment].
#[derive(Clone)]
pub struct FunctionDef {
    pub arg_kinds: Vec<ExpressionKind>,
    pub return_kind: ExpressionKind,
    pub invoke: Arc<dyn for<'a> Fn(Vec<FilterValue<'a>>) -> FilterValue<'a> + Send + Sync>,
}

impl FunctionDef {
    pub fn new(
        arg_kinds: Vec<ExpressionKind>,
        return_kind: ExpressionKind,
        invoke: impl for<'a> Fn(Vec<FilterValue<'a>>) -> FilterValue<'a> + Send + Sync + 'static,
    ) -> Self {
        Self {
            arg_kinds,
            return_kind,
            invoke: Arc::new(invoke),
        }
    }
}

impl std::fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDef")
            .field("arg_kinds", &self.arg_kinds)
            .field("return_kind", &self.return_kind)
            .finish_non_exhaustive()
    }
}

/// Install the five standard functions from RFC 9535 §2.4 into `registry`.
pub(crate) fn register_standard_functions(registry: &mut std::collections::HashMap<String, FunctionDef>) {
    registry.insert("length".into(), length());
    registry.insert("count".into(), count());
    registry.insert("match".into(), match_fn());
    registry.insert("search".into(), search_fn());
    registry.insert("value".into(), value_fn());
}

fn length() -> FunctionDef {
    FunctionDef::new(vec![ExpressionKind::Value], ExpressionKind::Value, |mut args| {
        let arg = args.pop().expect("arity checked by the caller");
        let value = match &arg {
            FilterValue::Value(v) => v.as_value(),
            _ => return FilterValue::Nothing,
        };
        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(a) => a.len(),
            Value::Object(o) => o.len(),
            _ => return FilterValue::Nothing,
        };
        FilterValue::Value(crate::node::NodeValue::Owned(Value::Number(len.into())))
    })
}

fn count() -> FunctionDef {
    FunctionDef::new(vec![ExpressionKind::Nodes], ExpressionKind::Value, |mut args| {
        let arg = args.pop().expect("arity checked by the caller");
        let len = match arg {
            FilterValue::Nodes(nl) => nl.len(),
            FilterValue::Nothing => 0,
            _ => 1,
        };
        FilterValue::Value(crate::node::NodeValue::Owned(Value::Number((len as u64).into())))
    })
}

fn as_str(v: &FilterValue<'_>) -> Option<String> {
    match v {
        FilterValue::Value(nv) => nv.as_value().as_str().map(str::to_owned),
        _ => None,
    }
}

fn match_fn() -> FunctionDef {
    FunctionDef::new(
        vec![ExpressionKind::Value, ExpressionKind::Value],
        ExpressionKind::Logical,
        |args| {
            let subject = as_str(&args[0]);
            let pattern = as_str(&args[1]);
            let (Some(subject), Some(pattern)) = (subject, pattern) else {
                return FilterValue::Bool(false);
            };
            match crate::iregexp::compile(&format!("^(?:{pattern})$")) {
                Some(re) => FilterValue::Bool(re.is_match(&subject)),
                None => FilterValue::Bool(false),
            }
        },
    )
}

fn search_fn() -> FunctionDef {
    FunctionDef::new(
        vec![ExpressionKind::Value, ExpressionKind::Value],
        ExpressionKind::Logical,
        |args| {
            let subject = as_str(&args[0]);
            let pattern = as_str(&args[1]);
            let (Some(subject), Some(pattern)) = (subject, pattern) else {
                return FilterValue::Bool(false);
            };
            match crate::iregexp::compile(&pattern) {
                Some(re) => FilterValue::Bool(re.is_match(&subject)),
                None => FilterValue::Bool(false),
            }
        },
    )
}

fn value_fn() -> FunctionDef {
    FunctionDef::new(vec![ExpressionKind::Nodes], ExpressionKind::Value, |mut args| {
        match args.pop().expect("arity checked by the caller") {
            FilterValue::Nodes(nl) if nl.len() == 1 => {
                let mut nodes = nl;
                let node = nodes.0.pop().expect("len checked above");
                FilterValue::Value(node.value)
            }
            _ => FilterValue::Nothing,
        }
    })
}
