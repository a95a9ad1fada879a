//! The well-typedness checker: walks a parsed query, rejecting filter expressions whose type
//! usage RFC 9535 §2.4.3 disallows, before the query is ever evaluated against a document.

use std::collections::HashMap;

use crate::ast::{FilterExpr, Query, Segment, Selector};
use crate::error::Error;
use crate::functions::{ExpressionKind, FunctionDef};

pub fn check(query: &Query, registry: &HashMap<String, FunctionDef>) -> Result<(), Error> {
    check_query(query, registry)
}

fn check_segment(segment: &Segment, registry: &HashMap<String, FunctionDef>) -> Result<(), Error> {
    for selector in &segment.selectors {
        check_selector(selector, registry)?;
    }
    Ok(())
}

fn check_selector(selector: &Selector, registry: &HashMap<String, FunctionDef>) -> Result<(), Error> {
    match selector {
        Selector::Filter(expr) | Selector::KeysFilter(expr) => check_logical_operand(expr, registry),
        _ => Ok(()),
    }
}

fn check_query(query: &Query, registry: &HashMap<String, FunctionDef>) -> Result<(), Error> {
    for segment in &query.segments {
        check_segment(segment, registry)?;
    }
    Ok(())
}

fn type_error(message: impl Into<String>) -> Error {
    Error::Type {
        offset: None,
        message: message.into(),
    }
}

/// Check that `expr` is legal to use as the whole predicate of a `?`/`~?` selector, or as a
/// direct operand of `&&`/`||`/`!`.
///
/// Per RFC 9535 §2.4.3, the operands of a logical operator must themselves reduce to a logical
/// result: a nested comparison or logical expression, a function call whose declared return type
/// is `Logical`, or a bare query (coerced via existence: true iff it selects at least one node).
/// A bare literal or a function call returning `Value` must be wrapped in a comparison before it
/// can participate in `&&`/`||`.
fn check_logical_operand(expr: &FilterExpr, registry: &HashMap<String, FunctionDef>) -> Result<(), Error> {
    match expr {
        FilterExpr::Not(inner) => check_logical_operand(inner, registry),
        FilterExpr::Logical(_, l, r) => {
            check_logical_operand(l, registry)?;
            check_logical_operand(r, registry)
        }
        FilterExpr::Comparison(_, l, r) => {
            check_comparison_operand(l, registry)?;
            check_comparison_operand(r, registry)
        }
        FilterExpr::RelativeQuery(q) | FilterExpr::RootQuery(q) => check_query(q, registry),
        FilterExpr::FunctionCall(name, args) => {
            let kind = check_function_call(name, args, registry)?;
            match kind {
                ExpressionKind::Logical | ExpressionKind::Nodes => Ok(()),
                ExpressionKind::Value => Err(type_error(format!(
                    "function `{name}` returns a value and cannot be used directly as a filter predicate; wrap it in a comparison"
                ))),
            }
        }
        FilterExpr::Bool(_)
        | FilterExpr::Null
        | FilterExpr::Int(_)
        | FilterExpr::Float(_)
        | FilterExpr::String(_)
        | FilterExpr::CurrentKey => Err(type_error(
            "a literal value cannot be used directly as a filter predicate; wrap it in a comparison",
        )),
    }
}

/// Check that `expr` is legal to use as one side of a comparison.
///
/// Per RFC 9535 §2.3.5.2.2, a comparison operand must be a literal, the current-key marker, a
/// singular query (coerced via `Nothing`/singleton-unwrap), or a function call whose declared
/// return type is `Value`.
fn check_comparison_operand(expr: &FilterExpr, registry: &HashMap<String, FunctionDef>) -> Result<(), Error> {
    match expr {
        FilterExpr::Bool(_)
        | FilterExpr::Null
        | FilterExpr::Int(_)
        | FilterExpr::Float(_)
        | FilterExpr::String(_)
        | FilterExpr::CurrentKey => Ok(()),
        FilterExpr::RelativeQuery(q) | FilterExpr::RootQuery(q) => {
            check_query(q, registry)?;
            if q.is_singular() {
                Ok(())
            } else {
                Err(type_error(
                    "a comparison operand that is a query must be a singular query",
                ))
            }
        }
        FilterExpr::FunctionCall(name, args) => {
            let kind = check_function_call(name, args, registry)?;
            if kind == ExpressionKind::Value {
                Ok(())
            } else {
                Err(type_error(format!(
                    "function `{name}` must have a Value return type to be used as a comparison operand"
                )))
            }
        }
        FilterExpr::Not(_) | FilterExpr::Logical(..) | FilterExpr::Comparison(..) => Err(type_error(
            "a logical or comparison expression cannot itself be used as a comparison operand",
        )),
    }
}

fn check_function_call(
    name: &str,
    args: &[FilterExpr],
    registry: &HashMap<String, FunctionDef>,
) -> Result<ExpressionKind, Error> {
    let def = registry
        .get(name)
        .ok_or_else(|| type_error(format!("function `{name}` is not defined")))?;
    if args.len() != def.arg_kinds.len() {
        return Err(type_error(format!(
            "function `{name}` expects {} argument(s), found {}",
            def.arg_kinds.len(),
            args.len()
        )));
    }
    for (i, (arg, expected)) in args.iter().zip(&def.arg_kinds).enumerate() {
        check_function_argument(name, i, arg, *expected, registry)?;
    }
    Ok(def.return_kind)
}

fn check_function_argument(
    name: &str,
    position: usize,
    arg: &FilterExpr,
    expected: ExpressionKind,
    registry: &HashMap<String, FunctionDef>,
) -> Result<(), Error> {
    let actual = infer_kind(arg, registry)?;
    let ok = match (actual, expected) {
        (a, b) if a == b => true,
        (ExpressionKind::Value, ExpressionKind::Logical) => true,
        (ExpressionKind::Nodes, ExpressionKind::Logical) => true,
        (ExpressionKind::Nodes, ExpressionKind::Value) => matches!(
            arg,
            FilterExpr::RelativeQuery(q) | FilterExpr::RootQuery(q) if q.is_singular()
        ),
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(type_error(format!(
            "argument {position} of function `{name}`: expected {expected:?}, found {actual:?}"
        )))
    }
}

fn infer_kind(expr: &FilterExpr, registry: &HashMap<String, FunctionDef>) -> Result<ExpressionKind, Error> {
    Ok(match expr {
        FilterExpr::Bool(_)
        | FilterExpr::Null
        | FilterExpr::Int(_)
        | FilterExpr::Float(_)
        | FilterExpr::String(_)
        | FilterExpr::CurrentKey => ExpressionKind::Value,
        FilterExpr::RelativeQuery(q) | FilterExpr::RootQuery(q) => {
            check_query(q, registry)?;
            ExpressionKind::Nodes
        }
        FilterExpr::FunctionCall(name, args) => check_function_call(name, args, registry)?,
        FilterExpr::Not(_) | FilterExpr::Logical(..) | FilterExpr::Comparison(..) => ExpressionKind::Logical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOp, QueryKind, Segment, SegmentKind};
    use crate::functions::register_standard_functions;

    fn registry() -> HashMap<String, FunctionDef> {
        let mut r = HashMap::new();
        register_standard_functions(&mut r);
        r
    }

    #[test]
    fn bare_literal_is_rejected_as_a_predicate() {
        let err = check_logical_operand(&FilterExpr::Int(1), &registry());
        assert!(err.is_err());
    }

    #[test]
    fn comparison_of_literals_is_accepted_as_a_predicate() {
        let expr = FilterExpr::Comparison(
            ComparisonOp::Eq,
            Box::new(FilterExpr::Int(1)),
            Box::new(FilterExpr::Int(1)),
        );
        assert!(check_logical_operand(&expr, &registry()).is_ok());
    }

    #[test]
    fn non_singular_query_rejected_as_comparison_operand() {
        let q = Query {
            kind: QueryKind::Current,
            segments: vec![Segment {
                kind: SegmentKind::Child,
                selectors: vec![Selector::Wildcard],
            }],
        };
        let expr = FilterExpr::Comparison(
            ComparisonOp::Eq,
            Box::new(FilterExpr::RelativeQuery(q)),
            Box::new(FilterExpr::Int(1)),
        );
        assert!(check_logical_operand(&expr, &registry()).is_err());
    }

    #[test]
    fn value_returning_function_rejected_as_bare_predicate() {
        let expr = FilterExpr::FunctionCall(
            "length".to_owned(),
            vec![FilterExpr::String("abc".to_owned())],
        );
        assert!(check_logical_operand(&expr, &registry()).is_err());
    }

    #[test]
    fn logical_returning_function_accepted_as_bare_predicate() {
        let expr = FilterExpr::FunctionCall(
            "match".to_owned(),
            vec![
                FilterExpr::String("abc".to_owned()),
                FilterExpr::String("a.*".to_owned()),
            ],
        );
        assert!(check_logical_operand(&expr, &registry()).is_ok());
    }
}
