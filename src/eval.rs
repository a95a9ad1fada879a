//! The evaluator: walks a compiled query against a document, applying selectors and filter
//! expressions.

use std::collections::HashMap;

use serde_json::{Number, Value};

use crate::ast::{ComparisonOp, FilterExpr, LogicalOp, Query, QueryKind, Segment, SegmentKind, Selector};
use crate::error::Error;
use crate::functions::FunctionDef;
use crate::node::{Node, NodeList, NodeValue};
use crate::path::PathElement;

/// The value of a filter (sub-)expression during evaluation.
///
/// This collapses the four-way `Nodelist`/`Node`/`Value`/`Logical` split used by earlier
/// JSONPath function-extension designs into three cases, since a runtime function registry has
/// no static type information to preserve across the split; see the design notes for why.
#[derive(Debug, Clone)]
pub enum FilterValue<'a> {
    Bool(bool),
    Nothing,
    Value(NodeValue<'a>),
    Nodes(NodeList<'a>),
}

impl<'a> FilterValue<'a> {
    pub fn truthy(&self) -> bool {
        match self {
            FilterValue::Bool(b) => *b,
            FilterValue::Nothing => false,
            FilterValue::Nodes(nl) => !nl.is_empty(),
            FilterValue::Value(v) => match v.as_value() {
                Value::Null => true,
                Value::Bool(b) => *b,
                Value::Number(n) => !is_zero(n),
                Value::String(s) => !s.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
        }
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().map(|f| f == 0.0).unwrap_or(false)
}

struct Budget {
    max_depth: usize,
}

/// Evaluate `query` against `root`, returning every node it selects in document order.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip(registry), ret, err))]
pub fn evaluate<'v>(
    query: &Query,
    root: &'v Value,
    registry: &HashMap<String, FunctionDef>,
    max_recursion_depth: usize,
) -> Result<NodeList<'v>, Error> {
    let budget = Budget {
        max_depth: max_recursion_depth,
    };
    eval_query(query, root, root, &budget, registry)
}

fn eval_query<'v>(
    query: &Query,
    current: &'v Value,
    root: &'v Value,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
) -> Result<NodeList<'v>, Error> {
    let base = match query.kind {
        QueryKind::Root => root,
        QueryKind::Current => current,
    };
    let mut nodes = vec![Node::root(base)];
    for segment in &query.segments {
        let mut next = Vec::new();
        for node in &nodes {
            eval_segment(segment, node, root, budget, registry, &mut next)?;
        }
        nodes = next;
    }
    Ok(NodeList::new(nodes))
}

fn eval_segment<'v>(
    segment: &Segment,
    node: &Node<'v>,
    root: &'v Value,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
    out: &mut Vec<Node<'v>>,
) -> Result<(), Error> {
    match segment.kind {
        SegmentKind::Child => {
            for selector in &segment.selectors {
                eval_selector(selector, node, root, budget, registry, out)?;
            }
            Ok(())
        }
        SegmentKind::Descendant => visit_descendants(segment, node, root, 0, budget, registry, out),
    }
}

fn visit_descendants<'v>(
    segment: &Segment,
    node: &Node<'v>,
    root: &'v Value,
    depth: usize,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
    out: &mut Vec<Node<'v>>,
) -> Result<(), Error> {
    if depth > budget.max_depth {
        return Err(Error::Recursion {
            max: budget.max_depth,
        });
    }
    for selector in &segment.selectors {
        eval_selector(selector, node, root, budget, registry, out)?;
    }
    match node.value() {
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                let child = Node {
                    value: NodeValue::Ref(v),
                    location: node.location().push(PathElement::Index(i)),
                };
                visit_descendants(segment, &child, root, depth + 1, budget, registry, out)?;
            }
        }
        Value::Object(obj) => {
            for (k, v) in obj.iter() {
                let child = Node {
                    value: NodeValue::Ref(v),
                    location: node.location().push(PathElement::Name(k.clone())),
                };
                visit_descendants(segment, &child, root, depth + 1, budget, registry, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn eval_selector<'v>(
    selector: &Selector,
    node: &Node<'v>,
    root: &'v Value,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
    out: &mut Vec<Node<'v>>,
) -> Result<(), Error> {
    match selector {
        Selector::Name(name) => {
            if let Some(v) = node.value().as_object().and_then(|o| o.get(name)) {
                out.push(Node {
                    value: NodeValue::Ref(v),
                    location: node.location().push(PathElement::Name(name.clone())),
                });
            }
        }
        Selector::Wildcard => match node.value() {
            Value::Array(arr) => {
                for (i, v) in arr.iter().enumerate() {
                    out.push(Node {
                        value: NodeValue::Ref(v),
                        location: node.location().push(PathElement::Index(i)),
                    });
                }
            }
            Value::Object(obj) => {
                for (k, v) in obj.iter() {
                    out.push(Node {
                        value: NodeValue::Ref(v),
                        location: node.location().push(PathElement::Name(k.clone())),
                    });
                }
            }
            _ => {}
        },
        Selector::Index(i) => {
            if let Some(arr) = node.value().as_array() {
                if let Some(idx) = normalize_index(*i, arr.len()) {
                    out.push(Node {
                        value: NodeValue::Ref(&arr[idx]),
                        location: node.location().push(PathElement::Index(idx)),
                    });
                }
            }
        }
        Selector::Slice(slice) => {
            if let Some(arr) = node.value().as_array() {
                for idx in slice_indices(slice, arr.len()) {
                    out.push(Node {
                        value: NodeValue::Ref(&arr[idx]),
                        location: node.location().push(PathElement::Index(idx)),
                    });
                }
            }
        }
        Selector::Filter(expr) => {
            for_each_child(node, |child| {
                let key = child.key().cloned();
                if eval_filter_expr(expr, child.value(), key.as_ref(), root, budget, registry)?.truthy() {
                    out.push(child);
                }
                Ok(())
            })?;
        }
        Selector::Keys => {
            if let Some(obj) = node.value().as_object() {
                for (k, _) in obj.iter() {
                    out.push(Node {
                        value: NodeValue::Owned(Value::String(k.clone())),
                        location: node.location().push(PathElement::Key(k.clone())),
                    });
                }
            }
        }
        Selector::KeysFilter(expr) => {
            if let Some(obj) = node.value().as_object() {
                for (k, _) in obj.iter() {
                    let key_value = Value::String(k.clone());
                    let key_elem = PathElement::Key(k.clone());
                    if eval_filter_expr(expr, &key_value, Some(&key_elem), root, budget, registry)?.truthy() {
                        out.push(Node {
                            value: NodeValue::Owned(key_value.clone()),
                            location: node.location().push(key_elem),
                        });
                    }
                }
            }
        }
        Selector::KeyName(name) => {
            if node
                .value()
                .as_object()
                .map(|o| o.contains_key(name))
                .unwrap_or(false)
            {
                out.push(Node {
                    value: NodeValue::Owned(Value::String(name.clone())),
                    location: node.location().push(PathElement::Key(name.clone())),
                });
            }
        }
    }
    Ok(())
}

fn for_each_child<'v>(
    node: &Node<'v>,
    mut f: impl FnMut(Node<'v>) -> Result<(), Error>,
) -> Result<(), Error> {
    match node.value() {
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                f(Node {
                    value: NodeValue::Ref(v),
                    location: node.location().push(PathElement::Index(i)),
                })?;
            }
        }
        Value::Object(obj) => {
            for (k, v) in obj.iter() {
                f(Node {
                    value: NodeValue::Ref(v),
                    location: node.location().push(PathElement::Name(k.clone())),
                })?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn normalize_index(i: i64, len: usize) -> Option<usize> {
    if i >= 0 {
        let i = i as usize;
        (i < len).then_some(i)
    } else {
        let back = i.checked_neg()? as usize;
        len.checked_sub(back)
    }
}

fn slice_indices(slice: &crate::ast::Slice, len: usize) -> Vec<usize> {
    let step = slice.step.unwrap_or(1);
    if step == 0 {
        return Vec::new();
    }
    let len_i = len as i64;
    let normalize = |i: i64| -> i64 {
        if i >= 0 {
            i
        } else {
            len_i + i
        }
    };
    let mut out = Vec::new();
    if step > 0 {
        let start = slice.start.map(normalize).unwrap_or(0).clamp(0, len_i);
        let end = slice.end.map(normalize).unwrap_or(len_i).clamp(0, len_i);
        let mut i = start;
        while i < end {
            out.push(i as usize);
            i += step;
        }
    } else {
        let start = slice
            .start
            .map(normalize)
            .unwrap_or(len_i - 1)
            .clamp(-1, len_i - 1);
        let end = slice
            .end
            .map(normalize)
            .unwrap_or(-1)
            .clamp(-1, len_i - 1);
        let mut i = start;
        while i > end {
            out.push(i as usize);
            i += step;
        }
    }
    out
}

/// Evaluate a filter expression to its [`FilterValue`].
fn eval_filter_expr<'v>(
    expr: &FilterExpr,
    current: &'v Value,
    current_key: Option<&PathElement>,
    root: &'v Value,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
) -> Result<FilterValue<'v>, Error> {
    Ok(match expr {
        FilterExpr::Bool(b) => FilterValue::Value(NodeValue::Owned(Value::Bool(*b))),
        FilterExpr::Null => FilterValue::Value(NodeValue::Owned(Value::Null)),
        FilterExpr::Int(i) => FilterValue::Value(NodeValue::Owned(Value::Number((*i).into()))),
        FilterExpr::Float(f) => FilterValue::Value(NodeValue::Owned(
            Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        )),
        FilterExpr::String(s) => FilterValue::Value(NodeValue::Owned(Value::String(s.clone()))),
        FilterExpr::CurrentKey => match current_key {
            Some(PathElement::Name(s)) | Some(PathElement::Key(s)) => {
                FilterValue::Value(NodeValue::Owned(Value::String(s.clone())))
            }
            Some(PathElement::Index(i)) => {
                FilterValue::Value(NodeValue::Owned(Value::Number((*i as u64).into())))
            }
            None => FilterValue::Nothing,
        },
        FilterExpr::Not(inner) => {
            let v = eval_filter_expr(inner, current, current_key, root, budget, registry)?;
            FilterValue::Bool(!v.truthy())
        }
        FilterExpr::Logical(op, l, r) => {
            let lv = eval_filter_expr(l, current, current_key, root, budget, registry)?;
            let truthy = match op {
                LogicalOp::And => {
                    lv.truthy()
                        && eval_filter_expr(r, current, current_key, root, budget, registry)?
                            .truthy()
                }
                LogicalOp::Or => {
                    lv.truthy()
                        || eval_filter_expr(r, current, current_key, root, budget, registry)?
                            .truthy()
                }
            };
            FilterValue::Bool(truthy)
        }
        FilterExpr::Comparison(op, l, r) => {
            let lv = eval_comparable(l, current, current_key, root, budget, registry)?;
            let rv = eval_comparable(r, current, current_key, root, budget, registry)?;
            FilterValue::Bool(compare(*op, &lv, &rv))
        }
        FilterExpr::RelativeQuery(q) => {
            let nl = eval_query(q, current, root, budget, registry)?;
            FilterValue::Nodes(nl)
        }
        FilterExpr::RootQuery(q) => {
            let nl = eval_query(q, current, root, budget, registry)?;
            FilterValue::Nodes(nl)
        }
        FilterExpr::FunctionCall(name, args) => {
            eval_function_call(name, args, current, current_key, root, budget, registry)?
        }
    })
}

fn eval_function_call<'v>(
    name: &str,
    args: &[FilterExpr],
    current: &'v Value,
    current_key: Option<&PathElement>,
    root: &'v Value,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
) -> Result<FilterValue<'v>, Error> {
    let def = registry.get(name).expect("checker guarantees function exists");
    let mut values = Vec::with_capacity(args.len());
    for (arg, expected) in args.iter().zip(&def.arg_kinds) {
        let raw = eval_filter_expr(arg, current, current_key, root, budget, registry)?;
        values.push(unpack_argument(raw, *expected));
    }
    Ok((def.invoke)(values))
}

fn unpack_argument(value: FilterValue<'_>, expected: crate::functions::ExpressionKind) -> FilterValue<'_> {
    use crate::functions::ExpressionKind;
    match (value, expected) {
        (FilterValue::Nodes(nl), ExpressionKind::Nodes) => FilterValue::Nodes(nl),
        (FilterValue::Nodes(nl), _) => match nl.len() {
            0 => FilterValue::Nothing,
            1 => {
                let mut nodes = nl;
                let node = nodes.0.pop().expect("len checked above");
                FilterValue::Value(node.value)
            }
            _ => FilterValue::Nothing,
        },
        (other, _) => other,
    }
}

/// The coerced operand of a comparison: an empty node list becomes [`Nothing`][Comparable::Nothing],
/// a singleton becomes its value, and anything else is left as a node list (unreachable once the
/// checker has verified both sides of a comparison are singular queries, literals, or
/// value-returning function calls, but handled defensively).
enum Comparable<'v> {
    Nothing,
    Value(NodeValue<'v>),
    Nodes(NodeList<'v>),
}

fn eval_comparable<'v>(
    expr: &FilterExpr,
    current: &'v Value,
    current_key: Option<&PathElement>,
    root: &'v Value,
    budget: &Budget,
    registry: &HashMap<String, FunctionDef>,
) -> Result<Comparable<'v>, Error> {
    let fv = eval_filter_expr(expr, current, current_key, root, budget, registry)?;
    Ok(match fv {
        FilterValue::Nothing => Comparable::Nothing,
        FilterValue::Value(v) => Comparable::Value(v),
        FilterValue::Bool(b) => Comparable::Value(NodeValue::Owned(Value::Bool(b))),
        FilterValue::Nodes(nl) => match nl.len() {
            0 => Comparable::Nothing,
            1 => {
                let mut nodes = nl;
                let node = nodes.0.pop().expect("len checked above");
                Comparable::Value(node.value)
            }
            _ => Comparable::Nodes(nl),
        },
    })
}

fn compare(op: ComparisonOp, l: &Comparable, r: &Comparable) -> bool {
    match op {
        ComparisonOp::Eq => equal(l, r),
        ComparisonOp::Ne => !equal(l, r),
        ComparisonOp::Lt => less_than(l, r),
        ComparisonOp::Gt => less_than(r, l),
        ComparisonOp::Le => less_than(l, r) || equal(l, r),
        ComparisonOp::Ge => less_than(r, l) || equal(l, r),
    }
}

fn equal(l: &Comparable, r: &Comparable) -> bool {
    match (l, r) {
        (Comparable::Nothing, Comparable::Nothing) => true,
        (Comparable::Nothing, Comparable::Nodes(nl)) | (Comparable::Nodes(nl), Comparable::Nothing) => {
            nl.is_empty()
        }
        (Comparable::Value(a), Comparable::Value(b)) => values_equal(a.as_value(), b.as_value()),
        (Comparable::Nodes(a), Comparable::Nodes(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x.value(), y.value()))
        }
        _ => false,
    }
}

fn less_than(l: &Comparable, r: &Comparable) -> bool {
    match (l, r) {
        (Comparable::Value(a), Comparable::Value(b)) => match (a.as_value(), b.as_value()) {
            (Value::Number(x), Value::Number(y)) => number_less_than(x, y),
            (Value::String(x), Value::String(y)) => x < y,
            _ => false,
        },
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => number_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map(|v2| values_equal(v, v2)).unwrap_or(false))
        }
        _ => false,
    }
}

fn number_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    false
}

fn number_less_than(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x < y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x < y;
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x < y;
    }
    false
}
