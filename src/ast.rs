//! The abstract syntax tree produced by the parser and consumed by the checker and evaluator.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Root,
    Current,
}

/// A compiled query, either the top-level query rooted at `$`, or a sub-query rooted at `@`/`$`
/// appearing inside a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: QueryKind,
    pub segments: Vec<Segment>,
}

impl Query {
    pub fn new(kind: QueryKind, segments: Vec<Segment>) -> Self {
        Self { kind, segments }
    }

    /// A query is singular if it is guaranteed to select at most one node: every segment is a
    /// child segment with exactly one selector, and that selector is a `Name` or non-negative
    /// `Index` selector (RFC 9535 §2.3.5).
    pub fn is_singular(&self) -> bool {
        self.segments.iter().all(Segment::is_singular)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub selectors: Vec<Selector>,
}

impl Segment {
    pub fn is_singular(&self) -> bool {
        self.kind == SegmentKind::Child
            && self.selectors.len() == 1
            && self.selectors[0].is_singular()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Name(String),
    Wildcard,
    Index(i64),
    Slice(Slice),
    Filter(FilterExpr),
    /// Non-standard: yields the key (object member name, or array index) of every child.
    Keys,
    /// Non-standard: like [`Selector::Keys`], filtered by a predicate evaluated with `@` bound
    /// to the key itself.
    KeysFilter(FilterExpr),
    /// Non-standard: yields the named key itself, if the current node has a member by that name.
    KeyName(String),
}

impl Selector {
    pub fn is_singular(&self) -> bool {
        match self {
            Selector::Name(_) => true,
            Selector::Index(i) => *i >= 0,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// A filter expression, as found inside `?expr` and the non-standard `~?expr`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Bool(bool),
    Null,
    Int(i64),
    Float(f64),
    String(String),
    /// The key of the current node (`#`). Only legal inside a filter expression.
    CurrentKey,
    Not(Box<FilterExpr>),
    Logical(LogicalOp, Box<FilterExpr>, Box<FilterExpr>),
    Comparison(ComparisonOp, Box<FilterExpr>, Box<FilterExpr>),
    /// A query rooted at the current node (`@...`).
    RelativeQuery(Query),
    /// A query rooted at the document root (`$...`).
    RootQuery(Query),
    FunctionCall(String, Vec<FilterExpr>),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            QueryKind::Root => write!(f, "$")?,
            QueryKind::Current => write!(f, "@")?,
        }
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == SegmentKind::Descendant {
            write!(f, "..")?;
        }
        write!(f, "[")?;
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{selector}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "{}", quote(name)),
            Selector::Wildcard => write!(f, "*"),
            Selector::Index(i) => write!(f, "{i}"),
            Selector::Slice(slice) => write!(f, "{slice}"),
            Selector::Filter(expr) => write!(f, "?{expr}"),
            Selector::Keys => write!(f, "~"),
            Selector::KeysFilter(expr) => write!(f, "~?{expr}"),
            Selector::KeyName(name) => write!(f, "~{}", quote(name)),
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        if let Some(step) = self.step {
            write!(f, ":{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Bool(b) => write!(f, "{b}"),
            FilterExpr::Null => write!(f, "null"),
            FilterExpr::Int(i) => write!(f, "{i}"),
            FilterExpr::Float(x) => write!(f, "{x}"),
            FilterExpr::String(s) => write!(f, "{}", quote(s)),
            FilterExpr::CurrentKey => write!(f, "#"),
            FilterExpr::Not(inner) => write!(f, "!{inner}"),
            FilterExpr::Logical(op, l, r) => {
                let op = match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                };
                write!(f, "{l} {op} {r}")
            }
            FilterExpr::Comparison(op, l, r) => {
                let op = match op {
                    ComparisonOp::Eq => "==",
                    ComparisonOp::Ne => "!=",
                    ComparisonOp::Lt => "<",
                    ComparisonOp::Gt => ">",
                    ComparisonOp::Le => "<=",
                    ComparisonOp::Ge => ">=",
                };
                write!(f, "{l} {op} {r}")
            }
            FilterExpr::RelativeQuery(q) => write!(f, "@{q}", q = QueryTail(q)),
            FilterExpr::RootQuery(q) => write!(f, "${q}", q = QueryTail(q)),
            FilterExpr::FunctionCall(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Renders only a query's segments, without the leading `$`/`@`, so that [`FilterExpr`]'s own
/// `Display` impl can prefix the correct marker for a sub-query.
struct QueryTail<'a>(&'a Query);

impl fmt::Display for QueryTail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Quote a string literal using single quotes, escaping `\` and `'`.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
