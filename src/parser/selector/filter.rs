//! The filter-expression grammar: everything that can appear after `?`/`~?`.
//!
//! Precedence, highest to lowest: parenthesization and unary `!`; comparisons (non-associative,
//! at most one comparison operator per expression); `&&`; `||`.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{consumed, cut, map, map_res, opt, recognize, value};
use nom::multi::{many0_count, separated_list0};
use nom::sequence::{delimited, pair, preceded, tuple};

use crate::ast::{ComparisonOp, FilterExpr, LogicalOp, Query, QueryKind};
use crate::parser::primitive::number::parse_number;
use crate::parser::primitive::string::parse_string_literal;
use crate::parser::primitive::{parse_bool, parse_null};
use crate::parser::segment::parse_segments;
use crate::parser::utils::uncut;
use crate::parser::PResult;

/// `||`, the lowest-precedence operator; left-associative.
pub fn parse_filter_expr(input: &str, strict: bool) -> PResult<FilterExpr> {
    let (input, first) = parse_logical_and(input, strict)?;
    fold_binary(
        input,
        first,
        tuple((multispace0, tag("||"), multispace0)),
        |i| parse_logical_and(i, strict),
        |l, r| FilterExpr::Logical(LogicalOp::Or, Box::new(l), Box::new(r)),
    )
}

/// `&&`, binding tighter than `||`; left-associative.
fn parse_logical_and(input: &str, strict: bool) -> PResult<FilterExpr> {
    let (input, first) = parse_basic(input, strict)?;
    fold_binary(
        input,
        first,
        tuple((multispace0, tag("&&"), multispace0)),
        |i| parse_basic(i, strict),
        |l, r| FilterExpr::Logical(LogicalOp::And, Box::new(l), Box::new(r)),
    )
}

/// Repeatedly consume `separator next` and combine with `first` via `combine`, left-associative.
fn fold_binary<'a>(
    mut input: &'a str,
    mut acc: FilterExpr,
    mut separator: impl FnMut(&'a str) -> PResult<'a, (&'a str, &'a str, &'a str)>,
    mut next: impl FnMut(&'a str) -> PResult<'a, FilterExpr>,
    combine: impl Fn(FilterExpr, FilterExpr) -> FilterExpr,
) -> PResult<'a, FilterExpr> {
    loop {
        match separator(input) {
            Ok((rest, _)) => {
                let (rest, rhs) = cut(&mut next)(rest)?;
                acc = combine(acc, rhs);
                input = rest;
            }
            Err(_) => return Ok((input, acc)),
        }
    }
}

/// A comparison, or a parenthesized/negated/bare predicate.
///
/// A comparison is attempted first: if no comparison operator follows the first comparable, the
/// attempt fails without having committed (`parse_comparable` never uses `cut`), so control falls
/// through to `parse_paren_or_test`, which reparses the same prefix as a predicate on its own.
fn parse_basic(input: &str, strict: bool) -> PResult<FilterExpr> {
    alt((
        |i| parse_comparison(i, strict),
        |i| parse_paren_or_test(i, strict),
    ))(input)
}

fn parse_comparison(input: &str, strict: bool) -> PResult<FilterExpr> {
    map(
        tuple((
            |i| parse_comparable(i, strict),
            delimited(multispace0, parse_comparison_op, multispace0),
            cut(|i| parse_comparable(i, strict)),
        )),
        |(l, op, r)| FilterExpr::Comparison(op, Box::new(l), Box::new(r)),
    )(input)
}

fn parse_comparison_op(input: &str) -> PResult<ComparisonOp> {
    alt((
        value(ComparisonOp::Eq, tag("==")),
        value(ComparisonOp::Ne, tag("!=")),
        value(ComparisonOp::Le, tag("<=")),
        value(ComparisonOp::Ge, tag(">=")),
        value(ComparisonOp::Lt, char('<')),
        value(ComparisonOp::Gt, char('>')),
    ))(input)
}

/// `(!S)? "(" S logical-or-expr S ")"` or `(!S)? (filter-query | function-expr)`.
fn parse_paren_or_test(input: &str, strict: bool) -> PResult<FilterExpr> {
    let (input, negated) = map(opt(tuple((char('!'), multispace0))), |o| o.is_some())(input)?;
    let (input, expr) = alt((
        delimited(
            pair(char('('), multispace0),
            cut(|i| parse_filter_expr(i, strict)),
            cut(pair(multispace0, char(')'))),
        ),
        |i| parse_test(i, strict),
    ))(input)?;
    Ok((input, if negated { FilterExpr::Not(Box::new(expr)) } else { expr }))
}

/// A filter-query (`@...`/`$...`) or a function call, used bare as an existence/truthiness test.
fn parse_test(input: &str, strict: bool) -> PResult<FilterExpr> {
    alt((
        |i| parse_function_call(i, strict),
        |i| parse_query(i, strict),
    ))(input)
}

/// One operand of a comparison: a literal, `#`, a query, or a function call.
fn parse_comparable(input: &str, strict: bool) -> PResult<FilterExpr> {
    alt((
        parse_null_literal,
        parse_bool_literal,
        parse_number_literal,
        parse_string_literal_expr,
        value(FilterExpr::CurrentKey, char('#')),
        |i| parse_function_call(i, strict),
        |i| parse_query(i, strict),
    ))(input)
}

fn parse_null_literal(input: &str) -> PResult<FilterExpr> {
    map(parse_null, |_| FilterExpr::Null)(input)
}

fn parse_bool_literal(input: &str) -> PResult<FilterExpr> {
    map(parse_bool, FilterExpr::Bool)(input)
}

fn parse_string_literal_expr(input: &str) -> PResult<FilterExpr> {
    map(parse_string_literal, FilterExpr::String)(input)
}

/// An integer or floating-point literal, built on top of [`parse_number`]'s grammar. The literal
/// is a plain integer only if its source text has no fractional part or exponent; those are
/// bounds-checked against the JSONPath-safe range, so a long integer part followed by a fraction
/// or exponent is parsed as a float instead of being rejected for the integer part alone being out
/// of range.
fn parse_number_literal(input: &str) -> PResult<FilterExpr> {
    map_res(consumed(parse_number), |(text, n)| {
        if text.contains(['.', 'e', 'E']) {
            n.as_f64().map(FilterExpr::Float).ok_or(())
        } else {
            text.parse::<i64>()
                .map_err(|_| ())
                .and_then(|i| crate::integer::Integer::new(i).map(|_| FilterExpr::Int(i)).map_err(|_| ()))
        }
    })(input)
}

/// `@` or `$`, followed by zero or more segments.
fn parse_query(input: &str, strict: bool) -> PResult<FilterExpr> {
    alt((
        map(
            preceded(char('@'), |i| parse_segments(i, strict)),
            |segments| FilterExpr::RelativeQuery(Query::new(QueryKind::Current, segments)),
        ),
        map(
            preceded(char('$'), |i| parse_segments(i, strict)),
            |segments| FilterExpr::RootQuery(Query::new(QueryKind::Root, segments)),
        ),
    ))(input)
}

fn parse_function_name(input: &str) -> PResult<&str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_lowercase()),
        many0_count(satisfy(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')),
    ))(input)
}

fn parse_function_argument(input: &str, strict: bool) -> PResult<FilterExpr> {
    alt((
        parse_null_literal,
        parse_bool_literal,
        parse_number_literal,
        parse_string_literal_expr,
        value(FilterExpr::CurrentKey, char('#')),
        |i| parse_function_call(i, strict),
        |i| parse_query(i, strict),
    ))(input)
}

fn parse_function_call(input: &str, strict: bool) -> PResult<FilterExpr> {
    map(
        pair(
            parse_function_name,
            cut(delimited(
                pair(char('('), multispace0),
                separated_list0(
                    tuple((multispace0, char(','), multispace0)),
                    uncut(|i| parse_function_argument(i, strict)),
                ),
                pair(multispace0, char(')')),
            )),
        ),
        |(name, args)| FilterExpr::FunctionCall(name.to_owned(), args),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_comparison() {
        let (_, expr) = parse_filter_expr("@.a == 1", false).unwrap();
        assert!(matches!(expr, FilterExpr::Comparison(ComparisonOp::Eq, ..)));
    }

    #[test]
    fn existence_test() {
        let (_, expr) = parse_filter_expr("@.isbn", false).unwrap();
        assert!(matches!(expr, FilterExpr::RelativeQuery(_)));
    }

    #[test]
    fn negated_existence() {
        let (_, expr) = parse_filter_expr("!@.isbn", false).unwrap();
        assert!(matches!(expr, FilterExpr::Not(_)));
    }

    #[test]
    fn parenthesized_or() {
        let (_, expr) = parse_filter_expr("(@.a == 1 || @.b == 2)", false).unwrap();
        assert!(matches!(expr, FilterExpr::Logical(LogicalOp::Or, ..)));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let (_, expr) = parse_filter_expr("@.a == 1 || @.b == 2 && @.c == 3", false).unwrap();
        match expr {
            FilterExpr::Logical(LogicalOp::Or, l, r) => {
                assert!(matches!(*l, FilterExpr::Comparison(..)));
                assert!(matches!(*r, FilterExpr::Logical(LogicalOp::And, ..)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn function_call_with_two_args() {
        let (_, expr) = parse_filter_expr("match(@.a, 'a.*')", false).unwrap();
        match expr {
            FilterExpr::FunctionCall(name, args) => {
                assert_eq!(name, "match");
                assert_eq!(args.len(), 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn current_key() {
        let (_, expr) = parse_filter_expr("#== 'a'", false).unwrap();
        assert!(matches!(expr, FilterExpr::Comparison(ComparisonOp::Eq, ..)));
    }

    #[test]
    fn integer_vs_float_literal() {
        let (_, a) = parse_comparable("1", false).unwrap();
        assert!(matches!(a, FilterExpr::Int(1)));
        let (_, b) = parse_comparable("1.5", false).unwrap();
        assert!(matches!(b, FilterExpr::Float(f) if f == 1.5));
        let (_, c) = parse_comparable("-0", false).unwrap();
        assert!(matches!(c, FilterExpr::Int(0)));
    }

    #[test]
    fn oversized_integer_literal_is_rejected() {
        assert!(parse_comparable("18446744073709551616", false).is_err());
    }
}
