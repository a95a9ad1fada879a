//! The selectors that can appear inside a bracketed `[...]` segment.

use nom::branch::alt;
use nom::character::complete::{char, multispace0};
use nom::combinator::{cut, map};
use nom::multi::separated_list1;
use nom::sequence::{preceded, tuple};

use crate::ast::Selector;
use crate::parser::primitive::int::parse_int;
use crate::parser::primitive::string::parse_string_literal;
use crate::parser::selector::filter::parse_filter_expr;
use crate::parser::selector::slice::parse_slice;
use crate::parser::utils::uncut;
use crate::parser::PResult;

pub mod filter;
pub mod slice;

fn parse_name_selector(input: &str) -> PResult<Selector> {
    map(parse_string_literal, Selector::Name)(input)
}

fn parse_wildcard_selector(input: &str) -> PResult<Selector> {
    map(char('*'), |_| Selector::Wildcard)(input)
}

/// A bare integer is an [`Selector::Index`]; if it (or a blank run) is followed by `:`, it's
/// instead the start of a [`Selector::Slice`]. Slice is tried first since an index parse would
/// otherwise succeed on the slice's own `start` part and leave the rest unconsumed.
fn parse_index_or_slice_selector(input: &str) -> PResult<Selector> {
    alt((
        map(parse_slice, Selector::Slice),
        map(parse_int, Selector::Index),
    ))(input)
}

fn parse_filter_selector(strict: bool) -> impl FnMut(&str) -> PResult<Selector> {
    move |input| {
        preceded(
            char('?'),
            cut(preceded(multispace0, move |i| {
                map(|i| parse_filter_expr(i, strict), Selector::Filter)(i)
            })),
        )(input)
    }
}

/// The non-standard `~` family: bare `~` is [`Selector::Keys`], `~'name'` is
/// [`Selector::KeyName`], and `~?expr` is [`Selector::KeysFilter`]. Only available when
/// `strict` is `false`.
fn parse_tilde_selector(strict: bool) -> impl FnMut(&str) -> PResult<Selector> {
    move |input| {
        let (rest, _) = char('~')(input)?;
        if strict {
            return nom::error::context("keys syntax (`~`) is disabled", cut(nom::combinator::fail))(input);
        }
        alt((
            map(
                preceded(char('?'), preceded(multispace0, |i| parse_filter_expr(i, strict))),
                Selector::KeysFilter,
            ),
            map(parse_string_literal, Selector::KeyName),
            nom::combinator::success(Selector::Keys),
        ))(rest)
    }
}

fn parse_selector(strict: bool) -> impl FnMut(&str) -> PResult<Selector> {
    move |input| {
        alt((
            parse_name_selector,
            parse_wildcard_selector,
            parse_index_or_slice_selector,
            parse_filter_selector(strict),
            uncut(parse_tilde_selector(strict)),
        ))(input)
    }
}

/// `selector *(S "," S selector)`.
pub fn parse_selector_list(input: &str, strict: bool) -> PResult<Vec<Selector>> {
    separated_list1(
        tuple((multispace0, char(','), multispace0)),
        parse_selector(strict),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOp, Slice};

    #[test]
    fn name_selector() {
        let (_, s) = parse_selector(false)("'a'").unwrap();
        assert_eq!(s, Selector::Name("a".into()));
        let (_, s) = parse_selector(false)("\"a\"").unwrap();
        assert_eq!(s, Selector::Name("a".into()));
    }

    #[test]
    fn index_selector() {
        let (_, s) = parse_selector(false)("-1").unwrap();
        assert_eq!(s, Selector::Index(-1));
    }

    #[test]
    fn slice_before_index() {
        let (_, s) = parse_selector(false)("1:5").unwrap();
        assert!(matches!(s, Selector::Slice(Slice { start: Some(1), end: Some(5), step: None })));
    }

    #[test]
    fn wildcard_selector() {
        let (_, s) = parse_selector(false)("*").unwrap();
        assert_eq!(s, Selector::Wildcard);
    }

    #[test]
    fn selector_list_with_blanks() {
        let (_, list) = parse_selector_list("0, 1 , 2", false).unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn keys_selector_non_strict() {
        let (_, s) = parse_selector(false)("~").unwrap();
        assert_eq!(s, Selector::Keys);
    }

    #[test]
    fn key_name_selector_non_strict() {
        let (_, s) = parse_selector(false)("~'a'").unwrap();
        assert_eq!(s, Selector::KeyName("a".into()));
    }

    #[test]
    fn keys_filter_selector_non_strict() {
        let (_, s) = parse_selector(false)("~?@ == 'a'").unwrap();
        assert!(matches!(s, Selector::KeysFilter(_)));
    }

    #[test]
    fn tilde_rejected_in_strict_mode() {
        assert!(parse_selector(true)("~").is_err());
    }

    #[test]
    fn filter_selector() {
        let (_, s) = parse_selector(false)("?@.a == 1").unwrap();
        match s {
            Selector::Filter(crate::ast::FilterExpr::Comparison(ComparisonOp::Eq, ..)) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }
}
