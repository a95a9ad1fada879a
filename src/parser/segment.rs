//! Parses a single path [`Segment`][ast::Segment]: a child segment (`[...]` or the `.name`/`.*`
//! shorthand) or a descendant segment (`..` followed by either form).

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{cut, map, opt, recognize};
use nom::multi::many0_count;
use nom::sequence::{pair, preceded};

use crate::ast::{Segment, SegmentKind, Selector};
use crate::parser::selector::parse_selector_list;
use crate::parser::utils::uncut;
use crate::parser::PResult;

/// A bare identifier, per this dialect's simplified `[A-Za-z_][A-Za-z0-9_]*` member-name grammar.
pub fn parse_member_name(input: &str) -> PResult<&str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        many0_count(satisfy(|c| c.is_ascii_alphanumeric() || c == '_')),
    ))(input)
}

/// `[` selector-list `]`.
fn parse_bracketed_selectors(input: &str, strict: bool) -> PResult<Vec<Selector>> {
    preceded(
        pair(char('['), multispace0),
        cut(|i| {
            let (i, selectors) = parse_selector_list(i, strict)?;
            let (i, _) = pair(multispace0, char(']'))(i)?;
            Ok((i, selectors))
        }),
    )(input)
}

fn parse_child_bracket_segment(input: &str, strict: bool) -> PResult<Segment> {
    map(|i| parse_bracketed_selectors(i, strict), |selectors| Segment {
        kind: SegmentKind::Child,
        selectors,
    })(input)
}

/// `.name`, `.*`, or, when non-strict, `.~name`/`.~`.
fn parse_child_shorthand_segment(input: &str, strict: bool) -> PResult<Segment> {
    preceded(
        char('.'),
        cut(|i| {
            let (i, selector) = parse_shorthand_selector(i, strict)?;
            Ok((i, Segment {
                kind: SegmentKind::Child,
                selectors: vec![selector],
            }))
        }),
    )(input)
}

/// The single selector named by a dot-shorthand or descendant-shorthand segment: a bare name, a
/// wildcard, or (non-strict) one of the `~` forms.
fn parse_shorthand_selector(input: &str, strict: bool) -> PResult<Selector> {
    alt((
        map(char('*'), |_| Selector::Wildcard),
        move |i| parse_shorthand_tilde(i, strict),
        map(parse_member_name, |name| Selector::Name(name.to_owned())),
    ))(input)
}

fn parse_shorthand_tilde(input: &str, strict: bool) -> PResult<Selector> {
    let (rest, _) = char('~')(input)?;
    if strict {
        return nom::error::context("keys syntax (`~`) is disabled", cut(nom::combinator::fail))(input);
    }
    alt((
        map(parse_member_name, |name| Selector::KeyName(name.to_owned())),
        nom::combinator::success(Selector::Keys),
    ))(rest)
}

/// `..` followed by a bracketed selector-list, a bare name, `*`, or (non-strict) a `~` form.
fn parse_descendant_segment(input: &str, strict: bool) -> PResult<Segment> {
    preceded(
        tag(".."),
        cut(|i| {
            let (i, selectors) = alt((
                |i| parse_bracketed_selectors(i, strict),
                map(|i| parse_shorthand_selector(i, strict), |s| vec![s]),
            ))(i)?;
            Ok((i, Segment {
                kind: SegmentKind::Descendant,
                selectors,
            }))
        }),
    )(input)
}

/// A single segment: descendant is tried before child-shorthand since both start with `.`.
pub fn parse_segment(input: &str, strict: bool) -> PResult<Segment> {
    alt((
        |i| parse_descendant_segment(i, strict),
        uncut(|i| parse_child_shorthand_segment(i, strict)),
        |i| parse_child_bracket_segment(i, strict),
    ))(input)
}

/// Zero or more segments, the tail of a root (`$`) or current-node (`@`) query.
pub fn parse_segments(input: &str, strict: bool) -> PResult<Vec<Segment>> {
    nom::multi::many0(|i| parse_segment(i, strict))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_name() {
        let (rest, seg) = parse_segment(".store", false).unwrap();
        assert_eq!(rest, "");
        assert_eq!(seg.selectors, vec![Selector::Name("store".into())]);
    }

    #[test]
    fn dot_wildcard() {
        let (_, seg) = parse_segment(".*", false).unwrap();
        assert_eq!(seg.selectors, vec![Selector::Wildcard]);
    }

    #[test]
    fn descendant_name() {
        let (_, seg) = parse_segment("..author", false).unwrap();
        assert_eq!(seg.kind, SegmentKind::Descendant);
        assert_eq!(seg.selectors, vec![Selector::Name("author".into())]);
    }

    #[test]
    fn descendant_wildcard() {
        let (_, seg) = parse_segment("..*", false).unwrap();
        assert_eq!(seg.kind, SegmentKind::Descendant);
        assert_eq!(seg.selectors, vec![Selector::Wildcard]);
    }

    #[test]
    fn bracket_name() {
        let (_, seg) = parse_segment("['a']", false).unwrap();
        assert_eq!(seg.kind, SegmentKind::Child);
        assert_eq!(seg.selectors, vec![Selector::Name("a".into())]);
    }

    #[test]
    fn tilde_keys_non_strict() {
        let (_, seg) = parse_segment(".~", false).unwrap();
        assert_eq!(seg.selectors, vec![Selector::Keys]);
    }

    #[test]
    fn tilde_rejected_in_strict_mode() {
        assert!(parse_segment(".~", true).is_err());
    }

    #[test]
    fn sequence_of_segments() {
        let (rest, segs) = parse_segments(".store.book[0]", false).unwrap();
        assert_eq!(rest, "");
        assert_eq!(segs.len(), 3);
    }
}
