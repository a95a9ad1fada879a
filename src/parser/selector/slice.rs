//! The `start:end:step` array slice selector (RFC 9535 §2.3.4).

use nom::character::complete::{char, multispace0};
use nom::combinator::{map, opt};
use nom::sequence::{preceded, separated_pair, terminated};

use crate::ast::Slice;
use crate::parser::primitive::int::parse_int;
use crate::parser::PResult;

fn parse_int_space_after(input: &str) -> PResult<i64> {
    terminated(parse_int, multispace0)(input)
}

fn parse_int_space_before(input: &str) -> PResult<i64> {
    preceded(multispace0, parse_int)(input)
}

/// `[start] ":" [end] [":" [step]]`, with optional blank space around each `:`.
pub fn parse_slice(input: &str) -> PResult<Slice> {
    map(
        separated_pair(
            opt(parse_int_space_after),
            char(':'),
            preceded(
                multispace0,
                map(
                    opt(separated_pair(
                        opt(parse_int_space_after),
                        char(':'),
                        opt(parse_int_space_before),
                    )),
                    |rest| rest.unwrap_or((None, None)),
                ),
            ),
        ),
        |(start, (end, step))| Slice { start, end, step },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_slice() {
        let (_, slice) = parse_slice("1:5:2").unwrap();
        assert_eq!(
            slice,
            Slice {
                start: Some(1),
                end: Some(5),
                step: Some(2)
            }
        );
    }

    #[test]
    fn start_and_end_only() {
        let (_, slice) = parse_slice("1:5").unwrap();
        assert_eq!(
            slice,
            Slice {
                start: Some(1),
                end: Some(5),
                step: None
            }
        );
    }

    #[test]
    fn all_parts_omitted() {
        let (_, slice) = parse_slice("::").unwrap();
        assert_eq!(
            slice,
            Slice {
                start: None,
                end: None,
                step: None
            }
        );
    }

    #[test]
    fn bare_colon_omits_everything() {
        let (_, slice) = parse_slice(":").unwrap();
        assert_eq!(
            slice,
            Slice {
                start: None,
                end: None,
                step: None
            }
        );
    }

    #[test]
    fn negative_parts() {
        let (_, slice) = parse_slice("-1:-5:-1").unwrap();
        assert_eq!(
            slice,
            Slice {
                start: Some(-1),
                end: Some(-5),
                step: Some(-1)
            }
        );
    }

    #[test]
    fn blank_around_colons() {
        let (_, slice) = parse_slice("1 : 5 : 2").unwrap();
        assert_eq!(
            slice,
            Slice {
                start: Some(1),
                end: Some(5),
                step: Some(2)
            }
        );
    }

    #[test]
    fn requires_a_colon() {
        assert!(parse_slice("1").is_err());
    }
}
