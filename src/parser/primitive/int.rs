use nom::character::complete::char;
use nom::{
    bytes::complete::{tag, take_while_m_n},
    character::complete::digit0,
    combinator::{map_res, opt, recognize},
    sequence::tuple,
};
use nom::branch::alt;

use crate::integer::Integer;
use crate::parser::PResult;

fn parse_zero(input: &str) -> PResult<&str> {
    tag("0")(input)
}

fn is_non_zero_digit(chr: char) -> bool {
    ('1'..='9').contains(&chr)
}

pub fn parse_non_zero_first_digit(input: &str) -> PResult<&str> {
    take_while_m_n(1, 1, is_non_zero_digit)(input)
}

/// Parse a non-zero integer, without a leading `0` (e.g. `0123` is not a valid integer token).
fn parse_non_zero_int(input: &str) -> PResult<&str> {
    recognize(tuple((opt(char('-')), parse_non_zero_first_digit, digit0)))(input)
}

pub fn parse_int_string(input: &str) -> PResult<&str> {
    alt((parse_zero, parse_non_zero_int))(input)
}

/// Parse an integer token and check it falls within the JSONPath-safe integer range.
pub fn parse_int(input: &str) -> PResult<i64> {
    map_res(parse_int_string, |i_str| {
        i_str
            .parse::<i64>()
            .map_err(|_| crate::integer::IntegerOutOfBoundsError(0))
            .and_then(|i| crate::integer::Integer::new(i).map(Integer::get))
    })(input)
}

#[cfg(test)]
mod tests {
    use super::parse_int;

    #[test]
    fn parse_integers() {
        assert_eq!(parse_int("0"), Ok(("", 0)));
        assert_eq!(parse_int("10"), Ok(("", 10)));
        assert_eq!(parse_int("-10"), Ok(("", -10)));
        // A leading `0` is only recognized as the single digit `0`; whatever follows is left for
        // the caller's own delimiter handling to reject or accept.
        assert_eq!(parse_int("010"), Ok(("10", 0)));
    }

    #[test]
    fn rejects_integers_outside_the_safe_range() {
        assert!(parse_int("18446744073709551616").is_err());
    }
}
