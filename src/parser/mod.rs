//! The query parser: a hand-written recursive-descent grammar built on top of `nom` combinators,
//! producing an [`ast::Query`][crate::ast::Query].
//!
//! A query string is `$` followed by zero or more segments (see [`segment`]), each of which
//! carries one or more selectors (see [`selector`]). Filter expressions, the grammar nested inside
//! a `?`/`~?` selector, live in [`selector::filter`].

use nom::character::complete::char;
use nom::combinator::{all_consuming, map};
use nom::error::VerboseError;
use nom::sequence::preceded;
use nom::IResult;

use crate::ast::{Query, QueryKind};
use crate::error::Error;

pub mod primitive;
pub mod segment;
pub mod selector;
pub mod utils;

/// The result type threaded through every parser in this module: `nom`'s [`VerboseError`]
/// accumulates a stack of contexts so a failure deep inside a filter expression still reports a
/// useful position and message at the top level.
pub(crate) type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

fn parse_root_query(strict: bool) -> impl FnMut(&str) -> PResult<Query> {
    move |input| {
        map(
            preceded(char('$'), |i| segment::parse_segments(i, strict)),
            |segments| Query::new(QueryKind::Root, segments),
        )(input)
    }
}

/// Parse a complete query string, requiring it to start with `$` and leave no trailing input.
///
/// `strict` disables every non-standard extension this dialect adds to RFC 9535 (currently the
/// `~` key-selector family), producing plain syntax errors for their use instead.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", ret, err))]
pub fn parse(input: &str, strict: bool) -> Result<Query, Error> {
    all_consuming(parse_root_query(strict))(input)
        .map(|(_, query)| query)
        .map_err(|e| Error::from((input, e)))
}
