use nom::Err;

use super::PResult;

/// Convert a `nom::Err::Failure` back into a `nom::Err::Error`.
///
/// `cut()` is used throughout this parser to commit to a branch once a distinguishing prefix has
/// matched, so that a genuine syntax error inside that branch is reported instead of silently
/// falling through to the next `alt()` alternative. But some grammar productions share a prefix
/// with a production parsed by a sibling branch of an _outer_ `alt()`; wrapping the inner parser
/// with `uncut` lets that outer `alt()` keep backtracking past a `cut`-committed failure that
/// was, from its point of view, just an unsuccessful alternative.
pub fn uncut<'a, O>(
    mut parser: impl FnMut(&'a str) -> PResult<'a, O>,
) -> impl FnMut(&'a str) -> PResult<'a, O> {
    move |input| match parser(input) {
        Err(Err::Failure(e)) => Err(Err::Error(e)),
        other => other,
    }
}
