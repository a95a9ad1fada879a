//! The three kinds of error a query can produce: malformed syntax, a well-typedness violation
//! caught before evaluation, or a traversal that exceeded its recursion budget.

use nom::error::{convert_error, VerboseError};

/// An error produced while parsing, checking, or evaluating a JSONPath query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query string could not be parsed.
    #[error("syntax error at position {offset}:\n{message}")]
    Syntax { offset: usize, message: String },
    /// The query parsed, but violates a well-typedness rule (RFC 9535 §2.4.3) that can be
    /// detected without evaluating it against a document.
    #[error("type error: {message}")]
    Type { offset: Option<usize>, message: String },
    /// A descendant-segment (`..`) traversal exceeded its configured maximum depth.
    #[error("recursion error: descendant traversal exceeded the maximum depth of {max}")]
    Recursion { max: usize },
}

impl Error {
    /// The byte offset into the original query string this error pertains to, if one is known.
    ///
    /// [`Error::Syntax`] always carries a position. [`Error::Type`] does not: the checker walks
    /// the parsed AST rather than the token stream, and the AST does not currently retain source
    /// positions, so a type error is reported with its message alone. [`Error::Recursion`] has no
    /// single offset to report, since it names a traversal depth rather than a location.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { offset, .. } => Some(*offset),
            Error::Type { offset, .. } => *offset,
            Error::Recursion { .. } => None,
        }
    }
}

impl<'a> From<(&'a str, nom::Err<VerboseError<&'a str>>)> for Error {
    fn from((original, err): (&'a str, nom::Err<VerboseError<&'a str>>)) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                let offset = e
                    .errors
                    .first()
                    .map(|(i, _)| original.len() - i.len())
                    .unwrap_or(0);
                let message = convert_error(original, e);
                Error::Syntax { offset, message }
            }
            nom::Err::Incomplete(_) => unreachable!("streaming parsers are not used"),
        }
    }
}
