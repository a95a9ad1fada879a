//! The normalized path format described in RFC 9535 §2.7, extended with a key-marker element
//! for the non-standard key selectors.

use std::fmt;

use serde::Serialize;

/// One step of a [`NormalizedPath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathElement {
    /// An object member, rendered as `['name']`.
    Name(String),
    /// An array element, rendered as `[index]`.
    Index(usize),
    /// A key produced by a `~`-family selector, rendered as `[~'name']`.
    ///
    /// This has no counterpart in RFC 9535; it exists so that a path yielded by `Keys`,
    /// `KeysFilter`, or `KeyName` still round-trips to something that identifies which key it
    /// names, rather than silently reusing the `Name` rendering of a selector it did not come
    /// from.
    Key(String),
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Name(name) => write!(f, "['{}']", escape_single_quoted(name)),
            PathElement::Index(index) => write!(f, "[{index}]"),
            PathElement::Key(name) => write!(f, "[~'{}']", escape_single_quoted(name)),
        }
    }
}

/// Escape a string for inclusion between single quotes in a normalized path.
///
/// RFC 9535 §2.7 requires `\` and `'` to be backslash-escaped; everything else is passed
/// through as-is.
fn escape_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out
}

/// The normalized, absolute path to a [`Node`][crate::node::Node] within a queried document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedPath(Vec<PathElement>);

impl NormalizedPath {
    pub(crate) fn push(&self, element: PathElement) -> Self {
        let mut elements = self.0.clone();
        elements.push(element);
        Self(elements)
    }

    /// The individual elements making up this path, in root-to-leaf order.
    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    /// The last element of this path, i.e., the one identifying the node itself within its
    /// immediate parent.
    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    /// Render this path as an RFC 6901 JSON Pointer.
    ///
    /// Key-marker elements are rendered the same as the object member they name, since a JSON
    /// Pointer has no notion of a synthesized key-as-value node.
    pub fn as_json_pointer(&self) -> String {
        let mut p = String::new();
        for element in &self.0 {
            p.push('/');
            match element {
                PathElement::Name(s) | PathElement::Key(s) => p.push_str(&pointer_escape(s)),
                PathElement::Index(i) => p.push_str(&i.to_string()),
            }
        }
        p
    }
}

fn pointer_escape(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for element in &self.0 {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_name_and_index() {
        let path = NormalizedPath::default()
            .push(PathElement::Name("store".to_owned()))
            .push(PathElement::Index(2));
        assert_eq!(path.to_string(), "$['store'][2]");
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_names() {
        let path = NormalizedPath::default().push(PathElement::Name("a'b\\c".to_owned()));
        assert_eq!(path.to_string(), "$['a\\'b\\\\c']");
    }

    #[test]
    fn renders_key_marker() {
        let path = NormalizedPath::default().push(PathElement::Key("id".to_owned()));
        assert_eq!(path.to_string(), "$[~'id']");
    }

    #[test]
    fn json_pointer_escapes_tilde_and_slash() {
        let path = NormalizedPath::default().push(PathElement::Name("a/b~c".to_owned()));
        assert_eq!(path.as_json_pointer(), "/a~1b~0c");
    }
}
