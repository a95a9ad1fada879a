//! A light approximation of I-Regexp (RFC 9485) validation on top of the `regex` crate.
//!
//! RFC 9535's `match`/`search` functions are defined against I-Regexp, a restricted subset of
//! XML Schema regular expressions. There is no I-Regexp crate in the ecosystem this workspace
//! otherwise draws from, so instead of implementing the full I-Regexp grammar, patterns are
//! screened for the regex extensions I-Regexp does not have (backreferences, lookaround, named
//! and atomic groups, possessive quantifiers) before being handed to [`regex::Regex`]. A pattern
//! rejected here, or one that simply fails to compile, is treated as a non-match rather than an
//! error, per RFC 9535 §2.4.6/§2.4.7.
//!
//! Compiled patterns are cached, keyed by the original pattern string, since `match`/`search` are
//! typically called once per filtered child and would otherwise recompile the same pattern for
//! every node in the document.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

const DISALLOWED: &[&str] = &["(?=", "(?!", "(?<=", "(?<!", "(?P<", "(?<", "(?>", "\\1", "\\2"];

fn cache() -> &'static Mutex<HashMap<String, Option<Regex>>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Option<Regex>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    let mut cache = cache().lock().unwrap_or_else(|e| e.into_inner());
    cache
        .entry(pattern.to_owned())
        .or_insert_with(|| {
            if DISALLOWED.iter().any(|needle| pattern.contains(needle)) {
                None
            } else {
                Regex::new(pattern).ok()
            }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::compile;

    #[test]
    fn accepts_plain_patterns() {
        assert!(compile("^a.*b$").is_some());
        assert!(compile("[a-z]+").is_some());
    }

    #[test]
    fn rejects_lookaround_and_backreferences() {
        assert!(compile("foo(?=bar)").is_none());
        assert!(compile("(a)\\1").is_none());
        assert!(compile("(?P<name>a)").is_none());
    }

    #[test]
    fn rejects_invalid_syntax() {
        assert!(compile("(unterminated").is_none());
    }
}
