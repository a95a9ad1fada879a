//! A bounded integer type used for index selectors and integer literals.
//!
//! JSONPath restricts integers to the range of "safe" integers representable without loss as an
//! IEEE 754 double, i.e., `[-(2^53)+1, (2^53)-1]` (RFC 9535 §2.1, RFC 7493 §2.2). Index selectors
//! and numeric filter literals are both bound by this, so the check lives in one place.

const MIN_INT: i64 = -((1i64 << 53) - 1);
const MAX_INT: i64 = (1i64 << 53) - 1;

/// An integer known to fall within the JSONPath-safe range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer(i64);

/// The error produced when a parsed integer literal falls outside the safe range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("integer `{0}` is out of bounds for a JSONPath integer, must be within [{MIN_INT}, {MAX_INT}]")]
pub struct IntegerOutOfBoundsError(pub i64);

impl Integer {
    pub fn new(value: i64) -> Result<Self, IntegerOutOfBoundsError> {
        if (MIN_INT..=MAX_INT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(IntegerOutOfBoundsError(value))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Integer {
    type Error = IntegerOutOfBoundsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Integer> for i64 {
    fn from(i: Integer) -> Self {
        i.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_safe_range() {
        assert!(Integer::new(0).is_ok());
        assert!(Integer::new(MIN_INT).is_ok());
        assert!(Integer::new(MAX_INT).is_ok());
    }

    #[test]
    fn rejects_outside_the_safe_range() {
        assert!(Integer::new(MIN_INT - 1).is_err());
        assert!(Integer::new(MAX_INT + 1).is_err());
    }
}
