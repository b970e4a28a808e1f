//! Primary key identifiers taken from request paths

use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Primary key of a `sujet` or `action` row.
///
/// Both tables use integer keys; the value is bound as `BIGINT`, which
/// Postgres compares against `INTEGER` columns without a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse an id from a path segment.
    ///
    /// # Example
    /// ```
    /// use actionplan_server::models::RecordId;
    ///
    /// assert_eq!(RecordId::parse("42").unwrap().get(), 42);
    /// assert!(RecordId::parse("abc").is_err());
    /// assert!(RecordId::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }

        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
