//! Confession entity and its external identifier.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

/// Category stored when the submitter picks none.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Recipient stored when the submitter names none.
pub const DEFAULT_RECIPIENT: &str = "B Kosal";

/// Column width of `confessions.confession_id`.
pub const CONFESSION_ID_MAX_LEN: usize = 255;

/// Column width of `confessions.category`.
pub const CATEGORY_MAX_LEN: usize = 50;

/// Column width of `confessions.recipient`.
pub const RECIPIENT_MAX_LEN: usize = 100;

const ID_PREFIX: &str = "confession";
const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Validation failures for [`ConfessionId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfessionIdValidationError {
    /// Identifier is empty once trimmed.
    #[error("confession id must not be empty")]
    Empty,
    /// Identifier carries leading or trailing whitespace.
    #[error("confession id must not contain surrounding whitespace")]
    SurroundingWhitespace,
    /// Identifier does not fit the storage column.
    #[error("confession id must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Public, unique identifier of a confession.
///
/// Generated identifiers follow `confession_<epoch-ms>_<9 base-36 chars>`;
/// client-supplied identifiers only need to be non-empty, trimmed, and fit
/// the column.
///
/// # Examples
/// ```
/// use confessions::domain::ConfessionId;
///
/// let id = ConfessionId::new("confession_1700000000000_abc123xyz").expect("valid id");
/// assert_eq!(id.as_str(), "confession_1700000000000_abc123xyz");
/// assert!(ConfessionId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfessionId(String);

impl ConfessionId {
    /// Validate and wrap an identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfessionIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ConfessionIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(ConfessionIdValidationError::SurroundingWhitespace);
        }
        if raw.chars().count() > CONFESSION_ID_MAX_LEN {
            return Err(ConfessionIdValidationError::TooLong {
                max: CONFESSION_ID_MAX_LEN,
            });
        }
        Ok(Self(raw))
    }

    /// Generate an identifier stamped with `now`.
    pub fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("{ID_PREFIX}_{}_{suffix}", now.timestamp_millis()))
    }

    /// Wrap an identifier read back from storage without validating it.
    ///
    /// Rows written by older deployments stored client identifiers verbatim,
    /// surrounding whitespace included, and must still be listable.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConfessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ConfessionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A normalised confession, either about to be stored or read back.
///
/// ## Invariants
/// - `text` is trimmed and non-empty.
/// - `category` and `recipient` are never blank; defaults fill the gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confession {
    /// External identifier.
    pub id: ConfessionId,
    /// Trimmed confession text.
    pub text: String,
    /// Category label.
    pub category: String,
    /// Person the confession is addressed to.
    pub recipient: String,
    /// Creation time; defines list order.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    #[case("", ConfessionIdValidationError::Empty)]
    #[case("   ", ConfessionIdValidationError::Empty)]
    #[case(" confession_1 ", ConfessionIdValidationError::SurroundingWhitespace)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: ConfessionIdValidationError) {
        assert_eq!(ConfessionId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_ids_wider_than_the_column() {
        let raw = "x".repeat(CONFESSION_ID_MAX_LEN + 1);
        assert_eq!(
            ConfessionId::new(raw),
            Err(ConfessionIdValidationError::TooLong {
                max: CONFESSION_ID_MAX_LEN
            })
        );
    }

    #[rstest]
    fn generated_ids_follow_the_public_format() {
        let now = Utc
            .timestamp_millis_opt(1_700_000_000_123)
            .single()
            .expect("valid timestamp");
        let mut rng = SmallRng::seed_from_u64(7);

        let id = ConfessionId::generate(now, &mut rng);
        let parts: Vec<&str> = id.as_str().split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "confession");
        assert_eq!(parts[1], "1700000000123");
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
        assert!(ConfessionId::new(id.as_str()).is_ok());
    }

    #[rstest]
    fn generated_ids_differ_between_draws() {
        let now = Utc::now();
        let mut rng = SmallRng::seed_from_u64(42);
        let first = ConfessionId::generate(now, &mut rng);
        let second = ConfessionId::generate(now, &mut rng);
        assert_ne!(first, second);
    }
}
