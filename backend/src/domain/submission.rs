//! Normalisation of raw confession submissions.
//!
//! Every default and validation rule for incoming confessions lives here so
//! both hosting adapters (and the client) agree on a single set of rules.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use super::confession::{
    CATEGORY_MAX_LEN, Confession, ConfessionId, ConfessionIdValidationError, DEFAULT_CATEGORY,
    DEFAULT_RECIPIENT, RECIPIENT_MAX_LEN,
};
use super::Error;

/// Message returned when the confession text is missing or blank.
pub const EMPTY_CONFESSION_MESSAGE: &str = "Please write your confession before submitting";

/// Raw submission as received from a client. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    /// Confession text.
    pub text: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Addressee.
    pub recipient: Option<String>,
    /// RFC 3339 creation time chosen by the client.
    pub timestamp: Option<String>,
    /// Client-chosen external identifier.
    pub id: Option<String>,
}

impl SubmissionDraft {
    /// Draft holding only the confession text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Validate the draft and fill defaults.
    ///
    /// - text is trimmed and must not be blank;
    /// - a blank or missing id is generated from `now`;
    /// - blank category and recipient fall back to their defaults;
    /// - a missing or unparseable timestamp becomes `now`.
    ///
    /// # Errors
    /// Returns [`super::ErrorCode::InvalidRequest`] when the text is blank or
    /// any field does not fit its storage column.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use confessions::domain::{SubmissionDraft, DEFAULT_CATEGORY, DEFAULT_RECIPIENT};
    ///
    /// let confession = SubmissionDraft::with_text("  I left the stove on once.  ")
    ///     .normalize(Utc::now(), &mut rand::thread_rng())
    ///     .expect("valid draft");
    /// assert_eq!(confession.text, "I left the stove on once.");
    /// assert_eq!(confession.category, DEFAULT_CATEGORY);
    /// assert_eq!(confession.recipient, DEFAULT_RECIPIENT);
    /// ```
    pub fn normalize<R: Rng>(self, now: DateTime<Utc>, rng: &mut R) -> Result<Confession, Error> {
        let text = non_blank(self.text)
            .ok_or_else(|| Error::invalid_request(EMPTY_CONFESSION_MESSAGE))?;

        let id = match non_blank(self.id) {
            Some(raw) => ConfessionId::new(raw).map_err(invalid_id)?,
            None => ConfessionId::generate(now, rng),
        };

        let category =
            bounded_or_default(self.category, DEFAULT_CATEGORY, CATEGORY_MAX_LEN, "category")?;
        let recipient = bounded_or_default(
            self.recipient,
            DEFAULT_RECIPIENT,
            RECIPIENT_MAX_LEN,
            "recipient",
        )?;
        let created_at = parse_timestamp(self.timestamp.as_deref()).unwrap_or(now);

        Ok(Confession {
            id,
            text,
            category,
            recipient,
            created_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn bounded_or_default(
    value: Option<String>,
    default: &str,
    max: usize,
    field: &str,
) -> Result<String, Error> {
    match non_blank(value) {
        Some(trimmed) if trimmed.chars().count() > max => Err(Error::invalid_request(format!(
            "{field} must be at most {max} characters"
        ))),
        Some(trimmed) => Ok(trimmed),
        None => Ok(default.to_owned()),
    }
}

fn invalid_id(error: ConfessionIdValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(error) => {
            debug!(%error, value = raw, "ignoring unparseable submission timestamp");
            None
        }
    }
}
