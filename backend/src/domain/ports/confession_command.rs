//! Driving port for submitting confessions.
//!
//! Inbound adapters hand raw drafts to this port; normalisation, storage
//! and error mapping stay behind it.

use async_trait::async_trait;

use crate::domain::{Confession, Error, SubmissionDraft};

/// Domain use-case port for creating confessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfessionCommand: Send + Sync {
    /// Normalise and store a draft, returning the stored confession.
    async fn submit(&self, draft: SubmissionDraft) -> Result<Confession, Error>;
}

/// Fixture command that normalises drafts without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConfessionCommand;

#[async_trait]
impl ConfessionCommand for FixtureConfessionCommand {
    async fn submit(&self, draft: SubmissionDraft) -> Result<Confession, Error> {
        let now = chrono::Utc::now();
        draft.normalize(now, &mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_CATEGORY, ErrorCode};

    #[tokio::test]
    async fn fixture_command_applies_defaults() {
        let confession = FixtureConfessionCommand
            .submit(SubmissionDraft::with_text("I sing in the lift"))
            .await
            .expect("fixture submit");

        assert_eq!(confession.text, "I sing in the lift");
        assert_eq!(confession.category, DEFAULT_CATEGORY);
    }

    #[tokio::test]
    async fn fixture_command_rejects_blank_text() {
        let error = FixtureConfessionCommand
            .submit(SubmissionDraft::default())
            .await
            .expect_err("blank draft rejected");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
