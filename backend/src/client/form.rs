//! Submit flow for the confession form.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mockable::Clock;
use tracing::{debug, warn};

use super::ConfessionsApi;
use crate::domain::{ConfessionId, DEFAULT_CATEGORY, DEFAULT_RECIPIENT};
use crate::wire::{ConfessionBody, ListedConfession, SubmissionPayload};

/// Shown when the draft is blank.
pub const BLANK_DRAFT_MESSAGE: &str = "Please write your confession before submitting.";
/// Shown when the draft is shorter than [`MIN_CONFESSION_CHARS`].
pub const SHORT_DRAFT_MESSAGE: &str =
    "Your confession seems a bit short. Please share more if you feel comfortable.";
/// Shown whenever the send fails. Server and transport detail only reaches
/// the log.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send confession. Please try again.";
/// Shown after a successful send.
pub const SENT_MESSAGE: &str = "Your confession has been sent anonymously.";
/// Drafts shorter than this (after trimming) are held back.
pub const MIN_CONFESSION_CHARS: usize = 10;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Something the user may want to change.
    Warning,
    /// The action failed.
    Error,
}

/// Message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text.
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed validation and nothing was sent.
    Blocked(Notification),
    /// Another submission is still in flight.
    Busy,
    /// The confession was stored.
    Sent {
        /// Stored record.
        confession: ConfessionBody,
        /// Refreshed list for re-rendering; empty when the refresh failed.
        confessions: Vec<ListedConfession>,
        /// Confirmation for the user.
        notification: Notification,
    },
    /// The server or network refused the submission; the draft is kept.
    Failed(Notification),
}

/// Check a draft before it is sent. Returns the trimmed text.
///
/// # Errors
/// Returns an error notification for blank drafts and a warning for drafts
/// shorter than [`MIN_CONFESSION_CHARS`].
pub fn validate_draft(text: &str) -> Result<&str, Notification> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Notification::new(
            NotificationLevel::Error,
            BLANK_DRAFT_MESSAGE,
        ));
    }
    if trimmed.chars().count() < MIN_CONFESSION_CHARS {
        return Err(Notification::new(
            NotificationLevel::Warning,
            SHORT_DRAFT_MESSAGE,
        ));
    }
    Ok(trimmed)
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives submissions from the confession form.
pub struct FormController<A> {
    api: Arc<A>,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
}

impl<A> FormController<A>
where
    A: ConfessionsApi,
{
    /// Controller sending through `api` and stamping drafts with `clock`.
    pub fn new(api: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Build the request body the page would send for `text`.
    pub fn build_payload(&self, text: &str, category: Option<&str>) -> SubmissionPayload {
        let now = self.clock.utc();
        let id = ConfessionId::generate(now, &mut rand::thread_rng());
        let category = category
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        SubmissionPayload {
            confession: Some(text.to_owned()),
            category: Some(category.to_owned()),
            recipient: Some(DEFAULT_RECIPIENT.to_owned()),
            id: Some(id.into_inner()),
            timestamp: Some(now.to_rfc3339()),
        }
    }

    /// Validate and send `text`, then refresh the list.
    pub async fn submit(&self, text: &str, category: Option<&str>) -> SubmitOutcome {
        let text = match validate_draft(text) {
            Ok(text) => text,
            Err(notification) => return SubmitOutcome::Blocked(notification),
        };
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("submission already in flight");
            return SubmitOutcome::Busy;
        };

        let payload = self.build_payload(text, category);
        let confession = match self.api.submit(&payload).await {
            Ok(confession) => confession,
            Err(err) => {
                warn!(error = %err, "confession submission failed");
                return SubmitOutcome::Failed(Notification::new(
                    NotificationLevel::Error,
                    SEND_FAILED_MESSAGE,
                ));
            }
        };

        let confessions = self.refresh().await;
        SubmitOutcome::Sent {
            confession,
            confessions,
            notification: Notification::new(NotificationLevel::Info, SENT_MESSAGE),
        }
    }

    /// Fetch the public list; failures render as an empty list.
    pub async fn refresh(&self) -> Vec<ListedConfession> {
        self.api.list(None).await.unwrap_or_else(|err| {
            warn!(error = %err, "failed to fetch confessions");
            Vec::new()
        })
    }
}
