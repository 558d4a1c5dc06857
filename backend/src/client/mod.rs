//! Client-side orchestration for the confession form.
//!
//! [`FormController`] owns the submit flow the browser page implements:
//! soft validation, an in-flight guard and a refresh of the public list
//! after a successful send. It talks to the server through the
//! [`ConfessionsApi`] port; [`HttpConfessionsClient`] is the reqwest-backed
//! adapter used by the `confess` binary.

mod display;
mod form;
mod http;

use async_trait::async_trait;

use crate::domain::ports::define_port_error;
use crate::wire::{ConfessionBody, ListedConfession, SubmissionPayload};

pub use display::{CharCountLevel, ConfessionStats, category_badge, display_number, time_ago};
pub use form::{
    BLANK_DRAFT_MESSAGE, FormController, MIN_CONFESSION_CHARS, Notification, NotificationLevel,
    SEND_FAILED_MESSAGE, SENT_MESSAGE, SHORT_DRAFT_MESSAGE, SubmitOutcome, validate_draft,
};
pub use http::HttpConfessionsClient;

define_port_error! {
    /// Errors raised while talking to the confessions API.
    pub enum ClientError {
        /// The server answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "server rejected the request with status {status}: {message}",
        /// The request never completed.
        Transport { message: String } => "transport failure: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "invalid response: {message}",
    }
}

/// Remote confessions API as seen by the form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfessionsApi: Send + Sync {
    /// Submit a confession and return the stored record.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ConfessionBody, ClientError>;

    /// Fetch recent confessions, newest first.
    async fn list(&self, limit: Option<u32>) -> Result<Vec<ListedConfession>, ClientError>;
}
