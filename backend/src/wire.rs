//! JSON wire format shared by the inbound adapters and the HTTP client.
//!
//! Field names are part of the public contract; keep them stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Confession, SubmissionDraft};

/// Body of `POST /api/confessions`. Every field is optional on the wire;
/// validation happens in the domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionPayload {
    /// Confession text; required and non-blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "I left the stove on once.")]
    pub confession: Option<String>,
    /// Category label; defaults to `uncategorized`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Addressee; defaults to `B Kosal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Client-chosen public identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// RFC 3339 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<SubmissionPayload> for SubmissionDraft {
    fn from(payload: SubmissionPayload) -> Self {
        Self {
            text: payload.confession,
            category: payload.category,
            recipient: payload.recipient,
            timestamp: payload.timestamp,
            id: payload.id,
        }
    }
}

/// Query parameters of `GET /api/confessions`.
///
/// `limit` stays a raw string so non-numeric values fall back to the default
/// instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of confessions (default 50, at most 500).
    pub limit: Option<String>,
}

/// A stored confession as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConfessionBody {
    /// Public identifier.
    #[schema(example = "confession_1700000000000_k3j9x0a2b")]
    pub confession_id: String,
    /// Confession text.
    pub confession: String,
    /// Category label.
    pub category: String,
    /// Addressee.
    pub recipient: String,
    /// Creation time (RFC 3339, UTC).
    pub created_at: DateTime<Utc>,
}

impl From<Confession> for ConfessionBody {
    fn from(confession: Confession) -> Self {
        Self {
            confession_id: confession.id.into_inner(),
            confession: confession.text,
            category: confession.category,
            recipient: confession.recipient,
            created_at: confession.created_at,
        }
    }
}

/// One entry of a listing. Listings name the public identifier `id` and the
/// creation time `timestamp`; the page reads those keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListedConfession {
    /// Public identifier.
    #[schema(example = "confession_1700000000000_k3j9x0a2b")]
    pub id: String,
    /// Confession text.
    pub confession: String,
    /// Category label.
    pub category: String,
    /// Addressee.
    pub recipient: String,
    /// Creation time (RFC 3339, UTC).
    pub timestamp: DateTime<Utc>,
}

impl From<Confession> for ListedConfession {
    fn from(confession: Confession) -> Self {
        Self {
            id: confession.id.into_inner(),
            confession: confession.text,
            category: confession.category,
            recipient: confession.recipient,
            timestamp: confession.created_at,
        }
    }
}

/// Response of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedEnvelope {
    /// Always `true`.
    pub success: bool,
    /// The stored confession.
    pub confession: ConfessionBody,
}

/// Response of a successful listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Newest first.
    pub confessions: Vec<ListedConfession>,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthEnvelope {
    /// Always `OK`.
    #[schema(example = "OK")]
    pub status: String,
    /// Server time (RFC 3339).
    pub timestamp: DateTime<Utc>,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Human-readable message.
    #[schema(example = "Please write your confession before submitting")]
    pub error: String,
}
