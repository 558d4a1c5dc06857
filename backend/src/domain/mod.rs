//! Domain primitives, services and ports.
//!
//! Purpose: hold the confession rules independently of any transport or
//! storage technology. Adapters in `inbound` and `outbound` depend on this
//! module, never the reverse.
//!
//! Public surface:
//! - Confession and ConfessionId: the stored entity and its public id.
//! - SubmissionDraft: raw input plus the single normalisation routine.
//! - ListLimit: bounded page size for listings.
//! - ConfessionService: implementation of the driving ports.
//! - FixedWindowRateLimiter: per-client request allowance.
//! - Error and ErrorCode: transport-agnostic failures.
//! - TraceId: request-scoped correlation identifier.

pub mod confession;
pub mod confession_service;
pub mod error;
pub mod list_limit;
pub mod ports;
pub mod rate_limit;
pub mod submission;
pub mod trace_id;

pub use self::confession::{
    CATEGORY_MAX_LEN, CONFESSION_ID_MAX_LEN, Confession, ConfessionId,
    ConfessionIdValidationError, DEFAULT_CATEGORY, DEFAULT_RECIPIENT, RECIPIENT_MAX_LEN,
};
pub use self::confession_service::{
    ConfessionService, FETCH_FAILED_MESSAGE, SAVE_FAILED_MESSAGE, SCHEMA_FAILED_MESSAGE,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::list_limit::ListLimit;
pub use self::rate_limit::{
    FixedWindowRateLimiter, RATE_LIMIT_MESSAGE, RateLimitDecision, RateLimitPolicy,
};
pub use self::submission::{EMPTY_CONFESSION_MESSAGE, SubmissionDraft};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use confessions::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::invalid_request("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
