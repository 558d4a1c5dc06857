//! Confession resource shared by every hosting adapter.
//!
//! The standalone server and the function adapter differ only in how they
//! read requests and write responses. Everything between (payload handling,
//! limit parsing, envelopes, status mapping, cross-origin headers) lives here.

use std::sync::Arc;

use actix_web::http::StatusCode;
use mockable::Clock;

use crate::domain::ports::{ConfessionCommand, ConfessionQuery};
use crate::domain::{ApiResult, ErrorCode, ListLimit, SubmissionDraft};
use crate::wire::{
    ConfessionBody, CreatedEnvelope, HealthEnvelope, ListEnvelope, ListParams, ListedConfession,
    SubmissionPayload,
};

/// Message returned when a request body is not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON payload";

/// Cross-origin headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Request/response logic for `/api/confessions` and `/api/health`.
#[derive(Clone)]
pub struct ConfessionsResource {
    command: Arc<dyn ConfessionCommand>,
    query: Arc<dyn ConfessionQuery>,
    clock: Arc<dyn Clock>,
}

impl ConfessionsResource {
    /// Bundle the driving ports behind the resource.
    pub fn new(
        command: Arc<dyn ConfessionCommand>,
        query: Arc<dyn ConfessionQuery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            command,
            query,
            clock,
        }
    }

    /// Handle a submission. Success maps to `201 Created`.
    pub async fn create(&self, payload: SubmissionPayload) -> ApiResult<CreatedEnvelope> {
        let confession = self.command.submit(SubmissionDraft::from(payload)).await?;
        Ok(CreatedEnvelope {
            success: true,
            confession: ConfessionBody::from(confession),
        })
    }

    /// Handle a listing request.
    pub async fn list(&self, params: ListParams) -> ApiResult<ListEnvelope> {
        let limit = ListLimit::parse(params.limit.as_deref());
        let confessions = self.query.list_recent(limit).await?;
        Ok(ListEnvelope {
            success: true,
            confessions: confessions
                .into_iter()
                .map(ListedConfession::from)
                .collect(),
        })
    }

    /// Liveness payload.
    pub fn health(&self) -> HealthEnvelope {
        HealthEnvelope {
            status: "OK".to_owned(),
            timestamp: self.clock.utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockConfessionCommand, MockConfessionQuery};
    use crate::domain::{Confession, ConfessionId, Error};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp")
    }

    fn resource(
        command: MockConfessionCommand,
        query: MockConfessionQuery,
        now: DateTime<Utc>,
    ) -> ConfessionsResource {
        ConfessionsResource::new(Arc::new(command), Arc::new(query), Arc::new(FixedClock(now)))
    }

    #[rstest]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED)]
    #[case(ErrorCode::TooManyRequests, StatusCode::TOO_MANY_REQUESTS)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_matches_error_code(#[case] code: ErrorCode, #[case] expected: StatusCode) {
        assert_eq!(status_for(code), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn create_wraps_the_stored_confession(now: DateTime<Utc>) {
        let mut command = MockConfessionCommand::new();
        command
            .expect_submit()
            .withf(|draft| draft.text.as_deref() == Some("hello there"))
            .times(1)
            .returning(move |_| {
                Ok(Confession {
                    id: ConfessionId::new("confession_5_abcdefghi").expect("valid id"),
                    text: "hello there".to_owned(),
                    category: "uncategorized".to_owned(),
                    recipient: "B Kosal".to_owned(),
                    created_at: now,
                })
            });

        let envelope = resource(command, MockConfessionQuery::new(), now)
            .create(SubmissionPayload {
                confession: Some("hello there".to_owned()),
                ..SubmissionPayload::default()
            })
            .await
            .expect("create succeeds");

        assert!(envelope.success);
        assert_eq!(envelope.confession.confession_id, "confession_5_abcdefghi");
        assert_eq!(envelope.confession.created_at, now);
    }

    #[rstest]
    #[case(None, 50)]
    #[case(Some("abc"), 50)]
    #[case(Some("-1"), 50)]
    #[case(Some("2"), 2)]
    #[case(Some("9000"), 500)]
    #[tokio::test]
    async fn list_parses_the_limit(
        now: DateTime<Utc>,
        #[case] raw: Option<&str>,
        #[case] expected: u32,
    ) {
        let mut query = MockConfessionQuery::new();
        query
            .expect_list_recent()
            .withf(move |limit| limit.get() == expected)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let envelope = resource(MockConfessionCommand::new(), query, now)
            .list(ListParams {
                limit: raw.map(str::to_owned),
            })
            .await
            .expect("list succeeds");

        assert!(envelope.success);
        assert!(envelope.confessions.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn list_propagates_domain_errors(now: DateTime<Utc>) {
        let mut query = MockConfessionQuery::new();
        query
            .expect_list_recent()
            .returning(|_| Err(Error::internal("Failed to fetch confessions")));

        let error = resource(MockConfessionCommand::new(), query, now)
            .list(ListParams::default())
            .await
            .expect_err("list fails");

        assert_eq!(status_for(error.code()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    fn health_reports_ok_with_clock_time(now: DateTime<Utc>) {
        let health = resource(MockConfessionCommand::new(), MockConfessionQuery::new(), now)
            .health();

        assert_eq!(health.status, "OK");
        assert_eq!(health.timestamp, now);
    }
}
