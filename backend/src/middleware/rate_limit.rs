//! Per-client rate limiting for the API scope.
//!
//! Clients are keyed by the connection's peer address. Requests without one
//! (for example in-process test requests) share a single unspecified-address
//! bucket. Admitted responses carry `X-RateLimit-Limit` and
//! `X-RateLimit-Remaining`; refused requests get `429` with `Retry-After` and
//! never reach the wrapped service.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::{
    Error as DomainError, FixedWindowRateLimiter, RATE_LIMIT_MESSAGE, RateLimitDecision,
};

/// Header announcing the per-window allowance.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Header announcing the requests left in the current window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Key used when the peer address is unknown.
pub(crate) fn client_key(peer: Option<IpAddr>) -> IpAddr {
    peer.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn insert_number(headers: &mut HeaderMap, name: &'static str, value: impl Into<u64>) {
    headers.insert(HeaderName::from_static(name), HeaderValue::from(value.into()));
}

/// Rate limit middleware factory sharing one limiter across workers.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<FixedWindowRateLimiter>,
}

impl RateLimit {
    /// Wrap `limiter`; clone the `Arc` into every worker's app factory.
    pub fn new(limiter: Arc<FixedWindowRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<FixedWindowRateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(req.peer_addr().map(|addr| addr.ip()));
        let max_requests = self.limiter.policy().max_requests();

        match self.limiter.check(client) {
            RateLimitDecision::Limited { retry_after_secs } => {
                warn!(%client, path = req.path(), retry_after_secs, "rate limit exceeded");
                let error = DomainError::too_many_requests(RATE_LIMIT_MESSAGE);
                let mut res = req.into_response(error.error_response());
                let headers = res.headers_mut();
                headers.insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
                insert_number(headers, RATE_LIMIT_LIMIT_HEADER, max_requests);
                insert_number(headers, RATE_LIMIT_REMAINING_HEADER, 0_u32);
                Box::pin(ready(Ok(res.map_into_right_body())))
            }
            RateLimitDecision::Allowed { remaining } => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    let headers = res.headers_mut();
                    insert_number(headers, RATE_LIMIT_LIMIT_HEADER, max_requests);
                    insert_number(headers, RATE_LIMIT_REMAINING_HEADER, remaining);
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}
