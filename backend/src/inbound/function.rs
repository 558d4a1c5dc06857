//! Single-invocation adapter for serverless and CGI hosting.
//!
//! One [`FunctionHandler`] lives for the whole process and serves any number
//! of [`FunctionRequest`]s. Storage is prepared lazily on the first
//! non-preflight request; a failure there is logged and the request carries
//! on, surfacing any storage error through the normal error path.

use std::io::{self, Read, Write};
use std::net::IpAddr;
use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::web::Query;
use mockable::Env;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

use crate::domain::ports::SchemaBootstrap;
use crate::domain::{
    ApiResult, Error, FixedWindowRateLimiter, RATE_LIMIT_MESSAGE, RateLimitDecision,
    TRACE_ID_HEADER, TraceId,
};
use crate::inbound::http::app::JSON_BODY_LIMIT;
use crate::inbound::resource::{
    CORS_HEADERS, ConfessionsResource, INVALID_JSON_MESSAGE, status_for,
};
use crate::wire::{ErrorEnvelope, ListParams, SubmissionPayload};

/// Methods advertised on `405 Method Not Allowed`.
pub const ALLOWED_METHODS: &str = "GET, POST";

/// Transport-neutral request handed to the function.
#[derive(Debug, Clone)]
pub struct FunctionRequest {
    /// Request method.
    pub method: Method,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    /// Raw request body.
    pub body: Vec<u8>,
    /// Client network address, when the host provides one.
    pub client: Option<IpAddr>,
}

impl FunctionRequest {
    /// Request with `method` and nothing else.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: None,
            body: Vec::new(),
            client: None,
        }
    }

    /// Attach a raw query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach a request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach the client address.
    #[must_use]
    pub fn with_client(mut self, client: IpAddr) -> Self {
        self.client = Some(client);
        self
    }

    /// Build a request from CGI/1.1 meta-variables, reading at most
    /// `CONTENT_LENGTH` bytes (capped at the JSON body limit) from `stdin`.
    ///
    /// A missing or unknown `REQUEST_METHOD` is treated as `GET`; an
    /// unparseable `REMOTE_ADDR` leaves the client unknown.
    ///
    /// # Errors
    /// Propagates failures reading `stdin`.
    pub fn from_cgi<E: Env, R: Read>(env: &E, stdin: R) -> io::Result<Self> {
        let method = env
            .string("REQUEST_METHOD")
            .and_then(|value| Method::from_bytes(value.trim().as_bytes()).ok())
            .unwrap_or(Method::GET);
        let query = env
            .string("QUERY_STRING")
            .filter(|value| !value.is_empty());
        let client = env
            .string("REMOTE_ADDR")
            .and_then(|value| value.trim().parse().ok());
        let length = env
            .string("CONTENT_LENGTH")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0)
            .min(u64::try_from(JSON_BODY_LIMIT).unwrap_or(u64::MAX));

        let mut body = Vec::new();
        stdin.take(length).read_to_end(&mut body)?;
        Ok(Self {
            method,
            query,
            body,
            client,
        })
    }
}

/// Transport-neutral response produced by the function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl FunctionResponse {
    fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
                body,
            },
            Err(err) => {
                error!(error = %err, "failed to serialise function response");
                Self::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn from_error(error: &Error) -> Self {
        let mut response = Self::json(
            status_for(error.code()),
            &ErrorEnvelope {
                error: error.message().to_owned(),
            },
        );
        if let Some(trace_id) = error.trace_id() {
            response.set_header(TRACE_ID_HEADER, trace_id);
        }
        response
    }

    fn from_result<T: Serialize>(status: StatusCode, result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => Self::json(status, &value),
            Err(error) => Self::from_error(&error),
        }
    }

    /// Replace or add a header, matching names case-insensitively.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name.to_owned(), value)),
        }
    }

    /// Look up a header value, matching names case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Write the response in CGI/1.1 form: a `Status` line, headers, a blank
    /// line and the body.
    pub fn write_cgi<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(
            out,
            "Status: {} {}\r\n",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        )?;
        for (name, value) in &self.headers {
            write!(out, "{name}: {value}\r\n")?;
        }
        write!(out, "\r\n")?;
        out.write_all(&self.body)?;
        out.flush()
    }
}

/// Process-wide function entry point.
pub struct FunctionHandler {
    resource: ConfessionsResource,
    bootstrap: Arc<dyn SchemaBootstrap>,
    limiter: Arc<FixedWindowRateLimiter>,
    schema_ready: OnceCell<()>,
}

impl FunctionHandler {
    /// Assemble the handler from its collaborators.
    pub fn new(
        resource: ConfessionsResource,
        bootstrap: Arc<dyn SchemaBootstrap>,
        limiter: Arc<FixedWindowRateLimiter>,
    ) -> Self {
        Self {
            resource,
            bootstrap,
            limiter,
            schema_ready: OnceCell::new(),
        }
    }

    /// Serve one request.
    pub async fn handle(&self, request: FunctionRequest) -> FunctionResponse {
        let trace_id = TraceId::generate();
        let mut response = TraceId::scope(trace_id, self.dispatch(request)).await;
        for (name, value) in CORS_HEADERS {
            response.set_header(name, value);
        }
        response.set_header(TRACE_ID_HEADER, trace_id.to_string());
        response
    }

    async fn dispatch(&self, request: FunctionRequest) -> FunctionResponse {
        if request.method == Method::OPTIONS {
            return FunctionResponse::empty(StatusCode::OK);
        }

        let mut remaining = None;
        if let Some(client) = request.client {
            match self.limiter.check(client) {
                RateLimitDecision::Limited { retry_after_secs } => {
                    warn!(%client, retry_after_secs, "rate limit exceeded");
                    let error = Error::too_many_requests(RATE_LIMIT_MESSAGE);
                    let mut response = FunctionResponse::from_error(&error);
                    response.set_header("Retry-After", retry_after_secs.to_string());
                    return response;
                }
                RateLimitDecision::Allowed { remaining: left } => remaining = Some(left),
            }
        }

        self.ensure_schema_ready().await;

        let mut response = match request.method {
            Method::POST => self.create(&request.body).await,
            Method::GET => {
                let params = parse_list_params(request.query.as_deref());
                FunctionResponse::from_result(StatusCode::OK, self.resource.list(params).await)
            }
            other => {
                let error = Error::method_not_allowed(format!("Method {other} Not Allowed"));
                let mut response = FunctionResponse::from_error(&error);
                response.set_header("Allow", ALLOWED_METHODS);
                response
            }
        };

        if let Some(left) = remaining {
            response.set_header(
                "X-RateLimit-Limit",
                self.limiter.policy().max_requests().to_string(),
            );
            response.set_header("X-RateLimit-Remaining", left.to_string());
        }
        response
    }

    async fn create(&self, body: &[u8]) -> FunctionResponse {
        let payload = match parse_payload(body) {
            Ok(payload) => payload,
            Err(error) => return FunctionResponse::from_error(&error),
        };
        FunctionResponse::from_result(StatusCode::CREATED, self.resource.create(payload).await)
    }

    /// Prepare storage until one attempt succeeds. Failures are logged and
    /// retried on the next request.
    async fn ensure_schema_ready(&self) {
        let prepared = self
            .schema_ready
            .get_or_try_init(|| self.bootstrap.ensure_schema())
            .await;
        if let Err(err) = prepared {
            error!(error = %err, "storage preparation failed; continuing");
        }
    }
}

/// Decode a submission body. An empty body is an empty submission.
fn parse_payload(body: &[u8]) -> ApiResult<SubmissionPayload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubmissionPayload::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "rejecting malformed JSON payload");
        Error::invalid_request(INVALID_JSON_MESSAGE)
    })
}

/// Decode the listing query. Unreadable query strings select the defaults.
fn parse_list_params(query: Option<&str>) -> ListParams {
    let Some(query) = query else {
        return ListParams::default();
    };
    match Query::<ListParams>::from_query(query) {
        Ok(params) => params.into_inner(),
        Err(err) => {
            debug!(error = %err, "ignoring unreadable query string");
            ListParams::default()
        }
    }
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod tests;
