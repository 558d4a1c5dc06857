//! Confession API handlers.
//!
//! ```text
//! POST /api/confessions {"confession":"...","category":"..."}
//! GET /api/confessions?limit=20
//! ```
//!
//! Any other method on the collection gets `405` with an `Allow` header.

use actix_web::http::header::{ALLOW, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, ResponseError, get, post, web};

use crate::domain::Error;
use crate::inbound::function::ALLOWED_METHODS;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::wire::{
    CreatedEnvelope, ErrorEnvelope, ListEnvelope, ListParams, SubmissionPayload,
};

/// Submit a new confession.
#[utoipa::path(
    post,
    path = "/api/confessions",
    request_body = SubmissionPayload,
    responses(
        (status = 201, description = "Confession stored", body = CreatedEnvelope),
        (status = 400, description = "Blank text, oversized field or malformed JSON", body = ErrorEnvelope),
        (status = 429, description = "Rate limit exceeded", body = ErrorEnvelope,
            headers(("Retry-After" = u64, description = "Seconds until the window reopens"))),
        (status = 500, description = "Storage failure", body = ErrorEnvelope)
    ),
    tags = ["confessions"],
    operation_id = "createConfession"
)]
#[post("/confessions")]
pub async fn create_confession(
    state: web::Data<HttpState>,
    payload: web::Json<SubmissionPayload>,
) -> ApiResult<HttpResponse> {
    let envelope = state.resource.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(envelope))
}

/// List recent confessions, newest first.
#[utoipa::path(
    get,
    path = "/api/confessions",
    params(ListParams),
    responses(
        (status = 200, description = "Recent confessions", body = ListEnvelope),
        (status = 429, description = "Rate limit exceeded", body = ErrorEnvelope),
        (status = 500, description = "Storage failure", body = ErrorEnvelope)
    ),
    tags = ["confessions"],
    operation_id = "listConfessions"
)]
#[get("/confessions")]
pub async fn list_confessions(
    state: web::Data<HttpState>,
    query: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let envelope = state.resource.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

/// Catch-all for unsupported methods on `/api/confessions`.
///
/// Register after [`create_confession`] and [`list_confessions`] so it only
/// sees what they reject.
pub async fn confessions_method_not_allowed(req: HttpRequest) -> HttpResponse {
    let error = Error::method_not_allowed(format!("Method {} Not Allowed", req.method()));
    let mut response = error.error_response();
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}
