//! Axum middleware running a [`Validator`] before the handler
//!
//! # Usage
//!
//! ```rust,ignore
//! let validation = RequestValidation::new(validator);
//! let app = Router::new()
//!     .route("/users", post(create_user))
//!     .layer(middleware::from_fn_with_state(validation, validate_request));
//! ```
//!
//! Context attributes are read from the [`ContextAttributes`] request extension,
//! so a middleware that runs earlier can attach them.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::core::{ContextAttributes, RequestSnapshot, Validator};

/// Bodies larger than this are refused unless configured otherwise
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// State for [`validate_request`]
#[derive(Debug, Clone)]
pub struct RequestValidation {
    validator: Arc<Validator>,
    body_limit: usize,
}

impl RequestValidation {
    pub fn new(validator: Validator) -> Self {
        Self::from_shared(Arc::new(validator))
    }

    pub fn from_shared(validator: Arc<Validator>) -> Self {
        Self {
            validator,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == FORM_CONTENT_TYPE {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn reject(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = match details {
        Some(details) => json!({ "error": error, "details": details }),
        None => json!({ "error": error }),
    };
    (status, Json(body)).into_response()
}

async fn parse_form(bytes: Bytes) -> Result<HashMap<String, String>, Response> {
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from(bytes))
        .map_err(|e| reject(StatusCode::BAD_REQUEST, "Invalid form body", Some(e.to_string())))?;

    match axum::Form::<HashMap<String, String>>::from_request(request, &()).await {
        Ok(axum::Form(form)) => Ok(form),
        Err(e) => {
            tracing::debug!(error = %e, "form body could not be parsed");
            Err(reject(
                StatusCode::BAD_REQUEST,
                "Invalid form body",
                Some(e.body_text()),
            ))
        }
    }
}

fn parse_query(uri: &Uri) -> Result<HashMap<String, String>, Response> {
    match Query::<HashMap<String, String>>::try_from_uri(uri) {
        Ok(Query(params)) => Ok(params),
        Err(e) => {
            tracing::debug!(error = %e, "query string could not be parsed");
            Err(reject(
                StatusCode::BAD_REQUEST,
                "Invalid query string",
                Some(e.body_text()),
            ))
        }
    }
}

/// Build the snapshot validators read from
async fn build_snapshot(
    parts: &axum::http::request::Parts,
    bytes: &Bytes,
) -> Result<RequestSnapshot, Response> {
    let mut snapshot = RequestSnapshot::new().with_params(parse_query(&parts.uri)?);
    if let Some(context) = parts.extensions.get::<ContextAttributes>() {
        snapshot = snapshot.with_context_attributes(context.clone());
    }

    if bytes.is_empty() {
        return Ok(snapshot);
    }

    let snapshot = match body_kind(&parts.headers) {
        BodyKind::Json => match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(body) => snapshot.with_json_body(body),
            Err(e) => {
                tracing::debug!(error = %e, "JSON body could not be parsed");
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    "Invalid JSON",
                    Some(e.to_string()),
                ));
            }
        },
        BodyKind::Form => snapshot.with_form(parse_form(bytes.clone()).await?),
        BodyKind::Other => snapshot.with_body(String::from_utf8_lossy(bytes).into_owned()),
    };
    Ok(snapshot)
}

/// Validate the request, answering 400 on failure and forwarding it otherwise
pub async fn validate_request(
    State(validation): State<RequestValidation>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    if declared_length(&parts.headers).is_some_and(|len| len > validation.body_limit) {
        return reject(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large", None);
    }

    let bytes = match axum::body::to_bytes(body, validation.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "request body could not be read");
            return reject(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body could not be read",
                Some(e.to_string()),
            );
        }
    };

    let snapshot = match build_snapshot(&parts, &bytes).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    match validation.validator.evaluate(&snapshot).into_result() {
        Ok(()) => next.run(Request::from_parts(parts, Body::from(bytes))).await,
        Err(rejection) => {
            tracing::debug!(
                method = %parts.method,
                path = %parts.uri.path(),
                errors = rejection.errors().len(),
                "request failed validation"
            );
            rejection.into_response()
        }
    }
}
