//! Standalone request handler.
//!
//! Runtime-agnostic twin of the axum route: takes a raw HTTP request, does
//! its own method dispatch, CORS, and body parsing, and drives the same
//! caption service. Meant for embedding where no router is running.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;

use crate::dtos::GenerationRequest;
use crate::error::RelayError;
use crate::middleware::cors::apply_cors_headers;
use crate::services::CaptionService;
use crate::startup::MAX_BODY_BYTES;

/// Handles one HTTP request end to end.
///
/// Always attaches the CORS headers; `OPTIONS` yields an empty 204 and any
/// method other than `POST` a 405.
pub async fn handle(service: &CaptionService, request: Request<Body>) -> Response {
    let mut response = dispatch(service, request).await;
    apply_cors_headers(response.headers_mut());
    response
}

async fn dispatch(service: &CaptionService, request: Request<Body>) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    if request.method() != Method::POST {
        return RelayError::MethodNotAllowed.into_response();
    }

    let body = match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            // to_bytes fails for both oversized and unreadable bodies; only
            // the length cap maps to 413.
            let error = if err.into_inner().is::<LengthLimitError>() {
                RelayError::BodyTooLarge
            } else {
                RelayError::InvalidBody
            };
            return error.into_response();
        }
    };

    // An absent body is treated as an empty object, so the prompt check
    // still produces its own message.
    let generation_request: GenerationRequest = if body.is_empty() {
        GenerationRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(_) => return RelayError::InvalidBody.into_response(),
        }
    };

    match service.handle(generation_request).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => err.into_response(),
    }
}
