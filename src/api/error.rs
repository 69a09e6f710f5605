use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::fmt;
use tower_sessions::Session;
use tracing::{error, warn};

use crate::domain::BookingError;
use crate::session;

/// Failures that cannot be turned into a redirect, answered with a plain status.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

/// Turns a failed page request into a redirect to `location` with an error
/// notice for the next page. Store faults are logged with their detail,
/// visitors only see a generic message.
pub async fn recover(session: &Session, err: BookingError, location: &str) -> Response {
    match &err {
        BookingError::StoreError(detail) => {
            error!(error = %detail, redirect = location, "Request failed");
        }
        other => warn!(error = %other, redirect = location, "Request rejected"),
    }

    if let Err(e) = session::put_error(session, err.user_message()).await {
        return ApiError::internal(e.to_string()).into_response();
    }

    Redirect::to(location).into_response()
}
