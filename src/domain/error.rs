use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

use crate::forms::FormErrors;

/// Errors produced by availability checks, the reservation writer and the
/// booking flow. All of them are recovered at the request boundary.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Validation failed: {0}")]
    ValidationFailed(FormErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("Room {room_id} is not available for the requested dates")]
    RoomUnavailable { room_id: i32 },

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("No reservation in progress")]
    SessionMissing,

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<sea_orm::DbErr> for BookingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl From<anyhow::Error> for BookingError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Self>() {
            Ok(booking) => booking,
            Err(other) => Self::StoreError(format!("{other:#}")),
        }
    }
}

impl BookingError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreError(_))
    }

    /// Text safe to show to a visitor. Store faults are not echoed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) | Self::NotFound(msg) => msg.clone(),
            Self::InvalidRange { .. } | Self::InvalidCredentials => self.to_string(),
            Self::ValidationFailed(_) => "Please correct the errors in the form".to_string(),
            Self::RoomUnavailable { .. } => {
                "Sorry, that room is no longer available for those dates".to_string()
            }
            Self::SessionMissing => "Can't get reservation from session".to_string(),
            Self::StoreError(_) => "Something went wrong, please try again later".to_string(),
        }
    }
}
