//! Typed access to the values the booking flow keeps in the session.

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

use crate::constants::session as keys;
use crate::domain::{BookingError, CommittedReservation, DraftReservation};

impl From<tower_sessions::session::Error> for BookingError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::StoreError(format!("Session error: {err}"))
    }
}

/// One-shot messages shown on the next rendered page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Notices {
    pub flash: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

async fn put<T: Serialize + Send + Sync>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), BookingError> {
    session.insert(key, value).await?;
    Ok(())
}

async fn take<T: DeserializeOwned>(session: &Session, key: &str) -> Result<Option<T>, BookingError> {
    Ok(session.remove::<T>(key).await?)
}

pub async fn load_draft(session: &Session) -> Result<Option<DraftReservation>, BookingError> {
    Ok(session.get::<DraftReservation>(keys::DRAFT).await?)
}

/// The draft, or [`BookingError::SessionMissing`] when the visitor skipped a step.
pub async fn require_draft(session: &Session) -> Result<DraftReservation, BookingError> {
    load_draft(session).await?.ok_or(BookingError::SessionMissing)
}

pub async fn save_draft(session: &Session, draft: &DraftReservation) -> Result<(), BookingError> {
    put(session, keys::DRAFT, draft).await
}

pub async fn clear_draft(session: &Session) -> Result<(), BookingError> {
    take::<DraftReservation>(session, keys::DRAFT).await?;
    Ok(())
}

pub async fn save_summary(
    session: &Session,
    committed: &CommittedReservation,
) -> Result<(), BookingError> {
    put(session, keys::SUMMARY, committed).await
}

pub async fn take_summary(session: &Session) -> Result<Option<CommittedReservation>, BookingError> {
    take(session, keys::SUMMARY).await
}

pub async fn put_flash(session: &Session, message: impl Into<String>) -> Result<(), BookingError> {
    let message: String = message.into();
    put(session, keys::FLASH, &message).await
}

pub async fn put_warning(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), BookingError> {
    let message: String = message.into();
    put(session, keys::WARNING, &message).await
}

pub async fn put_error(session: &Session, message: impl Into<String>) -> Result<(), BookingError> {
    let message: String = message.into();
    put(session, keys::ERROR, &message).await
}

pub async fn take_notices(session: &Session) -> Result<Notices, BookingError> {
    Ok(Notices {
        flash: take(session, keys::FLASH).await?,
        warning: take(session, keys::WARNING).await?,
        error: take(session, keys::ERROR).await?,
    })
}

pub async fn user_id(session: &Session) -> Result<Option<i32>, BookingError> {
    Ok(session.get::<i32>(keys::USER_ID).await?)
}

/// Stores the user id under a fresh session id.
pub async fn log_in(session: &Session, user_id: i32) -> Result<(), BookingError> {
    session.cycle_id().await?;
    put(session, keys::USER_ID, &user_id).await
}

pub async fn log_out(session: &Session) -> Result<(), BookingError> {
    session.flush().await?;
    Ok(())
}
