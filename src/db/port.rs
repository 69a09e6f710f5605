//! Storage port used by the services and HTTP handlers.
//!
//! [`crate::db::Store`] implements it over SeaORM; [`crate::db::InMemoryStore`]
//! is a fake for tests. Every method reports failures as [`BookingError`] so
//! callers can tell "no rows" apart from "store unreachable".

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::BookingError;
use crate::models::{
    DateRange, GuestDetails, NewReservation, Reservation, Room, RoomRestriction, User,
};

pub type StoreResult<T> = Result<T, BookingError>;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn all_rooms(&self) -> StoreResult<Vec<Room>>;

    async fn get_room_by_id(&self, id: i32) -> StoreResult<Room>;

    async fn room_is_available(&self, room_id: i32, range: &DateRange) -> StoreResult<bool>;

    async fn available_rooms(&self, range: &DateRange) -> StoreResult<Vec<Room>>;

    /// Inserts the reservation and its restriction atomically.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown room,
    /// [`BookingError::RoomUnavailable`] when the range overlaps an existing
    /// restriction, [`BookingError::StoreError`] otherwise. Nothing is written
    /// on error.
    async fn create_reservation(&self, new: &NewReservation) -> StoreResult<i32>;

    async fn get_reservation_by_id(&self, id: i32) -> StoreResult<Reservation>;

    async fn all_reservations(&self) -> StoreResult<Vec<Reservation>>;

    async fn all_new_reservations(&self) -> StoreResult<Vec<Reservation>>;

    async fn update_reservation(&self, id: i32, guest: &GuestDetails) -> StoreResult<()>;

    /// Deletes a reservation and its restriction.
    async fn delete_reservation(&self, id: i32) -> StoreResult<()>;

    async fn update_processed(&self, id: i32, processed: bool) -> StoreResult<()>;

    /// Restrictions of `room_id` overlapping `range`, ordered by start date.
    async fn restrictions_for_room_by_date(
        &self,
        room_id: i32,
        range: &DateRange,
    ) -> StoreResult<Vec<RoomRestriction>>;

    /// Adds an owner block for the night of `date`.
    async fn insert_block(&self, room_id: i32, date: NaiveDate) -> StoreResult<i32>;

    /// Removes an owner block. Restrictions belonging to reservations are
    /// never removed here.
    async fn delete_block(&self, id: i32) -> StoreResult<()>;

    async fn get_user_by_id(&self, id: i32) -> StoreResult<User>;

    async fn update_user(&self, user: &User) -> StoreResult<()>;

    /// Returns the user id and stored password hash on success.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidCredentials`] for an unknown email or a wrong
    /// password.
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<(i32, String)>;
}
