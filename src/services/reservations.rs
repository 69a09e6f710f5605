use std::sync::Arc;
use tracing::{info, warn};

use super::mailer::Mailer;
use super::room_locks::RoomLocks;
use crate::db::BookingStore;
use crate::domain::{BookingError, CommittedReservation};
use crate::models::NewReservation;

/// Write side of booking. Serializes writers per room and lets the store
/// re-check for overlaps inside its transaction.
pub struct ReservationWriter {
    store: Arc<dyn BookingStore>,
    locks: RoomLocks,
    mailer: Mailer,
}

impl ReservationWriter {
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>, mailer: Mailer) -> Self {
        Self {
            store,
            locks: RoomLocks::new(),
            mailer,
        }
    }

    /// Persists `new` and queues the confirmation mails.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown room,
    /// [`BookingError::RoomUnavailable`] when another booking or block
    /// already covers part of the range, [`BookingError::StoreError`] when
    /// the write fails. No rows are left behind on error.
    pub async fn create_reservation(
        &self,
        new: &NewReservation,
    ) -> Result<CommittedReservation, BookingError> {
        let room = self.store.get_room_by_id(new.room_id).await?;
        let _guard = self.locks.acquire(room.id).await;

        let id = match self.store.create_reservation(new).await {
            Ok(id) => id,
            Err(e @ BookingError::RoomUnavailable { .. }) => {
                metrics::counter!("bookings_reservation_conflicts_total").increment(1);
                warn!(
                    room_id = new.room_id,
                    start = %new.range.start(),
                    end = %new.range.end(),
                    "Reservation conflicts with an existing restriction"
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        metrics::counter!("bookings_reservations_created_total").increment(1);
        info!(
            reservation_id = id,
            room_id = new.room_id,
            start = %new.range.start(),
            end = %new.range.end(),
            "Reservation created"
        );

        let committed = CommittedReservation::new(id, new, room);
        self.mailer.reservation_confirmed(&committed);
        Ok(committed)
    }

    /// Owner blocks go through the same per-room lock as reservations.
    pub async fn insert_block(
        &self,
        room_id: i32,
        date: chrono::NaiveDate,
    ) -> Result<i32, BookingError> {
        let room = self.store.get_room_by_id(room_id).await?;
        let _guard = self.locks.acquire(room.id).await;
        self.store.insert_block(room.id, date).await
    }
}
