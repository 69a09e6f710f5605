use std::sync::Arc;
use tracing::{debug, error};

use crate::db::BookingStore;
use crate::domain::BookingError;
use crate::models::{DateRange, Room};

/// Read side of booking: which rooms are free for a range.
pub struct AvailabilityService {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityService {
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn room_is_available(
        &self,
        room_id: i32,
        range: &DateRange,
    ) -> Result<bool, BookingError> {
        let available = self
            .store
            .room_is_available(room_id, range)
            .await
            .inspect_err(|e| log_store_fault("room_is_available", e))?;

        debug!(
            room_id,
            start = %range.start(),
            end = %range.end(),
            available,
            "Checked room availability"
        );
        Ok(available)
    }

    /// Rooms free for the whole range. An empty list is a valid answer.
    pub async fn available_rooms(&self, range: &DateRange) -> Result<Vec<Room>, BookingError> {
        metrics::counter!("bookings_availability_searches_total").increment(1);

        let rooms = self
            .store
            .available_rooms(range)
            .await
            .inspect_err(|e| log_store_fault("available_rooms", e))?;

        debug!(
            start = %range.start(),
            end = %range.end(),
            found = rooms.len(),
            "Searched availability"
        );
        Ok(rooms)
    }

    /// Parses the submitted dates before touching the store.
    pub async fn search(
        &self,
        start: &str,
        end: &str,
    ) -> Result<(DateRange, Vec<Room>), BookingError> {
        let range = DateRange::parse(start, end)?;
        let rooms = self.available_rooms(&range).await?;
        Ok((range, rooms))
    }

    pub async fn room(&self, id: i32) -> Result<Room, BookingError> {
        self.store.get_room_by_id(id).await
    }
}

fn log_store_fault(operation: &str, err: &BookingError) {
    if err.is_store_error() {
        error!(operation, error = %err, "Availability query failed");
    }
}
