use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DateRange, Room};
use crate::domain::BookingError;
use crate::entities::{reservations, rooms};

/// Contact details entered on the reservation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Everything the reservation writer needs to persist a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub guest: GuestDetails,
    pub room_id: i32,
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub room: Room,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub processed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Reservation {
    /// The stay as a validated range.
    pub fn range(&self) -> Result<DateRange, BookingError> {
        DateRange::new(self.start_date, self.end_date)
    }

    #[must_use]
    pub fn guest(&self) -> GuestDetails {
        GuestDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }

    pub(crate) fn from_models(model: reservations::Model, room: Option<rooms::Model>) -> Self {
        let room = room.map_or_else(
            || Room {
                id: model.room_id,
                room_name: String::new(),
            },
            Room::from,
        );

        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            room,
            start_date: model.start_date,
            end_date: model.end_date,
            processed: model.processed != 0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
