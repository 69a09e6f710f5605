//! The multi-step booking flow.
//!
//! `Browsing -> AvailabilitySearched -> RoomChosen -> DetailsEntered -> Committed`
//!
//! Only the middle three stages are represented by a [`DraftReservation`]:
//! no draft means `Browsing`, and a committed booking lives in the session as
//! a read-only summary until it has been shown once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BookingError;
use crate::constants::limits::MIN_FIRST_NAME_LENGTH;
use crate::forms::Form;
use crate::models::{DateRange, GuestDetails, NewReservation, Room};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingStage {
    Browsing,
    AvailabilitySearched,
    RoomChosen,
    DetailsEntered,
    Committed,
}

impl BookingStage {
    #[must_use]
    pub fn of(draft: Option<&DraftReservation>) -> Self {
        draft.map_or(Self::Browsing, DraftReservation::stage)
    }
}

/// Partially built reservation kept under a single session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReservation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room: Option<Room>,
    pub guest: Option<GuestDetails>,
}

impl DraftReservation {
    #[must_use]
    pub const fn searched(range: DateRange) -> Self {
        Self {
            start_date: range.start(),
            end_date: range.end(),
            room: None,
            guest: None,
        }
    }

    /// Draft created straight from a room page, skipping the room list.
    #[must_use]
    pub const fn for_room(range: DateRange, room: Room) -> Self {
        Self {
            start_date: range.start(),
            end_date: range.end(),
            room: Some(room),
            guest: None,
        }
    }

    pub fn range(&self) -> Result<DateRange, BookingError> {
        DateRange::new(self.start_date, self.end_date)
    }

    #[must_use]
    pub const fn stage(&self) -> BookingStage {
        match (&self.room, &self.guest) {
            (None, _) => BookingStage::AvailabilitySearched,
            (Some(_), None) => BookingStage::RoomChosen,
            (Some(_), Some(_)) => BookingStage::DetailsEntered,
        }
    }

    pub fn choose_room(&mut self, room: Room) {
        self.room = Some(room);
    }

    pub fn enter_details(&mut self, guest: GuestDetails) {
        self.guest = Some(guest);
    }

    /// Converts a complete draft into writer input.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::SessionMissing`] when the room or guest details
    /// have not been provided yet.
    pub fn to_new_reservation(&self) -> Result<NewReservation, BookingError> {
        let (Some(room), Some(guest)) = (&self.room, &self.guest) else {
            return Err(BookingError::SessionMissing);
        };

        Ok(NewReservation {
            guest: guest.clone(),
            room_id: room.id,
            range: self.range()?,
        })
    }
}

/// A booking that has been written, kept for the one-shot summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedReservation {
    pub id: i32,
    pub room: Room,
    pub guest: GuestDetails,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CommittedReservation {
    #[must_use]
    pub fn new(id: i32, new: &NewReservation, room: Room) -> Self {
        Self {
            id,
            room,
            guest: new.guest.clone(),
            start_date: new.range.start(),
            end_date: new.range.end(),
        }
    }
}

/// Guest fields as submitted, trimmed.
#[must_use]
pub fn guest_from_form(form: &Form) -> GuestDetails {
    GuestDetails {
        first_name: form.get("first_name").trim().to_string(),
        last_name: form.get("last_name").trim().to_string(),
        email: form.get("email").trim().to_string(),
        phone: form.get("phone").trim().to_string(),
    }
}

/// Checks shared by the public reservation form and the admin edit form.
pub fn check_guest_form(form: &mut Form) -> bool {
    form.required(&["first_name", "last_name", "email"])
        .min_length("first_name", MIN_FIRST_NAME_LENGTH)
        .is_email("email");
    form.valid()
}
