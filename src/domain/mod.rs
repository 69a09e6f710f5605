//! Booking domain: the error taxonomy shared by every layer and the
//! session-carried booking flow.
//!
//! Handlers never inspect raw session values; they load a
//! [`DraftReservation`] and ask it which [`BookingStage`] the visitor is in.

pub mod error;
pub mod flow;

pub use error::BookingError;
pub use flow::{
    BookingStage, CommittedReservation, DraftReservation, check_guest_form, guest_from_form,
};
