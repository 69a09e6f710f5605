pub mod date_range;
pub mod reservation;
pub mod restriction;
pub mod room;
pub mod user;

pub use date_range::{DATE_FORMAT, DateRange, format_date, parse_date};
pub use reservation::{GuestDetails, NewReservation, Reservation};
pub use restriction::{RestrictionKind, RoomRestriction};
pub use room::Room;
pub use user::{ADMIN_ACCESS_LEVEL, User};
