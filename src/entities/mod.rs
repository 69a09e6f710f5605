pub mod prelude;

pub mod reservations;
pub mod restrictions;
pub mod room_restrictions;
pub mod rooms;
pub mod users;
