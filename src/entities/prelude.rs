pub use super::reservations::Entity as Reservations;
pub use super::restrictions::Entity as Restrictions;
pub use super::room_restrictions::Entity as RoomRestrictions;
pub use super::rooms::Entity as Rooms;
pub use super::users::Entity as Users;
