pub mod admin;
pub use admin::{AdminService, CalendarChanges, MonthCalendar, RoomCalendar};

pub mod auth_service;
pub use auth_service::AuthService;

pub mod auth_service_impl;
pub use auth_service_impl::StoreAuthService;

pub mod availability;
pub use availability::AvailabilityService;

pub mod mailer;
pub use mailer::{MailData, Mailer};

pub mod reservations;
pub use reservations::ReservationWriter;

pub mod room_locks;
pub use room_locks::RoomLocks;
