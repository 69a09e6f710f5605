//! Back-office operations: reservation triage and the owner's calendar.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::reservations::ReservationWriter;
use crate::constants::limits::MAX_CALENDAR_YEAR_OFFSET;
use crate::db::BookingStore;
use crate::domain::{BookingError, check_guest_form, guest_from_form};
use crate::forms::Form;
use crate::models::{DateRange, Reservation, RestrictionKind, Room, parse_date};

const ADD_BLOCK_PREFIX: &str = "add_block_";
const REMOVE_BLOCK_PREFIX: &str = "remove_block_";

#[derive(Debug, Clone, Serialize)]
pub struct RoomCalendar {
    pub room: Room,
    /// Occupied day -> reservation id.
    pub reservations: BTreeMap<NaiveDate, i32>,
    /// Blocked day -> restriction id.
    pub blocks: BTreeMap<NaiveDate, i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCalendar {
    pub first_day: NaiveDate,
    pub previous: NaiveDate,
    pub next: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub rooms: Vec<RoomCalendar>,
}

impl MonthCalendar {
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }
}

/// Outcome of a calendar form submission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CalendarChanges {
    pub added: usize,
    pub removed: usize,
    pub rejected: Vec<String>,
}

pub struct AdminService {
    store: Arc<dyn BookingStore>,
    writer: Arc<ReservationWriter>,
}

impl AdminService {
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>, writer: Arc<ReservationWriter>) -> Self {
        Self { store, writer }
    }

    pub async fn new_reservations(&self) -> Result<Vec<Reservation>, BookingError> {
        self.store.all_new_reservations().await
    }

    pub async fn all_reservations(&self) -> Result<Vec<Reservation>, BookingError> {
        self.store.all_reservations().await
    }

    pub async fn reservation(&self, id: i32) -> Result<Reservation, BookingError> {
        self.store.get_reservation_by_id(id).await
    }

    /// Applies edited guest details, validated like the public form.
    ///
    /// # Errors
    ///
    /// [`BookingError::ValidationFailed`] carries the per-field messages.
    pub async fn update_reservation(&self, id: i32, mut form: Form) -> Result<(), BookingError> {
        if !check_guest_form(&mut form) {
            return Err(BookingError::ValidationFailed(form.into_errors()));
        }

        self.store
            .update_reservation(id, &guest_from_form(&form))
            .await?;
        info!(reservation_id = id, "Reservation updated");
        Ok(())
    }

    pub async fn process_reservation(&self, id: i32) -> Result<(), BookingError> {
        self.store.update_processed(id, true).await?;
        info!(reservation_id = id, "Reservation marked as processed");
        Ok(())
    }

    pub async fn delete_reservation(&self, id: i32) -> Result<(), BookingError> {
        self.store.delete_reservation(id).await?;
        info!(reservation_id = id, "Reservation deleted");
        Ok(())
    }

    /// Reservations and owner blocks of every room for one month.
    pub async fn calendar(&self, year: i32, month: u32) -> Result<MonthCalendar, BookingError> {
        let first_day = month_start(year, month)?;
        let next = first_day
            .checked_add_months(Months::new(1))
            .ok_or_else(|| BookingError::invalid_input("Month out of range"))?;
        let previous = first_day
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| BookingError::invalid_input("Month out of range"))?;
        let month_range = DateRange::new(first_day, next)?;

        let mut rooms = Vec::new();
        for room in self.store.all_rooms().await? {
            let mut calendar = RoomCalendar {
                room,
                reservations: BTreeMap::new(),
                blocks: BTreeMap::new(),
            };

            let restrictions = self
                .store
                .restrictions_for_room_by_date(calendar.room.id, &month_range)
                .await?;

            for restriction in restrictions {
                let days = DateRange::new(restriction.start_date, restriction.end_date)?
                    .days()
                    .filter(|day| month_range.contains(*day));

                for day in days {
                    match (restriction.kind, restriction.reservation_id) {
                        (RestrictionKind::Reservation, Some(reservation_id)) => {
                            calendar.reservations.insert(day, reservation_id);
                        }
                        _ => {
                            calendar.blocks.insert(day, restriction.id);
                        }
                    }
                }
            }

            rooms.push(calendar);
        }

        Ok(MonthCalendar {
            first_day,
            previous,
            next,
            days: month_range.days().collect(),
            rooms,
        })
    }

    /// Handles `add_block_{room}_{date}` and `remove_block_{room}_{date}`
    /// fields. A rejected item does not stop the others; store faults do.
    pub async fn apply_calendar_changes(
        &self,
        form: &Form,
    ) -> Result<CalendarChanges, BookingError> {
        let mut changes = CalendarChanges::default();

        let mut removals: Vec<(String, String)> = form
            .with_prefix(REMOVE_BLOCK_PREFIX)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        removals.sort();

        for (key, value) in removals {
            let Ok(block_id) = value.parse::<i32>() else {
                changes.rejected.push(format!("Invalid block id for {key}"));
                continue;
            };

            match self.store.delete_block(block_id).await {
                Ok(()) => changes.removed += 1,
                Err(e) if e.is_store_error() => return Err(e),
                Err(e) => changes.rejected.push(e.user_message()),
            }
        }

        let mut additions: Vec<String> = form
            .with_prefix(ADD_BLOCK_PREFIX)
            .map(|(key, _)| key.to_string())
            .collect();
        additions.sort();

        for key in additions {
            let (room_id, date) = match parse_block_key(&key, ADD_BLOCK_PREFIX) {
                Ok(parsed) => parsed,
                Err(e) => {
                    changes.rejected.push(e.user_message());
                    continue;
                }
            };

            match self.writer.insert_block(room_id, date).await {
                Ok(_) => changes.added += 1,
                Err(e) if e.is_store_error() => return Err(e),
                Err(e) => {
                    warn!(room_id, %date, error = %e, "Owner block rejected");
                    changes.rejected.push(format!("{date}: {}", e.user_message()));
                }
            }
        }

        info!(
            added = changes.added,
            removed = changes.removed,
            rejected = changes.rejected.len(),
            "Calendar changes applied"
        );
        Ok(changes)
    }
}

fn month_start(year: i32, month: u32) -> Result<NaiveDate, BookingError> {
    let current = chrono::Utc::now().year();
    let offset = i64::from(year) - i64::from(current);
    if offset.abs() > i64::from(MAX_CALENDAR_YEAR_OFFSET) {
        return Err(BookingError::invalid_input(format!("Year out of range: {year}")));
    }

    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| BookingError::invalid_input(format!("Invalid month: {month}")))
}

/// Splits `{prefix}{room}_{YYYY-MM-DD}`.
fn parse_block_key(key: &str, prefix: &str) -> Result<(i32, NaiveDate), BookingError> {
    let rest = key.strip_prefix(prefix).unwrap_or(key);
    let (room, date) = rest
        .split_once('_')
        .ok_or_else(|| BookingError::invalid_input(format!("Malformed calendar field: {key}")))?;

    let room_id = room
        .parse()
        .map_err(|_| BookingError::invalid_input(format!("Malformed calendar field: {key}")))?;
    Ok((room_id, parse_date(date, "block")?))
}
