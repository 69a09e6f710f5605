//! In-process [`BookingStore`] with the same semantics as the SQLite store.
//!
//! Used for tests and for `database_path = "memory"` deployments where
//! nothing needs to survive a restart.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::port::{BookingStore, StoreResult};
use super::repositories::user::{hash_password, verify_hash};
use crate::config::SecurityConfig;
use crate::constants::seed;
use crate::domain::BookingError;
use crate::models::{
    ADMIN_ACCESS_LEVEL, DateRange, GuestDetails, NewReservation, Reservation, RestrictionKind,
    Room, RoomRestriction, User,
};

#[derive(Default)]
struct Inner {
    rooms: BTreeMap<i32, Room>,
    reservations: BTreeMap<i32, Reservation>,
    restrictions: BTreeMap<i32, RoomRestriction>,
    users: BTreeMap<i32, (User, String)>,
    next_reservation_id: i32,
    next_restriction_id: i32,
    next_user_id: i32,
}

impl Inner {
    fn conflicts(&self, room_id: i32, range: &DateRange) -> bool {
        self.restrictions
            .values()
            .any(|r| r.room_id == room_id && r.overlaps(range))
    }

    fn next_restriction_id(&mut self) -> i32 {
        self.next_restriction_id += 1;
        self.next_restriction_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
    offline: AtomicBool,
    fail_restriction_insert: AtomicBool,
}

impl InMemoryStore {
    /// A store holding the seeded rooms and no users.
    #[must_use]
    pub fn new() -> Self {
        let rooms = seed::ROOMS
            .iter()
            .map(|(id, name)| {
                (
                    *id,
                    Room {
                        id: *id,
                        room_name: (*name).to_string(),
                    },
                )
            })
            .collect();

        Self {
            inner: RwLock::new(Inner {
                rooms,
                ..Inner::default()
            }),
            ..Self::default()
        }
    }

    /// Adds an administrator account.
    ///
    /// # Errors
    ///
    /// Fails when the Argon2 parameters in `config` are rejected.
    pub fn with_user(
        self,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> anyhow::Result<Self> {
        let hash = hash_password(password, Some(config))?;
        {
            let mut inner = self.inner.try_write()?;
            inner.next_user_id += 1;
            let id = inner.next_user_id;
            let now = chrono::Utc::now().to_rfc3339();
            let user = User {
                id,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                access_level: ADMIN_ACCESS_LEVEL,
                created_at: now.clone(),
                updated_at: now,
            };
            inner.users.insert(id, (user, hash));
        }
        Ok(self)
    }

    /// While offline every call fails with [`BookingError::StoreError`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes the next reservation fail after its row was staged, as a failed
    /// restriction insert would.
    pub fn fail_next_restriction_insert(&self) {
        self.fail_restriction_insert.store(true, Ordering::SeqCst);
    }

    pub async fn reservation_count(&self) -> usize {
        self.inner.read().await.reservations.len()
    }

    pub async fn restriction_count(&self) -> usize {
        self.inner.read().await.restrictions.len()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BookingError::StoreError("store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn all_rooms(&self) -> StoreResult<Vec<Room>> {
        self.check_online()?;
        Ok(self.inner.read().await.rooms.values().cloned().collect())
    }

    async fn get_room_by_id(&self, id: i32) -> StoreResult<Room> {
        self.check_online()?;
        self.inner
            .read()
            .await
            .rooms
            .get(&id)
            .cloned()
            .ok_or_else(|| BookingError::not_found("Room", id))
    }

    async fn room_is_available(&self, room_id: i32, range: &DateRange) -> StoreResult<bool> {
        self.check_online()?;
        Ok(!self.inner.read().await.conflicts(room_id, range))
    }

    async fn available_rooms(&self, range: &DateRange) -> StoreResult<Vec<Room>> {
        self.check_online()?;
        let inner = self.inner.read().await;
        Ok(inner
            .rooms
            .values()
            .filter(|room| !inner.conflicts(room.id, range))
            .cloned()
            .collect())
    }

    async fn create_reservation(&self, new: &NewReservation) -> StoreResult<i32> {
        self.check_online()?;
        let mut inner = self.inner.write().await;

        let room = inner
            .rooms
            .get(&new.room_id)
            .cloned()
            .ok_or_else(|| BookingError::not_found("Room", new.room_id))?;

        if inner.conflicts(new.room_id, &new.range) {
            return Err(BookingError::RoomUnavailable {
                room_id: new.room_id,
            });
        }

        let reservation_id = inner.next_reservation_id + 1;
        let now = chrono::Utc::now().to_rfc3339();
        let reservation = Reservation {
            id: reservation_id,
            first_name: new.guest.first_name.clone(),
            last_name: new.guest.last_name.clone(),
            email: new.guest.email.clone(),
            phone: new.guest.phone.clone(),
            room,
            start_date: new.range.start(),
            end_date: new.range.end(),
            processed: false,
            created_at: now.clone(),
            updated_at: now,
        };

        // Nothing has been written yet, so failing here leaves no trace.
        if self.fail_restriction_insert.swap(false, Ordering::SeqCst) {
            return Err(BookingError::StoreError(
                "Failed to insert room restriction".to_string(),
            ));
        }

        inner.next_reservation_id = reservation_id;
        inner.reservations.insert(reservation_id, reservation);
        let restriction_id = inner.next_restriction_id();
        inner.restrictions.insert(
            restriction_id,
            RoomRestriction {
                id: restriction_id,
                room_id: new.room_id,
                reservation_id: Some(reservation_id),
                kind: RestrictionKind::Reservation,
                start_date: new.range.start(),
                end_date: new.range.end(),
            },
        );

        Ok(reservation_id)
    }

    async fn get_reservation_by_id(&self, id: i32) -> StoreResult<Reservation> {
        self.check_online()?;
        self.inner
            .read()
            .await
            .reservations
            .get(&id)
            .cloned()
            .ok_or_else(|| BookingError::not_found("Reservation", id))
    }

    async fn all_reservations(&self) -> StoreResult<Vec<Reservation>> {
        self.check_online()?;
        let mut all: Vec<_> = self
            .inner
            .read()
            .await
            .reservations
            .values()
            .cloned()
            .collect();
        all.sort_by_key(|r| (r.start_date, r.id));
        Ok(all)
    }

    async fn all_new_reservations(&self) -> StoreResult<Vec<Reservation>> {
        let mut all = self.all_reservations().await?;
        all.retain(|r| !r.processed);
        Ok(all)
    }

    async fn update_reservation(&self, id: i32, guest: &GuestDetails) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        let reservation = inner
            .reservations
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found("Reservation", id))?;

        reservation.first_name.clone_from(&guest.first_name);
        reservation.last_name.clone_from(&guest.last_name);
        reservation.email.clone_from(&guest.email);
        reservation.phone.clone_from(&guest.phone);
        reservation.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(())
    }

    async fn delete_reservation(&self, id: i32) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        if inner.reservations.remove(&id).is_none() {
            return Err(BookingError::not_found("Reservation", id));
        }
        inner
            .restrictions
            .retain(|_, r| r.reservation_id != Some(id));
        Ok(())
    }

    async fn update_processed(&self, id: i32, processed: bool) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        let reservation = inner
            .reservations
            .get_mut(&id)
            .ok_or_else(|| BookingError::not_found("Reservation", id))?;
        reservation.processed = processed;
        reservation.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(())
    }

    async fn restrictions_for_room_by_date(
        &self,
        room_id: i32,
        range: &DateRange,
    ) -> StoreResult<Vec<RoomRestriction>> {
        self.check_online()?;
        let mut found: Vec<_> = self
            .inner
            .read()
            .await
            .restrictions
            .values()
            .filter(|r| r.room_id == room_id && r.overlaps(range))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.start_date);
        Ok(found)
    }

    async fn insert_block(&self, room_id: i32, date: NaiveDate) -> StoreResult<i32> {
        self.check_online()?;
        let range = DateRange::single_day(date)?;
        let mut inner = self.inner.write().await;

        if !inner.rooms.contains_key(&room_id) {
            return Err(BookingError::not_found("Room", room_id));
        }
        if inner.conflicts(room_id, &range) {
            return Err(BookingError::RoomUnavailable { room_id });
        }

        let id = inner.next_restriction_id();
        inner.restrictions.insert(
            id,
            RoomRestriction {
                id,
                room_id,
                reservation_id: None,
                kind: RestrictionKind::OwnerBlock,
                start_date: range.start(),
                end_date: range.end(),
            },
        );
        Ok(id)
    }

    async fn delete_block(&self, id: i32) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        match inner.restrictions.get(&id) {
            Some(r) if r.reservation_id.is_none() => {
                inner.restrictions.remove(&id);
                Ok(())
            }
            _ => Err(BookingError::not_found("Block", id)),
        }
    }

    async fn get_user_by_id(&self, id: i32) -> StoreResult<User> {
        self.check_online()?;
        self.inner
            .read()
            .await
            .users
            .get(&id)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| BookingError::not_found("User", id))
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.write().await;
        let (stored, _) = inner
            .users
            .get_mut(&user.id)
            .ok_or_else(|| BookingError::not_found("User", user.id))?;
        *stored = User {
            updated_at: chrono::Utc::now().to_rfc3339(),
            ..user.clone()
        };
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<(i32, String)> {
        self.check_online()?;
        let found = self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|(user, _)| user.email == email)
            .map(|(user, hash)| (user.id, hash.clone()));

        let Some((id, hash)) = found else {
            return Err(BookingError::InvalidCredentials);
        };

        let password = password.to_string();
        let checked = hash.clone();
        let is_valid = tokio::task::spawn_blocking(move || verify_hash(&password, &checked))
            .await
            .map_err(|e| {
                BookingError::StoreError(format!("Password verification task panicked: {e}"))
            })??;

        if is_valid {
            Ok((id, hash))
        } else {
            Err(BookingError::InvalidCredentials)
        }
    }
}
