use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::BookingError;
use crate::models::{
    DateRange, GuestDetails, NewReservation, Reservation, Room, RoomRestriction, User,
};

pub mod memory;
pub mod migrator;
pub mod port;
pub mod repositories;

pub use memory::InMemoryStore;
pub use port::{BookingStore, StoreResult};
pub use repositories::user::{Verification, hash_password, needs_rehash};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn room_repo(&self) -> repositories::room::RoomRepository {
        repositories::room::RoomRepository::new(self.conn.clone())
    }

    fn reservation_repo(&self) -> repositories::reservation::ReservationRepository {
        repositories::reservation::ReservationRepository::new(self.conn.clone())
    }

    fn restriction_repo(&self) -> repositories::restriction::RestrictionRepository {
        repositories::restriction::RestrictionRepository::new(self.conn.clone())
    }

    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, config)
            .await
    }
}

#[async_trait]
impl BookingStore for Store {
    async fn all_rooms(&self) -> StoreResult<Vec<Room>> {
        Ok(self.room_repo().all().await?)
    }

    async fn get_room_by_id(&self, id: i32) -> StoreResult<Room> {
        self.room_repo()
            .get(id)
            .await?
            .ok_or_else(|| BookingError::not_found("Room", id))
    }

    async fn room_is_available(&self, room_id: i32, range: &DateRange) -> StoreResult<bool> {
        Ok(self.room_repo().is_available(room_id, range).await?)
    }

    async fn available_rooms(&self, range: &DateRange) -> StoreResult<Vec<Room>> {
        Ok(self.room_repo().available(range).await?)
    }

    async fn create_reservation(&self, new: &NewReservation) -> StoreResult<i32> {
        Ok(self.reservation_repo().create(new).await?)
    }

    async fn get_reservation_by_id(&self, id: i32) -> StoreResult<Reservation> {
        self.reservation_repo()
            .get(id)
            .await?
            .ok_or_else(|| BookingError::not_found("Reservation", id))
    }

    async fn all_reservations(&self) -> StoreResult<Vec<Reservation>> {
        Ok(self.reservation_repo().all().await?)
    }

    async fn all_new_reservations(&self) -> StoreResult<Vec<Reservation>> {
        Ok(self.reservation_repo().all_new().await?)
    }

    async fn update_reservation(&self, id: i32, guest: &GuestDetails) -> StoreResult<()> {
        Ok(self.reservation_repo().update_guest(id, guest).await?)
    }

    async fn delete_reservation(&self, id: i32) -> StoreResult<()> {
        Ok(self.reservation_repo().delete(id).await?)
    }

    async fn update_processed(&self, id: i32, processed: bool) -> StoreResult<()> {
        Ok(self.reservation_repo().set_processed(id, processed).await?)
    }

    async fn restrictions_for_room_by_date(
        &self,
        room_id: i32,
        range: &DateRange,
    ) -> StoreResult<Vec<RoomRestriction>> {
        Ok(self.restriction_repo().for_room(room_id, range).await?)
    }

    async fn insert_block(&self, room_id: i32, date: NaiveDate) -> StoreResult<i32> {
        Ok(self.restriction_repo().insert_block(room_id, date).await?)
    }

    async fn delete_block(&self, id: i32) -> StoreResult<()> {
        Ok(self.restriction_repo().delete_block(id).await?)
    }

    async fn get_user_by_id(&self, id: i32) -> StoreResult<User> {
        self.user_repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| BookingError::not_found("User", id))
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        Ok(self.user_repo().update(user).await?)
    }

    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<(i32, String)> {
        match self.user_repo().verify_password(email, password).await? {
            Verification::Valid { id, password_hash } => Ok((id, password_hash)),
            Verification::Invalid => Err(BookingError::InvalidCredentials),
        }
    }
}
