use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::restriction::{count_conflicts, overlapping};
use crate::entities::{prelude::*, room_restrictions, rooms};
use crate::models::{DateRange, Room};

pub struct RoomRepository {
    conn: DatabaseConnection,
}

impl RoomRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn all(&self) -> Result<Vec<Room>> {
        let rooms = Rooms::find()
            .order_by_asc(rooms::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list rooms")?;

        Ok(rooms.into_iter().map(Room::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Room>> {
        let room = Rooms::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query room by ID")?;

        Ok(room.map(Room::from))
    }

    /// True when no restriction of `room_id` overlaps `range`.
    pub async fn is_available(&self, room_id: i32, range: &DateRange) -> Result<bool> {
        let conflicts = count_conflicts(&self.conn, room_id, range)
            .await
            .context("Failed to check room availability")?;

        Ok(conflicts == 0)
    }

    /// Rooms with no restriction overlapping `range`, ordered by id.
    pub async fn available(&self, range: &DateRange) -> Result<Vec<Room>> {
        let busy: Vec<i32> = RoomRestrictions::find()
            .select_only()
            .column(room_restrictions::Column::RoomId)
            .filter(overlapping(range))
            .distinct()
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query restricted rooms")?;

        let mut query = Rooms::find().order_by_asc(rooms::Column::Id);
        if !busy.is_empty() {
            query = query.filter(rooms::Column::Id.is_not_in(busy));
        }

        let rooms = query
            .all(&self.conn)
            .await
            .context("Failed to query available rooms")?;

        Ok(rooms.into_iter().map(Room::from).collect())
    }
}
