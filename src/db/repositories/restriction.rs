use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::BookingError;
use crate::entities::{prelude::*, room_restrictions};
use crate::models::{DateRange, RestrictionKind, RoomRestriction};

/// Restrictions whose `[start_date, end_date)` overlaps `range`.
pub(super) fn overlapping(range: &DateRange) -> Condition {
    Condition::all()
        .add(room_restrictions::Column::StartDate.lt(range.end()))
        .add(room_restrictions::Column::EndDate.gt(range.start()))
}

/// Number of restrictions on `room_id` overlapping `range`. Runs on any
/// connection so writers can re-check inside their transaction.
pub(super) async fn count_conflicts<C: ConnectionTrait>(
    db: &C,
    room_id: i32,
    range: &DateRange,
) -> Result<u64, DbErr> {
    RoomRestrictions::find()
        .filter(room_restrictions::Column::RoomId.eq(room_id))
        .filter(overlapping(range))
        .count(db)
        .await
}

pub struct RestrictionRepository {
    conn: DatabaseConnection,
}

impl RestrictionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn for_room(&self, room_id: i32, range: &DateRange) -> Result<Vec<RoomRestriction>> {
        let rows = RoomRestrictions::find()
            .filter(room_restrictions::Column::RoomId.eq(room_id))
            .filter(overlapping(range))
            .order_by_asc(room_restrictions::Column::StartDate)
            .all(&self.conn)
            .await
            .context("Failed to query room restrictions")?;

        Ok(rows.into_iter().map(RoomRestriction::from).collect())
    }

    /// Blocks `room_id` for the night of `date`.
    pub async fn insert_block(&self, room_id: i32, date: NaiveDate) -> Result<i32> {
        let range = DateRange::single_day(date)?;
        let txn = self.conn.begin().await?;

        if Rooms::find_by_id(room_id).one(&txn).await?.is_none() {
            return Err(BookingError::not_found("Room", room_id).into());
        }

        if count_conflicts(&txn, room_id, &range).await? > 0 {
            return Err(BookingError::RoomUnavailable { room_id }.into());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let inserted = RoomRestrictions::insert(room_restrictions::ActiveModel {
            id: NotSet,
            start_date: Set(range.start()),
            end_date: Set(range.end()),
            room_id: Set(room_id),
            reservation_id: Set(None),
            restriction_id: Set(RestrictionKind::OwnerBlock.id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        })
        .exec(&txn)
        .await
        .context("Failed to insert owner block")?;

        txn.commit().await?;
        Ok(inserted.last_insert_id)
    }

    /// Removes an owner block. Reservation restrictions are left alone.
    pub async fn delete_block(&self, id: i32) -> Result<()> {
        let result = RoomRestrictions::delete_many()
            .filter(room_restrictions::Column::Id.eq(id))
            .filter(room_restrictions::Column::ReservationId.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to delete owner block")?;

        if result.rows_affected == 0 {
            return Err(BookingError::not_found("Block", id).into());
        }
        Ok(())
    }
}
