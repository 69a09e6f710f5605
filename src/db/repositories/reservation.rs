use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::restriction::count_conflicts;
use crate::domain::BookingError;
use crate::entities::{prelude::*, reservations, room_restrictions};
use crate::models::{GuestDetails, NewReservation, Reservation, RestrictionKind};

pub struct ReservationRepository {
    conn: DatabaseConnection,
}

impl ReservationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the reservation and its restriction in one transaction.
    ///
    /// The overlap check is repeated inside the transaction; a conflict or any
    /// failed write rolls both rows back.
    pub async fn create(&self, new: &NewReservation) -> Result<i32> {
        let txn = self.conn.begin().await?;

        if Rooms::find_by_id(new.room_id).one(&txn).await?.is_none() {
            return Err(BookingError::not_found("Room", new.room_id).into());
        }

        if count_conflicts(&txn, new.room_id, &new.range).await? > 0 {
            return Err(BookingError::RoomUnavailable {
                room_id: new.room_id,
            }
            .into());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let inserted = Reservations::insert(reservations::ActiveModel {
            id: NotSet,
            first_name: Set(new.guest.first_name.clone()),
            last_name: Set(new.guest.last_name.clone()),
            email: Set(new.guest.email.clone()),
            phone: Set(new.guest.phone.clone()),
            room_id: Set(new.room_id),
            start_date: Set(new.range.start()),
            end_date: Set(new.range.end()),
            processed: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        })
        .exec(&txn)
        .await
        .context("Failed to insert reservation")?;

        let reservation_id = inserted.last_insert_id;

        RoomRestrictions::insert(room_restrictions::ActiveModel {
            id: NotSet,
            start_date: Set(new.range.start()),
            end_date: Set(new.range.end()),
            room_id: Set(new.room_id),
            reservation_id: Set(Some(reservation_id)),
            restriction_id: Set(RestrictionKind::Reservation.id()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        })
        .exec(&txn)
        .await
        .context("Failed to insert room restriction")?;

        txn.commit()
            .await
            .context("Failed to commit reservation")?;

        Ok(reservation_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Reservation>> {
        let row = Reservations::find_by_id(id)
            .find_also_related(Rooms)
            .one(&self.conn)
            .await
            .context("Failed to query reservation by ID")?;

        Ok(row.map(|(reservation, room)| Reservation::from_models(reservation, room)))
    }

    pub async fn all(&self) -> Result<Vec<Reservation>> {
        let rows = Reservations::find()
            .find_also_related(Rooms)
            .order_by_asc(reservations::Column::StartDate)
            .all(&self.conn)
            .await
            .context("Failed to list reservations")?;

        Ok(rows
            .into_iter()
            .map(|(reservation, room)| Reservation::from_models(reservation, room))
            .collect())
    }

    /// Reservations an administrator has not processed yet.
    pub async fn all_new(&self) -> Result<Vec<Reservation>> {
        let rows = Reservations::find()
            .find_also_related(Rooms)
            .filter(reservations::Column::Processed.eq(0))
            .order_by_asc(reservations::Column::StartDate)
            .all(&self.conn)
            .await
            .context("Failed to list new reservations")?;

        Ok(rows
            .into_iter()
            .map(|(reservation, room)| Reservation::from_models(reservation, room))
            .collect())
    }

    pub async fn update_guest(&self, id: i32, guest: &GuestDetails) -> Result<()> {
        let reservation = Reservations::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query reservation for update")?
            .ok_or_else(|| BookingError::not_found("Reservation", id))?;

        let mut active: reservations::ActiveModel = reservation.into();
        active.first_name = Set(guest.first_name.clone());
        active.last_name = Set(guest.last_name.clone());
        active.email = Set(guest.email.clone());
        active.phone = Set(guest.phone.clone());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Deletes a reservation together with its restriction.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.conn.begin().await?;

        RoomRestrictions::delete_many()
            .filter(room_restrictions::Column::ReservationId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete reservation restriction")?;

        let result = Reservations::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete reservation")?;

        if result.rows_affected == 0 {
            return Err(BookingError::not_found("Reservation", id).into());
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn set_processed(&self, id: i32, processed: bool) -> Result<()> {
        let result = Reservations::update_many()
            .col_expr(
                reservations::Column::Processed,
                sea_orm::sea_query::Expr::value(i32::from(processed)),
            )
            .col_expr(
                reservations::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(reservations::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update processed flag")?;

        if result.rows_affected == 0 {
            return Err(BookingError::not_found("Reservation", id).into());
        }
        Ok(())
    }
}
