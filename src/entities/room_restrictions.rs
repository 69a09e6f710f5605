use sea_orm::entity::prelude::*;

/// A half-open `[start_date, end_date)` interval during which a room cannot be booked.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "room_restrictions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub start_date: Date,

    pub end_date: Date,

    pub room_id: i32,

    /// Null for owner blocks.
    pub reservation_id: Option<i32>,

    pub restriction_id: i32,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Room,

    #[sea_orm(
        belongs_to = "super::reservations::Entity",
        from = "Column::ReservationId",
        to = "super::reservations::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Reservation,

    #[sea_orm(
        belongs_to = "super::restrictions::Entity",
        from = "Column::RestrictionId",
        to = "super::restrictions::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Restriction,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl Related<super::restrictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restriction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
