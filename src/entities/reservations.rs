use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    pub phone: String,

    pub room_id: i32,

    pub start_date: Date,

    /// Checkout day, exclusive.
    pub end_date: Date,

    /// 0 = new, 1 = processed by an administrator
    pub processed: i32,

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

    #[sea_orm(has_many = "super::room_restrictions::Entity")]
    RoomRestrictions,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::room_restrictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomRestrictions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
