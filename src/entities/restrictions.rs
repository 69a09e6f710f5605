use sea_orm::entity::prelude::*;

/// Restriction type lookup table ("Reservation", "Owner Block").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "restrictions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub restriction_name: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room_restrictions::Entity")]
    RoomRestrictions,
}

impl Related<super::room_restrictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomRestrictions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
