use crate::constants::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, ROOMS};
use crate::entities::prelude::*;
use crate::entities::{restrictions, rooms, users};
use crate::models::RestrictionKind;
use crate::models::user::ADMIN_ACCESS_LEVEL;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn hash_default_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(DEFAULT_ADMIN_PASSWORD.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash default password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut insert_rooms = Query::insert()
            .into_table(Rooms)
            .columns([
                rooms::Column::Id,
                rooms::Column::RoomName,
                rooms::Column::CreatedAt,
                rooms::Column::UpdatedAt,
            ])
            .to_owned();
        for (id, name) in ROOMS {
            insert_rooms.values_panic([
                id.into(),
                name.into(),
                now.clone().into(),
                now.clone().into(),
            ]);
        }
        manager.exec_stmt(insert_rooms).await?;

        let mut insert_restrictions = Query::insert()
            .into_table(Restrictions)
            .columns([
                restrictions::Column::Id,
                restrictions::Column::RestrictionName,
                restrictions::Column::CreatedAt,
                restrictions::Column::UpdatedAt,
            ])
            .to_owned();
        for kind in [RestrictionKind::Reservation, RestrictionKind::OwnerBlock] {
            insert_restrictions.values_panic([
                kind.id().into(),
                kind.label().into(),
                now.clone().into(),
                now.clone().into(),
            ]);
        }
        manager.exec_stmt(insert_restrictions).await?;

        let insert_admin = Query::insert()
            .into_table(Users)
            .columns([
                users::Column::FirstName,
                users::Column::LastName,
                users::Column::Email,
                users::Column::PasswordHash,
                users::Column::AccessLevel,
                users::Column::CreatedAt,
                users::Column::UpdatedAt,
            ])
            .values_panic([
                "Admin".into(),
                "User".into(),
                DEFAULT_ADMIN_EMAIL.into(),
                hash_default_password()?.into(),
                ADMIN_ACCESS_LEVEL.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert_admin).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Users)
                    .and_where(Expr::col(users::Column::Email).eq(DEFAULT_ADMIN_EMAIL))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Restrictions).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Rooms).to_owned())
            .await?;

        Ok(())
    }
}
