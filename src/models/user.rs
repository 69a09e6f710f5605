use serde::Serialize;

use crate::entities::users;

pub const ADMIN_ACCESS_LEVEL: i32 = 3;

/// User data without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub access_level: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.access_level >= ADMIN_ACCESS_LEVEL
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            access_level: model.access_level,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
