use serde::{Deserialize, Serialize};

use crate::entities::rooms;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub room_name: String,
}

impl From<rooms::Model> for Room {
    fn from(model: rooms::Model) -> Self {
        Self {
            id: model.id,
            room_name: model.room_name,
        }
    }
}
