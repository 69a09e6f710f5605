use chrono::NaiveDate;
use serde::Serialize;

use super::DateRange;
use crate::entities::room_restrictions;

/// Why a room is unavailable. Ids match the seeded `restrictions` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RestrictionKind {
    Reservation,
    OwnerBlock,
}

impl RestrictionKind {
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Reservation => 1,
            Self::OwnerBlock => 2,
        }
    }

    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Reservation),
            2 => Some(Self::OwnerBlock),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reservation => "Reservation",
            Self::OwnerBlock => "Owner Block",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomRestriction {
    pub id: i32,
    pub room_id: i32,
    pub reservation_id: Option<i32>,
    pub kind: RestrictionKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RoomRestriction {
    #[must_use]
    pub fn overlaps(&self, range: &DateRange) -> bool {
        self.start_date < range.end() && range.start() < self.end_date
    }
}

impl From<room_restrictions::Model> for RoomRestriction {
    fn from(model: room_restrictions::Model) -> Self {
        let kind = if model.reservation_id.is_some() {
            RestrictionKind::Reservation
        } else {
            RestrictionKind::from_id(model.restriction_id).unwrap_or(RestrictionKind::OwnerBlock)
        };

        Self {
            id: model.id,
            room_id: model.room_id,
            reservation_id: model.reservation_id,
            kind,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }
}
