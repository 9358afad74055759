// Response DTOs - wire-facing snapshots of domain entities

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Item, Reservation};

/// Item snapshot as served to clients. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub available_qty: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            available_qty: item.available_qty(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

/// Reservation snapshot as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub qty: i64,
    pub status: String,
    pub expires_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Reservation> for ReservationResponse {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id().to_string(),
            user_id: reservation.user_id().to_string(),
            item_id: reservation.item_id().to_string(),
            qty: reservation.qty(),
            status: reservation.status().to_string(),
            expires_at: reservation.expires_at(),
            created_at: reservation.created_at(),
            updated_at: reservation.updated_at(),
        }
    }
}
