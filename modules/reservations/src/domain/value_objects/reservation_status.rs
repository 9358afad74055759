// ReservationStatus enum - state of a stock hold

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a reservation.
///
/// `Reserved` is the only state that holds stock. The other three states
/// are terminal: no transition ever leaves them, and none re-enters
/// `Reserved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Active hold; stock has been moved out of `available_qty`
    Reserved,
    /// Hold consumed; stock stays retired
    Confirmed,
    /// Hold released by the caller; stock returned
    Cancelled,
    /// Hold released by the expiry transition; stock returned
    Expired,
}

impl ReservationStatus {
    /// Returns true if no further transition is permitted from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Confirmed | ReservationStatus::Cancelled | ReservationStatus::Expired
        )
    }

    /// Returns true while the reservation still holds stock.
    pub fn holds_stock(&self) -> bool {
        matches!(self, ReservationStatus::Reserved)
    }
}

impl FromStr for ReservationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reserved" => Ok(ReservationStatus::Reserved),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "expired" => Ok(ReservationStatus::Expired),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Reserved => write!(f, "reserved"),
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Expired => write!(f, "expired"),
        }
    }
}
