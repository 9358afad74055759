// ReservationId value object - unique identifier for reservations

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::{NoContext, Timestamp, Uuid};

/// Unique identifier for a Reservation, formatted `res_<random>`.
///
/// The random component is a UUID v7 (time-ordered), so identifiers are
/// collision-free and sort roughly by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(format!(
            "res_{}",
            Uuid::new_v7(Timestamp::now(NoContext)).simple()
        ))
    }

    /// Wraps an identifier read back from persistence.
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_has_prefix() {
        let id = ReservationId::generate();
        assert!(id.as_str().starts_with("res_"));
        assert!(id.as_str().len() > 10);
    }

    #[test]
    fn test_generate_is_unique() {
        let a = ReservationId::generate();
        let b = ReservationId::generate();
        assert_ne!(a, b);
    }
}
