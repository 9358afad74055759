// Quantity value object - validated reservation size

use serde::{Deserialize, Serialize};

/// Number of units held by a single reservation, validated to the
/// accepted band at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Returns `None` when `qty` falls outside `[MIN, MAX]`.
    pub fn new(qty: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&qty) {
            Some(Self(qty))
        } else {
            None
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}
