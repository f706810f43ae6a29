//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite location identity.
///
/// `Decimal` coordinates give exact equality and hashing, so the joins
/// between daily records, geo features, and bin metadata never depend on how
/// a floating-point coordinate happens to be formatted.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct LocationKey {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl LocationKey {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for LocationKey {
    /// Renders the `"<lat>_<lon>"` form used to key the persisted bin
    /// metadata document.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn trailing_zeros_do_not_break_lookups() {
        let mut map = HashMap::new();
        map.insert(LocationKey::new(dec("1.30"), dec("-74.00")), "noida");
        // numerically equal keys must hash identically regardless of scale
        assert_eq!(
            map.get(&LocationKey::new(dec("1.3"), dec("-74"))),
            Some(&"noida")
        );
    }

    #[test]
    fn display_matches_artifact_key_format() {
        let key = LocationKey::new(dec("28.57"), dec("77.32"));
        assert_eq!(key.to_string(), "28.57_77.32");
    }
}
