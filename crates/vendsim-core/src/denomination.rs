//! # Denominations
//!
//! The closed set of notes and coins the machine accepts and pays out.
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┐
//! │  10,000  │  5,000   │  1,000   │   500    │   100    │
//! │   note   │   note   │   note   │   coin   │   coin   │
//! └──────────┴──────────┴──────────┴──────────┴──────────┘
//!   largest ─────────────────────────────────────► smallest
//! ```
//!
//! The set is fixed at compile time. Anything else fed to the machine is
//! rejected at the boundary by [`Denomination::try_from`].

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;

/// A note or coin value.
///
/// Variants are declared smallest-first so the derived `Ord` matches the
/// face value; use [`Denomination::ALL`] for the descending iteration order
/// the change calculator relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Denomination {
    Coin100,
    Coin500,
    Note1000,
    Note5000,
    Note10000,
}

impl Denomination {
    /// Every denomination, largest first.
    pub const ALL: [Denomination; 5] = [
        Denomination::Note10000,
        Denomination::Note5000,
        Denomination::Note1000,
        Denomination::Coin500,
        Denomination::Coin100,
    ];

    /// Face value as a raw integer.
    #[inline]
    pub const fn value(self) -> u64 {
        match self {
            Denomination::Coin100 => 100,
            Denomination::Coin500 => 500,
            Denomination::Note1000 => 1000,
            Denomination::Note5000 => 5000,
            Denomination::Note10000 => 10000,
        }
    }

    /// Face value as Money.
    #[inline]
    pub const fn money(self) -> Money {
        Money::new(self.value())
    }

    /// Looks up a denomination by face value.
    pub const fn from_value(value: u64) -> Option<Self> {
        match value {
            100 => Some(Denomination::Coin100),
            500 => Some(Denomination::Coin500),
            1000 => Some(Denomination::Note1000),
            5000 => Some(Denomination::Note5000),
            10000 => Some(Denomination::Note10000),
            _ => None,
        }
    }
}

impl TryFrom<u64> for Denomination {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Denomination::from_value(value).ok_or(ValidationError::UnknownDenomination(value))
    }
}

impl std::str::FromStr for Denomination {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
        let value = cleaned
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "denomination".to_string(),
                reason: format!("'{}' is not a number", s.trim()),
            })?;
        Denomination::try_from(value)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.money(), f)
    }
}

// =============================================================================
// Serde
// =============================================================================
// Denominations are map keys in the cash inventory. JSON and TOML both hand
// map keys over as strings, while values arrive as integers, so accept both.

impl Serialize for Denomination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value())
    }
}

impl<'de> Deserialize<'de> for Denomination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DenominationVisitor;

        impl<'de> Visitor<'de> for DenominationVisitor {
            type Value = Denomination;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of 10000, 5000, 1000, 500, 100")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Denomination, E> {
                Denomination::try_from(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Denomination, E> {
                let v = u64::try_from(v).map_err(|_| E::custom(format!("negative denomination {}", v)))?;
                self.visit_u64(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Denomination, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DenominationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_descending() {
        let values: Vec<u64> = Denomination::ALL.iter().map(|d| d.value()).collect();
        assert_eq!(values, vec![10000, 5000, 1000, 500, 100]);
    }

    #[test]
    fn test_try_from_rejects_unknown_values() {
        assert_eq!(Denomination::try_from(500).unwrap(), Denomination::Coin500);
        assert!(matches!(
            Denomination::try_from(50),
            Err(ValidationError::UnknownDenomination(50))
        ));
    }

    #[test]
    fn test_from_str_accepts_grouped_digits() {
        assert_eq!("10,000".parse::<Denomination>().unwrap(), Denomination::Note10000);
        assert_eq!(" 100 ".parse::<Denomination>().unwrap(), Denomination::Coin100);
        assert!("ten".parse::<Denomination>().is_err());
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let d: Denomination = serde_json::from_str("1000").unwrap();
        assert_eq!(d, Denomination::Note1000);

        let d: Denomination = serde_json::from_str("\"5000\"").unwrap();
        assert_eq!(d, Denomination::Note5000);

        assert!(serde_json::from_str::<Denomination>("200").is_err());
    }

    #[test]
    fn test_ord_follows_face_value() {
        assert!(Denomination::Coin100 < Denomination::Note10000);
    }
}
