//! Fare amounts.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A fare in centavos (1/100 of the currency unit).
///
/// Amounts are kept as integers so that tariff arithmetic is exact; they
/// serialize as a plain number of currency units (e.g. `14.8`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fare(u64);

impl Fare {
    pub const ZERO: Fare = Fare(0);

    pub fn from_centavos(centavos: u64) -> Self {
        Self(centavos)
    }

    /// Amount from whole currency units, rounded to the centavo.
    ///
    /// `None` for negative, non-finite or unrepresentably large amounts.
    pub fn from_pesos(pesos: f64) -> Option<Self> {
        let centavos = (pesos * 100.0).round();
        (centavos.is_finite() && (0.0..u64::MAX as f64).contains(&centavos))
            .then(|| Self(centavos as u64))
    }

    pub fn centavos(self) -> u64 {
        self.0
    }

    /// Amount in whole currency units.
    pub fn as_pesos(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Add for Fare {
    type Output = Fare;

    /// Saturates at the largest representable amount.
    fn add(self, rhs: Fare) -> Fare {
        Fare(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Fare {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_pesos())
    }
}

impl<'de> Deserialize<'de> for Fare {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pesos = f64::deserialize(deserializer)?;
        Fare::from_pesos(pesos)
            .ok_or_else(|| serde::de::Error::custom("fare must be a non-negative number"))
    }
}
