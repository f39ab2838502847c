//! Fare estimation.
//!
//! Jeepney fares are distance-based: a flat base fare covers the first few
//! kilometres and every started kilometre beyond that adds a fixed increment.
//! Discounted categories pay a share of the regular fare, rounded to the
//! nearest quarter.

use serde::Serialize;

use crate::domain::{Fare, PassengerCategory};

/// A distance-based fare table. Amounts are in centavos.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    /// Flat fare covering the first `base_distance_km`.
    pub base_fare: u32,

    /// Distance covered by the base fare.
    pub base_distance_km: f64,

    /// Added for every started kilometre beyond the base distance.
    pub per_km: u32,

    /// Discounted fares are rounded to a multiple of this.
    pub rounding_unit: u32,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            base_fare: 1300,
            base_distance_km: 4.0,
            per_km: 180,
            rounding_unit: 25,
        }
    }
}

/// How a fare was arrived at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareBreakdown {
    pub distance_km: f64,
    pub passenger: PassengerCategory,
    pub base_fare: Fare,
    pub additional_fare: Fare,
    /// Undiscounted fare.
    pub regular_fare: Fare,
    /// What this passenger pays.
    pub fare: Fare,
}

impl Tariff {
    /// Fare for riding `distance_km` as `category`.
    ///
    /// Non-decreasing in `distance_km` for a fixed category.
    ///
    /// # Panics
    ///
    /// Panics if `distance_km` is negative or not finite.
    pub fn fare(&self, distance_km: f64, category: PassengerCategory) -> Fare {
        self.breakdown(distance_km, category).fare
    }

    /// Fare together with its components.
    ///
    /// # Panics
    ///
    /// Panics if `distance_km` is negative or not finite.
    pub fn breakdown(&self, distance_km: f64, category: PassengerCategory) -> FareBreakdown {
        assert!(
            distance_km.is_finite() && distance_km >= 0.0,
            "fare distance must be a non-negative number, got {distance_km}"
        );

        // Float-to-int `as` saturates, so absurd distances pin at the top of the table
        let extra_km = (distance_km - self.base_distance_km).max(0.0).ceil() as u64;
        let additional = u64::from(self.per_km).saturating_mul(extra_km);
        let regular = u64::from(self.base_fare).saturating_add(additional);

        FareBreakdown {
            distance_km,
            passenger: category,
            base_fare: Fare::from_centavos(u64::from(self.base_fare)),
            additional_fare: Fare::from_centavos(additional),
            regular_fare: Fare::from_centavos(regular),
            fare: Fare::from_centavos(self.discounted(regular, category)),
        }
    }

    /// Apply the category's discount, rounding half-up to `rounding_unit`.
    fn discounted(&self, regular: u64, category: PassengerCategory) -> u64 {
        let percent = category.fare_percent();
        if percent == 100 {
            return regular;
        }

        let step = u128::from(self.rounding_unit.max(1));
        let unit = step * 100;
        let scaled = u128::from(regular) * u128::from(percent);
        let rounded = (scaled + unit / 2) / unit * step;
        u64::try_from(rounded).unwrap_or(u64::MAX)
    }
}

/// Fare under the default tariff.
///
/// ```
/// use jeepney_server::domain::PassengerCategory;
/// use jeepney_server::planner::fare;
///
/// assert_eq!(fare(4.0, PassengerCategory::Regular).as_pesos(), 13.0);
/// assert_eq!(fare(5.0, PassengerCategory::Regular).as_pesos(), 14.8);
/// ```
pub fn fare(distance_km: f64, category: PassengerCategory) -> Fare {
    Tariff::default().fare(distance_km, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pesos(km: f64, category: PassengerCategory) -> f64 {
        fare(km, category).as_pesos()
    }

    #[test]
    fn base_fare_covers_first_four_km() {
        assert_eq!(pesos(0.0, PassengerCategory::Regular), 13.0);
        assert_eq!(pesos(2.5, PassengerCategory::Regular), 13.0);
        assert_eq!(pesos(4.0, PassengerCategory::Regular), 13.0);
    }

    #[test]
    fn started_kilometres_are_charged() {
        assert_eq!(pesos(4.01, PassengerCategory::Regular), 14.8);
        assert_eq!(pesos(5.0, PassengerCategory::Regular), 14.8);
        assert_eq!(pesos(5.5, PassengerCategory::Regular), 16.6);
        assert_eq!(pesos(10.0, PassengerCategory::Regular), 23.8);
    }

    #[test]
    fn discounts() {
        // 14.80 * 0.8 = 11.84 -> 11.75
        assert_eq!(pesos(5.0, PassengerCategory::Student), 11.75);
        // 14.80 * 0.5 = 7.40 -> 7.50
        assert_eq!(pesos(5.0, PassengerCategory::Senior), 7.5);
        assert_eq!(pesos(5.0, PassengerCategory::Pwd), 7.5);
        // 13.00 * 0.5 = 6.50
        assert_eq!(pesos(1.0, PassengerCategory::Senior), 6.5);
        // 13.00 * 0.8 = 10.40 -> 10.50
        assert_eq!(pesos(1.0, PassengerCategory::Student), 10.5);
    }

    #[test]
    fn breakdown_components() {
        let b = Tariff::default().breakdown(6.2, PassengerCategory::Student);
        assert_eq!(b.base_fare, Fare::from_centavos(1300));
        assert_eq!(b.additional_fare, Fare::from_centavos(540));
        assert_eq!(b.regular_fare, Fare::from_centavos(1840));
        // 18.40 * 0.8 = 14.72 -> 14.75
        assert_eq!(b.fare, Fare::from_centavos(1475));
    }

    #[test]
    fn custom_tariff() {
        let tariff = Tariff {
            base_fare: 1300,
            base_distance_km: 1.0,
            per_km: 180,
            rounding_unit: 25,
        };
        assert_eq!(tariff.fare(1.0, PassengerCategory::Regular).as_pesos(), 13.0);
        assert_eq!(tariff.fare(3.0, PassengerCategory::Regular).as_pesos(), 16.6);
    }

    #[test]
    fn zero_rounding_unit_rounds_to_the_centavo() {
        let tariff = Tariff {
            rounding_unit: 0,
            ..Tariff::default()
        };
        // 14.80 * 0.8 = 11.84
        assert_eq!(tariff.fare(5.0, PassengerCategory::Student), Fare::from_centavos(1184));
    }

    #[test]
    fn very_long_distances_do_not_overflow() {
        // 1300 + 180 * 29_999_996
        assert_eq!(fare(30_000_000.0, PassengerCategory::Regular).centavos(), 5_400_000_580);
        assert_eq!(fare(30_000_000.0, PassengerCategory::Senior).centavos(), 2_700_000_300);

        let top = Tariff::default().breakdown(f64::MAX, PassengerCategory::Regular);
        assert_eq!(top.regular_fare.centavos(), u64::MAX);
        assert!(fare(f64::MAX, PassengerCategory::Student) <= top.regular_fare);
        assert!(fare(1e300, PassengerCategory::Pwd) <= fare(f64::MAX, PassengerCategory::Pwd));
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_distance_panics() {
        fare(-0.5, PassengerCategory::Regular);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn nan_distance_panics() {
        fare(f64::NAN, PassengerCategory::Regular);
    }
}
