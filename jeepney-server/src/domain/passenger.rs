//! Passenger fare categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown passenger category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown passenger category: {0}")]
pub struct InvalidPassengerCategory(String);

/// Fare category of a rider. Each carries a fixed discount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerCategory {
    #[default]
    Regular,
    Student,
    Senior,
    /// Persons with disability.
    #[serde(alias = "disabled")]
    Pwd,
}

impl PassengerCategory {
    /// Share of the regular fare this category pays, in percent.
    pub fn fare_percent(self) -> u32 {
        match self {
            PassengerCategory::Regular => 100,
            PassengerCategory::Student => 80,
            PassengerCategory::Senior | PassengerCategory::Pwd => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PassengerCategory::Regular => "regular",
            PassengerCategory::Student => "student",
            PassengerCategory::Senior => "senior",
            PassengerCategory::Pwd => "pwd",
        }
    }
}

impl FromStr for PassengerCategory {
    type Err = InvalidPassengerCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(PassengerCategory::Regular),
            "student" => Ok(PassengerCategory::Student),
            "senior" => Ok(PassengerCategory::Senior),
            "pwd" | "disabled" => Ok(PassengerCategory::Pwd),
            _ => Err(InvalidPassengerCategory(s.to_string())),
        }
    }
}

impl fmt::Display for PassengerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
