//! TradeDate: a calendar day exchanged as a `YYYYMMDD` integer ordinal.
//!
//! Stored as a `NaiveDate` so calendar arithmetic is exact, serialized and
//! displayed as the integer form used by the bar store (`20240105`).

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("{0} is not a valid YYYYMMDD trade date")]
    InvalidOrdinal(u32),

    #[error("cannot parse trade date from '{0}' (expected YYYYMMDD or YYYY-MM-DD)")]
    Unparsable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(NaiveDate);

impl TradeDate {
    /// Build from an integer ordinal such as `20240105`.
    pub fn from_ordinal(yyyymmdd: u32) -> Result<Self, DateError> {
        let year = (yyyymmdd / 10_000) as i32;
        let month = (yyyymmdd / 100) % 100;
        let day = yyyymmdd % 100;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidOrdinal(yyyymmdd))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn ordinal(self) -> u32 {
        self.0.year() as u32 * 10_000 + self.0.month() * 100 + self.0.day()
    }

    pub fn as_naive(self) -> NaiveDate {
        self.0
    }

    /// Calendar-day arithmetic; negative `days` moves backwards.
    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }
}

impl From<NaiveDate> for TradeDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

impl FromStr for TradeDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if trimmed.len() == 8 {
            if let Ok(n) = trimmed.parse::<u32>() {
                return Self::from_ordinal(n);
            }
        }
        Err(DateError::Unparsable(trimmed.to_string()))
    }
}

impl Serialize for TradeDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self::from_ordinal(n).map_err(serde::de::Error::custom),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
