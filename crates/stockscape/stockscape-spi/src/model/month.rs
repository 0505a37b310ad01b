//! Calendar month index.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StockscapeError};

/// A calendar month, standing for the period that starts on its first day.
///
/// Months are ordered and support integer offset arithmetic, which is what
/// every window and shift in the analysis is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month; `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(StockscapeError::invalid_parameter(
                "month",
                format!("{} is not in 1..=12", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month, if representable as a `NaiveDate`.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: (ordinal.rem_euclid(12) + 1) as u32,
        }
    }

    /// The month `n` months after this one (before it when `n` is negative).
    pub fn offset(&self, n: i64) -> Self {
        Self::from_ordinal(self.ordinal() + n)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: Month) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// `YYYY-MM` label used by the export.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = StockscapeError;

    /// Accepts `YYYY-MM`, `YYYY-MM-DD` and the decimal `YYYY.MM` used in
    /// Shiller's workbook, where `1871.1` means October.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let unrecognized = || StockscapeError::ReadError(format!("unrecognized month '{}'", s));

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        if let Some((year, month)) = s.split_once('-') {
            let year = year.parse::<i32>().map_err(|_| unrecognized())?;
            let month = month.parse::<u32>().map_err(|_| unrecognized())?;
            return Self::new(year, month).map_err(|_| unrecognized());
        }

        if let Some((year, fraction)) = s.split_once('.') {
            let year = year.parse::<i32>().map_err(|_| unrecognized())?;
            let month = match fraction.len() {
                1 => fraction.parse::<u32>().map(|m| m * 10),
                2 => fraction.parse::<u32>(),
                _ => return Err(unrecognized()),
            }
            .map_err(|_| unrecognized())?;
            return Self::new(year, month).map_err(|_| unrecognized());
        }

        Err(unrecognized())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
