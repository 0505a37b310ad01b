//! Contiguous month-indexed series.
//!
//! A [`MonthlySeries`] is a start month plus one value per consecutive month.
//! Position `i` stands for `start.offset(i)`, so windows and shifts are plain
//! integer offsets and never depend on calendar lookups. Undefined values are
//! `NaN` and flow through arithmetic untouched.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StockscapeError};
use crate::model::Month;

/// Values for a run of consecutive months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySeries {
    start: Month,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Series starting at `start` with one value per consecutive month.
    pub fn new(start: Month, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    /// A series of `len` copies of `value`.
    pub fn filled(start: Month, len: usize, value: f64) -> Self {
        Self::new(start, vec![value; len])
    }

    /// Build from dated values, rejecting gaps, duplicates and disorder.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Month, f64)>,
    {
        let mut iter = pairs.into_iter();
        let (start, first) = iter.next().ok_or(StockscapeError::InsufficientData {
            required: 1,
            actual: 0,
        })?;

        let mut values = vec![first];
        let mut previous = start;
        for (month, value) in iter {
            let expected = previous.offset(1);
            if month != expected {
                return Err(StockscapeError::NonContiguousIndex {
                    expected,
                    actual: month,
                });
            }
            values.push(value);
            previous = month;
        }

        Ok(Self { start, values })
    }

    /// First month covered.
    pub fn start(&self) -> Month {
        self.start
    }

    /// Last month covered, `None` when empty.
    pub fn end(&self) -> Option<Month> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.month_at(self.values.len() - 1))
        }
    }

    /// Number of months covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series covers no month.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in month order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Take the values, dropping the index.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Month at position `index`.
    pub fn month_at(&self, index: usize) -> Month {
        self.start.offset(index as i64)
    }

    /// Position of `month` in this series.
    pub fn position(&self, month: Month) -> Option<usize> {
        let offset = self.start.months_until(month);
        if offset >= 0 && (offset as usize) < self.values.len() {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Whether `month` is inside the covered range.
    pub fn contains(&self, month: Month) -> bool {
        self.position(month).is_some()
    }

    /// Value at `month`; `NaN` outside the covered range.
    pub fn get(&self, month: Month) -> f64 {
        self.position(month)
            .map(|i| self.values[i])
            .unwrap_or(f64::NAN)
    }

    /// Whether both series cover exactly the same months.
    pub fn same_index(&self, other: &MonthlySeries) -> bool {
        self.start == other.start && self.values.len() == other.values.len()
    }

    /// Covered months in order.
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        (0..self.values.len()).map(move |i| self.month_at(i))
    }

    /// Dated values in month order, `NaN` included.
    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.month_at(i), v))
    }

    /// Dated values that are not `NaN`.
    pub fn defined(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.iter().filter(|(_, v)| !v.is_nan())
    }

    /// Most recent defined value.
    pub fn last_defined(&self) -> Option<(Month, f64)> {
        self.values
            .iter()
            .rposition(|v| !v.is_nan())
            .map(|i| (self.month_at(i), self.values[i]))
    }

    /// Apply `f` to every value, keeping the index.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self::new(self.start, self.values.iter().map(|&v| f(v)).collect())
    }

    /// Combine two series month by month over the union of their ranges.
    /// Months covered by only one side see `NaN` for the other.
    pub fn zip_with<F>(&self, other: &MonthlySeries, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.same_index(other) {
            let values = self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Self::new(self.start, values);
        }

        let (start, end) = match (self.end(), other.end()) {
            (None, None) => return Self::new(self.start.min(other.start), Vec::new()),
            (Some(end), None) => (self.start, end),
            (None, Some(end)) => (other.start, end),
            (Some(a), Some(b)) => (self.start.min(other.start), a.max(b)),
        };

        let len = start.months_until(end) as usize + 1;
        let values = (0..len)
            .map(|i| {
                let month = start.offset(i as i64);
                f(self.get(month), other.get(month))
            })
            .collect();
        Self::new(start, values)
    }

    /// Shift values by `periods` positions over a fixed index.
    ///
    /// A positive shift lags (the value at month M becomes the value of
    /// M - periods); a negative shift leads, pulling future values back.
    /// Positions with no source value become `NaN`.
    pub fn shift(&self, periods: i64) -> Self {
        let len = self.values.len() as i64;
        let values = (0..len)
            .map(|i| {
                let source = i - periods;
                if source >= 0 && source < len {
                    self.values[source as usize]
                } else {
                    f64::NAN
                }
            })
            .collect();
        Self::new(self.start, values)
    }

    /// Trailing rolling aggregation.
    ///
    /// The window ending at position `i` spans `window` positions, truncated
    /// at the start of the series. When it holds fewer than `min_periods`
    /// defined values (or none at all) the result is `NaN`; otherwise the
    /// raw window, `NaN`s included, is handed to `f`.
    pub fn rolling<F>(&self, window: usize, min_periods: usize, f: F) -> Self
    where
        F: Fn(&[f64]) -> f64,
    {
        let values = (0..self.values.len())
            .map(|i| {
                let lo = (i + 1).saturating_sub(window);
                let slice = &self.values[lo..i + 1];
                let observed = slice.iter().filter(|v| !v.is_nan()).count();
                if observed == 0 || observed < min_periods {
                    f64::NAN
                } else {
                    f(slice)
                }
            })
            .collect();
        Self::new(self.start, values)
    }

    /// Remove the first `n` months.
    pub fn drop_leading(&self, n: usize) -> Self {
        let n_kept = n.min(self.values.len());
        Self::new(self.start.offset(n as i64), self.values[n_kept..].to_vec())
    }

    /// Smallest defined value, `NaN` if there is none.
    pub fn min(&self) -> f64 {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(f64::NAN, |acc, &v| if acc.is_nan() || v < acc { v } else { acc })
    }

    /// Largest defined value, `NaN` if there is none.
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(f64::NAN, |acc, &v| if acc.is_nan() || v > acc { v } else { acc })
    }
}
