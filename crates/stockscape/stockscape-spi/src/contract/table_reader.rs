//! Input table reader trait.

use crate::error::Result;
use crate::model::IeTable;

/// Source of the monthly price, dividend, earnings, CPI and bond-yield table.
///
/// Implementations must return series indexed by the first day of each
/// month, contiguous and increasing, with the bond yield as a fraction.
pub trait TableReader {
    fn read(&self) -> Result<IeTable>;
}
