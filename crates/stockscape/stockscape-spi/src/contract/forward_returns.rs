//! Forward-looking returns trait.

use crate::model::MonthlySeries;

/// A table of returns realized over the `horizon_years` following each month.
///
/// Consumers that annualize or de-annualize alongside these returns must use
/// the same horizon, so it travels with the table.
pub trait ForwardReturns {
    /// Horizon in years.
    fn horizon_years(&self) -> u32;

    /// Cumulative return over the horizon.
    fn gross(&self) -> &MonthlySeries;

    /// Annualized return over the horizon.
    fn annualized(&self) -> &MonthlySeries;
}
