use crate::error::RateError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Net change, in percent, above which a window counts as trending up
/// (and below whose negation it counts as trending down).
pub const TREND_THRESHOLD_PERCENT: Decimal = dec!(2);

/// Direction of net change over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Strict comparison: exactly +2% or -2% is still `Stable`.
    pub fn classify(change_percent: Decimal) -> Self {
        if change_percent > TREND_THRESHOLD_PERCENT {
            Trend::Up
        } else if change_percent < -TREND_THRESHOLD_PERCENT {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Descriptive statistics over a chronological rate sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesStatistics {
    pub min: Decimal,
    pub max: Decimal,
    /// Arithmetic mean, 4 decimal places.
    pub average: Decimal,
    /// `(last - first) / first * 100`, 2 decimal places.
    pub change_percent: Decimal,
    pub trend: Trend,
}

impl SeriesStatistics {
    /// Compute statistics over `rates`, oldest first.
    ///
    /// Fails with [`RateError::InvalidInput`] on an empty sequence, when the
    /// first rate is zero (the change would be undefined), or when the sum or
    /// change falls outside the range of [`Decimal`].
    pub fn from_rates(rates: &[Decimal]) -> Result<Self, RateError> {
        let (first, last) = match (rates.first(), rates.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                return Err(RateError::InvalidInput(
                    "cannot compute statistics of an empty series".to_string(),
                ))
            }
        };
        if first.is_zero() {
            return Err(RateError::InvalidInput(
                "first rate of the series rounds to zero".to_string(),
            ));
        }

        let mut min = first;
        let mut max = first;
        let mut sum = Decimal::ZERO;
        for rate in rates {
            min = min.min(*rate);
            max = max.max(*rate);
            sum = sum.checked_add(*rate).ok_or_else(|| out_of_range("sum"))?;
        }

        let average = sum
            .checked_div(Decimal::from(rates.len()))
            .map(|mean| round(mean, 4))
            .ok_or_else(|| out_of_range("average"))?;
        let change_percent = last
            .checked_sub(first)
            .and_then(|delta| delta.checked_div(first))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|change| round(change, 2))
            .ok_or_else(|| out_of_range("change"))?;

        Ok(Self {
            min,
            max,
            average,
            change_percent,
            trend: Trend::classify(change_percent),
        })
    }
}

fn out_of_range(what: &str) -> RateError {
    RateError::InvalidInput(format!("series {} exceeds the decimal range", what))
}

/// Half-away-from-zero rounding, the way rates are displayed.
pub(crate) fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
