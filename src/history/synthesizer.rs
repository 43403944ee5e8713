//! Synthetic daily history for a currency, derived from a single current quote.
//!
//! There is no historical endpoint upstream, so the dashboard charts a bounded
//! random walk instead: the walk starts near the current rate and moves by at
//! most ±2% per day. The last point lands near, not exactly on, the current rate.

use crate::core::rate::Rate;
use crate::error::RateError;
use crate::history::series::{HistoricalPoint, HistoricalSeries, SeriesWindow};
use crate::history::statistics::round;
use chrono::{Days, NaiveDate, Utc};
use log::debug;
use rand::Rng;
use rust_decimal::Decimal;

/// Window the dashboard asks for when the user has not picked one.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Longest window accepted, about ten years of daily points.
pub const MAX_WINDOW_DAYS: u32 = 3_650;

/// Maximum relative distance of the walk's starting value from the current rate.
pub const SEED_JITTER: f64 = 0.02;

/// Maximum relative move per day.
pub const DAILY_VOLATILITY: f64 = 0.02;

/// Clamp bounds, relative to the value after each daily move.
pub const CLAMP_LOWER: f64 = 0.8;
pub const CLAMP_UPPER: f64 = 1.2;

const RATE_DECIMALS: u32 = 4;

/// Generates [`HistoricalSeries`] from a current [`Rate`].
///
/// Stateless; all randomness comes from the `Rng` handed to
/// [`synthesize_with`](Self::synthesize_with), so a seeded generator plus a
/// fixed `today` reproduces the same series.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistorySynthesizer;

impl HistorySynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize `days + 1` daily points ending today (UTC), using the thread RNG.
    pub fn synthesize(&self, current: &Rate, days: u32) -> Result<HistoricalSeries, RateError> {
        let today = Utc::now().date_naive();
        self.synthesize_with(&mut rand::thread_rng(), current, days, today)
    }

    /// Synthesize `days + 1` daily points ending at `today`.
    ///
    /// Fails with [`RateError::InvalidInput`] when `days` is zero or above
    /// [`MAX_WINDOW_DAYS`], the current rate is not positive and finite, the
    /// window falls outside the representable calendar, or the walk leaves the
    /// range of [`Decimal`].
    pub fn synthesize_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current: &Rate,
        days: u32,
        today: NaiveDate,
    ) -> Result<HistoricalSeries, RateError> {
        if days < 1 {
            return Err(RateError::InvalidInput(format!(
                "history window must be at least 1 day, got {}",
                days
            )));
        }
        if days > MAX_WINDOW_DAYS {
            return Err(RateError::InvalidInput(format!(
                "history window must be at most {} days, got {}",
                MAX_WINDOW_DAYS, days
            )));
        }
        let value = current.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(RateError::InvalidInput(format!(
                "current rate must be positive and finite, got {}",
                value
            )));
        }

        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                RateError::InvalidInput(format!("{} days before {} is out of range", days, today))
            })?;

        let currency = current.quote_symbol().clone();
        let mut simulated = value * rng.gen_range(1.0 - SEED_JITTER..=1.0 + SEED_JITTER);
        let mut points = Vec::with_capacity(days as usize + 1);

        for (date, _) in start.iter_days().zip(0..=days) {
            simulated *= rng.gen_range(1.0 - DAILY_VOLATILITY..=1.0 + DAILY_VOLATILITY);
            simulated = clamp_relative(simulated);

            points.push(HistoricalPoint {
                date,
                rate: to_rate_decimal(simulated)?,
                currency: currency.clone(),
            });
        }

        let window = SeriesWindow {
            start,
            end: today,
            days,
        };
        let series = HistoricalSeries::from_points(currency, points, window)?;
        debug!(
            "synthesized {} points for {} ({} to {}), change {}%",
            series.len(),
            series.currency(),
            start,
            today,
            series.statistics().change_percent
        );
        Ok(series)
    }
}

/// Bounds are taken relative to `value` itself, so this never moves it.
fn clamp_relative(value: f64) -> f64 {
    value.max(value * CLAMP_LOWER).min(value * CLAMP_UPPER)
}

fn to_rate_decimal(value: f64) -> Result<Decimal, RateError> {
    let rate = Decimal::from_f64_retain(value)
        .map(|d| round(d, RATE_DECIMALS))
        .ok_or_else(|| {
            RateError::InvalidInput(format!("simulated rate {} is not representable", value))
        })?;
    if rate <= Decimal::ZERO {
        return Err(RateError::InvalidInput(format!(
            "simulated rate {} rounds to zero at {} decimal places",
            value, RATE_DECIMALS
        )));
    }
    Ok(rate)
}
