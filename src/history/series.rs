use crate::core::currency::CurrencyCode;
use crate::error::RateError;
use crate::history::statistics::SeriesStatistics;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily rate in a historical series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    /// Rounded to 4 decimal places.
    pub rate: Decimal,
    pub currency: CurrencyCode,
}

/// Calendar span covered by a series, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
}

/// A chronological run of daily rates plus the statistics derived from them.
///
/// Built in one shot by [`HistoricalSeries::from_points`]; statistics are
/// always recomputed from the points and never set independently. That holds
/// for deserialization too: a `statistics` field in the input is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct HistoricalSeries {
    currency: CurrencyCode,
    points: Vec<HistoricalPoint>,
    window: SeriesWindow,
    statistics: SeriesStatistics,
}

impl HistoricalSeries {
    /// Assemble a series from chronologically ascending points.
    ///
    /// Fails with [`RateError::InvalidInput`] if the points are empty, out of
    /// order, or priced in a currency other than `currency`.
    pub fn from_points(
        currency: CurrencyCode,
        points: Vec<HistoricalPoint>,
        window: SeriesWindow,
    ) -> Result<Self, RateError> {
        if let Some(point) = points.iter().find(|p| p.currency != currency) {
            return Err(RateError::InvalidInput(format!(
                "point on {} is priced in {}, series is {}",
                point.date, point.currency, currency
            )));
        }
        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(RateError::InvalidInput(format!(
                "points out of order: {} then {}",
                pair[0].date, pair[1].date
            )));
        }
        let rates: Vec<Decimal> = points.iter().map(|p| p.rate).collect();
        let statistics = SeriesStatistics::from_rates(&rates)?;
        Ok(Self {
            currency,
            points,
            window,
            statistics,
        })
    }

    // --- Accessors ---

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn points(&self) -> &[HistoricalPoint] {
        &self.points
    }

    pub fn window(&self) -> SeriesWindow {
        self.window
    }

    pub fn window_start(&self) -> NaiveDate {
        self.window.start
    }

    pub fn window_end(&self) -> NaiveDate {
        self.window.end
    }

    pub fn window_days(&self) -> u32 {
        self.window.days
    }

    pub fn statistics(&self) -> &SeriesStatistics {
        &self.statistics
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<&HistoricalPoint> {
        self.points.last()
    }
}

/// Inputs of [`HistoricalSeries::from_points`], as they appear on the wire.
#[derive(Deserialize)]
struct RawSeries {
    currency: CurrencyCode,
    points: Vec<HistoricalPoint>,
    window: SeriesWindow,
}

impl TryFrom<RawSeries> for HistoricalSeries {
    type Error = RateError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        HistoricalSeries::from_points(raw.currency, raw.points, raw.window)
    }
}

impl std::fmt::Display for HistoricalSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = &self.statistics;
        writeln!(
            f,
            "=== {} over {} days ({} to {}) ===",
            self.currency, self.window.days, self.window.start, self.window.end
        )?;
        writeln!(f, "Min:     {}", stats.min)?;
        writeln!(f, "Max:     {}", stats.max)?;
        writeln!(f, "Average: {}", stats.average)?;
        writeln!(f, "Change:  {}% ({})", stats.change_percent, stats.trend)?;

        writeln!(f, "\nDaily Rates:")?;
        for point in &self.points {
            writeln!(f, "  {}  {}", point.date, point.rate)?;
        }
        Ok(())
    }
}
