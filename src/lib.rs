//! # cambio-engine
//!
//! Exchange-rate retrieval and historical series synthesis for a currency
//! dashboard quoted against the Brazilian Real.
//!
//! A caller hands in a validated 3-letter currency code; the engine fetches
//! the current quote from the upstream rate endpoint and, since no historical
//! endpoint exists, synthesizes a bounded random-walk history around it with
//! min/max/average/change statistics and a trend label.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: currency codes, rates
//! - **fetch** — Upstream transport, wire envelope, and the rate fetcher
//! - **history** — Random-walk synthesis, series, and statistics
//! - **service** — Fetch-then-synthesize pipeline used by the dashboard

pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod history;
pub mod service;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::ExchangeConfig;
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::rate::Rate;
    pub use crate::error::RateError;
    pub use crate::fetch::fetcher::RateFetcher;
    pub use crate::history::series::{HistoricalPoint, HistoricalSeries};
    pub use crate::history::statistics::{SeriesStatistics, Trend};
    pub use crate::history::synthesizer::HistorySynthesizer;
    pub use crate::service::ExchangeService;
}
