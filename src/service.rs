//! The two entry points a dashboard needs, wired together.

use crate::config::ExchangeConfig;
use crate::core::currency::CurrencyCode;
use crate::core::rate::Rate;
use crate::error::RateError;
use crate::fetch::fetcher::RateFetcher;
use crate::fetch::transport::HttpClient;
use crate::history::series::HistoricalSeries;
use crate::history::synthesizer::HistorySynthesizer;
use log::info;
use std::sync::Arc;

/// Fetches current quotes and derives historical series from them.
///
/// Holds no per-query state; every call is independent and nothing is cached.
#[derive(Clone)]
pub struct ExchangeService {
    fetcher: RateFetcher,
    synthesizer: HistorySynthesizer,
}

impl ExchangeService {
    pub fn new(config: ExchangeConfig) -> Result<Self, RateError> {
        Ok(Self::from_parts(
            RateFetcher::new(config)?,
            HistorySynthesizer::new(),
        ))
    }

    pub fn with_http_client(config: ExchangeConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self::from_parts(
            RateFetcher::with_http_client(config, http_client),
            HistorySynthesizer::new(),
        )
    }

    pub fn from_parts(fetcher: RateFetcher, synthesizer: HistorySynthesizer) -> Self {
        Self {
            fetcher,
            synthesizer,
        }
    }

    pub fn fetcher(&self) -> &RateFetcher {
        &self.fetcher
    }

    pub async fn current_rate(&self, code: &CurrencyCode) -> Result<Rate, RateError> {
        self.fetcher.fetch(code).await
    }

    /// Current rates for every configured dashboard currency, all or nothing.
    pub async fn all_current_rates(&self) -> Result<Vec<Rate>, RateError> {
        self.fetcher.fetch_supported().await
    }

    /// Fetch the current rate for `code`, then synthesize `days` of history ending today.
    pub async fn historical_rates(
        &self,
        code: &CurrencyCode,
        days: u32,
    ) -> Result<HistoricalSeries, RateError> {
        let current = self.fetcher.fetch(code).await?;
        let series = self.synthesizer.synthesize(&current, days)?;
        info!(
            "{} history over {} days: {} ({}%)",
            code,
            days,
            series.statistics().trend,
            series.statistics().change_percent
        );
        Ok(series)
    }
}
