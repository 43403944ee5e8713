use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::error::RateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A current exchange-rate quote against the home currency.
///
/// `value` is the number of `base_symbol` units one unit of `quote_symbol`
/// buys. `currency` is the currency the caller asked about and always equals
/// `quote_symbol`.
///
/// Rates are immutable once created. A fresh one is produced per request.
///
/// # Examples
///
/// ```
/// use cambio_engine::core::currency::CurrencyCode;
/// use cambio_engine::core::rate::Rate;
/// use chrono::Utc;
///
/// let usd = CurrencyCode::parse("USD").unwrap();
/// let rate = Rate::new(usd.clone(), 5.30, Utc::now(), CurrencyCode::brl()).unwrap();
///
/// assert_eq!(rate.value(), 5.30);
/// assert_eq!(rate.quote_symbol(), &usd);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRate")]
pub struct Rate {
    /// The currency being priced.
    currency: CurrencyCode,
    /// Units of base currency per unit of quote currency. Positive and finite.
    value: f64,
    /// When the upstream source last updated the quote.
    as_of: DateTime<Utc>,
    /// The home currency.
    base_symbol: CurrencyCode,
    /// The foreign currency; same as `currency`.
    quote_symbol: CurrencyCode,
}

impl Rate {
    /// Create a new rate quoting `currency` against `base`.
    ///
    /// Fails with [`RateError::InvalidInput`] if `value` is not positive and finite.
    pub fn new(
        currency: CurrencyCode,
        value: f64,
        as_of: DateTime<Utc>,
        base: CurrencyCode,
    ) -> Result<Self, RateError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(RateError::InvalidInput(format!(
                "rate for {} must be positive and finite, got {}",
                currency, value
            )));
        }
        Ok(Self {
            quote_symbol: currency.clone(),
            currency,
            value,
            as_of,
            base_symbol: base,
        })
    }

    // --- Accessors ---

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn base_symbol(&self) -> &CurrencyCode {
        &self.base_symbol
    }

    pub fn quote_symbol(&self) -> &CurrencyCode {
        &self.quote_symbol
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base_symbol.clone(), self.quote_symbol.clone())
    }
}

/// Wire shape of [`Rate`]; checked by [`Rate::new`] before it becomes one.
#[derive(Deserialize)]
struct RawRate {
    currency: CurrencyCode,
    value: f64,
    as_of: DateTime<Utc>,
    base_symbol: CurrencyCode,
    quote_symbol: CurrencyCode,
}

impl TryFrom<RawRate> for Rate {
    type Error = RateError;

    fn try_from(raw: RawRate) -> Result<Self, Self::Error> {
        if raw.quote_symbol != raw.currency {
            return Err(RateError::InvalidInput(format!(
                "quote symbol {} does not match currency {}",
                raw.quote_symbol, raw.currency
            )));
        }
        Rate::new(raw.currency, raw.value, raw.as_of, raw.base_symbol)
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "1 {} = {:.4} {} (as of {})",
            self.quote_symbol,
            self.value,
            self.base_symbol,
            self.as_of.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
