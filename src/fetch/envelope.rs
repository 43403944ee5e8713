//! Wire format of the upstream current-rate endpoint.

use crate::core::currency::CurrencyCode;
use crate::core::rate::Rate;
use crate::error::RateError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Raw JSON envelope. Every data field is optional so a missing field is
/// reported by name instead of as a generic parse failure.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRateEnvelope {
    #[serde(default)]
    pub success: bool,
    pub last_updated_at: Option<String>,
    pub from_symbol: Option<String>,
    pub to_symbol: Option<String>,
    pub exchange_rate: Option<f64>,
    pub error: Option<String>,
}

impl CurrentRateEnvelope {
    pub fn from_json(body: &str) -> Result<Self, RateError> {
        serde_json::from_str(body)
            .map_err(|e| RateError::InvalidResponse(format!("malformed JSON envelope: {}", e)))
    }

    /// Map a successful envelope onto a [`Rate`] for the requested pair.
    pub fn into_rate(
        self,
        requested: &CurrencyCode,
        base: &CurrencyCode,
    ) -> Result<Rate, RateError> {
        if !self.success {
            let detail = self.error.as_deref().unwrap_or("no detail given");
            return Err(RateError::InvalidResponse(format!(
                "rate service reported failure for {}: {}",
                requested, detail
            )));
        }

        let quoted = required(self.from_symbol, "fromSymbol")?;
        let against = required(self.to_symbol, "toSymbol")?;
        let value = required(self.exchange_rate, "exchangeRate")?;
        let updated = required(self.last_updated_at, "lastUpdatedAt")?;

        expect_symbol(&quoted, requested, "fromSymbol")?;
        expect_symbol(&against, base, "toSymbol")?;

        if !value.is_finite() || value <= 0.0 {
            return Err(RateError::InvalidResponse(format!(
                "exchangeRate must be positive and finite, got {}",
                value
            )));
        }

        let as_of = parse_timestamp(&updated)?;
        Rate::new(requested.clone(), value, as_of, base.clone())
            .map_err(|e| RateError::InvalidResponse(e.to_string()))
    }
}

fn required<T>(field: Option<T>, name: &str) -> Result<T, RateError> {
    field.ok_or_else(|| RateError::InvalidResponse(format!("missing field '{}'", name)))
}

fn expect_symbol(raw: &str, expected: &CurrencyCode, name: &str) -> Result<(), RateError> {
    let code = CurrencyCode::parse(raw)
        .map_err(|e| RateError::InvalidResponse(format!("{}: {}", name, e)))?;
    if &code != expected {
        return Err(RateError::InvalidResponse(format!(
            "{} is {}, expected {}",
            name, code, expected
        )));
    }
    Ok(())
}

/// Accepts RFC 3339 timestamps, and offset-less ISO-8601 timestamps taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RateError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|_| RateError::InvalidResponse(format!("unparseable lastUpdatedAt '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    const OK_BODY: &str = r#"{
        "success": true,
        "lastUpdatedAt": "2024-01-01T12:00:00Z",
        "fromSymbol": "USD",
        "toSymbol": "BRL",
        "exchangeRate": 5.3071
    }"#;

    #[test]
    fn test_success_envelope_maps_to_rate() {
        let envelope = CurrentRateEnvelope::from_json(OK_BODY).unwrap();
        let rate = envelope.into_rate(&usd(), &CurrencyCode::brl()).unwrap();

        assert_eq!(rate.value(), 5.3071);
        assert_eq!(rate.currency(), &usd());
        assert_eq!(rate.base_symbol().as_str(), "BRL");
        assert_eq!(rate.as_of().to_rfc3339(), "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_failure_envelope() {
        let envelope =
            CurrentRateEnvelope::from_json(r#"{"success": false, "error": "quota"}"#).unwrap();
        let err = envelope.into_rate(&usd(), &CurrencyCode::brl()).unwrap_err();
        assert!(matches!(err, RateError::InvalidResponse(ref m) if m.contains("quota")));
    }

    #[test]
    fn test_absent_success_flag_is_failure() {
        let envelope = CurrentRateEnvelope::from_json(r#"{"exchangeRate": 5.3}"#).unwrap();
        assert!(envelope.into_rate(&usd(), &CurrencyCode::brl()).is_err());
    }

    #[test]
    fn test_missing_field_is_named() {
        let body = r#"{"success": true, "lastUpdatedAt": "2024-01-01T12:00:00Z",
                       "fromSymbol": "USD", "toSymbol": "BRL"}"#;
        let err = CurrentRateEnvelope::from_json(body)
            .unwrap()
            .into_rate(&usd(), &CurrencyCode::brl())
            .unwrap_err();
        assert_eq!(
            err,
            RateError::InvalidResponse("missing field 'exchangeRate'".to_string())
        );
    }

    #[test]
    fn test_non_json_body() {
        let err = CurrentRateEnvelope::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, RateError::InvalidResponse(_)));
    }

    #[test]
    fn test_mismatched_symbol_rejected() {
        let body = OK_BODY.replace("\"fromSymbol\": \"USD\"", "\"fromSymbol\": \"EUR\"");
        let err = CurrentRateEnvelope::from_json(&body)
            .unwrap()
            .into_rate(&usd(), &CurrencyCode::brl())
            .unwrap_err();
        assert!(matches!(err, RateError::InvalidResponse(ref m) if m.contains("fromSymbol")));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let body = OK_BODY.replace("5.3071", "0");
        let err = CurrentRateEnvelope::from_json(&body)
            .unwrap()
            .into_rate(&usd(), &CurrencyCode::brl())
            .unwrap_err();
        assert!(matches!(err, RateError::InvalidResponse(_)));
    }

    #[test]
    fn test_timestamp_formats() {
        let with_offset = parse_timestamp("2024-03-10T09:30:00-03:00").unwrap();
        assert_eq!(with_offset.to_rfc3339(), "2024-03-10T12:30:00+00:00");

        let naive = parse_timestamp("2024-03-10T12:30:00").unwrap();
        assert_eq!(naive, with_offset);

        let spaced = parse_timestamp("2024-03-10 12:30:00.000").unwrap();
        assert_eq!(spaced, with_offset);

        assert!(parse_timestamp("yesterday").is_err());
    }
}
