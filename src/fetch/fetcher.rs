use crate::config::ExchangeConfig;
use crate::core::currency::CurrencyCode;
use crate::core::rate::Rate;
use crate::error::RateError;
use crate::fetch::envelope::CurrentRateEnvelope;
use crate::fetch::transport::{HttpClient, HttpRequest, ReqwestHttpClient};
use futures::future::try_join_all;
use log::{debug, warn};
use std::sync::Arc;

const CURRENT_RATE_PATH: &str = "/open/currentExchangeRate";

/// Retrieves current quotes from the upstream rate endpoint.
///
/// One request per currency, no retries and no caching. Codes are expected to
/// have been validated by the caller already (see [`CurrencyCode::parse`]).
#[derive(Clone)]
pub struct RateFetcher {
    config: ExchangeConfig,
    http_client: Arc<dyn HttpClient>,
}

impl RateFetcher {
    /// Fetcher using the reqwest transport.
    ///
    /// Fails with [`RateError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: ExchangeConfig) -> Result<Self, RateError> {
        let client = ReqwestHttpClient::new().map_err(|e| {
            warn!("{}", e);
            RateError::Transport(e.message().to_string())
        })?;
        Ok(Self::with_http_client(config, Arc::new(client)))
    }

    pub fn with_http_client(config: ExchangeConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Current rate of `code` against the configured base currency.
    pub async fn fetch(&self, code: &CurrencyCode) -> Result<Rate, RateError> {
        let request = self.build_request(code);
        debug!(
            "requesting {}/{} from {}",
            self.config.base_currency, code, request.url
        );

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!("rate request for {} failed: {}", code, e);
            RateError::Transport(e.to_string())
        })?;

        if !response.is_success() {
            warn!("rate request for {} returned HTTP {}", code, response.status);
            return Err(RateError::InvalidResponse(format!(
                "rate service returned HTTP {}",
                response.status
            )));
        }

        let rate = CurrentRateEnvelope::from_json(&response.body)
            .and_then(|envelope| envelope.into_rate(code, &self.config.base_currency))
            .inspect_err(|e| warn!("rejected rate envelope for {}: {}", code, e))?;

        debug!("fetched {}", rate);
        Ok(rate)
    }

    /// Fetch every code concurrently.
    ///
    /// Results come back in input order. The first failure aborts the whole
    /// batch; no partial list is returned.
    pub async fn fetch_all(&self, codes: &[CurrencyCode]) -> Result<Vec<Rate>, RateError> {
        try_join_all(codes.iter().map(|code| self.fetch(code))).await
    }

    /// [`fetch_all`](Self::fetch_all) over the configured dashboard currencies.
    pub async fn fetch_supported(&self) -> Result<Vec<Rate>, RateError> {
        self.fetch_all(&self.config.supported_currencies).await
    }

    fn build_request(&self, code: &CurrencyCode) -> HttpRequest {
        HttpRequest::get(format!("{}{}", self.config.endpoint, CURRENT_RATE_PATH))
            .with_query("apiKey", self.config.api_key.as_str())
            .with_query("from_symbol", code.as_str())
            .with_query("to_symbol", self.config.base_currency.as_str())
            .with_timeout(self.config.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::transport::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Answers by `from_symbol`, recording every request.
    struct RecordingHttpClient {
        responses: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn new(responses: Vec<(&'static str, Result<HttpResponse, HttpError>)>) -> Self {
            Self {
                responses,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let symbol = request.query_param("from_symbol").unwrap_or_default().to_string();
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .iter()
                .find(|(code, _)| *code == symbol)
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Err(HttpError::new("no canned response")));
            Box::pin(async move { response })
        }
    }

    fn ok(code: &str, rate: f64) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::ok_json(format!(
            r#"{{"success":true,"lastUpdatedAt":"2024-01-01T12:00:00Z","fromSymbol":"{}","toSymbol":"BRL","exchangeRate":{}}}"#,
            code, rate
        )))
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn fetcher(client: Arc<RecordingHttpClient>) -> RateFetcher {
        let config = ExchangeConfig::default()
            .with_api_key("test-key")
            .with_endpoint("http://rates.local");
        RateFetcher::with_http_client(config, client)
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_symbols() {
        let client = Arc::new(RecordingHttpClient::new(vec![("USD", ok("USD", 5.3))]));
        let rate = fetcher(client.clone()).fetch(&code("USD")).await.unwrap();

        assert_eq!(rate.value(), 5.3);
        assert_eq!(rate.quote_symbol(), &code("USD"));

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://rates.local/open/currentExchangeRate");
        assert_eq!(requests[0].query_param("apiKey"), Some("test-key"));
        assert_eq!(requests[0].query_param("from_symbol"), Some("USD"));
        assert_eq!(requests[0].query_param("to_symbol"), Some("BRL"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_transport_error() {
        let client = Arc::new(RecordingHttpClient::new(vec![(
            "USD",
            Err(HttpError::new("connection failed: refused")),
        )]));
        let err = fetcher(client).fetch(&code("USD")).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_http_error_status_is_invalid_response() {
        let client = Arc::new(RecordingHttpClient::new(vec![(
            "USD",
            Ok(HttpResponse {
                status: 429,
                body: r#"{"success":false}"#.to_string(),
            }),
        )]));
        let err = fetcher(client).fetch(&code("USD")).await.unwrap_err();
        assert_eq!(
            err,
            RateError::InvalidResponse("rate service returned HTTP 429".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_order() {
        let client = Arc::new(RecordingHttpClient::new(vec![
            ("USD", ok("USD", 5.3)),
            ("EUR", ok("EUR", 5.8)),
            ("JPY", ok("JPY", 0.036)),
        ]));
        let codes = vec![code("JPY"), code("USD"), code("EUR")];
        let rates = fetcher(client).fetch_all(&codes).await.unwrap();

        let got: Vec<&str> = rates.iter().map(|r| r.currency().as_str()).collect();
        assert_eq!(got, vec!["JPY", "USD", "EUR"]);
        assert_eq!(rates[1].value(), 5.3);
    }

    #[tokio::test]
    async fn test_fetch_all_fails_fast() {
        let client = Arc::new(RecordingHttpClient::new(vec![
            ("USD", ok("USD", 5.3)),
            (
                "EUR",
                Ok(HttpResponse::ok_json(r#"{"success":false,"error":"unsupported"}"#)),
            ),
        ]));
        let codes = vec![code("USD"), code("EUR")];
        let err = fetcher(client).fetch_all(&codes).await.unwrap_err();
        assert_eq!(
            err,
            RateError::InvalidResponse(
                "rate service reported failure for EUR: unsupported".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_transport_error_unchanged() {
        let client = Arc::new(RecordingHttpClient::new(vec![
            ("USD", ok("USD", 5.3)),
            ("EUR", ok("EUR", 5.8)),
            ("GBP", Err(HttpError::new("connection failed: refused"))),
        ]));
        let codes = vec![code("USD"), code("EUR"), code("GBP")];
        let err = fetcher(client).fetch_all(&codes).await.unwrap_err();
        assert_eq!(
            err,
            RateError::Transport("connection failed: refused".to_string())
        );
    }

    #[test]
    fn test_new_builds_reqwest_transport() {
        let fetcher = RateFetcher::new(ExchangeConfig::default()).unwrap();
        assert_eq!(fetcher.config().base_currency.as_str(), "BRL");
    }

    #[tokio::test]
    async fn test_fetch_all_empty() {
        let client = Arc::new(RecordingHttpClient::new(Vec::new()));
        let rates = fetcher(client.clone()).fetch_all(&[]).await.unwrap();
        assert!(rates.is_empty());
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_supported_uses_configured_list() {
        let client = Arc::new(RecordingHttpClient::new(vec![
            ("USD", ok("USD", 5.3)),
            ("GBP", ok("GBP", 6.7)),
        ]));
        let config = ExchangeConfig::default()
            .with_supported_currencies(vec![code("USD"), code("GBP")]);
        let rates = RateFetcher::with_http_client(config, client.clone())
            .fetch_supported()
            .await
            .unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(client.recorded_requests().len(), 2);
    }
}
