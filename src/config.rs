use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/";
const DEFAULT_CURRENCY: &str = "KES";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub api_base_url: Url,
    pub gateway_public_key: String,
    pub currency: String,
    /// Bounded wait for the gateway to report an outcome before the session
    /// fails with a timeout.
    pub gateway_timeout: Duration,
    /// Platform cut applied to every successful payment.
    pub commission_rate: Decimal,
}

impl CheckoutConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(debug_assertions) {
            dotenv::dotenv().ok();
        }

        let api_base_url = std::env::var("RENTAL_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(&api_base_url).map_err(|source| ConfigError::InvalidUrl {
            var: "RENTAL_API_URL",
            source,
        })?;

        let gateway_public_key = std::env::var("GATEWAY_PUBLIC_KEY")
            .map_err(|_| ConfigError::MissingVar("GATEWAY_PUBLIC_KEY"))?;

        let currency =
            std::env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| DEFAULT_CURRENCY.to_string());

        let gateway_timeout = std::env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS));

        Ok(Self {
            api_base_url,
            gateway_public_key,
            currency,
            gateway_timeout,
            commission_rate: dec!(0.02),
        })
    }
}
