use std::time::Duration;

use thiserror::Error;

use crate::models::gateway::CheckoutRequest;
use crate::models::payment::PaymentRecord;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway is not ready")]
    NotReady,
    #[error("gateway rejected the checkout request: {message}")]
    Rejected { message: String },
    #[error("invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Capability handle for the hosted checkout widget. The session state
/// machine never touches the gateway directly; it is handed one of these at
/// construction, and `is_ready` gates entry into the awaiting-gateway state.
pub trait GatewayClient {
    fn is_ready(&self) -> bool;
    async fn open(&self, request: CheckoutRequest) -> Result<(), GatewayError>;
    /// Best-effort dismissal; the hosted page owns its own lifecycle.
    fn close(&self);
}

/// The one backend call the payment session makes itself: submitting the
/// normalized payment record after a successful charge.
pub trait PaymentsApi {
    async fn initialize_payment(&self, record: &PaymentRecord) -> Result<(), ApiError>;
}

/// Owned timeout timer. Arming replaces any pending timer, so a session can
/// never hold two; the token lets a late fire be recognized as stale.
pub trait CheckoutTimer {
    fn arm(&mut self, after: Duration, token: u64);
    fn cancel(&mut self);
}
