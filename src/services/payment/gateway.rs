use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use url::Url;

use crate::models::gateway::CheckoutRequest;
use crate::services::payment::interface::{GatewayClient, GatewayError};

/// Production gateway adapter: initializes hosted checkouts against the
/// provider's REST endpoint with the publishable key. `preload` is the
/// analog of waiting for the provider script to finish loading: until it
/// has run, `is_ready` is false and the session refuses to hand over.
pub struct HostedGateway {
    base_url: Url,
    public_key: String,
    http: reqwest::Client,
    ready: AtomicBool,
}

impl HostedGateway {
    pub fn new(base_url: Url, public_key: impl Into<String>) -> Self {
        Self {
            base_url,
            public_key: public_key.into(),
            http: reqwest::Client::new(),
            ready: AtomicBool::new(false),
        }
    }

    /// Reaches the provider once and marks the adapter usable. Call at app
    /// start; checkout entry is rejected until this has succeeded.
    pub async fn preload(&self) -> Result<(), GatewayError> {
        self.http.get(self.base_url.clone()).send().await?;
        self.ready.store(true, Ordering::SeqCst);
        debug!("gateway adapter ready");
        Ok(())
    }
}

impl GatewayClient for HostedGateway {
    fn is_ready(&self) -> bool {
        !self.public_key.is_empty() && self.ready.load(Ordering::SeqCst)
    }

    async fn open(&self, request: CheckoutRequest) -> Result<(), GatewayError> {
        if !self.is_ready() {
            return Err(GatewayError::NotReady);
        }
        let url = self.base_url.join("transaction/initialize")?;
        let res = self
            .http
            .post(url)
            .bearer_auth(&self.public_key)
            .json(&request)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(())
        } else {
            let message = res.text().await.unwrap_or_default();
            Err(GatewayError::Rejected { message })
        }
    }

    fn close(&self) {
        // the hosted page owns its own dismissal; nothing to tear down here
        debug!("gateway close requested");
    }
}
