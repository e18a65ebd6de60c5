use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::services::payment::interface::CheckoutTimer;

/// Checkout timeout backed by a spawned sleep. The fire is delivered as a
/// token on the channel the embedding event loop owns; the loop forwards it
/// to [`CheckoutFlow::timeout_fired`](crate::services::payment::session::CheckoutFlow::timeout_fired),
/// which decides whether the token is still live.
pub struct TokioTimer {
    tx: mpsc::UnboundedSender<u64>,
    handle: Option<JoinHandle<()>>,
}

impl TokioTimer {
    pub fn new(tx: mpsc::UnboundedSender<u64>) -> Self {
        Self { tx, handle: None }
    }
}

impl CheckoutTimer for TokioTimer {
    fn arm(&mut self, after: Duration, token: u64) {
        self.cancel();
        debug!("arming checkout timeout {token} for {after:?}");
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(token);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
