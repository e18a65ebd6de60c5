use chrono::Utc;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::config::CheckoutConfig;
use crate::models::gateway::{CheckoutRequest, GatewayEvent, GatewayResponse};
use crate::models::payment::{PaymentMethod, PaymentRecord};
use crate::models::user::UserProfile;
use crate::models::vehicle::Vehicle;
use crate::services::payment::interface::{CheckoutTimer, GatewayClient, GatewayError, PaymentsApi};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d{9,15}$").expect("phone pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    MethodSelection,
    MethodDetail,
    AwaitingGateway,
    Succeeded,
    Failed,
    /// The gateway reported a successful charge but the backend record could
    /// not be written. Money likely moved; kept apart from `Failed` so the UI
    /// never presents it as a clean, retryable decline.
    PaidUnconfirmed,
}

/// One checkout attempt for one booking. Created by [`CheckoutFlow::open`],
/// mutated only by the flow's transition methods, destroyed by
/// [`CheckoutFlow::dismiss`] or a terminal phase.
#[derive(Debug)]
pub struct PaymentSession {
    pub booking_id: i64,
    /// Frozen when the session opens; date edits made while a payment is in
    /// flight never change what the gateway charges.
    pub amount: Decimal,
    pub vehicle: Vehicle,
    pub method: Option<PaymentMethod>,
    pub contact: Option<String>,
    pub reference: Option<String>,
    pub phase: SessionPhase,
    pub failure: Option<String>,
    timer_token: Option<u64>,
}

/// Outcome notifications handed back to the embedding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutUpdate {
    Paid { booking_id: i64, transaction_id: String },
    PaidUnconfirmed { booking_id: i64, transaction_id: String, detail: String },
    Declined { reason: String },
    TimedOut,
    Cancelled,
}

impl CheckoutUpdate {
    /// User-facing notification text.
    pub fn message(&self) -> String {
        match self {
            CheckoutUpdate::Paid { .. } => "Payment received, booking confirmed".to_string(),
            CheckoutUpdate::PaidUnconfirmed { detail, .. } => format!(
                "Payment received but the booking is not yet updated ({detail}). \
                 Do not pay again; contact support with your transaction reference."
            ),
            CheckoutUpdate::Declined { reason } => format!("Payment failed: {reason}"),
            CheckoutUpdate::TimedOut => {
                "Payment timed out before the gateway responded".to_string()
            }
            CheckoutUpdate::Cancelled => "Payment cancelled".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("no active payment session")]
    NoSession,
    #[error("a payment attempt is already in progress")]
    InProgress,
    #[error("payment gateway is still loading, try again in a moment")]
    GatewayNotReady,
    #[error("select a payment method first")]
    NoMethodSelected,
    #[error("enter a valid phone number (at least 9 digits)")]
    InvalidPhone,
    #[error("only a failed payment can be retried")]
    NotRetryable,
    #[error("this payment reached the gateway but the booking is unconfirmed; contact support instead of retrying")]
    RetryUnsafe,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Drives one payment session at a time through the hosted gateway.
///
/// The embedding UI owns the event loop: it calls the action methods for
/// user input and feeds gateway callbacks / timer fires into
/// [`gateway_event`](Self::gateway_event) and
/// [`timeout_fired`](Self::timeout_fired). All transitions are synchronous
/// apart from the backend submission on success.
pub struct CheckoutFlow<G, P, T> {
    config: CheckoutConfig,
    user: UserProfile,
    gateway: G,
    payments: P,
    timer: T,
    session: Option<PaymentSession>,
    timer_seq: u64,
}

impl<G: GatewayClient, P: PaymentsApi, T: CheckoutTimer> CheckoutFlow<G, P, T> {
    pub fn new(config: CheckoutConfig, user: UserProfile, gateway: G, payments: P, timer: T) -> Self {
        Self {
            config,
            user,
            gateway,
            payments,
            timer,
            session: None,
            timer_seq: 0,
        }
    }

    pub fn session(&self) -> Option<&PaymentSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<SessionPhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    /// Opens a session for a booking. The amount is copied here and stays
    /// frozen for the life of the session. Any previous session is dismissed
    /// first; the UI shows one checkout at a time.
    pub fn open(&mut self, booking_id: i64, amount: Decimal, vehicle: Vehicle) -> &PaymentSession {
        if self.session.is_some() {
            self.dismiss();
        }
        info!("payment session opened for booking {booking_id}, amount {amount}");
        self.session.insert(PaymentSession {
            booking_id,
            amount,
            vehicle,
            method: None,
            contact: None,
            reference: None,
            phase: SessionPhase::MethodSelection,
            failure: None,
            timer_token: None,
        })
    }

    /// Picks a payment method. Card needs no further detail; mobile money
    /// uses the profile phone when one is known, otherwise the flow stops to
    /// collect one.
    pub async fn select_method(
        &mut self,
        method: PaymentMethod,
    ) -> Result<SessionPhase, CheckoutError> {
        let default_phone = self.user.phone.clone();
        {
            let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
            if session.phase != SessionPhase::MethodSelection {
                return Err(CheckoutError::InProgress);
            }
            session.method = Some(method);
            if method.needs_contact() {
                match default_phone {
                    Some(phone) => session.contact = Some(phone),
                    None => {
                        session.phase = SessionPhase::MethodDetail;
                        return Ok(SessionPhase::MethodDetail);
                    }
                }
            }
        }
        self.enter_gateway().await
    }

    /// Submits the phone number collected for mobile money. Rejected input
    /// leaves the session where it is.
    pub async fn submit_contact(&mut self, phone: &str) -> Result<SessionPhase, CheckoutError> {
        let phone = phone.trim();
        {
            let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
            if session.phase != SessionPhase::MethodDetail {
                return Err(CheckoutError::InProgress);
            }
            if !PHONE_RE.is_match(phone) {
                return Err(CheckoutError::InvalidPhone);
            }
            session.contact = Some(phone.to_string());
        }
        self.enter_gateway().await
    }

    /// Hands the session to the gateway: generates the reference, arms the
    /// timeout, asks the widget to open. Refused outright while the gateway
    /// is still loading, with the session left untouched.
    async fn enter_gateway(&mut self) -> Result<SessionPhase, CheckoutError> {
        if !self.gateway.is_ready() {
            return Err(CheckoutError::GatewayNotReady);
        }

        self.timer_seq += 1;
        let token = self.timer_seq;
        let timeout = self.config.gateway_timeout;

        let request = {
            let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
            let method = session.method.ok_or(CheckoutError::NoMethodSelected)?;
            let reference =
                format!("BK-{}-{}", session.booking_id, Utc::now().timestamp_millis());
            session.reference = Some(reference.clone());
            session.phase = SessionPhase::AwaitingGateway;
            session.timer_token = Some(token);
            CheckoutRequest {
                key: self.config.gateway_public_key.clone(),
                email: self.user.email.clone(),
                amount: (session.amount * dec!(100)).trunc().to_i64().unwrap_or_default(),
                currency: self.config.currency.clone(),
                reference,
                channel: method.channel().to_string(),
                phone: session.contact.clone(),
                metadata: serde_json::json!({
                    "booking_id": session.booking_id,
                    "vehicle": session.vehicle.label(),
                    "license_plate": session.vehicle.license_plate,
                }),
            }
        };

        self.timer.arm(timeout, token);
        debug!("opening gateway checkout {}", request.reference);

        match self.gateway.open(request).await {
            Ok(()) => Ok(SessionPhase::AwaitingGateway),
            Err(err) => {
                // a checkout that never opened must not leave a timer running
                self.timer.cancel();
                if let Some(session) = self.session.as_mut() {
                    session.timer_token = None;
                    session.reference = None;
                    session.phase = SessionPhase::MethodSelection;
                }
                Err(err.into())
            }
        }
    }

    /// Entry point for both widget signals.
    pub async fn gateway_event(&mut self, event: GatewayEvent) -> Option<CheckoutUpdate> {
        match event {
            GatewayEvent::Callback(response) => self.gateway_callback(response).await,
            GatewayEvent::Closed => self.gateway_closed(),
        }
    }

    /// Charge outcome reported by the widget. Stale callbacks (wrong
    /// reference, already-settled session, session dismissed) are no-ops.
    pub async fn gateway_callback(&mut self, response: GatewayResponse) -> Option<CheckoutUpdate> {
        {
            let Some(session) = self.session.as_ref() else {
                debug!(
                    "gateway callback {} arrived after the session was dismissed",
                    response.reference
                );
                return None;
            };
            if session.phase != SessionPhase::AwaitingGateway
                || session.reference.as_deref() != Some(response.reference.as_str())
            {
                warn!("discarding stale gateway callback {}", response.reference);
                return None;
            }
        }

        self.timer.cancel();

        if !response.is_success() {
            let reason = response
                .message
                .clone()
                .unwrap_or_else(|| format!("gateway returned status \"{}\"", response.status));
            let session = self.session.as_mut()?;
            session.timer_token = None;
            session.phase = SessionPhase::Failed;
            session.failure = Some(reason.clone());
            info!("payment declined for booking {}: {reason}", session.booking_id);
            return Some(CheckoutUpdate::Declined { reason });
        }

        let record = {
            let session = self.session.as_mut()?;
            session.timer_token = None;
            let method = session.method?;
            // callback fields win, session-held values fill the gaps
            let contact = response
                .contact()
                .map(str::to_string)
                .or_else(|| session.contact.clone())
                .or_else(|| self.user.phone.clone());
            let transaction_id = response
                .transaction_id()
                .unwrap_or_else(|| response.reference.clone());
            PaymentRecord::new(
                session.booking_id,
                session.amount,
                method,
                transaction_id,
                response.reference.clone(),
                contact,
                &self.user,
                &session.vehicle,
                self.config.commission_rate,
            )
        };

        match self.payments.initialize_payment(&record).await {
            Ok(()) => {
                let session = self.session.as_mut()?;
                session.phase = SessionPhase::Succeeded;
                info!(
                    "payment for booking {} recorded (txn {})",
                    record.booking_id, record.transaction_id
                );
                Some(CheckoutUpdate::Paid {
                    booking_id: record.booking_id,
                    transaction_id: record.transaction_id,
                })
            }
            Err(err) => {
                // the charge went through; only the backend record is missing
                let session = self.session.as_mut()?;
                session.phase = SessionPhase::PaidUnconfirmed;
                session.failure = Some(err.to_string());
                warn!(
                    "payment for booking {} succeeded at the gateway but recording it failed: {err}",
                    record.booking_id
                );
                Some(CheckoutUpdate::PaidUnconfirmed {
                    booking_id: record.booking_id,
                    transaction_id: record.transaction_id,
                    detail: err.to_string(),
                })
            }
        }
    }

    /// The user closed the widget without completing it. Not an error; back
    /// to method selection.
    pub fn gateway_closed(&mut self) -> Option<CheckoutUpdate> {
        {
            let session = self.session.as_ref()?;
            if session.phase != SessionPhase::AwaitingGateway {
                return None;
            }
        }
        self.timer.cancel();
        let session = self.session.as_mut()?;
        session.timer_token = None;
        session.reference = None;
        session.phase = SessionPhase::MethodSelection;
        info!("checkout window closed for booking {}", session.booking_id);
        Some(CheckoutUpdate::Cancelled)
    }

    /// Timeout delivery. The token identifies which armed timer fired; a
    /// token from a cancelled or replaced timer is discarded, so a timeout
    /// and a callback can race in either order without a double transition.
    pub fn timeout_fired(&mut self, token: u64) -> Option<CheckoutUpdate> {
        {
            let session = self.session.as_ref()?;
            if session.phase != SessionPhase::AwaitingGateway
                || session.timer_token != Some(token)
            {
                debug!("ignoring stale timeout token {token}");
                return None;
            }
        }
        self.timer.cancel();
        let session = self.session.as_mut()?;
        session.timer_token = None;
        session.phase = SessionPhase::Failed;
        session.failure = Some("gateway did not respond in time".to_string());
        warn!("payment for booking {} timed out", session.booking_id);
        Some(CheckoutUpdate::TimedOut)
    }

    /// Explicit retry after a decline or timeout. Clears the failed attempt's
    /// method, contact and reference; the amount stays as frozen at open.
    pub fn retry(&mut self) -> Result<SessionPhase, CheckoutError> {
        let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
        match session.phase {
            SessionPhase::Failed => {
                session.phase = SessionPhase::MethodSelection;
                session.failure = None;
                session.method = None;
                session.contact = None;
                session.reference = None;
                Ok(SessionPhase::MethodSelection)
            }
            SessionPhase::PaidUnconfirmed => Err(CheckoutError::RetryUnsafe),
            _ => Err(CheckoutError::NotRetryable),
        }
    }

    /// Destroys the session. Always cancels the timer, whatever the phase:
    /// nothing may fire against a session that no longer exists.
    pub fn dismiss(&mut self) {
        self.timer.cancel();
        if let Some(session) = self.session.take() {
            if session.phase == SessionPhase::AwaitingGateway {
                self.gateway.close();
            }
            debug!(
                "payment session for booking {} dismissed in phase {:?}",
                session.booking_id, session.phase
            );
        }
    }
}
