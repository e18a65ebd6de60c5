use log::{debug, warn};
use url::Url;

use crate::config::CheckoutConfig;
use crate::models::booking::{Booking, BookingRequest};
use crate::models::payment::PaymentRecord;
use crate::models::vehicle::Vehicle;
use crate::services::payment::interface::{ApiError, PaymentsApi};

/// Client for the rental backend REST API. Every call carries the stored
/// bearer token; the backend decides what the token may do.
pub struct RentalApi {
    base_url: Url,
    token: String,
    http: reqwest::Client,
}

impl RentalApi {
    pub fn new(config: &CheckoutConfig, token: impl Into<String>) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn error_from(res: reqwest::Response) -> ApiError {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        ApiError::Status { status, body }
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        let url = self.endpoint("/api/vehicles")?;
        let res = self.http.get(url).bearer_auth(&self.token).send().await?;
        if !res.status().is_success() {
            return Err(Self::error_from(res).await);
        }
        Ok(res.json().await?)
    }

    pub async fn get_vehicle(&self, vehicle_id: i64) -> Result<Vehicle, ApiError> {
        let url = self.endpoint(&format!("/api/vehicles/{vehicle_id}"))?;
        let res = self.http.get(url).bearer_auth(&self.token).send().await?;
        if !res.status().is_success() {
            return Err(Self::error_from(res).await);
        }
        Ok(res.json().await?)
    }

    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, ApiError> {
        let url = self.endpoint("/api/bookings")?;
        debug!("creating booking for vehicle {}", request.vehicle_id);
        let res = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::error_from(res).await);
        }
        Ok(res.json().await?)
    }

    pub async fn user_bookings(&self, user_id: i64) -> Result<Vec<Booking>, ApiError> {
        let url = self.endpoint(&format!("/api/bookings/user/{user_id}"))?;
        let res = self.http.get(url).bearer_auth(&self.token).send().await?;
        if !res.status().is_success() {
            return Err(Self::error_from(res).await);
        }
        Ok(res.json().await?)
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<Booking, ApiError> {
        let url = self.endpoint(&format!("/api/bookings/{booking_id}/cancel"))?;
        let res = self.http.put(url).bearer_auth(&self.token).send().await?;
        if !res.status().is_success() {
            return Err(Self::error_from(res).await);
        }
        Ok(res.json().await?)
    }
}

impl PaymentsApi for RentalApi {
    async fn initialize_payment(&self, record: &PaymentRecord) -> Result<(), ApiError> {
        let url = self.endpoint("/api/payments/initialize")?;
        debug!(
            "submitting payment record for booking {} (txn {})",
            record.booking_id, record.transaction_id
        );
        let res = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await?;
        if !res.status().is_success() {
            let err = Self::error_from(res).await;
            warn!(
                "payment record for booking {} rejected: {err}",
                record.booking_id
            );
            return Err(err);
        }
        Ok(())
    }
}
