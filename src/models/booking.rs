use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating a booking; the backend assigns the id and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub services: Vec<String>,
    pub total_amount: Decimal,
}
