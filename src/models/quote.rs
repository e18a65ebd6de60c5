use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Snapshot of the rental cost for the currently selected dates and add-ons.
/// Recomputed on every form edit; never persisted. The amount a payment
/// session is opened with is copied out of a quote and frozen there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalQuote {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub daily_rate: Decimal,
    pub services: Vec<String>,
    pub duration_days: u32,
    pub total_amount: Decimal,
}
