use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::user::UserProfile;
use crate::models::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "M-Pesa")]
    MobileMoney,
    #[serde(rename = "Card")]
    Card,
}

impl PaymentMethod {
    /// Channel identifier the gateway expects for this method.
    pub fn channel(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::Card => "card",
        }
    }

    /// Whether checkout needs a phone number collected up front.
    pub fn needs_contact(&self) -> bool {
        matches!(self, PaymentMethod::MobileMoney)
    }
}

/// Normalized payment record submitted to `POST /api/payments/initialize`
/// once the gateway reports a successful charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub booking_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: String,
    pub transaction_id: String,
    pub transaction_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email: String,
    pub vehicle_id: i64,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub license_plate: String,
    pub gross_amount: Decimal,
    pub commission_fee: Decimal,
    pub net_amount: Decimal,
}

impl PaymentRecord {
    /// Builds the record, splitting the gross amount into the platform
    /// commission and the net amount owed to the vehicle owner.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        booking_id: i64,
        amount: Decimal,
        method: PaymentMethod,
        transaction_id: String,
        transaction_reference: String,
        phone: Option<String>,
        user: &UserProfile,
        vehicle: &Vehicle,
        commission_rate: Decimal,
    ) -> Self {
        let commission_fee = (amount * commission_rate).round_dp(2).normalize();
        let net_amount = (amount - commission_fee).round_dp(2).normalize();

        Self {
            booking_id,
            user_id: user.id,
            amount,
            payment_method: method,
            payment_status: "completed".to_string(),
            transaction_id,
            transaction_reference,
            phone,
            email: user.email.clone(),
            vehicle_id: vehicle.id,
            vehicle_make: vehicle.make.clone(),
            vehicle_model: vehicle.model.clone(),
            vehicle_year: vehicle.year,
            license_plate: vehicle.license_plate.clone(),
            gross_amount: amount,
            commission_fee,
            net_amount,
        }
    }
}
