use serde::{Deserialize, Serialize};

/// Setup payload handed to the hosted gateway when checkout opens.
/// `amount` is in minor units (cents); the gateway displays major units.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub key: String,
    pub email: String,
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub metadata: serde_json::Value,
}

/// Callback payload from the gateway. Only `status` and `reference` are
/// guaranteed; everything else depends on the gateway's mood and channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: String,
    pub reference: String,
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub customer: Option<GatewayCustomer>,
    #[serde(default)]
    pub authorization: Option<GatewayAuthorization>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayCustomer {
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayAuthorization {
    #[serde(default)]
    pub mobile_money_number: Option<String>,
}

impl GatewayResponse {
    /// "success" is the only status that means the charge went through.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Transaction identifier, falling back to the numeric `id` field some
    /// gateway versions send instead.
    pub fn transaction_id(&self) -> Option<String> {
        self.transaction
            .clone()
            .or_else(|| self.id.map(|id| id.to_string()))
    }

    /// Contact number reported back by the gateway, if any.
    pub fn contact(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.phone.as_deref())
            .or_else(|| {
                self.authorization
                    .as_ref()
                    .and_then(|a| a.mobile_money_number.as_deref())
            })
    }
}

/// The two signals the hosted widget can deliver, kept distinct: a callback
/// carries a charge outcome, a close is the user walking away.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Callback(GatewayResponse),
    Closed,
}
