use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub daily_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Vehicle {
    /// Display name used in checkout metadata, e.g. "2022 Toyota Axio".
    pub fn label(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}
