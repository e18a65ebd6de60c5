use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::quote::RentalQuote;

/// Flat daily surcharges for the add-on services offered at checkout.
pub static DEFAULT_SURCHARGES: Lazy<HashMap<String, Decimal>> = Lazy::new(|| {
    HashMap::from([
        ("insurance".to_string(), dec!(25)),
        ("roadside".to_string(), dec!(15)),
        ("driver".to_string(), dec!(50)),
    ])
});

pub struct PricingService;

impl PricingService {
    /// Whole days billed for a date range. Zero when either date is missing
    /// or the range is empty/inverted; a rental never bills negative days.
    pub fn rental_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u32 {
        match (start, end) {
            (Some(start), Some(end)) if end > start => (end - start).num_days() as u32,
            _ => 0,
        }
    }

    /// Total cost: days x (daily rate + selected surcharges). A zero-day
    /// rental costs exactly zero no matter what is selected. Service keys
    /// without a surcharge entry are skipped so new add-ons can roll out
    /// backend-first without breaking older clients.
    pub fn rental_total(
        daily_rate: Decimal,
        days: u32,
        selected: &[String],
        surcharges: &HashMap<String, Decimal>,
    ) -> Decimal {
        if days == 0 {
            return Decimal::ZERO;
        }

        let per_day = selected
            .iter()
            .filter_map(|key| surcharges.get(key.as_str()))
            .fold(daily_rate, |acc, surcharge| acc + *surcharge);

        Decimal::from(days) * per_day
    }

    /// Convenience for the booking form: duration and total in one struct,
    /// using the built-in surcharge table. A vehicle that hasn't loaded yet
    /// prices at zero rather than erroring.
    pub fn quote(
        daily_rate: Option<Decimal>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        services: &[String],
    ) -> RentalQuote {
        let daily_rate = daily_rate.unwrap_or(Decimal::ZERO);
        let duration_days = Self::rental_days(start, end);
        let total_amount =
            Self::rental_total(daily_rate, duration_days, services, &DEFAULT_SURCHARGES);

        RentalQuote {
            start_date: start,
            end_date: end,
            daily_rate,
            services: services.to_vec(),
            duration_days,
            total_amount,
        }
    }
}
