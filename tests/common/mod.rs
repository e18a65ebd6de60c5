#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rust_decimal_macros::dec;
use url::Url;

use rental_checkout::config::CheckoutConfig;
use rental_checkout::models::gateway::CheckoutRequest;
use rental_checkout::models::payment::PaymentRecord;
use rental_checkout::models::user::UserProfile;
use rental_checkout::models::vehicle::Vehicle;
use rental_checkout::services::payment::interface::{
    ApiError, CheckoutTimer, GatewayClient, GatewayError, PaymentsApi,
};

#[derive(Default)]
pub struct MockGateway {
    pub ready: bool,
    pub opened: Rc<RefCell<Vec<CheckoutRequest>>>,
}

impl MockGateway {
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Default::default()
        }
    }
}

impl GatewayClient for MockGateway {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn open(&self, request: CheckoutRequest) -> Result<(), GatewayError> {
        self.opened.borrow_mut().push(request);
        Ok(())
    }

    fn close(&self) {}
}

#[derive(Default)]
pub struct MockPayments {
    pub fail: bool,
    pub records: Rc<RefCell<Vec<PaymentRecord>>>,
}

impl PaymentsApi for MockPayments {
    async fn initialize_payment(&self, record: &PaymentRecord) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Status {
                status: 502,
                body: "upstream unavailable".to_string(),
            });
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTimer {
    pub armed: Rc<RefCell<Vec<u64>>>,
    pub cancels: Rc<RefCell<u32>>,
}

impl CheckoutTimer for MockTimer {
    fn arm(&mut self, _after: Duration, token: u64) {
        self.armed.borrow_mut().push(token);
    }

    fn cancel(&mut self) {
        *self.cancels.borrow_mut() += 1;
    }
}

pub fn test_config() -> CheckoutConfig {
    CheckoutConfig {
        api_base_url: Url::parse("http://localhost:8000/").unwrap(),
        gateway_public_key: "pk_test_abc".to_string(),
        currency: "KES".to_string(),
        gateway_timeout: Duration::from_secs(15),
        commission_rate: dec!(0.02),
    }
}

pub fn test_config_for(base_url: &str) -> CheckoutConfig {
    CheckoutConfig {
        api_base_url: Url::parse(base_url).unwrap(),
        ..test_config()
    }
}

pub fn test_user(phone: Option<&str>) -> UserProfile {
    UserProfile {
        id: 7,
        name: "Jane Wanjiku".to_string(),
        email: "jane@example.com".to_string(),
        phone: phone.map(str::to_string),
    }
}

pub fn test_vehicle() -> Vehicle {
    Vehicle {
        id: 3,
        make: "Toyota".to_string(),
        model: "Axio".to_string(),
        year: 2022,
        license_plate: "KDA 123X".to_string(),
        daily_rate: dec!(50),
        image_url: None,
    }
}
