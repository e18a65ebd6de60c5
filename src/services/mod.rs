pub mod api_client;
pub mod payment;
pub mod pricing_service;
