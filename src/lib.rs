//! Checkout core for the car-rental client: the rental pricing engine, the
//! payment session state machine, and the backend/gateway plumbing both use.
//! The embedding UI owns the event loop; it delivers user actions, gateway
//! callbacks and timer fires into [`services::payment::session::CheckoutFlow`].

pub mod auth;
pub mod config;
pub mod models;
pub mod services;
