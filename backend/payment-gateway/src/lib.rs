//! Configuration, logging and a client for the payment gateway adapters.

pub mod cli;
pub mod client;
pub mod configs;
pub mod error;
pub mod logger;

pub use client::GatewayClient;
