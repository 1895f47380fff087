//! Gateway adapters translating the normalized payment operations into each
//! vendor's wire format.

pub mod connectors;
pub mod gateway;
pub mod types;
pub mod utils;

pub use gateway::{gateway_for, ConnectorGateway};
pub use types::ConnectorData;
