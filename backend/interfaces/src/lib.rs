pub mod api;
pub mod connector_integration;
pub mod connector_types;
pub mod gateway;
pub mod transport;
