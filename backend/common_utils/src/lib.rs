//! Common utilities for the payment gateway adapters

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod fp_utils;
pub mod pii;
pub mod request;
pub mod types;

// Re-export commonly used items
pub use errors::{CustomResult, ParsingError, ValidationError};
pub use pii::Email;
pub use request::{Method, Request, RequestBuilder, RequestContent};
pub use types::{
    amount, localized_amount, AmountConvertor, FloatMajorUnit, FloatMajorUnitForConnector,
    MinorUnit, MinorUnitForConnector, StringMajorUnit, StringMajorUnitForConnector,
    StringMinorUnit, StringMinorUnitForConnector,
};
