use common_enums::Currency;
use common_utils::{
    pii::{Email, IpAddress},
    MinorUnit,
};
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    errors::ConnectorError,
    gateway_response::AuthorizationToken,
    payment_address::Address,
    payment_method_data::{Card, PaymentMethodData},
    utils::missing_field_err,
};

type Error = error_stack::Report<ConnectorError>;

// snake case for enum variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectorEnum {
    Bambora,
    Bamboraapac,
    Nmi,
    Bogus,
}

/// Optional details that accompany every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentOptions {
    pub order_id: Option<String>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub description: Option<String>,
    pub currency: Option<Currency>,
    pub email: Option<Email>,
    pub ip: Option<Secret<String, IpAddress>>,
    pub customer: Option<String>,
    pub invoice: Option<String>,
    /// Amount of the original transaction, for vendors whose void needs it.
    pub amount: Option<MinorUnit>,
}

impl PaymentOptions {
    /// Billing address, falling back to the shipping address.
    pub fn billing_or_shipping_address(&self) -> Option<&Address> {
        self.billing_address
            .as_ref()
            .or(self.shipping_address.as_ref())
    }

    pub fn currency_or(&self, default_currency: Currency) -> Currency {
        self.currency.unwrap_or(default_currency)
    }

    pub fn get_order_id(&self) -> Result<&str, Error> {
        self.order_id
            .as_deref()
            .ok_or_else(missing_field_err("order_id"))
    }

    pub fn get_amount(&self) -> Result<MinorUnit, Error> {
        self.amount.ok_or_else(missing_field_err("amount"))
    }
}

/// Request data for purchase and authorize.
#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub payment_method: PaymentMethodData,
    pub options: PaymentOptions,
}

impl PaymentsAuthorizeData {
    pub fn get_card(&self) -> Result<&Card, Error> {
        self.payment_method
            .get_card()
            .ok_or_else(missing_field_err("payment_method.card"))
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub authorization: AuthorizationToken,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub authorization: AuthorizationToken,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub authorization: AuthorizationToken,
    pub options: PaymentOptions,
}

/// Request data for gateways with a native card verification call.
#[derive(Debug, Clone)]
pub struct PaymentsVerifyData {
    pub currency: Currency,
    pub payment_method: PaymentMethodData,
    pub options: PaymentOptions,
}

impl PaymentsVerifyData {
    pub fn get_card(&self) -> Result<&Card, Error> {
        self.payment_method
            .get_card()
            .ok_or_else(missing_field_err("payment_method.card"))
    }
}

#[derive(Debug, Clone)]
pub struct PaymentMethodStoreData {
    pub payment_method: PaymentMethodData,
    pub options: PaymentOptions,
}

impl PaymentMethodStoreData {
    pub fn get_card(&self) -> Result<&Card, Error> {
        self.payment_method
            .get_card()
            .ok_or_else(missing_field_err("payment_method.card"))
    }
}

#[derive(Debug, Clone)]
pub struct PaymentMethodUnstoreData {
    pub authorization: AuthorizationToken,
    pub options: PaymentOptions,
}
