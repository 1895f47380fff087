use cards::{CardExpiration, CardNumber};
use common_enums::CardNetwork;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::errors::ConnectorError;

type Error = error_stack::Report<ConnectorError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub number: CardNumber,
    pub expiration: CardExpiration,
    pub cvc: Option<Secret<String>>,
    pub first_name: Option<Secret<String>>,
    pub last_name: Option<Secret<String>>,
}

impl Card {
    /// Holder name as printed on the card.
    pub fn holder_name(&self) -> Option<Secret<String>> {
        let parts = [self.first_name.as_ref(), self.last_name.as_ref()]
            .into_iter()
            .flatten()
            .map(|part| part.peek().trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();

        (!parts.is_empty()).then(|| Secret::new(parts.join(" ")))
    }

    pub fn get_card_network(&self) -> Option<CardNetwork> {
        self.number.get_card_network()
    }

    pub fn get_expiry_month_2_digit(&self) -> Secret<String> {
        Secret::new(self.expiration.month.two_digits())
    }

    pub fn get_expiry_year_2_digit(&self) -> Secret<String> {
        Secret::new(self.expiration.year.two_digits())
    }

    pub fn get_expiry_year_4_digit(&self) -> Secret<String> {
        Secret::new(self.expiration.year.four_digits())
    }

    /// `MMYY` with an optional delimiter between month and year.
    pub fn get_expiry_date_as_mmyy(&self, delimiter: &str) -> Secret<String> {
        self.expiration.mmyy(delimiter)
    }

    /// Whether the card is past its expiration month.
    pub fn is_expired(&self) -> Result<bool, Error> {
        self.expiration
            .is_expired()
            .map_err(|report| report.change_context(ConnectorError::RequestEncodingFailed))
    }
}

/// What a payment is drawn from: raw card details or a reference returned by an
/// earlier `store`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodData {
    Card(Card),
    Token(Secret<String>),
}

impl PaymentMethodData {
    pub fn get_card(&self) -> Option<&Card> {
        match self {
            Self::Card(card) => Some(card),
            Self::Token(_) => None,
        }
    }

    pub fn get_token(&self) -> Option<&Secret<String>> {
        match self {
            Self::Card(_) => None,
            Self::Token(token) => Some(token),
        }
    }

    pub fn payment_method_name(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::Token(_) => "stored token",
        }
    }
}

impl From<Card> for PaymentMethodData {
    fn from(card: Card) -> Self {
        Self::Card(card)
    }
}
