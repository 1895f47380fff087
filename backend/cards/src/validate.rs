use std::{fmt, str::FromStr, sync::LazyLock};

use common_enums::CardNetwork;
use hyperswitch_masking::{PeekInterface, Secret, Strategy};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Minimum limit of a card number will not be less than 8 by ISO standards
pub const MIN_CARD_NUMBER_LENGTH: usize = 12;

/// Maximum limit of a card number will not exceed 19 by ISO standards
pub const MAX_CARD_NUMBER_LENGTH: usize = 19;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CardNumberValidationErr(&'static str);

/// Card number
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CardNumber(Secret<String, CardNumberStrategy>);

impl CardNumber {
    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect::<String>()
    }

    pub fn get_last4(&self) -> String {
        let number = self.0.peek();
        number
            .chars()
            .skip(number.len().saturating_sub(4))
            .collect::<String>()
    }

    /// The card network deduced from the BIN ranges, when one matches.
    pub fn get_card_network(&self) -> Option<CardNetwork> {
        let number = self.0.peek();
        CARD_NETWORK_REGEX
            .iter()
            .find(|(_, regex)| regex.is_match(number))
            .map(|(network, _)| *network)
    }
}

impl PeekInterface<String> for CardNumber {
    fn peek(&self) -> &String {
        self.0.peek()
    }

    fn peek_mut(&mut self) -> &mut String {
        self.0.peek_mut()
    }
}

impl FromStr for CardNumber {
    type Err = CardNumberValidationErr;

    fn from_str(card_number: &str) -> Result<Self, Self::Err> {
        let digits = sanitize_card_number(card_number)?;
        if !luhn(&digits) {
            return Err(CardNumberValidationErr("card number invalid"));
        }
        Ok(Self(Secret::new(digits)))
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CardNumberValidationErr;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Strips separators and checks the digit count.
fn sanitize_card_number(card_number: &str) -> Result<String, CardNumberValidationErr> {
    let digits = card_number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect::<String>();

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardNumberValidationErr(
            "invalid character found in card number",
        ));
    }

    if !(MIN_CARD_NUMBER_LENGTH..=MAX_CARD_NUMBER_LENGTH).contains(&digits.len()) {
        return Err(CardNumberValidationErr("invalid card number length"));
    }

    Ok(digits)
}

/// Luhn (mod 10) checksum over a string of ASCII digits.
pub fn luhn(number: &str) -> bool {
    let checksum = number
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum::<u32>();
    checksum % 10 == 0
}

static CARD_NETWORK_REGEX: LazyLock<Vec<(CardNetwork, Regex)>> = LazyLock::new(|| {
    [
        (CardNetwork::Visa, r"^4[0-9]{12}(?:[0-9]{3})?$"),
        (CardNetwork::Mastercard, r"^(5[1-5][0-9]{14}|2(2[2-9][1-9]|[3-6][0-9]{2}|7[01][0-9]|720)[0-9]{12})$"),
        (CardNetwork::AmericanExpress, r"^3[47][0-9]{13}$"),
        (CardNetwork::DinersClub, r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$"),
        (CardNetwork::JCB, r"^(3(?:088|096|112|158|337|5(?:2[89]|[3-8][0-9]))\d{12})$"),
        (CardNetwork::Discover, r"^(6011[0-9]{12}|65[0-9]{14}|64[4-9][0-9]{13})$"),
        (CardNetwork::Maestro, r"^(5018|5020|5038|5893|6304|6759|6761|6762|6763)[0-9]{8,15}$"),
        (CardNetwork::UnionPay, r"^62[0-9]{14,17}$"),
    ]
    .into_iter()
    .filter_map(|(network, pattern)| Regex::new(pattern).ok().map(|regex| (network, regex)))
    .collect()
});

/// Masks everything but the BIN and the last four digits.
pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return f.write_str("*** card number ***");
        }

        if let Some(value) = val_str.get(..6) {
            write!(f, "{}{}", value, "*".repeat(val_str.len() - 6))
        } else {
            f.write_str("*** card number ***")
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn valid_card_number() {
        let number = CardNumber::from_str("4242 4242 4242 4242").unwrap();
        assert_eq!(number.peek(), "4242424242424242");
        assert_eq!(number.get_last4(), "4242");
        assert_eq!(number.get_card_isin(), "424242");
        assert_eq!(number.get_card_network(), Some(CardNetwork::Visa));
    }

    #[test]
    fn invalid_card_numbers() {
        assert_eq!(
            CardNumber::from_str("4242424242424241").unwrap_err(),
            CardNumberValidationErr("card number invalid")
        );
        assert_eq!(
            CardNumber::from_str("42424242").unwrap_err(),
            CardNumberValidationErr("invalid card number length")
        );
        assert!(CardNumber::from_str("4242x42424242424").is_err());
    }

    #[test]
    fn network_detection() {
        let amex = CardNumber::from_str("378282246310005").unwrap();
        assert_eq!(amex.get_card_network(), Some(CardNetwork::AmericanExpress));
        let master = CardNumber::from_str("5555555555554444").unwrap();
        assert_eq!(master.get_card_network(), Some(CardNetwork::Mastercard));
    }

    #[test]
    fn debug_masks_digits() {
        let number = CardNumber::from_str("4111111111111111").unwrap();
        assert_eq!(format!("{number:?}"), "411111**********");
    }

    #[test]
    fn deserialization_validates() {
        let number: CardNumber = serde_json::from_str("\"4111111111111111\"").unwrap();
        assert_eq!(number.get_last4(), "1111");
        assert!(serde_json::from_str::<CardNumber>("\"4111111111111112\"").is_err());
    }
}
