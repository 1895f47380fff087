//! Address verification (AVS) and card security code (CVV) results.
//!
//! Gateways report these as single letter codes from the card networks'
//! tables. Vendors with their own codes translate them before building a
//! result.

use serde::{Deserialize, Serialize};

fn avs_message(code: char) -> Option<&'static str> {
    Some(match code {
        'A' => "Street address matches, but postal code does not match.",
        'B' => "Street address matches, but postal code not verified.",
        'C' => "Street address and postal code do not match.",
        'D' => "Street address and postal code match.",
        'E' => "AVS data is invalid or AVS is not allowed for this card type.",
        'F' => "Card member's name does not match, but billing postal code matches.",
        'G' => "Non-U.S. issuing bank does not support AVS.",
        'H' => "Card member's name does not match. Street address and postal code match.",
        'I' => "Address not verified.",
        'J' => "Card member's name, billing address, and postal code match. Shipping information verified and chargeback protection guaranteed through the Fraud Protection Program.",
        'K' => "Card member's name matches but billing address and billing postal code do not match.",
        'L' => "Card member's name and billing postal code match, but billing address does not match.",
        'M' => "Street address and postal code match.",
        'N' => "Street address and postal code do not match.",
        'O' => "Card member's name and billing address match, but billing postal code does not match.",
        'P' => "Postal code matches, but street address not verified.",
        'Q' => "Card member's name, billing address, and postal code match. Shipping information verified but chargeback protection not guaranteed.",
        'R' => "System unavailable.",
        'S' => "U.S.-issuing bank does not support AVS.",
        'T' => "Card member's name does not match, but street address matches.",
        'U' => "Address information unavailable.",
        'V' => "Card member's name, billing address, and billing postal code match.",
        'W' => "Street address does not match, but 9-digit postal code matches.",
        'X' => "Street address and 9-digit postal code match.",
        'Y' => "Street address and 5-digit postal code match.",
        'Z' => "Street address does not match, but 5-digit postal code matches.",
        _ => return None,
    })
}

/// `Y` matched, `N` did not, `X` not supported by the issuer, `None` unknown.
fn postal_match(code: char) -> Option<char> {
    match code {
        'D' | 'H' | 'F' | 'J' | 'L' | 'M' | 'P' | 'Q' | 'V' | 'W' | 'X' | 'Y' | 'Z' => Some('Y'),
        'A' | 'C' | 'K' | 'N' | 'O' => Some('N'),
        'G' | 'S' => Some('X'),
        _ => None,
    }
}

fn street_match(code: char) -> Option<char> {
    match code {
        'A' | 'B' | 'D' | 'H' | 'J' | 'M' | 'O' | 'Q' | 'T' | 'V' | 'X' | 'Y' => Some('Y'),
        'C' | 'K' | 'L' | 'N' | 'W' | 'Z' => Some('N'),
        'G' | 'S' => Some('X'),
        _ => None,
    }
}

fn single_code(code: Option<&str>) -> Option<char> {
    let code = code?.trim();
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsResult {
    pub code: Option<String>,
    pub message: Option<String>,
    pub street_match: Option<String>,
    pub postal_match: Option<String>,
}

impl AvsResult {
    /// Build a result from the network AVS letter, deriving message and matches.
    pub fn new(code: Option<&str>) -> Self {
        let letter = single_code(code);
        Self {
            code: code
                .map(|code| code.trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty()),
            message: letter.and_then(avs_message).map(str::to_string),
            street_match: letter.and_then(street_match).map(String::from),
            postal_match: letter.and_then(postal_match).map(String::from),
        }
    }

    /// Override the derived matches with values the vendor reports separately.
    pub fn with_matches(mut self, street_match: Option<&str>, postal_match: Option<&str>) -> Self {
        if let Some(street) = street_match {
            self.street_match = Some(street.to_string());
        }
        if let Some(postal) = postal_match {
            self.postal_match = Some(postal.to_string());
        }
        self
    }
}

fn cvv_message(code: char) -> Option<&'static str> {
    Some(match code {
        'D' => "CVV check flagged transaction as suspicious",
        'I' => "CVV failed data validation check",
        'M' => "CVV matches",
        'N' => "CVV does not match",
        'P' => "CVV not processed",
        'S' => "CVV should have been present",
        'U' => "CVV request unable to be processed by issuer",
        'X' => "Issuer does not participate in CVV program",
        _ => return None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvvResult {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl CvvResult {
    pub fn new(code: Option<&str>) -> Self {
        let letter = single_code(code);
        Self {
            code: letter.map(String::from),
            message: letter.and_then(cvv_message).map(str::to_string),
        }
    }
}
