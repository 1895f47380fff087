//! Money amounts and the conversions gateways need to render them

use std::{fmt::Display, str::FromStr};

use common_enums::{Currency, MoneyFormat};
use error_stack::ResultExt;
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal, RoundingStrategy,
};
use serde::{Deserialize, Serialize};

use crate::errors::{ParsingError, ValidationError};

/// Amount convertor trait for connector
pub trait AmountConvertor: Send {
    /// Output type for the connector
    type Output;
    /// helps in conversion of connector required amount type
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    /// helps in converting back connector required amount type to core minor unit
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>>;
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StringMinorUnitForConnector;

impl AmountConvertor for StringMinorUnitForConnector {
    type Output = StringMinorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(StringMinorUnit(localized_amount(
            amount,
            currency,
            MoneyFormat::Cents,
        )))
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let value = Decimal::from_str(&amount.0)
            .change_context(ParsingError::StringToDecimalConversionFailure)?;
        MinorUnit::from_localized_cents(value, currency)
    }
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(StringMajorUnit(localized_amount(
            amount,
            currency,
            MoneyFormat::Dollars,
        )))
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let value = Decimal::from_str(&amount.0)
            .change_context(ParsingError::StringToDecimalConversionFailure)?;
        MinorUnit::from_localized_dollars(value, currency)
    }
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct FloatMajorUnitForConnector;

impl AmountConvertor for FloatMajorUnitForConnector {
    type Output = FloatMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        let rendered = localized_amount(amount, currency, MoneyFormat::Dollars);
        let value = Decimal::from_str(&rendered)
            .change_context(ParsingError::StringToDecimalConversionFailure)?
            .to_f64()
            .ok_or(ParsingError::DecimalToFloatConversionFailure)?;
        Ok(FloatMajorUnit(value))
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let value =
            Decimal::from_f64(amount.0).ok_or(ParsingError::FloatToDecimalConversionFailure)?;
        MinorUnit::from_localized_dollars(value, currency)
    }
}

/// Connector required amount type
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MinorUnitForConnector;

impl AmountConvertor for MinorUnitForConnector {
    type Output = MinorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        let rendered = localized_amount(amount, currency, MoneyFormat::Cents);
        let value = i64::from_str(&rendered)
            .change_context(ParsingError::DecimalToI64ConversionFailure)?;
        Ok(MinorUnit(value))
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        MinorUnit::from_localized_cents(Decimal::from(amount.0), currency)
    }
}

/// An amount in cents, the canonical input of every gateway operation.
///
/// Zero decimal currencies are still expressed in hundredths (`100` JPY cents
/// is one yen) and three decimal currencies in thousandths.
#[derive(
    Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// forms a new minor default unit i.e zero
    pub fn zero() -> Self {
        Self(0)
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    fn from_localized_cents(
        value: Decimal,
        currency: Currency,
    ) -> Result<Self, error_stack::Report<ParsingError>> {
        let value = if currency.is_zero_decimal_currency() {
            value * Decimal::ONE_HUNDRED
        } else {
            value
        };
        value
            .to_i64()
            .map(Self)
            .ok_or(ParsingError::DecimalToI64ConversionFailure.into())
    }

    fn from_localized_dollars(
        value: Decimal,
        currency: Currency,
    ) -> Result<Self, error_stack::Report<ParsingError>> {
        let factor = if currency.is_three_decimal_currency() {
            Decimal::ONE_THOUSAND
        } else {
            Decimal::ONE_HUNDRED
        };
        (value * factor)
            .round()
            .to_i64()
            .map(Self)
            .ok_or(ParsingError::DecimalToI64ConversionFailure.into())
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn non_integer_amount(input: impl Display) -> error_stack::Report<ValidationError> {
    ValidationError::InvalidValue {
        message: format!("money amount must be an integer in cents, got `{input}`"),
    }
    .into()
}

impl FromStr for MinorUnit {
    type Err = error_stack::Report<ValidationError>;

    /// Parses `"100"`; rejects `"1.50"`, `"1e2"` and anything else that is not a
    /// plain integer.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| non_integer_amount(value))
    }
}

impl TryFrom<f64> for MinorUnit {
    type Error = error_stack::Report<ValidationError>;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(non_integer_amount(value));
        }
        Decimal::from_f64(value)
            .and_then(|decimal| decimal.to_i64())
            .map(Self)
            .ok_or_else(|| non_integer_amount(value))
    }
}

/// Render an amount in cents the way a gateway with `format` expects it.
///
/// `Dollars` gives two decimal places (`100` becomes `"1.00"`), `Cents` keeps
/// the integer (`"100"`).
pub fn amount(money: MinorUnit, format: MoneyFormat) -> String {
    match format {
        MoneyFormat::Cents => money.0.to_string(),
        MoneyFormat::Dollars => Decimal::new(money.0, 2).to_string(),
    }
}

/// Like [`amount`] but honoring the number of fractional digits of `currency`.
pub fn localized_amount(money: MinorUnit, currency: Currency, format: MoneyFormat) -> String {
    let rendered = amount(money, format);

    if currency.is_zero_decimal_currency() {
        match format {
            MoneyFormat::Dollars => rendered
                .split_once('.')
                .map(|(whole, _)| whole.to_string())
                .unwrap_or(rendered),
            MoneyFormat::Cents => Decimal::new(money.0, 2)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                .to_string(),
        }
    } else if currency.is_three_decimal_currency() {
        match format {
            MoneyFormat::Dollars => Decimal::new(money.0, 3).to_string(),
            MoneyFormat::Cents => rendered,
        }
    } else {
        rendered
    }
}

/// Connector specific types to send
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StringMinorUnit(String);

impl StringMinorUnit {
    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

impl Display for StringMinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connector specific types to send
#[derive(Default, Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct FloatMajorUnit(f64);

impl FloatMajorUnit {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn get_amount_as_f64(self) -> f64 {
        self.0
    }
}

/// Connector specific types to send
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

impl Display for StringMajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod amount_conversion_tests {
    use super::*;

    #[test]
    fn amount_renders_both_formats() {
        assert_eq!(amount(MinorUnit::new(100), MoneyFormat::Dollars), "1.00");
        assert_eq!(amount(MinorUnit::new(100), MoneyFormat::Cents), "100");
        assert_eq!(amount(MinorUnit::new(1), MoneyFormat::Dollars), "0.01");
        assert_eq!(amount(MinorUnit::new(123456), MoneyFormat::Dollars), "1234.56");
    }

    #[test]
    fn non_integer_amounts_are_rejected() {
        assert!(MinorUnit::from_str("1.50").is_err());
        assert!(MinorUnit::from_str("abc").is_err());
        assert!(MinorUnit::try_from(1.5).is_err());
        assert!(MinorUnit::try_from(f64::NAN).is_err());
        assert!(serde_json::from_str::<MinorUnit>("1.5").is_err());
        assert!(serde_json::from_str::<MinorUnit>("\"100\"").is_err());

        assert_eq!(MinorUnit::from_str("100").unwrap(), MinorUnit::new(100));
        assert_eq!(MinorUnit::try_from(250.0).unwrap(), MinorUnit::new(250));
        assert_eq!(serde_json::from_str::<MinorUnit>("100").unwrap(), MinorUnit::new(100));
    }

    #[test]
    fn zero_decimal_currencies_drop_the_fraction() {
        let money = MinorUnit::new(100);
        assert_eq!(localized_amount(money, Currency::JPY, MoneyFormat::Dollars), "1");
        assert_eq!(localized_amount(money, Currency::JPY, MoneyFormat::Cents), "1");
        assert_eq!(
            localized_amount(MinorUnit::new(12345), Currency::HUF, MoneyFormat::Dollars),
            "123"
        );
        assert_eq!(
            localized_amount(MinorUnit::new(150), Currency::KRW, MoneyFormat::Cents),
            "2"
        );
    }

    #[test]
    fn three_decimal_currencies_keep_three_places() {
        let money = MinorUnit::new(1234);
        assert_eq!(localized_amount(money, Currency::KWD, MoneyFormat::Dollars), "1.234");
        assert_eq!(localized_amount(money, Currency::OMR, MoneyFormat::Cents), "1234");
    }

    #[test]
    fn two_decimal_currencies_match_amount() {
        let money = MinorUnit::new(1099);
        assert_eq!(localized_amount(money, Currency::USD, MoneyFormat::Dollars), "10.99");
        assert_eq!(localized_amount(money, Currency::EUR, MoneyFormat::Cents), "1099");
    }

    #[test]
    fn convertors_follow_localized_rules() {
        let major = StringMajorUnitForConnector
            .convert(MinorUnit::new(100), Currency::JPY)
            .unwrap();
        assert_eq!(major.get_amount_as_string(), "1");

        let float = FloatMajorUnitForConnector
            .convert(MinorUnit::new(1099), Currency::CAD)
            .unwrap();
        assert!((float.get_amount_as_f64() - 10.99).abs() < f64::EPSILON * 16.0);

        let minor = MinorUnitForConnector
            .convert(MinorUnit::new(500), Currency::JPY)
            .unwrap();
        assert_eq!(minor, MinorUnit::new(5));
    }

    #[test]
    fn convertors_round_trip_to_cents() {
        let back = StringMajorUnitForConnector
            .convert_back(StringMajorUnit::new("10.99".to_string()), Currency::USD)
            .unwrap();
        assert_eq!(back, MinorUnit::new(1099));

        let back = MinorUnitForConnector
            .convert_back(MinorUnit::new(5), Currency::JPY)
            .unwrap();
        assert_eq!(back, MinorUnit::new(500));

        let back = FloatMajorUnitForConnector
            .convert_back(FloatMajorUnit::new(1.234), Currency::KWD)
            .unwrap();
        assert_eq!(back, MinorUnit::new(1234));
    }
}
