pub mod validate;

use std::ops::Deref;

use common_utils::errors::{CustomResult, ValidationError};
use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, PrimitiveDateTime, Time};

pub use crate::validate::{CardNumber, CardNumberStrategy, CardNumberValidationErr};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CardSecurityCode(Secret<u16>);

impl TryFrom<u16> for CardSecurityCode {
    type Error = error_stack::Report<ValidationError>;
    fn try_from(csc: u16) -> Result<Self, Self::Error> {
        if (0..=9999).contains(&csc) {
            Ok(Self(Secret::new(csc)))
        } else {
            Err(report!(ValidationError::InvalidValue {
                message: "invalid card security code".to_string()
            }))
        }
    }
}

impl<'de> Deserialize<'de> for CardSecurityCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let csc = u16::deserialize(deserializer)?;
        csc.try_into().map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CardExpirationMonth(Secret<u8>);

impl CardExpirationMonth {
    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }
}

impl TryFrom<u8> for CardExpirationMonth {
    type Error = error_stack::Report<ValidationError>;
    fn try_from(month: u8) -> Result<Self, Self::Error> {
        if (1..=12).contains(&month) {
            Ok(Self(Secret::new(month)))
        } else {
            Err(report!(ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))
        }
    }
}

impl<'de> Deserialize<'de> for CardExpirationMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let month = u8::deserialize(deserializer)?;
        month.try_into().map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CardExpirationYear(Secret<u16>);

impl CardExpirationYear {
    pub fn four_digits(&self) -> String {
        self.0.peek().to_string()
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek() % 100)
    }
}

impl TryFrom<u16> for CardExpirationYear {
    type Error = error_stack::Report<ValidationError>;
    fn try_from(year: u16) -> Result<Self, Self::Error> {
        let year = if year < 100 { year + 2000 } else { year };
        if (2000..=2099).contains(&year) {
            Ok(Self(Secret::new(year)))
        } else {
            Err(report!(ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }))
        }
    }
}

impl<'de> Deserialize<'de> for CardExpirationYear {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let year = u16::deserialize(deserializer)?;
        year.try_into().map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CardExpiration {
    pub month: CardExpirationMonth,
    pub year: CardExpirationYear,
}

impl CardExpiration {
    pub fn new(month: u8, year: u16) -> CustomResult<Self, ValidationError> {
        Ok(Self {
            month: month.try_into()?,
            year: year.try_into()?,
        })
    }

    /// A card stays valid through the last day of its expiration month.
    pub fn is_expired(&self) -> CustomResult<bool, ValidationError> {
        let current_datetime_utc = time::OffsetDateTime::now_utc();
        let expiration_month = time::Month::try_from(*self.month).map_err(|_| {
            report!(ValidationError::InvalidValue {
                message: "invalid month".to_string()
            })
        })?;
        let expiration_year = i32::from(*self.year);
        let expiration_day = expiration_month.length(expiration_year);

        let expiration_date =
            Date::from_calendar_date(expiration_year, expiration_month, expiration_day).map_err(
                |_| {
                    report!(ValidationError::InvalidValue {
                        message: "error while constructing calendar date".to_string()
                    })
                },
            )?;

        let expiration_time = Time::MIDNIGHT;

        // actual expiry date specified on card w.r.t. local timezone
        let expiration_datetime = PrimitiveDateTime::new(expiration_date, expiration_time)
            .assume_utc()
            + Duration::days(1);

        Ok(current_datetime_utc > expiration_datetime)
    }

    pub fn get_month(&self) -> &CardExpirationMonth {
        &self.month
    }

    pub fn get_year(&self) -> &CardExpirationYear {
        &self.year
    }

    /// `MMYY`, optionally separated (`MM/YY`).
    pub fn mmyy(&self, delimiter: &str) -> Secret<String> {
        Secret::new(format!(
            "{}{}{}",
            self.month.two_digits(),
            delimiter,
            self.year.two_digits()
        ))
    }
}

impl Deref for CardExpirationMonth {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        self.0.peek()
    }
}

impl Deref for CardExpirationYear {
    type Target = u16;
    fn deref(&self) -> &Self::Target {
        self.0.peek()
    }
}

impl Deref for CardSecurityCode {
    type Target = u16;
    fn deref(&self) -> &Self::Target {
        self.0.peek()
    }
}
