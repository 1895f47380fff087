//! Command line surface: one normalized operation per invocation.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use cards::{CardExpiration, CardNumber};
use common_enums::Currency;
use common_utils::{Email, MinorUnit};
use domain_types::{
    connector_types::PaymentOptions,
    gateway_response::{AuthorizationToken, GatewayResponse},
    payment_method_data::{Card, PaymentMethodData},
};
use hyperswitch_masking::Secret;

use crate::{client::GatewayClient, error::CliError};

#[derive(Debug, clap::Parser)]
#[command(name = "payment-gateway", version, about = "Run one operation against a payment gateway")]
pub struct Cli {
    /// Configuration file, instead of `config/<RUN_ENV>.toml`.
    #[arg(long, global = true, env = "GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Authorize and capture in one step.
    Purchase(AmountArgs),
    /// Reserve funds for a later capture.
    Authorize(AmountArgs),
    /// Settle a previous authorization.
    Capture(ReferenceAmountArgs),
    /// Return funds of a settled payment.
    Refund(ReferenceAmountArgs),
    /// Cancel a payment before settlement.
    Void(ReferenceArgs),
    /// Check that a payment method is usable.
    Verify(PaymentMethodArgs),
    /// Save a payment method with the gateway.
    Store(PaymentMethodArgs),
    /// Remove a saved payment method.
    Unstore(ReferenceArgs),
}

#[derive(Debug, clap::Args)]
pub struct AmountArgs {
    /// Amount in cents.
    #[arg(long)]
    pub amount: i64,
    #[command(flatten)]
    pub payment_method: PaymentMethodArgs,
}

#[derive(Debug, clap::Args)]
pub struct ReferenceAmountArgs {
    /// Amount in cents.
    #[arg(long)]
    pub amount: i64,
    #[command(flatten)]
    pub reference: ReferenceArgs,
}

#[derive(Debug, clap::Args)]
pub struct ReferenceArgs {
    /// Authorization returned by an earlier operation.
    #[arg(long)]
    pub authorization: String,
    #[command(flatten)]
    pub options: OptionsArgs,
}

#[derive(Debug, clap::Args)]
pub struct PaymentMethodArgs {
    #[arg(long, required_unless_present = "token", conflicts_with = "token")]
    pub card_number: Option<String>,
    #[arg(long, requires = "card_number")]
    pub month: Option<u8>,
    #[arg(long, requires = "card_number")]
    pub year: Option<u16>,
    #[arg(long)]
    pub cvc: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Token of a stored payment method.
    #[arg(long)]
    pub token: Option<String>,
    #[command(flatten)]
    pub options: OptionsArgs,
}

#[derive(Debug, Default, clap::Args)]
pub struct OptionsArgs {
    #[arg(long)]
    pub order_id: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// ISO 4217 code, the gateway default when absent.
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub ip: Option<String>,
    #[arg(long)]
    pub customer: Option<String>,
    #[arg(long)]
    pub invoice: Option<String>,
}

fn invalid(field: &'static str, error: impl Display) -> CliError {
    CliError::InvalidArgument {
        field,
        reason: error.to_string(),
    }
}

fn parse_with<T, E>(field: &'static str, value: &str) -> Result<T, CliError>
where
    T: FromStr<Err = E>,
    E: Display,
{
    value.trim().parse().map_err(|error: E| invalid(field, error))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl OptionsArgs {
    pub fn to_payment_options(&self) -> Result<PaymentOptions, CliError> {
        Ok(PaymentOptions {
            order_id: non_blank(self.order_id.clone()),
            description: non_blank(self.description.clone()),
            currency: self
                .currency
                .as_deref()
                .map(|currency| parse_with::<Currency, _>("currency", &currency.to_uppercase()))
                .transpose()?,
            email: self
                .email
                .as_deref()
                .map(|email| parse_with::<Email, _>("email", email))
                .transpose()?,
            ip: non_blank(self.ip.clone()).map(Secret::new),
            customer: non_blank(self.customer.clone()),
            invoice: non_blank(self.invoice.clone()),
            ..PaymentOptions::default()
        })
    }
}

impl PaymentMethodArgs {
    pub fn to_payment_method(&self) -> Result<PaymentMethodData, CliError> {
        if let Some(token) = non_blank(self.token.clone()) {
            return Ok(PaymentMethodData::Token(Secret::new(token)));
        }
        let number = self.card_number.as_deref().ok_or_else(|| {
            invalid("card_number", "a card number or a token is required")
        })?;
        let (Some(month), Some(year)) = (self.month, self.year) else {
            return Err(invalid("expiration", "both month and year are required"));
        };
        Ok(PaymentMethodData::Card(Card {
            number: parse_with::<CardNumber, _>("card_number", number)?,
            expiration: CardExpiration::new(month, year)
                .map_err(|error| invalid("expiration", error))?,
            cvc: non_blank(self.cvc.clone()).map(Secret::new),
            first_name: non_blank(self.first_name.clone()).map(Secret::new),
            last_name: non_blank(self.last_name.clone()).map(Secret::new),
        }))
    }
}

impl ReferenceArgs {
    fn to_authorization(&self) -> Result<AuthorizationToken, CliError> {
        parse_with::<AuthorizationToken, _>("authorization", &self.authorization)
    }
}

/// Run `command` with `client`. Declines come back as unsuccessful
/// responses; only faults found before contacting the vendor are errors.
pub async fn run(client: &GatewayClient, command: &Command) -> Result<GatewayResponse, CliError> {
    let response = match command {
        Command::Purchase(args) => {
            client
                .purchase(
                    MinorUnit::new(args.amount),
                    &args.payment_method.to_payment_method()?,
                    &args.payment_method.options.to_payment_options()?,
                )
                .await?
        }
        Command::Authorize(args) => {
            client
                .authorize(
                    MinorUnit::new(args.amount),
                    &args.payment_method.to_payment_method()?,
                    &args.payment_method.options.to_payment_options()?,
                )
                .await?
        }
        Command::Capture(args) => {
            client
                .capture(
                    MinorUnit::new(args.amount),
                    &args.reference.to_authorization()?,
                    &args.reference.options.to_payment_options()?,
                )
                .await?
        }
        Command::Refund(args) => {
            client
                .refund(
                    MinorUnit::new(args.amount),
                    &args.reference.to_authorization()?,
                    &args.reference.options.to_payment_options()?,
                )
                .await?
        }
        Command::Void(args) => {
            client
                .void(&args.to_authorization()?, &args.options.to_payment_options()?)
                .await?
        }
        Command::Verify(args) => {
            client
                .verify(&args.to_payment_method()?, &args.options.to_payment_options()?)
                .await?
        }
        Command::Store(args) => {
            client
                .store(&args.to_payment_method()?, &args.options.to_payment_options()?)
                .await?
        }
        Command::Unstore(args) => {
            client
                .unstore(&args.to_authorization()?, &args.options.to_payment_options()?)
                .await?
        }
    };
    Ok(response)
}
