use std::process::ExitCode;

use clap::Parser;
use payment_gateway::{cli, configs, logger, GatewayClient};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let config = configs::Config::new_with_config_path(cli.config.clone())?;
    let _guards = logger::setup(
        &config.log,
        payment_gateway::service_name!(),
        [
            payment_gateway::service_name!(),
            "connector_integration",
            "external_services",
        ],
    );

    let client = GatewayClient::from_config(&config)?;
    let response = cli::run(&client, &cli.command).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
