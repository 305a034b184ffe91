//! `marginctl` -- operator tooling for the margin-trading protocol.
//!
//! Runs exactly one action per invocation against the selected network.
//! Contract names resolve through the JSON address book; the node holds
//! the signing keys.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default                  | Description                          |
//! |---------------------|----------|--------------------------|--------------------------------------|
//! | `MARGINCTL_NETWORK` | no       | `development`            | `development`, `testnet`, `mainnet` (alias `rsk-mainnet`) |
//! | `MARGINCTL_CONFIG`  | no       | `config/addresses.json`  | Path of the address book             |
//! | `MARGINCTL_ACCOUNT` | no       | `operator`               | Signing account name in the book     |
//! | `RUST_LOG`          | no       | `marginctl=info,...`     | Log filter                           |

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marginctl_core::network::{AddressBook, Network};
use marginctl_ledger::RpcLedger;
use marginctl_operator::Operator;

mod commands;

use commands::Command;

/// Operator tooling for the margin-trading protocol
#[derive(Debug, Parser)]
#[command(name = "marginctl", version)]
struct Cli {
    /// Network to operate on
    #[arg(long, global = true, env = "MARGINCTL_NETWORK", default_value = "development")]
    network: Network,

    /// Address book path
    #[arg(
        long,
        global = true,
        env = "MARGINCTL_CONFIG",
        default_value = "config/addresses.json"
    )]
    config: PathBuf,

    /// Signing account name
    #[arg(long, global = true, env = "MARGINCTL_ACCOUNT", default_value = "operator")]
    account: String,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "marginctl=info,marginctl_operator=info,marginctl_ledger=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let book = AddressBook::load(&cli.config)
        .with_context(|| format!("Failed to load address book {}", cli.config.display()))?;
    let config = book.network(cli.network)?;

    let ledger = RpcLedger::connect(config)
        .await
        .with_context(|| format!("Failed to connect to {} at {}", cli.network, config.rpc_url))?;
    let operator = Operator::new(&ledger, config, &cli.account)?;

    let outcome = operator.run(cli.command.into()).await?;
    tracing::debug!(network = %cli.network, "Action finished");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{outcome}");
    }

    Ok(())
}
