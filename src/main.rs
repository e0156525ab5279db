use anyhow::{Context, Result};
use clap::Parser;
use orderbot::{AppConfig, InvocationEvent, InvocationHandler};
use rust_decimal::Decimal;

/// Place a single limit buy from the command line
///
/// Every option falls back to its environment variable, so a `.env` file
/// with ACCOUNT, SYMBOL, FIAT_AMOUNT, ... is enough to run locally.
#[derive(Debug, Parser)]
#[command(name = "orderbot", version, about)]
struct Cli {
    /// Account name, also the Parameter Store key of its API secret
    #[arg(long, env = "ACCOUNT")]
    account: Option<String>,

    /// Trading pair, e.g. btcusd
    #[arg(long, env = "SYMBOL")]
    symbol: Option<String>,

    /// Fiat amount to spend
    #[arg(long, env = "FIAT_AMOUNT")]
    fiat_amount: Option<Decimal>,

    /// "maker" or "taker"
    #[arg(long, env = "ORDER_TYPE")]
    order_type: Option<String>,

    /// Use the sandbox exchange
    #[arg(long, env = "SANDBOX")]
    sandbox: bool,

    /// Reduce the amount by the exchange fee
    #[arg(long, env = "INCLUDE_FEES")]
    include_fees: bool,
}

impl From<Cli> for InvocationEvent {
    fn from(cli: Cli) -> Self {
        Self {
            account: cli.account,
            symbol: cli.symbol,
            fiat_amount: cli.fiat_amount,
            order_type: cli.order_type,
            sandbox: cli.sandbox,
            include_fees: cli.include_fees,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::debug!("Configuration: {:?}", config);

    let handler = InvocationHandler::from_config(&config)
        .await
        .context("Failed to initialize order submitter")?;

    handler
        .handle(cli.into(), None)
        .await
        .context("Order invocation failed")?;

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orderbot=info")),
        )
        .init();
}
