use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use testrail_mcp::client::{TestRailApi, TestRailClient};
use testrail_mcp::config::Config;
use testrail_mcp::mcp;

#[derive(Parser)]
#[command(name = "testrail-mcp")]
#[command(about = "MCP server exposing the TestRail API to AI assistants")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server via stdio (default)
    Serve,
    /// Verify TestRail connectivity and exit
    Check,
}

/// Initialize tracing to stderr: stdout is the protocol channel.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "testrail_mcp=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env()?;
    let client = TestRailClient::new(&config);

    tracing::info!("Testing connection to TestRail...");
    if !client.test_connection().await {
        anyhow::bail!("Failed to connect to TestRail. Please check your configuration.");
    }
    tracing::info!("Successfully connected to TestRail");

    match cli.command {
        Some(Commands::Check) => {
            match config.default_project_id {
                Some(id) => println!("Connection to TestRail successful! Default project ID: {id}"),
                None => println!("Connection to TestRail successful! No default project ID configured."),
            }
        }
        Some(Commands::Serve) | None => {
            mcp::run_stdio_server(&config).await?;
        }
    }

    Ok(())
}
