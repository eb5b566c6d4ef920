mod import;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mbimport_bridge::{
    Credentials, HttpImageFetcher, HttpTransport, MarketsBridgeClient, RetryPolicy,
};
use mbimport_importer::ProductImporter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mbimport")]
#[command(about = "Import marketplace product records into Markets Bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import newline-delimited product JSON records
    Import {
        /// Read records from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Validate records and print what would be imported without any network traffic
        #[arg(long)]
        dry_run: bool,
    },
    /// Exchange credentials for a token to verify access
    Login,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = mbimport_core::load_app_config_from_env()?;
    init_tracing(&config.log_level)?;
    tracing::info!(
        env = %config.env,
        marketplace = %config.marketplace_name,
        bridge_host = %config.bridge_host,
        "mbimport starting"
    );
    tracing::debug!(?config, "configuration loaded");

    let transport = HttpTransport::new(
        &config.bridge_host,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let policy = RetryPolicy::new(
        config.max_attempts,
        Duration::from_millis(config.backoff_base_ms),
    );
    let client = Arc::new(MarketsBridgeClient::new(
        transport.clone(),
        Credentials::new(config.bridge_login.clone(), config.bridge_password.clone()),
        policy,
    ));

    match cli.command {
        Commands::Import { file, dry_run } => {
            let fetcher = Arc::new(HttpImageFetcher::new(transport, policy));
            let importer = ProductImporter::new(client, fetcher, config.marketplace_id)
                .with_type_marker(config.product_type_marker.clone());
            import::run_import(&importer, &config, file.as_deref(), dry_run).await
        }
        Commands::Login => {
            client.accessor().access_token().await?;
            println!("login ok: {} at {}", config.bridge_login, config.bridge_host);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
