use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restock::barcode::BarcodeRenderer;
use restock::config::Config;
use restock::models::{BinId, DuplicatePolicy};
use restock::web::RestockServer;

#[derive(Parser)]
#[command(
    name = "restock",
    version,
    about = "Warehouse stock-out reporting with a live restock queue",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Configuration file (TOML); set environment variables override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to $PORT or 10000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Handling of repeated reports for a pending bin (merge, append)
        #[arg(long, value_parser = parse_policy)]
        duplicate_policy: Option<DuplicatePolicy>,

        /// Language for pages and messages (en, zh-TW)
        #[arg(long)]
        lang: Option<String>,
    },

    /// Write the Code128 label for a bin as PNG
    Barcode {
        /// Bin id to encode
        bin_id: String,

        /// Output file path
        #[arg(short, long, default_value = "barcode.png")]
        output: PathBuf,
    },
}

fn parse_policy(s: &str) -> Result<DuplicatePolicy, String> {
    DuplicatePolicy::parse(s).ok_or_else(|| format!("unknown duplicate policy: {s} (expected merge or append)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            duplicate_policy,
            lang,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(policy) = duplicate_policy {
                config.reports.duplicate_policy = policy;
            }
            if let Some(lang) = lang {
                config.i18n.lang = restock::i18n::normalize_locale(&lang);
            }
            serve(config).await?;
        }

        Commands::Barcode { bin_id, output } => {
            tracing::info!(bin_id = %bin_id, output = %output.display(), "Starting barcode command");
            barcode(&config, &bin_id, &output)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("restock=debug,tower_http=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("restock={level},tower_http=info,warn")))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let server = RestockServer::new(config)?;
    println!("{}", server.info().display());

    server
        .start_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

fn barcode(config: &Config, raw: &str, output: &Path) -> Result<()> {
    let bin_id = BinId::parse(raw)?;
    let png = BarcodeRenderer::new(config.barcode.height).render_png(bin_id.as_str())?;

    std::fs::write(output, png)
        .with_context(|| format!("Failed to write barcode: {}", output.display()))?;

    println!("Wrote {} label to {}", bin_id, output.display());
    Ok(())
}
