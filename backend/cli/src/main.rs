use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use bidforge_config::Settings;
use bidforge_gateway::{start_server, AppState};

#[derive(Parser)]
#[command(name = "bidforge")]
#[command(about = "BidForge — blueprint analysis and bid generation service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the BidForge HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current service status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();
    match &settings.log_dir {
        Some(dir) => bidforge_logging::init_with_file(dir, &settings.log_level),
        None => bidforge_logging::init(&settings.log_level),
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let settings = Settings {
                port: port.unwrap_or(settings.port),
                ..settings
            };
            run_server(settings).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/health", settings.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("BidForge is not running on port {}", settings.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(settings: Settings) -> Result<()> {
    info!(
        bind = %settings.bind_address,
        port = settings.port,
        s3_bucket = %settings.s3_bucket,
        "Starting BidForge service"
    );

    let addr: SocketAddr = format!("{}:{}", settings.bind_address, settings.port).parse()?;
    let state = AppState::new(settings);
    start_server(addr, state).await
}
