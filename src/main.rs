use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xray_gateway::analysis::Analyzer;
use xray_gateway::config::Config;
use xray_gateway::models::AnalysisRequest;
use xray_gateway::{server, upload};

#[derive(Debug, Parser)]
#[command(name = "xray-gateway")]
#[command(about = "Chest X-ray analysis gateway backed by a hosted vision model")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the analysis endpoint over HTTP (default).
    Serve {
        /// Listen address; overrides BIND_ADDR.
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Analyze a local image file and print the result as JSON.
    Analyze {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xray_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or(config.bind_addr);
            info!("Starting xray-gateway");
            if let Err(e) = server::run_server(&config, bind_addr).await {
                error!("Server failed: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Analyze { path } => {
            let image_data = match upload::load_image_data_url(&path) {
                Ok(data) => data,
                Err(e) => {
                    error!("Cannot use {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            };

            let analyzer = Analyzer::from_config(&config);
            match analyzer.analyze(&AnalysisRequest::new(image_data)).await {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(())
                }
                Err(e) => {
                    error!("Analysis failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
