use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;

use apex_tutor::api::{self, ApiState};
use apex_tutor::config::AppConfig;
use apex_tutor::preview;

#[derive(Parser)]
#[command(
    name = "apex-tutor",
    version,
    about = "APEX course preview: backend routes and a terminal preview"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the tutor, application and deck routes over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Play the slide lesson and tutor quiz in the terminal
    Preview {
        /// Resume file to generate a personalised deck from
        #[arg(long)]
        resume: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    match cli.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Preview { resume } => preview::run(&config, resume).await,
    }
}

async fn serve(config: AppConfig, port: u16) -> anyhow::Result<()> {
    let state = Arc::new(ApiState {
        config,
        http: reqwest::Client::new(),
    });
    let app = api::router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("apex tutor backend listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
