use clap::Parser;
use tracing_subscriber::EnvFilter;

use homeworth::interfaces::cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let args = cli::Cli::parse();
    if let Err(err) = cli::run(args).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
