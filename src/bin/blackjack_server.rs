use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use blackjack_protocol::config::GameConfig;
use blackjack_protocol::error::Result;
use blackjack_protocol::transport::server::Server;
use blackjack_protocol::utils::logging::init_logging;

/// Host blackjack tables on the local network.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file; environment variables are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name advertised in discovery offers
    #[arg(short, long)]
    name: Option<String>,

    /// Listen address, e.g. 0.0.0.0:0 for an ephemeral port
    #[arg(short, long)]
    address: Option<String>,

    /// Do not broadcast offers
    #[arg(long)]
    no_discovery: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::from_env()?,
    };
    if let Some(name) = &args.name {
        config.server.display_name = name.clone();
    }
    if let Some(address) = &args.address {
        config.server.address = address.clone();
    }
    if args.no_discovery {
        config.discovery.enabled = false;
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if args.print_config {
        println!("{}", GameConfig::example_config());
        return;
    }

    if let Err(e) = run(&args).await {
        error!(error = %e, "Server stopped");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    init_logging(&config.logging)?;

    let server = Server::bind(config).await?;
    println!("Server started, listening on {}", server.local_addr()?);
    server.run().await
}
