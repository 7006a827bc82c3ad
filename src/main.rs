// CLI binary entry point for oxitag

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use cli::Config;

fn main() {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
