//! banter CLI: terminal chat client for a local agent server

use banter_core::DEFAULT_SERVER_URL;
use clap::Parser;

/// Terminal chat client for a local agent server
#[derive(Parser)]
#[command(name = "banter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the agent server
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server: String,
}

fn main() {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    if let Err(e) = rt.block_on(banter_tui::run_tui(&cli.server)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
