// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Citabot - a Telegram appointment-booking bot backed by Google Calendar.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};

/// Citabot - book, list, cancel, and reschedule calendar appointments from Telegram.
#[derive(Parser, Debug)]
#[command(name = "citabot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot server.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match citabot_config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("citabot: configuration error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("citabot serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("citabot: cannot render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("citabot: use --help for available commands");
        }
    }
}
