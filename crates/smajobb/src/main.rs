// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Smajobb messaging gateway binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Smajobb - intent-constrained messaging gateway.
#[derive(Parser, Debug)]
#[command(name = "smajobb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the messaging gateway server.
    Serve,
    /// Print the effective configuration (secrets redacted).
    Config,
    /// Run database migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match smajobb_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            smajobb_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config) => print_config(config),
        Some(Commands::Migrate) => serve::run_migrate(&config).await,
        None => {
            println!("smajobb: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Print the effective configuration as TOML with secrets redacted.
fn print_config(
    mut config: smajobb_config::SmajobbConfig,
) -> Result<(), smajobb_core::GatewayError> {
    if config.gateway.bearer_token.is_some() {
        config.gateway.bearer_token = Some("[redacted]".to_string());
    }
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| smajobb_core::GatewayError::Config(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
