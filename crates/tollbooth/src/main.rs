// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tollbooth - response caching and tiered cost accounting for expensive
//! backends.
//!
//! This is the binary entry point for the Tollbooth CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tollbooth_config::TollboothConfig;

mod demo;
mod pricing;

/// Tollbooth - response caching and tiered cost accounting.
#[derive(Parser, Debug)]
#[command(name = "tollbooth", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved configuration.
    Config,
    /// Print the three-tier pricing table.
    Pricing,
    /// Run a demo dispatch loop over an in-process echo backend.
    Demo,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup; everything downstream is
    // constructed from it, nothing is lazily initialized.
    let config = match tollbooth_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tollbooth_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    match cli.command {
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Pricing) => pricing::run_pricing(&config),
        Some(Commands::Demo) => {
            if let Err(err) = demo::run_demo(&config).await {
                eprintln!("tollbooth demo: {err}");
                std::process::exit(1);
            }
        }
        None => {
            println!("tollbooth: use --help for available commands");
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured `service.log_level`
/// applies.
fn init_tracing(config: &TollboothConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.service.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Print a summary of the resolved configuration.
fn print_config(config: &TollboothConfig) {
    println!("service.name              = {}", config.service.name);
    println!("service.log_level         = {}", config.service.log_level);
    println!("cache.default_ttl_secs    = {}", config.cache.default_ttl_secs);
    println!("cache.max_entries         = {}", config.cache.max_entries);
    println!(
        "cache.cleanup_interval_secs = {}",
        config.cache.cleanup_interval_secs
    );
    for (name, tier) in [
        ("cheap", &config.tiers.cheap),
        ("medium", &config.tiers.medium),
        ("expensive", &config.tiers.expensive),
    ] {
        println!(
            "tiers.{name:<9} model={} input=${}/1k output=${}/1k",
            tier.model, tier.input_per_kunit, tier.output_per_kunit
        );
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config =
            tollbooth_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.service.name, "tollbooth");
    }
}
