// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

use anyhow::{Context, Result};
use clap::Parser;
use gemforge_sim::cli::{Cli, Commands, commands};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Respects RUST_LOG; logs go to stderr so --json output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let output = match &cli.command {
        Commands::Optimize(args) => commands::optimize(args)?,
        Commands::Assign(args) => commands::assign(args)?,
        Commands::Scenarios(args) => commands::scenarios(args),
        Commands::ExamplePlan => commands::example_plan().to_owned(),
    };
    print!("{output}");

    Ok(())
}
