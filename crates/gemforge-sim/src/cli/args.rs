// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gemforge")]
#[command(author, version, about = "GemForge upgrade cost optimizer")]
#[command(
    long_about = "Finds the cheapest way to fill Order and Chaos cores with crafted gems.\n\
    \nOwned gems are placed into cores first. The leftover willpower of every core is\n\
    split into per-slot gem costs and each cost is priced by simulating crafting\n\
    lifecycles against the market prices in the plan file.\n\
    \nExamples:\n  \
    gemforge example-plan > plan.toml          # Start from the example plan\n  \
    gemforge optimize --plan plan.toml --baseline-policy\n  \
    gemforge assign --plan plan.toml           # Placement only, no simulation\n  \
    gemforge scenarios --willpower 12 --slots 3"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full optimization for a plan file
    #[command(
        long_about = "Place owned gems, enumerate slot scenarios and estimate crafting costs.\n\
        \nPolicies (choose one):\n  \
        - Trained models: --policies <DIR> with gem_model_c{cp}_e{eff}.json files\n  \
        - Baseline: --baseline-policy accepts every draw\n\
        \nExamples:\n  \
        gemforge optimize --plan plan.toml --baseline-policy\n  \
        gemforge optimize --plan plan.toml --policies ./models --seed 7 --json"
    )]
    Optimize(OptimizeArgs),

    /// Place owned gems into cores and print what is left
    #[command(
        long_about = "Run only the gem placement step for every category in the plan.\n\
        \nPrints remaining willpower and slots per core. Fails when owned gems cannot\n\
        be placed so that every core can still be completed.\n\
        \nExample:\n  \
        gemforge assign --plan plan.toml"
    )]
    Assign(AssignArgs),

    /// List the ways a core's leftover willpower can be split over its slots
    #[command(
        long_about = "Enumerate non-decreasing per-slot gem costs (3 to 9) that use the\n\
        given willpower exactly.\n\
        \nExample:\n  \
        gemforge scenarios --willpower 12 --slots 3"
    )]
    Scenarios(ScenariosArgs),

    /// Print an example plan file
    ExamplePlan,
}

#[derive(Debug, Parser)]
pub struct OptimizeArgs {
    /// Plan file (TOML)
    #[arg(
        long,
        value_name = "PATH",
        help = "Plan file with [optimizer], [request] and [prices] sections"
    )]
    pub plan: PathBuf,

    /// Directory of trained decision models
    #[arg(
        long,
        value_name = "DIR",
        conflicts_with = "baseline_policy",
        required_unless_present = "baseline_policy",
        help = "Directory containing gem_model_c*_e*.json policy files"
    )]
    pub policies: Option<PathBuf>,

    /// Use the accept-everything policy instead of trained models
    #[arg(
        long,
        default_value_t = false,
        help = "Accept every crafting draw (targets with core point 5 only)"
    )]
    pub baseline_policy: bool,

    /// Fixed RNG seed
    #[arg(
        long,
        help = "Seed for reproducible results (overrides [optimizer].seed)"
    )]
    pub seed: Option<u64>,

    /// Simulations per gem
    #[arg(
        long,
        help = "Simulations per gem estimate, 50-1000 (overrides [request].simulations_per_gem)"
    )]
    pub simulations: Option<u32>,

    /// Print JSON instead of tables
    #[arg(long, default_value_t = false, help = "Emit the full result as JSON")]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct AssignArgs {
    /// Plan file (TOML)
    #[arg(long, value_name = "PATH", help = "Plan file with a [request] section")]
    pub plan: PathBuf,

    /// Print JSON instead of tables
    #[arg(long, default_value_t = false, help = "Emit leftovers as JSON")]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ScenariosArgs {
    /// Willpower left in the core
    #[arg(long, help = "Leftover willpower to distribute")]
    pub willpower: u32,

    /// Open slots in the core
    #[arg(
        long,
        default_value_t = 4,
        help = "Number of empty slots (0-4)"
    )]
    pub slots: u32,
}
