// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

//! TOML plan files: optimizer tuning, the request and market prices.

use anyhow::{Context, Result};
use gemforge_core::{OptimizerConfig, PriceTable};
use gemforge_types::OptimizeRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything one optimization run needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    pub request: OptimizeRequest,

    /// Unit prices keyed by marketplace name, e.g. "Heroic Order Gem: Stability"
    #[serde(default)]
    pub prices: PriceTable,
}

impl PlanFile {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse plan file")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid plan file {}", path.display()))
    }

    /// Apply command-line overrides on top of the file
    pub fn with_overrides(mut self, seed: Option<u64>, simulations: Option<u32>) -> Self {
        if let Some(seed) = seed {
            self.optimizer.seed = Some(seed);
        }
        if let Some(simulations) = simulations {
            self.request.simulations_per_gem = simulations;
        }
        self
    }
}

pub const EXAMPLE_PLAN: &str = r#"# GemForge plan file

[optimizer]
# Gold per craft attempt before the cost modifier
craft_cost_per_attempt = 900.0
lifecycle_multiplier = 20
min_lifecycle_runs = 2000
# seed = 42

[request]
# Price of 100 crystals; also the reinitialization price
reference_price = 92
simulations_per_gem = 100

[request.cores]
order = ["ancient", "relic"]
chaos = ["relic"]

[[request.held_gems]]
name = "Order Gem: Immutability"
core_point = 5
efficiency = 5

[[request.held_gems]]
name = "Chaos Gem: Erosion"
core_point = 4
efficiency = 3

[prices]
"Advanced Order Gem: Stability" = 40
"Rare Order Gem: Stability" = 180
"Heroic Order Gem: Stability" = 1400
"Advanced Order Gem: Solidity" = 35
"Rare Order Gem: Solidity" = 160
"Heroic Order Gem: Solidity" = 1100
"Advanced Order Gem: Immutability" = 30
"Rare Order Gem: Immutability" = 140
"Heroic Order Gem: Immutability" = 950
"Advanced Chaos Gem: Erosion" = 45
"Rare Chaos Gem: Erosion" = 200
"Heroic Chaos Gem: Erosion" = 1600
"Advanced Chaos Gem: Distortion" = 38
"Rare Chaos Gem: Distortion" = 170
"Heroic Chaos Gem: Distortion" = 1250
"Advanced Chaos Gem: Collapse" = 32
"Rare Chaos Gem: Collapse" = 150
"Heroic Chaos Gem: Collapse" = 1000
"#;
