// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::error::ConfigError;
use gemforge_types::MaterialGrade;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reference material is priced per this many crystals
const CRYSTALS_PER_REFERENCE_UNIT: f64 = 100.0;

/// Tuning of the cost optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Gold spent per craft attempt before the cost modifier
    #[serde(default = "default_craft_cost")]
    pub craft_cost_per_attempt: f64,

    /// Lifecycles simulated per requested simulation
    #[serde(default = "default_lifecycle_multiplier")]
    pub lifecycle_multiplier: u32,

    /// Floor on simulated lifecycles per estimate
    #[serde(default = "default_min_lifecycle_runs")]
    pub min_lifecycle_runs: u32,

    /// How long a cached slot cost stays valid
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Fixed RNG seed; runs are not reproducible when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Crystals needed per labor unit
    #[serde(default = "default_crystals_per_labor_unit")]
    pub crystals_per_labor_unit: f64,
}

fn default_craft_cost() -> f64 {
    900.0
}

fn default_lifecycle_multiplier() -> u32 {
    20
}

fn default_min_lifecycle_runs() -> u32 {
    2000
}

fn default_cache_ttl_secs() -> u64 {
    21_600
}

fn default_crystals_per_labor_unit() -> f64 {
    8.5
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            craft_cost_per_attempt: default_craft_cost(),
            lifecycle_multiplier: default_lifecycle_multiplier(),
            min_lifecycle_runs: default_min_lifecycle_runs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            seed: None,
            crystals_per_labor_unit: default_crystals_per_labor_unit(),
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.craft_cost_per_attempt <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "craft_cost_per_attempt",
            });
        }
        if self.crystals_per_labor_unit <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "crystals_per_labor_unit",
            });
        }
        if self.lifecycle_multiplier == 0 {
            return Err(ConfigError::Multiplier(self.lifecycle_multiplier));
        }
        if self.min_lifecycle_runs == 0 {
            return Err(ConfigError::NotPositive {
                field: "min_lifecycle_runs",
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "cache_ttl_secs",
            });
        }
        Ok(())
    }

    /// Number of lifecycles to simulate for one estimate
    pub fn lifecycle_runs(&self, simulations: u32) -> u32 {
        simulations
            .saturating_mul(self.lifecycle_multiplier)
            .max(self.min_lifecycle_runs)
    }

    /// Gold value of the labor spent on one material of `grade`
    pub fn labor_value(&self, grade: MaterialGrade, reference_price: u64) -> f64 {
        let crystals = f64::from(grade.labor_units()) * self.crystals_per_labor_unit;
        crystals / CRYSTALS_PER_REFERENCE_UNIT * reference_price as f64
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
