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

use crate::gem::{CoreCategory, CoreGrade, MaterialId, TargetSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Cost Results =============

/// Expected cost of producing one gem, split by where the gold goes.
/// All components share one currency; infinity marks an unreachable target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Base materials bought
    pub material_cost: f64,

    /// Gold spent on craft attempts
    pub craft_cost: f64,

    /// Labor converted to gold
    pub labor_cost: f64,

    /// Reinitializations paid for
    pub reinit_cost: f64,
}

impl CostEstimate {
    pub const UNREACHABLE: Self = Self {
        material_cost: f64::INFINITY,
        craft_cost: f64::INFINITY,
        labor_cost: f64::INFINITY,
        reinit_cost: f64::INFINITY,
    };

    pub fn total(&self) -> f64 {
        self.material_cost + self.craft_cost + self.labor_cost + self.reinit_cost
    }

    pub fn is_reachable(&self) -> bool {
        self.total().is_finite()
    }
}

/// Cheapest way found to fill one slot of a given willpower cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCostOption {
    /// Gem to craft
    pub target: TargetSpec,

    /// Base material to craft it from
    pub material: MaterialId,

    /// Marketplace name of the material
    pub material_name: String,

    /// Willpower the finished gem consumes
    pub willpower_cost: u32,

    /// Sum of the breakdown
    pub total_cost: f64,

    pub breakdown: CostEstimate,
}

// ============= Assignment Results =============

/// What is left of a core after the held gems were socketed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreLeftover {
    /// Display label, e.g. "Ancient Order"
    pub core: String,

    /// Position of the core in the request
    pub position: usize,

    pub grade: CoreGrade,
    pub category: CoreCategory,
    pub remaining_willpower: u32,
    pub remaining_slots: u32,

    /// Names of the held gems socketed into this core
    pub assigned_gems: Vec<String>,
}

// ============= Strategy Results =============

/// One fully priced scenario for a core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioChoice {
    /// Willpower cost per remaining slot
    pub scenario: Vec<u32>,

    pub total_cost: f64,

    /// Chosen option per scenario value, in scenario order
    pub slots: Vec<SlotCostOption>,
}

/// Cheapest scenario found for one core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreStrategy {
    pub core: String,
    pub position: usize,
    pub remaining_willpower: u32,
    pub remaining_slots: u32,
    pub best: ScenarioChoice,
}

/// Strategy for all cores of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStrategy {
    pub category: CoreCategory,

    /// Assignment result the strategy was built on
    pub leftovers: Vec<CoreLeftover>,

    /// Sum of the chosen scenario costs
    pub total_cost: f64,

    pub cores: Vec<CoreStrategy>,

    /// Cores with open slots for which no scenario was reachable
    pub unresolved_cores: Vec<String>,
}

/// Output of the Optimize operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub total_cost: f64,
    pub categories: Vec<CategoryStrategy>,
    pub computed_at: DateTime<Utc>,
}

/// Progress update emitted while an optimization runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 0-100
    pub percent: u8,
    pub message: String,
}
