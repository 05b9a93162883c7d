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

pub mod assignment;
pub mod cache;
pub mod config;
pub mod cost;
pub mod crafting;
pub mod error;
pub mod partition;
pub mod planner;
pub mod policy;
pub mod pricing;
pub mod service;

// Re-export main types
pub use assignment::{AssignmentSolver, CoreSlot, build_cores};
pub use cache::{CacheStore, MemoryCache, NoCache, slot_cost_key};
pub use config::OptimizerConfig;
pub use cost::{CostOptimizer, LifecycleOutcome, LifecycleParams, simulate_lifecycle, summarize};
pub use crafting::{CraftingSimulator, GemState, Targets};
pub use error::{AssignmentError, CacheError, ConfigError, OptimizeError, PolicyError, Result};
pub use partition::{PartitionGenerator, Scenario, generate_scenarios};
pub use planner::{MarketSlotCosts, SlotCostSource, StrategyPlanner};
pub use policy::{
    AlwaysAccept, Observation, PolicyAction, PolicyProvider, PolicyRegistry, QNetworkPolicy,
};
pub use pricing::{PriceProvider, PriceTable};
pub use service::{OptimizeService, assign_category};
