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

//! Monte Carlo estimate of what it costs to craft a gem for one slot.

use crate::cache::{CacheStore, slot_cost_key};
use crate::config::OptimizerConfig;
use crate::crafting::{CraftingSimulator, Targets};
use crate::error::CacheError;
use crate::policy::{Observation, PolicyAction, PolicyProvider, PolicyRegistry};
use crate::pricing::PriceProvider;
use gemforge_types::{
    CRAFTED_CORE_POINT, CoreCategory, CostEstimate, MIN_POINT, MaterialGrade, MaterialId,
    SlotCostOption, TargetSpec,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Success rates below this count as zero
const MIN_SUCCESS_RATE: f64 = 1e-9;

/// Prices and goal driving one simulated gem lifecycle
#[derive(Debug, Clone, Copy)]
pub struct LifecycleParams {
    pub grade: MaterialGrade,
    pub targets: Targets,
    pub material_price: f64,
    pub labor_value: f64,
    pub reinit_price: f64,
    /// Gold per craft attempt before the cost modifier
    pub craft_cost: f64,
}

impl LifecycleParams {
    /// Restarting is worth it when cheaper than a new material plus its labor
    pub fn reinit_pays_off(&self) -> bool {
        self.reinit_price < self.material_price + self.labor_value
    }
}

/// Result of crafting one base material until success or exhaustion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LifecycleOutcome {
    pub success: bool,
    pub craft_cost: f64,
    pub reinit_cost: f64,
    pub reinits: u32,
}

/// Craft one fresh gem of `params.grade` towards `params.targets`.
///
/// Before each attempt the policy may spend a reroll; the attempt then draws
/// a craft menu and takes one of its options at random. When efficiency or
/// core point has just dropped to 1 and restarting pays off, the gem is
/// reinitialized instead. Gems that can no longer reach the target stop early.
pub fn simulate_lifecycle<R: Rng + ?Sized>(
    params: &LifecycleParams,
    policy: &dyn PolicyProvider,
    rng: &mut R,
) -> LifecycleOutcome {
    let mut sim = CraftingSimulator::new(params.grade);
    let mut outcome = LifecycleOutcome::default();
    let reinit_pays_off = params.reinit_pays_off();
    let mut dropped_to_floor = false;

    while sim.state().remaining_crafts > 0 {
        if sim.is_target_reached(&params.targets) {
            outcome.success = true;
            return outcome;
        }
        if !sim.is_possible_to_reach(&params.targets) {
            break;
        }

        if dropped_to_floor && reinit_pays_off {
            sim.reinitialize();
            outcome.reinit_cost += params.reinit_price;
            outcome.reinits += 1;
            dropped_to_floor = false;
            continue;
        }

        if policy.decide(&Observation::from(sim.state())) == PolicyAction::Reroll {
            sim.spend_reroll();
        }

        let menu = sim.generate_craft_options(rng);
        let Some(&option) = menu.choose(rng) else {
            sim.spend_craft();
            continue;
        };

        let before = *sim.state();
        sim.apply_craft_option(option);
        let after = sim.state();
        outcome.craft_cost += params.craft_cost * after.cost_modifier.factor();

        dropped_to_floor = (before.efficiency > MIN_POINT && after.efficiency == MIN_POINT)
            || (before.core_point > MIN_POINT && after.core_point == MIN_POINT);
    }

    outcome.success = sim.is_target_reached(&params.targets);
    outcome
}

/// Expected cost per finished gem from a batch of lifecycles.
///
/// Each lifecycle consumes one material and its labor; craft and reinit
/// costs are averaged over all lifecycles. Every component is scaled by the
/// expected number of lifecycles per success and rounded down to whole gold.
pub fn summarize(
    outcomes: &[LifecycleOutcome],
    material_price: f64,
    labor_value: f64,
) -> CostEstimate {
    if outcomes.is_empty() {
        return CostEstimate::UNREACHABLE;
    }

    let runs = outcomes.len() as f64;
    let successes = outcomes.iter().filter(|outcome| outcome.success).count() as f64;
    let success_rate = successes / runs;
    if success_rate < MIN_SUCCESS_RATE {
        return CostEstimate::UNREACHABLE;
    }

    let expected_attempts = 1.0 / success_rate;
    let mean_craft = outcomes.iter().map(|outcome| outcome.craft_cost).sum::<f64>() / runs;
    let mean_reinit = outcomes.iter().map(|outcome| outcome.reinit_cost).sum::<f64>() / runs;

    CostEstimate {
        material_cost: (expected_attempts * material_price).floor(),
        craft_cost: (expected_attempts * mean_craft).floor(),
        labor_cost: (expected_attempts * labor_value).floor(),
        reinit_cost: (expected_attempts * mean_reinit).floor(),
    }
}

/// Targets of `category` whose finished gem consumes exactly `slot_cost`
pub fn candidate_targets(slot_cost: u32, category: CoreCategory) -> Vec<TargetSpec> {
    category
        .kinds()
        .into_iter()
        .filter_map(|kind| {
            kind.efficiency_for_cost(slot_cost)
                .map(|efficiency| TargetSpec::new(kind, CRAFTED_CORE_POINT, efficiency))
        })
        .collect()
}

/// Picks the cheapest target and material for a slot cost
pub struct CostOptimizer {
    config: OptimizerConfig,
    policies: PolicyRegistry,
    cache: Arc<dyn CacheStore>,
}

impl CostOptimizer {
    pub fn new(
        config: OptimizerConfig,
        policies: PolicyRegistry,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            config,
            policies,
            cache,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    /// Simulate lifecycles of `target` crafted from `grade` material
    pub fn estimate_expected_cost(
        &self,
        target: TargetSpec,
        grade: MaterialGrade,
        material_price: u64,
        labor_value: f64,
        reinit_price: u64,
        simulations: u32,
    ) -> CostEstimate {
        let Some(policy) = self.policies.get(target.policy_key()) else {
            warn!(
                "No policy for target {} ({}), treating it as unreachable",
                target,
                target.policy_key()
            );
            return CostEstimate::UNREACHABLE;
        };

        let params = LifecycleParams {
            grade,
            targets: Targets::new(target.core_point, target.efficiency),
            material_price: material_price as f64,
            labor_value,
            reinit_price: reinit_price as f64,
            craft_cost: self.config.craft_cost_per_attempt,
        };
        let runs = self.config.lifecycle_runs(simulations);
        let base_seed = self.base_seed(target, grade);

        let outcomes: Vec<LifecycleOutcome> = (0..runs)
            .into_par_iter()
            .map(|run| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(u64::from(run)));
                simulate_lifecycle(&params, policy.as_ref(), &mut rng)
            })
            .collect();

        let estimate = summarize(&outcomes, params.material_price, labor_value);
        debug!(
            "  {} from {} material: {} runs, total {:.0} (material {:.0}, craft {:.0}, labor {:.0}, reinit {:.0})",
            target,
            grade,
            runs,
            estimate.total(),
            estimate.material_cost,
            estimate.craft_cost,
            estimate.labor_cost,
            estimate.reinit_cost
        );
        estimate
    }

    /// Cheapest reachable way to fill one slot of `slot_cost` willpower in a
    /// core of `category`, or `None` when nothing priced is reachable
    pub fn min_cost_for_slot(
        &self,
        slot_cost: u32,
        category: CoreCategory,
        prices: &dyn PriceProvider,
        reference_price: u64,
        simulations: u32,
    ) -> Option<SlotCostOption> {
        let key = slot_cost_key(slot_cost, category, simulations, reference_price);
        if let Some(cached) = self.cached(&key) {
            return Some(cached);
        }
        debug!("Cache miss for {key}, simulating");

        let mut best: Option<SlotCostOption> = None;
        for target in candidate_targets(slot_cost, category) {
            for grade in MaterialGrade::ALL {
                let material = MaterialId::new(target.kind, grade);
                let Some(material_price) = prices.material_price(material) else {
                    debug!("  No price for {material}, skipping");
                    continue;
                };

                let labor_value = self.config.labor_value(grade, reference_price);
                let breakdown = self.estimate_expected_cost(
                    target,
                    grade,
                    material_price,
                    labor_value,
                    reference_price,
                    simulations,
                );
                if !breakdown.is_reachable() {
                    continue;
                }

                let total_cost = breakdown.total();
                if best.as_ref().is_none_or(|current| total_cost < current.total_cost) {
                    best = Some(SlotCostOption {
                        target,
                        material,
                        material_name: material.display_name(),
                        willpower_cost: slot_cost,
                        total_cost,
                        breakdown,
                    });
                }
            }
        }

        match &best {
            Some(option) => {
                info!(
                    "Slot cost {} ({}): {} from {} at {:.0}",
                    slot_cost, category, option.target, option.material_name, option.total_cost
                );
                self.store(&key, option);
            }
            None => warn!("Slot cost {slot_cost} ({category}) is unreachable with the known prices and policies"),
        }
        best
    }

    fn base_seed(&self, target: TargetSpec, grade: MaterialGrade) -> u64 {
        match self.config.seed {
            Some(seed) => {
                let stream = ((target.kind as u64) << 16)
                    | (u64::from(target.efficiency) << 8)
                    | grade as u64;
                seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            }
            None => rand::random(),
        }
    }

    fn cached(&self, key: &str) -> Option<SlotCostOption> {
        match self.cache.get(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(option) => {
                    debug!("Cache hit for {key}");
                    Some(option)
                }
                Err(e) => {
                    warn!("Ignoring unreadable cache entry {key}: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read failed for {key}: {e}");
                None
            }
        }
    }

    fn store(&self, key: &str, option: &SlotCostOption) {
        let stored = serde_json::to_string(option)
            .map_err(CacheError::from)
            .and_then(|json| self.cache.set(key, &json, self.config.cache_ttl()));
        match stored {
            Ok(()) => info!("Stored {key} in cache"),
            Err(e) => warn!("Cache write failed for {key}: {e}"),
        }
    }
}

impl fmt::Debug for CostOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostOptimizer")
            .field("config", &self.config)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}
