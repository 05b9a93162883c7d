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

use crate::cost::CostOptimizer;
use crate::partition::PartitionGenerator;
use crate::pricing::PriceProvider;
use gemforge_types::{
    CategoryStrategy, CoreCategory, CoreLeftover, CoreStrategy, ScenarioChoice, SlotCostOption,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Where the planner gets the cheapest option for one slot cost
pub trait SlotCostSource {
    fn slot_cost(&self, slot_cost: u32, category: CoreCategory) -> Option<SlotCostOption>;
}

/// Slot costs from simulation against live market prices
#[derive(Clone, Copy)]
pub struct MarketSlotCosts<'a> {
    pub optimizer: &'a CostOptimizer,
    pub prices: &'a dyn PriceProvider,
    pub reference_price: u64,
    pub simulations: u32,
}

impl SlotCostSource for MarketSlotCosts<'_> {
    fn slot_cost(&self, slot_cost: u32, category: CoreCategory) -> Option<SlotCostOption> {
        self.optimizer.min_cost_for_slot(
            slot_cost,
            category,
            self.prices,
            self.reference_price,
            self.simulations,
        )
    }
}

impl std::fmt::Debug for MarketSlotCosts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketSlotCosts")
            .field("reference_price", &self.reference_price)
            .field("simulations", &self.simulations)
            .finish_non_exhaustive()
    }
}

/// Chooses the cheapest scenario for every core with open slots
#[derive(Debug)]
pub struct StrategyPlanner<S> {
    source: S,
    partitions: PartitionGenerator,
}

impl<S: SlotCostSource> StrategyPlanner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            partitions: PartitionGenerator::new(),
        }
    }

    /// Plan every core of one category after assignment
    pub fn plan_category(
        &mut self,
        category: CoreCategory,
        leftovers: Vec<CoreLeftover>,
    ) -> CategoryStrategy {
        info!("Planning {} {} cores", leftovers.len(), category);
        let mut slot_costs = HashMap::new();
        let mut cores = Vec::new();
        let mut unresolved_cores = Vec::new();

        for leftover in &leftovers {
            if leftover.remaining_slots == 0 {
                debug!("  {} is full, nothing to craft", leftover.core);
                continue;
            }
            match self.plan_core(category, leftover, &mut slot_costs) {
                Some(strategy) => cores.push(strategy),
                None => {
                    warn!(
                        "  No reachable scenario for {} ({} willpower over {} slots)",
                        leftover.core, leftover.remaining_willpower, leftover.remaining_slots
                    );
                    unresolved_cores.push(leftover.core.clone());
                }
            }
        }

        let total_cost = cores.iter().map(|core| core.best.total_cost).sum();
        CategoryStrategy {
            category,
            leftovers,
            total_cost,
            cores,
            unresolved_cores,
        }
    }

    /// Cheapest fully reachable scenario for one core
    pub fn plan_core(
        &mut self,
        category: CoreCategory,
        leftover: &CoreLeftover,
        slot_costs: &mut HashMap<u32, Option<SlotCostOption>>,
    ) -> Option<CoreStrategy> {
        let scenarios = self
            .partitions
            .generate(leftover.remaining_willpower, leftover.remaining_slots);
        debug!(
            "  {}: {} scenarios for {} willpower over {} slots",
            leftover.core,
            scenarios.len(),
            leftover.remaining_willpower,
            leftover.remaining_slots
        );

        let mut best: Option<ScenarioChoice> = None;
        'scenarios: for scenario in scenarios {
            let mut slots = Vec::with_capacity(scenario.len());
            for &cost in &scenario {
                let option = slot_costs
                    .entry(cost)
                    .or_insert_with(|| self.source.slot_cost(cost, category));
                let Some(option) = option else {
                    debug!("    {:?} skipped: slot cost {} unreachable", scenario, cost);
                    continue 'scenarios;
                };
                slots.push(option.clone());
            }

            let total_cost: f64 = slots.iter().map(|slot| slot.total_cost).sum();
            debug!("    {:?} costs {:.0}", scenario, total_cost);
            if best
                .as_ref()
                .is_none_or(|current| total_cost < current.total_cost)
            {
                best = Some(ScenarioChoice {
                    scenario,
                    total_cost,
                    slots,
                });
            }
        }

        let best = best?;
        info!(
            "  {}: best scenario {:?} at {:.0}",
            leftover.core, best.scenario, best.total_cost
        );
        Some(CoreStrategy {
            core: leftover.core.clone(),
            position: leftover.position,
            remaining_willpower: leftover.remaining_willpower,
            remaining_slots: leftover.remaining_slots,
            best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemforge_types::{
        CoreGrade, CostEstimate, GemKind, MaterialGrade, MaterialId, TargetSpec,
    };
    use std::cell::RefCell;

    /// Fixed price per slot cost; slot costs absent from the map are unreachable
    struct StubCosts {
        totals: HashMap<u32, f64>,
        calls: RefCell<Vec<u32>>,
    }

    impl StubCosts {
        fn new(totals: &[(u32, f64)]) -> Self {
            Self {
                totals: totals.iter().copied().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SlotCostSource for &StubCosts {
        fn slot_cost(&self, slot_cost: u32, _category: CoreCategory) -> Option<SlotCostOption> {
            self.calls.borrow_mut().push(slot_cost);
            let total = *self.totals.get(&slot_cost)?;
            Some(SlotCostOption {
                target: TargetSpec::new(GemKind::Stability, 5, 3),
                material: MaterialId::new(GemKind::Stability, MaterialGrade::Heroic),
                material_name: "Heroic Order Gem: Stability".to_owned(),
                willpower_cost: slot_cost,
                total_cost: total,
                breakdown: CostEstimate {
                    material_cost: total,
                    craft_cost: 0.0,
                    labor_cost: 0.0,
                    reinit_cost: 0.0,
                },
            })
        }
    }

    fn leftover(remaining_willpower: u32, remaining_slots: u32) -> CoreLeftover {
        CoreLeftover {
            core: "Relic Order".to_owned(),
            position: 0,
            grade: CoreGrade::Relic,
            category: CoreCategory::Order,
            remaining_willpower,
            remaining_slots,
            assigned_gems: Vec::new(),
        }
    }

    #[test]
    fn test_skips_scenarios_with_unreachable_slots() {
        let stub = StubCosts::new(&[(4, 5000.0), (5, 100.0)]);
        let mut planner = StrategyPlanner::new(&stub);
        let strategy = planner
            .plan_core(CoreCategory::Order, &leftover(8, 2), &mut HashMap::new())
            .unwrap();
        // [3, 5] would be cheaper but 3 is unreachable
        assert_eq!(strategy.best.scenario, vec![4, 4]);
        assert!((strategy.best.total_cost - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(strategy.best.slots.len(), 2);
    }

    #[test]
    fn test_picks_cheapest_scenario() {
        let stub = StubCosts::new(&[(3, 1000.0), (4, 5000.0), (5, 1000.0)]);
        let mut planner = StrategyPlanner::new(&stub);
        let strategy = planner
            .plan_core(CoreCategory::Order, &leftover(8, 2), &mut HashMap::new())
            .unwrap();
        assert_eq!(strategy.best.scenario, vec![3, 5]);
    }

    #[test]
    fn test_slot_costs_queried_once_per_category() {
        let stub = StubCosts::new(&[(3, 1.0), (4, 1.0), (5, 1.0), (6, 1.0), (7, 1.0)]);
        let mut planner = StrategyPlanner::new(&stub);
        let strategy =
            planner.plan_category(CoreCategory::Order, vec![leftover(15, 3), leftover(15, 3)]);
        assert_eq!(strategy.cores.len(), 2);

        let mut calls = stub.calls.borrow().clone();
        let queried = calls.len();
        calls.sort_unstable();
        calls.dedup();
        assert_eq!(calls.len(), queried);
    }

    #[test]
    fn test_full_and_unresolved_cores() {
        let stub = StubCosts::new(&[(5, 100.0)]);
        let mut planner = StrategyPlanner::new(&stub);
        let strategy = planner.plan_category(
            CoreCategory::Order,
            vec![leftover(0, 0), leftover(5, 1), leftover(8, 2)],
        );
        assert_eq!(strategy.leftovers.len(), 3);
        assert_eq!(strategy.cores.len(), 1);
        assert_eq!(strategy.unresolved_cores, vec!["Relic Order".to_owned()]);
        assert!((strategy.total_cost - 100.0).abs() < f64::EPSILON);
    }
}
