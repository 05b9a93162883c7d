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

//! The Optimize operation: assignment, scenario planning and cost
//! estimation for every requested core.

use crate::assignment::{AssignmentSolver, build_cores};
use crate::cache::CacheStore;
use crate::config::OptimizerConfig;
use crate::cost::CostOptimizer;
use crate::error::{OptimizeError, Result};
use crate::planner::{MarketSlotCosts, StrategyPlanner};
use crate::policy::PolicyRegistry;
use crate::pricing::PriceProvider;
use chrono::Utc;
use gemforge_types::{
    CategoryStrategy, CoreCategory, CoreLeftover, OptimizeRequest, OptimizeResponse, Progress,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Place the request's owned gems of `category` into its cores
pub fn assign_category(
    request: &OptimizeRequest,
    category: CoreCategory,
) -> Result<Vec<CoreLeftover>> {
    let cores = build_cores(category, request.cores_for(category));
    let gems = request.gems_for(category);
    AssignmentSolver::new(&gems)
        .and_then(|solver| solver.solve(cores))
        .map_err(|source| OptimizeError::Infeasible { category, source })
}

pub struct OptimizeService {
    optimizer: CostOptimizer,
    prices: Arc<dyn PriceProvider>,
}

impl OptimizeService {
    pub fn new(
        config: OptimizerConfig,
        policies: PolicyRegistry,
        prices: Arc<dyn PriceProvider>,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            "Optimizer ready: {} policies, {} lifecycles minimum, seed {:?}",
            policies.len(),
            config.min_lifecycle_runs,
            config.seed
        );
        Ok(Self {
            optimizer: CostOptimizer::new(config, policies, cache),
            prices,
        })
    }

    pub fn optimizer(&self) -> &CostOptimizer {
        &self.optimizer
    }

    pub fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse> {
        self.optimize_with_progress(request, |_| {})
    }

    /// Run the Optimize operation, reporting progress after every stage
    pub fn optimize_with_progress<F>(
        &self,
        request: &OptimizeRequest,
        mut on_progress: F,
    ) -> Result<OptimizeResponse>
    where
        F: FnMut(Progress),
    {
        request.validate()?;

        let total_cores = request.total_cores();
        let mut processed_cores = 0;
        let mut report = |processed: usize, message: String| {
            let percent = (processed * 100 / total_cores.max(1)).min(100) as u8;
            on_progress(Progress { percent, message });
        };
        report(0, "Preparing optimization".to_owned());

        let mut categories = Vec::new();
        for category in CoreCategory::ALL {
            let grades = request.cores_for(category);
            if grades.is_empty() {
                continue;
            }

            report(
                processed_cores,
                format!("Checking {category} gem placement"),
            );
            let leftovers = assign_category(request, category)?;

            let strategy = if leftovers.iter().any(|core| core.remaining_slots > 0) {
                report(
                    processed_cores,
                    format!("Simulating {category} crafting strategies"),
                );
                let source = MarketSlotCosts {
                    optimizer: &self.optimizer,
                    prices: self.prices.as_ref(),
                    reference_price: request.reference_price,
                    simulations: request.simulations_per_gem,
                };
                StrategyPlanner::new(source).plan_category(category, leftovers)
            } else {
                info!("All {category} cores are full, nothing to craft");
                CategoryStrategy {
                    category,
                    leftovers,
                    total_cost: 0.0,
                    cores: Vec::new(),
                    unresolved_cores: Vec::new(),
                }
            };

            processed_cores += grades.len();
            report(processed_cores, format!("{category} cores planned"));
            categories.push(strategy);
        }

        let total_cost = categories.iter().map(|category| category.total_cost).sum();
        report(total_cores, "Optimization complete".to_owned());
        info!("Optimization complete: total cost {total_cost:.0}");

        Ok(OptimizeResponse {
            total_cost,
            categories,
            computed_at: Utc::now(),
        })
    }
}

impl fmt::Debug for OptimizeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizeService")
            .field("optimizer", &self.optimizer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoCache;
    use crate::error::AssignmentError;
    use crate::pricing::PriceTable;
    use gemforge_types::{CoreGrade, HeldGem, ValidationError};
    use std::collections::BTreeMap;

    fn service() -> OptimizeService {
        OptimizeService::new(
            OptimizerConfig {
                seed: Some(5),
                ..Default::default()
            },
            PolicyRegistry::with_baseline(),
            Arc::new(PriceTable::uniform(1000)),
            Arc::new(NoCache),
        )
        .unwrap()
    }

    fn request(held_gems: Vec<HeldGem>) -> OptimizeRequest {
        OptimizeRequest {
            cores: BTreeMap::from([(CoreCategory::Chaos, vec![CoreGrade::Relic])]),
            held_gems,
            simulations_per_gem: 50,
            reference_price: 90,
        }
    }

    #[test]
    fn test_rejects_invalid_request() {
        let mut req = request(Vec::new());
        req.simulations_per_gem = 5000;
        assert!(matches!(
            service().optimize(&req),
            Err(OptimizeError::Validation(
                ValidationError::SimulationsOutOfRange(5000)
            ))
        ));
    }

    #[test]
    fn test_infeasible_category_aborts() {
        let gems = vec![
            HeldGem::new("Chaos Gem: Erosion", 5, 3),
            HeldGem::new("Chaos Gem: Erosion", 5, 3),
            HeldGem::new("Chaos Gem: Erosion", 5, 3),
        ];
        let err = service().optimize(&request(gems)).unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::Infeasible {
                category: CoreCategory::Chaos,
                source: AssignmentError::NoValidPlacement { .. },
            }
        ));
    }

    #[test]
    fn test_full_core_needs_no_crafting() {
        // Four gems of cost 3, 4, 4, 4 fill a Relic core exactly
        let gems = vec![
            HeldGem::new("Chaos Gem: Erosion", 5, 5),
            HeldGem::new("Chaos Gem: Erosion", 5, 4),
            HeldGem::new("Chaos Gem: Distortion", 5, 5),
            HeldGem::new("Chaos Gem: Distortion", 5, 5),
        ];
        let mut updates = Vec::new();
        let response = service()
            .optimize_with_progress(&request(gems), |progress| updates.push(progress))
            .unwrap();

        assert!(response.total_cost.abs() < f64::EPSILON);
        assert_eq!(response.categories.len(), 1);
        let chaos = &response.categories[0];
        assert!(chaos.cores.is_empty());
        assert_eq!(chaos.leftovers[0].remaining_slots, 0);
        assert_eq!(chaos.leftovers[0].remaining_willpower, 0);

        assert_eq!(updates.first().map(|p| p.percent), Some(0));
        assert_eq!(updates.last().map(|p| p.percent), Some(100));
        assert!(updates.windows(2).all(|pair| pair[0].percent <= pair[1].percent));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = OptimizeService::new(
            OptimizerConfig {
                craft_cost_per_attempt: 0.0,
                ..Default::default()
            },
            PolicyRegistry::new(),
            Arc::new(PriceTable::new()),
            Arc::new(NoCache),
        );
        assert!(matches!(result, Err(OptimizeError::Config(_))));
    }
}
