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

//! Backtracking placement of owned gems into cores.
//!
//! Every owned gem must land in a core of its category. Among all placements
//! that leave each core enough willpower to fill its open slots with the
//! cheapest gems, the solver keeps the one with the most total leftover
//! willpower, breaking ties by the lowest population variance of the
//! leftovers.

use crate::error::AssignmentError;
use gemforge_types::{
    CoreCategory, CoreGrade, CoreLeftover, GemKind, HeldGem, MIN_GEM_COST, SLOTS_PER_CORE,
};
use std::collections::HashSet;
use tracing::debug;

/// A core being filled during the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSlot {
    pub position: usize,
    pub grade: CoreGrade,
    pub category: CoreCategory,
    pub remaining_willpower: u32,
    pub remaining_slots: u32,
    /// Indices into the solver's sorted gem list
    assigned: Vec<usize>,
}

impl CoreSlot {
    pub fn new(position: usize, category: CoreCategory, grade: CoreGrade) -> Self {
        Self {
            position,
            grade,
            category,
            remaining_willpower: grade.willpower(),
            remaining_slots: SLOTS_PER_CORE,
            assigned: Vec::new(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.grade, self.category)
    }

    fn accepts(&self, gem: &OwnedGem) -> bool {
        gem.kind.category() == self.category
            && self.remaining_slots > 0
            && self.remaining_willpower >= gem.cost
    }

    /// Cores with equal signatures lead to identical subtrees
    fn signature(&self) -> (CoreGrade, CoreCategory, u32, u32) {
        (
            self.grade,
            self.category,
            self.remaining_willpower,
            self.remaining_slots,
        )
    }

    /// Enough willpower left to fill every open slot with the cheapest gem
    fn is_viable(&self) -> bool {
        self.remaining_willpower >= self.remaining_slots * MIN_GEM_COST
    }
}

#[derive(Debug, Clone)]
struct OwnedGem {
    name: String,
    kind: GemKind,
    cost: u32,
}

/// Gem temporarily socketed into a core; removed again on drop
struct Placement<'c> {
    cores: &'c mut [CoreSlot],
    position: usize,
    cost: u32,
}

impl<'c> Placement<'c> {
    fn new(cores: &'c mut [CoreSlot], position: usize, gem_index: usize, cost: u32) -> Self {
        let core = &mut cores[position];
        core.remaining_slots -= 1;
        core.remaining_willpower -= cost;
        core.assigned.push(gem_index);
        Self {
            cores,
            position,
            cost,
        }
    }

    fn cores(&mut self) -> &mut [CoreSlot] {
        &mut *self.cores
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        let core = &mut self.cores[self.position];
        core.assigned.pop();
        core.remaining_willpower += self.cost;
        core.remaining_slots += 1;
    }
}

#[derive(Debug)]
struct Best {
    cores: Vec<CoreSlot>,
    total: u32,
    variance: f64,
}

fn population_variance(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n
}

#[derive(Debug)]
pub struct AssignmentSolver {
    gems: Vec<OwnedGem>,
    best: Option<Best>,
    leaves: u64,
}

impl AssignmentSolver {
    /// Prepare a search over `gems`, most expensive first
    pub fn new(gems: &[HeldGem]) -> Result<Self, AssignmentError> {
        let mut owned = gems
            .iter()
            .map(|gem| {
                let kind = gem.kind().ok_or_else(|| AssignmentError::UnknownGem {
                    name: gem.name.clone(),
                })?;
                Ok(OwnedGem {
                    name: gem.name.clone(),
                    kind,
                    cost: kind.willpower_cost(gem.efficiency),
                })
            })
            .collect::<Result<Vec<_>, AssignmentError>>()?;
        owned.sort_by(|a, b| b.cost.cmp(&a.cost));

        Ok(Self {
            gems: owned,
            best: None,
            leaves: 0,
        })
    }

    /// Find the best placement into `cores` and report what is left of each
    /// core, ordered by grade then category (descending)
    pub fn solve(mut self, mut cores: Vec<CoreSlot>) -> Result<Vec<CoreLeftover>, AssignmentError> {
        let core_count = cores.len();
        self.backtrack(0, &mut cores);

        debug!(
            "Assignment search visited {} complete placements of {} gems",
            self.leaves,
            self.gems.len()
        );

        let Some(best) = self.best else {
            return Err(AssignmentError::NoValidPlacement {
                gems: self.gems.len(),
                cores: core_count,
            });
        };

        let mut leftovers: Vec<CoreLeftover> = best
            .cores
            .iter()
            .map(|core| CoreLeftover {
                core: core.label(),
                position: core.position,
                grade: core.grade,
                category: core.category,
                remaining_willpower: core.remaining_willpower,
                remaining_slots: core.remaining_slots,
                assigned_gems: core
                    .assigned
                    .iter()
                    .map(|&index| self.gems[index].name.clone())
                    .collect(),
            })
            .collect();
        leftovers.sort_by(|a, b| {
            (b.grade, b.category)
                .cmp(&(a.grade, a.category))
                .then(a.position.cmp(&b.position))
        });
        Ok(leftovers)
    }

    fn backtrack(&mut self, index: usize, cores: &mut [CoreSlot]) {
        let Some(gem) = self.gems.get(index) else {
            self.evaluate(cores);
            return;
        };
        let cost = gem.cost;

        let mut tried = HashSet::new();
        for position in 0..cores.len() {
            let core = &cores[position];
            if !core.accepts(&self.gems[index]) || !tried.insert(core.signature()) {
                continue;
            }

            let mut placement = Placement::new(cores, position, index, cost);
            self.backtrack(index + 1, placement.cores());
        }
    }

    fn evaluate(&mut self, cores: &[CoreSlot]) {
        self.leaves += 1;
        if !cores.iter().all(CoreSlot::is_viable) {
            return;
        }

        let leftovers: Vec<u32> = cores.iter().map(|core| core.remaining_willpower).collect();
        let total: u32 = leftovers.iter().sum();
        let variance = population_variance(&leftovers);

        let better = match &self.best {
            None => true,
            Some(best) => total > best.total || (total == best.total && variance < best.variance),
        };
        if better {
            self.best = Some(Best {
                cores: cores.to_vec(),
                total,
                variance,
            });
        }
    }
}

/// Cores of one category in request order
pub fn build_cores(category: CoreCategory, grades: &[CoreGrade]) -> Vec<CoreSlot> {
    grades
        .iter()
        .enumerate()
        .map(|(position, &grade)| CoreSlot::new(position, category, grade))
        .collect()
}
