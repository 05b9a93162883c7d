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

//! Splits a core's leftover willpower into per-slot gem costs.

use gemforge_types::{MAX_GEM_COST, MIN_GEM_COST};
use std::collections::HashMap;

/// One way of spending a core's leftover willpower, one cost per slot
pub type Scenario = Vec<u32>;

/// Enumerates non-decreasing cost sequences that use the willpower exactly.
///
/// Sub-results are memoized by `(total, slots, min_value)`. The memo lives in
/// the generator and is cleared at the start of every [`generate`] call.
///
/// [`generate`]: PartitionGenerator::generate
#[derive(Debug, Default)]
pub struct PartitionGenerator {
    memo: HashMap<(u32, u32, u32), Vec<Scenario>>,
}

impl PartitionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All scenarios of `slots` costs in `MIN_GEM_COST..=MAX_GEM_COST`
    /// summing to `total`, each listed once in non-decreasing order
    pub fn generate(&mut self, total: u32, slots: u32) -> Vec<Scenario> {
        if slots == 0 {
            return if total == 0 { vec![Vec::new()] } else { Vec::new() };
        }

        self.memo.clear();

        let lowest = slots.saturating_mul(MIN_GEM_COST);
        let highest = slots.saturating_mul(MAX_GEM_COST);
        if !(lowest..=highest).contains(&total) {
            return Vec::new();
        }

        self.descend(total, slots, MIN_GEM_COST)
    }

    fn descend(&mut self, total: u32, slots: u32, min_value: u32) -> Vec<Scenario> {
        let key = (total, slots, min_value);
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }

        let result = if slots == 1 {
            if (min_value..=MAX_GEM_COST).contains(&total) {
                vec![vec![total]]
            } else {
                Vec::new()
            }
        } else {
            let mut result = Vec::new();
            let rest_slots = slots - 1;
            for value in min_value..=MAX_GEM_COST {
                let Some(rest) = total.checked_sub(value) else {
                    break;
                };
                // The rest must fill every remaining slot with at least `value`
                if rest < rest_slots * value {
                    break;
                }
                if rest > rest_slots * MAX_GEM_COST {
                    continue;
                }
                for tail in self.descend(rest, rest_slots, value) {
                    let mut scenario = Vec::with_capacity(slots as usize);
                    scenario.push(value);
                    scenario.extend(tail);
                    result.push(scenario);
                }
            }
            result
        };

        self.memo.insert(key, result.clone());
        result
    }
}

/// One-shot convenience over a fresh [`PartitionGenerator`]
pub fn generate_scenarios(total: u32, slots: u32) -> Vec<Scenario> {
    PartitionGenerator::new().generate(total, slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_slots_of_eight() {
        assert_eq!(generate_scenarios(8, 2), vec![vec![3, 5], vec![4, 4]]);
    }

    #[test]
    fn test_zero_slots() {
        assert_eq!(generate_scenarios(0, 0), vec![Vec::<u32>::new()]);
        assert!(generate_scenarios(5, 0).is_empty());
    }

    #[test]
    fn test_out_of_bounds_totals() {
        assert!(generate_scenarios(5, 2).is_empty());
        assert!(generate_scenarios(19, 2).is_empty());
        assert!(generate_scenarios(2, 1).is_empty());
        assert_eq!(generate_scenarios(9, 1), vec![vec![9]]);
    }

    #[test]
    fn test_boundary_totals() {
        assert_eq!(generate_scenarios(12, 4), vec![vec![3, 3, 3, 3]]);
        assert_eq!(generate_scenarios(36, 4), vec![vec![9, 9, 9, 9]]);
    }

    #[test]
    fn test_ancient_core_scenarios() {
        let scenarios = generate_scenarios(17, 4);
        assert!(!scenarios.is_empty());
        for scenario in &scenarios {
            assert_eq!(scenario.len(), 4);
            assert_eq!(scenario.iter().sum::<u32>(), 17);
            assert!(scenario.windows(2).all(|pair| pair[0] <= pair[1]));
        }
        assert!(scenarios.contains(&vec![3, 3, 3, 8]));
        assert!(scenarios.contains(&vec![4, 4, 4, 5]));
    }

    #[test]
    fn test_generator_reuse_is_clean() {
        let mut generator = PartitionGenerator::new();
        let first = generator.generate(17, 4);
        let _ = generator.generate(10, 3);
        assert_eq!(generator.generate(17, 4), first);
    }
}
