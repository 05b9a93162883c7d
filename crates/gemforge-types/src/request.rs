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

use crate::gem::{CoreCategory, CoreGrade, GemKind, MAX_POINT, MIN_POINT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const MIN_SIMULATIONS_PER_GEM: u32 = 50;
pub const MAX_SIMULATIONS_PER_GEM: u32 = 1000;

/// Rejections raised at the request boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no cores requested")]
    NoCores,

    #[error("held gem #{index} has an empty name")]
    EmptyGemName { index: usize },

    #[error("held gem '{name}' does not name a known gem kind")]
    UnknownGemKind { name: String },

    #[error("held gem '{name}': {field} {value} is outside {min}..={max}", min = MIN_POINT, max = MAX_POINT)]
    PointOutOfRange {
        name: String,
        field: &'static str,
        value: u8,
    },

    #[error(
        "simulations per gem {0} is outside {min}..={max}",
        min = MIN_SIMULATIONS_PER_GEM,
        max = MAX_SIMULATIONS_PER_GEM
    )]
    SimulationsOutOfRange(u32),

    #[error("reference price must be positive")]
    ZeroReferencePrice,
}

/// A gem the player already owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldGem {
    /// Free-form name; must mention the gem kind
    pub name: String,
    pub core_point: u8,
    pub efficiency: u8,
}

impl HeldGem {
    pub fn new(name: impl Into<String>, core_point: u8, efficiency: u8) -> Self {
        Self {
            name: name.into(),
            core_point,
            efficiency,
        }
    }

    pub fn kind(&self) -> Option<GemKind> {
        GemKind::from_name(&self.name)
    }

    /// Willpower this gem consumes once socketed
    pub fn willpower_cost(&self) -> Option<u32> {
        self.kind().map(|kind| kind.willpower_cost(self.efficiency))
    }
}

fn default_simulations() -> u32 {
    100
}

/// Input of the Optimize operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Core grades to fill, grouped by category
    pub cores: BTreeMap<CoreCategory, Vec<CoreGrade>>,

    /// Gems already owned; each must end up in a core of its category
    #[serde(default)]
    pub held_gems: Vec<HeldGem>,

    /// Base simulation count per cost estimate
    #[serde(default = "default_simulations")]
    pub simulations_per_gem: u32,

    /// Price of the reference material (100 crystals). Doubles as the
    /// reinitialization price and converts labor units into gold.
    pub reference_price: u64,
}

impl OptimizeRequest {
    /// Reject malformed input before it reaches the engine
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cores.values().all(Vec::is_empty) {
            return Err(ValidationError::NoCores);
        }

        for (index, gem) in self.held_gems.iter().enumerate() {
            if gem.name.trim().is_empty() {
                return Err(ValidationError::EmptyGemName { index });
            }
            if gem.kind().is_none() {
                return Err(ValidationError::UnknownGemKind {
                    name: gem.name.clone(),
                });
            }
            for (field, value) in [("core point", gem.core_point), ("efficiency", gem.efficiency)] {
                if !(MIN_POINT..=MAX_POINT).contains(&value) {
                    return Err(ValidationError::PointOutOfRange {
                        name: gem.name.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        if !(MIN_SIMULATIONS_PER_GEM..=MAX_SIMULATIONS_PER_GEM).contains(&self.simulations_per_gem)
        {
            return Err(ValidationError::SimulationsOutOfRange(
                self.simulations_per_gem,
            ));
        }

        if self.reference_price == 0 {
            return Err(ValidationError::ZeroReferencePrice);
        }

        Ok(())
    }

    /// Core grades requested for one category (empty when none)
    pub fn cores_for(&self, category: CoreCategory) -> &[CoreGrade] {
        self.cores
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Held gems whose kind belongs to `category`
    pub fn gems_for(&self, category: CoreCategory) -> Vec<HeldGem> {
        self.held_gems
            .iter()
            .filter(|gem| gem.kind().is_some_and(|kind| kind.category() == category))
            .cloned()
            .collect()
    }

    pub fn total_cores(&self) -> usize {
        self.cores.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OptimizeRequest {
        OptimizeRequest {
            cores: BTreeMap::from([(CoreCategory::Order, vec![CoreGrade::Ancient])]),
            held_gems: vec![HeldGem::new("Order Gem: Solidity", 5, 4)],
            simulations_per_gem: 100,
            reference_price: 90,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_out_of_range_points() {
        let mut req = request();
        req.held_gems[0].efficiency = 6;
        assert!(matches!(
            req.validate(),
            Err(ValidationError::PointOutOfRange {
                field: "efficiency",
                value: 6,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_and_empty_names() {
        let mut req = request();
        req.held_gems[0].name = "   ".to_owned();
        assert_eq!(
            req.validate(),
            Err(ValidationError::EmptyGemName { index: 0 })
        );

        req.held_gems[0].name = "Shiny rock".to_owned();
        assert!(matches!(
            req.validate(),
            Err(ValidationError::UnknownGemKind { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_simulations_and_price() {
        let mut req = request();
        req.simulations_per_gem = 10;
        assert_eq!(
            req.validate(),
            Err(ValidationError::SimulationsOutOfRange(10))
        );

        let mut req = request();
        req.reference_price = 0;
        assert_eq!(req.validate(), Err(ValidationError::ZeroReferencePrice));
    }

    #[test]
    fn test_gems_grouped_by_category() {
        let mut req = request();
        req.held_gems.push(HeldGem::new("Chaos Gem: Erosion", 5, 5));
        assert_eq!(req.gems_for(CoreCategory::Order).len(), 1);
        assert_eq!(req.gems_for(CoreCategory::Chaos).len(), 1);
        assert!(req.cores_for(CoreCategory::Chaos).is_empty());
    }

    #[test]
    fn test_request_from_toml() {
        let req: OptimizeRequest = toml::from_str(
            r#"
reference_price = 95

[cores]
order = ["ancient", "relic"]
chaos = ["relic"]

[[held_gems]]
name = "Chaos Gem: Collapse"
core_point = 4
efficiency = 5
"#,
        )
        .unwrap();

        assert_eq!(req.simulations_per_gem, 100);
        assert_eq!(req.total_cores(), 3);
        assert_eq!(
            req.cores_for(CoreCategory::Order),
            &[CoreGrade::Ancient, CoreGrade::Relic]
        );
        assert_eq!(req.held_gems[0].willpower_cost(), Some(5));
    }
}
