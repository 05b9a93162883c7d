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

use serde::{Deserialize, Serialize};
use std::fmt;

// ============= Game Constants =============

/// Cheapest willpower a single gem can consume
pub const MIN_GEM_COST: u32 = 3;

/// Most expensive willpower a single gem can consume
pub const MAX_GEM_COST: u32 = 9;

/// Every core has the same number of gem slots
pub const SLOTS_PER_CORE: u32 = 4;

/// Lowest attribute level of a gem
pub const MIN_POINT: u8 = 1;

/// Highest attribute level of a gem
pub const MAX_POINT: u8 = 5;

/// Crafted gems always aim for a maxed core point
pub const CRAFTED_CORE_POINT: u8 = 5;

/// Core family. A gem fits a core only when its kind belongs to the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreCategory {
    Order,
    Chaos,
}

impl CoreCategory {
    /// Categories in processing order
    pub const ALL: [Self; 2] = [Self::Order, Self::Chaos];

    pub fn name(self) -> &'static str {
        match self {
            Self::Order => "Order",
            Self::Chaos => "Chaos",
        }
    }

    /// Gem kinds that can be socketed into cores of this category
    pub fn kinds(self) -> [GemKind; 3] {
        match self {
            Self::Order => [GemKind::Stability, GemKind::Solidity, GemKind::Immutability],
            Self::Chaos => [GemKind::Erosion, GemKind::Distortion, GemKind::Collapse],
        }
    }
}

impl fmt::Display for CoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core grade, which fixes the willpower budget of the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreGrade {
    Relic,
    Ancient,
}

impl CoreGrade {
    /// Total willpower available to the gems of one core
    pub fn willpower(self) -> u32 {
        match self {
            Self::Relic => 15,
            Self::Ancient => 17,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Relic => "Relic",
            Self::Ancient => "Ancient",
        }
    }
}

impl fmt::Display for CoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gem kind. Determines the category and the base willpower cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemKind {
    Stability,
    Solidity,
    Immutability,
    Erosion,
    Distortion,
    Collapse,
}

impl GemKind {
    pub const ALL: [Self; 6] = [
        Self::Stability,
        Self::Solidity,
        Self::Immutability,
        Self::Erosion,
        Self::Distortion,
        Self::Collapse,
    ];

    pub fn category(self) -> CoreCategory {
        match self {
            Self::Stability | Self::Solidity | Self::Immutability => CoreCategory::Order,
            Self::Erosion | Self::Distortion | Self::Collapse => CoreCategory::Chaos,
        }
    }

    /// Willpower cost of the kind before the efficiency discount
    pub fn base_cost(self) -> u32 {
        match self {
            Self::Stability | Self::Erosion => 8,
            Self::Solidity | Self::Distortion => 9,
            Self::Immutability | Self::Collapse => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stability => "Stability",
            Self::Solidity => "Solidity",
            Self::Immutability => "Immutability",
            Self::Erosion => "Erosion",
            Self::Distortion => "Distortion",
            Self::Collapse => "Collapse",
        }
    }

    /// In-game (Korean) name, as found in marketplace listings
    pub fn native_name(self) -> &'static str {
        match self {
            Self::Stability => "안정",
            Self::Solidity => "견고",
            Self::Immutability => "불변",
            Self::Erosion => "침식",
            Self::Distortion => "왜곡",
            Self::Collapse => "붕괴",
        }
    }

    /// Resolve the kind mentioned in a free-form gem name.
    ///
    /// Matches either the English kind name (case-insensitive) or the native name
    /// anywhere in the string, e.g. "Order Gem: Stability" or "질서의 젬 : 안정".
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::ALL.into_iter().find(|kind| {
            lowered.contains(&kind.name().to_lowercase()) || name.contains(kind.native_name())
        })
    }

    /// Willpower consumed by a gem of this kind at the given efficiency
    pub fn willpower_cost(self, efficiency: u8) -> u32 {
        self.base_cost().saturating_sub(u32::from(efficiency))
    }

    /// Efficiency a gem of this kind needs to consume exactly `cost` willpower
    pub fn efficiency_for_cost(self, cost: u32) -> Option<u8> {
        let efficiency = self.base_cost().checked_sub(cost)?;
        u8::try_from(efficiency)
            .ok()
            .filter(|e| (MIN_POINT..=MAX_POINT).contains(e))
    }
}

impl fmt::Display for GemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quality tier of the base material a new gem is crafted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialGrade {
    Advanced,
    Rare,
    Heroic,
}

impl MaterialGrade {
    /// Grades in evaluation order
    pub const ALL: [Self; 3] = [Self::Advanced, Self::Rare, Self::Heroic];

    /// Craft attempts a fresh gem of this grade starts with
    pub fn craft_count(self) -> u32 {
        match self {
            Self::Advanced => 5,
            Self::Rare => 7,
            Self::Heroic => 9,
        }
    }

    /// Rerolls a fresh gem of this grade starts with
    pub fn reroll_count(self) -> u32 {
        match self {
            Self::Advanced => 0,
            Self::Rare => 1,
            Self::Heroic => 2,
        }
    }

    /// Labor units spent to process one gem of this grade
    pub fn labor_units(self) -> u32 {
        match self {
            Self::Advanced => 3,
            Self::Rare => 6,
            Self::Heroic => 12,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Advanced => "Advanced",
            Self::Rare => "Rare",
            Self::Heroic => "Heroic",
        }
    }
}

impl fmt::Display for MaterialGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A purchasable base material: one gem kind at one quality grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId {
    pub kind: GemKind,
    pub grade: MaterialGrade,
}

impl MaterialId {
    pub fn new(kind: GemKind, grade: MaterialGrade) -> Self {
        Self { kind, grade }
    }

    /// Name under which the marketplace lists this material,
    /// e.g. "Rare Order Gem: Stability"
    pub fn display_name(&self) -> String {
        format!(
            "{} {} Gem: {}",
            self.grade,
            self.kind.category(),
            self.kind
        )
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Key under which decision policies are registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyKey {
    pub core_point: u8,
    pub efficiency: u8,
}

impl PolicyKey {
    pub fn new(core_point: u8, efficiency: u8) -> Self {
        Self {
            core_point,
            efficiency,
        }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}_e{}", self.core_point, self.efficiency)
    }
}

/// The gem a crafting run tries to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    pub kind: GemKind,
    pub core_point: u8,
    pub efficiency: u8,
}

impl TargetSpec {
    pub fn new(kind: GemKind, core_point: u8, efficiency: u8) -> Self {
        Self {
            kind,
            core_point,
            efficiency,
        }
    }

    pub fn policy_key(&self) -> PolicyKey {
        PolicyKey::new(self.core_point, self.efficiency)
    }

    /// Willpower the finished gem will consume
    pub fn willpower_cost(&self) -> u32 {
        self.kind.willpower_cost(self.efficiency)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.kind, self.core_point, self.efficiency)
    }
}
