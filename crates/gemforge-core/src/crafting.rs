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

//! Probabilistic state machine of a single gem being crafted.
//!
//! Each craft attempt draws a menu of up to four distinct options from a
//! weighted catalog and applies one of them. Attribute levels never leave
//! `1..=5` and the craft budget only ever shrinks.

use gemforge_types::{MAX_POINT, MIN_POINT, MaterialGrade};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Options offered per craft attempt
pub const MENU_SIZE: usize = 4;

/// Gem attribute that craft options can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Efficiency,
    CorePoint,
    Effect1,
    Effect2,
}

impl Attribute {
    pub const ALL: [Self; 4] = [
        Self::Efficiency,
        Self::CorePoint,
        Self::Effect1,
        Self::Effect2,
    ];
}

/// Multiplier applied to the gold price of the next craft attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostModifier {
    #[default]
    Normal,
    Raised,
}

impl CostModifier {
    pub fn factor(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Raised => 2.0,
        }
    }
}

/// Attribute levels and remaining budget of an in-progress gem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemState {
    pub efficiency: u8,
    pub core_point: u8,
    pub effect1: u8,
    pub effect2: u8,
    pub remaining_crafts: u32,
    pub remaining_rerolls: u32,
    pub cost_modifier: CostModifier,
}

impl GemState {
    /// Fresh gem straight from a base material of `grade`
    pub fn fresh(grade: MaterialGrade) -> Self {
        Self {
            efficiency: MIN_POINT,
            core_point: MIN_POINT,
            effect1: MIN_POINT,
            effect2: MIN_POINT,
            remaining_crafts: grade.craft_count(),
            remaining_rerolls: grade.reroll_count(),
            cost_modifier: CostModifier::Normal,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Efficiency => self.efficiency,
            Attribute::CorePoint => self.core_point,
            Attribute::Effect1 => self.effect1,
            Attribute::Effect2 => self.effect2,
        }
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut u8 {
        match attribute {
            Attribute::Efficiency => &mut self.efficiency,
            Attribute::CorePoint => &mut self.core_point,
            Attribute::Effect1 => &mut self.effect1,
            Attribute::Effect2 => &mut self.effect2,
        }
    }
}

/// Condition a craft option needs before it can appear on the menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eligibility {
    Always,
    /// Attribute strictly below the level
    Below(Attribute, u8),
    /// Attribute strictly above the level
    Above(Attribute, u8),
    /// Normal cost and more than one craft left
    CostNormal,
    /// Raised cost and more than one craft left
    CostRaised,
    /// More than one craft left
    CraftsLeft,
}

impl Eligibility {
    pub fn allows(self, state: &GemState) -> bool {
        match self {
            Self::Always => true,
            Self::Below(attribute, level) => state.get(attribute) < level,
            Self::Above(attribute, level) => state.get(attribute) > level,
            Self::CostNormal => {
                state.cost_modifier == CostModifier::Normal && state.remaining_crafts > 1
            }
            Self::CostRaised => {
                state.cost_modifier == CostModifier::Raised && state.remaining_crafts > 1
            }
            Self::CraftsLeft => state.remaining_crafts > 1,
        }
    }
}

/// What a craft option does to the gem
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CraftEffect {
    Adjust { attribute: Attribute, delta: i8 },
    ChangeEffect1,
    ChangeEffect2,
    RaiseCost,
    LowerCost,
    Maintain,
    AddRerolls(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftOption {
    pub effect: CraftEffect,
    /// Relative draw weight (percent in the game's tables)
    pub weight: f64,
    pub eligibility: Eligibility,
}

const fn adjust(attribute: Attribute, delta: i8, weight: f64, eligibility: Eligibility) -> CraftOption {
    CraftOption {
        effect: CraftEffect::Adjust { attribute, delta },
        weight,
        eligibility,
    }
}

const fn special(effect: CraftEffect, weight: f64, eligibility: Eligibility) -> CraftOption {
    CraftOption {
        effect,
        weight,
        eligibility,
    }
}

macro_rules! attribute_options {
    ($attribute:expr) => {
        [
            adjust($attribute, 1, 11.65, Eligibility::Below($attribute, 5)),
            adjust($attribute, 2, 4.40, Eligibility::Below($attribute, 4)),
            adjust($attribute, 3, 1.75, Eligibility::Below($attribute, 3)),
            adjust($attribute, 4, 0.45, Eligibility::Below($attribute, 2)),
            adjust($attribute, -1, 3.00, Eligibility::Above($attribute, 1)),
        ]
    };
}

const EFFICIENCY_OPTIONS: [CraftOption; 5] = attribute_options!(Attribute::Efficiency);
const CORE_POINT_OPTIONS: [CraftOption; 5] = attribute_options!(Attribute::CorePoint);
const EFFECT1_OPTIONS: [CraftOption; 5] = attribute_options!(Attribute::Effect1);
const EFFECT2_OPTIONS: [CraftOption; 5] = attribute_options!(Attribute::Effect2);

/// Every outcome a craft attempt can offer
pub static CRAFT_CATALOG: [CraftOption; 27] = [
    EFFICIENCY_OPTIONS[0],
    EFFICIENCY_OPTIONS[1],
    EFFICIENCY_OPTIONS[2],
    EFFICIENCY_OPTIONS[3],
    EFFICIENCY_OPTIONS[4],
    CORE_POINT_OPTIONS[0],
    CORE_POINT_OPTIONS[1],
    CORE_POINT_OPTIONS[2],
    CORE_POINT_OPTIONS[3],
    CORE_POINT_OPTIONS[4],
    EFFECT1_OPTIONS[0],
    EFFECT1_OPTIONS[1],
    EFFECT1_OPTIONS[2],
    EFFECT1_OPTIONS[3],
    EFFECT1_OPTIONS[4],
    EFFECT2_OPTIONS[0],
    EFFECT2_OPTIONS[1],
    EFFECT2_OPTIONS[2],
    EFFECT2_OPTIONS[3],
    EFFECT2_OPTIONS[4],
    special(CraftEffect::ChangeEffect1, 3.25, Eligibility::Always),
    special(CraftEffect::ChangeEffect2, 3.25, Eligibility::Always),
    special(CraftEffect::RaiseCost, 1.75, Eligibility::CostNormal),
    special(CraftEffect::LowerCost, 1.75, Eligibility::CostRaised),
    special(CraftEffect::Maintain, 1.75, Eligibility::Always),
    special(CraftEffect::AddRerolls(1), 2.50, Eligibility::CraftsLeft),
    special(CraftEffect::AddRerolls(2), 0.75, Eligibility::CraftsLeft),
];

/// Minimum attribute levels a finished gem must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub efficiency: u8,
    pub core_point: u8,
    pub effect1: u8,
    pub effect2: u8,
}

impl Targets {
    /// Target on core point and efficiency only; effects may stay at any level
    pub fn new(core_point: u8, efficiency: u8) -> Self {
        Self {
            efficiency,
            core_point,
            effect1: MIN_POINT,
            effect2: MIN_POINT,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Efficiency => self.efficiency,
            Attribute::CorePoint => self.core_point,
            Attribute::Effect1 => self.effect1,
            Attribute::Effect2 => self.effect2,
        }
    }
}

/// One gem going through repeated craft attempts
#[derive(Debug, Clone)]
pub struct CraftingSimulator {
    grade: MaterialGrade,
    state: GemState,
}

impl CraftingSimulator {
    pub fn new(grade: MaterialGrade) -> Self {
        Self {
            grade,
            state: GemState::fresh(grade),
        }
    }

    pub fn grade(&self) -> MaterialGrade {
        self.grade
    }

    pub fn state(&self) -> &GemState {
        &self.state
    }

    /// Draw the craft menu: up to [`MENU_SIZE`] distinct eligible options,
    /// weighted sampling without replacement.
    pub fn generate_craft_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&'static CraftOption> {
        let mut pool: Vec<&'static CraftOption> = CRAFT_CATALOG
            .iter()
            .filter(|option| option.eligibility.allows(&self.state))
            .collect();

        let mut menu = Vec::with_capacity(MENU_SIZE.min(pool.len()));
        while menu.len() < MENU_SIZE && !pool.is_empty() {
            let Ok(distribution) = WeightedIndex::new(pool.iter().map(|option| option.weight)) else {
                break;
            };
            let index = distribution.sample(rng);
            menu.push(pool.remove(index));
        }
        menu
    }

    /// Apply one craft outcome. Always spends one craft attempt.
    pub fn apply_craft_option(&mut self, option: &CraftOption) {
        match option.effect {
            CraftEffect::Adjust { attribute, delta } => {
                let slot = self.state.slot_mut(attribute);
                let level = (i16::from(*slot) + i16::from(delta))
                    .clamp(i16::from(MIN_POINT), i16::from(MAX_POINT));
                *slot = level as u8;
            }
            CraftEffect::AddRerolls(count) => self.state.remaining_rerolls += count,
            CraftEffect::RaiseCost => self.state.cost_modifier = CostModifier::Raised,
            CraftEffect::LowerCost => self.state.cost_modifier = CostModifier::Normal,
            CraftEffect::ChangeEffect1 | CraftEffect::ChangeEffect2 | CraftEffect::Maintain => {}
        }
        self.spend_craft();
    }

    /// Burn one craft attempt without any other effect
    pub fn spend_craft(&mut self) {
        self.state.remaining_crafts = self.state.remaining_crafts.saturating_sub(1);
    }

    /// Spend one reroll if any is left. Returns whether one was spent.
    pub fn spend_reroll(&mut self) -> bool {
        if self.state.remaining_rerolls == 0 {
            return false;
        }
        self.state.remaining_rerolls -= 1;
        true
    }

    /// Restart the attribute state, keeping the craft and reroll budget.
    /// The reinitialization itself costs one craft attempt.
    pub fn reinitialize(&mut self) {
        self.spend_craft();
        let remaining_crafts = self.state.remaining_crafts;
        let remaining_rerolls = self.state.remaining_rerolls;
        self.state = GemState {
            remaining_crafts,
            remaining_rerolls,
            ..GemState::fresh(self.grade)
        };
    }

    pub fn is_target_reached(&self, targets: &Targets) -> bool {
        Attribute::ALL
            .into_iter()
            .all(|attribute| self.state.get(attribute) >= targets.get(attribute))
    }

    /// Loose upper bound: every remaining craft could add at most 4 levels
    pub fn is_possible_to_reach(&self, targets: &Targets) -> bool {
        let needed: u32 = Attribute::ALL
            .into_iter()
            .map(|attribute| {
                u32::from(targets.get(attribute).saturating_sub(self.state.get(attribute)))
            })
            .sum();
        self.state.remaining_crafts.saturating_mul(4) >= needed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fresh_state_per_grade() {
        let sim = CraftingSimulator::new(MaterialGrade::Heroic);
        let state = sim.state();
        assert_eq!(state.efficiency, 1);
        assert_eq!(state.core_point, 1);
        assert_eq!(state.remaining_crafts, 9);
        assert_eq!(state.remaining_rerolls, 2);
        assert_eq!(state.cost_modifier, CostModifier::Normal);
    }

    #[test]
    fn test_catalog_weights() {
        let total: f64 = CRAFT_CATALOG.iter().map(|option| option.weight).sum();
        // 4 attributes * 21.25 + 2 * 3.25 + 3 * 1.75 + 2.5 + 0.75
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_menu_is_distinct_and_eligible() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sim = CraftingSimulator::new(MaterialGrade::Rare);

        for _ in 0..200 {
            let menu = sim.generate_craft_options(&mut rng);
            assert_eq!(menu.len(), MENU_SIZE);
            for (i, option) in menu.iter().enumerate() {
                assert!(option.eligibility.allows(sim.state()));
                for other in &menu[i + 1..] {
                    assert!(!std::ptr::eq(*option, *other));
                }
            }
            // A fresh gem can never be offered a decrease
            assert!(menu.iter().all(|option| !matches!(
                option.effect,
                CraftEffect::Adjust { delta: -1, .. }
            )));
        }
    }

    #[test]
    fn test_menu_reproducible_with_seed() {
        let sim = CraftingSimulator::new(MaterialGrade::Heroic);
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let left = sim.generate_craft_options(&mut a);
            let right = sim.generate_craft_options(&mut b);
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_apply_clamps_and_spends_craft() {
        let mut sim = CraftingSimulator::new(MaterialGrade::Heroic);
        let big = adjust(Attribute::Efficiency, 4, 1.0, Eligibility::Always);
        sim.apply_craft_option(&big);
        sim.apply_craft_option(&big);
        assert_eq!(sim.state().efficiency, 5);
        assert_eq!(sim.state().remaining_crafts, 7);

        let down = adjust(Attribute::CorePoint, -1, 1.0, Eligibility::Always);
        sim.apply_craft_option(&down);
        assert_eq!(sim.state().core_point, 1);
        assert_eq!(sim.state().remaining_crafts, 6);
    }

    #[test]
    fn test_special_effects() {
        let mut sim = CraftingSimulator::new(MaterialGrade::Advanced);
        sim.apply_craft_option(&special(CraftEffect::AddRerolls(2), 1.0, Eligibility::Always));
        assert_eq!(sim.state().remaining_rerolls, 2);
        sim.apply_craft_option(&special(CraftEffect::RaiseCost, 1.0, Eligibility::Always));
        assert_eq!(sim.state().cost_modifier, CostModifier::Raised);
        sim.apply_craft_option(&special(CraftEffect::LowerCost, 1.0, Eligibility::Always));
        assert_eq!(sim.state().cost_modifier, CostModifier::Normal);
        assert_eq!(sim.state().remaining_crafts, 2);
    }

    #[test]
    fn test_random_walk_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for grade in MaterialGrade::ALL {
            for _ in 0..100 {
                let mut sim = CraftingSimulator::new(grade);
                let mut last_crafts = sim.state().remaining_crafts;
                while sim.state().remaining_crafts > 0 {
                    let menu = sim.generate_craft_options(&mut rng);
                    let pick = rng.gen_range(0..menu.len());
                    sim.apply_craft_option(menu[pick]);

                    let state = sim.state();
                    for attribute in Attribute::ALL {
                        assert!((MIN_POINT..=MAX_POINT).contains(&state.get(attribute)));
                    }
                    assert!(state.remaining_crafts < last_crafts);
                    last_crafts = state.remaining_crafts;
                }
                // Spending past zero saturates
                sim.spend_craft();
                assert_eq!(sim.state().remaining_crafts, 0);
            }
        }
    }

    #[test]
    fn test_reinitialize_keeps_budget() {
        let mut sim = CraftingSimulator::new(MaterialGrade::Heroic);
        sim.apply_craft_option(&adjust(Attribute::Effect1, 3, 1.0, Eligibility::Always));
        sim.apply_craft_option(&special(CraftEffect::AddRerolls(1), 1.0, Eligibility::Always));
        sim.apply_craft_option(&special(CraftEffect::RaiseCost, 1.0, Eligibility::Always));
        sim.reinitialize();

        let state = sim.state();
        assert_eq!(state.effect1, 1);
        assert_eq!(state.remaining_crafts, 5);
        assert_eq!(state.remaining_rerolls, 3);
        assert_eq!(state.cost_modifier, CostModifier::Normal);
    }

    #[test]
    fn test_spend_reroll() {
        let mut sim = CraftingSimulator::new(MaterialGrade::Rare);
        assert!(sim.spend_reroll());
        assert!(!sim.spend_reroll());
        assert_eq!(sim.state().remaining_rerolls, 0);
    }

    #[test]
    fn test_target_checks() {
        let mut sim = CraftingSimulator::new(MaterialGrade::Advanced);
        let targets = Targets::new(5, 5);
        assert!(!sim.is_target_reached(&targets));
        // 8 levels needed, 5 crafts can add up to 20
        assert!(sim.is_possible_to_reach(&targets));

        for _ in 0..3 {
            sim.spend_craft();
        }
        // 2 crafts left can add up to 8
        assert!(sim.is_possible_to_reach(&targets));
        sim.spend_craft();
        assert!(!sim.is_possible_to_reach(&targets));

        assert!(sim.is_target_reached(&Targets::new(1, 1)));
    }
}
