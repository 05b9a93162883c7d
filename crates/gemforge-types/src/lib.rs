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

pub mod gem;
pub mod request;
pub mod strategy;

// Re-export common types for convenience
pub use gem::{
    CRAFTED_CORE_POINT, CoreCategory, CoreGrade, GemKind, MAX_GEM_COST, MAX_POINT, MIN_GEM_COST,
    MIN_POINT, MaterialGrade, MaterialId, PolicyKey, SLOTS_PER_CORE, TargetSpec,
};
pub use request::{HeldGem, OptimizeRequest, ValidationError};
pub use strategy::{
    CategoryStrategy, CoreLeftover, CoreStrategy, CostEstimate, OptimizeResponse, Progress,
    ScenarioChoice, SlotCostOption,
};
