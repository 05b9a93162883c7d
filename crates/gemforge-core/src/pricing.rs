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

use gemforge_types::{GemKind, MaterialGrade, MaterialId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source of current material prices, keyed by marketplace display name
pub trait PriceProvider: Send + Sync {
    /// Unit price, or `None` when the item is not listed
    fn price(&self, name: &str) -> Option<u64>;

    fn material_price(&self, material: MaterialId) -> Option<u64> {
        self.price(&material.display_name())
    }
}

/// Fixed in-memory price list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    prices: BTreeMap<String, u64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same price for every material grade of every gem kind
    pub fn uniform(price: u64) -> Self {
        let mut table = Self::new();
        for kind in GemKind::ALL {
            for grade in MaterialGrade::ALL {
                table.insert(MaterialId::new(kind, grade).display_name(), price);
            }
        }
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, price: u64) {
        self.prices.insert(name.into(), price);
    }

    pub fn with_material(mut self, material: MaterialId, price: u64) -> Self {
        self.insert(material.display_name(), price);
        self
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.prices.iter().map(|(name, &price)| (name.as_str(), price))
    }
}

impl From<BTreeMap<String, u64>> for PriceTable {
    fn from(prices: BTreeMap<String, u64>) -> Self {
        Self { prices }
    }
}

impl PriceProvider for PriceTable {
    fn price(&self, name: &str) -> Option<u64> {
        self.prices.get(name).copied()
    }
}
