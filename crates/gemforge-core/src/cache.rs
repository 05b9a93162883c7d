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

//! Key-value store for slot cost results.

use crate::error::CacheError;
use gemforge_types::CoreCategory;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// String store with per-entry expiry. Values are opaque to the store.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Key of the cheapest-slot result for one slot cost
pub fn slot_cost_key(
    slot_cost: u32,
    category: CoreCategory,
    simulations: u32,
    reference_price: u64,
) -> String {
    format!(
        "willpower_cost:{slot_cost}:core_type:{}:sims:{simulations}:crystal_price:{reference_price}",
        category.name()
    )
}

/// Process-local cache; expired entries are dropped when read
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((expires_at, value)) if Instant::now() < *expires_at => {
                return Ok(Some(value.clone()));
            }
            Some(_) => {}
            None => return Ok(None),
        }
        entries.remove(key);
        Ok(None)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .insert(key.to_owned(), (expires_at, value.to_owned()));
        Ok(())
    }
}

/// Always misses; used when no cache is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }
}
