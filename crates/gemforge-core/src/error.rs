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

//! Error types for the engine crate

use gemforge_types::{CoreCategory, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("{category} cores cannot hold the owned gems: {source}")]
    Infeasible {
        category: CoreCategory,
        #[source]
        source: AssignmentError,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("held gem '{name}' does not name a known gem kind")]
    UnknownGem { name: String },

    #[error("no placement of {gems} gems into {cores} cores leaves every slot craftable")]
    NoValidPlacement { gems: usize, cores: usize },
}

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed network: {0}")]
    Shape(String),

    #[error("no policy models found in {0}")]
    NoModels(PathBuf),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cached value serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("lifecycle multiplier must be at least 1, got {0}")]
    Multiplier(u32),
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
