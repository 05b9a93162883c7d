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

//! Accept/reroll decision policies, one per crafting target.

use crate::crafting::GemState;
use crate::error::PolicyError;
use gemforge_types::{CRAFTED_CORE_POINT, MAX_POINT, MIN_POINT, PolicyKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

const MODEL_PREFIX: &str = "gem_model_c";
const MODEL_SUFFIX: &str = ".json";

/// Number of features a policy sees
pub const OBSERVATION_SIZE: usize = 6;

/// Q-value index per action
const ACTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Keep the current draw
    Accept,
    /// Spend a reroll before drawing
    Reroll,
}

/// What a policy sees of an in-progress gem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub efficiency: u8,
    pub core_point: u8,
    pub effect1: u8,
    pub effect2: u8,
    pub remaining_crafts: u32,
    pub remaining_rerolls: u32,
}

impl Observation {
    /// Feature vector in network input order
    pub fn features(&self) -> [f64; OBSERVATION_SIZE] {
        [
            f64::from(self.efficiency),
            f64::from(self.core_point),
            f64::from(self.effect1),
            f64::from(self.effect2),
            f64::from(self.remaining_crafts),
            f64::from(self.remaining_rerolls),
        ]
    }
}

impl From<&GemState> for Observation {
    fn from(state: &GemState) -> Self {
        Self {
            efficiency: state.efficiency,
            core_point: state.core_point,
            effect1: state.effect1,
            effect2: state.effect2,
            remaining_crafts: state.remaining_crafts,
            remaining_rerolls: state.remaining_rerolls,
        }
    }
}

/// Decision function consulted before every craft attempt
pub trait PolicyProvider: Send + Sync {
    fn name(&self) -> &str;

    fn decide(&self, observation: &Observation) -> PolicyAction;
}

/// Baseline that never spends rerolls
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl PolicyProvider for AlwaysAccept {
    fn name(&self) -> &str {
        "always-accept"
    }

    fn decide(&self, _observation: &Observation) -> PolicyAction {
        PolicyAction::Accept
    }
}

/// Fully connected layer, `weights[out][in]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect()
    }
}

/// Feed-forward Q-network: ReLU hidden layers, linear output of one
/// Q-value per action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QNetworkPolicy {
    #[serde(default)]
    pub name: String,
    pub layers: Vec<DenseLayer>,
}

impl QNetworkPolicy {
    /// Check layer shapes chain from the observation to two Q-values
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.layers.is_empty() {
            return Err(PolicyError::Shape("network has no layers".to_owned()));
        }

        let mut width = OBSERVATION_SIZE;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.weights.len() != layer.biases.len() {
                return Err(PolicyError::Shape(format!(
                    "layer {index}: {} weight rows but {} biases",
                    layer.weights.len(),
                    layer.biases.len()
                )));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                return Err(PolicyError::Shape(format!(
                    "layer {index}: expected {width} inputs, got {}",
                    row.len()
                )));
            }
            width = layer.biases.len();
        }

        if width != ACTIONS {
            return Err(PolicyError::Shape(format!(
                "output layer has {width} units, expected {ACTIONS}"
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and validate a network from a JSON weights file
    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut network = Self::from_json(&content).map_err(|source| PolicyError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        network.validate()?;
        if network.name.is_empty() {
            network.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(network)
    }

    pub fn q_values(&self, observation: &Observation) -> Vec<f64> {
        let last = self.layers.len().saturating_sub(1);
        let mut activations = observation.features().to_vec();
        for (index, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if index < last {
                for value in &mut activations {
                    *value = value.max(0.0);
                }
            }
        }
        activations
    }
}

impl PolicyProvider for QNetworkPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, observation: &Observation) -> PolicyAction {
        match self.q_values(observation).as_slice() {
            [accept, reroll] if reroll > accept => PolicyAction::Reroll,
            _ => PolicyAction::Accept,
        }
    }
}

/// Parse `gem_model_c{core}_e{eff}.json` into its key
fn parse_model_filename(filename: &str) -> Option<PolicyKey> {
    let stem = filename
        .strip_prefix(MODEL_PREFIX)?
        .strip_suffix(MODEL_SUFFIX)?;
    let (core_point, efficiency) = stem.split_once("_e")?;
    Some(PolicyKey::new(core_point.parse().ok()?, efficiency.parse().ok()?))
}

/// Policies by crafting target. A target with no policy cannot be crafted.
#[derive(Clone, Default)]
pub struct PolicyRegistry {
    providers: HashMap<PolicyKey, Arc<dyn PolicyProvider>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with [`AlwaysAccept`] for every crafted target
    pub fn with_baseline() -> Self {
        let mut registry = Self::new();
        let baseline: Arc<dyn PolicyProvider> = Arc::new(AlwaysAccept);
        for efficiency in MIN_POINT..=MAX_POINT {
            registry.register(
                PolicyKey::new(CRAFTED_CORE_POINT, efficiency),
                Arc::clone(&baseline),
            );
        }
        registry
    }

    /// Load every `gem_model_c{core}_e{eff}.json` found in `dir`
    pub fn load_dir(dir: &Path) -> Result<Self, PolicyError> {
        info!("Loading policy models from '{}'", dir.display());
        let entries = std::fs::read_dir(dir).map_err(|source| PolicyError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut registry = Self::new();
        for entry in entries {
            let entry = entry.map_err(|source| PolicyError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let filename = entry.file_name();
            let Some(key) = filename.to_str().and_then(parse_model_filename) else {
                continue;
            };

            let network = QNetworkPolicy::from_file(&entry.path())?;
            info!("  - Loaded policy for target {key} from {}", filename.to_string_lossy());
            registry.register(key, Arc::new(network));
        }

        if registry.is_empty() {
            warn!("No policy models found in '{}'", dir.display());
            return Err(PolicyError::NoModels(dir.to_path_buf()));
        }

        info!("Loaded {} policy models", registry.len());
        Ok(registry)
    }

    pub fn register(&mut self, key: PolicyKey, provider: Arc<dyn PolicyProvider>) {
        self.providers.insert(key, provider);
    }

    pub fn get(&self, key: PolicyKey) -> Option<Arc<dyn PolicyProvider>> {
        self.providers.get(&key).cloned()
    }

    pub fn contains(&self, key: PolicyKey) -> bool {
        self.providers.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered keys in ascending order
    pub fn keys(&self) -> Vec<PolicyKey> {
        let mut keys: Vec<PolicyKey> = self.providers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemforge_types::MaterialGrade;
    use std::io::Write;

    /// Single linear layer preferring reroll while rerolls remain
    const REROLL_NET: &str = r#"{
        "name": "reroll-while-possible",
        "layers": [
            {
                "weights": [[0, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 1]],
                "biases": [0.5, 0]
            }
        ]
    }"#;

    fn observation(remaining_rerolls: u32) -> Observation {
        Observation {
            remaining_rerolls,
            ..Observation::from(&GemState::fresh(MaterialGrade::Heroic))
        }
    }

    #[test]
    fn test_always_accept() {
        assert_eq!(AlwaysAccept.decide(&observation(2)), PolicyAction::Accept);
    }

    #[test]
    fn test_linear_network_decisions() {
        let network = QNetworkPolicy::from_json(REROLL_NET).unwrap();
        network.validate().unwrap();
        assert_eq!(network.decide(&observation(2)), PolicyAction::Reroll);
        assert_eq!(network.decide(&observation(0)), PolicyAction::Accept);
    }

    #[test]
    fn test_relu_hidden_layer() {
        // Hidden unit is -crafts, clamped to zero by ReLU
        let network = QNetworkPolicy {
            name: "relu".to_owned(),
            layers: vec![
                DenseLayer {
                    weights: vec![vec![0.0, 0.0, 0.0, 0.0, -1.0, 0.0]],
                    biases: vec![0.0],
                },
                DenseLayer {
                    weights: vec![vec![1.0], vec![-1.0]],
                    biases: vec![0.0, 0.0],
                },
            ],
        };
        network.validate().unwrap();
        // Both Q-values are 0: ties go to accept
        assert_eq!(network.q_values(&observation(1)), vec![0.0, 0.0]);
        assert_eq!(network.decide(&observation(1)), PolicyAction::Accept);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let network = QNetworkPolicy {
            name: String::new(),
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; 5], vec![0.0; 5]],
                biases: vec![0.0, 0.0],
            }],
        };
        assert!(matches!(network.validate(), Err(PolicyError::Shape(_))));

        let network = QNetworkPolicy {
            name: String::new(),
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; 6]; 3],
                biases: vec![0.0; 3],
            }],
        };
        assert!(matches!(network.validate(), Err(PolicyError::Shape(_))));
    }

    #[test]
    fn test_parse_model_filename() {
        assert_eq!(
            parse_model_filename("gem_model_c5_e3.json"),
            Some(PolicyKey::new(5, 3))
        );
        assert_eq!(parse_model_filename("gem_model_c5_e3.h5"), None);
        assert_eq!(parse_model_filename("gem_model_cX_e3.json"), None);
        assert_eq!(parse_model_filename("notes.txt"), None);
    }

    #[test]
    fn test_baseline_registry() {
        let registry = PolicyRegistry::with_baseline();
        assert_eq!(registry.len(), 5);
        assert!(registry.contains(PolicyKey::new(5, 1)));
        assert!(!registry.contains(PolicyKey::new(4, 1)));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["gem_model_c5_e4.json", "gem_model_c5_e5.json"] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(REROLL_NET.as_bytes()).unwrap();
        }
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let registry = PolicyRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.keys(), vec![PolicyKey::new(5, 4), PolicyKey::new(5, 5)]);
        let policy = registry.get(PolicyKey::new(5, 4)).unwrap();
        assert_eq!(policy.name(), "reroll-while-possible");
    }

    #[test]
    fn test_load_dir_without_models_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PolicyRegistry::load_dir(dir.path()),
            Err(PolicyError::NoModels(_))
        ));
    }

    #[test]
    fn test_load_dir_reports_bad_model() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gem_model_c5_e1.json"), "{ not json").unwrap();
        assert!(matches!(
            PolicyRegistry::load_dir(dir.path()),
            Err(PolicyError::Parse { .. })
        ));
    }
}
