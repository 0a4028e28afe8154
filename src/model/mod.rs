//! Pre-fitted model artifacts: the feature scaler and the binary classifier.
//!
//! Both are loaded once at startup and only ever read afterwards, so a single
//! [`Scorer`] is shared across request handlers behind an `Arc`.

mod forest;
mod scaler;

pub use forest::{DecisionTree, RandomForest};
pub use scaler::RobustScaler;

use crate::{Result, config::ModelConfig};
use serde::de::DeserializeOwned;
use std::{path::Path, sync::Arc};
use tracing::info;

/// Required input columns, in the order the model was fitted on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "diagonal",
    "height_left",
    "height_right",
    "margin_low",
    "margin_up",
    "length",
];

pub const FEATURE_COUNT: usize = 6;

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Class label for a genuine banknote.
pub const GENUINE: u8 = 1;
/// Class label for a counterfeit banknote.
pub const COUNTERFEIT: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: u8,
    /// Probability of the genuine class, in `[0, 1]`.
    pub probability: f64,
}

pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<Classification>;
}

pub struct Scorer {
    scaler: RobustScaler,
    classifier: Arc<dyn Classifier>,
}

impl Scorer {
    pub fn new(scaler: RobustScaler, classifier: Arc<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    pub fn load(config: &ModelConfig) -> Result<Self> {
        let scaler: RobustScaler = read_artifact(&config.scaler_path)?;
        scaler.validate()?;
        info!("Loaded scaler from {}", config.scaler_path);

        // deserializing a forest validates its structure
        let forest: RandomForest = read_artifact(&config.classifier_path)?;
        info!(
            "Loaded classifier from {} ({} trees)",
            config.classifier_path,
            forest.tree_count()
        );

        Ok(Self::new(scaler, Arc::new(forest)))
    }

    /// Scales one raw feature vector and classifies it.
    pub fn score(&self, raw: &FeatureVector) -> Result<Classification> {
        let scaled = self.scaler.transform(raw);
        self.classifier.classify(&scaled)
    }
}

fn read_artifact<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        crate::Error::model(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        crate::Error::model(format!("cannot decode {}: {e}", path.display()))
    })
}
