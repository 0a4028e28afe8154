use crate::model::FeatureVector;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One banknote's six measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub diagonal: f64,
    pub height_left: f64,
    pub height_right: f64,
    pub margin_low: f64,
    pub margin_up: f64,
    pub length: f64,
}

impl InputRecord {
    pub fn from_features(features: FeatureVector) -> Self {
        let [diagonal, height_left, height_right, margin_low, margin_up, length] = features;
        Self {
            diagonal,
            height_left,
            height_right,
            margin_low,
            margin_up,
            length,
        }
    }

    pub fn features(&self) -> FeatureVector {
        [
            self.diagonal,
            self.height_left,
            self.height_right,
            self.margin_low,
            self.margin_up,
            self.length,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub input: InputRecord,
    /// 1 for genuine, 0 for counterfeit.
    pub prediction: u8,
    /// Confidence of the genuine class, as a percentage.
    pub probability: f64,
    pub result_text: String,
    /// Uploaded columns the model does not use, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub vrais: usize,
    pub faux: usize,
    pub pourcentage_vrais: f64,
    pub pourcentage_faux: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub table_predictions: Vec<ScoredRecord>,
    pub statistiques: Statistics,
}
