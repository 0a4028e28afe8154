use super::{COUNTERFEIT, Classification, Classifier, FEATURE_COUNT, FeatureVector, GENUINE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;
const N_CLASSES: usize = 2;

/// One fitted decision tree in flat array layout: node `i` splits on
/// `feature[i]` at `threshold[i]` and is a leaf when `children_left[i] == -1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counterfeit, genuine).
    pub value: Vec<Vec<f64>>,
}

/// A validated forest. Every instance, built with [`RandomForest::new`] or
/// deserialized from an export, has passed the structural checks, so traversal
/// never indexes outside the node arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForestExport")]
pub struct RandomForest {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

/// Unchecked shape of the JSON export.
#[derive(Deserialize)]
struct ForestExport {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl TryFrom<ForestExport> for RandomForest {
    type Error = Error;

    fn try_from(export: ForestExport) -> Result<Self> {
        Self::new(export.n_features, export.n_classes, export.trees)
    }
}

impl DecisionTree {
    fn validate(&self, index: usize) -> Result<()> {
        let n = self.children_left.len();
        let invalid = |msg: String| Error::model(format!("tree {index}: {msg}"));

        if n == 0 {
            return Err(invalid("no nodes".to_string()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(invalid("node arrays have different lengths".to_string()));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == LEAF {
                let weights = &self.value[node];
                if weights.len() != N_CLASSES {
                    return Err(invalid(format!("node {node} has {} class weights", weights.len())));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
                    return Err(invalid(format!("node {node} has invalid class weights")));
                }
                continue;
            }
            // children always follow their parent, so traversal terminates
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(invalid(format!("node {node} has out-of-range child {child}")));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_COUNT as i64 {
                return Err(invalid(format!("node {node} splits on unknown feature {feature}")));
            }
            if !self.threshold[node].is_finite() {
                return Err(invalid(format!("node {node} has a non-finite threshold")));
            }
        }
        Ok(())
    }

    /// Returns the normalised class weights of the leaf reached by `features`.
    fn leaf_probabilities(&self, features: &FeatureVector) -> [f64; N_CLASSES] {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            // trees split on single-precision features
            let x = features[feature] as f32 as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        [weights[0] / total, weights[1] / total]
    }
}

impl RandomForest {
    pub fn new(n_features: usize, n_classes: usize, trees: Vec<DecisionTree>) -> Result<Self> {
        let forest = Self {
            n_features,
            n_classes,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<()> {
        if self.n_features != FEATURE_COUNT {
            return Err(Error::model(format!(
                "classifier expects {} features, expected {FEATURE_COUNT}",
                self.n_features
            )));
        }
        if self.n_classes != N_CLASSES {
            return Err(Error::model(format!(
                "classifier has {} classes, expected {N_CLASSES}",
                self.n_classes
            )));
        }
        if self.trees.is_empty() {
            return Err(Error::model("classifier has no trees"));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index)?;
        }
        Ok(())
    }

    /// Mean of the per-tree class probabilities.
    pub fn predict_proba(&self, features: &FeatureVector) -> [f64; N_CLASSES] {
        let mut sum = [0.0; N_CLASSES];
        for tree in &self.trees {
            let proba = tree.leaf_probabilities(features);
            sum[0] += proba[0];
            sum[1] += proba[1];
        }
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}

impl Classifier for RandomForest {
    fn classify(&self, features: &FeatureVector) -> Result<Classification> {
        if features.iter().any(|x| !x.is_finite()) {
            return Err(Error::model("feature vector contains non-finite values"));
        }
        let [counterfeit, genuine] = self.predict_proba(features);
        // ties go to the first class
        let label = if genuine > counterfeit { GENUINE } else { COUNTERFEIT };
        Ok(Classification {
            label,
            probability: genuine,
        })
    }
}
