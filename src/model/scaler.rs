use super::{FEATURE_COUNT, FeatureVector};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Robust scaling with precomputed per-feature center (median) and scale
/// (interquartile range). Either step is skipped when its vector is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustScaler {
    #[serde(default)]
    pub center: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl RobustScaler {
    pub fn identity() -> Self {
        Self {
            center: None,
            scale: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(center) = &self.center {
            check_vector("center", center)?;
        }
        if let Some(scale) = &self.scale {
            check_vector("scale", scale)?;
            if scale.iter().any(|s| *s == 0.0) {
                return Err(Error::model("scaler scale contains a zero"));
            }
        }
        Ok(())
    }

    /// Callers must have run [`RobustScaler::validate`] first.
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut scaled = *features;
        if let Some(center) = &self.center {
            for (x, c) in scaled.iter_mut().zip(center) {
                *x -= c;
            }
        }
        if let Some(scale) = &self.scale {
            for (x, s) in scaled.iter_mut().zip(scale) {
                *x /= s;
            }
        }
        scaled
    }
}

fn check_vector(name: &str, values: &[f64]) -> Result<()> {
    if values.len() != FEATURE_COUNT {
        return Err(Error::model(format!(
            "scaler {name} has {} values, expected {FEATURE_COUNT}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::model(format!("scaler {name} contains non-finite values")));
    }
    Ok(())
}
