use banknote_detector::{
    Error, Result,
    model::{Classification, Classifier, FeatureVector},
};
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};

mock! {
    pub Classifier {}

    impl Classifier for Classifier {
        fn classify(&self, features: &FeatureVector) -> Result<Classification>;
    }
}

/// Rule-based classifier for tests: genuine when the lower margin (raw,
/// unscaled) is under 4.5. Counts how often it was invoked.
#[derive(Debug)]
pub struct MarginClassifier {
    pub calls: AtomicUsize,
    pub genuine_probability: f64,
    pub counterfeit_probability: f64,
}

impl MarginClassifier {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            genuine_probability: 0.92,
            counterfeit_probability: 0.15,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MarginClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for MarginClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if features[3] < 4.5 {
            Ok(Classification {
                label: 1,
                probability: self.genuine_probability,
            })
        } else {
            Ok(Classification {
                label: 0,
                probability: self.counterfeit_probability,
            })
        }
    }
}

/// Classifier that always fails, standing in for a broken model.
#[derive(Debug, Default)]
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn classify(&self, _features: &FeatureVector) -> Result<Classification> {
        Err(Error::model("inference failed"))
    }
}
