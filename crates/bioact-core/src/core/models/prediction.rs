/// The predicted potency of a single molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub name: String,
    /// Predicted pIC50 (negative log10 of the half-maximal inhibitory concentration, in molar).
    pub score: f64,
}

/// Predictions for a whole batch, in the order of the input molecules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    predictions: Vec<Prediction>,
}

impl PredictionResult {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.predictions.iter()
    }

    pub fn into_inner(self) -> Vec<Prediction> {
        self.predictions
    }
}

impl<'a> IntoIterator for &'a PredictionResult {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.predictions.iter()
    }
}
