use super::{ModelError, Regressor, check_row_widths};
use serde::Deserialize;

/// `intercept + sum(coefficients[i] * x[i])`, with finite parameters only.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(try_from = "RawLinearModel")]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

#[derive(Deserialize)]
struct RawLinearModel {
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
}

impl TryFrom<RawLinearModel> for LinearModel {
    type Error = String;

    fn try_from(raw: RawLinearModel) -> Result<Self, Self::Error> {
        Self::new(raw.coefficients, raw.intercept)
    }
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        if coefficients.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model contains non-finite parameters".to_string());
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearModel {
    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        check_row_widths(rows, self.coefficients.len())?;
        Ok(rows
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_applies_coefficients_and_intercept() {
        let model = LinearModel::new(vec![0.5, -1.0, 2.0], 4.0).unwrap();
        let scores = model
            .predict(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 1.0]])
            .unwrap();
        assert_eq!(scores, vec![4.5, 5.0]);
    }

    #[test]
    fn new_rejects_empty_and_non_finite_models() {
        assert!(LinearModel::new(vec![], 0.0).is_err());
        assert!(LinearModel::new(vec![f64::NAN], 0.0).is_err());
        assert!(LinearModel::new(vec![1.0], f64::INFINITY).is_err());
    }

    #[test]
    fn deserializing_checks_parameters_and_defaults_the_intercept() {
        assert!(serde_json::from_str::<LinearModel>(r#"{"coefficients": []}"#).is_err());

        let model: LinearModel = serde_json::from_str(r#"{"coefficients": [2.0]}"#).unwrap();
        assert_eq!(model.intercept(), 0.0);
        assert_eq!(model.coefficients(), &[2.0]);
    }
}
