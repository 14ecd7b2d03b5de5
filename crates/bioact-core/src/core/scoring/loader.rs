use super::forest::RandomForest;
use super::linear::LinearModel;
use super::{ModelError, ModelLoader, Regressor};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// The on-disk JSON representation of a model, discriminated by its `kind` field.
///
/// Each variant checks its own structure while deserializing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    Linear(LinearModel),
}

impl ModelArtifact {
    fn into_regressor(self) -> Arc<dyn Regressor> {
        match self {
            Self::RandomForest(forest) => Arc::new(forest),
            Self::Linear(linear) => Arc::new(linear),
        }
    }
}

/// Loads [`ModelArtifact`]s from JSON files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonModelLoader;

impl JsonModelLoader {
    pub fn parse_str(content: &str) -> Result<Arc<dyn Regressor>, ModelError> {
        Self::parse(content, "<memory>")
    }

    fn parse(content: &str, origin: &str) -> Result<Arc<dyn Regressor>, ModelError> {
        let artifact: ModelArtifact =
            serde_json::from_str(content).map_err(|e| ModelError::LoadFailed {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;
        Ok(artifact.into_regressor())
    }
}

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn Regressor>, ModelError> {
        let origin = path.to_string_lossy().to_string();
        debug!("Reading model artifact from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::LoadFailed {
            path: origin.clone(),
            reason: e.to_string(),
        })?;
        let model = Self::parse(&content, &origin)?;
        info!(
            "Loaded model artifact {:?} ({} features).",
            path,
            model
                .n_features()
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const FOREST_JSON: &str = r#"{
        "kind": "random-forest",
        "n_features": 2,
        "trees": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [1, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [6.0, 5.0, 7.0]
            }
        ]
    }"#;

    #[test]
    fn loads_random_forest_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, FOREST_JSON).unwrap();

        let model = JsonModelLoader.load(&path).unwrap();
        assert_eq!(model.n_features(), Some(2));
        assert_eq!(
            model.predict(&[vec![0.0, 0.0], vec![0.0, 1.0]]).unwrap(),
            vec![5.0, 7.0]
        );
    }

    #[test]
    fn loads_linear_model_from_string() {
        let model =
            JsonModelLoader::parse_str(r#"{"kind": "linear", "coefficients": [1.0, 2.0], "intercept": 0.5}"#)
                .unwrap();
        assert_eq!(model.predict(&[vec![1.0, 1.0]]).unwrap(), vec![3.5]);
    }

    #[test]
    fn missing_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let result = JsonModelLoader.load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ModelError::LoadFailed { .. })));
    }

    #[test]
    fn malformed_json_fails_to_load() {
        let result = JsonModelLoader::parse_str("{ this is not json");
        assert!(matches!(result, Err(ModelError::LoadFailed { .. })));
    }

    #[test]
    fn unknown_kind_fails_to_load() {
        let result = JsonModelLoader::parse_str(r#"{"kind": "svm", "support_vectors": []}"#);
        assert!(matches!(result, Err(ModelError::LoadFailed { .. })));
    }

    #[test]
    fn structurally_invalid_forest_fails_to_load() {
        let bad = FOREST_JSON.replace("\"feature\": [1,", "\"feature\": [9,");
        let result = JsonModelLoader::parse_str(&bad);
        assert!(
            matches!(result, Err(ModelError::LoadFailed { reason, .. }) if reason.contains("feature 9"))
        );
    }
}
