//! Model artifact loading and saving
//!
//! The serving side and the offline trainer share one JSON artifact
//! format. Loading walks an ordered list of candidate paths and takes the
//! first file that exists; a present-but-broken artifact is an error, not
//! a reason to fall through to the next candidate.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ModelError;
use crate::model::forest::BleachingModel;

/// Load the model from the first existing candidate path
///
/// Returns [`ModelError::Unavailable`] when no candidate exists. The
/// caller is expected to treat that as fatal before serving traffic.
pub fn load_model(paths: &[String]) -> Result<BleachingModel, ModelError> {
    for candidate in paths {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }

        let data = fs::read_to_string(path)
            .map_err(|e| ModelError::Io(PathBuf::from(path), e))?;
        let model: BleachingModel = serde_json::from_str(&data)
            .map_err(|e| ModelError::Artifact(PathBuf::from(path), e.to_string()))?;
        model
            .validate()
            .map_err(|detail| ModelError::Artifact(PathBuf::from(path), detail))?;

        info!(
            "Loaded bleaching model from {} ({} trees)",
            path.display(),
            model.trees.len()
        );
        return Ok(model);
    }

    Err(ModelError::Unavailable(paths.to_vec()))
}

/// Serialize the model to the given path (trainer side)
pub fn save_model(path: &Path, model: &BleachingModel) -> Result<(), ModelError> {
    let data = serde_json::to_string(model)
        .map_err(|e| ModelError::Artifact(PathBuf::from(path), e.to_string()))?;
    fs::write(path, data).map_err(|e| ModelError::Io(PathBuf::from(path), e))?;
    info!("Saved bleaching model to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forest::{DecisionTree, FEATURE_COLUMNS, Node};
    use std::path::PathBuf;

    fn tiny_model() -> BleachingModel {
        BleachingModel {
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            trees: vec![DecisionTree {
                nodes: vec![Node::Leaf { class: 1 }],
            }],
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("coral-server-artifact-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_roundtrip() {
        let path = temp_path("roundtrip.json");
        save_model(&path, &tiny_model()).unwrap();

        let loaded = load_model(&[path.to_string_lossy().to_string()]).unwrap();
        assert_eq!(loaded.trees.len(), 1);
        assert_eq!(loaded.predict(&[0.0; 5]), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let missing = temp_path("missing.json");
        let present = temp_path("present.json");
        save_model(&present, &tiny_model()).unwrap();

        let candidates = vec![
            missing.to_string_lossy().to_string(),
            present.to_string_lossy().to_string(),
        ];
        assert!(load_model(&candidates).is_ok());

        std::fs::remove_file(&present).unwrap();
    }

    #[test]
    fn test_no_candidate_is_unavailable() {
        let result = load_model(&[temp_path("nowhere.json").to_string_lossy().to_string()]);
        assert!(matches!(result, Err(ModelError::Unavailable(_))));
    }

    #[test]
    fn test_corrupt_artifact_is_an_error_not_a_fallthrough() {
        let corrupt = temp_path("corrupt.json");
        let healthy = temp_path("healthy.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        save_model(&healthy, &tiny_model()).unwrap();

        // The corrupt file exists, so it wins the candidate walk and fails
        let candidates = vec![
            corrupt.to_string_lossy().to_string(),
            healthy.to_string_lossy().to_string(),
        ];
        assert!(matches!(
            load_model(&candidates),
            Err(ModelError::Artifact(_, _))
        ));

        std::fs::remove_file(&corrupt).unwrap();
        std::fs::remove_file(&healthy).unwrap();
    }

    #[test]
    fn test_feature_name_mismatch_rejected() {
        let path = temp_path("mismatch.json");
        let mut model = tiny_model();
        model.feature_names.reverse();
        let data = serde_json::to_string(&model).unwrap();
        std::fs::write(&path, data).unwrap();

        assert!(matches!(
            load_model(&[path.to_string_lossy().to_string()]),
            Err(ModelError::Artifact(_, _))
        ));

        std::fs::remove_file(&path).unwrap();
    }
}
