//! Random forest classifier used on the serving path
//!
//! The model is treated as an opaque capability: load an artifact, call
//! [`BleachingModel::predict`] with a fixed-order feature vector, get a
//! binary label back. Trees are stored as flat node vectors with index
//! links so the artifact stays a plain serde structure.

use serde::{Deserialize, Serialize};

/// Number of input features
pub const FEATURE_COUNT: usize = 5;

/// Feature column names in the exact order the model was trained on.
///
/// This order is a strict contract between the trainer and the serving
/// path. Reordering silently produces wrong predictions, so the artifact
/// records the names and [`BleachingModel::validate`] rejects any
/// mismatch at load time.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "SSTA_DHW",
    "TSA_DHW",
    "Temperature_Maximum",
    "Turbidity",
    "Depth_m",
];

/// One node of a decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Inner node: values `<=` threshold descend left, else right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying the predicted class
    Leaf { class: u8 },
}

/// A single decision tree stored as a flat node vector, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Descend from the root to a leaf for the given feature vector
    ///
    /// Callers must have validated the node links; see
    /// [`BleachingModel::validate`].
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> u8 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// The serialized classifier: an ensemble of trees plus the feature
/// name contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleachingModel {
    /// Feature names in training order; must match [`FEATURE_COLUMNS`]
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

impl BleachingModel {
    /// Predict the bleaching label (0 or 1) by majority vote
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> u8 {
        let ones = self
            .trees
            .iter()
            .filter(|tree| tree.predict(features) == 1)
            .count();
        u8::from(ones * 2 > self.trees.len())
    }

    /// Check that the artifact is structurally sound
    ///
    /// Verifies the feature name contract, that every tree is non-empty,
    /// and that every node link and feature index is in range, so that
    /// `predict` can never panic on a loaded artifact.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names != FEATURE_COLUMNS {
            return Err(format!(
                "feature names {:?} do not match expected {:?}",
                self.feature_names, FEATURE_COLUMNS
            ));
        }

        if self.trees.is_empty() {
            return Err("model has no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {} has no nodes", t));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Leaf { class } => {
                        if *class > 1 {
                            return Err(format!("tree {} node {}: class {} out of range", t, n, class));
                        }
                    }
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(format!(
                                "tree {} node {}: feature index {} out of range",
                                t, n, feature
                            ));
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(format!("tree {} node {}: child index out of range", t, n));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single split on Turbidity (index 3): high turbidity predicts 1
    fn turbidity_stump() -> DecisionTree {
        DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: 3,
                    threshold: 1.0,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { class: 0 },
                Node::Leaf { class: 1 },
            ],
        }
    }

    fn test_model(trees: Vec<DecisionTree>) -> BleachingModel {
        BleachingModel {
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            trees,
        }
    }

    #[test]
    fn test_tree_descends_by_threshold() {
        let tree = turbidity_stump();
        // <= goes left
        assert_eq!(tree.predict(&[0.0, 0.0, 0.0, 1.0, 0.0]), 0);
        assert_eq!(tree.predict(&[0.0, 0.0, 0.0, 1.5, 0.0]), 1);
    }

    #[test]
    fn test_majority_vote() {
        let always_one = DecisionTree {
            nodes: vec![Node::Leaf { class: 1 }],
        };
        let always_zero = DecisionTree {
            nodes: vec![Node::Leaf { class: 0 }],
        };
        let model = test_model(vec![always_one.clone(), always_one, always_zero]);
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]), 1);
    }

    #[test]
    fn test_tie_predicts_zero() {
        let always_one = DecisionTree {
            nodes: vec![Node::Leaf { class: 1 }],
        };
        let always_zero = DecisionTree {
            nodes: vec![Node::Leaf { class: 0 }],
        };
        let model = test_model(vec![always_one, always_zero]);
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]), 0);
    }

    #[test]
    fn test_prediction_is_binary() {
        let model = test_model(vec![turbidity_stump()]);
        for turbidity in [-3.0, 0.0, 0.99, 1.0, 1.01, 250.0] {
            let label = model.predict(&[0.0, 0.0, 0.0, turbidity, 0.0]);
            assert!(label == 0 || label == 1);
        }
    }

    #[test]
    fn test_validate_accepts_sound_model() {
        assert!(test_model(vec![turbidity_stump()]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_feature_names() {
        let mut model = test_model(vec![turbidity_stump()]);
        model.feature_names.swap(0, 1);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_child_index() {
        let model = test_model(vec![DecisionTree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 0.0,
                left: 1,
                right: 99,
            }],
        }]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_feature_index_out_of_range() {
        let model = test_model(vec![DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: FEATURE_COUNT,
                    threshold: 0.0,
                    left: 1,
                    right: 1,
                },
                Node::Leaf { class: 0 },
            ],
        }]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_forest() {
        assert!(test_model(vec![]).validate().is_err());
    }

    #[test]
    fn test_feature_column_order() {
        // The training column order is a wire contract; lock it down.
        assert_eq!(
            FEATURE_COLUMNS,
            [
                "SSTA_DHW",
                "TSA_DHW",
                "Temperature_Maximum",
                "Turbidity",
                "Depth_m"
            ]
        );
    }
}
