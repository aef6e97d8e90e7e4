//! Random forest training (offline)
//!
//! Fits the ensemble the serving path consumes: bootstrap-sampled CART
//! trees split on the gini criterion with balanced class weights and a
//! random feature subset per split. Deterministic for a fixed seed.

use crate::model::forest::{BleachingModel, DecisionTree, FEATURE_COLUMNS, FEATURE_COUNT, Node};
use crate::utils::rng::Lcg64;

/// Forest hyperparameters
#[derive(Debug, Clone)]
pub struct TrainParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 20,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// A fitted forest plus normalized feature importances
#[derive(Debug)]
pub struct FitResult {
    pub model: BleachingModel,
    /// Mean impurity decrease per feature, normalized to sum to 1
    pub importances: [f64; FEATURE_COUNT],
}

/// Fit a random forest on the given samples
///
/// Class weights are balanced: each class contributes equally to the
/// split criterion regardless of how imbalanced the dataset is.
pub fn fit(features: &[[f64; FEATURE_COUNT]], labels: &[u8], params: &TrainParams) -> FitResult {
    let n = features.len();
    let counts = class_counts(labels);
    let class_weights = [
        balanced_weight(n, counts[0]),
        balanced_weight(n, counts[1]),
    ];

    let mut rng = Lcg64::new(params.seed);
    let mut trees = Vec::with_capacity(params.n_trees);
    let mut raw_importances = [0.0; FEATURE_COUNT];

    for _ in 0..params.n_trees {
        // Bootstrap sample: n draws with replacement
        let sample: Vec<usize> = (0..n).map(|_| rng.next_index(n)).collect();

        let mut builder = TreeBuilder {
            features,
            labels,
            class_weights,
            params,
            importances: &mut raw_importances,
            rng: &mut rng,
        };
        let mut nodes = Vec::new();
        builder.build(sample, 0, &mut nodes);
        trees.push(DecisionTree { nodes });
    }

    let total: f64 = raw_importances.iter().sum();
    let mut importances = raw_importances;
    if total > 0.0 {
        for value in &mut importances {
            *value /= total;
        }
    }

    FitResult {
        model: BleachingModel {
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            trees,
        },
        importances,
    }
}

fn class_counts(labels: &[u8]) -> [usize; 2] {
    let ones = labels.iter().filter(|&&label| label == 1).count();
    [labels.len() - ones, ones]
}

fn balanced_weight(n: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        n as f64 / (2.0 * count as f64)
    }
}

fn gini(w0: f64, w1: f64) -> f64 {
    let total = w0 + w1;
    if total <= 0.0 {
        return 0.0;
    }
    let p0 = w0 / total;
    let p1 = w1 / total;
    1.0 - p0 * p0 - p1 * p1
}

/// Best split found for one node
struct Split {
    feature: usize,
    threshold: f64,
    /// Weighted child impurity `Wl*gini_l + Wr*gini_r`
    child_score: f64,
}

struct TreeBuilder<'a> {
    features: &'a [[f64; FEATURE_COUNT]],
    labels: &'a [u8],
    class_weights: [f64; 2],
    params: &'a TrainParams,
    importances: &'a mut [f64; FEATURE_COUNT],
    rng: &'a mut Lcg64,
}

impl TreeBuilder<'_> {
    /// Recursively grow the tree; returns the index of the created node
    fn build(&mut self, indices: Vec<usize>, depth: usize, nodes: &mut Vec<Node>) -> usize {
        let (w0, w1) = self.weighted_counts(&indices);
        let node_impurity = gini(w0, w1);

        if depth >= self.params.max_depth
            || indices.len() < self.params.min_samples_split
            || node_impurity == 0.0
        {
            return push_leaf(nodes, majority(w0, w1));
        }

        let split = match self.best_split(&indices) {
            Some(split) => split,
            None => return push_leaf(nodes, majority(w0, w1)),
        };

        self.importances[split.feature] += (w0 + w1) * node_impurity - split.child_score;

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.features[i][split.feature] <= split.threshold);

        // Reserve the split slot before the children claim indices
        let node_index = nodes.len();
        nodes.push(Node::Leaf { class: 0 });
        let left = self.build(left_indices, depth + 1, nodes);
        let right = self.build(right_indices, depth + 1, nodes);
        nodes[node_index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_index
    }

    fn weighted_counts(&self, indices: &[usize]) -> (f64, f64) {
        let mut w0 = 0.0;
        let mut w1 = 0.0;
        for &i in indices {
            match self.labels[i] {
                0 => w0 += self.class_weights[0],
                _ => w1 += self.class_weights[1],
            }
        }
        (w0, w1)
    }

    /// Search a random feature subset for the lowest weighted child
    /// impurity; None when no feature offers a usable threshold
    fn best_split(&mut self, indices: &[usize]) -> Option<Split> {
        let mut candidates: [usize; FEATURE_COUNT] = [0, 1, 2, 3, 4];
        self.rng.shuffle(&mut candidates);
        let subset_size = (FEATURE_COUNT as f64).sqrt() as usize;

        let mut best: Option<Split> = None;
        let (total_w0, total_w1) = self.weighted_counts(indices);

        for &feature in candidates.iter().take(subset_size) {
            let mut order: Vec<usize> = indices.to_vec();
            order.sort_by(|&a, &b| {
                self.features[a][feature]
                    .partial_cmp(&self.features[b][feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut left_w0 = 0.0;
            let mut left_w1 = 0.0;

            for pair in 0..order.len().saturating_sub(1) {
                let i = order[pair];
                match self.labels[i] {
                    0 => left_w0 += self.class_weights[0],
                    _ => left_w1 += self.class_weights[1],
                }

                let value = self.features[i][feature];
                let next_value = self.features[order[pair + 1]][feature];
                if next_value <= value {
                    continue;
                }

                let threshold = (value + next_value) / 2.0;
                let right_w0 = total_w0 - left_w0;
                let right_w1 = total_w1 - left_w1;
                let child_score = (left_w0 + left_w1) * gini(left_w0, left_w1)
                    + (right_w0 + right_w1) * gini(right_w0, right_w1);

                if best
                    .as_ref()
                    .map(|b| child_score < b.child_score)
                    .unwrap_or(true)
                {
                    best = Some(Split {
                        feature,
                        threshold,
                        child_score,
                    });
                }
            }
        }

        best
    }
}

fn push_leaf(nodes: &mut Vec<Node>, class: u8) -> usize {
    let index = nodes.len();
    nodes.push(Node::Leaf { class });
    index
}

fn majority(w0: f64, w1: f64) -> u8 {
    u8::from(w1 > w0)
}
