//! CART regression tree.
//!
//! Nodes are split on the threshold that minimises the summed squared error
//! of the two children. Candidate thresholds are midpoints between distinct
//! consecutive feature values, found with a single sorted sweep per feature
//! using running sums, so a node costs `O(n log n)` per feature.

use crate::dataset::FeatureMatrix;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Nodes whose variance falls below this are treated as pure.
const IMPURITY_EPSILON: f64 = 1e-12;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth (root is depth 0); `None` means unlimited.
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples in each child.
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a flat node arena (root at index 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    feature_importances: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    n_left: usize,
    sse_left: f64,
    sse_right: f64,
}

struct TreeBuilder<'a> {
    x: &'a FeatureMatrix,
    y: &'a [f64],
    params: TreeParams,
    rng: &'a mut ChaCha8Rng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl RegressionTree {
    /// Grow a tree on the rows of `x`/`y` listed in `sample` (duplicates allowed,
    /// which is how bootstrap weights are expressed).
    pub fn fit(
        x: &FeatureMatrix,
        y: &[f64],
        sample: &[usize],
        params: TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            y,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; x.n_features()],
        };

        let mut indices = sample.to_vec();
        builder.build(&mut indices, 0);

        let mut feature_importances = builder.importances;
        let total: f64 = feature_importances.iter().sum();
        if total > 0.0 {
            for imp in &mut feature_importances {
                *imp /= total;
            }
        }

        Self {
            nodes: builder.nodes,
            feature_importances,
        }
    }

    /// Predict a single sample.
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Normalised impurity-decrease importances (sum to 1 unless the tree is a single leaf).
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }
}

impl TreeBuilder<'_> {
    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let (sum, sum_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let v = self.y[i];
            (s + v, sq + v * v)
        });
        let mean = sum / n as f64;
        let sse = (sum_sq - sum * sum / n as f64).max(0.0);

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
            || sse / n as f64 <= IMPURITY_EPSILON
        {
            return self.push(Node::Leaf { value: mean });
        }

        let Some(best) = self.find_best_split(indices, sum, sum_sq) else {
            return self.push(Node::Leaf { value: mean });
        };

        self.importances[best.feature] += sse - (best.sse_left + best.sse_right);

        let feature = best.feature;
        indices.sort_by(|&a, &b| {
            self.x.rows[a][feature].total_cmp(&self.x.rows[b][feature])
        });
        let node_idx = self.push(Node::Leaf { value: mean });
        let (left_part, right_part) = indices.split_at_mut(best.n_left);
        let left = self.build(left_part, depth + 1);
        let right = self.build(right_part, depth + 1);

        self.nodes[node_idx] = Node::Split {
            feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_idx
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn find_best_split(&mut self, indices: &[usize], sum: f64, sum_sq: f64) -> Option<BestSplit> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;

        let mut features: Vec<usize> = (0..self.x.n_features()).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<BestSplit> = None;
        let mut best_sse = f64::INFINITY;

        for feature in features {
            let mut pairs: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (self.x.rows[i][feature], self.y[i]))
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let (value, target) = pairs[pos];
                left_sum += target;
                left_sq += target * target;

                let next_value = pairs[pos + 1].0;
                if value == next_value {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let sse_left = (left_sq - left_sum * left_sum / n_left as f64).max(0.0);
                let right_sum = sum - left_sum;
                let sse_right =
                    ((sum_sq - left_sq) - right_sum * right_sum / n_right as f64).max(0.0);

                if sse_left + sse_right < best_sse {
                    let mut threshold = value + (next_value - value) / 2.0;
                    if threshold >= next_value {
                        threshold = value;
                    }
                    best_sse = sse_left + sse_right;
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        n_left,
                        sse_left,
                        sse_right,
                    });
                }
            }
        }

        best
    }
}
