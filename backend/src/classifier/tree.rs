//! Flat-node regression trees used as boosting base learners.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single tree node. Leaves have `feature == -1`; internal nodes route
/// `x[feature] <= threshold` to `left`, otherwise to `right`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub feature: i32,
    pub threshold: f64,
    pub left: i32,
    pub right: i32,
    pub value: f64,
}

impl Node {
    fn leaf(value: f64) -> Self {
        Node {
            feature: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            value,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature < 0
    }
}

/// Growth limits for one tree.
#[derive(Debug, Clone)]
pub(crate) struct GrowParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

/// A regression tree fit on per-sample gradient statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Response for one feature row.
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value;
            }
            idx = if x[node.feature as usize] <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }

    /// Grow a tree on residuals, with Newton-step leaf values.
    ///
    /// `grad` holds the negative gradient (residual) per sample and `hess`
    /// the per-sample curvature; a leaf stores
    /// `scale * sum(grad) / sum(hess)` over its samples.
    pub(crate) fn grow(
        x: &[Vec<f64>],
        grad: &[f64],
        hess: &[f64],
        rows: &[usize],
        scale: f64,
        params: &GrowParams,
    ) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.grow_node(x, grad, hess, rows, scale, params, 0);
        tree
    }

    /// Multiply every leaf value by `factor` (shrinkage).
    pub(crate) fn scale_leaves(&mut self, factor: f64) {
        for node in &mut self.nodes {
            if node.is_leaf() {
                node.value *= factor;
            }
        }
    }

    fn grow_node(
        &mut self,
        x: &[Vec<f64>],
        grad: &[f64],
        hess: &[f64],
        rows: &[usize],
        scale: f64,
        params: &GrowParams,
        depth: usize,
    ) -> usize {
        let idx = self.nodes.len();
        // reserve the slot before recursing so child indices stay stable
        self.nodes.push(Node::leaf(0.0));

        let min_leaf = params.min_samples_leaf.max(1);
        let split = if depth >= params.max_depth || rows.len() < 2 * min_leaf {
            None
        } else {
            best_split(x, grad, rows, min_leaf)
        };

        match split {
            Some(split) => {
                let (left_rows, right_rows) = partition(x, rows, split.feature, split.threshold);
                let left = self.grow_node(x, grad, hess, &left_rows, scale, params, depth + 1);
                let right = self.grow_node(x, grad, hess, &right_rows, scale, params, depth + 1);
                self.nodes[idx] = Node {
                    feature: split.feature as i32,
                    threshold: split.threshold,
                    left: left as i32,
                    right: right as i32,
                    value: 0.0,
                };
            }
            None => {
                self.nodes[idx] = Node::leaf(leaf_value(grad, hess, rows, scale));
            }
        }
        idx
    }
}

fn leaf_value(grad: &[f64], hess: &[f64], rows: &[usize], scale: f64) -> f64 {
    let g: f64 = rows.iter().map(|&i| grad[i]).sum();
    let h: f64 = rows.iter().map(|&i| hess[i]).sum();
    scale * g / h.max(1e-12)
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Exhaustive best split by squared-error gain on the residuals.
fn best_split(x: &[Vec<f64>], grad: &[f64], rows: &[usize], min_leaf: usize) -> Option<Split> {
    let n = rows.len() as f64;
    let total: f64 = rows.iter().map(|&i| grad[i]).sum();
    let parent_score = total * total / n;
    let n_features = x[rows[0]].len();

    let mut best: Option<Split> = None;
    let mut order: Vec<usize> = rows.to_vec();
    for feature in 0..n_features {
        order.sort_by(|&a, &b| {
            x[a][feature]
                .partial_cmp(&x[b][feature])
                .unwrap_or(Ordering::Equal)
        });
        let mut left_sum = 0.0;
        for (k, &i) in order.iter().enumerate().take(order.len() - 1) {
            left_sum += grad[i];
            let n_left = k + 1;
            let n_right = order.len() - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }
            let here = x[i][feature];
            let next = x[order[k + 1]][feature];
            // only between distinct values is there a boundary to cut
            if next <= here {
                continue;
            }
            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / n_left as f64
                + right_sum * right_sum / n_right as f64
                - parent_score;
            if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                best = Some(Split {
                    feature,
                    threshold: (here + next) / 2.0,
                    gain,
                });
            }
        }
    }
    best
}

fn partition(
    x: &[Vec<f64>],
    rows: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &i in rows {
        if x[i][feature] <= threshold {
            left.push(i);
        } else {
            right.push(i);
        }
    }
    (left, right)
}
