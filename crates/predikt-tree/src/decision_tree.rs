use predikt_core::{Matrix, PrediktError, PrediktResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A node in the decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
enum TreeNode {
    /// Internal node: rows with `x[feature_idx] <= threshold` go left.
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Leaf: mean target of the training rows that reached it.
    Leaf { value: f64 },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

/// Best split found for one feature.
struct Candidate {
    cost: f64,
    feature: usize,
    threshold: f64,
}

/// Decision Tree Regressor using CART (MSE criterion).
///
/// Split search sorts each feature once per node and scans prefix sums, and
/// features are searched in parallel. Ties between features go to the lower
/// index, so a fit is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    n_features: usize,
    tree: Option<TreeNode>,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new(10, 2, 1)
    }
}

impl DecisionTreeRegressor {
    pub fn new(max_depth: usize, min_samples_split: usize, min_samples_leaf: usize) -> Self {
        DecisionTreeRegressor {
            max_depth,
            min_samples_split: min_samples_split.max(2),
            min_samples_leaf: min_samples_leaf.max(1),
            n_features: 0,
            tree: None,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(max_depth, 2, 1)
    }

    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> PrediktResult<()> {
        let n = x.rows();
        if n == 0 {
            return Err(PrediktError::EmptyInput("cannot fit on 0 samples".into()));
        }
        if n != y.len() {
            return Err(PrediktError::DimensionMismatch(format!(
                "X has {} rows but y has {} elements",
                n,
                y.len()
            )));
        }
        let indices: Vec<usize> = (0..n).collect();
        self.n_features = x.cols();
        self.tree = Some(self.build_tree(x, y, indices, 0));
        Ok(())
    }

    fn build_tree(&self, x: &Matrix, y: &[f64], indices: Vec<usize>, depth: usize) -> TreeNode {
        let n = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;

        if depth >= self.max_depth || n < self.min_samples_split {
            return TreeNode::Leaf { value: mean };
        }
        let first = y[indices[0]];
        if indices.iter().all(|&i| y[i] == first) {
            return TreeNode::Leaf { value: mean };
        }

        let Some(best) = self.best_split(x, y, &indices) else {
            return TreeNode::Leaf { value: mean };
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x.row(i)[best.feature] <= best.threshold);

        TreeNode::Split {
            feature_idx: best.feature,
            threshold: best.threshold,
            left: Box::new(self.build_tree(x, y, left, depth + 1)),
            right: Box::new(self.build_tree(x, y, right, depth + 1)),
        }
    }

    fn best_split(&self, x: &Matrix, y: &[f64], indices: &[usize]) -> Option<Candidate> {
        (0..x.cols())
            .into_par_iter()
            .filter_map(|feature| self.best_split_for_feature(x, y, indices, feature))
            .min_by(|a, b| a.cost.total_cmp(&b.cost).then(a.feature.cmp(&b.feature)))
    }

    /// Scan every boundary between distinct sorted values; the cost of a
    /// split is the summed squared error of both sides.
    fn best_split_for_feature(
        &self,
        x: &Matrix,
        y: &[f64],
        indices: &[usize],
        feature: usize,
    ) -> Option<Candidate> {
        let mut pairs: Vec<(f64, f64)> = indices.iter().map(|&i| (x.row(i)[feature], y[i])).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = pairs.len();
        let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
        let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut best: Option<Candidate> = None;

        for k in 1..n {
            let yv = pairs[k - 1].1;
            left_sum += yv;
            left_sq += yv * yv;

            let (lo, hi) = (pairs[k - 1].0, pairs[k].0);
            if lo == hi || k < self.min_samples_leaf || n - k < self.min_samples_leaf {
                continue;
            }

            let nl = k as f64;
            let nr = (n - k) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let cost = (left_sq - left_sum * left_sum / nl) + (right_sq - right_sum * right_sum / nr);

            if best.as_ref().map_or(true, |b| cost < b.cost) {
                let mut threshold = (lo + hi) / 2.0;
                if threshold == hi {
                    threshold = lo;
                }
                best = Some(Candidate {
                    cost,
                    feature,
                    threshold,
                });
            }
        }
        best
    }

    pub fn predict(&self, x: &Matrix) -> PrediktResult<Vec<f64>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or(PrediktError::NotFitted("DecisionTreeRegressor"))?;
        if x.cols() != self.n_features {
            return Err(PrediktError::DimensionMismatch(format!(
                "tree was fitted on {} features, got {}",
                self.n_features,
                x.cols()
            )));
        }
        Ok(x.iter_rows().map(|row| traverse(tree, row)).collect())
    }

    /// Depth of the fitted tree (a lone leaf has depth 0).
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::n_leaves)
    }
}

fn traverse(node: &TreeNode, row: &[f64]) -> f64 {
    let mut node = node;
    loop {
        match node {
            TreeNode::Leaf { value } => return *value,
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                node = if row[*feature_idx] <= *threshold {
                    left.as_ref()
                } else {
                    right.as_ref()
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_decision_tree_regressor() {
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
        let y = [2.0, 4.0, 6.0, 8.0];

        let mut tree = DecisionTreeRegressor::new(10, 2, 1);
        tree.fit(&x, &y).unwrap();
        let pred = tree.predict(&x).unwrap();

        for (p, t) in pred.iter().zip(&y) {
            assert_abs_diff_eq!(p, t, epsilon = 1e-12);
        }
        assert_eq!(tree.n_leaves(), Some(4));
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let rows: Vec<Vec<f64>> = (0..32).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..32).map(|i| (i * i) as f64).collect();
        let x = Matrix::from_rows(&rows).unwrap();

        let mut stump = DecisionTreeRegressor::with_max_depth(1);
        stump.fit(&x, &y).unwrap();
        assert_eq!(stump.depth(), Some(1));
        assert_eq!(stump.n_leaves(), Some(2));

        let mut deep = DecisionTreeRegressor::with_max_depth(3);
        deep.fit(&x, &y).unwrap();
        assert!(deep.depth().unwrap() <= 3);
    }

    #[test]
    fn test_picks_informative_feature() {
        // Column 1 is noise, column 0 decides the target
        let x = Matrix::from_rows(&[
            vec![0.0, 5.0],
            vec![0.0, 1.0],
            vec![1.0, 4.0],
            vec![1.0, 2.0],
        ])
        .unwrap();
        let y = [10.0, 10.0, 20.0, 20.0];
        let mut tree = DecisionTreeRegressor::with_max_depth(1);
        tree.fit(&x, &y).unwrap();
        let pred = tree.predict(&Matrix::from_row(&[1.0, 100.0])).unwrap();
        assert_abs_diff_eq!(pred[0], 20.0);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = Matrix::from_rows(&[vec![0.0], vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let y = [100.0, 0.0, 0.0, 0.0];
        let mut tree = DecisionTreeRegressor::new(10, 2, 2);
        tree.fit(&x, &y).unwrap();
        // The lone outlier cannot be isolated into its own leaf
        assert_eq!(tree.n_leaves(), Some(2));
    }

    #[test]
    fn test_serde_round_trip_predicts_identically() {
        let x = Matrix::from_rows(&[vec![1.0, 0.0], vec![2.0, 1.0], vec![3.0, 0.0]]).unwrap();
        let y = [1.0, 5.0, 2.0];
        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&x, &y).unwrap();

        let json = serde_json::to_string(&tree).unwrap();
        let back: DecisionTreeRegressor = serde_json::from_str(&json).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), back.predict(&x).unwrap());
    }

    #[test]
    fn test_unfitted_and_wrong_width() {
        let tree = DecisionTreeRegressor::default();
        assert!(tree.predict(&Matrix::from_row(&[1.0])).is_err());

        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&Matrix::from_rows(&[vec![1.0], vec![2.0]]).unwrap(), &[1.0, 2.0]).unwrap();
        assert!(tree.predict(&Matrix::from_row(&[1.0, 2.0])).is_err());
    }
}
