use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use super::{Regressor, check_width};
use crate::{ArtifactErr, Result, specs::TreeSpec};

/// A node in a regression tree.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    /// Go to `left` when `x[feature] <= threshold`, to `right` otherwise.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// A single regression tree stored as a flat node list rooted at index 0.
///
/// Every child index is strictly greater than its parent's, so a descent
/// always terminates at a leaf.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Builds a tree from its parallel-array layout.
    ///
    /// # Arguments
    /// * `spec` - The serialized tree.
    /// * `n_features` - The width of the rows this tree will be evaluated on.
    ///
    /// # Returns
    /// A new `DecisionTree` or an error describing the first inconsistency found.
    pub fn from_spec(spec: &TreeSpec, n_features: usize) -> Result<Self> {
        let n = spec.len();
        if n == 0 {
            return Err(ArtifactErr::InvalidModel("tree has no nodes".into()));
        }

        for (name, len) in [
            ("children_right", spec.children_right.len()),
            ("feature", spec.feature.len()),
            ("threshold", spec.threshold.len()),
            ("value", spec.value.len()),
        ] {
            if len != n {
                return Err(ArtifactErr::InvalidModel(format!(
                    "tree has {n} nodes but {name} has {len} entries"
                )));
            }
        }

        let nodes = (0..n)
            .map(|i| Self::node_from_spec(spec, i, n_features))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { nodes })
    }

    fn node_from_spec(spec: &TreeSpec, i: usize, n_features: usize) -> Result<Node> {
        let (left, right) = (spec.children_left[i], spec.children_right[i]);

        if left == TreeSpec::LEAF || right == TreeSpec::LEAF {
            if left != right {
                return Err(ArtifactErr::InvalidModel(format!("node {i} has only one child")));
            }
            let value = spec.value[i];
            if !value.is_finite() {
                return Err(ArtifactErr::InvalidModel(format!("leaf {i} value is not finite")));
            }
            return Ok(Node::Leaf(value));
        }

        let child = |c: i64| -> Result<usize> {
            match usize::try_from(c) {
                Ok(c) if c > i && c < spec.len() => Ok(c),
                _ => Err(ArtifactErr::InvalidModel(format!(
                    "node {i} has invalid child index {c}"
                ))),
            }
        };

        let feature = match usize::try_from(spec.feature[i]) {
            Ok(f) if f < n_features => f,
            _ => {
                return Err(ArtifactErr::InvalidModel(format!(
                    "node {i} splits on feature {} but the model has {n_features}",
                    spec.feature[i]
                )));
            }
        };

        let threshold = spec.threshold[i];
        if threshold.is_nan() {
            return Err(ArtifactErr::InvalidModel(format!("node {i} threshold is NaN")));
        }

        Ok(Node::Split {
            feature,
            threshold,
            left: child(left)?,
            right: child(right)?,
        })
    }

    /// Descends from the root to the leaf selected by `row`.
    ///
    /// # Arguments
    /// * `row` - A single feature row, at least as wide as every split feature.
    ///
    /// # Returns
    /// The value of the reached leaf.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Inputs are compared in single precision, as the trees were fit.
                    let x = row[feature] as f32 as f64;
                    i = if x <= threshold { left } else { right };
                }
            }
        }
    }
}

/// An averaging ensemble of regression trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Creates a new `RandomForest`.
    ///
    /// # Arguments
    /// * `n_features` - The width of the rows the forest was trained on.
    /// * `trees` - The serialized trees.
    ///
    /// # Returns
    /// A new `RandomForest` or an error if any tree is inconsistent.
    pub fn new(n_features: usize, trees: &[TreeSpec]) -> Result<Self> {
        if n_features == 0 {
            return Err(ArtifactErr::InvalidModel(
                "forest must have at least one feature".into(),
            ));
        }
        if trees.is_empty() {
            return Err(ArtifactErr::InvalidModel(
                "forest must have at least one tree".into(),
            ));
        }

        let trees = trees
            .iter()
            .enumerate()
            .map(|(t, spec)| {
                DecisionTree::from_spec(spec, n_features).map_err(|e| match e {
                    ArtifactErr::InvalidModel(msg) => {
                        ArtifactErr::InvalidModel(format!("tree {t}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { n_features, trees })
    }

    /// Returns the number of trees in the ensemble.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Regressor for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_width(x, self.n_features)?;

        let ntrees = self.trees.len() as f64;
        let y = x
            .axis_iter(Axis(0))
            .map(|row| {
                let sum: f64 = self.trees.iter().map(|tree| tree.predict_row(row)).sum();
                sum / ntrees
            })
            .collect();

        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    /// x[0] <= 0.5 ? (x[1] <= 2.0 ? 1.0 : 2.0) : 3.0
    fn stump() -> TreeSpec {
        TreeSpec {
            children_left: vec![1, 2, -1, -1, -1],
            children_right: vec![4, 3, -1, -1, -1],
            feature: vec![0, 1, -2, -2, -2],
            threshold: vec![0.5, 2.0, -2.0, -2.0, -2.0],
            value: vec![0.0, 0.0, 1.0, 2.0, 3.0],
        }
    }

    #[test]
    fn tree_descends_left_on_equal_threshold() {
        let tree = DecisionTree::from_spec(&stump(), 2).unwrap();

        assert_eq!(tree.predict_row(array![0.5, 2.0].view()), 1.0);
        assert_eq!(tree.predict_row(array![0.5, 2.1].view()), 2.0);
        assert_eq!(tree.predict_row(array![0.6, 0.0].view()), 3.0);
    }

    #[test]
    fn tree_compares_in_single_precision() {
        let mut spec = stump();
        spec.threshold[0] = 0.7_f32 as f64;
        let tree = DecisionTree::from_spec(&spec, 2).unwrap();

        // 0.7_f64 is above the f32 threshold but rounds onto it.
        assert!(0.7_f64 > 0.7_f32 as f64);
        assert_eq!(tree.predict_row(array![0.7, 0.0].view()), 1.0);
    }

    #[test]
    fn forest_averages_its_trees() {
        let mut other = stump();
        other.value = vec![0.0, 0.0, 5.0, 6.0, 7.0];
        let forest = RandomForest::new(2, &[stump(), other]).unwrap();

        let y = forest.predict(array![[0.0, 0.0], [1.0, 0.0]].view()).unwrap();

        assert_eq!(forest.len(), 2);
        assert!(!forest.is_empty());
        assert_eq!(y, array![3.0, 5.0]);
    }

    #[test]
    fn forest_rejects_wrong_width() {
        let forest = RandomForest::new(2, &[stump()]).unwrap();
        assert!(forest.predict(array![[0.0, 0.0, 0.0]].view()).is_err());
    }

    #[test]
    fn cyclic_child_is_rejected() {
        let mut spec = stump();
        spec.children_left[1] = 0;
        assert!(matches!(DecisionTree::from_spec(&spec, 2), Err(ArtifactErr::InvalidModel(_))));
    }

    #[test]
    fn out_of_bounds_child_is_rejected() {
        let mut spec = stump();
        spec.children_right[0] = 9;
        assert!(DecisionTree::from_spec(&spec, 2).is_err());
    }

    #[test]
    fn split_feature_must_fit_the_row() {
        assert!(DecisionTree::from_spec(&stump(), 1).is_err());
    }

    #[test]
    fn ragged_arrays_are_rejected() {
        let mut spec = stump();
        spec.value.pop();
        assert!(DecisionTree::from_spec(&spec, 2).is_err());
    }

    #[test]
    fn empty_forest_is_rejected() {
        assert!(RandomForest::new(2, &[]).is_err());
    }

    #[test]
    fn error_names_the_failing_tree() {
        let mut bad = stump();
        bad.children_left[0] = -1;
        let err = RandomForest::new(2, &[stump(), bad]).unwrap_err();
        assert!(err.to_string().contains("tree 1"));
    }
}
