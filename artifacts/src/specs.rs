use serde::{Deserialize, Serialize};

/// The serialized form of a fitted feature scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerSpec {
    /// `x' = (x - mean) / scale`, one entry per column.
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x' = x * scale + min`, one entry per column.
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// The serialized form of a fitted regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressorSpec {
    RandomForest {
        n_features: usize,
        trees: Vec<TreeSpec>,
    },
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

/// A single regression tree in parallel-array layout.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise it splits on
/// `feature[i]` at `threshold[i]`. Only leaves read `value[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl TreeSpec {
    /// Marker stored in the children arrays of a leaf node.
    pub const LEAF: i64 = -1;

    /// Returns the number of nodes described by this tree.
    ///
    /// # Returns
    /// The length of `children_left`; the other arrays are checked against it when built.
    pub(crate) fn len(&self) -> usize {
        self.children_left.len()
    }
}
