use ndarray::{Array1, Array2, ArrayView2};

use crate::{ArtifactErr, Result};

/// A pre-fit transform that normalizes numeric feature columns.
pub trait Scaler: Send + Sync {
    /// Returns the number of columns this scaler was fit against.
    fn width(&self) -> usize;

    /// Transforms every row of `x` column by column.
    ///
    /// # Arguments
    /// * `x` - A `(n_samples, width)` matrix.
    ///
    /// # Returns
    /// The transformed matrix or a shape error if `x` has the wrong width.
    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>>;
}

/// Zero mean, unit variance standardization.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Creates a new `StandardScaler`.
    ///
    /// # Arguments
    /// * `mean` - The per column mean seen during fitting.
    /// * `scale` - The per column standard deviation seen during fitting.
    ///
    /// # Returns
    /// A new `StandardScaler` or an error if the parameters are inconsistent.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        check_params("mean", &mean, "scale", &scale)?;
        if let Some(i) = scale.iter().position(|&s| s == 0.0) {
            return Err(ArtifactErr::InvalidScaler(format!("scale[{i}] is zero")));
        }

        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_width(x, self.width())?;
        Ok((&x - &self.mean) / &self.scale)
    }
}

/// Rescaling of each column into the range seen during fitting.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Array1<f64>,
    scale: Array1<f64>,
}

impl MinMaxScaler {
    /// Creates a new `MinMaxScaler`.
    ///
    /// # Arguments
    /// * `min` - The per column offset applied after scaling.
    /// * `scale` - The per column factor.
    ///
    /// # Returns
    /// A new `MinMaxScaler` or an error if the parameters are inconsistent.
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        check_params("min", &min, "scale", &scale)?;
        Ok(Self {
            min: Array1::from(min),
            scale: Array1::from(scale),
        })
    }
}

impl Scaler for MinMaxScaler {
    fn width(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_width(x, self.width())?;
        Ok(&x * &self.scale + &self.min)
    }
}

/// Any of the scalers an artifact file can describe.
#[derive(Debug, Clone)]
pub enum AnyScaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl Scaler for AnyScaler {
    fn width(&self) -> usize {
        match self {
            AnyScaler::Standard(s) => s.width(),
            AnyScaler::MinMax(s) => s.width(),
        }
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        match self {
            AnyScaler::Standard(s) => s.transform(x),
            AnyScaler::MinMax(s) => s.transform(x),
        }
    }
}

fn check_params(a_name: &str, a: &[f64], b_name: &str, b: &[f64]) -> Result<()> {
    if a.is_empty() {
        return Err(ArtifactErr::InvalidScaler(format!("{a_name} is empty")));
    }
    if a.len() != b.len() {
        return Err(ArtifactErr::InvalidScaler(format!(
            "{a_name} has {} columns but {b_name} has {}",
            a.len(),
            b.len()
        )));
    }
    for (name, values) in [(a_name, a), (b_name, b)] {
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ArtifactErr::InvalidScaler(format!("{name}[{i}] is not finite")));
        }
    }
    Ok(())
}

fn check_width(x: ArrayView2<f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(ArtifactErr::ShapeMismatch {
            what: "scaler input",
            got: x.ncols(),
            expected,
        });
    }
    Ok(())
}
