//! Min-max scaling fitted on the reference dataset

use ndarray::{ArrayView2, Axis};

use super::PipelineError;

/// Per-column bounds. Rebuilt for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    pub min_vals: Vec<f64>,
    pub max_vals: Vec<f64>,
}

impl MinMaxScaler {
    /// Fit on each column, ignoring NaN cells
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self, PipelineError> {
        let mut min_vals = Vec::with_capacity(data.ncols());
        let mut max_vals = Vec::with_capacity(data.ncols());

        for (col, column) in data.axis_iter(Axis(1)).enumerate() {
            let (min, max) = column
                .iter()
                .filter(|v| !v.is_nan())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });

            if !min.is_finite() || !max.is_finite() {
                return Err(PipelineError::DataAccess(format!(
                    "Reference column {} has no finite values",
                    col + 1
                )));
            }

            min_vals.push(min);
            max_vals.push(max);
        }

        Ok(Self { min_vals, max_vals })
    }

    pub fn n_features(&self) -> usize {
        self.min_vals.len()
    }

    /// Map values into the fitted range. Out-of-range input is extrapolated.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, PipelineError> {
        if let Some(msg) = self.width_mismatch(values.len(), "input") {
            return Err(PipelineError::Validation(msg));
        }

        Ok(values
            .iter()
            .enumerate()
            .map(|(i, v)| (v - self.min_vals[i]) / self.scale(i))
            .collect())
    }

    /// Undo `transform`
    pub fn inverse_transform(&self, values: &[f64]) -> Result<Vec<f64>, PipelineError> {
        if let Some(msg) = self.width_mismatch(values.len(), "model output") {
            return Err(PipelineError::Inference(msg));
        }

        Ok(values
            .iter()
            .enumerate()
            .map(|(i, v)| v * self.scale(i) + self.min_vals[i])
            .collect())
    }

    // Constant columns keep a unit scale
    fn scale(&self, i: usize) -> f64 {
        let range = self.max_vals[i] - self.min_vals[i];
        if range == 0.0 { 1.0 } else { range }
    }

    fn width_mismatch(&self, len: usize, what: &str) -> Option<String> {
        (len != self.n_features()).then(|| {
            format!("{} has {} values, but the scaler expects {}", what, len, self.n_features())
        })
    }
}
