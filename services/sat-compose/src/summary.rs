//! JSON-friendly summaries of arrays for command output.

use sat_common::{attrs::to_json, DataArray};
use serde::Serialize;

/// Shape and value statistics of one array. Statistics skip NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySummary {
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub valid: usize,
    pub nan_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub attrs: serde_json::Value,
}

impl ArraySummary {
    pub fn of(array: &DataArray) -> Self {
        let mut valid = 0usize;
        let mut nan_count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &value in array.data().iter() {
            if value.is_nan() {
                nan_count += 1;
                continue;
            }
            valid += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        let (min, max, mean) = if valid > 0 {
            (Some(min), Some(max), Some(sum / valid as f64))
        } else {
            (None, None, None)
        };

        Self {
            dims: array.dims().into_iter().map(str::to_string).collect(),
            shape: array.shape().to_vec(),
            valid,
            nan_count,
            min,
            max,
            mean,
            attrs: to_json(array.attrs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_skips_nan() {
        let array =
            DataArray::from_shape_vec(&[2, 2], vec![1.0, f64::NAN, 3.0, 5.0], ["y", "x"]).unwrap();
        let summary = ArraySummary::of(&array);

        assert_eq!(summary.shape, vec![2, 2]);
        assert_eq!(summary.dims, vec!["y", "x"]);
        assert_eq!(summary.valid, 3);
        assert_eq!(summary.nan_count, 1);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(5.0));
        assert_eq!(summary.mean, Some(3.0));
    }

    #[test]
    fn test_summary_all_nan() {
        let array = DataArray::full(&[1, 2], f64::NAN, ["y", "x"]).unwrap();
        let summary = ArraySummary::of(&array);
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.mean, None);
    }
}
