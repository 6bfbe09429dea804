//! Labeled N-dimensional arrays.
//!
//! A [`DataArray`] pairs an `ndarray::ArrayD<f64>` with one label per axis,
//! a set of coordinates and an attribute mapping. A coordinate whose name is
//! also a dimension label is a *dimension coordinate*; every other coordinate
//! is auxiliary and may be dropped with [`DataArray::drop_aux_coords`].

use ndarray::{ArrayD, Axis, IxDyn};
use std::collections::BTreeMap;

use crate::attrs::Attributes;
use crate::error::{CommonError, CommonResult};

/// A labeled N-dimensional `f64` array with coordinates and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    data: ArrayD<f64>,
    dims: Vec<String>,
    coords: BTreeMap<String, ArrayD<f64>>,
    attrs: Attributes,
}

impl DataArray {
    /// Create an array from data and one label per axis.
    pub fn new<I, S>(data: ArrayD<f64>, dims: I) -> CommonResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(CommonError::DimensionCount {
                ndim: data.ndim(),
                labels: dims.len(),
            });
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(CommonError::DuplicateDimension(dim.clone()));
            }
        }

        Ok(Self {
            data,
            dims,
            coords: BTreeMap::new(),
            attrs: Attributes::new(),
        })
    }

    /// Create an array from a flat row-major buffer.
    pub fn from_shape_vec<I, S>(shape: &[usize], values: Vec<f64>, dims: I) -> CommonResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(data, dims)
    }

    /// Create an array filled with a single value.
    pub fn full<I, S>(shape: &[usize], value: f64, dims: I) -> CommonResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ArrayD::from_elem(IxDyn(shape), value), dims)
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn dims(&self) -> Vec<&str> {
        self.dims.iter().map(String::as_str).collect()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Replace the attribute mapping.
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn coords(&self) -> &BTreeMap<String, ArrayD<f64>> {
        &self.coords
    }

    /// Attach a coordinate. Scalar coordinates are 0-d arrays.
    pub fn with_coord(mut self, name: impl Into<String>, values: ArrayD<f64>) -> Self {
        self.coords.insert(name.into(), values);
        self
    }

    /// Remove every coordinate that is not a dimension coordinate.
    pub fn drop_aux_coords(mut self) -> Self {
        let dims = &self.dims;
        self.coords.retain(|name, _| dims.contains(name));
        self
    }

    /// Position of a dimension label.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Rename a dimension, carrying its dimension coordinate along.
    ///
    /// Renaming a label that is not present is a no-op.
    pub fn rename_dim(mut self, from: &str, to: &str) -> CommonResult<Self> {
        let Some(axis) = self.axis_of(from) else {
            return Ok(self);
        };
        if from == to {
            return Ok(self);
        }
        if self.axis_of(to).is_some() {
            return Err(CommonError::DuplicateDimension(to.to_string()));
        }

        self.dims[axis] = to.to_string();
        if let Some(coord) = self.coords.remove(from) {
            self.coords.insert(to.to_string(), coord);
        }
        Ok(self)
    }

    /// Reorder axes so the labels follow `order`.
    pub fn transpose(self, order: &[&str]) -> CommonResult<Self> {
        if order.len() != self.ndim() {
            return Err(CommonError::DimensionCount {
                ndim: self.ndim(),
                labels: order.len(),
            });
        }

        let mut permutation = Vec::with_capacity(order.len());
        for dim in order {
            let axis = self
                .axis_of(dim)
                .ok_or_else(|| CommonError::UnknownDimension(dim.to_string()))?;
            if permutation.contains(&axis) {
                return Err(CommonError::DuplicateDimension(dim.to_string()));
            }
            permutation.push(axis);
        }

        let Self {
            data,
            coords,
            attrs,
            ..
        } = self;
        let data = data
            .permuted_axes(permutation)
            .as_standard_layout()
            .into_owned();

        Ok(Self {
            data,
            dims: order.iter().map(|d| d.to_string()).collect(),
            coords,
            attrs,
        })
    }

    /// Select one index along `dim`, removing that dimension.
    ///
    /// Attributes are kept. The dimension coordinate of `dim` is dropped.
    pub fn index_axis(&self, dim: &str, index: usize) -> CommonResult<Self> {
        let axis = self
            .axis_of(dim)
            .ok_or_else(|| CommonError::UnknownDimension(dim.to_string()))?;
        let len = self.data.len_of(Axis(axis));
        if index >= len {
            return Err(CommonError::IndexOutOfBounds {
                dim: dim.to_string(),
                index,
                len,
            });
        }

        let mut dims = self.dims.clone();
        dims.remove(axis);
        let mut coords = self.coords.clone();
        coords.remove(dim);

        Ok(Self {
            data: self.data.index_axis(Axis(axis), index).to_owned(),
            dims,
            coords,
            attrs: self.attrs.clone(),
        })
    }

    /// Build a new array with the same labels, coordinates and attributes
    /// around different data of the same shape.
    pub fn with_data(&self, data: ArrayD<f64>) -> CommonResult<Self> {
        if data.shape() != self.shape() {
            return Err(CommonError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: data.shape().to_vec(),
            });
        }
        Ok(Self {
            data,
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, Array};

    fn ramp(shape: &[usize], dims: &[&str]) -> DataArray {
        let n: usize = shape.iter().product();
        DataArray::from_shape_vec(shape, (0..n).map(|v| v as f64).collect(), dims.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_new_rejects_label_count() {
        let err = DataArray::new(Array::zeros(IxDyn(&[2, 3])), ["y"]).unwrap_err();
        assert!(matches!(err, CommonError::DimensionCount { ndim: 2, labels: 1 }));
    }

    #[test]
    fn test_new_rejects_duplicate_labels() {
        let err = DataArray::new(Array::zeros(IxDyn(&[2, 3])), ["y", "y"]).unwrap_err();
        assert!(matches!(err, CommonError::DuplicateDimension(_)));
    }

    #[test]
    fn test_rename_dim_moves_dimension_coord() {
        let array = ramp(&[2, 3], &["atrack", "xtrack"])
            .with_coord("atrack", ndarray::arr1(&[0.0, 1.0]).into_dyn());
        let renamed = array.rename_dim("atrack", "y").unwrap();
        assert_eq!(renamed.dims(), vec!["y", "xtrack"]);
        assert!(renamed.coords().contains_key("y"));
        assert!(!renamed.coords().contains_key("atrack"));
    }

    #[test]
    fn test_rename_missing_dim_is_noop() {
        let array = ramp(&[2, 3], &["y", "x"]);
        let renamed = array.clone().rename_dim("atrack", "y").unwrap();
        assert_eq!(renamed, array);
    }

    #[test]
    fn test_rename_onto_existing_dim_fails() {
        let array = ramp(&[2, 3], &["y", "x"]);
        assert!(array.rename_dim("x", "y").is_err());
    }

    #[test]
    fn test_transpose_reorders_data() {
        let array = ramp(&[2, 3], &["x", "y"]);
        let transposed = array.transpose(&["y", "x"]).unwrap();
        assert_eq!(transposed.dims(), vec!["y", "x"]);
        assert_eq!(transposed.shape(), &[3, 2]);
        // element (x=1, y=2) moves to (y=2, x=1)
        assert_eq!(transposed.data()[[2, 1]], 5.0);
    }

    #[test]
    fn test_transpose_unknown_dim() {
        let array = ramp(&[2, 3], &["x", "y"]);
        assert!(matches!(
            array.transpose(&["y", "band"]),
            Err(CommonError::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_index_axis_removes_dim() {
        let cube = ramp(&[2, 3, 4], &["atrack", "xtrack", "channel"]);
        let slice = cube.index_axis("channel", 3).unwrap();
        assert_eq!(slice.dims(), vec!["atrack", "xtrack"]);
        assert_eq!(slice.shape(), &[2, 3]);
        assert_eq!(slice.data()[[0, 0]], 3.0);
        assert_eq!(slice.data()[[1, 2]], 23.0);
    }

    #[test]
    fn test_index_axis_out_of_bounds() {
        let cube = ramp(&[2, 3, 4], &["atrack", "xtrack", "channel"]);
        assert!(matches!(
            cube.index_axis("channel", 4),
            Err(CommonError::IndexOutOfBounds { index: 4, len: 4, .. })
        ));
    }

    #[test]
    fn test_drop_aux_coords_keeps_dimension_coords() {
        let array = ramp(&[3], &["y"])
            .with_coord("dummy", arr0(0.0).into_dyn())
            .with_coord("y", ndarray::arr1(&[0.0, 1.0, 2.0]).into_dyn());
        let dropped = array.drop_aux_coords();
        assert!(!dropped.coords().contains_key("dummy"));
        assert!(dropped.coords().contains_key("y"));
    }

    #[test]
    fn test_with_data_checks_shape() {
        let array = ramp(&[2, 3], &["y", "x"]);
        assert!(array.with_data(Array::zeros(IxDyn(&[3, 2]))).is_err());
        assert!(array.with_data(Array::zeros(IxDyn(&[2, 3]))).is_ok());
    }
}
