//! Alignment of compositor inputs.

use sat_common::DataArray;
use tracing::debug;

use crate::error::{CompositorError, Result};

/// Check that `arrays` share one grid and return copies ready for arithmetic.
///
/// Every array must have the same dimension labels in the same order, the
/// same shape, and identical values for any dimension coordinate they have
/// in common. Auxiliary coordinates are dropped from the returned arrays so
/// they do not leak into derived products.
pub fn match_data_arrays(arrays: &[DataArray]) -> Result<Vec<DataArray>> {
    let Some(reference) = arrays.first() else {
        return Ok(Vec::new());
    };

    for (index, array) in arrays.iter().enumerate().skip(1) {
        if array.dims() != reference.dims() {
            return Err(CompositorError::incompatible_areas(format!(
                "input {} has dims {:?}, expected {:?}",
                index,
                array.dims(),
                reference.dims()
            )));
        }
        if array.shape() != reference.shape() {
            return Err(CompositorError::incompatible_areas(format!(
                "input {} has shape {:?}, expected {:?}",
                index,
                array.shape(),
                reference.shape()
            )));
        }
        for dim in reference.dims() {
            if let (Some(a), Some(b)) = (reference.coords().get(dim), array.coords().get(dim)) {
                if a != b {
                    return Err(CompositorError::incompatible_areas(format!(
                        "input {} has different '{}' coordinates",
                        index, dim
                    )));
                }
            }
        }
    }

    debug!(
        count = arrays.len(),
        shape = ?reference.shape(),
        "Matched data arrays"
    );

    Ok(arrays
        .iter()
        .map(|array| array.clone().drop_aux_coords())
        .collect())
}
