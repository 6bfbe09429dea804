//! Synthetic channel arrays with predictable values.

use sat_common::attrs::keys;
use sat_common::DataArray;

/// A `(y, x)` channel filled with `value` and named `name`.
///
/// ```
/// use test_utils::constant_channel;
///
/// let b02 = constant_channel("B02", (2, 3), 10.0);
/// assert_eq!(b02.shape(), &[2, 3]);
/// assert_eq!(b02.attrs()["name"].as_str(), Some("B02"));
/// ```
pub fn constant_channel(name: &str, shape: (usize, usize), value: f64) -> DataArray {
    let mut channel = DataArray::full(&[shape.0, shape.1], value, ["y", "x"])
        .expect("shape and labels agree");
    channel
        .attrs_mut()
        .insert(keys::NAME.to_string(), name.into());
    channel
}

/// A `(y, x)` channel from explicit row-major values.
pub fn channel_from_values(name: &str, shape: (usize, usize), values: Vec<f64>) -> DataArray {
    let mut channel = DataArray::from_shape_vec(&[shape.0, shape.1], values, ["y", "x"])
        .expect("values fill the shape");
    channel
        .attrs_mut()
        .insert(keys::NAME.to_string(), name.into());
    channel
}

/// Row-major ramp where each value is `row * 1000 + col`.
pub fn ramp_channel(name: &str, shape: (usize, usize)) -> DataArray {
    let values = (0..shape.0)
        .flat_map(|row| (0..shape.1).map(move |col| (row * 1000 + col) as f64))
        .collect();
    channel_from_values(name, shape, values)
}
