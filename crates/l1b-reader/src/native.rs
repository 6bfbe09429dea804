//! Loading NetCDF files into in-memory datasets using the netcdf library.
//!
//! Every numeric variable is read into a [`DataArray`] labeled with its
//! NetCDF dimension names. Packed variables are unpacked on the way in:
//! `_FillValue`/`missing_value` become NaN and `scale_factor`/`add_offset`
//! are applied, after which those encoding attributes are removed.

use std::path::Path;
use std::sync::Once;

use sat_common::{AttrValue, Attributes, DataArray, Dataset};
use tracing::{debug, info, warn};

use crate::error::{L1bError, L1bResult};

/// Attributes consumed by mask-and-scale.
const ENCODING_ATTRS: [&str; 4] = ["_FillValue", "missing_value", "scale_factor", "add_offset"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics even when errors are handled
/// by the caller, e.g. when a read is retried with another element type.
/// Call early, before any HDF5/NetCDF operation. Safe to call repeatedly.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read a whole NetCDF file into a [`Dataset`].
///
/// Non-numeric variables are skipped with a warning.
pub fn load_dataset(path: &Path) -> L1bResult<Dataset> {
    silence_hdf5_errors();

    let file = netcdf::open(path)?;
    let mut dataset = Dataset::new();

    for attr in file.attributes() {
        if let Some(value) = attr.value().ok().and_then(convert_attribute) {
            dataset.attrs_mut().insert(attr.name().to_string(), value);
        }
    }

    for var in file.variables() {
        let name = var.name();
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let Some(raw) = read_values(&var) else {
            warn!(variable = %name, "Skipping non-numeric variable");
            continue;
        };

        let attrs = variable_attributes(&var);
        let (values, attrs) = mask_and_scale(raw, attrs);

        let array = DataArray::from_shape_vec(&shape, values, dims)
            .map_err(|e| L1bError::InvalidFormat(format!("variable {}: {}", name, e)))?
            .with_attrs(attrs);

        debug!(variable = %name, dims = ?array.dims(), shape = ?array.shape(), "Loaded variable");
        dataset.insert_variable(name, array);
    }

    info!(
        path = %path.display(),
        variables = dataset.variable_names().count(),
        "Loaded NetCDF dataset"
    );

    Ok(dataset)
}

/// Read all values of a variable as `f64`, trying the common numeric types.
fn read_values(var: &netcdf::Variable) -> Option<Vec<f64>> {
    macro_rules! read_as {
        ($t:ty) => {
            if let Ok(values) = var.get_values::<$t, _>(..) {
                return Some(values.into_iter().map(|v| v as f64).collect());
            }
        };
    }

    read_as!(f64);
    read_as!(f32);
    read_as!(i32);
    read_as!(i16);
    read_as!(i8);
    read_as!(u8);
    read_as!(u16);
    read_as!(u32);
    read_as!(i64);
    read_as!(u64);
    None
}

fn variable_attributes(var: &netcdf::Variable) -> Attributes {
    var.attributes()
        .filter_map(|attr| {
            let value = attr.value().ok().and_then(convert_attribute)?;
            Some((attr.name().to_string(), value))
        })
        .collect()
}

/// Map a NetCDF attribute onto an [`AttrValue`].
///
/// Single-element numeric attributes become scalars. Byte strings and other
/// exotic types are dropped.
pub fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttrValue> {
    use netcdf::AttributeValue as Nc;

    let scalar_or_list = |values: Vec<f64>| match values.as_slice() {
        [single] => AttrValue::Float(*single),
        _ => AttrValue::FloatList(values),
    };

    let converted = match value {
        Nc::Str(s) => AttrValue::Str(s),
        Nc::Strs(s) => AttrValue::StrList(s),
        Nc::Double(v) => AttrValue::Float(v),
        Nc::Doubles(v) => scalar_or_list(v),
        Nc::Float(v) => AttrValue::Float(v as f64),
        Nc::Floats(v) => scalar_or_list(v.into_iter().map(f64::from).collect()),
        Nc::Longlong(v) => AttrValue::Int(v),
        Nc::Int(v) => AttrValue::Int(v as i64),
        Nc::Short(v) => AttrValue::Int(v as i64),
        Nc::Schar(v) => AttrValue::Int(v as i64),
        Nc::Uchar(v) => AttrValue::Int(v as i64),
        Nc::Ushort(v) => AttrValue::Int(v as i64),
        Nc::Uint(v) => AttrValue::Int(v as i64),
        Nc::Ints(v) => scalar_or_list(v.into_iter().map(f64::from).collect()),
        Nc::Shorts(v) => scalar_or_list(v.into_iter().map(f64::from).collect()),
        _ => return None,
    };
    Some(converted)
}

/// Apply CF packing attributes and strip them from `attrs`.
fn mask_and_scale(mut values: Vec<f64>, mut attrs: Attributes) -> (Vec<f64>, Attributes) {
    let fill = attrs
        .get("_FillValue")
        .or_else(|| attrs.get("missing_value"))
        .and_then(AttrValue::as_f64);
    let scale = attrs.get("scale_factor").and_then(AttrValue::as_f64);
    let offset = attrs.get("add_offset").and_then(AttrValue::as_f64);

    if fill.is_some() || scale.is_some() || offset.is_some() {
        let scale = scale.unwrap_or(1.0);
        let offset = offset.unwrap_or(0.0);
        for value in values.iter_mut() {
            *value = if Some(*value) == fill {
                f64::NAN
            } else {
                *value * scale + offset
            };
        }
    }

    for key in ENCODING_ATTRS {
        attrs.remove(key);
    }
    (values, attrs)
}
