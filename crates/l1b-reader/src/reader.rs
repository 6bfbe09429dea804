//! ATMS level-1b file adapter.
//!
//! Wraps a loaded [`Dataset`] and hands out channel and geolocation arrays in
//! the common `(y, x)` layout with the file-level metadata merged in.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use sat_common::attrs::keys;
use sat_common::{parse_time_coverage, Attributes, DataArray, Dataset};

use crate::channels::{self, channel_info};
use crate::error::{L1bError, L1bResult};
use crate::native::load_dataset;

/// Non-channel variables served by [`AtmsL1bReader::get_dataset`].
pub const KNOWN_VARIABLES: [&str; 9] = [
    "lat",
    "lon",
    "sat_azi",
    "sat_zen",
    "sol_azi",
    "sol_zen",
    "land_frac",
    "surf_alt",
    "view_ang",
];

/// Global attribute names in the level-1b file.
mod global {
    pub const TIME_COVERAGE_START: &str = "time_coverage_start";
    pub const TIME_COVERAGE_END: &str = "time_coverage_end";
    pub const PLATFORM: &str = "platform";
    pub const INSTRUMENT: &str = "instrument";
}

/// Per-file-type settings from the reader configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileTypeInfo {
    /// Variable holding the `(atrack, xtrack, channel)` cube.
    pub antenna_temperature: String,
}

impl Default for FileTypeInfo {
    fn default() -> Self {
        Self {
            antenna_temperature: "antenna_temp".to_string(),
        }
    }
}

/// Identifies a requested dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetId {
    pub name: String,
}

impl From<&str> for DatasetId {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Reader for one ATMS level-1b NetCDF granule.
#[derive(Debug, Clone)]
pub struct AtmsL1bReader {
    dataset: Dataset,
    filename_info: Attributes,
    filetype_info: FileTypeInfo,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    platform_name: String,
    sensor: String,
}

impl AtmsL1bReader {
    /// Load a granule from disk.
    ///
    /// A path that cannot be stat'ed fails with [`L1bError::IoError`] before
    /// the NetCDF library is involved.
    pub fn open(
        path: impl AsRef<Path>,
        filename_info: Attributes,
        filetype_info: FileTypeInfo,
    ) -> L1bResult<Self> {
        let path = path.as_ref();
        std::fs::metadata(path)?;
        let dataset = load_dataset(path)?;
        Self::from_dataset(dataset, filename_info, filetype_info)
    }

    /// Build a reader around an already loaded dataset.
    ///
    /// Fails if the time coverage, platform or instrument attributes are
    /// missing or malformed.
    pub fn from_dataset(
        dataset: Dataset,
        filename_info: Attributes,
        filetype_info: FileTypeInfo,
    ) -> L1bResult<Self> {
        let start_time = parse_time_coverage(dataset.attr_str(global::TIME_COVERAGE_START)?)?;
        let end_time = parse_time_coverage(dataset.attr_str(global::TIME_COVERAGE_END)?)?;
        let platform_name = dataset.attr_str(global::PLATFORM)?.to_string();
        let sensor = dataset.attr_str(global::INSTRUMENT)?.to_string();

        Ok(Self {
            dataset,
            filename_info,
            filetype_info,
            start_time,
            end_time,
            platform_name,
            sensor,
        })
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    pub fn sensor(&self) -> &str {
        &self.sensor
    }

    /// The backing dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// File-level metadata: every filename info entry, then the observation
    /// times, platform and sensor parsed from the file. The parsed values win
    /// over filename info entries with the same key.
    pub fn attrs(&self) -> Attributes {
        let mut attrs = self.filename_info.clone();
        attrs.extend(self.core_attrs());
        attrs
    }

    fn core_attrs(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(keys::START_TIME.to_string(), self.start_time.into());
        attrs.insert(keys::END_TIME.to_string(), self.end_time.into());
        attrs.insert(
            keys::PLATFORM_NAME.to_string(),
            self.platform_name.as_str().into(),
        );
        attrs.insert(keys::SENSOR.to_string(), self.sensor.as_str().into());
        attrs
    }

    /// The raw antenna temperature cube, as stored in the file.
    pub fn antenna_temperature(&self) -> L1bResult<&DataArray> {
        let name = &self.filetype_info.antenna_temperature;
        self.dataset
            .variable(name)
            .ok_or_else(|| L1bError::MissingData(format!("antenna temperature variable '{}'", name)))
    }

    /// One channel slice of the antenna temperature cube.
    ///
    /// Returns `None` for names that are not ATMS channels.
    pub fn channel_data(&self, name: &str) -> L1bResult<Option<DataArray>> {
        let Some(index) = channels::channel_index(name) else {
            return Ok(None);
        };

        let cube = self.antenna_temperature()?;
        let channel_dim = if cube.axis_of("channel").is_some() {
            "channel"
        } else {
            cube.dims()
                .last()
                .copied()
                .ok_or_else(|| L1bError::InvalidFormat("antenna temperature is 0-D".to_string()))?
        };

        Ok(Some(cube.index_axis(channel_dim, index)?))
    }

    /// Names this reader can serve: all channels, then the known
    /// non-channel variables present in the file.
    pub fn available_datasets(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.antenna_temperature().is_ok() {
            names.extend(channels::channel_names());
        }
        names.extend(
            KNOWN_VARIABLES
                .iter()
                .filter(|name| self.dataset.contains(name))
                .map(|name| name.to_string()),
        );
        names
    }

    /// Load a dataset in `(y, x)` layout with merged metadata.
    ///
    /// Unknown names and variables that are absent or empty give `Ok(None)`.
    pub fn get_dataset(
        &self,
        dataset_id: &DatasetId,
        dataset_info: Option<&Attributes>,
    ) -> L1bResult<Option<DataArray>> {
        let name = dataset_id.name.as_str();

        let data = if let Some(info) = channel_info(name) {
            self.channel_data(name)?.map(|mut data| {
                data.attrs_mut().extend(info.attrs());
                data
            })
        } else if is_known_variable(name) {
            self.dataset.variable(name).cloned()
        } else {
            None
        };

        let Some(data) = data.filter(|d| !d.data().is_empty()) else {
            debug!(dataset = %name, "No data for dataset");
            return Ok(None);
        };

        let mut data = drop_coords(standardize_dims(data)?);
        data.attrs_mut().insert(keys::NAME.to_string(), name.into());
        let empty = Attributes::new();
        let data = self.merge_attributes(data, dataset_info.unwrap_or(&empty));

        debug!(dataset = %name, shape = ?data.shape(), "Loaded dataset");
        Ok(Some(data))
    }

    /// Layer attributes: the array's own, then filename info, then
    /// `dataset_info`, then the times, platform and sensor parsed from the
    /// file. Later layers win on key clashes.
    pub fn merge_attributes(&self, data: DataArray, dataset_info: &Attributes) -> DataArray {
        let mut attrs = data.attrs().clone();
        attrs.extend(self.filename_info.iter().map(|(k, v)| (k.clone(), v.clone())));
        attrs.extend(dataset_info.iter().map(|(k, v)| (k.clone(), v.clone())));
        attrs.extend(self.core_attrs());
        data.with_attrs(attrs)
    }
}

fn is_known_variable(name: &str) -> bool {
    KNOWN_VARIABLES.iter().any(|known| *known == name)
}

/// Rename `atrack`/`xtrack` to `y`/`x` and put `y` before `x`.
pub fn standardize_dims(data: DataArray) -> L1bResult<DataArray> {
    let data = data.rename_dim("atrack", "y")?.rename_dim("xtrack", "x")?;

    if data.dims().first() != Some(&"x") {
        return Ok(data);
    }

    let mut order: Vec<String> = data
        .dims()
        .into_iter()
        .filter(|d| *d != "x")
        .map(str::to_string)
        .collect();
    let x_pos = order
        .iter()
        .position(|d| d == "y")
        .map_or(order.len(), |y| y + 1);
    order.insert(x_pos, "x".to_string());

    let order: Vec<&str> = order.iter().map(String::as_str).collect();
    Ok(data.transpose(&order)?)
}

/// Strip every auxiliary coordinate.
pub fn drop_coords(data: DataArray) -> DataArray {
    data.drop_aux_coords()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(dims: [&str; 2]) -> DataArray {
        DataArray::from_shape_vec(&[2, 3], (0..6).map(f64::from).collect(), dims).unwrap()
    }

    #[test]
    fn test_standardize_swaps_track_dims() {
        let out = standardize_dims(array(["xtrack", "atrack"])).unwrap();
        assert_eq!(out.dims(), vec!["y", "x"]);
        assert_eq!(out.shape(), &[3, 2]);
        assert_eq!(out.data()[[2, 1]], 5.0);
    }

    #[test]
    fn test_standardize_keeps_y_x() {
        let out = standardize_dims(array(["y", "x"])).unwrap();
        assert_eq!(out.dims(), vec!["y", "x"]);
        assert_eq!(out.shape(), &[2, 3]);
    }

    #[test]
    fn test_drop_coords_keeps_dimension_coords() {
        let data = array(["y", "x"])
            .with_coord("x", ndarray::arr1(&[0.0, 1.0, 2.0]).into_dyn())
            .with_coord("dummy", ndarray::arr0(0.0).into_dyn());
        let out = drop_coords(data);
        assert!(out.coords().contains_key("x"));
        assert!(!out.coords().contains_key("dummy"));
    }

    #[test]
    fn test_filetype_info_default() {
        assert_eq!(FileTypeInfo::default().antenna_temperature, "antenna_temp");
    }
}
