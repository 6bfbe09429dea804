//! Fake ATMS level-1b data.
//!
//! The fake scene is 2 along-track by 3 cross-track pixels with all 22
//! channels. Channel `n` (1-based) is filled with `100 + (n - 1)`, so channel
//! "1" reads 100 and channel "22" reads 121. Geolocation is constant:
//! `lon = 1`, `lat = 2`, `sat_azi = 3`.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use sat_common::{Attributes, DataArray, Dataset};

pub const ATRACK: usize = 2;
pub const XTRACK: usize = 3;
pub const CHANNELS: usize = 22;

/// Variable name of the antenna temperature cube in the fake file.
pub const ANTENNA_TEMPERATURE_VAR: &str = "antenna_temp";

pub const TIME_COVERAGE_START: &str = "2000-01-02T03:04:05Z";
pub const TIME_COVERAGE_END: &str = "2000-01-02T04:05:06Z";
pub const PLATFORM: &str = "JPSS-1";
pub const INSTRUMENT: &str = "ATMS";

/// `creation_time` carried in the fake filename info.
pub fn creation_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .expect("valid date")
}

/// Filename info as a file-pattern matcher would produce it.
pub fn fake_filename_info() -> Attributes {
    let mut info = Attributes::new();
    info.insert("creation_time".to_string(), creation_time().into());
    info
}

fn antenna_temperature_values() -> Vec<f64> {
    let mut values = Vec::with_capacity(ATRACK * XTRACK * CHANNELS);
    for _ in 0..ATRACK * XTRACK {
        for channel in 0..CHANNELS {
            values.push(100.0 + channel as f64);
        }
    }
    values
}

/// The fake scene as an in-memory dataset.
pub fn fake_atms_dataset() -> Dataset {
    let geo = |value: f64| {
        DataArray::full(&[ATRACK, XTRACK], value, ["atrack", "xtrack"]).expect("valid shape")
    };
    let cube = DataArray::from_shape_vec(
        &[ATRACK, XTRACK, CHANNELS],
        antenna_temperature_values(),
        ["atrack", "xtrack", "channel"],
    )
    .expect("valid shape");

    Dataset::new()
        .with_variable(ANTENNA_TEMPERATURE_VAR, cube)
        .with_variable("lon", geo(1.0))
        .with_variable("lat", geo(2.0))
        .with_variable("sat_azi", geo(3.0))
        .with_attr("time_coverage_start", TIME_COVERAGE_START)
        .with_attr("time_coverage_end", TIME_COVERAGE_END)
        .with_attr("platform", PLATFORM)
        .with_attr("instrument", INSTRUMENT)
}

/// Write the fake scene to `dir/test_file_atms_l1b.nc`.
///
/// Besides the variables of [`fake_atms_dataset`], the file holds a packed
/// `surf_alt` variable (`i16`, `scale_factor = 0.5`, `add_offset = 10`,
/// `_FillValue = -1`) whose first pixel is fill.
pub fn write_fake_atms_file(dir: &Path) -> Result<PathBuf, netcdf::Error> {
    let path = dir.join("test_file_atms_l1b.nc");
    let mut file = netcdf::create(&path)?;

    file.add_dimension("atrack", ATRACK)?;
    file.add_dimension("xtrack", XTRACK)?;
    file.add_dimension("channel", CHANNELS)?;

    file.add_attribute("time_coverage_start", TIME_COVERAGE_START)?;
    file.add_attribute("time_coverage_end", TIME_COVERAGE_END)?;
    file.add_attribute("platform", PLATFORM)?;
    file.add_attribute("instrument", INSTRUMENT)?;

    let mut cube =
        file.add_variable::<f64>(ANTENNA_TEMPERATURE_VAR, &["atrack", "xtrack", "channel"])?;
    cube.put_attribute("units", "K")?;
    cube.put_values(antenna_temperature_values().as_slice(), ..)?;

    for (name, value) in [("lon", 1.0), ("lat", 2.0), ("sat_azi", 3.0)] {
        let mut var = file.add_variable::<f64>(name, &["atrack", "xtrack"])?;
        var.put_values(vec![value; ATRACK * XTRACK].as_slice(), ..)?;
    }

    let mut surf_alt = file.add_variable::<i16>("surf_alt", &["atrack", "xtrack"])?;
    surf_alt.set_fill_value(-1i16)?;
    surf_alt.put_attribute("scale_factor", 0.5f64)?;
    surf_alt.put_attribute("add_offset", 10.0f64)?;
    surf_alt.put_attribute("units", "m")?;
    surf_alt.put_values(&[-1i16, 0, 2, 4, 6, 8], ..)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_channel_values() {
        let ds = fake_atms_dataset();
        let cube = ds.variable(ANTENNA_TEMPERATURE_VAR).unwrap();
        assert_eq!(cube.shape(), &[ATRACK, XTRACK, CHANNELS]);
        assert_eq!(cube.data()[[0, 0, 0]], 100.0);
        assert_eq!(cube.data()[[1, 2, 21]], 121.0);
    }
}
