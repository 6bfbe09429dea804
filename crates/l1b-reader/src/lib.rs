//! Level-1b reader for the ATMS microwave sounder.
//!
//! Granules are NetCDF files holding an antenna temperature cube
//! `(atrack, xtrack, channel)` plus geolocation and angle fields. The reader
//! loads the whole file once, then serves individual channels and
//! geolocation variables as `(y, x)` arrays with the file metadata merged in.
//!
//! # Example
//!
//! ```ignore
//! use l1b_reader::{AtmsL1bReader, DatasetId, FileTypeInfo};
//!
//! let reader = AtmsL1bReader::open(path, filename_info, FileTypeInfo::default())?;
//! let ch1 = reader.get_dataset(&DatasetId::from("1"), None)?;
//! ```
//!
//! # System Requirements
//!
//! Reading needs the NetCDF and HDF5 C libraries (`libnetcdf-dev`,
//! `libhdf5-dev`).

pub mod channels;
pub mod error;
pub mod native;
pub mod reader;

pub use channels::{channel_index, channel_info, ChannelInfo, Polarization, CHANNEL_COUNT};
pub use error::{L1bError, L1bResult};
pub use native::{load_dataset, silence_hdf5_errors};
pub use reader::{
    drop_coords, standardize_dims, AtmsL1bReader, DatasetId, FileTypeInfo, KNOWN_VARIABLES,
};
