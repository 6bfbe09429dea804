//! Spectral blending compositors for satellite imagery.
//!
//! A compositor derives one output channel from a set of aligned input
//! channels. This crate provides the spectral blending family used for green
//! band correction in true color imagery:
//!
//! ```text
//! prerequisites ──► BlendMethod::fractions ──► blend (Σ fᵢ·xᵢ) ──► GenericCompositor::finalize
//!                        │                        │
//!                        │                        ├─► match_data_arrays
//!                        │                        └─► combine_metadata (MetadataPolicy)
//!                        └─► NDVI fraction field (ndvi_hybrid_green only)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use compositor::{BlendMethod, GenericCompositor, SpectralBlender};
//!
//! let blender = SpectralBlender::new(
//!     GenericCompositor::new("hybrid_green"),
//!     BlendMethod::hybrid_green(0.07),
//! )?;
//! let green = blender.call(&[b02, b04], Attributes::new())?;
//! ```

pub mod align;
pub mod config;
pub mod error;
pub mod generic;
pub mod metadata;
pub mod spectral;

pub use align::match_data_arrays;
pub use config::{CompositeConfig, CompositeDefinition};
pub use error::{CompositorError, Result};
pub use generic::GenericCompositor;
pub use metadata::{combine_metadata, FirstWins, LastWins, MetadataPolicy, SharedValues};
pub use spectral::{
    blend, normalized_difference, BlendMethod, Fraction, HybridGreenParams,
    NdviHybridGreenParams, SpectralBlender, WeightedParams,
};
