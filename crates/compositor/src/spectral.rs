//! Spectral blending: derive one channel as a weighted average of others.
//!
//! All variants reduce to the same operation, `Σ fractions[i] * inputs[i]`.
//! They differ only in how the fractions are produced:
//!
//! - [`BlendMethod::Weighted`]: fixed weights, one per input.
//! - [`BlendMethod::HybridGreen`]: `(1 - F, F)` over `[green, nir]`
//!   (Miller et al. 2016, doi:10.1175/BAMS-D-15-00154.2).
//! - [`BlendMethod::NdviHybridGreen`]: per-pixel `F` interpolated from the
//!   NDVI of `[vis, nir]`, applied to `[green, nir]`.

use std::cmp::Ordering;
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn, Zip};
use sat_common::{Attributes, DataArray};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::match_data_arrays;
use crate::error::{CompositorError, Result};
use crate::generic::GenericCompositor;
use crate::metadata::{combine_metadata, MetadataPolicy, SharedValues};

/// Weight applied to one input of a blend.
#[derive(Debug, Clone, PartialEq)]
pub enum Fraction {
    /// Same weight for every pixel.
    Scalar(f64),
    /// Per-pixel weight, same shape as the aligned inputs.
    Field(ArrayD<f64>),
}

/// Weighted sum of aligned inputs.
///
/// Fails before any arithmetic when the counts differ. Inputs are aligned
/// with [`match_data_arrays`] and the output attributes are combined from all
/// inputs with `policy`.
pub fn blend(
    projectables: &[DataArray],
    fractions: &[Fraction],
    policy: &dyn MetadataPolicy,
) -> Result<DataArray> {
    if fractions.len() != projectables.len() {
        return Err(CompositorError::FractionCountMismatch {
            fractions: fractions.len(),
            projectables: projectables.len(),
        });
    }

    let aligned = match_data_arrays(projectables)?;
    let reference = aligned.first().ok_or(CompositorError::NoInputs)?;

    let mut sum = ArrayD::<f64>::zeros(IxDyn(reference.shape()));
    for (fraction, input) in fractions.iter().zip(&aligned) {
        match fraction {
            Fraction::Scalar(weight) => {
                let weight = *weight;
                sum.zip_mut_with(input.data(), |acc, &value| *acc += weight * value);
            }
            Fraction::Field(weights) => {
                if weights.shape() != reference.shape() {
                    return Err(CompositorError::incompatible_areas(format!(
                        "fraction field has shape {:?}, inputs have {:?}",
                        weights.shape(),
                        reference.shape()
                    )));
                }
                Zip::from(&mut sum)
                    .and(weights)
                    .and(input.data())
                    .for_each(|acc, &weight, &value| *acc += weight * value);
            }
        }
    }

    let attrs = combine_metadata(&aligned, policy);
    Ok(reference.with_data(sum)?.with_attrs(attrs))
}

/// Normalized difference `(nir - vis) / (nir + vis)`, element-wise.
///
/// A zero denominator follows IEEE-754 and yields NaN or ±inf.
pub fn normalized_difference(vis: &DataArray, nir: &DataArray) -> Result<DataArray> {
    let aligned = match_data_arrays(&[vis.clone(), nir.clone()])?;
    let ndvi = Zip::from(aligned[0].data())
        .and(aligned[1].data())
        .map_collect(|&vis, &nir| (nir - vis) / (nir + vis));
    Ok(aligned[0].with_data(ndvi)?.with_attrs(Attributes::new()))
}

/// Parameters of a fixed-weight blend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedParams {
    /// One weight per input, in input order.
    #[serde(default)]
    pub fractions: Vec<f64>,
}

/// Parameters of the fixed-fraction hybrid green.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridGreenParams {
    /// Contribution of the near-infrared channel.
    pub fraction: f64,
}

impl Default for HybridGreenParams {
    fn default() -> Self {
        Self { fraction: 0.07 }
    }
}

/// Parameters of the NDVI-weighted hybrid green.
///
/// Pixels at `ndvi_min` receive `limits.0` of near-infrared, pixels at
/// `ndvi_max` receive `limits.1`, linear in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NdviHybridGreenParams {
    pub ndvi_min: f64,
    pub ndvi_max: f64,
    pub limits: (f64, f64),
}

impl Default for NdviHybridGreenParams {
    fn default() -> Self {
        Self {
            ndvi_min: 0.0,
            ndvi_max: 1.0,
            limits: (0.15, 0.05),
        }
    }
}

impl NdviHybridGreenParams {
    /// Require `ndvi_max > ndvi_min` and finite limits.
    pub fn validate(&self) -> Result<()> {
        if self.ndvi_max.partial_cmp(&self.ndvi_min) != Some(Ordering::Greater) {
            return Err(CompositorError::invalid_config(format!(
                "ndvi_max ({}) must be greater than ndvi_min ({})",
                self.ndvi_max, self.ndvi_min
            )));
        }
        if !self.limits.0.is_finite() || !self.limits.1.is_finite() {
            return Err(CompositorError::invalid_config("limits must be finite"));
        }
        Ok(())
    }

    /// Near-infrared fraction for each pixel of `ndvi`.
    ///
    /// NDVI is clamped to `[ndvi_min, ndvi_max]`; NaN stays NaN.
    pub fn fraction_field(&self, ndvi: &ArrayD<f64>) -> ArrayD<f64> {
        let Self {
            ndvi_min,
            ndvi_max,
            limits: (low, high),
        } = *self;

        ndvi.mapv(|value| {
            let clamped = if value < ndvi_min {
                ndvi_min
            } else if value > ndvi_max {
                ndvi_max
            } else {
                value
            };
            (clamped - ndvi_min) / (ndvi_max - ndvi_min) * (high - low) + low
        })
    }
}

/// How the fractions of a spectral blend are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "compositor", rename_all = "snake_case")]
pub enum BlendMethod {
    /// Fixed weights, one per input.
    #[serde(rename = "spectral_blender")]
    Weighted(WeightedParams),
    /// `(1 - F) * green + F * nir`.
    HybridGreen(HybridGreenParams),
    /// `(1 - f) * green + f * nir` with `f` derived from NDVI(vis, nir).
    NdviHybridGreen(NdviHybridGreenParams),
}

impl BlendMethod {
    /// Fixed weights, one per input.
    pub fn weighted(fractions: impl Into<Vec<f64>>) -> Self {
        Self::Weighted(WeightedParams {
            fractions: fractions.into(),
        })
    }

    /// Hybrid green with near-infrared fraction `fraction`.
    pub fn hybrid_green(fraction: f64) -> Self {
        Self::HybridGreen(HybridGreenParams { fraction })
    }

    /// NDVI-weighted hybrid green.
    pub fn ndvi_hybrid_green(ndvi_min: f64, ndvi_max: f64, limits: (f64, f64)) -> Self {
        Self::NdviHybridGreen(NdviHybridGreenParams {
            ndvi_min,
            ndvi_max,
            limits,
        })
    }

    /// The `compositor` tag used in YAML definitions.
    pub fn kind(&self) -> &'static str {
        match self {
            BlendMethod::Weighted(_) => "spectral_blender",
            BlendMethod::HybridGreen(_) => "hybrid_green",
            BlendMethod::NdviHybridGreen(_) => "ndvi_hybrid_green",
        }
    }

    /// Reject parameter sets that can never produce a valid blend.
    pub fn validate(&self) -> Result<()> {
        match self {
            BlendMethod::Weighted(params) => {
                if params.fractions.iter().any(|f| !f.is_finite()) {
                    return Err(CompositorError::invalid_config("fractions must be finite"));
                }
                Ok(())
            }
            BlendMethod::HybridGreen(params) => {
                if !params.fraction.is_finite() {
                    return Err(CompositorError::invalid_config("fraction must be finite"));
                }
                Ok(())
            }
            BlendMethod::NdviHybridGreen(params) => params.validate(),
        }
    }

    /// Select the arrays to sum and the fraction for each.
    pub fn fractions(&self, projectables: &[DataArray]) -> Result<(Vec<DataArray>, Vec<Fraction>)> {
        match self {
            BlendMethod::Weighted(params) => Ok((
                projectables.to_vec(),
                params.fractions.iter().copied().map(Fraction::Scalar).collect(),
            )),
            BlendMethod::HybridGreen(params) => {
                let f = params.fraction;
                Ok((
                    projectables.to_vec(),
                    vec![Fraction::Scalar(1.0 - f), Fraction::Scalar(f)],
                ))
            }
            BlendMethod::NdviHybridGreen(params) => {
                let [green, vis, nir] = projectables else {
                    return Err(CompositorError::WrongInputCount {
                        compositor: self.kind(),
                        expected: 3,
                        actual: projectables.len(),
                    });
                };

                let ndvi = normalized_difference(vis, nir)?;
                let nir_fraction = params.fraction_field(ndvi.data());
                let green_fraction = nir_fraction.mapv(|f| 1.0 - f);

                Ok((
                    vec![green.clone(), nir.clone()],
                    vec![Fraction::Field(green_fraction), Fraction::Field(nir_fraction)],
                ))
            }
        }
    }
}

/// A configured spectral blending compositor.
#[derive(Debug, Clone)]
pub struct SpectralBlender {
    method: BlendMethod,
    compositor: GenericCompositor,
    policy: Arc<dyn MetadataPolicy>,
}

impl SpectralBlender {
    /// Validates `method` before building the blender.
    pub fn new(compositor: GenericCompositor, method: BlendMethod) -> Result<Self> {
        method.validate()?;
        Ok(Self {
            method,
            compositor,
            policy: Arc::new(SharedValues),
        })
    }

    /// Replace the metadata merge policy.
    pub fn with_policy(mut self, policy: Arc<dyn MetadataPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn method(&self) -> &BlendMethod {
        &self.method
    }

    pub fn compositor(&self) -> &GenericCompositor {
        &self.compositor
    }

    /// Blend `projectables` and package the result as a composite.
    pub fn call(&self, projectables: &[DataArray], attrs: Attributes) -> Result<DataArray> {
        let (inputs, fractions) = self.method.fractions(projectables)?;
        debug!(
            composite = %self.compositor.name,
            method = self.method.kind(),
            inputs = inputs.len(),
            "Blending channels"
        );

        let channel = blend(&inputs, &fractions, self.policy.as_ref())?;
        Ok(self.compositor.finalize(channel, attrs))
    }
}
