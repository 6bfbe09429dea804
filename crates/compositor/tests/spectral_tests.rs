//! Tests for the spectral blending compositors.

use std::sync::Arc;

use chrono::NaiveDate;
use compositor::{
    blend, normalized_difference, BlendMethod, CompositeConfig, CompositorError, Fraction,
    GenericCompositor, LastWins, SharedValues, SpectralBlender,
};
use sat_common::{AttrValue, Attributes};
use test_utils::{
    assert_all_approx_eq, assert_approx_eq, channel_from_values, constant_channel, ramp_channel,
};

const SHAPE: (usize, usize) = (2, 3);

fn blender(name: &str, method: BlendMethod) -> SpectralBlender {
    SpectralBlender::new(GenericCompositor::new(name), method).unwrap()
}

// ============================================================================
// SpectralBlender (weighted)
// ============================================================================

#[test]
fn test_weighted_sum() {
    let inputs = [
        constant_channel("B02", SHAPE, 10.0),
        constant_channel("B03", SHAPE, 20.0),
        constant_channel("B04", SHAPE, 30.0),
    ];
    let green = blender("corrected_green", BlendMethod::weighted(vec![0.63, 0.29, 0.08]))
        .call(&inputs, Attributes::new())
        .unwrap();

    assert_eq!(green.shape(), &[2, 3]);
    assert_eq!(green.dims(), vec!["y", "x"]);
    assert_all_approx_eq!(green.data(), 14.5, 1e-9);
}

#[test]
fn test_weighted_sum_is_per_pixel() {
    let inputs = [ramp_channel("B02", SHAPE), constant_channel("B03", SHAPE, 10.0)];
    let green = blender("green", BlendMethod::weighted(vec![0.5, 0.5]))
        .call(&inputs, Attributes::new())
        .unwrap();

    let data = green.data();
    assert_approx_eq!(data[[0, 0]], 5.0, 1e-9);
    assert_approx_eq!(data[[0, 2]], 6.0, 1e-9);
    assert_approx_eq!(data[[1, 0]], 505.0, 1e-9);
    assert_approx_eq!(data[[1, 2]], 506.0, 1e-9);
}

#[test]
fn test_fraction_count_mismatch_fails() {
    let inputs = [
        constant_channel("B02", SHAPE, 10.0),
        constant_channel("B03", SHAPE, 20.0),
    ];
    let err = blender("corrected_green", BlendMethod::weighted(vec![0.63, 0.29, 0.08]))
        .call(&inputs, Attributes::new())
        .unwrap_err();

    assert!(matches!(
        err,
        CompositorError::FractionCountMismatch {
            fractions: 3,
            projectables: 2
        }
    ));
}

#[test]
fn test_count_checked_before_alignment() {
    // Misaligned inputs with the wrong count report the count, not the area.
    let inputs = [
        constant_channel("B02", (2, 3), 10.0),
        constant_channel("B03", (4, 4), 20.0),
    ];
    let err = blend(&inputs, &[Fraction::Scalar(1.0)], &SharedValues).unwrap_err();
    assert!(matches!(err, CompositorError::FractionCountMismatch { .. }));
}

#[test]
fn test_misaligned_inputs_fail() {
    let inputs = [
        constant_channel("B02", (2, 3), 10.0),
        constant_channel("B03", (3, 2), 20.0),
    ];
    let err = blender("green", BlendMethod::weighted(vec![0.5, 0.5]))
        .call(&inputs, Attributes::new())
        .unwrap_err();
    assert!(matches!(err, CompositorError::IncompatibleAreas(_)));
}

#[test]
fn test_output_metadata_combined() {
    let start = NaiveDate::from_ymd_opt(2022, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let mut b02 = constant_channel("B02", SHAPE, 10.0);
    let mut b04 = constant_channel("B04", SHAPE, 30.0);
    for channel in [&mut b02, &mut b04] {
        channel
            .attrs_mut()
            .insert("sensor".to_string(), "ahi".into());
        channel
            .attrs_mut()
            .insert("start_time".to_string(), start.into());
    }

    let green = SpectralBlender::new(
        GenericCompositor::new("hybrid_green")
            .with_standard_name("toa_bidirectional_reflectance")
            .with_prerequisites(["B02", "B04"]),
        BlendMethod::hybrid_green(0.07),
    )
    .unwrap()
    .call(&[b02, b04], Attributes::new())
    .unwrap();

    let attrs = green.attrs();
    assert_eq!(attrs["name"], AttrValue::from("hybrid_green"));
    assert_eq!(attrs["sensor"], AttrValue::from("ahi"));
    assert_eq!(attrs["start_time"], AttrValue::DateTime(start));
    assert_eq!(
        attrs["standard_name"],
        AttrValue::from("toa_bidirectional_reflectance")
    );
}

#[test]
fn test_metadata_policy_is_pluggable() {
    let b02 = constant_channel("B02", SHAPE, 10.0);
    let mut b04 = constant_channel("B04", SHAPE, 30.0);
    b04.attrs_mut().insert("units".to_string(), "%".into());

    let shared = blender("green", BlendMethod::weighted(vec![0.5, 0.5]))
        .call(&[b02.clone(), b04.clone()], Attributes::new())
        .unwrap();
    assert!(!shared.attrs().contains_key("units"));

    let last = blender("green", BlendMethod::weighted(vec![0.5, 0.5]))
        .with_policy(Arc::new(LastWins))
        .call(&[b02, b04], Attributes::new())
        .unwrap();
    assert_eq!(last.attrs()["units"], AttrValue::from("%"));
}

#[test]
fn test_aux_coords_not_propagated() {
    let b02 = constant_channel("B02", SHAPE, 10.0)
        .with_coord("acq_time", ndarray::arr0(1.0).into_dyn());
    let b04 = constant_channel("B04", SHAPE, 30.0);

    let green = blender("green", BlendMethod::weighted(vec![0.5, 0.5]))
        .call(&[b02, b04], Attributes::new())
        .unwrap();
    assert!(green.coords().is_empty());
}

// ============================================================================
// HybridGreen
// ============================================================================

#[test]
fn test_hybrid_green_default_fraction() {
    let inputs = [
        constant_channel("green", SHAPE, 100.0),
        constant_channel("nir", SHAPE, 200.0),
    ];
    let method = CompositeConfig::from_yaml_str(
        "composites:\n  hybrid_green:\n    compositor: hybrid_green\n",
    )
    .unwrap()
    .definition("hybrid_green")
    .unwrap()
    .method
    .clone();

    let green = blender("hybrid_green", method)
        .call(&inputs, Attributes::new())
        .unwrap();
    assert_all_approx_eq!(green.data(), 107.0, 1e-9);
}

#[test]
fn test_hybrid_green_needs_two_inputs() {
    let inputs = [
        constant_channel("green", SHAPE, 100.0),
        constant_channel("red", SHAPE, 150.0),
        constant_channel("nir", SHAPE, 200.0),
    ];
    let err = blender("hybrid_green", BlendMethod::hybrid_green(0.07))
        .call(&inputs, Attributes::new())
        .unwrap_err();
    assert!(matches!(
        err,
        CompositorError::FractionCountMismatch {
            fractions: 2,
            projectables: 3
        }
    ));
}

// ============================================================================
// NDVIHybridGreen
// ============================================================================

#[test]
fn test_ndvi_hybrid_green_pixels() {
    // pixel 0: vis = nir = 0 (NDVI undefined)
    // pixel 1: vis = 50, nir = 100 (NDVI = 1/3)
    // pixel 2: vis = 100, nir = 0 (NDVI = -1, clamped to 0)
    // pixel 3: vis = 0, nir = 100 (NDVI = 1)
    let shape = (1, 4);
    let green = channel_from_values("green", shape, vec![80.0, 80.0, 80.0, 80.0]);
    let vis = channel_from_values("vis", shape, vec![0.0, 50.0, 100.0, 0.0]);
    let nir = channel_from_values("nir", shape, vec![0.0, 100.0, 0.0, 100.0]);

    let out = blender(
        "ndvi_hybrid_green",
        BlendMethod::ndvi_hybrid_green(0.0, 1.0, (0.15, 0.05)),
    )
    .call(&[green, vis, nir], Attributes::new())
    .unwrap();
    let data = out.data();

    assert!(data[[0, 0]].is_nan());

    let f = (1.0 / 3.0) * (0.05 - 0.15) + 0.15;
    assert_approx_eq!(f, 0.1167, 1e-4);
    assert_approx_eq!(data[[0, 1]], (1.0 - f) * 80.0 + f * 100.0, 1e-9);

    assert_approx_eq!(data[[0, 2]], 0.85 * 80.0 + 0.15 * 0.0, 1e-9);
    assert_approx_eq!(data[[0, 3]], 0.95 * 80.0 + 0.05 * 100.0, 1e-9);
}

#[test]
fn test_ndvi_hybrid_green_custom_range() {
    // NDVI = 0.5 sits in the middle of [0.2, 0.8] -> fraction halfway between limits.
    let shape = (1, 1);
    let green = channel_from_values("green", shape, vec![10.0]);
    let vis = channel_from_values("vis", shape, vec![25.0]);
    let nir = channel_from_values("nir", shape, vec![75.0]);

    let out = blender(
        "ndvi_hybrid_green",
        BlendMethod::ndvi_hybrid_green(0.2, 0.8, (0.2, 0.0)),
    )
    .call(&[green, vis, nir], Attributes::new())
    .unwrap();

    assert_approx_eq!(out.data()[[0, 0]], 0.9 * 10.0 + 0.1 * 75.0, 1e-9);
}

#[test]
fn test_ndvi_hybrid_green_misaligned_vis_nir() {
    let green = constant_channel("green", SHAPE, 80.0);
    let vis = constant_channel("vis", SHAPE, 50.0);
    let nir = constant_channel("nir", (3, 3), 100.0);

    let err = blender(
        "ndvi_hybrid_green",
        BlendMethod::ndvi_hybrid_green(0.0, 1.0, (0.15, 0.05)),
    )
    .call(&[green, vis, nir], Attributes::new())
    .unwrap_err();
    assert!(matches!(err, CompositorError::IncompatibleAreas(_)));
}

#[test]
fn test_normalized_difference_division_by_zero() {
    let vis = channel_from_values("vis", (1, 2), vec![0.0, -1.0]);
    let nir = channel_from_values("nir", (1, 2), vec![0.0, 1.0]);
    let ndvi = normalized_difference(&vis, &nir).unwrap();

    assert!(ndvi.data()[[0, 0]].is_nan());
    assert!(ndvi.data()[[0, 1]].is_infinite());
}
