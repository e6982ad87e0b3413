//! Warping functions mapping uniformly distributed points of the unit square
//! [0, 1)² onto other domains, together with the densities they realise.
//!
//! Every `*_pdf` function returns zero outside the support of its warp.

use crate::math::{sqr, Sample2, Vec2, Vec3, INV_FOUR_PI, INV_PI, INV_TWO_PI};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Maps a point of the unit square to the unit disk using the concentric
/// mapping of Shirley and Chiu.
///
/// The mapping preserves relative areas and keeps adjacent points of the
/// square adjacent on the disk, so stratified samples stay stratified.
pub fn square_to_uniform_disk(sample: Sample2) -> Vec2 {
    // Map to [-1, 1]².
    let offset = sample * 2.0 - Vec2::ONE;
    if offset.x == 0.0 && offset.y == 0.0 {
        return Vec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y))
    };

    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Density of [`square_to_uniform_disk`] with respect to area.
pub fn square_to_uniform_disk_pdf(p: Vec2) -> f32 {
    if p.length_squared() <= 1.0 {
        INV_PI
    } else {
        0.0
    }
}

/// Maps a point of the unit square to the upper hemisphere with a density
/// proportional to the cosine of the zenith angle (Malley's method).
///
/// The returned direction always has `z >= 0`.
pub fn square_to_cosine_hemisphere(sample: Sample2) -> Vec3 {
    let d = square_to_uniform_disk(sample);
    // Rounding may push the disk point marginally outside the unit circle.
    let z = (1.0 - sqr(d.x) - sqr(d.y)).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Density of [`square_to_cosine_hemisphere`] with respect to solid angle.
pub fn square_to_cosine_hemisphere_pdf(v: &Vec3) -> f32 {
    if v.z > 0.0 {
        v.z * INV_PI
    } else {
        0.0
    }
}

/// Maps a point of the unit square uniformly to the upper hemisphere.
pub fn square_to_uniform_hemisphere(sample: Sample2) -> Vec3 {
    let z = sample.x;
    let r = (1.0 - sqr(z)).max(0.0).sqrt();
    let phi = 2.0 * PI * sample.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Density of [`square_to_uniform_hemisphere`] with respect to solid angle.
pub fn square_to_uniform_hemisphere_pdf(v: &Vec3) -> f32 {
    if v.z >= 0.0 {
        INV_TWO_PI
    } else {
        0.0
    }
}

/// Maps a point of the unit square uniformly to the unit sphere.
pub fn square_to_uniform_sphere(sample: Sample2) -> Vec3 {
    let z = 1.0 - 2.0 * sample.x;
    let r = (1.0 - sqr(z)).max(0.0).sqrt();
    let phi = 2.0 * PI * sample.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Density of [`square_to_uniform_sphere`] with respect to solid angle.
pub fn square_to_uniform_sphere_pdf(_v: &Vec3) -> f32 { INV_FOUR_PI }
