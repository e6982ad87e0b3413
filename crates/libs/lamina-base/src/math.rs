//! Math utilities.
//!
//! Directions are expressed in the local shading frame, where the z-axis is
//! aligned with the shading normal.

pub use glam::*;

/// 1/π
pub const INV_PI: f32 = std::f32::consts::FRAC_1_PI;

/// 1/(2π)
pub const INV_TWO_PI: f32 = 0.5 * std::f32::consts::FRAC_1_PI;

/// 1/(4π)
pub const INV_FOUR_PI: f32 = 0.25 * std::f32::consts::FRAC_1_PI;

/// A point in the unit square [0, 1)², drawn by an external sampler.
pub type Sample2 = Vec2;

/// Square of a number.
#[inline(always)]
pub fn sqr(x: f32) -> f32 { x * x }

/// Returns the cosine of the zenith angle of the given vector.
/// The vector must be normalized.
#[inline(always)]
pub fn cos_theta(v: &Vec3) -> f32 {
    debug_assert!(
        approx::ulps_eq!(v.length(), 1.0, epsilon = 1.0e-5),
        "Vec3 must be normalized, got {}",
        v.length()
    );
    v.z
}

/// Returns the square of the sine of the zenith angle of the given vector.
pub fn sin_theta2(v: &Vec3) -> f32 { (1.0 - sqr(cos_theta(v))).max(0.0) }

/// Returns the sine of the zenith angle of the given vector.
pub fn sin_theta(v: &Vec3) -> f32 { sin_theta2(v).sqrt() }

/// Returns true if the direction lies strictly above the surface.
#[inline(always)]
pub fn is_above_surface(v: &Vec3) -> bool { cos_theta(v) > 0.0 }
