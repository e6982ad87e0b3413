use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Sub},
};

/// Linear RGB color.
///
/// Used for reflectances (albedo) as well as for radiance and importance
/// weights. The layout is three tightly packed `f32`, so the type can be
/// copied verbatim into device buffers.
#[repr(C)]
#[derive(Copy, Clone, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Color3 {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color3 {
    /// Black, also the sentinel for "no contribution".
    pub const ZERO: Self = Self::splat(0.0);

    /// White.
    pub const ONE: Self = Self::splat(1.0);

    /// Creates a new color from its three channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self { Self { r, g, b } }

    /// Creates a color with all channels set to `v`.
    pub const fn splat(v: f32) -> Self { Self { r: v, g: v, b: v } }

    /// Returns true if all channels are exactly zero.
    pub fn is_zero(&self) -> bool { self.r == 0.0 && self.g == 0.0 && self.b == 0.0 }

    /// Returns the largest of the three channels.
    pub fn max_component(&self) -> f32 { self.r.max(self.g).max(self.b) }

    /// Returns the channels as an array.
    pub const fn to_array(self) -> [f32; 3] { [self.r, self.g, self.b] }
}

impl Debug for Color3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Color3 {{ r: {}, g: {}, b: {} }}", self.r, self.g, self.b)
    }
}

impl Display for Color3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}

impl From<[f32; 3]> for Color3 {
    fn from(v: [f32; 3]) -> Self { Self::new(v[0], v[1], v[2]) }
}

impl From<Color3> for [f32; 3] {
    fn from(c: Color3) -> Self { c.to_array() }
}

impl From<Vec3> for Color3 {
    fn from(v: Vec3) -> Self { Self::new(v.x, v.y, v.z) }
}

impl From<Color3> for Vec3 {
    fn from(c: Color3) -> Self { Vec3::new(c.r, c.g, c.b) }
}

impl Index<usize> for Color3 {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            _ => panic!("Color3 index out of range: {}", index),
        }
    }
}

impl Add for Color3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color3 {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl Sub for Color3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul for Color3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f32> for Color3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output { Self::new(self.r * rhs, self.g * rhs, self.b * rhs) }
}

impl Mul<Color3> for f32 {
    type Output = Color3;

    fn mul(self, rhs: Color3) -> Self::Output { rhs * self }
}

impl MulAssign<f32> for Color3 {
    fn mul_assign(&mut self, rhs: f32) { *self = *self * rhs; }
}

impl Div<f32> for Color3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        let rcp = 1.0 / rhs;
        self * rcp
    }
}

impl AbsDiffEq for Color3 {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon { f32::EPSILON }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.r.abs_diff_eq(&other.r, epsilon)
            && self.g.abs_diff_eq(&other.g, epsilon)
            && self.b.abs_diff_eq(&other.b, epsilon)
    }
}

impl RelativeEq for Color3 {
    fn default_max_relative() -> Self::Epsilon { f32::EPSILON }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.r.relative_eq(&other.r, epsilon, max_relative)
            && self.g.relative_eq(&other.g, epsilon, max_relative)
            && self.b.relative_eq(&other.b, epsilon, max_relative)
    }
}
