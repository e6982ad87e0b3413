//! Surface scattering models.
//!
//! Materials are described on the host by immutable descriptors (e.g.
//! [`DiffuseBsdf`]) and evaluated by plain-data kernels (e.g.
//! [`DiffuseKernel`]) which are uploaded once per compute context, see
//! [`device`].
#![warn(missing_docs)]

pub mod device;
mod diffuse;
mod record;

use base::{
    math::Sample2,
    object::{ObjectError, ObjectFactory},
    Color3,
};
pub use diffuse::*;
pub use record::*;
use std::fmt::Debug;

/// Scattering capabilities used by light transport algorithms.
pub trait Bsdf: Send + Sync + Debug {
    /// Samples the BSDF and returns the importance weight, i.e. the value of
    /// the BSDF times cos(θo) divided by the density of the sample with
    /// respect to the measure stored in the record.
    ///
    /// On success `rec.wo` and `rec.measure` hold the sampled direction and
    /// its measure. A zero weight means that sampling failed and the path must
    /// not be extended along `rec.wo`.
    ///
    /// # Arguments
    ///
    /// * `rec` - A sampling record with the incident direction set.
    /// * `sample` - A uniformly distributed point of [0, 1)².
    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Sample2) -> Color3;

    /// Evaluates the BSDF times cos(θo) for the pair of directions and the
    /// measure specified in `rec`.
    fn eval(&self, rec: &BsdfQueryRecord) -> Color3;

    /// Returns the density of sampling `rec.wo` given `rec.wi`, expressed with
    /// respect to `rec.measure`. This is the density realised by
    /// [`Bsdf::sample`].
    fn pdf(&self, rec: &BsdfQueryRecord) -> f32;

    /// Tells whether the BSDF is diffuse, which decides whether radiance
    /// caches (e.g. photons) may be stored on the surface.
    fn is_diffuse(&self) -> bool { false }
}

/// Kernels of all supported materials.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BsdfKernel {
    /// Ideal diffuse reflection.
    Diffuse(DiffuseKernel),
}

impl From<DiffuseKernel> for BsdfKernel {
    fn from(kernel: DiffuseKernel) -> Self { Self::Diffuse(kernel) }
}

impl Bsdf for BsdfKernel {
    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Sample2) -> Color3 {
        match self {
            BsdfKernel::Diffuse(k) => k.sample(rec, sample),
        }
    }

    fn eval(&self, rec: &BsdfQueryRecord) -> Color3 {
        match self {
            BsdfKernel::Diffuse(k) => k.eval(rec),
        }
    }

    fn pdf(&self, rec: &BsdfQueryRecord) -> f32 {
        match self {
            BsdfKernel::Diffuse(k) => k.pdf(rec),
        }
    }

    fn is_diffuse(&self) -> bool {
        match self {
            BsdfKernel::Diffuse(k) => k.is_diffuse(),
        }
    }
}

/// Registers the constructors of the materials of this crate.
pub fn register_builtin(factory: &mut ObjectFactory) -> Result<(), ObjectError> {
    factory.register("diffuse", DiffuseBsdf::create)
}
