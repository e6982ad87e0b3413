use base::{math::Vec3, Measure};

/// Inputs and outputs of a single scattering query.
///
/// Directions are expressed in the local shading frame and point away from
/// the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BsdfQueryRecord {
    /// Incident direction.
    pub wi: Vec3,
    /// Outgoing direction.
    pub wo: Vec3,
    /// Relative refractive index in the sampled direction.
    pub eta: f32,
    /// Measure associated with the sample.
    pub measure: Measure,
}

impl BsdfQueryRecord {
    /// Creates a new record for sampling the BSDF.
    ///
    /// The outgoing direction is filled in by [`Bsdf::sample`](crate::Bsdf::sample).
    pub fn new(wi: Vec3) -> Self {
        Self {
            wi,
            wo: Vec3::ZERO,
            eta: 1.0,
            measure: Measure::Unknown,
        }
    }

    /// Creates a new record for querying the BSDF with a known pair of
    /// directions.
    pub fn with_outgoing(wi: Vec3, wo: Vec3, measure: Measure) -> Self {
        Self {
            wi,
            wo,
            eta: 1.0,
            measure,
        }
    }
}
