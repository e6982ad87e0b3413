//! Ideal diffuse (Lambertian) reflection.

use crate::{device::DeviceUpload, record::BsdfQueryRecord, Bsdf};
use base::{
    math::{cos_theta, Sample2, INV_PI},
    object::{ClassType, ObjectError, SceneObject},
    props::{PropertyError, PropertyList},
    warp, Color3, Measure,
};
use bytemuck::{Pod, Zeroable};
use std::{
    any::Any,
    fmt::{Display, Formatter},
};

/// Host-side description of an ideal diffuse material.
///
/// The albedo is fixed at construction; the material is only read afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiffuseBsdf {
    albedo: Color3,
}

impl DiffuseBsdf {
    /// Albedo used when the configuration does not specify one.
    pub const DEFAULT_ALBEDO: Color3 = Color3::splat(0.5);

    /// Creates the material from its configuration.
    ///
    /// Reads the color property `albedo`, falling back to
    /// [`DiffuseBsdf::DEFAULT_ALBEDO`]. A property of another type is reported
    /// as is.
    pub fn new(props: &PropertyList) -> Result<Self, PropertyError> {
        let albedo = props.color_or("albedo", Self::DEFAULT_ALBEDO)?;
        log::debug!("Diffuse BSDF with albedo {}", albedo);
        Ok(Self { albedo })
    }

    /// Creates the material with the given albedo.
    pub const fn from_albedo(albedo: Color3) -> Self { Self { albedo } }

    /// Returns the albedo of the material.
    pub const fn albedo(&self) -> Color3 { self.albedo }

    /// Constructor registered in the object factory under `"diffuse"`.
    pub fn create(props: &PropertyList) -> Result<Box<dyn SceneObject>, ObjectError> {
        Ok(Box::new(Self::new(props)?))
    }
}

impl Default for DiffuseBsdf {
    fn default() -> Self { Self::from_albedo(Self::DEFAULT_ALBEDO) }
}

impl Display for DiffuseBsdf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "Diffuse material") }
}

impl SceneObject for DiffuseBsdf {
    fn class_type(&self) -> ClassType { ClassType::Bsdf }

    fn as_any(&self) -> &dyn Any { self }
}

impl DeviceUpload for DiffuseBsdf {
    type Kernel = DiffuseKernel;

    fn to_kernel(&self) -> DiffuseKernel { DiffuseKernel::from_bsdf(self) }
}

/// Evaluator of the diffuse BRDF, holding its own copy of the albedo.
///
/// Padded to 16 bytes so it can be placed in a uniform buffer as is. Every
/// query is a pure function of the kernel and the record, so one kernel can be
/// shared by any number of concurrent queries.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DiffuseKernel {
    albedo: Color3,
    _pad: f32,
}

impl DiffuseKernel {
    /// Copies the albedo of the host-side material into a new kernel.
    pub fn from_bsdf(bsdf: &DiffuseBsdf) -> Self {
        Self {
            albedo: bsdf.albedo,
            _pad: 0.0,
        }
    }

    /// Returns the albedo held by the kernel.
    pub const fn albedo(&self) -> Color3 { self.albedo }

    /// Both directions above the surface and the solid angle measure; the
    /// diffuse lobe has no discrete component.
    #[inline(always)]
    fn in_support(rec: &BsdfQueryRecord) -> bool {
        rec.measure == Measure::SolidAngle && cos_theta(&rec.wi) > 0.0 && cos_theta(&rec.wo) > 0.0
    }
}

impl Bsdf for DiffuseKernel {
    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Sample2) -> Color3 {
        if cos_theta(&rec.wi) <= 0.0 {
            return Color3::ZERO;
        }

        rec.wo = warp::square_to_cosine_hemisphere(sample);
        rec.measure = Measure::SolidAngle;
        rec.eta = 1.0;

        // eval / pdf = (albedo / π · cosθo) / (cosθo / π), exactly the albedo.
        self.albedo
    }

    fn eval(&self, rec: &BsdfQueryRecord) -> Color3 {
        if !Self::in_support(rec) {
            return Color3::ZERO;
        }
        self.albedo * (INV_PI * cos_theta(&rec.wo))
    }

    fn pdf(&self, rec: &BsdfQueryRecord) -> f32 {
        if !Self::in_support(rec) {
            return 0.0;
        }
        warp::square_to_cosine_hemisphere_pdf(&rec.wo)
    }

    fn is_diffuse(&self) -> bool { true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceSlot, SlotState};
    use approx::assert_relative_eq;
    use base::math::{Vec2, Vec3};
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rayon::prelude::*;

    fn kernel(albedo: Color3) -> DiffuseKernel {
        DiffuseKernel::from_bsdf(&DiffuseBsdf::from_albedo(albedo))
    }

    /// Direction of the upper hemisphere built from two uniform variates.
    fn upper(u: f32, v: f32) -> Vec3 {
        let w = warp::square_to_uniform_hemisphere(Vec2::new(u, v));
        // Keep strictly above the surface.
        Vec3::new(w.x, w.y, w.z.max(1.0e-3)).normalize()
    }

    #[test]
    fn test_default_albedo_from_empty_config() {
        let bsdf = DiffuseBsdf::new(&PropertyList::new()).unwrap();
        assert_eq!(bsdf.albedo(), Color3::splat(0.5));
        assert_eq!(bsdf, DiffuseBsdf::default());
    }

    #[test]
    fn test_albedo_from_config() {
        let mut props = PropertyList::new();
        props.set_color("albedo", Color3::new(0.8, 0.1, 0.3));
        let bsdf = DiffuseBsdf::new(&props).unwrap();
        assert_eq!(bsdf.albedo(), Color3::new(0.8, 0.1, 0.3));
    }

    #[test]
    fn test_malformed_albedo_is_reported() {
        let mut props = PropertyList::new();
        props.set_float("albedo", 0.8);
        assert!(matches!(
            DiffuseBsdf::new(&props),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_classification() {
        let bsdf = DiffuseBsdf::default();
        assert_eq!(bsdf.class_type(), ClassType::Bsdf);
        assert_eq!(bsdf.to_string(), "Diffuse material");
        assert!(kernel(bsdf.albedo()).is_diffuse());
    }

    #[test]
    fn test_kernel_copies_albedo() {
        let bsdf = DiffuseBsdf::from_albedo(Color3::new(0.2, 0.4, 0.6));
        let k = bsdf.to_kernel();
        assert_eq!(k.albedo(), bsdf.albedo());
        assert_eq!(std::mem::size_of::<DiffuseKernel>(), 16);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&k));
        assert_eq!(floats, &[0.2, 0.4, 0.6, 0.0]);
    }

    #[test]
    fn test_eval_pdf_at_normal_incidence() {
        let k = kernel(Color3::splat(0.5));
        let rec = BsdfQueryRecord::with_outgoing(Vec3::Z, Vec3::Z, Measure::SolidAngle);
        assert_relative_eq!(k.eval(&rec), Color3::splat(0.5 * INV_PI));
        assert_relative_eq!(k.eval(&rec).r, 0.159, epsilon = 1.0e-3);
        assert_relative_eq!(k.pdf(&rec), INV_PI);
        assert_relative_eq!(k.pdf(&rec), 0.318, epsilon = 1.0e-3);
    }

    #[test]
    fn test_eval_pdf_outside_support() {
        let k = kernel(Color3::splat(0.5));
        let above = Vec3::new(0.3, 0.0, 0.9).normalize();
        let below = Vec3::new(0.3, 0.0, -0.9).normalize();
        let grazing = Vec3::X;
        for (wi, wo) in [(below, above), (above, below), (grazing, above), (above, grazing)] {
            let rec = BsdfQueryRecord::with_outgoing(wi, wo, Measure::SolidAngle);
            assert_eq!(k.eval(&rec), Color3::ZERO);
            assert_eq!(k.pdf(&rec), 0.0);
        }
    }

    #[test]
    fn test_sample_below_surface() {
        let k = kernel(Color3::splat(0.5));
        for u in [Vec2::ZERO, Vec2::splat(0.5), Vec2::new(0.9, 0.1)] {
            let mut rec = BsdfQueryRecord::new(Vec3::NEG_Z);
            assert_eq!(k.sample(&mut rec, u), Color3::ZERO);
            assert_eq!(rec.measure, Measure::Unknown);
        }
    }

    #[test]
    fn test_pdf_normalisation() {
        // ∫ pdf dω over the upper hemisphere, estimated with uniform sampling.
        let k = kernel(Color3::splat(0.5));
        let wi = Vec3::new(-0.2, 0.4, 0.8).normalize();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 200_000;
        let sum: f64 = (0..n)
            .map(|_| {
                let wo = warp::square_to_uniform_hemisphere(Vec2::new(rng.gen(), rng.gen()));
                let rec = BsdfQueryRecord::with_outgoing(wi, wo, Measure::SolidAngle);
                (k.pdf(&rec) / warp::square_to_uniform_hemisphere_pdf(&wo)) as f64
            })
            .sum();
        assert_relative_eq!(sum / n as f64, 1.0, epsilon = 0.01);
    }

    #[test]
    fn test_sampled_directions_follow_pdf() {
        // Mean of cosθo under cosine-weighted sampling is ∫cos²θ/π dω = 2/3.
        let k = kernel(Color3::ONE);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let n = 200_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let mut rec = BsdfQueryRecord::new(Vec3::Z);
            k.sample(&mut rec, Vec2::new(rng.gen(), rng.gen()));
            sum += rec.wo.z as f64;
        }
        assert_relative_eq!(sum / n as f64, 2.0 / 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_concurrent_queries_on_shared_kernel() {
        let slot = DeviceSlot::new();
        assert_eq!(slot.state(), SlotState::Uninitialized);
        let albedo = Color3::new(0.25, 0.5, 0.75);
        let k = slot.upload(&DiffuseBsdf::from_albedo(albedo)).unwrap();
        let weights: Vec<Color3> = (0..4096u32)
            .into_par_iter()
            .map(|i| {
                let u = Vec2::new((i % 64) as f32 / 64.0, (i / 64) as f32 / 64.0);
                let mut rec = BsdfQueryRecord::new(Vec3::Z);
                k.sample(&mut rec, u)
            })
            .collect();
        assert!(weights.iter().all(|w| *w == albedo));
    }

    proptest! {
        #[test]
        fn sample_weight_is_albedo(a in 0.0f32..1.0, b in 0.0f32..1.0,
            u in 0.0f32..1.0, v in 0.0f32..1.0,
            r in 0.0f32..1.0, g in 0.0f32..1.0, bl in 0.0f32..1.0)
        {
            let albedo = Color3::new(r, g, bl);
            let k = kernel(albedo);
            let mut rec = BsdfQueryRecord::new(upper(a, b));
            let weight = k.sample(&mut rec, Vec2::new(u, v));
            prop_assert_eq!(weight, albedo);
            prop_assert!(rec.wo.z >= 0.0);
            prop_assert_eq!(rec.measure, Measure::SolidAngle);
            prop_assert_eq!(rec.eta, 1.0);
        }

        #[test]
        fn sample_fails_below_surface(a in 0.0f32..1.0, b in 0.0f32..1.0,
            u in 0.0f32..1.0, v in 0.0f32..1.0)
        {
            let k = kernel(Color3::splat(0.5));
            let w = upper(a, b);
            let mut rec = BsdfQueryRecord::new(Vec3::new(w.x, w.y, -w.z));
            prop_assert_eq!(k.sample(&mut rec, Vec2::new(u, v)), Color3::ZERO);
        }

        #[test]
        fn eval_over_pdf_is_albedo(a in 0.0f32..1.0, b in 0.0f32..1.0,
            u in 0.0f32..1.0, v in 0.0f32..1.0)
        {
            let albedo = Color3::new(0.9, 0.5, 0.1);
            let k = kernel(albedo);
            let mut rec = BsdfQueryRecord::new(upper(a, b));
            let weight = k.sample(&mut rec, Vec2::new(u, v));
            let pdf = k.pdf(&rec);
            prop_assume!(pdf > 0.0);
            let ratio = k.eval(&rec) / pdf;
            prop_assert!(approx::relative_eq!(ratio, weight, epsilon = 1.0e-5, max_relative = 1.0e-4));
        }

        #[test]
        fn non_solid_angle_measures_are_zero(a in 0.0f32..1.0, b in 0.0f32..1.0,
            c in 0.0f32..1.0, d in 0.0f32..1.0, discrete in any::<bool>())
        {
            let k = kernel(Color3::splat(0.5));
            let measure = if discrete { Measure::Discrete } else { Measure::Unknown };
            let rec = BsdfQueryRecord::with_outgoing(upper(a, b), upper(c, d), measure);
            prop_assert_eq!(k.eval(&rec), Color3::ZERO);
            prop_assert_eq!(k.pdf(&rec), 0.0);
        }
    }
}
