//! Monte Carlo checks of a scattering kernel.
//!
//! The samples are split into fixed-size chunks processed in parallel; each
//! chunk draws from its own stream of a seeded ChaCha generator, so results
//! do not depend on the number of worker threads.

use base::{
    math::{Vec2, Vec3},
    warp, Color3, Measure,
};
use bxdf::{Bsdf, BsdfQueryRecord};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt::{Display, Formatter};

const CHUNK_SIZE: u32 = 4096;

/// Outcome of a single check.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Name of the check.
    pub name: &'static str,
    /// Measured deviation from the expected value.
    pub error: f64,
    /// Number of samples that violated a hard constraint.
    pub violations: u64,
}

impl Outcome {
    /// Returns whether the check passed with the given tolerance.
    pub fn passed(&self, tolerance: f64) -> bool { self.violations == 0 && self.error <= tolerance }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<14} error = {:.3e}, violations = {}",
            self.name, self.error, self.violations
        )
    }
}

/// Partial result of a chunk: maximum or summed error and violation count.
#[derive(Debug, Default, Copy, Clone)]
struct Partial {
    error: f64,
    count: u64,
    violations: u64,
}

/// Runs `op` over all chunks and merges the partial results with `merge`.
fn run_chunks<F, M>(samples: u32, seed: u64, op: F, merge: M) -> Partial
where
    F: Fn(&mut ChaCha8Rng, u32) -> Partial + Sync + Send,
    M: Fn(Partial, Partial) -> Partial + Sync + Send,
{
    let n_chunks = samples.div_ceil(CHUNK_SIZE);
    (0..n_chunks)
        .into_par_iter()
        .map(|c| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(c as u64);
            let count = CHUNK_SIZE.min(samples - c * CHUNK_SIZE);
            op(&mut rng, count)
        })
        .reduce(Partial::default, merge)
}

fn max_merge(a: Partial, b: Partial) -> Partial {
    Partial {
        error: a.error.max(b.error),
        count: a.count + b.count,
        violations: a.violations + b.violations,
    }
}

fn sum_merge(a: Partial, b: Partial) -> Partial {
    Partial {
        error: a.error + b.error,
        count: a.count + b.count,
        violations: a.violations + b.violations,
    }
}

/// Largest channel-wise relative deviation between two colors.
fn relative_deviation(value: Color3, expected: Color3) -> f64 {
    (0..3)
        .map(|i| {
            let e = expected[i] as f64;
            let d = (value[i] as f64 - e).abs();
            if e == 0.0 {
                d
            } else {
                d / e
            }
        })
        .fold(0.0, f64::max)
}

fn random_sample(rng: &mut ChaCha8Rng) -> Vec2 { Vec2::new(rng.gen(), rng.gen()) }

/// Random direction strictly above the surface.
fn random_upper(rng: &mut ChaCha8Rng) -> Vec3 {
    let w = warp::square_to_uniform_sphere(random_sample(rng));
    Vec3::new(w.x, w.y, w.z.abs().max(1.0e-4)).normalize()
}

/// Sampled weights must equal the albedo, sampled directions must lie in the
/// upper hemisphere with the solid angle measure.
pub fn sampling<K: Bsdf>(kernel: &K, albedo: Color3, samples: u32, seed: u64) -> Outcome {
    let p = run_chunks(
        samples,
        seed,
        |rng, count| {
            let mut part = Partial::default();
            for _ in 0..count {
                let mut rec = BsdfQueryRecord::new(random_upper(rng));
                let weight = kernel.sample(&mut rec, random_sample(rng));
                part.error = part.error.max(relative_deviation(weight, albedo));
                if rec.wo.z < 0.0 || rec.measure != Measure::SolidAngle {
                    part.violations += 1;
                }
                part.count += 1;
            }
            part
        },
        max_merge,
    );
    Outcome {
        name: "sampling",
        error: p.error,
        violations: p.violations,
    }
}

/// eval / pdf must reproduce the sampled weight for every sampled direction.
pub fn consistency<K: Bsdf>(kernel: &K, samples: u32, seed: u64) -> Outcome {
    let p = run_chunks(
        samples,
        seed,
        |rng, count| {
            let mut part = Partial::default();
            for _ in 0..count {
                let mut rec = BsdfQueryRecord::new(random_upper(rng));
                let weight = kernel.sample(&mut rec, random_sample(rng));
                let pdf = kernel.pdf(&rec);
                if pdf <= 0.0 {
                    // Grazing direction: zero-measure event.
                    continue;
                }
                let ratio = kernel.eval(&rec) / pdf;
                part.error = part.error.max(relative_deviation(ratio, weight));
                part.count += 1;
            }
            part
        },
        max_merge,
    );
    Outcome {
        name: "consistency",
        error: p.error,
        violations: p.violations,
    }
}

/// The density must integrate to one over the upper hemisphere.
pub fn normalization<K: Bsdf>(kernel: &K, samples: u32, seed: u64) -> Outcome {
    let wi = Vec3::new(0.3, -0.2, 0.9).normalize();
    let p = run_chunks(
        samples,
        seed,
        |rng, count| {
            let mut part = Partial::default();
            for _ in 0..count {
                let wo = warp::square_to_uniform_hemisphere(random_sample(rng));
                let rec = BsdfQueryRecord::with_outgoing(wi, wo, Measure::SolidAngle);
                part.error +=
                    (kernel.pdf(&rec) / warp::square_to_uniform_hemisphere_pdf(&wo)) as f64;
                part.count += 1;
            }
            part
        },
        sum_merge,
    );
    let estimate = if p.count == 0 {
        0.0
    } else {
        p.error / p.count as f64
    };
    log::debug!("∫pdf dω ≈ {}", estimate);
    Outcome {
        name: "normalization",
        error: (estimate - 1.0).abs(),
        violations: 0,
    }
}

/// Sampling from below the surface must fail.
pub fn below_surface<K: Bsdf>(kernel: &K, samples: u32, seed: u64) -> Outcome {
    let p = run_chunks(
        samples,
        seed,
        |rng, count| {
            let mut part = Partial::default();
            for _ in 0..count {
                let w = random_upper(rng);
                let mut rec = BsdfQueryRecord::new(Vec3::new(w.x, w.y, -w.z));
                if !kernel.sample(&mut rec, random_sample(rng)).is_zero() {
                    part.violations += 1;
                }
                part.count += 1;
            }
            part
        },
        sum_merge,
    );
    Outcome {
        name: "below-surface",
        error: 0.0,
        violations: p.violations,
    }
}

/// Runs every check.
pub fn run_all<K: Bsdf>(kernel: &K, albedo: Color3, samples: u32, seed: u64) -> Vec<Outcome> {
    vec![
        sampling(kernel, albedo, samples, seed),
        consistency(kernel, samples, seed.wrapping_add(1)),
        normalization(kernel, samples, seed.wrapping_add(2)),
        below_surface(kernel, samples, seed.wrapping_add(3)),
    ]
}
