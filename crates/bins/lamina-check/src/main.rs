mod checks;

use base::{
    cli::{self, CommonArgs},
    object::ObjectFactory,
    props::PropertyList,
    Color3,
};
use bxdf::{device::DeviceSlot, DiffuseBsdf, DiffuseKernel};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
enum CheckError {
    #[error("Object \"{0}\" is not a diffuse BSDF")]
    NotDiffuse(String),

    #[error("{failed} of {total} checks exceeded the tolerance")]
    Failed { failed: usize, total: usize },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, launch_time) = cli::parse_args::<CliArgs>("lamina-check");

    cli::setup_logging(
        args.common.log_timestamp.then_some(launch_time),
        args.common.log_level,
        &[],
    );

    let mut props = match &args.config {
        Some(path) => PropertyList::load_yaml(path)?,
        None => PropertyList::new(),
    };
    if let Some(albedo) = &args.albedo {
        props.set_color("albedo", Color3::new(albedo[0], albedo[1], albedo[2]));
    }

    let mut factory = ObjectFactory::new();
    bxdf::register_builtin(&mut factory)?;
    let object = factory.create("diffuse", &props)?;
    let bsdf = object
        .downcast_ref::<DiffuseBsdf>()
        .ok_or_else(|| CheckError::NotDiffuse(object.to_string()))?;
    log::info!("{} with albedo {}", bsdf, bsdf.albedo());

    let slot = DeviceSlot::<DiffuseKernel>::new();
    let kernel = slot.upload(bsdf)?;

    log::info!(
        "Running checks with {} samples on {} threads",
        args.samples,
        rayon::current_num_threads()
    );
    let outcomes = checks::run_all(kernel, kernel.albedo(), args.samples, args.seed);
    let mut failed = 0;
    for outcome in &outcomes {
        if outcome.passed(args.tolerance) {
            log::info!("[PASS] {}", outcome);
        } else {
            log::error!("[FAIL] {}", outcome);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(Box::new(CheckError::Failed {
            failed,
            total: outcomes.len(),
        }));
    }
    Ok(())
}

#[derive(clap::Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about = "Statistical checks of the diffuse scattering kernel."
)]
pub struct CliArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Albedo of the material, overrides the value of the configuration file.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
    pub albedo: Option<Vec<f32>>,

    /// YAML property list describing the material.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of samples per check.
    #[arg(short = 'n', long, default_value_t = 1 << 20)]
    pub samples: u32,

    /// Seed of the random number generator.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Largest accepted deviation.
    #[arg(long, default_value_t = 1.0e-2)]
    pub tolerance: f64,
}
