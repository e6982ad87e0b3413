use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Measure with respect to which a density or a scattering value is expressed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Not known yet, e.g. a record that has not been sampled.
    #[default]
    Unknown,
    /// Solid angle measure on the unit sphere of directions.
    SolidAngle,
    /// Discrete (delta) measure.
    Discrete,
}

impl Measure {
    /// Returns whether it's the solid angle measure.
    pub const fn is_solid_angle(&self) -> bool { matches!(self, Self::SolidAngle) }

    /// Returns whether it's the discrete measure.
    pub const fn is_discrete(&self) -> bool { matches!(self, Self::Discrete) }
}

impl Display for Measure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Measure::Unknown => "unknown",
                Measure::SolidAngle => "solid angle",
                Measure::Discrete => "discrete",
            }
        )
    }
}
