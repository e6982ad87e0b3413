//! # lamina-base
//! Core library for lamina.
//! Contains the value types shared by the scattering models and the
//! collaborator layers around them (configuration, object registry, logging).
#![warn(missing_docs)]

mod color;
mod measure;

pub mod math;
pub mod object;
pub mod props;
pub mod warp;

#[cfg(feature = "cli")]
pub mod cli;

pub use color::*;
pub use measure::*;
