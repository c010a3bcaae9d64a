//! Thermal effusion and adsorption of particles at solid surfaces.
//!
//! A particle reaching a boundary either re-emits diffusely with a thermal
//! velocity drawn at the wall temperature, or sticks for an exponentially
//! distributed residence time whose mean depends on the (particle, material)
//! pair. See [`core::SurfaceInteractionProcess`].
//!
//! Python bindings (`effusion.SurfaceProcess`) are built with the `python`
//! feature.

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::SurfaceInteractionProcess;
pub use crate::error::{Error, Result};
