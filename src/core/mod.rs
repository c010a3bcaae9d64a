#![allow(missing_docs)] // Doc comments live on the public items in each submodule

//! Surface interaction core: thermal effusion and adsorption at boundaries.
//!
//! The transport engine owns geometry and stepping; it hands this module a
//! [`Track`] and a [`BoundaryStep`] and gets a [`ParticleChange`] back.

pub mod frame;
pub mod material;
pub mod particle;
pub mod process;
pub mod sampling;
pub mod table;
pub mod track_data;
pub mod units;

pub use frame::SurfaceFrame;
pub use material::SurfaceMaterial;
pub use particle::{Species, Track};
pub use process::{
    BoundaryStep, ForceCondition, InteractionDistance, ParticleChange, ProcessConfig,
    StickingModel, SurfaceInteractionProcess, SurfaceOutcome,
};
pub use table::{AdsorptionKey, AdsorptionTimeTable, IgnoreReason, LoadOutcome};
pub use track_data::{ProcessId, TrackAuxiliaryState};
