use crate::core::frame::{norm, scale, Vec3, DIM};
use crate::core::track_data::{ProcessId, TrackAuxiliaryState};
use crate::core::units::ATOMIC_MASS_UNIT;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Particle species: the adsorption-table key and the mass used for thermal sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    /// Human-readable name (e.g. "Cs").
    pub name: String,
    /// Atomic number used to key the adsorption-time table.
    pub z: u32,
    /// Particle mass [kg] (> 0).
    pub mass: f64,
}

impl Species {
    /// Create a species with its mass given in kilograms.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `mass` is non-finite or non-positive.
    pub fn new(name: impl Into<String>, z: u32, mass: f64) -> Result<Self> {
        let s = Self {
            name: name.into(),
            z,
            mass,
        };
        s.validate()?;
        Ok(s)
    }

    /// Create a species with its mass given in atomic mass units.
    pub fn from_amu(name: impl Into<String>, z: u32, mass_amu: f64) -> Result<Self> {
        Self::new(name, z, mass_amu * ATOMIC_MASS_UNIT)
    }

    /// Check the mass precondition.
    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "mass of species '{}' must be finite and > 0, got {}",
                self.name, self.mass
            )));
        }
        Ok(())
    }
}

/// The engine's view of one tracked particle.
///
/// Fields:
/// - `id`: stable track identifier
/// - `species`: particle species
/// - `position`: current position [m]
/// - `direction`: unit momentum direction
/// - `kinetic_energy`: kinetic energy [J]
/// - `global_time`: lab time since the event started [s]
/// - `proper_time`: time in the particle's rest frame [s]
#[derive(Debug, Clone)]
pub struct Track {
    /// Stable track identifier.
    pub id: u64,
    /// Particle species.
    pub species: Species,
    /// Position (x, y, z).
    pub position: Vec3,
    /// Unit momentum direction.
    pub direction: Vec3,
    /// Kinetic energy (>= 0).
    pub kinetic_energy: f64,
    /// Lab-frame time.
    pub global_time: f64,
    /// Proper time.
    pub proper_time: f64,
    auxiliary: HashMap<ProcessId, TrackAuxiliaryState>,
}

impl Track {
    /// Create a new track after validating invariants. `direction` is normalized.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if any component is NaN/inf, the direction is zero,
    ///   or the kinetic energy is negative.
    pub fn new(
        id: u64,
        species: Species,
        position: Vec3,
        direction: Vec3,
        kinetic_energy: f64,
    ) -> Result<Self> {
        species.validate()?;
        if !position.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        let direction = unit_direction(direction)?;
        if !kinetic_energy.is_finite() || kinetic_energy < 0.0 {
            return Err(Error::InvalidParam(
                "kinetic energy must be finite and >= 0".into(),
            ));
        }
        Ok(Self {
            id,
            species,
            position,
            direction,
            kinetic_energy,
            global_time: 0.0,
            proper_time: 0.0,
            auxiliary: HashMap::new(),
        })
    }

    /// Speed derived from the kinetic energy: sqrt(2 E / m).
    #[inline]
    pub fn speed(&self) -> f64 {
        (2.0 * self.kinetic_energy / self.species.mass).sqrt()
    }

    /// Velocity vector: speed times direction.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        scale(&self.direction, self.speed())
    }

    /// Auxiliary state attached by `process`, if any.
    pub fn auxiliary(&self, process: ProcessId) -> Option<&TrackAuxiliaryState> {
        self.auxiliary.get(&process)
    }

    /// Auxiliary state for `process`, attaching a fresh one on first contact.
    pub fn auxiliary_or_attach(&mut self, process: ProcessId) -> &mut TrackAuxiliaryState {
        self.auxiliary
            .entry(process)
            .or_insert_with(|| TrackAuxiliaryState::new(process))
    }

    /// Set momentum direction (normalized, validated).
    pub fn set_direction(&mut self, direction: Vec3) -> Result<()> {
        self.direction = unit_direction(direction)?;
        Ok(())
    }
}

fn unit_direction(d: Vec3) -> Result<Vec3> {
    if !d.iter().all(|x| x.is_finite()) {
        return Err(Error::InvalidParam("direction must be finite".into()));
    }
    let len = norm(&d);
    if len <= f64::EPSILON {
        return Err(Error::InvalidParam("direction must be non-zero".into()));
    }
    let mut out = [0.0_f64; DIM];
    for (o, x) in out.iter_mut().zip(d.iter()) {
        *o = x / len;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caesium() -> Result<Species> {
        Species::from_amu("Cs", 55, 132.905)
    }

    #[test]
    fn new_track_ok() -> Result<()> {
        let t = Track::new(1, caesium()?, [0.0, 1.0, 2.0], [0.0, 0.0, 2.0], 1e-20)?;
        assert_eq!(t.id, 1);
        assert_eq!(t.direction, [0.0, 0.0, 1.0]);
        assert_eq!(t.global_time, 0.0);
        assert!(t.auxiliary(ProcessId(0)).is_none());
        Ok(())
    }

    #[test]
    fn invalid_mass_rejected() {
        let err = Species::new("ghost", 1, 0.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn zero_direction_rejected() -> Result<()> {
        let err = Track::new(0, caesium()?, [0.0; DIM], [0.0; DIM], 1.0).unwrap_err();
        assert!(err.to_string().contains("direction"));
        Ok(())
    }

    #[test]
    fn speed_from_kinetic_energy() -> Result<()> {
        // m = 2 kg, E = 25 J => v = 5 m/s
        let s = Species::new("test", 1, 2.0)?;
        let t = Track::new(7, s, [0.0; DIM], [3.0, 4.0, 0.0], 25.0)?;
        assert!((t.speed() - 5.0).abs() < 1e-12);
        let v = t.velocity();
        assert!((v[0] - 3.0).abs() < 1e-12 && (v[1] - 4.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn auxiliary_attached_once() -> Result<()> {
        let mut t = Track::new(1, caesium()?, [0.0; DIM], [1.0, 0.0, 0.0], 0.0)?;
        t.auxiliary_or_attach(ProcessId(3)).record_adsorption(1.0)?;
        t.auxiliary_or_attach(ProcessId(3)).record_adsorption(2.0)?;
        let aux = t.auxiliary(ProcessId(3)).expect("attached");
        assert_eq!(aux.total_time_sticked(), 3.0);
        assert_eq!(aux.owner(), ProcessId(3));
        Ok(())
    }
}
