use crate::core::frame::{dot, scale, SurfaceFrame, Vec3};
use crate::core::material::SurfaceMaterial;
use crate::core::particle::{Species, Track};
use crate::core::sampling::{
    sample_effusive_velocity, sample_lambertian_direction, sample_residence_time, EffusiveSample,
    LambertianSample,
};
use crate::core::table::{AdsorptionKey, AdsorptionTimeTable, LoadOutcome};
use crate::core::track_data::ProcessId;
use crate::error::{Error, Result};
use rand::Rng;

/// Default geometric tolerance [m] for degenerate surface normals.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// How a surface splits incident particles between sticking and immediate
/// diffuse re-emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickingModel {
    /// Fixed sticking coefficient `s`: p_ads = s, p_diff = 1 - s.
    Constant { coefficient: f64 },
    /// Langmuir sticking on a partially covered surface:
    /// p_ads = s0 (1 - θ), p_diff = 1 - p_ads.
    Langmuir {
        initial_coefficient: f64,
        coverage: f64,
    },
}

impl Default for StickingModel {
    /// Every incident particle sticks wherever an adsorption time is configured.
    fn default() -> Self {
        StickingModel::Constant { coefficient: 1.0 }
    }
}

impl StickingModel {
    /// Check that every coefficient lies in [0, 1].
    pub fn validate(&self) -> Result<()> {
        let in_unit = |x: f64| x.is_finite() && (0.0..=1.0).contains(&x);
        match *self {
            StickingModel::Constant { coefficient } => {
                if !in_unit(coefficient) {
                    return Err(Error::InvalidParam(format!(
                        "sticking coefficient must lie in [0, 1], got {coefficient}"
                    )));
                }
            }
            StickingModel::Langmuir {
                initial_coefficient,
                coverage,
            } => {
                if !in_unit(initial_coefficient) {
                    return Err(Error::InvalidParam(format!(
                        "initial sticking coefficient must lie in [0, 1], got {initial_coefficient}"
                    )));
                }
                if !in_unit(coverage) {
                    return Err(Error::InvalidParam(format!(
                        "surface coverage must lie in [0, 1], got {coverage}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fraction of incident particles that stick.
    #[inline]
    pub fn adsorption_probability(&self) -> f64 {
        match *self {
            StickingModel::Constant { coefficient } => coefficient,
            StickingModel::Langmuir {
                initial_coefficient,
                coverage,
            } => initial_coefficient * (1.0 - coverage),
        }
    }

    /// Fraction of incident particles re-emitted immediately.
    #[inline]
    pub fn diffusion_probability(&self) -> f64 {
        1.0 - self.adsorption_probability()
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessConfig {
    /// Normals shorter than this are rejected as degenerate.
    pub tolerance: f64,
    /// Sticking policy.
    pub sticking: StickingModel,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            sticking: StickingModel::default(),
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidParam(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tolerance
            )));
        }
        self.sticking.validate()
    }
}

/// Whether the engine must invoke a process regardless of its distance hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceCondition {
    NotForced,
    Forced,
}

/// Distance hint returned to the transport engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionDistance {
    /// Path length until the next interaction [m].
    pub distance: f64,
    pub condition: ForceCondition,
}

/// Boundary context supplied by the engine for one step.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryStep<'a> {
    /// Material of the surface being hit.
    pub material: &'a SurfaceMaterial,
    /// Post-step point on the boundary (global).
    pub point: Vec3,
    /// Surface normal (global); either orientation is accepted.
    pub normal: Vec3,
}

/// What happened to the particle at the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceOutcome {
    /// Immediate diffuse re-emission.
    Diffused,
    /// Held on the surface for `residence_time` seconds, then re-emitted.
    Adsorbed { residence_time: f64 },
}

/// State-change descriptor handed back to the engine.
///
/// The outgoing energy is thermal and unrelated to the incident energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleChange {
    /// Outgoing unit momentum direction (global).
    pub direction: Vec3,
    /// Outgoing velocity: `speed * direction` [m/s].
    pub velocity: Vec3,
    /// Outgoing kinetic energy [J].
    pub kinetic_energy: f64,
    /// Proper-time (and lab-time) delay before the particle continues [s].
    pub time_delay: f64,
    pub outcome: SurfaceOutcome,
}

impl ParticleChange {
    /// Write the change back to `track`.
    pub fn apply(&self, track: &mut Track) -> Result<()> {
        track.set_direction(self.direction)?;
        track.kinetic_energy = self.kinetic_energy;
        track.global_time += self.time_delay;
        track.proper_time += self.time_delay;
        Ok(())
    }

    #[inline]
    pub fn is_adsorbed(&self) -> bool {
        matches!(self.outcome, SurfaceOutcome::Adsorbed { .. })
    }
}

/// Thermal adsorption/effusion process triggered at geometric boundaries.
///
/// The process holds only configuration (sticking policy, adsorption-time
/// table). Every invocation works on local values, and randomness comes from
/// the caller, so one instance may serve any number of tracks and threads once
/// configured.
#[derive(Debug, Clone)]
pub struct SurfaceInteractionProcess {
    id: ProcessId,
    name: String,
    config: ProcessConfig,
    table: AdsorptionTimeTable,
}

impl SurfaceInteractionProcess {
    /// Create a process named "effusion".
    pub fn new(id: ProcessId, config: ProcessConfig) -> Result<Self> {
        Self::with_name(id, "effusion", config)
    }

    /// Create a process with a custom name.
    pub fn with_name(id: ProcessId, name: impl Into<String>, config: ProcessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id,
            name: name.into(),
            config,
            table: AdsorptionTimeTable::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    #[inline]
    pub fn table(&self) -> &AdsorptionTimeTable {
        &self.table
    }

    /// Replace the sticking policy.
    pub fn set_sticking_model(&mut self, sticking: StickingModel) -> Result<()> {
        sticking.validate()?;
        self.config.sticking = sticking;
        Ok(())
    }

    // ============ Configuration ============

    /// Install or overwrite the mean adsorption time for a (particle, material)
    /// pair. `value_ns` is in nanoseconds; the previous value is returned in
    /// seconds.
    pub fn set_adsorption_time(
        &mut self,
        particle_z: u32,
        material_z: u32,
        value_ns: f64,
    ) -> Result<Option<f64>> {
        self.table
            .insert_ns(AdsorptionKey::new(particle_z, material_z), value_ns)
    }

    /// Apply a `"<particleZ>;<materialZ>;<timeNs>"` command.
    ///
    /// Empty or short commands are skipped and reported as
    /// `LoadOutcome::Ignored`; non-numeric fields are `Error::Parse`.
    pub fn load_adsorption_time(&mut self, command: &str) -> Result<LoadOutcome> {
        self.table.load(command)
    }

    /// Apply one command per line; see [`AdsorptionTimeTable::load_lines`].
    pub fn load_adsorption_times(&mut self, text: &str) -> Result<usize> {
        self.table.load_lines(text)
    }

    /// Mean adsorption time [s] for a pair, if configured.
    #[inline]
    pub fn adsorption_time(&self, particle_z: u32, material_z: u32) -> Option<f64> {
        self.table.get(AdsorptionKey::new(particle_z, material_z))
    }

    // ============ Engine contract ============

    /// The process fires on boundary crossings only, so it never limits the step.
    pub fn interaction_distance(&self, _track: &Track) -> InteractionDistance {
        InteractionDistance {
            distance: f64::INFINITY,
            condition: ForceCondition::NotForced,
        }
    }

    /// Fraction of incident particles that stick, from the sticking policy.
    pub fn adsorption_probability(&self, _species: &Species, _material: &SurfaceMaterial) -> f64 {
        self.config.sticking.adsorption_probability()
    }

    /// Fraction of incident particles re-emitted immediately.
    pub fn diffusion_probability(&self, _species: &Species, _material: &SurfaceMaterial) -> f64 {
        self.config.sticking.diffusion_probability()
    }

    /// Probability that this hit ends in adsorption.
    ///
    /// The normalized sticking probability is scaled by a residence factor:
    /// 1 when the table holds a positive mean time for the pair, 0 otherwise.
    /// A pair without an entry therefore always diffuses.
    pub fn full_adsorption_probability(&self, species: &Species, material: &SurfaceMaterial) -> f64 {
        let p_ads = self.adsorption_probability(species, material);
        let p_diff = self.diffusion_probability(species, material);
        let total = p_ads + p_diff;
        if total <= 0.0 {
            return 0.0;
        }
        let survival = match self.adsorption_time(species.z, material.z) {
            Some(mean) if mean > 0.0 => 1.0,
            _ => 0.0,
        };
        (p_ads / total) * survival
    }

    /// Surface frame at the boundary, with its normal turned against the
    /// incident direction so re-emission goes back into the region the
    /// particle came from.
    pub fn boundary_frame(&self, track: &Track, step: &BoundaryStep<'_>) -> Result<SurfaceFrame> {
        let normal = if dot(&step.normal, &track.direction) > 0.0 {
            scale(&step.normal, -1.0)
        } else {
            step.normal
        };
        SurfaceFrame::new(step.point, normal, self.config.tolerance)
    }

    /// Draw a cosine-law outgoing direction at the boundary.
    pub fn sample_lambertian_direction<R: Rng + ?Sized>(
        &self,
        track: &Track,
        step: &BoundaryStep<'_>,
        rng: &mut R,
    ) -> Result<LambertianSample> {
        let frame = self.boundary_frame(track, step)?;
        Ok(sample_lambertian_direction(&frame, rng))
    }

    /// Draw an effusive velocity and kinetic energy for `track` leaving a wall
    /// at the material temperature.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if the mass or temperature is unusable.
    pub fn sample_maxwell_boltzmann_kinetic_energy<R: Rng + ?Sized>(
        &self,
        track: &Track,
        step: &BoundaryStep<'_>,
        rng: &mut R,
    ) -> Result<EffusiveSample> {
        track.species.validate()?;
        step.material.validate()?;
        let frame = self.boundary_frame(track, step)?;
        sample_effusive_velocity(track.species.mass, step.material.temperature, &frame, rng)
    }

    /// Resolve one boundary hit: stick or effuse, then re-emit thermally.
    ///
    /// Attaches the track's auxiliary state on first contact and records the
    /// residence time on adsorption. The returned change is not yet applied to
    /// the track's kinematics; see [`ParticleChange::apply`].
    pub fn execute<R: Rng + ?Sized>(
        &self,
        track: &mut Track,
        step: &BoundaryStep<'_>,
        rng: &mut R,
    ) -> Result<ParticleChange> {
        track.auxiliary_or_attach(self.id);

        let full = self.full_adsorption_probability(&track.species, step.material);
        let outcome = if rng.random::<f64>() < full {
            // full > 0 implies a positive table entry
            let mean = self
                .adsorption_time(track.species.z, step.material.z)
                .unwrap_or(0.0);
            let residence_time = sample_residence_time(mean, rng)?;
            SurfaceOutcome::Adsorbed { residence_time }
        } else {
            SurfaceOutcome::Diffused
        };

        let direction = self.sample_lambertian_direction(track, step, rng)?.direction;
        let thermal = self.sample_maxwell_boltzmann_kinetic_energy(track, step, rng)?;

        let time_delay = match outcome {
            SurfaceOutcome::Adsorbed { residence_time } => {
                track
                    .auxiliary_or_attach(self.id)
                    .record_adsorption(residence_time)?;
                residence_time
            }
            SurfaceOutcome::Diffused => 0.0,
        };

        log::debug!(
            "{} track {} ({} on {}): {:?}, E = {:e} J",
            self.name,
            track.id,
            track.species.name,
            step.material.name,
            outcome,
            thermal.kinetic_energy
        );

        Ok(ParticleChange {
            direction,
            velocity: scale(&direction, thermal.speed),
            kinetic_energy: thermal.kinetic_energy,
            time_delay,
            outcome,
        })
    }
}
