use crate::error::{Error, Result};
use std::fmt;

/// Identifier of a surface interaction process instance.
///
/// Per-track state refers to its process through this key rather than a
/// pointer; track and process lifetimes are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process#{}", self.0)
    }
}

/// Adsorption bookkeeping attached to one track for its whole lifetime.
///
/// Invariant: `total_time_sticked` is the sum of every residence time ever
/// recorded, so it never decreases except through an explicit [`reset`].
///
/// [`reset`]: TrackAuxiliaryState::reset
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAuxiliaryState {
    owner: ProcessId,
    time_sticked: f64,
    total_time_sticked: f64,
    adsorption_count: u64,
}

impl TrackAuxiliaryState {
    /// Fresh state with zero residence time, owned by `owner`.
    pub fn new(owner: ProcessId) -> Self {
        Self {
            owner,
            time_sticked: 0.0,
            total_time_sticked: 0.0,
            adsorption_count: 0,
        }
    }

    /// Record one adsorption event lasting `duration` seconds.
    ///
    /// This is the only way to change the residence times; the total is kept in
    /// step with every recorded duration.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `duration` is negative or non-finite.
    pub fn record_adsorption(&mut self, duration: f64) -> Result<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidParam(format!(
                "residence time must be finite and >= 0, got {duration}"
            )));
        }
        self.time_sticked = duration;
        self.total_time_sticked += duration;
        self.adsorption_count = self.adsorption_count.saturating_add(1);
        Ok(())
    }

    /// Set the latest residence time. Same as [`record_adsorption`]: the total
    /// accumulates.
    ///
    /// [`record_adsorption`]: TrackAuxiliaryState::record_adsorption
    #[inline]
    pub fn set_time_sticked(&mut self, duration: f64) -> Result<()> {
        self.record_adsorption(duration)
    }

    /// Zero every counter, e.g. when a track is recycled by the engine.
    pub fn reset(&mut self) {
        self.time_sticked = 0.0;
        self.total_time_sticked = 0.0;
        self.adsorption_count = 0;
    }

    /// Duration of the most recent adsorption [s].
    #[inline]
    pub fn time_sticked(&self) -> f64 {
        self.time_sticked
    }

    /// Cumulative adsorption duration over the track history [s].
    #[inline]
    pub fn total_time_sticked(&self) -> f64 {
        self.total_time_sticked
    }

    /// Number of adsorption events recorded.
    #[inline]
    pub fn adsorption_count(&self) -> u64 {
        self.adsorption_count
    }

    /// The process this state belongs to.
    #[inline]
    pub fn owner(&self) -> ProcessId {
        self.owner
    }

    /// Emit a diagnostic dump through the `log` facade.
    pub fn print(&self) {
        log::info!("{self}");
    }
}

impl fmt::Display for TrackAuxiliaryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackAuxiliaryState[{}]: time sticked = {:e} s, total time sticked = {:e} s ({} adsorptions)",
            self.owner, self.time_sticked, self.total_time_sticked, self.adsorption_count
        )
    }
}
