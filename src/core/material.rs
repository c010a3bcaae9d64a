use crate::error::{Error, Result};

/// Ambient temperature of the target assembly the presets are set up for [K].
pub const DEFAULT_TEMPERATURE: f64 = 2273.15;

/// A surface material as seen by the interaction process.
///
/// Only the atomic number (adsorption-table key) and the wall temperature
/// (effusion sampling) are consulted; everything else about the material
/// belongs to the geometry layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    /// Human-readable name.
    pub name: String,
    /// Atomic number used to key the adsorption-time table.
    pub z: u32,
    /// Surface temperature [K] (> 0).
    pub temperature: f64,
}

impl SurfaceMaterial {
    /// Create a material after validating its temperature.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `temperature` is non-finite or non-positive.
    pub fn new(name: impl Into<String>, z: u32, temperature: f64) -> Result<Self> {
        let m = Self {
            name: name.into(),
            z,
            temperature,
        };
        m.validate()?;
        Ok(m)
    }

    /// Check the temperature precondition. Fields are public, so the process
    /// re-validates before sampling.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "temperature of material '{}' must be finite and > 0, got {}",
                self.name, self.temperature
            )));
        }
        Ok(())
    }

    /// Graphite (carbon, Z = 6).
    pub fn graphite(temperature: f64) -> Result<Self> {
        Self::new("Graphite", 6, temperature)
    }

    /// Tantalum (Z = 73).
    pub fn tantalum(temperature: f64) -> Result<Self> {
        Self::new("Tantalum", 73, temperature)
    }

    /// Uranium carbide UC4, keyed by its heavy constituent (U, Z = 92).
    pub fn uranium_carbide(temperature: f64) -> Result<Self> {
        Self::new("UC4", 92, temperature)
    }
}
