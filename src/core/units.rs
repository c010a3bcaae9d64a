//! Physical constants and unit conversions.
//!
//! Internally everything is SI: seconds, kelvin, kilograms, metres per second
//! and joules. Configuration commands carry residence times in nanoseconds.

/// Boltzmann constant [J/K].
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Unified atomic mass unit [kg].
pub const ATOMIC_MASS_UNIT: f64 = 1.660_539_066_60e-27;

/// One electronvolt [J].
pub const ELECTRON_VOLT: f64 = 1.602_176_634e-19;

/// One nanosecond [s].
pub const NANOSECOND: f64 = 1e-9;

/// Convert a duration in nanoseconds to seconds.
#[inline]
pub fn ns_to_s(ns: f64) -> f64 {
    ns * NANOSECOND
}

/// Convert a duration in seconds to nanoseconds.
#[inline]
pub fn s_to_ns(s: f64) -> f64 {
    s / NANOSECOND
}

/// Convert an energy in joules to electronvolts.
#[inline]
pub fn j_to_ev(e: f64) -> f64 {
    e / ELECTRON_VOLT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanoseconds_round_trip() {
        assert!((ns_to_s(120.0) - 1.2e-7).abs() < 1e-20);
        assert!((s_to_ns(ns_to_s(42.0)) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn thermal_energy_at_room_temperature() {
        // kT at 300 K is about 25.85 meV
        let kt_ev = j_to_ev(BOLTZMANN * 300.0);
        assert!((kt_ev - 0.025852).abs() < 1e-5);
    }
}
