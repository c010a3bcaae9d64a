//! Random variates for thermal re-emission from a surface.
//!
//! All samplers are pure functions of their inputs and the supplied RNG, so a
//! single process instance can serve many tracks and threads.

use crate::core::frame::{SurfaceFrame, Vec3};
use crate::core::units::BOLTZMANN;
use crate::error::{Error, Result};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use std::f64::consts::{PI, TAU};

/// Outgoing direction drawn from the Lambertian (cosine) law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertianSample {
    /// Unit direction in global coordinates.
    pub direction: Vec3,
    /// Same direction in the surface frame (tangent, bitangent, normal).
    pub local: Vec3,
    /// Cosine of the polar angle from the surface normal, in [0, 1].
    pub cos_theta: f64,
    /// Azimuth in [0, 2π).
    pub phi: f64,
    /// The frame the direction was built in.
    pub frame: SurfaceFrame,
}

/// Velocity drawn from the effusive (flux-weighted) Maxwell–Boltzmann distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffusiveSample {
    /// Velocity in the surface frame; component 2 is the normal one and is >= 0.
    pub local_velocity: Vec3,
    /// Velocity in global coordinates [m/s].
    pub velocity: Vec3,
    /// |v| [m/s].
    pub speed: f64,
    /// ½ m |v|² [J].
    pub kinetic_energy: f64,
}

/// Thermal velocity scale sqrt(kT/m) [m/s].
///
/// Errors:
/// - `Error::InvalidParam` if `mass` or `temperature` is non-finite or non-positive.
pub fn thermal_velocity_scale(mass: f64, temperature: f64) -> Result<f64> {
    if !mass.is_finite() || mass <= 0.0 {
        return Err(Error::InvalidParam(format!(
            "mass must be finite and > 0, got {mass}"
        )));
    }
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(Error::InvalidParam(format!(
            "temperature must be finite and > 0, got {temperature}"
        )));
    }
    Ok((BOLTZMANN * temperature / mass).sqrt())
}

/// Expected normal speed of particles leaving a surface (flux-weighted): sqrt(πkT/2m).
pub fn mean_effusive_normal_speed(mass: f64, temperature: f64) -> Result<f64> {
    Ok(thermal_velocity_scale(mass, temperature)? * (PI / 2.0).sqrt())
}

/// Expected |v_n| of a plain Maxwell–Boltzmann gas at rest: sqrt(2kT/πm).
pub fn mean_bulk_normal_speed(mass: f64, temperature: f64) -> Result<f64> {
    Ok(thermal_velocity_scale(mass, temperature)? * (2.0 / PI).sqrt())
}

/// Draw a direction on the hemisphere above `frame.normal` with density ∝ cos θ.
///
/// cos θ = sqrt(u) with u ~ U[0,1), azimuth uniform in [0, 2π).
pub fn sample_lambertian_direction<R: Rng + ?Sized>(
    frame: &SurfaceFrame,
    rng: &mut R,
) -> LambertianSample {
    let phi = TAU * rng.random::<f64>();
    let cos_theta = rng.random::<f64>().sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let local = [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta];
    LambertianSample {
        direction: frame.to_global(&local),
        local,
        cos_theta,
        phi,
        frame: *frame,
    }
}

/// Draw a velocity for a particle of `mass` [kg] effusing from a wall at
/// `temperature` [K].
///
/// Tangential components are N(0, sqrt(kT/m)). The normal component follows
/// p(v_n) ∝ v_n exp(-m v_n² / 2kT), sampled by inverse transform:
/// v_n = sqrt(kT/m) · sqrt(-2 ln(1-u)).
pub fn sample_effusive_velocity<R: Rng + ?Sized>(
    mass: f64,
    temperature: f64,
    frame: &SurfaceFrame,
    rng: &mut R,
) -> Result<EffusiveSample> {
    let sigma = thermal_velocity_scale(mass, temperature)?;
    let tangential = Normal::new(0.0, sigma)
        .map_err(|e| Error::InvalidParam(format!("thermal velocity scale {sigma}: {e}")))?;

    let vt1 = tangential.sample(rng);
    let vt2 = tangential.sample(rng);
    let u: f64 = rng.random();
    let vn = sigma * (-2.0 * (1.0 - u).ln()).sqrt();

    let local_velocity = [vt1, vt2, vn];
    let speed_sq = vt1 * vt1 + vt2 * vt2 + vn * vn;
    Ok(EffusiveSample {
        local_velocity,
        velocity: frame.to_global(&local_velocity),
        speed: speed_sq.sqrt(),
        kinetic_energy: 0.5 * mass * speed_sq,
    })
}

/// Draw a residence time from an exponential distribution with the given mean [s].
///
/// A zero mean yields zero.
///
/// Errors:
/// - `Error::InvalidParam` if `mean` is negative or non-finite.
pub fn sample_residence_time<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> Result<f64> {
    if !mean.is_finite() || mean < 0.0 {
        return Err(Error::InvalidParam(format!(
            "mean residence time must be finite and >= 0, got {mean}"
        )));
    }
    if mean == 0.0 {
        return Ok(0.0);
    }
    let exp = Exp::new(1.0 / mean)
        .map_err(|e| Error::InvalidParam(format!("mean residence time {mean}: {e}")))?;
    Ok(exp.sample(rng))
}
