use effusion::core::frame::dot;
use effusion::core::material::DEFAULT_TEMPERATURE;
use effusion::core::sampling::{
    mean_bulk_normal_speed, mean_effusive_normal_speed, sample_effusive_velocity,
    sample_lambertian_direction, thermal_velocity_scale,
};
use effusion::core::units::{ATOMIC_MASS_UNIT, BOLTZMANN};
use effusion::core::{
    BoundaryStep, ProcessConfig, ProcessId, Species, SurfaceFrame, SurfaceInteractionProcess,
    SurfaceMaterial, Track,
};
use effusion::error::Result;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::TAU;

const CS_MASS: f64 = 132.905 * ATOMIC_MASS_UNIT;

/// Lambertian law: cos θ = sqrt(u), so cos²θ is uniform on [0,1) and
/// E[cos θ] = 2/3; azimuth is uniform; nothing goes below the surface.
#[test]
fn lambertian_cosine_law() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(20240611);
    let frame = SurfaceFrame::new([0.1, 0.2, 0.3], [0.3, 0.4, -0.5], 1e-9)?;
    let n = 200_000usize;
    let bins = 10usize;
    let mut cos_sq_hist = vec![0usize; bins];
    let mut phi_hist = vec![0usize; bins];
    let mut sum_cos = 0.0;

    for _ in 0..n {
        let s = sample_lambertian_direction(&frame, &mut rng);
        let c = dot(&s.direction, &frame.normal);
        assert!(c >= -1e-12, "direction below surface: cos = {c}");
        assert!((c - s.cos_theta).abs() < 1e-9);
        sum_cos += s.cos_theta;
        let b = ((s.cos_theta * s.cos_theta) * bins as f64) as usize;
        cos_sq_hist[b.min(bins - 1)] += 1;
        let b = (s.phi / TAU * bins as f64) as usize;
        phi_hist[b.min(bins - 1)] += 1;
    }

    let mean_cos = sum_cos / n as f64;
    assert!(
        (mean_cos - 2.0 / 3.0).abs() < 0.005,
        "mean cos θ = {mean_cos}, expected 2/3"
    );
    let expected = n as f64 / bins as f64;
    for (i, (&c, &p)) in cos_sq_hist.iter().zip(&phi_hist).enumerate() {
        assert!(
            ((c as f64 - expected) / expected).abs() < 0.05,
            "cos²θ bin {i} has {c}, expected ~{expected}"
        );
        assert!(
            ((p as f64 - expected) / expected).abs() < 0.05,
            "azimuth bin {i} has {p}, expected ~{expected}"
        );
    }
    Ok(())
}

/// Effusive sampling is flux weighted: the mean normal speed matches
/// sqrt(πkT/2m) and exceeds that of a plain Maxwell–Boltzmann gas.
#[test]
fn effusive_normal_speed_is_flux_weighted() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(77);
    let t = DEFAULT_TEMPERATURE;
    let frame = SurfaceFrame::new([0.0; 3], [0.0, 1.0, 0.0], 1e-9)?;
    let n = 100_000usize;

    let mut sum_vn = 0.0;
    let mut sum_ke = 0.0;
    for _ in 0..n {
        let s = sample_effusive_velocity(CS_MASS, t, &frame, &mut rng)?;
        sum_vn += s.local_velocity[2];
        sum_ke += s.kinetic_energy;
    }
    let mean_vn = sum_vn / n as f64;
    let mean_ke = sum_ke / n as f64;

    // Plain Maxwell–Boltzmann |v_n| at the same temperature
    let sigma = thermal_velocity_scale(CS_MASS, t)?;
    let bulk = Normal::new(0.0, sigma).expect("valid sigma");
    let mean_bulk: f64 = (0..n).map(|_| bulk.sample(&mut rng).abs()).sum::<f64>() / n as f64;

    let expected = mean_effusive_normal_speed(CS_MASS, t)?;
    assert!(
        ((mean_vn - expected) / expected).abs() < 0.01,
        "mean v_n = {mean_vn}, expected {expected}"
    );
    assert!(
        mean_vn > mean_bulk,
        "flux-weighted mean {mean_vn} should exceed bulk mean {mean_bulk}"
    );
    let bulk_expected = mean_bulk_normal_speed(CS_MASS, t)?;
    assert!(((mean_bulk - bulk_expected) / bulk_expected).abs() < 0.01);

    // Effusing particles carry 2kT on average
    let two_kt = 2.0 * BOLTZMANN * t;
    assert!(
        ((mean_ke - two_kt) / two_kt).abs() < 0.01,
        "mean KE = {mean_ke}, expected {two_kt}"
    );
    Ok(())
}

/// The process-level samplers honour the boundary orientation regardless of
/// which way the engine reports the normal.
#[test]
fn process_samplers_emit_back_into_incident_region() -> Result<()> {
    let p = SurfaceInteractionProcess::new(ProcessId(1), ProcessConfig::default())?;
    let ta = SurfaceMaterial::tantalum(DEFAULT_TEMPERATURE)?;
    let cs = Species::new("Cs", 55, CS_MASS)?;
    let track = Track::new(9, cs, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1e-20)?;
    let mut rng = StdRng::seed_from_u64(3);

    // Engine reports the exit normal (along the incident direction)
    let step = BoundaryStep {
        material: &ta,
        point: [0.0, 0.0, 0.0],
        normal: [1.0, 0.0, 0.0],
    };
    for _ in 0..2_000 {
        let dir = p.sample_lambertian_direction(&track, &step, &mut rng)?;
        assert!(dir.direction[0] <= 1e-12);
        let v = p.sample_maxwell_boltzmann_kinetic_energy(&track, &step, &mut rng)?;
        assert!(v.velocity[0] <= 1e-9);
    }
    Ok(())
}

/// Unusable temperatures surface as errors instead of NaN energies.
#[test]
fn unusable_temperature_is_an_error() -> Result<()> {
    let p = SurfaceInteractionProcess::new(ProcessId(1), ProcessConfig::default())?;
    let mut ta = SurfaceMaterial::tantalum(DEFAULT_TEMPERATURE)?;
    ta.temperature = 0.0;
    let cs = Species::new("Cs", 55, CS_MASS)?;
    let mut track = Track::new(1, cs, [0.0; 3], [0.0, 0.0, -1.0], 0.0)?;
    let step = BoundaryStep {
        material: &ta,
        point: [0.0; 3],
        normal: [0.0, 0.0, 1.0],
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert!(p.execute(&mut track, &step, &mut rng).is_err());
    Ok(())
}
