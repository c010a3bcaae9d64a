use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::core::frame::{SurfaceFrame, Vec3, DIM};
use crate::core::sampling::{sample_effusive_velocity, sample_lambertian_direction};
use crate::core::units::ATOMIC_MASS_UNIT;
use crate::core::{
    BoundaryStep, ProcessConfig, ProcessId, Species, StickingModel, SurfaceInteractionProcess,
    SurfaceMaterial, SurfaceOutcome, Track,
};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn vec3(v: &[f64], what: &str) -> PyResult<Vec3> {
    if v.len() != DIM {
        return Err(py_err(format!("{what} must have length {DIM}")));
    }
    Ok([v[0], v[1], v[2]])
}

fn rows_to_array(rows: &[Vec3]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((rows.len(), DIM));
    for (i, r) in rows.iter().enumerate() {
        for k in 0..DIM {
            arr[[i, k]] = r[k];
        }
    }
    arr
}

/// Python-facing wrapper around the surface interaction process.
///
/// API:
/// - __new__(sticking_coefficient=1.0, tolerance=1e-9, seed=None)
/// - set_adsorption_time / load_adsorption_time / load_adsorption_times
/// - sample_lambertian(normal, n) -> np.ndarray, shape (n, 3)
/// - sample_effusive(mass_amu, temperature, normal, n) -> np.ndarray, shape (n, 3)
/// - simulate_hits(...) -> (np.ndarray (hits, 3), total_time_sticked)
#[pyclass(name = "SurfaceProcess")]
pub struct PySurfaceProcess {
    process: SurfaceInteractionProcess,
    rng: StdRng,
}

#[pymethods]
impl PySurfaceProcess {
    /// Create a process with a constant sticking coefficient.
    ///
    /// Parameters
    /// - sticking_coefficient: fraction of hits that stick where an adsorption time exists, in [0, 1]
    /// - tolerance: minimum accepted surface-normal length
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (sticking_coefficient=1.0, tolerance=1e-9, seed=None))]
    fn new(sticking_coefficient: f64, tolerance: f64, seed: Option<u64>) -> PyResult<Self> {
        let config = ProcessConfig {
            tolerance,
            sticking: StickingModel::Constant {
                coefficient: sticking_coefficient,
            },
        };
        let process = SurfaceInteractionProcess::new(ProcessId(0), config).map_err(py_err)?;
        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rand::rng().random()),
        };
        Ok(Self { process, rng })
    }

    /// Switch to Langmuir sticking: p = s0 * (1 - coverage).
    fn set_langmuir(&mut self, initial_coefficient: f64, coverage: f64) -> PyResult<()> {
        self.process
            .set_sticking_model(StickingModel::Langmuir {
                initial_coefficient,
                coverage,
            })
            .map_err(py_err)
    }

    /// Install a mean adsorption time in nanoseconds. Returns the previous value in seconds.
    fn set_adsorption_time(
        &mut self,
        particle_z: u32,
        material_z: u32,
        value_ns: f64,
    ) -> PyResult<Option<f64>> {
        self.process
            .set_adsorption_time(particle_z, material_z, value_ns)
            .map_err(py_err)
    }

    /// Apply a "Z_particle;Z_material;time_ns" command. Returns True if an entry was written.
    fn load_adsorption_time(&mut self, command: &str) -> PyResult<bool> {
        Ok(self
            .process
            .load_adsorption_time(command)
            .map_err(py_err)?
            .is_installed())
    }

    /// Apply one command per line; returns the number of entries written.
    fn load_adsorption_times(&mut self, text: &str) -> PyResult<usize> {
        self.process.load_adsorption_times(text).map_err(py_err)
    }

    /// Mean adsorption time in seconds, or None.
    fn get_adsorption_time(&self, particle_z: u32, material_z: u32) -> Option<f64> {
        self.process.adsorption_time(particle_z, material_z)
    }

    /// Return `n` Lambertian directions about `normal` as an (n, 3) array.
    fn sample_lambertian<'py>(
        &mut self,
        py: Python<'py>,
        normal: Vec<f64>,
        n: usize,
    ) -> PyResult<Py<PyArray2<f64>>> {
        let frame = SurfaceFrame::new([0.0; DIM], vec3(&normal, "normal")?, self.process.config().tolerance)
            .map_err(py_err)?;
        let rows: Vec<Vec3> = (0..n)
            .map(|_| sample_lambertian_direction(&frame, &mut self.rng).direction)
            .collect();
        Ok(rows_to_array(&rows).into_pyarray(py).to_owned().into())
    }

    /// Return `n` effusive velocities [m/s] about `normal` as an (n, 3) array.
    fn sample_effusive<'py>(
        &mut self,
        py: Python<'py>,
        mass_amu: f64,
        temperature: f64,
        normal: Vec<f64>,
        n: usize,
    ) -> PyResult<Py<PyArray2<f64>>> {
        let frame = SurfaceFrame::new([0.0; DIM], vec3(&normal, "normal")?, self.process.config().tolerance)
            .map_err(py_err)?;
        let mass = mass_amu * ATOMIC_MASS_UNIT;
        let mut rows: Vec<Vec3> = Vec::with_capacity(n);
        for _ in 0..n {
            let s = sample_effusive_velocity(mass, temperature, &frame, &mut self.rng).map_err(py_err)?;
            rows.push(s.velocity);
        }
        Ok(rows_to_array(&rows).into_pyarray(py).to_owned().into())
    }

    /// Bounce one particle off a flat wall `hits` times (releases the GIL during computation).
    ///
    /// Returns a (hits, 3) array of [kinetic_energy_J, time_delay_s, adsorbed] and the
    /// track's cumulative adsorption time.
    #[pyo3(signature = (particle_z, mass_amu, material_z, temperature, hits))]
    fn simulate_hits<'py>(
        &mut self,
        py: Python<'py>,
        particle_z: u32,
        mass_amu: f64,
        material_z: u32,
        temperature: f64,
        hits: usize,
    ) -> PyResult<(Py<PyArray2<f64>>, f64)> {
        let species = Species::from_amu(format!("Z{particle_z}"), particle_z, mass_amu).map_err(py_err)?;
        let material =
            SurfaceMaterial::new(format!("Z{material_z}"), material_z, temperature).map_err(py_err)?;
        let mut track = Track::new(0, species, [0.0; DIM], [0.0, 0.0, -1.0], 0.0).map_err(py_err)?;

        let process = &self.process;
        let rng = &mut self.rng;
        let rows = py
            .detach(|| -> crate::error::Result<Vec<Vec3>> {
                let step = BoundaryStep {
                    material: &material,
                    point: [0.0; DIM],
                    normal: [0.0, 0.0, 1.0],
                };
                let mut rows = Vec::with_capacity(hits);
                for _ in 0..hits {
                    let change = process.execute(&mut track, &step, rng)?;
                    let adsorbed = match change.outcome {
                        SurfaceOutcome::Adsorbed { .. } => 1.0,
                        SurfaceOutcome::Diffused => 0.0,
                    };
                    rows.push([change.kinetic_energy, change.time_delay, adsorbed]);
                    change.apply(&mut track)?;
                    // Turn the particle back toward the wall for the next hit
                    track.set_direction([0.0, 0.0, -1.0])?;
                }
                Ok(rows)
            })
            .map_err(py_err)?;

        let total = track
            .auxiliary(process.id())
            .map(|a| a.total_time_sticked())
            .unwrap_or(0.0);
        Ok((rows_to_array(&rows).into_pyarray(py).to_owned().into(), total))
    }
}

/// The effusion Python module entry point.
#[pymodule]
fn effusion(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySurfaceProcess>()?;
    Ok(())
}
