use crate::error::{Error, Result};

/// Fixed spatial dimension (3D).
pub const DIM: usize = 3;

/// Plain 3-vector used for positions, directions and velocities.
pub type Vec3 = [f64; DIM];

/// Orthonormal frame attached to a surface point.
///
/// The local z axis is the outward surface normal (pointing into the region a
/// re-emitted particle travels through); x and y span the tangent plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    /// Surface point in global coordinates.
    pub point: Vec3,
    /// Unit outward normal in global coordinates (local +z).
    pub normal: Vec3,
    /// First unit tangent (local +x).
    pub tangent: Vec3,
    /// Second unit tangent (local +y), `normal × tangent`.
    pub bitangent: Vec3,
}

impl SurfaceFrame {
    /// Build a frame at `point` from a (not necessarily normalized) `normal`.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if any component is NaN/inf.
    /// - `Error::MathError` if the normal is shorter than `tolerance`.
    pub fn new(point: Vec3, normal: Vec3, tolerance: f64) -> Result<Self> {
        if !point.iter().chain(normal.iter()).all(|x| x.is_finite()) {
            return Err(Error::InvalidParam(
                "surface point and normal must be finite".into(),
            ));
        }
        let len = norm(&normal);
        if len <= tolerance {
            return Err(Error::MathError(format!(
                "surface normal length {len:e} is below tolerance {tolerance:e}"
            )));
        }
        let n = scale(&normal, 1.0 / len);

        // Seed the tangent with the global axis least aligned with n
        let mut axis = 0usize;
        for k in 1..DIM {
            if n[k].abs() < n[axis].abs() {
                axis = k;
            }
        }
        let mut seed = [0.0_f64; DIM];
        seed[axis] = 1.0;

        let t = cross(&seed, &n);
        let t = scale(&t, 1.0 / norm(&t));
        let b = cross(&n, &t);

        Ok(Self {
            point,
            normal: n,
            tangent: t,
            bitangent: b,
        })
    }

    /// Map a vector from local (tangent, bitangent, normal) components to global.
    #[inline]
    pub fn to_global(&self, local: &Vec3) -> Vec3 {
        let mut out = [0.0_f64; DIM];
        for (k, o) in out.iter_mut().enumerate() {
            *o = self.tangent[k] * local[0] + self.bitangent[k] * local[1] + self.normal[k] * local[2];
        }
        out
    }

    /// Map a global vector into local (tangent, bitangent, normal) components.
    #[inline]
    pub fn to_local(&self, global: &Vec3) -> Vec3 {
        [
            dot(&self.tangent, global),
            dot(&self.bitangent, global),
            dot(&self.normal, global),
        ]
    }
}

// ============ Vector helpers ============

#[inline]
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
pub fn scale(a: &Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}
