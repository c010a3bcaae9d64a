use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the surface interaction core.
///
/// Missing adsorption-time entries are not errors; they select the
/// documented fallback (the particle always diffuses).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter, including violated caller preconditions
    /// (non-positive mass, unresolvable temperature, negative residence time).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A numeric field of an adsorption-time command could not be converted.
    #[error("cannot parse {field} from {token:?}: {source}")]
    Parse {
        /// Name of the offending field (`particle_z`, `material_z`, `time_ns`).
        field: &'static str,
        /// The raw token as it appeared in the command.
        token: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Numerical or geometric issue (e.g., zero-length surface normal).
    #[error("numerical error: {0}")]
    MathError(String),
}
