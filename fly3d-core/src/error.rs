/// Error type for the fail-fast entry points of the core library
use thiserror::Error;

/// Errors raised when caller-supplied input would otherwise produce
/// non-finite transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Normalising a vector whose length is zero
    #[error("cannot normalise a zero-length vector")]
    ZeroLengthVector,

    /// Perspective parameters outside `0 < fov_y < pi`, `far > near > 0`
    #[error("invalid projection: {reason}")]
    InvalidProjection { reason: String },

    /// Negative or non-finite frame time
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f32),

    /// Camera or host configuration rejected by validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result alias using the core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
