use thiserror::Error;

/// Top-level error type for the roadkit motion-planning kernel.
#[derive(Debug, Error)]
pub enum RoadkitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

/// Errors related to geometric inputs.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("displacement {0} must be positive")]
    NonPositiveDisplacement(f64),
}

/// Errors raised while assembling position and pose paths.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("displacement {disp} must be greater than the previous displacement {begin}")]
    NonIncreasingDisplacement { disp: f64, begin: f64 },

    #[error("displacement {disp} exceeds the path length {length}")]
    DisplacementOutOfRange { disp: f64, length: f64 },

    #[error("heading discontinuity at displacement {disp}: previous segment ends at {expected} rad, next begins at {actual} rad")]
    HeadingDiscontinuity { disp: f64, expected: f64, actual: f64 },

    #[error("heading rate discontinuity at displacement {disp}: previous segment ends at {expected} rad/unit, next begins at {actual} rad/unit")]
    HeadingRateDiscontinuity { disp: f64, expected: f64, actual: f64 },

    #[error("segment {index} begins {gap} away from the end of the previous segment")]
    PositionDiscontinuity { index: usize, gap: f64 },

    #[error("segment {index} begins with a tangent {gap} rad away from the previous segment")]
    TangentDiscontinuity { index: usize, gap: f64 },

    #[error("pose path covers displacement {covered} of path length {length}")]
    IncompleteCoverage { covered: f64, length: f64 },

    #[error("path has no segments")]
    Empty,
}

/// Errors related to trajectory constraints.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("minimum over an empty constraint set has no bound")]
    EmptySet,
}

/// Convenience type alias for results using [`RoadkitError`].
pub type Result<T> = std::result::Result<T, RoadkitError>;
