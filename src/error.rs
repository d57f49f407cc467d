use thiserror::Error;

/// Error types for the SCPCS solver.
#[derive(Debug, Error)]
pub enum ScpcsError {
    /// Malformed instance text.
    #[error("failed to parse instance at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// An instance violates a structural invariant (empty row/column, negative cost, ...).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// The MIP/LP backend returned a non-Optimal status.
    #[error("solver returned non-optimal status: {status:?}")]
    SolverNonOptimal { status: crate::mip::MipStatus },

    /// The MIP/LP backend itself failed to build or solve a model.
    #[error("solver failure: {0}")]
    SolverFailure(String),

    /// Greedy repair (or a child's fixing) could not produce a feasible cover.
    ///
    /// Recovered locally by the branch-and-bound driver: fathom the branch.
    #[error("infeasible")]
    Infeasible,

    /// A NaN objective value was observed from the solver.
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// An I/O failure while reading/writing an instance file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for SCPCS operations.
pub type Result<T> = std::result::Result<T, ScpcsError>;
