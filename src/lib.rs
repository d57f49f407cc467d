//! Lagrangean branch-and-bound solver for the Set Covering Problem with Conflicts
//! between Subsets (SCPCS).
//!
//! The search combines a genetic heuristic for an initial upper bound, a subgradient
//! method approximately maximizing a Lagrangean dual for pruning, greedy repair for
//! turning relaxed assignments into feasible covers, and a parallel branch-and-bound
//! driver tying the pieces together.

pub mod branch_and_bound;
pub mod error;
pub mod generator;
pub mod genetic;
pub mod greedy;
pub mod instance;
pub mod loader;
pub mod mip;
pub mod subgradient;

pub use branch_and_bound::{solve, Incumbent, SearchOptions};
pub use error::{Result, ScpcsError};
pub use instance::Instance;
