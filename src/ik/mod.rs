//! Inverse Kinematics module
//!
//! Kinematic chain types and the CCD solver implementation.

pub mod chain;
pub mod joint;
pub mod solver;

pub use chain::{Chain, ChainBuilder};
pub use joint::Joint;
pub use solver::{CcdSolver, SolveResult};
