//! # cinetica
//!
//! A small 3D kinematics and AI navigation library.
//!
//! ## Features
//! - CCD (Cyclic Coordinate Descent) inverse kinematics over an explicit
//!   joint array with deterministic forward-kinematics passes
//! - Patrol/chase/search/idle agent with axis-aligned obstacle avoidance
//!   and best-effort stall recovery
//! - Seeded procedural tree-skeleton generation
//!
//! ## Example
//! ```rust,ignore
//! use cinetica::ik::{CcdSolver, Chain};
//! use glam::Vec3;
//!
//! // Build an IK chain from rest positions
//! let mut chain = Chain::builder()
//!     .add_joint(Vec3::ZERO)
//!     .add_joint(Vec3::new(0.0, 1.0, 0.0))
//!     .add_joint(Vec3::new(0.0, 2.0, 0.0))
//!     .tolerance(0.01)
//!     .max_iterations(50)
//!     .build();
//!
//! // Rotate joints in place so the end-effector approaches the target
//! let target = Vec3::new(1.0, 1.5, 0.0);
//! let result = CcdSolver::solve(&mut chain, target);
//! println!("Converged: {}, iterations: {}", result.converged, result.iterations);
//! ```

pub mod ik;
pub mod math;
pub mod nav;
pub mod procgen;

pub use ik::{CcdSolver, Chain, ChainBuilder, Joint, SolveResult};
pub use math::Transform;
pub use nav::{AgentState, NavAgent, NavConfig, ObstacleMap, RectObstacle};
pub use procgen::{BranchSegment, TreeParams, TreeSkeleton};
