//! AI navigation module
//!
//! A four-state patrol/chase/search/idle controller on a bounded 2-D plane,
//! plus the static obstacle map it steers around.

pub mod agent;
pub mod obstacle;

pub use agent::{AgentState, NavAgent, NavConfig};
pub use obstacle::{ObstacleMap, RectObstacle};
