use super::obstacle::ObstacleMap;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

/// Behavioral state of a navigating agent. Exactly one is active; data that
/// only exists in a given state lives in its variant, so stale timers or
/// last-known positions cannot outlive the state that owns them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentState {
    Patrol,
    /// `last_seen` is refreshed every frame the target stays in range, so a
    /// loss of contact hands Search the genuinely last observed position.
    Chase { last_seen: Vec2 },
    Search { last_known: Vec2, remaining: f32 },
    Idle,
}

/// Navigation tuning. The speed ordering (chase > search > patrol) is
/// policy, not an invariant.
#[derive(Debug, Clone, Copy)]
pub struct NavConfig {
    pub base_speed: f32,
    pub chase_multiplier: f32,
    pub search_multiplier: f32,
    pub detection_radius: f32,
    pub arrival_tolerance: f32,
    /// Clearance disc used for every obstacle-map query.
    pub agent_radius: f32,
    /// Seconds spent searching after arriving at the last known position.
    pub search_duration: f32,
    /// Displacement below this counts as standing still.
    pub stall_displacement: f32,
    /// Stalled this long while patrolling: skip to the next waypoint.
    pub waypoint_skip_after: f32,
    /// Stalled this long: teleport to a verified free spot.
    pub teleport_after: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            chase_multiplier: 1.8,
            search_multiplier: 1.2,
            detection_radius: 3.0,
            arrival_tolerance: 0.8,
            agent_radius: 0.5,
            search_duration: 3.0,
            stall_displacement: 0.2,
            waypoint_skip_after: 1.5,
            teleport_after: 3.0,
        }
    }
}

/// A patrol/chase/search/idle agent on a bounded 2-D plane.
///
/// Drive it with one `tick` per simulated frame; the observed target
/// position is read once at entry (last write before the frame wins). All
/// degenerate situations — blocked movement, unreachable waypoints — stall
/// or recover heuristically, never error.
pub struct NavAgent {
    position: Vec2,
    heading: f32,
    velocity: Vec2,
    state: AgentState,
    route: Vec<Vec2>,
    route_index: usize,
    config: NavConfig,
    stall_timer: f32,
    stall_anchor: Vec2,
    waypoint_skipped: bool,
    rng: Pcg32,
}

impl NavAgent {
    pub fn new(start: Vec2, route: Vec<Vec2>, config: NavConfig) -> Self {
        Self::with_seed(start, route, config, 0x6e61_7669)
    }

    pub fn with_seed(start: Vec2, route: Vec<Vec2>, config: NavConfig, seed: u64) -> Self {
        Self {
            position: start,
            heading: 0.0,
            velocity: Vec2::ZERO,
            state: AgentState::Patrol,
            route,
            route_index: 0,
            config,
            stall_timer: 0.0,
            stall_anchor: start,
            waypoint_skipped: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Yaw toward the last committed movement direction, radians.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn route(&self) -> &[Vec2] {
        &self.route
    }

    pub fn route_index(&self) -> usize {
        self.route_index
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn set_detection_radius(&mut self, radius: f32) {
        self.config.detection_radius = radius;
    }

    pub fn set_base_speed(&mut self, speed: f32) {
        self.config.base_speed = speed;
    }

    /// Display label for the UI layer.
    pub fn state_label(&self) -> &'static str {
        match self.state {
            AgentState::Patrol => "Patrolling",
            AgentState::Chase { .. } => "Chasing",
            AgentState::Search { .. } => "Searching",
            AgentState::Idle => "Idle",
        }
    }

    /// Idle is only ever entered from outside; no internal transition
    /// reaches it.
    pub fn set_idle(&mut self) {
        self.state = AgentState::Idle;
        self.velocity = Vec2::ZERO;
    }

    pub fn resume_patrol(&mut self) {
        self.state = AgentState::Patrol;
    }

    /// Advance the simulation one frame.
    pub fn tick(&mut self, observed: Vec2, map: &ObstacleMap, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.update_stall(map, dt);

        let distance = self.position.distance(observed);

        match self.state {
            AgentState::Patrol => {
                if let Some(waypoint) = self.route.get(self.route_index).copied() {
                    if self.move_towards(waypoint, self.config.base_speed, dt, map) {
                        self.advance_waypoint();
                    }
                }
                if distance < self.config.detection_radius {
                    log::debug!("patrol -> chase (target at {distance:.2})");
                    self.state = AgentState::Chase {
                        last_seen: observed,
                    };
                }
            }
            AgentState::Chase { last_seen } => {
                if distance < self.config.detection_radius {
                    self.state = AgentState::Chase {
                        last_seen: observed,
                    };
                    let speed = self.config.base_speed * self.config.chase_multiplier;
                    self.move_towards(observed, speed, dt, map);
                } else {
                    log::debug!("chase -> search (lost target, last seen {last_seen})");
                    self.state = AgentState::Search {
                        last_known: last_seen,
                        remaining: self.config.search_duration,
                    };
                }
            }
            AgentState::Search {
                last_known,
                remaining,
            } => {
                let speed = self.config.base_speed * self.config.search_multiplier;
                let reached = self.move_towards(last_known, speed, dt, map);
                if reached {
                    // the countdown runs only while the agent sits at the
                    // last known position, not from the moment Search began
                    let remaining = remaining - dt;
                    if remaining <= 0.0 {
                        log::debug!("search -> patrol (gave up)");
                        self.state = AgentState::Patrol;
                    } else {
                        self.state = AgentState::Search {
                            last_known,
                            remaining,
                        };
                    }
                }
                if distance < self.config.detection_radius {
                    log::debug!("search -> chase (reacquired)");
                    self.state = AgentState::Chase {
                        last_seen: observed,
                    };
                }
            }
            AgentState::Idle => {
                self.velocity = Vec2::ZERO;
            }
        }
    }

    fn advance_waypoint(&mut self) {
        if !self.route.is_empty() {
            self.route_index = (self.route_index + 1) % self.route.len();
        }
    }

    /// Stall bookkeeping and last-resort recovery. Displacement is measured
    /// against the position at the previous reset, not the previous frame.
    fn update_stall(&mut self, map: &ObstacleMap, dt: f32) {
        if self.position.distance(self.stall_anchor) < self.config.stall_displacement {
            self.stall_timer += dt;
        } else {
            self.stall_timer = 0.0;
            self.stall_anchor = self.position;
            self.waypoint_skipped = false;
        }

        // recovery only applies to a patroller with somewhere to go
        if self.state != AgentState::Patrol || self.route.is_empty() {
            return;
        }

        if self.stall_timer > self.config.teleport_after {
            let spot = self.free_position_nearby(map);
            log::debug!("stalled {:.1}s, teleporting to {spot}", self.stall_timer);
            self.position = spot;
            self.stall_anchor = spot;
            self.stall_timer = 0.0;
            self.waypoint_skipped = false;
        } else if self.stall_timer > self.config.waypoint_skip_after && !self.waypoint_skipped {
            log::debug!("stalled {:.1}s, skipping waypoint", self.stall_timer);
            self.advance_waypoint();
            self.waypoint_skipped = true;
        }
    }

    /// Step toward `target`. Returns true when already within the arrival
    /// tolerance. A blocked step walks an evasion ladder: perpendicular
    /// offsets, diagonal blends, then one random bearing; if everything is
    /// blocked the agent stalls for this frame with zero velocity.
    fn move_towards(&mut self, target: Vec2, speed: f32, dt: f32, map: &ObstacleMap) -> bool {
        let to_target = target - self.position;
        if to_target.length() < self.config.arrival_tolerance {
            self.velocity = Vec2::ZERO;
            return true;
        }

        let dir = to_target.normalize();
        let next = self.position + dir * speed * dt;
        if map.is_point_clear(next, self.config.agent_radius) {
            self.commit_step(next, dir, speed);
            return false;
        }

        // slightly longer stride while evading
        let evade_step = speed * dt * 1.2;
        let perp = Vec2::new(-dir.y, dir.x);
        let candidates = [
            perp * 1.5,
            perp * -1.5,
            perp * 2.0,
            perp * -2.0,
            dir + perp,
            dir - perp,
            perp * 3.0,
            perp * -3.0,
        ];
        for candidate in candidates {
            let evade_dir = candidate.normalize();
            let evade_pos = self.position + evade_dir * evade_step;
            if map.is_point_clear(evade_pos, self.config.agent_radius) {
                self.commit_step(evade_pos, evade_dir, speed);
                return false;
            }
        }

        // unblock with a random bearing before giving up for the frame
        let angle = self.rng.gen_range(0.0..TAU);
        let random_dir = Vec2::new(angle.sin(), angle.cos());
        let random_pos = self.position + random_dir * evade_step;
        if map.is_point_clear(random_pos, self.config.agent_radius) {
            self.commit_step(random_pos, random_dir, speed * 0.7);
        } else {
            self.velocity = Vec2::ZERO;
        }
        false
    }

    fn commit_step(&mut self, next: Vec2, dir: Vec2, speed: f32) {
        self.position = next;
        self.velocity = dir * speed;
        self.heading = dir.x.atan2(dir.y);
        self.stall_timer = 0.0;
    }

    /// Sample bearings around the agent for a verified free spot, falling
    /// back to the waypoint two stops ahead, then to the current position.
    fn free_position_nearby(&mut self, map: &ObstacleMap) -> Vec2 {
        const ATTEMPTS: u32 = 20;
        for i in 0..ATTEMPTS {
            let angle = TAU * i as f32 / ATTEMPTS as f32;
            let distance = 2.0 + self.rng.gen::<f32>() * 3.0;
            let candidate = self.position + Vec2::new(angle.cos(), angle.sin()) * distance;
            if map.is_point_clear(candidate, self.config.agent_radius) {
                return candidate;
            }
        }
        if self.route.is_empty() {
            self.position
        } else {
            self.route[(self.route_index + 2) % self.route.len()]
        }
    }
}
