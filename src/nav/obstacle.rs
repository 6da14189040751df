use glam::Vec2;
use std::f32::consts::TAU;

/// Axis-aligned rectangular no-go region on the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct RectObstacle {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl RectObstacle {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.blocks(point, 0.0)
    }

    /// True when a disc of `radius` at `point` overlaps this rectangle.
    pub fn blocks(&self, point: Vec2, radius: f32) -> bool {
        let d = (point - self.center).abs();
        d.x < self.half_extents.x + radius && d.y < self.half_extents.y + radius
    }
}

/// A rectangular world boundary plus a static set of rectangular obstacles.
/// Built once at scene setup and read-only during simulation.
#[derive(Debug, Clone)]
pub struct ObstacleMap {
    obstacles: Vec<RectObstacle>,
    bounds_min: Vec2,
    bounds_max: Vec2,
}

impl ObstacleMap {
    pub fn new(bounds_min: Vec2, bounds_max: Vec2) -> Self {
        Self {
            obstacles: Vec::new(),
            bounds_min,
            bounds_max,
        }
    }

    pub fn add(&mut self, obstacle: RectObstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn add_rect(&mut self, center: Vec2, half_extents: Vec2) {
        self.obstacles.push(RectObstacle::new(center, half_extents));
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn obstacles(&self) -> &[RectObstacle] {
        &self.obstacles
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.bounds_min, self.bounds_max)
    }

    pub fn in_bounds(&self, point: Vec2) -> bool {
        point.x > self.bounds_min.x
            && point.x < self.bounds_max.x
            && point.y > self.bounds_min.y
            && point.y < self.bounds_max.y
    }

    /// True when a disc of `radius` at `point` touches no obstacle and lies
    /// strictly inside the world boundary.
    pub fn is_point_clear(&self, point: Vec2, radius: f32) -> bool {
        if self.obstacles.iter().any(|o| o.blocks(point, radius)) {
            return false;
        }
        self.in_bounds(point)
    }

    /// Search outward in rings for the closest clear spot. Returns the input
    /// point unchanged when nothing clear is found within `search_radius`.
    pub fn nearest_clear(&self, point: Vec2, radius: f32, search_radius: f32) -> Vec2 {
        if self.is_point_clear(point, radius) {
            return point;
        }

        let mut ring = 0.5;
        while ring <= search_radius * 2.0 {
            let mut angle = 0.0;
            while angle < TAU {
                let candidate = point + Vec2::new(angle.cos(), angle.sin()) * ring;
                if self.is_point_clear(candidate, radius) {
                    return candidate;
                }
                angle += TAU / 16.0;
            }
            ring += 0.5;
        }

        point
    }
}

#[cfg(test)]
mod tests {
    use super::{ObstacleMap, RectObstacle};
    use glam::Vec2;

    fn map() -> ObstacleMap {
        let mut map = ObstacleMap::new(Vec2::splat(-18.0), Vec2::splat(18.0));
        map.add_rect(Vec2::new(3.0, 2.0), Vec2::new(0.5, 0.5));
        map
    }

    #[test]
    fn blocks_accounts_for_query_radius() {
        let rect = RectObstacle::new(Vec2::ZERO, Vec2::splat(1.0));
        assert!(rect.contains(Vec2::new(0.9, 0.9)));
        assert!(!rect.contains(Vec2::new(1.2, 0.0)));
        // clear of the rect itself, but a 0.5 disc overlaps it
        assert!(rect.blocks(Vec2::new(1.2, 0.0), 0.5));
    }

    #[test]
    fn points_outside_world_are_not_clear() {
        let map = map();
        assert!(map.is_point_clear(Vec2::ZERO, 0.5));
        assert!(!map.is_point_clear(Vec2::new(18.5, 0.0), 0.5));
        assert!(!map.is_point_clear(Vec2::new(3.0, 2.0), 0.5));
    }

    #[test]
    fn nearest_clear_escapes_an_obstacle() {
        let map = map();
        let inside = Vec2::new(3.0, 2.0);
        let clear = map.nearest_clear(inside, 0.5, 3.0);
        assert!(map.is_point_clear(clear, 0.5));
        assert!(clear.distance(inside) < 3.0);
    }

    #[test]
    fn nearest_clear_is_identity_for_clear_points() {
        let map = map();
        let p = Vec2::new(-5.0, -5.0);
        assert_eq!(map.nearest_clear(p, 0.5, 3.0), p);
    }
}
