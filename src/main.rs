use cinetica::ik::{CcdSolver, Chain};
use cinetica::nav::{NavAgent, NavConfig, ObstacleMap};
use cinetica::procgen::{self, TreeParams};
use glam::{Vec2, Vec3};

const DT: f32 = 1.0 / 60.0;
const SIM_SECONDS: f32 = 20.0;

struct Demo {
    chain: Chain,
    agent: NavAgent,
    map: ObstacleMap,
    time: f32,
}

impl Demo {
    fn new() -> Self {
        let chain = Chain::builder()
            .add_joint(Vec3::ZERO)
            .add_joint(Vec3::new(0.0, 1.0, 0.0))
            .add_joint(Vec3::new(0.0, 2.0, 0.0))
            .add_joint(Vec3::new(0.0, 3.0, 0.0))
            .add_joint(Vec3::new(0.0, 4.0, 0.0))
            .tolerance(0.01)
            .max_iterations(50)
            .build();

        let mut map = ObstacleMap::new(Vec2::splat(-18.0), Vec2::splat(18.0));
        map.add_rect(Vec2::new(3.0, 2.0), Vec2::new(0.5, 0.5));
        map.add_rect(Vec2::new(-4.0, -3.0), Vec2::new(0.75, 0.75));
        map.add_rect(Vec2::new(6.0, -1.0), Vec2::new(0.5, 0.75));
        map.add_rect(Vec2::new(-2.0, 4.0), Vec2::new(1.0, 0.5));
        map.add_rect(Vec2::new(0.0, -6.0), Vec2::new(0.5, 1.0));

        let route = vec![
            Vec2::new(-15.0, -15.0),
            Vec2::new(15.0, -15.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(-15.0, 15.0),
        ];
        let agent = NavAgent::new(Vec2::new(-15.0, -15.0), route, NavConfig::default());

        Self {
            chain,
            agent,
            map,
            time: 0.0,
        }
    }

    /// IK target orbiting the chain base.
    fn ik_target(&self) -> Vec3 {
        let a = self.time * 0.8;
        Vec3::new(2.5 * a.cos(), 2.0 + (self.time * 0.5).sin(), 2.5 * a.sin())
    }

    /// Scripted intruder: wanders along the south edge, periodically dipping
    /// into the patrol route so the agent acquires and loses it.
    fn intruder(&self) -> Vec2 {
        let a = self.time * 0.3;
        Vec2::new(15.0 * a.sin(), -15.0 + 4.0 * (self.time * 0.7).sin())
    }

    fn step(&mut self) {
        self.time += DT;

        let target = self.ik_target();
        let result = CcdSolver::solve(&mut self.chain, target);
        log::trace!(
            "ik t={:.2} distance={:.4} iterations={}",
            self.time,
            result.final_distance,
            result.iterations
        );

        self.agent.tick(self.intruder(), &self.map, DT);
    }
}

fn main() {
    env_logger::init();

    let mut demo = Demo::new();

    let tree = procgen::generate(&TreeParams::default(), 0xdecaf);
    log::info!(
        "generated tree: {} segments, {} leaves",
        tree.segment_count(),
        tree.leaf_count()
    );

    let frames = (SIM_SECONDS / DT) as u32;
    let mut last_label = "";
    for frame in 0..frames {
        demo.step();

        let label = demo.agent.state_label();
        if label != last_label {
            println!(
                "[{:6.2}s] agent {} at ({:.1}, {:.1})",
                frame as f32 * DT,
                label,
                demo.agent.position().x,
                demo.agent.position().y
            );
            last_label = label;
        }
    }

    let end = demo.chain.end_effector().unwrap_or(Vec3::ZERO);
    println!(
        "final: effector ({:.2}, {:.2}, {:.2}), agent {} at ({:.1}, {:.1}), tree {} branches",
        end.x,
        end.y,
        end.z,
        demo.agent.state_label(),
        demo.agent.position().x,
        demo.agent.position().y,
        tree.segment_count()
    );
}
