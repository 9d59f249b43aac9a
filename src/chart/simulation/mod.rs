mod drag;
mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use forces::{
    Axis, CollideParams, Jiggle, apply_axis_pull, apply_center, apply_collide, apply_many_body,
};

const INITIAL_ANGLE: f32 = std::f32::consts::PI * 0.763_932_03; // π(3 - √5)

/// Tuning knobs for the bubble layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub drag_alpha_target: f32,
    pub center_strength: f32,
    pub collide_padding: f32,
    pub collide_iterations: usize,
    pub collide_strength: f32,
    pub charge_strength: f32,
    pub charge_theta: f32,
    pub position_strength: f32,
    pub initial_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            center_strength: 1.0,
            collide_padding: 2.0,
            collide_iterations: 16,
            collide_strength: 1.0,
            charge_strength: 0.0,
            charge_theta: 0.9,
            position_strength: 0.05,
            initial_radius: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Idle,
    Running,
    Dragging,
    Settled,
}

/// Layout state of one bubble, in canvas coordinates centered on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set while a drag gesture holds the bubble.
    pub pinned: Option<Vec2>,
    pub radius: f32,
}

struct ForceScratch {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
}

pub struct Simulation {
    nodes: Vec<Bubble>,
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    phase: SimulationPhase,
    active_drags: usize,
    jiggle: Jiggle,
    scratch: ForceScratch,
}

impl Simulation {
    pub fn new(radii: impl IntoIterator<Item = f32>, config: SimulationConfig) -> Self {
        let nodes = radii
            .into_iter()
            .enumerate()
            .map(|(index, radius)| {
                let distance = config.initial_radius * (0.5 + index as f32).sqrt();
                let angle = index as f32 * INITIAL_ANGLE;
                Bubble {
                    position: vec2(distance * angle.cos(), distance * angle.sin()),
                    velocity: Vec2::ZERO,
                    pinned: None,
                    radius,
                }
            })
            .collect::<Vec<_>>();

        Self {
            nodes,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            phase: SimulationPhase::Idle,
            active_drags: 0,
            jiggle: Jiggle::new(),
            scratch: ForceScratch {
                positions: Vec::new(),
                radii: Vec::new(),
            },
        }
    }

    pub fn nodes(&self) -> &[Bubble] {
        &self.nodes
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[cfg(test)]
    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn start(&mut self) {
        if self.phase == SimulationPhase::Idle {
            debug!(bubbles = self.nodes.len(), "starting bubble layout");
            self.phase = SimulationPhase::Running;
        }
    }

    /// Advances the layout by one frame. Returns whether another frame is needed.
    pub fn step(&mut self) -> bool {
        match self.phase {
            SimulationPhase::Idle | SimulationPhase::Settled => false,
            SimulationPhase::Running => {
                self.tick();
                if self.alpha < self.config.alpha_min {
                    debug!(alpha = self.alpha, "bubble layout settled");
                    self.phase = SimulationPhase::Settled;
                    return false;
                }
                true
            }
            SimulationPhase::Dragging => {
                self.tick();
                true
            }
        }
    }

    fn tick(&mut self) {
        let config = self.config;
        self.alpha += (self.alpha_target - self.alpha) * config.alpha_decay;

        apply_center(&mut self.nodes, Vec2::ZERO, config.center_strength);
        apply_collide(
            &mut self.nodes,
            &mut self.scratch.positions,
            &mut self.scratch.radii,
            CollideParams {
                padding: config.collide_padding,
                iterations: config.collide_iterations,
                strength: config.collide_strength,
            },
            &mut self.jiggle,
        );
        apply_many_body(
            &mut self.nodes,
            &mut self.scratch.positions,
            config.charge_strength,
            config.charge_theta,
            self.alpha,
        );
        apply_axis_pull(
            &mut self.nodes,
            Axis::X,
            0.0,
            config.position_strength,
            self.alpha,
        );
        apply_axis_pull(
            &mut self.nodes,
            Axis::Y,
            0.0,
            config.position_strength,
            self.alpha,
        );

        let retained = 1.0 - config.velocity_decay;
        for node in &mut self.nodes {
            if let Some(pinned) = node.pinned {
                node.position = pinned;
                node.velocity = Vec2::ZERO;
            } else {
                node.velocity *= retained;
                node.position += node.velocity;
            }
        }
    }
}
