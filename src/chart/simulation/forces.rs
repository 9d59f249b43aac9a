use eframe::egui::{Vec2, vec2};

use super::Bubble;
use super::quadtree::{Branch, QuadTree};

#[derive(Clone, Copy, Debug)]
pub(super) enum Axis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct CollideParams {
    pub(super) padding: f32,
    pub(super) iterations: usize,
    pub(super) strength: f32,
}

/// Linear congruential source for separating coincident bubbles.
pub(super) struct Jiggle {
    state: u32,
}

impl Jiggle {
    pub(super) fn new() -> Self {
        Self { state: 1 }
    }

    pub(super) fn next(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        let unit = f64::from(self.state) / 4_294_967_296.0;
        ((unit - 0.5) * 1e-6) as f32
    }
}

/// Translates every bubble so the centroid sits on `center`.
pub(super) fn apply_center(nodes: &mut [Bubble], center: Vec2, strength: f32) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.position;
    }
    centroid /= nodes.len() as f32;

    let shift = (centroid - center) * strength;
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}

pub(super) fn apply_axis_pull(
    nodes: &mut [Bubble],
    axis: Axis,
    target: f32,
    strength: f32,
    alpha: f32,
) {
    let factor = strength * alpha;
    for node in nodes.iter_mut() {
        match axis {
            Axis::X => node.velocity.x += (target - node.position.x) * factor,
            Axis::Y => node.velocity.y += (target - node.position.y) * factor,
        }
    }
}

/// Relaxes overlaps between predicted positions (`position + velocity`).
/// The tree is rebuilt over the predictions on every pass.
pub(super) fn apply_collide(
    nodes: &mut [Bubble],
    predicted: &mut Vec<Vec2>,
    radii: &mut Vec<f32>,
    params: CollideParams,
    jiggle: &mut Jiggle,
) {
    radii.clear();
    radii.extend(nodes.iter().map(|node| node.radius + params.padding));
    let radii = radii.as_slice();

    for _ in 0..params.iterations {
        predicted.clear();
        predicted.extend(nodes.iter().map(|node| node.position + node.velocity));
        let Some(tree) = QuadTree::build(predicted, radii) else {
            return;
        };

        for index in 0..nodes.len() {
            let point = predicted[index];
            let own_radius = radii[index];
            tree.for_each_near(point, own_radius, |other| {
                if other > index {
                    separate(nodes, index, point, other, radii, params.strength, jiggle);
                }
            });
        }
    }
}

fn separate(
    nodes: &mut [Bubble],
    index: usize,
    point: Vec2,
    other: usize,
    radii: &[f32],
    strength: f32,
    jiggle: &mut Jiggle,
) {
    let own_radius = radii[index];
    let other_radius = radii[other];
    let min_distance = own_radius + other_radius;
    let mut delta = point - nodes[other].position - nodes[other].velocity;
    let mut distance_sq = delta.length_sq();
    if distance_sq >= min_distance * min_distance {
        return;
    }

    if delta.x == 0.0 {
        delta.x = jiggle.next();
        distance_sq += delta.x * delta.x;
    }
    if delta.y == 0.0 {
        delta.y = jiggle.next();
        distance_sq += delta.y * delta.y;
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((min_distance - distance) / distance * strength);
    let other_sq = other_radius * other_radius;
    let share = other_sq / ((own_radius * own_radius) + other_sq);

    nodes[index].velocity += push * share;
    nodes[other].velocity -= push * (1.0 - share);
}

/// Barnes-Hut charge force; negative strength repels. Zero is a no-op.
pub(super) fn apply_many_body(
    nodes: &mut [Bubble],
    positions: &mut Vec<Vec2>,
    strength: f32,
    theta: f32,
    alpha: f32,
) {
    if strength == 0.0 || nodes.len() < 2 {
        return;
    }

    positions.clear();
    positions.extend(nodes.iter().map(|node| node.position));
    let Some(tree) = QuadTree::build(positions, &[]) else {
        return;
    };
    let Some(root) = tree.root() else {
        return;
    };

    let scaled = strength * alpha;
    for (index, node) in nodes.iter_mut().enumerate() {
        let mut force = Vec2::ZERO;
        let point = positions[index];
        accumulate_charge(&tree, root, index, point, positions, scaled, theta, &mut force);
        node.velocity += force;
    }
}

fn charge_between(point: Vec2, other: Vec2, strength: f32) -> Vec2 {
    let mut delta = other - point;
    if delta.length_sq() <= f32::EPSILON {
        delta = vec2(1e-3, 0.0);
    }
    let distance_sq = delta.length_sq().max(1.0);
    delta * (strength / distance_sq)
}

#[allow(clippy::too_many_arguments)]
fn accumulate_charge(
    tree: &QuadTree,
    branch: &Branch,
    index: usize,
    point: Vec2,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if branch.is_leaf() {
        for &other in tree.members(branch) {
            if other != index {
                *force += charge_between(point, positions[other], strength);
            }
        }
        return;
    }

    let distance = (branch.centroid - point).length().max(1e-4);
    if !branch.cell.contains(point) && branch.cell.size / distance < theta {
        *force += charge_between(point, branch.centroid, strength * branch.weight);
        return;
    }

    for child in tree.children(branch) {
        accumulate_charge(tree, child, index, point, positions, strength, theta, force);
    }
}
