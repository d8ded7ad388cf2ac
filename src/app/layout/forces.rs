use eframe::egui::{Vec2, vec2};

use super::Body;

/// Spring along one link. `strength` and `bias` are derived from endpoint
/// degrees at construction so that high-degree hubs move less than leaves.
#[derive(Clone, Copy, Debug)]
pub(super) struct SpringLink {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) rest_length: f32,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

/// Builds springs for `(source, target, rest_length)` pairs over `count`
/// bodies, weighting each endpoint by its degree.
pub(super) fn spring_links(
    count: usize,
    pairs: impl IntoIterator<Item = (usize, usize, f32)>,
) -> Vec<SpringLink> {
    let mut links: Vec<SpringLink> = pairs
        .into_iter()
        .filter(|&(source, target, _)| source < count && target < count)
        .map(|(source, target, rest_length)| SpringLink {
            source,
            target,
            rest_length,
            strength: 0.0,
            bias: 0.0,
        })
        .collect();

    let mut degree = vec![0.0f32; count];
    for link in &links {
        degree[link.source] += 1.0;
        degree[link.target] += 1.0;
    }
    for link in &mut links {
        let source_degree = degree[link.source].max(1.0);
        let target_degree = degree[link.target].max(1.0);
        link.strength = 1.0 / source_degree.min(target_degree);
        link.bias = source_degree / (source_degree + target_degree);
    }
    links
}

/// Translates every body so the mean position sits on `center`. Pinned bodies
/// snap back to their pin during integration.
pub(super) fn apply_center(bodies: &mut [Body], center: Vec2) {
    if bodies.is_empty() {
        return;
    }

    let mut mean = Vec2::ZERO;
    for body in bodies.iter() {
        mean += body.pos;
    }
    mean /= bodies.len() as f32;

    let shift = mean - center;
    for body in bodies.iter_mut() {
        body.pos -= shift;
    }
}

/// Pairwise inverse-distance charge. Negative `strength` repels. When
/// `max_distance` is set, pairs farther apart do not interact at all.
pub(super) fn apply_charge(
    bodies: &mut [Body],
    strength: f32,
    max_distance: Option<f32>,
    alpha: f32,
) {
    let max_distance_sq = max_distance.map_or(f32::INFINITY, |d| d * d);

    for first in 0..bodies.len() {
        for second in (first + 1)..bodies.len() {
            let delta = bodies[second].pos - bodies[first].pos;
            let distance_sq = delta.length_sq();
            if distance_sq >= max_distance_sq {
                continue;
            }

            let (direction, distance) = if distance_sq > 1e-6 {
                (delta / distance_sq.sqrt(), distance_sq.sqrt().max(1.0))
            } else {
                (separation_direction(first, second), 1.0)
            };

            // negative strength repels: the push points from second to first
            let push = direction * (strength * alpha / distance);
            bodies[first].vel += push;
            bodies[second].vel -= push;
        }
    }
}

/// Pulls each spring toward its rest length, splitting the correction between
/// endpoints by bias. Uses the projected position (pos + vel) like the charge
/// and collision passes run before integration.
pub(super) fn apply_springs(bodies: &mut [Body], links: &[SpringLink], alpha: f32) {
    for link in links {
        if link.source == link.target {
            continue;
        }

        let projected_source = bodies[link.source].pos + bodies[link.source].vel;
        let projected_target = bodies[link.target].pos + bodies[link.target].vel;
        let delta = projected_target - projected_source;
        let distance = delta.length().max(1e-6);

        let magnitude = (distance - link.rest_length) / distance * alpha * link.strength;
        let correction = delta * magnitude;
        bodies[link.target].vel -= correction * link.bias;
        bodies[link.source].vel += correction * (1.0 - link.bias);
    }
}

/// Separates any pair of bodies closer than `min_distance`, pushing both
/// apart by half the overlap.
pub(super) fn apply_collide(bodies: &mut [Body], min_distance: f32) {
    for first in 0..bodies.len() {
        for second in (first + 1)..bodies.len() {
            let projected_first = bodies[first].pos + bodies[first].vel;
            let projected_second = bodies[second].pos + bodies[second].vel;
            let delta = projected_second - projected_first;
            let distance = delta.length();
            if distance >= min_distance {
                continue;
            }

            let direction = if distance > 1e-3 {
                delta / distance
            } else {
                separation_direction(first, second)
            };
            let push = direction * ((min_distance - distance) * 0.5);
            bodies[second].vel += push;
            bodies[first].vel -= push;
        }
    }
}

/// Radial constraint: pulls each body toward a circle of `radius` around its
/// owner's current position. `owner_position` is re-evaluated every tick, so
/// the circle follows the owner mid-simulation.
pub(super) fn apply_radial(
    bodies: &mut [Body],
    owners: &[usize],
    owner_position: &dyn Fn(usize) -> Vec2,
    radius: f32,
    strength: f32,
    alpha: f32,
) {
    for (index, body) in bodies.iter_mut().enumerate() {
        let center = owner_position(owners[index]);
        let delta = body.pos - center;
        let distance = delta.length().max(1e-6);
        let pull = (radius - distance) * strength * alpha / distance;
        body.vel += delta * pull;
    }
}

// Deterministic direction for coincident bodies.
fn separation_direction(first: usize, second: usize) -> Vec2 {
    let angle =
        ((first as f32) * 0.618_034 + (second as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}
