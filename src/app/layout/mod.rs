mod forces;

use eframe::egui::Vec2;

use crate::net::{AggregatedLink, StateNetwork};
use crate::util::phyllotaxis;

use forces::{
    SpringLink, apply_center, apply_charge, apply_collide, apply_radial, apply_springs,
    spring_links,
};

pub(in crate::app) const NODE_RADIUS: f32 = 50.0;
pub(in crate::app) const STATE_RADIUS: f32 = 15.0;

const LINK_DISTANCE: f32 = 200.0;
const RADIAL_STRENGTH: f32 = 0.8;
const PHYSICAL_CHARGE: f32 = -1000.0;
const STATE_CHARGE: f32 = -200.0;

const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY_TICKS: f32 = 300.0;
const VELOCITY_DECAY: f32 = 0.6;

/// One simulated entity. `pinned` is the drag override: while set, forces
/// still accumulate but integration snaps the body back onto the pin.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub pinned: Option<Vec2>,
}

impl Body {
    fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            pinned: None,
        }
    }
}

/// Simulation temperature. Alpha decays toward `alpha_target` each tick;
/// the stepper goes quiescent once alpha falls below the minimum with a zero
/// target, and re-heating the target resumes motion.
#[derive(Clone, Copy, Debug)]
struct AlphaSchedule {
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
}

impl AlphaSchedule {
    fn new() -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / ALPHA_DECAY_TICKS),
        }
    }

    fn advance(&mut self) -> Option<f32> {
        if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
            return None;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        Some(self.alpha)
    }
}

fn integrate(bodies: &mut [Body]) {
    for body in bodies {
        if let Some(pin) = body.pinned {
            body.pos = pin;
            body.vel = Vec2::ZERO;
        } else {
            body.vel *= VELOCITY_DECAY;
            body.pos += body.vel;
        }
    }
}

/// Stepper over the physical nodes: centering, collision at 2×nodeRadius,
/// strong charge repulsion and springs along the aggregated physical links.
pub(in crate::app) struct PhysicalLayout {
    pub bodies: Vec<Body>,
    links: Vec<SpringLink>,
    schedule: AlphaSchedule,
}

impl PhysicalLayout {
    pub fn new(network: &StateNetwork, aggregated: &[AggregatedLink]) -> Self {
        let bodies = (0..network.nodes.len())
            .map(|index| Body::at(phyllotaxis(index)))
            .collect();
        let links = spring_links(
            network.nodes.len(),
            aggregated
                .iter()
                .map(|link| (link.source, link.target, LINK_DISTANCE)),
        );
        Self {
            bodies,
            links,
            schedule: AlphaSchedule::new(),
        }
    }

    /// Advances one tick; returns false once settled.
    pub fn advance(&mut self) -> bool {
        let Some(alpha) = self.schedule.advance() else {
            return false;
        };

        apply_charge(&mut self.bodies, PHYSICAL_CHARGE, None, alpha);
        apply_springs(&mut self.bodies, &self.links, alpha);
        apply_collide(&mut self.bodies, 2.0 * NODE_RADIUS);
        apply_center(&mut self.bodies, Vec2::ZERO);
        integrate(&mut self.bodies);
        true
    }

    pub fn reheat(&mut self, alpha_target: f32) {
        self.schedule.alpha_target = alpha_target;
    }

    pub fn position(&self, index: usize) -> Vec2 {
        self.bodies[index].pos
    }
}

/// Stepper over the state nodes. Coupled to the physical layout only through
/// the owner-position accessor passed into `advance`, which the radial
/// constraint re-evaluates every tick.
pub(in crate::app) struct StateLayout {
    pub bodies: Vec<Body>,
    owners: Vec<usize>,
    links: Vec<SpringLink>,
    schedule: AlphaSchedule,
}

impl StateLayout {
    pub fn new(network: &StateNetwork) -> Self {
        let bodies = network
            .states
            .iter()
            .enumerate()
            .map(|(index, state)| Body::at(phyllotaxis(state.owner) + phyllotaxis(index)))
            .collect();
        let owners = network.states.iter().map(|state| state.owner).collect();
        // Intra-node links rest at 2×nodeRadius; inter-node links match the
        // physical rest length so they do not fight the physical layout.
        let links = spring_links(
            network.states.len(),
            network.links.iter().map(|link| {
                let same_owner =
                    network.states[link.source].owner == network.states[link.target].owner;
                let rest = if same_owner {
                    2.0 * NODE_RADIUS
                } else {
                    LINK_DISTANCE
                };
                (link.source, link.target, rest)
            }),
        );
        Self {
            bodies,
            owners,
            links,
            schedule: AlphaSchedule::new(),
        }
    }

    /// Advances one tick, reading owner positions live. Returns false once
    /// settled.
    pub fn advance(&mut self, owner_position: &dyn Fn(usize) -> Vec2) -> bool {
        let Some(alpha) = self.schedule.advance() else {
            return false;
        };

        apply_charge(&mut self.bodies, STATE_CHARGE, Some(2.0 * NODE_RADIUS), alpha);
        apply_springs(&mut self.bodies, &self.links, alpha);
        apply_radial(
            &mut self.bodies,
            &self.owners,
            owner_position,
            NODE_RADIUS / 2.0,
            RADIAL_STRENGTH,
            alpha,
        );
        apply_collide(&mut self.bodies, STATE_RADIUS);
        integrate(&mut self.bodies);
        true
    }

    pub fn reheat(&mut self, alpha_target: f32) {
        self.schedule.alpha_target = alpha_target;
    }
}
