//! Enemy movement policies. A strategy runs once per frame before the body's physics step, so
//! whatever horizontal velocity it leaves behind is what the step consumes.
//!
//! Strategies only ever touch the body they are handed.

use bevy::math::Vec2;
use rand::Rng;
use serde::Deserialize;

use crate::physics::PhysicsBody;

/// What a strategy may look at besides its own body.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementContext {
    /// Center of the entity being chased, if there is one.
    pub target: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStrategy {
    /// Walk back and forth between two world-space x bounds.
    Patrol {
        speed: f32,
        left_bound: f32,
        right_bound: f32,
    },
    /// Occasionally hop while grounded. `jump_strength` is negative (upward).
    RandomHop { jump_strength: f32, jump_chance: f32 },
    /// Walk toward the target's x position.
    Chase { speed: f32 },
    /// Run children in order; later children may overwrite earlier ones.
    Composite(Vec<MovementStrategy>),
}

impl MovementStrategy {
    pub fn apply<R: Rng + ?Sized>(
        &self,
        body: &mut PhysicsBody,
        context: &MovementContext,
        rng: &mut R,
    ) {
        match self {
            Self::Patrol {
                speed,
                left_bound,
                right_bound,
            } => patrol(body, *speed, *left_bound, *right_bound, rng),
            Self::RandomHop {
                jump_strength,
                jump_chance,
            } => random_hop(body, *jump_strength, *jump_chance, rng),
            Self::Chase { speed } => chase(body, *speed, context.target),
            Self::Composite(children) => {
                for child in children {
                    child.apply(body, context, rng);
                }
            }
        }
    }
}

fn patrol<R: Rng + ?Sized>(
    body: &mut PhysicsBody,
    speed: f32,
    left_bound: f32,
    right_bound: f32,
    rng: &mut R,
) {
    // Something else (a freeze, a capture release) may have zeroed us.
    if body.velocity.x == 0.0 {
        body.velocity.x = if rng.gen_bool(0.5) { speed } else { -speed };
    }

    if body.rect.left <= left_bound {
        body.rect.left = left_bound;
        if body.velocity.x < 0.0 {
            body.velocity.x = -body.velocity.x;
        }
    } else if body.rect.right() >= right_bound {
        body.rect.left = right_bound - body.rect.width;
        if body.velocity.x > 0.0 {
            body.velocity.x = -body.velocity.x;
        }
    }
}

fn random_hop<R: Rng + ?Sized>(
    body: &mut PhysicsBody,
    jump_strength: f32,
    jump_chance: f32,
    rng: &mut R,
) {
    if !body.on_ground {
        return;
    }

    if rng.gen::<f32>() < jump_chance {
        body.velocity.y = jump_strength;
        body.on_ground = false;
    }
}

fn chase(body: &mut PhysicsBody, speed: f32, target: Option<Vec2>) {
    let Some(target) = target else {
        body.velocity.x = 0.0;
        return;
    };

    let own_x = body.center().x;
    body.velocity.x = if target.x > own_x {
        speed
    } else if target.x < own_x {
        -speed
    } else {
        0.0
    };
}
