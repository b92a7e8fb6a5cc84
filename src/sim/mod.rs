//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, reads
//! devices or plays sound:
//! - Elapsed wall-clock time comes in through [`crate::Frame`]
//! - Randomness comes from the seeded RNG in [`GameState`]
//! - Sound goes out as [`crate::Cue`] events

pub mod collision;
pub mod layout;
pub mod level;
pub mod motion;
pub mod physics;
pub mod powerups;
pub mod state;
pub mod tick;

pub use collision::{Aabb, intersects, overlap_amounts};
pub use layout::{Field, Layout};
pub use level::{BallLoss, base_ball_speed};
pub use physics::{BallContact, launch_angle};
pub use state::{
    ActiveEffects, Ball, Brick, BrickGrid, GamePhase, GameState, Paddle, Pickup, PickupKind,
    Session, Snapshot,
};
pub use tick::{TickInput, TickOutcome, release_ball, tick};
