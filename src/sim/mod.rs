//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are units per tick)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;
pub mod trajectory;

pub use state::{Ball, MatchPhase, MatchState, Paddle, PlayArea, Score, Side};
pub use tick::{TickEvents, tick};
pub use trajectory::{Bounce, Trajectory, calculate_trajectory};
