//! Neuro Pong - classic two-paddle pong with a self-learning opponent
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, scoring, trajectory prediction)
//! - `ai`: Predictor network, automated paddle controller, weight persistence
//! - `engine`: Entity/scene plumbing, keyboard dispatch, fixed-rate loop
//! - `scene`: Main menu and match scenes, countdown timer
//! - `raster`: Software framebuffer drawing

pub mod ai;
pub mod engine;
pub mod raster;
pub mod scene;
pub mod sim;

pub use ai::{Network, SharedNetwork};
pub use sim::{MatchPhase, MatchState, PlayArea, Side};

/// Game configuration constants
pub mod consts {
    /// Render/tick rate of the game loop
    pub const TICK_HZ: u32 = 60;

    /// Board dimensions in pixels
    pub const BOARD_WIDTH: f32 = 960.0;
    pub const BOARD_HEIGHT: f32 = 540.0;

    /// Ball defaults - velocities are units per tick
    pub const BALL_RADIUS: f32 = 8.0;
    /// Horizontal/vertical magnitudes of the four reset presets
    pub const BALL_PRESET_VX: f32 = 4.0;
    pub const BALL_PRESET_VY: f32 = 2.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 12.0;
    pub const PADDLE_HEIGHT: f32 = 108.0;
    /// Vertical speed while a direction is commanded (units per tick)
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from each goal line to the paddle contact plane
    pub const PADDLE_INSET: f32 = 40.0;
    /// Paddles never move closer than this to the top/bottom walls
    pub const WALL_MARGIN: f32 = 12.0;

    /// Seconds counted down before a match goes active
    pub const COUNTDOWN_SECS: u32 = 3;

    /// A predictor output commands a move when within this of 1.0
    pub const CONFIDENCE_WINDOW: f32 = 0.03;
    /// Pause between automated controller decisions
    pub const CONTROLLER_INTERVAL_MS: u64 = 5;
}
