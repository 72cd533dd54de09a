//! Match state and core simulation types

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::trajectory::{Trajectory, calculate_trajectory};
use crate::consts::*;

/// Which goal a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The side defending the opposite goal
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Center-anchored rectangle describing the playable bounds.
///
/// Immutable once a match is constructed. Collision and trajectory code treat
/// the ball as a point against these bounds; the radius is visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The full board at its default dimensions
    pub fn board() -> Self {
        Self::new(
            BOARD_WIDTH / 2.0,
            BOARD_HEIGHT / 2.0,
            BOARD_WIDTH,
            BOARD_HEIGHT,
        )
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Goal line x coordinate for a side
    pub fn goal_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    /// Paddle contact plane x coordinate for a side
    pub fn contact_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left() + PADDLE_INSET,
            Side::Right => self.right() - PADDLE_INSET,
        }
    }
}

/// A vertical paddle, fixed in x per side
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub height: f32,
    /// Commanded vertical velocity, applied once per tick
    pub velocity_y: f32,
}

impl Paddle {
    pub fn new(side: Side, area: &PlayArea) -> Self {
        Self {
            side,
            x: area.contact_x(side),
            y: area.y,
            height: PADDLE_HEIGHT,
            velocity_y: 0.0,
        }
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Whether a y coordinate lies within the paddle's vertical extent
    pub fn covers(&self, y: f32) -> bool {
        y >= self.top() && y <= self.bottom()
    }

    /// Apply the commanded velocity, keeping the paddle's extent clear of the
    /// top/bottom walls by the fixed margin.
    pub fn advance(&mut self, area: &PlayArea) {
        if self.velocity_y != 0.0 {
            let min_y = area.top() + WALL_MARGIN + self.height / 2.0;
            let max_y = area.bottom() - WALL_MARGIN - self.height / 2.0;
            self.y = (self.y + self.velocity_y).clamp(min_y, max_y);
        }
    }
}

/// The ball, with its cached forward trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Recomputed every active tick, after collision resolution
    #[serde(skip)]
    pub trajectory: Trajectory,
}

impl Ball {
    pub fn new(area: &PlayArea) -> Self {
        let mut ball = Self {
            pos: area.center(),
            vel: Vec2::new(BALL_PRESET_VX, BALL_PRESET_VY),
            radius: BALL_RADIUS,
            trajectory: Trajectory::default(),
        };
        ball.recompute_trajectory(area);
        ball
    }

    /// Return to board center with a fresh random diagonal preset.
    ///
    /// Neither component is ever zero, so the trajectory simulation always
    /// makes progress toward a goal line.
    pub fn reset(&mut self, area: &PlayArea, rng: &mut Pcg32) {
        self.pos = area.center();
        let vx = if rng.random_bool(0.5) {
            BALL_PRESET_VX
        } else {
            -BALL_PRESET_VX
        };
        let vy = if rng.random_bool(0.5) {
            BALL_PRESET_VY
        } else {
            -BALL_PRESET_VY
        };
        self.vel = Vec2::new(vx, vy);
        self.recompute_trajectory(area);
    }

    pub fn recompute_trajectory(&mut self, area: &PlayArea) {
        self.trajectory = calculate_trajectory(area, self.pos, self.vel);
    }
}

/// Per-match score counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// Lifecycle phase of a match
///
/// Transitions run `Setup -> Countdown -> Active` exactly once each; scoring
/// resets the ball but never re-enters Countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Setup,
    Countdown,
    Active,
}

/// Complete mutable state of one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub area: PlayArea,
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub score: Score,
    pub phase: MatchPhase,
    /// Seconds remaining on the countdown display
    pub countdown_left: u32,
    pub time_ticks: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl MatchState {
    pub fn new(seed: u64) -> Self {
        let area = PlayArea::board();
        Self {
            area,
            paddles: [Paddle::new(Side::Left, &area), Paddle::new(Side::Right, &area)],
            ball: Ball::new(&area),
            score: Score::default(),
            phase: MatchPhase::Setup,
            countdown_left: COUNTDOWN_SECS,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        &mut self.paddles[side.index()]
    }

    /// The one-shot Countdown -> Active transition; gameplay ticks begin
    pub fn activate(&mut self) {
        self.phase = MatchPhase::Active;
        self.countdown_left = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn play_area_edges() {
        let area = PlayArea::board();
        assert_eq!(area.left(), 0.0);
        assert_eq!(area.right(), BOARD_WIDTH);
        assert_eq!(area.top(), 0.0);
        assert_eq!(area.bottom(), BOARD_HEIGHT);
        assert_eq!(area.center(), Vec2::new(480.0, 270.0));
    }

    #[test]
    fn ball_reset_draws_from_diagonal_presets() {
        let area = PlayArea::board();
        let mut ball = Ball::new(&area);
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..32 {
            ball.reset(&area, &mut rng);
            assert_eq!(ball.pos, area.center());
            assert_eq!(ball.vel.x.abs(), BALL_PRESET_VX);
            assert_eq!(ball.vel.y.abs(), BALL_PRESET_VY);
        }
    }

    #[test]
    fn paddle_clamps_to_wall_margin() {
        let area = PlayArea::board();
        let mut paddle = Paddle::new(Side::Left, &area);
        paddle.velocity_y = -PADDLE_SPEED;

        for _ in 0..1000 {
            paddle.advance(&area);
        }
        assert_eq!(paddle.top(), area.top() + WALL_MARGIN);

        paddle.velocity_y = PADDLE_SPEED;
        for _ in 0..1000 {
            paddle.advance(&area);
        }
        assert_eq!(paddle.bottom(), area.bottom() - WALL_MARGIN);
    }

    #[test]
    fn paddle_covers_its_extent() {
        let area = PlayArea::board();
        let paddle = Paddle::new(Side::Left, &area);
        // y = 270, height 108 -> extent 216..=324
        assert!(paddle.covers(216.0));
        assert!(paddle.covers(300.0));
        assert!(paddle.covers(324.0));
        assert!(!paddle.covers(215.9));
        assert!(!paddle.covers(324.1));
    }

    #[test]
    fn score_increments_one_counter() {
        let mut score = Score::default();
        score.increment(Side::Right);
        assert_eq!(score.left, 0);
        assert_eq!(score.right, 1);
        score.increment(Side::Left);
        assert_eq!(score.left, 1);
        assert_eq!(score.right, 1);
    }

    #[test]
    fn activate_is_one_way() {
        let mut state = MatchState::new(1);
        state.phase = MatchPhase::Countdown;

        state.activate();
        assert_eq!(state.phase, MatchPhase::Active);
        assert_eq!(state.countdown_left, 0);
    }
}
