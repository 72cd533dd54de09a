//! Fixed timestep simulation tick
//!
//! Advances one match by one frame: paddle motion, ball motion, collision
//! resolution, scoring, then trajectory recomputation - strictly in that
//! order, so controllers observing the trajectory never see a pre-collision
//! path for a post-collision ball.

use super::state::{MatchPhase, MatchState, Side};

/// What happened during one tick, for logging and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct TickEvents {
    pub wall_bounce: bool,
    pub paddle_hit: Option<Side>,
    pub scored: Option<Side>,
}

/// Advance the match by one tick.
///
/// Paddles always respond to their commanded velocity; the ball only moves
/// while the match is active.
pub fn tick(state: &mut MatchState) -> TickEvents {
    let mut events = TickEvents::default();

    let area = state.area;
    for paddle in &mut state.paddles {
        paddle.advance(&area);
    }

    if state.phase != MatchPhase::Active {
        return events;
    }
    state.time_ticks += 1;

    let prev = state.ball.pos;
    state.ball.pos += state.ball.vel;

    if state.ball.pos.y <= area.top() || state.ball.pos.y >= area.bottom() {
        // Elastic vertical reflection: only vel.y flips
        state.ball.vel.y = -state.ball.vel.y;
        state.ball.pos.y = state.ball.pos.y.clamp(area.top(), area.bottom());
        events.wall_bounce = true;
    } else if let Some(goal_side) = approached_goal(state) {
        let goal_x = area.goal_x(goal_side);
        let contact_x = area.contact_x(goal_side);
        let crossed_plane = match goal_side {
            Side::Left => prev.x > contact_x && state.ball.pos.x <= contact_x,
            Side::Right => prev.x < contact_x && state.ball.pos.x >= contact_x,
        };
        let past_goal = match goal_side {
            Side::Left => state.ball.pos.x <= goal_x,
            Side::Right => state.ball.pos.x >= goal_x,
        };

        if past_goal {
            // Deep past the paddle: the defender missed
            state.score.increment(goal_side.opposite());
            events.scored = Some(goal_side.opposite());
            state.ball.reset(&area, &mut state.rng);
            return events;
        }

        if crossed_plane {
            let paddle = *state.paddle(goal_side);
            if paddle.covers(state.ball.pos.y) {
                // Reflect, and let the paddle's motion impart spin
                state.ball.vel.x = -state.ball.vel.x;
                state.ball.vel.y += paddle.velocity_y;
                state.ball.pos.x = contact_x;
                events.paddle_hit = Some(goal_side);
            }
            // Outside the extent the ball sails on; the goal branch
            // catches it a few ticks later.
        }
    }

    state.ball.recompute_trajectory(&area);
    events
}

/// The goal side the ball is currently moving toward
fn approached_goal(state: &MatchState) -> Option<Side> {
    if state.ball.vel.x < 0.0 {
        Some(Side::Left)
    } else if state.ball.vel.x > 0.0 {
        Some(Side::Right)
    } else {
        None
    }
}
