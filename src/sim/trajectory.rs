//! Forward trajectory prediction
//!
//! Pure geometric simulation of where the ball will cross a goal line,
//! assuming no paddle interferes. Used as a render overlay and as the
//! ground-truth signal for controller training.

use glam::Vec2;

use super::state::{PlayArea, Side};

/// One straight segment between wall bounces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub start: Vec2,
    pub end: Vec2,
}

/// The predicted path: bounce segments plus the terminal goal-line point
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    /// Ball position the prediction started from
    pub origin: Vec2,
    pub bounces: Vec<Bounce>,
    pub terminus: Vec2,
    /// Which goal line the terminus lies on
    pub terminal_side: Option<Side>,
}

impl Trajectory {
    /// All drawable segments, including the final leg into the terminus
    pub fn segments(&self) -> impl Iterator<Item = Bounce> + '_ {
        let last_start = self.bounces.last().map(|b| b.end).unwrap_or(self.origin);
        self.bounces.iter().copied().chain(std::iter::once(Bounce {
            start: last_start,
            end: self.terminus,
        }))
    }
}

/// Simulate straight-line travel inside the play area until a goal line is
/// reached.
///
/// Per axis, the time to the wall the velocity is moving toward is
/// `distance / component` (infinite when the component is zero or moving
/// away). The nearer wall is advanced to; a top/bottom hit records a bounce
/// and reflects `vel.y`, a left/right hit terminates. Exact ties go to the
/// goal wall. Each bounce strictly advances x toward a goal line, so the
/// loop always terminates; `vel.x == 0` would never get there and is
/// prevented by construction (reset presets and spin arithmetic leave x
/// untouched).
pub fn calculate_trajectory(area: &PlayArea, start: Vec2, vel: Vec2) -> Trajectory {
    debug_assert!(vel.x != 0.0, "trajectory requires horizontal motion");

    let mut pos = start;
    let mut vel = vel;
    let mut bounces = Vec::new();

    loop {
        let goal_x = if vel.x > 0.0 { area.right() } else { area.left() };
        let wall_y = if vel.y > 0.0 { area.bottom() } else { area.top() };
        let t_goal = (goal_x - pos.x) / vel.x;
        let t_wall = if vel.y != 0.0 {
            (wall_y - pos.y) / vel.y
        } else {
            f32::INFINITY
        };

        if t_goal <= t_wall {
            // Pin the terminus onto the goal line so the result is exact
            let terminus = Vec2::new(goal_x, pos.y + vel.y * t_goal);
            let terminal_side = if vel.x < 0.0 { Side::Left } else { Side::Right };
            return Trajectory {
                origin: start,
                bounces,
                terminus,
                terminal_side: Some(terminal_side),
            };
        }

        let end = Vec2::new(pos.x + vel.x * t_wall, wall_y);
        bounces.push(Bounce { start: pos, end });
        pos = end;
        vel.y = -vel.y;
    }
}
