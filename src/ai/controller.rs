//! Automated paddle controller
//!
//! One background thread per automated paddle. Each iteration holds the
//! predictor lock across the evaluate + train pair, so the observation, the
//! decision it produced and the correction it trains against always belong
//! to the same snapshot - even when two controllers share one network.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec2;

use super::SharedNetwork;
use crate::consts::{CONFIDENCE_WINDOW, CONTROLLER_INTERVAL_MS, PADDLE_SPEED};
use crate::scene::game::MatchShared;
use crate::sim::{MatchState, Side, Trajectory};

/// Observation vector fed to the predictor
pub const OBSERVATION_LEN: usize = 9;

/// What a decision translates to at the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Stop,
}

impl Command {
    pub fn velocity(self) -> f32 {
        match self {
            Command::Up => -PADDLE_SPEED,
            Command::Down => PADDLE_SPEED,
            Command::Stop => 0.0,
        }
    }
}

/// Build the 9-value observation for one paddle
pub fn observe(state: &MatchState, side: Side) -> [f32; OBSERVATION_LEN] {
    let paddle = state.paddle(side);
    let ball = &state.ball;
    let hit = ball.trajectory.terminus;
    [
        side.index() as f32,
        Vec2::new(paddle.x, paddle.y).distance(ball.pos),
        paddle.height,
        ball.vel.x,
        ball.vel.y,
        ball.pos.x,
        ball.pos.y,
        hit.x,
        hit.y,
    ]
}

/// Turn predictor outputs into a command.
///
/// First confident branch wins, so an ambiguous output pair can never move
/// the paddle both ways.
pub fn decide(outputs: &[f32]) -> Command {
    if (1.0 - outputs[0]).abs() <= CONFIDENCE_WINDOW {
        Command::Up
    } else if (1.0 - outputs[1]).abs() <= CONFIDENCE_WINDOW {
        Command::Down
    } else {
        Command::Stop
    }
}

/// Ground-truth target for one decision: move toward the predicted hit point
/// when it lands on this paddle's own goal line, otherwise hold still.
pub fn training_target(side: Side, paddle_y: f32, trajectory: &Trajectory) -> [f32; 2] {
    if trajectory.terminal_side != Some(side) {
        return [0.0, 0.0];
    }
    let hit_y = trajectory.terminus.y;
    let up = if hit_y < paddle_y { 1.0 } else { 0.0 };
    let down = if hit_y > paddle_y { 1.0 } else { 0.0 };
    [up, down]
}

/// Handle to a running controller thread; stops and joins on drop
pub struct Controller {
    alive: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Controller {
    /// Spawn the decision loop for one paddle. It waits on the match's
    /// active gate before the first decision and exits when stopped.
    pub fn spawn(side: Side, shared: Arc<MatchShared>, net: SharedNetwork) -> Self {
        Self::spawn_with_interval(side, shared, net, Duration::from_millis(CONTROLLER_INTERVAL_MS))
    }

    pub fn spawn_with_interval(
        side: Side,
        shared: Arc<MatchShared>,
        net: SharedNetwork,
        interval: Duration,
    ) -> Self {
        let alive = Arc::new(AtomicBool::new(true));
        let thread_alive = alive.clone();
        let handle = thread::spawn(move || decision_loop(side, shared, net, interval, thread_alive));
        Self {
            alive,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn decision_loop(
    side: Side,
    shared: Arc<MatchShared>,
    net: SharedNetwork,
    interval: Duration,
    alive: Arc<AtomicBool>,
) {
    // Block until the countdown opens the gate; time out periodically so a
    // match torn down mid-countdown still releases this thread.
    while !shared.active.wait_timeout(Duration::from_millis(50)) {
        if !alive.load(Ordering::SeqCst) {
            return;
        }
    }
    log::debug!("{side:?} controller active");

    while alive.load(Ordering::SeqCst) {
        let Ok(mut net) = net.lock() else {
            return;
        };

        // Snapshot under the state lock; evaluate and train under the
        // predictor lock only.
        let (observation, paddle_y, trajectory) = {
            let Ok(state) = shared.state.lock() else {
                return;
            };
            (
                observe(&state, side),
                state.paddle(side).y,
                state.ball.trajectory.clone(),
            )
        };

        let outputs = net.forward(&observation);
        let command = decide(&outputs);

        {
            let Ok(mut state) = shared.state.lock() else {
                return;
            };
            state.paddle_mut(side).velocity_y = command.velocity();
        }

        net.train_step(&training_target(side, paddle_y, &trajectory));
        drop(net);

        thread::sleep(interval);
    }
}
