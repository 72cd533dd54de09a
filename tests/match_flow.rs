//! End-to-end match lifecycle: countdown, activation, play, scoring, and
//! online training of the shared predictor.

use std::sync::Arc;
use std::sync::mpsc::channel;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use neuropong::ai::{self, NetConfig, Network, SharedNetwork};
use neuropong::engine::Scene;
use neuropong::engine::shared_input;
use neuropong::scene::game::{MatchMode, MatchScene, MatchShared};
use neuropong::sim::{MatchPhase, Side};

fn test_net() -> SharedNetwork {
    ai::share(Network::new(
        NetConfig::default(),
        &mut Pcg32::seed_from_u64(99),
    ))
}

fn fast_match(mode: MatchMode, net: SharedNetwork) -> MatchScene {
    let (tx, _rx) = channel();
    MatchScene::with_timing(
        mode,
        net,
        shared_input(),
        tx,
        1234,
        Duration::from_millis(5),
    )
}

fn wait_active(shared: &Arc<MatchShared>) {
    let start = Instant::now();
    while !shared.active.is_open() {
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "countdown never activated the match"
        );
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn countdown_then_active_then_play() {
    let mut scene = fast_match(MatchMode::PlayerVsPlayer, test_net());
    let shared = scene.shared();

    {
        let state = shared.state.lock().unwrap();
        assert_eq!(state.phase, MatchPhase::Countdown);
    }

    wait_active(&shared);

    let start_pos = shared.state.lock().unwrap().ball.pos;
    for _ in 0..10 {
        scene.tick();
    }

    let state = shared.state.lock().unwrap();
    assert_eq!(state.phase, MatchPhase::Active);
    assert_ne!(state.ball.pos, start_pos, "ball moves once the match is active");
    assert_eq!(state.time_ticks, 10);
}

#[test]
fn a_missed_ball_scores_and_resets() {
    let mut scene = fast_match(MatchMode::PlayerVsPlayer, test_net());
    let shared = scene.shared();
    wait_active(&shared);

    // Aim the ball at the left goal, far from the paddle extent.
    {
        let mut state = shared.state.lock().unwrap();
        state.ball.pos = Vec2::new(60.0, 480.0);
        state.ball.vel = Vec2::new(-4.0, 0.25);
        let area = state.area;
        state.ball.recompute_trajectory(&area);
        assert_eq!(state.ball.trajectory.terminal_side, Some(Side::Left));
    }

    let mut scored = false;
    for _ in 0..100 {
        scene.tick();
        let state = shared.state.lock().unwrap();
        if state.score.right == 1 {
            scored = true;
            assert_eq!(state.score.left, 0);
            assert_eq!(state.ball.pos, state.area.center());
            break;
        }
    }
    assert!(scored, "ball past the left goal line credits the right side");
}

#[test]
fn train_mode_controllers_update_the_shared_predictor() {
    let net = test_net();
    let before = postcard::to_allocvec(&*net.lock().unwrap()).unwrap();

    let mut scene = fast_match(MatchMode::TrainAi, net.clone());
    let shared = scene.shared();
    wait_active(&shared);

    // Drive frames while both controllers decide and train against the
    // shared network.
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(300) {
        scene.tick();
        thread::sleep(Duration::from_millis(2));
    }
    drop(scene);

    let after = postcard::to_allocvec(&*net.lock().unwrap()).unwrap();
    assert_ne!(before, after, "online training must adjust the weights");
}

#[test]
fn controllers_only_command_their_own_paddle_speed() {
    let net = test_net();
    let mut scene = fast_match(MatchMode::TrainAi, net);
    let shared = scene.shared();
    wait_active(&shared);

    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(200) {
        scene.tick();
        let state = shared.state.lock().unwrap();
        for paddle in &state.paddles {
            assert!(
                paddle.velocity_y.abs() <= neuropong::consts::PADDLE_SPEED,
                "commanded velocity stays within the paddle speed"
            );
        }
        drop(state);
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn player_vs_ai_only_automates_the_right_side() {
    let net = test_net();
    let scene = fast_match(MatchMode::PlayerVsAi, net);
    let shared = scene.shared();
    wait_active(&shared);

    // The human (left) paddle was never commanded; only the right side may
    // ever receive controller output.
    thread::sleep(Duration::from_millis(100));
    let state = shared.state.lock().unwrap();
    assert_eq!(state.paddle(Side::Left).velocity_y, 0.0);
}
