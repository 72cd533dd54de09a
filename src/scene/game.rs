//! The match scene: board, two paddles, ball, countdown
//!
//! Owns the match lifecycle. Construction registers the board, paddle and
//! countdown entities and starts the countdown on its own thread; when it
//! reaches zero the countdown entity leaves the render set, the ball entity
//! joins it, the active gate opens and any automated controllers begin
//! deciding. Dropping the scene cancels and joins every owned thread before
//! the state goes away.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ai::{Controller, SharedNetwork};
use crate::consts::{COUNTDOWN_SECS, PADDLE_SPEED, PADDLE_WIDTH};
use crate::engine::{
    EngineRequest, Gate, HandlerId, Key, RenderSet, Renderable, Scene, SharedInput,
    SharedRenderSet,
};
use crate::raster::{
    self, COLOR_BALL, COLOR_BORDER, COLOR_PADDLE, COLOR_TRAJECTORY, COLOR_WHITE, Frame,
};
use crate::sim::{self, MatchPhase, MatchState, Side};

use super::countdown::Countdown;

/// Which paddles are automated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    PlayerVsAi,
    TrainAi,
    PlayerVsPlayer,
}

impl MatchMode {
    fn automated(self, side: Side) -> bool {
        match self {
            MatchMode::PlayerVsAi => side == Side::Right,
            MatchMode::TrainAi => true,
            MatchMode::PlayerVsPlayer => false,
        }
    }
}

/// State shared between the render thread, the countdown thread and the
/// controller threads.
pub struct MatchShared {
    pub state: Mutex<MatchState>,
    /// Opens once when the countdown fires; controllers block on it
    pub active: Gate,
}

impl MatchShared {
    pub fn new(state: MatchState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            active: Gate::new(),
        })
    }
}

/// Court border, center line and score display
struct BoardEntity {
    shared: Arc<MatchShared>,
}

impl Renderable for BoardEntity {
    fn render(&self, frame: &mut Frame) {
        let Ok(state) = self.shared.state.lock() else {
            return;
        };
        let area = state.area;
        let (left, top) = (area.left() as i32, area.top() as i32);
        let (right, bottom) = (area.right() as i32 - 1, area.bottom() as i32 - 1);
        raster::draw_line(frame, left, top, right, top, COLOR_BORDER);
        raster::draw_line(frame, left, bottom, right, bottom, COLOR_BORDER);
        raster::draw_line(frame, left, top, left, bottom, COLOR_BORDER);
        raster::draw_line(frame, right, top, right, bottom, COLOR_BORDER);

        let center_x = area.x as i32;
        let mut y = top;
        while y < bottom {
            raster::draw_line(frame, center_x, y, center_x, (y + 8).min(bottom), COLOR_BORDER);
            y += 24;
        }

        let score = format!("{}   {}", state.score.left, state.score.right);
        let scale = 4;
        raster::draw_text(
            frame,
            area.x as i32 - raster::text_width(&score, scale) / 2,
            top + 12,
            &score,
            scale,
            COLOR_WHITE,
        );
    }
}

/// One paddle
struct PaddleEntity {
    shared: Arc<MatchShared>,
    side: Side,
}

impl Renderable for PaddleEntity {
    fn render(&self, frame: &mut Frame) {
        let Ok(state) = self.shared.state.lock() else {
            return;
        };
        let paddle = state.paddle(self.side);
        raster::fill_rect(
            frame,
            (paddle.x - PADDLE_WIDTH / 2.0) as i32,
            paddle.top() as i32,
            PADDLE_WIDTH as i32,
            paddle.height as i32,
            COLOR_PADDLE,
        );
    }
}

/// The ball plus its predicted-trajectory overlay
struct BallEntity {
    shared: Arc<MatchShared>,
}

impl Renderable for BallEntity {
    fn render(&self, frame: &mut Frame) {
        let Ok(state) = self.shared.state.lock() else {
            return;
        };
        for segment in state.ball.trajectory.segments() {
            raster::draw_line(
                frame,
                segment.start.x as i32,
                segment.start.y as i32,
                segment.end.x as i32,
                segment.end.y as i32,
                COLOR_TRAJECTORY,
            );
        }
        raster::fill_circle(
            frame,
            state.ball.pos.x as i32,
            state.ball.pos.y as i32,
            state.ball.radius as i32,
            COLOR_BALL,
        );
    }
}

/// The countdown digit, centered on the board
struct CountdownEntity {
    shared: Arc<MatchShared>,
}

impl Renderable for CountdownEntity {
    fn render(&self, frame: &mut Frame) {
        let Ok(state) = self.shared.state.lock() else {
            return;
        };
        if state.phase != MatchPhase::Countdown {
            return;
        }
        let digit = state.countdown_left.to_string();
        let scale = 12;
        raster::draw_text(
            frame,
            state.area.x as i32 - raster::text_width(&digit, scale) / 2,
            state.area.y as i32 - (5 * scale) / 2,
            &digit,
            scale,
            COLOR_WHITE,
        );
    }
}

pub struct MatchScene {
    shared: Arc<MatchShared>,
    render_set: SharedRenderSet,
    countdown: Option<Countdown>,
    controllers: Vec<Controller>,
    input: SharedInput,
    key_handles: Vec<HandlerId>,
}

impl MatchScene {
    pub fn new(
        mode: MatchMode,
        net: SharedNetwork,
        input: SharedInput,
        requests: Sender<EngineRequest>,
    ) -> Self {
        Self::with_timing(
            mode,
            net,
            input,
            requests,
            rand::random(),
            Duration::from_secs(1),
        )
    }

    /// Construction with an explicit seed and countdown period, so tests can
    /// run the full lifecycle in milliseconds.
    pub fn with_timing(
        mode: MatchMode,
        net: SharedNetwork,
        input: SharedInput,
        requests: Sender<EngineRequest>,
        seed: u64,
        countdown_period: Duration,
    ) -> Self {
        let mut state = MatchState::new(seed);
        state.phase = MatchPhase::Countdown;
        let shared = MatchShared::new(state);

        // Setup: everything but the ball enters the render set.
        let mut set = RenderSet::default();
        set.register(Box::new(BoardEntity { shared: shared.clone() }));
        set.register(Box::new(PaddleEntity { shared: shared.clone(), side: Side::Left }));
        set.register(Box::new(PaddleEntity { shared: shared.clone(), side: Side::Right }));
        let countdown_id = set.register(Box::new(CountdownEntity { shared: shared.clone() }));
        let render_set: SharedRenderSet = Arc::new(Mutex::new(set));

        let countdown = {
            let tick_shared = shared.clone();
            let zero_shared = shared.clone();
            let zero_set = render_set.clone();
            Countdown::start(
                COUNTDOWN_SECS,
                countdown_period,
                move |remaining| {
                    if let Ok(mut state) = tick_shared.state.lock() {
                        state.countdown_left = remaining;
                    }
                },
                move || {
                    if let Ok(mut state) = zero_shared.state.lock() {
                        state.activate();
                    }
                    if let Ok(mut set) = zero_set.lock() {
                        set.unregister(countdown_id);
                        set.register(Box::new(BallEntity { shared: zero_shared.clone() }));
                    }
                    zero_shared.active.open();
                    log::info!("countdown done, match active");
                },
            )
        };

        let controllers = [Side::Left, Side::Right]
            .into_iter()
            .filter(|&side| mode.automated(side))
            .map(|side| Controller::spawn(side, shared.clone(), net.clone()))
            .collect();

        let mut scene = Self {
            shared,
            render_set,
            countdown: Some(countdown),
            controllers,
            input,
            key_handles: Vec::new(),
        };
        scene.bind_keys(mode, requests);
        scene
    }

    pub fn shared(&self) -> Arc<MatchShared> {
        self.shared.clone()
    }

    fn bind_keys(&mut self, mode: MatchMode, requests: Sender<EngineRequest>) {
        let Ok(mut input) = self.input.lock() else {
            return;
        };

        if !mode.automated(Side::Left) {
            self.key_handles
                .push(input.subscribe(Key::W, paddle_handler(&self.shared, Side::Left, -1.0)));
            self.key_handles
                .push(input.subscribe(Key::S, paddle_handler(&self.shared, Side::Left, 1.0)));
        }
        if !mode.automated(Side::Right) {
            self.key_handles
                .push(input.subscribe(Key::Up, paddle_handler(&self.shared, Side::Right, -1.0)));
            self.key_handles
                .push(input.subscribe(Key::Down, paddle_handler(&self.shared, Side::Right, 1.0)));
        }

        self.key_handles.push(input.subscribe(Key::Escape, move |pressed| {
            if pressed {
                let _ = requests.send(EngineRequest::Close);
            }
        }));
    }
}

/// Held-key movement: press commands a direction, release stops the paddle
/// only if it is still moving that way.
fn paddle_handler(
    shared: &Arc<MatchShared>,
    side: Side,
    direction: f32,
) -> impl FnMut(bool) + Send + 'static {
    let shared = shared.clone();
    move |pressed| {
        if let Ok(mut state) = shared.state.lock() {
            let paddle = state.paddle_mut(side);
            if pressed {
                paddle.velocity_y = direction * PADDLE_SPEED;
            } else if paddle.velocity_y * direction > 0.0 {
                paddle.velocity_y = 0.0;
            }
        }
    }
}

impl Scene for MatchScene {
    fn tick(&mut self) {
        let Ok(mut state) = self.shared.state.lock() else {
            return;
        };
        let events = sim::tick(&mut state);
        if let Some(side) = events.scored {
            log::info!(
                "{side:?} scores; {} - {}",
                state.score.left,
                state.score.right
            );
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        if let Ok(set) = self.render_set.lock() {
            set.render_all(frame);
        }
    }
}

impl Drop for MatchScene {
    fn drop(&mut self) {
        // Stop the timer and controllers before the shared state goes away,
        // then drop the key subscriptions.
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
        }
        self.controllers.clear();
        if let Ok(mut input) = self.input.lock() {
            for id in self.key_handles.drain(..) {
                input.unsubscribe(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{self, NetConfig, Network};
    use crate::engine::shared_input;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::sync::mpsc::channel;
    use std::time::Instant;

    fn test_net() -> SharedNetwork {
        ai::share(Network::new(
            NetConfig::default(),
            &mut Pcg32::seed_from_u64(2),
        ))
    }

    fn wait_active(shared: &Arc<MatchShared>) {
        let start = Instant::now();
        while !shared.active.is_open() {
            assert!(start.elapsed() < Duration::from_secs(5), "countdown never fired");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn countdown_swaps_ball_into_the_render_set() {
        let (tx, _rx) = channel();
        let mut scene = MatchScene::with_timing(
            MatchMode::PlayerVsPlayer,
            test_net(),
            shared_input(),
            tx,
            7,
            Duration::from_millis(5),
        );
        let shared = scene.shared();
        assert!(!shared.active.is_open());

        // Setup: board, two paddles, countdown - no ball pixel at center
        let mut frame = Frame::board();
        scene.render(&mut frame);
        assert_ne!(frame.get(480, 270), Some(COLOR_BALL));

        wait_active(&shared);
        scene.tick();

        {
            let state = shared.state.lock().unwrap();
            assert_eq!(state.phase, MatchPhase::Active);
            assert_eq!(state.countdown_left, 0);
        }

        // Active: the ball entity draws at the board center
        frame.clear();
        scene.render(&mut frame);
        let pos = shared.state.lock().unwrap().ball.pos;
        assert_eq!(frame.get(pos.x as i32, pos.y as i32), Some(COLOR_BALL));
    }

    #[test]
    fn ball_holds_still_through_the_countdown() {
        let (tx, _rx) = channel();
        let mut scene = MatchScene::with_timing(
            MatchMode::PlayerVsPlayer,
            test_net(),
            shared_input(),
            tx,
            7,
            Duration::from_secs(60),
        );
        let start = scene.shared().state.lock().unwrap().ball.pos;
        for _ in 0..5 {
            scene.tick();
        }
        let shared = scene.shared();
        let state = shared.state.lock().unwrap();
        assert_eq!(state.ball.pos, start);
        assert_eq!(state.phase, MatchPhase::Countdown);
    }

    #[test]
    fn human_keys_drive_the_paddle() {
        let (tx, _rx) = channel();
        let input = shared_input();
        let mut scene = MatchScene::with_timing(
            MatchMode::PlayerVsPlayer,
            test_net(),
            input.clone(),
            tx,
            7,
            Duration::from_secs(60),
        );

        input
            .lock()
            .unwrap()
            .dispatch(crate::engine::KeyInput::press(Key::W));
        scene.tick();
        {
            let shared = scene.shared();
            let state = shared.state.lock().unwrap();
            assert_eq!(state.paddle(Side::Left).velocity_y, -PADDLE_SPEED);
        }

        input
            .lock()
            .unwrap()
            .dispatch(crate::engine::KeyInput::release(Key::W));
        {
            let shared = scene.shared();
            let state = shared.state.lock().unwrap();
            assert_eq!(state.paddle(Side::Left).velocity_y, 0.0);
        }
    }

    #[test]
    fn dropping_the_scene_releases_key_subscriptions() {
        let (tx, _rx) = channel();
        let input = shared_input();
        let scene = MatchScene::with_timing(
            MatchMode::PlayerVsPlayer,
            test_net(),
            input.clone(),
            tx,
            7,
            Duration::from_secs(60),
        );
        let shared = scene.shared();
        drop(scene);

        // Handlers are gone: dispatch must not touch the paddle
        input
            .lock()
            .unwrap()
            .dispatch(crate::engine::KeyInput::press(Key::W));
        let state = shared.state.lock().unwrap();
        assert_eq!(state.paddle(Side::Left).velocity_y, 0.0);
    }

    #[test]
    fn teardown_mid_countdown_joins_cleanly() {
        let (tx, _rx) = channel();
        let scene = MatchScene::with_timing(
            MatchMode::TrainAi,
            test_net(),
            shared_input(),
            tx,
            7,
            Duration::from_secs(60),
        );
        let start = Instant::now();
        drop(scene);
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "threads must join promptly"
        );
    }
}
