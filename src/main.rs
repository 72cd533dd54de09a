//! Neuro Pong entry point
//!
//! Presentation to a real OS window is frontend work; the shipped binary
//! drives the engine against a scripted headless backend instead: it walks
//! the menu to Train AI, lets the two automated paddles play and train
//! against each other for a while, then saves the predictor weights.

use std::collections::VecDeque;
use std::path::Path;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use neuropong::ai;
use neuropong::engine::{Backend, Engine, Key, KeyInput};
use neuropong::raster::Frame;
use neuropong::scene::MenuScene;

const WEIGHTS_PATH: &str = "neuropong-weights.bin";
const NET_CONFIG_PATH: &str = "neuropong-net.json";

/// Headless backend: replays a key script at fixed frame numbers and closes
/// after a frame budget.
struct ScriptedBackend {
    script: VecDeque<(u64, KeyInput)>,
    frame: u64,
    max_frames: u64,
}

impl ScriptedBackend {
    fn new(script: Vec<(u64, KeyInput)>, max_frames: u64) -> Self {
        Self {
            script: script.into(),
            frame: 0,
            max_frames,
        }
    }
}

impl Backend for ScriptedBackend {
    fn poll_events(&mut self) -> Vec<KeyInput> {
        let mut events = Vec::new();
        while let Some(&(frame, event)) = self.script.front() {
            if frame > self.frame {
                break;
            }
            self.script.pop_front();
            events.push(event);
        }
        events
    }

    fn present(&mut self, _frame: &mut Frame) -> bool {
        self.frame += 1;
        self.frame < self.max_frames
    }
}

fn main() {
    env_logger::init();
    log::info!("Neuro Pong starting...");

    let seed: u64 = rand::random();
    let mut rng = Pcg32::seed_from_u64(seed);
    let cfg = ai::load_config(Path::new(NET_CONFIG_PATH));
    let net = ai::share(ai::load_or_default(Path::new(WEIGHTS_PATH), cfg, &mut rng));

    let engine = Engine::new();
    let menu = MenuScene::new(net.clone(), engine.input.clone(), engine.requests());

    // Menu: move down once to Train AI, confirm, then let the match run for
    // half a minute of wall-clock training before closing.
    let mut backend = ScriptedBackend::new(
        vec![
            (5, KeyInput::press(Key::Down)),
            (6, KeyInput::release(Key::Down)),
            (10, KeyInput::press(Key::Enter)),
            (11, KeyInput::release(Key::Enter)),
        ],
        1_800,
    );
    engine.run(&mut backend, Box::new(menu));

    match net.lock() {
        Ok(net) => {
            if let Err(err) = ai::save(&net, Path::new(WEIGHTS_PATH)) {
                log::error!("failed to save predictor weights: {err}");
            } else {
                log::info!("predictor weights saved to {WEIGHTS_PATH}");
            }
        }
        Err(_) => log::error!("predictor lock poisoned; weights not saved"),
    }
}
