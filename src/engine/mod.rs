//! Entity/scene plumbing and the fixed-rate game loop
//!
//! Scenes implement [`Scene`] and are driven once per frame. Platform
//! presentation sits behind [`Backend`], so the loop runs the same against a
//! real window frontend or a headless sink. Scene replacement goes through a
//! request channel: key handlers send a scene *factory* and the loop runs it
//! outside input dispatch, which keeps subscription re-entrancy impossible.

pub mod entities;
pub mod input;
pub mod sync;

use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use crate::consts::TICK_HZ;
use crate::raster::Frame;

pub use entities::{EntityId, RenderSet, Renderable, SharedRenderSet};
pub use input::{HandlerId, InputMap, Key, KeyInput, SharedInput, shared_input};
pub use sync::Gate;

/// A renderable, tickable game scene
pub trait Scene: Send {
    /// Advance scene state by one frame
    fn tick(&mut self);
    /// Draw the scene into the frame
    fn render(&mut self, frame: &mut Frame);
}

/// Deferred scene construction, run by the loop after input dispatch
pub type SceneFactory = Box<dyn FnOnce() -> Box<dyn Scene> + Send>;

/// Requests scenes can send to the running loop
pub enum EngineRequest {
    ReplaceScene(SceneFactory),
    Close,
}

/// Platform seam: event source and frame sink
pub trait Backend {
    /// Key events since the last frame
    fn poll_events(&mut self) -> Vec<KeyInput>;
    /// Show the frame; returning false closes the window and ends the loop
    fn present(&mut self, frame: &mut Frame) -> bool;
    /// Whether the loop should sleep out the fixed tick budget
    fn paced(&self) -> bool {
        true
    }
}

/// Owns the input registry and the scene-request channel
pub struct Engine {
    pub input: SharedInput,
    tx: Sender<EngineRequest>,
    rx: Receiver<EngineRequest>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            input: shared_input(),
            tx,
            rx,
        }
    }

    /// Sender handle for scenes to request replacement or shutdown
    pub fn requests(&self) -> Sender<EngineRequest> {
        self.tx.clone()
    }

    /// Run the fixed-rate loop until the backend closes or a scene requests it
    pub fn run(self, backend: &mut dyn Backend, first: Box<dyn Scene>) {
        let mut scene = first;
        let mut frame = Frame::board();
        let budget = Duration::from_micros(1_000_000 / TICK_HZ as u64);

        loop {
            let frame_start = Instant::now();

            for event in backend.poll_events() {
                if let Ok(mut input) = self.input.lock() {
                    input.dispatch(event);
                }
            }

            while let Ok(request) = self.rx.try_recv() {
                match request {
                    EngineRequest::ReplaceScene(factory) => scene = factory(),
                    EngineRequest::Close => return,
                }
            }

            scene.tick();
            frame.clear();
            scene.render(&mut frame);
            if !backend.present(&mut frame) {
                return;
            }

            if backend.paced() {
                std::thread::sleep(budget.saturating_sub(frame_start.elapsed()));
            }
        }
    }
}
