//! Main menu scene
//!
//! A vertical column of mode buttons driven by Up/Down/Enter. Confirming a
//! mode sends a scene factory to the engine; Exit and Escape request close.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::ai::SharedNetwork;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::engine::{
    EngineRequest, HandlerId, Key, RenderSet, Renderable, Scene, SharedInput, SharedRenderSet,
};
use crate::raster::{self, COLOR_BUTTON, COLOR_BUTTON_SELECTED, COLOR_WHITE, Frame};

use super::game::{MatchMode, MatchScene};

const ENTRIES: [(&str, Option<MatchMode>); 4] = [
    ("PLAYER VS AI", Some(MatchMode::PlayerVsAi)),
    ("TRAIN AI", Some(MatchMode::TrainAi)),
    ("PLAYER VS PLAYER", Some(MatchMode::PlayerVsPlayer)),
    ("EXIT", None),
];

const BUTTON_WIDTH: i32 = (BOARD_WIDTH / 1.5) as i32;
const BUTTON_HEIGHT: i32 = (BOARD_HEIGHT / 8.0) as i32;
const BUTTON_GAP: i32 = 8;

/// One selectable menu button
struct ButtonEntity {
    label: &'static str,
    index: usize,
    x: i32,
    y: i32,
    selected: Arc<AtomicUsize>,
}

impl Renderable for ButtonEntity {
    fn render(&self, frame: &mut Frame) {
        let color = if self.selected.load(Ordering::SeqCst) == self.index {
            COLOR_BUTTON_SELECTED
        } else {
            COLOR_BUTTON
        };
        raster::fill_rect(frame, self.x, self.y, BUTTON_WIDTH, BUTTON_HEIGHT, color);
        let scale = 3;
        raster::draw_text(
            frame,
            self.x + (BUTTON_WIDTH - raster::text_width(self.label, scale)) / 2,
            self.y + (BUTTON_HEIGHT - 5 * scale) / 2,
            self.label,
            scale,
            COLOR_WHITE,
        );
    }
}

pub struct MenuScene {
    selected: Arc<AtomicUsize>,
    render_set: SharedRenderSet,
    input: SharedInput,
    key_handles: Vec<HandlerId>,
}

impl MenuScene {
    pub fn new(net: SharedNetwork, input: SharedInput, requests: Sender<EngineRequest>) -> Self {
        let selected = Arc::new(AtomicUsize::new(0));

        // Centered button column
        let mut set = RenderSet::default();
        let total_height = ENTRIES.len() as i32 * (BUTTON_HEIGHT + BUTTON_GAP) - BUTTON_GAP;
        let x = (BOARD_WIDTH as i32 - BUTTON_WIDTH) / 2;
        let mut y = (BOARD_HEIGHT as i32 - total_height) / 2;
        for (index, &(label, _)) in ENTRIES.iter().enumerate() {
            set.register(Box::new(ButtonEntity {
                label,
                index,
                x,
                y,
                selected: selected.clone(),
            }));
            y += BUTTON_HEIGHT + BUTTON_GAP;
        }

        let mut scene = Self {
            selected,
            render_set: Arc::new(Mutex::new(set)),
            input: input.clone(),
            key_handles: Vec::new(),
        };
        scene.bind_keys(net, requests);
        scene
    }

    pub fn selected(&self) -> usize {
        self.selected.load(Ordering::SeqCst)
    }

    fn bind_keys(&mut self, net: SharedNetwork, requests: Sender<EngineRequest>) {
        let Ok(mut input) = self.input.lock() else {
            return;
        };

        {
            let selected = self.selected.clone();
            self.key_handles.push(input.subscribe(Key::Up, move |pressed| {
                if pressed {
                    let _ = selected.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |s| {
                        Some((s + ENTRIES.len() - 1) % ENTRIES.len())
                    });
                }
            }));
        }
        {
            let selected = self.selected.clone();
            self.key_handles.push(input.subscribe(Key::Down, move |pressed| {
                if pressed {
                    let _ = selected.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |s| {
                        Some((s + 1) % ENTRIES.len())
                    });
                }
            }));
        }
        {
            let selected = self.selected.clone();
            let shared_input = self.input.clone();
            let requests = requests.clone();
            self.key_handles.push(input.subscribe(Key::Enter, move |pressed| {
                if !pressed {
                    return;
                }
                let entry = ENTRIES[selected.load(Ordering::SeqCst)];
                let request = match entry.1 {
                    Some(mode) => {
                        log::info!("starting match: {mode:?}");
                        let net = net.clone();
                        let input = shared_input.clone();
                        let requests = requests.clone();
                        EngineRequest::ReplaceScene(Box::new(move || {
                            Box::new(MatchScene::new(mode, net, input, requests))
                        }))
                    }
                    None => EngineRequest::Close,
                };
                let _ = requests.send(request);
            }));
        }
        self.key_handles.push(input.subscribe(Key::Escape, move |pressed| {
            if pressed {
                let _ = requests.send(EngineRequest::Close);
            }
        }));
    }
}

impl Scene for MenuScene {
    fn tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame) {
        raster::draw_text(
            frame,
            (BOARD_WIDTH as i32 - raster::text_width("NEURO PONG", 6)) / 2,
            24,
            "NEURO PONG",
            6,
            COLOR_WHITE,
        );
        if let Ok(set) = self.render_set.lock() {
            set.render_all(frame);
        }
    }
}

impl Drop for MenuScene {
    fn drop(&mut self) {
        if let Ok(mut input) = self.input.lock() {
            for id in self.key_handles.drain(..) {
                input.unsubscribe(id);
            }
        }
    }
}
