//! Keyboard subscription and dispatch
//!
//! Scenes subscribe press/release callbacks by key code and unsubscribe by
//! handler id when they are torn down. Dispatch runs on the engine thread.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The key codes the game binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    Up,
    Down,
    Enter,
    Escape,
}

/// A single press or release
#[derive(Debug, Clone, Copy)]
pub struct KeyInput {
    pub key: Key,
    pub pressed: bool,
}

impl KeyInput {
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: Key) -> Self {
        Self { key, pressed: false }
    }
}

/// Identifies a subscription for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u32);

type Handler = Box<dyn FnMut(bool) + Send>;

/// Registry of key handlers
#[derive(Default)]
pub struct InputMap {
    handlers: HashMap<Key, Vec<(HandlerId, Handler)>>,
    next_id: u32,
}

/// Shared handle scenes keep for subscribing and unsubscribing
pub type SharedInput = Arc<Mutex<InputMap>>;

pub fn shared_input() -> SharedInput {
    Arc::new(Mutex::new(InputMap::default()))
}

impl InputMap {
    pub fn subscribe(&mut self, key: Key, handler: impl FnMut(bool) + Send + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(key).or_default().push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: HandlerId) {
        for list in self.handlers.values_mut() {
            list.retain(|(hid, _)| *hid != id);
        }
    }

    pub fn dispatch(&mut self, event: KeyInput) {
        if let Some(list) = self.handlers.get_mut(&event.key) {
            for (_, handler) in list.iter_mut() {
                handler(event.pressed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn subscribed_handler_sees_press_and_release() {
        let mut input = InputMap::default();
        let presses = Arc::new(AtomicU32::new(0));
        let releases = Arc::new(AtomicU32::new(0));
        {
            let presses = presses.clone();
            let releases = releases.clone();
            input.subscribe(Key::W, move |pressed| {
                if pressed {
                    presses.fetch_add(1, Ordering::SeqCst);
                } else {
                    releases.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        input.dispatch(KeyInput::press(Key::W));
        input.dispatch(KeyInput::release(Key::W));
        input.dispatch(KeyInput::press(Key::S));

        assert_eq!(presses.load(Ordering::SeqCst), 1);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut input = InputMap::default();
        let count = Arc::new(AtomicU32::new(0));
        let id = {
            let count = count.clone();
            input.subscribe(Key::Enter, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        input.dispatch(KeyInput::press(Key::Enter));
        input.unsubscribe(id);
        input.dispatch(KeyInput::press(Key::Enter));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multiple_handlers_per_key() {
        let mut input = InputMap::default();
        let count = Arc::new(AtomicU32::new(0));
        for _ in 0..3 {
            let count = count.clone();
            input.subscribe(Key::Down, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        input.dispatch(KeyInput::press(Key::Down));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
