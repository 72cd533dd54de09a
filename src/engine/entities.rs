//! Render-set registry
//!
//! Entities register by id and are drawn in registration order each frame.
//! The set lives behind a mutex because membership changes cross threads:
//! the countdown timer swaps entities in and out while the render loop
//! iterates the same set.

use std::sync::{Arc, Mutex};

use crate::raster::Frame;

/// Capability to be drawn into a frame
pub trait Renderable: Send {
    fn render(&self, frame: &mut Frame);
}

/// Identifies a registered entity for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(u32);

/// Ordered set of renderable entities
#[derive(Default)]
pub struct RenderSet {
    entities: Vec<(EntityId, Box<dyn Renderable>)>,
    next_id: u32,
}

/// Shared handle; scenes own one, worker threads mutate membership
pub type SharedRenderSet = Arc<Mutex<RenderSet>>;

impl RenderSet {
    pub fn register(&mut self, entity: Box<dyn Renderable>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push((id, entity));
        id
    }

    pub fn unregister(&mut self, id: EntityId) {
        self.entities.retain(|(eid, _)| *eid != id);
    }

    pub fn render_all(&self, frame: &mut Frame) {
        for (_, entity) in &self.entities {
            entity.render(frame);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
