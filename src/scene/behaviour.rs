//! Gameplay behaviours that react to contact notifications

use std::sync::Arc;

use parking_lot::Mutex;
use planar_physics::{BodyKey, ContactListener};

/// Logs every notification, naming the entity it is attached to
pub struct LoggingBehaviour {
    name: String,
}

impl LoggingBehaviour {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ContactListener for LoggingBehaviour {
    fn on_collision_enter(&mut self, other: BodyKey) {
        log::info!("{}: collision enter with {:?}", self.name, other);
    }

    fn on_collision_stay(&mut self, other: BodyKey) {
        log::trace!("{}: collision stay with {:?}", self.name, other);
    }

    fn on_collision_exit(&mut self, other: BodyKey) {
        log::info!("{}: collision exit with {:?}", self.name, other);
    }

    fn on_trigger_enter(&mut self, other: BodyKey) {
        log::info!("{}: trigger enter by {:?}", self.name, other);
    }

    fn on_trigger_stay(&mut self, other: BodyKey) {
        log::trace!("{}: trigger stay by {:?}", self.name, other);
    }

    fn on_trigger_exit(&mut self, other: BodyKey) {
        log::info!("{}: trigger exit by {:?}", self.name, other);
    }
}

/// Notification totals gathered by a [`ContactCounter`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactCounts {
    pub collision_enter: usize,
    pub collision_stay: usize,
    pub collision_exit: usize,
    pub trigger_enter: usize,
    pub trigger_stay: usize,
    pub trigger_exit: usize,
}

/// Counts notifications into totals shared with the code that attached it
///
/// Clones share the same totals, so keep one clone and attach the other.
#[derive(Clone, Default)]
pub struct ContactCounter {
    counts: Arc<Mutex<ContactCounts>>,
}

impl ContactCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> ContactCounts {
        *self.counts.lock()
    }
}

impl ContactListener for ContactCounter {
    fn on_collision_enter(&mut self, _other: BodyKey) {
        self.counts.lock().collision_enter += 1;
    }

    fn on_collision_stay(&mut self, _other: BodyKey) {
        self.counts.lock().collision_stay += 1;
    }

    fn on_collision_exit(&mut self, _other: BodyKey) {
        self.counts.lock().collision_exit += 1;
    }

    fn on_trigger_enter(&mut self, _other: BodyKey) {
        self.counts.lock().trigger_enter += 1;
    }

    fn on_trigger_stay(&mut self, _other: BodyKey) {
        self.counts.lock().trigger_stay += 1;
    }

    fn on_trigger_exit(&mut self, _other: BodyKey) {
        self.counts.lock().trigger_exit += 1;
    }
}
