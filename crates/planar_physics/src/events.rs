//! Collision and trigger notifications
//!
//! Each step the world compares the set of touching pairs against the set
//! from the previous step. New pairs produce `Enter`, persisting pairs
//! `Stay`, and vanished pairs `Exit`. Pairs involving a trigger shape report
//! the trigger variants instead of the collision ones.

use std::collections::BTreeMap;

use crate::body::BodyKey;
use crate::contact::ContactPair;

/// Where a pair is in its contact lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

/// One notification produced by a physics step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub pair: ContactPair,
    /// At least one of the shapes is a trigger
    pub is_trigger: bool,
}

impl ContactEvent {
    /// Deliver this event to `listener`, which belongs to body `this`
    ///
    /// Does nothing if `this` is not part of the pair.
    pub fn dispatch(&self, this: BodyKey, listener: &mut dyn ContactListener) {
        let Some(other) = self.pair.other(this) else {
            return;
        };
        match (self.phase, self.is_trigger) {
            (ContactPhase::Enter, false) => listener.on_collision_enter(other),
            (ContactPhase::Stay, false) => listener.on_collision_stay(other),
            (ContactPhase::Exit, false) => listener.on_collision_exit(other),
            (ContactPhase::Enter, true) => listener.on_trigger_enter(other),
            (ContactPhase::Stay, true) => listener.on_trigger_stay(other),
            (ContactPhase::Exit, true) => listener.on_trigger_exit(other),
        }
    }
}

/// Receiver for contact notifications attached to a single body
///
/// Every method receives the key of the *other* body in the pair. All
/// methods default to doing nothing, so implementors override only what
/// they care about.
pub trait ContactListener: Send {
    fn on_collision_enter(&mut self, _other: BodyKey) {}
    fn on_collision_stay(&mut self, _other: BodyKey) {}
    fn on_collision_exit(&mut self, _other: BodyKey) {}
    fn on_trigger_enter(&mut self, _other: BodyKey) {}
    fn on_trigger_stay(&mut self, _other: BodyKey) {}
    fn on_trigger_exit(&mut self, _other: BodyKey) {}
}

/// Remembers which pairs were touching at the end of the previous step
#[derive(Clone, Debug, Default)]
pub struct ContactTracker {
    previous: BTreeMap<ContactPair, bool>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff this step's touching pairs against the previous step
    ///
    /// `current` holds each touching pair once, with its trigger flag.
    /// Enter and Stay events follow the order of `current`; Exit events
    /// follow pair order. The current set then becomes the previous set.
    pub fn update(&mut self, current: &[(ContactPair, bool)]) -> Vec<ContactEvent> {
        let mut events = Vec::with_capacity(current.len());
        let mut next = BTreeMap::new();

        for &(pair, is_trigger) in current {
            let phase = if self.previous.contains_key(&pair) {
                ContactPhase::Stay
            } else {
                ContactPhase::Enter
            };
            events.push(ContactEvent {
                phase,
                pair,
                is_trigger,
            });
            next.insert(pair, is_trigger);
        }

        for (&pair, &is_trigger) in &self.previous {
            if !next.contains_key(&pair) {
                events.push(ContactEvent {
                    phase: ContactPhase::Exit,
                    pair,
                    is_trigger,
                });
            }
        }

        self.previous = next;
        events
    }

    /// Drop every remembered pair involving `key` without reporting Exit
    pub fn forget_body(&mut self, key: BodyKey) {
        self.previous.retain(|pair, _| !pair.contains(key));
    }

    /// Whether the pair was touching at the end of the last step
    pub fn is_touching(&self, pair: &ContactPair) -> bool {
        self.previous.contains_key(pair)
    }

    /// Number of pairs touching at the end of the last step
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}
