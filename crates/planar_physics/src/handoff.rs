//! Physics/render hand-off barrier
//!
//! When physics and rendering run on separate threads they meet once per
//! frame. The physics thread may only step after the renderer has finished
//! with the previous frame, and the renderer may only read body state after
//! a step has been published. Both sides block on a single condition
//! variable; no per-body locking is involved.

use parking_lot::{Condvar, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Renderer is done; physics may start a step
    Idle,
    Stepping,
    /// A step was published and awaits the renderer
    Ready,
    Rendering,
}

struct HandoffState {
    phase: Phase,
    frame: u64,
    closed: bool,
}

/// Two-phase handshake between one physics thread and one render thread
pub struct FrameHandoff {
    state: Mutex<HandoffState>,
    cvar: Condvar,
}

impl Default for FrameHandoff {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHandoff {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HandoffState {
                phase: Phase::Idle,
                frame: 0,
                closed: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Block until the renderer has released the previous frame
    ///
    /// Returns `false` if the hand-off was closed; the caller must not step.
    pub fn begin_step(&self) -> bool {
        let mut state = self.state.lock();
        while state.phase != Phase::Idle && !state.closed {
            self.cvar.wait(&mut state);
        }
        if state.closed {
            return false;
        }
        state.phase = Phase::Stepping;
        true
    }

    /// Publish the finished step to the renderer
    pub fn finish_step(&self) {
        let mut state = self.state.lock();
        debug_assert_eq!(state.phase, Phase::Stepping, "finish_step without begin_step");
        state.phase = Phase::Ready;
        state.frame += 1;
        self.cvar.notify_all();
    }

    /// Block until a step has been published
    ///
    /// Returns the published frame number, or `None` once closed.
    pub fn begin_render(&self) -> Option<u64> {
        let mut state = self.state.lock();
        while state.phase != Phase::Ready && !state.closed {
            self.cvar.wait(&mut state);
        }
        if state.closed {
            return None;
        }
        state.phase = Phase::Rendering;
        Some(state.frame)
    }

    /// Hand the frame back to the physics thread
    pub fn finish_render(&self) {
        let mut state = self.state.lock();
        debug_assert_eq!(state.phase, Phase::Rendering, "finish_render without begin_render");
        state.phase = Phase::Idle;
        self.cvar.notify_all();
    }

    /// Wake both sides and make every further wait return immediately
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.cvar.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of steps published so far
    pub fn frame(&self) -> u64 {
        self.state.lock().frame
    }
}
