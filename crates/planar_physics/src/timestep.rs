//! Fixed-timestep accumulator
//!
//! Frame time is accumulated and drained in whole physics steps so the
//! simulation runs at a fixed rate independent of the frame rate.

/// Longest frame accepted, in seconds; longer frames are clamped
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Accumulates variable frame time into fixed steps
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create an accumulator draining `step` seconds at a time
    ///
    /// At most `max_substeps` steps run per frame (at least 1).
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            total_steps: 0,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Change the step length, keeping accumulated time
    pub fn set_step(&mut self, step: f32) {
        self.step = step.max(f32::EPSILON);
    }

    #[inline]
    pub fn max_substeps(&self) -> u32 {
        self.max_substeps
    }

    pub fn set_max_substeps(&mut self, max_substeps: u32) {
        self.max_substeps = max_substeps.max(1);
    }

    /// Time carried over to the next frame
    #[inline]
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Steps taken since creation
    #[inline]
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Add a frame's elapsed time and return how many steps to run
    ///
    /// The frame time is clamped to [0, MAX_FRAME_TIME]. When more steps are
    /// due than `max_substeps`, the excess time is discarded so a slow frame
    /// cannot snowball into ever longer ones.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        let frame_time = if frame_time.is_finite() {
            frame_time.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_substeps && self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.4}s of simulation time after {} substeps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Fraction of a step left in the accumulator, in [0, 1]
    ///
    /// Used to interpolate rendered state between the last two steps.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
