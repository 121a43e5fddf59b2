//! Fixed timestep accumulation.
//!
//! The driver produces frames at its own rate; the simulation always advances
//! in equal fixed steps so runs with the same seed replay identically.

/// Maximum fixed updates per frame before the backlog is dropped.
const MAX_UPDATES_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Fixed timestep delta
    fixed_dt: f32,
    /// Unconsumed frame time
    accumulator: f32,
    /// Total fixed updates handed out
    steps: u64,
}

impl FixedStep {
    /// Creates an accumulator running at `hz` updates per second.
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self {
            fixed_dt: 1.0 / hz.max(1) as f32,
            accumulator: 0.0,
            steps: 0,
        }
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub const fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Total fixed updates handed out so far.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Accumulate frame time for fixed timestep updates.
    /// Returns the number of fixed updates that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_UPDATES_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        self.steps += u64::from(count);
        count
    }
}
