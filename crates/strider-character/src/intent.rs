//! Movement intent channel
//!
//! Accumulates per-frame directional input and jump requests from any
//! producer (keyboard, AI, network). The controller consumes and clears the
//! accumulated intent exactly once per tick.

use glam::Vec3;

/// Accumulated input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameIntent {
    /// Sum of all movement input added this frame, unnormalized
    pub direction: Vec3,
    /// Whether a jump was requested this frame
    pub jump: bool,
}

/// Per-frame intent accumulator.
///
/// Purely additive: multiple producers may write during a frame, and the sum
/// is what the controller sees. No normalization happens at write time.
#[derive(Debug, Clone, Default)]
pub struct MovementIntent {
    direction: Vec3,
    jump: bool,
}

impl MovementIntent {
    /// Create an empty intent accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a movement direction of arbitrary magnitude
    pub fn add_movement_input(&mut self, direction: Vec3) {
        self.direction += direction;
    }

    /// Record a jump request for this frame
    pub fn jump(&mut self) {
        self.jump = true;
    }

    /// Consume the accumulated intent, resetting the accumulator
    pub fn take(&mut self) -> FrameIntent {
        let frame = FrameIntent {
            direction: self.direction,
            jump: self.jump,
        };
        self.direction = Vec3::ZERO;
        self.jump = false;
        frame
    }
}
