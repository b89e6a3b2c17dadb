//! Movement states and listener notifications

use serde::{Deserialize, Serialize};

/// Derived movement state.
///
/// Computed from the grounded flag and velocity after each tick; never set
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    /// Grounded with negligible horizontal speed
    Idle,
    /// Grounded and moving
    Walking,
    /// Airborne with upward velocity
    Jumping,
    /// Airborne with downward velocity
    Falling,
}

/// Sink for controller notifications, for animation/audio/UI hookup.
///
/// All methods default to no-ops so listeners only implement what they need.
pub trait CharacterListener {
    /// The derived movement state changed
    fn on_state_changed(&mut self, _state: MovementState) {}

    /// A jump was successfully initiated
    fn on_jump(&mut self) {}

    /// The character transitioned from airborne to grounded
    fn on_land(&mut self) {}
}

/// The null listener: discard all notifications.
impl CharacterListener for () {}
