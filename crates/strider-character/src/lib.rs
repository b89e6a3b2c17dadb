//! Kinematic character movement for the Strider engine
//!
//! A capsule character controller that moves through collision geometry by
//! sweeping rather than simulating: sweep-and-slide resolution in separate
//! vertical and horizontal passes, step-up over low risers, grounded
//! detection with slope limits, moving-platform adhesion, and jump assists
//! (coyote time, jump buffering). Collision queries go through the
//! [`CollisionQuery`](strider_physics::CollisionQuery) trait, so the
//! controller runs against the rapier-backed
//! [`PhysicsWorld`](strider_physics::PhysicsWorld) in production and against
//! analytic worlds in tests.

pub mod config;
pub mod controller;
pub mod events;
pub mod intent;
mod slide;

pub use config::{CharacterConfig, MovementModel};
pub use strider_physics::CapsuleShape;
pub use controller::{CharacterController, CharacterError};
pub use events::{CharacterListener, MovementState};
pub use intent::{FrameIntent, MovementIntent};
