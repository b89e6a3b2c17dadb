//! Strider Core - Core types for the Strider locomotion engine
//!
//! This crate provides the foundational types shared by the physics and
//! character crates:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for entity positioning
//! - Entity handles used as non-owning back-references
//! - The world-space coordinate convention

pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use types::{EntityId, Transform};

/// World-space up axis.
///
/// Strider uses a Y-up, right-handed coordinate system. Every piece of
/// physics math that cares about "up" or "down" (gravity, slope limits,
/// ceiling checks, jump impulses) goes through these two constants rather
/// than spelling out an axis literal.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// World-space down axis. Gravity acts along this direction.
pub const WORLD_DOWN: Vec3 = Vec3::NEG_Y;
