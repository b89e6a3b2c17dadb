//! The collision query interface consumed by the character controller.
//!
//! The controller never talks to a collision backend directly; it sweeps its
//! capsule through an opaque [`CollisionQuery`] service. The rapier-backed
//! [`crate::PhysicsWorld`] implements this trait for production use, and test
//! code can substitute analytic worlds.

use glam::Vec3;
use strider_core::EntityId;

/// Capsule collision shape: a vertical segment of half-length `half_height`
/// with hemispherical caps of `radius`.
///
/// The shape is immutable for the lifetime of a controller; positions passed
/// to [`CollisionQuery::sweep`] refer to the capsule center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleShape {
    /// Radius of the cylinder and end caps
    pub radius: f32,
    /// Half-height of the cylindrical segment (excluding the caps)
    pub half_height: f32,
}

impl CapsuleShape {
    /// Create a new capsule shape
    pub fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
        }
    }

    /// Distance from the capsule center to its lowest (or highest) point
    pub fn half_extent(&self) -> f32 {
        self.half_height + self.radius
    }

    /// Full height of the capsule, caps included
    pub fn total_height(&self) -> f32 {
        2.0 * self.half_extent()
    }
}

impl Default for CapsuleShape {
    fn default() -> Self {
        Self {
            radius: 0.4,
            half_height: 0.5,
        }
    }
}

/// First contact found by a capsule sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepHit {
    /// Fraction of the swept displacement traveled before first contact,
    /// in `[0, 1]`. Zero means the capsule starts in contact.
    pub toi: f32,
    /// World-space surface normal of the hit geometry, pointing away from
    /// the surface (a floor reports a normal aligned with world up).
    pub normal: Vec3,
    /// The entity that was hit. A non-owning handle, used by the controller
    /// to read platform positions for adhesion.
    pub entity: EntityId,
}

/// Synchronous capsule-vs-world query service.
///
/// Implementations must be consistent within a tick: the controller issues
/// several sweeps per update (movement passes, step probes, ground probe)
/// and assumes the world does not change between them.
pub trait CollisionQuery {
    /// Sweep `capsule` (centered at `position`) along `displacement` and
    /// return the first contact, or `None` if the full displacement is free.
    ///
    /// `exclude` removes one entity from consideration, normally the
    /// sweeping character's own collider.
    fn sweep(
        &self,
        capsule: &CapsuleShape,
        position: Vec3,
        displacement: Vec3,
        exclude: Option<EntityId>,
    ) -> Option<SweepHit>;

    /// Current world-space position of an entity, if it exists.
    ///
    /// Read-only: the controller uses this to compute platform movement
    /// deltas, never to move the platform.
    fn entity_position(&self, entity: EntityId) -> Option<Vec3>;
}
