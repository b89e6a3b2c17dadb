//! Core types used throughout the Strider engine

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
///
/// This is a plain value handle, not an owning reference: systems that hold
/// an `EntityId` (for example the character controller's ground-entity
/// back-reference) can look the entity up each tick but never keep it alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The raw 128-bit value, used to stash the id in collider user data
    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    /// Rebuild an entity ID from its raw 128-bit value
    pub fn from_u128(bits: u128) -> Self {
        Self(Uuid::from_u128(bits))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform component representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new();
        assert_eq!(EntityId::from_u128(id.as_u128()), id);
    }

    #[test]
    fn test_transform_translate() {
        let mut transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        transform.translate(Vec3::new(0.5, 0.0, -1.0));
        assert_eq!(transform.position, Vec3::new(1.5, 2.0, 2.0));
    }
}
