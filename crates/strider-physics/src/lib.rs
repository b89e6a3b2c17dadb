//! Strider Physics - Collision world and swept-shape queries using rapier3d
//!
//! Provides the static/kinematic collision scene the character controller
//! moves through, and implements the [`CollisionQuery`] service on top of
//! rapier's shape casting.

mod query;

pub use query::{CapsuleShape, CollisionQuery, SweepHit};

use std::collections::HashMap;

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;
use strider_core::EntityId;

/// The collision world: a set of colliders addressable by [`EntityId`],
/// plus the query pipeline used for capsule sweeps.
///
/// Bodies here are static or kinematic; nothing is integrated. Platforms are
/// plain colliders repositioned through [`PhysicsWorld::set_entity_position`].
pub struct PhysicsWorld {
    /// Rigid body storage (required by the query pipeline; stays empty for
    /// purely collider-based scenes)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Query pipeline for shape casts
    query_pipeline: QueryPipeline,
    /// Entity id to collider lookup
    entities: HashMap<EntityId, ColliderHandle>,
}

impl PhysicsWorld {
    /// Create a new empty collision world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            entities: HashMap::new(),
        }
    }

    /// Insert a collider under a fresh entity id and refresh the queries
    fn add_entity_collider(&mut self, mut collider: Collider) -> EntityId {
        let entity = EntityId::new();
        collider.user_data = entity.as_u128();
        let handle = self.collider_set.insert(collider);
        self.entities.insert(entity, handle);
        self.query_pipeline.update(&self.collider_set);
        entity
    }

    /// Create an infinite ground plane at the given height
    pub fn create_ground(&mut self, y: f32) -> EntityId {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_entity_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> EntityId {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_entity_collider(collider)
    }

    /// Create a kinematic platform collider.
    ///
    /// Same collider as a static box; platforms are animated by the host
    /// calling [`PhysicsWorld::set_entity_position`] between ticks, and the
    /// returned id is what grounded characters track for adhesion.
    pub fn create_platform(&mut self, half_extents: Vec3, position: Vec3) -> EntityId {
        self.create_static_box(half_extents, position)
    }

    /// Register a character capsule so other queries can see it.
    ///
    /// `position` is the capsule center. The collider is frictionless so the
    /// character slides cleanly along walls.
    pub fn register_capsule(&mut self, capsule: &CapsuleShape, position: Vec3) -> EntityId {
        let collider = ColliderBuilder::capsule_y(capsule.half_height, capsule.radius)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.add_entity_collider(collider)
    }

    /// Move an entity's collider to a new position (teleport semantics).
    ///
    /// Used both to sync the character capsule after a controller tick and
    /// to animate kinematic platforms.
    pub fn set_entity_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(&handle) = self.entities.get(&entity) {
            if let Some(collider) = self.collider_set.get_mut(handle) {
                collider.set_translation(vector![position.x, position.y, position.z]);
            }
            self.query_pipeline.update(&self.collider_set);
        }
    }

    /// Look up an entity's collider, if registered
    pub fn collider_handle(&self, entity: EntityId) -> Option<ColliderHandle> {
        self.entities.get(&entity).copied()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionQuery for PhysicsWorld {
    fn sweep(
        &self,
        capsule: &CapsuleShape,
        position: Vec3,
        displacement: Vec3,
        exclude: Option<EntityId>,
    ) -> Option<SweepHit> {
        if !displacement.is_finite() || displacement.length_squared() == 0.0 {
            return None;
        }

        let shape = Capsule::new_y(capsule.half_height, capsule.radius);
        let shape_pos = Isometry::translation(position.x, position.y, position.z);
        let shape_vel = vector![displacement.x, displacement.y, displacement.z];

        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude.and_then(|e| self.collider_handle(e)) {
            filter = filter.exclude_collider(handle);
        }

        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let (handle, hit) = self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape_vel,
            &shape,
            options,
            filter,
        )?;

        let collider = self.collider_set.get(handle)?;
        Some(SweepHit {
            toi: hit.time_of_impact,
            normal: Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z),
            entity: EntityId::from_u128(collider.user_data),
        })
    }

    fn entity_position(&self, entity: EntityId) -> Option<Vec3> {
        let handle = self.collider_handle(entity)?;
        let collider = self.collider_set.get(handle)?;
        let translation = collider.translation();
        Some(Vec3::new(translation.x, translation.y, translation.z))
    }
}
