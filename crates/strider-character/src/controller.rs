//! Kinematic capsule character controller
//!
//! Owns the character's transform and velocity and advances them each fixed
//! tick: input shaping, gravity, the two slide passes, step-up, grounded
//! probing, platform adhesion, and jump assists (coyote time and jump
//! buffering). Collision is delegated to a [`CollisionQuery`] service so the
//! controller itself stays deterministic and backend-agnostic.

use glam::Vec3;
use strider_core::{EntityId, Transform, WORLD_DOWN, WORLD_UP};
use strider_physics::{CapsuleShape, CollisionQuery, PhysicsWorld};

use crate::config::{CharacterConfig, MovementModel};
use crate::events::{CharacterListener, MovementState};
use crate::intent::MovementIntent;
use crate::slide::{slide_pass, sweep_checked, try_step_up, SlidePass};

/// Character controller errors.
#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    /// The controller was ticked before being given a collider identity
    #[error("character has not been spawned into a collision world")]
    NotSpawned,
}

/// Kinematic capsule character controller.
///
/// The controller moves a capsule through collision geometry without being
/// part of the dynamics simulation: it sweeps, slides, and writes its own
/// transform. Create one, [`spawn`](Self::spawn) it into a world, feed it
/// intent, and call [`fixed_update`](Self::fixed_update) at a fixed rate.
pub struct CharacterController {
    config: CharacterConfig,
    capsule: CapsuleShape,
    transform: Transform,
    velocity: Vec3,
    intent: MovementIntent,
    entity: Option<EntityId>,
    grounded: bool,
    ground_entity: Option<EntityId>,
    last_ground_position: Vec3,
    coyote_remaining: f32,
    buffer_remaining: f32,
    state: MovementState,
}

impl CharacterController {
    /// Create a controller with default configuration and capsule
    pub fn new() -> Self {
        Self::with_config(CharacterConfig::default(), CapsuleShape::default())
    }

    /// Create a controller with explicit configuration and capsule dimensions
    pub fn with_config(config: CharacterConfig, capsule: CapsuleShape) -> Self {
        Self {
            config,
            capsule,
            transform: Transform::default(),
            velocity: Vec3::ZERO,
            intent: MovementIntent::new(),
            entity: None,
            grounded: false,
            ground_entity: None,
            last_ground_position: Vec3::ZERO,
            coyote_remaining: 0.0,
            buffer_remaining: 0.0,
            state: MovementState::Falling,
        }
    }

    /// Register the character's capsule in a physics world and take on the
    /// resulting entity identity
    pub fn spawn(&mut self, world: &mut PhysicsWorld, position: Vec3) -> EntityId {
        let entity = world.register_capsule(&self.capsule, position);
        self.place(position, entity);
        entity
    }

    /// Adopt an externally managed entity identity at a position.
    ///
    /// Use this when the collider is registered by other systems; the
    /// identity is only needed so sweeps can exclude the character's own
    /// capsule.
    pub fn place(&mut self, position: Vec3, entity: EntityId) {
        self.entity = Some(entity);
        self.teleport(position);
    }

    /// Move instantly to a position, discarding all motion state
    pub fn teleport(&mut self, position: Vec3) {
        self.transform.position = position;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.ground_entity = None;
        self.coyote_remaining = 0.0;
        self.buffer_remaining = 0.0;
        tracing::debug!(?position, "character teleported");
    }

    /// Accumulate a movement direction for the next tick
    pub fn add_movement_input(&mut self, direction: Vec3) {
        self.intent.add_movement_input(direction);
    }

    /// Request a jump on the next tick
    pub fn jump(&mut self) {
        self.intent.jump();
    }

    /// Whether the character stood on walkable ground after the last tick
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The movement state derived after the last tick
    pub fn current_state(&self) -> MovementState {
        self.state
    }

    /// Capsule center position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// The entity identity assigned at spawn, if any
    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// Controller configuration
    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    /// Advance one fixed tick and write the resulting position back into the
    /// physics world's collider
    pub fn fixed_update(
        &mut self,
        world: &mut PhysicsWorld,
        listener: &mut dyn CharacterListener,
        dt: f32,
    ) -> Result<(), CharacterError> {
        self.update(&*world, listener, dt)?;
        if let Some(entity) = self.entity {
            world.set_entity_position(entity, self.transform.position);
        }
        Ok(())
    }

    /// Advance one fixed tick against any collision query service.
    ///
    /// Deterministic for a given (state, intent, world, dt). `dt` is clamped
    /// to the configured maximum so a hitch cannot tunnel the capsule.
    pub fn update<C: CollisionQuery>(
        &mut self,
        world: &C,
        listener: &mut dyn CharacterListener,
        dt: f32,
    ) -> Result<(), CharacterError> {
        let Some(entity) = self.entity else {
            return Err(CharacterError::NotSpawned);
        };
        let exclude = Some(entity);
        let dt = dt.min(self.config.max_delta_time);
        if dt <= 0.0 {
            return Ok(());
        }

        let frame = self.intent.take();

        // Assist timers count down in real time.
        self.buffer_remaining = (self.buffer_remaining - dt).max(0.0);
        if !self.grounded {
            self.coyote_remaining = (self.coyote_remaining - dt).max(0.0);
        }

        // Ride the platform: apply its displacement since the last tick
        // before any motion of our own.
        if self.grounded {
            if let Some(ground) = self.ground_entity {
                if let Some(current) = world.entity_position(ground) {
                    self.transform.position += current - self.last_ground_position;
                    self.last_ground_position = current;
                }
            }
        }

        if frame.jump && !self.try_jump(world, exclude, listener) {
            if self.config.jump_buffer_enabled() {
                self.buffer_remaining = self.config.jump_buffer;
            }
        }

        self.shape_velocity(frame.direction, dt);
        self.velocity += WORLD_DOWN * self.config.gravity * dt;

        // Vertical pass.
        let vertical = WORLD_UP * self.velocity.dot(WORLD_UP) * dt;
        slide_pass(
            world,
            &self.config,
            &self.capsule,
            exclude,
            &mut self.transform.position,
            &mut self.velocity,
            vertical,
            SlidePass::Vertical,
        );

        // Horizontal pass, with a step-up attempt when a grounded move is
        // obstructed.
        let horizontal = self.velocity - WORLD_UP * self.velocity.dot(WORLD_UP);
        let displacement = horizontal * dt;
        if displacement.length_squared() >= self.config.sweep_epsilon {
            let blocked = sweep_checked(
                world,
                &self.capsule,
                self.transform.position,
                displacement,
                exclude,
            );
            let stepped = match blocked {
                Some(ref hit) if self.grounded && self.config.enable_step_up => {
                    let length = displacement.length();
                    let baseline = (hit.toi - self.config.skin_width / length).max(0.0) * length;
                    try_step_up(
                        world,
                        &self.config,
                        &self.capsule,
                        exclude,
                        &mut self.transform.position,
                        displacement,
                        baseline,
                    )
                }
                _ => false,
            };
            if !stepped {
                slide_pass(
                    world,
                    &self.config,
                    &self.capsule,
                    exclude,
                    &mut self.transform.position,
                    &mut self.velocity,
                    displacement,
                    SlidePass::Horizontal,
                );
            }
        }

        let was_grounded = self.grounded;
        self.probe_ground(world, exclude);

        if self.grounded {
            self.coyote_remaining = self.config.coyote_time;
            if !was_grounded {
                listener.on_land();
                // A jump pressed just before landing fires now.
                if self.buffer_remaining > 0.0 {
                    self.try_jump(world, exclude, listener);
                }
            }
        }

        let state = self.derive_state();
        if state != self.state {
            self.state = state;
            listener.on_state_changed(state);
        }

        Ok(())
    }

    /// Shape horizontal velocity from directional intent. The vertical
    /// component is never touched here.
    fn shape_velocity(&mut self, direction: Vec3, dt: f32) {
        let wish = (direction - WORLD_UP * direction.dot(WORLD_UP)).normalize_or_zero();
        let has_input = wish != Vec3::ZERO;
        let vertical = WORLD_UP * self.velocity.dot(WORLD_UP);
        let horizontal = self.velocity - vertical;

        let shaped = match self.config.movement_model {
            MovementModel::Direct => wish * self.config.move_speed,
            MovementModel::Accelerated => {
                let target = wish * self.config.move_speed;
                let rate = self.config.blend_rate(self.grounded, has_input);
                let t = (rate * dt).min(1.0);
                horizontal + (target - horizontal) * t
            }
        };

        self.velocity = shaped + vertical;
    }

    /// Attempt to start a jump. Succeeds while grounded or within the coyote
    /// window, provided headroom is clear.
    fn try_jump<C: CollisionQuery>(
        &mut self,
        world: &C,
        exclude: Option<EntityId>,
        listener: &mut dyn CharacterListener,
    ) -> bool {
        if !self.grounded && (!self.config.coyote_enabled() || self.coyote_remaining <= 0.0) {
            return false;
        }

        // Clearance probe: only a ceiling-facing contact vetoes the jump, a
        // grazing wall overhead does not.
        let probe = WORLD_UP * self.config.clearance_probe_distance;
        if let Some(hit) = sweep_checked(world, &self.capsule, self.transform.position, probe, exclude)
        {
            if hit.normal.dot(WORLD_DOWN) > self.config.ceiling_threshold {
                return false;
            }
        }

        let up_speed = self.velocity.dot(WORLD_UP);
        self.velocity += WORLD_UP * (self.config.jump_speed - up_speed);
        self.grounded = false;
        self.ground_entity = None;
        self.coyote_remaining = 0.0;
        self.buffer_remaining = 0.0;
        listener.on_jump();
        tracing::debug!("jump initiated");
        true
    }

    /// Fixed-length downward probe for walkable ground.
    ///
    /// Ignores contacts while rising faster than the configured threshold so
    /// a fresh jump is not immediately re-grounded, and records the ground
    /// entity so moving platforms can be followed.
    fn probe_ground<C: CollisionQuery>(&mut self, world: &C, exclude: Option<EntityId>) {
        if self.velocity.dot(WORLD_UP) > self.config.max_grounded_up_speed {
            self.grounded = false;
            self.ground_entity = None;
            return;
        }

        let probe = WORLD_DOWN * self.config.ground_probe_distance;
        let hit = sweep_checked(world, &self.capsule, self.transform.position, probe, exclude);
        match hit {
            Some(hit) if hit.normal.dot(WORLD_UP) > self.config.slope_limit_cos => {
                self.grounded = true;
                // Any residual upward drift is noise once standing.
                let up_speed = self.velocity.dot(WORLD_UP);
                if up_speed > 0.0 {
                    self.velocity -= WORLD_UP * up_speed;
                }
                if self.ground_entity != Some(hit.entity) {
                    // New ground: seed the platform reference, no delta yet.
                    self.ground_entity = Some(hit.entity);
                    self.last_ground_position =
                        world.entity_position(hit.entity).unwrap_or(Vec3::ZERO);
                }
            }
            _ => {
                self.grounded = false;
                self.ground_entity = None;
            }
        }
    }

    /// Derive the movement state from grounded flag and velocity
    fn derive_state(&self) -> MovementState {
        if self.grounded {
            let horizontal = self.velocity - WORLD_UP * self.velocity.dot(WORLD_UP);
            if horizontal.length_squared() > self.config.walk_threshold {
                MovementState::Walking
            } else {
                MovementState::Idle
            }
        } else if self.velocity.dot(WORLD_UP) > 0.0 {
            MovementState::Jumping
        } else {
            MovementState::Falling
        }
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_physics::SweepHit;

    /// Empty world: every sweep misses.
    struct EmptyWorld;

    impl CollisionQuery for EmptyWorld {
        fn sweep(
            &self,
            _capsule: &CapsuleShape,
            _position: Vec3,
            _displacement: Vec3,
            _exclude: Option<EntityId>,
        ) -> Option<SweepHit> {
            None
        }

        fn entity_position(&self, _entity: EntityId) -> Option<Vec3> {
            None
        }
    }

    #[test]
    fn test_update_requires_spawn() {
        let mut controller = CharacterController::new();
        let result = controller.update(&EmptyWorld, &mut (), 1.0 / 60.0);
        assert!(matches!(result, Err(CharacterError::NotSpawned)));
    }

    #[test]
    fn test_gravity_accumulates_in_free_fall() {
        let mut controller = CharacterController::new();
        controller.place(Vec3::new(0.0, 10.0, 0.0), EntityId::new());

        let dt = 1.0 / 60.0;
        controller.update(&EmptyWorld, &mut (), dt).unwrap();
        let after_one = controller.velocity().y;
        controller.update(&EmptyWorld, &mut (), dt).unwrap();

        assert!(after_one < 0.0);
        assert!(controller.velocity().y < after_one);
        assert!(controller.position().y < 10.0);
        assert_eq!(controller.current_state(), MovementState::Falling);
    }

    #[test]
    fn test_delta_time_clamp() {
        let mut a = CharacterController::new();
        a.place(Vec3::ZERO, EntityId::new());
        let mut b = CharacterController::new();
        b.place(Vec3::ZERO, EntityId::new());

        a.update(&EmptyWorld, &mut (), a.config().max_delta_time)
            .unwrap();
        b.update(&EmptyWorld, &mut (), 10.0).unwrap();

        assert_eq!(a.position(), b.position());
        assert_eq!(a.velocity(), b.velocity());
    }

    #[test]
    fn test_direct_model_sets_horizontal_velocity() {
        let mut config = CharacterConfig::default();
        config.movement_model = MovementModel::Direct;
        config.gravity = 0.0;
        let mut controller = CharacterController::with_config(config, CapsuleShape::default());
        controller.place(Vec3::ZERO, EntityId::new());

        controller.add_movement_input(Vec3::new(2.0, 0.0, 0.0));
        controller.update(&EmptyWorld, &mut (), 1.0 / 60.0).unwrap();

        let speed = controller.config().move_speed;
        assert!((controller.velocity().x - speed).abs() < 1e-5);
        assert_eq!(controller.velocity().z, 0.0);
    }

    #[test]
    fn test_vertical_input_is_ignored() {
        let mut config = CharacterConfig::default();
        config.movement_model = MovementModel::Direct;
        config.gravity = 0.0;
        let mut controller = CharacterController::with_config(config, CapsuleShape::default());
        controller.place(Vec3::ZERO, EntityId::new());

        controller.add_movement_input(Vec3::new(0.0, 5.0, 0.0));
        controller.update(&EmptyWorld, &mut (), 1.0 / 60.0).unwrap();

        assert_eq!(controller.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_airborne_jump_without_coyote_fails() {
        let mut controller = CharacterController::new();
        controller.place(Vec3::new(0.0, 50.0, 0.0), EntityId::new());

        struct JumpSpy(bool);
        impl CharacterListener for JumpSpy {
            fn on_jump(&mut self) {
                self.0 = true;
            }
        }

        let mut spy = JumpSpy(false);
        controller.jump();
        controller.update(&EmptyWorld, &mut spy, 1.0 / 60.0).unwrap();

        assert!(!spy.0);
        assert!(controller.velocity().y <= 0.0);
    }

    #[test]
    fn test_teleport_clears_motion_state() {
        let mut controller = CharacterController::new();
        controller.place(Vec3::ZERO, EntityId::new());
        controller
            .update(&EmptyWorld, &mut (), 1.0 / 60.0)
            .unwrap();
        assert!(controller.velocity() != Vec3::ZERO);

        controller.teleport(Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(controller.position(), Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(controller.velocity(), Vec3::ZERO);
        assert!(!controller.is_grounded());
    }
}
