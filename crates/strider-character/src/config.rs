//! Character controller configuration and tunables
//!
//! Every numeric tolerance the controller uses lives here so failure
//! sensitivity can be tuned per deployment instead of being baked into the
//! algorithm.

use serde::{Deserialize, Serialize};

/// How horizontal velocity responds to movement input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementModel {
    /// Horizontal velocity is set to `wish_dir * move_speed` every tick
    Direct,
    /// Horizontal velocity is exponentially blended toward the target using
    /// acceleration when input is present and friction when it is absent
    Accelerated,
}

/// Character controller configuration.
///
/// All values are read-only tunables; the controller never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterConfig {
    /// Maximum horizontal speed in meters per second
    pub move_speed: f32,
    /// Blend rate toward the target velocity while input is held (1/s)
    pub acceleration: f32,
    /// Blend rate toward zero while grounded with no input (1/s)
    pub ground_friction: f32,
    /// Blend rate toward zero while airborne with no input (1/s)
    pub air_friction: f32,
    /// Fraction of `acceleration` available while airborne
    pub air_control: f32,
    /// Gravity magnitude in m/s^2, applied along the world down axis
    pub gravity: f32,
    /// Vertical speed set by a successful jump
    pub jump_speed: f32,
    /// Collision margin kept between the capsule and geometry
    pub skin_width: f32,
    /// Iteration bound for each sweep-and-slide pass
    pub max_slide_iterations: u32,
    /// Tallest riser the step-up probe will climb
    pub step_height: f32,
    /// Extra distance swept downward when settling after a step
    pub step_margin: f32,
    /// Minimum normal-to-up cosine for a surface to count as walkable
    pub slope_limit_cos: f32,
    /// Grace period after leaving the ground where a jump still succeeds;
    /// zero disables coyote time
    pub coyote_time: f32,
    /// How long a jump request stays buffered while airborne; zero disables
    /// jump buffering
    pub jump_buffer: f32,
    /// Length of the downward grounded probe, independent of frame velocity
    pub ground_probe_distance: f32,
    /// Length of the upward clearance probe before a jump
    pub clearance_probe_distance: f32,
    /// Normal-to-down cosine above which a contact counts as a ceiling
    pub ceiling_threshold: f32,
    /// Squared displacement length below which a sweep pass short-circuits
    pub sweep_epsilon: f32,
    /// Squared horizontal speed separating IDLE from WALKING
    pub walk_threshold: f32,
    /// Upward speed above which the grounded probe treats the character as
    /// airborne (so a fresh jump is not re-grounded on the same tick)
    pub max_grounded_up_speed: f32,
    /// Delta time clamp applied each tick
    pub max_delta_time: f32,
    /// Horizontal velocity response model
    pub movement_model: MovementModel,
    /// Whether the step-up probe runs when a grounded move hits geometry
    pub enable_step_up: bool,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            acceleration: 10.0,
            ground_friction: 8.0,
            air_friction: 2.0,
            air_control: 0.3,
            gravity: 20.0,
            jump_speed: 8.0,
            skin_width: 0.02,
            max_slide_iterations: 4,
            step_height: 0.25,
            step_margin: 0.05,
            slope_limit_cos: std::f32::consts::FRAC_1_SQRT_2,
            coyote_time: 0.15,
            jump_buffer: 0.1,
            ground_probe_distance: 0.1,
            clearance_probe_distance: 0.1,
            ceiling_threshold: 0.7,
            sweep_epsilon: 1e-6,
            walk_threshold: 0.01,
            max_grounded_up_speed: 0.1,
            max_delta_time: 0.1,
            movement_model: MovementModel::Accelerated,
            enable_step_up: true,
        }
    }
}

impl CharacterConfig {
    /// Blend rate for the accelerated model given the current situation
    pub fn blend_rate(&self, grounded: bool, has_input: bool) -> f32 {
        match (grounded, has_input) {
            (true, true) => self.acceleration,
            (false, true) => self.acceleration * self.air_control,
            (true, false) => self.ground_friction,
            (false, false) => self.air_friction,
        }
    }

    /// Whether coyote time is enabled
    pub fn coyote_enabled(&self) -> bool {
        self.coyote_time > 0.0
    }

    /// Whether jump buffering is enabled
    pub fn jump_buffer_enabled(&self) -> bool {
        self.jump_buffer > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CharacterConfig::default();
        assert_eq!(config.move_speed, 5.0);
        assert_eq!(config.movement_model, MovementModel::Accelerated);
        assert!(config.enable_step_up);
        assert!(config.coyote_enabled());
        assert!(config.jump_buffer_enabled());
    }

    #[test]
    fn test_blend_rate_selection() {
        let config = CharacterConfig::default();
        assert_eq!(config.blend_rate(true, true), config.acceleration);
        assert_eq!(
            config.blend_rate(false, true),
            config.acceleration * config.air_control
        );
        assert_eq!(config.blend_rate(true, false), config.ground_friction);
        assert_eq!(config.blend_rate(false, false), config.air_friction);
    }
}
