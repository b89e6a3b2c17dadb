//! Sweep-and-slide collision resolution and step-up probing
//!
//! The controller resolves motion in two independent bounded passes per
//! tick: a vertical pass for gravity-driven displacement and a horizontal
//! pass for steered displacement. Separating them keeps gravity contacts
//! from corrupting wall sliding and vice versa. Each pass advances the
//! capsule to just short of contact (the skin width), then redirects the
//! remaining displacement along the contact surface.

use glam::Vec3;
use strider_core::{EntityId, WORLD_DOWN, WORLD_UP};
use strider_physics::{CapsuleShape, CollisionQuery, SweepHit};

use crate::config::CharacterConfig;

/// Which displacement component a slide pass is resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlidePass {
    Vertical,
    Horizontal,
}

/// Sweep with contract validation.
///
/// A query service reporting a time of impact outside `[0, 1]` or a
/// degenerate normal is misbehaving; clamp or drop the hit instead of
/// letting NaNs into velocity state.
pub(crate) fn sweep_checked<C: CollisionQuery>(
    world: &C,
    capsule: &CapsuleShape,
    position: Vec3,
    displacement: Vec3,
    exclude: Option<EntityId>,
) -> Option<SweepHit> {
    let hit = world.sweep(capsule, position, displacement, exclude)?;

    if !hit.toi.is_finite() {
        tracing::warn!("collision query returned a non-finite time of impact; ignoring hit");
        return None;
    }
    let normal = hit.normal.normalize_or_zero();
    if !normal.is_finite() || normal == Vec3::ZERO {
        tracing::warn!("collision query returned a degenerate normal; ignoring hit");
        return None;
    }

    Some(SweepHit {
        toi: hit.toi.clamp(0.0, 1.0),
        normal,
        entity: hit.entity,
    })
}

/// Resolve one displacement against the world, sliding along contacts.
///
/// Advances `position` and cancels the into-surface components of both the
/// remaining displacement and `velocity`. On the vertical pass a ceiling
/// contact while moving upward zeroes vertical motion (head bump); on the
/// horizontal pass contact normals are flattened onto the horizontal plane
/// so velocity corrections never touch the vertical component.
///
/// Returns whether any contact occurred.
pub(crate) fn slide_pass<C: CollisionQuery>(
    world: &C,
    config: &CharacterConfig,
    capsule: &CapsuleShape,
    exclude: Option<EntityId>,
    position: &mut Vec3,
    velocity: &mut Vec3,
    displacement: Vec3,
    pass: SlidePass,
) -> bool {
    let mut remaining = displacement;
    let mut hit_any = false;

    for _ in 0..config.max_slide_iterations {
        if remaining.length_squared() < config.sweep_epsilon {
            break;
        }

        let Some(hit) = sweep_checked(world, capsule, *position, remaining, exclude) else {
            *position += remaining;
            break;
        };
        hit_any = true;

        // Conservative advance: stop skin_width short of the surface so the
        // capsule never rests in exact contact.
        let length = remaining.length();
        let safe_fraction = (hit.toi - config.skin_width / length).max(0.0);
        *position += remaining * safe_fraction;
        remaining *= 1.0 - safe_fraction;

        let normal = match pass {
            SlidePass::Vertical => {
                let up_speed = velocity.dot(WORLD_UP);
                if hit.normal.dot(WORLD_DOWN) > config.ceiling_threshold && up_speed > 0.0 {
                    // Head bump: cancel upward motion entirely.
                    *velocity -= WORLD_UP * up_speed;
                    remaining -= WORLD_UP * remaining.dot(WORLD_UP);
                }
                hit.normal
            }
            SlidePass::Horizontal => {
                let flattened = hit.normal - WORLD_UP * hit.normal.dot(WORLD_UP);
                let flattened = flattened.normalize_or_zero();
                if flattened == Vec3::ZERO {
                    // Floor- or ceiling-facing contact during a horizontal
                    // move; nothing to slide against on this plane.
                    continue;
                }
                flattened
            }
        };

        remaining -= normal * remaining.dot(normal).min(0.0);
        *velocity -= normal * velocity.dot(normal).min(0.0);
    }

    hit_any
}

/// Speculative step-up probe: raise, re-sweep, drop.
///
/// `baseline_advance` is how far the unraised horizontal sweep could travel
/// before contact; the step only commits when the raised sweep does strictly
/// better and the landing surface is walkable. On failure the position is
/// left untouched.
pub(crate) fn try_step_up<C: CollisionQuery>(
    world: &C,
    config: &CharacterConfig,
    capsule: &CapsuleShape,
    exclude: Option<EntityId>,
    position: &mut Vec3,
    horizontal: Vec3,
    baseline_advance: f32,
) -> bool {
    let length = horizontal.length();
    if length * length < config.sweep_epsilon {
        return false;
    }

    // 1. Raise by the step height.
    let mut probe = *position + WORLD_UP * config.step_height;

    // 2. Re-sweep the horizontal displacement from the raised position.
    let advance = match sweep_checked(world, capsule, probe, horizontal, exclude) {
        Some(hit) => (hit.toi - config.skin_width / length).max(0.0) * length,
        None => length,
    };
    if advance <= baseline_advance + config.skin_width {
        // Still blocked at the raised height; not a climbable riser.
        return false;
    }
    probe += horizontal * (advance / length);

    // 3. Settle: sweep down past the raise to find the tread.
    let drop = WORLD_DOWN * (config.step_height + config.step_margin);
    if let Some(hit) = sweep_checked(world, capsule, probe, drop, exclude) {
        if hit.normal.dot(WORLD_UP) > config.slope_limit_cos {
            let drop_length = drop.length();
            let safe_fraction = (hit.toi - config.skin_width / drop_length).max(0.0);
            *position = probe + drop * safe_fraction;
            tracing::debug!(advance, "stepped up");
            return true;
        }
    }

    // No walkable floor within reach (or too steep): reject, leaving the
    // caller's position exactly as it was.
    false
}
