use crate::field::particle::{FieldParams, FrameInput, Particle, Viewport};
use glam::{Vec2, Vec3};

/// Below this planar distance the push direction is undefined; only the depth push applies.
const MIN_PUSH_DISTANCE: f32 = 1e-6;

/// Maps a pointer in normalized device coordinates onto the plane at `depth`.
///
/// Planes further from the camera cover more world space, so the same pointer
/// lands further out for deep particles than for near ones.
pub fn project_pointer(ndc: Vec2, depth: f32, viewport: &Viewport) -> Vec2 {
    ndc * viewport.extent_at_depth(depth) / 2.0
}

/// Linear falloff: strongest at the pointer, zero at and beyond the radius.
pub fn repulsion_strength(distance: f32, params: &FieldParams) -> f32 {
    if distance < params.interaction_radius {
        (params.interaction_radius - distance) * params.repulsion_gain
    } else {
        0.0
    }
}

/// Idle target: the spawn point plus a slow sinusoidal drift.
pub fn home_position(spawn: Vec3, t: f32, params: &FieldParams) -> Vec3 {
    let phase = params.float_frequency * t;
    spawn
        + params.float_amplitude * Vec3::new(phase.x.cos(), phase.y.sin(), phase.z.sin())
}

pub fn integrate(
    particle: &mut Particle,
    input: &FrameInput,
    params: &FieldParams,
    viewport: &Viewport,
) {
    if let Some(ndc) = input.pointer {
        apply_repulsion(particle, ndc, params, viewport);
    }

    let t = input.elapsed + particle.time_offset;
    particle.home = home_position(particle.spawn, t, params);

    particle.velocity += (particle.home - particle.position) * params.spring_strength;
    particle.velocity *= params.damping;
    particle.position += particle.velocity;

    let target_x = particle.base_rotation.x;
    let target_y = particle.base_rotation.y + t * params.spin_rate;
    particle.rotation.x += (target_x - particle.rotation.x) * params.rotation_follow;
    particle.rotation.y += (target_y - particle.rotation.y) * params.rotation_follow;
}

fn apply_repulsion(particle: &mut Particle, ndc: Vec2, params: &FieldParams, viewport: &Viewport) {
    // 用出生深度的平面，而非目前的 z
    let pointer = project_pointer(ndc, particle.spawn.z, viewport);
    let offset = pointer - particle.position.truncate();
    let distance = offset.length();

    let strength = repulsion_strength(distance, params);
    if strength <= 0.0 {
        return;
    }

    if distance > MIN_PUSH_DISTANCE {
        let push = offset / distance * strength;
        particle.velocity.x -= push.x;
        particle.velocity.y -= push.y;
    }
    particle.velocity.z -= strength * params.depth_push;

    particle.rotation.x += particle.velocity.y * params.impact_spin;
    particle.rotation.y -= particle.velocity.x * params.impact_spin;
}
