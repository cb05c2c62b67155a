//! Particle state store for the floating rose field.
//!
//! A field is spawned once from a seed and then advanced one frame at a time
//! by [`ParticleField::step`]. Particles have no identity beyond their index.

use crate::field::integrator;
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

pub const DEFAULT_PARTICLE_COUNT: usize = 14;

/// Rose palette: soft pink, champagne, blush, dusty rose, deep mauve.
pub const ROSE_PALETTE: [[u8; 3]; 5] = [
    [0xEA, 0xCA, 0xCD],
    [0xF4, 0xE1, 0xD2],
    [0xF9, 0xF1, 0xF0],
    [0xD4, 0xA5, 0xA9],
    [0xC2, 0x7A, 0x7F],
];

/// Tunable constants of the per-frame integrator. All values are per frame,
/// not per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Planar distance within which the pointer pushes a particle.
    pub interaction_radius: f32,
    /// Impulse per unit of penetration into the interaction radius.
    pub repulsion_gain: f32,
    /// Fraction of the impulse applied along -z.
    pub depth_push: f32,
    /// Rotation kick per unit of velocity while being pushed.
    pub impact_spin: f32,
    pub float_amplitude: Vec3,
    pub float_frequency: Vec3,
    pub spring_strength: f32,
    pub damping: f32,
    /// Fraction of the remaining angle closed each frame.
    pub rotation_follow: f32,
    /// Idle spin around y, radians per second of elapsed time.
    pub spin_rate: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            interaction_radius: 4.0,
            repulsion_gain: 0.03,
            depth_push: 0.4,
            impact_spin: 0.05,
            float_amplitude: Vec3::new(0.2, 0.3, 0.1),
            float_frequency: Vec3::new(0.5, 1.0, 0.3),
            spring_strength: 0.02,
            damping: 0.95,
            rotation_follow: 0.02,
            spin_rate: 0.1,
        }
    }
}

/// Perspective camera looking down -z from `(0, 0, camera_z)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub camera_z: f32,
    /// Vertical field of view.
    pub fov_y_degrees: f32,
    /// Width over height.
    pub aspect: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            camera_z: 15.0,
            fov_y_degrees: 35.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Viewport {
    /// Visible world-space width and height of the plane at `depth`.
    pub fn extent_at_depth(&self, depth: f32) -> Vec2 {
        let distance = (self.camera_z - depth).abs();
        let height = 2.0 * (self.fov_y_degrees.to_radians() / 2.0).tan() * distance;
        Vec2::new(height * self.aspect, height)
    }
}

/// Axis-aligned box particles are spawned in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for SpawnVolume {
    fn default() -> Self {
        Self {
            min: Vec3::new(-12.0, -10.0, -6.0),
            max: Vec3::new(12.0, 10.0, 2.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// XYZ Euler angles.
    pub rotation: Vec3,
    pub base_rotation: Vec3,
    pub spawn: Vec3,
    /// Spawn point plus the current idle float offset.
    pub home: Vec3,
    pub scale: f32,
    pub color: [f32; 3],
    /// Added to elapsed time so particles don't float in lockstep.
    pub time_offset: f32,
}

impl Particle {
    fn random(rng: &mut SmallRng, volume: &SpawnVolume) -> Self {
        let spawn = Vec3::new(
            rng.gen_range(volume.min.x..volume.max.x),
            rng.gen_range(volume.min.y..volume.max.y),
            rng.gen_range(volume.min.z..volume.max.z),
        );
        let rotation = Vec3::new(
            rng.gen_range(0.0..0.5),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..0.2),
        );
        let [r, g, b] = ROSE_PALETTE[rng.gen_range(0..ROSE_PALETTE.len())];

        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            rotation,
            base_rotation: rotation,
            spawn,
            home: spawn,
            scale: rng.gen_range(0.6..1.2),
            color: [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0],
            time_offset: rng.gen_range(0.0..100.0),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Input sampled once at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer in normalized device coordinates, `None` when it is off the canvas.
    pub pointer: Option<Vec2>,
    /// Seconds since the field was mounted.
    pub elapsed: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    params: FieldParams,
    viewport: Viewport,
}

impl ParticleField {
    pub fn spawn(count: usize, seed: u64, params: FieldParams, viewport: Viewport) -> Self {
        Self::spawn_in(count, seed, &SpawnVolume::default(), params, viewport)
    }

    pub fn spawn_in(
        count: usize,
        seed: u64,
        volume: &SpawnVolume,
        params: FieldParams,
        viewport: Viewport,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| Particle::random(&mut rng, volume))
            .collect();

        tracing::debug!("🌹 Spawned {} particles (seed {})", count, seed);

        Self {
            particles,
            params,
            viewport,
        }
    }

    /// Advances every particle by one frame.
    pub fn step(&mut self, input: &FrameInput) {
        for particle in &mut self.particles {
            integrator::integrate(particle, input, &self.params, &self.viewport);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_stays_inside_volume() {
        let field = ParticleField::spawn(200, 7, FieldParams::default(), Viewport::default());
        let volume = SpawnVolume::default();

        assert_eq!(field.len(), 200);
        for p in field.particles() {
            assert!(p.position.cmpge(volume.min).all() && p.position.cmplt(volume.max).all());
            assert!((0.6..1.2).contains(&p.scale));
            assert!((0.0..100.0).contains(&p.time_offset));
            assert_eq!(p.velocity, Vec3::ZERO);
            assert_eq!(p.home, p.spawn);
        }
    }

    #[test]
    fn test_spawn_is_reproducible_from_seed() {
        let a = ParticleField::spawn(14, 42, FieldParams::default(), Viewport::default());
        let b = ParticleField::spawn(14, 42, FieldParams::default(), Viewport::default());
        let c = ParticleField::spawn(14, 43, FieldParams::default(), Viewport::default());

        assert_eq!(a.particles(), b.particles());
        assert_ne!(a.particles(), c.particles());
    }

    #[test]
    fn test_colors_come_from_palette() {
        let field = ParticleField::spawn(50, 3, FieldParams::default(), Viewport::default());
        for p in field.particles() {
            let matches = ROSE_PALETTE.iter().any(|[r, g, b]| {
                p.color == [*r as f32 / 255.0, *g as f32 / 255.0, *b as f32 / 255.0]
            });
            assert!(matches);
        }
    }

    #[test]
    fn test_viewport_extent_grows_with_distance() {
        let viewport = Viewport {
            camera_z: 15.0,
            fov_y_degrees: 90.0,
            aspect: 2.0,
        };

        let near = viewport.extent_at_depth(10.0);
        let far = viewport.extent_at_depth(0.0);

        assert!((near.y - 10.0).abs() < 1e-4);
        assert!((near.x - 20.0).abs() < 1e-4);
        assert!((far.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_params_deserialize_partial_override() {
        let params: FieldParams = toml::from_str("damping = 0.9\nfloat_amplitude = [0.0, 0.0, 0.0]").unwrap();

        assert_eq!(params.damping, 0.9);
        assert_eq!(params.float_amplitude, Vec3::ZERO);
        assert_eq!(params.interaction_radius, 4.0);
    }
}
