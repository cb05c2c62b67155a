//! Renderer binding: packs particle transforms into an instance buffer.
//!
//! The buffer is rewritten after every [`ParticleField::step`] and keeps its
//! allocation between frames, so a renderer can upload `matrices()` and
//! `colors()` as-is (column-major 4x4, linear RGB).

use crate::field::particle::{Particle, ParticleField};
use crate::field::rose::RoseModel;
use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    matrices: Vec<[f32; 16]>,
    colors: Vec<[f32; 3]>,
}

impl InstanceBuffer {
    pub fn with_capacity(instances: usize) -> Self {
        Self {
            matrices: Vec::with_capacity(instances),
            colors: Vec::with_capacity(instances),
        }
    }

    /// One instance per particle.
    pub fn write(&mut self, field: &ParticleField) {
        self.clear();
        for particle in field.particles() {
            self.push(model_matrix(particle), particle.color);
        }
    }

    /// One instance per rose part (bud, petals, sepals) of every particle.
    pub fn write_roses(&mut self, field: &ParticleField, rose: &RoseModel) {
        self.clear();
        for particle in field.particles() {
            let world = model_matrix(particle);
            for part in rose.parts() {
                let color = part.tint.unwrap_or(particle.color);
                self.push(world * part.local_matrix(), color);
            }
        }
    }

    pub fn matrices(&self) -> &[[f32; 16]] {
        &self.matrices
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Matrices as one contiguous float slice.
    pub fn as_floats(&self) -> &[f32] {
        self.matrices.as_flattened()
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.matrices.capacity()
    }

    fn clear(&mut self) {
        self.matrices.clear();
        self.colors.clear();
    }

    fn push(&mut self, matrix: Mat4, color: [f32; 3]) {
        self.matrices.push(matrix.to_cols_array());
        self.colors.push(color);
    }
}

pub fn model_matrix(particle: &Particle) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        particle.rotation.x,
        particle.rotation.y,
        particle.rotation.z,
    );
    Mat4::from_scale_rotation_translation(Vec3::splat(particle.scale), rotation, particle.position)
}
