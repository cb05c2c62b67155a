//! Procedural rose: a bud, golden-angle petals and five sepals, in the
//! rose's local space. Geometry primitives (cupped sphere segment for petals,
//! sphere for the bud, cone for sepals) are unit sized; `scale` carries the
//! dimensions.

use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::TAU;

pub const DEFAULT_PETAL_COUNT: usize = 18;
const INNER_PETALS: usize = 4;
const GOLDEN_ANGLE_DEGREES: f32 = 137.5;
const SEPAL_COUNT: usize = 5;
const SEPAL_COLOR: [f32; 3] = [0x5F as f32 / 255.0, 0x6F as f32 / 255.0, 0x52 as f32 / 255.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Bud,
    Petal,
    Sepal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosePart {
    pub kind: PartKind,
    pub position: Vec3,
    /// XYZ Euler angles.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub roughness: f32,
    /// Fixed colour; `None` takes the rose's colour.
    pub tint: Option<[f32; 3]>,
}

impl RosePart {
    pub fn local_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Petals spiral outward and downward; the inner four stay small and upright.
pub fn petal_layout(count: usize) -> Vec<RosePart> {
    let golden_angle = GOLDEN_ANGLE_DEGREES.to_radians();

    (0..count)
        .map(|i| {
            let fi = i as f32;
            let theta = fi * golden_angle;
            let radius = 0.2 + 0.15 * fi.sqrt();
            let height = 0.2 - fi * 0.02;
            let (tilt, scale) = if i < INNER_PETALS {
                (0.1 + fi * 0.1, Vec3::new(0.25, 0.4, 0.25))
            } else {
                let spread = 0.4 + fi * 0.02;
                (0.5 + fi / count as f32, Vec3::new(spread, 0.5, spread))
            };

            RosePart {
                kind: PartKind::Petal,
                position: Vec3::new(radius * theta.cos(), height, radius * theta.sin()),
                rotation: Vec3::new(tilt, -theta, 0.2),
                scale,
                roughness: 0.5 + fi * 0.02,
                tint: None,
            }
        })
        .collect()
}

pub fn sepal_layout() -> Vec<RosePart> {
    (0..SEPAL_COUNT)
        .map(|k| RosePart {
            kind: PartKind::Sepal,
            position: Vec3::new(0.0, -0.2, 0.0),
            rotation: Vec3::new(2.0, 0.0, k as f32 * TAU / SEPAL_COUNT as f32),
            scale: Vec3::new(0.08, 0.6, 0.08),
            roughness: 0.9,
            tint: Some(SEPAL_COLOR),
        })
        .collect()
}

fn bud() -> RosePart {
    RosePart {
        kind: PartKind::Bud,
        position: Vec3::new(0.0, 0.25, 0.0),
        rotation: Vec3::ZERO,
        scale: Vec3::new(0.15, 0.25, 0.15),
        roughness: 0.7,
        tint: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoseModel {
    parts: Vec<RosePart>,
}

impl RoseModel {
    pub fn with_petals(petal_count: usize) -> Self {
        let mut parts = Vec::with_capacity(1 + petal_count + SEPAL_COUNT);
        parts.push(bud());
        parts.extend(petal_layout(petal_count));
        parts.extend(sepal_layout());
        Self { parts }
    }

    pub fn parts(&self) -> &[RosePart] {
        &self.parts
    }

    pub fn petals(&self) -> impl Iterator<Item = &RosePart> {
        self.parts.iter().filter(|p| p.kind == PartKind::Petal)
    }
}

impl Default for RoseModel {
    fn default() -> Self {
        Self::with_petals(DEFAULT_PETAL_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_petals_spiral_outward() {
        let petals = petal_layout(DEFAULT_PETAL_COUNT);
        assert_eq!(petals.len(), 18);

        let radii: Vec<f32> = petals
            .iter()
            .map(|p| glam::Vec2::new(p.position.x, p.position.z).length())
            .collect();
        assert!(radii.windows(2).all(|w| w[1] > w[0]));
        assert!((petals[0].position.y - 0.2).abs() < 1e-6);
        assert!(petals[17].position.y < petals[0].position.y);
    }

    #[test]
    fn test_inner_petals_are_small() {
        let petals = petal_layout(DEFAULT_PETAL_COUNT);
        assert_eq!(petals[3].scale, Vec3::new(0.25, 0.4, 0.25));
        assert!((petals[4].scale.x - 0.48).abs() < 1e-6);
        assert!((petals[4].rotation.x - (0.5 + 4.0 / 18.0)).abs() < 1e-6);
    }

    #[test]
    fn test_model_has_bud_petals_and_sepals() {
        let rose = RoseModel::default();
        assert_eq!(rose.parts().len(), 1 + 18 + 5);
        assert_eq!(rose.petals().count(), 18);
        assert!(rose
            .parts()
            .iter()
            .filter(|p| p.kind == PartKind::Sepal)
            .all(|p| p.tint == Some(SEPAL_COLOR)));
    }
}
