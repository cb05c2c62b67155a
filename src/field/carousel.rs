//! Drag-to-spin ring of image cards.
//!
//! The ring idles with a slow auto-rotation, picks up velocity from
//! horizontal drags and coasts down under frame-rate independent friction.

use glam::Vec3;
use std::f32::consts::TAU;

const MIN_RADIUS: f32 = 8.0;
const RADIUS_PER_CARD: f32 = 0.8;
/// Friction and drag are tuned for 60 frames per second.
const REFERENCE_FPS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselParams {
    pub friction: f32,
    pub drag_sensitivity: f32,
    pub base_speed: f32,
    /// Overrides the radius derived from the card count.
    pub radius: Option<f32>,
}

impl Default for CarouselParams {
    fn default() -> Self {
        Self {
            friction: 0.95,
            drag_sensitivity: 0.05,
            base_speed: 0.0003,
            radius: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    pub position: Vec3,
    /// Rotation about y so the card faces outward.
    pub yaw: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    card_count: usize,
    params: CarouselParams,
    rotation: f32,
    velocity: f32,
    drag_x: Option<f32>,
}

impl Carousel {
    pub fn new(card_count: usize, params: CarouselParams) -> Self {
        Self {
            card_count,
            params,
            rotation: 0.0,
            velocity: 0.0,
            drag_x: None,
        }
    }

    pub fn radius(&self) -> f32 {
        self.params
            .radius
            .unwrap_or_else(|| MIN_RADIUS.max(self.card_count as f32 * RADIUS_PER_CARD))
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_x.is_some()
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.drag_x = Some(x);
    }

    pub fn pointer_move(&mut self, x: f32) {
        if let Some(last) = self.drag_x.replace(x) {
            self.velocity += (x - last) * self.params.drag_sensitivity * 0.01;
        }
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self) {
        self.drag_x = None;
    }

    /// Advances by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        if self.card_count == 0 {
            return;
        }

        if !self.is_dragging() {
            // 卡片越多轉得越慢
            let speed_multiplier = (10.0 / self.card_count as f32).max(0.5);
            self.velocity += self.params.base_speed * speed_multiplier;
        }

        let frames = delta * REFERENCE_FPS;
        self.velocity *= self.params.friction.powf(frames);
        self.rotation += self.velocity * frames;
    }

    fn angle_per_card(&self) -> f32 {
        TAU / self.card_count as f32
    }

    /// The card facing the camera, `None` for an empty carousel.
    pub fn current_index(&self) -> Option<usize> {
        if self.card_count == 0 {
            return None;
        }
        let facing = (-self.rotation).rem_euclid(TAU);
        let index = (facing / self.angle_per_card()).round() as usize;
        Some(index % self.card_count)
    }

    pub fn placement(&self, index: usize) -> CardPlacement {
        let angle = index as f32 * self.angle_per_card();
        let radius = self.radius();
        CardPlacement {
            position: Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius),
            yaw: angle,
            opacity: self.card_opacity(index),
        }
    }

    pub fn placements(&self) -> Vec<CardPlacement> {
        (0..self.card_count).map(|i| self.placement(i)).collect()
    }

    /// Full for the facing card, slightly faded for its neighbours, faded for the rest.
    pub fn card_opacity(&self, index: usize) -> f32 {
        let Some(current) = self.current_index() else {
            return 0.0;
        };
        let relative = (index + self.card_count - current) % self.card_count;
        if relative == 0 {
            1.0
        } else if relative == 1 || relative == self.card_count - 1 {
            0.85
        } else {
            0.6
        }
    }
}
