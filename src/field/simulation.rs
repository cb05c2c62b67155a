//! Headless driver for the particle field: scripted pointer paths, a fixed
//! frame clock and trajectory recording. Two runs with the same seed and
//! path produce identical trajectories, which makes them usable as
//! regression fixtures.

use crate::field::particle::{FrameInput, ParticleField};
use crate::field::renderer::InstanceBuffer;
use crate::utils::error::Result;
use glam::Vec2;
use serde::Serialize;
use std::f32::consts::TAU;
use std::io::Write;

pub const DEFAULT_FRAME_RATE: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPath {
    /// Pointer off the canvas.
    Idle,
    Circle { radius: f32, period_secs: f32 },
    /// Left to right and back along the horizontal centre line.
    Sweep { period_secs: f32 },
}

impl PointerPath {
    pub fn sample(&self, elapsed: f32) -> Option<Vec2> {
        match *self {
            PointerPath::Idle => None,
            PointerPath::Circle {
                radius,
                period_secs,
            } => {
                let angle = TAU * elapsed / period_secs;
                Some(Vec2::new(angle.cos(), angle.sin()) * radius)
            }
            PointerPath::Sweep { period_secs } => {
                // 三角波 -1 → 1 → -1
                let phase = (elapsed / period_secs).rem_euclid(1.0);
                let x = 1.0 - 4.0 * (phase - 0.5).abs();
                Some(Vec2::new(x, 0.0))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub frame: u64,
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    fn record(&mut self, frame: u64, field: &ParticleField) {
        self.samples
            .extend(field.particles().iter().enumerate().map(|(index, p)| {
                TrajectorySample {
                    frame,
                    index,
                    x: p.position.x,
                    y: p.position.y,
                    z: p.position.z,
                }
            }));
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// `frame,index,x,y,z` with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for sample in &self.samples {
            csv_writer.serialize(sample)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub particles: usize,
    /// Largest distance any particle reached from its home position.
    pub max_home_offset: f32,
    pub max_speed: f32,
    pub final_mean_speed: f32,
}

impl RunSummary {
    /// Combines a summary with the one for the frames that followed it.
    pub fn then(self, later: RunSummary) -> RunSummary {
        RunSummary {
            frames: later.frames,
            particles: later.particles,
            max_home_offset: self.max_home_offset.max(later.max_home_offset),
            max_speed: self.max_speed.max(later.max_speed),
            final_mean_speed: later.final_mean_speed,
        }
    }
}

pub struct Simulation {
    field: ParticleField,
    buffer: InstanceBuffer,
    frame_rate: f32,
    frame: u64,
    trajectory: Option<Trajectory>,
}

impl Simulation {
    pub fn new(field: ParticleField) -> Self {
        let buffer = InstanceBuffer::with_capacity(field.len());
        Self {
            field,
            buffer,
            frame_rate: DEFAULT_FRAME_RATE,
            frame: 0,
            trajectory: None,
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn recording(mut self) -> Self {
        self.trajectory = Some(Trajectory::default());
        self
    }

    pub fn elapsed(&self) -> f32 {
        self.frame as f32 / self.frame_rate
    }

    /// One render-loop callback: sample input, integrate, rewrite the instance buffer.
    pub fn tick(&mut self, path: &PointerPath) {
        let elapsed = self.elapsed();
        let input = FrameInput {
            pointer: path.sample(elapsed),
            elapsed,
        };
        self.field.step(&input);
        self.buffer.write(&self.field);

        if let Some(trajectory) = self.trajectory.as_mut() {
            trajectory.record(self.frame, &self.field);
        }
        self.frame += 1;
    }

    pub fn run(&mut self, frames: u64, path: &PointerPath) -> RunSummary {
        let mut max_home_offset: f32 = 0.0;
        let mut max_speed: f32 = 0.0;

        for _ in 0..frames {
            self.tick(path);
            for p in self.field.particles() {
                max_home_offset = max_home_offset.max((p.position - p.home).length());
                max_speed = max_speed.max(p.speed());
            }
        }

        let final_mean_speed = if self.field.is_empty() {
            0.0
        } else {
            self.field.particles().iter().map(|p| p.speed()).sum::<f32>()
                / self.field.len() as f32
        };

        RunSummary {
            frames: self.frame,
            particles: self.field.len(),
            max_home_offset,
            max_speed,
            final_mean_speed,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}
