// Interactive 3D background: floating rose particles and the image carousel.

pub mod carousel;
pub mod integrator;
pub mod particle;
pub mod renderer;
pub mod rose;
pub mod simulation;

pub use particle::{FieldParams, FrameInput, Particle, ParticleField, Viewport};
pub use simulation::{PointerPath, RunSummary, Simulation};
