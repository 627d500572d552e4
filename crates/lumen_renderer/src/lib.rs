//! Lumen Renderer - progressive CPU path tracing.
//!
//! An interactive Monte Carlo path tracer that refines its image over
//! time: every call to [`Renderer::render`] traces one independent sample
//! per pixel and blends it into a running average, so a static view
//! converges while a moving camera restarts from a single noisy frame.
//!
//! The host application owns the event loop; once per displayed frame it
//! updates the [`Camera`] from input, resizes camera and renderer to the
//! viewport, calls `render`, and uploads the resulting RGBA8 buffer.

mod camera;
mod input;
mod intersect;
mod renderer;
mod rng;

pub use camera::Camera;
pub use input::CameraInput;
pub use intersect::{nearest_hit, HitRecord};
pub use renderer::{color_to_rgba8, FrameBuffer, RenderError, Renderer, Settings};
pub use rng::PixelRng;

/// Re-export math and scene types so a host only needs this crate
pub use lumen_core::{Material, Scene, Sphere};
pub use lumen_math::{Ray, Vec3};
