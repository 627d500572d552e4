//! Progressive path tracing renderer.
//!
//! One call to [`Renderer::render`] traces a single independent sample per
//! pixel and folds it into a running average, so the displayed image
//! converges over successive frames while the camera holds still. Rows are
//! rendered in parallel with rayon; each pixel owns its random stream, so
//! workers share nothing mutable.

use std::collections::TryReserveError;
use std::time::Instant;

use lumen_core::{Material, Scene};
use lumen_math::{Interval, Ray, Vec3};
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::intersect::nearest_hit;
use crate::rng::PixelRng;

/// Offset along the surface normal for secondary ray origins, and the
/// minimum accepted hit distance. Guards against self-intersection acne.
const SURFACE_BIAS: f32 = 1e-4;

/// Host-editable render settings.
///
/// Written by the host between frames only; `render` snapshots them at
/// call entry so parallel workers never observe a torn update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Average samples over time instead of showing each raw frame
    pub accumulate: bool,
    /// Use the reference RNG instead of the fast hashed one
    pub slow_random: bool,
    /// Add an ambient sky term when a ray escapes the scene
    pub enable_sky: bool,
    /// Maximum path length; clamped to >= 1 at render time
    pub bounces: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accumulate: true,
            slow_random: false,
            enable_sky: true,
            bounces: 5,
        }
    }
}

/// Renderer failures surfaced to the host.
///
/// Everything else in the pipeline degrades defensively (clamps or
/// no-ops); only buffer allocation is allowed to fail loudly.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate {width}x{height} frame buffers")]
    BufferAllocation {
        width: u32,
        height: u32,
        #[source]
        source: TryReserveError,
    },
}

/// Display-ready pixel buffer: packed RGBA8, row-major, top-left origin.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get the packed pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Packed pixels in row-major order.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for upload: r, g, b, a per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// The progressive renderer: frame buffer, accumulation history, and
/// settings.
pub struct Renderer {
    final_image: Option<FrameBuffer>,
    accumulation: Vec<Vec3>,
    frame_index: u32,
    settings: Settings,
    last_render_time: f32,
}

impl Renderer {
    /// Create a renderer with no buffers; call
    /// [`Renderer::on_resize`] before the first render.
    pub fn new() -> Self {
        Self {
            final_image: None,
            accumulation: Vec::new(),
            frame_index: 1,
            settings: Settings::default(),
            last_render_time: 0.0,
        }
    }

    /// Reallocate the frame and accumulation buffers for a new viewport
    /// size. A call with unchanged dimensions is a no-op; a zero dimension
    /// drops the buffers entirely (the final image goes absent).
    ///
    /// Reallocation discards accumulated history: `frame_index` returns
    /// to 1.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if let Some(image) = &self.final_image {
            if image.width == width && image.height == height {
                return Ok(());
            }
        }

        if width == 0 || height == 0 {
            self.final_image = None;
            self.accumulation = Vec::new();
            self.frame_index = 1;
            return Ok(());
        }

        let count = width as usize * height as usize;
        let failed = |source| RenderError::BufferAllocation {
            width,
            height,
            source,
        };

        let mut pixels: Vec<u32> = Vec::new();
        pixels.try_reserve_exact(count).map_err(failed)?;
        pixels.resize(count, 0);

        let mut accumulation: Vec<Vec3> = Vec::new();
        accumulation.try_reserve_exact(count).map_err(failed)?;
        accumulation.resize(count, Vec3::ZERO);

        log::debug!("resizing frame buffers to {}x{}", width, height);
        self.final_image = Some(FrameBuffer {
            width,
            height,
            pixels,
        });
        self.accumulation = accumulation;
        self.frame_index = 1;

        Ok(())
    }

    /// Trace one sample per pixel and blend it into the displayed image.
    ///
    /// A no-op when no buffer has been allocated yet or when the camera's
    /// ray cache does not match the viewport (the host resizes both
    /// together, so a mismatch means a stale frame).
    pub fn render(&mut self, scene: &Scene, camera: &Camera) {
        let start = Instant::now();

        let Some(image) = self.final_image.as_mut() else {
            return;
        };
        let width = image.width as usize;
        if camera.ray_directions().len() != self.accumulation.len() {
            return;
        }

        // Snapshot so parallel workers read one consistent configuration
        let mut settings = self.settings;
        settings.bounces = settings.bounces.max(1);

        let frame_index = self.frame_index;
        if frame_index == 1 {
            self.accumulation.fill(Vec3::ZERO);
        }

        let origin = camera.position();

        self.accumulation
            .par_chunks_mut(width)
            .zip(image.pixels.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (acc_row, out_row))| {
                for (x, (acc, out)) in acc_row.iter_mut().zip(out_row.iter_mut()).enumerate() {
                    let pixel_index = y * width + x;
                    let ray = Ray::new(origin, camera.ray_direction(pixel_index));

                    *acc += trace_path(scene, ray, &settings, pixel_index as u32, frame_index);
                    *out = color_to_rgba8(*acc / frame_index as f32);
                }
            });

        self.frame_index = if settings.accumulate {
            self.frame_index + 1
        } else {
            1
        };
        self.last_render_time = start.elapsed().as_secs_f32();
    }

    /// Restart accumulation from scratch. The next render overwrites
    /// history instead of blending into it.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 1;
    }

    /// The display buffer, or None before the first successful resize.
    pub fn final_image(&self) -> Option<&FrameBuffer> {
        self.final_image.as_ref()
    }

    /// Number of samples contributing to the current average.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Wall-clock duration of the last render call, in seconds.
    pub fn last_render_time(&self) -> f32 {
        self.last_render_time
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimate the radiance arriving along one ray.
///
/// Iterative light transport: walk up to `bounces` scatter events,
/// accumulating emission weighted by the path throughput and tinting the
/// throughput at every surface interaction.
fn trace_path(
    scene: &Scene,
    mut ray: Ray,
    settings: &Settings,
    pixel_index: u32,
    frame_index: u32,
) -> Vec3 {
    let mut rng = PixelRng::new(settings.slow_random, pixel_index, frame_index);

    let mut radiance = Vec3::ZERO;
    let mut throughput = Vec3::ONE;
    let hit_range = Interval::new(SURFACE_BIAS, f32::INFINITY);

    for _ in 0..settings.bounces {
        let Some(hit) = nearest_hit(scene, &ray, hit_range) else {
            if settings.enable_sky {
                radiance += throughput * sky_color(&ray);
            }
            break;
        };

        let material = scene.material_for(&scene.spheres[hit.sphere_index]).clamped();

        radiance += throughput * material.emission();
        throughput *= scatter_tint(&material);

        let mirror = reflect(ray.direction, hit.normal);
        let diffuse = (hit.normal + rng.unit_vector())
            .try_normalize()
            .unwrap_or(hit.normal);
        let direction = mirror
            .lerp(diffuse, material.roughness)
            .try_normalize()
            .unwrap_or(hit.normal);

        ray = Ray::new(hit.point + hit.normal * SURFACE_BIAS, direction);
    }

    radiance
}

/// Per-bounce throughput tint for the unified scatter model.
///
/// Albedo always filters the bounce; smooth metals additionally tint
/// their specular reflection by albedo a second time, fading back to the
/// plain albedo factor as roughness rises. Every channel stays in [0, 1]
/// for clamped materials, so throughput never grows.
fn scatter_tint(material: &Material) -> Vec3 {
    let specular = Vec3::ONE.lerp(material.albedo, material.metallic * (1.0 - material.roughness));
    material.albedo * specular
}

/// Ambient sky term: vertical white-to-blue gradient.
fn sky_color(ray: &Ray) -> Vec3 {
    let unit_direction = ray.direction.normalize_or(Vec3::Y);
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Vec3::new(1.0, 1.0, 1.0);
    let blue = Vec3::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to one packed RGBA8 pixel (alpha = 255).
pub fn color_to_rgba8(color: Vec3) -> u32 {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u32;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u32;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u32;
    r | (g << 8) | (b << 16) | 0xff00_0000
}
