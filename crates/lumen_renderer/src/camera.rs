//! Interactive camera and per-pixel ray generation.

use lumen_math::{Mat4, Quat, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::input::CameraInput;

/// Default movement speed in world units per second.
const DEFAULT_SPEED: f32 = 5.0;

/// Radians of rotation per pixel of mouse movement.
const ROTATION_SPEED: f32 = 0.003;

/// A fly camera that owns view/projection state and a cached array of
/// world-space ray directions, one per viewport pixel.
///
/// The cache is the reason ray generation is O(1) at render time: the
/// un-projection math runs only when the view or projection actually
/// changes (movement, rotation, resize), not per pixel per frame.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,

    vertical_fov: f32,
    near_clip: f32,
    far_clip: f32,

    viewport_width: u32,
    viewport_height: u32,

    /// Movement speed, adjustable with the scroll wheel
    speed: f32,

    // Cached derived state
    projection: Mat4,
    inverse_projection: Mat4,
    view: Mat4,
    inverse_view: Mat4,
    ray_directions: Vec<Vec3>,
}

impl Camera {
    /// Create a camera with the given vertical field of view (degrees)
    /// and clip planes.
    ///
    /// The viewport starts at 0x0; call [`Camera::on_resize`] before
    /// rendering to build the ray cache.
    pub fn new(vertical_fov: f32, near_clip: f32, far_clip: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            forward: Vec3::NEG_Z,
            vertical_fov,
            near_clip,
            far_clip,
            viewport_width: 0,
            viewport_height: 0,
            speed: DEFAULT_SPEED,
            projection: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            ray_directions: Vec::new(),
        };

        camera.recalculate_view();
        camera
    }

    /// Apply one frame of input.
    ///
    /// Returns true if the position or orientation changed, which is the
    /// host's cue to reset the renderer's accumulation: every accumulated
    /// sample estimates the same static view, so any viewpoint change
    /// invalidates the history.
    pub fn on_update(&mut self, input: &CameraInput, delta_time: f32) -> bool {
        let up = Vec3::Y;
        let right = self.forward.cross(up).normalize();

        // Scroll tunes speed but does not move the camera, so it does not
        // count as a change
        if input.scroll_delta != 0.0 {
            self.speed = (self.speed + input.scroll_delta * 0.5).clamp(0.5, 50.0);
        }

        let mut moved = false;

        if input.wants_translation() {
            let step = self.speed * delta_time * if input.boost { 2.0 } else { 1.0 };
            if input.forward {
                self.position += self.forward * step;
                moved = true;
            } else if input.back {
                self.position -= self.forward * step;
                moved = true;
            }
            if input.right {
                self.position += right * step;
                moved = true;
            } else if input.left {
                self.position -= right * step;
                moved = true;
            }
            if input.up {
                self.position += up * step;
                moved = true;
            } else if input.down {
                self.position -= up * step;
                moved = true;
            }
        }

        if input.rotate && input.mouse_delta != Vec2::ZERO {
            let pitch_delta = input.mouse_delta.y * ROTATION_SPEED;
            let yaw_delta = input.mouse_delta.x * ROTATION_SPEED;

            let rotation = (Quat::from_axis_angle(right, -pitch_delta)
                * Quat::from_axis_angle(up, -yaw_delta))
            .normalize();
            self.forward = (rotation * self.forward).normalize();

            moved = true;
        }

        if moved {
            self.recalculate_view();
            self.recalculate_ray_directions();
        }

        moved
    }

    /// Resize the viewport, rebuilding projection and the ray cache.
    ///
    /// A call with unchanged dimensions is a no-op.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == self.viewport_width && height == self.viewport_height {
            return;
        }

        self.viewport_width = width;
        self.viewport_height = height;

        self.recalculate_projection();
        self.recalculate_ray_directions();
    }

    /// World-space camera position (the origin of every primary ray).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Cached world-space unit ray direction for a pixel, by row-major
    /// pixel index. O(1); never recomputed at render time.
    #[inline]
    pub fn ray_direction(&self, pixel_index: usize) -> Vec3 {
        self.ray_directions[pixel_index]
    }

    /// The whole ray-direction cache.
    pub fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    fn recalculate_projection(&mut self) {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return;
        }

        let aspect = self.viewport_width as f32 / self.viewport_height as f32;
        self.projection = Mat4::perspective_rh(
            self.vertical_fov.to_radians(),
            aspect,
            self.near_clip,
            self.far_clip,
        );
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, Vec3::Y);
        self.inverse_view = self.view.inverse();
    }

    /// Un-project every pixel's NDC coordinate through the inverse
    /// projection and inverse view into a world-space unit direction.
    fn recalculate_ray_directions(&mut self) {
        let width = self.viewport_width as usize;
        let height = self.viewport_height as usize;

        self.ray_directions.clear();
        if width == 0 || height == 0 {
            return;
        }

        log::debug!("rebuilding ray cache for {}x{} viewport", width, height);
        self.ray_directions.reserve(width * height);

        for y in 0..height {
            for x in 0..width {
                // Pixel center in normalized device coordinates (-1..1)
                let coord = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                ) * 2.0
                    - Vec2::ONE;

                let target = self.inverse_projection * Vec4::new(coord.x, -coord.y, 1.0, 1.0);
                let view_direction = (target.xyz() / target.w).normalize();
                let direction = (self.inverse_view * view_direction.extend(0.0)).xyz();

                self.ray_directions.push(direction);
            }
        }
    }
}
