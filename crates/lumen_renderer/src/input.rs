//! Host-supplied input snapshot for camera movement.
//!
//! The windowing layer is out of scope for this crate, so instead of
//! reading a keyboard or mouse directly the camera consumes a plain
//! snapshot the host fills once per frame from whatever event system it
//! uses.

use lumen_math::Vec2;

/// One frame of navigation input.
///
/// Key fields are "held this frame" booleans; `mouse_delta` is the cursor
/// movement since the previous frame in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// Move along the view direction (W)
    pub forward: bool,
    /// Move against the view direction (S)
    pub back: bool,
    /// Strafe left (A)
    pub left: bool,
    /// Strafe right (D)
    pub right: bool,
    /// Move up along world Y (E)
    pub up: bool,
    /// Move down along world Y (Q)
    pub down: bool,

    /// Look button held (typically right mouse button); mouse deltas only
    /// rotate the camera while this is true
    pub rotate: bool,
    /// Speed modifier held (typically shift)
    pub boost: bool,

    /// Cursor movement since last frame, in pixels
    pub mouse_delta: Vec2,
    /// Scroll wheel movement since last frame; adjusts movement speed
    pub scroll_delta: f32,
}

impl CameraInput {
    /// True if any translation key is held.
    pub fn wants_translation(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.up || self.down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let input = CameraInput::default();
        assert!(!input.wants_translation());
        assert_eq!(input.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn test_wants_translation() {
        let input = CameraInput {
            back: true,
            ..Default::default()
        };
        assert!(input.wants_translation());
    }
}
