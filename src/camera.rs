use glam::{Mat4, Vec3};

/// Multiplier applied to the field of view per zoom step.
pub const ZOOM_FACTOR: f32 = 1.1;
/// Zooming out never reaches this field of view.
pub const MAX_FOVY_DEGREES: f32 = 180.0;
/// Zooming in stops here instead of degenerating towards zero.
pub const MIN_FOVY_DEGREES: f32 = 0.1;

/// A look-at camera with a perspective projection.
///
/// The projection targets wgpu clip space (depth in `0..1`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 90.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.eye = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.target = Vec3::new(x, y, z);
        self
    }

    pub fn with_fov(mut self, fovy_degrees: f32) -> Self {
        self.fovy = fovy_degrees;
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Updates the aspect ratio from a framebuffer size. A zero height counts as 1.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.near, self.far)
    }

    /// Narrows the field of view by [`ZOOM_FACTOR`].
    ///
    /// Returns `false` and leaves the camera untouched if the result would drop
    /// below [`MIN_FOVY_DEGREES`].
    pub fn zoom_in(&mut self) -> bool {
        let fovy = self.fovy / ZOOM_FACTOR;
        if fovy < MIN_FOVY_DEGREES {
            return false;
        }
        self.fovy = fovy;
        true
    }

    /// Widens the field of view by [`ZOOM_FACTOR`] as long as it stays below
    /// [`MAX_FOVY_DEGREES`].
    pub fn zoom_out(&mut self) -> bool {
        let fovy = self.fovy * ZOOM_FACTOR;
        if fovy >= MAX_FOVY_DEGREES {
            return false;
        }
        self.fovy = fovy;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_out_never_reaches_180() {
        let mut camera = Camera::new().with_fov(25.0);
        for _ in 0..200 {
            camera.zoom_out();
            assert!(camera.fovy < MAX_FOVY_DEGREES);
        }
        // Saturated: one more step would cross the ceiling.
        assert!(camera.fovy * ZOOM_FACTOR >= MAX_FOVY_DEGREES);
        assert!(!camera.zoom_out());
    }

    #[test]
    fn zoom_in_stays_positive() {
        let mut camera = Camera::new().with_fov(25.0);
        for _ in 0..10_000 {
            camera.zoom_in();
        }
        assert!(camera.fovy >= MIN_FOVY_DEGREES);
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn zoom_steps_are_reversible() {
        let mut camera = Camera::new().with_fov(25.0);
        assert!(camera.zoom_in());
        assert!(camera.zoom_out());
        assert!((camera.fovy - 25.0).abs() < 1e-4);
    }

    #[test]
    fn viewport_with_zero_height_keeps_aspect_finite() {
        let mut camera = Camera::new();
        camera.set_viewport(800, 0);
        assert_eq!(camera.aspect, 800.0);
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let camera = Camera::new().at(0.0, 0.0, 8.0).looking_at(0.0, 0.0, -1.0);
        let eye = camera.view_matrix().transform_point3(camera.eye);
        assert!(eye.length() < 1e-5);
        let ahead = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((ahead - Vec3::new(0.0, 0.0, -8.0)).length() < 1e-5);
    }
}
