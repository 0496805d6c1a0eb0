//! Lens-driven camera.
//!
//! The projection is derived from physical parameters: focal length in
//! millimeters, sensor aperture in inches, output resolution in pixels, and
//! the clip planes. `fov_x`, `f_length` and the horizontal aperture stay
//! mutually consistent; exactly one of fov/focal-length drives per setter
//! call and the other is recomputed.
//!
//! Every setter funnels through `on_property_change`, which recomputes the
//! canvas plane (near-plane extents in camera space) before the projection
//! matrix that is built from it.

use crate::engine::math::{Matrix4x4, Rect, Vector2};
use crate::engine::transform::Transform;

/// Inches to millimeters, for the aperture/focal-length math.
const INCH_TO_MM: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

/// How a sensor/output aspect-ratio mismatch is reconciled.
///
/// `Fill` crops the sensor frame to cover the output; `Fit` letterboxes so
/// the whole frame stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingPolicy {
    Fill,
    Fit,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: Transform,
    f_length: f32,
    fov_x: f32,
    aperture: Vector2<f32>,
    resolution: (u32, u32),
    z_near: f32,
    z_far: f32,
    mode: ProjectionMode,
    scaling: ScalingPolicy,
    canvas_plane: Rect<f32>,
    projection_matrix: Matrix4x4<f32>,
}

impl Camera {
    /// 35mm-equivalent defaults: 0.980 x 0.735 inch aperture, 800x600,
    /// near 0.01, far 1000, perspective, fill.
    pub fn new() -> Self {
        Self::with_parameters(
            35.0,
            Vector2::new(0.980, 0.735),
            (800, 600),
            0.01,
            1000.0,
            ProjectionMode::Perspective,
            ScalingPolicy::Fill,
        )
    }

    pub fn with_parameters(
        f_length: f32,
        aperture: Vector2<f32>,
        resolution: (u32, u32),
        z_near: f32,
        z_far: f32,
        mode: ProjectionMode,
        scaling: ScalingPolicy,
    ) -> Self {
        let mut camera = Self {
            transform: Transform::new(),
            f_length,
            fov_x: fov_for_length(f_length, aperture.x),
            aperture,
            resolution,
            z_near,
            z_far,
            mode,
            scaling,
            canvas_plane: Rect::default(),
            projection_matrix: Matrix4x4::identity(),
        };
        camera.on_property_change();
        camera
    }

    /// Focal length in millimeters.
    pub fn f_length(&self) -> f32 {
        self.f_length
    }

    /// Horizontal field of view in degrees.
    pub fn fov_x(&self) -> f32 {
        self.fov_x
    }

    /// Sensor size in inches.
    pub fn aperture(&self) -> Vector2<f32> {
        self.aperture
    }

    /// Output size in pixels.
    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn scaling(&self) -> ScalingPolicy {
        self.scaling
    }

    /// Near-plane extents in camera space, before the aspect scalars.
    pub fn canvas_plane(&self) -> Rect<f32> {
        self.canvas_plane
    }

    pub fn film_aspect_ratio(&self) -> f32 {
        self.aperture.x / self.aperture.y
    }

    pub fn pixel_aspect_ratio(&self) -> f32 {
        self.resolution.0 as f32 / self.resolution.1 as f32
    }

    pub fn camera_to_world(&self, transpose: bool) -> Matrix4x4<f32> {
        self.transform.local_to_world(transpose)
    }

    pub fn world_to_camera(&self, transpose: bool) -> Matrix4x4<f32> {
        self.transform.world_to_local(transpose)
    }

    pub fn projection_matrix(&self, transpose: bool) -> Matrix4x4<f32> {
        if transpose {
            self.projection_matrix.transposed()
        } else {
            self.projection_matrix
        }
    }

    pub fn set_f_length(&mut self, f_length: f32) {
        self.f_length = f_length;
        self.fov_x = fov_for_length(f_length, self.aperture.x);
        self.on_property_change();
    }

    pub fn set_fov(&mut self, fov_x: f32) {
        self.fov_x = fov_x;
        self.f_length = length_for_fov(fov_x, self.aperture.x);
        self.on_property_change();
    }

    /// New sensor size in inches; the focal length is recomputed so the
    /// current field of view is preserved.
    pub fn set_aperture(&mut self, x: f32, y: f32) {
        self.aperture = Vector2::new(x, y);
        self.f_length = length_for_fov(self.fov_x, self.aperture.x);
        self.on_property_change();
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = (width, height);
        self.on_property_change();
    }

    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) {
        self.z_near = z_near;
        self.z_far = z_far;
        self.on_property_change();
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
        self.on_property_change();
    }

    pub fn set_scaling(&mut self, scaling: ScalingPolicy) {
        self.scaling = scaling;
        self.on_property_change();
    }

    /// Per-axis canvas-plane scalars under the active policy. (1, 1) when
    /// the sensor and output aspect ratios already agree.
    pub fn aspect_scalars(&self) -> (f32, f32) {
        let film_ratio = self.film_aspect_ratio();
        let pixel_ratio = self.pixel_aspect_ratio();

        match self.scaling {
            ScalingPolicy::Fill => {
                if film_ratio > pixel_ratio {
                    (pixel_ratio / film_ratio, 1.0)
                } else {
                    (1.0, film_ratio / pixel_ratio)
                }
            }
            ScalingPolicy::Fit => {
                if film_ratio > pixel_ratio {
                    (1.0, film_ratio / pixel_ratio)
                } else {
                    (pixel_ratio / film_ratio, 1.0)
                }
            }
        }
    }

    fn on_property_change(&mut self) {
        self.calculate_canvas_plane();
        self.refresh_projection_matrix();
    }

    fn calculate_canvas_plane(&mut self) {
        let right = (self.aperture.x * INCH_TO_MM / 2.0) / self.f_length * self.z_near;
        let top = (self.aperture.y * INCH_TO_MM / 2.0) / self.f_length * self.z_near;

        self.canvas_plane = Rect::new(top, right, -top, -right);
    }

    fn refresh_projection_matrix(&mut self) {
        self.projection_matrix = match self.mode {
            ProjectionMode::Perspective => self.perspective_projection(),
            ProjectionMode::Orthographic => self.orthographic_projection(),
        };
    }

    fn scaled_canvas_bounds(&self) -> (f32, f32, f32, f32) {
        let (x_scalar, y_scalar) = self.aspect_scalars();

        (
            self.canvas_plane.top * y_scalar,
            self.canvas_plane.right * x_scalar,
            self.canvas_plane.bottom * y_scalar,
            self.canvas_plane.left * x_scalar,
        )
    }

    fn perspective_projection(&self) -> Matrix4x4<f32> {
        let (t, r, b, l) = self.scaled_canvas_bounds();
        let (zn, zf) = (self.z_near, self.z_far);

        Matrix4x4::from_rows([
            [2.0 * zn / (r - l), 0.0, 0.0, 0.0],
            [0.0, 2.0 * zn / (t - b), 0.0, 0.0],
            [
                (r + l) / (r - l),
                (t + b) / (t - b),
                -((zf + zn) / (zf - zn)),
                -1.0,
            ],
            [0.0, 0.0, -(2.0 * zf * zn / (zf - zn)), 0.0],
        ])
    }

    /// Off-center orthographic over the same scaled canvas bounds, mapping
    /// depth to [-1, 1] like the perspective path.
    fn orthographic_projection(&self) -> Matrix4x4<f32> {
        let (t, r, b, l) = self.scaled_canvas_bounds();
        let (zn, zf) = (self.z_near, self.z_far);

        Matrix4x4::from_rows([
            [2.0 / (r - l), 0.0, 0.0, 0.0],
            [0.0, 2.0 / (t - b), 0.0, 0.0],
            [0.0, 0.0, -2.0 / (zf - zn), 0.0],
            [
                -((r + l) / (r - l)),
                -((t + b) / (t - b)),
                -((zf + zn) / (zf - zn)),
                1.0,
            ],
        ])
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn fov_for_length(f_length: f32, aperture_x: f32) -> f32 {
    (2.0 * ((aperture_x * INCH_TO_MM / 2.0) / f_length).atan()).to_degrees()
}

fn length_for_fov(fov_x: f32, aperture_x: f32) -> f32 {
    (aperture_x * INCH_TO_MM / 2.0) / (fov_x.to_radians() / 2.0).tan()
}
