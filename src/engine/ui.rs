//! Transform panel overlay.
//!
//! The panel owns its widget values and exchanges them with the scene's
//! Transform through its public setters, so a widget toolkit only has to
//! render these fields and call `apply_to` on edit. No process-wide state.

use crate::engine::math::Vector3;
use crate::engine::transform::Transform;

#[derive(Debug, Clone)]
pub struct TransformPanel {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,

    /// Spin the model around Y every frame.
    pub turn_around: bool,
    /// Turntable speed in degrees per second.
    pub turn_speed: f32,
}

impl TransformPanel {
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::one(),
            turn_around: true,
            turn_speed: 15.0,
        }
    }

    /// Refresh the widget values after the transform changed elsewhere.
    pub fn sync_from(&mut self, transform: &Transform) {
        self.position = transform.position();
        self.rotation = transform.rotation();
        self.scale = transform.scale();
    }

    /// Push the widget values into the transform.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.set_position(self.position);
        transform.set_rotation(self.rotation);
        transform.set_scale(self.scale);
    }
}

impl Default for TransformPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_drives_the_transform_through_its_setters() {
        let mut panel = TransformPanel::new();
        panel.position = Vector3::new(1.0, 2.0, 3.0);
        panel.rotation = Vector3::new(0.0, 45.0, 0.0);
        panel.scale = Vector3::new(2.0, 2.0, 2.0);

        let mut transform = Transform::new();
        panel.apply_to(&mut transform);

        assert_eq!(transform.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.rotation(), Vector3::new(0.0, 45.0, 0.0));
        assert_eq!(transform.scale(), Vector3::new(2.0, 2.0, 2.0));

        // Derived state is already rebuilt.
        let m = transform.local_to_world(false);
        assert_eq!([m[3][0], m[3][1], m[3][2]], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn sync_reads_back_external_mutations() {
        let mut transform = Transform::new();
        transform.translate(0.0, 1.0, 0.0);
        transform.rotate(0.0, 30.0, 0.0);

        let mut panel = TransformPanel::new();
        panel.sync_from(&transform);

        assert_eq!(panel.position, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(panel.rotation, Vector3::new(0.0, 30.0, 0.0));
        assert_eq!(panel.scale, Vector3::one());
    }
}
