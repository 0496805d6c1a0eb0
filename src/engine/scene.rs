//! Viewer scene state: one model transform, one camera, one overlay panel.

use crate::engine::camera::Camera;
use crate::engine::transform::Transform;
use crate::engine::ui::TransformPanel;

pub struct Scene {
    pub model: Transform,
    pub camera: Camera,
    pub panel: TransformPanel,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        let model = Transform::new();
        let mut panel = TransformPanel::new();
        panel.sync_from(&model);

        Self {
            model,
            camera,
            panel,
        }
    }

    /// Per-frame step: the turntable spins the model around Y at the panel's
    /// speed, and the panel mirrors the result.
    pub fn update(&mut self, dt_sec: f32) {
        if self.panel.turn_around {
            self.model.rotate(0.0, self.panel.turn_speed * dt_sec, 0.0);
            self.panel.sync_from(&self.model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::math::Vector3;

    #[test]
    fn update_spins_the_turntable() {
        let mut scene = Scene::new(Camera::new());
        scene.panel.turn_speed = 15.0;

        scene.update(2.0);

        assert_eq!(scene.model.rotation(), Vector3::new(0.0, 30.0, 0.0));
        // The panel mirrors the model.
        assert_eq!(scene.panel.rotation, Vector3::new(0.0, 30.0, 0.0));
    }

    #[test]
    fn update_is_inert_when_the_turntable_is_off() {
        let mut scene = Scene::new(Camera::new());
        scene.panel.turn_around = false;

        scene.update(2.0);

        assert_eq!(scene.model.rotation(), Vector3::zero());
    }
}
