//! Scene-graph-free transform: position, Euler rotation, scale.
//!
//! Contract:
//! - `world_to_local` is always the inverse of `local_to_world`; both are
//!   rebuilt synchronously inside every mutator, never deferred.
//! - Rotation is in degrees and applies X, then Y, then Z.
//! - Rebuild order: scale, rotations (an axis at exactly 0.0 skips its
//!   multiply), then the position overwrites the translation row.

use crate::engine::math::{Matrix4x4, Vector3};

/// Gimbal-lock guard for the Euler extraction.
const EULER_LOCK_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
    local_to_world: Matrix4x4<f32>,
    world_to_local: Matrix4x4<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self::from_parts(Vector3::zero(), Vector3::zero(), Vector3::one())
    }

    pub fn from_parts(
        position: Vector3<f32>,
        rotation: Vector3<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            local_to_world: Matrix4x4::identity(),
            world_to_local: Matrix4x4::identity(),
        };
        transform.refresh_local_matrices();
        transform
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Euler angles in degrees, applied X then Y then Z.
    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn local_to_world(&self, transpose: bool) -> Matrix4x4<f32> {
        if transpose {
            self.local_to_world.transposed()
        } else {
            self.local_to_world
        }
    }

    pub fn world_to_local(&self, transpose: bool) -> Matrix4x4<f32> {
        if transpose {
            self.world_to_local.transposed()
        } else {
            self.world_to_local
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.refresh_local_matrices();
    }

    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = rotation;
        self.refresh_local_matrices();
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.refresh_local_matrices();
    }

    pub fn translate(&mut self, delta_x: f32, delta_y: f32, delta_z: f32) {
        self.position.x += delta_x;
        self.position.y += delta_y;
        self.position.z += delta_z;
        self.refresh_local_matrices();
    }

    /// Relative rotation, degrees per axis.
    pub fn rotate(&mut self, theta_x: f32, theta_y: f32, theta_z: f32) {
        self.rotation.x += theta_x;
        self.rotation.y += theta_y;
        self.rotation.z += theta_z;
        self.refresh_local_matrices();
    }

    /// Relative scale, multiplied component-wise.
    pub fn scale_by(&mut self, scale_x: f32, scale_y: f32, scale_z: f32) {
        self.scale.x *= scale_x;
        self.scale.y *= scale_y;
        self.scale.z *= scale_z;
        self.refresh_local_matrices();
    }

    /// Aim at `target`: builds a camera-style orthonormal basis whose third
    /// axis points from the target toward this position (so a -Z-forward
    /// camera looks at the target), converts it back to Euler angles, and
    /// replaces the rotation. Position is untouched. Returns the basis
    /// matrix that was solved.
    pub fn look_at(&mut self, target: Vector3<f32>, world_up: Vector3<f32>) -> Matrix4x4<f32> {
        let mut z_axis = self.position - target;
        z_axis.normalize();

        let mut up = world_up;
        up.normalize();

        let x_axis = Vector3::cross(up, z_axis);
        let y_axis = Vector3::cross(z_axis, x_axis);

        let look_at_matrix = Matrix4x4::from_rows([
            [x_axis.x, x_axis.y, x_axis.z, 0.0],
            [y_axis.x, y_axis.y, y_axis.z, 0.0],
            [z_axis.x, z_axis.y, z_axis.z, 0.0],
            [self.position.x, self.position.y, self.position.z, 1.0],
        ]);

        self.set_rotation(Self::rotation_matrix_to_euler(&look_at_matrix));

        look_at_matrix
    }

    /// Back-derive X/Y/Z Euler angles (degrees) from a rotation matrix.
    ///
    /// Near pitch = ±90° (`cos` under `EULER_LOCK_EPSILON`) yaw and roll
    /// collapse into one degree of freedom; yaw is forced to 0 and roll
    /// absorbs the remainder.
    pub fn rotation_matrix_to_euler(mat: &Matrix4x4<f32>) -> Vector3<f32> {
        let x = (-mat[2][1]).asin();

        let (y, z) = if x.cos() > EULER_LOCK_EPSILON {
            (mat[2][0].atan2(mat[2][2]), mat[0][1].atan2(mat[1][1]))
        } else {
            (0.0, (-mat[1][0]).atan2(mat[0][0]))
        };

        Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    fn refresh_local_matrices(&mut self) {
        let mut local_to_world = Matrix4x4::from_scale(self.scale);

        if self.rotation.x != 0.0 {
            local_to_world *= Matrix4x4::from_rotation_x(self.rotation.x.to_radians());
        }
        if self.rotation.y != 0.0 {
            local_to_world *= Matrix4x4::from_rotation_y(self.rotation.y.to_radians());
        }
        if self.rotation.z != 0.0 {
            local_to_world *= Matrix4x4::from_rotation_z(self.rotation.z.to_radians());
        }

        local_to_world[3][0] = self.position.x;
        local_to_world[3][1] = self.position.y;
        local_to_world[3][2] = self.position.z;

        self.local_to_world = local_to_world;
        self.world_to_local = local_to_world.inverted();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &Matrix4x4<f32>, b: &Matrix4x4<f32>, eps: f32) -> bool {
        (0..4).all(|i| (0..4).all(|j| (a[i][j] - b[i][j]).abs() < eps))
    }

    #[test]
    fn default_transform_is_identity() {
        let t = Transform::new();

        assert_eq!(t.local_to_world(false), Matrix4x4::identity());
        assert_eq!(t.world_to_local(false), Matrix4x4::identity());
    }

    #[test]
    fn matrices_round_trip_to_identity() {
        let t = Transform::from_parts(
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(30.0, 45.0, 60.0),
            Vector3::new(1.5, 2.0, 0.5),
        );

        let round_trip = t.local_to_world(false) * t.world_to_local(false);
        assert!(approx_eq(&round_trip, &Matrix4x4::identity(), 1e-4));
    }

    #[test]
    fn zero_rotation_equals_pure_scale() {
        let position = Vector3::new(4.0, 5.0, 6.0);
        let scale = Vector3::new(2.0, 3.0, 4.0);
        let t = Transform::from_parts(position, Vector3::zero(), scale);

        let mut expected = Matrix4x4::from_scale(scale);
        expected[3][0] = position.x;
        expected[3][1] = position.y;
        expected[3][2] = position.z;

        assert_eq!(t.local_to_world(false), expected);

        // The skipped multiplies change nothing: the general composition
        // evaluated at angle 0 is the same matrix.
        let composed = Matrix4x4::from_scale(scale)
            * Matrix4x4::from_rotation_x(0.0)
            * Matrix4x4::from_rotation_y(0.0)
            * Matrix4x4::from_rotation_z(0.0);
        let mut composed = composed;
        composed[3][0] = position.x;
        composed[3][1] = position.y;
        composed[3][2] = position.z;

        assert_eq!(t.local_to_world(false), composed);
    }

    #[test]
    fn relative_mutators_accumulate() {
        let mut t = Transform::new();

        t.translate(1.0, 0.0, 0.0);
        t.translate(0.5, 2.0, -1.0);
        assert_eq!(t.position(), Vector3::new(1.5, 2.0, -1.0));

        t.rotate(0.0, 90.0, 0.0);
        t.rotate(0.0, 90.0, 0.0);
        assert_eq!(t.rotation(), Vector3::new(0.0, 180.0, 0.0));

        t.scale_by(2.0, 2.0, 2.0);
        t.scale_by(0.5, 1.0, 2.0);
        assert_eq!(t.scale(), Vector3::new(1.0, 2.0, 4.0));
    }

    #[test]
    fn translation_lands_in_row_three() {
        let mut t = Transform::new();
        t.set_position(Vector3::new(1.0, 2.0, 3.0));

        let m = t.local_to_world(false);
        assert_eq!([m[3][0], m[3][1], m[3][2], m[3][3]], [1.0, 2.0, 3.0, 1.0]);

        let inv = t.world_to_local(false);
        assert_eq!(
            [inv[3][0], inv[3][1], inv[3][2]],
            [-1.0, -2.0, -3.0]
        );
    }

    #[test]
    fn transpose_flag_transposes() {
        let t = Transform::from_parts(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(10.0, 20.0, 30.0),
            Vector3::one(),
        );

        assert_eq!(t.local_to_world(true), t.local_to_world(false).transposed());
        assert_eq!(t.world_to_local(true), t.world_to_local(false).transposed());
    }

    #[test]
    fn look_at_reproduces_the_forward_axis() {
        let mut t = Transform::new();
        t.set_position(Vector3::new(2.5, 2.3, 3.5));

        let target = Vector3::new(0.0, 0.8, 0.0);
        t.look_at(target, Vector3::unit_y());

        // Position must be untouched, rotation fully replaced.
        assert_eq!(t.position(), Vector3::new(2.5, 2.3, 3.5));

        // Rebuilding the matrix from the solved Euler angles must reproduce
        // the basis: row 2 is the axis pointing away from the target.
        let forward = (t.position() - target).normalized();
        let m = t.local_to_world(false);

        assert!((m[2][0] - forward.x).abs() < 1e-4);
        assert!((m[2][1] - forward.y).abs() < 1e-4);
        assert!((m[2][2] - forward.z).abs() < 1e-4);
    }

    #[test]
    fn euler_extraction_handles_gimbal_lock() {
        // Pitch of exactly 90 degrees collapses yaw and roll.
        let locked = Matrix4x4::from_rotation_x(90.0f32.to_radians());
        let euler = Transform::rotation_matrix_to_euler(&locked);

        assert!((euler.x - 90.0).abs() < 1e-3);
        assert_eq!(euler.y, 0.0);
        assert!(euler.z.abs() < 1e-3);
    }

    #[test]
    fn euler_extraction_recovers_angles_from_a_roll_first_basis() {
        // The extraction reads pitch from m[2][1], so it inverts a basis
        // composed roll, then pitch, then yaw. Look-at bases are roll-free,
        // which is where extraction and the X-Y-Z rebuild meet exactly.
        let m = Matrix4x4::from_rotation_z(75.0f32.to_radians())
            * Matrix4x4::from_rotation_x(20.0f32.to_radians())
            * Matrix4x4::from_rotation_y(-40.0f32.to_radians());

        let euler = Transform::rotation_matrix_to_euler(&m);

        assert!((euler.x - 20.0).abs() < 1e-3);
        assert!((euler.y - -40.0).abs() < 1e-3);
        assert!((euler.z - 75.0).abs() < 1e-3);
    }
}
