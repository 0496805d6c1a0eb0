//! 4x4 matrices, row-major storage, row-vector convention.
//!
//! Contract:
//! - A row vector is transformed as `v' = v * M`; transforms compose
//!   left-to-right (`v * S * R * T` scales, then rotates, then translates).
//! - Consumers that want column-vector math read through `transposed()` or
//!   an accessor's `transpose` flag; internal storage never changes.
//! - `inverted()` of a singular matrix yields the identity, not an error.
//!   Use `try_inverted()` when singularity must be reported.

use std::ops::{Index, IndexMut, Mul, MulAssign};

use thiserror::Error;

use super::scalar::Real;
use super::vector::Vector3;

/// Inversion was requested for a matrix with no inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("matrix is singular and cannot be inverted")]
pub struct SingularMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4<T> {
    m: [[T; 4]; 4],
}

impl<T: Real> Matrix4x4<T> {
    pub fn identity() -> Self {
        let mut m = [[T::ZERO; 4]; 4];
        for i in 0..4 {
            m[i][i] = T::ONE;
        }
        Self { m }
    }

    pub fn from_rows(rows: [[T; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Raw row-major layout. A column-vector-convention consumer reading this
    /// memory column-major sees the transposed (i.e. its own) matrix.
    pub fn to_array(self) -> [[T; 4]; 4] {
        self.m
    }

    pub fn from_scale(scale: Vector3<T>) -> Self {
        let mut n = Self::identity();
        n.m[0][0] = scale.x;
        n.m[1][1] = scale.y;
        n.m[2][2] = scale.z;
        n
    }

    pub fn from_translation(translation: Vector3<T>) -> Self {
        let mut n = Self::identity();
        n.m[3][0] = translation.x;
        n.m[3][1] = translation.y;
        n.m[3][2] = translation.z;
        n
    }

    pub fn from_rotation_x(theta: T) -> Self {
        let (sin, cos) = (theta.sin(), theta.cos());
        Self::from_rows([
            [T::ONE, T::ZERO, T::ZERO, T::ZERO],
            [T::ZERO, cos, sin, T::ZERO],
            [T::ZERO, -sin, cos, T::ZERO],
            [T::ZERO, T::ZERO, T::ZERO, T::ONE],
        ])
    }

    pub fn from_rotation_y(theta: T) -> Self {
        let (sin, cos) = (theta.sin(), theta.cos());
        Self::from_rows([
            [cos, T::ZERO, -sin, T::ZERO],
            [T::ZERO, T::ONE, T::ZERO, T::ZERO],
            [sin, T::ZERO, cos, T::ZERO],
            [T::ZERO, T::ZERO, T::ZERO, T::ONE],
        ])
    }

    pub fn from_rotation_z(theta: T) -> Self {
        let (sin, cos) = (theta.sin(), theta.cos());
        Self::from_rows([
            [cos, sin, T::ZERO, T::ZERO],
            [-sin, cos, T::ZERO, T::ZERO],
            [T::ZERO, T::ZERO, T::ONE, T::ZERO],
            [T::ZERO, T::ZERO, T::ZERO, T::ONE],
        ])
    }

    pub fn multiply(a: &Self, b: &Self) -> Self {
        let mut out = [[T::ZERO; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                out[i][j] = a.m[i][0] * b.m[0][j]
                    + a.m[i][1] * b.m[1][j]
                    + a.m[i][2] * b.m[2][j]
                    + a.m[i][3] * b.m[3][j];
            }
        }
        Self { m: out }
    }

    pub fn transposed(&self) -> Self {
        let mut out = [[T::ZERO; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                out[i][j] = self.m[j][i];
            }
        }
        Self { m: out }
    }

    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Gauss-Jordan inversion with partial pivoting on columns 0..3, paired
    /// row reduction against an identity, back-substitution from row 3 up.
    pub fn try_inverted(&self) -> Result<Self, SingularMatrix> {
        let mut t = *self;
        let mut s = Self::identity();

        // Forward elimination.
        for i in 0..3 {
            let mut pivot = i;
            let mut pivot_size = t.m[i][i].abs();

            for j in (i + 1)..4 {
                let tmp = t.m[j][i].abs();
                if tmp > pivot_size {
                    pivot = j;
                    pivot_size = tmp;
                }
            }

            if pivot_size == T::ZERO {
                return Err(SingularMatrix);
            }

            if pivot != i {
                t.m.swap(i, pivot);
                s.m.swap(i, pivot);
            }

            for j in (i + 1)..4 {
                let f = t.m[j][i] / t.m[i][i];
                for k in 0..4 {
                    t.m[j][k] = t.m[j][k] - f * t.m[i][k];
                    s.m[j][k] = s.m[j][k] - f * s.m[i][k];
                }
            }
        }

        // Backward substitution.
        for i in (0..4).rev() {
            let f = t.m[i][i];
            if f == T::ZERO {
                return Err(SingularMatrix);
            }

            for j in 0..4 {
                t.m[i][j] = t.m[i][j] / f;
                s.m[i][j] = s.m[i][j] / f;
            }

            for j in 0..i {
                let f = t.m[j][i];
                for k in 0..4 {
                    t.m[j][k] = t.m[j][k] - f * t.m[i][k];
                    s.m[j][k] = s.m[j][k] - f * s.m[i][k];
                }
            }
        }

        Ok(s)
    }

    /// Inverse, or the identity when the matrix is singular. The transform
    /// and camera derivations rely on this never failing loudly.
    pub fn inverted(&self) -> Self {
        self.try_inverted().unwrap_or_else(|_| Self::identity())
    }

    pub fn invert(&mut self) {
        *self = self.inverted();
    }

    /// Affine transform of a direction: ignores the translation row.
    pub fn transform_direction(&self, v: Vector3<T>) -> Vector3<T> {
        Vector3::new(
            v.x * self.m[0][0] + v.y * self.m[1][0] + v.z * self.m[2][0],
            v.x * self.m[0][1] + v.y * self.m[1][1] + v.z * self.m[2][1],
            v.x * self.m[0][2] + v.y * self.m[1][2] + v.z * self.m[2][2],
        )
    }

    /// Full transform of a point, with the homogeneous divide. A resulting
    /// `w` of exactly zero skips the divide instead of producing infinities.
    pub fn transform_point(&self, v: Vector3<T>) -> Vector3<T> {
        let mut n = Vector3::new(
            v.x * self.m[0][0] + v.y * self.m[1][0] + v.z * self.m[2][0] + self.m[3][0],
            v.x * self.m[0][1] + v.y * self.m[1][1] + v.z * self.m[2][1] + self.m[3][1],
            v.x * self.m[0][2] + v.y * self.m[1][2] + v.z * self.m[2][2] + self.m[3][2],
        );
        let w = v.x * self.m[0][3] + v.y * self.m[1][3] + v.z * self.m[2][3] + self.m[3][3];

        if w != T::ZERO {
            n /= w;
        }

        n
    }
}

impl<T: Real> Default for Matrix4x4<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Index<usize> for Matrix4x4<T> {
    type Output = [T; 4];

    fn index(&self, row: usize) -> &[T; 4] {
        &self.m[row]
    }
}

impl<T> IndexMut<usize> for Matrix4x4<T> {
    fn index_mut(&mut self, row: usize) -> &mut [T; 4] {
        &mut self.m[row]
    }
}

impl<T: Real> Mul for Matrix4x4<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::multiply(&self, &rhs)
    }
}

impl<T: Real> MulAssign for Matrix4x4<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Self::multiply(self, &rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &Matrix4x4<f32>, b: &Matrix4x4<f32>, eps: f32) -> bool {
        (0..4).all(|i| (0..4).all(|j| (a[i][j] - b[i][j]).abs() < eps))
    }

    #[test]
    fn identity_is_multiplicative_neutral() {
        let m = Matrix4x4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);

        assert_eq!(m * Matrix4x4::identity(), m);
        assert_eq!(Matrix4x4::identity() * m, m);
    }

    #[test]
    fn composition_applies_left_to_right() {
        let t = Matrix4x4::from_translation(Vector3::new(1.0f32, 2.0, 3.0));
        let s = Matrix4x4::from_scale(Vector3::new(2.0f32, 2.0, 2.0));

        // Translate then scale: the translation is scaled too.
        let m = t * s;
        assert_eq!(m[3][0], 2.0);
        assert_eq!(m[3][1], 4.0);
        assert_eq!(m[3][2], 6.0);

        // Scale then translate: it is not.
        let m = s * t;
        assert_eq!(m[3][0], 1.0);
        assert_eq!(m[3][1], 2.0);
        assert_eq!(m[3][2], 3.0);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Matrix4x4::from_translation(Vector3::new(1.0f32, 2.0, 3.0));
        let t = m.transposed();

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m[i][j], t[j][i]);
            }
        }
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn inversion_round_trips_an_affine_transform() {
        let m = Matrix4x4::from_scale(Vector3::new(1.5f32, 2.0, 0.5))
            * Matrix4x4::from_rotation_x(30.0f32.to_radians())
            * Matrix4x4::from_rotation_y(45.0f32.to_radians())
            * Matrix4x4::from_rotation_z(60.0f32.to_radians())
            * Matrix4x4::from_translation(Vector3::new(1.0f32, -2.0, 3.0));

        let round_trip = m * m.inverted();
        assert!(approx_eq(&round_trip, &Matrix4x4::identity(), 1e-4));
    }

    #[test]
    fn singular_matrix_inverts_to_exact_identity() {
        // Zero column: no pivot candidate anywhere in column 0.
        let singular = Matrix4x4::from_scale(Vector3::new(0.0f32, 1.0, 1.0));

        assert_eq!(singular.try_inverted(), Err(SingularMatrix));
        assert_eq!(singular.inverted(), Matrix4x4::identity());
    }

    #[test]
    fn transform_point_applies_translation_and_divide() {
        let t = Matrix4x4::from_translation(Vector3::new(1.0f32, 2.0, 3.0));
        assert_eq!(
            t.transform_point(Vector3::new(1.0, 1.0, 1.0)),
            Vector3::new(2.0, 3.0, 4.0)
        );

        let mut scaled_w = Matrix4x4::identity();
        scaled_w[3][3] = 2.0;
        assert_eq!(
            scaled_w.transform_point(Vector3::new(1.0, 1.0, 1.0)),
            Vector3::new(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn transform_point_skips_divide_on_zero_w() {
        let mut m = Matrix4x4::identity();
        m[3][3] = 0.0;

        let p = m.transform_point(Vector3::new(1.0f32, 2.0, 3.0));
        assert_eq!(p, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn transform_direction_ignores_translation() {
        let t = Matrix4x4::from_translation(Vector3::new(5.0f32, 5.0, 5.0));
        assert_eq!(
            t.transform_direction(Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(1.0, 2.0, 3.0)
        );

        let r = Matrix4x4::from_rotation_y(90.0f32.to_radians());
        let d = r.transform_direction(Vector3::new(1.0, 0.0, 0.0));
        assert!((d.x - 0.0).abs() < 1e-6);
        assert!((d.z - -1.0).abs() < 1e-6);
    }
}
