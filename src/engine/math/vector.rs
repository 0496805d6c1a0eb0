//! Plain 2/3-component vectors.
//!
//! Contract:
//! - No invariant beyond component count.
//! - Normalization requires a nonzero magnitude; normalizing a zero vector
//!   produces non-finite components. Callers own that check.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use super::scalar::Real;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Real> Vector2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(T::ZERO, T::ZERO)
    }

    #[inline]
    pub fn dot(a: Self, b: Self) -> T {
        a.x * b.x + a.y * b.y
    }

    #[inline]
    pub fn magnitude(self) -> T {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(self) -> Self {
        let mag = self.magnitude();
        Self::new(self.x / mag, self.y / mag)
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }
}

impl<T: Real> Default for Vector2<T> {
    fn default() -> Self {
        Self::zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Real> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(T::ZERO, T::ZERO, T::ZERO)
    }

    pub fn one() -> Self {
        Self::new(T::ONE, T::ONE, T::ONE)
    }

    pub fn unit_y() -> Self {
        Self::new(T::ZERO, T::ONE, T::ZERO)
    }

    #[inline]
    pub fn dot(a: Self, b: Self) -> T {
        a.x * b.x + a.y * b.y + a.z * b.z
    }

    /// Right-hand-rule cross product.
    #[inline]
    pub fn cross(a: Self, b: Self) -> Self {
        Self::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    }

    #[inline]
    pub fn magnitude(self) -> T {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalized(self) -> Self {
        let mag = self.magnitude();
        Self::new(self.x / mag, self.y / mag, self.z / mag)
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }
}

impl<T: Real> Default for Vector3<T> {
    fn default() -> Self {
        Self::zero()
    }
}

macro_rules! impl_vector_ops {
    ($v:ident { $($field:ident),+ }) => {
        impl<T: Real> Add for $v<T> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self::new($(self.$field + rhs.$field),+)
            }
        }

        impl<T: Real> Sub for $v<T> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self::new($(self.$field - rhs.$field),+)
            }
        }

        impl<T: Real> Mul<T> for $v<T> {
            type Output = Self;

            fn mul(self, scalar: T) -> Self {
                Self::new($(self.$field * scalar),+)
            }
        }

        impl<T: Real> Div<T> for $v<T> {
            type Output = Self;

            fn div(self, scalar: T) -> Self {
                Self::new($(self.$field / scalar),+)
            }
        }

        impl<T: Real> AddAssign for $v<T> {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field = self.$field + rhs.$field;)+
            }
        }

        impl<T: Real> SubAssign for $v<T> {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field = self.$field - rhs.$field;)+
            }
        }

        impl<T: Real> MulAssign<T> for $v<T> {
            fn mul_assign(&mut self, scalar: T) {
                $(self.$field = self.$field * scalar;)+
            }
        }

        impl<T: Real> DivAssign<T> for $v<T> {
            fn div_assign(&mut self, scalar: T) {
                $(self.$field = self.$field / scalar;)+
            }
        }
    };
}

impl_vector_ops!(Vector2 { x, y });
impl_vector_ops!(Vector3 { x, y, z });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vector3::new(1.0f32, 0.0, 0.0);
        let y = Vector3::new(0.0f32, 1.0, 0.0);
        let z = Vector3::cross(x, y);

        assert_eq!(z, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(Vector3::cross(y, x), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn dot_of_orthogonal_vectors_is_zero() {
        let a = Vector3::new(1.0f32, 0.0, 0.0);
        let b = Vector3::new(0.0f32, 3.0, 0.0);

        assert_eq!(Vector3::dot(a, b), 0.0);
        assert_eq!(Vector3::dot(a, a), 1.0);
    }

    #[test]
    fn normalized_has_unit_magnitude() {
        let v = Vector3::new(3.0f32, 4.0, 12.0).normalized();
        assert!((v.magnitude() - 1.0).abs() < 1e-6);

        let mut w = Vector2::new(3.0f32, 4.0);
        w.normalize();
        assert!((w.x - 0.6).abs() < 1e-6);
        assert!((w.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn component_wise_operators() {
        let mut v = Vector3::new(1.0f32, 2.0, 3.0);
        v += Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(v, Vector3::new(2.0, 3.0, 4.0));

        v *= 2.0;
        assert_eq!(v, Vector3::new(4.0, 6.0, 8.0));

        let d = v / 2.0 - Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(d, Vector3::new(1.0, 2.0, 3.0));
    }
}
