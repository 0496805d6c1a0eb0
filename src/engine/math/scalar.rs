//! Scalar abstraction for the math types.
//!
//! Keeps `Vector2`/`Vector3`/`Matrix4x4` generic over the float width without
//! pulling in a numerics crate. The viewer itself only instantiates `f32`.

use std::ops::{Add, Div, Mul, Neg, Sub};

pub trait Real:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;

    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn asin(self) -> Self;
    fn atan(self) -> Self;
    fn atan2(self, other: Self) -> Self;
    fn to_radians(self) -> Self;
    fn to_degrees(self) -> Self;
}

macro_rules! impl_real {
    ($($t:ty),*) => {
        $(
            impl Real for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const TWO: Self = 2.0;

                #[inline]
                fn abs(self) -> Self {
                    self.abs()
                }

                #[inline]
                fn sqrt(self) -> Self {
                    self.sqrt()
                }

                #[inline]
                fn sin(self) -> Self {
                    self.sin()
                }

                #[inline]
                fn cos(self) -> Self {
                    self.cos()
                }

                #[inline]
                fn tan(self) -> Self {
                    self.tan()
                }

                #[inline]
                fn asin(self) -> Self {
                    self.asin()
                }

                #[inline]
                fn atan(self) -> Self {
                    self.atan()
                }

                #[inline]
                fn atan2(self, other: Self) -> Self {
                    self.atan2(other)
                }

                #[inline]
                fn to_radians(self) -> Self {
                    self.to_radians()
                }

                #[inline]
                fn to_degrees(self) -> Self {
                    self.to_degrees()
                }
            }
        )*
    };
}

impl_real!(f32, f64);
