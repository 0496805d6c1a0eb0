//! Axis-aligned bounds, used for the camera's near-plane extents.

use super::scalar::Real;
use super::vector::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Real> Rect<T> {
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn center(&self) -> Vector2<T> {
        Vector2::new(
            (self.right + self.left) / T::TWO,
            (self.top + self.bottom) / T::TWO,
        )
    }

    /// (width, height)
    pub fn size(&self) -> (T, T) {
        (self.right - self.left, self.top - self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_size() {
        let r = Rect::new(2.0f32, 3.0, -2.0, -1.0);

        assert_eq!(r.center(), Vector2::new(1.0, 0.0));
        assert_eq!(r.size(), (4.0, 4.0));
    }
}
