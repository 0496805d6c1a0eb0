pub mod matrix;
pub mod rect;
pub mod scalar;
pub mod vector;

pub use matrix::{Matrix4x4, SingularMatrix};
pub use rect::Rect;
pub use scalar::Real;
pub use vector::{Vector2, Vector3};
