//! 2D Mathematics Library
//!
//! This crate provides the vector and matrix types for the planar engine.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Mat3`] - 3x3 homogeneous matrix for 2D affine transforms

mod vec2;
pub mod mat3;
pub mod scalar;

pub use vec2::Vec2;
pub use mat3::Mat3;
pub use scalar::{nearly_equal, nearly_equal_vec, EPSILON};
