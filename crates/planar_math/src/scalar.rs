//! Scalar helpers shared by the geometry code

/// Tolerance used when comparing distances and projections
pub const EPSILON: f32 = 0.0005;

/// Check whether two values are equal within [`EPSILON`]
#[inline]
pub fn nearly_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Check whether two points are equal within [`EPSILON`] on both axes
#[inline]
pub fn nearly_equal_vec(a: crate::Vec2, b: crate::Vec2) -> bool {
    nearly_equal(a.x, b.x) && nearly_equal(a.y, b.y)
}
