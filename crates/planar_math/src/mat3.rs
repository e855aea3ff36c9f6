//! 3x3 affine matrix utilities for 2D transformations
//!
//! A world transform (translation, rotation, non-uniform scale) packs into a
//! homogeneous 3x3 matrix. The physics core compares these matrices by value
//! to decide whether cached world-space geometry is stale.

use crate::Vec2;

/// 3x3 matrix type (column-major: `m[column][row]`)
pub type Mat3 = [[f32; 3]; 3];

/// Identity matrix
pub const IDENTITY: Mat3 = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Build a transform matrix from translation, rotation, and scale.
///
/// Applies scale, then rotation, then translation.
///
/// # Arguments
/// * `translation` - World position
/// * `rotation_deg` - Counter-clockwise rotation in degrees
/// * `scale` - Per-axis scale
pub fn from_trs(translation: Vec2, rotation_deg: f32, scale: Vec2) -> Mat3 {
    let (sn, cs) = rotation_deg.to_radians().sin_cos();
    [
        [cs * scale.x, sn * scale.x, 0.0],
        [-sn * scale.y, cs * scale.y, 0.0],
        [translation.x, translation.y, 1.0],
    ]
}

/// Multiply two matrices: result = a * b
pub fn mul(a: Mat3, b: Mat3) -> Mat3 {
    let mut result = [[0.0f32; 3]; 3];
    for col in 0..3 {
        for row in 0..3 {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += a[k][row] * b[col][k];
            }
            result[col][row] = sum;
        }
    }
    result
}

/// Transform a point (applies translation)
#[inline]
pub fn transform_point(m: Mat3, p: Vec2) -> Vec2 {
    Vec2::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1],
    )
}

/// Transform a direction (ignores translation)
#[inline]
pub fn transform_vector(m: Mat3, v: Vec2) -> Vec2 {
    Vec2::new(
        m[0][0] * v.x + m[1][0] * v.y,
        m[0][1] * v.x + m[1][1] * v.y,
    )
}

/// Translation component of the matrix
#[inline]
pub fn translation(m: Mat3) -> Vec2 {
    Vec2::new(m[2][0], m[2][1])
}

/// Rotate a vector counter-clockwise by an angle in radians
#[inline]
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    let (sn, cs) = radians.sin_cos();
    Vec2::new(v.x * cs - v.y * sn, v.x * sn + v.y * cs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn test_identity_from_trs() {
        let m = from_trs(Vec2::ZERO, 0.0, Vec2::ONE);
        assert_eq!(m, IDENTITY);
    }

    #[test]
    fn test_transform_point_translation() {
        let m = from_trs(Vec2::new(3.0, -1.0), 0.0, Vec2::ONE);
        assert_eq!(transform_point(m, Vec2::new(1.0, 1.0)), Vec2::new(4.0, 0.0));
        // Directions ignore translation
        assert_eq!(transform_vector(m, Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
        assert_eq!(translation(m), Vec2::new(3.0, -1.0));
    }

    #[test]
    fn test_rotation_90_degrees() {
        let m = from_trs(Vec2::ZERO, 90.0, Vec2::ONE);
        let result = transform_point(m, Vec2::X);
        assert!(vec_approx_eq(result, Vec2::Y), "Got {:?}", result);
    }

    #[test]
    fn test_scale_applies_before_rotation() {
        // Scale x by 2, then rotate 90° -> (1,0) becomes (0,2)
        let m = from_trs(Vec2::ZERO, 90.0, Vec2::new(2.0, 1.0));
        let result = transform_point(m, Vec2::X);
        assert!(vec_approx_eq(result, Vec2::new(0.0, 2.0)), "Got {:?}", result);
    }

    #[test]
    fn test_mul_composition() {
        let r45 = from_trs(Vec2::ZERO, 45.0, Vec2::ONE);
        let r90 = from_trs(Vec2::ZERO, 90.0, Vec2::ONE);
        let composed = mul(r45, r45);

        let v = Vec2::new(1.0, 0.0);
        assert!(vec_approx_eq(transform_point(composed, v), transform_point(r90, v)));
    }

    #[test]
    fn test_mul_identity() {
        let a = from_trs(Vec2::new(1.0, 2.0), 30.0, Vec2::new(1.0, 3.0));
        assert_eq!(mul(IDENTITY, a), a);
        assert_eq!(mul(a, IDENTITY), a);
    }

    #[test]
    fn test_rotate() {
        let v = rotate(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert!(vec_approx_eq(v, Vec2::Y));
    }
}
