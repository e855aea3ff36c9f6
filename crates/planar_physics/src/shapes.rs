//! Collision shapes for 2D physics
//!
//! A [`Shape`] holds local-space geometry plus a cache of its world-space
//! vertices and bounding box. The cache is keyed on the world matrix it was
//! built from: it is rebuilt only when the owner's matrix differs by value
//! from the one seen last time.

use planar_math::{mat3, Mat3, Vec2};

use crate::error::PhysicsError;
use crate::transform::Transform2D;

/// A 2D axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Default for Aabb2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO)
    }
}

impl Aabb2D {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest AABB containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for p in rest {
            aabb.min = aabb.min.min_components(*p);
            aabb.max = aabb.max.max_components(*p);
        }
        Some(aabb)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents (half the size in each dimension)
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size in each dimension
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check whether two AABBs overlap (touching edges count as overlap)
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Geometric kind of a collider
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
    Polygon,
}

/// A collider's geometry with cached world-space data
#[derive(Clone, Debug)]
pub struct Shape {
    kind: ShapeKind,
    /// Local-space vertices (empty for circles)
    local_vertices: Vec<Vec2>,
    /// Local-space offset from the owner's origin
    offset: Vec2,
    /// Trigger shapes report overlaps but receive no collision response
    pub is_trigger: bool,

    transformed_vertices: Vec<Vec2>,
    world_center: Vec2,
    world_radius: f32,
    aabb: Aabb2D,
    last_matrix: Option<Mat3>,
    recompute_count: u64,
}

impl Shape {
    fn with_kind(kind: ShapeKind, local_vertices: Vec<Vec2>) -> Self {
        let count = local_vertices.len();
        Self {
            kind,
            local_vertices,
            offset: Vec2::ZERO,
            is_trigger: false,
            transformed_vertices: Vec::with_capacity(count),
            world_center: Vec2::ZERO,
            world_radius: 0.0,
            aabb: Aabb2D::default(),
            last_matrix: None,
            recompute_count: 0,
        }
    }

    /// Create a circle of the given radius
    ///
    /// Negative radii are clamped to zero.
    pub fn circle(radius: f32) -> Self {
        if radius < 0.0 {
            log::warn!("Circle radius {} is negative, clamping to 0", radius);
        }
        Self::with_kind(ShapeKind::Circle { radius: radius.max(0.0) }, Vec::new())
    }

    /// Create an axis-aligned box centered on the owner's origin
    pub fn rectangle(width: f32, height: f32) -> Self {
        let hw = width.abs() * 0.5;
        let hh = height.abs() * 0.5;
        let vertices = vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        Self::with_kind(
            ShapeKind::Box {
                width: width.abs(),
                height: height.abs(),
            },
            vertices,
        )
    }

    /// Create a convex polygon from local-space vertices in winding order
    ///
    /// Polygons with fewer than three vertices are accepted but never
    /// collide; see [`Shape::validate`].
    pub fn polygon(vertices: Vec<Vec2>) -> Self {
        if vertices.len() < 3 {
            log::warn!(
                "Polygon with {} vertices is degenerate and will not collide",
                vertices.len()
            );
        }
        Self::with_kind(ShapeKind::Polygon, vertices)
    }

    /// Set the local offset from the owner's origin
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.set_offset(offset);
        self
    }

    /// Mark this shape as a trigger
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.invalidate();
    }

    /// Check that the geometry can take part in collision tests
    pub fn validate(&self) -> Result<(), PhysicsError> {
        match self.kind {
            ShapeKind::Circle { .. } => Ok(()),
            ShapeKind::Box { .. } | ShapeKind::Polygon => {
                if self.local_vertices.len() < 3 {
                    Err(PhysicsError::DegeneratePolygon {
                        vertex_count: self.local_vertices.len(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        matches!(self.kind, ShapeKind::Circle { .. })
    }

    /// True for polygons (and boxes) that cannot enclose an area
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.is_circle() && self.local_vertices.len() < 3
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn local_vertices(&self) -> &[Vec2] {
        &self.local_vertices
    }

    /// Local-space bounding size (diameter square for circles)
    pub fn local_size(&self) -> Vec2 {
        match self.kind {
            ShapeKind::Circle { radius } => Vec2::splat(radius * 2.0),
            ShapeKind::Box { width, height } => Vec2::new(width, height),
            ShapeKind::Polygon => Aabb2D::from_points(&self.local_vertices)
                .map(|b| b.size())
                .unwrap_or(Vec2::ZERO),
        }
    }

    /// Local-space center of the shape relative to the owner's origin
    ///
    /// Offset plus the vertex average for polygons.
    pub fn local_center(&self) -> Vec2 {
        if self.local_vertices.is_empty() {
            return self.offset;
        }
        let sum = self.local_vertices.iter().fold(Vec2::ZERO, |acc, v| acc + *v);
        self.offset + sum / self.local_vertices.len() as f32
    }

    /// Forget the cached world data so the next update rebuilds it
    pub fn invalidate(&mut self) {
        self.last_matrix = None;
    }

    /// Rebuild the world-space cache if the transform changed
    ///
    /// Returns `true` if the cache was rebuilt.
    pub fn update(&mut self, transform: &Transform2D) -> bool {
        let matrix = transform.matrix();
        if self.last_matrix == Some(matrix) {
            return false;
        }
        self.recompute(matrix, transform.scale());
        self.last_matrix = Some(matrix);
        true
    }

    fn recompute(&mut self, matrix: Mat3, scale: Vec2) {
        self.recompute_count += 1;
        self.transformed_vertices.clear();

        match self.kind {
            ShapeKind::Circle { radius } => {
                self.world_center = mat3::transform_point(matrix, self.offset);
                self.world_radius = radius * scale.abs().max_element();
                let r = Vec2::splat(self.world_radius);
                self.aabb = Aabb2D::from_center_half_extents(self.world_center, r);
            }
            ShapeKind::Box { .. } | ShapeKind::Polygon => {
                let offset = self.offset;
                self.transformed_vertices.extend(
                    self.local_vertices
                        .iter()
                        .map(|v| mat3::transform_point(matrix, *v + offset)),
                );
                self.world_radius = 0.0;
                self.world_center = if self.transformed_vertices.is_empty() {
                    mat3::transform_point(matrix, offset)
                } else {
                    let sum = self
                        .transformed_vertices
                        .iter()
                        .fold(Vec2::ZERO, |acc, v| acc + *v);
                    sum / self.transformed_vertices.len() as f32
                };
                self.aabb = Aabb2D::from_points(&self.transformed_vertices)
                    .unwrap_or_else(|| Aabb2D::new(self.world_center, self.world_center));
            }
        }
    }

    /// World-space AABB, rebuilding the cache if the transform changed
    pub fn aabb(&mut self, transform: &Transform2D) -> Aabb2D {
        self.update(transform);
        self.aabb
    }

    /// World-space AABB as of the last update
    #[inline]
    pub fn cached_aabb(&self) -> Aabb2D {
        self.aabb
    }

    /// World-space vertices as of the last update (empty for circles)
    #[inline]
    pub fn transformed_vertices(&self) -> &[Vec2] {
        &self.transformed_vertices
    }

    /// World-space center as of the last update
    ///
    /// For polygons this is the vertex average.
    #[inline]
    pub fn world_center(&self) -> Vec2 {
        self.world_center
    }

    /// World-space radius as of the last update (zero for polygons)
    #[inline]
    pub fn world_radius(&self) -> f32 {
        self.world_radius
    }

    /// Number of times the world cache has been rebuilt
    #[inline]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Check whether a world-space point lies inside the shape
    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.is_circle() {
            return self.world_center.distance_squared(point) <= self.world_radius * self.world_radius;
        }
        if self.is_degenerate() || !self.aabb.contains(point) {
            return false;
        }
        let verts = &self.transformed_vertices;
        let mut sign = 0.0f32;
        for i in 0..verts.len() {
            let a = verts[i];
            let b = verts[(i + 1) % verts.len()];
            let c = (b - a).cross(point - a);
            if c.abs() <= f32::EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = c.signum();
            } else if c.signum() != sign {
                return false;
            }
        }
        true
    }
}
