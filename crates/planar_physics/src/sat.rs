//! Narrow phase: separating axis tests and contact points
//!
//! Every function here is pure and reads the shapes' cached world data, so
//! callers must refresh the caches (see [`Shape::update`]) before testing.
//!
//! Boxes are tested as four-vertex polygons. Polygons are assumed convex.
//! Shapes with fewer than three vertices never collide.

use planar_math::{nearly_equal, nearly_equal_vec, Vec2};

use crate::contact::{ContactPoints, Penetration};
use crate::shapes::Shape;

/// Test two shapes for overlap
///
/// Returns the minimum translation vector with the normal pointing from `a`
/// toward `b`, or `None` if the shapes are separated (touching counts as
/// separated).
pub fn intersects(a: &Shape, b: &Shape) -> Option<Penetration> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    match (a.is_circle(), b.is_circle()) {
        (true, true) => circle_circle(a.world_center(), a.world_radius(), b.world_center(), b.world_radius()),
        (true, false) => circle_polygon(a.world_center(), a.world_radius(), b.transformed_vertices(), b.world_center()),
        (false, true) => {
            circle_polygon(b.world_center(), b.world_radius(), a.transformed_vertices(), a.world_center()).map(
                |mut p| {
                    p.normal = -p.normal;
                    p
                },
            )
        }
        (false, false) => polygon_polygon(
            a.transformed_vertices(),
            a.world_center(),
            b.transformed_vertices(),
            b.world_center(),
        ),
    }
}

/// Circle vs circle; normal points from A's center toward B's
pub fn circle_circle(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> Option<Penetration> {
    let delta = center_b - center_a;
    let distance = delta.length();
    let radii = radius_a + radius_b;

    if distance >= radii {
        return None;
    }

    let normal = if distance > f32::EPSILON {
        delta * (1.0 / distance)
    } else {
        // Concentric circles: any direction separates them
        Vec2::Y
    };

    Some(Penetration {
        normal,
        depth: radii - distance,
    })
}

/// Project vertices onto an axis, returning the (min, max) interval
pub fn project_vertices(vertices: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for v in vertices {
        let p = v.dot(axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Project a circle onto an axis, returning the (min, max) interval
pub fn project_circle(center: Vec2, radius: f32, axis: Vec2) -> (f32, f32) {
    let c = center.dot(axis);
    (c - radius, c + radius)
}

/// Unit normal of the edge `a -> b`, or `None` for a zero-length edge
#[inline]
fn edge_axis(a: Vec2, b: Vec2) -> Option<Vec2> {
    let edge = b - a;
    if edge.length_squared() <= f32::EPSILON * f32::EPSILON {
        return None;
    }
    Some(edge.perp().normalized())
}

/// Overlap of two intervals, or `None` if they are disjoint or only touch
#[inline]
fn interval_overlap(a: (f32, f32), b: (f32, f32)) -> Option<f32> {
    if a.0 >= b.1 || b.0 >= a.1 {
        return None;
    }
    Some((b.1 - a.0).min(a.1 - b.0))
}

/// Keep the axis with the least overlap seen so far
#[inline]
fn track_min(best: &mut Penetration, axis: Vec2, overlap: f32) {
    if overlap < best.depth {
        best.depth = overlap;
        best.normal = axis;
    }
}

/// Flip the normal if it points from B toward A
#[inline]
fn orient(mut p: Penetration, center_a: Vec2, center_b: Vec2) -> Penetration {
    if (center_b - center_a).dot(p.normal) < 0.0 {
        p.normal = -p.normal;
    }
    p
}

/// Polygon vs polygon using every edge normal of both polygons as an axis
///
/// The result's depth is the minimum overlap across all axes.
pub fn polygon_polygon(
    vertices_a: &[Vec2],
    center_a: Vec2,
    vertices_b: &[Vec2],
    center_b: Vec2,
) -> Option<Penetration> {
    if vertices_a.len() < 3 || vertices_b.len() < 3 {
        return None;
    }

    let mut best = Penetration {
        normal: Vec2::ZERO,
        depth: f32::MAX,
    };

    for vertices in [vertices_a, vertices_b] {
        for i in 0..vertices.len() {
            let Some(axis) = edge_axis(vertices[i], vertices[(i + 1) % vertices.len()]) else {
                continue;
            };
            let overlap = interval_overlap(
                project_vertices(vertices_a, axis),
                project_vertices(vertices_b, axis),
            )?;
            track_min(&mut best, axis, overlap);
        }
    }

    if best.normal == Vec2::ZERO {
        // Every edge was zero length
        return None;
    }
    Some(orient(best, center_a, center_b))
}

/// Index of the polygon vertex closest to a point
fn closest_vertex_index(point: Vec2, vertices: &[Vec2]) -> Option<usize> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (i, v.distance_squared(point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Circle vs polygon; normal points from the circle toward the polygon
///
/// Tests the polygon's edge normals plus the axis from the circle center to
/// the polygon's closest vertex.
pub fn circle_polygon(
    circle_center: Vec2,
    radius: f32,
    vertices: &[Vec2],
    polygon_center: Vec2,
) -> Option<Penetration> {
    if vertices.len() < 3 {
        return None;
    }

    let mut best = Penetration {
        normal: Vec2::ZERO,
        depth: f32::MAX,
    };

    for i in 0..vertices.len() {
        let Some(axis) = edge_axis(vertices[i], vertices[(i + 1) % vertices.len()]) else {
            continue;
        };
        let overlap = interval_overlap(
            project_circle(circle_center, radius, axis),
            project_vertices(vertices, axis),
        )?;
        track_min(&mut best, axis, overlap);
    }

    if let Some(index) = closest_vertex_index(circle_center, vertices) {
        let to_vertex = vertices[index] - circle_center;
        if to_vertex.length_squared() > f32::EPSILON {
            let axis = to_vertex.normalized();
            let overlap = interval_overlap(
                project_circle(circle_center, radius, axis),
                project_vertices(vertices, axis),
            )?;
            track_min(&mut best, axis, overlap);
        }
    }

    if best.normal == Vec2::ZERO {
        return None;
    }
    Some(orient(best, circle_center, polygon_center))
}

/// Closest point on segment `a -> b` to `point`, with its squared distance
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> (Vec2, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let closest = if len_sq <= f32::EPSILON {
        a
    } else {
        let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        a + ab * t
    };
    (closest, closest.distance_squared(point))
}

/// Contact points for two overlapping shapes
///
/// Produces one point for point-like contact and two for flush edges.
/// Returns `None` if either shape is degenerate.
pub fn contact_points(a: &Shape, b: &Shape) -> Option<ContactPoints> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    match (a.is_circle(), b.is_circle()) {
        (true, true) => {
            let dir = (b.world_center() - a.world_center()).normalized();
            Some(ContactPoints::single(a.world_center() + dir * a.world_radius()))
        }
        (true, false) => circle_polygon_contact(a.world_center(), b.transformed_vertices()),
        (false, true) => circle_polygon_contact(b.world_center(), a.transformed_vertices()),
        (false, false) => polygon_polygon_contacts(a.transformed_vertices(), b.transformed_vertices()),
    }
}

/// Closest point on any polygon edge to the circle center
fn circle_polygon_contact(circle_center: Vec2, vertices: &[Vec2]) -> Option<ContactPoints> {
    let mut best: Option<(Vec2, f32)> = None;
    for i in 0..vertices.len() {
        let (cp, dist_sq) = closest_point_on_segment(circle_center, vertices[i], vertices[(i + 1) % vertices.len()]);
        if best.map_or(true, |(_, d)| dist_sq < d) {
            best = Some((cp, dist_sq));
        }
    }
    best.map(|(p, _)| ContactPoints::single(p))
}

/// Vertex-to-edge search in both directions, keeping every point that ties
/// the global minimum distance (up to two)
///
/// Ties are judged on distances, not squared distances.
fn polygon_polygon_contacts(vertices_a: &[Vec2], vertices_b: &[Vec2]) -> Option<ContactPoints> {
    let mut min_dist = f32::MAX;
    let mut contact1 = Vec2::ZERO;
    let mut contact2 = Vec2::ZERO;
    let mut count = 0usize;

    for (points, edges) in [(vertices_a, vertices_b), (vertices_b, vertices_a)] {
        for p in points {
            for i in 0..edges.len() {
                let (cp, dist_sq) = closest_point_on_segment(*p, edges[i], edges[(i + 1) % edges.len()]);
                let dist = dist_sq.sqrt();
                if count > 0 && nearly_equal(dist, min_dist) {
                    if !nearly_equal_vec(cp, contact1) {
                        contact2 = cp;
                        count = 2;
                    }
                } else if dist < min_dist {
                    min_dist = dist;
                    contact1 = cp;
                    count = 1;
                }
            }
        }
    }

    match count {
        0 => None,
        1 => Some(ContactPoints::single(contact1)),
        _ => Some(ContactPoints::pair(contact1, contact2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform2D;

    fn placed(mut shape: Shape, x: f32, y: f32) -> Shape {
        shape.update(&Transform2D::from_position(Vec2::new(x, y)));
        shape
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_boxes_overlap_along_x() {
        let a = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);
        let b = placed(Shape::rectangle(2.0, 2.0), 1.0, 0.0);

        let p = intersects(&a, &b).expect("boxes should overlap");
        assert!(approx(p.depth, 1.0), "depth {}", p.depth);
        assert!(approx(p.normal.x.abs(), 1.0));
        assert!(approx(p.normal.y, 0.0));
        // Oriented from A toward B
        assert!(p.normal.x > 0.0);
    }

    #[test]
    fn test_circles_overlap() {
        let a = placed(Shape::circle(2.0), 0.0, 0.0);
        let b = placed(Shape::circle(2.0), 3.0, 0.0);

        let p = intersects(&a, &b).expect("circles should overlap");
        assert!(approx(p.depth, 1.0));
        assert!(approx(p.normal.x, 1.0));
        assert!(approx(p.normal.y, 0.0));
    }

    #[test]
    fn test_distant_circles_do_not_collide() {
        let a = placed(Shape::circle(1.0), 0.0, 0.0);
        let b = placed(Shape::circle(1.0), 5.0, 0.0);
        assert!(intersects(&a, &b).is_none());
    }

    #[test]
    fn test_touching_boxes_do_not_collide() {
        let a = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);
        let b = placed(Shape::rectangle(2.0, 2.0), 2.0, 0.0);
        assert!(intersects(&a, &b).is_none());
    }

    #[test]
    fn test_concentric_circles_use_fallback_normal() {
        let p = circle_circle(Vec2::ZERO, 1.0, Vec2::ZERO, 1.0).unwrap();
        assert_eq!(p.normal, Vec2::Y);
        assert!(approx(p.depth, 2.0));
    }

    #[test]
    fn test_depth_is_minimum_over_all_axes() {
        // B overlaps A by 1.5 on x and 0.25 on y; y must win even though
        // x is tested first
        let a = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);
        let b = placed(Shape::rectangle(2.0, 2.0), 0.5, 1.75);

        let p = intersects(&a, &b).unwrap();
        assert!(approx(p.depth, 0.25), "depth {}", p.depth);
        assert!(approx(p.normal.y, 1.0));
    }

    #[test]
    fn test_rotated_box_against_box() {
        let mut diamond = Shape::rectangle(2.0, 2.0);
        diamond.update(&Transform2D::from_position_rotation(Vec2::new(0.0, 2.2), 45.0));
        let floor = placed(Shape::rectangle(4.0, 2.0), 0.0, 0.0);

        // Diamond's lower tip reaches y = 2.2 - sqrt(2) ≈ 0.786, floor top at 1.0
        let p = intersects(&floor, &diamond).expect("diamond tip should overlap floor");
        assert!(approx(p.depth, 1.0 - (2.2 - 2.0_f32.sqrt())), "depth {}", p.depth);
        assert!(p.normal.y > 0.99);
    }

    #[test]
    fn test_normal_orientation_is_swapped_with_arguments() {
        let a = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);
        let b = placed(Shape::rectangle(2.0, 2.0), 1.0, 0.0);
        let ab = intersects(&a, &b).unwrap();
        let ba = intersects(&b, &a).unwrap();
        assert!(approx(ab.normal.x, -ba.normal.x));
        assert!(approx(ab.depth, ba.depth));
    }

    #[test]
    fn test_circle_vs_box() {
        let circle = placed(Shape::circle(1.0), 1.5, 0.0);
        let block = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);

        let p = intersects(&circle, &block).expect("should overlap");
        assert!(approx(p.depth, 0.5));
        // From circle toward box
        assert!(approx(p.normal.x, -1.0));

        let q = intersects(&block, &circle).unwrap();
        assert!(approx(q.normal.x, 1.0));
    }

    #[test]
    fn test_circle_near_box_corner_separated() {
        // Inside the corner region of the AABB but outside the rounded distance
        let circle = placed(Shape::circle(1.0), 1.8, 1.8);
        let block = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);
        assert!(intersects(&circle, &block).is_none());
    }

    #[test]
    fn test_degenerate_polygon_never_collides() {
        let line = placed(Shape::polygon(vec![Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)]), 0.0, 0.0);
        let block = placed(Shape::rectangle(2.0, 2.0), 0.0, 0.0);
        assert!(intersects(&line, &block).is_none());
        assert!(intersects(&block, &line).is_none());
        assert!(contact_points(&line, &block).is_none());
    }

    #[test]
    fn test_zero_length_edge_is_skipped() {
        // Duplicated vertex yields a zero-length edge
        let verts = vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let a = placed(Shape::polygon(verts), 0.0, 0.0);
        let b = placed(Shape::rectangle(2.0, 2.0), 1.0, 0.0);
        let p = intersects(&a, &b).expect("should overlap");
        assert!(p.depth.is_finite());
        assert!(approx(p.depth, 1.0));
    }

    #[test]
    fn test_circle_contact_point() {
        let a = placed(Shape::circle(2.0), 0.0, 0.0);
        let b = placed(Shape::circle(2.0), 3.0, 0.0);
        let c = contact_points(&a, &b).unwrap();
        assert_eq!(c.count, 1);
        assert!(approx(c.points[0].x, 2.0));
    }

    #[test]
    fn test_circle_polygon_contact_point() {
        let circle = placed(Shape::circle(1.0), 0.0, 1.5);
        let block = placed(Shape::rectangle(4.0, 2.0), 0.0, 0.0);
        let c = contact_points(&circle, &block).unwrap();
        assert_eq!(c.count, 1);
        assert!(approx(c.points[0].x, 0.0));
        assert!(approx(c.points[0].y, 1.0));
    }

    #[test]
    fn test_flush_edges_give_two_contacts() {
        // Small box resting on a wide floor
        let top = placed(Shape::rectangle(2.0, 2.0), 0.0, 1.9);
        let floor = placed(Shape::rectangle(10.0, 2.0), 0.0, 0.0);
        let c = contact_points(&top, &floor).unwrap();
        assert_eq!(c.count, 2);
        let mut xs = [c.points[0].x, c.points[1].x];
        xs.sort_by(f32::total_cmp);
        assert!(approx(xs[0], -1.0));
        assert!(approx(xs[1], 1.0));
    }

    #[test]
    fn test_vertex_contact_gives_one_point() {
        let mut diamond = Shape::rectangle(2.0, 2.0);
        diamond.update(&Transform2D::from_position_rotation(Vec2::new(0.0, 2.3), 45.0));
        let floor = placed(Shape::rectangle(10.0, 2.0), 0.0, 0.0);
        let c = contact_points(&diamond, &floor).unwrap();
        assert_eq!(c.count, 1);
        assert!(approx(c.points[0].x, 0.0));
    }

    #[test]
    fn test_slightly_tilted_box_touches_on_one_corner() {
        let floor = placed(Shape::rectangle(4.0, 2.0), 0.0, 0.0);
        // Low corner of a 1x1 box tilted by 1 degree sinks 0.005 into the
        // floor top; the other bottom corner stays about 0.012 above it
        let drop = 0.5 * (1.0_f32.to_radians().cos() + 1.0_f32.to_radians().sin());
        let mut tilted = Shape::rectangle(1.0, 1.0);
        tilted.update(&Transform2D::from_position_rotation(Vec2::new(0.0, 1.0 + drop - 0.005), 1.0));

        let c = contact_points(&tilted, &floor).unwrap();
        assert_eq!(c.count, 1, "points {:?}", c.as_slice());

        let low = tilted
            .transformed_vertices()
            .iter()
            .copied()
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();
        assert!(approx(c.points[0].x, low.x));
        assert!(approx(c.points[0].y, 1.0));
    }

    #[test]
    fn test_closest_point_on_segment() {
        let (p, d) = closest_point_on_segment(Vec2::new(0.5, 1.0), Vec2::ZERO, Vec2::X);
        assert_eq!(p, Vec2::new(0.5, 0.0));
        assert!(approx(d, 1.0));

        // Clamped to the endpoint
        let (p, _) = closest_point_on_segment(Vec2::new(3.0, 0.0), Vec2::ZERO, Vec2::X);
        assert_eq!(p, Vec2::X);

        // Degenerate segment
        let (p, _) = closest_point_on_segment(Vec2::new(3.0, 0.0), Vec2::Y, Vec2::Y);
        assert_eq!(p, Vec2::Y);
    }

    #[test]
    fn test_projection() {
        let verts = [Vec2::new(-1.0, 0.0), Vec2::new(2.0, 5.0)];
        assert_eq!(project_vertices(&verts, Vec2::X), (-1.0, 2.0));
        assert_eq!(project_circle(Vec2::new(3.0, 0.0), 1.0, Vec2::X), (2.0, 4.0));
    }
}
