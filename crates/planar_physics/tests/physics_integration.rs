//! Integration tests for the physics pipeline
//!
//! These tests drive the public API end to end:
//! 1. Shape caches and bounding boxes
//! 2. Broad phase soundness against a brute-force pair search
//! 3. Separating-axis results for rotated shapes
//! 4. Collision notifications and response through PhysicsWorld

use planar_math::Vec2;
use planar_physics::sat;
use planar_physics::{
    Aabb2D, BodyKey, BroadPhaseProxy, CollisionFilter, ContactPair, ContactPhase, PhysicsConfig,
    PhysicsMaterial, PhysicsWorld, RigidBody2D, Shape, SpatialGrid, Transform2D,
};
use slotmap::SlotMap;

fn no_gravity() -> PhysicsConfig {
    PhysicsConfig::default().with_gravity(Vec2::ZERO)
}

// ==================== Shape Cache Tests ====================

/// Every transformed vertex lies inside the cached AABB
#[test]
fn test_aabb_contains_rotated_vertices() {
    for degrees in [0.0, 15.0, 45.0, 90.0, 133.0, 270.0] {
        let mut shape = Shape::rectangle(3.0, 1.0).with_offset(Vec2::new(0.5, 0.0));
        let transform = Transform2D::from_position_rotation(Vec2::new(2.0, -1.0), degrees);
        let aabb = shape.aabb(&transform);

        assert_eq!(shape.transformed_vertices().len(), 4);
        for v in shape.transformed_vertices() {
            assert!(
                v.x >= aabb.min.x - 1e-4 && v.x <= aabb.max.x + 1e-4,
                "vertex {:?} outside {:?} at {} degrees",
                v,
                aabb,
                degrees
            );
            assert!(v.y >= aabb.min.y - 1e-4 && v.y <= aabb.max.y + 1e-4);
        }
    }
}

/// Updating with an unchanged transform reuses the cache
#[test]
fn test_shape_cache_is_idempotent() {
    let mut shape = Shape::polygon(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(2.0, 0.0),
        Vec2::new(1.0, 1.5),
    ]);
    let transform = Transform2D::from_position_rotation(Vec2::new(1.0, 1.0), 30.0);

    assert!(shape.update(&transform));
    let first = shape.cached_aabb();
    let count = shape.recompute_count();

    assert!(!shape.update(&transform));
    assert_eq!(shape.recompute_count(), count);
    assert_eq!(shape.cached_aabb(), first);
}

// ==================== Broad Phase Tests ====================

/// Every overlapping non-static pair is reported by the grid
#[test]
fn test_broad_phase_finds_every_overlap() {
    let mut keys: SlotMap<BodyKey, ()> = SlotMap::with_key();
    let mut proxies = Vec::new();
    for i in 0..40 {
        let x = ((i * 37) % 100) as f32 * 0.35 - 17.0;
        let y = ((i * 53) % 100) as f32 * 0.35 - 17.0;
        let size = 0.5 + (i % 4) as f32;
        proxies.push(BroadPhaseProxy {
            key: keys.insert(()),
            aabb: Aabb2D::from_center_half_extents(Vec2::new(x, y), Vec2::splat(size * 0.5)),
            is_static: i % 5 == 0,
            filter: CollisionFilter::default(),
        });
    }

    let mut grid = SpatialGrid::new(Vec2::new(-20.0, -20.0), Vec2::new(20.0, 20.0), 7, 5);
    grid.rebuild(&proxies);
    let candidates = grid.candidate_pairs(&proxies);

    let mut expected = 0;
    for (i, a) in proxies.iter().enumerate() {
        for b in &proxies[i + 1..] {
            if a.is_static && b.is_static {
                continue;
            }
            if a.aabb.overlaps(&b.aabb) {
                expected += 1;
                assert!(
                    candidates.contains(&ContactPair::new(a.key, b.key)),
                    "missing pair {:?} / {:?}",
                    a.aabb,
                    b.aabb
                );
            }
        }
    }
    assert_eq!(candidates.len(), expected);
}

// ==================== Narrow Phase Tests ====================

#[test]
fn test_sat_rotated_boxes() {
    let mut a = Shape::rectangle(2.0, 2.0);
    let mut b = Shape::rectangle(2.0, 2.0);
    a.update(&Transform2D::identity());

    // Diamond whose left corner pokes 0.2 into A's right face
    let reach = 2.0_f32.sqrt();
    b.update(&Transform2D::from_position_rotation(
        Vec2::new(1.0 + reach - 0.2, 0.0),
        45.0,
    ));
    let hit = sat::intersects(&a, &b).expect("corner overlaps face");
    assert!((hit.normal.length() - 1.0).abs() < 1e-4);
    assert!(hit.normal.x > 0.9);
    assert!((hit.depth - 0.2).abs() < 1e-3);

    let points = sat::contact_points(&a, &b).expect("touching shapes have contacts");
    assert_eq!(points.count, 1);
    assert!((points.points[0].x - (1.0 + reach - 0.2 - reach)).abs() < 1e-3);

    b.update(&Transform2D::from_position_rotation(
        Vec2::new(1.0 + reach + 0.2, 0.0),
        45.0,
    ));
    assert!(sat::intersects(&a, &b).is_none());
}

#[test]
fn test_sat_circle_against_box_normal_direction() {
    let mut circle = Shape::circle(1.0);
    let mut square = Shape::rectangle(2.0, 2.0);
    circle.update(&Transform2D::from_position(Vec2::new(0.0, 1.5)));
    square.update(&Transform2D::identity());

    let down = sat::intersects(&circle, &square).expect("overlap");
    assert!(down.normal.y < -0.99);
    assert!((down.depth - 0.5).abs() < 1e-4);

    let up = sat::intersects(&square, &circle).expect("overlap");
    assert!(up.normal.y > 0.99);
}

// ==================== World Tests ====================

/// A ball bounces off a wall: Enter first, Exit last, wall untouched
#[test]
fn test_bounce_reports_enter_then_exit() {
    let config = no_gravity();
    let mut world = PhysicsWorld::with_config(&config);
    let wall = world.add_body(RigidBody2D::new_static_box(Vec2::ZERO, 1.0, 4.0));
    let ball = world.add_body(
        RigidBody2D::new_circle(Vec2::new(-2.0, 0.0), 0.5)
            .with_velocity(Vec2::new(6.0, 0.0))
            .with_material(PhysicsMaterial::RUBBER),
    );
    let pair = ContactPair::new(wall, ball);

    let mut phases = Vec::new();
    for _ in 0..60 {
        world.step(&config);
        for event in world.events() {
            assert_eq!(event.pair, pair);
            assert!(!event.is_trigger);
            phases.push(event.phase);
        }
    }

    assert_eq!(phases.first(), Some(&ContactPhase::Enter));
    assert_eq!(phases.last(), Some(&ContactPhase::Exit));
    assert_eq!(phases.iter().filter(|p| **p == ContactPhase::Enter).count(), 1);
    assert_eq!(phases.iter().filter(|p| **p == ContactPhase::Exit).count(), 1);

    let ball = world.get_body(ball).unwrap();
    assert!(ball.linear_velocity.x < 0.0, "ball should move away from the wall");
    let wall = world.get_body(wall).unwrap();
    assert_eq!(wall.position(), Vec2::ZERO);
    assert_eq!(wall.linear_velocity, Vec2::ZERO);
}

/// A ball resting on the floor and then kicked upward: Enter, Stays, Exit
#[test]
fn test_resting_contact_then_separation() {
    let config = PhysicsConfig::default();
    let mut world = PhysicsWorld::with_config(&config);
    let floor = world.add_body(RigidBody2D::new_static_box(Vec2::new(0.0, -0.5), 10.0, 1.0));
    let ball = world.add_body(RigidBody2D::new_circle(Vec2::new(0.0, 0.5), 0.5));
    let pair = ContactPair::new(floor, ball);

    let mut phases = Vec::new();
    for _ in 0..30 {
        world.step(&config);
        phases.extend(world.events().iter().map(|e| (e.pair, e.phase, e.is_trigger)));
    }
    world.get_body_mut(ball).unwrap().linear_velocity = Vec2::new(0.0, 5.0);
    // Still rising when the loop ends
    for _ in 0..10 {
        world.step(&config);
        phases.extend(world.events().iter().map(|e| (e.pair, e.phase, e.is_trigger)));
    }

    assert!(phases.iter().all(|(p, _, trigger)| *p == pair && !trigger));
    let phases: Vec<ContactPhase> = phases.into_iter().map(|(_, phase, _)| phase).collect();
    assert_eq!(phases.first(), Some(&ContactPhase::Enter));
    assert_eq!(phases.last(), Some(&ContactPhase::Exit));
    assert_eq!(phases.iter().filter(|p| **p == ContactPhase::Enter).count(), 1);
    assert_eq!(phases.iter().filter(|p| **p == ContactPhase::Exit).count(), 1);
    assert!(phases.iter().filter(|p| **p == ContactPhase::Stay).count() >= 3);
    assert!(!world.is_touching(floor, ball));
}

/// Many falling bodies never move the static floor
#[test]
fn test_static_floor_never_moves() {
    let config = PhysicsConfig::default();
    let mut world = PhysicsWorld::with_config(&config);
    let floor = world.add_body(RigidBody2D::new_static_box(Vec2::new(0.0, -0.5), 20.0, 1.0));
    for i in 0..6 {
        let x = i as f32 * 1.5 - 4.0;
        world.add_body(RigidBody2D::new_box(Vec2::new(x, 2.0 + i as f32), 1.0, 1.0));
        world.add_body(RigidBody2D::new_circle(Vec2::new(x + 0.5, 8.0), 0.4));
    }

    for _ in 0..180 {
        world.step(&config);
        let body = world.get_body(floor).unwrap();
        assert_eq!(body.position(), Vec2::new(0.0, -0.5));
        assert_eq!(body.rotation(), 0.0);
    }
    assert_eq!(world.stats().bodies, 13);
}

/// Shapes filtered apart pass through each other silently
#[test]
fn test_filtered_bodies_pass_through() {
    use planar_physics::CollisionLayer;

    let config = no_gravity();
    let mut world = PhysicsWorld::with_config(&config);
    let ghost = CollisionFilter::new(CollisionLayer::PLAYER, CollisionLayer::STATIC);
    world.add_body(RigidBody2D::new_circle(Vec2::ZERO, 0.5).with_filter(ghost));
    let mover = world.add_body(
        RigidBody2D::new_circle(Vec2::new(-2.0, 0.0), 0.5)
            .with_velocity(Vec2::new(6.0, 0.0))
            .with_filter(ghost),
    );

    for _ in 0..60 {
        world.step(&config);
        assert!(world.events().is_empty());
    }
    assert!((world.get_body(mover).unwrap().position().x - 4.0).abs() < 1e-3);
}
