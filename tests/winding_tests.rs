mod common;

use cgmath::InnerSpace;

use bsp_portals::math::{Plane, Vec3};
use bsp_portals::winding::{SplitType, Winding, MAX_POINTS_ON_WINDING};

use common::{approx_eq, axis_plane};

fn unit_square() -> Winding {
    Winding::from_points(&[
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ])
}

#[test]
fn winding_base_for_plane_test() {
    let plane = Plane::new(Vec3::new(0.0, 0.0, 1.0), 16.0);
    let winding = Winding::base_for_plane(&plane, 10.0);
    assert_eq!(winding.len(), 4);
    assert!(approx_eq(winding.area(), 400.0));
    for point in winding.iter() {
        assert!(plane.distance_to(point).abs() < 1e-9);
    }
    // Points wind counter-clockwise seen from the front.
    let normal = winding.normal().unwrap();
    assert!((normal - plane.normal).magnitude() < 1e-9);
}

#[test]
fn winding_base_for_tilted_plane_test() {
    let plane = Plane::new(Vec3::new(1.0, 1.0, 0.0).normalize(), 4.0);
    let winding = Winding::base_for_plane(&plane, 100.0);
    assert!(approx_eq(winding.area(), 40000.0));
    let normal = winding.normal().unwrap();
    assert!((normal - plane.normal).magnitude() < 1e-9);
}

#[test]
fn winding_clip_conserves_area_test() {
    let winding = Winding::base_for_plane(&axis_plane(2, 0.0), 10.0);
    let (front, back) = winding.clip(&axis_plane(0, 2.0), 0.001, true);
    let front = front.unwrap();
    let back = back.unwrap();

    assert!(approx_eq(front.area(), 160.0));
    assert!(approx_eq(back.area(), 240.0));
    assert!(approx_eq(front.area() + back.area(), winding.area()));
    assert!(front.iter().all(|p| p.x >= 2.0));
    assert!(back.iter().all(|p| p.x <= 2.0));
}

#[test]
fn winding_clip_one_side_test() {
    let winding = unit_square();
    assert_eq!(winding.clip(&axis_plane(0, -1.0), 0.001, false), (Some(winding.clone()), None));
    assert_eq!(winding.clip(&axis_plane(0, 5.0), 0.001, false), (None, Some(winding.clone())));
    assert_eq!(winding.clip_front(&axis_plane(0, 5.0), 0.001, false), None);
}

#[test]
fn winding_clip_within_epsilon_test() {
    let winding = unit_square();
    // Touching the plane within epsilon is not a split.
    assert_eq!(winding.split_with_plane(&axis_plane(0, 1.0005), 0.001), SplitType::Back);
    assert_eq!(winding.split_with_plane(&axis_plane(0, -0.0005), 0.001), SplitType::Front);
}

#[test]
fn winding_clip_coplanar_test() {
    let winding = unit_square();
    let plane = axis_plane(2, 0.0);
    assert_eq!(winding.split_with_plane(&plane, 0.001), SplitType::Coplanar);
    assert_eq!(winding.clip(&plane, 0.001, true), (Some(winding.clone()), None));
    assert_eq!(winding.clip(&plane, 0.001, false), (None, Some(winding.clone())));
}

#[test]
fn winding_is_tiny_test() {
    let sliver = Winding::from_points(&[
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.1, 0.0, 0.0),
        Vec3::new(0.0, 0.1, 0.0),
    ]);
    assert!(sliver.is_tiny(0.04));
    assert!(!unit_square().is_tiny(0.04));
    assert!(Winding::from_points(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)]).is_tiny(0.04));
}

#[test]
fn winding_overflow_comes_back_empty_test() {
    // A full winding with one point behind the plane: the front fragment
    // would need two more points than it has room for.
    let points: Vec<Vec3> = (0..MAX_POINTS_ON_WINDING)
        .map(|i| {
            let angle = std::f64::consts::PI + i as f64 * std::f64::consts::TAU / MAX_POINTS_ON_WINDING as f64;
            Vec3::new(99.8 + 100.0 * angle.cos(), 100.0 * angle.sin(), 0.0)
        })
        .collect();
    let winding = Winding::from_points(&points);
    let plane = axis_plane(0, 0.0);

    let (front, back) = winding.clip(&plane, 0.001, true);
    assert_eq!(front, Some(Winding::new()));
    assert!(front.unwrap().is_tiny(0.04));
    assert_eq!(back.unwrap().len(), 3);
    assert_eq!(winding.clip_front(&plane, 0.001, true), None);
}
