use super::*;
use crate::error::Error;
use nalgebra::{vector, Vector2};

fn unit_square() -> Vec<Vector2<f64>> {
    vec![
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ]
}

#[test]
fn point_in_unit_square() {
    let sq = ConvexPolygon::new(unit_square()).unwrap();
    assert!(sq.contains(vector![0.5, 0.5]));
    assert!(!sq.contains(vector![2.0, 2.0]));
    // on the right edge and on a corner
    assert!(sq.contains(vector![1.0, 0.5]));
    assert!(sq.contains(vector![1.0, 1.0]));
    // just outside, beyond the 1e-5 slack
    assert!(!sq.contains(vector![1.001, 0.5]));
    // the free function takes explicit vertices
    assert!(point_in_convex(vector![0.25, 0.75], &unit_square(), 1e-5));
    assert!(!point_in_convex(vector![0.5, 0.5], &unit_square()[..2], 1e-5));
}

#[test]
fn convex_polygon_rejects_bad_input() {
    let mut cw = unit_square();
    cw.reverse();
    assert!(matches!(ConvexPolygon::new(cw), Err(Error::Clockwise { .. })));
    assert!(matches!(
        ConvexPolygon::new(vec![vector![0.0, 0.0], vector![1.0, 0.0]]),
        Err(Error::TooFewVertices { got: 2 })
    ));
    // arrow head: ccw but reflex at (0.5, 0.3)
    let dart = vec![
        vector![0.0, 0.0],
        vector![0.5, 0.3],
        vector![1.0, 0.0],
        vector![0.5, 1.0],
    ];
    assert!(matches!(
        ConvexPolygon::new(dart),
        Err(Error::NotConvex { index: 1 })
    ));
}

#[test]
fn bounding_box_of_rotated_square_is_the_square() {
    let theta = 37f64.to_radians();
    let rot = Aff2::rotation_about(theta, vector![0.0, 0.0]);
    let square: Vec<_> = [
        vector![-1.0, -1.0],
        vector![1.0, -1.0],
        vector![1.0, 1.0],
        vector![-1.0, 1.0],
    ]
    .iter()
    .map(|p| rot.apply(*p) + vector![3.0, -2.0])
    .collect();
    let mut poly = ConvexPolygon::new(square.clone()).unwrap();
    let bbox = poly.compute_optimal_bounding_box().clone();
    assert_eq!(bbox.len(), 4);
    assert!((bbox.area() - 4.0).abs() < 1e-9, "area {}", bbox.area());
    // The axis-aligned box would be much larger.
    let aabb = Rect::enclosing(&square).unwrap();
    assert!(aabb.area() > 7.0);
    for p in &square {
        assert!(point_in_convex(*p, bbox.vertices(), 1e-6));
    }
}

#[test]
fn bounding_box_of_right_triangle() {
    let mut tri =
        ConvexPolygon::new(vec![vector![0.0, 0.0], vector![4.0, 0.0], vector![0.0, 3.0]]).unwrap();
    let area = tri.bounding_box().area();
    assert!((area - 12.0).abs() < 1e-9, "area {area}");
}

#[test]
fn bounding_box_cache_cleared_by_transform() {
    let mut sq = ConvexPolygon::new(unit_square()).unwrap();
    let before = sq.bounding_box().vertices().to_vec();
    sq.transform(&Aff2::scale_translate(1.0, 1.0, vector![10.0, 0.0]));
    let after = sq.bounding_box().vertices().to_vec();
    let shift = vertex_centroid(&after).unwrap() - vertex_centroid(&before).unwrap();
    assert!((shift - vector![10.0, 0.0]).norm() < 1e-9);
}

#[test]
fn polygon_rotation_keeps_canonical_vertices() {
    let mut p = Polygon::new();
    p.add_vertex(0.0, 0.0);
    p.add_vertex(2.0, 0.0);
    p.add_vertex(2.0, 2.0);
    p.add_vertex(0.0, 2.0);
    assert!((p.center() - vector![1.0, 1.0]).norm() < 1e-12);
    p.rotate(std::f64::consts::FRAC_PI_2);
    // (0,0) rotates a quarter turn about (1,1) onto (2,0)
    assert!((p.rotated()[0] - vector![2.0, 0.0]).norm() < 1e-12);
    assert_eq!(p.vertices()[0], vector![0.0, 0.0]);
    // rotation is absolute, not cumulative
    p.rotate(std::f64::consts::FRAC_PI_2);
    assert!((p.rotated()[0] - vector![2.0, 0.0]).norm() < 1e-12);
    // adding a vertex invalidates the center
    p.add_vertex(1.0, 5.0);
    assert!((p.center() - vector![1.0, 1.8]).norm() < 1e-12);
}

#[test]
fn vertex_centroid_differs_from_area_centroid() {
    // Extra vertices crowd the bottom edge; the vertex mean is pulled down.
    let pts = vec![
        vector![0.0, 0.0],
        vector![0.25, 0.0],
        vector![0.5, 0.0],
        vector![0.75, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    let mut poly = Polygon::from_vertices(pts.clone());
    let vc = poly.determine_center();
    let ac = area_centroid(&pts).unwrap();
    assert!((ac - vector![0.5, 0.5]).norm() < 1e-12);
    assert!((vc.y - 2.0 / 7.0).abs() < 1e-12);
}

#[test]
fn convex_hull_is_ccw_and_drops_interior_points() {
    let pts = vec![
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![1.0, 0.5],
        vector![2.0, 2.0],
        vector![0.0, 2.0],
        vector![1.0, 1.0],
    ];
    let hull = convex_hull(&pts).unwrap();
    assert_eq!(hull.len(), 4);
    assert!(signed_area(&hull) > 0.0);
    assert!(ConvexPolygon::from_points(&pts).is_ok());
}

#[test]
fn strict_emptiness_detects_contradiction() {
    // x <= 0 and x >= 1 -> empty
    let mut p = Poly2::default();
    p.insert_halfspace(Hs2::new(vector![1.0, 0.0], 0.0));
    p.insert_halfspace(Hs2::new(vector![-1.0, 0.0], -1.0));
    assert!(matches!(
        p.halfspace_intersection(),
        HalfspaceIntersection::Empty
    ));
    // Unit box -> non-empty, vertices checked
    let mut q = Poly2::default();
    q.insert_halfspace(Hs2::new(vector![1.0, 0.0], 1.0));
    q.insert_halfspace(Hs2::new(vector![-1.0, 0.0], 0.0));
    q.insert_halfspace(Hs2::new(vector![0.0, 1.0], 1.0));
    q.insert_halfspace(Hs2::new(vector![0.0, -1.0], 0.0));
    let verts = q.checked_vertices(1e-9).expect("bounded box");
    assert_eq!(verts.len(), 4);
    assert!((signed_area(&verts) - 1.0).abs() < 1e-12);
    // A cut through the middle halves it.
    let half = q.with_cut(Hs2::new(vector![1.0, 0.0], 0.5));
    let verts = half.checked_vertices(1e-9).unwrap();
    assert!((signed_area(&verts) - 0.5).abs() < 1e-12);
}

#[test]
fn hull_to_strict_poly() {
    let p = from_points_convex_hull_strict(&unit_square()).unwrap();
    assert_eq!(p.hs.len(), 4);
    assert!(p.contains_eps(vector![0.5, 0.5], -1e-9));
    assert!(!p.contains_eps(vector![1.0, 0.5], -1e-9));
    match p.halfspace_intersection() {
        HalfspaceIntersection::Bounded(verts) => assert_eq!(verts.len(), 4),
        _ => panic!("expected bounded"),
    }
}

#[test]
fn rect_helpers() {
    assert!(Rect::new(1.0, 0.0, 0.0, 1.0).is_err());
    let r = Rect::new(0.0, 10.0, 0.0, 4.0).unwrap();
    let inner = r.inset(1.0);
    assert_eq!(inner, Rect::new(1.0, 9.0, 1.0, 3.0).unwrap());
    // padding larger than the half-height collapses onto the center line
    let thin = r.inset(3.0);
    assert_eq!(thin.y_min, 2.0);
    assert_eq!(thin.y_max, 2.0);
    assert!(r.contains_eps(vector![10.0, 4.0], 0.0));
    assert!(!r.contains_eps(vector![10.5, 4.0], 0.0));
}
