use super::*;
use crate::error::CsfError;
use nalgebra::vector;

fn unit_square() -> Vec<Point> {
    vec![
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ]
}

#[test]
fn polygon_rejects_invariant_violations() {
    let mut cw = unit_square();
    cw.reverse();
    let err = Polygon::new(cw, 1.0, "cw").unwrap_err();
    assert!(matches!(err, CsfError::InvalidPolygon { ref reason, .. } if reason.contains("clockwise")));

    let two = vec![vector![0.0, 0.0], vector![1.0, 0.0]];
    assert!(Polygon::new(two, 1.0, "line").is_err());

    let flat = vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![2.0, 0.0]];
    let err = Polygon::new(flat, 1.0, "flat").unwrap_err();
    assert!(err.to_string().contains("below tolerance"));

    assert!(Polygon::new(unit_square(), 1.0, "").is_err());
    assert!(Polygon::new(unit_square(), 1.0, "web@wall").is_err());
    assert!(Polygon::new(unit_square(), f64::NAN, "nan").is_err());
    assert!(Polygon::with_topology(unit_square(), 1.0, "w", Topology::Wall { t: Some(-0.1) }).is_err());
}

#[test]
fn section_rejects_duplicate_names() {
    let a = Polygon::new(unit_square(), 1.0, "a").unwrap();
    let b = a.clone();
    assert_eq!(
        Section::new(vec![a, b], 0.0).unwrap_err(),
        CsfError::DuplicateName("a".into())
    );
    assert!(Section::new(vec![], 0.0).is_err());
}

#[test]
fn tagged_names_round_trip() {
    let (base, topo) = parse_tagged_name("web@wall@t=0.02").unwrap();
    assert_eq!(base, "web");
    assert_eq!(topo, Topology::Wall { t: Some(0.02) });
    assert_eq!(compose_tagged_name(&base, &topo), "web@wall@t=0.02");

    let (base, topo) = parse_tagged_name("box@cell").unwrap();
    assert_eq!((base.as_str(), topo), ("box", Topology::Cell { t: None }));
    assert_eq!(parse_tagged_name("solid").unwrap().1, Topology::Plain);

    assert!(parse_tagged_name("x@wall@cell").is_err());
    assert!(parse_tagged_name("x@foo").is_err());
    assert!(parse_tagged_name("x@t=0.1").is_err());
    assert!(parse_tagged_name("x@cell@t=abc").is_err());
    assert!(parse_tagged_name("@cell").is_err());

    let p = Polygon::from_tagged_name(unit_square(), 1.0, "flange@closed@t=0.5").unwrap();
    assert_eq!(p.name(), "flange");
    assert_eq!(p.topology(), Topology::Closed { t: Some(0.5) });
    assert_eq!(p.tagged_name(), "flange@closed@t=0.5");
}

#[test]
fn point_in_polygon_is_boundary_inclusive() {
    let sq = unit_square();
    let eps = 1e-9;
    assert!(point_in_polygon(vector![0.5, 0.5], &sq, eps));
    assert!(point_in_polygon(vector![1.0, 0.5], &sq, eps));
    assert!(point_in_polygon(vector![0.0, 0.0], &sq, eps));
    assert!(point_in_polygon(vector![1.0 + 1e-10, 0.5], &sq, eps));
    assert!(!point_in_polygon(vector![1.0 + 1e-6, 0.5], &sq, eps));
    assert!(!point_in_polygon(vector![-0.5, 0.5], &sq, eps));

    // L-shape notch
    let l = vec![
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 1.0],
        vector![1.0, 1.0],
        vector![1.0, 2.0],
        vector![0.0, 2.0],
    ];
    assert!(!point_in_polygon(vector![1.5, 1.5], &l, eps));
    assert!(point_in_polygon(vector![0.5, 1.5], &l, eps));
}

#[test]
fn self_intersection_detects_bowtie_only() {
    let bowtie = vec![
        vector![0.0, 0.0],
        vector![1.0, 1.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
    ];
    assert!(find_self_intersection(&bowtie, 1e-12).is_some());
    assert!(find_self_intersection(&unit_square(), 1e-12).is_none());
    // slit loops only touch along the bridge
    let slit = shapes::slit_box(Point::zeros(), 2.0, 1.0, 0.1);
    assert!(find_self_intersection(&slit, 1e-12).is_none());
}

#[test]
fn clip_above_keeps_upper_part() {
    let rect = shapes::rectangle(Point::zeros(), 2.0, 4.0);
    let upper = clip_above(&rect, 0.5);
    assert!((signed_area(&upper) - 2.0 * 1.5).abs() < 1e-12);
    assert!(clip_above(&rect, 3.0).is_empty());
    assert!((signed_area(&clip_above(&rect, -5.0)) - 8.0).abs() < 1e-12);
}

#[test]
fn rotation_preserves_area() {
    let rect = shapes::rectangle(vector![0.3, -0.2], 1.8, 0.9);
    let rot = rotate(&rect, std::f64::consts::FRAC_PI_4, Point::zeros());
    assert!((signed_area(&rot) - signed_area(&rect)).abs() < 1e-12);
    assert!((perimeter(&rot) - 5.4).abs() < 1e-12);
}

#[test]
fn serde_round_trip_validates() {
    let p = Polygon::with_topology(unit_square(), 0.5, "plate", Topology::Wall { t: Some(0.01) })
        .unwrap();
    let s = Section::new(vec![p], 1.5).unwrap();
    let json = serde_json::to_string(&s).unwrap();
    let back: Section = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);

    let bad = r#"{"z":0.0,"polygons":[{"vertices":[[0,0],[0,1],[1,1],[1,0]],"weight":1.0,"name":"cw"}]}"#;
    let err = serde_json::from_str::<Section>(bad).unwrap_err();
    assert!(err.to_string().contains("clockwise"));

    let plain = r#"{"vertices":[[0,0],[1,0],[1,1]],"weight":1.0,"name":"tri"}"#;
    let tri: Polygon = serde_json::from_str(plain).unwrap();
    assert_eq!(tri.topology(), Topology::Plain);
}
