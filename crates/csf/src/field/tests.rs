use super::*;
use crate::geom2::rand::{draw_star_loop, RadialCfg, ReplayToken, VertexCount};
use crate::geom2::shapes::{rectangle, slit_box};
use crate::testutil::capture_warnings;
use nalgebra::vector;
use proptest::prelude::*;

fn poly(name: &str, center: Point, w: f64, h: f64, weight: f64) -> Polygon {
    Polygon::new(rectangle(center, w, h), weight, name).unwrap()
}

/// Outer 1.8×0.9 solid with a 1.2×0.5 void, tapering to 1.2×0.6 / 0.8×0.3.
fn tapered_box_field() -> ContinuousSectionField {
    let s0 = Section::new(
        vec![
            poly("outer", Point::zeros(), 1.8, 0.9, 1.0),
            poly("void", Point::zeros(), 1.2, 0.5, 0.0),
        ],
        0.0,
    )
    .unwrap();
    let s1 = Section::new(
        vec![
            poly("outer", Point::zeros(), 1.2, 0.6, 1.0),
            poly("void", Point::zeros(), 0.8, 0.3, 0.0),
        ],
        10.0,
    )
    .unwrap();
    ContinuousSectionField::new(s0, s1).unwrap()
}

#[test]
fn endpoints_are_reproduced_exactly() {
    let field = tapered_box_field();
    for (z, reference) in [(0.0, field.s0()), (10.0, field.s1())] {
        let s = field.section(z).unwrap();
        assert_eq!(s.z(), z);
        for (got, want) in s.polygons().iter().zip(reference.polygons()) {
            assert_eq!(got.vertices(), want.vertices());
            assert_eq!(got.name(), want.name());
        }
    }
}

#[test]
fn midpoint_vertices_and_relative_weights() {
    let field = tapered_box_field();
    let s = field.section(5.0).unwrap();
    let outer = s.get("outer").unwrap();
    assert!((outer.vertices()[0] - vector![-0.75, -0.375]).norm() < 1e-15);
    assert_eq!(outer.weight(), 1.0);
    // void: absolute 0 inside an absolute-1 container
    assert_eq!(s.get("void").unwrap().weight(), -1.0);
    assert_eq!(field.immediate_container(1), Some(0));
    assert_eq!(field.container_chain(1), vec![0]);
    assert_eq!(field.direct_children_map()[&Some(0)], vec![1]);
}

#[test]
fn z_outside_field_is_rejected_but_tolerance_is_clamped() {
    let field = tapered_box_field();
    assert!(matches!(
        field.section(10.5),
        Err(CsfError::ZOutOfRange { lo, hi, .. }) if lo == 0.0 && hi == 10.0
    ));
    assert!(field.section(-1e-3).is_err());
    assert!(field.section(f64::NAN).is_err());
    let s = field.section(10.0 + 1e-12).unwrap();
    assert_eq!(s.z(), 10.0);
}

#[test]
fn reversed_stations_are_supported() {
    let s0 = Section::new(vec![poly("a", Point::zeros(), 2.0, 2.0, 1.0)], 4.0).unwrap();
    let s1 = Section::new(vec![poly("a", Point::zeros(), 1.0, 1.0, 1.0)], 0.0).unwrap();
    let field = ContinuousSectionField::new(s0, s1).unwrap();
    let s = field.section(2.0).unwrap();
    assert!((s.polygons()[0].area() - 1.5 * 1.5).abs() < 1e-12);
}

#[test]
fn construction_rejects_mismatched_endpoints() {
    let s0 = Section::new(vec![poly("a", Point::zeros(), 1.0, 1.0, 1.0)], 0.0).unwrap();
    let s1 = Section::new(
        vec![
            poly("a", Point::zeros(), 1.0, 1.0, 1.0),
            poly("b", Point::new(3.0, 0.0), 1.0, 1.0, 1.0),
        ],
        1.0,
    )
    .unwrap();
    assert!(matches!(
        ContinuousSectionField::new(s0.clone(), s1),
        Err(CsfError::CardinalityMismatch(_))
    ));

    let tri = Polygon::new(
        vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]],
        1.0,
        "a",
    )
    .unwrap();
    let s1 = Section::new(vec![tri], 1.0).unwrap();
    assert!(matches!(
        ContinuousSectionField::new(s0.clone(), s1),
        Err(CsfError::CardinalityMismatch(_))
    ));

    let same_z = s0.clone();
    assert!(ContinuousSectionField::new(s0, same_z).is_err());
}

#[test]
fn topology_and_thickness_resolution() {
    let cell0 = Polygon::with_topology(
        slit_box(Point::zeros(), 2.0, 1.0, 0.1),
        1.0,
        "box",
        Topology::Cell { t: Some(0.1) },
    )
    .unwrap();
    let cell1 = Polygon::with_topology(
        slit_box(Point::zeros(), 2.0, 1.0, 0.2),
        1.0,
        "box",
        Topology::Cell { t: Some(0.2) },
    )
    .unwrap();
    let field = ContinuousSectionField::new(
        Section::new(vec![cell0.clone()], 0.0).unwrap(),
        Section::new(vec![cell1], 2.0).unwrap(),
    )
    .unwrap();
    let mid = field.section(1.0).unwrap();
    let t = mid.polygons()[0].topology().thickness().unwrap();
    assert!((t - 0.15).abs() < 1e-15);
    assert_eq!(mid.polygons()[0].tagged_name(), format!("box@cell@t={t}"));

    // thickness held constant from the end that defines it
    let plain_end = Polygon::new(slit_box(Point::zeros(), 2.0, 1.0, 0.2), 1.0, "box").unwrap();
    let field = ContinuousSectionField::new(
        Section::new(vec![cell0.clone()], 0.0).unwrap(),
        Section::new(vec![plain_end], 2.0).unwrap(),
    )
    .unwrap();
    let topo = field.section(1.5).unwrap().polygons()[0].topology();
    assert_eq!(topo, Topology::Cell { t: Some(0.1) });

    // cell without any thickness fails at query time
    let bare0 =
        Polygon::with_topology(cell0.vertices().to_vec(), 1.0, "box", Topology::Cell { t: None })
            .unwrap();
    let field = ContinuousSectionField::new(
        Section::new(vec![bare0.clone()], 0.0).unwrap(),
        Section::new(vec![bare0.clone()], 2.0).unwrap(),
    )
    .unwrap();
    assert!(matches!(
        field.section(1.0),
        Err(CsfError::MissingThickness { ref name, z }) if name == "box" && z == 1.0
    ));

    // conflicting tags
    let wall =
        Polygon::with_topology(cell0.vertices().to_vec(), 1.0, "box", Topology::Wall { t: None })
            .unwrap();
    let field = ContinuousSectionField::new(
        Section::new(vec![cell0], 0.0).unwrap(),
        Section::new(vec![wall], 2.0).unwrap(),
    )
    .unwrap();
    assert!(matches!(
        field.section(0.5),
        Err(CsfError::TopologyConflict { .. })
    ));
}

#[test]
fn weight_laws_drive_absolute_weights() {
    let mut field = tapered_box_field();
    // void filled with a material whose stiffness ramps 0 → 0.5 by table
    let laws = WeightLaws::new()
        .with(2, LookupLaw::new(vec![(0.0, 0.0), (10.0, 0.5)]).unwrap())
        .with(
            1,
            FnLaw::new(|ctx: &WeightCtx<'_>| Ok(ctx.w0 + 0.1 * ctx.tau())),
        );
    field.set_weight_laws(laws).unwrap();
    assert!(field.set_weight_laws(WeightLaws::new()).is_err());

    let s = field.section(4.0).unwrap();
    let w_outer = 1.0 + 0.04;
    let w_void = 0.2;
    assert!((s.get("outer").unwrap().weight() - w_outer).abs() < 1e-15);
    assert!((s.get("void").unwrap().weight() - (w_void - w_outer)).abs() < 1e-15);
    assert!((field.absolute_weight(1, 4.0).unwrap() - w_void).abs() < 1e-15);
}

#[test]
fn weight_law_index_and_failures_are_reported() {
    let mut field = tapered_box_field();
    let err = field
        .set_weight_laws(WeightLaws::new().with(3, LinearLaw))
        .unwrap_err();
    assert!(matches!(err, CsfError::InvalidConfig(_)));

    let mut field = tapered_box_field();
    field
        .set_weight_laws(
            WeightLaws::new().with(1, FnLaw::new(|ctx: &WeightCtx<'_>| Ok(1.0 / (ctx.z - 5.0)))),
        )
        .unwrap();
    assert!(field.section(4.0).is_ok());
    assert!(matches!(
        field.section(5.0),
        Err(CsfError::WeightLaw { ref name, .. }) if name == "outer"
    ));
}

#[test]
fn absolute_weight_rejects_unknown_polygon_index() {
    let field = tapered_box_field();
    assert_eq!(field.absolute_weight(1, 1.0).unwrap(), 0.0);
    assert_eq!(
        field.absolute_weight(7, 1.0).unwrap_err(),
        CsfError::IndexOutOfRange { index: 7, len: 2 }
    );
    assert!(matches!(
        field.absolute_weight(2, 1.0),
        Err(CsfError::IndexOutOfRange { index: 2, .. })
    ));
}

#[test]
fn lookup_law_uses_field_length_scale() {
    // field L = 10, so stations within 1e-8 of a table end still resolve
    let mut field = tapered_box_field();
    let law = LookupLaw::new(vec![(0.0, 0.0), (1.0, 0.5)]).unwrap();
    field.set_weight_laws(WeightLaws::new().with(2, law)).unwrap();
    assert_eq!(field.absolute_weight(1, 1.0 + 5e-9).unwrap(), 0.5);
    assert!(matches!(
        field.absolute_weight(1, 1.0 + 1e-6),
        Err(CsfError::WeightLaw { ref name, .. }) if name == "void"
    ));
}

#[test]
fn self_intersecting_interpolation_warns_but_succeeds() {
    // notch vertex (2, 1) sinks to (2, -1), crossing the bottom edge for z > 5;
    // the signed area 8 + 2y stays positive throughout
    let notch = |y: f64, z: f64| {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(2.0, y),
            Point::new(0.0, 4.0),
        ];
        Section::new(vec![Polygon::new(pts, 1.0, "notch").unwrap()], z).unwrap()
    };
    let field = ContinuousSectionField::new(notch(1.0, 0.0), notch(-1.0, 10.0)).unwrap();

    let (clean, log) = capture_warnings(|| field.section(2.0));
    assert!(clean.is_ok());
    assert!(!log.contains("self-intersecting"), "{log}");

    let (crossed, log) = capture_warnings(|| field.section(7.5));
    let s = crossed.unwrap();
    assert!((s.polygons()[0].signed_area() - 7.0).abs() < 1e-12);
    assert!(log.contains("self-intersecting"), "{log}");
    assert!(log.contains("notch"), "{log}");
}

#[test]
fn field_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContinuousSectionField>();

    let field = tapered_box_field();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|k| {
                let field = &field;
                scope.spawn(move || field.section(2.0 * k as f64).map(|s| s.len()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), 2);
        }
    });
}

fn star_loop(seed: u64, n: usize, base_radius: f64) -> Vec<Point> {
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(n),
        base_radius,
        random_phase: false,
        ..RadialCfg::default()
    };
    draw_star_loop(cfg, ReplayToken { seed, index: 0 })
}

proptest! {
    #[test]
    fn endpoint_sections_are_bit_exact(
        seed0 in any::<u64>(),
        seed1 in any::<u64>(),
        n in 8usize..24,
        z0 in -10.0f64..10.0,
        len in 0.1f64..20.0,
        w_outer in (0.1f64..5.0, 0.1f64..5.0),
        w_inner in (-1.0f64..1.0, -1.0f64..1.0),
    ) {
        // outer radii lie in [0.75, 1.25], inner ones in [0.225, 0.375]; with n >= 8
        // every outer edge stays beyond 0.6 from the center, so the loops nest
        let section = |seed: u64, z: f64, wo: f64, wi: f64| {
            Section::new(
                vec![
                    Polygon::new(star_loop(seed, n, 1.0), wo, "outer").unwrap(),
                    Polygon::new(star_loop(seed ^ 0x5a5a, n, 0.3), wi, "inner").unwrap(),
                ],
                z,
            )
            .unwrap()
        };
        let z1 = z0 + len;
        let field = ContinuousSectionField::new(
            section(seed0, z0, w_outer.0, w_inner.0),
            section(seed1, z1, w_outer.1, w_inner.1),
        )
        .unwrap();
        prop_assert_eq!(field.immediate_container(1), Some(0));

        for (z, reference, wo, wi) in [
            (z0, field.s0(), w_outer.0, w_inner.0),
            (z1, field.s1(), w_outer.1, w_inner.1),
        ] {
            let s = field.section(z).unwrap();
            prop_assert_eq!(s.z(), z);
            for (got, want) in s.polygons().iter().zip(reference.polygons()) {
                prop_assert_eq!(got.vertices(), want.vertices());
            }
            prop_assert_eq!(s.polygons()[0].weight(), wo);
            prop_assert_eq!(s.polygons()[1].weight(), wi - wo);
            prop_assert_eq!(field.absolute_weight(1, z).unwrap(), wi);
        }
    }
}
