//! Tapered hollow box girder: station table, volume and a full midspan analysis.
//!
//! Usage:
//!   cargo run -p csf --example tapered_box
//!   RUST_LOG=debug cargo run -p csf --example tapered_box   (solver logs)
//!
//! Two models of the same girder are printed:
//! - solid outline with a nested void (weights 1 / 0);
//! - one slit-loop `Cell` polygon with an explicit wall thickness.

use anyhow::Result;
use csf::prelude::*;
use tracing_subscriber::fmt::SubscriberBuilder;

fn voided(width: f64, height: f64, t: f64, z: f64) -> Result<Section> {
    let outer = Polygon::new(rectangle(Point::zeros(), width, height), 1.0, "outer")?;
    let void = Polygon::new(
        rectangle(Point::zeros(), width - 2.0 * t, height - 2.0 * t),
        0.0,
        "void",
    )?;
    Ok(Section::new(vec![outer, void], z)?)
}

fn cell(width: f64, height: f64, t: f64, z: f64) -> Result<Section> {
    let girder = Polygon::with_topology(
        slit_box(Point::zeros(), width, height, t),
        1.0,
        "girder",
        Topology::Cell { t: Some(t) },
    )?;
    Ok(Section::new(vec![girder], z)?)
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let field = ContinuousSectionField::new(voided(1.8, 0.9, 0.2, 0.0)?, voided(1.2, 0.6, 0.1, 12.0)?)?;
    println!("{:>6} {:>10} {:>10} {:>10} {:>8}", "z", "A", "I1", "I2", "theta");
    for st in field.station_table(7)? {
        println!(
            "{:>6.2} {:>10.5} {:>10.6} {:>10.6} {:>8.4}",
            st.z, st.props.a, st.derived.i1, st.derived.i2, st.derived.theta
        );
    }
    println!("volume = {:.6}", field.volume()?);

    let mid = field.section(6.0)?;
    let full = section_full_analysis(&mid, None)?;
    println!("{}", serde_json::to_string_pretty(&full)?);

    let thin = ContinuousSectionField::new(cell(1.8, 0.9, 0.05, 0.0)?, cell(1.2, 0.6, 0.03, 12.0)?)?;
    let s = thin.section(6.0)?;
    let report = section_full_analysis(&s, None)?.torsion;
    println!(
        "cell @ z=6: J_bredt = {:.6e}, J_roark = {:.6e}, J_polar = {:.6e} (alpha = {:.3})",
        report.j_cell, report.j_roark, report.j_polar, report.alpha
    );
    Ok(())
}
