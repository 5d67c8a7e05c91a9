use std::time::Instant;

use cadbox::glam::DVec3;
use cadbox::{
    DisplaySink, MeshJob, MeshParameters, ObbLevel, OrientedBox, PolyKernel, PolySolid,
    RecordingSink, RigidTransform, SeparatingAxisTester, ShapeBoxIndex, TightnessClassifier,
};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Bounding box analysis on fixture solids")]
struct Cli {
    /// Fixture solid to analyse.
    #[arg(long, value_enum, default_value_t = ShapeKind::Cuboid)]
    shape: ShapeKind,

    /// What to do with it.
    #[arg(long, value_enum, default_value_t = Action::Obb)]
    action: Action,

    /// Characteristic size of the fixture.
    #[arg(long, default_value_t = 1.0)]
    size: f64,

    /// Rotation about the Z axis in degrees.
    #[arg(long, default_value_t = 0.0)]
    angle: f64,

    /// Mesh faces on one thread.
    #[arg(long)]
    sequential: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShapeKind {
    Cuboid,
    Sphere,
    Cylinder,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Action {
    /// Show the solid box and every face box.
    Obb,
    /// Classify faces as box-like or curved.
    Faces,
    /// Mesh the whole shape and display its triangles.
    Mesh,
    /// Cull face fragments against a box around the solid center.
    Cull,
}

/// Logs what would be drawn.
#[derive(Default)]
struct LogSink {
    recorded: RecordingSink,
}

impl DisplaySink for LogSink {
    fn draw_outline(&mut self, outline: &cadbox::BoxOutline) {
        log::debug!("outline base {:?} extrusion {:?}", outline.base, outline.extrusion);
        self.recorded.draw_outline(outline);
    }

    fn draw_triangle(&mut self, triangle: &cadbox::Triangle) {
        self.recorded.draw_triangle(triangle);
    }

    fn status(&mut self, message: &str) {
        log::info!("{message}");
        self.recorded.status(message);
    }
}

fn fixture(kind: ShapeKind, size: f64) -> PolySolid {
    match kind {
        ShapeKind::Cuboid => PolySolid::cuboid(DVec3::ZERO, DVec3::new(2.0, 1.0, 0.5) * size),
        ShapeKind::Sphere => PolySolid::uv_sphere(DVec3::ZERO, size, 32, 16),
        ShapeKind::Cylinder => PolySolid::cylinder(DVec3::ZERO, size, 3.0 * size, 32),
    }
}

fn describe(label: &str, b: &OrientedBox) {
    log::info!(
        "{label}: center {:.4?} half sizes {:.4?} x {:.4?}",
        b.center(),
        b.half_sizes(),
        b.x_axis()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let kernel = PolyKernel::new();
    let rotation = RigidTransform::from_axis_angle(DVec3::Z, cli.angle.to_radians());
    let solid = fixture(cli.shape, cli.size).transformed(&rotation);
    let mut sink = LogSink::default();
    let start = Instant::now();

    match cli.action {
        Action::Obb => {
            let index = ShapeBoxIndex::build_boxes_only(&kernel, &solid)?;
            describe("solid", index.solid_box());
            for (i, entry) in index.faces().iter().enumerate() {
                describe(&format!("face {i}"), entry.bbox());
            }
            index.display(&mut sink, ObbLevel::Shape);
            index.display(&mut sink, ObbLevel::Face);
            let aabb = index.full_aabb();
            sink.status(&format!(
                "Boxes: {} (AABB {:.3?} .. {:.3?})",
                index.len() + 1,
                aabb.min,
                aabb.max
            ));
        }
        Action::Faces => {
            let index = ShapeBoxIndex::build_boxes_only(&kernel, &solid)?;
            let classes = index.classify_faces(&kernel, &TightnessClassifier::face())?;
            for class in &classes {
                log::info!(
                    "face {}: {}",
                    class.index,
                    if class.box_like { "box-like" } else { "curved" }
                );
            }
            let curved = classes.iter().filter(|c| !c.box_like).count();
            sink.status(&format!("Curved faces: {curved} of {}", classes.len()));
        }
        Action::Mesh => {
            let mut params = MeshParameters::default();
            if cli.sequential {
                params = params.sequential();
            }
            MeshJob::new(&kernel, &solid, params).run(&mut sink)?;
        }
        Action::Cull => {
            let index = ShapeBoxIndex::build(&kernel, &solid)?;
            let solid_box = index.solid_box();
            let inner = solid_box.with_half_sizes(solid_box.half_sizes() * 0.5)?;
            let triangles: Vec<_> = index
                .faces()
                .iter()
                .flat_map(|f| f.triangles().iter().copied())
                .collect();
            let hits = SeparatingAxisTester::cull(&inner, &triangles);
            sink.draw_outline(&inner.to_outline());
            for &i in &hits {
                sink.draw_triangle(&triangles[i]);
            }
            sink.status(&format!("Hit triangles: {} of {}", hits.len(), triangles.len()));
        }
    }

    log::info!(
        "{:?} on {:?} done in {:?} ({} outlines, {} triangles)",
        cli.action,
        cli.shape,
        start.elapsed(),
        sink.recorded.outlines.len(),
        sink.recorded.triangles.len()
    );
    Ok(())
}
