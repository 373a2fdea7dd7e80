//! Tentacle tubes grown by a gravity-biased curve walk.
//!
//! A tentacle is built in its own local frame: it starts at the origin and
//! heads along +Z. Each ring `s` of the tube re-walks the curve from the
//! start up to progress `t = s / (segments - 1)`, so the rings are a
//! deterministic function of their index.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::config::TentacleConfig;
use crate::error::{MedusaError, Result};
use crate::math::normalize_or;
use crate::mesh::{lattice_uv, TriMesh};

/// Distance the walk backs up along the initial direction before starting.
const BACKSTEP: f64 = 20.0;

/// Progress advanced per walk step.
const STEP: f64 = 0.02;

/// Number of walk steps covering the full curve.
const STEPS: u32 = 50;

/// Progress below which the walk is not started at all.
const START_EPSILON: f64 = 1e-6;

/// Downward bias added to the direction after every step.
fn gravity() -> Vector3<f64> {
    Vector3::new(0.0, -0.5, 0.0)
}

/// Frame of the curve walk at one point along a tentacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TentacleSegment {
    /// Unit direction of travel.
    pub forward: Vector3<f64>,
    /// Current position.
    pub position: Point3<f64>,
    /// Position before the last step.
    pub previous_position: Point3<f64>,
    /// Unit vector across the tube.
    pub left: Vector3<f64>,
    /// Unit vector across the tube, orthogonal to `left`.
    pub up: Vector3<f64>,
    /// Tube radius.
    pub radius: f64,
}

/// Tube radius at walk progress `f` in `[0, 1]`.
///
/// Full radius over the first quarter, half radius over the middle half,
/// then a linear taper to zero.
///
/// # Example
///
/// ```
/// use medusa::generate::segment_radius;
///
/// assert_eq!(segment_radius(0.1, 20.0), 20.0);
/// assert_eq!(segment_radius(0.5, 20.0), 10.0);
/// assert_eq!(segment_radius(1.0, 20.0), 0.0);
/// ```
pub fn segment_radius(f: f64, radius: f64) -> f64 {
    if f < 0.25 {
        radius
    } else if f < 0.75 {
        radius * 0.5
    } else {
        radius * (1.0 - (f - 0.75) / 0.25) * 0.5
    }
}

/// Walk the tentacle curve from `start` up to progress `t`.
///
/// The walk first backs up [`BACKSTEP`] units along `forward`, then moves in
/// steps of `curve_length * 0.02`, bending the direction towards -Y after
/// each step. The left/up basis is carried from step to step so the tube
/// does not twist.
pub fn walk_segment(
    start: Point3<f64>,
    forward: Vector3<f64>,
    t: f64,
    curve_length: f64,
    radius: f64,
) -> TentacleSegment {
    let forward = normalize_or(forward, Vector3::z());
    let previous_position = start - forward * BACKSTEP;
    let left = normalize_or(Vector3::y().cross(&forward), Vector3::x());
    let up = normalize_or(forward.cross(&left), Vector3::y());

    let mut seg = TentacleSegment {
        forward,
        position: previous_position,
        previous_position,
        left,
        up,
        radius,
    };

    if t < START_EPSILON {
        return seg;
    }

    for step in 0..STEPS {
        let f = step as f64 * STEP;

        seg.position += seg.forward * curve_length * STEP;
        seg.forward = normalize_or(seg.position - seg.previous_position + gravity(), seg.forward);
        seg.left = normalize_or(seg.up.cross(&seg.forward), seg.left);
        seg.up = normalize_or(seg.forward.cross(&seg.left), seg.up);
        seg.radius = segment_radius(f, radius);

        if f >= t {
            break;
        }
        seg.previous_position = seg.position;
    }

    seg
}

/// Build one tentacle tube in its local frame (origin, heading +Z).
///
/// The tube has `segments` rings of `sides + 1` vertices; the last vertex of
/// each ring repeats the first to close the UV seam. Consecutive rings are
/// stitched with two triangles per side.
///
/// Needs at least 2 rings and 1 side; smaller resolutions are rejected.
pub fn build_tentacle(config: &TentacleConfig, curve_length: f64) -> Result<TriMesh> {
    let segments = config.segments;
    let sides = config.sides;
    if segments < 2 {
        return Err(MedusaError::invalid_param(
            "tentacles.segments",
            segments,
            "must be at least 2",
        ));
    }
    if sides == 0 {
        return Err(MedusaError::invalid_param("tentacles.sides", sides, "must be at least 1"));
    }
    let ring = sides + 1;

    let mut mesh = TriMesh::with_capacity(
        config.vertex_count(),
        2 * sides as usize * (segments - 1) as usize,
    );

    for s in 0..segments {
        let t = s as f64 / (segments as f64 - 1.0);
        let seg = walk_segment(Point3::origin(), Vector3::z(), t, curve_length, config.radius);
        let base = s * ring;

        for j in 0..=sides {
            let angle = 2.0 * PI * j as f64 / sides as f64;
            let offset = seg.left * (seg.radius * angle.cos()) + seg.up * (seg.radius * angle.sin());
            mesh.push_vertex(seg.position + offset, lattice_uv(j, sides, s, segments - 1));

            if s > 0 && j < sides {
                let cur = base + j;
                let prev = cur - ring;
                mesh.push_triangle(prev, cur + 1, cur);
                mesh.push_triangle(prev, prev + 1, cur + 1);
            }
        }
    }

    Ok(mesh)
}
