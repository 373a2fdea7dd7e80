//! Breathing animation.
//!
//! Every vertex is pushed along its rest normal by a sine wave whose phase
//! depends on the vertex height and on time:
//!
//! ```text
//! d = sin(y / head_radius * π * frequency + time * speed) * normal * amount
//! ```
//!
//! Tentacle vertices are additionally scaled by `tentacle_multiplier`. The
//! displacement is always applied to the rest pose, so frames do not
//! accumulate. Normals are not updated for the displaced surface.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::config::{AnimationConfig, MedusaConfig};
use crate::generate::MeshBuffers;

/// Displacement of one vertex at `time`.
#[inline]
pub fn displacement(
    position: &Point3<f64>,
    normal: &Vector3<f64>,
    time: f64,
    head_radius: f64,
    animation: &AnimationConfig,
) -> Vector3<f64> {
    let phase = position.y / head_radius * PI * animation.frequency + time * animation.speed;
    normal * (phase.sin() * animation.amount)
}

/// Displaced vertex positions of `buffers` at `time`.
///
/// The buffers are not modified. This ignores `config.animation.enabled`;
/// use [`Medusa::update`](crate::creature::Medusa::update) for the gated
/// per-frame behaviour.
///
/// # Example
///
/// ```
/// use medusa::animate::animate;
/// use medusa::config::MedusaConfig;
/// use medusa::generate::build;
///
/// let config = MedusaConfig::default();
/// let buffers = build(&config).unwrap();
/// let frame = animate(&buffers, 0.25, &config);
/// assert_eq!(frame.len(), buffers.num_vertices());
/// ```
pub fn animate(buffers: &MeshBuffers, time: f64, config: &MedusaConfig) -> Vec<Point3<f64>> {
    let mut out = Vec::with_capacity(buffers.num_vertices());
    animate_into(buffers, time, config, &mut out);
    out
}

/// Like [`animate`], but writes into `out`, reusing its allocation.
///
/// `buffers` must carry one normal per vertex, as [`build`](crate::generate::build)
/// produces. Hand-assembled buffers with mismatched lengths panic in debug
/// builds and yield a truncated frame otherwise.
pub fn animate_into(
    buffers: &MeshBuffers,
    time: f64,
    config: &MedusaConfig,
    out: &mut Vec<Point3<f64>>,
) {
    debug_assert_eq!(
        buffers.normals.len(),
        buffers.vertices.len(),
        "one normal per vertex"
    );

    let head_radius = config.head.radius;
    let animation = &config.animation;
    let head_count = buffers.head_vertex_count;

    let displace = |(i, (p, n)): (usize, (&Point3<f64>, &Vector3<f64>))| {
        let mut d = displacement(p, n, time, head_radius, animation);
        if i >= head_count {
            d *= animation.tentacle_multiplier;
        }
        p + d
    };

    out.clear();
    if config.parallel {
        buffers
            .vertices
            .par_iter()
            .zip(buffers.normals.par_iter())
            .enumerate()
            .map(displace)
            .collect_into_vec(out);
    } else {
        out.extend(
            buffers
                .vertices
                .iter()
                .zip(buffers.normals.iter())
                .enumerate()
                .map(displace),
        );
    }
}
