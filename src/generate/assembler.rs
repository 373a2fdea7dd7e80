//! Creature assembly: head grid, tentacle placement and the combined buffers.

use nalgebra::{Isometry3, Point2, Point3, Vector3, Vector4};
use rayon::prelude::*;

use super::head::{eval_head_grid, HeadGrid};
use super::tentacle::build_tentacle;
use crate::config::MedusaConfig;
use crate::error::Result;
use crate::math::placement;
use crate::mesh::{lattice_uv, vertex_normals, vertex_tangents, Aabb, TriMesh};
use crate::progress::Progress;

/// Where and how a tentacle was attached to the head.
#[derive(Debug, Clone, PartialEq)]
pub struct TentacleAttachment {
    /// Head grid row of the root cell.
    pub segment: u32,
    /// Head grid column of the root cell.
    pub side: u32,
    /// Polar angle of the root, one step below the attachment row.
    pub theta: f64,
    /// Azimuth of the root cell.
    pub phi: f64,
    /// Tentacle-to-head transform: root position and surface-normal orientation.
    pub placement: Isometry3<f64>,
    /// Curve length after azimuthal variation.
    pub curve_length: f64,
    /// Index of the tentacle's first vertex in the combined buffer.
    pub vertex_offset: usize,
    /// Number of vertices in the tentacle tube.
    pub vertex_count: usize,
}

impl TentacleAttachment {
    /// Range of the tentacle's vertices in the combined buffer.
    pub fn vertex_range(&self) -> std::ops::Range<usize> {
        self.vertex_offset..self.vertex_offset + self.vertex_count
    }
}

/// The combined creature mesh.
///
/// The first [`head_vertex_count`](Self::head_vertex_count) vertices are the
/// head grid in row-major `(segment, side)` order; the remaining vertices are
/// the tentacles, one contiguous ring-major block each, in attachment order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions (rest pose).
    pub vertices: Vec<Point3<f64>>,
    /// Unit vertex normals of the rest pose.
    pub normals: Vec<Vector3<f64>>,
    /// Texture coordinates.
    pub uvs: Vec<Point2<f64>>,
    /// Tangents with handedness in `w`.
    pub tangents: Vec<Vector4<f64>>,
    /// Flat triangle index list.
    pub indices: Vec<u32>,
    /// Number of head vertices at the start of the buffer.
    pub head_vertex_count: usize,
    /// Attachment records, in buffer order.
    pub tentacles: Vec<TentacleAttachment>,
    /// Bounds of the rest pose.
    pub bounds: Aabb,
}

impl MeshBuffers {
    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// First vertex index of every tentacle.
    pub fn tentacle_start_offsets(&self) -> Vec<usize> {
        self.tentacles.iter().map(|t| t.vertex_offset).collect()
    }

    /// Whether vertex `index` belongs to a tentacle.
    #[inline]
    pub fn is_tentacle_vertex(&self, index: usize) -> bool {
        index >= self.head_vertex_count
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Total surface area of the rest pose.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let e1 = self.vertices[b] - self.vertices[a];
                let e2 = self.vertices[c] - self.vertices[a];
                0.5 * e1.cross(&e2).norm()
            })
            .sum()
    }
}

/// Build the creature mesh from `config`.
///
/// The configuration is validated first; nothing is allocated if it is
/// rejected.
///
/// # Example
///
/// ```
/// use medusa::config::MedusaConfig;
/// use medusa::generate::build;
///
/// let config = MedusaConfig::default();
/// let buffers = build(&config).unwrap();
///
/// assert_eq!(buffers.head_vertex_count, 11 * 21);
/// assert_eq!(buffers.tentacles.len(), 4);
/// assert_eq!(buffers.indices.len() % 3, 0);
/// ```
pub fn build(config: &MedusaConfig) -> Result<MeshBuffers> {
    build_with_progress(config, &Progress::none())
}

/// Build the creature mesh with progress reporting.
///
/// Reports one step for the head, one per tentacle and one for the derived
/// attributes.
pub fn build_with_progress(config: &MedusaConfig, progress: &Progress) -> Result<MeshBuffers> {
    config.validate()?;

    let total_steps = config.tentacles.count as usize + 2;
    progress.report(0, total_steps, "Evaluating head surface");

    let grid = eval_head_grid(&config.head, config.grid.sides, config.grid.segments)?;
    let (mut combined, mut attachments) = stitch_head(&grid, config)?;
    let head_vertex_count = combined.num_vertices();

    log::debug!(
        "Head grid: {} vertices, {} triangles, {} tentacle roots",
        head_vertex_count,
        combined.num_triangles(),
        attachments.len()
    );

    let tentacle_meshes: Vec<TriMesh> = if config.parallel {
        attachments
            .par_iter()
            .map(|a| build_tentacle(&config.tentacles, a.curve_length))
            .collect::<Result<_>>()?
    } else {
        attachments
            .iter()
            .map(|a| build_tentacle(&config.tentacles, a.curve_length))
            .collect::<Result<_>>()?
    };

    for (i, (attachment, tentacle)) in attachments.iter_mut().zip(&tentacle_meshes).enumerate() {
        progress.report(i + 1, total_steps, "Attaching tentacles");
        attachment.vertex_offset = combined.append_transformed(tentacle, &attachment.placement)?;
        attachment.vertex_count = tentacle.num_vertices();
        log::trace!(
            "Tentacle {} at (segment {}, side {}): length {:.3}, vertices {:?}",
            i,
            attachment.segment,
            attachment.side,
            attachment.curve_length,
            attachment.vertex_range()
        );
    }

    combined.validate()?;

    progress.report(total_steps - 1, total_steps, "Computing normals and tangents");
    let normals = vertex_normals(&combined);
    let tangents = vertex_tangents(&combined, &normals);
    let bounds = Aabb::from_points(&combined.positions).unwrap_or(Aabb {
        min: Point3::origin(),
        max: Point3::origin(),
    });

    log::debug!(
        "Creature mesh: {} vertices, {} triangles",
        combined.num_vertices(),
        combined.num_triangles()
    );
    progress.finish(total_steps);

    let TriMesh {
        positions,
        uvs,
        indices,
    } = combined;

    Ok(MeshBuffers {
        vertices: positions,
        normals,
        uvs,
        tangents,
        indices,
        head_vertex_count,
        tentacles: attachments,
        bounds,
    })
}

/// Turn the head grid into a triangle mesh and pick the tentacle roots.
///
/// Tentacles attach on the attachment row at every column that is a positive
/// multiple of `sides / count`; the last one sits on the seam column. Each
/// root is evaluated at [`HeadGrid::root_theta`] of that row.
fn stitch_head(grid: &HeadGrid, config: &MedusaConfig) -> Result<(TriMesh, Vec<TentacleAttachment>)> {
    let sides = grid.sides;
    let segments = grid.segments;
    let row = config.attachment_row();
    let stride = config.attachment_stride();

    let mut mesh = TriMesh::with_capacity(grid.positions.len(), 2 * sides as usize * segments as usize);
    let mut attachments = Vec::with_capacity(config.tentacles.count as usize);

    for segment in 0..=segments {
        for side in 0..=sides {
            let i = grid.index(segment, side);
            mesh.push_vertex(grid.positions[i], lattice_uv(side, sides, segment, segments));

            if i64::from(segment) == row && side > 0 && side % stride == 0 {
                let phi = grid.phi(side);
                let curve_length = config.tentacles.length * config.tentacles.length_multiplier(phi);
                if curve_length <= 0.0 {
                    log::warn!(
                        "Tentacle at phi {:.3} has non-positive length {:.3} and grows into the head",
                        phi,
                        curve_length
                    );
                }
                let (root, normal) = grid.root_frame(segment, side, &config.head)?;
                attachments.push(TentacleAttachment {
                    segment,
                    side,
                    theta: grid.root_theta(segment),
                    phi,
                    placement: placement(&root, &normal),
                    curve_length,
                    vertex_offset: 0,
                    vertex_count: 0,
                });
            }

            if segment == segments || side == sides {
                continue;
            }

            let a = i as u32;
            let c = a + sides + 1;
            mesh.push_triangle(a, c, c + 1);
            mesh.push_triangle(a, c + 1, a + 1);
        }
    }

    Ok((mesh, attachments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MedusaError;

    fn small_config() -> MedusaConfig {
        MedusaConfig::default()
            .with_grid(8, 6)
            .with_tentacle_count(2)
            .with_tentacle_resolution(5, 3)
    }

    #[test]
    fn test_indices_are_valid() {
        for config in [MedusaConfig::default(), small_config()] {
            let buffers = build(&config).unwrap();
            assert_eq!(buffers.indices.len() % 3, 0);
            let n = buffers.num_vertices() as u32;
            assert!(buffers.indices.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn test_buffer_sizes() {
        let config = MedusaConfig::default();
        let buffers = build(&config).unwrap();

        assert_eq!(buffers.head_vertex_count, 11 * 21);
        assert_eq!(buffers.num_vertices(), config.total_vertex_count());
        assert_eq!(buffers.normals.len(), buffers.num_vertices());
        assert_eq!(buffers.uvs.len(), buffers.num_vertices());
        assert_eq!(buffers.tangents.len(), buffers.num_vertices());

        // Head: 10 * 20 cells, tentacles: 19 ring gaps * 4 sides, two triangles each
        assert_eq!(buffers.num_triangles(), 2 * 10 * 20 + 4 * 2 * 19 * 4);
    }

    #[test]
    fn test_head_vertices_come_first() {
        let config = small_config();
        let buffers = build(&config).unwrap();
        let grid = eval_head_grid(&config.head, 8, 6).unwrap();
        assert_eq!(&buffers.vertices[..buffers.head_vertex_count], &grid.positions[..]);
    }

    #[test]
    fn test_tentacle_blocks_are_contiguous() {
        let config = MedusaConfig::default();
        let buffers = build(&config).unwrap();
        let per_tentacle = config.tentacles.vertex_count();

        let offsets = buffers.tentacle_start_offsets();
        assert_eq!(offsets.len(), 4);
        for (k, offset) in offsets.iter().enumerate() {
            assert_eq!(*offset, buffers.head_vertex_count + k * per_tentacle);
        }
        let last = buffers.tentacles.last().unwrap();
        assert_eq!(last.vertex_range().end, buffers.num_vertices());

        assert!(!buffers.is_tentacle_vertex(buffers.head_vertex_count - 1));
        assert!(buffers.is_tentacle_vertex(buffers.head_vertex_count));
    }

    #[test]
    fn test_attachment_cells() {
        let config = MedusaConfig::default();
        let buffers = build(&config).unwrap();
        let sides: Vec<u32> = buffers.tentacles.iter().map(|t| t.side).collect();
        assert_eq!(sides, vec![5, 10, 15, 20]);
        assert!(buffers.tentacles.iter().all(|t| t.segment == 6));
    }

    #[test]
    fn test_tentacles_root_on_head() {
        let config = MedusaConfig::default();
        let buffers = build(&config).unwrap();
        let grid = eval_head_grid(&config.head, 20, 10).unwrap();

        for t in &buffers.tentacles {
            let (root, normal) = grid.root_frame(t.segment, t.side, &config.head).unwrap();
            let origin = t.placement * Point3::origin();
            assert!((origin - root).norm() < 1e-9);

            // Local +Z is the head surface normal at the root.
            assert!((t.placement.rotation * Vector3::z() - normal).norm() < 1e-9);
        }
    }

    #[test]
    fn test_tentacles_root_in_rim_band() {
        let config = MedusaConfig::default();
        let buffers = build(&config).unwrap();
        let grid = eval_head_grid(&config.head, 20, 10).unwrap();

        for t in &buffers.tentacles {
            assert!((t.theta.to_degrees() - 126.0).abs() < 1e-9);
            assert!(t.theta > config.head.clamp_angle());

            // The root lies on row 7 of the grid, below the attachment row.
            let origin = t.placement * Point3::origin();
            let below = grid.positions[grid.index(t.segment + 1, t.side)];
            assert!((origin - below).norm() < 1e-9);
            let row = grid.positions[grid.index(t.segment, t.side)];
            assert!(origin.y < row.y);
        }
    }

    #[test]
    fn test_length_variation() {
        let config = MedusaConfig::default();
        let buffers = build(&config).unwrap();
        for t in &buffers.tentacles {
            let expected = 250.0 * ((t.phi * 4.0).sin() + 0.5);
            assert!((t.curve_length - expected).abs() < 1e-9);
        }

        // With four tentacles a quarter turn apart, frequency 4 gives every
        // tentacle the same phase. Frequency 1 spreads them out.
        let mut config = MedusaConfig::default();
        config.tentacles.variation_frequency = 1.0;
        let buffers = build(&config).unwrap();
        let lengths: Vec<f64> = buffers.tentacles.iter().map(|t| t.curve_length).collect();
        assert!(lengths.windows(2).any(|w| (w[0] - w[1]).abs() > 1e-6));
    }

    #[test]
    fn test_normals_are_unit() {
        let buffers = build(&MedusaConfig::default()).unwrap();
        for n in &buffers.normals {
            assert!((n.norm() - 1.0).abs() < 1e-9);
        }
        for t in &buffers.tangents {
            assert!((t.xyz().norm() - 1.0).abs() < 1e-9);
            assert!(t.w == 1.0 || t.w == -1.0);
        }
    }

    #[test]
    fn test_bounds_contain_every_vertex() {
        let buffers = build(&MedusaConfig::default()).unwrap();
        assert!(buffers.vertices.iter().all(|p| buffers.bounds.contains(p)));
        // The dome reaches the full head radius at the pole.
        assert!((buffers.bounds.max.y - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = MedusaConfig::default();
        let a = build(&config).unwrap();
        let b = build(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = MedusaConfig::default();
        let parallel = build(&config).unwrap();
        let sequential = build(&config.clone().sequential()).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = MedusaConfig::default().with_tentacle_count(3);
        assert!(matches!(
            build(&config),
            Err(MedusaError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_progress_reaches_total() {
        use std::sync::{Arc, Mutex};

        let last = Arc::new(Mutex::new((0, 0)));
        let sink = Arc::clone(&last);
        let progress = Progress::new(move |current, total, _| {
            *sink.lock().unwrap() = (current, total);
        });

        build_with_progress(&MedusaConfig::default(), &progress).unwrap();
        assert_eq!(*last.lock().unwrap(), (6, 6));
    }
}
