//! Parametric head surface.
//!
//! The head is a distorted ellipsoid evaluated in polar coordinates. Three
//! regimes are selected by the polar angle `theta`:
//!
//! 1. `theta < clamp`: the plain ellipsoid dome.
//! 2. `clamp <= theta <= clamp + smooth`: the rim. Height is frozen at the
//!    clamp angle and pinched inwards by half a sine over the band.
//! 3. `theta > clamp + smooth`: the tail cap, a smaller ellipsoid shifted
//!    down by half its height.
//!
//! All regimes then receive the azimuthal spike ridges, which grow with the
//! polar angle.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, Vector3};

use crate::config::HeadConfig;
use crate::error::{MedusaError, Result};
use crate::math::{map_range, NORMAL_EPSILON};

/// Depth of the rim indentation relative to the head radius.
const RIM_PINCH: f64 = 0.1;

/// Angles this close past the rim band still belong to the rim.
const ANGLE_EPSILON: f64 = 1e-9;

/// Evaluate the head surface at polar angle `theta` and azimuth `phi`.
///
/// Fails only when the tail regime is entered with a zero-width remap range,
/// which requires `theta` past `clamp + smooth == π`.
///
/// # Example
///
/// ```
/// use medusa::config::HeadConfig;
/// use medusa::generate::eval_head_vertex;
///
/// let head = HeadConfig::default();
/// let pole = eval_head_vertex(0.0, 0.0, &head).unwrap();
/// assert!((pole.y - head.radius).abs() < 1e-9);
/// ```
pub fn eval_head_vertex(theta: f64, phi: f64, head: &HeadConfig) -> Result<Point3<f64>> {
    let r = head.radius;
    let mut rvec = Vector3::new(r * head.radius_scale, r * head.length_scale, r * head.radius_scale);

    let clamp = head.clamp_angle();
    let smooth_end = clamp + head.smooth_angle_range();

    let mut theta = theta;
    let mut v = if theta < clamp {
        Vector3::new(
            rvec.x * theta.sin() * phi.sin(),
            rvec.y * theta.cos(),
            rvec.z * theta.sin() * phi.cos(),
        )
    } else if theta <= smooth_end + ANGLE_EPSILON {
        let curve = map_range(theta, clamp, smooth_end, 0.0, PI)?;
        Vector3::new(
            rvec.x * theta.sin() * phi.sin(),
            rvec.y * clamp.cos() - curve.sin() * r * RIM_PINCH,
            rvec.z * theta.sin() * phi.cos(),
        )
    } else {
        theta = map_range(theta, smooth_end, PI, FRAC_PI_2, 0.0)?;
        rvec *= head.rvec_mult;
        Vector3::new(
            rvec.x * theta.sin() * phi.sin(),
            rvec.y * theta.cos() - rvec.y * 0.5,
            rvec.z * theta.sin() * phi.cos(),
        )
    };

    let spike = 1.0 + head.spike_amplitude * (phi * head.num_spike_waves as f64).cos() * theta / PI;
    v.x *= spike;
    v.z *= spike;

    Ok(Point3::from(v))
}

/// Evaluated head grid: positions in row-major `(segment, side)` order and
/// the per-cell surface normals.
#[derive(Debug, Clone)]
pub struct HeadGrid {
    /// Grid columns (azimuth steps).
    pub sides: u32,
    /// Grid rows (polar steps).
    pub segments: u32,
    /// `(segments + 1) * (sides + 1)` positions.
    pub positions: Vec<Point3<f64>>,
    /// One unit normal per position.
    pub normals: Vec<Vector3<f64>>,
}

impl HeadGrid {
    /// Index of grid cell `(segment, side)`.
    #[inline]
    pub fn index(&self, segment: u32, side: u32) -> usize {
        segment as usize * (self.sides as usize + 1) + side as usize
    }

    /// Polar angle of row `segment`, never past `π`.
    #[inline]
    pub fn theta(&self, segment: u32) -> f64 {
        (segment as f64 * self.dtheta()).min(PI)
    }

    /// Polar angle at which tentacles attached on row `segment` are rooted.
    ///
    /// Roots sit one polar step below their row, never past `π`. For the
    /// default head this puts row 6 at 126°, inside the rim band.
    #[inline]
    pub fn root_theta(&self, segment: u32) -> f64 {
        self.theta(segment.saturating_add(1))
    }

    /// Root position and outward surface normal for a tentacle attached at
    /// grid cell `(segment, side)`.
    pub fn root_frame(
        &self,
        segment: u32,
        side: u32,
        head: &HeadConfig,
    ) -> Result<(Point3<f64>, Vector3<f64>)> {
        let backward = segment.saturating_add(1) >= self.segments;
        surface_frame(
            self.root_theta(segment),
            self.phi(side),
            self.dtheta(),
            self.dphi(),
            backward,
            head,
        )
    }

    /// Azimuth of column `side`. The grid starts one step past zero.
    #[inline]
    pub fn phi(&self, side: u32) -> f64 {
        (side as f64 + 1.0) * self.dphi()
    }

    #[inline]
    fn dtheta(&self) -> f64 {
        PI / self.segments as f64
    }

    #[inline]
    fn dphi(&self) -> f64 {
        2.0 * PI / self.sides as f64
    }
}

/// Surface point at `(theta, phi)` and its unit normal from finite steps
/// of `dtheta` and `dphi`. With `backward` the `theta` step is taken towards
/// the crown so the surface is never sampled past `π`.
fn surface_frame(
    theta: f64,
    phi: f64,
    dtheta: f64,
    dphi: f64,
    backward: bool,
    head: &HeadConfig,
) -> Result<(Point3<f64>, Vector3<f64>)> {
    let v1 = eval_head_vertex(theta, phi, head)?;
    let along_theta = if backward {
        v1 - eval_head_vertex(theta - dtheta, phi, head)?
    } else {
        eval_head_vertex(theta + dtheta, phi, head)? - v1
    };
    let along_phi = eval_head_vertex(theta, phi + dphi, head)? - v1;

    let normal = along_theta
        .cross(&along_phi)
        .try_normalize(NORMAL_EPSILON)
        .unwrap_or_else(Vector3::y);

    Ok((v1, normal))
}

/// Evaluate the head surface over a `(segments + 1) × (sides + 1)` grid.
///
/// The last column repeats the first one at `phi + 2π` to close the UV
/// seam. Each normal is the normalized cross product of the grid edges
/// along `theta` and `phi`; on the last row the `theta` edge is taken
/// backwards. Normals of zero length (the pole row collapses to a point)
/// are replaced by `+Y`.
///
/// `sides` and `segments` must both be at least 1.
pub fn eval_head_grid(head: &HeadConfig, sides: u32, segments: u32) -> Result<HeadGrid> {
    if sides == 0 {
        return Err(MedusaError::invalid_param("grid.sides", sides, "must be at least 1"));
    }
    if segments == 0 {
        return Err(MedusaError::invalid_param(
            "grid.segments",
            segments,
            "must be at least 1",
        ));
    }

    let mut grid = HeadGrid {
        sides,
        segments,
        positions: Vec::with_capacity((segments as usize + 1) * (sides as usize + 1)),
        normals: Vec::with_capacity((segments as usize + 1) * (sides as usize + 1)),
    };
    let dtheta = grid.dtheta();
    let dphi = grid.dphi();

    for segment in 0..=segments {
        let theta = grid.theta(segment);
        for side in 0..=sides {
            let (position, normal) = surface_frame(
                theta,
                grid.phi(side),
                dtheta,
                dphi,
                segment == segments,
                head,
            )?;
            grid.positions.push(position);
            grid.normals.push(normal);
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_spikes() -> HeadConfig {
        HeadConfig {
            spike_amplitude: 0.0,
            ..HeadConfig::default()
        }
    }

    #[test]
    fn test_dome_is_ellipsoid() {
        let head = HeadConfig {
            radius_scale: 2.0,
            length_scale: 0.5,
            ..no_spikes()
        };
        let theta = 0.7;
        let phi = 1.3;
        let v = eval_head_vertex(theta, phi, &head).unwrap();
        let (rx, ry) = (head.radius * 2.0, head.radius * 0.5);
        let implicit = (v.x / rx).powi(2) + (v.y / ry).powi(2) + (v.z / rx).powi(2);
        assert!((implicit - 1.0).abs() < 1e-12, "got {}", implicit);
    }

    #[test]
    fn test_continuous_across_clamp_angle() {
        let head = HeadConfig::default();
        let clamp = head.clamp_angle();
        for &phi in &[0.0, 0.4, 2.0, 5.5] {
            let mut prev_gap = f64::INFINITY;
            for &eps in &[1e-2, 1e-4, 1e-6, 1e-8] {
                let below = eval_head_vertex(clamp - eps, phi, &head).unwrap();
                let above = eval_head_vertex(clamp + eps, phi, &head).unwrap();
                let gap = (below - above).norm();
                assert!(gap <= prev_gap + 1e-12);
                prev_gap = gap;
            }
            assert!(prev_gap < 1e-5, "seam at phi={} has gap {}", phi, prev_gap);
        }
    }

    #[test]
    fn test_rim_pinch_depth() {
        let head = no_spikes();
        let clamp = head.clamp_angle();
        let mid = clamp + head.smooth_angle_range() / 2.0;
        let v = eval_head_vertex(mid, 0.0, &head).unwrap();
        // Halfway through the band the pinch reaches its full depth.
        let expected = head.radius * clamp.cos() - head.radius * RIM_PINCH;
        assert!((v.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tail_cap_regime() {
        let head = HeadConfig {
            clamp_angle_deg: 90.0,
            smooth_angle_range_deg: 30.0,
            ..no_spikes()
        };
        // At theta = π the tail remaps to 0: the bottom of the shrunken cap.
        let v = eval_head_vertex(PI, 0.0, &head).unwrap();
        let ry = head.radius * head.rvec_mult;
        assert!((v.y - (ry - 0.5 * ry)).abs() < 1e-9);
        assert!(v.x.abs() < 1e-9 && v.z.abs() < 1e-9);
    }

    #[test]
    fn test_tail_with_empty_range_is_rejected() {
        // clamp + smooth == π, so the tail range [π, π] has zero width.
        let head = HeadConfig::default();
        assert!(eval_head_vertex(PI + 0.1, 0.0, &head).is_err());
        assert!(eval_head_vertex(PI, 0.0, &head).is_ok());
    }

    #[test]
    fn test_spikes_vanish_at_pole() {
        let spiky = HeadConfig::default();
        let smooth = no_spikes();
        let a = eval_head_vertex(0.0, 0.3, &spiky).unwrap();
        let b = eval_head_vertex(0.0, 0.3, &smooth).unwrap();
        assert!((a - b).norm() < 1e-12);
    }

    #[test]
    fn test_spike_wave_count() {
        let head = HeadConfig::default();
        let theta = 1.0;
        // cos(phi * waves) peaks at phi = 0 and phi = 2π / waves.
        let period = 2.0 * PI / head.num_spike_waves as f64;
        let a = eval_head_vertex(theta, 0.0, &head).unwrap();
        let b = eval_head_vertex(theta, period, &head).unwrap();
        let ra = (a.x * a.x + a.z * a.z).sqrt();
        let rb = (b.x * b.x + b.z * b.z).sqrt();
        assert!((ra - rb).abs() < 1e-9);
        let expected = head.radius * theta.sin() * (1.0 + head.spike_amplitude * theta / PI);
        assert!((ra - expected).abs() < 1e-9);
    }

    #[test]
    fn test_grid_size_and_seam() {
        let head = HeadConfig::default();
        let grid = eval_head_grid(&head, 20, 10).unwrap();
        assert_eq!(grid.positions.len(), 21 * 11);
        assert_eq!(grid.normals.len(), grid.positions.len());

        for segment in 0..=10 {
            let first = grid.positions[grid.index(segment, 0)];
            let last = grid.positions[grid.index(segment, 20)];
            assert!((first - last).norm() < 1e-9, "seam open at row {}", segment);
        }
    }

    #[test]
    fn test_grid_normals_are_unit_and_pole_falls_back() {
        let head = HeadConfig::default();
        let grid = eval_head_grid(&head, 12, 8).unwrap();
        for n in &grid.normals {
            assert!((n.norm() - 1.0).abs() < 1e-9);
            assert!(n.iter().all(|c| c.is_finite()));
        }
        // The pole row collapses to a single point, so its phi edge vanishes.
        for side in 0..=12 {
            assert_eq!(grid.normals[grid.index(0, side)], Vector3::y());
        }
    }

    #[test]
    fn test_grid_normals_point_outwards_on_dome() {
        let head = no_spikes();
        let grid = eval_head_grid(&head, 16, 8).unwrap();
        let i = grid.index(2, 3);
        let p = grid.positions[i].coords;
        assert!(grid.normals[i].dot(&p) > 0.0);
    }

    #[test]
    fn test_root_theta_sits_one_row_down() {
        let head = HeadConfig::default();
        let grid = eval_head_grid(&head, 20, 10).unwrap();

        // Default attachment row 6 roots at 126°, past the 120° clamp angle.
        let theta = grid.root_theta(6);
        assert!((theta.to_degrees() - 126.0).abs() < 1e-9);
        assert!(theta > head.clamp_angle());
        assert!(theta < head.clamp_angle() + head.smooth_angle_range());

        assert_eq!(grid.root_theta(10), PI);
    }

    #[test]
    fn test_root_frame_matches_next_grid_row() {
        let head = HeadConfig::default();
        let grid = eval_head_grid(&head, 20, 10).unwrap();

        for segment in [0, 6, 9] {
            for side in [0, 5, 20] {
                let (position, normal) = grid.root_frame(segment, side, &head).unwrap();
                let i = grid.index(segment + 1, side);
                assert_eq!(position, grid.positions[i]);
                assert_eq!(normal, grid.normals[i]);
            }
        }

        // Past the last row the root clamps to the bottom of the head.
        let (position, normal) = grid.root_frame(10, 3, &head).unwrap();
        assert_eq!(position, grid.positions[grid.index(10, 3)]);
        assert!((normal.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let head = HeadConfig::default();
        assert!(matches!(
            eval_head_grid(&head, 0, 10),
            Err(MedusaError::InvalidParameter { name: "grid.sides", .. })
        ));
        assert!(matches!(
            eval_head_grid(&head, 20, 0),
            Err(MedusaError::InvalidParameter { name: "grid.segments", .. })
        ));
    }
}
