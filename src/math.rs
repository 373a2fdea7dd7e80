//! Small geometric helpers shared by the generators.
//!
//! Everything here sits on top of `nalgebra`; the helpers only add the
//! behaviour the generators need around degenerate input (zero-width
//! ranges, zero-length vectors, look directions parallel to the up axis).

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::error::{MedusaError, Result};

/// Magnitude below which a vector is treated as having no direction.
pub const NORMAL_EPSILON: f64 = 1e-9;

/// Linearly remap `s` from `[a1, a2]` to `[b1, b2]`.
///
/// Values outside the input range are extrapolated. Fails with
/// [`MedusaError::DegenerateRange`] when the input range has zero width.
///
/// # Example
///
/// ```
/// use medusa::math::map_range;
///
/// assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 1.0).unwrap(), 0.5);
/// assert!(map_range(1.0, 2.0, 2.0, 0.0, 1.0).is_err());
/// ```
pub fn map_range(s: f64, a1: f64, a2: f64, b1: f64, b2: f64) -> Result<f64> {
    let width = a2 - a1;
    if width.abs() <= f64::EPSILON * a1.abs().max(a2.abs()).max(1.0) {
        return Err(MedusaError::DegenerateRange { start: a1, end: a2 });
    }
    Ok(b1 + (s - a1) * (b2 - b1) / width)
}

/// Normalize `v`, or return `fallback` if `v` is too short to have a direction.
#[inline]
pub fn normalize_or(v: Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(NORMAL_EPSILON).unwrap_or(fallback)
}

/// Rotation mapping local +Z onto `forward`, keeping local +Y as close to
/// `up` as possible.
///
/// When `forward` is parallel to `up` another up axis is picked so the
/// result is still a proper rotation. A zero `forward` yields the identity.
pub fn look_rotation(forward: &Vector3<f64>, up: &Vector3<f64>) -> UnitQuaternion<f64> {
    let Some(dir) = forward.try_normalize(NORMAL_EPSILON) else {
        return UnitQuaternion::identity();
    };
    if dir.cross(up).norm() > NORMAL_EPSILON {
        UnitQuaternion::face_towards(&dir, up)
    } else if dir.cross(&Vector3::z()).norm() > NORMAL_EPSILON {
        UnitQuaternion::face_towards(&dir, &Vector3::z())
    } else {
        UnitQuaternion::face_towards(&dir, &Vector3::x())
    }
}

/// Rigid placement (translation + rotation) of a sub-mesh in head space.
pub fn placement(position: &Point3<f64>, forward: &Vector3<f64>) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::from(position.coords),
        look_rotation(forward, &Vector3::y()),
    )
}
