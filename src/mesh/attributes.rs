//! Derived per-vertex attributes: normals, tangents and bounds.

use nalgebra::{Point2, Point3, Vector3, Vector4};

use super::trimesh::TriMesh;
use crate::math::NORMAL_EPSILON;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Smallest box containing all `points`, or `None` if there are none.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;

        for p in &points[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }

        Some(Self { min, max })
    }

    /// Center of the box.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Whether `p` lies inside or on the box.
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}

/// Compute smooth vertex normals from the triangle topology.
///
/// Each vertex receives the area-weighted sum of its incident face normals.
/// Vertices whose sum vanishes (unreferenced, or only touching degenerate
/// triangles) get `+Y`.
pub fn vertex_normals(mesh: &TriMesh) -> Vec<Vector3<f64>> {
    let mut sums = vec![Vector3::zeros(); mesh.num_vertices()];

    for [a, b, c] in mesh.triangles() {
        let e1 = mesh.positions[b] - mesh.positions[a];
        let e2 = mesh.positions[c] - mesh.positions[a];
        // Unnormalized cross product is twice the area times the unit normal
        let n = e1.cross(&e2);
        sums[a] += n;
        sums[b] += n;
        sums[c] += n;
    }

    sums.into_iter()
        .map(|n| n.try_normalize(NORMAL_EPSILON).unwrap_or_else(Vector3::y))
        .collect()
}

/// Compute per-vertex tangents from positions, normals and UVs.
///
/// The `xyz` part is the UV `u` direction orthogonalized against the normal;
/// `w` is the handedness (`±1`) of the (tangent, bitangent, normal) frame.
/// Vertices without a usable UV gradient get an arbitrary unit vector
/// perpendicular to their normal.
pub fn vertex_tangents(mesh: &TriMesh, normals: &[Vector3<f64>]) -> Vec<Vector4<f64>> {
    let n = mesh.num_vertices();
    let mut tan_u = vec![Vector3::zeros(); n];
    let mut tan_v = vec![Vector3::zeros(); n];

    for [a, b, c] in mesh.triangles() {
        let e1 = mesh.positions[b] - mesh.positions[a];
        let e2 = mesh.positions[c] - mesh.positions[a];
        let d1 = mesh.uvs[b] - mesh.uvs[a];
        let d2 = mesh.uvs[c] - mesh.uvs[a];

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < 1e-12 {
            continue;
        }
        let r = 1.0 / det;
        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;

        for i in [a, b, c] {
            tan_u[i] += sdir;
            tan_v[i] += tdir;
        }
    }

    (0..n)
        .map(|i| {
            let normal = normals[i];
            let t = tan_u[i] - normal * normal.dot(&tan_u[i]);
            let t = t
                .try_normalize(NORMAL_EPSILON)
                .unwrap_or_else(|| any_perpendicular(&normal));
            let w = if normal.cross(&t).dot(&tan_v[i]) < 0.0 { -1.0 } else { 1.0 };
            Vector4::new(t.x, t.y, t.z, w)
        })
        .collect()
}

fn any_perpendicular(n: &Vector3<f64>) -> Vector3<f64> {
    let axis = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    n.cross(&axis)
        .try_normalize(NORMAL_EPSILON)
        .unwrap_or_else(Vector3::x)
}

/// UV coordinate on a regular `columns × rows` lattice.
#[inline]
pub(crate) fn lattice_uv(column: u32, columns: u32, row: u32, rows: u32) -> Point2<f64> {
    Point2::new(column as f64 / columns as f64, row as f64 / rows as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> TriMesh {
        let mut mesh = TriMesh::new();
        mesh.push_vertex(Point3::new(0.0, 0.0, 0.0), Point2::new(0.0, 0.0));
        mesh.push_vertex(Point3::new(1.0, 0.0, 0.0), Point2::new(1.0, 0.0));
        mesh.push_vertex(Point3::new(1.0, 1.0, 0.0), Point2::new(1.0, 1.0));
        mesh.push_vertex(Point3::new(0.0, 1.0, 0.0), Point2::new(0.0, 1.0));
        mesh.push_triangle(0, 1, 2);
        mesh.push_triangle(0, 2, 3);
        mesh
    }

    #[test]
    fn test_flat_quad_normals() {
        let mesh = unit_quad();
        for n in vertex_normals(&mesh) {
            assert!((n - Vector3::z()).norm() < 1e-12, "got {:?}", n);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_fallback_normal() {
        let mut mesh = unit_quad();
        mesh.push_vertex(Point3::new(5.0, 5.0, 5.0), Point2::new(0.0, 0.0));
        let normals = vertex_normals(&mesh);
        assert_eq!(normals[4], Vector3::y());
    }

    #[test]
    fn test_flat_quad_tangents() {
        let mesh = unit_quad();
        let normals = vertex_normals(&mesh);
        for t in vertex_tangents(&mesh, &normals) {
            // u runs along +x, v along +y, normal +z: right-handed
            assert!((t.xyz() - Vector3::x()).norm() < 1e-12, "got {:?}", t);
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn test_mirrored_uvs_flip_handedness() {
        let mut mesh = unit_quad();
        for uv in &mut mesh.uvs {
            uv.y = 1.0 - uv.y;
        }
        let normals = vertex_normals(&mesh);
        for t in vertex_tangents(&mesh, &normals) {
            assert_eq!(t.w, -1.0);
        }
    }

    #[test]
    fn test_tangent_without_uv_gradient() {
        let mut mesh = unit_quad();
        for uv in &mut mesh.uvs {
            *uv = Point2::origin();
        }
        let normals = vertex_normals(&mesh);
        for (t, n) in vertex_tangents(&mesh, &normals).iter().zip(&normals) {
            assert!((t.xyz().norm() - 1.0).abs() < 1e-12);
            assert!(t.xyz().dot(n).abs() < 1e-12);
        }
    }

    #[test]
    fn test_aabb() {
        let points = [
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.5, 0.0, 7.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 4.0, 7.0));
        assert_eq!(aabb.center(), Point3::new(0.0, 1.0, 3.5));
        assert_eq!(aabb.size(), Vector3::new(2.0, 6.0, 7.0));
        assert!(points.iter().all(|p| aabb.contains(p)));
        assert!(Aabb::from_points(&[]).is_none());
    }
}
