//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection and the
//! separating axis theorem for triangle/box overlap.

use crate::{Hit, SceneError};
use octray_math::{Aabb, Ray, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Face normal, `normalize((v1 - v0) x (v2 - v0))`
    normal: Vec3,
}

impl Triangle {
    /// Determinant and distance threshold.
    pub const EPSILON: f64 = 1e-9;

    /// Create a new triangle from three vertices. Zero-area triangles are
    /// rejected since they have no normal.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Result<Self, SceneError> {
        let normal = (v1 - v0).cross(v2 - v0);
        if !(normal.length_squared() > 0.0) || !normal.is_finite() {
            return Err(SceneError::InvalidShape(format!(
                "degenerate triangle {v0:?} {v1:?} {v2:?}"
            )));
        }

        Ok(Self {
            v0,
            v1,
            v2,
            normal: normal.normalize(),
        })
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    pub fn bounding_box(&self) -> Aabb {
        let min = self.v0.min(self.v1).min(self.v2);
        let max = self.v0.max(self.v1).max(self.v2);
        Aabb::new(min, max)
    }

    /// Möller-Trumbore intersection.
    ///
    /// Back-facing hits (negative determinant) are still reported, with the
    /// normal flipped towards the ray and `inside` set, which is what lets a
    /// closed, outward-wound mesh act as a refractive volume.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let pvec = ray.direction().cross(edge2);
        let det = edge1.dot(pvec);

        // Ray is parallel to triangle
        if det.abs() < Self::EPSILON {
            return None;
        }
        let backfacing = det < Self::EPSILON;
        let inv_det = 1.0 / det;

        let tvec = ray.origin() - self.v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if t < Self::EPSILON {
            return None;
        }

        Some(Hit {
            position: ray.at(t),
            distance: t,
            normal: if backfacing { -self.normal } else { self.normal },
            inside: backfacing,
        })
    }

    /// Triangle/box overlap by the separating axis theorem.
    ///
    /// Tests the 13 candidate axes: the three box face normals, the triangle
    /// normal and the nine cross products of box axes with triangle edges.
    /// Touching counts as overlapping.
    pub fn intersects_bounding_box(&self, aabb: &Aabb) -> bool {
        let center = aabb.centroid();
        let half = aabb.half_extent();
        let verts = [self.v0 - center, self.v1 - center, self.v2 - center];

        let box_axes = [Vec3::X, Vec3::Y, Vec3::Z];
        if box_axes.iter().any(|&axis| separated_on(axis, &verts, half)) {
            return false;
        }

        if separated_on(self.normal, &verts, half) {
            return false;
        }

        let edges = [verts[1] - verts[0], verts[2] - verts[1], verts[0] - verts[2]];
        for box_axis in box_axes {
            for edge in edges {
                // A zero axis (edge parallel to the box axis) projects
                // everything to 0 and can never separate.
                if separated_on(box_axis.cross(edge), &verts, half) {
                    return false;
                }
            }
        }

        true
    }
}

/// Do the projections of the triangle and of the box (centered at the origin
/// with the given half extents) onto `axis` fail to overlap?
fn separated_on(axis: Vec3, verts: &[Vec3; 3], half: Vec3) -> bool {
    let p0 = verts[0].dot(axis);
    let p1 = verts[1].dot(axis);
    let p2 = verts[2].dot(axis);
    let radius = half.dot(axis.abs());

    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}
