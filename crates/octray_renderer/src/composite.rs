//! Shapes assembled from triangles: axis-aligned planes and cuboids.

use crate::{Hit, SceneError, Triangle};
use octray_math::{Aabb, Ray, Vec3};

/// A fixed set of triangles intersected as one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    faces: Vec<Triangle>,
    /// How many distinct surface crossings a ray can make. Once that many are
    /// found no remaining face can be nearer.
    max_crossings: usize,
    position: Vec3,
    bbox: Aabb,
}

impl Composite {
    /// Axis-aligned rectangle from two opposite corners that share exactly
    /// one coordinate, split into two triangles along the diagonal.
    pub fn plane(corner_a: Vec3, corner_b: Vec3) -> Result<Self, SceneError> {
        let same = corner_a.cmpeq(corner_b);
        let flat_axes = [same.x, same.y, same.z].iter().filter(|&&s| s).count();
        if flat_axes != 1 || !corner_a.is_finite() || !corner_b.is_finite() {
            return Err(SceneError::DegeneratePlane {
                corner_a: corner_a.to_array(),
                corner_b: corner_b.to_array(),
            });
        }

        let min = corner_a.min(corner_b);
        let max = corner_a.max(corner_b);
        let (first, second) = if same.x {
            (Vec3::Y, Vec3::Z)
        } else if same.y {
            (Vec3::Z, Vec3::X)
        } else {
            (Vec3::X, Vec3::Y)
        };

        let extent = max - min;
        let p00 = min;
        let p10 = min + first * extent;
        let p01 = min + second * extent;
        let p11 = max;

        let faces = vec![Triangle::new(p00, p10, p11)?, Triangle::new(p00, p11, p01)?];
        Ok(Self::from_faces(faces, 1, (min + max) * 0.5))
    }

    /// Axis-aligned box from two opposite corners, as 12 triangles wound so
    /// that every face normal points outward.
    pub fn cuboid(corner_a: Vec3, corner_b: Vec3) -> Result<Self, SceneError> {
        let bounds = Aabb::new(corner_a, corner_b);
        let extent = bounds.extent();
        if !(extent.min_element() > 0.0) || !extent.is_finite() {
            return Err(SceneError::InvalidShape(format!(
                "cuboid needs a positive extent on every axis, got {extent:?}"
            )));
        }

        // Corner index bits: 1 = max x, 2 = max y, 4 = max z.
        let c = bounds.corners();
        const QUADS: [[usize; 4]; 6] = [
            [0, 4, 6, 2], // -x
            [1, 3, 7, 5], // +x
            [0, 1, 5, 4], // -y
            [2, 6, 7, 3], // +y
            [0, 2, 3, 1], // -z
            [4, 5, 7, 6], // +z
        ];

        let mut faces = Vec::with_capacity(12);
        for [a, b, q, d] in QUADS {
            faces.push(Triangle::new(c[a], c[b], c[q])?);
            faces.push(Triangle::new(c[a], c[q], c[d])?);
        }

        Ok(Self::from_faces(faces, 2, bounds.centroid()))
    }

    fn from_faces(faces: Vec<Triangle>, max_crossings: usize, position: Vec3) -> Self {
        let bbox = faces
            .iter()
            .fold(Aabb::EMPTY, |acc, f| Aabb::surrounding(&acc, &f.bounding_box()));
        Self {
            faces,
            max_crossings,
            position,
            bbox,
        }
    }

    pub fn faces(&self) -> &[Triangle] {
        &self.faces
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Nearest hit across all faces.
    ///
    /// Hits on a shared edge show up once per adjacent face at the same
    /// distance, so only hits at distinct distances count as crossings.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;
        let mut first_distance = None;
        let mut crossings = 0;

        for face in &self.faces {
            let Some(hit) = face.intersect(ray) else {
                continue;
            };

            match first_distance {
                None => {
                    first_distance = Some(hit.distance);
                    crossings = 1;
                }
                Some(d) if (hit.distance - d).abs() > Triangle::EPSILON => crossings += 1,
                Some(_) => {}
            }

            nearest = Hit::nearest(nearest, Some(hit));
            if crossings >= self.max_crossings {
                break;
            }
        }

        nearest
    }

    pub fn intersects_bounding_box(&self, aabb: &Aabb) -> bool {
        self.faces.iter().any(|f| f.intersects_bounding_box(aabb))
    }
}
