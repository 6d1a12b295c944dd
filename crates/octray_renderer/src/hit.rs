//! Hit record for ray-primitive intersection.

use octray_math::Vec3;

/// Record of a ray-primitive intersection.
///
/// Produced by a single `intersect` call and consumed immediately by the
/// integrator; it has no identity of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection
    pub position: Vec3,
    /// Parameter along the producing ray; always beyond the primitive's epsilon
    pub distance: f64,
    /// Unit surface normal as reported by the primitive.
    ///
    /// Spheres report the outward normal even for interior hits, triangles
    /// report the face normal flipped towards the ray. Use
    /// [`Hit::facing_normal`] when the orientation matters.
    pub normal: Vec3,
    /// True when the ray travels from the inside of the surface outward
    pub inside: bool,
}

impl Hit {
    /// The normal oriented against the incoming direction.
    #[inline]
    pub fn facing_normal(&self, direction: Vec3) -> Vec3 {
        if self.normal.dot(direction) > 0.0 {
            -self.normal
        } else {
            self.normal
        }
    }

    /// Keep whichever of two optional hits is nearer.
    pub fn nearest(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}
