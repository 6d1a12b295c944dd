use crate::{Ray, Vec3};

/// Axis-Aligned Bounding Box defined by its minimum and maximum corners.
///
/// Invariant: `min[i] <= max[i]` on every axis for any box built through
/// [`Aabb::new`], [`Aabb::cube`] or [`Aabb::split`]. [`Aabb::EMPTY`] is the
/// only exception and acts as the identity for [`Aabb::surrounding`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two opposite corner points, in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a cube with `min` as its lower corner and the given side length.
    pub fn cube(min: Vec3, length: f64) -> Self {
        Self::new(min, min + Vec3::splat(length))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extent(&self) -> Vec3 {
        self.extent() * 0.5
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// The eight corners, ordered by the (x, y, z) bits of the index.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Subdivide into equal octants `depth` times, returning the `8^depth`
    /// leaf boxes. A depth of zero returns the box itself.
    pub fn split(&self, depth: u32) -> Vec<Aabb> {
        if depth == 0 {
            return vec![*self];
        }

        let half = self.half_extent();
        let mut leaves = Vec::with_capacity(8usize.pow(depth));
        for i in 0..8u32 {
            let offset = Vec3::new(
                f64::from(i & 1),
                f64::from((i >> 1) & 1),
                f64::from((i >> 2) & 1),
            );
            let min = self.min + offset * half;
            let octant = Aabb::new(min, min + half);
            leaves.extend(octant.split(depth - 1));
        }
        leaves
    }

    /// Slab test: does the ray enter this box at or after its origin?
    ///
    /// An axis the ray does not move along constrains nothing as long as the
    /// origin lies within that slab (bounds included), and misses otherwise.
    /// Dividing there would give 0/0 = NaN for an origin on a bound.
    pub fn hit(&self, ray: &Ray) -> bool {
        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let t1 = (lo - origin) / direction;
            let t2 = (hi - origin) / direction;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        tmax >= tmin.max(0.0)
    }

    /// The identity element for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };
}
