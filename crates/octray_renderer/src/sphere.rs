//! Sphere primitive for ray tracing.

use crate::{Hit, SceneError};
use octray_math::{Aabb, Interval, Ray, Vec3};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
}

impl Sphere {
    /// Minimum accepted hit distance, so that a ray leaving the surface does
    /// not immediately hit it again.
    pub const EPSILON: f64 = 1e-5;

    /// Create a new sphere. The radius must be positive and finite.
    pub fn new(center: Vec3, radius: f64) -> Result<Self, SceneError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidShape(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::new(self.center - rvec, self.center + rvec)
    }

    /// Nearest forward intersection beyond [`Sphere::EPSILON`].
    ///
    /// The returned normal always points away from the center; `inside` tells
    /// whether the ray was travelling outward when it crossed the surface.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let b = oc.dot(ray.direction());
        let discriminant = b * b - a * (oc.length_squared() - self.radius * self.radius);
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let ahead = Interval::beyond(Self::EPSILON);
        let near = (b - root) / a;
        let far = (b + root) / a;
        let t = if ahead.surrounds(near) {
            near
        } else if ahead.surrounds(far) {
            far
        } else {
            return None;
        };

        let position = ray.at(t);
        let normal = (position - self.center).normalize();
        Some(Hit {
            position,
            distance: t,
            normal,
            inside: normal.dot(ray.direction()) > 0.0,
        })
    }

    /// Sphere/box overlap via the squared distance from the center to the
    /// closest point of the box.
    pub fn intersects_bounding_box(&self, aabb: &Aabb) -> bool {
        let closest = self.center.clamp(aabb.min, aabb.max);
        (closest - self.center).length_squared() <= self.radius * self.radius
    }
}
