//! Scene primitives: a shape paired with the material it is made of.

use crate::{Composite, Hit, Material, SceneError, Sphere, Triangle};
use octray_math::{Aabb, Ray, Vec3};
use std::sync::Arc;

/// Closed set of intersectable shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Composite(Composite),
}

impl Shape {
    /// Representative point used when placing the shape in the partition.
    pub fn position(&self) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.center(),
            Shape::Triangle(t) => t.centroid(),
            Shape::Composite(c) => c.position(),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Composite(c) => c.bounding_box(),
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Triangle(t) => t.intersect(ray),
            Shape::Composite(c) => c.intersect(ray),
        }
    }

    pub fn intersects_bounding_box(&self, aabb: &Aabb) -> bool {
        match self {
            Shape::Sphere(s) => s.intersects_bounding_box(aabb),
            Shape::Triangle(t) => t.intersects_bounding_box(aabb),
            Shape::Composite(c) => c.intersects_bounding_box(aabb),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<Composite> for Shape {
    fn from(composite: Composite) -> Self {
        Shape::Composite(composite)
    }
}

/// An immutable shape with a shared material.
#[derive(Debug, Clone)]
pub struct Primitive {
    shape: Shape,
    material: Arc<Material>,
}

impl Primitive {
    pub fn new(shape: impl Into<Shape>, material: Arc<Material>) -> Self {
        Self {
            shape: shape.into(),
            material,
        }
    }

    pub fn sphere(center: Vec3, radius: f64, material: Arc<Material>) -> Result<Self, SceneError> {
        Ok(Self::new(Sphere::new(center, radius)?, material))
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Result<Self, SceneError> {
        Ok(Self::new(Triangle::new(v0, v1, v2)?, material))
    }

    /// Axis-aligned rectangle spanned by two opposite corners.
    pub fn plane(corner_a: Vec3, corner_b: Vec3, material: Arc<Material>) -> Result<Self, SceneError> {
        Ok(Self::new(Composite::plane(corner_a, corner_b)?, material))
    }

    /// Axis-aligned box spanned by two opposite corners.
    pub fn cuboid(corner_a: Vec3, corner_b: Vec3, material: Arc<Material>) -> Result<Self, SceneError> {
        Ok(Self::new(Composite::cuboid(corner_a, corner_b)?, material))
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn position(&self) -> Vec3 {
        self.shape.position()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.shape.bounding_box()
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.shape.intersect(ray)
    }

    pub fn intersects_bounding_box(&self, aabb: &Aabb) -> bool {
        self.shape.intersects_bounding_box(aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn grey() -> Arc<Material> {
        Arc::new(Material::diffuse(Color::splat(0.5)))
    }

    #[test]
    fn test_primitive_dispatch() {
        let sphere = Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, grey()).unwrap();
        let triangle = Primitive::triangle(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 1.0, 3.0),
            Vec3::new(1.0, 1.0, 3.0),
            grey(),
        )
        .unwrap();

        assert_eq!(sphere.position(), Vec3::new(0.0, 0.0, 5.0));
        assert!((triangle.position() - Vec3::new(1.0 / 3.0, 2.0 / 3.0, 3.0)).length() < 1e-12);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!((sphere.intersect(&ray).unwrap().distance - 4.0).abs() < 1e-12);
        assert_eq!(triangle.intersect(&ray).unwrap().distance, 3.0);
    }

    #[test]
    fn test_shared_material() {
        let material = grey();
        let a = Primitive::sphere(Vec3::ZERO, 1.0, material.clone()).unwrap();
        let b = Primitive::cuboid(Vec3::ONE, Vec3::splat(2.0), material.clone()).unwrap();

        assert_eq!(Arc::strong_count(&material), 3);
        assert_eq!(a.material(), b.material());
    }

    #[test]
    fn test_composite_position_and_bounds() {
        let plane = Primitive::plane(Vec3::new(-2.0, -1.0, 0.0), Vec3::new(4.0, -1.0, 8.0), grey()).unwrap();

        assert_eq!(plane.position(), Vec3::new(1.0, -1.0, 4.0));
        let bounds = plane.bounding_box();
        assert_eq!(bounds.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(4.0, -1.0, 8.0));
    }

    #[test]
    fn test_invalid_geometry_is_reported() {
        assert!(matches!(
            Primitive::sphere(Vec3::ZERO, -1.0, grey()),
            Err(SceneError::InvalidShape(_))
        ));
        assert!(matches!(
            Primitive::plane(Vec3::ZERO, Vec3::ONE, grey()),
            Err(SceneError::DegeneratePlane { corner_a, corner_b })
                if corner_a == [0.0; 3] && corner_b == [1.0; 3]
        ));
    }
}
