//! Camera for ray generation.

use crate::sampling::random_in_unit_disk;
use octray_math::{Ray, Vec3};
use rand::RngCore;

/// Look-at camera with an optional thin lens.
///
/// Every builder method recomputes the viewport, so a camera is always ready
/// to generate rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f64,           // Vertical field of view in degrees
    aspect_ratio: f64,   // Viewport width over height
    lens_radius: f64,    // Zero for a pinhole camera
    focus_distance: f64, // Distance from camera to plane of perfect focus

    // Derived viewport
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Pinhole camera at the origin looking down -Z with a 90 degree square
    /// field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            lens_radius: 0.0,
            focus_distance: 1.0,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set lens settings. A `lens_radius` of zero gives a pinhole camera.
    pub fn with_lens(mut self, vfov: f64, lens_radius: f64, focus_distance: f64) -> Self {
        self.vfov = vfov;
        self.lens_radius = lens_radius.max(0.0);
        self.focus_distance = focus_distance;
        self.initialize();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.initialize();
        self
    }

    /// Aspect ratio of an image of the given size.
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.with_aspect_ratio(f64::from(width) / f64::from(height.max(1)))
    }

    pub fn origin(&self) -> Vec3 {
        self.look_from
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        -self.w
    }

    fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        self.horizontal = self.focus_distance * viewport_width * self.u;
        self.vertical = self.focus_distance * viewport_height * self.v;
        self.lower_left_corner = self.look_from
            - self.horizontal * 0.5
            - self.vertical * 0.5
            - self.focus_distance * self.w;
    }

    /// Ray through viewport coordinates `u` (rightward) and `v` (upward),
    /// both in [0, 1]. Only a camera with a lens draws from `rng`.
    pub fn get_ray(&self, u: f64, v: f64, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.lens_radius > 0.0 {
            let p = random_in_unit_disk(rng) * self.lens_radius;
            self.look_from + self.u * p.x + self.v * p.y
        } else {
            self.look_from
        };

        let target = self.lower_left_corner + u * self.horizontal + v * self.vertical;
        Ray::new(origin, (target - origin).normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new().with_position(Vec3::new(0.0, 0.1, -1.5), Vec3::new(0.0, 0.1, 10.0), Vec3::Y);

        assert!((camera.forward() - Vec3::Z).length() < 1e-12);
        assert_eq!(camera.origin(), Vec3::new(0.0, 0.1, -1.5));
    }

    #[test]
    fn test_center_ray_follows_view_direction() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), Vec3::Y)
            .with_lens(60.0, 0.0, 1.0)
            .with_resolution(200, 100);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.direction() - Vec3::Z).length() < 1e-12);
        assert!((ray.direction().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_viewport_corners() {
        // 90 degree vfov, square: the viewport spans [-1, 1] at distance 1.
        let camera = Camera::new();
        let mut rng = StdRng::seed_from_u64(42);

        let top_right = camera.get_ray(1.0, 1.0, &mut rng);
        let expected = Vec3::new(1.0, 1.0, -1.0).normalize();
        assert!((top_right.direction() - expected).length() < 1e-12);

        let bottom_left = camera.get_ray(0.0, 0.0, &mut rng);
        let expected = Vec3::new(-1.0, -1.0, -1.0).normalize();
        assert!((bottom_left.direction() - expected).length() < 1e-12);
    }

    #[test]
    fn test_pinhole_does_not_consume_randomness() {
        let camera = Camera::new();
        let mut used = StdRng::seed_from_u64(9);
        let mut fresh = StdRng::seed_from_u64(9);

        let _ = camera.get_ray(0.3, 0.7, &mut used);
        assert_eq!(used.gen::<u64>(), fresh.gen::<u64>());
    }

    #[test]
    fn test_lens_rays_converge_on_focus_plane() {
        let focus = 4.0;
        let camera = Camera::new().with_lens(40.0, 0.5, focus);
        let mut rng = StdRng::seed_from_u64(3);
        let focus_point = Vec3::new(0.0, 0.0, -focus);

        let mut moved = false;
        for _ in 0..32 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            moved |= ray.origin() != Vec3::ZERO;

            let t = (focus_point.z - ray.origin().z) / ray.direction().z;
            assert!((ray.at(t) - focus_point).length() < 1e-9);
        }
        assert!(moved);
    }
}
