//! Core path tracing renderer.
//!
//! Implements material-driven Monte Carlo path tracing:
//! - Iterative bounce loop with a running attenuation product
//! - Vertical sky gradient for rays that escape (or run out of depth)
//! - Anti-aliasing via jittered multi-sampling

use crate::{Camera, Color, RenderError, Scene};
use octray_math::{Interval, Ray};
use rand::RngCore;

use crate::sampling::gen_f64;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Worker threads; `None` uses every available core
    pub workers: Option<usize>,
    /// Base seed for the per-row random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 10,
            max_depth: 10,
            workers: None,
            seed: 0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples per pixel must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(RenderError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// How a traced path came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    /// Escaped the scene.
    Sky,
    /// Still bouncing after `max_depth` scatter events.
    MaxDepth,
    /// Stopped at a surface that did not scatter.
    Absorbed,
}

/// Result of tracing one primary ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub color: Color,
    /// Number of scatter events along the path
    pub bounces: u32,
    pub end: PathEnd,
}

/// Follow a ray through the scene until it escapes, is absorbed or exceeds
/// `max_depth` bounces.
///
/// Colors combine multiplicatively along the path; escaping and over-deep
/// paths both see the sky.
pub fn trace_path(scene: &Scene, ray: &Ray, max_depth: u32, rng: &mut dyn RngCore) -> PathSample {
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut depth = 0;

    loop {
        if depth > max_depth {
            return PathSample {
                color: throughput * sky_color(&ray),
                bounces: depth,
                end: PathEnd::MaxDepth,
            };
        }

        let Some(found) = scene.nearest_intersection(&ray) else {
            return PathSample {
                color: throughput * sky_color(&ray),
                bounces: depth,
                end: PathEnd::Sky,
            };
        };

        let scatter = found.primitive.material().scatter(&ray, &found.hit, rng);
        match scatter.scattered {
            Some(next) => {
                throughput *= scatter.attenuation;
                ray = next;
                depth += 1;
            }
            None => {
                return PathSample {
                    color: throughput * scatter.attenuation,
                    bounces: depth,
                    end: PathEnd::Absorbed,
                };
            }
        }
    }
}

/// Color seen by a ray.
pub fn trace(scene: &Scene, ray: &Ray, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    trace_path(scene, ray, max_depth, rng).color
}

/// Vertical white-to-blue background gradient.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
///
/// Row 0 is the top of the image. A single sample goes through the pixel
/// center; more samples are jittered across the pixel footprint. The average
/// is clamped to [0, 1] per channel.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let (jx, jy) = if config.samples_per_pixel == 1 {
            (0.0, 0.0)
        } else {
            (gen_f64(rng) - 0.5, gen_f64(rng) - 0.5)
        };
        let u = (f64::from(x) + 0.5 + jx) / width;
        let v = 1.0 - (f64::from(y) + 0.5 + jy) / height;

        let ray = camera.get_ray(u, v, rng);
        pixel_color += trace(scene, &ray, config.max_depth, rng);
    }

    // Average the samples
    let average = pixel_color / f64::from(config.samples_per_pixel);
    Color::new(
        Interval::UNIT.clamp(average.x),
        Interval::UNIT.clamp(average.y),
        Interval::UNIT.clamp(average.z),
    )
}

/// Row-major buffer of linear RGB pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Add another buffer of the same size into this one, pixel by pixel.
    pub fn accumulate(&mut self, other: &ImageBuffer) -> Result<(), RenderError> {
        if other.width != self.width || other.height != self.height {
            return Err(RenderError::BufferMismatch {
                width: self.width,
                height: self.height,
                found_width: other.width,
                found_height: other.height,
            });
        }

        for (pixel, add) in self.pixels.iter_mut().zip(&other.pixels) {
            *pixel += *add;
        }
        Ok(())
    }

    /// Convert to packed 8-bit RGB, clamping and truncating each channel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Convert a color to 8-bit RGB.
#[inline]
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let channel = |c: f64| (Interval::UNIT.clamp(c) * 255.999) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Primitive};
    use octray_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn mirror_corridor() -> Scene {
        let mirror = Arc::new(Material::metal(Color::splat(0.5), 0.0));
        Scene::new(vec![
            Primitive::plane(Vec3::new(-100.0, -100.0, 1.0), Vec3::new(100.0, 100.0, 1.0), mirror.clone()).unwrap(),
            Primitive::plane(Vec3::new(-100.0, -100.0, -1.0), Vec3::new(100.0, 100.0, -1.0), mirror).unwrap(),
        ])
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_color(&Ray::new(Vec3::ZERO, Vec3::Y));
        let down = sky_color(&Ray::new(Vec3::ZERO, -Vec3::Y));
        let level = sky_color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)));

        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
        assert_eq!(down, Color::ONE);
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_escaping_ray_sees_sky() {
        let scene = Scene::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0).normalize());
        let mut rng = StdRng::seed_from_u64(0);

        let sample = trace_path(&scene, &ray, 5, &mut rng);
        assert_eq!(sample.end, PathEnd::Sky);
        assert_eq!(sample.bounces, 0);
        assert_eq!(sample.color, sky_color(&ray));
    }

    #[test]
    fn test_emissive_surface_ends_path() {
        let light = Arc::new(Material::emissive(Color::new(2.0, 1.5, 1.0)));
        let scene = Scene::new(vec![Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, light).unwrap()]);
        let mut rng = StdRng::seed_from_u64(0);

        let sample = trace_path(&scene, &Ray::new(Vec3::ZERO, Vec3::Z), 5, &mut rng);
        assert_eq!(sample.end, PathEnd::Absorbed);
        assert_eq!(sample.bounces, 0);
        assert_eq!(sample.color, Color::new(2.0, 1.5, 1.0));
    }

    #[test]
    fn test_mirror_corridor_hits_max_depth() {
        let scene = mirror_corridor();
        let ray = Ray::new(Vec3::new(0.3, 0.1, 0.0), Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        for max_depth in [0, 1, 3, 7] {
            let sample = trace_path(&scene, &ray, max_depth, &mut rng);
            assert_eq!(sample.end, PathEnd::MaxDepth);
            assert_eq!(sample.bounces, max_depth + 1);

            let expected = Color::new(0.75, 0.85, 1.0) * 0.5f64.powi(max_depth as i32 + 1);
            assert!((sample.color - expected).length() < 1e-12, "depth {max_depth}");
        }
    }

    #[test]
    fn test_single_sample_hits_pixel_center() {
        let scene = Scene::default();
        let camera = Camera::new().with_resolution(4, 2);
        let config = RenderConfig {
            width: 4,
            height: 2,
            samples_per_pixel: 1,
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut other = StdRng::seed_from_u64(2);

        let color = render_pixel(&scene, &camera, &config, 0, 0, &mut rng);
        let expected = sky_color(&camera.get_ray(0.125, 0.75, &mut rng));
        assert!((color - expected).length() < 1e-12);

        assert_eq!(color, render_pixel(&scene, &camera, &config, 0, 0, &mut other));
    }

    #[test]
    fn test_pixel_is_clamped() {
        let light = Arc::new(Material::emissive(Color::new(5.0, 0.5, -1.0)));
        let scene = Scene::new(vec![Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 4.5, light).unwrap()]);
        let config = RenderConfig {
            width: 1,
            height: 1,
            samples_per_pixel: 4,
            ..RenderConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let color = render_pixel(&scene, &Camera::new(), &config, 0, 0, &mut rng);
        assert_eq!(color, Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());

        let bad = [
            RenderConfig { width: 0, ..RenderConfig::default() },
            RenderConfig { height: 0, ..RenderConfig::default() },
            RenderConfig { samples_per_pixel: 0, ..RenderConfig::default() },
            RenderConfig { workers: Some(0), ..RenderConfig::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))), "{config:?}");
        }
    }

    #[test]
    fn test_accumulate_disjoint_buffers() {
        let mut image = ImageBuffer::new(2, 2);
        let mut top = ImageBuffer::new(2, 2);
        let mut bottom = ImageBuffer::new(2, 2);
        top.set(1, 0, Color::new(0.1, 0.2, 0.3));
        bottom.set(0, 1, Color::new(0.4, 0.5, 0.6));

        image.accumulate(&top).unwrap();
        image.accumulate(&bottom).unwrap();
        assert_eq!(image.get(1, 0), Color::new(0.1, 0.2, 0.3));
        assert_eq!(image.get(0, 1), Color::new(0.4, 0.5, 0.6));
        assert_eq!(image.get(0, 0), Color::ZERO);

        assert!(matches!(
            image.accumulate(&ImageBuffer::new(3, 2)),
            Err(RenderError::BufferMismatch { found_width: 3, .. })
        ));
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::new(1.0, 0.5, 0.0)), [255, 127, 0]);
        assert_eq!(color_to_rgb8(Color::new(2.0, -1.0, 0.999)), [255, 0, 255]);
        assert_eq!(color_to_rgb8(Color::splat(0.25)), [63, 63, 63]);
    }
}
