//! Surface scattering materials.
//!
//! Materials are a closed set matched exhaustively; one instance can be shared
//! by any number of primitives.

use crate::sampling::{gen_f64, random_in_unit_sphere};
use crate::Hit;
use octray_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Distance scattered rays are pushed off the surface they leave.
pub const SURFACE_OFFSET: f64 = 1e-5;

/// Result of a material interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Color multiplier applied to whatever the scattered ray sees, or the
    /// final contribution when the ray stops here
    pub attenuation: Color,
    /// `None` when the ray is absorbed
    pub scattered: Option<Ray>,
}

impl Scatter {
    fn bounce(attenuation: Color, ray: Ray) -> Self {
        Self {
            attenuation,
            scattered: Some(ray),
        }
    }

    fn absorb(attenuation: Color) -> Self {
        Self {
            attenuation,
            scattered: None,
        }
    }
}

/// How light interacts with a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lambertian reflector.
    Diffuse { albedo: Color },
    /// Specular reflector; `fuzz` in [0, 1] blurs the reflection.
    Metal { albedo: Color, fuzz: f64 },
    /// Refractive glass-like surface (1.0 = air, 1.5 = glass, 2.4 = diamond).
    Dielectric { refractive_index: f64 },
    /// Light source: stops the path and contributes its emission.
    Emissive { emission: Color },
}

impl Material {
    pub fn diffuse(albedo: Color) -> Self {
        Self::Diffuse { albedo }
    }

    /// Create a metal. Fuzz is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Self::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn dielectric(refractive_index: f64) -> Self {
        Self::Dielectric { refractive_index }
    }

    pub fn emissive(emission: Color) -> Self {
        Self::Emissive { emission }
    }

    /// Turn an incoming ray and its hit into an attenuation and, unless the
    /// ray is absorbed, the next ray to follow.
    ///
    /// The normal is turned against the incoming ray first, so a hit from
    /// inside a closed surface scatters back into it.
    pub fn scatter(&self, ray_in: &Ray, hit: &Hit, rng: &mut dyn RngCore) -> Scatter {
        let normal = hit.facing_normal(ray_in.direction());

        match *self {
            Material::Diffuse { albedo } => {
                let target = hit.position + normal + random_in_unit_sphere(rng);
                let mut direction = target - hit.position;

                // Catch degenerate scatter direction
                if direction.length_squared() < 1e-12 {
                    direction = normal;
                }

                let origin = hit.position + normal * SURFACE_OFFSET;
                Scatter::bounce(albedo, Ray::new(origin, direction.normalize()))
            }

            Material::Metal { albedo, fuzz } => {
                let mut direction = reflect(ray_in.direction().normalize(), normal);
                if fuzz > 0.0 {
                    direction = (direction + fuzz * random_in_unit_sphere(rng)).normalize();
                }

                // Reflections that dive below the surface are absorbed and
                // contribute nothing.
                if direction.dot(normal) > 0.0 {
                    let origin = hit.position + normal * SURFACE_OFFSET;
                    Scatter::bounce(albedo, Ray::new(origin, direction))
                } else {
                    Scatter::absorb(Color::ZERO)
                }
            }

            Material::Dielectric { refractive_index } => {
                let refraction_ratio = if hit.inside {
                    refractive_index
                } else {
                    1.0 / refractive_index
                };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

                // Check for total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let ray = if cannot_refract
                    || gen_f64(rng) < reflectance(cos_theta, refraction_ratio)
                {
                    Ray::new(
                        hit.position + normal * SURFACE_OFFSET,
                        reflect(unit_direction, normal),
                    )
                } else {
                    Ray::new(
                        hit.position - normal * SURFACE_OFFSET,
                        refract(unit_direction, normal, refraction_ratio).normalize(),
                    )
                };
                Scatter::bounce(Color::ONE, ray)
            }

            Material::Emissive { emission } => Scatter::absorb(emission),
        }
    }
}

/// Schlick's approximation for reflectance
pub fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface whose normal faces it.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor_hit() -> Hit {
        Hit {
            position: Vec3::new(0.0, 0.0, 0.0),
            distance: 1.0,
            normal: Vec3::Y,
            inside: false,
        }
    }

    fn colinear(a: Vec3, b: Vec3) -> bool {
        a.normalize().cross(b.normalize()).length() < 1e-12 && a.dot(b) > 0.0
    }

    #[test]
    fn test_diffuse_scatters_back_inside_sphere() {
        let sphere = crate::Sphere::new(Vec3::ZERO, 1.0).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = sphere.intersect(&ray).unwrap();
        assert!(hit.inside);
        assert!((hit.normal - Vec3::X).length() < 1e-12);

        let material = Material::diffuse(Color::splat(0.5));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let out = material.scatter(&ray, &hit, &mut rng).scattered.unwrap();
            assert!(out.direction().dot(Vec3::X) < 0.0);
            assert!(out.origin().x < 1.0);
        }
    }

    #[test]
    fn test_diffuse_scatters_into_hemisphere() {
        let material = Material::diffuse(Color::new(0.8, 0.3, 0.3));
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0).normalize());
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..500 {
            let scatter = material.scatter(&ray, &floor_hit(), &mut rng);
            assert_eq!(scatter.attenuation, Color::new(0.8, 0.3, 0.3));

            let out = scatter.scattered.expect("diffuse never absorbs");
            assert!((out.direction().length() - 1.0).abs() < 1e-9);
            assert!(out.direction().dot(Vec3::Y) > 0.0);
            assert_eq!(out.origin(), Vec3::new(0.0, SURFACE_OFFSET, 0.0));
        }
    }

    #[test]
    fn test_mirror_reflection_is_exact() {
        let material = Material::metal(Color::splat(0.9), 0.0);
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming);
        let mut rng = StdRng::seed_from_u64(2);

        let scatter = material.scatter(&ray, &floor_hit(), &mut rng);
        let out = scatter.scattered.expect("mirror reflects");

        assert!(colinear(out.direction(), Vec3::new(1.0, 1.0, 0.0)));
        assert!(colinear(out.direction(), reflect(incoming, Vec3::Y)));
        assert_eq!(scatter.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_fuzzy_metal_grazing_rays_absorb() {
        let material = Material::metal(Color::ONE, 1.0);
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0).normalize());
        let mut rng = StdRng::seed_from_u64(3);

        let mut absorbed = 0;
        for _ in 0..1000 {
            let scatter = material.scatter(&ray, &floor_hit(), &mut rng);
            match scatter.scattered {
                Some(out) => assert!(out.direction().dot(Vec3::Y) > 0.0),
                None => {
                    assert_eq!(scatter.attenuation, Color::ZERO);
                    absorbed += 1;
                }
            }
        }
        assert!(absorbed > 0);
        assert!(absorbed < 1000);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(
            Material::metal(Color::ONE, 3.0),
            Material::Metal { albedo: Color::ONE, fuzz: 1.0 }
        );
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::dielectric(1.5);
        // Leaving glass at 60 degrees from the normal: 1.5 * sin(60) > 1.
        let incoming = Vec3::new(60f64.to_radians().sin(), 60f64.to_radians().cos(), 0.0);
        let ray = Ray::new(-incoming, incoming);
        let hit = Hit {
            position: Vec3::ZERO,
            distance: 1.0,
            normal: Vec3::Y,
            inside: true,
        };
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            let scatter = material.scatter(&ray, &hit, &mut rng);
            let out = scatter.scattered.unwrap();
            assert!(colinear(out.direction(), reflect(incoming, -Vec3::Y)));
            assert!(out.origin().y < 0.0);
            assert_eq!(scatter.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_normal_incidence() {
        let material = Material::dielectric(1.5);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(5);

        let mut refracted = 0;
        for _ in 0..1000 {
            let out = material.scatter(&ray, &floor_hit(), &mut rng).scattered.unwrap();
            if out.direction().y < 0.0 {
                // Straight through, starting just below the surface.
                assert!((out.direction() + Vec3::Y).length() < 1e-9);
                assert!(out.origin().y < 0.0);
                refracted += 1;
            } else {
                assert!((out.direction() - Vec3::Y).length() < 1e-9);
            }
        }
        // Schlick gives 4% reflectance head-on.
        assert!(refracted > 900, "refracted {refracted}");
    }

    #[test]
    fn test_refraction_bends_towards_normal() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(incoming, Vec3::Y, 1.0 / 1.5).normalize();

        // Snell: sin(out) = sin(45) / 1.5
        let expected_sin = (45f64.to_radians().sin()) / 1.5;
        assert!((out.x - expected_sin).abs() < 1e-9);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_schlick_reflectance() {
        assert!((reflectance(1.0, 1.5) - 0.04).abs() < 1e-12);
        assert!((reflectance(0.0, 1.5) - 1.0).abs() < 1e-12);
        assert!((reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_emissive_stops_path() {
        let material = Material::emissive(Color::new(4.0, 4.0, 3.0));
        let ray = Ray::new(Vec3::Y, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(6);

        let scatter = material.scatter(&ray, &floor_hit(), &mut rng);
        assert_eq!(scatter.attenuation, Color::new(4.0, 4.0, 3.0));
        assert!(scatter.scattered.is_none());
    }
}
