//! JSON scene descriptions.
//!
//! A scene file holds a camera, a table of named materials and a list of
//! objects that refer to those materials by name.

use octray_renderer::{Camera, Color, Material, Primitive, SceneError, Vec3};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Built-in scene used when no scene file is given.
const DEMO_SCENE: &str = include_str!("../scenes/demo.json");

#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("object {index} uses unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub camera: CameraDesc,
    pub materials: BTreeMap<String, MaterialDesc>,
    pub objects: Vec<ObjectDesc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDesc {
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    #[serde(default = "default_vup")]
    pub vup: [f64; 3],
    /// Vertical field of view in degrees
    pub vfov: f64,
    #[serde(default)]
    pub lens_radius: f64,
    #[serde(default = "default_focus_distance")]
    pub focus_distance: f64,
}

fn default_vup() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_focus_distance() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Diffuse {
        albedo: [f64; 3],
    },
    Metal {
        albedo: [f64; 3],
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        refractive_index: f64,
    },
    Emissive {
        emission: [f64; 3],
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: [f64; 3],
        radius: f64,
        material: String,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        material: String,
    },
    Plane {
        corner_a: [f64; 3],
        corner_b: [f64; 3],
        material: String,
    },
    Cuboid {
        corner_a: [f64; 3],
        corner_b: [f64; 3],
        material: String,
    },
}

impl ObjectDesc {
    fn material(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. }
            | ObjectDesc::Triangle { material, .. }
            | ObjectDesc::Plane { material, .. }
            | ObjectDesc::Cuboid { material, .. } => material,
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        match *desc {
            MaterialDesc::Diffuse { albedo } => Material::diffuse(Color::from_array(albedo)),
            MaterialDesc::Metal { albedo, fuzz } => Material::metal(Color::from_array(albedo), fuzz),
            MaterialDesc::Dielectric { refractive_index } => Material::dielectric(refractive_index),
            MaterialDesc::Emissive { emission } => Material::emissive(Color::from_array(emission)),
        }
    }
}

impl SceneFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneFileError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SceneFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The built-in demo scene.
    pub fn demo() -> Result<Self, SceneFileError> {
        Self::parse(DEMO_SCENE)
    }

    pub fn camera(&self, aspect_ratio: f64) -> Camera {
        let desc = &self.camera;
        Camera::new()
            .with_position(
                Vec3::from_array(desc.look_from),
                Vec3::from_array(desc.look_at),
                Vec3::from_array(desc.vup),
            )
            .with_lens(desc.vfov, desc.lens_radius, desc.focus_distance)
            .with_aspect_ratio(aspect_ratio)
    }

    /// Build the primitives, sharing one material instance per table entry.
    pub fn primitives(&self) -> Result<Vec<Primitive>, SceneFileError> {
        let materials: BTreeMap<&str, Arc<Material>> = self
            .materials
            .iter()
            .map(|(name, desc)| (name.as_str(), Arc::new(Material::from(desc))))
            .collect();

        let mut primitives = Vec::with_capacity(self.objects.len());
        for (index, object) in self.objects.iter().enumerate() {
            let material = materials
                .get(object.material())
                .cloned()
                .ok_or_else(|| SceneFileError::UnknownMaterial {
                    index,
                    name: object.material().to_string(),
                })?;

            let primitive = match object {
                ObjectDesc::Sphere { center, radius, .. } => {
                    Primitive::sphere(Vec3::from_array(*center), *radius, material)?
                }
                ObjectDesc::Triangle { vertices: [a, b, c], .. } => Primitive::triangle(
                    Vec3::from_array(*a),
                    Vec3::from_array(*b),
                    Vec3::from_array(*c),
                    material,
                )?,
                ObjectDesc::Plane { corner_a, corner_b, .. } => {
                    Primitive::plane(Vec3::from_array(*corner_a), Vec3::from_array(*corner_b), material)?
                }
                ObjectDesc::Cuboid { corner_a, corner_b, .. } => {
                    Primitive::cuboid(Vec3::from_array(*corner_a), Vec3::from_array(*corner_b), material)?
                }
            };
            primitives.push(primitive);
        }

        Ok(primitives)
    }
}
