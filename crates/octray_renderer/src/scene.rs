//! Scene: the primitive arena and its optional partition.

use crate::{Hit, Partition, Primitive, SceneError};
use octray_math::Ray;

/// Nearest intersection found by a scene query.
#[derive(Debug, Clone, Copy)]
pub struct SceneHit<'a> {
    /// Index into [`Scene::primitives`]
    pub index: usize,
    pub primitive: &'a Primitive,
    pub hit: Hit,
}

/// Read-only query root for nearest-intersection lookups.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    partition: Option<Partition>,
}

impl Scene {
    /// Scene without acceleration; every query tests every primitive.
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self {
            primitives,
            partition: None,
        }
    }

    /// Scene with an octant partition split `split_depth` times.
    pub fn with_partition(primitives: Vec<Primitive>, split_depth: u32) -> Result<Self, SceneError> {
        let partition = Partition::build(&primitives, split_depth)?;
        Ok(Self {
            primitives,
            partition: Some(partition),
        })
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Nearest forward hit along `ray`, if any.
    pub fn nearest_intersection(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let (index, hit) = match &self.partition {
            Some(partition) => partition.nearest(ray, &self.primitives)?,
            None => self.brute_force(ray)?,
        };

        Some(SceneHit {
            index,
            primitive: &self.primitives[index],
            hit,
        })
    }

    fn brute_force(&self, ray: &Ray) -> Option<(usize, Hit)> {
        let mut nearest: Option<(usize, Hit)> = None;
        for (index, primitive) in self.primitives.iter().enumerate() {
            if let Some(hit) = primitive.intersect(ray) {
                if nearest.map_or(true, |(_, best)| hit.distance < best.distance) {
                    nearest = Some((index, hit));
                }
            }
        }
        nearest
    }
}
