//! Octant partition acceleration structure.
//!
//! One cube enclosing the whole scene is split into `8^depth` equal leaf
//! cells. Every primitive is registered in each leaf its geometry overlaps,
//! so a ray only needs to test the primitives of the cells it enters. Cells
//! left empty are dropped.

use crate::{Hit, Primitive, SceneError};
use octray_math::{Aabb, Ray, Vec3};

/// Deepest supported split (4096 leaves).
pub const MAX_SPLIT_DEPTH: u32 = 4;

/// A leaf cell and the indices of the primitives overlapping it.
#[derive(Debug, Clone)]
pub struct Cell {
    pub bounds: Aabb,
    pub items: Vec<usize>,
}

/// Set of non-empty leaf cells covering every primitive.
#[derive(Debug, Clone)]
pub struct Partition {
    cells: Vec<Cell>,
    bounds: Aabb,
    primitive_count: usize,
}

impl Partition {
    /// Build the partition for `primitives`, split `depth` times.
    ///
    /// Fails if a primitive ends up in no cell at all, which would make it
    /// invisible to every ray.
    pub fn build(primitives: &[Primitive], depth: u32) -> Result<Self, SceneError> {
        if depth > MAX_SPLIT_DEPTH {
            return Err(SceneError::SplitDepthTooLarge {
                depth,
                max: MAX_SPLIT_DEPTH,
            });
        }

        let bounds = root_cube(primitives);
        let leaves = bounds.split(depth);
        let leaf_count = leaves.len();

        let mut assigned = vec![false; primitives.len()];
        let mut cells = Vec::new();
        for leaf in leaves {
            let items: Vec<usize> = primitives
                .iter()
                .enumerate()
                .filter(|(_, p)| p.intersects_bounding_box(&leaf))
                .map(|(i, _)| i)
                .collect();

            if items.is_empty() {
                continue;
            }
            for &i in &items {
                assigned[i] = true;
            }
            cells.push(Cell {
                bounds: leaf,
                items,
            });
        }

        if let Some(index) = assigned.iter().position(|&a| !a) {
            return Err(SceneError::UnassignedPrimitive { index });
        }

        let partition = Self {
            cells,
            bounds,
            primitive_count: primitives.len(),
        };

        log::info!(
            "Partition built: depth {}, {} of {} cells occupied, {} memberships for {} primitives",
            depth,
            partition.cells.len(),
            leaf_count,
            partition.membership_count(),
            primitives.len()
        );

        Ok(partition)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The root cube the leaves were split from.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Total primitive registrations across all cells.
    pub fn membership_count(&self) -> usize {
        self.cells.iter().map(|c| c.items.len()).sum()
    }

    /// Nearest hit among the primitives of the cells `ray` enters.
    ///
    /// `primitives` must be the slice the partition was built from. A
    /// primitive living in several cells is tested once per query.
    pub fn nearest(&self, ray: &Ray, primitives: &[Primitive]) -> Option<(usize, Hit)> {
        debug_assert_eq!(primitives.len(), self.primitive_count);

        let mut tested = vec![0u64; self.primitive_count.div_ceil(64)];
        let mut nearest: Option<(usize, Hit)> = None;

        for cell in self.cells.iter().filter(|c| c.bounds.hit(ray)) {
            for &index in &cell.items {
                let (word, bit) = (index / 64, 1u64 << (index % 64));
                if tested[word] & bit != 0 {
                    continue;
                }
                tested[word] |= bit;

                if let Some(hit) = primitives[index].intersect(ray) {
                    if nearest.map_or(true, |(_, best)| hit.distance < best.distance) {
                        nearest = Some((index, hit));
                    }
                }
            }
        }

        nearest
    }
}

/// Cube enclosing every primitive with some room to spare, so that no
/// surface sits exactly on the outer faces.
fn root_cube(primitives: &[Primitive]) -> Aabb {
    let scene = primitives
        .iter()
        .fold(Aabb::EMPTY, |acc, p| Aabb::surrounding(&acc, &p.bounding_box()));
    if scene.is_empty() {
        return Aabb::cube(Vec3::splat(-1.0), 2.0);
    }

    let length = scene.extent().max_element();
    let pad = 1.0 + 0.01 * length;
    Aabb::cube(scene.min - Vec3::splat(pad), length + 2.0 * pad)
}
