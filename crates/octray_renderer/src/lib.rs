//! Octray - CPU path tracing over an octant-partitioned scene.
//!
//! Rays are traced through spheres, triangles and triangle-built planes and
//! cuboids. An octant partition culls primitives before exact intersection,
//! materials decide how each path continues, and image rows are spread across
//! a rayon pool.

mod bucket;
mod camera;
mod composite;
mod error;
mod hit;
mod material;
mod output;
mod partition;
mod primitive;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bucket::{render, render_bucket, row_buckets, RowBucket};
pub use camera::Camera;
pub use composite::Composite;
pub use error::{OutputError, RenderError, SceneError};
pub use hit::Hit;
pub use material::{reflect, reflectance, refract, Color, Material, Scatter, SURFACE_OFFSET};
pub use output::{save_png, save_ppm, write_png, write_ppm};
pub use partition::{Cell, Partition, MAX_SPLIT_DEPTH};
pub use primitive::{Primitive, Shape};
pub use renderer::{
    color_to_rgb8, render_pixel, sky_color, trace, trace_path, ImageBuffer, PathEnd, PathSample, RenderConfig,
};
pub use sampling::stream_seed;
pub use scene::{Scene, SceneHit};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from octray_math
pub use octray_math::{Aabb, Interval, Ray, Vec3};
