//! Math types for the octray renderer.
//!
//! Geometry is double precision throughout: the intersection epsilons used by
//! the renderer go down to 1e-9, which single precision cannot resolve.

/// 3-component double-precision vector used for points, directions and colors.
pub use glam::DVec3 as Vec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
