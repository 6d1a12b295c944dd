//! Row-bucket parallel rendering.
//!
//! Divides the image into contiguous row ranges (buckets) that are rendered
//! independently on a rayon pool. Each bucket fills its rows of a full-size
//! buffer and leaves the rest black, so the final image is the elementwise
//! sum of all bucket buffers.

use crate::renderer::render_pixel;
use crate::sampling::stream_seed;
use crate::{Camera, ImageBuffer, RenderConfig, RenderError, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// A contiguous range of image rows, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBucket {
    /// Position of this bucket in top-to-bottom order
    pub index: usize,
    pub start: u32,
    pub end: u32,
}

impl RowBucket {
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.start..self.end
    }

    pub fn row_count(&self) -> u32 {
        self.end - self.start
    }
}

/// Split `height` rows into `count` contiguous buckets of near-equal size.
///
/// `count` is clamped to `1..=height`, so no bucket is ever empty. An image
/// with no rows has no buckets.
pub fn row_buckets(height: u32, count: usize) -> Vec<RowBucket> {
    if height == 0 {
        return Vec::new();
    }

    let count = count.clamp(1, height as usize) as u64;
    let height = u64::from(height);
    (0..count)
        .map(|i| RowBucket {
            index: i as usize,
            start: (i * height / count) as u32,
            end: ((i + 1) * height / count) as u32,
        })
        .collect()
}

/// Render the rows of one bucket into an otherwise black full-size buffer.
///
/// Every row draws from its own generator seeded from the base seed and the
/// row index, so the result does not depend on how rows are bucketed.
pub fn render_bucket(
    bucket: &RowBucket,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(config.width, config.height);

    for y in bucket.rows() {
        let mut rng = StdRng::seed_from_u64(stream_seed(config.seed, u64::from(y)));
        for x in 0..config.width {
            let color = render_pixel(scene, camera, config, x, y, &mut rng);
            image.set(x, y, color);
        }
    }

    image
}

/// Render the whole image on a pool of `config.workers` threads.
///
/// The rows are split into one bucket per worker; the partial buffers are
/// summed once every bucket has finished.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.unwrap_or(0))
        .build()?;
    let buckets = row_buckets(config.height, pool.current_num_threads());

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} workers, {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        pool.current_num_threads(),
        buckets.len()
    );
    let started = Instant::now();

    let partials: Vec<ImageBuffer> = pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| {
                let image = render_bucket(bucket, scene, camera, config);
                log::debug!(
                    "Bucket {} (rows {}..{}) done",
                    bucket.index,
                    bucket.start,
                    bucket.end
                );
                image
            })
            .collect()
    });

    let mut image = ImageBuffer::new(config.width, config.height);
    for partial in &partials {
        image.accumulate(partial)?;
    }

    log::info!("Render finished in {:.2?}", started.elapsed());
    Ok(image)
}
