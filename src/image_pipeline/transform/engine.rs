//! Parallel row-band pixel transform engine.
//!
//! The target region is cut into contiguous row bands which rayon executes
//! independently. Every band owns a disjoint slice of the target buffer, so
//! the only synchronisation is the join before `apply` returns.

use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::raster::{Bgra, Raster, Rectangle};
use crate::image_pipeline::transform::types::TransformOptions;

/// Bands scheduled per worker when the band height is not configured.
const BANDS_PER_WORKER: usize = 4;

/// A pure pixel-to-pixel mapping.
///
/// Implementations are invoked concurrently from several bands and must not
/// depend on call order or shared mutable state.
pub trait PixelTransform: Sync {
    fn transform(&self, pixel: Bgra) -> Bgra;
}

impl<F> PixelTransform for F
where
    F: Fn(Bgra) -> Bgra + Sync,
{
    fn transform(&self, pixel: Bgra) -> Bgra {
        self(pixel)
    }
}

/// Rows per band giving each worker a few bands to balance uneven work.
pub fn default_band_height(rows: usize, workers: usize) -> usize {
    rows.div_ceil(workers.max(1) * BANDS_PER_WORKER).max(1)
}

/// Splits `rows` into contiguous, non-overlapping bands of at most
/// `band_height` rows whose union is exactly `rows`.
pub fn row_bands(rows: Range<usize>, band_height: usize) -> Vec<Range<usize>> {
    let band_height = band_height.max(1);
    (rows.start..rows.end)
        .step_by(band_height)
        .map(|start| start..(start + band_height).min(rows.end))
        .collect()
}

pub struct ParallelTransform {
    options: TransformOptions,
    pool: Option<rayon::ThreadPool>,
}

impl ParallelTransform {
    pub fn new(options: TransformOptions) -> Result<Self> {
        let pool = match options.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|idx| format!("pixelflow-band-{idx}"))
                    .build()
                    .map_err(|e| ProcessingError::ThreadPoolError(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { options, pool })
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Writes `transform(source[x, y])` into `target[x, y]` for every
    /// coordinate inside both `target_region` and `source_region`.
    ///
    /// Fails with `InvalidRegion` before touching `target` when
    /// `source_region` leaves the source bounds or `target_region` leaves the
    /// target bounds. Target pixels outside the overlap are left as they are.
    #[instrument(skip_all, fields(target = %target_region, source = %source_region))]
    pub fn apply<T>(
        &self,
        source: &Raster,
        target: &mut Raster,
        target_region: Rectangle,
        source_region: Rectangle,
        transform: &T,
    ) -> Result<()>
    where
        T: PixelTransform + ?Sized,
    {
        if !source_region.fits_within(source.width(), source.height()) {
            return Err(ProcessingError::InvalidRegion {
                region: source_region,
                width: source.width(),
                height: source.height(),
            });
        }
        if !target_region.fits_within(target.width(), target.height()) {
            return Err(ProcessingError::InvalidRegion {
                region: target_region,
                width: target.width(),
                height: target.height(),
            });
        }

        // Columns are shared by every row; rows outside the source are skipped per band.
        let columns = target_region.x.max(source_region.x)
            ..(target_region.x + target_region.width).min(source_region.x + source_region.width);
        let source_rows = source_region.y..source_region.y + source_region.height;
        let start_y = target_region.y;
        let end_y = target_region.y + target_region.height;
        if columns.is_empty() || start_y == end_y {
            return Ok(());
        }

        let band_height = self
            .options
            .band_height
            .unwrap_or_else(|| default_band_height(end_y - start_y, self.workers()));
        let bands = row_bands(start_y..end_y, band_height);
        debug!(bands = bands.len(), band_height, "Partitioned target rows");

        let width = target.width();
        let memoize = self.options.memoize;
        let (_, mut rest) = target.pixels_mut().split_at_mut(start_y * width);
        let mut work = Vec::with_capacity(bands.len());
        for band in bands {
            let (rows, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * width);
            work.push((band, rows));
            rest = tail;
        }

        let run = || {
            work.into_par_iter().for_each(|(band, rows)| {
                scan_band(
                    source,
                    rows,
                    width,
                    band,
                    &columns,
                    &source_rows,
                    transform,
                    memoize,
                );
            })
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn scan_band<T>(
    source: &Raster,
    rows: &mut [Bgra],
    width: usize,
    band: Range<usize>,
    columns: &Range<usize>,
    source_rows: &Range<usize>,
    transform: &T,
    memoize: bool,
) where
    T: PixelTransform + ?Sized,
{
    for (offset, y) in band.enumerate() {
        if !source_rows.contains(&y) {
            continue;
        }
        let Some(source_row) = source.row(y) else {
            continue;
        };
        let target_row = &mut rows[offset * width..(offset + 1) * width];
        // Cache only the last pixel of this row's scan.
        let mut previous: Option<(Bgra, Bgra)> = None;
        for x in columns.clone() {
            let pixel = source_row[x];
            target_row[x] = match previous {
                Some((seen, value)) if memoize && seen == pixel => value,
                _ => {
                    let value = transform.transform(pixel);
                    previous = Some((pixel, value));
                    value
                }
            };
        }
    }
}
