//! Fixed-size worker pool with a synchronous parallel-for.
//!
//! Each raster pass splits its column or row range into one contiguous chunk
//! per worker and returns only after every chunk is done.  Workers write to
//! disjoint output indices, so the join is the only synchronisation.

use std::ops::Range;

use log::info;
use rayon::{ThreadPool, ThreadPoolBuilder, ThreadPoolBuildError};

use super::buffers::RowBand;

/// Split `0..n` into `k` contiguous chunks of `n / k` items; the last chunk
/// also takes the remainder.
pub fn split_range(n: usize, k: usize) -> Vec<Range<usize>> {
    let k = k.max(1);
    let step = n / k;
    (0..k)
        .map(|i| {
            let start = i * step;
            let end = if i == k - 1 { n } else { start + step };
            start..end
        })
        .collect()
}

/// Threads are spawned once and reused for every pass of every frame.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("raster-{i}"))
            .build()?;
        info!("raster pool: {} workers", pool.current_num_threads());
        Ok(Self { pool })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// One chunk of `0..n` per worker.
    #[inline]
    pub fn chunks(&self, n: usize) -> Vec<Range<usize>> {
        split_range(n, self.workers())
    }

    /// Evaluate `f(i)` for every `i` in `0..n`, chunked across the workers.
    /// Results come back in index order.
    pub fn map_chunks<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let ranges = self.chunks(n);
        let mut parts: Vec<Vec<T>> = ranges.iter().map(|r| Vec::with_capacity(r.len())).collect();

        let f = &f;
        self.pool.scope(|s| {
            for (range, part) in ranges.iter().cloned().zip(parts.iter_mut()) {
                s.spawn(move |_| part.extend(range.map(f)));
            }
        });

        parts.into_iter().flatten().collect()
    }

    /// Run `f` on every band concurrently and wait for all of them.
    pub fn for_each_band<F>(&self, bands: Vec<RowBand<'_>>, f: F)
    where
        F: Fn(RowBand<'_>) + Sync,
    {
        let f = &f;
        self.pool.scope(|s| {
            for band in bands {
                s.spawn(move |_| f(band));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::software::buffers::FrameBuffers;

    #[test]
    fn last_chunk_absorbs_remainder() {
        assert_eq!(split_range(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(split_range(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn more_workers_than_items() {
        let chunks = split_range(2, 4);
        assert_eq!(chunks, vec![0..0, 0..0, 0..0, 0..2]);
        assert_eq!(chunks.iter().map(|r| r.len()).sum::<usize>(), 2);
    }

    #[test]
    fn zero_workers_means_one_chunk() {
        assert_eq!(split_range(5, 0), vec![0..5]);
    }

    #[test]
    fn map_chunks_preserves_order() {
        let pool = WorkerPool::new(3).unwrap();
        let out = pool.map_chunks(100, |i| i * 2);
        assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn bands_are_filled_concurrently() {
        let pool = WorkerPool::new(4).unwrap();
        let mut fb = FrameBuffers::new(16, 9);
        let ranges = pool.chunks(fb.height);
        pool.for_each_band(fb.bands(&ranges), |mut band| {
            for y in band.rows.clone() {
                for x in 0..band.width {
                    let i = band.index(x, y);
                    band.stencil[i] = y as u8;
                }
            }
        });
        for y in 0..9 {
            for x in 0..16 {
                assert_eq!(fb.stencil[y * 16 + x], y as u8);
            }
        }
    }
}
