use rayon::prelude::*;
use thiserror::Error;

use omniview_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how per-pixel operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    #[default]
    Serial,

    /// Use the global Rayon thread pool, one task per image row.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

/// Apply a function to every pixel of the destination image.
///
/// The function receives the row, the column and the channels of the pixel.
/// Rows are disjoint slices of the buffer, so parallel strategies need no
/// synchronization beyond the final join.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    strategy: ExecutionStrategy,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) -> Result<(), ParallelError>
where
    T: Send,
{
    if dst.is_empty() || C == 0 {
        return Ok(());
    }

    let row_stride = C * dst.cols();
    let dst_slice = dst.as_slice_mut();

    let process_row = |(row, dst_row): (usize, &mut [T])| {
        dst_row
            .chunks_exact_mut(C)
            .enumerate()
            .for_each(|(col, dst_pixel)| f(row, col, dst_pixel));
    };

    match strategy {
        ExecutionStrategy::Serial => {
            dst_slice
                .chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(process_row);
        }
        ExecutionStrategy::ParallelRows => {
            dst_slice
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(process_row);
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst_slice
                    .par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(process_row);
            });
        }
    }

    Ok(())
}
