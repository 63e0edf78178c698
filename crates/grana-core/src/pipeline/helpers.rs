//! Pipeline helpers: clamping and threshold-dispatched parallelism.

use rayon::prelude::*;

/// Minimum number of pixels to trigger parallel processing.
pub(crate) const PARALLEL_THRESHOLD: usize = 30_000;

/// Clamp value to 0.0-1.0 range
#[inline]
pub(crate) fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Apply `f` to every `chunk_size` slice of `data`, in parallel when the
/// chunk count crosses [`PARALLEL_THRESHOLD`].
pub(crate) fn for_each_chunk_mut<T, F>(data: &mut [T], chunk_size: usize, f: F)
where
    T: Send + Sync,
    F: Fn(&mut [T]) + Sync,
{
    let num_elements = data.len() / chunk_size;

    if num_elements >= PARALLEL_THRESHOLD {
        data.par_chunks_exact_mut(chunk_size).for_each(&f);
    } else {
        for chunk in data.chunks_exact_mut(chunk_size) {
            f(chunk);
        }
    }
}

/// Indexed variant: `f` receives the pixel index along with the chunk.
pub(crate) fn for_each_pixel_indexed<T, F>(data: &mut [T], chunk_size: usize, f: F)
where
    T: Send + Sync,
    F: Fn(usize, &mut [T]) + Sync,
{
    let num_elements = data.len() / chunk_size;

    if num_elements >= PARALLEL_THRESHOLD {
        data.par_chunks_exact_mut(chunk_size)
            .enumerate()
            .for_each(|(i, chunk)| f(i, chunk));
    } else {
        for (i, chunk) in data.chunks_exact_mut(chunk_size).enumerate() {
            f(i, chunk);
        }
    }
}
