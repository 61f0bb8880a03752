use super::{components, squared_distance, ClusterBackend, ClusterSum};

use std::array;

use palette::Srgb;
use rayon::prelude::*;
use wide::{f32x8, CmpLt};

/// The minimum number of pixels handed to one rayon task.
const MIN_CHUNK: usize = 4096;

/// Lays out the centroids in chunks of 8 lanes per component.
///
/// The last chunk is padded with infinite components, which can never be nearest.
fn simd_table(centroids: &[[f32; 3]]) -> Vec<[f32x8; 3]> {
    let mut table = Vec::with_capacity(centroids.len().div_ceil(8));
    let chunks = centroids.chunks_exact(8);
    table.extend(
        chunks
            .clone()
            .map(|chunk| array::from_fn(|i| f32x8::new(array::from_fn(|j| chunk[j][i])))),
    );

    if !chunks.remainder().is_empty() {
        let mut arr = [[f32::INFINITY; 8]; 3];
        for (i, &color) in chunks.remainder().iter().enumerate() {
            for (arr, c) in arr.iter_mut().zip(color) {
                arr[i] = c;
            }
        }
        table.push(arr.map(f32x8::new));
    }

    table
}

/// Returns the index of the nearest centroid in `table`, preferring the lowest index on ties.
#[inline]
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn simd_argmin(table: &[[f32x8; 3]], query: [f32; 3]) -> u8 {
    let incr = f32x8::ONE;
    let mut cur_chunk = f32x8::ZERO;
    let mut min_chunk = cur_chunk;
    let mut min_distance = f32x8::splat(f32::INFINITY);

    let query = query.map(f32x8::splat);

    for chunk in table {
        let [r, g, b] = array::from_fn(|i| {
            let diff = query[i] - chunk[i];
            diff * diff
        });
        let distance = r + g + b;

        // strict comparison keeps the earliest chunk on ties
        let mask = distance.cmp_lt(min_distance);
        min_chunk = mask.blend(cur_chunk, min_chunk);
        min_distance = mask.blend(distance, min_distance);
        cur_chunk += incr;
    }

    let distances = min_distance.as_array_ref();
    let chunks = min_chunk.as_array_ref();

    let index = |lane: usize| chunks[lane] as usize * 8 + lane;

    let mut min_index = index(0);
    let mut min_dist = distances[0];
    for lane in 1..8 {
        let i = index(lane);
        let d = distances[lane];
        if d < min_dist || (d == min_dist && i < min_index) {
            min_dist = d;
            min_index = i;
        }
    }

    min_index as u8
}

/// The data-parallel clustering backend.
///
/// Pixels are split across the current rayon thread pool. Nearest centroid search compares
/// each pixel against 8 centroids at a time with SIMD, and per-cluster sums are computed
/// as a parallel fold and reduce. The results match [`StandardClusterer`](super::StandardClusterer)
/// up to the order in which the floating point sums are added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceleratedClusterer;

impl ClusterBackend for AcceleratedClusterer {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn update_nearest(&self, pixels: &[Srgb<u8>], nearest: &mut [f32], centroid: [f32; 3]) {
        nearest
            .par_iter_mut()
            .zip(pixels)
            .with_min_len(MIN_CHUNK)
            .for_each(|(distance, &pixel)| {
                *distance = distance.min(squared_distance(components(pixel), centroid));
            });
    }

    fn assign(&self, pixels: &[Srgb<u8>], centroids: &[[f32; 3]], labels: &mut [u8]) {
        let table = simd_table(centroids);
        labels
            .par_iter_mut()
            .zip(pixels)
            .with_min_len(MIN_CHUNK)
            .for_each(|(label, &pixel)| *label = simd_argmin(&table, components(pixel)));
    }

    fn accumulate(&self, pixels: &[Srgb<u8>], labels: &[u8], k: usize) -> Vec<ClusterSum> {
        pixels
            .par_iter()
            .zip(labels)
            .with_min_len(MIN_CHUNK)
            .fold(
                || vec![ClusterSum::default(); k],
                |mut sums, (&pixel, &label)| {
                    sums[usize::from(label)].add(components(pixel));
                    sums
                },
            )
            .reduce(
                || vec![ClusterSum::default(); k],
                |mut a, b| {
                    for (a, b) in a.iter_mut().zip(b) {
                        a.merge(b);
                    }
                    a
                },
            )
    }
}
