use super::{components, nearest, squared_distance, ClusterBackend, ClusterSum};

use palette::Srgb;

/// The sequential clustering backend.
///
/// Every primitive is a plain loop over the pixels on the calling thread.
/// This is always available and is the reference behavior for other backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardClusterer;

impl ClusterBackend for StandardClusterer {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn update_nearest(&self, pixels: &[Srgb<u8>], nearest: &mut [f32], centroid: [f32; 3]) {
        for (distance, &pixel) in nearest.iter_mut().zip(pixels) {
            *distance = distance.min(squared_distance(components(pixel), centroid));
        }
    }

    fn assign(&self, pixels: &[Srgb<u8>], centroids: &[[f32; 3]], labels: &mut [u8]) {
        for (label, &pixel) in labels.iter_mut().zip(pixels) {
            *label = nearest(centroids, components(pixel));
        }
    }

    fn accumulate(&self, pixels: &[Srgb<u8>], labels: &[u8], k: usize) -> Vec<ClusterSum> {
        let mut sums = vec![ClusterSum::default(); k];
        for (&pixel, &label) in pixels.iter().zip(labels) {
            sums[usize::from(label)].add(components(pixel));
        }
        sums
    }
}
