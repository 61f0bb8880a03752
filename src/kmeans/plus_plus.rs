use super::{components, Centroids, ClusterBackend};

use crate::{ClusterCount, Error, Result};

use palette::Srgb;
use rand::{distributions::WeightedError, prelude::Distribution, Rng};
use rand_distr::{weighted_alias::WeightedAliasIndex, Uniform};

/// Chooses `k` initial centroids from `pixels` with k-means++ seeding.
///
/// The first centroid is a uniformly random pixel. Each following centroid is a pixel sampled
/// with probability proportional to its squared distance to the nearest centroid chosen so far.
/// When all of those distances are zero (the image has fewer distinct colors than `k`),
/// the pixel is drawn uniformly instead, which may repeat an existing centroid.
///
/// `pixels` must not be empty.
pub(super) fn init<B: ClusterBackend + ?Sized>(
    backend: &B,
    pixels: &[Srgb<u8>],
    k: ClusterCount,
    rng: &mut impl Rng,
) -> Result<Centroids> {
    let uniform = Uniform::new(0, pixels.len());

    let first = components(pixels[uniform.sample(rng)]);
    let mut centroids = Vec::with_capacity(k.get());
    centroids.push(first);

    // squared distance from each pixel to its nearest centroid so far
    let mut nearest = vec![f32::INFINITY; pixels.len()];
    backend.update_nearest(pixels, &mut nearest, first);

    for _ in 1..k.get() {
        let weights = nearest.iter().copied().map(f64::from).collect();
        let i = match WeightedAliasIndex::new(weights) {
            Ok(distribution) => distribution.sample(rng),
            Err(WeightedError::AllWeightsZero) => {
                log::debug!(
                    "every pixel coincides with a centroid after {} seeds, sampling uniformly",
                    centroids.len()
                );
                uniform.sample(rng)
            }
            Err(err) => return Err(Error::numerical(format!("D² sampling failed: {err}"))),
        };

        let centroid = components(pixels[i]);
        backend.update_nearest(pixels, &mut nearest, centroid);
        centroids.push(centroid);
    }

    Ok(Centroids(centroids))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{kmeans::StandardClusterer, tests::*};
    use rand::SeedableRng;
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn k(value: u16) -> ClusterCount {
        ClusterCount::new(value).unwrap()
    }

    #[test]
    fn seeds_are_input_pixels() {
        let pixels = test_pixels(300);
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
        let centroids = init(&StandardClusterer, &pixels, k(12), rng).unwrap();

        assert_eq!(centroids.len(), 12);
        for centroid in centroids.iter() {
            assert!(pixels.iter().any(|&p| components(p) == *centroid));
        }
    }

    #[test]
    fn distinct_colors_are_seeded_first() {
        // D² sampling never picks a color that already has a centroid while others remain
        let pixels = two_color_pixels(1, 999);
        for seed in 0..20 {
            let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
            let centroids = init(&StandardClusterer, &pixels, k(2), rng).unwrap();
            assert_ne!(centroids[0], centroids[1]);
        }
    }

    #[test]
    fn duplicates_when_k_exceeds_distinct_colors() {
        let pixels = solid_pixels(Srgb::new(12, 34, 56), 64);
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(4);
        let centroids = init(&StandardClusterer, &pixels, k(4), rng).unwrap();
        assert_eq!(centroids.len(), 4);
        assert!(centroids.iter().all(|&c| c == [12.0, 34.0, 56.0]));
    }

    #[test]
    fn single_cluster() {
        let pixels = test_pixels(10);
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(8);
        let centroids = init(&StandardClusterer, &pixels, k(1), rng).unwrap();
        assert_eq!(centroids.num_clusters(), 1);
    }
}
