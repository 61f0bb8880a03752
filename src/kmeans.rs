//! Clustering of pixels into dominant colors using k-means.
//!
//! Centroids are seeded with k-means++ (D² sampling) and then refined with Lloyd's algorithm:
//! every pixel is assigned to its nearest centroid, every non-empty cluster's centroid is moved
//! to the mean of its pixels, and this repeats until the centroids stop moving or
//! [`KmeansOptions::max_iterations`] is reached.
//!
//! The algorithm lives in [`ClusterBackend::cluster`]. Implementors only provide the
//! data-heavy primitives, so [`StandardClusterer`] and `AcceleratedClusterer`
//! (enabled by the `threads` feature) follow the exact same steps. Which one to use is decided once
//! by [`Backend::probe`] and handed to [`Clusterer::new`].
//!
//! Reference:
//! Arthur, D. & Vassilvitskii, S. k-means++: The Advantages of Careful Seeding.
//! Proceedings of the 18th ACM-SIAM Symposium on Discrete Algorithms, 1027–1035, 2007.

mod plus_plus;
mod standard;

#[cfg(feature = "threads")]
mod accelerated;

#[cfg(feature = "threads")]
pub use accelerated::AcceleratedClusterer;
pub use standard::StandardClusterer;

use crate::{AboveMaxLen, ClusterCount, Error, PixelSet, Result, MAX_CLUSTERS};

use std::{fmt::Display, ops::Deref};

use palette::Srgb;
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;

/// The default cap on the number of Lloyd iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// The centroids (mean colors) of each cluster, one `[r, g, b]` per cluster.
///
/// Components are in the `0.0..=255.0` range of the input pixels.
#[derive(Debug, Clone, PartialEq)]
#[repr(transparent)]
pub struct Centroids(Vec<[f32; 3]>);

impl Centroids {
    /// Gets the inner `Vec` of centroids.
    #[must_use]
    pub fn into_inner(self) -> Vec<[f32; 3]> {
        self.0
    }

    /// Creates [`Centroids`] by truncating the input to at most [`MAX_CLUSTERS`] entries.
    #[must_use]
    pub fn from_truncated(mut centroids: Vec<[f32; 3]>) -> Self {
        centroids.truncate(usize::from(MAX_CLUSTERS));
        Self(centroids)
    }

    /// Returns the number of centroids.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn num_clusters(&self) -> u16 {
        self.0.len() as u16
    }
}

impl Deref for Centroids {
    type Target = [[f32; 3]];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Centroids> for Vec<[f32; 3]> {
    fn from(value: Centroids) -> Self {
        value.into_inner()
    }
}

impl TryFrom<Vec<[f32; 3]>> for Centroids {
    type Error = AboveMaxLen<u16>;

    fn try_from(centroids: Vec<[f32; 3]>) -> Result<Self, Self::Error> {
        if centroids.len() <= usize::from(MAX_CLUSTERS) {
            Ok(Self(centroids))
        } else {
            Err(AboveMaxLen(MAX_CLUSTERS))
        }
    }
}

/// A builder struct to specify the parameters for k-means.
///
/// # Examples
/// ```
/// # use swatchbook::KmeansOptions;
/// let options = KmeansOptions::new()
///     .max_iterations(50)
///     .seed(42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmeansOptions {
    /// The maximum number of assign/update rounds.
    pub(crate) max_iterations: u32,
    /// The seed value for the random number generator, or `None` for a fresh one per run.
    pub(crate) seed: Option<u64>,
    /// Relative tolerance of the convergence check.
    pub(crate) relative_tolerance: f32,
    /// Absolute tolerance of the convergence check.
    pub(crate) absolute_tolerance: f32,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
            relative_tolerance: 1e-5,
            absolute_tolerance: 1e-8,
        }
    }

    /// Sets the maximum number of Lloyd iterations.
    ///
    /// The default is [`DEFAULT_MAX_ITERATIONS`]. At least one iteration is always run,
    /// so `0` is treated as `1`.
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = if max_iterations == 0 { 1 } else { max_iterations };
        self
    }

    /// Sets the seed value for the random number generator used by k-means++ seeding.
    ///
    /// By default, each run draws a fresh seed, so cluster order and identity vary between runs
    /// even though the resulting percentages stay close.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the convergence tolerances.
    ///
    /// Refinement stops once every centroid component satisfies
    /// `|new - old| <= absolute + relative * |old|`.
    /// The defaults are `1e-5` (relative) and `1e-8` (absolute).
    #[must_use]
    pub const fn tolerance(mut self, relative: f32, absolute: f32) -> Self {
        self.relative_tolerance = relative;
        self.absolute_tolerance = absolute;
        self
    }
}

/// The result of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutput {
    /// The final centroid of each cluster.
    ///
    /// Centroids of clusters that ended up empty keep their last value.
    pub centroids: Centroids,
    /// The index of the centroid each pixel was assigned to in the last assignment step.
    pub labels: Vec<u8>,
    /// How many assign/update rounds were run.
    pub iterations: u32,
    /// Whether the centroids stopped moving before the iteration cap.
    pub converged: bool,
}

impl ClusterOutput {
    /// Returns the number of pixels assigned to each cluster.
    #[must_use]
    pub fn counts(&self) -> Vec<u32> {
        let mut counts = vec![0; self.centroids.len()];
        for &label in &self.labels {
            counts[usize::from(label)] += 1;
        }
        counts
    }
}

/// The running sum of the pixels assigned to one cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClusterSum {
    /// Per-channel sum.
    sum: [f64; 3],
    /// Number of pixels added.
    count: u32,
}

impl ClusterSum {
    /// Adds a pixel to the sum.
    #[inline]
    pub fn add(&mut self, color: [f32; 3]) {
        for (s, c) in self.sum.iter_mut().zip(color) {
            *s += f64::from(c);
        }
        self.count += 1;
    }

    /// Combines two partial sums of the same cluster.
    #[inline]
    pub fn merge(&mut self, other: Self) {
        for (s, o) in self.sum.iter_mut().zip(other.sum) {
            *s += o;
        }
        self.count += other.count;
    }

    /// Returns the number of pixels added so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the mean color, or `None` for an empty cluster.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn mean(&self) -> Option<[f32; 3]> {
        if self.count == 0 {
            None
        } else {
            let n = f64::from(self.count);
            Some(self.sum.map(|s| (s / n) as f32))
        }
    }
}

/// Converts a pixel to floating point components.
#[inline]
pub(crate) fn components(color: Srgb<u8>) -> [f32; 3] {
    palette::cast::into_array(color).map(f32::from)
}

/// The unweighted squared Euclidean distance between two colors.
#[inline]
pub(crate) fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Returns the index of the centroid nearest to `color`, preferring the lowest index on ties.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub(crate) fn nearest(centroids: &[[f32; 3]], color: [f32; 3]) -> u8 {
    let mut min_index = 0;
    let mut min_distance = f32::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(color, centroid);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }

    min_index as u8
}

/// Whether every component of `new` is within tolerance of `old`.
fn within_tolerance(old: &[[f32; 3]], new: &[[f32; 3]], relative: f32, absolute: f32) -> bool {
    old.iter()
        .flatten()
        .zip(new.iter().flatten())
        .all(|(&old, &new)| (new - old).abs() <= absolute + relative * old.abs())
}

/// The largest centroid movement between two iterations, for logging.
fn max_shift(old: &[[f32; 3]], new: &[[f32; 3]]) -> f32 {
    old.iter()
        .zip(new)
        .map(|(&a, &b)| squared_distance(a, b).sqrt())
        .fold(0.0, f32::max)
}

/// A clustering backend.
///
/// Implementors supply the per-pixel primitives; [`ClusterBackend::cluster`] runs
/// k-means++ seeding and Lloyd's algorithm on top of them. Every implementation must give
/// the same answers as [`StandardClusterer`] up to floating point summation order.
pub trait ClusterBackend {
    /// A short name for logging.
    fn name(&self) -> &'static str;

    /// Lowers each entry of `nearest` to the squared distance between the
    /// corresponding pixel and `centroid`, if that is smaller.
    fn update_nearest(&self, pixels: &[Srgb<u8>], nearest: &mut [f32], centroid: [f32; 3]);

    /// Writes the index of the nearest centroid for each pixel into `labels`,
    /// breaking ties by the lowest index.
    fn assign(&self, pixels: &[Srgb<u8>], centroids: &[[f32; 3]], labels: &mut [u8]);

    /// Sums the pixels of each of the `k` clusters according to `labels`.
    fn accumulate(&self, pixels: &[Srgb<u8>], labels: &[u8], k: usize) -> Vec<ClusterSum>;

    /// Partitions `pixels` into `k` clusters.
    ///
    /// # Errors
    /// Returns [`Error::Numerical`] if `pixels` is empty or the arithmetic breaks down
    /// (non-finite sampling weights or centroids).
    fn cluster(
        &self,
        pixels: &PixelSet,
        k: ClusterCount,
        options: &KmeansOptions,
    ) -> Result<ClusterOutput> {
        if pixels.is_empty() {
            return Err(Error::numerical("cannot cluster an empty pixel set"));
        }

        let KmeansOptions {
            max_iterations,
            seed,
            relative_tolerance,
            absolute_tolerance,
        } = *options;

        let seed = seed.unwrap_or_else(rand::random);
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);

        let mut centroids = plus_plus::init(self, pixels, k, rng)?;
        log::debug!(
            "{} backend: seeded {k} centroids from {} pixels (seed {seed})",
            self.name(),
            pixels.len(),
        );

        let mut labels = vec![0; pixels.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < max_iterations {
            iterations += 1;

            self.assign(pixels, &centroids, &mut labels);
            let sums = self.accumulate(pixels, &labels, k.get());

            let previous = centroids.clone();
            for (centroid, sum) in centroids.0.iter_mut().zip(&sums) {
                if let Some(mean) = sum.mean() {
                    *centroid = mean;
                }
            }

            if let Some(i) = centroids
                .iter()
                .position(|c| c.iter().any(|v| !v.is_finite()))
            {
                return Err(Error::numerical(format!(
                    "centroid {i} is not finite after iteration {iterations}"
                )));
            }

            log::trace!(
                "iteration {iterations}: max centroid shift {:.4}, {} empty clusters",
                max_shift(&previous, &centroids),
                sums.iter().filter(|s| s.count() == 0).count(),
            );

            if within_tolerance(&previous, &centroids, relative_tolerance, absolute_tolerance) {
                converged = true;
                break;
            }
        }

        log::debug!(
            "{} backend: {} after {iterations} iterations",
            self.name(),
            if converged { "converged" } else { "stopped" },
        );

        Ok(ClusterOutput { centroids, labels, iterations, converged })
    }
}

/// The clustering backends that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Sequential, scalar clustering.
    Standard,
    /// Data-parallel clustering over a rayon thread pool with SIMD distance search.
    #[cfg(feature = "threads")]
    Accelerated,
}

impl Backend {
    /// Probes for the best available backend.
    ///
    /// This returns [`Backend::Accelerated`] if the `threads` feature is enabled and the current
    /// rayon pool has more than one thread, and [`Backend::Standard`] otherwise.
    /// Call it once at startup and pass the result along; it is not re-evaluated per call.
    #[must_use]
    pub fn probe() -> Self {
        #[cfg(feature = "threads")]
        {
            if rayon::current_num_threads() > 1 {
                return Self::Accelerated;
            }
        }
        Self::Standard
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Backend::Standard => "standard",
                #[cfg(feature = "threads")]
                Backend::Accelerated => "accelerated",
            }
        )
    }
}

/// A clusterer bound to one backend.
///
/// # Examples
/// ```
/// # use swatchbook::{Backend, ClusterCount, Clusterer, KmeansOptions, PixelSet};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pixels = PixelSet::try_from(vec![Srgb::new(255, 0, 0), Srgb::new(0, 0, 255)])?;
/// let clusterer = Clusterer::new(Backend::probe());
/// let output = clusterer.cluster(&pixels, ClusterCount::try_from(2u16)?, &KmeansOptions::new().seed(7))?;
/// assert_eq!(output.labels.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clusterer {
    /// See [`StandardClusterer`].
    Standard(StandardClusterer),
    /// See [`AcceleratedClusterer`].
    #[cfg(feature = "threads")]
    Accelerated(AcceleratedClusterer),
}

impl Clusterer {
    /// Creates the clusterer for the given backend.
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        match backend {
            Backend::Standard => Self::Standard(StandardClusterer),
            #[cfg(feature = "threads")]
            Backend::Accelerated => Self::Accelerated(AcceleratedClusterer),
        }
    }

    /// Returns the backend this clusterer runs on.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Standard(_) => Backend::Standard,
            #[cfg(feature = "threads")]
            Self::Accelerated(_) => Backend::Accelerated,
        }
    }

    /// Partitions `pixels` into `k` clusters.
    ///
    /// # Errors
    /// See [`ClusterBackend::cluster`].
    pub fn cluster(
        &self,
        pixels: &PixelSet,
        k: ClusterCount,
        options: &KmeansOptions,
    ) -> Result<ClusterOutput> {
        match self {
            Self::Standard(clusterer) => clusterer.cluster(pixels, k, options),
            #[cfg(feature = "threads")]
            Self::Accelerated(clusterer) => clusterer.cluster(pixels, k, options),
        }
    }
}

impl From<Backend> for Clusterer {
    fn from(backend: Backend) -> Self {
        Self::new(backend)
    }
}
