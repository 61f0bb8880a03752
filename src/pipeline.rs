//! The high level API: pixels in, ranked dominant colors out.

use crate::{Backend, ClusterCount, ClusterOutput, Clusterer, ColorRecord, KmeansOptions, PixelSet, Result};

#[cfg(feature = "image")]
use std::path::Path;

/// A builder struct to extract the dominant colors of a [`PixelSet`].
///
/// # Examples
/// ```
/// # use swatchbook::{Backend, ClusterCount, DominantColors, KmeansOptions, PixelSet};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut colors = vec![Srgb::new(255, 0, 0); 75];
/// colors.extend(vec![Srgb::new(0, 0, 255); 25]);
/// let pixels = PixelSet::try_from(colors)?;
///
/// let records = DominantColors::new(&pixels, Backend::probe())
///     .num_colors(ClusterCount::try_from(2u16)?)
///     .options(KmeansOptions::new().seed(0))
///     .records()?;
///
/// assert_eq!(records[0].hex_color, "#ff0000");
/// assert_eq!(records[0].percentage, 75.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DominantColors<'a> {
    /// The pixels to cluster.
    pixels: &'a PixelSet,
    /// The number of colors to report.
    k: ClusterCount,
    /// The clusterer for the chosen backend.
    clusterer: Clusterer,
    /// Parameters for k-means.
    options: KmeansOptions,
}

impl<'a> DominantColors<'a> {
    /// Creates a new [`DominantColors`] with default options, clustering on `backend`.
    #[must_use]
    pub fn new(pixels: &'a PixelSet, backend: Backend) -> Self {
        Self {
            pixels,
            k: ClusterCount::default(),
            clusterer: Clusterer::new(backend),
            options: KmeansOptions::new(),
        }
    }

    /// Sets the number of dominant colors to extract.
    ///
    /// The default is [`ClusterCount::DEFAULT`].
    #[must_use]
    pub fn num_colors(mut self, k: ClusterCount) -> Self {
        self.k = k;
        self
    }

    /// Sets the k-means parameters.
    #[must_use]
    pub fn options(mut self, options: KmeansOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the clustering and returns the raw [`ClusterOutput`].
    ///
    /// # Errors
    /// Returns [`Error::Numerical`](crate::Error::Numerical) if the pixels cannot be clustered,
    /// e.g., because there are none.
    pub fn cluster(&self) -> Result<ClusterOutput> {
        log::info!(
            "clustering {} pixels into {} colors on the {} backend",
            self.pixels.len(),
            self.k,
            self.clusterer.backend(),
        );
        if log::log_enabled!(log::Level::Debug) {
            let distinct = self.pixels.num_distinct();
            if distinct < self.k.get() {
                log::debug!(
                    "only {distinct} distinct colors for {} clusters, the rest will be empty",
                    self.k
                );
            }
        }
        self.clusterer.cluster(self.pixels, self.k, &self.options)
    }

    /// Runs the clustering and returns one [`ColorRecord`] per cluster,
    /// sorted by descending percentage.
    ///
    /// # Errors
    /// See [`DominantColors::cluster`].
    pub fn records(&self) -> Result<Vec<ColorRecord>> {
        Ok(self.cluster()?.records())
    }
}

/// Loads the image at `path` and returns its `k` dominant colors,
/// sorted by descending percentage.
///
/// # Errors
/// Fails if the image cannot be loaded (see [`load_image`](crate::loader::load_image))
/// or clustered (see [`DominantColors::cluster`]).
#[cfg(feature = "image")]
pub fn dominant_colors(
    path: impl AsRef<Path>,
    k: ClusterCount,
    backend: Backend,
    options: KmeansOptions,
) -> Result<Vec<ColorRecord>> {
    let pixels = crate::loader::load_pixels(path)?;
    DominantColors::new(&pixels, backend)
        .num_colors(k)
        .options(options)
        .records()
}
