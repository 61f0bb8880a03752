//! Contains various types needed across the crate.

use crate::{Error, MAX_CLUSTERS, MAX_PIXELS};

use std::{
    error,
    fmt::{Debug, Display},
    ops::Deref,
};

use palette::Srgb;
#[cfg(feature = "image")]
use {image::RgbImage, palette::cast::ComponentsAs};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> error::Error for AboveMaxLen<T> {}

/// The pixels of an image, flattened in row-major order.
///
/// A [`PixelSet`] is immutable once created and has the invariant that its length
/// is not greater than [`MAX_PIXELS`], so that per-cluster counts fit in a `u32`.
///
/// # Examples
/// From a `Vec` of colors:
/// ```
/// # use swatchbook::{PixelSet, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// let pixels = PixelSet::try_from(vec![Srgb::new(255, 0, 0); 16])?;
/// assert_eq!(pixels.num_pixels(), 16);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct PixelSet(Vec<Srgb<u8>>);

impl PixelSet {
    /// Creates a new [`PixelSet`] by truncating the input to a max length of [`MAX_PIXELS`].
    #[must_use]
    pub fn from_truncated(mut pixels: Vec<Srgb<u8>>) -> Self {
        pixels.truncate(MAX_PIXELS as usize);
        Self(pixels)
    }

    /// Returns the number of pixels as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_pixels(&self) -> u32 {
        self.0.len() as u32
    }

    /// Returns the number of distinct colors in the set.
    #[must_use]
    pub fn num_distinct(&self) -> usize {
        let mut colors = self.0.iter().map(|&c| palette::cast::into_array(c)).collect::<Vec<_>>();
        colors.sort_unstable();
        colors.dedup();
        colors.len()
    }

    /// Gets the inner `Vec` of colors.
    #[must_use]
    pub fn into_inner(self) -> Vec<Srgb<u8>> {
        self.0
    }
}

impl AsRef<[Srgb<u8>]> for PixelSet {
    fn as_ref(&self) -> &[Srgb<u8>] {
        self
    }
}

impl Deref for PixelSet {
    type Target = [Srgb<u8>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<Srgb<u8>>> for PixelSet {
    type Error = AboveMaxLen<u32>;

    fn try_from(pixels: Vec<Srgb<u8>>) -> Result<Self, Self::Error> {
        if pixels.len() <= MAX_PIXELS as usize {
            Ok(Self(pixels))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbImage> for PixelSet {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &RgbImage) -> Result<Self, Self::Error> {
        let pixels = image.pixels().len();
        if pixels <= MAX_PIXELS as usize {
            let buf: &[Srgb<u8>] = image.as_raw()[..(pixels * 3)].components_as();
            Ok(Self(buf.to_vec()))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

/// The number of clusters (K) to partition the pixels into.
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be
/// between `1` and [`MAX_CLUSTERS`] inclusive. The upper bound lets every label fit in a `u8`.
///
/// # Examples
/// ```
/// # use swatchbook::ClusterCount;
/// # fn main() -> Result<(), swatchbook::Error> {
/// let k = ClusterCount::try_from(5u16)?;
/// assert_eq!(k.into_inner(), 5);
/// assert!(ClusterCount::try_from(0u16).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterCount(u16);

impl ClusterCount {
    /// The largest supported number of clusters (given by [`MAX_CLUSTERS`]).
    pub const MAX: Self = Self(MAX_CLUSTERS);

    /// The number of dominant colors reported when none is specified.
    pub const DEFAULT: Self = Self(10);

    /// Creates a [`ClusterCount`], returning `None` if `value` is `0` or above [`MAX_CLUSTERS`].
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        if value >= 1 && value <= MAX_CLUSTERS {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// The count as a `usize`, for indexing and allocation.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for ClusterCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<ClusterCount> for u16 {
    fn from(val: ClusterCount) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u16> for ClusterCount {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(Error::InvalidClusterCount(value))
    }
}

impl Display for ClusterCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}
