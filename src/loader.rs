//! Loading images from disk into [`PixelSet`]s.
//!
//! Images are converted to 8-bit RGB (any alpha channel is dropped) and
//! shrunk so that neither side exceeds [`MAX_DIMENSION`] pixels.

use crate::{Error, PixelSet, Result};

use std::path::Path;

use image::{imageops::FilterType, ImageReader, RgbImage};

/// Images with a side longer than this are downscaled before clustering.
pub const MAX_DIMENSION: u32 = 1024;

/// Computes the size an image is resampled to so that its longer side is at most `max_dimension`.
///
/// The longer side becomes exactly `max_dimension` and the shorter side is scaled by the
/// same ratio, rounded down but never below `1`.
#[must_use]
pub fn target_dimensions((width, height): (u32, u32), max_dimension: u32) -> (u32, u32) {
    let larger = width.max(height);
    if larger <= max_dimension {
        return (width, height);
    }

    #[allow(clippy::cast_possible_truncation)]
    let scale = |side: u32| {
        ((u64::from(side) * u64::from(max_dimension)) / u64::from(larger)).max(1) as u32
    };

    (scale(width), scale(height))
}

/// Shrinks the image with a Lanczos filter if its longer side exceeds [`MAX_DIMENSION`],
/// preserving the aspect ratio. Smaller images are returned unchanged.
#[must_use]
pub fn downscale(image: RgbImage) -> RgbImage {
    let (width, height) = target_dimensions(image.dimensions(), MAX_DIMENSION);
    if (width, height) == image.dimensions() {
        image
    } else {
        log::debug!(
            "resampling {}x{} image to {width}x{height}",
            image.width(),
            image.height()
        );
        image::imageops::resize(&image, width, height, FilterType::Lanczos3)
    }
}

/// Opens and decodes the image at `path`, converted to RGB and downscaled.
///
/// The format is detected from the file contents, so the extension may be wrong or missing.
///
/// # Errors
/// Returns [`Error::MissingInput`] if the path does not exist,
/// [`Error::Decode`] if the file is not a supported image,
/// or [`Error::Io`] if it cannot be read.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingInput { path: path.to_owned() });
    }

    let image = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|err| Error::from_io(path.to_owned(), err))?
        .decode()
        .map_err(|err| Error::from_image(path.to_owned(), err))?;
    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(downscale(image.into_rgb8()))
}

/// Loads the pixels of the image at `path`, ready to be clustered.
///
/// # Errors
/// See [`load_image`]. Also fails with [`Error::TooManyPixels`], although downscaling
/// keeps every loaded image well below that limit.
pub fn load_pixels(path: impl AsRef<Path>) -> Result<PixelSet> {
    let image = load_image(path)?;
    Ok(PixelSet::try_from(&image)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use palette::Srgb;
    use tempfile::tempdir;

    #[allow(clippy::cast_possible_truncation)]
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        })
    }

    #[test]
    fn target_dimensions_within_bound() {
        assert_eq!(target_dimensions((4, 4), 1024), (4, 4));
        assert_eq!(target_dimensions((1024, 700), 1024), (1024, 700));
    }

    #[test]
    fn target_dimensions_preserve_aspect_ratio() {
        assert_eq!(target_dimensions((2048, 1024), 1024), (1024, 512));
        assert_eq!(target_dimensions((1000, 3000), 1024), (341, 1024));
        assert_eq!(target_dimensions((5000, 2), 1024), (1024, 1));
    }

    #[test]
    fn small_image_is_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.png");
        let image = gradient(40, 30);
        image.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded, image);

        let pixels = load_pixels(&path).unwrap();
        assert_eq!(pixels.len(), 40 * 30);
    }

    #[test]
    fn large_image_is_downscaled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        gradient(2500, 1250).save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (1024, 512));

        let pixels = load_pixels(&path).unwrap();
        assert_eq!(pixels.len(), 1024 * 512);
    }

    #[test]
    fn alpha_is_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 0]))
            .save(&path)
            .unwrap();

        let pixels = load_pixels(&path).unwrap();
        assert_eq!(pixels.len(), 9);
        assert!(pixels.iter().all(|&p| p == Srgb::new(10, 20, 30)));
    }

    #[test]
    fn missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.png");
        let err = load_pixels(&path).unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn format_is_read_from_contents() {
        let dir = tempdir().unwrap();
        let image = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));

        let png = dir.path().join("red.png");
        image.save(&png).unwrap();

        for name in ["red.jpg", "red", "red.PNG.bak"] {
            let path = dir.path().join(name);
            std::fs::copy(&png, &path).unwrap();

            let pixels = load_pixels(&path).unwrap();
            assert_eq!(pixels.len(), 16);
            assert!(pixels.iter().all(|&p| p == Srgb::new(255, 0, 0)));
        }
    }

    #[test]
    fn undecodable_file() {
        let dir = tempdir().unwrap();

        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"this is not an image").unwrap();
        assert!(matches!(load_pixels(&path), Err(Error::Decode { .. })));

        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(matches!(load_pixels(&path), Err(Error::Decode { .. })));
    }
}
