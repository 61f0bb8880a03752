#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use swatchbook::{loader, PixelSet};

/// Directory of extra benchmark images, read if set.
pub const IMAGE_DIR_VAR: &str = "SWATCHBOOK_BENCH_IMAGES";

pub fn load_images(images: &[PathBuf]) -> Vec<(String, PixelSet)> {
    images
        .iter()
        .map(|path| {
            loader::load_pixels(path).map(|pixels| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    pixels,
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, PixelSet)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read img directory")
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

/// A smooth two-axis gradient: many distinct colors, few sharp clusters.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = x * 255 / width.max(1);
        let g = y * 255 / height.max(1);
        let b = 255 - (r + g) / 2;
        Rgb([r as u8, g as u8, b as u8])
    })
}

/// A handful of flat colors with seeded noise on top.
pub fn noisy_blocks(width: u32, height: u32, seed: u64) -> RgbImage {
    const BASE: [[u8; 3]; 6] = [
        [200, 40, 40],
        [40, 160, 60],
        [30, 60, 200],
        [230, 220, 90],
        [20, 20, 20],
        [240, 240, 240],
    ];

    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |x, y| {
        let base = BASE[((x / 64 + y / 64) as usize) % BASE.len()];
        Rgb(base.map(|c| c.saturating_add_signed(rng.gen_range(-12..=12))))
    })
}

fn synthetic_images() -> Vec<(String, PixelSet)> {
    [
        ("gradient_1024x768".to_owned(), gradient(1024, 768)),
        ("blocks_1024x1024".to_owned(), noisy_blocks(1024, 1024, 7)),
        ("blocks_2048x1536".to_owned(), noisy_blocks(2048, 1536, 11)),
    ]
    .into_iter()
    .map(|(name, image)| {
        let image = loader::downscale(image);
        (name, PixelSet::try_from(&image).unwrap())
    })
    .collect()
}

static BENCH_IMAGES: OnceLock<Vec<(String, PixelSet)>> = OnceLock::new();

pub fn load_bench_images() -> Vec<(String, PixelSet)> {
    let mut images = synthetic_images();
    if let Some(dir) = std::env::var_os(IMAGE_DIR_VAR) {
        images.extend(load_image_dir(dir));
    }
    images
}

pub fn bench_images() -> &'static [(String, PixelSet)] {
    BENCH_IMAGES.get_or_init(load_bench_images)
}
