//! A library for extracting the dominant colors of an image.
//!
//! `swatchbook` clusters the pixels of an image with k-means (seeded with k-means++) and reports
//! each cluster's mean color together with the share of the image it covers.
//!
//! # Features
//! To reduce dependencies and compile times, `swatchbook` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: adds the accelerated, data-parallel clustering backend via [`rayon`].
//! - `image`: enables loading images from disk with the [`image`] crate.
//! - `serde`: derives `Serialize` for [`ColorRecord`].
//! - `cli`: builds the `swatchbook` command line tool.
//!
//! # Backends
//! Clustering runs on one of two backends with identical semantics: a sequential one and,
//! with the `threads` feature, a data-parallel one. [`Backend::probe`] picks the best available
//! backend; call it once and pass the result along.
//!
//! # High-Level API
//! To get started, see [`DominantColors`] or, to go straight from a file, `dominant_colors`:
//! ```no_run
//! # use swatchbook::{Backend, ClusterCount, KmeansOptions};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Backend::probe();
//! let records = swatchbook::dominant_colors(
//!     "some image",
//!     ClusterCount::DEFAULT,
//!     backend,
//!     KmeansOptions::new(),
//! )?;
//!
//! for record in records {
//!     println!("{} {:.2}%", record.hex_color, record.percentage);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod error;
mod format;
mod pipeline;
mod types;

pub mod kmeans;

#[cfg(feature = "image")]
pub mod loader;

pub use error::{Error, Result};
pub use format::*;
pub use kmeans::{Backend, ClusterBackend, ClusterOutput, Clusterer, KmeansOptions};
pub use pipeline::*;
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of clusters is `256`, so that every label fits in a `u8`.
pub const MAX_CLUSTERS: u16 = u8::MAX as u16 + 1;
