//! Turns clustering output into ranked, human-readable color records.

use crate::ClusterOutput;

use std::fmt::Display;

use palette::Srgb;

/// One dominant color and the share of the image it covers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ColorRecord {
    /// The centroid rounded to 8-bit channels.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub color: Srgb<u8>,
    /// The color as `#rrggbb` in lowercase hexadecimal.
    pub hex_color: String,
    /// The percentage of pixels assigned to this color, rounded to two decimal places.
    pub percentage: f64,
}

impl Display for ColorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {:6.2}%", self.hex_color, self.percentage)
    }
}

/// Rounds a centroid to the nearest 8-bit color, clamping each channel to `0..=255`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn to_srgb(centroid: [f32; 3]) -> Srgb<u8> {
    let [r, g, b] = centroid.map(|c| c.round().clamp(0.0, 255.0) as u8);
    Srgb::new(r, g, b)
}

/// Formats a color as `#` followed by six lowercase hexadecimal digits.
#[must_use]
pub fn hex(color: Srgb<u8>) -> String {
    let [r, g, b] = palette::cast::into_array(color);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Rounds a percentage to two decimal places.
fn round_percentage(percentage: f64) -> f64 {
    (percentage * 100.0).round() / 100.0
}

/// Builds one [`ColorRecord`] per centroid, sorted by descending share.
///
/// `counts[i]` is the number of pixels assigned to `centroids[i]`.
/// Clusters with equal counts keep their relative order. If there are no pixels at all,
/// every percentage is `0`.
#[must_use]
pub fn format_records(centroids: &[[f32; 3]], counts: &[u32]) -> Vec<ColorRecord> {
    let total = counts.iter().copied().map(u64::from).sum::<u64>();

    let mut clusters = centroids.iter().zip(counts).collect::<Vec<_>>();
    clusters.sort_by(|(_, a), (_, b)| b.cmp(a));

    #[allow(clippy::cast_precision_loss)]
    let total = total as f64;

    clusters
        .into_iter()
        .map(|(&centroid, &count)| {
            let color = to_srgb(centroid);
            let percentage = if total > 0.0 {
                f64::from(count) / total * 100.0
            } else {
                0.0
            };

            ColorRecord {
                color,
                hex_color: hex(color),
                percentage: round_percentage(percentage),
            }
        })
        .collect()
}

impl ClusterOutput {
    /// Formats this output into ranked [`ColorRecord`]s, one per cluster.
    #[must_use]
    pub fn records(&self) -> Vec<ColorRecord> {
        format_records(&self.centroids, &self.counts())
    }
}
