//! This crate turns a raster mask into a signed distance field.
//! Selected channels of the source are thresholded into a boolean
//! occupancy grid, and every output pixel then stores the distance
//! to the nearest inside/outside boundary, found by a brute-force
//! search in a square window bounded by the spread.

pub mod pixel;
pub mod occupancy;
pub mod distance_field;

pub mod prelude {
    pub use crate::{
        FieldSettings,
        generate_distance_field,
        generate_distance_field_into,
    };

    pub use crate::pixel::{
        PixelSource, PixelSink,
        ChannelSelector, Rgba16Source,
    };

    pub use crate::occupancy::OccupancyGrid;

    pub use crate::distance_field::DistanceImage;

    #[cfg(feature = "image_pipeline")]
    pub use crate::pixel::image_pipeline;
}


use prelude::*;

/// Immutable parameters of one mask-to-field conversion, passed
/// into the pipeline instead of living in ambient state.
///
/// The defaults mirror a common glyph workflow: threshold the
/// alpha channel at one half, search four pixels far, keep the
/// full resolution and the full canvas.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FieldSettings {
    /// Maximum distance, in source pixels, scanned for a boundary.
    /// Must be greater than zero.
    pub spread: f32,

    /// Factor by which the output resolution is reduced,
    /// rounding the output size downwards. Must be at least one.
    pub downscale: u32,

    /// Which source channels define the inside of the shape.
    pub channels: ChannelSelector,

    /// Channel threshold in `[0, 1]` for a pixel to count as inside.
    pub threshold: f32,

    /// Crop the grid to its occupied bounding box before rendering.
    pub crop: bool,
}

impl Default for FieldSettings {
    fn default() -> Self {
        FieldSettings {
            spread: 4.0,
            downscale: 1,
            channels: ChannelSelector::ALPHA,
            threshold: 0.5,
            crop: false,
        }
    }
}

impl FieldSettings {
    /// Abort on parameter values that violate the contract.
    /// Callers with untrusted input should validate before
    /// constructing the settings, as the command line tool does.
    pub fn assert_valid(&self) {
        assert!(self.spread > 0.0, "spread must be greater than zero");
        assert!(self.downscale >= 1, "downscale must be at least one");
        assert!(
            (0.0..=1.0).contains(&self.threshold),
            "threshold must lie within 0.0 and 1.0"
        );
    }
}


/// Convert a pixel source into a rendered distance field:
/// threshold the selected channels into an occupancy grid,
/// optionally crop it, and render the field around it.
pub fn generate_distance_field(source: &impl PixelSource, settings: &FieldSettings) -> DistanceImage {
    settings.assert_valid();
    assert!(source.width() > 0 && source.height() > 0, "source must not be empty");

    let grid = build_grid(source, settings);
    distance_field::render(&grid, settings.downscale, settings.spread)
}

/// Like `generate_distance_field`, but writing into a caller-owned
/// sink. The sink dimensions must match `distance_field::output_size`
/// of the (possibly cropped) grid.
pub fn generate_distance_field_into(
    source: &impl PixelSource, settings: &FieldSettings, sink: &mut impl PixelSink,
) {
    settings.assert_valid();
    assert!(source.width() > 0 && source.height() > 0, "source must not be empty");

    let grid = build_grid(source, settings);
    distance_field::render_into(&grid, settings.downscale, settings.spread, sink);
}

fn build_grid(source: &impl PixelSource, settings: &FieldSettings) -> OccupancyGrid {
    let grid = OccupancyGrid::from_source(source, settings.channels, settings.threshold);
    if settings.crop { grid.crop() } else { grid }
}
