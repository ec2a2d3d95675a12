
/// A read-only multi-channel raster the grid builder thresholds.
/// Each of the four channel values is normalized to the full
/// `u16` range, like the 16-bit buffers of the `image` crate.
/// Coordinates must be inside `[0, width) x [0, height)`.
pub trait PixelSource {
    #[inline]
    fn width(&self) -> u32;

    #[inline]
    fn height(&self) -> u32;

    #[inline]
    fn rgba(&self, x: u32, y: u32) -> [u16; 4];
}

/// A write-only single-channel raster the rasterizer fills.
/// Every coordinate is written exactly once per render.
pub trait PixelSink {
    #[inline]
    fn width(&self) -> u32;

    #[inline]
    fn height(&self) -> u32;

    #[inline]
    fn set(&mut self, x: u32, y: u32, value: u16);
}


/// Selects which source channels take part in the inside test.
/// A pixel counts as inside the shape when at least one selected
/// channel meets the threshold. The default selects no channel,
/// which marks the whole mask as outside.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ChannelSelector {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alpha: bool,
}

impl ChannelSelector {
    pub const RED: ChannelSelector = ChannelSelector { red: true, green: false, blue: false, alpha: false };
    pub const GREEN: ChannelSelector = ChannelSelector { red: false, green: true, blue: false, alpha: false };
    pub const BLUE: ChannelSelector = ChannelSelector { red: false, green: false, blue: true, alpha: false };
    pub const ALPHA: ChannelSelector = ChannelSelector { red: false, green: false, blue: false, alpha: true };

    /// Combine two selections channel-wise.
    pub fn union(self, other: ChannelSelector) -> ChannelSelector {
        ChannelSelector {
            red: self.red || other.red,
            green: self.green || other.green,
            blue: self.blue || other.blue,
            alpha: self.alpha || other.alpha,
        }
    }

    pub fn selects_any(&self) -> bool {
        self.red || self.green || self.blue || self.alpha
    }

    /// True if any selected channel reaches the cutoff value.
    #[inline]
    pub fn meets_threshold(&self, rgba: [u16; 4], cutoff: u16) -> bool {
        (self.red && rgba[0] >= cutoff)
            || (self.green && rgba[1] >= cutoff)
            || (self.blue && rgba[2] >= cutoff)
            || (self.alpha && rgba[3] >= cutoff)
    }
}


/// A pixel source backed by a row-major slice
/// with four `u16` channel values per pixel.
pub struct Rgba16Source<'b> {
    width: u32,
    height: u32,
    buffer: &'b [u16],
}

impl<'b> Rgba16Source<'b> {
    pub fn from_slice(width: u32, height: u32, buffer: &'b [u16]) -> Self {
        debug_assert_eq!(buffer.len(), width as usize * height as usize * 4, "Buffer dimension mismatch");
        Rgba16Source { width, height, buffer }
    }
}

impl PixelSource for Rgba16Source<'_> {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn rgba(&self, x: u32, y: u32) -> [u16; 4] {
        let index = 4 * (self.width as usize * y as usize + x as usize);
        [
            self.buffer[index],
            self.buffer[index + 1],
            self.buffer[index + 2],
            self.buffer[index + 3],
        ]
    }
}

/// Read sources from and write fields into rasters of the `image` crate.
#[cfg(feature = "image_pipeline")]
pub mod image_pipeline {
    use image::{ImageBuffer, Luma, LumaA, Rgba};
    use super::PixelSource;
    use crate::distance_field::DistanceImage;

    /// The buffer layout `DynamicImage::to_rgba16` produces.
    pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

    /// A 16-bit grayscale raster, ready for png encoding.
    pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

    impl<C> PixelSource for ImageBuffer<Rgba<u16>, C>
        where C: std::ops::Deref<Target = [u16]>
    {
        fn width(&self) -> u32 {
            ImageBuffer::width(self)
        }

        fn height(&self) -> u32 {
            ImageBuffer::height(self)
        }

        fn rgba(&self, x: u32, y: u32) -> [u16; 4] {
            self.get_pixel(x, y).0
        }
    }

    /// Pack a rendered field into a 16-bit grayscale image.
    pub fn to_gray16(field: &DistanceImage) -> Gray16Image {
        ImageBuffer::from_fn(field.width(), field.height(), |x, y| {
            Luma([field.get(x, y)])
        })
    }

    /// Move a grayscale field into the alpha channel of an
    /// opaque-white image, for engines that sample the field
    /// from alpha instead of luminance.
    pub fn gray16_to_alpha(image: &Gray16Image) -> ImageBuffer<LumaA<u16>, Vec<u16>> {
        ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            let Luma([value]) = *image.get_pixel(x, y);
            LumaA([u16::MAX, value])
        })
    }
}
