
use crate::pixel::{ChannelSelector, PixelSource};


/// A dense boolean raster marking which pixels are inside the shape.
/// Reads outside `[0, width) x [0, height)` always yield `false` and
/// writes outside are ignored, so the window search and the rasterizer
/// need no special cases near the borders.
#[derive(Clone, PartialEq, Debug)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-outside grid of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        OccupancyGrid {
            width, height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Threshold a pixel source into a grid of the same dimensions.
    /// The threshold in `[0, 1]` is converted once into the `u16`
    /// channel range; a pixel is occupied when any selected channel
    /// meets the converted value (inclusive comparison).
    pub fn from_source(source: &impl PixelSource, channels: ChannelSelector, threshold: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&threshold), "threshold outside [0, 1]");
        let cutoff = (threshold * f32::from(u16::MAX)).round() as u16;

        let mut grid = OccupancyGrid::new(source.width(), source.height());
        for y in 0..source.height() {
            for x in 0..source.width() {
                if channels.meets_threshold(source.rgba(x, y), cutoff) {
                    grid.set(x as i32, y as i32, true);
                }
            }
        }

        grid
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// The stored value, or `false` for out-of-range coordinates.
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> bool {
        if self.contains(x, y) {
            self.cells[self.width as usize * y as usize + x as usize]
        }
        else {
            false
        }
    }

    /// Store a value. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if self.contains(x, y) {
            self.cells[self.width as usize * y as usize + x as usize] = value;
        }
    }

    /// Copy the minimal bounding box enclosing all occupied cells
    /// into a new grid with the box minimum as its origin.
    /// A grid without any occupied cell crops to an empty 0x0 grid.
    pub fn crop(&self) -> OccupancyGrid {
        let (min_x, min_y, max_x, max_y) = match self.occupied_bounds() {
            Some(bounds) => bounds,
            None => return OccupancyGrid::new(0, 0),
        };

        let mut cropped = OccupancyGrid::new(max_x - min_x + 1, max_y - min_y + 1);
        for y in 0..cropped.height {
            for x in 0..cropped.width {
                let value = self.at((min_x + x) as i32, (min_y + y) as i32);
                cropped.set(x as i32, y as i32, value);
            }
        }

        cropped
    }

    /// Inclusive `(min_x, min_y, max_x, max_y)` over all occupied
    /// cells, or `None` when the grid is entirely outside.
    fn occupied_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[self.width as usize * y as usize + x as usize] {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((min_x, min_y, max_x, max_y)) =>
                            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
                    });
                }
            }
        }

        bounds
    }
}
