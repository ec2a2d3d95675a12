
use crate::occupancy::OccupancyGrid;
use crate::pixel::PixelSink;

#[cfg(feature = "rayon")]
use rayon::prelude::*;


/// The rendered field: a single-channel raster of fixed-point
/// values. Half the range encodes a signed distance of zero,
/// the extremes encode full positive and negative saturation.
#[derive(Clone, PartialEq, Debug)]
pub struct DistanceImage {
    width: u32,
    height: u32,
    values: Vec<u16>,
}

impl DistanceImage {
    /// A zeroed image of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        DistanceImage {
            width, height,
            values: vec![0; width as usize * height as usize],
        }
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
    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.values[self.flatten_index(x, y)]
    }

    /// The row-major value buffer.
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn into_values(self) -> Vec<u16> {
        self.values
    }

    #[inline]
    fn flatten_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "Coordinates outside the image");
        self.width as usize * y as usize + x as usize
    }
}

impl PixelSink for DistanceImage {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32, value: u16) {
        let index = self.flatten_index(x, y);
        self.values[index] = value;
    }
}


/// The signed distance from one grid cell to the nearest cell with
/// the opposite occupancy, searched in the inclusive square window
/// of radius `floor(spread)` around the center.
///
/// The magnitude is clamped to `spread` and saturates at
/// `min(floor(spread), spread)` when the window holds no boundary.
/// Occupied centers yield positive distances, empty centers negative
/// ones. The center may lie outside the grid, it then reads as empty
/// like any other out-of-range cell.
pub fn signed_distance(grid: &OccupancyGrid, center_x: i32, center_y: i32, spread: f32) -> f32 {
    let center = grid.at(center_x, center_y);
    let delta = spread.floor() as i32;
    let mut closest_sq = delta * delta;

    for dy in -delta ..= delta {
        for dx in -delta ..= delta {
            if grid.at(center_x + dx, center_y + dy) != center {
                let distance_sq = dx * dx + dy * dy;
                if distance_sq < closest_sq {
                    closest_sq = distance_sq;
                }
            }
        }
    }

    let magnitude = (closest_sq as f32).sqrt().min(spread);
    if center { magnitude } else { -magnitude }
}

/// Output dimensions for rendering a grid: the downscaled grid size
/// plus a padding of `floor(spread)` on every side, so that windows
/// anchored at the output border still reach into the grid.
pub fn output_size(grid: &OccupancyGrid, downscale: u32, spread: f32) -> (u32, u32) {
    let delta = spread.floor() as u32;
    (
        grid.width() / downscale + 2 * delta,
        grid.height() / downscale + 2 * delta,
    )
}

/// Render the whole field into a new image, one signed distance
/// per output pixel. Pixels are independent of each other; with the
/// `rayon` feature the output rows are computed in parallel.
pub fn render(grid: &OccupancyGrid, downscale: u32, spread: f32) -> DistanceImage {
    assert!(spread > 0.0, "spread must be greater than zero");
    assert!(downscale >= 1, "downscale must be at least one");

    let (width, height) = output_size(grid, downscale, spread);
    let delta = spread.floor() as i32;

    DistanceImage {
        width, height,
        values: compute_values(grid, width, height, delta, downscale, spread),
    }
}

/// Render the whole field into a caller-owned sink whose dimensions
/// must match `output_size`. Every coordinate is written exactly once.
pub fn render_into(grid: &OccupancyGrid, downscale: u32, spread: f32, sink: &mut impl PixelSink) {
    assert!(spread > 0.0, "spread must be greater than zero");
    assert!(downscale >= 1, "downscale must be at least one");

    let (width, height) = output_size(grid, downscale, spread);
    debug_assert_eq!((sink.width(), sink.height()), (width, height), "Sink dimension mismatch");

    let delta = spread.floor() as i32;
    for y in 0..height {
        for (x, value) in field_row(grid, width, delta, downscale, spread, y).enumerate() {
            sink.set(x as u32, y, value);
        }
    }
}

/// One output row of encoded field values.
fn field_row(
    grid: &OccupancyGrid, width: u32,
    delta: i32, downscale: u32, spread: f32, out_y: u32,
) -> impl Iterator<Item = u16> + '_ {
    let center_y = source_center(out_y, delta, downscale);

    (0..width).map(move |out_x| {
        let center_x = source_center(out_x, delta, downscale);
        encode(signed_distance(grid, center_x, center_y, spread), spread)
    })
}

#[cfg(feature = "rayon")]
fn compute_values(
    grid: &OccupancyGrid, width: u32, height: u32,
    delta: i32, downscale: u32, spread: f32,
) -> Vec<u16> {
    (0..height)
        .into_par_iter()
        .flat_map_iter(|y| field_row(grid, width, delta, downscale, spread, y))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn compute_values(
    grid: &OccupancyGrid, width: u32, height: u32,
    delta: i32, downscale: u32, spread: f32,
) -> Vec<u16> {
    (0..height)
        .flat_map(|y| field_row(grid, width, delta, downscale, spread, y))
        .collect()
}

/// Map an output coordinate back onto the source grid: undo the
/// padding, scale up, and aim at the center of the downscale block.
#[inline]
fn source_center(out: u32, delta: i32, downscale: u32) -> i32 {
    (out as i32 - delta) * downscale as i32 + downscale as i32 / 2
}

/// Encode a signed distance as a fixed-point channel value, with
/// `-spread` at the bottom of the range, zero in the middle and
/// `+spread` at the top.
#[inline]
fn encode(signed_distance: f32, spread: f32) -> u16 {
    let value = 0.5 + 0.5 * (signed_distance / spread);
    (value.max(0.0).min(1.0) * f32::from(u16::MAX)) as u16
}


#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_grid(width: u32, height: u32, value: bool) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                grid.set(x, y, value);
            }
        }
        grid
    }

    // left half occupied, boundary between x = split-1 and x = split
    fn split_grid(width: u32, height: u32, split: i32) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(width, height);
        for y in 0..height as i32 {
            for x in 0..split {
                grid.set(x, y, true);
            }
        }
        grid
    }

    #[test]
    fn saturates_without_a_boundary_in_the_window() {
        let inside = uniform_grid(9, 9, true);
        assert_eq!(signed_distance(&inside, 4, 4, 3.0), 3.0);
        assert_eq!(signed_distance(&inside, 4, 4, 3.7), 3.0);

        let outside = uniform_grid(9, 9, false);
        assert_eq!(signed_distance(&outside, 4, 4, 3.0), -3.0);
    }

    #[test]
    fn sign_follows_the_center_cell() {
        let mut dot = OccupancyGrid::new(9, 9);
        dot.set(4, 4, true);
        assert_eq!(signed_distance(&dot, 4, 4, 3.0), 1.0);

        let mut hole = uniform_grid(9, 9, true);
        hole.set(4, 4, false);
        assert_eq!(signed_distance(&hole, 4, 4, 3.0), -1.0);
    }

    #[test]
    fn magnitude_shrinks_towards_the_boundary() {
        let grid = split_grid(16, 8, 8);

        assert_eq!(signed_distance(&grid, 3, 3, 4.0), 4.0);
        assert_eq!(signed_distance(&grid, 5, 3, 4.0), 3.0);
        assert_eq!(signed_distance(&grid, 6, 3, 4.0), 2.0);
        assert_eq!(signed_distance(&grid, 7, 3, 4.0), 1.0);
        assert_eq!(signed_distance(&grid, 8, 3, 4.0), -1.0);
        assert_eq!(signed_distance(&grid, 9, 3, 4.0), -2.0);

        // start past the left grid border, which counts as a boundary too
        let mut previous = f32::INFINITY;
        for x in 4..8 {
            let magnitude = signed_distance(&grid, x, 3, 4.0).abs();
            assert!(magnitude <= previous, "magnitude grew while approaching the boundary");
            previous = magnitude;
        }
    }

    #[test]
    fn window_corners_beyond_the_seed_are_not_closer() {
        // the only differing cell sits at squared distance 2 * 3²,
        // which never undercuts the seeded 3², so the result saturates
        let mut grid = uniform_grid(9, 9, true);
        grid.set(7, 7, false);

        assert_eq!(signed_distance(&grid, 4, 4, 3.0), 3.0);
    }

    #[test]
    fn grid_border_counts_as_outside() {
        let grid = uniform_grid(4, 4, true);
        // nearest out-of-range cell is one step to the left
        assert_eq!(signed_distance(&grid, 0, 2, 3.0), 1.0);
        // center outside the grid, nearest occupied cell one step right
        assert_eq!(signed_distance(&grid, -1, 2, 3.0), -1.0);
    }

    #[test]
    fn encoding_covers_the_full_output_range() {
        assert_eq!(encode(4.0, 4.0), u16::MAX);
        assert_eq!(encode(-4.0, 4.0), 0);
        assert_eq!(encode(0.0, 4.0), 32767);

        // clamped, not wrapped
        assert_eq!(encode(100.0, 4.0), u16::MAX);
        assert_eq!(encode(-100.0, 4.0), 0);
    }

    #[test]
    fn output_is_padded_by_the_integer_spread() {
        let grid = OccupancyGrid::new(10, 7);
        assert_eq!(output_size(&grid, 1, 4.0), (18, 15));
        assert_eq!(output_size(&grid, 2, 2.5), (9, 7));
    }

    #[test]
    fn render_matches_the_sampler_at_every_pixel() {
        let grid = split_grid(6, 4, 3);
        let downscale = 1;
        let spread = 2.0;

        let field = render(&grid, downscale, spread);
        assert_eq!((field.width(), field.height()), output_size(&grid, downscale, spread));

        let delta = spread.floor() as i32;
        for y in 0..field.height() {
            for x in 0..field.width() {
                let center_x = (x as i32 - delta) * downscale as i32 + downscale as i32 / 2;
                let center_y = (y as i32 - delta) * downscale as i32 + downscale as i32 / 2;
                let expected = encode(signed_distance(&grid, center_x, center_y, spread), spread);
                assert_eq!(field.get(x, y), expected);
            }
        }
    }

    #[test]
    fn downscale_samples_the_block_centers() {
        let grid = split_grid(4, 4, 2);
        let field = render(&grid, 2, 1.0);
        assert_eq!((field.width(), field.height()), (4, 4));

        // output x = 1 maps to source x = 1 (occupied),
        // output x = 2 maps to source x = 3 (empty)
        assert!(field.get(1, 1) > 32767);
        assert!(field.get(2, 1) < 32767);
    }

    #[test]
    fn render_into_writes_every_sink_pixel_once() {
        struct CountingSink {
            width: u32,
            height: u32,
            writes: Vec<u32>,
            values: Vec<u16>,
        }

        impl PixelSink for CountingSink {
            fn width(&self) -> u32 { self.width }
            fn height(&self) -> u32 { self.height }

            fn set(&mut self, x: u32, y: u32, value: u16) {
                let index = self.width as usize * y as usize + x as usize;
                self.writes[index] += 1;
                self.values[index] = value;
            }
        }

        let grid = split_grid(5, 5, 2);
        let (width, height) = output_size(&grid, 1, 2.0);

        let mut sink = CountingSink {
            width, height,
            writes: vec![0; width as usize * height as usize],
            values: vec![0; width as usize * height as usize],
        };

        render_into(&grid, 1, 2.0, &mut sink);

        assert!(sink.writes.iter().all(|&count| count == 1));
        assert_eq!(sink.values, render(&grid, 1, 2.0).into_values());
    }

    #[test]
    fn sub_one_spread_renders_a_flat_midrange_field() {
        // floor(0.5) = 0: the window only holds the center itself,
        // every distance is zero and the field is uniformly mid-gray
        let grid = split_grid(4, 4, 2);
        let field = render(&grid, 1, 0.5);

        assert_eq!((field.width(), field.height()), (4, 4));
        assert!(field.values().iter().all(|&value| value == 32767));
    }
}
