//! Histogram computation, rendering and peak-based colour correction.
//!
//! This module provides functions for computing RGB histograms from a
//! [`PixelGrid`], drawing them as a line graph, and using their peaks to
//! neutralise a colour cast.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use tracing::{debug, instrument};

use crate::grid::{clamp_channel, Channel, PixelGrid};
use crate::Histogram;

/// Side length of a rendered histogram image.
pub const HISTOGRAM_SIZE: u32 = 256;

/// Spacing of the reference grid lines in a rendered histogram.
const GRID_SPACING: usize = 15;

/// Lowest intensity considered when looking for a colour-correction peak.
pub const PEAK_SCAN_MIN: usize = 10;

/// Highest intensity considered when looking for a colour-correction peak.
pub const PEAK_SCAN_MAX: usize = 245;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID_COLOR: Rgb<u8> = Rgb([192, 192, 192]);
const CHANNEL_COLORS: [Rgb<u8>; 3] = [Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255])];

/// Compute RGB histograms from a grid.
///
/// # Performance
/// This function uses a single-pass algorithm with O(n) time complexity
/// where n is the number of pixels. Memory usage is constant (3KB for bins).
pub fn compute_histogram(grid: &PixelGrid) -> Histogram {
    let mut hist = Histogram::new();

    for [r, g, b] in grid.iter_pixels() {
        hist.red[r as usize] += 1;
        hist.green[g as usize] += 1;
        hist.blue[b as usize] += 1;
    }

    hist
}

/// Render the histogram of `grid` as a 256x256 line graph.
///
/// The canvas is white with a light-grey reference grid every 15 pixels.
/// Counts are scaled so that the tallest bin across all three channels
/// reaches the top edge, then drawn as red, green and blue polylines in that
/// order. Points that land outside the canvas are clipped.
#[instrument(skip_all, fields(width = grid.width(), height = grid.height()))]
pub fn render_histogram(grid: &PixelGrid) -> PixelGrid {
    let hist = compute_histogram(grid);
    let size = HISTOGRAM_SIZE as usize;
    let bottom = HISTOGRAM_SIZE as f32;

    let mut canvas = RgbImage::from_pixel(HISTOGRAM_SIZE, HISTOGRAM_SIZE, BACKGROUND);

    for i in (0..=size).step_by(GRID_SPACING) {
        let y = (size - i) as f32;
        draw_line_segment_mut(&mut canvas, (0.0, y), (bottom, y), GRID_COLOR);
    }
    for x in (0..size).step_by(GRID_SPACING) {
        let x = x as f32;
        draw_line_segment_mut(&mut canvas, (x, 0.0), (x, bottom), GRID_COLOR);
    }

    let max = hist.max_value();
    if max == 0 {
        debug!("Empty histogram, drawing grid only");
        return PixelGrid::from_rgb_image(canvas);
    }

    for (channel, color) in Channel::ALL.into_iter().zip(CHANNEL_COLORS) {
        let heights = scale_bins(hist.channel(channel), max, HISTOGRAM_SIZE);
        for i in 0..size - 1 {
            let start = (i as f32, bottom - heights[i] as f32);
            let end = ((i + 1) as f32, bottom - heights[i + 1] as f32);
            draw_line_segment_mut(&mut canvas, start, end, color);
        }
    }

    debug!(max, "Histogram rendered");
    PixelGrid::from_rgb_image(canvas)
}

/// Scale bin counts so that `max` maps to `height`.
fn scale_bins(bins: &[u32; 256], max: u32, height: u32) -> [u32; 256] {
    let mut scaled = [0u32; 256];
    for (out, &count) in scaled.iter_mut().zip(bins.iter()) {
        *out = (count as u64 * height as u64 / max as u64) as u32;
    }
    scaled
}

/// Find the most populated intensity in `min..=max`.
///
/// Ties resolve to the lowest intensity, and a range with no pixels yields
/// `min`.
pub fn find_peak(bins: &[u32; 256], min: usize, max: usize) -> usize {
    let mut peak = min;
    for i in min..=max.min(255) {
        if bins[i] > bins[peak] {
            peak = i;
        }
    }
    peak
}

/// Align the histogram peaks of the three channels.
///
/// Each channel's peak is searched in [10, 245] so that clipped shadows and
/// highlights do not dominate. Every channel is then shifted by the distance
/// between its peak and the average peak.
#[instrument(skip_all, fields(width = grid.width(), height = grid.height()))]
pub fn correct_color(grid: &PixelGrid) -> PixelGrid {
    let hist = compute_histogram(grid);

    let peaks = Channel::ALL
        .map(|channel| find_peak(hist.channel(channel), PEAK_SCAN_MIN, PEAK_SCAN_MAX) as i32);
    let average = (peaks[0] + peaks[1] + peaks[2]) / 3;
    let offsets = peaks.map(|p| average - p);
    debug!(?peaks, average, "Colour correction peaks");

    grid.map_pixels(|[r, g, b]| {
        [
            clamp_channel(r as i32 + offsets[0]),
            clamp_channel(g as i32 + offsets[1]),
            clamp_channel(b as i32 + offsets[2]),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32, pixels: Vec<u8>) -> PixelGrid {
        PixelGrid::from_raw(width, height, pixels).unwrap()
    }

    #[test]
    fn test_empty_histogram() {
        let hist = compute_histogram(&PixelGrid::new(0, 0));
        assert_eq!(hist.max_value(), 0);
    }

    #[test]
    fn test_single_red_pixel() {
        let hist = compute_histogram(&grid(1, 1, vec![255, 0, 0]));
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.green[0], 1);
        assert_eq!(hist.blue[0], 1);
    }

    #[test]
    fn test_rgb_primary_colors() {
        let pixels = vec![
            255, 0, 0, // Red
            0, 255, 0, // Green
            0, 0, 255, // Blue
        ];
        let hist = compute_histogram(&grid(3, 1, pixels));
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.red[0], 2);
        assert_eq!(hist.green[255], 1);
        assert_eq!(hist.green[0], 2);
        assert_eq!(hist.blue[255], 1);
        assert_eq!(hist.blue[0], 2);
    }

    #[test]
    fn test_large_image() {
        // 100x100 image = 10,000 pixels
        let hist = compute_histogram(&PixelGrid::filled(100, 100, [128, 128, 128]));
        assert_eq!(hist.red[128], 10_000);
        assert_eq!(hist.green[128], 10_000);
        assert_eq!(hist.blue[128], 10_000);
        assert_eq!(hist.max_value(), 10_000);
    }

    #[test]
    fn test_gradient_image() {
        let gradient = PixelGrid::from_fn(256, 1, |x, _| [x as u8, x as u8, x as u8]);
        let hist = compute_histogram(&gradient);

        // Each bin should have exactly 1 pixel
        for i in 0..256 {
            assert_eq!(hist.red[i], 1);
            assert_eq!(hist.green[i], 1);
            assert_eq!(hist.blue[i], 1);
        }
        assert_eq!(hist.max_value(), 1);
    }

    #[test]
    fn test_find_peak_first_maximum_wins() {
        let mut bins = [0u32; 256];
        bins[50] = 7;
        bins[80] = 7;
        bins[5] = 100; // outside the scan range
        assert_eq!(find_peak(&bins, PEAK_SCAN_MIN, PEAK_SCAN_MAX), 50);
    }

    #[test]
    fn test_find_peak_empty_range() {
        let bins = [0u32; 256];
        assert_eq!(find_peak(&bins, PEAK_SCAN_MIN, PEAK_SCAN_MAX), PEAK_SCAN_MIN);
    }

    #[test]
    fn test_correct_color_aligns_peaks() {
        let cast = PixelGrid::from_fn(10, 10, |x, _| {
            if x < 8 {
                [100, 120, 140]
            } else {
                [30, 60, 200]
            }
        });
        let corrected = correct_color(&cast);
        let hist = compute_histogram(&corrected);

        assert_eq!(find_peak(&hist.red, PEAK_SCAN_MIN, PEAK_SCAN_MAX), 120);
        assert_eq!(find_peak(&hist.green, PEAK_SCAN_MIN, PEAK_SCAN_MAX), 120);
        assert_eq!(find_peak(&hist.blue, PEAK_SCAN_MIN, PEAK_SCAN_MAX), 120);
        assert_eq!(corrected.pixel(9, 0), [50, 60, 180]);
    }

    #[test]
    fn test_correct_color_clamps() {
        let cast = PixelGrid::from_fn(4, 1, |x, _| if x < 3 { [20, 20, 230] } else { [0, 0, 255] });
        // peaks 20, 20, 230 -> average 90, offsets +70, +70, -140
        let corrected = correct_color(&cast);
        assert_eq!(corrected.pixel(0, 0), [90, 90, 90]);
        assert_eq!(corrected.pixel(3, 0), [70, 70, 115]);
    }

    #[test]
    fn test_correct_color_neutral_image_unchanged() {
        let grey = PixelGrid::from_fn(16, 16, |x, y| {
            let v = (x * 8 + y * 4) as u8;
            [v, v, v]
        });
        assert_eq!(correct_color(&grey), grey);
    }

    #[test]
    fn test_render_dimensions() {
        let rendered = render_histogram(&PixelGrid::filled(8, 8, [40, 80, 120]));
        assert_eq!(rendered.dimensions(), (HISTOGRAM_SIZE, HISTOGRAM_SIZE));
    }

    #[test]
    fn test_render_background_and_grid() {
        let rendered = render_histogram(&PixelGrid::new(0, 0));
        assert_eq!(rendered.pixel(200, 100), [255, 255, 255]);
        // Vertical reference line
        assert_eq!(rendered.pixel(30, 100), [192, 192, 192]);
        // Horizontal reference line at 256 - 150
        assert_eq!(rendered.pixel(200, 106), [192, 192, 192]);
    }

    #[test]
    fn test_render_peak_reaches_top() {
        // Every channel has all pixels at 100, so bin 100 scales to full height
        let rendered = render_histogram(&PixelGrid::filled(4, 4, [100, 100, 100]));
        // Blue is drawn last and overwrites the other channels
        assert_eq!(rendered.pixel(100, 0), [0, 0, 255]);
        assert_eq!(rendered.pixel(200, 100), [255, 255, 255]);
    }

    #[test]
    fn test_render_draws_each_channel() {
        let rendered = render_histogram(&PixelGrid::filled(4, 4, [20, 120, 220]));
        assert_eq!(rendered.pixel(20, 0), [255, 0, 0]);
        assert_eq!(rendered.pixel(120, 0), [0, 255, 0]);
        assert_eq!(rendered.pixel(220, 0), [0, 0, 255]);
    }

    #[test]
    fn test_scale_bins() {
        let mut bins = [0u32; 256];
        bins[0] = 10;
        bins[1] = 5;
        bins[2] = 1;
        let scaled = scale_bins(&bins, 10, 256);
        assert_eq!(scaled[0], 256);
        assert_eq!(scaled[1], 128);
        assert_eq!(scaled[2], 25);
    }
}
