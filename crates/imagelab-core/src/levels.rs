//! Three-point levels adjustment.
//!
//! Black, mid and white anchors define two linear segments: `[black, mid]`
//! maps onto `[0, 128]` and `[mid, white]` maps onto `[128, 255]`. Values
//! below black clip to 0 and values above white clip to 255. The mapping
//! depends only on the input value, so it is precomputed into a 256-entry
//! lookup table and applied to every channel independently.

use tracing::{debug, instrument};

use crate::error::{ensure_range, EngineError, Result};
use crate::grid::{clamp_channel, PixelGrid};

/// Output value the mid anchor maps to.
const MID_OUTPUT: i32 = 128;

/// Validated black/mid/white anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    black: i32,
    mid: i32,
    white: i32,
}

impl Levels {
    /// Validate the anchors.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidRange` if any anchor is outside [0, 255],
    /// or `EngineError::InvalidLevelOrder` unless `black <= mid <= white`.
    pub fn new(black: i32, mid: i32, white: i32) -> Result<Self> {
        ensure_range("black", black as i64, 0, 255)?;
        ensure_range("mid", mid as i64, 0, 255)?;
        ensure_range("white", white as i64, 0, 255)?;
        if black > mid || mid > white {
            return Err(EngineError::InvalidLevelOrder { black, mid, white });
        }
        Ok(Self { black, mid, white })
    }

    /// Map a single channel value.
    pub fn map(&self, value: u8) -> u8 {
        let v = value as i32;
        if v < self.black {
            return 0;
        }
        if v > self.white {
            return 255;
        }
        let mapped = if v <= self.mid {
            if self.mid == self.black {
                0
            } else {
                (v - self.black) * MID_OUTPUT / (self.mid - self.black)
            }
        } else {
            // v > mid implies white > mid here
            MID_OUTPUT + (v - self.mid) * (255 - MID_OUTPUT) / (self.white - self.mid)
        };
        clamp_channel(mapped)
    }
}

/// Pre-computed 256-entry lookup table for a levels adjustment.
#[derive(Debug, Clone)]
pub struct LevelsLut {
    /// LUT values: lut[input] = output
    pub lut: [u8; 256],
}

impl LevelsLut {
    /// Generate the LUT for `levels`.
    pub fn from_levels(levels: &Levels) -> Self {
        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            *lut_value = levels.map(i as u8);
        }
        Self { lut }
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.lut.iter().enumerate().all(|(i, &v)| v == i as u8)
    }

    /// Apply the LUT to every channel of `grid`.
    pub fn apply(&self, grid: &PixelGrid) -> PixelGrid {
        if self.is_identity() {
            return grid.clone();
        }
        grid.map_pixels(|[r, g, b]| {
            [
                self.lut[r as usize],
                self.lut[g as usize],
                self.lut[b as usize],
            ]
        })
    }
}

/// Remap tones with black/mid/white anchors.
///
/// # Errors
///
/// See [`Levels::new`]. Validation happens before any pixel is read.
#[instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn adjust_levels(grid: &PixelGrid, black: i32, mid: i32, white: i32) -> Result<PixelGrid> {
    let levels = Levels::new(black, mid, white)?;
    let lut = LevelsLut::from_levels(&levels);
    debug!(identity = lut.is_identity(), "Levels LUT built");
    Ok(lut.apply(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_anchor_values() {
        let levels = Levels::new(10, 128, 245).unwrap();
        assert_eq!(levels.map(10), 0);
        assert_eq!(levels.map(128), 128);
        assert_eq!(levels.map(245), 255);
        assert_eq!(levels.map(0), 0);
        assert_eq!(levels.map(250), 255);
    }

    #[test]
    fn test_segment_interpolation() {
        let levels = Levels::new(0, 100, 200).unwrap();
        // 50 * 128 / 100 = 64
        assert_eq!(levels.map(50), 64);
        // 128 + 50 * 127 / 100 = 191.5 truncated
        assert_eq!(levels.map(150), 191);
    }

    #[test]
    fn test_default_anchors_identity_below_mid() {
        let lut = LevelsLut::from_levels(&Levels::new(0, 128, 255).unwrap());
        assert!(lut.is_identity());
    }

    #[test]
    fn test_degenerate_lower_segment() {
        let levels = Levels::new(50, 50, 200).unwrap();
        assert_eq!(levels.map(49), 0);
        assert_eq!(levels.map(50), 0);
        assert_eq!(levels.map(51), 128);
    }

    #[test]
    fn test_degenerate_all_equal() {
        let levels = Levels::new(90, 90, 90).unwrap();
        assert_eq!(levels.map(89), 0);
        assert_eq!(levels.map(90), 0);
        assert_eq!(levels.map(91), 255);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            Levels::new(-1, 128, 255),
            Err(EngineError::InvalidRange { name: "black", .. })
        ));
        assert!(matches!(
            Levels::new(0, 300, 255),
            Err(EngineError::InvalidRange { name: "mid", .. })
        ));
        assert!(matches!(
            Levels::new(0, 128, 256),
            Err(EngineError::InvalidRange { name: "white", .. })
        ));
    }

    #[test]
    fn test_invalid_order() {
        assert!(matches!(
            Levels::new(130, 128, 255),
            Err(EngineError::InvalidLevelOrder { .. })
        ));
        assert!(matches!(
            Levels::new(0, 200, 100),
            Err(EngineError::InvalidLevelOrder { .. })
        ));
    }

    #[test]
    fn test_adjust_levels_image() {
        let grid = PixelGrid::from_raw(2, 1, vec![10, 128, 245, 5, 250, 60]).unwrap();
        let out = adjust_levels(&grid, 10, 128, 245).unwrap();
        assert_eq!(out.pixel(0, 0), [0, 128, 255]);
        // (60 - 10) * 128 / 118 = 54.2
        assert_eq!(out.pixel(1, 0), [0, 255, 54]);
    }

    #[test]
    fn test_adjust_levels_rejects_before_work() {
        let grid = PixelGrid::filled(3, 3, [1, 2, 3]);
        assert!(adjust_levels(&grid, 200, 100, 50).is_err());
    }

    fn ordered_levels() -> impl Strategy<Value = (i32, i32, i32)> {
        (0i32..=253)
            .prop_flat_map(|b| (Just(b), (b + 1)..=254))
            .prop_flat_map(|(b, m)| (Just(b), Just(m), (m + 1)..=255))
    }

    proptest! {
        /// Property: black maps to 0, mid to 128, white to 255.
        #[test]
        fn prop_anchor_mapping((black, mid, white) in ordered_levels()) {
            let levels = Levels::new(black, mid, white).unwrap();
            prop_assert_eq!(levels.map(black as u8), 0);
            prop_assert!((levels.map(mid as u8) as i32 - 128).abs() <= 1);
            prop_assert_eq!(levels.map(white as u8), 255);
        }

        /// Property: the mapping never decreases.
        #[test]
        fn prop_monotonic((black, mid, white) in ordered_levels()) {
            let lut = LevelsLut::from_levels(&Levels::new(black, mid, white).unwrap());
            for i in 1..256 {
                prop_assert!(lut.lut[i] >= lut.lut[i - 1]);
            }
        }
    }
}
