//! Spectrogram bar rendering.
//!
//! Magnitudes arrive through the [`platform::SpectrumSink`] seam and are
//! rescaled immediately into pixel rows; only the bar tops are stored.
//! Pixel rows count from the top of the view down, so the mapping is
//! inverted: a zero magnitude maps to the bottom row, a full-scale one to
//! row zero.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use platform::SpectrumSink;

/// Pixel gap between neighbouring bars.
const BAR_GAP: u32 = 2;

/// Saturating linear remap of `x` from `[in_min, in_max]` onto
/// `[out_min, out_max]`.
///
/// The output range may be inverted (`out_min > out_max`), which is how
/// the spectrogram turns magnitudes into top-down pixel rows. Inputs
/// outside the range clamp to the corresponding end.
// Safety: all operands are widened to i64; inputs are u32, so neither the
// product nor the sum can overflow, and the result lies between out_min
// and out_max by construction.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn map_range_u(x: u32, in_min: u32, in_max: u32, out_min: u32, out_max: u32) -> u32 {
    if x > in_max {
        return out_max;
    }
    if x < in_min {
        return out_min;
    }
    let in_range = i64::from(in_max) - i64::from(in_min);
    if in_range == 0 {
        return out_min;
    }
    let out_range = i64::from(out_max) - i64::from(out_min);
    let mapped = (i64::from(x) - i64::from(in_min)) * out_range / in_range + i64::from(out_min);
    mapped as u32
}

/// Bar-graph spectrum view for a monochrome display.
///
/// `BARS` must match the analyzer's bin count. The view only stores the
/// current bar tops; [`draw`](Self::draw) renders them into any
/// `DrawTarget<Color = BinaryColor>` whenever the task owning the screen
/// gets around to it.
pub struct SpectrogramView<const BARS: usize> {
    /// Top pixel row of each bar, relative to the view origin.
    tops: [u32; BARS],
    area: Rectangle,
    dirty: bool,
}

impl<const BARS: usize> SpectrogramView<BARS> {
    /// A view rendering into `area`. Starts with all bars empty.
    pub fn new(area: Rectangle) -> Self {
        Self {
            tops: [area.size.height; BARS],
            area,
            dirty: true,
        }
    }

    /// `true` when an update arrived since the last [`draw`](Self::draw).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current bar tops in pixel rows (test hook).
    pub fn tops(&self) -> &[u32; BARS] {
        &self.tops
    }

    /// Render all bars and clear the dirty flag.
    // Safety: pixel arithmetic is bounded by the view area dimensions.
    #[allow(
        clippy::arithmetic_side_effects,
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation
    )]
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let height = self.area.size.height;
        let bars = BARS as u32;
        let bar_width = self
            .area
            .size
            .width
            .saturating_sub(bars * BAR_GAP)
            .checked_div(bars)
            .unwrap_or(0);
        let stride = bar_width + BAR_GAP;

        for (i, &top) in self.tops.iter().enumerate() {
            let x = self.area.top_left.x + (i as u32 * stride) as i32;
            // Everything above the bar top is cleared, the rest is lit, so
            // no stale pixels survive a shrinking bar.
            Rectangle::new(
                Point::new(x, self.area.top_left.y),
                Size::new(bar_width, top),
            )
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(target)?;
            Rectangle::new(
                Point::new(x, self.area.top_left.y + top as i32),
                Size::new(bar_width, height.saturating_sub(top)),
            )
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target)?;
        }
        self.dirty = false;
        Ok(())
    }
}

impl<const BARS: usize> SpectrumSink for SpectrogramView<BARS> {
    type Error = Infallible;

    fn set_spectrogram(&mut self, bins: &[u32], max_value: u32) -> Result<(), Self::Error> {
        let height = self.area.size.height;
        for (top, &bin) in self.tops.iter_mut().zip(bins) {
            *top = map_range_u(bin, 0, max_value, height, 0);
        }
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    #[test]
    fn map_is_inverted_and_saturating() {
        assert_eq!(map_range_u(0, 0, 100, 64, 0), 64);
        assert_eq!(map_range_u(100, 0, 100, 64, 0), 0);
        assert_eq!(map_range_u(50, 0, 100, 64, 0), 32);
        // Clamps past either end.
        assert_eq!(map_range_u(1000, 0, 100, 64, 0), 0);
    }

    #[test]
    fn map_handles_degenerate_input_range() {
        assert_eq!(map_range_u(5, 5, 5, 64, 0), 64);
    }

    #[test]
    fn magnitudes_become_top_down_rows() {
        let area = Rectangle::new(Point::zero(), Size::new(16, 64));
        let mut view = SpectrogramView::<4>::new(area);
        view.set_spectrogram(&[0, 25, 50, 100], 100).unwrap();
        assert_eq!(view.tops(), &[64, 48, 32, 0]);
        assert!(view.is_dirty());
    }

    #[test]
    fn draw_fills_below_and_clears_above() {
        let area = Rectangle::new(Point::zero(), Size::new(4, 4));
        let mut view = SpectrogramView::<1>::new(area);
        view.set_spectrogram(&[50], 100).unwrap();

        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        view.draw(&mut display).unwrap();
        assert!(!view.is_dirty());

        // Top half clear, bottom half lit (bar width 2, gap 2).
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(BinaryColor::Off));
        assert_eq!(display.get_pixel(Point::new(0, 3)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(1, 2)), Some(BinaryColor::On));
        // The gap column is never touched.
        assert_eq!(display.get_pixel(Point::new(3, 3)), None);
    }

    #[test]
    fn empty_spectrum_draws_no_lit_pixels() {
        let area = Rectangle::new(Point::zero(), Size::new(8, 8));
        let mut view = SpectrogramView::<2>::new(area);
        view.set_spectrogram(&[0, 0], 100).unwrap();

        let mut display: MockDisplay<BinaryColor> = MockDisplay::new();
        display.set_allow_overdraw(true);
        view.draw(&mut display).unwrap();
        for x in 0..8 {
            for y in 0..8 {
                assert_ne!(
                    display.get_pixel(Point::new(x, y)),
                    Some(BinaryColor::On),
                    "lit pixel at {x},{y}"
                );
            }
        }
    }
}
