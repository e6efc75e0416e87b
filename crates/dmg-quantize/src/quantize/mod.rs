//! Luminance banding over RGBA buffers.

use std::fmt;

use crate::output::QuantizedImage;
use crate::palette::Palette;

/// Number of luminance bands, and therefore palette entries.
pub const BAND_COUNT: usize = 4;

/// Width of one luminance band on the 0..=255 scale.
const BAND_WIDTH: f64 = 64.0;

/// BT.709 relative luminance on raw 0..=255 channel values.
///
/// No gamma decoding is applied.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64
}

/// Band index for a color: `clamp(floor(L / 64), 0, 3)`.
///
/// Bands are closed on the low end, so `L == 64` lands in band 1.
///
/// ```
/// use dmg_quantize::band_index;
///
/// assert_eq!(band_index(63, 63, 63), 0);
/// assert_eq!(band_index(64, 64, 64), 1);
/// assert_eq!(band_index(255, 255, 255), 3);
/// ```
#[inline]
pub fn band_index(r: u8, g: u8, b: u8) -> usize {
    let band = (luminance(r, g, b) / BAND_WIDTH).floor();
    (band.max(0.0) as usize).min(BAND_COUNT - 1)
}

/// Error returned when a pixel buffer does not match its declared size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// Buffer length is not `width * height * 4`
    BufferSize {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::BufferSize { expected, actual } => write!(
                f,
                "RGBA buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for QuantizeError {}

/// Recolor an RGBA8 buffer onto `palette`.
///
/// Pixels with alpha 0 are copied unchanged and report no band. Every
/// other pixel takes the RGB of its band's palette entry and keeps its
/// alpha.
///
/// # Errors
///
/// Returns [`QuantizeError::BufferSize`] if `rgba.len() != width * height * 4`.
pub fn quantize_rgba(
    rgba: &[u8],
    width: u32,
    height: u32,
    palette: &Palette,
) -> Result<QuantizedImage, QuantizeError> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(QuantizeError::BufferSize {
            expected,
            actual: rgba.len(),
        });
    }

    let mut out = rgba.to_vec();
    let mut bands = Vec::with_capacity(expected / 4);

    for px in out.chunks_exact_mut(4) {
        if px[3] == 0 {
            bands.push(None);
            continue;
        }
        let idx = band_index(px[0], px[1], px[2]);
        let [r, g, b] = palette.entry(idx).to_bytes();
        px[0] = r;
        px[1] = g;
        px[2] = b;
        bands.push(Some(idx as u8));
    }

    Ok(QuantizedImage::new(out, bands, width, height, *palette))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteMode;

    fn gray_px(v: u8, a: u8) -> [u8; 4] {
        [v, v, v, a]
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(band_index(0, 0, 0), 0);
        assert_eq!(band_index(63, 63, 63), 0);
        assert_eq!(band_index(64, 64, 64), 1);
        assert_eq!(band_index(127, 127, 127), 1);
        assert_eq!(band_index(128, 128, 128), 2);
        assert_eq!(band_index(191, 191, 191), 2);
        assert_eq!(band_index(192, 192, 192), 3);
        assert_eq!(band_index(255, 255, 255), 3);
    }

    #[test]
    fn test_gray_ramp_is_monotonic() {
        let mut last = 0;
        for v in 0..=255u8 {
            let idx = band_index(v, v, v);
            assert!(idx >= last, "band went backwards at {v}");
            assert!(idx < BAND_COUNT);
            last = idx;
        }
    }

    #[test]
    fn test_green_dominates_luminance() {
        // Pure green is bright, pure blue is dark
        assert_eq!(band_index(0, 255, 0), 2);
        assert_eq!(band_index(0, 0, 255), 0);
        assert_eq!(band_index(255, 0, 0), 0);
    }

    #[test]
    fn test_transparent_pixels_untouched() {
        let palette = PaletteMode::Dmg.palette();
        let mut rgba = Vec::new();
        rgba.extend_from_slice(&[200, 10, 77, 0]);
        rgba.extend_from_slice(&gray_px(255, 255));
        let image = quantize_rgba(&rgba, 2, 1, &palette).unwrap();

        assert_eq!(&image.rgba()[0..4], &[200, 10, 77, 0]);
        assert_eq!(image.bands()[0], None);
        assert_eq!(image.bands()[1], Some(3));
    }

    #[test]
    fn test_partial_alpha_recolored_alpha_kept() {
        let palette = PaletteMode::Gray.palette();
        let rgba = gray_px(100, 7);
        let image = quantize_rgba(&rgba, 1, 1, &palette).unwrap();
        assert_eq!(image.rgba(), &[85, 85, 85, 7]);
    }

    #[test]
    fn test_opaque_output_only_palette_colors() {
        let palette = PaletteMode::Dmg.palette();
        let rgba: Vec<u8> = (0..=255u8)
            .flat_map(|v| [v, v.wrapping_mul(3), 255 - v, 255])
            .collect();
        let image = quantize_rgba(&rgba, 16, 16, &palette).unwrap();

        for px in image.rgba().chunks_exact(4) {
            assert!(
                palette.index_of([px[0], px[1], px[2]]).is_some(),
                "pixel {px:?} not in palette"
            );
        }
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let palette = PaletteMode::Dmg.palette();
        let err = quantize_rgba(&[0, 0, 0], 1, 1, &palette).unwrap_err();
        assert_eq!(
            err,
            QuantizeError::BufferSize {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(err.to_string(), "RGBA buffer has 3 bytes, expected 4");
    }

    #[test]
    fn test_empty_image() {
        let palette = PaletteMode::Gray.palette();
        let image = quantize_rgba(&[], 0, 0, &palette).unwrap();
        assert!(image.rgba().is_empty());
        assert!(image.bands().is_empty());
    }
}
