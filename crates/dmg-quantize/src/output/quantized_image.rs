//! QuantizedImage struct returned by [`quantize_rgba`](crate::quantize_rgba).

use crate::palette::Palette;

/// The output of the quantizer.
///
/// Stores the recolored RGBA8 buffer in row-major order, one optional band
/// index per pixel (`None` where the pixel was fully transparent and left
/// untouched), the image dimensions, and the palette that was applied.
///
/// # Example
///
/// ```
/// use dmg_quantize::{quantize_rgba, Palette};
///
/// let image = quantize_rgba(&[255, 255, 255, 255], 1, 1, &Palette::GRAY).unwrap();
/// assert_eq!(image.width(), 1);
/// assert_eq!(image.height(), 1);
/// assert_eq!(image.band_histogram(), [0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedImage {
    rgba: Vec<u8>,
    bands: Vec<Option<u8>>,
    width: u32,
    height: u32,
    palette: Palette,
}

impl QuantizedImage {
    /// Create a new `QuantizedImage`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that both buffers match `width * height`.
    pub fn new(
        rgba: Vec<u8>,
        bands: Vec<Option<u8>>,
        width: u32,
        height: u32,
        palette: Palette,
    ) -> Self {
        let pixels = width as usize * height as usize;
        debug_assert_eq!(rgba.len(), pixels * 4, "rgba length must be width * height * 4");
        debug_assert_eq!(bands.len(), pixels, "bands length must be width * height");
        Self {
            rgba,
            bands,
            width,
            height,
            palette,
        }
    }

    /// Recolored RGBA8 bytes.
    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Band index per pixel; `None` for untouched transparent pixels.
    #[inline]
    pub fn bands(&self) -> &[Option<u8>] {
        &self.bands
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The palette that was applied.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Count of recolored pixels per band.
    pub fn band_histogram(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for idx in self.bands.iter().flatten() {
            counts[*idx as usize] += 1;
        }
        counts
    }

    /// Consume the image, returning the RGBA buffer.
    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}
