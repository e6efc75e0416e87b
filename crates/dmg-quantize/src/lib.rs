#![allow(clippy::module_inception)]

//! dmg-quantize: four-band luminance quantization for retro handheld palettes
//!
//! This library maps RGBA pixel buffers onto one of two fixed four-color
//! palettes: the green tones of the original handheld LCD, or a plain
//! grayscale ramp.
//!
//! # Quick Start
//!
//! ```
//! use dmg_quantize::{quantize_rgba, PaletteMode};
//!
//! let palette = PaletteMode::Dmg.palette();
//!
//! // One opaque mid-gray pixel, one fully transparent pixel
//! let pixels = vec![128, 128, 128, 255, 10, 20, 30, 0];
//! let image = quantize_rgba(&pixels, 2, 1, &palette).unwrap();
//!
//! assert_eq!(image.bands(), &[Some(2), None]);
//! assert_eq!(&image.rgba()[4..8], &[10, 20, 30, 0]);
//! ```
//!
//! # Banding
//!
//! Each visible pixel is reduced to its relative luminance using the
//! ITU-R BT.709 weights on raw 0..=255 channel values:
//!
//! ```text
//! L = 0.2126 * R + 0.7152 * G + 0.0722 * B
//! band = clamp(floor(L / 64), 0, 3)
//! ```
//!
//! | Band | Luminance range | Meaning   |
//! |------|-----------------|-----------|
//! | 0    | `[0, 64)`       | darkest   |
//! | 1    | `[64, 128)`     |           |
//! | 2    | `[128, 192)`    |           |
//! | 3    | `[192, 255]`    | brightest |
//!
//! There is no gamma decoding and no error diffusion: the mapping is a pure
//! per-pixel threshold, so the same input always yields the same bands.
//!
//! # Transparency
//!
//! Pixels with alpha 0 are copied through bit-for-bit (including their RGB
//! channels). Pixels with any other alpha are recolored but keep their
//! original alpha.

pub mod output;
pub mod palette;
pub mod quantize;

pub use output::QuantizedImage;
pub use palette::{Palette, PaletteEntry, PaletteMode, ParseModeError};
pub use quantize::{band_index, luminance, quantize_rgba, QuantizeError, BAND_COUNT};
