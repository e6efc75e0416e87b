//! Output types for the quantization pipeline.
//!
//! [`QuantizedImage`] holds the recolored RGBA buffer together with the
//! per-pixel band assignment, so callers can inspect which palette entry
//! each pixel landed on without decoding an encoded file.

mod quantized_image;

pub use quantized_image::QuantizedImage;
