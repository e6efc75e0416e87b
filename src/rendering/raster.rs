//! Raster decode and encode around the quantizer.
//!
//! Input format is sniffed from the bytes (PNG, JPEG, WEBP); output is
//! always 8-bit RGBA PNG so transparent pixels survive bit-for-bit.

use std::io::Cursor;

use dmg_quantize::{quantize_rgba, Palette, QuantizedImage};

use crate::error::ConvertError;
use crate::models::ConvertedImage;

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaPixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode any supported raster format into RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaPixels, ConvertError> {
    let img = image::load_from_memory(bytes).map_err(|e| ConvertError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbaPixels {
        data: rgba.into_raw(),
        width,
        height,
    })
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Default);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Decode and quantize, stopping before encoding.
pub fn quantize_bytes(bytes: &[u8], palette: &Palette) -> Result<QuantizedImage, ConvertError> {
    let pixels = decode_rgba(bytes)?;
    quantize_rgba(&pixels.data, pixels.width, pixels.height, palette)
        .map_err(|e| ConvertError::Decode(e.to_string()))
}

/// Full conversion: decode, quantize onto `palette`, encode as PNG.
pub fn convert(bytes: &[u8], palette: &Palette) -> Result<ConvertedImage, ConvertError> {
    let quantized = quantize_bytes(bytes, palette)?;
    let (width, height) = (quantized.width(), quantized.height());

    tracing::debug!(
        width,
        height,
        bands = ?quantized.band_histogram(),
        "Quantized image"
    );

    let bytes = encode_png(quantized.rgba(), width, height)?;
    Ok(ConvertedImage {
        bytes,
        width,
        height,
    })
}
