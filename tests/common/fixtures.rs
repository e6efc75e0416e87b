//! Test fixtures: in-memory images and archives.

use std::io::{Cursor, Write};

use image::{DynamicImage, ImageFormat, RgbImage};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Fully transparent pixel with a distinctive color underneath
pub const TRANSPARENT_MAGENTA: [u8; 4] = [255, 0, 255, 0];

/// Encode RGBA8 pixels as PNG
pub fn png_rgba(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(rgba).unwrap();
    }
    buf.into_inner()
}

/// Single-color PNG
pub fn solid_png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let rgba: Vec<u8> = pixel
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 4)
        .collect();
    png_rgba(width, height, &rgba)
}

/// 256x1 gray ramp, opaque, with the last pixel transparent
pub fn ramp_png() -> Vec<u8> {
    let mut rgba = Vec::with_capacity(256 * 4);
    for v in 0..=255u8 {
        rgba.extend_from_slice(&[v, v, v, 255]);
    }
    rgba[255 * 4..].copy_from_slice(&TRANSPARENT_MAGENTA);
    png_rgba(256, 1, &rgba)
}

/// Small opaque JPEG
pub fn jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// Build a ZIP from `(name, bytes)` pairs; names ending in `/` become directories
pub fn zip_of(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
