//! Assertion helpers for tests.

use dmg_quantize::Palette;
use pretty_assertions::assert_eq;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&PNG_MAGIC),
        "Expected PNG, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Decode a PNG into (rgba, width, height)
pub fn decode_png(bytes: &[u8]) -> (Vec<u8>, u32, u32) {
    assert_png(bytes);
    let img = image::load_from_memory(bytes).unwrap().to_rgba8();
    let (w, h) = img.dimensions();
    (img.into_raw(), w, h)
}

/// Assert every non-transparent pixel uses a palette color
pub fn assert_in_palette(rgba: &[u8], palette: &Palette) {
    for (i, px) in rgba.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        assert!(
            palette.index_of([px[0], px[1], px[2]]).is_some(),
            "Pixel {i} {:?} is not a palette color",
            px
        );
    }
}

/// Assert the pixel at `index` equals `expected`
pub fn assert_pixel(rgba: &[u8], index: usize, expected: [u8; 4]) {
    assert_eq!(&rgba[index * 4..index * 4 + 4], &expected, "pixel {index}");
}
