pub mod raster;

pub use raster::{convert, decode_rgba, encode_png, quantize_bytes, RgbaPixels};
