use async_trait::async_trait;
use dmg_quantize::Palette;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::models::ConvertedImage;
use crate::rendering::raster;

/// Turns source bytes into a palette-mapped PNG
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(
        &self,
        source: Arc<[u8]>,
        palette: Palette,
    ) -> Result<ConvertedImage, ConvertError>;
}

/// Decode, quantize and encode on the blocking thread pool
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterConverter;

impl RasterConverter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Converter for RasterConverter {
    async fn convert(
        &self,
        source: Arc<[u8]>,
        palette: Palette,
    ) -> Result<ConvertedImage, ConvertError> {
        tokio::task::spawn_blocking(move || raster::convert(&source, &palette))
            .await
            .map_err(|e| ConvertError::Worker(e.to_string()))?
    }
}
