/// Preview generation for uploaded images
/// Decodes the asset once, downsizes it for display, and re-encodes PNG
use std::io::Cursor;
use std::sync::Arc;

use image::{imageops::FilterType, ImageFormat};

use super::data::{AssetId, UploadedAsset};
use crate::error::PreviewError;

/// Longest edge of a preview in pixels
const PREVIEW_MAX_EDGE: u32 = 1024;

/// Displayable form of an asset
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Asset the preview was rendered from
    pub asset_id: AssetId,
    pub png: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

/// Render a preview off the UI thread
pub async fn render(asset: UploadedAsset) -> Result<Preview, PreviewError> {
    // Spawn blocking because decoding and resizing are CPU-bound
    tokio::task::spawn_blocking(move || render_blocking(&asset))
        .await
        .map_err(|e| PreviewError::Join(e.to_string()))?
}

/// Blocking implementation of preview rendering
pub fn render_blocking(asset: &UploadedAsset) -> Result<Preview, PreviewError> {
    let img = image::load_from_memory(&asset.bytes)
        .map_err(|e| PreviewError::Decode(e.to_string()))?;

    let img = if img.width() > PREVIEW_MAX_EDGE || img.height() > PREVIEW_MAX_EDGE {
        img.resize(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE, FilterType::Lanczos3)
    } else {
        img
    };

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| PreviewError::Encode(e.to_string()))?;

    log::debug!(
        "📸 Rendered preview for {:?}: {}x{} ({}KB)",
        asset.id(),
        img.width(),
        img.height(),
        png.len() / 1024
    );

    Ok(Preview {
        asset_id: asset.id(),
        png: png.into(),
        width: img.width(),
        height: img.height(),
    })
}

#[cfg(test)]
pub(crate) fn png_asset(width: u32, height: u32) -> UploadedAsset {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([240, 230, 220]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    UploadedAsset::new(bytes, "image/png", Some("photo.png".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_image_keeps_size() {
        let asset = png_asset(4, 6);
        let preview = render_blocking(&asset).unwrap();
        assert_eq!((preview.width, preview.height), (4, 6));
        assert_eq!(preview.asset_id, asset.id());
        assert_eq!(image::guess_format(&preview.png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_large_image_is_downsized() {
        let preview = render_blocking(&png_asset(2048, 512)).unwrap();
        assert_eq!(preview.width, PREVIEW_MAX_EDGE);
        assert_eq!(preview.height, 256);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let asset = UploadedAsset::new(vec![0u8; 16], "image/png", None);
        assert!(matches!(render_blocking(&asset), Err(PreviewError::Decode(_))));
    }

    #[tokio::test]
    async fn test_render_async() {
        let preview = render(png_asset(8, 8)).await.unwrap();
        assert_eq!(preview.width, 8);
    }
}
