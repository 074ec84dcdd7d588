/// JSON bodies exchanged with the inference service, and their conversion
/// into domain values
///
/// Every body carries a `success` flag. A `false` flag is treated exactly
/// like a transport failure: it becomes a `ServiceError` carrying the
/// backend's `message` when there is one.
use std::path::Path;

use serde::Deserialize;

use crate::error::{Operation, ServiceError};
use crate::state::data::{CatalogItem, Category, ResultImage, UploadedAsset};

/// Prefix under which the backend serves catalog images
pub const IMAGE_PREFIX: &str = "/images/";

/// `POST /api/compose-dress`
#[derive(Debug, Deserialize)]
pub struct ComposeResponse {
    #[serde(default)]
    pub success: bool,
    pub result_image: Option<String>,
    pub message: Option<String>,
}

/// `POST /api/segment`
#[derive(Debug, Deserialize)]
pub struct SegmentResponse {
    #[serde(default)]
    pub success: bool,
    pub result_image: Option<String>,
    #[serde(default)]
    pub dress_detected: bool,
    pub dress_percentage: Option<f32>,
    pub message: Option<String>,
}

/// `GET /api/admin/dresses`
#[derive(Debug, Deserialize)]
pub struct DressListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<DressRecord>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DressRecord {
    pub id: i64,
    #[serde(alias = "imageFileName")]
    pub image_name: String,
    #[serde(default)]
    pub style: String,
}

/// Output of a successful match
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeResult {
    pub image: ResultImage,
    pub message: Option<String>,
}

/// Output of a successful background removal
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundRemoval {
    pub removed_asset: UploadedAsset,
    /// Share of the image classified as dress, in percent
    pub detection_ratio: Option<f32>,
    pub dress_detected: bool,
    pub message: Option<String>,
}

fn rejected(operation: Operation, message: Option<String>, fallback: &str) -> ServiceError {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    ServiceError::new(operation, message)
}

impl ComposeResponse {
    pub fn into_result(self) -> Result<CompositeResult, ServiceError> {
        let image = match (self.success, self.result_image) {
            (true, Some(image)) if !image.is_empty() => image,
            _ => return Err(rejected(Operation::Match, self.message, "매칭에 실패했습니다.")),
        };

        let image = ResultImage::from_data_url(&image)
            .map_err(|e| ServiceError::new(Operation::Match, e.to_string()))?;

        Ok(CompositeResult {
            image,
            message: self.message,
        })
    }
}

impl SegmentResponse {
    pub fn into_removal(self) -> Result<BackgroundRemoval, ServiceError> {
        let image = match (self.success, self.result_image) {
            (true, Some(image)) if !image.is_empty() => image,
            _ => {
                return Err(rejected(
                    Operation::RemoveBackground,
                    self.message,
                    "배경 제거에 실패했습니다.",
                ))
            }
        };

        let removed_asset = UploadedAsset::from_data_url(&image, "dress_no_bg.png")
            .map_err(|e| ServiceError::new(Operation::RemoveBackground, e.to_string()))?;

        Ok(BackgroundRemoval {
            removed_asset,
            detection_ratio: self.dress_percentage,
            dress_detected: self.dress_detected,
            message: self.message,
        })
    }
}

impl DressListResponse {
    pub fn into_items(self) -> Result<Vec<CatalogItem>, ServiceError> {
        if !self.success {
            return Err(rejected(
                Operation::ListCatalog,
                self.message,
                "드레스 목록을 불러오지 못했습니다.",
            ));
        }
        Ok(self.data.into_iter().map(DressRecord::into_item).collect())
    }
}

impl DressRecord {
    pub fn into_item(self) -> CatalogItem {
        let display_name = Path::new(&self.image_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_name.clone());

        CatalogItem {
            id: self.id,
            display_name,
            image_ref: format!("{}{}", IMAGE_PREFIX, self.image_name),
            category: Category::from_style(&self.style),
            description: self.style,
        }
    }
}
