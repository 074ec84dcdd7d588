/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the service client, the orchestrator and the UI layer.
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DataUrlError;
use crate::service::data_url;

static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an in-memory image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl AssetId {
    fn next() -> Self {
        AssetId(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An image supplied by the user (or produced by the service)
///
/// Bytes are shared so that cloning an asset into a message or an
/// effect does not copy the image.
#[derive(Clone, PartialEq)]
pub struct UploadedAsset {
    id: AssetId,
    pub bytes: Arc<[u8]>,
    pub mime: String,
    pub filename: Option<String>,
}

impl UploadedAsset {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            id: AssetId::next(),
            bytes: bytes.into(),
            mime: mime.into(),
            filename,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Filename for multipart uploads
    pub fn upload_name(&self, fallback: &str) -> String {
        self.filename.clone().unwrap_or_else(|| fallback.to_string())
    }

    /// Decode a `data:` URL into a new asset
    pub fn from_data_url(url: &str, filename: &str) -> Result<Self, DataUrlError> {
        let (mime, bytes) = data_url::decode(url)?;
        Ok(Self::new(bytes, mime, Some(filename.to_string())))
    }
}

// Bytes are elided; a full image in debug output is useless
impl fmt::Debug for UploadedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedAsset")
            .field("id", &self.id)
            .field("mime", &self.mime)
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A file handed over by the file picker or an OS drop, not yet validated
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: Option<String>,
    /// MIME type reported by the source, if any
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: Option<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self { name, mime, bytes }
    }

    /// MIME type, taken from the source, else the file extension, else
    /// sniffed from the bytes when the name has no extension at all.
    pub fn resolved_mime(&self) -> String {
        if let Some(mime) = &self.mime {
            return mime.clone();
        }

        let extension = self
            .name
            .as_deref()
            .and_then(|name| Path::new(name).extension());

        match extension {
            Some(_) => self
                .name
                .as_deref()
                .and_then(|name| image::ImageFormat::from_path(name).ok())
                .map(|format| format.to_mime_type().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            None => image::guess_format(&self.bytes)
                .map(|format| format.to_mime_type().to_string())
                .unwrap_or_else(|_| "application/octet-stream".to_string()),
        }
    }

    pub fn into_asset(self) -> UploadedAsset {
        let mime = self.resolved_mime();
        UploadedAsset::new(self.bytes, mime, self.name)
    }
}

/// Dress silhouette used for catalog filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Ballgown,
    Empire,
    Mermaid,
    Mini,
    Aline,
    Princess,
}

impl Category {
    /// Order of the category buttons
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::Ballgown,
        Category::Empire,
        Category::Mermaid,
        Category::Mini,
        Category::Aline,
        Category::Princess,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "전체",
            Category::Ballgown => "벨라인",
            Category::Empire => "엠파이어",
            Category::Mermaid => "머메이드",
            Category::Mini => "미니드레스",
            Category::Aline => "A라인",
            Category::Princess => "프린세스",
        }
    }

    /// Map a backend `style` string. Unknown styles land in `All`.
    pub fn from_style(style: &str) -> Self {
        match style.trim() {
            "A라인" => Category::Aline,
            "미니드레스" => Category::Mini,
            "벨라인" => Category::Ballgown,
            "프린세스" => Category::Princess,
            "엠파이어" => Category::Empire,
            "머메이드" => Category::Mermaid,
            _ => Category::All,
        }
    }
}

/// A selectable dress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub display_name: String,
    /// Absolute URL or a path served by the backend (`/images/...`)
    pub image_ref: String,
    pub category: Category,
    pub description: String,
}

/// Composite image returned by the service
#[derive(Debug, Clone, PartialEq)]
pub struct ResultImage {
    pub image: UploadedAsset,
}

impl ResultImage {
    pub fn from_data_url(data_url: &str) -> Result<Self, DataUrlError> {
        let image = UploadedAsset::from_data_url(data_url, "result")?;
        Ok(Self { image })
    }

    /// File extension matching the result's MIME type
    pub fn extension(&self) -> &'static str {
        match self.image.mime.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Sequence number tagging an asynchronous request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Hands out strictly increasing `RequestId`s
#[derive(Debug, Default)]
pub struct RequestIds {
    last: u64,
}

impl RequestIds {
    pub fn next(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_category_mapping() {
        assert_eq!(Category::from_style("A라인"), Category::Aline);
        assert_eq!(Category::from_style("미니드레스"), Category::Mini);
        assert_eq!(Category::from_style("벨라인"), Category::Ballgown);
        assert_eq!(Category::from_style("프린세스"), Category::Princess);
        assert_eq!(Category::from_style("슬립드레스"), Category::All);
        assert_eq!(Category::from_style(""), Category::All);
    }

    #[test]
    fn test_asset_ids_are_unique() {
        let a = UploadedAsset::new(vec![1u8], "image/png", None);
        let b = UploadedAsset::new(vec![1u8], "image/png", None);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_mime_resolution() {
        let reported = RawFile::new(Some("a.bin".into()), Some("image/webp".into()), vec![]);
        assert_eq!(reported.resolved_mime(), "image/webp");

        let by_extension = RawFile::new(Some("photo.JPG".into()), None, vec![]);
        assert_eq!(by_extension.resolved_mime(), "image/jpeg");

        let text = RawFile::new(Some("notes.txt".into()), None, PNG_MAGIC.to_vec());
        assert_eq!(text.resolved_mime(), "application/octet-stream");

        let sniffed = RawFile::new(Some("clipboard".into()), None, PNG_MAGIC.to_vec());
        assert_eq!(sniffed.resolved_mime(), "image/png");
    }

    #[test]
    fn test_catalog_item_json() {
        let item = CatalogItem {
            id: 3,
            display_name: "모던 머메이드".into(),
            image_ref: "/images/mermaid_03.jpg".into(),
            category: Category::Mermaid,
            description: "머메이드".into(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"category\":\"mermaid\""));
        let parsed: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_request_ids_increase() {
        let mut ids = RequestIds::default();
        let a = ids.next();
        let b = ids.next();
        assert!(b > a);
    }
}
