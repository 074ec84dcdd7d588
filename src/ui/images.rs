/// Image handle cache
///
/// iced uploads an image once per `Handle`. Creating handles inside `view`
/// would re-upload every frame, so handles are created in `update` and
/// kept here, keyed by the asset (previews, results) or the catalog id
/// (thumbnails). Downloaded catalog images are kept too, so a match can
/// submit them without fetching again.
use std::collections::{HashMap, HashSet};

use iced::widget::image::Handle;

use crate::error::ServiceError;
use crate::state::data::{AssetId, UploadedAsset};

#[derive(Debug, Clone)]
pub enum Thumbnail {
    Loading,
    Ready(Handle),
    Failed,
}

#[derive(Debug, Default)]
pub struct HandleCache {
    assets: HashMap<AssetId, Handle>,
    thumbnails: HashMap<i64, Thumbnail>,
    dresses: HashMap<i64, UploadedAsset>,
}

impl HandleCache {
    pub fn asset(&self, id: AssetId) -> Option<&Handle> {
        self.assets.get(&id)
    }

    /// Make the cache hold exactly the given images
    pub fn sync<'a>(&mut self, live: impl IntoIterator<Item = (AssetId, &'a [u8])>) {
        let mut seen = HashSet::new();
        for (id, bytes) in live {
            seen.insert(id);
            self.assets
                .entry(id)
                .or_insert_with(|| Handle::from_bytes(bytes.to_vec()));
        }
        self.assets.retain(|id, _| seen.contains(id));
    }

    pub fn thumbnail(&self, id: i64) -> Option<&Thumbnail> {
        self.thumbnails.get(&id)
    }

    /// Full image of a catalog dress, once its thumbnail was downloaded
    pub fn dress(&self, id: i64) -> Option<&UploadedAsset> {
        self.dresses.get(&id)
    }

    /// Mark a thumbnail as loading. Returns `false` if it was already requested.
    pub fn request_thumbnail(&mut self, id: i64) -> bool {
        if self.thumbnails.contains_key(&id) {
            return false;
        }
        self.thumbnails.insert(id, Thumbnail::Loading);
        true
    }

    pub fn finish_thumbnail(&mut self, id: i64, result: Result<UploadedAsset, ServiceError>) {
        let thumbnail = match result {
            Ok(asset) => {
                let handle = Handle::from_bytes(asset.bytes.to_vec());
                self.dresses.insert(id, asset);
                Thumbnail::Ready(handle)
            }
            Err(e) => {
                log::warn!("⚠️  Thumbnail for dress {} failed: {}", id, e);
                Thumbnail::Failed
            }
        };
        self.thumbnails.insert(id, thumbnail);
    }

    /// Forget all thumbnails, e.g. after the catalog was reloaded
    pub fn clear_thumbnails(&mut self) {
        self.thumbnails.clear();
        self.dresses.clear();
    }
}
