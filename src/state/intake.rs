/// Upload intake: one drop target that accepts images
///
/// The intake never owns the asset itself. It validates incoming files,
/// interprets drops, and keeps a preview derived from whatever asset the
/// orchestrator currently holds for its slot. Preview renders are tagged
/// with a ticket so that a slow render for an old asset can never replace
/// the preview of a newer one.
use super::data::{AssetId, CatalogItem, RawFile, RequestId, RequestIds, UploadedAsset};
use super::preview::Preview;
use crate::error::{PayloadError, PreviewError};

/// The three drop targets of the fitting page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Person photo of the general tab
    General,
    /// Full-body photo of the custom tab
    FullBody,
    /// Dress photo of the custom tab
    Dress,
}

/// Identifies one preview render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    pub slot: Slot,
    pub request: RequestId,
    pub asset_id: AssetId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned bounding box in window coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Points on an edge count as outside
    pub fn strictly_contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// What arrived with a drop
#[derive(Debug, Clone, Default)]
pub struct DropPayload {
    /// Serialized catalog item, when the drag started on a dress card
    pub json: Option<String>,
    pub file: Option<RawFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A dress was dropped but there is no photo to fit it on
    AssetRequired(CatalogItem),
    /// A dress was dropped onto a held photo
    MatchRequested(CatalogItem),
    /// A file was dropped and accepted as the new asset
    Uploaded(UploadedAsset),
    Ignored,
}

/// Parse the JSON a dress card attaches to its drag
pub fn parse_drag_payload(json: &str) -> Result<CatalogItem, PayloadError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug)]
pub struct IntakeSlot {
    slot: Slot,
    preview: Option<Preview>,
    /// Asset the preview should reflect
    current: Option<AssetId>,
    /// Render in flight for `current`
    pending: Option<PreviewTicket>,
    drag_over: bool,
    /// Bumped on removal so the host can reset its file input
    input_generation: u64,
}

impl IntakeSlot {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            preview: None,
            current: None,
            pending: None,
            drag_over: false,
            input_generation: 0,
        }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn is_rendering(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn input_generation(&self) -> u64 {
        self.input_generation
    }

    /// Accept a file only when its MIME type is `image/*`
    pub fn submit_file(&self, raw: RawFile) -> Option<UploadedAsset> {
        let asset = raw.into_asset();
        if asset.is_image() {
            log::debug!("{:?}: accepted {:?}", self.slot, asset);
            Some(asset)
        } else {
            log::debug!("{:?}: ignored non-image file ({})", self.slot, asset.mime);
            None
        }
    }

    /// Follow the externally held asset.
    ///
    /// Clearing the asset clears the preview at once. A new asset yields a
    /// ticket for an asynchronous render; the previous preview stays on
    /// screen until that render lands.
    pub fn sync_asset(
        &mut self,
        asset: Option<&UploadedAsset>,
        ids: &mut RequestIds,
    ) -> Option<PreviewTicket> {
        let Some(asset) = asset else {
            self.preview = None;
            self.current = None;
            self.pending = None;
            return None;
        };

        if self.current == Some(asset.id()) {
            return None;
        }

        let ticket = PreviewTicket {
            slot: self.slot,
            request: ids.next(),
            asset_id: asset.id(),
        };
        self.current = Some(asset.id());
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Apply a finished render. Returns `false` when the render was stale.
    pub fn complete_preview(
        &mut self,
        ticket: PreviewTicket,
        result: Result<Preview, PreviewError>,
    ) -> bool {
        if self.pending != Some(ticket) || self.current != Some(ticket.asset_id) {
            log::debug!("{:?}: discarding stale preview {:?}", self.slot, ticket.request);
            return false;
        }

        self.pending = None;
        match result {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => {
                log::warn!("⚠️  {:?}: preview failed: {}", self.slot, e);
                self.preview = None;
            }
        }
        true
    }

    /// Forget the preview and reset the input; the owner drops the asset
    pub fn remove(&mut self) {
        self.preview = None;
        self.current = None;
        self.pending = None;
        self.input_generation += 1;
    }

    pub fn drag_over(&mut self) {
        self.drag_over = true;
    }

    /// Leaving a child element fires leave events too; only a pointer
    /// outside the target's box ends the hover.
    pub fn drag_leave(&mut self, pointer: Point, bounds: Rect) {
        if !bounds.strictly_contains(pointer) {
            self.drag_over = false;
        }
    }

    /// Interpret a drop. Catalog payloads win over files.
    pub fn drop(&mut self, payload: DropPayload, asset_held: bool) -> DropOutcome {
        self.drag_over = false;

        if let Some(json) = payload.json.as_deref().filter(|j| !j.trim().is_empty()) {
            return match parse_drag_payload(json) {
                Ok(item) if asset_held => DropOutcome::MatchRequested(item),
                Ok(item) => DropOutcome::AssetRequired(item),
                Err(e) => {
                    log::warn!("{:?}: ignoring drop: {}", self.slot, e);
                    DropOutcome::Ignored
                }
            };
        }

        match payload.file.and_then(|file| self.submit_file(file)) {
            Some(asset) => DropOutcome::Uploaded(asset),
            None => DropOutcome::Ignored,
        }
    }
}
