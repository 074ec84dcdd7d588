/// Fitting orchestrator
///
/// The single owner of session state: uploaded photos, the selected dress,
/// in-flight requests, results and notifications. User actions and async
/// completions come in as method calls; each call updates the state
/// synchronously and returns the asynchronous work to start as `Effect`s.
/// Nothing here performs I/O.
///
/// Two flows live side by side and never share flags:
/// - general: drop a catalog dress onto a photo to get an automatic match
/// - custom: upload a full-body photo and a dress photo, strip the dress
///   background, then match manually
use std::mem;
use std::time::Duration;

use super::data::{CatalogItem, RawFile, RequestId, RequestIds, ResultImage, UploadedAsset};
use super::intake::{DropOutcome, DropPayload, IntakeSlot, Point, PreviewTicket, Rect, Slot};
use super::notice::{Notice, SuccessMarker};
use super::preview::Preview;
use crate::error::{PreconditionError, PreviewError, ServiceError};
use crate::service::{BackgroundRemoval, CompositeResult};

pub const UPLOAD_REQUIRED_MESSAGE: &str = "이미지를 업로드해 주세요";
const BACKGROUND_REMOVED_MESSAGE: &str = "배경 제거가 완료되었습니다!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Fitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    General,
    Custom,
}

/// General tab state
#[derive(Debug, Clone, PartialEq)]
pub enum GeneralFlow {
    /// No photo
    Idle,
    /// A dress was dropped before any photo; the upload dialog is open
    AwaitingUpload { pending: CatalogItem },
    /// Photo held, nothing in flight
    AssetPending {
        asset: UploadedAsset,
        result: Option<ResultImage>,
    },
    Matching {
        asset: UploadedAsset,
        item: CatalogItem,
        request: RequestId,
    },
}

impl GeneralFlow {
    pub fn asset(&self) -> Option<&UploadedAsset> {
        match self {
            GeneralFlow::AssetPending { asset, .. } | GeneralFlow::Matching { asset, .. } => {
                Some(asset)
            }
            GeneralFlow::Idle | GeneralFlow::AwaitingUpload { .. } => None,
        }
    }

    pub fn result(&self) -> Option<&ResultImage> {
        match self {
            GeneralFlow::AssetPending { result, .. } => result.as_ref(),
            _ => None,
        }
    }
}

/// Dress photo of the custom tab
#[derive(Debug, Clone, PartialEq)]
pub enum DressSlot {
    Empty,
    /// As uploaded
    Original(UploadedAsset),
    RemovingBackground {
        asset: UploadedAsset,
        request: RequestId,
    },
    /// Processed image returned by the service
    BackgroundRemoved(UploadedAsset),
}

impl DressSlot {
    pub fn asset(&self) -> Option<&UploadedAsset> {
        match self {
            DressSlot::Empty => None,
            DressSlot::Original(asset)
            | DressSlot::RemovingBackground { asset, .. }
            | DressSlot::BackgroundRemoved(asset) => Some(asset),
        }
    }
}

/// Custom tab state
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFlow {
    pub full_body: Option<UploadedAsset>,
    pub dress: DressSlot,
    pub matching: Option<RequestId>,
    pub result: Option<ResultImage>,
}

impl Default for CustomFlow {
    fn default() -> Self {
        Self {
            full_body: None,
            dress: DressSlot::Empty,
            matching: None,
            result: None,
        }
    }
}

/// Asynchronous work requested by a transition
#[derive(Debug, Clone)]
pub enum Effect {
    RenderPreview {
        ticket: PreviewTicket,
        asset: UploadedAsset,
    },
    MatchAutomatic {
        request: RequestId,
        person: UploadedAsset,
        item: CatalogItem,
    },
    RemoveBackground {
        request: RequestId,
        asset: UploadedAsset,
    },
    MatchCustom {
        request: RequestId,
        full_body: UploadedAsset,
        dress: UploadedAsset,
    },
    ClearSuccessMarker {
        generation: u64,
        after: Duration,
    },
}

#[derive(Debug)]
pub struct Orchestrator {
    page: Page,
    tab: Tab,
    general: GeneralFlow,
    custom: CustomFlow,
    selected_item: Option<CatalogItem>,
    focused_item: Option<i64>,
    general_intake: IntakeSlot,
    full_body_intake: IntakeSlot,
    dress_intake: IntakeSlot,
    notice: Notice,
    marker: SuccessMarker,
    marker_duration: Duration,
    /// Survives resets so late responses can never match a new request
    requests: RequestIds,
}

impl Orchestrator {
    pub fn new(marker_duration: Duration) -> Self {
        Self {
            page: Page::Landing,
            tab: Tab::General,
            general: GeneralFlow::Idle,
            custom: CustomFlow::default(),
            selected_item: None,
            focused_item: None,
            general_intake: IntakeSlot::new(Slot::General),
            full_body_intake: IntakeSlot::new(Slot::FullBody),
            dress_intake: IntakeSlot::new(Slot::Dress),
            notice: Notice::default(),
            marker: SuccessMarker::default(),
            marker_duration,
            requests: RequestIds::default(),
        }
    }

    // ========== Read access ==========

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn general(&self) -> &GeneralFlow {
        &self.general
    }

    pub fn custom(&self) -> &CustomFlow {
        &self.custom
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.selected_item.as_ref()
    }

    pub fn focused_item(&self) -> Option<i64> {
        self.focused_item
    }

    pub fn intake(&self, slot: Slot) -> &IntakeSlot {
        match slot {
            Slot::General => &self.general_intake,
            Slot::FullBody => &self.full_body_intake,
            Slot::Dress => &self.dress_intake,
        }
    }

    fn intake_mut(&mut self, slot: Slot) -> &mut IntakeSlot {
        match slot {
            Slot::General => &mut self.general_intake,
            Slot::FullBody => &mut self.full_body_intake,
            Slot::Dress => &mut self.dress_intake,
        }
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    pub fn upload_dialog_open(&self) -> bool {
        matches!(self.general, GeneralFlow::AwaitingUpload { .. })
    }

    pub fn success_marker_visible(&self) -> bool {
        self.marker.is_visible()
    }

    /// Custom-tab manual match in flight
    pub fn is_matching(&self) -> bool {
        self.custom.matching.is_some()
    }

    pub fn is_removing_background(&self) -> bool {
        matches!(self.custom.dress, DressSlot::RemovingBackground { .. })
    }

    pub fn is_background_removed(&self) -> bool {
        matches!(self.custom.dress, DressSlot::BackgroundRemoved(_))
    }

    /// General-tab automatic match in flight
    pub fn is_auto_processing(&self) -> bool {
        matches!(self.general, GeneralFlow::Matching { .. })
    }

    /// General result, once nothing is in flight
    pub fn general_download(&self) -> Option<&ResultImage> {
        self.general.result()
    }

    pub fn custom_download(&self) -> Option<&ResultImage> {
        match self.custom.matching {
            Some(_) => None,
            None => self.custom.result.as_ref(),
        }
    }

    // ========== Navigation ==========

    pub fn enter_fitting(&mut self) {
        self.page = Page::Fitting;
    }

    /// Back to the landing view. Clears all session state across both tabs.
    pub fn back_to_landing(&mut self) {
        self.page = Page::Landing;
        self.reset();
    }

    fn reset(&mut self) {
        log::info!("🔄 Resetting fitting session");
        self.general = GeneralFlow::Idle;
        self.custom = CustomFlow::default();
        self.selected_item = None;
        self.general_intake.remove();
        self.full_body_intake.remove();
        self.dress_intake.remove();
        self.notice.close();
        self.marker.hide();
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn close_notice(&mut self) {
        self.notice.close();
    }

    /// Show a message that did not come from a transition, e.g. a failed save
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice.open(message);
    }

    // ========== Intake plumbing ==========

    fn sync_preview(&mut self, slot: Slot) -> Vec<Effect> {
        let asset = match slot {
            Slot::General => self.general.asset().cloned(),
            Slot::FullBody => self.custom.full_body.clone(),
            Slot::Dress => self.custom.dress.asset().cloned(),
        };

        let ticket = match slot {
            Slot::General => self.general_intake.sync_asset(asset.as_ref(), &mut self.requests),
            Slot::FullBody => self.full_body_intake.sync_asset(asset.as_ref(), &mut self.requests),
            Slot::Dress => self.dress_intake.sync_asset(asset.as_ref(), &mut self.requests),
        };

        match (ticket, asset) {
            (Some(ticket), Some(asset)) => vec![Effect::RenderPreview { ticket, asset }],
            _ => Vec::new(),
        }
    }

    pub fn complete_preview(&mut self, ticket: PreviewTicket, result: Result<Preview, PreviewError>) {
        self.intake_mut(ticket.slot).complete_preview(ticket, result);
    }

    pub fn drag_over(&mut self, slot: Slot) {
        self.intake_mut(slot).drag_over();
    }

    pub fn drag_leave(&mut self, slot: Slot, pointer: Point, bounds: Rect) {
        self.intake_mut(slot).drag_leave(pointer, bounds);
    }

    /// File picked through the file dialog for a slot
    pub fn submit_file(&mut self, slot: Slot, raw: RawFile) -> Vec<Effect> {
        match self.intake(slot).submit_file(raw) {
            Some(asset) => self.accept_asset(slot, asset),
            None => Vec::new(),
        }
    }

    /// Something was dropped on a slot
    pub fn drop_on(&mut self, slot: Slot, payload: DropPayload) -> Vec<Effect> {
        let held = match slot {
            Slot::General => self.general.asset().is_some(),
            Slot::FullBody => self.custom.full_body.is_some(),
            Slot::Dress => self.custom.dress.asset().is_some(),
        };

        match (slot, self.intake_mut(slot).drop(payload, held)) {
            (_, DropOutcome::Uploaded(asset)) => self.accept_asset(slot, asset),
            (Slot::General, DropOutcome::AssetRequired(item)) => {
                log::info!("Dress {} dropped without a photo, asking for upload", item.id);
                self.general = GeneralFlow::AwaitingUpload { pending: item };
                Vec::new()
            }
            (Slot::General, DropOutcome::MatchRequested(item)) => self.start_auto_match(item),
            (_, DropOutcome::AssetRequired(_) | DropOutcome::MatchRequested(_)) => {
                log::debug!("{:?}: catalog drops are not accepted here", slot);
                Vec::new()
            }
            (_, DropOutcome::Ignored) => Vec::new(),
        }
    }

    /// Remove button of a slot
    pub fn remove(&mut self, slot: Slot) -> Vec<Effect> {
        self.intake_mut(slot).remove();
        match slot {
            Slot::General => self.general = GeneralFlow::Idle,
            Slot::FullBody => self.custom.full_body = None,
            Slot::Dress => self.custom.dress = DressSlot::Empty,
        }
        Vec::new()
    }

    fn accept_asset(&mut self, slot: Slot, asset: UploadedAsset) -> Vec<Effect> {
        let mut effects = Vec::new();
        match slot {
            Slot::General => {
                let previous = mem::replace(&mut self.general, GeneralFlow::Idle);
                match previous {
                    GeneralFlow::AwaitingUpload { pending } => {
                        self.general = GeneralFlow::AssetPending { asset, result: None };
                        effects.extend(self.sync_preview(Slot::General));
                        effects.extend(self.start_auto_match(pending));
                        return effects;
                    }
                    _ => {
                        self.general = GeneralFlow::AssetPending { asset, result: None };
                    }
                }
            }
            Slot::FullBody => self.custom.full_body = Some(asset),
            // Any new dress invalidates a previous background removal
            Slot::Dress => self.custom.dress = DressSlot::Original(asset),
        }
        effects.extend(self.sync_preview(slot));
        effects
    }

    // ========== General flow ==========

    /// Card click; selection alone never starts a match. Picking another
    /// dress drops the result made with the previous one.
    pub fn select_item(&mut self, item: CatalogItem) {
        if self.selected_item.as_ref().map(|s| s.id) != Some(item.id) {
            if let GeneralFlow::AssetPending { result, .. } = &mut self.general {
                *result = None;
            }
        }
        self.selected_item = Some(item);
    }

    /// Topmost card of the catalog changed
    pub fn focus_item(&mut self, id: i64) {
        self.focused_item = Some(id);
    }

    /// The upload dialog was acknowledged without uploading
    pub fn dismiss_upload_dialog(&mut self) {
        if let GeneralFlow::AwaitingUpload { pending } = &self.general {
            log::debug!("Upload dialog dismissed, dropping pending dress {}", pending.id);
            self.general = GeneralFlow::Idle;
        }
    }

    fn start_auto_match(&mut self, item: CatalogItem) -> Vec<Effect> {
        let Some(person) = self.general.asset().cloned() else {
            return Vec::new();
        };

        let request = self.requests.next();
        log::info!("👗 Matching dress {} ({:?})", item.id, request);
        self.selected_item = Some(item.clone());
        self.general = GeneralFlow::Matching {
            asset: person.clone(),
            item: item.clone(),
            request,
        };
        vec![Effect::MatchAutomatic {
            request,
            person,
            item,
        }]
    }

    pub fn finish_auto_match(
        &mut self,
        request: RequestId,
        result: Result<CompositeResult, ServiceError>,
    ) -> Vec<Effect> {
        let asset = match mem::replace(&mut self.general, GeneralFlow::Idle) {
            GeneralFlow::Matching { asset, request: current, .. } if current == request => asset,
            other => {
                log::debug!("Discarding stale match response {:?}", request);
                self.general = other;
                return Vec::new();
            }
        };

        match result {
            Ok(composite) => {
                log::info!("✅ Match complete ({:?})", request);
                self.general = GeneralFlow::AssetPending {
                    asset,
                    result: Some(composite.image),
                };
                self.show_marker()
            }
            Err(e) => {
                log::warn!("⚠️  Match failed: {}", e);
                self.general = GeneralFlow::AssetPending { asset, result: None };
                self.notice.open(format!("매칭 중 오류가 발생했습니다: {}", e.message));
                Vec::new()
            }
        }
    }

    // ========== Custom flow ==========

    /// Start background removal for the dress as uploaded
    pub fn remove_background(&mut self) -> Vec<Effect> {
        let asset = match mem::replace(&mut self.custom.dress, DressSlot::Empty) {
            DressSlot::Original(asset) => asset,
            other => {
                self.custom.dress = other;
                return Vec::new();
            }
        };

        let request = self.requests.next();
        log::info!("✂️  Removing dress background ({:?})", request);
        self.custom.dress = DressSlot::RemovingBackground {
            asset: asset.clone(),
            request,
        };
        vec![Effect::RemoveBackground { request, asset }]
    }

    pub fn finish_background_removal(
        &mut self,
        request: RequestId,
        result: Result<BackgroundRemoval, ServiceError>,
    ) -> Vec<Effect> {
        let original = match mem::replace(&mut self.custom.dress, DressSlot::Empty) {
            DressSlot::RemovingBackground { asset, request: current } if current == request => asset,
            other => {
                log::debug!("Discarding stale background removal {:?}", request);
                self.custom.dress = other;
                return Vec::new();
            }
        };

        match result {
            Ok(removal) => {
                self.custom.dress = DressSlot::BackgroundRemoved(removal.removed_asset);
                self.notice.open(BACKGROUND_REMOVED_MESSAGE);
                self.sync_preview(Slot::Dress)
            }
            Err(e) => {
                log::warn!("⚠️  Background removal failed: {}", e);
                self.custom.dress = DressSlot::Original(original);
                self.notice
                    .open(format!("배경 제거 중 오류가 발생했습니다: {}", e.message));
                Vec::new()
            }
        }
    }

    /// Prerequisites of a manual match, checked in order
    pub fn check_manual_match(&self) -> Result<(&UploadedAsset, &UploadedAsset), PreconditionError> {
        let full_body = self
            .custom
            .full_body
            .as_ref()
            .ok_or(PreconditionError::MissingFullBody)?;
        let dress = match &self.custom.dress {
            DressSlot::Empty => return Err(PreconditionError::MissingDress),
            DressSlot::BackgroundRemoved(dress) => dress,
            DressSlot::Original(_) | DressSlot::RemovingBackground { .. } => {
                return Err(PreconditionError::BackgroundNotRemoved)
            }
        };
        Ok((full_body, dress))
    }

    /// Match button of the custom tab
    pub fn trigger_manual_match(&mut self) -> Vec<Effect> {
        if self.custom.matching.is_some() {
            return Vec::new();
        }

        let (full_body, dress) = match self.check_manual_match() {
            Ok((full_body, dress)) => (full_body.clone(), dress.clone()),
            Err(unmet) => {
                self.notice.open(unmet.to_string());
                return Vec::new();
            }
        };

        let request = self.requests.next();
        log::info!("👗 Manual match ({:?})", request);
        self.custom.matching = Some(request);
        vec![Effect::MatchCustom {
            request,
            full_body,
            dress,
        }]
    }

    pub fn finish_custom_match(
        &mut self,
        request: RequestId,
        result: Result<CompositeResult, ServiceError>,
    ) -> Vec<Effect> {
        if self.custom.matching != Some(request) {
            log::debug!("Discarding stale custom match {:?}", request);
            return Vec::new();
        }
        self.custom.matching = None;

        match result {
            Ok(composite) => {
                log::info!("✅ Custom match complete ({:?})", request);
                self.custom.result = Some(composite.image);
                self.show_marker()
            }
            Err(e) => {
                log::warn!("⚠️  Custom match failed: {}", e);
                self.notice.open(format!("매칭 중 오류가 발생했습니다: {}", e.message));
                Vec::new()
            }
        }
    }

    // ========== Success marker ==========

    fn show_marker(&mut self) -> Vec<Effect> {
        let generation = self.marker.show();
        vec![Effect::ClearSuccessMarker {
            generation,
            after: self.marker_duration,
        }]
    }

    pub fn clear_success_marker(&mut self, generation: u64) {
        self.marker.clear(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::state::data::Category;
    use crate::state::preview::{png_asset, render_blocking};

    fn orchestrator() -> Orchestrator {
        let mut o = Orchestrator::new(Duration::from_millis(1500));
        o.enter_fitting();
        o
    }

    fn dress(id: i64) -> CatalogItem {
        CatalogItem {
            id,
            display_name: format!("dress_{id}"),
            image_ref: format!("/images/dress_{id}.jpg"),
            category: Category::Aline,
            description: "A라인".into(),
        }
    }

    fn photo() -> RawFile {
        let asset = png_asset(2, 2);
        RawFile::new(Some("me.png".into()), None, asset.bytes.to_vec())
    }

    fn drag(item: &CatalogItem) -> DropPayload {
        DropPayload {
            json: Some(serde_json::to_string(item).unwrap()),
            file: None,
        }
    }

    fn composite() -> CompositeResult {
        CompositeResult {
            image: ResultImage::from_data_url("data:image/png;base64,AQID").unwrap(),
            message: None,
        }
    }

    fn failure(op: Operation) -> ServiceError {
        ServiceError::new(op, "server exploded")
    }

    fn removal() -> BackgroundRemoval {
        BackgroundRemoval {
            removed_asset: png_asset(2, 2),
            detection_ratio: Some(45.0),
            dress_detected: true,
            message: None,
        }
    }

    fn auto_matches(effects: &[Effect]) -> Vec<(RequestId, UploadedAsset, CatalogItem)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::MatchAutomatic { request, person, item } => {
                    Some((*request, person.clone(), item.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn removal_request(effects: &[Effect]) -> RequestId {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::RemoveBackground { request, .. } => Some(*request),
                _ => None,
            })
            .expect("removal effect")
    }

    /// Full-body and dress uploaded, background removed
    fn ready_custom(o: &mut Orchestrator) {
        o.submit_file(Slot::FullBody, photo());
        o.submit_file(Slot::Dress, photo());
        let request = removal_request(&o.remove_background());
        o.finish_background_removal(request, Ok(removal()));
        o.close_notice();
    }

    #[test]
    fn test_drop_without_photo_then_upload_matches_once() {
        let mut o = orchestrator();
        let x = dress(7);

        let effects = o.drop_on(Slot::General, drag(&x));
        assert!(auto_matches(&effects).is_empty());
        assert!(o.upload_dialog_open());

        let effects = o.submit_file(Slot::General, photo());
        let matches = auto_matches(&effects);
        assert_eq!(matches.len(), 1);
        let (_, person, item) = &matches[0];
        assert_eq!(Some(person), o.general().asset());
        assert_eq!(item, &x);
        assert!(!o.upload_dialog_open());
        assert!(o.is_auto_processing());
        assert!(effects.iter().any(|e| matches!(e, Effect::RenderPreview { .. })));
    }

    #[test]
    fn test_dismissing_upload_dialog_cancels_pending_dress() {
        let mut o = orchestrator();
        o.drop_on(Slot::General, drag(&dress(1)));
        o.dismiss_upload_dialog();
        assert_eq!(o.general(), &GeneralFlow::Idle);

        let effects = o.submit_file(Slot::General, photo());
        assert!(auto_matches(&effects).is_empty());
    }

    #[test]
    fn test_drop_on_photo_matches_and_selects() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());

        let (request, _, _) = auto_matches(&o.drop_on(Slot::General, drag(&dress(3))))[0].clone();
        assert_eq!(o.selected_item().map(|i| i.id), Some(3));

        let effects = o.finish_auto_match(request, Ok(composite()));
        assert!(o.general().result().is_some());
        assert!(!o.is_auto_processing());
        assert!(o.success_marker_visible());
        assert!(matches!(
            &effects[..],
            [Effect::ClearSuccessMarker { after, .. }] if *after == Duration::from_millis(1500)
        ));
    }

    #[test]
    fn test_auto_match_failure_opens_notice() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        let (request, _, _) = auto_matches(&o.drop_on(Slot::General, drag(&dress(3))))[0].clone();

        o.finish_auto_match(request, Err(failure(Operation::Match)));
        assert!(!o.is_auto_processing());
        assert!(matches!(o.general(), GeneralFlow::AssetPending { result: None, .. }));
        assert_eq!(
            o.notice().message(),
            Some("매칭 중 오류가 발생했습니다: server exploded")
        );
    }

    #[test]
    fn test_new_upload_makes_match_response_stale() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        let (request, _, _) = auto_matches(&o.drop_on(Slot::General, drag(&dress(3))))[0].clone();

        o.submit_file(Slot::General, photo());
        o.finish_auto_match(request, Ok(composite()));
        assert!(o.general().result().is_none());
        assert!(!o.success_marker_visible());
    }

    #[test]
    fn test_click_selection_does_not_match() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        o.select_item(dress(2));
        o.focus_item(4);
        assert!(!o.is_auto_processing());
        assert_eq!(o.selected_item().map(|i| i.id), Some(2));
        assert_eq!(o.focused_item(), Some(4));
    }

    #[test]
    fn test_selecting_another_dress_clears_result() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        let (request, _, _) = auto_matches(&o.drop_on(Slot::General, drag(&dress(3))))[0].clone();
        o.finish_auto_match(request, Ok(composite()));

        o.select_item(dress(3));
        assert!(o.general_download().is_some());

        o.select_item(dress(5));
        assert!(o.general_download().is_none());
        assert!(o.general().asset().is_some());
    }

    #[test]
    fn test_remove_general_photo_returns_to_idle() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        o.drop_on(Slot::General, drag(&dress(3)));
        o.remove(Slot::General);
        assert_eq!(o.general(), &GeneralFlow::Idle);
        assert!(o.intake(Slot::General).preview().is_none());
    }

    #[test]
    fn test_non_image_upload_is_noop() {
        let mut o = orchestrator();
        let effects = o.submit_file(
            Slot::General,
            RawFile::new(Some("a.txt".into()), Some("text/plain".into()), b"hi".to_vec()),
        );
        assert!(effects.is_empty());
        assert_eq!(o.general(), &GeneralFlow::Idle);
    }

    #[test]
    fn test_manual_match_precondition_order() {
        let mut o = orchestrator();

        o.trigger_manual_match();
        assert_eq!(o.notice().message(), Some("전신사진을 업로드해주세요"));
        o.close_notice();

        o.submit_file(Slot::FullBody, photo());
        o.trigger_manual_match();
        assert_eq!(o.notice().message(), Some("드레스 이미지를 업로드해주세요"));
        o.close_notice();

        o.submit_file(Slot::Dress, photo());
        let effects = o.trigger_manual_match();
        assert!(effects.is_empty());
        assert_eq!(o.notice().message(), Some("배경지우기 버튼을 클릭해주세요"));
        assert!(!o.is_matching());
    }

    #[test]
    fn test_missing_everything_reports_full_body_first() {
        let o = orchestrator();
        assert_eq!(o.check_manual_match().unwrap_err(), PreconditionError::MissingFullBody);
    }

    #[test]
    fn test_background_removal_success() {
        let mut o = orchestrator();
        o.submit_file(Slot::Dress, photo());
        let original = o.custom().dress.asset().cloned().unwrap();

        let request = removal_request(&o.remove_background());
        assert!(o.is_removing_background());
        assert!(o.remove_background().is_empty());

        let effects = o.finish_background_removal(request, Ok(removal()));
        assert!(o.is_background_removed());
        assert!(!o.is_removing_background());
        assert_ne!(o.custom().dress.asset().unwrap().id(), original.id());
        assert_eq!(o.notice().message(), Some("배경 제거가 완료되었습니다!"));
        assert!(matches!(effects[..], [Effect::RenderPreview { .. }]));
    }

    #[test]
    fn test_background_removal_failure_keeps_original() {
        let mut o = orchestrator();
        o.submit_file(Slot::Dress, photo());
        let original = o.custom().dress.asset().cloned().unwrap();
        let request = removal_request(&o.remove_background());

        o.finish_background_removal(request, Err(failure(Operation::RemoveBackground)));
        assert!(!o.is_background_removed());
        assert!(!o.is_removing_background());
        assert_eq!(o.custom().dress, DressSlot::Original(original));
        assert_eq!(
            o.notice().message(),
            Some("배경 제거 중 오류가 발생했습니다: server exploded")
        );
    }

    #[test]
    fn test_replacing_dress_clears_background_removed() {
        let mut o = orchestrator();
        ready_custom(&mut o);
        assert!(o.is_background_removed());

        o.submit_file(Slot::Dress, photo());
        assert!(!o.is_background_removed());
        assert!(matches!(o.custom().dress, DressSlot::Original(_)));
    }

    #[test]
    fn test_replacing_dress_during_removal_discards_response() {
        let mut o = orchestrator();
        o.submit_file(Slot::Dress, photo());
        let request = removal_request(&o.remove_background());

        o.submit_file(Slot::Dress, photo());
        assert!(!o.is_background_removed());

        o.finish_background_removal(request, Ok(removal()));
        assert!(!o.is_background_removed());
        assert!(!o.notice().is_open());
    }

    #[test]
    fn test_manual_match_round_trip() {
        let mut o = orchestrator();
        ready_custom(&mut o);

        let effects = o.trigger_manual_match();
        let request = match &effects[..] {
            [Effect::MatchCustom { request, .. }] => *request,
            other => panic!("unexpected effects: {:?}", other),
        };
        assert!(o.is_matching());
        assert!(o.trigger_manual_match().is_empty());
        assert!(o.custom_download().is_none());

        o.finish_custom_match(request, Ok(composite()));
        assert!(!o.is_matching());
        assert!(o.custom_download().is_some());
    }

    #[test]
    fn test_manual_match_failure() {
        let mut o = orchestrator();
        ready_custom(&mut o);
        let request = match &o.trigger_manual_match()[..] {
            [Effect::MatchCustom { request, .. }] => *request,
            other => panic!("unexpected effects: {:?}", other),
        };

        o.finish_custom_match(request, Err(failure(Operation::Match)));
        assert!(!o.is_matching());
        assert!(o.custom().result.is_none());
        assert!(o.notice().is_open());
    }

    #[test]
    fn test_flows_are_independent() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        o.drop_on(Slot::General, drag(&dress(1)));
        o.select_tab(Tab::Custom);

        assert!(o.is_auto_processing());
        assert!(!o.is_matching());
        assert!(o.general().asset().is_some());
        assert!(o.custom().full_body.is_none());
    }

    #[test]
    fn test_reset_clears_everything_and_stales_responses() {
        let mut o = orchestrator();
        o.submit_file(Slot::General, photo());
        let (auto, _, _) = auto_matches(&o.drop_on(Slot::General, drag(&dress(1))))[0].clone();
        o.submit_file(Slot::FullBody, photo());
        o.submit_file(Slot::Dress, photo());
        let bg = removal_request(&o.remove_background());
        o.trigger_manual_match();

        o.back_to_landing();
        assert_eq!(o.page(), Page::Landing);
        assert_eq!(o.general(), &GeneralFlow::Idle);
        assert_eq!(o.custom(), &CustomFlow::default());
        assert!(o.selected_item().is_none());
        assert!(!o.notice().is_open());

        o.enter_fitting();
        o.finish_auto_match(auto, Ok(composite()));
        o.finish_background_removal(bg, Ok(removal()));
        assert_eq!(o.general(), &GeneralFlow::Idle);
        assert_eq!(o.custom().dress, DressSlot::Empty);
    }

    #[test]
    fn test_preview_follows_asset() {
        let mut o = orchestrator();
        let effects = o.submit_file(Slot::FullBody, photo());
        let (ticket, asset) = match &effects[..] {
            [Effect::RenderPreview { ticket, asset }] => (*ticket, asset.clone()),
            other => panic!("unexpected effects: {:?}", other),
        };

        o.complete_preview(ticket, render_blocking(&asset));
        assert!(o.intake(Slot::FullBody).preview().is_some());

        o.remove(Slot::FullBody);
        assert!(o.intake(Slot::FullBody).preview().is_none());
        assert!(o.custom().full_body.is_none());
    }

    #[test]
    fn test_marker_timer_for_old_generation_is_ignored() {
        let mut o = orchestrator();
        ready_custom(&mut o);
        let first = match &o.trigger_manual_match()[..] {
            [Effect::MatchCustom { request, .. }] => *request,
            _ => unreachable!(),
        };
        let old_generation = match &o.finish_custom_match(first, Ok(composite()))[..] {
            [Effect::ClearSuccessMarker { generation, .. }] => *generation,
            _ => unreachable!(),
        };

        let second = match &o.trigger_manual_match()[..] {
            [Effect::MatchCustom { request, .. }] => *request,
            _ => unreachable!(),
        };
        o.finish_custom_match(second, Ok(composite()));

        o.clear_success_marker(old_generation);
        assert!(o.success_marker_visible());
    }
}
