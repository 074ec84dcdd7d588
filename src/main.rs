use std::path::PathBuf;
use std::sync::Arc;

use iced::event::{self, Event};
use iced::widget::scrollable::{self, RelativeOffset, Viewport};
use iced::widget::{button, column, container, image, row, stack, text, Column};
use iced::{mouse, window, Alignment, ContentFit, Element, Length, Point, Rectangle, Subscription, Task, Theme};
use log::LevelFilter;
use rfd::AsyncFileDialog;

mod config;
mod error;
mod service;
mod state;
mod ui;

use config::{AppConfig, CatalogSource};
use error::{PreviewError, ServiceError};
use service::{BackgroundRemoval, CompositeResult, DressRef, ServiceClient};
use state::catalog::{builtin_items, CatalogSelector, Direction};
use state::data::{AssetId, CatalogItem, Category, RawFile, RequestId, ResultImage, UploadedAsset};
use state::fitting::{Effect, Orchestrator, Page, Tab, UPLOAD_REQUIRED_MESSAGE};
use state::intake::{DropPayload, Point as DropPoint, PreviewTicket, Rect, Slot};
use state::preview::{self, Preview};
use ui::catalog::Measurement;
use ui::images::HandleCache;

/// Main application state
struct DressFitter {
    client: ServiceClient,
    /// Session state of the fitting page
    fitting: Orchestrator,
    catalog: CatalogSelector,
    handles: HandleCache,
    /// Serialized card being dragged with the mouse
    carrying: Option<String>,
    /// Zone under the pointer, as reported by the zones themselves
    hovered_zone: Option<Slot>,
    /// An OS file drag is over the window
    file_hovering: bool,
    cursor: Point,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    StartFitting,
    BackToLanding,
    SelectTab(Tab),

    // Uploads
    PickFile(Slot),
    FilePicked {
        slot: Slot,
        generation: u64,
        file: Option<RawFile>,
    },
    RemoveAsset(Slot),
    PreviewRendered(PreviewTicket, Result<Preview, PreviewError>),

    // Drag and drop
    CursorMoved(Point),
    ZoneEntered(Slot),
    ZoneExited(Slot),
    ZoneBoundsMeasured(Slot, Option<Rectangle>),
    ZoneReleased(Slot),
    PointerReleased,
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    DroppedFileRead(Slot, Result<RawFile, String>),

    // Catalog
    CatalogLoaded(Result<Vec<CatalogItem>, ServiceError>),
    ThumbnailLoaded(i64, Result<UploadedAsset, ServiceError>),
    FilterCategory(Category),
    ShiftCategories(Direction),
    CatalogScrolled(Viewport),
    CardsMeasured(Measurement),
    CardPressed(i64),
    CardReleased,
    SliderDragged(f32),
    SliderReleased,
    StepSlider(Direction),

    // Service round trips
    AutoMatched(RequestId, Result<CompositeResult, ServiceError>),
    RemoveBackground,
    BackgroundRemoved(RequestId, Result<BackgroundRemoval, ServiceError>),
    ManualMatch,
    CustomMatched(RequestId, Result<CompositeResult, ServiceError>),
    HealthChecked(Result<serde_json::Value, ServiceError>),

    // Dialogs
    CloseNotice,
    DismissUploadDialog,
    ClearSuccessMarker(u64),

    // Downloads
    Download(Tab),
    Saved(Result<Option<PathBuf>, String>),
}

impl DressFitter {
    /// Create a new instance of the application
    fn new(config: AppConfig, client: ServiceClient) -> (Self, Task<Message>) {
        log::info!("👰 Dress Fitter using backend {}", client.base_url());

        let fitting = Orchestrator::new(config.ui.success_marker);
        let catalog = CatalogSelector::new(config.catalog.page_size, config.catalog.page_increment);

        let load_catalog = match config.catalog.source {
            CatalogSource::Remote => {
                let client = client.clone();
                Task::perform(
                    async move { client.list_catalog().await },
                    Message::CatalogLoaded,
                )
            }
            CatalogSource::Builtin => Task::done(Message::CatalogLoaded(Ok(builtin_items()))),
        };

        let health = {
            let client = client.clone();
            Task::perform(async move { client.health().await }, Message::HealthChecked)
        };

        (
            DressFitter {
                client,
                fitting,
                catalog,
                handles: HandleCache::default(),
                carrying: None,
                hovered_zone: None,
                file_hovering: false,
                cursor: Point::ORIGIN,
            },
            Task::batch([load_catalog, health]),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        // Keep image handles in step with whatever is now on screen
        self.handles.sync(live_images(&self.fitting));
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartFitting => {
                self.fitting.enter_fitting();
                Task::none()
            }
            Message::BackToLanding => {
                self.fitting.back_to_landing();
                self.carrying = None;
                Task::none()
            }
            Message::SelectTab(tab) => {
                self.fitting.select_tab(tab);
                Task::none()
            }

            Message::PickFile(slot) => {
                let generation = self.fitting.intake(slot).input_generation();
                Task::perform(pick_image(), move |file| Message::FilePicked {
                    slot,
                    generation,
                    file,
                })
            }
            Message::FilePicked {
                slot,
                generation,
                file,
            } => {
                let Some(file) = file else {
                    return Task::none();
                };
                // The zone was cleared while the dialog was open
                if generation != self.fitting.intake(slot).input_generation() {
                    log::debug!("{:?}: discarding file picked before removal", slot);
                    return Task::none();
                }
                let effects = self.fitting.submit_file(slot, file);
                self.run_effects(effects)
            }
            Message::RemoveAsset(slot) => {
                let effects = self.fitting.remove(slot);
                self.run_effects(effects)
            }
            Message::PreviewRendered(ticket, result) => {
                self.fitting.complete_preview(ticket, result);
                Task::none()
            }

            Message::CursorMoved(position) => {
                self.cursor = position;
                Task::none()
            }
            Message::ZoneEntered(slot) => {
                self.hovered_zone = Some(slot);
                if self.carrying.is_some() || self.file_hovering {
                    self.fitting.drag_over(slot);
                }
                Task::none()
            }
            Message::ZoneExited(slot) => {
                if self.hovered_zone == Some(slot) {
                    self.hovered_zone = None;
                }
                self.measure_zone(slot)
            }
            Message::ZoneBoundsMeasured(slot, bounds) => {
                let bounds = bounds.map(to_rect).unwrap_or(Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 0.0,
                    height: 0.0,
                });
                let pointer = DropPoint {
                    x: self.cursor.x,
                    y: self.cursor.y,
                };
                self.fitting.drag_leave(slot, pointer, bounds);
                Task::none()
            }
            Message::ZoneReleased(slot) => match self.carrying.take() {
                Some(json) => {
                    let effects = self.fitting.drop_on(
                        slot,
                        DropPayload {
                            json: Some(json),
                            file: None,
                        },
                    );
                    self.run_effects(effects)
                }
                None => Task::none(),
            },
            Message::PointerReleased | Message::CardReleased => {
                self.carrying = None;
                Task::none()
            }
            Message::FileHovered => {
                self.file_hovering = true;
                if let Some(slot) = self.hovered_zone {
                    self.fitting.drag_over(slot);
                }
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.file_hovering = false;
                match self.hovered_zone {
                    Some(slot) => self.measure_zone(slot),
                    None => Task::none(),
                }
            }
            Message::FileDropped(path) => {
                self.file_hovering = false;
                let slot = match (self.hovered_zone, self.fitting.tab()) {
                    (Some(slot), _) => slot,
                    (None, Tab::General) => Slot::General,
                    (None, Tab::Custom) => {
                        log::debug!("File dropped outside any zone: {}", path.display());
                        return Task::none();
                    }
                };
                Task::perform(read_dropped(path), move |result| {
                    Message::DroppedFileRead(slot, result)
                })
            }
            Message::DroppedFileRead(slot, result) => match result {
                Ok(file) => {
                    let effects = self.fitting.drop_on(
                        slot,
                        DropPayload {
                            json: None,
                            file: Some(file),
                        },
                    );
                    self.run_effects(effects)
                }
                Err(e) => {
                    log::warn!("⚠️  {}", e);
                    Task::none()
                }
            },

            Message::CatalogLoaded(result) => {
                self.catalog.finish_load(result);
                self.handles.clear_thumbnails();
                Task::batch([self.load_thumbnails(), self.measure_cards()])
            }
            Message::ThumbnailLoaded(id, result) => {
                self.handles.finish_thumbnail(id, result);
                Task::none()
            }
            Message::FilterCategory(category) => {
                self.catalog.filter_by_category(category);
                Task::batch([
                    scrollable::snap_to(ui::catalog::viewport_id(), RelativeOffset::START),
                    self.load_thumbnails(),
                    self.measure_cards(),
                ])
            }
            Message::ShiftCategories(direction) => {
                self.catalog.shift_categories(direction);
                Task::none()
            }
            Message::CatalogScrolled(viewport) => {
                let expanded = self.catalog.on_scroll(ui::catalog::scroll_metrics(&viewport));
                let thumbnails = if expanded {
                    self.load_thumbnails()
                } else {
                    Task::none()
                };
                Task::batch([thumbnails, self.measure_cards()])
            }
            Message::CardsMeasured(measurement) => {
                if let Some(id) = self.catalog.track_topmost(&measurement) {
                    log::debug!("Topmost dress is now {}", id);
                    self.fitting.focus_item(id);
                }
                Task::none()
            }
            Message::CardPressed(id) => {
                let Some(item) = self.catalog.item(id).cloned() else {
                    return Task::none();
                };
                self.carrying = match self.catalog.initiate_drag(&item) {
                    Ok(payload) => {
                        log::debug!("Dragging dress {} as {}", id, payload.mime);
                        Some(payload.data)
                    }
                    Err(e) => {
                        log::warn!("⚠️  {}", e);
                        None
                    }
                };
                self.fitting.select_item(item);
                Task::none()
            }
            Message::SliderDragged(position) => {
                self.catalog.begin_slider_drag();
                let y = self.catalog.drag_slider_to(position);
                scrollable::snap_to(ui::catalog::viewport_id(), RelativeOffset { x: 0.0, y })
            }
            Message::SliderReleased => {
                self.catalog.end_slider_drag();
                Task::none()
            }
            Message::StepSlider(direction) => {
                let y = self.catalog.step_slider(direction);
                scrollable::snap_to(ui::catalog::viewport_id(), RelativeOffset { x: 0.0, y })
            }

            Message::AutoMatched(request, result) => {
                let effects = self.fitting.finish_auto_match(request, result);
                self.run_effects(effects)
            }
            Message::RemoveBackground => {
                let effects = self.fitting.remove_background();
                self.run_effects(effects)
            }
            Message::BackgroundRemoved(request, result) => {
                let effects = self.fitting.finish_background_removal(request, result);
                self.run_effects(effects)
            }
            Message::ManualMatch => {
                let effects = self.fitting.trigger_manual_match();
                self.run_effects(effects)
            }
            Message::CustomMatched(request, result) => {
                let effects = self.fitting.finish_custom_match(request, result);
                self.run_effects(effects)
            }
            Message::HealthChecked(result) => {
                match result {
                    Ok(status) => log::info!("✅ Backend healthy: {}", status),
                    Err(e) => log::warn!("⚠️  Backend unreachable: {}", e),
                }
                Task::none()
            }

            Message::CloseNotice => {
                self.fitting.close_notice();
                Task::none()
            }
            Message::DismissUploadDialog => {
                self.fitting.dismiss_upload_dialog();
                Task::none()
            }
            Message::ClearSuccessMarker(generation) => {
                self.fitting.clear_success_marker(generation);
                Task::none()
            }

            Message::Download(tab) => {
                let result = match tab {
                    Tab::General => self.fitting.general_download(),
                    Tab::Custom => self.fitting.custom_download(),
                };
                match result {
                    Some(result) => {
                        let file_name = download_name(result);
                        Task::perform(
                            save_result(file_name, result.image.bytes.clone()),
                            Message::Saved,
                        )
                    }
                    None => Task::none(),
                }
            }
            Message::Saved(result) => {
                match result {
                    Ok(Some(path)) => log::info!("💾 Saved result to {}", path.display()),
                    Ok(None) => log::debug!("Save cancelled"),
                    Err(e) => {
                        log::error!("❌ {}", e);
                        self.fitting.notify(format!("저장 중 오류가 발생했습니다: {e}"));
                    }
                }
                Task::none()
            }
        }
    }

    /// Start the asynchronous work requested by the orchestrator
    fn run_effects(&self, effects: Vec<Effect>) -> Task<Message> {
        Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
    }

    fn run_effect(&self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::RenderPreview { ticket, asset } => {
                Task::perform(preview::render(asset), move |result| {
                    Message::PreviewRendered(ticket, result)
                })
            }
            Effect::MatchAutomatic {
                request,
                person,
                item,
            } => {
                let client = self.client.clone();
                let dress = match self.handles.dress(item.id) {
                    Some(asset) => DressRef::Asset(asset.clone()),
                    None => DressRef::Catalog(item),
                };
                Task::perform(
                    async move { client.match_automatic(person, dress).await },
                    move |result| Message::AutoMatched(request, result),
                )
            }
            Effect::RemoveBackground { request, asset } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.remove_background(asset).await },
                    move |result| Message::BackgroundRemoved(request, result),
                )
            }
            Effect::MatchCustom {
                request,
                full_body,
                dress,
            } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.match_custom(full_body, dress).await },
                    move |result| Message::CustomMatched(request, result),
                )
            }
            Effect::ClearSuccessMarker { generation, after } => {
                Task::perform(tokio::time::sleep(after), move |_| {
                    Message::ClearSuccessMarker(generation)
                })
            }
        }
    }

    fn measure_zone(&self, slot: Slot) -> Task<Message> {
        container::visible_bounds(ui::intake::zone_id(slot))
            .map(move |bounds| Message::ZoneBoundsMeasured(slot, bounds))
    }

    fn measure_cards(&self) -> Task<Message> {
        let ids = self.catalog.visible().map(|item| item.id).collect();
        ui::catalog::measure(ids).map(Message::CardsMeasured)
    }

    /// Fetch thumbnails for rendered cards that have none yet
    fn load_thumbnails(&mut self) -> Task<Message> {
        let pending: Vec<CatalogItem> = self
            .catalog
            .visible()
            .filter(|item| self.handles.thumbnail(item.id).is_none())
            .cloned()
            .collect();

        Task::batch(pending.into_iter().map(|item| {
            self.handles.request_thumbnail(item.id);
            let client = self.client.clone();
            let id = item.id;
            Task::perform(
                async move { client.fetch_dress_image(&item).await },
                move |result| Message::ThumbnailLoaded(id, result),
            )
        }))
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let page = match self.fitting.page() {
            Page::Landing => self.landing(),
            Page::Fitting => self.fitting_page(),
        };

        let page = if self.fitting.upload_dialog_open() {
            ui::modal::modal(
                page,
                ui::modal::dialog(
                    UPLOAD_REQUIRED_MESSAGE,
                    Some(("사진 업로드", Message::PickFile(Slot::General))),
                    Message::DismissUploadDialog,
                ),
                Message::DismissUploadDialog,
            )
        } else {
            page
        };

        match self.fitting.notice().message() {
            Some(message) => ui::modal::modal(
                page,
                ui::modal::dialog(message, None, Message::CloseNotice),
                Message::CloseNotice,
            ),
            None => page,
        }
    }

    fn landing(&self) -> Element<Message> {
        let content: Column<Message> = column![
            text("AI 웨딩드레스 피팅").size(48),
            text("드레스를 골라 사진 위에 놓으면 AI가 입혀 드립니다").size(18),
            button(text("피팅 시작하기").size(18))
                .on_press(Message::StartFitting)
                .padding([12, 28]),
        ]
        .spacing(24)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn fitting_page(&self) -> Element<Message> {
        let tab_button = |label: &'static str, tab: Tab| {
            let style: fn(&Theme, button::Status) -> button::Style = if self.fitting.tab() == tab {
                button::primary
            } else {
                button::secondary
            };
            button(text(label))
                .on_press(Message::SelectTab(tab))
                .style(style)
                .padding([8, 18])
        };

        let header = row![
            button(text("← 처음으로"))
                .on_press(Message::BackToLanding)
                .style(button::text),
            tab_button("일반 피팅", Tab::General),
            tab_button("커스텀 피팅", Tab::Custom),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let body = match self.fitting.tab() {
            Tab::General => self.general_tab(),
            Tab::Custom => self.custom_tab(),
        };

        column![header, body].spacing(16).padding(20).into()
    }

    fn general_tab(&self) -> Element<Message> {
        let status: Element<Message> = if self.fitting.is_auto_processing() {
            text("AI가 드레스를 입히는 중...").into()
        } else {
            match self.fitting.selected_item() {
                Some(item) => text(format!("선택한 드레스: {}", item.display_name)).into(),
                None => text("드레스를 사진 위로 끌어다 놓으세요").into(),
            }
        };

        let photo = column![
            text("내 사진").size(20),
            ui::intake::view(
                self.fitting.intake(Slot::General),
                &self.handles,
                "전신 사진을 올려주세요",
            ),
            status,
        ]
        .spacing(10)
        .width(Length::FillPortion(3));

        let result = self.result_panel(self.fitting.general_download(), Tab::General);

        row![
            container(ui::catalog::view(
                &self.catalog,
                self.fitting.selected_item().map(|item| item.id),
                self.fitting.focused_item(),
                &self.handles,
            ))
            .width(Length::FillPortion(4)),
            photo,
            result,
        ]
        .spacing(20)
        .height(Length::Fill)
        .into()
    }

    fn custom_tab(&self) -> Element<Message> {
        let full_body = column![
            text("전신 사진").size(20),
            ui::intake::view(
                self.fitting.intake(Slot::FullBody),
                &self.handles,
                "전신 사진을 올려주세요",
            ),
        ]
        .spacing(10)
        .width(Length::FillPortion(1));

        let removal_status = if self.fitting.is_removing_background() {
            "배경 제거 중..."
        } else if self.fitting.is_background_removed() {
            "배경 제거 완료"
        } else {
            ""
        };
        let can_remove = matches!(
            self.fitting.custom().dress,
            state::fitting::DressSlot::Original(_)
        );

        let dress = column![
            text("드레스 사진").size(20),
            ui::intake::view(
                self.fitting.intake(Slot::Dress),
                &self.handles,
                "드레스 사진을 올려주세요",
            ),
            row![
                button(text("배경 지우기"))
                    .on_press_maybe(can_remove.then_some(Message::RemoveBackground))
                    .padding([8, 16]),
                text(removal_status),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(10)
        .width(Length::FillPortion(1));

        let match_label = if self.fitting.is_matching() {
            "매칭 중..."
        } else {
            "매칭하기"
        };
        let inputs = column![
            row![full_body, dress].spacing(16).height(Length::Fill),
            button(text(match_label).size(18))
                .on_press_maybe((!self.fitting.is_matching()).then_some(Message::ManualMatch))
                .padding([10, 24]),
        ]
        .spacing(16)
        .align_x(Alignment::Center)
        .width(Length::FillPortion(2));

        row![
            inputs,
            self.result_panel(self.fitting.custom_download(), Tab::Custom)
        ]
        .spacing(20)
        .height(Length::Fill)
        .into()
    }

    fn result_panel(&self, result: Option<&ResultImage>, tab: Tab) -> Element<Message> {
        let picture: Element<Message> = match result.and_then(|r| self.handles.asset(r.image.id())) {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("결과가 여기에 표시됩니다"))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let picture: Element<Message> = if self.fitting.success_marker_visible() && result.is_some() {
            stack![
                picture,
                container(ui::checkmark::view(72.0))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill),
            ]
            .into()
        } else {
            picture
        };

        column![
            text("결과").size(20),
            container(picture)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(container::bordered_box),
            button(text("다운로드"))
                .on_press_maybe(result.map(|_| Message::Download(tab)))
                .padding([8, 16]),
        ]
        .spacing(10)
        .width(Length::FillPortion(3))
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| match event {
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                Some(Message::CursorMoved(position))
            }
            // Releases over a zone or a card are handled by those widgets
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if status == event::Status::Ignored =>
            {
                Some(Message::PointerReleased)
            }
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Images currently displayed: zone previews and both results
fn live_images(fitting: &Orchestrator) -> Vec<(AssetId, &[u8])> {
    let previews = [Slot::General, Slot::FullBody, Slot::Dress]
        .into_iter()
        .filter_map(|slot| fitting.intake(slot).preview())
        .map(|p| (p.asset_id, &p.png[..]));

    let results = [fitting.general().result(), fitting.custom().result.as_ref()]
        .into_iter()
        .flatten()
        .map(|r| (r.image.id(), &r.image.bytes[..]));

    previews.chain(results).collect()
}

fn to_rect(bounds: Rectangle) -> Rect {
    Rect {
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
    }
}

fn download_name(result: &ResultImage) -> String {
    format!(
        "wedding-dress-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        result.extension()
    )
}

/// Show the native file picker for images
async fn pick_image() -> Option<RawFile> {
    let handle = AsyncFileDialog::new()
        .set_title("이미지 선택")
        .add_filter("이미지", &["png", "jpg", "jpeg", "webp", "gif", "bmp"])
        .pick_file()
        .await?;

    let name = handle.file_name();
    let bytes = handle.read().await;
    log::debug!("Picked {} ({}KB)", name, bytes.len() / 1024);
    Some(RawFile::new(Some(name), None, bytes))
}

/// Read a file dropped onto the window
async fn read_dropped(path: PathBuf) -> Result<RawFile, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string());
    Ok(RawFile::new(name, None, bytes))
}

/// Ask where to save a result and write it there
async fn save_result(file_name: String, bytes: Arc<[u8]>) -> Result<Option<PathBuf>, String> {
    let Some(handle) = AsyncFileDialog::new()
        .set_title("결과 저장")
        .set_file_name(&file_name)
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    tokio::fs::write(&path, &bytes[..])
        .await
        .map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;
    Ok(Some(path))
}

/// Initialise env_logger. `RUST_LOG` takes precedence over `level`.
///
/// Without `RUST_LOG` the logger itself accepts every level and the global
/// max level gates records, so it can be changed once the config is loaded.
fn init_logging(level: LevelFilter) -> bool {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(LevelFilter::Trace.as_str()),
    );
    // Renderer internals are noisy below warn
    builder
        .filter_module("wgpu_core", LevelFilter::Warn)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .filter_module("naga", LevelFilter::Warn);

    let _ = builder.try_init();
    if !from_env {
        log::set_max_level(level);
    }
    from_env
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Loading the config already logs, so start at the default level
    let from_env = init_logging(AppConfig::default().log_level);
    let config = AppConfig::load();
    if !from_env {
        log::set_max_level(config.log_level);
    }
    log::debug!("Resolved config: {:?}", config);

    let client = ServiceClient::new(&config.api)?;

    iced::application("Dress Fitter", DressFitter::update, DressFitter::view)
        .subscription(DressFitter::subscription)
        .theme(DressFitter::theme)
        .window_size((1360.0, 880.0))
        .centered()
        .run_with(move || DressFitter::new(config, client))?;

    Ok(())
}
