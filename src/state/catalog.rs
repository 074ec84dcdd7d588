/// Catalog selector state
///
/// All items are loaded up front; the selector filters them by category,
/// reveals them page by page as the list is scrolled, keeps a custom
/// slider in step with the scroll position, and tracks which card sits at
/// the top of the viewport.
use super::data::{CatalogItem, Category};
use crate::error::{PayloadError, ServiceError};

/// Scrolled share (percent) past which another page is revealed
const EXPAND_THRESHOLD: f32 = 80.0;
/// Slider arrow step in percent
const SLIDER_STEP: f32 = 10.0;
/// Category buttons visible at once
pub const CATEGORIES_PER_VIEW: usize = 4;

pub const DRAG_MIME: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Scroll geometry reported by the list container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub content_height: f32,
    pub viewport_height: f32,
}

impl ScrollMetrics {
    /// Scrolled share in percent; `None` when the content fits
    pub fn percent(&self) -> Option<f32> {
        let max_scroll = self.content_height - self.viewport_height;
        if max_scroll > 0.0 {
            Some((self.offset / max_scroll * 100.0).clamp(0.0, 100.0))
        } else {
            None
        }
    }
}

/// Laid-out vertical extent of one card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    pub id: i64,
    pub top: f32,
    pub bottom: f32,
}

/// Post-layout measurement of the rendered cards
pub trait VisibleItemQuery {
    fn viewport_top(&self) -> Option<f32>;
    fn item_bounds(&self) -> Vec<ItemBounds>;
}

/// The card whose top edge is closest to, and not below, the viewport top.
/// Ties go to the earlier card.
pub fn topmost_visible(viewport_top: f32, items: &[ItemBounds]) -> Option<i64> {
    items
        .iter()
        .filter(|b| b.top <= viewport_top)
        .fold(None::<&ItemBounds>, |best, b| match best {
            Some(best) if best.top >= b.top => Some(best),
            _ => Some(b),
        })
        .map(|b| b.id)
}

/// Data attached to a card drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragPayload {
    pub mime: &'static str,
    pub data: String,
    pub effect: DropEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug)]
pub struct CatalogSelector {
    load: LoadState,
    items: Vec<CatalogItem>,
    category: Category,
    page_size: usize,
    page_increment: usize,
    display_count: usize,
    category_start: usize,
    /// 0 = top, 100 = bottom
    slider: f32,
    slider_dragging: bool,
    topmost: Option<i64>,
}

impl CatalogSelector {
    pub fn new(page_size: usize, page_increment: usize) -> Self {
        Self {
            load: LoadState::Loading,
            items: Vec::new(),
            category: Category::All,
            page_size,
            page_increment,
            display_count: page_size,
            category_start: 0,
            slider: 0.0,
            slider_dragging: false,
            topmost: None,
        }
    }

    /// Store the loaded list; a failure leaves an empty list and an error
    pub fn finish_load(&mut self, result: Result<Vec<CatalogItem>, ServiceError>) {
        match result {
            Ok(items) => {
                log::info!("📚 Catalog ready with {} dresses", items.len());
                self.items = items;
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                log::error!("❌ Catalog load failed: {}", e);
                self.items.clear();
                self.load = LoadState::Failed(e.message);
            }
        }
        self.display_count = self.page_size;
        self.topmost = None;
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn category(&self) -> Category {
        self.category
    }

    #[cfg(test)]
    pub fn display_count(&self) -> usize {
        self.display_count
    }

    pub fn slider_position(&self) -> f32 {
        self.slider
    }

    pub fn item(&self, id: i64) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn filtered(&self) -> impl Iterator<Item = &CatalogItem> {
        let category = self.category;
        self.items
            .iter()
            .filter(move |item| category == Category::All || item.category == category)
    }

    /// Cards currently rendered
    pub fn visible(&self) -> impl Iterator<Item = &CatalogItem> {
        self.filtered().take(self.display_count)
    }

    pub fn filter_by_category(&mut self, category: Category) {
        self.category = category;
        self.display_count = self.page_size;
        self.topmost = None;
    }

    /// Handle a scroll tick. Returns `true` when more cards were revealed.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        let Some(percent) = metrics.percent() else {
            return false;
        };

        if !self.slider_dragging {
            self.slider = percent;
        }

        let total = self.filtered().count();
        if percent > EXPAND_THRESHOLD && self.display_count < total {
            self.display_count = (self.display_count + self.page_increment).min(total);
            log::debug!("Revealed {} of {} dresses", self.display_count, total);
            return true;
        }
        false
    }

    pub fn initiate_drag(&self, item: &CatalogItem) -> Result<DragPayload, PayloadError> {
        Ok(DragPayload {
            mime: DRAG_MIME,
            data: serde_json::to_string(item)?,
            effect: DropEffect::Copy,
        })
    }

    pub fn begin_slider_drag(&mut self) {
        self.slider_dragging = true;
    }

    /// Move the slider; returns the relative scroll offset (0..=1) to apply
    pub fn drag_slider_to(&mut self, percent: f32) -> f32 {
        self.slider = percent.clamp(0.0, 100.0);
        self.slider / 100.0
    }

    pub fn end_slider_drag(&mut self) {
        self.slider_dragging = false;
    }

    /// Arrow buttons; returns the relative scroll offset to apply
    pub fn step_slider(&mut self, direction: Direction) -> f32 {
        let delta = match direction {
            Direction::Prev => -SLIDER_STEP,
            Direction::Next => SLIDER_STEP,
        };
        self.slider = (self.slider + delta).clamp(0.0, 100.0);
        self.slider / 100.0
    }

    /// Re-measure the topmost card; returns its id when it changed
    pub fn track_topmost(&mut self, query: &impl VisibleItemQuery) -> Option<i64> {
        let top = query.viewport_top()?;
        let current = topmost_visible(top, &query.item_bounds());
        if current.is_some() && current != self.topmost {
            self.topmost = current;
            return current;
        }
        None
    }

    pub fn visible_categories(&self) -> &[Category] {
        let all: &'static [Category] = &Category::ALL;
        let end = (self.category_start + CATEGORIES_PER_VIEW).min(all.len());
        &all[self.category_start..end]
    }

    pub fn can_shift_categories(&self, direction: Direction) -> bool {
        match direction {
            Direction::Prev => self.category_start > 0,
            Direction::Next => self.category_start < max_category_start(),
        }
    }

    /// Slide the category buttons by one
    pub fn shift_categories(&mut self, direction: Direction) {
        if self.can_shift_categories(direction) {
            match direction {
                Direction::Prev => self.category_start -= 1,
                Direction::Next => self.category_start += 1,
            }
        }
    }
}

fn max_category_start() -> usize {
    Category::ALL.len().saturating_sub(CATEGORIES_PER_VIEW)
}

/// Static catalog used when the backend list is not wanted
pub fn builtin_items() -> Vec<CatalogItem> {
    let unsplash = |id: &str| format!("https://images.unsplash.com/photo-{id}?w=400&h=600&fit=crop");
    let entry = |id: i64, name: &str, image_ref: String, description: &str, category| CatalogItem {
        id,
        display_name: name.to_string(),
        image_ref,
        category,
        description: description.to_string(),
    };

    vec![
        entry(1, "클래식 벨라인", unsplash("1519741497674-611481863552"), "우아하고 클래식한 벨라인", Category::Ballgown),
        entry(2, "로맨틱 엠파이어", unsplash("1594552072238-6d1e1a92f5e9"), "우아한 엠파이어 라인", Category::Empire),
        entry(3, "모던 머메이드", unsplash("1591604129853-0f9f1a6b3a07"), "섹시하고 현대적인 실루엣", Category::Mermaid),
        entry(4, "큐트 미니드레스", unsplash("1600285225588-7bb71e68e5fb"), "발랄하고 경쾌한 미니", Category::Mini),
        entry(5, "심플 A라인", unsplash("1617019114583-affb34d1b3cd"), "깔끔하고 세련된 A라인", Category::Aline),
        entry(6, "글래머러스 프린세스", unsplash("1595959183082-7b570b7e08e2"), "화려하고 볼륨감 있는 스타일", Category::Princess),
        entry(7, "엘레강스 벨라인", unsplash("1519741497674-611481863552"), "우아한 벨라인 실루엣", Category::Ballgown),
        entry(8, "드림 프린세스", unsplash("1594552072238-6d1e1a92f5e9"), "꿈같은 프린세스 라인", Category::Princess),
        entry(9, "화이트 레이스 드레스", "/images/dress1.jpg".to_string(), "우아한 화이트 레이스 드레스", Category::Ballgown),
    ]
}
