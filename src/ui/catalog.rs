/// Dress catalog panel
///
/// Category carousel on top, a scrollable grid of dress cards, and a
/// vertical slider with arrow buttons that mirrors the scroll position.
use iced::widget::scrollable::Viewport;
use iced::widget::{
    button, column, container, image, mouse_area, row, scrollable, text, vertical_slider, Column,
};
use iced::{Alignment, Border, ContentFit, Element, Length, Rectangle, Task, Theme};
use iced_aw::Wrap;

use super::images::{HandleCache, Thumbnail};
use crate::state::catalog::{
    CatalogSelector, Direction, ItemBounds, LoadState, ScrollMetrics, VisibleItemQuery,
};
use crate::state::data::CatalogItem;
use crate::Message;

const CARD_WIDTH: f32 = 150.0;
const THUMBNAIL_HEIGHT: f32 = 200.0;

pub fn viewport_id() -> scrollable::Id {
    scrollable::Id::new("catalog-scroll")
}

fn viewport_bounds_id() -> container::Id {
    container::Id::new("catalog-viewport")
}

fn card_id(id: i64) -> container::Id {
    container::Id::new(format!("dress-card-{id}"))
}

/// Scroll geometry from an iced viewport
pub fn scroll_metrics(viewport: &Viewport) -> ScrollMetrics {
    ScrollMetrics {
        offset: viewport.absolute_offset().y,
        content_height: viewport.content_bounds().height,
        viewport_height: viewport.bounds().height,
    }
}

/// Laid-out bounds of the list viewport and of the rendered cards, in
/// window coordinates. Cards scrolled out of view have no bounds.
#[derive(Debug, Clone, Default)]
pub struct Measurement {
    viewport: Option<Rectangle>,
    cards: Vec<(i64, Rectangle)>,
}

impl Measurement {
    /// `None` ids are the viewport itself
    pub fn from_bounds(bounds: Vec<(Option<i64>, Option<Rectangle>)>) -> Self {
        let mut measurement = Self::default();
        for entry in bounds {
            match entry {
                (None, rect) => measurement.viewport = rect,
                (Some(id), Some(rect)) => measurement.cards.push((id, rect)),
                (Some(_), None) => {}
            }
        }
        measurement
    }
}

impl VisibleItemQuery for Measurement {
    fn viewport_top(&self) -> Option<f32> {
        self.viewport.map(|r| r.y)
    }

    fn item_bounds(&self) -> Vec<ItemBounds> {
        self.cards
            .iter()
            .map(|(id, r)| ItemBounds {
                id: *id,
                top: r.y,
                bottom: r.y + r.height,
            })
            .collect()
    }
}

/// Measure the viewport and the given cards after layout
pub fn measure(ids: Vec<i64>) -> Task<Measurement> {
    let viewport = container::visible_bounds(viewport_bounds_id()).map(|rect| (None, rect));
    let cards = ids
        .into_iter()
        .map(|id| container::visible_bounds(card_id(id)).map(move |rect| (Some(id), rect)));

    Task::batch(std::iter::once(viewport).chain(cards))
        .collect()
        .map(Measurement::from_bounds)
}

pub fn view<'a>(
    catalog: &'a CatalogSelector,
    selected: Option<i64>,
    focused: Option<i64>,
    handles: &'a HandleCache,
) -> Element<'a, Message> {
    let list: Element<'a, Message> = match catalog.load_state() {
        LoadState::Loading => text("드레스 목록을 불러오는 중...").into(),
        LoadState::Failed(message) => {
            text(format!("드레스 목록을 불러오지 못했습니다: {message}")).into()
        }
        LoadState::Loaded => {
            let cards: Vec<Element<'a, Message>> = catalog
                .visible()
                .map(|item| card(item, selected, focused, handles))
                .collect();

            if cards.is_empty() {
                text("해당 카테고리의 드레스가 없습니다").into()
            } else {
                let grid = Wrap::with_elements(cards).spacing(12.0).line_spacing(12.0);
                container(
                    scrollable(grid)
                        .id(viewport_id())
                        .on_scroll(Message::CatalogScrolled)
                        .width(Length::Fill)
                        .height(Length::Fill),
                )
                .id(viewport_bounds_id())
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
            }
        }
    };

    column![
        categories(catalog),
        row![list, slider(catalog)].spacing(8).height(Length::Fill),
    ]
    .spacing(12)
    .into()
}

fn categories(catalog: &CatalogSelector) -> Element<'_, Message> {
    let arrow = |label: &'static str, direction: Direction| {
        button(text(label))
            .on_press_maybe(
                catalog
                    .can_shift_categories(direction)
                    .then_some(Message::ShiftCategories(direction)),
            )
            .style(button::text)
    };

    let mut buttons = row![arrow("‹", Direction::Prev)]
        .spacing(6)
        .align_y(Alignment::Center);

    for &category in catalog.visible_categories() {
        let style: fn(&Theme, button::Status) -> button::Style = if category == catalog.category() {
            button::primary
        } else {
            button::secondary
        };
        buttons = buttons.push(
            button(text(category.label()))
                .on_press(Message::FilterCategory(category))
                .style(style)
                .padding([6, 12]),
        );
    }

    buttons.push(arrow("›", Direction::Next)).into()
}

fn card<'a>(
    item: &'a CatalogItem,
    selected: Option<i64>,
    focused: Option<i64>,
    handles: &'a HandleCache,
) -> Element<'a, Message> {
    let thumbnail: Element<'a, Message> = match handles.thumbnail(item.id) {
        Some(Thumbnail::Ready(handle)) => image(handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fill)
            .height(THUMBNAIL_HEIGHT)
            .into(),
        Some(Thumbnail::Failed) => container(text("이미지 없음").size(12))
            .center_x(Length::Fill)
            .center_y(THUMBNAIL_HEIGHT)
            .into(),
        Some(Thumbnail::Loading) | None => container(text("...").size(12))
            .center_x(Length::Fill)
            .center_y(THUMBNAIL_HEIGHT)
            .into(),
    };

    let is_selected = selected == Some(item.id);
    let is_focused = focused == Some(item.id);

    let body = container(
        column![
            thumbnail,
            text(&item.display_name).size(14),
            text(&item.description).size(12),
        ]
        .spacing(6),
    )
    .id(card_id(item.id))
    .width(CARD_WIDTH)
    .padding(8)
    .style(move |theme: &Theme| {
        let palette = theme.extended_palette();
        let color = if is_selected {
            palette.primary.strong.color
        } else if is_focused {
            palette.primary.weak.color
        } else {
            palette.background.strong.color
        };
        container::Style {
            border: Border {
                color,
                width: if is_selected { 2.0 } else { 1.0 },
                radius: 8.0.into(),
            },
            ..container::Style::default()
        }
    });

    mouse_area(body)
        .on_press(Message::CardPressed(item.id))
        .on_release(Message::CardReleased)
        .into()
}

/// Slider 0 is the top of the list; iced's vertical slider has its
/// maximum at the top, so the value is inverted.
fn slider(catalog: &CatalogSelector) -> Element<'_, Message> {
    let position = catalog.slider_position();

    let column: Column<'_, Message> = column![
        button(text("▲"))
            .on_press(Message::StepSlider(Direction::Prev))
            .style(button::text),
        vertical_slider(0.0..=100.0, 100.0 - position, |value| {
            Message::SliderDragged(100.0 - value)
        })
        .step(0.5)
        .on_release(Message::SliderReleased)
        .height(Length::Fill),
        button(text("▼"))
            .on_press(Message::StepSlider(Direction::Next))
            .style(button::text),
    ];

    column
        .spacing(6)
        .align_x(Alignment::Center)
        .height(Length::Fill)
        .into()
}
