/// Upload zone view
use iced::widget::{button, column, container, image, mouse_area, text};
use iced::{Alignment, Border, Color, ContentFit, Element, Length, Theme};

use super::images::HandleCache;
use crate::state::intake::{IntakeSlot, Slot};
use crate::Message;

/// Container id used to measure a zone's bounds
pub fn zone_id(slot: Slot) -> container::Id {
    container::Id::new(match slot {
        Slot::General => "intake-general",
        Slot::FullBody => "intake-full-body",
        Slot::Dress => "intake-dress",
    })
}

pub fn view<'a>(
    intake: &'a IntakeSlot,
    handles: &'a HandleCache,
    hint: &'a str,
) -> Element<'a, Message> {
    let slot = intake.slot();

    let body: Element<'a, Message> = match intake.preview() {
        Some(preview) => {
            let picture: Element<'a, Message> = match handles.asset(preview.asset_id) {
                Some(handle) => image(handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into(),
                None => text("미리보기를 표시할 수 없습니다").into(),
            };
            column![
                picture,
                text(format!("{} × {}", preview.width, preview.height)).size(12),
                button(text("삭제"))
                    .on_press(Message::RemoveAsset(slot))
                    .style(button::danger)
                    .padding([6, 14]),
            ]
            .spacing(10)
            .align_x(Alignment::Center)
            .into()
        }
        None if intake.is_rendering() => text("미리보기 생성 중...").into(),
        None => column![
            text(hint).size(16),
            text("이미지를 끌어다 놓거나").size(13),
            button(text("사진 선택"))
                .on_press(Message::PickFile(slot))
                .padding([8, 16]),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .into(),
    };

    let highlighted = intake.is_drag_over();
    let zone = container(body)
        .id(zone_id(slot))
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(move |theme: &Theme| zone_style(theme, highlighted));

    mouse_area(zone)
        .on_enter(Message::ZoneEntered(slot))
        .on_exit(Message::ZoneExited(slot))
        .on_release(Message::ZoneReleased(slot))
        .into()
}

fn zone_style(theme: &Theme, highlighted: bool) -> container::Style {
    let palette = theme.extended_palette();
    let (border_color, background) = if highlighted {
        (palette.primary.strong.color, palette.primary.weak.color.scale_alpha(0.25))
    } else {
        (palette.background.strong.color, Color::TRANSPARENT)
    };

    container::Style {
        background: Some(background.into()),
        border: Border {
            color: border_color,
            width: 2.0,
            radius: 12.0.into(),
        },
        ..container::Style::default()
    }
}
