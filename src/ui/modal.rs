/// Modal overlay
///
/// Stacks a dimmed layer over the page. Clicking the dimmed area emits
/// `on_blur`; the dialog body is opaque so clicks on it stay inside.
use iced::widget::{button, center, column, container, mouse_area, opaque, row, stack, text};
use iced::{Alignment, Color, Element, Length};

use crate::Message;

pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.6,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

/// Dialog body: a message, a close button and an optional action
pub fn dialog<'a>(
    message: &'a str,
    action: Option<(&'a str, Message)>,
    on_close: Message,
) -> Element<'a, Message> {
    let mut buttons = row![].spacing(12);
    if let Some((label, on_press)) = action {
        buttons = buttons.push(button(text(label)).on_press(on_press).padding([8, 16]));
    }
    buttons = buttons.push(
        button(text("확인"))
            .on_press(on_close)
            .style(button::secondary)
            .padding([8, 16]),
    );

    container(
        column![text(message).size(18), buttons]
            .spacing(20)
            .align_x(Alignment::Center),
    )
    .width(Length::Fixed(360.0))
    .padding(24)
    .style(container::rounded_box)
    .into()
}
