/// Success checkmark
/// Drawn on a canvas so it scales with the space it is given
use iced::widget::canvas::{self, LineCap, LineJoin, Path, Stroke};
use iced::widget::{canvas as canvas_widget, container};
use iced::{Element, Point, Rectangle};

use crate::Message;

#[derive(Debug, Clone, Copy, Default)]
pub struct Checkmark;

impl canvas::Program<Message> for Checkmark {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let palette = theme.extended_palette();

        let center = frame.center();
        let radius = bounds.width.min(bounds.height) / 2.0 - 2.0;
        if radius <= 0.0 {
            return vec![frame.into_geometry()];
        }

        frame.fill(&Path::circle(center, radius), palette.success.base.color);

        // Short leg then long leg, relative to the circle
        let tick = Path::new(|builder| {
            builder.move_to(Point::new(center.x - radius * 0.45, center.y + radius * 0.02));
            builder.line_to(Point::new(center.x - radius * 0.1, center.y + radius * 0.35));
            builder.line_to(Point::new(center.x + radius * 0.5, center.y - radius * 0.3));
        });

        frame.stroke(
            &tick,
            Stroke::default()
                .with_color(palette.success.base.text)
                .with_width((radius * 0.18).max(2.0))
                .with_line_cap(LineCap::Round)
                .with_line_join(LineJoin::Round),
        );

        vec![frame.into_geometry()]
    }
}

pub fn view<'a>(size: f32) -> Element<'a, Message> {
    container(canvas_widget(Checkmark).width(size).height(size))
        .padding(4)
        .into()
}
