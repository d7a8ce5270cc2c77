use iced::keyboard;
use iced::mouse;
use iced::widget::canvas;
use iced::{Color, Element, Length, Point as ViewPoint, Rectangle as ViewRect, Renderer, Size, Theme};

use super::selection::{Point, SelectionEvent, SnippetSelector};
use crate::capture::Rectangle;
use crate::ui::Message;

const DIM_OPACITY: f32 = 0.4;
const BORDER_WIDTH: f32 = 2.0;

/// Dimmed full-canvas layer that turns mouse input into selection events.
pub struct SnippetOverlay<'a> {
    selector: &'a SnippetSelector,
    scale_factor: f32,
}

impl<'a> SnippetOverlay<'a> {
    pub fn new(selector: &'a SnippetSelector, scale_factor: f32) -> Self {
        Self {
            selector,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    pub fn view(self) -> Element<'a, Message> {
        canvas(self).width(Length::Fill).height(Length::Fill).into()
    }

    fn to_pixels(&self, position: ViewPoint) -> Point {
        Point::new(
            (position.x * self.scale_factor).round() as i32,
            (position.y * self.scale_factor).round() as i32,
        )
    }

    fn to_view(&self, rect: Rectangle) -> (ViewPoint, Size) {
        (
            ViewPoint::new(rect.x as f32 / self.scale_factor, rect.y as f32 / self.scale_factor),
            Size::new(
                rect.width as f32 / self.scale_factor,
                rect.height as f32 / self.scale_factor,
            ),
        )
    }
}

impl canvas::Program<Message> for SnippetOverlay<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: ViewRect,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<Renderer>> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            ViewPoint::ORIGIN,
            bounds.size(),
            Color::from_rgba(0.0, 0.0, 0.0, DIM_OPACITY),
        );

        if let Some(band) = self.selector.rubber_band() {
            let (top_left, size) = self.to_view(band);
            frame.stroke_rectangle(
                top_left,
                size,
                canvas::Stroke::default()
                    .with_color(Color::WHITE)
                    .with_width(BORDER_WIDTH),
            );

            let label_y = if top_left.y > 20.0 {
                top_left.y - 18.0
            } else {
                top_left.y + size.height + 4.0
            };
            frame.fill_text(canvas::Text {
                content: format!("{}x{}", band.width, band.height),
                position: ViewPoint::new(top_left.x + 4.0, label_y),
                color: Color::WHITE,
                size: 14.0.into(),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: ViewRect,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if let canvas::Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Escape),
            ..
        }) = &event
        {
            return (
                canvas::event::Status::Captured,
                Some(Message::Selection(SelectionEvent::Escape)),
            );
        }

        let position = match cursor.position_in(bounds) {
            Some(position) => position,
            None => match (cursor.position(), &event) {
                (Some(absolute), canvas::Event::Mouse(mouse::Event::ButtonReleased(_))) => {
                    ViewPoint::new(
                        (absolute.x - bounds.x).clamp(0.0, bounds.width),
                        (absolute.y - bounds.y).clamp(0.0, bounds.height),
                    )
                }
                _ => return (canvas::event::Status::Ignored, None),
            },
        };
        let point = self.to_pixels(position);

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => (
                canvas::event::Status::Captured,
                Some(Message::Selection(SelectionEvent::Press(point))),
            ),
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. })
                if self.selector.rubber_band().is_some() =>
            {
                (
                    canvas::event::Status::Captured,
                    Some(Message::Selection(SelectionEvent::Move(point))),
                )
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => (
                canvas::event::Status::Captured,
                Some(Message::Selection(SelectionEvent::Release(point))),
            ),
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        _bounds: ViewRect,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        mouse::Interaction::Crosshair
    }
}
