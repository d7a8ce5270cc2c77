use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow};

use crate::config::Theme as ThemeSetting;

const BACKGROUND_DARK: Color = Color::from_rgb(0.1, 0.1, 0.1);
const BACKGROUND_LIGHT: Color = Color::from_rgb(0.95, 0.95, 0.95);
const SURFACE_DARK: Color = Color::from_rgb(0.15, 0.15, 0.15);
const SURFACE_LIGHT: Color = Color::from_rgb(0.9, 0.9, 0.9);
const ACCENT_DARK: Color = Color::from_rgb(0.4, 0.4, 0.4);
const ACCENT_LIGHT: Color = Color::from_rgb(0.3, 0.3, 0.3);
const TEXT_DARK: Color = Color::from_rgb(0.9, 0.9, 0.9);
const TEXT_LIGHT: Color = Color::from_rgb(0.1, 0.1, 0.1);
const MUTED_DARK: Color = Color::from_rgb(0.6, 0.6, 0.6);
const MUTED_LIGHT: Color = Color::from_rgb(0.4, 0.4, 0.4);
const HIGHLIGHT_DARK: Color = Color::from_rgb(0.25, 0.25, 0.25);
const HIGHLIGHT_LIGHT: Color = Color::from_rgb(0.78, 0.78, 0.78);
const ERROR: Color = Color::from_rgb(0.85, 0.3, 0.3);
pub const SECTION_RADIUS: f32 = 10.0;
pub const BUTTON_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    pub is_dark: bool,
}

impl Palette {
    pub fn from_setting(theme: ThemeSetting) -> Self {
        Self {
            is_dark: theme == ThemeSetting::Dark,
        }
    }

    pub fn iced_theme(&self) -> iced::Theme {
        if self.is_dark {
            iced::Theme::Dark
        } else {
            iced::Theme::Light
        }
    }

    fn pick(&self, dark: Color, light: Color) -> Color {
        if self.is_dark {
            dark
        } else {
            light
        }
    }

    pub fn background(&self) -> Color {
        self.pick(BACKGROUND_DARK, BACKGROUND_LIGHT)
    }

    pub fn surface(&self) -> Color {
        self.pick(SURFACE_DARK, SURFACE_LIGHT)
    }

    pub fn accent(&self) -> Color {
        self.pick(ACCENT_DARK, ACCENT_LIGHT)
    }

    pub fn text(&self) -> Color {
        self.pick(TEXT_DARK, TEXT_LIGHT)
    }

    pub fn muted(&self) -> Color {
        self.pick(MUTED_DARK, MUTED_LIGHT)
    }

    pub fn highlight(&self) -> Color {
        self.pick(HIGHLIGHT_DARK, HIGHLIGHT_LIGHT)
    }

    pub fn error(&self) -> Color {
        ERROR
    }
}

pub fn primary_button_style(palette: &Palette, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered | button::Status::Pressed => palette.highlight(),
        button::Status::Disabled => palette.surface(),
        button::Status::Active => palette.accent(),
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: if palette.is_dark { TEXT_DARK } else { Color::WHITE },
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: BUTTON_RADIUS.into(),
        },
        shadow: Shadow::default(),
    }
}

/// Rows in the additional-language list; the tracked row is highlighted.
pub fn list_row_style(palette: &Palette, selected: bool) -> button::Style {
    button::Style {
        background: selected.then(|| Background::Color(palette.highlight())),
        text_color: palette.text(),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: BUTTON_RADIUS.into(),
        },
        shadow: Shadow::default(),
    }
}

pub fn window_style(palette: &Palette) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette.background())),
        text_color: Some(palette.text()),
        ..Default::default()
    }
}

pub fn section_style(palette: &Palette) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette.surface())),
        text_color: Some(palette.text()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: SECTION_RADIUS.into(),
        },
        shadow: Shadow::default(),
    }
}
