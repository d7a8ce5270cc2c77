use iced::widget::{checkbox, column, horizontal_space, row, text, Column};
use iced::{Alignment, Element, Length};
use std::path::Path;

use crate::config::BoolKey;
use crate::ui::{App, Message, SaveFolder};

use super::main_view::MainView;

const TOGGLES: &[(BoolKey, &str)] = &[
    (BoolKey::AutoCopy, "Copy text to clipboard automatically"),
    (BoolKey::AutoSaveText, "Save text files automatically"),
    (BoolKey::AutoSaveImage, "Save snippet images automatically"),
    (BoolKey::DisableShortcuts, "Disable keyboard shortcuts"),
];

pub struct SettingsView;

impl SettingsView {
    pub fn view(app: &App) -> Element<'_, Message> {
        let palette = app.palette;

        let toggles = TOGGLES
            .iter()
            .fold(Column::new().spacing(6), |list, &(key, label)| {
                list.push(
                    checkbox(label, app.settings.get_bool(key))
                        .on_toggle(move |value| Message::SettingToggled(key, value)),
                )
            });

        let user = app.settings.user();
        let content = column![
            row![
                text("Settings").size(18),
                horizontal_space(),
                MainView::small_button(&palette, "Restore defaults", Some(Message::RestoreDefaults)),
            ]
            .align_y(Alignment::Center),
            toggles,
            Self::folder_row(app, SaveFolder::Text, &user.save_text_path),
            Self::folder_row(app, SaveFolder::Image, &user.save_image_path),
        ]
        .spacing(10);

        MainView::section(palette, content.into())
    }

    fn folder_row<'a>(app: &'a App, folder: SaveFolder, current: &'a Path) -> Element<'a, Message> {
        let palette = app.palette;
        let label = match folder {
            SaveFolder::Text => "Text folder:",
            SaveFolder::Image => "Image folder:",
        };
        let shown = if current.as_os_str().is_empty() {
            String::from("Working directory")
        } else {
            current.display().to_string()
        };
        let is_set = !current.as_os_str().is_empty();

        row![
            text(label).width(Length::Fixed(140.0)),
            text(shown).size(13).width(Length::Fill),
            MainView::small_button(&palette, "Choose", Some(Message::ChooseFolder(folder))),
            MainView::small_button(&palette, "Reset", is_set.then_some(Message::ResetFolder(folder))),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }
}
