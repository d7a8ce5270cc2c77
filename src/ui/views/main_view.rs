use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, scrollable, text, text_editor,
    Column,
};
use iced::{Alignment, Element, Length};

use crate::shortcuts::{self, ShortcutAction};
use crate::ui::style::{list_row_style, primary_button_style, section_style, window_style, Palette};
use crate::ui::{App, Message, Notice};

use super::settings_view::SettingsView;

pub struct MainView;

impl MainView {
    pub fn view(app: &App) -> Element<'_, Message> {
        let palette = app.palette;

        let content = column![
            Self::actions(app),
            Self::languages(app),
            Self::output(app),
            SettingsView::view(app),
            Self::status(app),
        ]
        .spacing(12)
        .padding(16);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_| window_style(&palette))
            .into()
    }

    fn actions(app: &App) -> Element<'_, Message> {
        let palette = app.palette;
        let idle = app.snippet.is_none() && !app.busy;
        let label = |action: ShortcutAction| {
            if app.settings.user().disable_shortcuts {
                action.display_name().to_string()
            } else {
                format!("{} ({})", action.display_name(), action.key())
            }
        };

        let snippet = button(text(label(ShortcutAction::TakeSnippet)))
            .padding([8, 16])
            .style(move |_t, s| primary_button_style(&palette, s))
            .on_press_maybe(idle.then_some(Message::TakeSnippet));
        let read_file = button(text(label(ShortcutAction::ReadFile)))
            .padding([8, 16])
            .style(move |_t, s| primary_button_style(&palette, s))
            .on_press_maybe(idle.then_some(Message::ReadFile));
        let help = button(text(if app.show_help { "Hide help" } else { "Help" }).size(12))
            .padding([4, 8])
            .style(move |_t, s| primary_button_style(&palette, s))
            .on_press(Message::ToggleHelp);

        let mut section = Column::new()
            .spacing(8)
            .push(
                row![snippet, read_file, horizontal_space(), help]
                    .spacing(8)
                    .align_y(Alignment::Center),
            );
        if app.show_help {
            section = section.push(text(shortcuts::describe_shortcuts()).size(12));
        }
        if app.busy {
            section = section.push(text("Reading text...").size(12).color(palette.muted()));
        }

        Self::section(palette, section.into())
    }

    fn languages(app: &App) -> Element<'_, Message> {
        let palette = app.palette;
        let catalog = app.languages.catalog();
        let selection = app.languages.selection();

        let main = row![
            text("Language:").width(Length::Fixed(140.0)),
            pick_list(
                catalog.names(),
                Some(&selection.main().name),
                Message::MainLanguageSelected
            )
            .width(Length::Fixed(220.0)),
            horizontal_space(),
            Self::small_button(&palette, "Set default", Some(Message::SetDefaultLanguage)),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let add = row![
            text("Additional:").width(Length::Fixed(140.0)),
            pick_list(catalog.names(), None::<&String>, Message::AdditionalLanguageAdded)
                .placeholder("Add language")
                .width(Length::Fixed(220.0)),
            Self::small_button(
                &palette,
                "Remove",
                app.selected_additional.map(|_| Message::RemoveAdditional)
            ),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let additional = selection
            .additional()
            .iter()
            .enumerate()
            .fold(Column::new().spacing(2), |list, (index, language)| {
                let selected = app.selected_additional == Some(index);
                list.push(
                    button(text(language.name.as_str()).size(13))
                        .width(Length::Fill)
                        .padding([2, 8])
                        .style(move |_t, _s| list_row_style(&palette, selected))
                        .on_press(Message::AdditionalLanguageSelected(index)),
                )
            });

        let has_combo = selection.is_combination();
        let combos = row![
            text("Saved combinations:").width(Length::Fixed(140.0)),
            pick_list(
                app.saved_combos.as_slice(),
                app.selected_combo.as_ref(),
                Message::CombinationSelected
            )
            .placeholder("None saved")
            .width(Length::Fixed(220.0)),
            Self::small_button(&palette, "Save", has_combo.then_some(Message::SaveCombination)),
            Self::small_button(
                &palette,
                "Delete",
                app.selected_combo.as_ref().map(|_| Message::DeleteCombination)
            ),
            Self::small_button(
                &palette,
                "Set default",
                (!app.saved_combos.is_empty()).then_some(Message::SetDefaultCombination)
            ),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let parameter = text(format!("Engine languages: {}", app.languages.parameter()))
            .size(12)
            .color(palette.muted());

        let content = column![
            text("Languages").size(18),
            main,
            add,
            container(scrollable(additional)).max_height(120.0),
            combos,
            parameter,
        ]
        .spacing(8);

        Self::section(palette, content.into())
    }

    fn output(app: &App) -> Element<'_, Message> {
        let palette = app.palette;
        let has_text = !app.output.text().trim().is_empty();

        let header = row![
            text("Text").size(18),
            horizontal_space(),
            Self::small_button(&palette, "Copy", has_text.then_some(Message::CopyText)),
            Self::small_button(
                &palette,
                if app.editable { "Lock" } else { "Edit" },
                Some(Message::ToggleEditing)
            ),
            Self::small_button(&palette, "Save", has_text.then_some(Message::SaveText)),
            Self::small_button(&palette, "Clear", has_text.then_some(Message::ClearText)),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let editor = text_editor(&app.output)
            .on_action(Message::TextAction)
            .height(Length::Fixed(200.0));

        let mut content = Column::new().spacing(8).push(header).push(editor);
        if let Some(parameter) = &app.last_parameter {
            content = content.push(
                text(format!("Read with: {parameter}"))
                    .size(12)
                    .color(palette.muted()),
            );
        }

        Self::section(palette, content.into())
    }

    fn status(app: &App) -> Element<'_, Message> {
        let palette = app.palette;
        match &app.notice {
            Some(Notice::Info(message)) => text(message.as_str()).size(12).color(palette.muted()).into(),
            Some(Notice::Error(message)) => text(message.as_str()).size(12).color(palette.error()).into(),
            None => text("").size(12).into(),
        }
    }

    pub(super) fn small_button<'a>(
        palette: &Palette,
        label: &'a str,
        on_press: Option<Message>,
    ) -> Element<'a, Message> {
        let palette = *palette;
        button(text(label).size(12))
            .padding([4, 8])
            .style(move |_t, s| primary_button_style(&palette, s))
            .on_press_maybe(on_press)
            .into()
    }

    pub(super) fn section(palette: Palette, content: Element<'_, Message>) -> Element<'_, Message> {
        container(content)
            .width(Length::Fill)
            .padding(12)
            .style(move |_| section_style(&palette))
            .into()
    }
}
