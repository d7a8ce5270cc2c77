mod dialogs;
pub mod style;
mod views;

pub use dialogs::{ask_for_engine_path, report_startup_error};

use iced::keyboard::{self, Key, Modifiers};
use iced::widget::text_editor;
use iced::{window, Color, Element, Point, Size, Subscription, Task, Theme};
use image::{DynamicImage, RgbaImage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::capture::{compute_canvas, Canvas, Capture, MonitorLayout, RegionCapture};
use crate::config::{BoolKey, SettingsStore, StrKey};
use crate::language::{LanguageModel, NameCollision};
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::output::{self, ClipboardManager};
use crate::overlay::{
    SelectionEvent, SelectionOutcome, SelectionState, SnippetOverlay, SnippetSelector, WindowHost,
};
use crate::shortcuts::{self, ShortcutAction};

use self::style::Palette;

/// Time for the overlay window to disappear before pixels are grabbed.
const OVERLAY_SETTLE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub enum Message {
    MainWindowOpened(window::Id),
    WindowClosed(window::Id),
    KeyPressed(Key, Modifiers),
    TakeSnippet,
    CanvasReady(Result<Canvas, String>),
    OverlayScale(window::Id, f32),
    Selection(SelectionEvent),
    SnippetCaptured(Result<Arc<RgbaImage>, String>),
    ReadFile,
    FilePicked(Option<PathBuf>),
    FileLoaded(Result<Arc<DynamicImage>, String>),
    OcrFinished {
        parameter: String,
        result: Result<String, String>,
    },
    MainLanguageSelected(String),
    AdditionalLanguageAdded(String),
    AdditionalLanguageSelected(usize),
    RemoveAdditional,
    CombinationSelected(String),
    SaveCombination,
    DeleteCombination,
    SetDefaultLanguage,
    SetDefaultCombination,
    TextAction(text_editor::Action),
    CopyText,
    ToggleEditing,
    ClearText,
    SaveText,
    SettingToggled(BoolKey, bool),
    ChooseFolder(SaveFolder),
    FolderChosen(SaveFolder, Option<PathBuf>),
    ResetFolder(SaveFolder),
    FolderResetConfirmed(SaveFolder, bool),
    RestoreDefaults,
    RestoreDefaultsConfirmed(bool),
    ToggleHelp,
    DialogClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFolder {
    Text,
    Image,
}

impl SaveFolder {
    fn key(self) -> StrKey {
        match self {
            SaveFolder::Text => StrKey::SaveTextPath,
            SaveFolder::Image => StrKey::SaveImagePath,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SaveFolder::Text => "text files",
            SaveFolder::Image => "images",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Info(String),
    Error(String),
}

/// Shows and hides the main window through window tasks.
struct TaskHost {
    main: window::Id,
    tasks: Vec<Task<Message>>,
}

impl TaskHost {
    fn new(main: window::Id) -> Self {
        Self {
            main,
            tasks: Vec::new(),
        }
    }

    fn into_task(self) -> Task<Message> {
        Task::batch(self.tasks)
    }
}

impl WindowHost for TaskHost {
    fn hide_main_window(&mut self) {
        self.tasks
            .push(window::change_mode(self.main, window::Mode::Hidden));
    }

    fn show_main_window(&mut self) {
        self.tasks
            .push(window::change_mode(self.main, window::Mode::Windowed));
        self.tasks.push(window::gain_focus(self.main));
    }
}

struct SnippetSession {
    window: window::Id,
    selector: SnippetSelector,
    scale_factor: f32,
}

pub struct App {
    settings: SettingsStore,
    engine: TesseractEngine,
    languages: LanguageModel,
    palette: Palette,
    main_window: window::Id,
    snippet: Option<SnippetSession>,
    preparing_snippet: bool,
    busy: bool,
    clipboard: Option<ClipboardManager>,
    output: text_editor::Content,
    editable: bool,
    last_parameter: Option<String>,
    selected_additional: Option<usize>,
    selected_combo: Option<String>,
    saved_combos: Vec<String>,
    show_help: bool,
    notice: Option<Notice>,
}

impl App {
    pub fn new(
        settings: SettingsStore,
        engine: TesseractEngine,
        languages: LanguageModel,
    ) -> (Self, Task<Message>) {
        let (main_window, open) = window::open(main_window_settings());

        let clipboard = match ClipboardManager::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard unavailable");
                None
            }
        };

        let mut app = Self {
            palette: Palette::from_setting(settings.user().theme),
            settings,
            engine,
            languages,
            main_window,
            snippet: None,
            preparing_snippet: false,
            busy: false,
            clipboard,
            output: text_editor::Content::new(),
            editable: false,
            last_parameter: None,
            selected_additional: None,
            selected_combo: None,
            saved_combos: Vec::new(),
            show_help: false,
            notice: None,
        };
        app.notice = collision_notice(app.languages.catalog().collisions());
        app.refresh_combinations();

        (app, open.map(Message::MainWindowOpened))
    }

    pub fn title(&self, id: window::Id) -> String {
        match &self.snippet {
            Some(session) if session.window == id => String::from("snipocr - snippet"),
            _ => String::from("snipocr"),
        }
    }

    pub fn theme(&self, _id: window::Id) -> Theme {
        self.palette.iced_theme()
    }

    pub fn style(&self, theme: &Theme) -> iced::daemon::Appearance {
        iced::daemon::Appearance {
            background_color: Color::TRANSPARENT,
            text_color: theme.palette().text,
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::close_events().map(Message::WindowClosed),
            keyboard::on_key_press(|key, modifiers| Some(Message::KeyPressed(key, modifiers))),
        ])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::MainWindowOpened(id) => {
                tracing::debug!(?id, "main window opened");
            }
            Message::WindowClosed(id) => return self.window_closed(id),
            Message::KeyPressed(key, modifiers) => {
                if self.snippet.is_some() || self.busy {
                    return Task::none();
                }
                let disabled = self.settings.get_bool(BoolKey::DisableShortcuts);
                match shortcuts::action_for_key(&key, modifiers, disabled) {
                    Some(ShortcutAction::TakeSnippet) => return self.start_snippet(),
                    Some(ShortcutAction::ReadFile) => return self.pick_file(),
                    None => {}
                }
            }
            Message::TakeSnippet => return self.start_snippet(),
            Message::CanvasReady(result) => {
                self.preparing_snippet = false;
                match result {
                    Ok(canvas) => return self.open_overlay(canvas),
                    Err(err) => {
                        tracing::error!(error = %err, "failed to detect monitors");
                        self.notice = Some(Notice::Error(format!("Snippet failed: {err}")));
                    }
                }
            }
            Message::OverlayScale(id, scale_factor) => {
                if let Some(session) = self.snippet.as_mut().filter(|s| s.window == id) {
                    session.scale_factor = scale_factor;
                }
            }
            Message::Selection(event) => return self.handle_selection(event),
            Message::SnippetCaptured(result) => {
                let mut host = TaskHost::new(self.main_window);
                if let Some(mut session) = self.snippet.take() {
                    session.selector.complete(&mut host);
                }
                let restore = host.into_task();
                return match result {
                    Ok(image) => Task::batch([restore, self.process_snippet(image)]),
                    Err(err) => {
                        tracing::warn!(error = %err, "snippet capture failed");
                        self.notice = Some(Notice::Error(format!("Capture failed: {err}")));
                        restore
                    }
                };
            }
            Message::ReadFile => return self.pick_file(),
            Message::FilePicked(None) => {}
            Message::FilePicked(Some(path)) => {
                if let Some(dir) = path.parent() {
                    self.settings
                        .set_str(StrKey::LastDir, dir.to_string_lossy());
                    self.persist();
                }
                return Task::perform(
                    async move {
                        output::load_image_file(&path)
                            .map(Arc::new)
                            .map_err(|e| e.to_string())
                    },
                    Message::FileLoaded,
                );
            }
            Message::FileLoaded(Ok(image)) => {
                return self.run_ocr(Arc::unwrap_or_clone(image));
            }
            Message::FileLoaded(Err(err)) => {
                tracing::warn!(error = %err, "selected file is not an image");
                return Task::perform(
                    dialogs::show_error(
                        "Error reading file!",
                        String::from("The selected file is not a valid image file."),
                    ),
                    |_| Message::DialogClosed,
                );
            }
            Message::OcrFinished { parameter, result } => {
                self.busy = false;
                match result {
                    Ok(text) => self.show_result(parameter, text),
                    Err(err) => {
                        tracing::error!(error = %err, %parameter, "OCR failed");
                        self.notice = Some(Notice::Error(format!("OCR failed: {err}")));
                        return Task::perform(
                            dialogs::show_error("OCR Failed", err),
                            |_| Message::DialogClosed,
                        );
                    }
                }
            }
            Message::MainLanguageSelected(name) => match self.languages.set_main_language(&name) {
                Ok(true) => self.selected_additional = None,
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "cannot select main language"),
            },
            Message::AdditionalLanguageAdded(name) => match self.languages.add_additional(&name) {
                Ok(Some(index)) => self.selected_additional = Some(index),
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "cannot add language"),
            },
            Message::AdditionalLanguageSelected(index) => {
                self.selected_additional = Some(index);
            }
            Message::RemoveAdditional => {
                let name = self
                    .selected_additional
                    .and_then(|i| self.languages.selection().additional().get(i))
                    .map(|language| language.name.clone());
                if let Some(name) = name {
                    self.languages.remove_additional(&name);
                    self.selected_additional = None;
                }
            }
            Message::CombinationSelected(combo) => match self.languages.apply_combination(&combo) {
                Ok(()) => {
                    self.selected_combo = Some(combo);
                    self.selected_additional = None;
                }
                Err(err) => {
                    tracing::warn!(error = %err, %combo, "cannot apply combination");
                    self.notice = Some(Notice::Error(err.to_string()));
                }
            },
            Message::SaveCombination => match self.languages.save_combination(&mut self.settings) {
                Ok(Some(combo)) => {
                    self.refresh_combinations();
                    self.selected_combo = Some(combo);
                }
                Ok(None) => {}
                Err(err) => self.report_settings_error(err),
            },
            Message::DeleteCombination => {
                if let Some(combo) = self.selected_combo.take() {
                    if let Err(err) = self.languages.delete_combination(&combo, &mut self.settings) {
                        self.report_settings_error(err);
                    }
                    self.selected_additional = None;
                    self.refresh_combinations();
                }
            }
            Message::SetDefaultLanguage => {
                match self.languages.set_as_default(&mut self.settings) {
                    Ok(()) => {
                        let name = &self.languages.selection().main().name;
                        self.notice = Some(Notice::Info(format!("Default language: {name}")));
                    }
                    Err(err) => self.report_settings_error(err),
                }
            }
            Message::SetDefaultCombination => {
                match self.languages.set_combo_as_default(&mut self.settings) {
                    Ok(true) => {
                        let combo = self.languages.parameter();
                        self.notice = Some(Notice::Info(format!("Default combination: {combo}")));
                    }
                    Ok(false) => {}
                    Err(err) => self.report_settings_error(err),
                }
            }
            Message::TextAction(action) => {
                if self.editable || !action.is_edit() {
                    self.output.perform(action);
                }
            }
            Message::CopyText => self.copy_output(),
            Message::ToggleEditing => self.editable = !self.editable,
            Message::ClearText => {
                self.output = text_editor::Content::new();
                self.last_parameter = None;
            }
            Message::SaveText => self.save_output_text(),
            Message::SettingToggled(key, value) => {
                self.settings.set_bool(key, value);
                self.persist();
            }
            Message::ChooseFolder(folder) => {
                return Task::perform(dialogs::pick_folder(), move |path| {
                    Message::FolderChosen(folder, path)
                });
            }
            Message::FolderChosen(_, None) => {}
            Message::FolderChosen(folder, Some(path)) => {
                self.settings.set_str(folder.key(), path.to_string_lossy());
                self.persist();
            }
            Message::ResetFolder(folder) => {
                if self.settings.get_str(folder.key()).is_empty() {
                    return Task::none();
                }
                return Task::perform(
                    dialogs::confirm(
                        "Reset Save Folder",
                        format!(
                            "Are you sure you want to reset the save folder for {}?",
                            folder.label()
                        ),
                    ),
                    move |confirmed| Message::FolderResetConfirmed(folder, confirmed),
                );
            }
            Message::FolderResetConfirmed(folder, true) => {
                self.settings.set_str(folder.key(), "");
                self.persist();
            }
            Message::FolderResetConfirmed(_, false) => {}
            Message::RestoreDefaults => {
                return Task::perform(
                    dialogs::confirm(
                        "Restore Default Configuration",
                        String::from(
                            "Are you sure you want to restore the default configuration?\nThis can not be undone.",
                        ),
                    ),
                    Message::RestoreDefaultsConfirmed,
                );
            }
            Message::RestoreDefaultsConfirmed(true) => self.restore_defaults(),
            Message::RestoreDefaultsConfirmed(false) => {}
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::DialogClosed => {}
        }
        Task::none()
    }

    pub fn view(&self, id: window::Id) -> Element<'_, Message> {
        match &self.snippet {
            Some(session) if session.window == id => {
                SnippetOverlay::new(&session.selector, session.scale_factor).view()
            }
            _ => views::MainView::view(self),
        }
    }

    fn start_snippet(&mut self) -> Task<Message> {
        if self.snippet.is_some() || self.preparing_snippet || self.busy {
            return Task::none();
        }
        self.preparing_snippet = true;
        self.notice = None;
        Task::perform(
            async {
                MonitorLayout::detect()
                    .map(|layout| compute_canvas(&layout))
                    .map_err(|e| e.to_string())
            },
            Message::CanvasReady,
        )
    }

    fn open_overlay(&mut self, canvas: Canvas) -> Task<Message> {
        let mut host = TaskHost::new(self.main_window);
        let mut selector = SnippetSelector::new(canvas);
        selector.start(&mut host);

        let (id, open) = window::open(overlay_settings(&canvas));
        tracing::debug!(?canvas, ?id, "opening snippet overlay");
        self.snippet = Some(SnippetSession {
            window: id,
            selector,
            scale_factor: 1.0,
        });

        Task::batch([
            host.into_task(),
            open.discard(),
            window::get_scale_factor(id).map(move |scale| Message::OverlayScale(id, scale)),
            window::gain_focus(id),
        ])
    }

    fn handle_selection(&mut self, event: SelectionEvent) -> Task<Message> {
        let Some(session) = self.snippet.as_mut() else {
            return Task::none();
        };
        let overlay = session.window;
        let mut host = TaskHost::new(self.main_window);

        match session.selector.handle(event, &mut host) {
            Some(SelectionOutcome::Committed(region)) => {
                let grab = Task::perform(
                    async move {
                        tokio::time::sleep(OVERLAY_SETTLE_DELAY).await;
                        RegionCapture::new(region.absolute)
                            .capture()
                            .map(Arc::new)
                            .map_err(|e| e.to_string())
                    },
                    Message::SnippetCaptured,
                );
                Task::batch([host.into_task(), window::close(overlay), grab])
            }
            Some(SelectionOutcome::Cancelled) => {
                self.snippet = None;
                Task::batch([host.into_task(), window::close(overlay)])
            }
            Some(SelectionOutcome::Updated(_)) | None => host.into_task(),
        }
    }

    fn window_closed(&mut self, id: window::Id) -> Task<Message> {
        if id == self.main_window {
            tracing::info!("main window closed, exiting");
            return iced::exit();
        }

        let mut host = TaskHost::new(self.main_window);
        let aborted = match self.snippet.as_mut() {
            Some(session) if session.window == id => {
                session.selector.state() != SelectionState::Committing
            }
            _ => false,
        };
        if aborted {
            if let Some(mut session) = self.snippet.take() {
                if !session.selector.cancel(&mut host) {
                    host.show_main_window();
                }
            }
        }
        host.into_task()
    }

    fn process_snippet(&mut self, image: Arc<RgbaImage>) -> Task<Message> {
        if self.settings.get_bool(BoolKey::AutoSaveImage) {
            let folder = self.settings.user().save_image_path.clone();
            if let Err(err) = output::save_snippet_image(&image, &folder) {
                tracing::error!(error = %err, "failed to save snippet image");
                self.notice = Some(Notice::Error(format!("Could not save image: {err}")));
            }
        }
        self.run_ocr(DynamicImage::ImageRgba8(Arc::unwrap_or_clone(image)))
    }

    fn pick_file(&mut self) -> Task<Message> {
        if self.busy || self.snippet.is_some() {
            return Task::none();
        }
        let start_dir = self.settings.user().last_dir.clone();
        Task::perform(dialogs::pick_image_file(start_dir), Message::FilePicked)
    }

    fn run_ocr(&mut self, image: DynamicImage) -> Task<Message> {
        self.busy = true;
        let engine = self.engine.clone();
        let parameter = self.languages.parameter();
        let languages = parameter.clone();

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || engine.recognize_text(&image, &languages))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|result| result.map_err(|e| e.to_string()))
            },
            move |result| Message::OcrFinished {
                parameter: parameter.clone(),
                result,
            },
        )
    }

    fn show_result(&mut self, parameter: String, text: String) {
        tracing::info!(%parameter, chars = text.chars().count(), "OCR finished");
        self.output = text_editor::Content::with_text(&text);
        self.last_parameter = Some(parameter);
        self.notice = None;

        if self.settings.get_bool(BoolKey::AutoCopy) {
            self.copy_output();
        }
        if self.settings.get_bool(BoolKey::AutoSaveText) {
            self.save_output_text();
        }
    }

    fn output_text(&self) -> String {
        let text = self.output.text();
        // The editor always reports a trailing newline.
        text.strip_suffix('\n').unwrap_or(&text).to_string()
    }

    fn copy_output(&mut self) {
        let text = self.output_text();
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.notice = Some(Notice::Error(String::from("Clipboard unavailable")));
            return;
        };
        if let Err(err) = clipboard.copy_text(&text) {
            tracing::error!(error = %err, "failed to copy text");
            self.notice = Some(Notice::Error(err.to_string()));
        }
    }

    fn save_output_text(&mut self) {
        let folder = self.settings.user().save_text_path.clone();
        match output::save_text(&self.output_text(), &folder) {
            Ok(Some(path)) => {
                self.notice = Some(Notice::Info(format!("Saved {}", path.display())));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(error = %err, "failed to save text");
                self.notice = Some(Notice::Error(err.to_string()));
            }
        }
    }

    fn restore_defaults(&mut self) {
        self.settings.restore_defaults();
        self.persist();
        if let Err(err) = self.languages.reset_to_defaults(&self.settings) {
            tracing::error!(error = %err, "failed to reset languages");
        }
        self.palette = Palette::from_setting(self.settings.user().theme);
        self.selected_additional = None;
        self.refresh_combinations();
    }

    fn refresh_combinations(&mut self) {
        let saved = self.languages.saved_combinations(&self.settings);
        let user = self.settings.user();
        let selected = self
            .selected_combo
            .take()
            .filter(|combo| saved.contains(combo))
            .or_else(|| {
                (user.default_is_combo && saved.contains(&user.default_lang_combo))
                    .then(|| user.default_lang_combo.clone())
            });
        self.selected_combo = selected;
        self.saved_combos = saved;
    }

    fn persist(&mut self) {
        if let Err(err) = self.settings.save() {
            tracing::error!(error = %err, "failed to save settings");
            self.notice = Some(Notice::Error(err.to_string()));
        }
    }

    fn report_settings_error(&mut self, err: impl std::fmt::Display) {
        tracing::error!(error = %err, "failed to update saved languages");
        self.notice = Some(Notice::Error(err.to_string()));
    }
}

fn collision_notice(collisions: &[NameCollision]) -> Option<Notice> {
    if collisions.is_empty() {
        return None;
    }
    let renamed = collisions
        .iter()
        .map(|c| format!("{} is listed as \"{}\"", c.renamed_code, c.renamed_to))
        .collect::<Vec<_>>()
        .join(", ");
    Some(Notice::Info(format!("Languages sharing a name: {renamed}")))
}

fn main_window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(760.0, 680.0),
        min_size: Some(Size::new(560.0, 480.0)),
        resizable: true,
        decorations: true,
        ..Default::default()
    }
}

fn overlay_settings(canvas: &Canvas) -> window::Settings {
    window::Settings {
        size: Size::new(canvas.width as f32, canvas.height as f32),
        position: window::Position::Specific(Point::new(
            canvas.origin_x as f32,
            canvas.origin_y as f32,
        )),
        resizable: false,
        decorations: false,
        transparent: true,
        level: window::Level::AlwaysOnTop,
        exit_on_close_request: false,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_languages_are_announced() {
        assert_eq!(collision_notice(&[]), None);

        let collision = NameCollision {
            name: "English".to_string(),
            kept_code: "eng".to_string(),
            renamed_code: "English".to_string(),
            renamed_to: "English (English)".to_string(),
        };
        assert_eq!(
            collision_notice(&[collision]),
            Some(Notice::Info(
                "Languages sharing a name: English is listed as \"English (English)\"".to_string()
            ))
        );
    }
}
