use rfd::{
    AsyncFileDialog, AsyncMessageDialog, FileDialog, MessageButtons, MessageDialog,
    MessageDialogResult, MessageLevel,
};
use std::path::PathBuf;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

pub async fn pick_image_file(start_dir: PathBuf) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select File")
        .set_directory(start_dir)
        .add_filter("Images", IMAGE_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

pub async fn pick_folder() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select Folder")
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

pub async fn confirm(title: &'static str, description: String) -> bool {
    let result = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    result == MessageDialogResult::Yes
}

pub async fn show_error(title: &'static str, description: String) {
    AsyncMessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}

/// Blocking prompt used before the event loop starts when the configured
/// Tesseract executable cannot be run. `None` means the user gave up.
pub fn ask_for_engine_path(reason: &str) -> Option<PathBuf> {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("TesseractOCR Not Found")
        .set_description(format!(
            "Tesseract installation not found!\n\n{reason}\n\nManually add path?"
        ))
        .set_buttons(MessageButtons::YesNo)
        .show();
    if answer != MessageDialogResult::Yes {
        return None;
    }
    FileDialog::new().set_title("Select Tesseract executable").pick_file()
}

/// Blocking error report for failures before the event loop starts.
pub fn report_startup_error(description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Unexpected Error")
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
