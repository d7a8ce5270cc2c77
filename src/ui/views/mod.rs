mod main_view;
mod settings_view;

pub use main_view::MainView;
