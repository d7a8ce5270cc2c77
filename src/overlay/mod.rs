mod selection;
mod snippet;

pub use selection::{
    SelectionEvent, SelectionOutcome, SelectionState, SnippetSelector, WindowHost,
};
pub use snippet::SnippetOverlay;
