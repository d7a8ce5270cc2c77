use crate::capture::{Canvas, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selecting,
    Committing,
    Cancelled,
}

/// Input events in overlay-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Press(Point),
    Move(Point),
    Release(Point),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedRegion {
    /// Normalized selection in overlay-local coordinates.
    pub local: Rectangle,
    /// The same rectangle on the absolute desktop.
    pub absolute: Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Updated(Rectangle),
    Committed(CapturedRegion),
    Cancelled,
}

/// Visibility control for the application's main window.
pub trait WindowHost {
    fn hide_main_window(&mut self);
    fn show_main_window(&mut self);
}

/// Drives a single click-drag-release snippet gesture over a [`Canvas`].
#[derive(Debug, Clone)]
pub struct SnippetSelector {
    canvas: Canvas,
    state: SelectionState,
    anchor: Point,
    current: Point,
}

impl SnippetSelector {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            state: SelectionState::Idle,
            anchor: Point::default(),
            current: Point::default(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Arms the selector and hides the host window so it does not cover the
    /// area being selected.
    pub fn start(&mut self, host: &mut impl WindowHost) {
        self.state = SelectionState::Idle;
        self.anchor = Point::default();
        self.current = Point::default();
        host.hide_main_window();
    }

    pub fn next_state(&self, event: SelectionEvent) -> Option<SelectionState> {
        use SelectionEvent::*;
        match (self.state, event) {
            (SelectionState::Idle, Press(_)) => Some(SelectionState::Selecting),
            (SelectionState::Selecting, Move(_)) => Some(SelectionState::Selecting),
            (SelectionState::Selecting, Release(_)) => Some(SelectionState::Committing),
            (SelectionState::Idle | SelectionState::Selecting, Escape) => {
                Some(SelectionState::Cancelled)
            }
            _ => None,
        }
    }

    pub fn can_handle(&self, event: SelectionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn handle(
        &mut self,
        event: SelectionEvent,
        host: &mut impl WindowHost,
    ) -> Option<SelectionOutcome> {
        if !self.can_handle(event) {
            tracing::trace!(state = ?self.state, ?event, "ignoring selection event");
            return None;
        }

        match event {
            SelectionEvent::Press(point) => self.begin_selection(point).map(SelectionOutcome::Updated),
            SelectionEvent::Move(point) => self.update_selection(point).map(SelectionOutcome::Updated),
            SelectionEvent::Release(point) => self.end_selection(point).map(SelectionOutcome::Committed),
            SelectionEvent::Escape => self.cancel(host).then_some(SelectionOutcome::Cancelled),
        }
    }

    pub fn begin_selection(&mut self, press: Point) -> Option<Rectangle> {
        if self.state != SelectionState::Idle {
            return None;
        }
        self.anchor = press;
        self.current = press;
        self.state = SelectionState::Selecting;
        self.rubber_band()
    }

    pub fn update_selection(&mut self, current: Point) -> Option<Rectangle> {
        if self.state != SelectionState::Selecting {
            return None;
        }
        self.current = current;
        self.rubber_band()
    }

    pub fn end_selection(&mut self, release: Point) -> Option<CapturedRegion> {
        if self.state != SelectionState::Selecting {
            return None;
        }
        self.current = release;
        self.state = SelectionState::Committing;

        let local = self.local_rect();
        let absolute = self.canvas.to_absolute(local);
        tracing::debug!(?local, ?absolute, "snippet selection committed");
        Some(CapturedRegion { local, absolute })
    }

    /// Aborts an unfinished gesture and restores the host window.
    pub fn cancel(&mut self, host: &mut impl WindowHost) -> bool {
        if !matches!(self.state, SelectionState::Idle | SelectionState::Selecting) {
            return false;
        }
        self.state = SelectionState::Cancelled;
        host.show_main_window();
        tracing::debug!("snippet selection cancelled");
        true
    }

    /// Called once the committed region has been grabbed (or failed to).
    pub fn complete(&mut self, host: &mut impl WindowHost) {
        if self.state == SelectionState::Committing {
            self.state = SelectionState::Idle;
            host.show_main_window();
        }
    }

    /// The rectangle currently shown to the user, if a drag is in progress.
    pub fn rubber_band(&self) -> Option<Rectangle> {
        (self.state == SelectionState::Selecting).then(|| self.local_rect())
    }

    fn local_rect(&self) -> Rectangle {
        Rectangle::normalize(self.anchor.x, self.anchor.y, self.current.x, self.current.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingHost {
        visible: bool,
        hides: usize,
        shows: usize,
    }

    impl WindowHost for RecordingHost {
        fn hide_main_window(&mut self) {
            self.visible = false;
            self.hides += 1;
        }

        fn show_main_window(&mut self) {
            self.visible = true;
            self.shows += 1;
        }
    }

    fn canvas(origin_x: i32, origin_y: i32) -> Canvas {
        Canvas {
            origin_x,
            origin_y,
            width: 3840,
            height: 1080,
        }
    }

    fn drag(selector: &mut SnippetSelector, host: &mut RecordingHost, from: Point, to: Point) -> CapturedRegion {
        selector.start(host);
        selector.handle(SelectionEvent::Press(from), host);
        selector.handle(SelectionEvent::Move(to), host);
        match selector.handle(SelectionEvent::Release(to), host) {
            Some(SelectionOutcome::Committed(region)) => region,
            other => panic!("expected committed region, got {other:?}"),
        }
    }

    #[test]
    fn every_drag_direction_yields_non_negative_size() {
        let corners = [
            (Point::new(100, 100), Point::new(300, 250)),
            (Point::new(300, 100), Point::new(100, 250)),
            (Point::new(100, 250), Point::new(300, 100)),
            (Point::new(300, 250), Point::new(100, 100)),
        ];

        for (from, to) in corners {
            let mut host = RecordingHost::default();
            let mut selector = SnippetSelector::new(canvas(-1920, -200));
            let region = drag(&mut selector, &mut host, from, to);

            assert_eq!(region.local, Rectangle::new(100, 100, 200, 150));
            assert_eq!(
                (region.absolute.x, region.absolute.y),
                (from.x.min(to.x) - 1920, from.y.min(to.y) - 200)
            );
            assert_eq!((region.absolute.width, region.absolute.height), (200, 150));
        }
    }

    #[test]
    fn selection_on_left_monitor_translates_by_negative_origin() {
        let mut host = RecordingHost::default();
        let mut selector = SnippetSelector::new(canvas(-1920, 0));
        let region = drag(&mut selector, &mut host, Point::new(100, 100), Point::new(50, 50));

        assert_eq!(region.absolute, Rectangle::new(-1870, 50, 50, 50));
    }

    #[test]
    fn press_shows_degenerate_rectangle_at_anchor() {
        let mut host = RecordingHost::default();
        let mut selector = SnippetSelector::new(canvas(0, 0));
        selector.start(&mut host);

        let outcome = selector.handle(SelectionEvent::Press(Point::new(40, 60)), &mut host);
        assert_eq!(
            outcome,
            Some(SelectionOutcome::Updated(Rectangle::new(40, 60, 0, 0)))
        );
        assert_eq!(selector.state(), SelectionState::Selecting);
    }

    #[test]
    fn zero_area_release_still_commits() {
        let mut host = RecordingHost::default();
        let mut selector = SnippetSelector::new(canvas(0, 0));
        let region = drag(&mut selector, &mut host, Point::new(5, 5), Point::new(5, 5));

        assert!(region.absolute.is_empty());
        assert_eq!(selector.state(), SelectionState::Committing);
    }

    #[test]
    fn host_is_hidden_during_selection_and_restored_on_completion() {
        let mut host = RecordingHost {
            visible: true,
            ..Default::default()
        };
        let mut selector = SnippetSelector::new(canvas(0, 0));
        drag(&mut selector, &mut host, Point::new(1, 1), Point::new(9, 9));
        assert!(!host.visible);

        selector.complete(&mut host);
        assert!(host.visible);
        assert_eq!((host.hides, host.shows), (1, 1));
        assert_eq!(selector.state(), SelectionState::Idle);
    }

    #[test]
    fn escape_cancels_and_restores_host() {
        let mut host = RecordingHost::default();
        let mut selector = SnippetSelector::new(canvas(0, 0));
        selector.start(&mut host);
        selector.handle(SelectionEvent::Press(Point::new(10, 10)), &mut host);

        let outcome = selector.handle(SelectionEvent::Escape, &mut host);
        assert_eq!(outcome, Some(SelectionOutcome::Cancelled));
        assert_eq!(selector.state(), SelectionState::Cancelled);
        assert!(host.visible);
        assert!(selector.rubber_band().is_none());
    }

    #[test]
    fn invalid_events_are_ignored_without_state_change() {
        let mut host = RecordingHost::default();
        let mut selector = SnippetSelector::new(canvas(0, 0));
        selector.start(&mut host);

        assert!(!selector.can_handle(SelectionEvent::Move(Point::new(3, 3))));
        assert_eq!(
            selector.handle(SelectionEvent::Release(Point::new(3, 3)), &mut host),
            None
        );
        assert_eq!(selector.state(), SelectionState::Idle);

        selector.handle(SelectionEvent::Escape, &mut host);
        assert_eq!(
            selector.handle(SelectionEvent::Press(Point::new(1, 1)), &mut host),
            None
        );
        assert_eq!(host.shows, 1);
    }

    #[test]
    fn start_rearms_after_cancel() {
        let mut host = RecordingHost::default();
        let mut selector = SnippetSelector::new(canvas(0, 0));
        selector.start(&mut host);
        selector.handle(SelectionEvent::Escape, &mut host);

        selector.start(&mut host);
        assert_eq!(selector.state(), SelectionState::Idle);
        assert!(selector.can_handle(SelectionEvent::Press(Point::new(0, 0))));
    }
}
