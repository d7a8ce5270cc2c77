mod canvas;
mod region;
mod screen;

pub use canvas::{compute_canvas, Canvas, MonitorLayout};
pub use region::RegionCapture;
pub use screen::DesktopGrabber;

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("selected region is empty ({width}x{height})")]
    EmptyRegion { width: u32, height: u32 },
    #[error("selected region {0:?} does not overlap any monitor")]
    OutsideDesktop(Rectangle),
    #[error("no monitors found")]
    NoMonitors,
    #[error("combined monitor area too large")]
    TooLarge,
    #[error("screen capture failed: {0}")]
    Backend(#[from] xcap::XCapError),
}

pub type CaptureResult<T> = std::result::Result<T, CaptureError>;

pub trait Capture {
    fn capture(&self) -> CaptureResult<RgbaImage>;
}

/// Pixel extraction against the whole desktop, in absolute coordinates.
pub trait PixelGrab {
    fn grab_region(&self, region: Rectangle) -> CaptureResult<RgbaImage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn normalize(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        let x = start_x.min(end_x);
        let y = start_y.min(end_y);
        let width = (start_x - end_x).unsigned_abs();
        let height = (start_y - end_y).unsigned_abs();
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rectangle::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}
