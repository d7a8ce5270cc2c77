//! Geometry of the snippet canvas spanning every connected monitor.
//!
//! The canvas size follows the virtual-desktop geometry reported by the
//! display host, with a correction for even monitor counts. That correction
//! is a best-effort approximation: it is known to over- or under-cover
//! arrangements of three or more monitors, monitors of differing sizes, and
//! non-rectilinear layouts.

use super::{CaptureResult, Rectangle};

const EVEN_LAYOUT_SCALE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorGeometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }
}

/// Monitors as reported by the display host, primary first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorLayout {
    monitors: Vec<MonitorGeometry>,
    virtual_geometry: Rectangle,
}

impl MonitorLayout {
    /// Uses the bounding box of `monitors` as the virtual geometry.
    pub fn from_monitors(monitors: Vec<MonitorGeometry>) -> Self {
        let virtual_geometry = bounding_box(&monitors);
        Self {
            monitors,
            virtual_geometry,
        }
    }

    pub fn with_virtual_geometry(monitors: Vec<MonitorGeometry>, virtual_geometry: Rectangle) -> Self {
        Self {
            monitors,
            virtual_geometry,
        }
    }

    pub fn detect() -> CaptureResult<Self> {
        let mut screens = xcap::Monitor::all()?;
        if screens.is_empty() {
            return Err(super::CaptureError::NoMonitors);
        }
        screens.sort_by_key(|m| !m.is_primary());

        let monitors: Vec<MonitorGeometry> = screens
            .iter()
            .map(|m| MonitorGeometry::new(m.x(), m.y(), m.width(), m.height()))
            .collect();

        let layout = match reported_virtual_geometry() {
            Some(geometry) => Self::with_virtual_geometry(monitors, geometry),
            None => Self::from_monitors(monitors),
        };
        tracing::debug!(
            monitors = layout.monitors.len(),
            virtual_geometry = ?layout.virtual_geometry,
            "detected monitor layout"
        );
        Ok(layout)
    }

    pub fn monitors(&self) -> &[MonitorGeometry] {
        &self.monitors
    }

    pub fn virtual_geometry(&self) -> Rectangle {
        self.virtual_geometry
    }

}

fn bounding_box(monitors: &[MonitorGeometry]) -> Rectangle {
    if monitors.is_empty() {
        return Rectangle::new(0, 0, 0, 0);
    }
    let min_x = monitors.iter().map(|m| m.x).min().unwrap_or(0);
    let min_y = monitors.iter().map(|m| m.y).min().unwrap_or(0);
    let max_x = monitors.iter().map(|m| m.right()).max().unwrap_or(0);
    let max_y = monitors.iter().map(|m| m.bottom()).max().unwrap_or(0);
    Rectangle::new(
        min_x,
        min_y,
        max_x.saturating_sub(min_x).max(0) as u32,
        max_y.saturating_sub(min_y).max(0) as u32,
    )
}

#[cfg(windows)]
fn reported_virtual_geometry() -> Option<Rectangle> {
    use windows::Win32::UI::WindowsAndMessaging::{
        GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
        SM_YVIRTUALSCREEN,
    };

    let (x, y, width, height) = unsafe {
        (
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    };
    if width <= 0 || height <= 0 {
        return None;
    }
    Some(Rectangle::new(x, y, width as u32, height as u32))
}

#[cfg(not(windows))]
fn reported_virtual_geometry() -> Option<Rectangle> {
    None
}

/// The overlay area: origin in absolute desktop coordinates plus its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Maps a canvas-local rectangle onto absolute desktop coordinates.
    pub fn to_absolute(&self, local: Rectangle) -> Rectangle {
        local.translate(self.origin_x, self.origin_y)
    }
}

pub fn compute_canvas(layout: &MonitorLayout) -> Canvas {
    let monitors = layout.monitors();
    let virtual_geometry = layout.virtual_geometry();

    if monitors.is_empty() {
        return Canvas {
            origin_x: 0,
            origin_y: 0,
            width: virtual_geometry.width,
            height: virtual_geometry.height,
        };
    }

    let origin_x = monitors.iter().map(|m| m.x).min().unwrap_or(0);
    let origin_y = monitors.iter().map(|m| m.y).min().unwrap_or(0);

    let (mut width, mut height) = (virtual_geometry.width, virtual_geometry.height);

    if monitors.len() % 2 == 0 {
        let x_spread = spread(monitors.iter().map(|m| m.right()));
        let y_spread = spread(monitors.iter().map(|m| m.bottom()));
        if x_spread > y_spread {
            width = scale(width);
        } else {
            height = scale(height);
        }
    }

    Canvas {
        origin_x,
        origin_y,
        width,
        height,
    }
}

fn spread(edges: impl Iterator<Item = i32> + Clone) -> i64 {
    let min = edges.clone().min().unwrap_or(0) as i64;
    let max = edges.max().unwrap_or(0) as i64;
    max - min
}

fn scale(value: u32) -> u32 {
    (value as f64 * EVEN_LAYOUT_SCALE) as u32
}
