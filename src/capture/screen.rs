use image::RgbaImage;
use xcap::Monitor;

use super::{CaptureError, CaptureResult, PixelGrab, Rectangle};

const MAX_TOTAL_DIMENSION: u32 = 32768;

/// Grabs pixels from the live desktop through every monitor the region touches.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopGrabber;

impl DesktopGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl PixelGrab for DesktopGrabber {
    fn grab_region(&self, region: Rectangle) -> CaptureResult<RgbaImage> {
        if region.is_empty() {
            return Err(CaptureError::EmptyRegion {
                width: region.width,
                height: region.height,
            });
        }
        if region.width > MAX_TOTAL_DIMENSION || region.height > MAX_TOTAL_DIMENSION {
            return Err(CaptureError::TooLarge);
        }

        let monitors = Monitor::all()?;
        if monitors.is_empty() {
            return Err(CaptureError::NoMonitors);
        }

        let mut combined = RgbaImage::new(region.width, region.height);
        let mut covered = false;

        for monitor in monitors {
            let bounds = Rectangle::new(monitor.x(), monitor.y(), monitor.width(), monitor.height());
            let Some(overlap) = bounds.intersection(&region) else {
                continue;
            };

            let img = monitor.capture_image()?;
            tracing::debug!(
                monitor = monitor.name(),
                ?overlap,
                "copying monitor pixels into snippet"
            );
            copy_overlap(&img, &bounds, &mut combined, &region, &overlap);
            covered = true;
        }

        if !covered {
            return Err(CaptureError::OutsideDesktop(region));
        }

        Ok(combined)
    }
}

/// Copies `overlap` (absolute coordinates) from a monitor image into the
/// region image. Monitor images may be larger than the logical monitor size
/// on scaled displays; pixels beyond the source are skipped.
fn copy_overlap(
    source: &RgbaImage,
    source_bounds: &Rectangle,
    dest: &mut RgbaImage,
    dest_bounds: &Rectangle,
    overlap: &Rectangle,
) {
    let src_x = (overlap.x - source_bounds.x) as u32;
    let src_y = (overlap.y - source_bounds.y) as u32;
    let dst_x = (overlap.x - dest_bounds.x) as u32;
    let dst_y = (overlap.y - dest_bounds.y) as u32;

    for dy in 0..overlap.height {
        for dx in 0..overlap.width {
            let (sx, sy) = (src_x + dx, src_y + dy);
            let (tx, ty) = (dst_x + dx, dst_y + dy);
            if sx < source.width() && sy < source.height() && tx < dest.width() && ty < dest.height()
            {
                dest.put_pixel(tx, ty, *source.get_pixel(sx, sy));
            }
        }
    }
}
