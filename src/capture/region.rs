use image::RgbaImage;

use super::{Capture, CaptureError, CaptureResult, DesktopGrabber, PixelGrab, Rectangle};

/// Extracts an absolute desktop rectangle through a [`PixelGrab`] surface.
pub struct RegionCapture<G: PixelGrab = DesktopGrabber> {
    region: Rectangle,
    grabber: G,
}

impl RegionCapture<DesktopGrabber> {
    pub fn new(region: Rectangle) -> Self {
        Self::with_grabber(region, DesktopGrabber::new())
    }
}

impl<G: PixelGrab> RegionCapture<G> {
    pub fn with_grabber(region: Rectangle, grabber: G) -> Self {
        Self { region, grabber }
    }
}

impl<G: PixelGrab> Capture for RegionCapture<G> {
    fn capture(&self) -> CaptureResult<RgbaImage> {
        if self.region.is_empty() {
            return Err(CaptureError::EmptyRegion {
                width: self.region.width,
                height: self.region.height,
            });
        }

        let image = self.grabber.grab_region(self.region)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::EmptyRegion {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingGrabber {
        requests: RefCell<Vec<Rectangle>>,
        degenerate: bool,
    }

    impl PixelGrab for &RecordingGrabber {
        fn grab_region(&self, region: Rectangle) -> CaptureResult<RgbaImage> {
            self.requests.borrow_mut().push(region);
            if self.degenerate {
                return Ok(RgbaImage::new(0, 0));
            }
            Ok(RgbaImage::new(region.width, region.height))
        }
    }

    #[test]
    fn passes_absolute_region_to_grabber() {
        let grabber = RecordingGrabber::default();
        let region = Rectangle::new(-1870, 50, 50, 50);
        let image = RegionCapture::with_grabber(region, &grabber)
            .capture()
            .expect("capture should succeed");

        assert_eq!((image.width(), image.height()), (50, 50));
        assert_eq!(grabber.requests.borrow().as_slice(), &[region]);
    }

    #[test]
    fn zero_area_region_fails_without_grabbing() {
        let grabber = RecordingGrabber::default();
        let err = RegionCapture::with_grabber(Rectangle::new(10, 10, 0, 0), &grabber)
            .capture()
            .expect_err("zero-area capture should fail");

        assert!(matches!(err, CaptureError::EmptyRegion { .. }));
        assert!(grabber.requests.borrow().is_empty());
    }

    #[test]
    fn degenerate_image_from_grabber_is_a_capture_failure() {
        let grabber = RecordingGrabber {
            degenerate: true,
            ..Default::default()
        };
        let err = RegionCapture::with_grabber(Rectangle::new(0, 0, 20, 20), &grabber)
            .capture()
            .expect_err("degenerate image should fail");

        assert!(matches!(
            err,
            CaptureError::EmptyRegion {
                width: 0,
                height: 0
            }
        ));
    }
}
