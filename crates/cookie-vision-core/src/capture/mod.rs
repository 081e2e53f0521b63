//! Game-monitor frame capture
//!
//! [`FrameCapturer`] turns a raw virtual-desktop grab into a canonical
//! game-monitor frame: grab via a [`DesktopGrabber`], crop the bottom-left
//! region per the dual-monitor geometry rule, and resample to the canonical
//! resolution (1920x1080 by default).

mod geometry;
mod grabber;

pub use geometry::{region_for, CaptureRegion};
pub use grabber::{DesktopGrabber, GdiGrabber};

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::error::Result;
use crate::frame::Frame;

/// Default canonical capture width
pub const CANONICAL_WIDTH: u32 = 1920;
/// Default canonical capture height
pub const CANONICAL_HEIGHT: u32 = 1080;

/// Captures canonical game-monitor frames from a desktop grab source
pub struct FrameCapturer<G: DesktopGrabber> {
    grabber: G,
    canonical_width: u32,
    canonical_height: u32,
}

impl<G: DesktopGrabber> FrameCapturer<G> {
    /// Create a capturer with the default 1920x1080 canonical resolution
    pub fn new(grabber: G) -> Self {
        Self::with_canonical(grabber, CANONICAL_WIDTH, CANONICAL_HEIGHT)
    }

    /// Create a capturer with an explicit canonical resolution
    pub fn with_canonical(grabber: G, width: u32, height: u32) -> Self {
        Self {
            grabber,
            canonical_width: width,
            canonical_height: height,
        }
    }

    /// Feature-relevant frame dimensions: (width, height)
    pub fn canonical_size(&self) -> (u32, u32) {
        (self.canonical_width, self.canonical_height)
    }

    /// Capture one canonical frame of the game monitor.
    ///
    /// Fails with [`crate::Error::Geometry`] if the virtual desktop is
    /// smaller than the canonical region in either dimension, and with
    /// [`crate::Error::Capture`] if the platform grab itself fails.
    pub fn capture(&mut self) -> Result<Frame> {
        let desktop = self.grabber.grab()?;
        let region = region_for(
            desktop.width(),
            desktop.height(),
            self.canonical_width,
            self.canonical_height,
        )?;
        debug!(
            desktop_width = desktop.width(),
            desktop_height = desktop.height(),
            region_x = region.x,
            region_y = region.y,
            "cropping game monitor region"
        );

        let mut img = desktop.into_image();
        let cropped = imageops::crop(&mut img, region.x, region.y, region.width, region.height)
            .to_image();

        // The region matches the canonical size by construction, so this is
        // normally an identity; resample only if they ever diverge.
        let canonical = if cropped.dimensions() == (self.canonical_width, self.canonical_height) {
            cropped
        } else {
            imageops::resize(
                &cropped,
                self.canonical_width,
                self.canonical_height,
                FilterType::CatmullRom,
            )
        };

        Ok(Frame::from_image(canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Grabber returning a fixed synthetic desktop
    struct StaticGrabber {
        width: u32,
        height: u32,
    }

    impl DesktopGrabber for StaticGrabber {
        fn grab(&mut self) -> Result<Frame> {
            // Every pixel's red channel encodes its row, green its column
            let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
            for y in 0..self.height {
                for x in 0..self.width {
                    data.extend_from_slice(&[(y % 256) as u8, (x % 256) as u8, 7]);
                }
            }
            Frame::from_rgb(self.width, self.height, data)
        }
    }

    #[test]
    fn test_capture_crops_bottom_left() {
        let grabber = StaticGrabber {
            width: 8,
            height: 10,
        };
        let mut capturer = FrameCapturer::with_canonical(grabber, 4, 6);
        let frame = capturer.capture().unwrap();

        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 6);
        // Top-left of the crop is desktop pixel (0, 10 - 6) = (0, 4)
        assert_eq!(frame.pixel(0, 0, 0), 4);
        assert_eq!(frame.pixel(0, 0, 1), 0);
        // Bottom-right of the crop is desktop pixel (3, 9)
        assert_eq!(frame.pixel(3, 5, 0), 9);
        assert_eq!(frame.pixel(3, 5, 1), 3);
    }

    #[test]
    fn test_capture_rejects_small_desktop() {
        let grabber = StaticGrabber {
            width: 4,
            height: 4,
        };
        let mut capturer = FrameCapturer::with_canonical(grabber, 4, 6);
        assert!(matches!(
            capturer.capture().unwrap_err(),
            Error::Geometry { .. }
        ));
    }

    #[test]
    fn test_default_canonical_size() {
        let capturer = FrameCapturer::new(StaticGrabber {
            width: 1,
            height: 1,
        });
        assert_eq!(capturer.canonical_size(), (1920, 1080));
    }
}
