//! Capture-region selection on the virtual desktop
//!
//! The collector assumes a dual-monitor setup with the game monitor stacked
//! directly below the primary at the same horizontal origin, so the region
//! of interest is the bottom-left `W0 x H0` block of the virtual desktop:
//! top-left corner `(0, Ht - H0)`. That assumption is a documented
//! limitation, not a general multi-monitor solution.

use crate::error::{Error, Result};

/// A rectangular region of the virtual desktop, in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Region width in pixels
    pub width: u32,
    /// Region height in pixels
    pub height: u32,
}

/// Select the game-monitor region for a virtual desktop of the given size.
///
/// Returns the bottom-left `region_width x region_height` block. Fails with
/// [`Error::Geometry`] when the desktop is too small in either dimension;
/// the region is never clamped or wrapped.
pub fn region_for(
    desktop_width: u32,
    desktop_height: u32,
    region_width: u32,
    region_height: u32,
) -> Result<CaptureRegion> {
    if desktop_width < region_width || desktop_height < region_height {
        return Err(Error::Geometry {
            desktop_width,
            desktop_height,
            region_width,
            region_height,
        });
    }

    Ok(CaptureRegion {
        x: 0,
        y: desktop_height - region_height,
        width: region_width,
        height: region_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_left_rule() {
        // Primary 2560x1440 above a 1920x1080 game monitor
        let region = region_for(2560, 2520, 1920, 1080).unwrap();
        assert_eq!(region.x, 0);
        assert_eq!(region.y, 2520 - 1080);
        assert_eq!(region.width, 1920);
        assert_eq!(region.height, 1080);
    }

    #[test]
    fn test_stacked_full_hd_monitors() {
        let region = region_for(1920, 2160, 1920, 1080).unwrap();
        assert_eq!((region.x, region.y), (0, 1080));
        assert_eq!((region.width, region.height), (1920, 1080));
    }

    #[test]
    fn test_exact_fit() {
        let region = region_for(1920, 1080, 1920, 1080).unwrap();
        assert_eq!(region.y, 0);
    }

    #[test]
    fn test_desktop_too_short() {
        let err = region_for(1920, 1000, 1920, 1080).unwrap_err();
        assert!(matches!(err, Error::Geometry { .. }));
    }

    #[test]
    fn test_desktop_too_narrow() {
        let err = region_for(1280, 2160, 1920, 1080).unwrap_err();
        assert!(matches!(err, Error::Geometry { .. }));
    }
}
