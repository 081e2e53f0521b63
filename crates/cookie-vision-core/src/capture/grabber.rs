//! Platform screen-grab primitive
//!
//! The capture pipeline only depends on [`DesktopGrabber`]; the GDI
//! implementation below is the production source, and tests substitute
//! in-memory grabbers.
//!
//! # Platform Support
//!
//! - **Windows**: full virtual-desktop capture via GDI
//! - **Linux/macOS**: not supported (returns error)

use crate::error::Result;
use crate::frame::Frame;

/// Source of raw virtual-desktop frames.
///
/// `grab` returns one frame covering the entire virtual desktop (the union
/// of all monitors as a single coordinate space). Blocking; called once per
/// labeling event.
pub trait DesktopGrabber {
    fn grab(&mut self) -> Result<Frame>;
}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use crate::error::Error;

    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, CAPTUREBLT,
        DIB_RGB_COLORS, ROP_CODE, SRCCOPY,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
        SM_YVIRTUALSCREEN,
    };

    /// Grabs the whole virtual desktop with a GDI BitBlt.
    ///
    /// Equivalent to an "all screens" screenshot: the source rectangle spans
    /// `SM_XVIRTUALSCREEN..+SM_CXVIRTUALSCREEN` in both axes, so secondary
    /// monitors are included wherever the OS places them.
    #[derive(Debug, Default)]
    pub struct GdiGrabber;

    impl GdiGrabber {
        pub fn new() -> Self {
            Self
        }
    }

    impl DesktopGrabber for GdiGrabber {
        fn grab(&mut self) -> Result<Frame> {
            // SAFETY: plain GDI calls on handles acquired and released here
            unsafe { grab_virtual_screen() }
        }
    }

    unsafe fn grab_virtual_screen() -> Result<Frame> {
        let left = GetSystemMetrics(SM_XVIRTUALSCREEN);
        let top = GetSystemMetrics(SM_YVIRTUALSCREEN);
        let width = GetSystemMetrics(SM_CXVIRTUALSCREEN);
        let height = GetSystemMetrics(SM_CYVIRTUALSCREEN);
        if width <= 0 || height <= 0 {
            return Err(Error::Capture(
                "virtual desktop reports zero size".to_string(),
            ));
        }

        let screen_dc = GetDC(HWND(0));
        if screen_dc.is_invalid() {
            return Err(Error::Capture("GetDC failed for the screen".to_string()));
        }
        let mem_dc = CreateCompatibleDC(screen_dc);
        if mem_dc.is_invalid() {
            ReleaseDC(HWND(0), screen_dc);
            return Err(Error::Capture("CreateCompatibleDC failed".to_string()));
        }
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        if bitmap.is_invalid() {
            DeleteDC(mem_dc);
            ReleaseDC(HWND(0), screen_dc);
            return Err(Error::Capture("CreateCompatibleBitmap failed".to_string()));
        }

        let prev = SelectObject(mem_dc, bitmap);
        let result = BitBlt(
            mem_dc,
            0,
            0,
            width,
            height,
            screen_dc,
            left,
            top,
            ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0),
        )
        .map_err(|e| Error::Capture(format!("BitBlt failed: {}", e)))
        .and_then(|_| {
            // Copy the bitmap out as top-down 32bpp BGRA
            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    // Negative height requests top-down row order
                    biHeight: -height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut bgra = vec![0u8; width as usize * height as usize * 4];
            let copied = GetDIBits(
                mem_dc,
                bitmap,
                0,
                height as u32,
                Some(bgra.as_mut_ptr() as *mut _),
                &mut info,
                DIB_RGB_COLORS,
            );
            if copied == 0 {
                return Err(Error::Capture("GetDIBits failed".to_string()));
            }
            Ok(bgra)
        });
        SelectObject(mem_dc, prev);

        DeleteObject(bitmap);
        DeleteDC(mem_dc);
        ReleaseDC(HWND(0), screen_dc);

        let bgra = result?;
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for px in bgra.chunks_exact(4) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }

        Frame::from_rgb(width as u32, height as u32, rgb)
    }
}

// ============================================================================
// Non-Windows Stubs
// ============================================================================

#[cfg(not(windows))]
mod stub_impl {
    use super::*;
    use crate::error::Error;

    /// Capture is not supported on non-Windows platforms
    #[derive(Debug, Default)]
    pub struct GdiGrabber;

    impl GdiGrabber {
        pub fn new() -> Self {
            Self
        }
    }

    impl DesktopGrabber for GdiGrabber {
        fn grab(&mut self) -> Result<Frame> {
            Err(Error::Capture(
                "screen capture is only supported on Windows".to_string(),
            ))
        }
    }
}

#[cfg(windows)]
pub use windows_impl::GdiGrabber;

#[cfg(not(windows))]
pub use stub_impl::GdiGrabber;
