//! Captured frame buffers

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// A captured RGB frame.
///
/// Pixels are stored row-major, channel-minor (R, G, B per pixel), the same
/// layout the encoder flattens into feature vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Number of channels per pixel
    pub const CHANNELS: usize = 3;

    /// Create a frame from raw RGB bytes.
    ///
    /// Fails if `data` does not hold exactly `width * height * 3` bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(Error::Capture(format!(
                "frame buffer is {} bytes, expected {} for {}x{} RGB",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, row-major, channel-minor
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame, returning the raw pixel bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Single channel value at (x, y); `channel` is 0..3. Panics out of range.
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32, channel: usize) -> u8 {
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS + channel;
        self.data[idx]
    }

    /// Save the frame as a PNG, for capture-geometry calibration
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let img = self.clone().into_image();
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| Error::Capture(format!("failed to save PNG: {}", e)))
    }

    /// Convert into an `image::RgbImage` for cropping/resampling
    pub(crate) fn into_image(self) -> RgbImage {
        // Layout matches exactly, so this never fails for a valid Frame
        RgbImage::from_raw(self.width, self.height, self.data)
            .unwrap_or_else(|| RgbImage::new(0, 0))
    }

    /// Build a frame from an `image::RgbImage`
    pub(crate) fn from_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_checks_length() {
        assert!(Frame::from_rgb(2, 2, vec![0u8; 12]).is_ok());
        assert!(Frame::from_rgb(2, 2, vec![0u8; 11]).is_err());
        assert!(Frame::from_rgb(2, 2, vec![0u8; 13]).is_err());
    }

    #[test]
    fn test_image_round_trip() {
        let data: Vec<u8> = (0..27).collect();
        let frame = Frame::from_rgb(3, 3, data.clone()).unwrap();
        let back = Frame::from_image(frame.into_image());
        assert_eq!(back.data(), data.as_slice());
        assert_eq!(back.width(), 3);
        assert_eq!(back.height(), 3);
    }
}
