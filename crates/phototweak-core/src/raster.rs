//! RGB pixel buffers handed to and returned from the crop renderer.

use crate::error::{GeometryError, Result};
use crate::geometry::Size;
use image::RgbImage;

/// A decoded image as tightly packed RGB bytes, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGB pixel data (3 bytes per pixel)
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wrap a pixel buffer, checking its length against the dimensions.
    /// Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptyImage {
                width: f64::from(width),
                height: f64::from(height),
            });
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(GeometryError::InvalidPixelBuffer {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// View the buffer as an `image` crate buffer.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            GeometryError::InvalidPixelBuffer {
                width: self.width,
                height: self.height,
                actual: self.pixels.len(),
            },
        )
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        }
    }

    /// RGB value at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(DecodedImage::new(2, 2, vec![0; 12]).is_ok());
        let err = DecodedImage::new(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidPixelBuffer {
                width: 2,
                height: 2,
                actual: 11
            }
        );
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            DecodedImage::new(0, 5, vec![]),
            Err(GeometryError::EmptyImage {
                width: 0.0,
                height: 5.0
            })
        );
        assert!(DecodedImage::new(5, 0, vec![]).is_err());
    }

    #[test]
    fn test_rgb_image_round_trip() {
        let pixels: Vec<u8> = (0..(3 * 2 * 3)).map(|v| v as u8).collect();
        let img = DecodedImage::new(3, 2, pixels).unwrap();
        let back = DecodedImage::from_rgb_image(img.to_rgb_image().unwrap());
        assert_eq!(back, img);
        assert_eq!(back.pixel(1, 1), [12, 13, 14]);
    }
}
