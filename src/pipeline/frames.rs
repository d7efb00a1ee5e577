use thiserror::Error;

use crate::types::{Bitmap, ColorFrame, DepthFrame, PixelFormat};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("{kind} frame carries {actual} bytes, expected {expected} for {width}x{height}")]
    PixelDataLength {
        kind: &'static str,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Copies a color frame's BGRX bytes into a 32 bpp bitmap without conversion.
pub fn color_frame_to_bitmap(frame: &ColorFrame) -> Result<Bitmap, FrameError> {
    let expected =
        frame.width as usize * frame.height as usize * PixelFormat::Bgr32.bytes_per_pixel();
    if frame.pixel_data_length() != expected {
        return Err(FrameError::PixelDataLength {
            kind: "color",
            width: frame.width,
            height: frame.height,
            expected,
            actual: frame.pixel_data_length(),
        });
    }

    let mut data = vec![0u8; expected];
    data.copy_from_slice(&frame.pixel_data);

    Ok(Bitmap {
        width: frame.width,
        height: frame.height,
        format: PixelFormat::Bgr32,
        data,
    })
}

/// Reinterprets raw 16-bit depth samples as RGB565 pixels.
pub fn depth_frame_to_bitmap(frame: &DepthFrame) -> Result<Bitmap, FrameError> {
    let pixels = frame.width as usize * frame.height as usize;
    if frame.pixel_data_length() != pixels {
        return Err(FrameError::PixelDataLength {
            kind: "depth",
            width: frame.width,
            height: frame.height,
            expected: pixels * PixelFormat::Rgb565.bytes_per_pixel(),
            actual: frame.pixel_data_length() * PixelFormat::Rgb565.bytes_per_pixel(),
        });
    }

    let data = frame
        .pixel_data
        .iter()
        .flat_map(|sample| sample.to_le_bytes())
        .collect();

    Ok(Bitmap {
        width: frame.width,
        height: frame.height,
        format: PixelFormat::Rgb565,
        data,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::mapping::{ColorImageFormat, DepthImageFormat};

    fn color_frame(width: u32, height: u32, len: usize) -> ColorFrame {
        ColorFrame {
            format: ColorImageFormat::RgbResolution640x480Fps30,
            width,
            height,
            pixel_data: (0..len).map(|i| (i % 251) as u8).collect(),
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn color_copy_preserves_dimensions_and_bytes() {
        let frame = color_frame(4, 3, 4 * 3 * 4);
        let bitmap = color_frame_to_bitmap(&frame).unwrap();

        assert_eq!((bitmap.width, bitmap.height), (4, 3));
        assert_eq!(bitmap.format, PixelFormat::Bgr32);
        assert_eq!(bitmap.stride(), 16);
        assert_eq!(bitmap.data.len(), frame.pixel_data_length());
        assert_eq!(bitmap.data, frame.pixel_data);
    }

    #[test]
    fn color_copy_handles_full_resolution() {
        let frame = color_frame(640, 480, 640 * 480 * 4);
        let bitmap = color_frame_to_bitmap(&frame).unwrap();
        assert_eq!(bitmap.data.len(), 1_228_800);
    }

    #[test]
    fn color_copy_rejects_stride_mismatch() {
        let frame = color_frame(4, 3, 4 * 3 * 3);
        let err = color_frame_to_bitmap(&frame).unwrap_err();
        assert_eq!(
            err,
            FrameError::PixelDataLength {
                kind: "color",
                width: 4,
                height: 3,
                expected: 48,
                actual: 36,
            }
        );
    }

    #[test]
    fn depth_samples_become_little_endian_565() {
        let frame = DepthFrame {
            format: DepthImageFormat::Resolution320x240Fps30,
            width: 2,
            height: 1,
            pixel_data: vec![0xF800, 0x001F],
            timestamp: Instant::now(),
        };
        let bitmap = depth_frame_to_bitmap(&frame).unwrap();

        assert_eq!(bitmap.format, PixelFormat::Rgb565);
        assert_eq!(bitmap.data, vec![0x00, 0xF8, 0x1F, 0x00]);
        assert_eq!(bitmap.stride(), 4);
    }

    #[test]
    fn depth_copy_rejects_short_buffer() {
        let frame = DepthFrame {
            format: DepthImageFormat::Resolution320x240Fps30,
            width: 2,
            height: 2,
            pixel_data: vec![0; 3],
            timestamp: Instant::now(),
        };
        assert!(depth_frame_to_bitmap(&frame).is_err());
    }
}
