use std::time::Instant;

use crate::{
    mapping::{ColorImageFormat, DepthImageFormat},
    skeleton::Skeleton,
};

#[derive(Clone, Debug)]
pub struct ColorFrame {
    pub format: ColorImageFormat,
    pub width: u32,
    pub height: u32,
    /// BGRX bytes, `width * height * 4` long.
    pub pixel_data: Vec<u8>,
    pub timestamp: Instant,
}

impl ColorFrame {
    pub fn pixel_data_length(&self) -> usize {
        self.pixel_data.len()
    }
}

#[derive(Clone, Debug)]
pub struct DepthFrame {
    #[allow(dead_code)]
    pub format: DepthImageFormat,
    pub width: u32,
    pub height: u32,
    pub pixel_data: Vec<u16>,
    #[allow(dead_code)]
    pub timestamp: Instant,
}

impl DepthFrame {
    pub fn pixel_data_length(&self) -> usize {
        self.pixel_data.len()
    }
}

#[derive(Clone, Debug)]
pub struct SkeletonFrame {
    skeletons: Vec<Skeleton>,
    #[allow(dead_code)]
    pub timestamp: Instant,
}

impl SkeletonFrame {
    pub fn new(skeletons: Vec<Skeleton>, timestamp: Instant) -> Self {
        Self {
            skeletons,
            timestamp,
        }
    }

    pub fn skeleton_array_length(&self) -> usize {
        self.skeletons.len()
    }

    /// Copies the skeleton slots out so they outlive the frame.
    pub fn copy_skeleton_data(&self) -> Vec<Skeleton> {
        self.skeletons.clone()
    }
}

/// One sensor tick. Each sub-frame is independently optional.
#[derive(Clone, Debug, Default)]
pub struct AllFramesReady {
    pub color: Option<ColorFrame>,
    pub depth: Option<DepthFrame>,
    pub skeleton: Option<SkeletonFrame>,
}

impl AllFramesReady {
    pub fn open_color_image_frame(&mut self) -> Option<ColorFrame> {
        self.color.take()
    }

    pub fn open_depth_image_frame(&mut self) -> Option<DepthFrame> {
        self.depth.take()
    }

    pub fn open_skeleton_frame(&mut self) -> Option<SkeletonFrame> {
        self.skeleton.take()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32 bpp, bytes ordered blue, green, red, unused.
    Bgr32,
    /// 16 bpp little-endian 5-6-5.
    Rgb565,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgr32 => 4,
            PixelFormat::Rgb565 => 2,
        }
    }
}

/// Displayable image whose rows are tightly packed in `format`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Bitmap {
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
