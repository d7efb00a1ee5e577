use crate::skeleton::SkeletonPoint;

/// Nominal focal length of the color camera at 640 pixels wide.
const COLOR_FOCAL_LENGTH_640: f32 = 531.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorImageFormat {
    RgbResolution640x480Fps30,
    #[allow(dead_code)]
    RgbResolution1280x960Fps12,
}

impl ColorImageFormat {
    pub fn width(self) -> u32 {
        match self {
            ColorImageFormat::RgbResolution640x480Fps30 => 640,
            ColorImageFormat::RgbResolution1280x960Fps12 => 1280,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            ColorImageFormat::RgbResolution640x480Fps30 => 480,
            ColorImageFormat::RgbResolution1280x960Fps12 => 960,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthImageFormat {
    Resolution320x240Fps30,
    #[allow(dead_code)]
    Resolution640x480Fps30,
}

impl DepthImageFormat {
    pub fn width(self) -> u32 {
        match self {
            DepthImageFormat::Resolution320x240Fps30 => 320,
            DepthImageFormat::Resolution640x480Fps30 => 640,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            DepthImageFormat::Resolution320x240Fps30 => 240,
            DepthImageFormat::Resolution640x480Fps30 => 480,
        }
    }
}

/// Pixel position in the color image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorPoint {
    pub x: i32,
    pub y: i32,
}

impl ColorPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Projects skeleton-space positions into color-image pixels.
pub fn map_skeleton_point_to_color_point(
    point: SkeletonPoint,
    format: ColorImageFormat,
) -> ColorPoint {
    let width = format.width() as f32;
    let height = format.height() as f32;
    let focal = COLOR_FOCAL_LENGTH_640 * width / 640.0;

    let u = width / 2.0 + focal * point.x / point.z;
    let v = height / 2.0 - focal * point.y / point.z;

    // `as` saturates and maps NaN to zero, so bad depth lands off-screen or at the origin.
    ColorPoint::new(u as i32, v as i32)
}
