use anyhow::Result;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use super::{Color, Pen, Surface};
use crate::{
    mapping::ColorPoint,
    types::{Bitmap, PixelFormat, Point},
};

/// Off-screen RGBA surface. Also the backing store of the window surface.
pub struct Canvas {
    image: RgbaImage,
    presented: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            image: RgbaImage::new(width, height),
            presented: 0,
        };
        canvas.clear(Color::BLACK);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[allow(dead_code)]
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    pub fn clear(&mut self, color: Color) {
        for px in self.image.pixels_mut() {
            *px = Rgba([color.r, color.g, color.b, 255]);
        }
    }

    #[allow(dead_code)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let Rgba([r, g, b, _]) = *self.image.get_pixel(x, y);
        Some(Color::rgb(r, g, b))
    }

    /// Packs the canvas as `0RGB` words, the layout most framebuffers expect.
    #[cfg_attr(not(feature = "window"), allow(dead_code))]
    pub fn to_u32_buffer(&self) -> Vec<u32> {
        self.image
            .as_raw()
            .par_chunks_exact(4)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect()
    }

    fn fill_square(&mut self, cx: i32, cy: i32, width: u32, color: Color) {
        let half = width as i32 / 2;
        let lo = -half;
        let hi = width as i32 - half;
        for dy in lo..hi {
            for dx in lo..hi {
                self.set_pixel(cx + dx, cy + dy, color);
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image
                .put_pixel(x as u32, y as u32, Rgba([color.r, color.g, color.b, 255]));
        }
    }
}

impl Surface for Canvas {
    fn is_minimized(&self) -> bool {
        false
    }

    fn is_open(&self) -> bool {
        true
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) {
        let canvas_width = self.width() as i64;
        let canvas_height = self.height() as i64;

        let x0 = (origin.x as i64).clamp(0, canvas_width);
        let x1 = (origin.x as i64 + bitmap.width as i64).clamp(0, canvas_width);
        let y0 = (origin.y as i64).clamp(0, canvas_height);
        let y1 = (origin.y as i64 + bitmap.height as i64).clamp(0, canvas_height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let src_stride = bitmap.stride();
        let bpp = bitmap.format.bytes_per_pixel();
        let dst_stride = canvas_width as usize * 4;
        let src_col = (x0 - origin.x as i64) as usize;
        let cols = (x1 - x0) as usize;
        let format = bitmap.format;

        let rows: &mut [u8] = &mut self.image;
        rows.par_chunks_exact_mut(dst_stride)
            .enumerate()
            .skip(y0 as usize)
            .take((y1 - y0) as usize)
            .for_each(|(y, dst_row)| {
                let src_row_index = (y as i64 - origin.y as i64) as usize;
                let src_start = src_row_index * src_stride + src_col * bpp;
                let src = &bitmap.data[src_start..src_start + cols * bpp];
                let dst = &mut dst_row[x0 as usize * 4..(x0 as usize + cols) * 4];

                match format {
                    PixelFormat::Bgr32 => {
                        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                            d[0] = s[2];
                            d[1] = s[1];
                            d[2] = s[0];
                            d[3] = 255;
                        }
                    }
                    PixelFormat::Rgb565 => {
                        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(2)) {
                            let v = u16::from_le_bytes([s[0], s[1]]);
                            let r = ((v >> 11) & 0x1F) as u8;
                            let g = ((v >> 5) & 0x3F) as u8;
                            let b = (v & 0x1F) as u8;
                            d[0] = (r << 3) | (r >> 2);
                            d[1] = (g << 2) | (g >> 4);
                            d[2] = (b << 3) | (b >> 2);
                            d[3] = 255;
                        }
                    }
                }
            });
    }

    fn draw_line(&mut self, from: ColorPoint, to: ColorPoint, pen: Pen) {
        let margin = pen.width as f32;
        let bounds = (
            -margin,
            -margin,
            self.width() as f32 + margin,
            self.height() as f32 + margin,
        );
        let Some((x0, y0, x1, y1)) = clip_segment(
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            bounds,
        ) else {
            return;
        };

        // Bresenham over the clipped segment, stamping a square brush.
        let (mut x, mut y) = (x0.round() as i32, y0.round() as i32);
        let (x1, y1) = (x1.round() as i32, y1.round() as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.fill_square(x, y, pen.width.max(1), pen.color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Liang-Barsky clip of a segment against `(min_x, min_y, max_x, max_y)`.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<(f32, f32, f32, f32)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, from.0 - min_x),
        (dx, max_x - from.0),
        (-dy, from.1 - min_y),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    if !t0.is_finite() || !t1.is_finite() {
        return None;
    }

    Some((
        from.0 + t0 * dx,
        from.1 + t0 * dy,
        from.0 + t1 * dx,
        from.1 + t1 * dy,
    ))
}
