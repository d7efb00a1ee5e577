mod canvas;
#[cfg(feature = "window")]
mod window;

pub use canvas::Canvas;
#[cfg(feature = "window")]
pub use window::WindowSurface;

use anyhow::Result;

use crate::{
    mapping::ColorPoint,
    types::{Bitmap, Point},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pen {
    pub color: Color,
    pub width: u32,
}

/// Anything the viewer can paint a frame onto.
pub trait Surface {
    fn is_minimized(&self) -> bool;

    fn is_open(&self) -> bool;

    /// Overwrites the region starting at `origin` with `bitmap`.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point);

    fn draw_line(&mut self, from: ColorPoint, to: ColorPoint, pen: Pen);

    /// Pushes everything drawn since the last call to the display.
    fn present(&mut self) -> Result<()>;

    /// Services window events without redrawing.
    fn pump_events(&mut self) -> Result<()> {
        Ok(())
    }
}
