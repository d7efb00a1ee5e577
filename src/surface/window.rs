use anyhow::{Context, Result};
use minifb::{Key, Window, WindowOptions};

use super::{Canvas, Pen, Surface};
use crate::{
    mapping::ColorPoint,
    types::{Bitmap, Point},
};

/// Desktop window that shows a [`Canvas`] on every `present`.
pub struct WindowSurface {
    window: Window,
    canvas: Canvas,
}

impl WindowSurface {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .context("failed to create viewer window")?;

        Ok(Self {
            window,
            canvas: Canvas::new(width, height),
        })
    }
}

impl Surface for WindowSurface {
    fn is_minimized(&self) -> bool {
        // minifb has no minimized query; a minimized window reports a zero size.
        let (w, h) = self.window.get_size();
        w == 0 || h == 0
    }

    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Point) {
        self.canvas.draw_bitmap(bitmap, origin);
    }

    fn draw_line(&mut self, from: ColorPoint, to: ColorPoint, pen: Pen) {
        self.canvas.draw_line(from, to, pen);
    }

    fn pump_events(&mut self) -> Result<()> {
        self.window.update();
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let buffer = self.canvas.to_u32_buffer();
        self.window
            .update_with_buffer(
                &buffer,
                self.canvas.width() as usize,
                self.canvas.height() as usize,
            )
            .context("failed to update viewer window")?;
        self.canvas.present()
    }
}
