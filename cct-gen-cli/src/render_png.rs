//! Raster PNG preview backend.
//!
//! Rasterizes the analytic shapes directly: each pixel is classified by
//! its center point against the disc / annular-sector geometry, into an
//! 8-bit grayscale buffer. Labels are not rasterized; the PNG output is a
//! screen preview, the print path is SVG/PDF.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use cct_gen::page::{Ink, PageWriter};

fn shade(ink: Ink) -> u8 {
    match ink {
        Ink::Dark => 0,
        Ink::Light => 255,
    }
}

struct Canvas {
    width_px: usize,
    height_px: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    fn paint(&mut self, x: usize, y: usize, gray: u8) {
        if x < self.width_px && y < self.height_px {
            self.pixels[y * self.width_px + x] = gray;
        }
    }
}

/// A [`PageWriter`] rasterizing pages at a fixed pixel density.
pub struct PngWriter {
    scale_px_per_mm: f64,
    pages: Vec<Canvas>,
    current: Option<Canvas>,
}

impl PngWriter {
    pub fn new(scale_px_per_mm: f64) -> PngWriter {
        PngWriter {
            scale_px_per_mm,
            pages: Vec::new(),
            current: None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write one finished page as a grayscale PNG.
    pub fn write_page(&self, idx: usize, path: &Path) -> Result<()> {
        let canvas = self
            .pages
            .get(idx)
            .with_context(|| format!("no rasterized page {idx}"))?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let w = io::BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, canvas.width_px as u32, canvas.height_px as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .with_context(|| format!("writing PNG header for {}", path.display()))?;
        writer
            .write_image_data(&canvas.pixels)
            .with_context(|| format!("writing PNG data for {}", path.display()))?;
        Ok(())
    }

    fn canvas(&mut self) -> io::Result<&mut Canvas> {
        self.current
            .as_mut()
            .ok_or_else(|| io::Error::other("draw call outside a page"))
    }

    fn to_px(&self, mm: f64) -> f64 {
        mm * self.scale_px_per_mm
    }
}

impl PageWriter for PngWriter {
    fn begin_page(&mut self, width_mm: f64, height_mm: f64) -> io::Result<()> {
        let width_px = (self.to_px(width_mm)).ceil().max(1.0) as usize;
        let height_px = (self.to_px(height_mm)).ceil().max(1.0) as usize;
        self.current = Some(Canvas {
            width_px,
            height_px,
            pixels: vec![255u8; width_px * height_px],
        });
        Ok(())
    }

    fn rect(&mut self, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64, ink: Ink) -> io::Result<()> {
        let gray = shade(ink);
        let scale = self.scale_px_per_mm;
        let canvas = self.canvas()?;
        let x0 = (x_mm * scale).floor().max(0.0) as usize;
        let y0 = (y_mm * scale).floor().max(0.0) as usize;
        let x1 = (((x_mm + w_mm) * scale).ceil() as usize).min(canvas.width_px);
        let y1 = (((y_mm + h_mm) * scale).ceil() as usize).min(canvas.height_px);
        for y in y0..y1 {
            for x in x0..x1 {
                canvas.paint(x, y, gray);
            }
        }
        Ok(())
    }

    fn disc(&mut self, cx_mm: f64, cy_mm: f64, radius_mm: f64, ink: Ink) -> io::Result<()> {
        let gray = shade(ink);
        let scale = self.scale_px_per_mm;
        let (cx, cy, r) = (cx_mm * scale, cy_mm * scale, radius_mm * scale);
        let canvas = self.canvas()?;
        let x0 = ((cx - r).floor().max(0.0)) as usize;
        let y0 = ((cy - r).floor().max(0.0)) as usize;
        let x1 = (((cx + r).ceil()) as usize).min(canvas.width_px);
        let y1 = (((cy + r).ceil()) as usize).min(canvas.height_px);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    canvas.paint(x, y, gray);
                }
            }
        }
        Ok(())
    }

    fn ring_sector(
        &mut self,
        cx_mm: f64,
        cy_mm: f64,
        r_inner_mm: f64,
        r_outer_mm: f64,
        start_deg: f64,
        sweep_deg: f64,
        ink: Ink,
    ) -> io::Result<()> {
        let gray = shade(ink);
        let scale = self.scale_px_per_mm;
        let (cx, cy) = (cx_mm * scale, cy_mm * scale);
        let (r_in, r_out) = (r_inner_mm * scale, r_outer_mm * scale);
        let canvas = self.canvas()?;
        let x0 = ((cx - r_out).floor().max(0.0)) as usize;
        let y0 = ((cy - r_out).floor().max(0.0)) as usize;
        let x1 = (((cx + r_out).ceil()) as usize).min(canvas.width_px);
        let y1 = (((cy + r_out).ceil()) as usize).min(canvas.height_px);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 < r_in * r_in || d2 > r_out * r_out {
                    continue;
                }
                let angle = dy.atan2(dx).to_degrees();
                let rel = (angle - start_deg).rem_euclid(360.0);
                if rel < sweep_deg {
                    canvas.paint(x, y, gray);
                }
            }
        }
        Ok(())
    }

    fn label(&mut self, _: f64, _: f64, _: f64, _: &str, _: Ink) -> io::Result<()> {
        // Preview output carries no text.
        Ok(())
    }

    fn end_page(&mut self) -> io::Result<()> {
        let canvas = self
            .current
            .take()
            .ok_or_else(|| io::Error::other("end_page without begin_page"))?;
        self.pages.push(canvas);
        Ok(())
    }
}
