//! PDF page backend (printpdf).
//!
//! Coordinates arrive top-left/y-down from the drawing layer; PDF user
//! space is bottom-up, so every y is flipped against the page height.
//! Discs and ring sectors are emitted as filled polygon outlines with
//! chords of at most 5 degrees — well under printable deviation at sheet
//! scales.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use cct_gen::page::{draw_sheet, draw_target_page, Ink, PageWriter};
use cct_gen::sheet::SheetLayout;
use cct_gen::target::RenderedTarget;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;

const PT_PER_MM: f32 = 72.0 / 25.4;
/// Chord step for flattened arcs, in degrees.
const ARC_STEP_DEG: f64 = 5.0;

/// A [`PageWriter`] building a multi-page PDF document.
pub struct PdfWriter {
    title: String,
    doc: Option<PdfDocumentReference>,
    font: Option<IndirectFontRef>,
    layer: Option<PdfLayerReference>,
    page_height_mm: f64,
    pages: usize,
}

impl PdfWriter {
    pub fn new(title: &str) -> PdfWriter {
        PdfWriter {
            title: title.to_string(),
            doc: None,
            font: None,
            layer: None,
            page_height_mm: 0.0,
            pages: 0,
        }
    }

    /// Write the finished document.
    pub fn save(self, path: &Path) -> Result<()> {
        let doc = self.doc.context("no pages were drawn")?;
        doc.save(&mut io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ))
        .with_context(|| format!("writing PDF to {}", path.display()))?;
        Ok(())
    }

    fn current_layer(&self) -> io::Result<&PdfLayerReference> {
        self.layer
            .as_ref()
            .ok_or_else(|| io::Error::other("draw call outside a page"))
    }

    fn apply_ink(layer: &PdfLayerReference, ink: Ink) {
        let color = match ink {
            Ink::Dark => Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
            Ink::Light => Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)),
        };
        layer.set_fill_color(color.clone());
        layer.set_outline_color(color);
    }

    /// Fill a polygon given in page coordinates (mm, y down).
    fn fill_polygon(&self, points: &[(f64, f64)], ink: Ink) -> io::Result<()> {
        let layer = self.current_layer()?;
        Self::apply_ink(layer, ink);
        let ring: Vec<(Point, bool)> = points
            .iter()
            .map(|&(x, y)| {
                (
                    Point::new(Mm(x as f32), Mm((self.page_height_mm - y) as f32)),
                    false,
                )
            })
            .collect();
        layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        Ok(())
    }
}

/// Sample an arc from `a0_deg` to `a1_deg` into chord endpoints.
fn arc_points(cx: f64, cy: f64, r: f64, a0_deg: f64, a1_deg: f64) -> Vec<(f64, f64)> {
    let sweep = (a1_deg - a0_deg).abs();
    let steps = (sweep / ARC_STEP_DEG).ceil().max(2.0) as usize;
    (0..=steps)
        .map(|k| {
            let a = (a0_deg + (a1_deg - a0_deg) * k as f64 / steps as f64).to_radians();
            (cx + r * a.cos(), cy + r * a.sin())
        })
        .collect()
}

impl PageWriter for PdfWriter {
    fn begin_page(&mut self, width_mm: f64, height_mm: f64) -> io::Result<()> {
        let (w, h) = (Mm(width_mm as f32), Mm(height_mm as f32));
        if let Some(doc) = &self.doc {
            let (page, layer) = doc.add_page(w, h, format!("Page {}", self.pages + 1));
            self.layer = Some(doc.get_page(page).get_layer(layer));
        } else {
            let (doc, page, layer) = PdfDocument::new(&self.title, w, h, "Page 1");
            let font = doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(io::Error::other)?;
            self.layer = Some(doc.get_page(page).get_layer(layer));
            self.doc = Some(doc);
            self.font = Some(font);
        }
        self.pages += 1;
        self.page_height_mm = height_mm;
        Ok(())
    }

    fn rect(&mut self, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64, ink: Ink) -> io::Result<()> {
        let layer = self.current_layer()?;
        Self::apply_ink(layer, ink);
        let y_lo = self.page_height_mm - y_mm - h_mm;
        let y_hi = self.page_height_mm - y_mm;
        layer.add_rect(Rect::new(
            Mm(x_mm as f32),
            Mm(y_lo as f32),
            Mm((x_mm + w_mm) as f32),
            Mm(y_hi as f32),
        ));
        Ok(())
    }

    fn disc(&mut self, cx_mm: f64, cy_mm: f64, radius_mm: f64, ink: Ink) -> io::Result<()> {
        let points = arc_points(cx_mm, cy_mm, radius_mm, 0.0, 360.0);
        self.fill_polygon(&points, ink)
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
        let end_deg = start_deg + sweep_deg;
        let mut points = arc_points(cx_mm, cy_mm, r_outer_mm, start_deg, end_deg);
        points.extend(arc_points(cx_mm, cy_mm, r_inner_mm, end_deg, start_deg));
        self.fill_polygon(&points, ink)
    }

    fn label(
        &mut self,
        x_mm: f64,
        y_mm: f64,
        size_mm: f64,
        text: &str,
        ink: Ink,
    ) -> io::Result<()> {
        let layer = self.current_layer()?;
        let font = self
            .font
            .as_ref()
            .ok_or_else(|| io::Error::other("label before first page"))?;
        Self::apply_ink(layer, ink);
        layer.use_text(
            text,
            size_mm as f32 * PT_PER_MM,
            Mm(x_mm as f32),
            Mm((self.page_height_mm - y_mm) as f32),
            font,
        );
        Ok(())
    }

    fn end_page(&mut self) -> io::Result<()> {
        self.layer = None;
        Ok(())
    }
}

/// Write a single target as a one-page PDF.
pub fn write_target_pdf(
    target: &RenderedTarget,
    margin_mm: f64,
    with_label: bool,
    path: &Path,
) -> Result<()> {
    let mut writer = PdfWriter::new("Coded target");
    draw_target_page(&mut writer, target, margin_mm, with_label)?;
    writer.save(path)
}

/// Write a laid-out sheet as a multi-page PDF.
pub fn write_sheet_pdf(layout: &SheetLayout, path: &Path) -> Result<()> {
    let mut writer = PdfWriter::new("Coded target sheet");
    draw_sheet(&mut writer, layout)?;
    writer.save(path)
}
