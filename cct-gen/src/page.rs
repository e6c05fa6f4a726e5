//! Page-format writer abstraction.
//!
//! Geometry stays independent of the output format: the layout engine and
//! the drawing functions below speak in mm against a top-left origin with
//! y pointing down, and every backend (SVG here, PDF and PNG preview in
//! the CLI) implements [`PageWriter`].

use std::io;

use crate::sheet::SheetLayout;
use crate::target::RenderedTarget;

/// Primitive fill color. Targets are printed dark on light paper; the
/// background rect and any inverted stock go the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Dark,
    Light,
}

/// Sink for vector page primitives. All coordinates are mm from the page
/// top-left corner, y down; angles are degrees from the +x axis, growing
/// toward +y.
pub trait PageWriter {
    fn begin_page(&mut self, width_mm: f64, height_mm: f64) -> io::Result<()>;

    fn rect(&mut self, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64, ink: Ink) -> io::Result<()>;

    fn disc(&mut self, cx_mm: f64, cy_mm: f64, radius_mm: f64, ink: Ink) -> io::Result<()>;

    /// Filled annular sector between `r_inner_mm` and `r_outer_mm`,
    /// covering `sweep_deg` degrees from `start_deg`.
    #[allow(clippy::too_many_arguments)]
    fn ring_sector(
        &mut self,
        cx_mm: f64,
        cy_mm: f64,
        r_inner_mm: f64,
        r_outer_mm: f64,
        start_deg: f64,
        sweep_deg: f64,
        ink: Ink,
    ) -> io::Result<()>;

    /// Text label; `y_mm` is the baseline, `size_mm` the font size.
    /// Backends without text support may ignore this.
    fn label(&mut self, x_mm: f64, y_mm: f64, size_mm: f64, text: &str, ink: Ink)
        -> io::Result<()>;

    fn end_page(&mut self) -> io::Result<()>;
}

/// Draw one target centered at (`cx_mm`, `cy_mm`).
///
/// Order matches the original sheet generator: center dot first, then the
/// filled data sectors, then the label. The guard annulus and empty
/// sectors are left as paper.
pub fn draw_target<W: PageWriter>(
    writer: &mut W,
    target: &RenderedTarget,
    cx_mm: f64,
    cy_mm: f64,
    with_label: bool,
) -> io::Result<()> {
    writer.disc(cx_mm, cy_mm, target.dot_radius_mm, Ink::Dark)?;

    let sweep = target.sector_sweep_deg();
    for (i, &filled) in target.sectors.iter().enumerate() {
        if filled {
            writer.ring_sector(
                cx_mm,
                cy_mm,
                target.ring_inner_radius_mm(),
                target.ring_outer_radius_mm(),
                i as f64 * sweep,
                sweep,
                Ink::Dark,
            )?;
        }
    }

    if with_label {
        if let Some(id) = target.id {
            let r = target.dot_radius_mm;
            writer.label(
                cx_mm - 3.0 * r,
                cy_mm + 3.0 * r,
                r / 2.0,
                &(id + 1).to_string(),
                Ink::Dark,
            )?;
        }
    }

    Ok(())
}

/// Draw a full sheet layout, one writer page per layout page.
pub fn draw_sheet<W: PageWriter>(writer: &mut W, layout: &SheetLayout) -> io::Result<()> {
    for page in &layout.pages {
        writer.begin_page(layout.page.width_mm, layout.page.height_mm)?;
        writer.rect(
            0.0,
            0.0,
            layout.page.width_mm,
            layout.page.height_mm,
            Ink::Light,
        )?;
        for marker in &page.markers {
            writer.disc(marker.x_mm, marker.y_mm, marker.diameter_mm / 2.0, Ink::Dark)?;
        }
        for placement in &page.placements {
            draw_target(
                writer,
                &placement.target,
                placement.x_mm,
                placement.y_mm,
                layout.labels,
            )?;
        }
        writer.end_page()?;
    }
    Ok(())
}

/// Draw a single target on its own page, sized to the footprint plus a
/// margin on each side.
pub fn draw_target_page<W: PageWriter>(
    writer: &mut W,
    target: &RenderedTarget,
    margin_mm: f64,
    with_label: bool,
) -> io::Result<()> {
    let side = target.footprint_diameter_mm() + 2.0 * margin_mm;
    writer.begin_page(side, side)?;
    writer.rect(0.0, 0.0, side, side, Ink::Light)?;
    draw_target(writer, target, side / 2.0, side / 2.0, with_label)?;
    writer.end_page()
}
