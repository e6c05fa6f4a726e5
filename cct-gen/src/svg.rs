//! SVG page backend.
//!
//! Builds one standalone SVG document per page by direct string assembly,
//! the same way the original sheet generator emitted its pages. Output is
//! deterministic: identical drawings produce byte-identical documents.

use std::io;

use crate::page::{Ink, PageWriter};

const DARK: &str = "#000000";
const LIGHT: &str = "#ffffff";

fn fill(ink: Ink) -> &'static str {
    match ink {
        Ink::Dark => DARK,
        Ink::Light => LIGHT,
    }
}

/// A [`PageWriter`] producing one SVG string per page.
#[derive(Debug, Default)]
pub struct SvgWriter {
    pages: Vec<String>,
    current: String,
    in_page: bool,
}

impl SvgWriter {
    pub fn new() -> SvgWriter {
        SvgWriter::default()
    }

    /// Finished pages, in order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<String> {
        self.pages
    }
}

impl PageWriter for SvgWriter {
    fn begin_page(&mut self, width_mm: f64, height_mm: f64) -> io::Result<()> {
        debug_assert!(!self.in_page, "begin_page inside an open page");
        self.current = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}mm\" height=\"{h}mm\" \
             version=\"1.1\" viewBox=\"0 0 {w} {h}\">\n",
            w = width_mm,
            h = height_mm
        );
        self.in_page = true;
        Ok(())
    }

    fn rect(&mut self, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64, ink: Ink) -> io::Result<()> {
        debug_assert!(self.in_page);
        self.current.push_str(&format!(
            "<rect x=\"{x_mm}\" y=\"{y_mm}\" width=\"{w_mm}\" height=\"{h_mm}\" fill=\"{}\"/>\n",
            fill(ink)
        ));
        Ok(())
    }

    fn disc(&mut self, cx_mm: f64, cy_mm: f64, radius_mm: f64, ink: Ink) -> io::Result<()> {
        debug_assert!(self.in_page);
        self.current.push_str(&format!(
            "<circle fill=\"{}\" cx=\"{cx_mm}\" cy=\"{cy_mm}\" r=\"{radius_mm}\"/>\n",
            fill(ink)
        ));
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
        debug_assert!(self.in_page);
        let a0 = start_deg.to_radians();
        let a1 = (start_deg + sweep_deg).to_radians();
        let (sin0, cos0) = a0.sin_cos();
        let (sin1, cos1) = a1.sin_cos();

        let ox0 = cx_mm + r_outer_mm * cos0;
        let oy0 = cy_mm + r_outer_mm * sin0;
        let ox1 = cx_mm + r_outer_mm * cos1;
        let oy1 = cy_mm + r_outer_mm * sin1;
        let ix1 = cx_mm + r_inner_mm * cos1;
        let iy1 = cy_mm + r_inner_mm * sin1;
        let ix0 = cx_mm + r_inner_mm * cos0;
        let iy0 = cy_mm + r_inner_mm * sin0;

        let large = if sweep_deg > 180.0 { 1 } else { 0 };

        // Outer arc forward, inner arc back, closed.
        self.current.push_str(&format!(
            "<path fill=\"{}\" d=\"M{ox0} {oy0}A{r_outer_mm} {r_outer_mm} 0 {large} 1 {ox1} {oy1}\
             L{ix1} {iy1}A{r_inner_mm} {r_inner_mm} 0 {large} 0 {ix0} {iy0}Z\"/>\n",
            fill(ink)
        ));
        Ok(())
    }

    fn label(
        &mut self,
        x_mm: f64,
        y_mm: f64,
        size_mm: f64,
        text: &str,
        ink: Ink,
    ) -> io::Result<()> {
        debug_assert!(self.in_page);
        self.current.push_str(&format!(
            "<text x=\"{x_mm}\" y=\"{y_mm}\" font-size=\"{size_mm}\" \
             font-family=\"sans-serif\" fill=\"{}\">{text}</text>\n",
            fill(ink)
        ));
        Ok(())
    }

    fn end_page(&mut self) -> io::Result<()> {
        debug_assert!(self.in_page);
        self.current.push_str("</svg>\n");
        self.pages.push(std::mem::take(&mut self.current));
        self.in_page = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{draw_target_page, Ink};
    use crate::target::render_code;

    #[test]
    fn page_has_svg_envelope() {
        let mut svg = SvgWriter::new();
        svg.begin_page(210.0, 297.0).unwrap();
        svg.rect(0.0, 0.0, 210.0, 297.0, Ink::Light).unwrap();
        svg.end_page().unwrap();

        let page = &svg.pages()[0];
        assert!(page.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(page.contains("viewBox=\"0 0 210 297\""));
        assert!(page.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn target_rendering_is_byte_identical() {
        let target = render_code(0x2a7, 14, 20.0);

        let mut a = SvgWriter::new();
        draw_target_page(&mut a, &target, 10.0, false).unwrap();
        let mut b = SvgWriter::new();
        draw_target_page(&mut b, &target, 10.0, false).unwrap();

        assert_eq!(a.pages(), b.pages());
    }

    #[test]
    fn sector_count_matches_code_popcount() {
        let target = render_code(0x2a7, 14, 20.0);
        let mut svg = SvgWriter::new();
        draw_target_page(&mut svg, &target, 10.0, false).unwrap();

        let paths = svg.pages()[0].matches("<path").count();
        assert_eq!(paths as u32, 0x2a7u64.count_ones());
    }

    #[test]
    fn disc_and_label_are_emitted() {
        let mut target = render_code(0x81, 14, 20.0);
        target.id = Some(41);
        let mut svg = SvgWriter::new();
        draw_target_page(&mut svg, &target, 10.0, true).unwrap();

        let page = &svg.pages()[0];
        assert!(page.contains("<circle fill=\"#000000\""));
        assert!(page.contains(">42</text>"));
    }

    #[test]
    fn pages_accumulate_in_order() {
        let mut svg = SvgWriter::new();
        for w in [100.0, 200.0] {
            svg.begin_page(w, 50.0).unwrap();
            svg.end_page().unwrap();
        }
        let pages = svg.into_pages();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("width=\"100mm\""));
        assert!(pages[1].contains("width=\"200mm\""));
    }
}
