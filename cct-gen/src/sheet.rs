//! Sheet layout: placing targets on printable pages.
//!
//! A sheet spec mixes two placement styles, both taken from the original
//! generator's sheet repertoire: targets and uncoded markers with explicit
//! positions (the single- and two-target calibration sheets), and
//! position-free requests that are flow-packed row by row across as many
//! pages as needed (the grid sheets, generalized to mixed sizes).
//!
//! Every constraint is validated before a layout is returned, so callers
//! never write a partial document: fit against the usable interior,
//! containment inside the margins, pairwise bounding-circle overlap, and
//! the optional page budget.

use crate::error::SheetError;
use crate::target::{render, RenderedTarget};
use cct::Codebook;

/// Comparisons tolerate exact-fit float noise (grid layouts land targets
/// flush against the margin).
const EPS: f64 = 1e-9;

/// Physical page dimensions and margin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct PageSpec {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageSpec {
    /// A4 portrait with a 10 mm margin.
    fn default() -> Self {
        PageSpec {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

impl PageSpec {
    pub fn usable_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn usable_height_mm(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

/// One coded-target request: which ID, how large, and optionally where.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(deny_unknown_fields))]
pub struct TargetRequest {
    pub id: usize,
    /// Center dot diameter; the printed footprint is three times this.
    pub diameter_mm: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub x_mm: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub y_mm: Option<f64>,
}

impl TargetRequest {
    fn position(&self) -> Result<Option<(f64, f64)>, SheetError> {
        match (self.x_mm, self.y_mm) {
            (Some(x), Some(y)) => Ok(Some((x, y))),
            (None, None) => Ok(None),
            _ => Err(SheetError::PartialPosition { id: self.id }),
        }
    }
}

/// A plain uncoded circle, used as a scale-bar or corner marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(deny_unknown_fields))]
pub struct UncodedMarker {
    pub x_mm: f64,
    pub y_mm: f64,
    pub diameter_mm: f64,
}

/// Full sheet configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct SheetSpec {
    pub page: PageSpec,
    /// Gap between flow-packed targets.
    pub spacing_mm: f64,
    /// Print the 1-based ID next to each coded target.
    pub labels: bool,
    /// Hard page budget; layouts needing more pages are rejected.
    pub max_pages: Option<usize>,
    #[cfg_attr(feature = "serde", serde(rename = "target"))]
    pub targets: Vec<TargetRequest>,
    #[cfg_attr(feature = "serde", serde(rename = "marker"))]
    pub markers: Vec<UncodedMarker>,
}

impl Default for SheetSpec {
    fn default() -> Self {
        SheetSpec {
            page: PageSpec::default(),
            spacing_mm: 5.0,
            labels: true,
            max_pages: None,
            targets: Vec::new(),
            markers: Vec::new(),
        }
    }
}

impl SheetSpec {
    /// Parse a TOML sheet configuration.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<SheetSpec, SheetError> {
        toml::from_str(toml_str).map_err(|e| SheetError::Config(e.to_string()))
    }
}

/// A placed target: center position plus its rendered geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub target: RenderedTarget,
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetPage {
    pub placements: Vec<Placement>,
    pub markers: Vec<UncodedMarker>,
}

/// A validated multi-page layout, ready for any [`crate::page::PageWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub page: PageSpec,
    pub labels: bool,
    pub pages: Vec<SheetPage>,
}

/// Lay out a sheet spec against a codebook.
///
/// Explicitly positioned targets and uncoded markers land on page 1;
/// position-free requests are flow-packed left to right, top to bottom,
/// starting on a fresh page whenever explicit content exists.
pub fn layout(book: &Codebook, spec: &SheetSpec) -> Result<SheetLayout, SheetError> {
    validate_page(&spec.page, spec.spacing_mm)?;
    let usable_w = spec.page.usable_width_mm();
    let usable_h = spec.page.usable_height_mm();
    let margin = spec.page.margin_mm;

    let mut explicit: Vec<Placement> = Vec::new();
    let mut flow: Vec<RenderedTarget> = Vec::new();
    for req in &spec.targets {
        if !(req.diameter_mm > 0.0 && req.diameter_mm.is_finite()) {
            return Err(SheetError::InvalidDiameter {
                item: format!("target {}", req.id),
                diameter_mm: req.diameter_mm,
            });
        }
        let target = render(book, req.id, req.diameter_mm)?;
        let fp = target.footprint_diameter_mm();
        if fp > usable_w + EPS || fp > usable_h + EPS {
            return Err(SheetError::TargetTooLarge {
                id: req.id,
                footprint_mm: fp,
                usable_w_mm: usable_w,
                usable_h_mm: usable_h,
            });
        }
        match req.position()? {
            Some((x, y)) => explicit.push(Placement {
                x_mm: x,
                y_mm: y,
                target,
            }),
            None => flow.push(target),
        }
    }
    for (idx, marker) in spec.markers.iter().enumerate() {
        if !(marker.diameter_mm > 0.0 && marker.diameter_mm.is_finite()) {
            return Err(SheetError::InvalidDiameter {
                item: format!("marker {idx}"),
                diameter_mm: marker.diameter_mm,
            });
        }
    }

    let mut pages: Vec<SheetPage> = Vec::new();
    if !explicit.is_empty() || !spec.markers.is_empty() {
        pages.push(SheetPage {
            placements: explicit,
            markers: spec.markers.clone(),
        });
    }

    if !flow.is_empty() {
        let mut current = SheetPage::default();
        let mut x = margin;
        let mut y = margin;
        let mut row_h = 0.0f64;
        for target in flow {
            let fp = target.footprint_diameter_mm();
            if x + fp > margin + usable_w + EPS {
                x = margin;
                y += row_h + spec.spacing_mm;
                row_h = 0.0;
            }
            if y + fp > margin + usable_h + EPS {
                pages.push(std::mem::take(&mut current));
                x = margin;
                y = margin;
                row_h = 0.0;
            }
            current.placements.push(Placement {
                x_mm: x + fp / 2.0,
                y_mm: y + fp / 2.0,
                target,
            });
            x += fp + spec.spacing_mm;
            row_h = row_h.max(fp);
        }
        pages.push(current);
    }

    for page in &pages {
        validate_page_content(&spec.page, page)?;
    }

    if let Some(allowed) = spec.max_pages {
        if pages.len() > allowed {
            return Err(SheetError::PageLimitExceeded {
                needed: pages.len(),
                allowed,
            });
        }
    }

    Ok(SheetLayout {
        page: spec.page.clone(),
        labels: spec.labels,
        pages,
    })
}

/// Build the classic evenly spread grid sheet: `rows x cols` consecutive
/// IDs from `start_id`, all at one diameter. IDs past the end of the
/// codebook are dropped, matching the original grid sheets.
pub fn grid_spec(
    book: &Codebook,
    page: PageSpec,
    diameter_mm: f64,
    start_id: usize,
    rows: usize,
    cols: usize,
) -> Result<SheetSpec, SheetError> {
    if rows == 0 || cols == 0 {
        return Err(SheetError::InvalidGrid(format!(
            "grid needs at least one row and one column, got {rows}x{cols}"
        )));
    }
    if !(diameter_mm > 0.0 && diameter_mm.is_finite()) {
        return Err(SheetError::InvalidDiameter {
            item: "grid target".into(),
            diameter_mm,
        });
    }
    validate_page(&page, 0.0)?;

    let fp = 3.0 * diameter_mm;
    let margin = page.margin_mm;
    let x_spacing = if cols > 1 {
        (page.usable_width_mm() - fp) / (cols - 1) as f64
    } else {
        0.0
    };
    let y_spacing = if rows > 1 {
        (page.usable_height_mm() - fp) / (rows - 1) as f64
    } else {
        0.0
    };

    let mut targets = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            let id = start_id + i * cols + j;
            if id >= book.len() {
                continue;
            }
            targets.push(TargetRequest {
                id,
                diameter_mm,
                x_mm: Some(margin + fp / 2.0 + j as f64 * x_spacing),
                y_mm: Some(margin + fp / 2.0 + i as f64 * y_spacing),
            });
        }
    }

    Ok(SheetSpec {
        page,
        targets,
        ..SheetSpec::default()
    })
}

fn validate_page(page: &PageSpec, spacing_mm: f64) -> Result<(), SheetError> {
    for (name, v) in [
        ("width_mm", page.width_mm),
        ("height_mm", page.height_mm),
    ] {
        if !(v > 0.0 && v.is_finite()) {
            return Err(SheetError::InvalidPage(format!(
                "{name} must be positive and finite, got {v}"
            )));
        }
    }
    if !(page.margin_mm >= 0.0 && page.margin_mm.is_finite()) {
        return Err(SheetError::InvalidPage(format!(
            "margin_mm must be non-negative, got {}",
            page.margin_mm
        )));
    }
    if !(spacing_mm >= 0.0 && spacing_mm.is_finite()) {
        return Err(SheetError::InvalidPage(format!(
            "spacing_mm must be non-negative, got {spacing_mm}"
        )));
    }
    if page.usable_width_mm() <= 0.0 || page.usable_height_mm() <= 0.0 {
        return Err(SheetError::InvalidPage(format!(
            "margins leave no usable interior on a {} x {} mm page",
            page.width_mm, page.height_mm
        )));
    }
    Ok(())
}

/// Containment and pairwise overlap checks over everything on one page.
fn validate_page_content(page: &PageSpec, content: &SheetPage) -> Result<(), SheetError> {
    let lo_x = page.margin_mm;
    let lo_y = page.margin_mm;
    let hi_x = page.width_mm - page.margin_mm;
    let hi_y = page.height_mm - page.margin_mm;

    // (label, center, bounding radius) for each item
    let mut items: Vec<(String, f64, f64, f64)> = Vec::new();
    for placement in &content.placements {
        let name = match placement.target.id {
            Some(id) => format!("target {id}"),
            None => "target".to_string(),
        };
        items.push((
            name,
            placement.x_mm,
            placement.y_mm,
            placement.target.footprint_radius_mm(),
        ));
    }
    for (idx, marker) in content.markers.iter().enumerate() {
        items.push((
            format!("marker {idx}"),
            marker.x_mm,
            marker.y_mm,
            marker.diameter_mm / 2.0,
        ));
    }

    for (name, cx, cy, r) in &items {
        if cx - r < lo_x - EPS || cx + r > hi_x + EPS || cy - r < lo_y - EPS || cy + r > hi_y + EPS
        {
            return Err(SheetError::OutsideMargins { item: name.clone() });
        }
    }

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let (ref a, ax, ay, ar) = items[i];
            let (ref b, bx, by, br) = items[j];
            let dist2 = (ax - bx).powi(2) + (ay - by).powi(2);
            let min_dist = ar + br;
            if dist2 + EPS < min_dist * min_dist {
                return Err(SheetError::Overlap {
                    first: a.clone(),
                    second: b.clone(),
                });
            }
        }
    }

    Ok(())
}
