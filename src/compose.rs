//! Report composition: fixed single-page landscape layout.
//!
//! Geometry is deterministic: the same input shape always produces the
//! same page. Coordinates are kept in millimetres and converted to PDF
//! points at emission time; the PDF origin is bottom-left, the layout
//! origin is the top-left content margin.

use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::image::RawImage;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextMatrix, XObjectId,
};

use crate::error::ReportError;
use crate::metrics::ReportMetrics;

/// The three chart images consumed by the composer, as encoded PNG bytes.
pub struct ReportCharts {
    pub revenue_pie: Vec<u8>,
    pub profit_pie: Vec<u8>,
    pub discount_bar: Vec<u8>,
}

// ── Fixed layout, mm ────────────────────────────────────────────────────────

// Landscape A4.
const PAGE_W_MM: f32 = 297.0;
const PAGE_H_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;

const HEADER_W_MM: f32 = 112.0;
const HEADER_H_MM: f32 = 20.0;

const PIE_W_MM: f32 = 110.0;
const PIE_GAP_MM: f32 = 2.0;

const TABLE_OFFSET_MM: f32 = 220.0;
const TABLE_COL_W_MM: f32 = 30.0;
const TABLE_ROW_H_MM: f32 = 10.0;

const BAR_LABEL_H_MM: f32 = 10.0;
const BAR_W_MM: f32 = 103.0;

const BODY_PT: f32 = 12.0;
const TABLE_PT: f32 = 10.0;

/// Resolved positions (mm, from the top-left of the page) for one report.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub pie_y: f32,
    pub pie1_x: f32,
    pub pie2_x: f32,
    pub pie_h: f32,
    pub table_x: f32,
    pub table_y: f32,
    pub bar_label_y: f32,
    pub bar_x: f32,
    pub bar_y: f32,
    pub bar_h: f32,
}

impl PageGeometry {
    /// Lay the page out for chart images of the given pixel dimensions.
    /// Image heights follow from the fixed widths and the aspect ratios.
    pub fn new(pie_px: (u32, u32), bar_px: (u32, u32)) -> Self {
        let origin_x = MARGIN_MM;
        let origin_y = MARGIN_MM;
        let pie_y = origin_y + HEADER_H_MM;
        let pie_h = PIE_W_MM * pie_px.1 as f32 / pie_px.0 as f32;
        let below_pies = pie_y + pie_h;
        PageGeometry {
            origin_x,
            origin_y,
            pie_y,
            pie1_x: origin_x,
            pie2_x: origin_x + PIE_W_MM + PIE_GAP_MM,
            pie_h,
            table_x: origin_x + TABLE_OFFSET_MM,
            table_y: pie_y,
            bar_label_y: below_pies - BAR_LABEL_H_MM,
            bar_x: origin_x,
            bar_y: below_pies,
            bar_h: BAR_W_MM * bar_px.1 as f32 / bar_px.0 as f32,
        }
    }

    pub fn table_bottom(&self, rows: usize) -> f32 {
        // one header row plus one row per item
        self.table_y + (rows as f32 + 1.0) * TABLE_ROW_H_MM
    }

    /// Whether every element stays inside the single page.
    pub fn fits_page(&self, rows: usize) -> bool {
        let bottom = PAGE_H_MM - MARGIN_MM;
        self.table_bottom(rows) <= bottom && self.bar_y + self.bar_h <= bottom
    }
}

/// Compose the one-page landscape report and return the PDF byte stream.
pub fn compose_report(
    metrics: &ReportMetrics,
    charts: &ReportCharts,
) -> Result<Vec<u8>, ReportError> {
    let mut doc = PdfDocument::new("Sales report");

    let (revenue_id, pie_px) = add_image(&mut doc, &charts.revenue_pie)?;
    let (profit_id, profit_px) = add_image(&mut doc, &charts.profit_pie)?;
    let (bar_id, bar_px) = add_image(&mut doc, &charts.discount_bar)?;

    let geometry = PageGeometry::new(pie_px, bar_px);
    if !geometry.fits_page(metrics.stock.len()) {
        // One-page-only report: a large inventory runs past the page edge.
        log::warn!(
            "stock table with {} rows overflows the single report page",
            metrics.stock.len()
        );
    }

    let mut ops: Vec<Op> = Vec::new();

    // Header labels, side by side on the origin row.
    ops.extend(text_ops(
        "Revenue by salesperson",
        geometry.origin_x,
        cell_text_top(geometry.origin_y, HEADER_H_MM, BODY_PT),
        BODY_PT,
        BuiltinFont::Helvetica,
    ));
    ops.extend(text_ops(
        "Profit by salesperson",
        geometry.origin_x + HEADER_W_MM,
        cell_text_top(geometry.origin_y, HEADER_H_MM, BODY_PT),
        BODY_PT,
        BuiltinFont::Helvetica,
    ));

    // Pie charts.
    ops.push(image_op(&revenue_id, geometry.pie1_x, geometry.pie_y, PIE_W_MM, pie_px));
    ops.push(image_op(&profit_id, geometry.pie2_x, geometry.pie_y, PIE_W_MM, profit_px));

    // Stock table, right of both pies.
    ops.extend(stock_table_ops(metrics, &geometry));

    // Bar chart with its label.
    ops.extend(text_ops(
        "Average discounts",
        geometry.bar_x,
        cell_text_top(geometry.bar_label_y, BAR_LABEL_H_MM, BODY_PT),
        BODY_PT,
        BuiltinFont::Helvetica,
    ));
    ops.push(image_op(&bar_id, geometry.bar_x, geometry.bar_y, BAR_W_MM, bar_px));

    doc.pages
        .push(PdfPage::new(Mm(PAGE_W_MM), Mm(PAGE_H_MM), ops));

    let mut warnings = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

fn stock_table_ops(metrics: &ReportMetrics, geometry: &PageGeometry) -> Vec<Op> {
    let mut ops = Vec::new();
    let item_x = geometry.table_x;
    let stock_x = geometry.table_x + TABLE_COL_W_MM;

    // Header row, bold and centered.
    let mut y = geometry.table_y;
    for (x, label) in [(item_x, "Item"), (stock_x, "Stock Left")] {
        ops.extend(cell_border_ops(x, y, TABLE_COL_W_MM, TABLE_ROW_H_MM));
        ops.extend(text_ops(
            label,
            x + centered_inset(label, TABLE_PT),
            cell_text_top(y, TABLE_ROW_H_MM, TABLE_PT),
            TABLE_PT,
            BuiltinFont::HelveticaBold,
        ));
    }
    y += TABLE_ROW_H_MM;

    for row in &metrics.stock {
        let stock_left = row.stock_left.to_string();
        ops.extend(cell_border_ops(item_x, y, TABLE_COL_W_MM, TABLE_ROW_H_MM));
        ops.extend(text_ops(
            &row.item,
            item_x + CELL_PAD_MM,
            cell_text_top(y, TABLE_ROW_H_MM, TABLE_PT),
            TABLE_PT,
            BuiltinFont::Helvetica,
        ));
        ops.extend(cell_border_ops(stock_x, y, TABLE_COL_W_MM, TABLE_ROW_H_MM));
        ops.extend(text_ops(
            &stock_left,
            stock_x + TABLE_COL_W_MM - CELL_PAD_MM - text_width_mm(&stock_left, TABLE_PT),
            cell_text_top(y, TABLE_ROW_H_MM, TABLE_PT),
            TABLE_PT,
            BuiltinFont::Helvetica,
        ));
        y += TABLE_ROW_H_MM;
    }
    ops
}

const CELL_PAD_MM: f32 = 1.5;

// ── Op helpers ──────────────────────────────────────────────────────────────

fn mm_to_pt(v: f32) -> f32 {
    Mm(v).into_pt().0
}

fn pt_to_mm(v: f32) -> f32 {
    v / mm_to_pt(1.0)
}

/// Approximate rendered width of `text`, in mm.
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    pt_to_mm(text.len() as f32 * font_size * 0.6)
}

/// Horizontal inset that centers `text` in a table column.
fn centered_inset(text: &str, font_size: f32) -> f32 {
    ((TABLE_COL_W_MM - text_width_mm(text, font_size)) / 2.0).max(0.0)
}

/// Top edge (mm) that vertically centers a line of `font_size` pt text
/// inside a cell starting at `cell_top`.
fn cell_text_top(cell_top: f32, cell_h: f32, font_size: f32) -> f32 {
    cell_top + (cell_h - pt_to_mm(font_size)) / 2.0
}

fn text_ops(text: &str, x_mm: f32, y_top_mm: f32, size: f32, font: BuiltinFont) -> Vec<Op> {
    let baseline = mm_to_pt(PAGE_H_MM) - mm_to_pt(y_top_mm) - size;
    vec![
        Op::SetFillColor {
            col: printpdf::color::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        },
        Op::StartTextSection,
        Op::SetFontSizeBuiltinFont { size: Pt(size), font },
        Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(mm_to_pt(x_mm)), Pt(baseline)),
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        },
        Op::EndTextSection,
    ]
}

fn image_op(id: &XObjectId, x_mm: f32, y_top_mm: f32, w_mm: f32, px: (u32, u32)) -> Op {
    let w_pt = mm_to_pt(w_mm);
    let h_pt = w_pt * px.1 as f32 / px.0 as f32;
    Op::UseXobject {
        id: id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(mm_to_pt(x_mm))),
            translate_y: Some(Pt(mm_to_pt(PAGE_H_MM) - mm_to_pt(y_top_mm) - h_pt)),
            scale_x: Some(w_pt / px.0 as f32),
            scale_y: Some(h_pt / px.1 as f32),
            rotate: None,
            dpi: Some(72.0),
        },
    }
}

fn cell_border_ops(x_mm: f32, y_top_mm: f32, w_mm: f32, h_mm: f32) -> Vec<Op> {
    let x = mm_to_pt(x_mm);
    let y = mm_to_pt(PAGE_H_MM) - mm_to_pt(y_top_mm) - mm_to_pt(h_mm);
    let w = mm_to_pt(w_mm);
    let h = mm_to_pt(h_mm);
    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
    let points = corners
        .into_iter()
        .map(|(px, py)| LinePoint {
            p: Point { x: Pt(px), y: Pt(py) },
            bezier: false,
        })
        .collect();
    vec![
        Op::SetOutlineColor {
            col: printpdf::color::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        },
        Op::SetOutlineThickness { pt: Pt(0.5) },
        Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::NonZero,
            },
        },
    ]
}

fn add_image(
    doc: &mut PdfDocument,
    png_bytes: &[u8],
) -> Result<(XObjectId, (u32, u32)), ReportError> {
    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(png_bytes, &mut warnings)
        .map_err(|e| ReportError::Chart(format!("decode chart image: {e}")))?;
    let dims = (raw.width as u32, raw.height as u32);
    let id = XObjectId::new();
    doc.resources.xobjects.map.insert(id.clone(), XObject::Image(raw));
    Ok((id, dims))
}
