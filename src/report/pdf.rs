use anyhow::{Result, anyhow, bail};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Pt, Rgb, TextMatrix,
};

use crate::report::canvas::{DrawOp, HAlign, PageCanvas, Rgba, VAlign, text_width};

const PAGE_WIDTH_IN: f64 = 12.0;
const PAGE_HEIGHT_IN: f64 = 9.0;
const PT_PER_IN: f64 = 72.0;
const MM_PER_PT: f64 = 25.4 / 72.0;
/// Baseline distance below the top of a line of text, in em.
const ASCENT_EM: f64 = 0.8;

/// Maps canvas units (top-left origin) onto PDF points (bottom-left origin).
#[derive(Debug, Clone, Copy)]
struct PageTransform {
    scale: f64,
    height_pt: f64,
}

impl PageTransform {
    fn for_canvas(canvas: &PageCanvas) -> Self {
        let width_pt = PAGE_WIDTH_IN * PT_PER_IN;
        let height_pt = PAGE_HEIGHT_IN * PT_PER_IN;
        let scale = (width_pt / canvas.width.max(1) as f64)
            .min(height_pt / canvas.height.max(1) as f64);
        Self { scale, height_pt }
    }

    fn pt(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.scale, self.height_pt - y * self.scale)
    }

    fn point(&self, p: (f64, f64)) -> Point {
        let (x, y) = self.pt(p);
        Point::new(mm(x), mm(y))
    }
}

fn mm(pt: f64) -> Mm {
    Mm((pt * MM_PER_PT) as f32)
}

fn color(c: &Rgba) -> Color {
    let (r, g, b) = c.over_white();
    Color::Rgb(Rgb::new(r as f32, g as f32, b as f32, None))
}

/// One PDF page per canvas, in order.
pub fn render_pdf(title: &str, pages: &[PageCanvas]) -> Result<Vec<u8>> {
    let Some(first) = pages.first() else {
        bail!("report has no pages");
    };
    let page_w = mm(PAGE_WIDTH_IN * PT_PER_IN);
    let page_h = mm(PAGE_HEIGHT_IN * PT_PER_IN);

    let (doc, first_page, first_layer) = PdfDocument::new(title, page_w, page_h, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("failed to load builtin font: {:?}", e))?;

    let layer = doc.get_page(first_page).get_layer(first_layer);
    draw_canvas(&layer, &font, first);
    for canvas in &pages[1..] {
        let (page, layer) = doc.add_page(page_w, page_h, "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        draw_canvas(&layer, &font, canvas);
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("failed to serialise pdf: {:?}", e))
}

fn draw_canvas(layer: &PdfLayerReference, font: &IndirectFontRef, canvas: &PageCanvas) {
    let t = PageTransform::for_canvas(canvas);
    for op in &canvas.ops {
        match op {
            DrawOp::Polyline {
                points,
                color: c,
                width,
            } => stroke(layer, &t, points, false, c, *width),
            DrawOp::Polygon { points, color: c } => fill(layer, &t, points, c),
            DrawOp::Rect {
                upper_left: (x0, y0),
                bottom_right: (x1, y1),
                color: c,
                fill: filled,
                width,
            } => {
                let corners = [(*x0, *y0), (*x1, *y0), (*x1, *y1), (*x0, *y1)];
                if *filled {
                    fill(layer, &t, &corners, c);
                } else {
                    stroke(layer, &t, &corners, true, c, *width);
                }
            }
            DrawOp::Text {
                text,
                pos,
                size,
                color: c,
                h_align,
                v_align,
                rotation,
            } => draw_text(layer, font, &t, text, *pos, *size, c, *h_align, *v_align, *rotation),
        }
    }
}

fn stroke(
    layer: &PdfLayerReference,
    t: &PageTransform,
    points: &[(f64, f64)],
    closed: bool,
    c: &Rgba,
    width: f64,
) {
    if points.len() < 2 {
        return;
    }
    layer.set_outline_color(color(c));
    layer.set_outline_thickness((width.max(0.5) * t.scale) as f32);
    layer.add_line(Line {
        points: points.iter().map(|&p| (t.point(p), false)).collect(),
        is_closed: closed,
    });
}

fn fill(layer: &PdfLayerReference, t: &PageTransform, points: &[(f64, f64)], c: &Rgba) {
    if points.len() < 3 {
        return;
    }
    layer.set_fill_color(color(c));
    layer.add_polygon(Polygon {
        rings: vec![points.iter().map(|&p| (t.point(p), false)).collect()],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    t: &PageTransform,
    text: &str,
    pos: (f64, f64),
    size: f64,
    c: &Rgba,
    h_align: HAlign,
    v_align: VAlign,
    rotation: f64,
) {
    let size_pt = size * t.scale;
    let width_pt = text_width(text, size) * t.scale;
    // Offsets from the anchor to the baseline origin in the text's own frame.
    let dx = match h_align {
        HAlign::Left => 0.0,
        HAlign::Center => -width_pt / 2.0,
        HAlign::Right => -width_pt,
    };
    let dy = match v_align {
        VAlign::Top => -size_pt * ASCENT_EM,
        VAlign::Center => -size_pt * ASCENT_EM / 2.0,
        VAlign::Bottom => 0.0,
    };
    let (sin, cos) = rotation.to_radians().sin_cos();
    let (ax, ay) = t.pt(pos);
    let x = ax + dx * cos - dy * sin;
    let y = ay + dx * sin + dy * cos;

    layer.begin_text_section();
    layer.set_fill_color(color(c));
    layer.set_font(font, size_pt as f32);
    layer.set_text_matrix(TextMatrix::TranslateRotate(
        Pt(x as f32),
        Pt(y as f32),
        rotation as f32,
    ));
    layer.write_text(text, font);
    layer.end_text_section();
}
