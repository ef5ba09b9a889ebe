use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};

use crate::report::canvas::{DrawOp, HAlign, PageCanvas, Rgba, VAlign, text_width};

#[derive(Debug, thiserror::Error)]
#[error("page canvas rejected drawing operation")]
pub struct CanvasError;

/// Records plotters drawing calls as vector operations on a `PageCanvas`.
pub struct CanvasBackend<'a> {
    canvas: &'a mut PageCanvas,
}

impl<'a> CanvasBackend<'a> {
    pub fn new(canvas: &'a mut PageCanvas) -> Self {
        Self { canvas }
    }
}

fn rgba(color: BackendColor) -> Rgba {
    Rgba {
        r: color.rgb.0,
        g: color.rgb.1,
        b: color.rgb.2,
        a: color.alpha,
    }
}

fn point(p: BackendCoord) -> (f64, f64) {
    (p.0 as f64, p.1 as f64)
}

impl DrawingBackend for CanvasBackend<'_> {
    type ErrorType = CanvasError;

    fn get_size(&self) -> (u32, u32) {
        (self.canvas.width, self.canvas.height)
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<CanvasError>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<CanvasError>> {
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x, y) = (point.0 as f64, point.1 as f64);
        self.canvas.push(DrawOp::Rect {
            upper_left: (x, y),
            bottom_right: (x + 1.0, y + 1.0),
            color: rgba(color),
            fill: true,
            width: 0.0,
        });
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        self.canvas.push(DrawOp::Polyline {
            points: vec![point(from), point(to)],
            color: rgba(style.color()),
            width: style.stroke_width() as f64,
        });
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        self.canvas.push(DrawOp::Rect {
            upper_left: point(upper_left),
            bottom_right: point(bottom_right),
            color: rgba(style.color()),
            fill,
            width: style.stroke_width() as f64,
        });
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let points: Vec<(f64, f64)> = path.into_iter().map(point).collect();
        if points.len() < 2 {
            return Ok(());
        }
        self.canvas.push(DrawOp::Polyline {
            points,
            color: rgba(style.color()),
            width: style.stroke_width() as f64,
        });
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let points: Vec<(f64, f64)> = vert.into_iter().map(point).collect();
        if points.len() < 3 {
            return Ok(());
        }
        self.canvas.push(DrawOp::Polygon {
            points,
            color: rgba(style.color()),
        });
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let (cx, cy) = point(center);
        let r = radius as f64;
        let points: Vec<(f64, f64)> = (0..=24)
            .map(|i| {
                let t = i as f64 / 24.0 * std::f64::consts::TAU;
                (cx + r * t.cos(), cy + r * t.sin())
            })
            .collect();
        let color = rgba(style.color());
        if fill {
            self.canvas.push(DrawOp::Polygon { points, color });
        } else {
            self.canvas.push(DrawOp::Polyline {
                points,
                color,
                width: style.stroke_width() as f64,
            });
        }
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<CanvasError>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }
        let anchor = style.anchor();
        let h_align = match anchor.h_pos {
            HPos::Left => HAlign::Left,
            HPos::Center => HAlign::Center,
            HPos::Right => HAlign::Right,
        };
        let v_align = match anchor.v_pos {
            VPos::Top => VAlign::Top,
            VPos::Center => VAlign::Center,
            VPos::Bottom => VAlign::Bottom,
        };
        // Screen rotations are clockwise; the canvas stores page rotations.
        let rotation = match style.transform() {
            FontTransform::None => 0.0,
            FontTransform::Rotate90 => -90.0,
            FontTransform::Rotate180 => 180.0,
            FontTransform::Rotate270 => 90.0,
        };
        self.canvas.push(DrawOp::Text {
            text: text.to_string(),
            pos: point(pos),
            size: style.size(),
            color: rgba(color),
            h_align,
            v_align,
            rotation,
        });
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<CanvasError>> {
        let size = style.size();
        let width = text_width(text, size).ceil() as u32;
        let height = size.ceil() as u32;
        Ok((width, height))
    }
}
