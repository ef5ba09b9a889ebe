//! Device-independent page representation.
//!
//! Coordinates are canvas units with the origin at the top-left corner, the
//! same convention plotters uses. The PDF writer maps them onto the page.

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 900;

/// Average Helvetica advance width in em.
const AVG_GLYPH_EM: f64 = 0.52;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Mu,
    MlcHistogram,
    MlcSpeed,
    MlcError,
    Gantry,
    Collimator,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Composited over a white page, for writers without transparency.
    pub fn over_white(&self) -> (f64, f64, f64) {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f64 / 255.0) * a + (1.0 - a);
        (mix(self.r), mix(self.g), mix(self.b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Polyline {
        points: Vec<(f64, f64)>,
        color: Rgba,
        width: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        color: Rgba,
    },
    Rect {
        upper_left: (f64, f64),
        bottom_right: (f64, f64),
        color: Rgba,
        fill: bool,
        width: f64,
    },
    Text {
        text: String,
        pos: (f64, f64),
        size: f64,
        color: Rgba,
        h_align: HAlign,
        v_align: VAlign,
        /// Counter-clockwise, as seen on the page.
        rotation: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageCanvas {
    pub kind: PageKind,
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl PageCanvas {
    pub fn new(kind: PageKind) -> Self {
        Self {
            kind,
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn text(&mut self, text: impl Into<String>, pos: (f64, f64), size: f64, h_align: HAlign) {
        self.push(DrawOp::Text {
            text: text.into(),
            pos,
            size,
            color: Rgba::BLACK,
            h_align,
            v_align: VAlign::Top,
            rotation: 0.0,
        });
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVG_GLYPH_EM
}
