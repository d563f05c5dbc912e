//! Bitmap to rectangle outline conversion.
use kurbo::BezPath;

use crate::bitmap::CharacterBitmap;

/// Axis aligned rectangle in font units, y growing upward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangle {
    /// Left edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Top edge
    pub y2: f64,
}

impl Rectangle {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Append this rectangle to `path` as one closed contour.
    ///
    /// Points run clockwise (bottom-left, top-left, top-right, bottom-right),
    /// the TrueType direction for filled contours.
    pub fn append_to(&self, path: &mut BezPath) {
        path.move_to((self.x1, self.y1));
        path.line_to((self.x1, self.y2));
        path.line_to((self.x2, self.y2));
        path.line_to((self.x2, self.y1));
        path.close_path();
    }
}

/// Block of grid cells `[x, x + width) × [y, y + height)`, y growing downward.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CellBlock {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl CellBlock {
    fn to_font_units(self, grid_size: usize, scale: f64) -> Rectangle {
        let n = grid_size as f64;
        let (x, y) = (self.x as f64, self.y as f64);
        let (w, h) = (self.width as f64, self.height as f64);
        Rectangle {
            x1: x * scale,
            y1: (n - y - h) * scale,
            x2: (x + w) * scale,
            y2: (n - y) * scale,
        }
    }
}

fn scale_for(bitmap: &CharacterBitmap, units_per_em: u16) -> f64 {
    f64::from(units_per_em) / bitmap.size() as f64
}

/// Convert a bitmap into a set of non-overlapping rectangles covering exactly
/// its filled cells.
///
/// Cells are scanned row by row. A filled, unclaimed cell starts a horizontal
/// run; the run then grows downward for as long as the whole run width is
/// filled and unclaimed in the next row. The result is deterministic but greedy,
/// so it is not guaranteed to be the smallest possible rectangle count.
pub fn convert(bitmap: &CharacterBitmap, units_per_em: u16) -> Vec<Rectangle> {
    let size = bitmap.size();
    let scale = scale_for(bitmap, units_per_em);
    merge_blocks(bitmap)
        .into_iter()
        .map(|block| block.to_font_units(size, scale))
        .collect()
}

fn merge_blocks(bitmap: &CharacterBitmap) -> Vec<CellBlock> {
    let size = bitmap.size();
    let mut blocks = Vec::new();
    if !bitmap.is_designed() {
        return blocks;
    }
    let mut processed = vec![false; size * size];
    let open = |processed: &[bool], x: usize, y: usize| {
        bitmap.cell(x, y) && !processed[y * size + x]
    };

    for y in 0..size {
        for x in 0..size {
            if !open(&processed, x, y) {
                continue;
            }
            let mut width = 1;
            while x + width < size && open(&processed, x + width, y) {
                width += 1;
            }
            let mut height = 1;
            while y + height < size && (x..x + width).all(|cx| open(&processed, cx, y + height)) {
                height += 1;
            }
            for row in y..y + height {
                processed[row * size + x..row * size + x + width].fill(true);
            }
            blocks.push(CellBlock {
                x,
                y,
                width,
                height,
            });
        }
    }
    blocks
}

/// One rectangle per filled pixel, without merging.
pub fn pixel_rects(bitmap: &CharacterBitmap, units_per_em: u16) -> Vec<Rectangle> {
    let size = bitmap.size();
    let scale = scale_for(bitmap, units_per_em);
    let mut rects = Vec::with_capacity(bitmap.count_filled());
    for y in 0..size {
        for x in 0..size {
            if bitmap.cell(x, y) {
                let block = CellBlock {
                    x,
                    y,
                    width: 1,
                    height: 1,
                };
                rects.push(block.to_font_units(size, scale));
            }
        }
    }
    rects
}

/// SVG path data with one square per filled pixel, in screen orientation (y down).
pub fn to_svg_path(bitmap: &CharacterBitmap, scale: f64) -> String {
    let size = bitmap.size();
    let mut squares = Vec::new();
    for y in 0..size {
        for x in 0..size {
            if bitmap.cell(x, y) {
                let (px, py) = (x as f64 * scale, y as f64 * scale);
                squares.push(format!("M{px},{py} h{scale} v{scale} h-{scale} z"));
            }
        }
    }
    squares.join(" ")
}

/// Build the glyph path for a list of rectangles, one contour per rectangle.
pub fn to_bez_path(rects: &[Rectangle]) -> BezPath {
    let mut path = BezPath::new();
    for rect in rects {
        rect.append_to(&mut path);
    }
    path
}
