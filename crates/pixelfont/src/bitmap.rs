//! Per-character pixel grid and the editing primitives the editor applies to it.
use std::collections::BTreeMap;

use crate::error::{FontError, Result};

/// Code point keyed bitmap set. Iteration is always in ascending code point order.
pub type BitmapCollection = BTreeMap<u32, CharacterBitmap>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Where the old grid is placed inside the new one when the grid size changes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ResizeAnchor {
    /// Keep the top left corner: shrinking crops right/bottom, growing pads right/bottom.
    #[default]
    TopLeft,
    /// Shrinking crops around the center, growing pads evenly on all sides.
    Center,
}

/// A square boolean pixel grid for one character.
///
/// Row-major, origin top left, `y` grows downward. Coordinates are signed so that
/// tools can pass positions outside the grid; those reads return `false` and those
/// writes are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterBitmap {
    size: usize,
    cells: Vec<bool>,
    /// Advance width in grid cells
    pub advance_width: i32,
    /// Space before the character in grid cells
    pub left_bearing: i32,
    /// Space after the character in grid cells
    pub right_bearing: i32,
}

impl CharacterBitmap {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(FontError::InvalidGrid("grid size must be at least 1".into()));
        }
        let cells = size
            .checked_mul(size)
            .ok_or_else(|| FontError::InvalidGrid(format!("grid size {size} too large")))?;
        Ok(Self {
            size,
            cells: vec![false; cells],
            advance_width: size as i32,
            left_bearing: 0,
            right_bearing: 0,
        })
    }

    /// Build a bitmap from explicit rows. Every row must be exactly as long as
    /// the number of rows.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let mut bitmap = Self::new(rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != bitmap.size {
                return Err(FontError::InvalidGrid(format!(
                    "row {y} has {} cells, expected {}",
                    row.len(),
                    bitmap.size
                )));
            }
            let start = y * bitmap.size;
            bitmap.cells[start..start + bitmap.size].copy_from_slice(row);
        }
        Ok(bitmap)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.size && y < self.size {
            Some(y * self.size + x)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, value: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    /// Unchecked-coordinate access for callers iterating `0..size`.
    pub(crate) fn cell(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.size + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.size)
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// A character counts as designed once at least one pixel is set.
    pub fn is_designed(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }

    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn flip_horizontal(&mut self) {
        let size = self.size;
        for row in self.cells.chunks_mut(size) {
            row.reverse();
        }
    }

    pub fn flip_vertical(&mut self) {
        let size = self.size;
        for y in 0..size / 2 {
            let (top, bottom) = self.cells.split_at_mut((size - 1 - y) * size);
            top[y * size..(y + 1) * size].swap_with_slice(&mut bottom[..size]);
        }
    }

    /// Move every pixel one cell. Pixels pushed past the edge are lost.
    pub fn shift(&mut self, direction: ShiftDirection) {
        let (dx, dy) = match direction {
            ShiftDirection::Left => (-1, 0),
            ShiftDirection::Right => (1, 0),
            ShiftDirection::Up => (0, -1),
            ShiftDirection::Down => (0, 1),
        };
        self.translate(dx, dy);
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let mut moved = vec![false; self.cells.len()];
        for y in 0..self.size as i32 {
            for x in 0..self.size as i32 {
                if self.pixel(x, y) {
                    if let Some(i) = self.index(x + dx, y + dy) {
                        moved[i] = true;
                    }
                }
            }
        }
        self.cells = moved;
    }

    /// Inclusive column range `(leftmost, rightmost)` of filled pixels.
    fn column_extent(&self) -> Option<(usize, usize)> {
        let mut extent: Option<(usize, usize)> = None;
        for row in self.rows() {
            for (x, _) in row.iter().enumerate().filter(|(_, c)| **c) {
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(x), hi.max(x)),
                    None => (x, x),
                });
            }
        }
        extent
    }

    /// Inclusive row range `(topmost, bottommost)` of filled pixels.
    fn row_extent(&self) -> Option<(usize, usize)> {
        let mut rows = self
            .rows()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|&c| c))
            .map(|(y, _)| y);
        let top = rows.next()?;
        Some((top, rows.last().unwrap_or(top)))
    }

    fn center_offset(&self, lo: usize, hi: usize) -> i32 {
        let extent = hi - lo + 1;
        let grid_center = (self.size / 2) as i32;
        let char_center = (lo + extent / 2) as i32;
        grid_center - char_center
    }

    pub fn center_horizontal(&mut self) {
        if let Some((lo, hi)) = self.column_extent() {
            let dx = self.center_offset(lo, hi);
            self.translate(dx, 0);
        }
    }

    pub fn center_vertical(&mut self) {
        if let Some((lo, hi)) = self.row_extent() {
            let dy = self.center_offset(lo, hi);
            self.translate(0, dy);
        }
    }

    pub fn center(&mut self) {
        self.center_horizontal();
        self.center_vertical();
    }

    /// Toggle the 4-connected region containing `(x, y)` to the opposite value.
    pub fn flood_fill(&mut self, x: i32, y: i32) {
        if self.index(x, y).is_none() {
            return;
        }
        let target = self.pixel(x, y);
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            let Some(i) = self.index(cx, cy) else {
                continue;
            };
            if self.cells[i] != target {
                continue;
            }
            self.cells[i] = !target;
            stack.push((cx + 1, cy));
            stack.push((cx - 1, cy));
            stack.push((cx, cy + 1));
            stack.push((cx, cy - 1));
        }
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)`, both ends inclusive.
    /// Points outside the grid are skipped.
    ///
    /// Only the steps whose major axis coordinate lies inside the grid are
    /// walked, so endpoints far outside the grid cost nothing extra.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, value: bool) {
        let (x0, y0) = (i64::from(x0), i64::from(y0));
        let (dx, dy) = (i64::from(x1) - x0, i64::from(y1) - y0);
        let steps = dx.abs().max(dy.abs());
        // minor axis offset after `k` major steps, rounded half up
        let along = |k: i64, d: i64| -> i64 {
            let num = 2 * i128::from(k) * i128::from(d.abs()) + i128::from(steps);
            (num / (2 * i128::from(steps))) as i64 * d.signum()
        };
        if steps == 0 {
            self.set_pixel_wide(x0, y0, value);
            return;
        }

        let (start, dir) = if dx.abs() >= dy.abs() {
            (x0, dx.signum())
        } else {
            (y0, dy.signum())
        };
        let last = self.size as i64 - 1;
        let (lo, hi) = if dir > 0 {
            (-start, last - start)
        } else {
            (start - last, start)
        };
        for k in lo.max(0)..=hi.min(steps) {
            self.set_pixel_wide(x0 + along(k, dx), y0 + along(k, dy), value);
        }
    }

    fn set_pixel_wide(&mut self, x: i64, y: i64, value: bool) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel(x, y, value);
        }
    }

    /// Resample onto a `new_size` grid. Metadata is reset to the defaults of the
    /// new size.
    pub fn resized(&self, new_size: usize, anchor: ResizeAnchor) -> Result<Self> {
        let mut out = Self::new(new_size)?;
        let offset = match anchor {
            ResizeAnchor::TopLeft => 0,
            ResizeAnchor::Center => (new_size as i32 - self.size as i32) / 2,
        };
        for y in 0..self.size as i32 {
            for x in 0..self.size as i32 {
                if self.pixel(x, y) {
                    out.set_pixel(x + offset, y + offset, true);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bitmap(art: &[&str]) -> CharacterBitmap {
        crate::test_support::bitmap_from_art(art).unwrap()
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut b = CharacterBitmap::new(4).unwrap();
        b.set_pixel(-1, 0, true);
        b.set_pixel(4, 0, true);
        b.set_pixel(0, 4, true);
        assert!(!b.is_designed());
        assert!(!b.pixel(-1, -1));
        assert!(!b.pixel(10, 2));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            CharacterBitmap::new(0),
            Err(FontError::InvalidGrid(_))
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![true, false], vec![true]];
        assert!(matches!(
            CharacterBitmap::from_rows(&rows),
            Err(FontError::InvalidGrid(_))
        ));
    }

    #[test]
    fn defaults_follow_grid_size() {
        let b = CharacterBitmap::new(8).unwrap();
        assert_eq!(b.advance_width, 8);
        assert_eq!(b.left_bearing, 0);
        assert_eq!(b.right_bearing, 0);
    }

    #[test]
    fn flips() {
        let mut b = bitmap(&["#..", "...", ".#."]);
        b.flip_horizontal();
        assert_eq!(b, bitmap(&["..#", "...", ".#."]));
        b.flip_vertical();
        assert_eq!(b, bitmap(&[".#.", "...", "..#"]));
    }

    #[test]
    fn shift_drops_pixels_at_edge() {
        let mut b = bitmap(&["#..", ".#.", "..."]);
        b.shift(ShiftDirection::Left);
        assert_eq!(b, bitmap(&["...", "#..", "..."]));
        b.shift(ShiftDirection::Down);
        assert_eq!(b, bitmap(&["...", "...", "#.."]));
    }

    #[test]
    fn center_both_axes() {
        let mut b = bitmap(&["##..", "##..", "....", "...."]);
        b.center();
        assert_eq!(b, bitmap(&["....", ".##.", ".##.", "...."]));
    }

    #[test]
    fn center_empty_is_noop() {
        let mut b = CharacterBitmap::new(5).unwrap();
        b.center();
        assert!(!b.is_designed());
    }

    #[test]
    fn flood_fill_respects_walls() {
        let mut b = bitmap(&[".#..", ".#..", ".#..", ".#.."]);
        b.flood_fill(0, 0);
        assert_eq!(b, bitmap(&["##..", "##..", "##..", "##.."]));
        b.flood_fill(0, 0);
        assert_eq!(b, bitmap(&["....", "....", "....", "...."]));
    }

    #[test]
    fn flood_fill_outside_is_noop() {
        let mut b = CharacterBitmap::new(3).unwrap();
        b.flood_fill(-1, 5);
        assert!(!b.is_designed());
    }

    #[test]
    fn draw_line_with_far_endpoints() {
        let mut b = CharacterBitmap::new(4).unwrap();
        b.draw_line(-2_000_000_000, 0, 2_000_000_000, 0, true);
        assert_eq!(b, bitmap(&["####", "....", "....", "...."]));

        let mut b = CharacterBitmap::new(4).unwrap();
        b.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, true);
        assert_eq!(b, bitmap(&["#...", ".#..", "..#.", "...#"]));

        // entirely outside on one side
        let mut b = CharacterBitmap::new(4).unwrap();
        b.draw_line(2_000_000_000, -5, 2_000_000_000, 9, true);
        assert!(!b.is_designed());
    }

    #[test]
    fn draw_shallow_line() {
        let mut b = CharacterBitmap::new(5).unwrap();
        b.draw_line(0, 0, 4, 2, true);
        assert_eq!(b, bitmap(&["#....", ".##..", "...##", ".....", "....."]));
    }

    #[test]
    fn draw_diagonal_line() {
        let mut b = CharacterBitmap::new(4).unwrap();
        b.draw_line(0, 0, 3, 3, true);
        assert_eq!(b, bitmap(&["#...", ".#..", "..#.", "...#"]));
        b.draw_line(3, 3, 0, 0, false);
        assert!(!b.is_designed());
    }

    #[test]
    fn line_is_clipped() {
        let mut b = CharacterBitmap::new(3).unwrap();
        b.draw_line(-2, 1, 5, 1, true);
        assert_eq!(b, bitmap(&["...", "###", "..."]));
    }

    #[test]
    fn shrink_crops_to_top_left() {
        let b = bitmap(&["#..#", ".#..", "..#.", "#..#"]);
        let small = b.resized(2, ResizeAnchor::TopLeft).unwrap();
        assert_eq!(small, bitmap(&["#.", ".#"]));
    }

    #[test]
    fn grow_pads_right_and_bottom() {
        let b = bitmap(&["##", "#."]);
        let big = b.resized(3, ResizeAnchor::TopLeft).unwrap();
        assert_eq!(big, bitmap(&["##.", "#..", "..."]));
        assert_eq!(big.advance_width, 3);
    }

    #[test]
    fn center_anchor_crops_and_pads_around_middle() {
        let b = bitmap(&["#..#", ".##.", ".##.", "#..#"]);
        assert_eq!(
            b.resized(2, ResizeAnchor::Center).unwrap(),
            bitmap(&["##", "##"])
        );
        let small = bitmap(&["##", "##"]);
        assert_eq!(
            small.resized(4, ResizeAnchor::Center).unwrap(),
            bitmap(&["....", ".##.", ".##.", "...."])
        );
    }
}
