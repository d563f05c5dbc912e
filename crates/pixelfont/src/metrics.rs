//! Per-character metrics derived from the bitmap.
use crate::bitmap::CharacterBitmap;

/// Inclusive bounds of the filled cells, in grid coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

/// Bounding box of the filled cells. An empty bitmap reports all zeros.
pub fn bounding_box(bitmap: &CharacterBitmap) -> BoundingBox {
    let mut bbox: Option<BoundingBox> = None;
    for (y, row) in bitmap.rows().enumerate() {
        for (x, _) in row.iter().enumerate().filter(|(_, c)| **c) {
            bbox = Some(match bbox {
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
                None => BoundingBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
            });
        }
    }
    bbox.unwrap_or_default()
}

/// Horizontal advance in font units.
///
/// Designed characters always advance by the full grid width so that every
/// glyph of a pixel font sits on the same pitch, narrow ones included.
/// Undesigned characters get half an em.
pub fn advance_width(bitmap: &CharacterBitmap, units_per_em: u16) -> u16 {
    if !bitmap.is_designed() {
        return units_per_em / 2;
    }
    let grid = bitmap.size() as f64;
    let scale = f64::from(units_per_em) / grid;
    (grid * scale).ceil() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bitmap_from_art;

    #[test]
    fn empty_bitmap_has_zero_box() {
        let b = CharacterBitmap::new(8).unwrap();
        assert_eq!(bounding_box(&b), BoundingBox::default());
    }

    #[test]
    fn box_covers_filled_cells() {
        let b = bitmap_from_art(&["....", "..#.", ".#..", "...."]).unwrap();
        assert_eq!(
            bounding_box(&b),
            BoundingBox {
                min_x: 1,
                min_y: 1,
                max_x: 2,
                max_y: 2
            }
        );
    }

    #[test]
    fn full_grid_advances_one_em() {
        let mut b = CharacterBitmap::new(10).unwrap();
        for y in 0..10 {
            b.draw_line(0, y, 9, y, true);
        }
        assert_eq!(advance_width(&b, 1000), 1000);
    }

    #[test]
    fn narrow_glyph_still_uses_full_grid() {
        let mut b = CharacterBitmap::new(16).unwrap();
        b.set_pixel(7, 3, true);
        assert_eq!(advance_width(&b, 1000), 1000);
        assert_eq!(advance_width(&b, 2048), 2048);
    }

    #[test]
    fn undesigned_advance_is_half_em() {
        let b = CharacterBitmap::new(16).unwrap();
        assert_eq!(advance_width(&b, 1000), 500);
        assert_eq!(advance_width(&b, 1001), 500);
    }
}
