use std::fmt;

use crate::constants::{SIZE, SNAP_THRESHOLD};
use crate::geometry::Point;

/// Matrix cell a card was created from. Stable for the card's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardKey {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardRecord {
    pub key: CardKey,
    /// Top-left corner in world space.
    pub x: f64,
    pub y: f64,
    pub glyph: String,
}

impl CardRecord {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rest-state styling flag: sits exactly on a base grid intersection.
    pub fn is_snapped(&self) -> bool {
        is_grid_aligned(self.position())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + SIZE && p.y >= self.y && p.y < self.y + SIZE
    }
}

pub fn is_grid_aligned(p: Point) -> bool {
    p.x % SIZE == 0.0 && p.y % SIZE == 0.0
}

pub fn nearest_grid_point(p: Point) -> Point {
    Point::new((p.x / SIZE).round() * SIZE, (p.y / SIZE).round() * SIZE)
}

/// Magnetic snap: both axes must be within the threshold, otherwise the raw position stands.
pub fn snap_position(raw: Point) -> Point {
    let g = nearest_grid_point(raw);
    if (raw.x - g.x).abs() < SNAP_THRESHOLD && (raw.y - g.y).abs() < SNAP_THRESHOLD {
        g
    } else {
        raw
    }
}

/// A card being dragged. Owns the live position until the drag ends;
/// every move reports the resolved position so the store stays current.
#[derive(Clone, Debug, PartialEq)]
pub struct CardDrag {
    pub key: CardKey,
    grab_offset: Point,
    position: Point,
}

impl CardDrag {
    pub fn begin(card: &CardRecord, pointer_world: Point) -> Self {
        Self {
            key: card.key,
            grab_offset: pointer_world - card.position(),
            position: card.position(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves the card under the pointer and returns the position to report.
    pub fn drag_move(&mut self, pointer_world: Point) -> Point {
        self.position = snap_position(pointer_world - self.grab_offset);
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(x: f64, y: f64) -> CardRecord {
        CardRecord {
            key: CardKey { row: 0, col: 0 },
            x,
            y,
            glyph: "あ".into(),
        }
    }

    #[test]
    fn key_formats_as_row_dash_col() {
        assert_eq!(CardKey { row: 3, col: 10 }.to_string(), "3-10");
    }

    #[test]
    fn snapped_flag_reflects_rest_position() {
        assert!(card(0.0, 0.0).is_snapped());
        assert!(card(-SIZE, 2.0 * SIZE).is_snapped());
        assert!(!card(SIZE, 1.0).is_snapped());
        assert!(!card(0.5, 0.0).is_snapped());
    }

    #[test]
    fn snap_requires_both_axes_within_threshold() {
        let near = SNAP_THRESHOLD - 1.0;
        let far = SNAP_THRESHOLD + 1.0;
        assert_eq!(snap_position(Point::new(SIZE + near, -near)), Point::new(SIZE, 0.0));
        let off = Point::new(SIZE + near, far);
        assert_eq!(snap_position(off), off);
        let exactly = Point::new(SNAP_THRESHOLD, 0.0);
        assert_eq!(snap_position(exactly), exactly);
    }

    #[test]
    fn small_drag_from_grid_reports_grid_position() {
        let c = card(SIZE, 0.0);
        let grab = Point::new(SIZE + 20.0, 25.0);
        let mut drag = CardDrag::begin(&c, grab);
        let reported = drag.drag_move(grab + Point::new(3.0, -4.0));
        assert_eq!(reported, Point::new(SIZE, 0.0));
        assert_eq!(drag.position(), Point::new(SIZE, 0.0));
    }

    #[test]
    fn drag_tracks_pointer_without_jumping_to_grab_point() {
        let c = card(0.0, 0.0);
        let mut drag = CardDrag::begin(&c, Point::new(30.0, 30.0));
        let reported = drag.drag_move(Point::new(55.0, 47.0));
        assert_eq!(reported, Point::new(25.0, 17.0));
        // Approaching the next intersection pulls the card onto it.
        let reported = drag.drag_move(Point::new(85.0, 32.0));
        assert_eq!(reported, Point::new(SIZE, 0.0));
    }

    #[test]
    fn contains_is_half_open_square() {
        let c = card(SIZE, SIZE);
        assert!(c.contains(Point::new(SIZE, SIZE)));
        assert!(c.contains(Point::new(2.0 * SIZE - 0.01, 2.0 * SIZE - 0.01)));
        assert!(!c.contains(Point::new(2.0 * SIZE, SIZE)));
        assert!(!c.contains(Point::new(SIZE - 0.01, SIZE)));
    }
}
