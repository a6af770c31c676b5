//! Background dot grid.
//!
//! The grid is a pure function of the committed viewport and the canvas size.
//! Dots cover the visible area plus a padding margin so a stage drag doesn't
//! reveal empty space before the next recompute.

use std::rc::Rc;

use crate::constants::{GRID_COARSE_BELOW, GRID_MEDIUM_BELOW, GRID_PADDING, SIZE};
use crate::geometry::{Point, Size};
use crate::state::ViewportState;

/// Dot spacing and radius for one zoom band, both in world px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTier {
    pub size: f64,
    pub radius: f64,
}

/// Coarser, larger dots when zoomed out.
pub fn grid_tier(scale: f64) -> GridTier {
    if scale < GRID_COARSE_BELOW {
        GridTier {
            size: SIZE * 4.0,
            radius: 5.0,
        }
    } else if scale < GRID_MEDIUM_BELOW {
        GridTier {
            size: SIZE * 2.0,
            radius: 2.5,
        }
    } else {
        GridTier {
            size: SIZE,
            radius: 1.0,
        }
    }
}

/// Lazily walks grid intersections column by column over `[start, end)`.
#[derive(Clone, Debug)]
pub struct GridDots {
    step: f64,
    start_y: f64,
    end: Point,
    cursor: Point,
}

impl Iterator for GridDots {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        while self.cursor.x < self.end.x {
            if self.cursor.y < self.end.y {
                let dot = self.cursor;
                self.cursor.y += self.step;
                return Some(dot);
            }
            self.cursor.x += self.step;
            self.cursor.y = self.start_y;
        }
        None
    }
}

fn snapped_span(offset: f64, extent: f64, scale: f64, step: f64) -> (f64, f64) {
    let pad = extent * (GRID_PADDING / scale);
    let center = -offset / scale;
    let start = ((center - pad) / step).floor() * step;
    let end = ((center + pad) / step).floor() * step;
    (start, end)
}

pub fn grid_dots(view: &ViewportState, viewport: Size) -> GridDots {
    let scale = view.zoom();
    let step = grid_tier(scale).size;
    let (start_x, end_x) = snapped_span(view.position.x, viewport.width, scale, step);
    let (start_y, end_y) = snapped_span(view.position.y, viewport.height, scale, step);
    GridDots {
        step,
        start_y,
        end: Point::new(end_x, end_y),
        cursor: Point::new(start_x, start_y),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct GridKey {
    viewport: Size,
    view: ViewportState,
}

/// Memoized dot set; recomputed only when size, position or scale change.
#[derive(Debug, Default)]
pub struct GridLayer {
    key: Option<GridKey>,
    tier: Option<GridTier>,
    dots: Rc<[Point]>,
}

impl GridLayer {
    pub fn dots(&mut self, view: &ViewportState, viewport: Size) -> (GridTier, Rc<[Point]>) {
        let key = GridKey {
            viewport,
            view: *view,
        };
        match (self.key, self.tier) {
            (Some(k), Some(tier)) if k == key => (tier, self.dots.clone()),
            _ => {
                let tier = grid_tier(view.zoom());
                self.dots = grid_dots(view, viewport).collect();
                self.key = Some(key);
                self.tier = Some(tier);
                log::debug!("grid recomputed: {} dots", self.dots.len());
                (tier, self.dots.clone())
            }
        }
    }
}
