use crate::geometry::Point;

// Pinch baseline carried between touch-move frames
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub last_center: Option<Point>,
    pub last_distance: f64,
}

impl GestureState {
    /// Previous frame's centre and finger distance, once both are known.
    pub fn baseline(&self) -> Option<(Point, f64)> {
        match self.last_center {
            Some(center) if self.last_distance > 0.0 => Some((center, self.last_distance)),
            _ => None,
        }
    }

    pub fn record(&mut self, center: Point, distance: f64) {
        self.last_center = Some(center);
        self.last_distance = distance;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
