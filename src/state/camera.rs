use crate::constants::{BUTTON_ZOOM_STEP, MAX_SCALE, MIN_SCALE, SIZE, ZOOM_STEP};
use crate::geometry::{Point, Size, distance, midpoint};

use super::touch::GestureState;

/// Pan offset and uniform zoom of the stage.
///
/// Three frames are in play: screen (input event pixels relative to the
/// canvas), stage (the transformed surface) and world (card positions).
/// `screen = position + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub position: Point,
    /// Always uniform: `scale.x == scale.y`.
    pub scale: Point,
}

impl ViewportState {
    /// Unscaled, with the card at the world origin centred in the viewport.
    pub fn home(viewport: Size) -> Self {
        Self {
            position: Point::new(
                viewport.width / 2.0 - SIZE / 2.0,
                viewport.height / 2.0 - SIZE / 2.0,
            ),
            scale: Point::splat(1.0),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.scale.x
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        (p - self.position) / self.scale
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        self.position + p * self.scale
    }

    /// Zoom to `requested` (clamped) keeping the world point under `pointer` fixed on screen.
    pub fn zoom_at(&self, pointer: Point, requested: f64) -> Self {
        let anchor = self.screen_to_world(pointer);
        let scale = Point::splat(clamp_scale(requested));
        Self {
            position: pointer - anchor * scale,
            scale,
        }
    }
}

pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// A wheel event reduced to what zooming needs. `pointer` is in screen space.
#[derive(Clone, Copy, Debug)]
pub struct WheelInput {
    pub pointer: Point,
    pub delta_y: f64,
    /// Ctrl (or Meta) held; wheel zoom is gated on it.
    pub zoom_modifier: bool,
}

#[derive(Clone, Copy, Debug)]
struct StageDrag {
    live: Point,
    last_pointer: Point,
}

// Viewport controller: committed state plus in-flight pan/pinch bookkeeping
#[derive(Debug, Clone)]
pub struct Camera {
    view: ViewportState,
    gesture: GestureState,
    drag: Option<StageDrag>,
    drag_paused: bool,
}

impl Camera {
    pub fn new(viewport: Size) -> Self {
        Self {
            view: ViewportState::home(viewport),
            gesture: GestureState::default(),
            drag: None,
            drag_paused: false,
        }
    }

    /// Committed state. Does not include an in-progress stage drag.
    pub fn state(&self) -> ViewportState {
        self.view
    }

    /// Where the stage is drawn right now, including an in-progress drag.
    pub fn stage_position(&self) -> Point {
        self.drag.map(|d| d.live).unwrap_or(self.view.position)
    }

    /// The state the stage is drawn with right now.
    pub fn live_state(&self) -> ViewportState {
        ViewportState {
            position: self.stage_position(),
            scale: self.view.scale,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_paused(&self) -> bool {
        self.drag_paused
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Returns true when the event was consumed (caller should prevent the default scroll).
    pub fn wheel(&mut self, input: WheelInput) -> bool {
        if !input.zoom_modifier {
            return false;
        }
        // Wheel away from the user reports a negative delta and zooms in.
        let requested = if input.delta_y < 0.0 {
            self.view.zoom() * ZOOM_STEP
        } else if input.delta_y > 0.0 {
            self.view.zoom() / ZOOM_STEP
        } else {
            return true;
        };
        self.zoom_live(input.pointer, requested);
        log::debug!("wheel zoom -> {:.3}", self.view.zoom());
        true
    }

    /// Zooms the stage as currently drawn. An in-progress drag is rebased onto
    /// the zoomed position so it continues from there.
    fn zoom_live(&mut self, pointer: Point, requested: f64) {
        let zoomed = self.live_state().zoom_at(pointer, requested);
        self.view.scale = zoomed.scale;
        match self.drag.as_mut() {
            Some(drag) => drag.live = zoomed.position,
            None => self.view.position = zoomed.position,
        }
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag = Some(StageDrag {
            live: self.view.position,
            last_pointer: pointer,
        });
        self.drag_paused = false;
    }

    pub fn drag_move(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        drag.live = drag.live + (pointer - drag.last_pointer);
        drag.last_pointer = pointer;
        true
    }

    /// Commits the free-form drag position verbatim.
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.view.position = drag.live;
        self.drag_paused = false;
        true
    }

    fn pause_drag(&mut self) {
        if self.end_drag() {
            self.drag_paused = true;
        }
    }

    /// Touch-move with every active touch point in screen space.
    /// Returns true when the drawn stage changed.
    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        match touches {
            [] => false,
            [only] => {
                if self.is_dragging() {
                    self.drag_move(*only)
                } else if self.drag_paused {
                    self.begin_drag(*only);
                    false
                } else {
                    false
                }
            }
            [a, b, ..] => {
                // Pan and pinch never run together.
                if self.is_dragging() {
                    self.pause_drag();
                }
                let center = midpoint(*a, *b);
                let dist = distance(*a, *b);
                let Some((last_center, last_distance)) = self.gesture.baseline() else {
                    self.gesture.record(center, dist);
                    return false;
                };
                // Scale first; the position update depends on it.
                let zoomed = self
                    .view
                    .zoom_at(center, self.view.zoom() * (dist / last_distance));
                self.view = ViewportState {
                    position: zoomed.position + (center - last_center),
                    scale: zoomed.scale,
                };
                self.gesture.record(center, dist);
                true
            }
        }
    }

    /// `remaining` is the number of fingers still down.
    pub fn touch_end(&mut self, remaining: usize) -> bool {
        self.gesture.reset();
        if remaining == 0 {
            self.end_drag()
        } else {
            false
        }
    }

    pub fn home(&mut self, viewport: Size) {
        self.view = ViewportState::home(viewport);
        self.drag = None;
        self.drag_paused = false;
        self.gesture.reset();
    }

    pub fn zoom_in_centered(&mut self, viewport: Size) {
        self.zoom_live(viewport.center(), self.view.zoom() * BUTTON_ZOOM_STEP);
    }

    pub fn zoom_out_centered(&mut self, viewport: Size) {
        self.zoom_live(viewport.center(), self.view.zoom() / BUTTON_ZOOM_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_close;

    const VIEW: Size = Size::new(800.0, 600.0);

    fn assert_anchor_kept(before: ViewportState, after: ViewportState, pointer: Point) {
        let a = before.screen_to_world(pointer);
        let b = after.screen_to_world(pointer);
        assert_close(b.x, a.x);
        assert_close(b.y, a.y);
    }

    fn wheel(pointer: Point, delta_y: f64) -> WheelInput {
        WheelInput {
            pointer,
            delta_y,
            zoom_modifier: true,
        }
    }

    #[test]
    fn screen_and_world_round_trip() {
        let v = ViewportState {
            position: Point::new(120.0, -40.0),
            scale: Point::splat(1.7),
        };
        let w = Point::new(33.0, -250.0);
        let back = v.screen_to_world(v.world_to_screen(w));
        assert_close(back.x, w.x);
        assert_close(back.y, w.y);
    }

    #[test]
    fn zoom_at_preserves_anchor_for_assorted_pointers() {
        let starts = [
            ViewportState::home(VIEW),
            ViewportState {
                position: Point::new(-913.25, 47.5),
                scale: Point::splat(0.43),
            },
        ];
        let pointers = [Point::ORIGIN, Point::new(400.0, 300.0), Point::new(799.0, 3.5)];
        for start in starts {
            for p in pointers {
                for target in [0.25, 0.9, 2.2] {
                    let after = start.zoom_at(p, target);
                    assert_anchor_kept(start, after, p);
                }
            }
        }
    }

    #[test]
    fn wheel_without_modifier_is_ignored() {
        let mut cam = Camera::new(VIEW);
        let before = cam.state();
        let consumed = cam.wheel(WheelInput {
            pointer: Point::new(10.0, 10.0),
            delta_y: -100.0,
            zoom_modifier: false,
        });
        assert!(!consumed);
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn wheel_away_from_user_zooms_in() {
        let mut cam = Camera::new(VIEW);
        let p = Point::new(250.0, 130.0);
        let before = cam.state();
        assert!(cam.wheel(wheel(p, -53.0)));
        assert_close(cam.state().zoom(), ZOOM_STEP);
        assert_anchor_kept(before, cam.state(), p);

        let before = cam.state();
        cam.wheel(wheel(p, 53.0));
        assert_close(cam.state().zoom(), 1.0);
        assert_anchor_kept(before, cam.state(), p);
    }

    #[test]
    fn scale_stays_clamped_over_long_sequences() {
        let mut cam = Camera::new(VIEW);
        let p = Point::new(31.0, 517.0);
        for _ in 0..200 {
            cam.wheel(wheel(p, -1.0));
            assert!(cam.state().zoom() <= MAX_SCALE);
        }
        assert_close(cam.state().zoom(), MAX_SCALE);
        for _ in 0..200 {
            cam.zoom_out_centered(VIEW);
            assert!(cam.state().zoom() >= MIN_SCALE);
        }
        assert_close(cam.state().zoom(), MIN_SCALE);
    }

    #[test]
    fn pinch_scale_stays_clamped() {
        let mut cam = Camera::new(VIEW);
        let c = Point::new(400.0, 300.0);
        cam.touch_move(&[c - Point::new(50.0, 0.0), c + Point::new(50.0, 0.0)]);
        // Ratio of 100 in one frame.
        assert!(cam.touch_move(&[c - Point::new(5000.0, 0.0), c + Point::new(5000.0, 0.0)]));
        assert_close(cam.state().zoom(), MAX_SCALE);
        // Fingers land on the same spot: a ratio of zero.
        assert!(cam.touch_move(&[c, c]));
        assert_close(cam.state().zoom(), MIN_SCALE);
        // The zero-distance frame is not a usable baseline.
        assert!(!cam.touch_move(&[c - Point::new(80.0, 0.0), c + Point::new(80.0, 0.0)]));
        assert_close(cam.state().zoom(), MIN_SCALE);
        assert!(cam.touch_move(&[c - Point::new(10.0, 0.0), c + Point::new(10.0, 0.0)]));
        let zoom = cam.state().zoom();
        assert!((MIN_SCALE..=MAX_SCALE).contains(&zoom));
    }

    #[test]
    fn wheel_during_stage_drag_keeps_anchor() {
        let mut cam = Camera::new(VIEW);
        cam.begin_drag(Point::new(100.0, 100.0));
        cam.drag_move(Point::new(150.0, 100.0));
        let p = Point::new(300.0, 300.0);
        let before = cam.live_state();
        assert!(cam.wheel(wheel(p, -1.0)));
        assert!(cam.is_dragging());
        assert_close(cam.live_state().zoom(), ZOOM_STEP);
        assert_anchor_kept(before, cam.live_state(), p);

        // The drag carries on from the zoomed stage.
        let mid = cam.live_state();
        cam.drag_move(Point::new(170.0, 90.0));
        assert_close(cam.stage_position().x, mid.position.x + 20.0);
        assert_close(cam.stage_position().y, mid.position.y - 10.0);
        cam.drag_move(Point::new(150.0, 100.0));
        assert!(cam.end_drag());
        assert_anchor_kept(before, cam.state(), p);
        assert_eq!(cam.state(), cam.live_state());
    }

    #[test]
    fn toolbar_zoom_during_stage_drag_keeps_centre() {
        let mut cam = Camera::new(VIEW);
        cam.begin_drag(Point::new(10.0, 10.0));
        cam.drag_move(Point::new(-60.0, 45.0));
        let before = cam.live_state();
        cam.zoom_in_centered(VIEW);
        assert_anchor_kept(before, cam.live_state(), VIEW.center());
        cam.end_drag();
        assert_anchor_kept(before, cam.state(), VIEW.center());
    }

    #[test]
    fn clamped_zoom_still_keeps_anchor() {
        let v = ViewportState::home(VIEW);
        let p = Point::new(600.0, 90.0);
        let after = v.zoom_at(p, 40.0);
        assert_close(after.zoom(), MAX_SCALE);
        assert_anchor_kept(v, after, p);
    }

    #[test]
    fn drag_commits_only_on_end() {
        let mut cam = Camera::new(VIEW);
        let start = cam.state().position;
        cam.begin_drag(Point::new(100.0, 100.0));
        cam.drag_move(Point::new(130.0, 90.0));
        cam.drag_move(Point::new(150.0, 95.0));
        assert_eq!(cam.state().position, start);
        assert_eq!(cam.stage_position(), start + Point::new(50.0, -5.0));
        assert!(cam.end_drag());
        assert_eq!(cam.state().position, start + Point::new(50.0, -5.0));
        assert!(!cam.is_dragging());
        assert!(!cam.end_drag());
    }

    #[test]
    fn pinch_first_frame_only_records_baseline() {
        let mut cam = Camera::new(VIEW);
        let before = cam.state();
        let changed = cam.touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        assert!(!changed);
        assert_eq!(cam.state(), before);
        assert_eq!(
            cam.gesture(),
            GestureState {
                last_center: Some(Point::new(150.0, 100.0)),
                last_distance: 100.0,
            }
        );
    }

    #[test]
    fn pinch_scales_by_distance_ratio_and_pans_with_centre() {
        let mut cam = Camera::new(VIEW);
        cam.touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        let before = cam.state();
        // Fingers spread to twice the distance while the centre shifts by (10, 20).
        let a = Point::new(60.0, 120.0);
        let b = Point::new(260.0, 120.0);
        assert!(cam.touch_move(&[a, b]));
        let after = cam.state();
        assert_close(after.zoom(), 2.0);

        let center = midpoint(a, b);
        let anchored = before.zoom_at(center, 2.0);
        assert_close(after.position.x, anchored.position.x + 10.0);
        assert_close(after.position.y, anchored.position.y + 20.0);
        assert_eq!(cam.gesture().last_center, Some(center));
        assert_close(cam.gesture().last_distance, 200.0);
    }

    #[test]
    fn pinch_with_steady_centre_keeps_anchor() {
        let mut cam = Camera::new(VIEW);
        let c = Point::new(320.0, 240.0);
        cam.touch_move(&[c - Point::new(50.0, 0.0), c + Point::new(50.0, 0.0)]);
        let before = cam.state();
        cam.touch_move(&[c - Point::new(0.0, 80.0), c + Point::new(0.0, 80.0)]);
        assert_close(cam.state().zoom(), 1.6);
        assert_anchor_kept(before, cam.state(), c);
    }

    #[test]
    fn touch_end_resets_baseline_so_next_pinch_starts_fresh() {
        let mut cam = Camera::new(VIEW);
        cam.touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        cam.touch_move(&[Point::new(0.0, 0.0), Point::new(150.0, 0.0)]);
        cam.touch_end(0);
        assert_eq!(cam.gesture(), GestureState::default());
        let before = cam.state();
        assert!(!cam.touch_move(&[Point::new(10.0, 10.0), Point::new(400.0, 10.0)]));
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn second_finger_pauses_drag_and_single_finger_resumes_it() {
        let mut cam = Camera::new(VIEW);
        let start = cam.state().position;
        cam.begin_drag(Point::new(10.0, 10.0));
        cam.touch_move(&[Point::new(30.0, 10.0)]);
        assert_eq!(cam.stage_position(), start + Point::new(20.0, 0.0));

        cam.touch_move(&[Point::new(30.0, 10.0), Point::new(90.0, 10.0)]);
        assert!(!cam.is_dragging());
        assert!(cam.drag_paused());
        assert_eq!(cam.state().position, start + Point::new(20.0, 0.0));

        cam.touch_end(1);
        // Resume frame establishes the pointer without moving the stage.
        assert!(!cam.touch_move(&[Point::new(90.0, 10.0)]));
        assert!(cam.is_dragging());
        assert!(!cam.drag_paused());
        cam.touch_move(&[Point::new(95.0, 12.0)]);
        cam.touch_end(0);
        assert_eq!(cam.state().position, start + Point::new(25.0, 2.0));
    }

    #[test]
    fn single_touch_without_pause_does_nothing() {
        let mut cam = Camera::new(VIEW);
        let before = cam.state();
        assert!(!cam.touch_move(&[Point::new(5.0, 5.0)]));
        assert!(!cam.is_dragging());
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn home_restores_initial_state() {
        let mut cam = Camera::new(VIEW);
        let initial = cam.state();
        cam.zoom_in_centered(VIEW);
        cam.begin_drag(Point::ORIGIN);
        cam.drag_move(Point::new(-300.0, 40.0));
        cam.end_drag();
        cam.home(VIEW);
        assert_eq!(cam.state(), initial);
        assert_eq!(
            initial.position,
            Point::new(400.0 - SIZE / 2.0, 300.0 - SIZE / 2.0)
        );
        assert_eq!(initial.scale, Point::splat(1.0));
    }

    #[test]
    fn toolbar_zoom_anchors_on_viewport_centre() {
        let mut cam = Camera::new(VIEW);
        let before = cam.state();
        cam.zoom_in_centered(VIEW);
        assert_close(cam.state().zoom(), BUTTON_ZOOM_STEP);
        assert_anchor_kept(before, cam.state(), VIEW.center());
    }
}
