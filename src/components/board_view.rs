use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent,
    TouchList, WheelEvent, Window,
};
use yew::prelude::*;

use super::camera_controls::CameraControls;
use crate::card::{CardDrag, CardRecord};
use crate::constants::{CARD_FONT_PX, SIZE};
use crate::geometry::{Point, Size};
use crate::grid::GridLayer;
use crate::model::{BoardAction, BoardState};
use crate::state::{Camera, WheelInput};

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub board: UseReducerHandle<BoardState>,
    pub on_open_charsets: Callback<()>,
}

fn window_size() -> Size {
    let Some(window) = web_sys::window() else {
        return Size::new(800.0, 600.0);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    Size::new(width.max(0.0), height.max(0.0))
}

fn canvas_size(canvas: &HtmlCanvasElement) -> Size {
    Size::new(canvas.width() as f64, canvas.height() as f64)
}

/// Client coordinates to screen space (relative to the canvas box).
fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn touch_points(canvas: &HtmlCanvasElement, touches: &TouchList) -> Vec<Point> {
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| canvas_point(canvas, t.client_x(), t.client_y()))
        .collect()
}

fn draw_card(ctx: &CanvasRenderingContext2d, pos: Point, card: &CardRecord) {
    ctx.set_fill_style_str("rgba(38,38,38,0.5)");
    ctx.fill_rect(pos.x, pos.y, SIZE, SIZE);
    if card.is_snapped() {
        ctx.set_stroke_style_str("#7e2a0c");
        ctx.set_line_width(2.0);
    } else {
        let dash = js_sys::Array::of2(&4.0.into(), &2.0.into());
        ctx.set_line_dash(&dash).ok();
        ctx.set_stroke_style_str("#fff");
        ctx.set_line_width(1.0);
    }
    ctx.stroke_rect(pos.x, pos.y, SIZE, SIZE);
    ctx.set_line_dash(&js_sys::Array::new()).ok();
    ctx.set_fill_style_str("#fff");
    ctx.set_font(&format!("{CARD_FONT_PX}px sans-serif"));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&card.glyph, pos.x + SIZE / 2.0, pos.y + SIZE / 2.0)
        .ok();
}

// Handles shared by the draw loop and every input listener.
#[derive(Clone)]
struct Surface {
    canvas: HtmlCanvasElement,
    camera: Rc<RefCell<Camera>>,
    grid: Rc<RefCell<GridLayer>>,
    card_drag: Rc<RefCell<Option<CardDrag>>>,
    board: Rc<RefCell<UseReducerHandle<BoardState>>>,
    dirty: Rc<RefCell<bool>>,
}

impl Surface {
    fn request_draw(&self) {
        *self.dirty.borrow_mut() = true;
    }

    fn board(&self) -> UseReducerHandle<BoardState> {
        self.board.borrow().clone()
    }

    /// Pointer or single finger down: pick up the topmost card, else start panning.
    fn press(&self, p: Point) {
        let board = self.board();
        let world = self.camera.borrow().live_state().screen_to_world(p);
        let picked = board.card_at(world).map(|card| CardDrag::begin(card, world));
        match picked {
            Some(drag) => {
                let key = drag.key;
                *self.card_drag.borrow_mut() = Some(drag);
                board.dispatch(BoardAction::RaiseCard(key));
            }
            None => self.camera.borrow_mut().begin_drag(p),
        }
        self.request_draw();
    }

    /// Returns false when no card is being dragged.
    fn move_card(&self, p: Point) -> bool {
        let world = self.camera.borrow().state().screen_to_world(p);
        let (key, position) = {
            let mut slot = self.card_drag.borrow_mut();
            let Some(drag) = slot.as_mut() else {
                return false;
            };
            (drag.key, drag.drag_move(world))
        };
        self.board()
            .dispatch(BoardAction::MoveCard { key, position });
        self.request_draw();
        true
    }

    fn release_card(&self) -> bool {
        let released = self.card_drag.borrow_mut().take().is_some();
        if released {
            self.request_draw();
        }
        released
    }

    fn resize(&self) {
        let size = window_size();
        self.canvas.set_width(size.width as u32);
        self.canvas.set_height(size.height as u32);
        self.request_draw();
    }

    fn draw(&self) {
        if !self.canvas.is_connected() {
            return;
        }
        let Some(ctx) = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            return;
        };
        let size = canvas_size(&self.canvas);
        let (live, committed) = {
            let cam = self.camera.borrow();
            (cam.live_state(), cam.state())
        };
        // Grid follows the committed view; its padding covers an in-flight pan.
        let (tier, dots) = self.grid.borrow_mut().dots(&committed, size);

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        ctx.set_fill_style_str("#09090b");
        ctx.fill_rect(0.0, 0.0, size.width, size.height);
        ctx.set_transform(
            live.scale.x,
            0.0,
            0.0,
            live.scale.y,
            live.position.x,
            live.position.y,
        )
        .ok();

        ctx.set_global_alpha(0.4);
        ctx.set_fill_style_str("#fff");
        ctx.begin_path();
        for d in dots.iter() {
            ctx.move_to(d.x + tier.radius, d.y);
            ctx.arc(d.x, d.y, tier.radius, 0.0, TAU).ok();
        }
        ctx.fill();
        ctx.set_global_alpha(1.0);

        let board = self.board();
        let drag = self.card_drag.borrow();
        for card in board.cards_back_to_front() {
            let pos = match drag.as_ref() {
                Some(d) if d.key == card.key => d.position(),
                _ => card.position(),
            };
            draw_card(&ctx, pos, card);
        }
    }
}

type Listener = Closure<dyn FnMut(Event)>;

fn listen(
    target: &EventTarget,
    registry: &mut Vec<(EventTarget, &'static str, Listener)>,
    name: &'static str,
    f: impl FnMut(Event) + 'static,
) {
    let cb: Listener = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())
        .is_ok()
    {
        registry.push((target.clone(), name, cb));
    }
}

// Everything installed at mount; torn down on unmount.
struct Mounted {
    window: Window,
    listeners: Vec<(EventTarget, &'static str, Listener)>,
    raf_id: Rc<RefCell<Option<i32>>>,
    raf_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl Mounted {
    fn teardown(self) {
        for (target, name, cb) in &self.listeners {
            let _ = target.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
        }
        if let Some(id) = self.raf_id.borrow_mut().take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Break the frame callback's self reference.
        self.raf_cb.borrow_mut().take();
    }
}

fn mount(s: Surface) -> Option<Mounted> {
    let window = web_sys::window()?;
    s.resize();

    // Redraw at most once per animation frame, and only when something changed.
    let raf_id: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
    let raf_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    {
        let s = s.clone();
        let window_loop = window.clone();
        let raf_id_loop = raf_id.clone();
        let raf_cb_loop = raf_cb.clone();
        *raf_cb.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let due = std::mem::replace(&mut *s.dirty.borrow_mut(), false);
            if due {
                s.draw();
            }
            if let Some(cb) = raf_cb_loop.borrow().as_ref() {
                if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    *raf_id_loop.borrow_mut() = Some(id);
                }
            }
        }) as Box<dyn FnMut()>));
        if let Some(cb) = raf_cb.borrow().as_ref() {
            if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                *raf_id.borrow_mut() = Some(id);
            }
        }
    }

    let mut listeners = Vec::new();
    let canvas_target: EventTarget = s.canvas.clone().into();
    let window_target: EventTarget = window.clone().into();

    {
        let s = s.clone();
        listen(&canvas_target, &mut listeners, "wheel", move |ev| {
            let Some(e) = ev.dyn_ref::<WheelEvent>() else {
                return;
            };
            let input = WheelInput {
                pointer: canvas_point(&s.canvas, e.client_x(), e.client_y()),
                delta_y: e.delta_y(),
                zoom_modifier: e.ctrl_key() || e.meta_key(),
            };
            if s.camera.borrow_mut().wheel(input) {
                e.prevent_default();
                s.request_draw();
            }
        });
    }
    {
        let s = s.clone();
        listen(&canvas_target, &mut listeners, "mousedown", move |ev| {
            let Some(e) = ev.dyn_ref::<MouseEvent>() else {
                return;
            };
            if e.button() != 0 {
                return;
            }
            s.press(canvas_point(&s.canvas, e.client_x(), e.client_y()));
        });
    }
    {
        let s = s.clone();
        listen(&window_target, &mut listeners, "mousemove", move |ev| {
            let Some(e) = ev.dyn_ref::<MouseEvent>() else {
                return;
            };
            let p = canvas_point(&s.canvas, e.client_x(), e.client_y());
            if s.move_card(p) {
                return;
            }
            if s.camera.borrow_mut().drag_move(p) {
                s.request_draw();
            }
        });
    }
    {
        let s = s.clone();
        listen(&window_target, &mut listeners, "mouseup", move |_ev| {
            if s.release_card() {
                return;
            }
            if s.camera.borrow_mut().end_drag() {
                s.request_draw();
            }
        });
    }
    {
        let s = s.clone();
        listen(&canvas_target, &mut listeners, "touchstart", move |ev| {
            let Some(e) = ev.dyn_ref::<TouchEvent>() else {
                return;
            };
            e.prevent_default();
            match touch_points(&s.canvas, &e.touches()).as_slice() {
                [only] => s.press(*only),
                // A second finger hands the gesture to the viewport.
                [_, _, ..] => {
                    s.release_card();
                }
                [] => {}
            }
        });
    }
    {
        let s = s.clone();
        listen(&canvas_target, &mut listeners, "touchmove", move |ev| {
            let Some(e) = ev.dyn_ref::<TouchEvent>() else {
                return;
            };
            e.prevent_default();
            let points = touch_points(&s.canvas, &e.touches());
            if let [only] = points.as_slice() {
                if s.move_card(*only) {
                    return;
                }
            }
            if s.camera.borrow_mut().touch_move(&points) {
                s.request_draw();
            }
        });
    }
    for name in ["touchend", "touchcancel"] {
        let s = s.clone();
        listen(&canvas_target, &mut listeners, name, move |ev| {
            let Some(e) = ev.dyn_ref::<TouchEvent>() else {
                return;
            };
            let remaining = e.touches().length() as usize;
            if remaining == 0 {
                s.release_card();
            }
            if s.camera.borrow_mut().touch_end(remaining) {
                s.request_draw();
            }
        });
    }
    {
        let s = s.clone();
        listen(&window_target, &mut listeners, "resize", move |_ev| s.resize());
    }

    log::debug!("board view mounted with {} listeners", listeners.len());
    Some(Mounted {
        window,
        listeners,
        raf_id,
        raf_cb,
    })
}

#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let camera = use_mut_ref(|| Camera::new(window_size()));
    let grid = use_mut_ref(GridLayer::default);
    let card_drag = use_mut_ref(|| None::<CardDrag>);
    let board_ref = use_mut_ref(|| props.board.clone());
    let dirty = use_mut_ref(|| true);

    // Effect: keep the latest store handle for listeners, then redraw
    {
        let board_ref = board_ref.clone();
        let current = props.board.clone();
        let dirty = dirty.clone();
        use_effect_with(props.board.version, move |_| {
            *board_ref.borrow_mut() = current;
            *dirty.borrow_mut() = true;
            || ()
        });
    }
    // Main mount effect (listeners, frame loop)
    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.clone();
        let grid = grid.clone();
        let card_drag = card_drag.clone();
        let board_ref = board_ref.clone();
        let dirty = dirty.clone();
        use_effect_with((), move |_| {
            let mounted = canvas_ref.cast::<HtmlCanvasElement>().and_then(|canvas| {
                mount(Surface {
                    canvas,
                    camera,
                    grid,
                    card_drag,
                    board: board_ref,
                    dirty,
                })
            });
            if mounted.is_none() {
                log::warn!("board canvas not ready; input disabled");
            }
            move || {
                if let Some(m) = mounted {
                    m.teardown();
                }
            }
        });
    }

    let camera_cb = |op: fn(&mut Camera, Size)| {
        let camera = camera.clone();
        let canvas_ref = canvas_ref.clone();
        let dirty = dirty.clone();
        Callback::from(move |()| {
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                return;
            };
            op(&mut camera.borrow_mut(), canvas_size(&canvas));
            *dirty.borrow_mut() = true;
        })
    };
    let zoom_in_cb = camera_cb(Camera::zoom_in_centered);
    let zoom_out_cb = camera_cb(Camera::zoom_out_centered);
    let home_cb = camera_cb(Camera::home);

    html! {<div style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#09090b;">
        <canvas ref={canvas_ref.clone()} id="board-canvas" style="display:block; position:absolute; top:0; left:0; touch-action:none;"></canvas>
        <CameraControls on_open_charsets={props.on_open_charsets.clone()} on_zoom_in={zoom_in_cb} on_zoom_out={zoom_out_cb} on_home={home_cb} />
    </div>}
}
