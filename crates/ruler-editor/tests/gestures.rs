//! Integration tests: pointer gestures driven through the overlay controller
//! (ruler-editor ↔ ruler-render ↔ ruler-core).
//!
//! Targets are classified from the same tag paths the page reports, so the
//! whole route from a raw press to a registry mutation is exercised.

use pretty_assertions::assert_eq;
use ruler_core::{NudgeDir, OverlayConfig, Rect, ResizeDir, ShapeId, Viewport};
use ruler_editor::gesture::DocumentListeners;
use ruler_editor::{InputEvent, MemoryStore, Modifiers, OverlayController};
use ruler_render::{HitTarget, classify_path};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct CountingListeners {
    attached: Cell<u32>,
    detached: Cell<u32>,
}

impl DocumentListeners for CountingListeners {
    fn attach(&self) {
        self.attached.set(self.attached.get() + 1);
    }
    fn detach(&self) {
        self.detached.set(self.detached.get() + 1);
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mount(listeners: Rc<CountingListeners>) -> OverlayController {
    init_logs();
    OverlayController::mount(
        Viewport::default(),
        Rc::new(MemoryStore::new()),
        listeners,
        OverlayConfig::default(),
    )
}

fn only_shape(ov: &OverlayController) -> (ShapeId, Rect, bool) {
    let shapes: Vec<_> = ov.registry().iter().collect();
    assert_eq!(shapes.len(), 1, "expected exactly one shape");
    (shapes[0].id, shapes[0].rect, shapes[0].active)
}

fn drag_on(ov: &mut OverlayController, target: HitTarget, from: (f32, f32), to: (f32, f32), t: f64) {
    ov.handle_pointer(&InputEvent::down(from.0, from.1, 1, t), target);
    ov.handle_pointer(&InputEvent::moved(to.0, to.1, 1), HitTarget::Other);
    ov.handle_pointer(&InputEvent::up(to.0, to.1, 1), HitTarget::Other);
}

fn double_tap(ov: &mut OverlayController, target: HitTarget, at: (f32, f32), t: f64) {
    for dt in [0.0, 120.0] {
        ov.handle_pointer(&InputEvent::down(at.0, at.1, 1, t + dt), target);
        ov.handle_pointer(&InputEvent::up(at.0, at.1, 1), HitTarget::Other);
    }
}

// ─── Drawing ─────────────────────────────────────────────────────────────

#[test]
fn tiny_draw_is_discarded_then_real_draw_commits() {
    let mut ov = mount(Rc::default());
    let canvas = classify_path(["canvas"]);

    drag_on(&mut ov, canvas, (100.0, 100.0), (103.0, 102.0), 0.0);
    assert!(ov.registry().is_empty());

    drag_on(&mut ov, canvas, (100.0, 100.0), (150.0, 140.0), 1000.0);
    let (_, rect, active) = only_shape(&ov);
    assert_eq!(rect, Rect::new(100.0, 100.0, 50.0, 40.0));
    assert!(!active);
}

#[test]
fn cancel_mid_draw_discards_and_releases_tracking() {
    let listeners = Rc::new(CountingListeners::default());
    let mut ov = mount(listeners.clone());

    ov.handle_pointer(&InputEvent::down(10.0, 10.0, 3, 0.0), HitTarget::EmptyCanvas);
    ov.handle_pointer(&InputEvent::moved(12.0, 40.0, 3), HitTarget::Other);
    assert_eq!(listeners.attached.get(), 1);

    ov.handle_pointer(&InputEvent::PointerCancel { pointer_id: 3 }, HitTarget::Other);
    assert!(ov.registry().is_empty());
    assert!(ov.editor().is_idle());
    assert_eq!(listeners.detached.get(), 1);
}

#[test]
fn cancel_keeps_a_large_enough_draw() {
    let mut ov = mount(Rc::default());
    ov.handle_pointer(&InputEvent::down(10.0, 10.0, 3, 0.0), HitTarget::EmptyCanvas);
    ov.handle_pointer(&InputEvent::moved(30.0, 30.0, 3), HitTarget::Other);
    ov.handle_pointer(&InputEvent::PointerCancel { pointer_id: 3 }, HitTarget::Other);
    let (_, rect, _) = only_shape(&ov);
    assert_eq!(rect, Rect::new(10.0, 10.0, 20.0, 20.0));
}

// ─── Select, resize, drag, nudge ─────────────────────────────────────────

#[test]
fn full_editing_scenario() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (100.0, 100.0), (150.0, 140.0), 0.0);
    let (id, _, _) = only_shape(&ov);
    let tag = id.to_string();
    let body = classify_path(["label", tag.as_str(), "canvas"]);

    double_tap(&mut ov, body, (120.0, 120.0), 1000.0);
    assert_eq!(ov.registry().active_id(), Some(id));

    let se = classify_path(["handle-se", tag.as_str(), "canvas"]);
    drag_on(&mut ov, se, (150.0, 140.0), (160.0, 150.0), 2000.0);
    let (_, rect, active) = only_shape(&ov);
    assert_eq!(rect, Rect::new(100.0, 100.0, 60.0, 50.0));
    assert!(active);

    drag_on(&mut ov, body, (130.0, 120.0), (110.0, 125.0), 3000.0);
    let (_, rect, active) = only_shape(&ov);
    assert_eq!(rect, Rect::new(80.0, 105.0, 60.0, 50.0));
    assert!(active);

    assert!(ov.handle_key("ArrowUp", Modifiers::NONE));
    let (_, rect, _) = only_shape(&ov);
    assert_eq!(rect, Rect::new(80.0, 104.0, 60.0, 51.0));

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    assert!(ov.handle_key("ArrowUp", ctrl));
    let (_, rect, _) = only_shape(&ov);
    assert_eq!(rect, Rect::new(80.0, 104.0, 60.0, 50.0));
}

#[test]
fn resize_from_west_floors_and_pins_right_edge() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (100.0, 100.0), (150.0, 140.0), 0.0);
    let (id, _, _) = only_shape(&ov);
    ov.editor_mut().activate(id);

    let w = HitTarget::Handle {
        shape: id,
        dir: ResizeDir::W,
    };
    drag_on(&mut ov, w, (100.0, 120.0), (400.0, 120.0), 1000.0);
    let (_, rect, _) = only_shape(&ov);
    assert_eq!(rect, Rect::new(145.0, 100.0, 5.0, 40.0));
}

#[test]
fn drag_is_not_clamped_to_viewport() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (10.0, 10.0), (60.0, 60.0), 0.0);
    let (id, _, _) = only_shape(&ov);
    ov.editor_mut().activate(id);

    drag_on(&mut ov, HitTarget::ShapeBody(id), (20.0, 20.0), (-100.0, -50.0), 1000.0);
    let (_, rect, _) = only_shape(&ov);
    assert_eq!((rect.x, rect.y), (-110.0, -60.0));
}

#[test]
fn shrink_nudge_stops_at_min_size() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (0.0, 0.0), (7.0, 20.0), 0.0);
    let (id, _, _) = only_shape(&ov);
    ov.editor_mut().activate(id);

    let cmd = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    assert!(ov.handle_key("ArrowRight", cmd));
    assert!(ov.handle_key("ArrowRight", cmd));
    assert!(!ov.handle_key("ArrowRight", cmd));
    let (_, rect, _) = only_shape(&ov);
    assert_eq!(rect, Rect::new(2.0, 0.0, 5.0, 20.0));
}

#[test]
fn nudge_without_active_shape_does_nothing() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (0.0, 0.0), (20.0, 20.0), 0.0);
    assert!(!ov.editor_mut().nudge(NudgeDir::Down, true));
    assert!(!ov.handle_key("ArrowDown", Modifiers::NONE));
}

// ─── Selection invariants ────────────────────────────────────────────────

#[test]
fn at_most_one_shape_is_active() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (0.0, 0.0), (20.0, 20.0), 0.0);
    drag_on(&mut ov, HitTarget::EmptyCanvas, (100.0, 0.0), (120.0, 20.0), 1000.0);
    let ids: Vec<_> = ov.registry().iter().map(|s| s.id).collect();

    double_tap(&mut ov, HitTarget::ShapeBody(ids[0]), (10.0, 10.0), 2000.0);
    double_tap(&mut ov, HitTarget::ShapeBody(ids[1]), (110.0, 10.0), 3000.0);
    assert_eq!(ov.registry().iter().filter(|s| s.active).count(), 1);
    assert_eq!(ov.registry().active_id(), Some(ids[1]));

    double_tap(&mut ov, HitTarget::ShapeBody(ids[1]), (110.0, 10.0), 4000.0);
    assert_eq!(ov.registry().iter().filter(|s| s.active).count(), 0);
}

#[test]
fn toolbar_press_deactivates_and_never_draws() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (0.0, 0.0), (20.0, 20.0), 0.0);
    let (id, _, _) = only_shape(&ov);
    ov.editor_mut().activate(id);

    let toolbar = classify_path(["button", "toolbar", "canvas"]);
    ov.handle_pointer(&InputEvent::down(15.0, 15.0, 1, 1000.0), toolbar);
    assert_eq!(ov.registry().active_id(), None);
    assert_eq!(ov.registry().len(), 1);
    assert!(ov.editor().is_idle());
}

#[test]
fn toolbar_cannot_be_grabbed_mid_gesture() {
    let listeners = Rc::new(CountingListeners::default());
    let mut ov = mount(listeners.clone());
    ov.handle_pointer(&InputEvent::down(10.0, 10.0, 1, 0.0), HitTarget::EmptyCanvas);
    ov.handle_pointer(&InputEvent::moved(40.0, 40.0, 1), HitTarget::Other);

    assert!(!ov.toolbar_pointer_down(15.0, 15.0, 0, 2, (360.0, 57.0)));
    assert!(!ov.is_toolbar_dragging());
    assert_eq!(ov.toolbar_position(), (10.0, 10.0));
    assert_eq!(listeners.attached.get(), 1);

    ov.handle_pointer(&InputEvent::up(40.0, 40.0, 1), HitTarget::Other);
    let (_, rect, _) = only_shape(&ov);
    assert_eq!(rect, Rect::new(10.0, 10.0, 30.0, 30.0));
}

#[test]
fn shape_presses_are_dropped_while_toolbar_is_held() {
    let mut ov = mount(Rc::default());
    drag_on(&mut ov, HitTarget::EmptyCanvas, (200.0, 200.0), (260.0, 250.0), 0.0);
    let (id, _, _) = only_shape(&ov);

    assert!(ov.toolbar_pointer_down(20.0, 20.0, 0, 1, (360.0, 57.0)));
    assert!(!ov.handle_pointer(&InputEvent::down(100.0, 100.0, 2, 1000.0), HitTarget::EmptyCanvas));
    for t in [2000.0, 2120.0] {
        ov.handle_pointer(&InputEvent::down(220.0, 220.0, 2, t), HitTarget::ShapeBody(id));
        ov.handle_pointer(&InputEvent::up(220.0, 220.0, 2), HitTarget::Other);
    }

    assert!(ov.is_toolbar_dragging());
    assert!(ov.editor().is_idle());
    assert_eq!(ov.registry().len(), 1);
    assert_eq!(ov.registry().active_id(), None);

    ov.handle_pointer(&InputEvent::up(20.0, 20.0, 1), HitTarget::Other);
    assert!(!ov.is_toolbar_dragging());
}

// ─── Tracking ────────────────────────────────────────────────────────────

#[test]
fn tracking_released_exactly_once_per_gesture() {
    let listeners = Rc::new(CountingListeners::default());
    let mut ov = mount(listeners.clone());

    drag_on(&mut ov, HitTarget::EmptyCanvas, (0.0, 0.0), (20.0, 20.0), 0.0);
    let (id, _, _) = only_shape(&ov);
    ov.editor_mut().activate(id);
    drag_on(&mut ov, HitTarget::ShapeBody(id), (5.0, 5.0), (15.0, 15.0), 1000.0);
    let se = HitTarget::Handle {
        shape: id,
        dir: ResizeDir::Se,
    };
    drag_on(&mut ov, se, (30.0, 30.0), (40.0, 40.0), 2000.0);

    // A stray second up must not release anything again.
    ov.handle_pointer(&InputEvent::up(40.0, 40.0, 1), HitTarget::Other);

    assert_eq!(listeners.attached.get(), 3);
    assert_eq!(listeners.detached.get(), 3);
}

#[test]
fn unmount_mid_gesture_releases_tracking() {
    let listeners = Rc::new(CountingListeners::default());
    let mut ov = mount(listeners.clone());
    ov.handle_pointer(&InputEvent::down(0.0, 0.0, 1, 0.0), HitTarget::EmptyCanvas);
    assert_eq!(listeners.detached.get(), 0);

    drop(ov);
    assert_eq!(listeners.attached.get(), 1);
    assert_eq!(listeners.detached.get(), 1);
}
