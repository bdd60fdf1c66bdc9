// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn press_and_release_in_place_is_a_click() {
    let mut t = PointerTracker::default();
    t.down(Vec2::new(100.0, 50.0));
    assert!(t.is_down());
    let r = t.up(Vec2::new(102.0, 51.0), 6.0);
    assert_eq!(r, PointerRelease::Click(Vec2::new(102.0, 51.0)));
    assert!(!t.is_down());
}

#[test]
fn travel_beyond_tolerance_is_a_drag() {
    let mut t = PointerTracker::default();
    t.down(Vec2::ZERO);
    t.moved(Vec2::new(20.0, 0.0));
    // back where it started, but it travelled
    let r = t.up(Vec2::ZERO, 6.0);
    assert_eq!(r, PointerRelease::DragEnd);
}

#[test]
fn travel_accumulates_across_moves() {
    let mut t = PointerTracker::default();
    t.down(Vec2::ZERO);
    assert_eq!(t.moved(Vec2::new(3.0, 4.0)), 5.0);
    assert_eq!(t.moved(Vec2::new(3.0, 0.0)), 9.0);
}

#[test]
fn moves_without_press_do_not_count() {
    let mut t = PointerTracker::default();
    assert_eq!(t.moved(Vec2::new(50.0, 50.0)), 0.0);
    t.down(Vec2::new(50.0, 50.0));
    assert!(matches!(
        t.up(Vec2::new(50.0, 50.0), 6.0),
        PointerRelease::Click(_)
    ));
}

#[test]
fn release_without_press_is_stray() {
    let mut t = PointerTracker::default();
    assert_eq!(t.up(Vec2::ONE, 6.0), PointerRelease::Stray);
}

#[test]
fn cancel_drops_the_gesture() {
    let mut t = PointerTracker::default();
    t.down(Vec2::ZERO);
    t.cancel();
    assert!(!t.is_down());
    assert_eq!(t.up(Vec2::ZERO, 6.0), PointerRelease::Stray);
}

#[test]
fn client_position_scales_to_backing_store() {
    // 400x300 CSS box at (10, 20) backed by an 800x600 canvas (dpr 2)
    let px = client_to_canvas_px(
        Vec2::new(210.0, 170.0),
        Vec2::new(10.0, 20.0),
        Vec2::new(400.0, 300.0),
        Vec2::new(800.0, 600.0),
    );
    assert_eq!(px, Vec2::new(400.0, 300.0));
}

#[test]
fn zero_sized_rect_maps_to_origin() {
    let px = client_to_canvas_px(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ZERO, Vec2::ONE);
    assert_eq!(px, Vec2::ZERO);
}
