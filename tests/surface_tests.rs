// Host-side tests for canvas sizing and claim bookkeeping.

#![allow(dead_code)]
mod surface {
    include!("../src/surface.rs");
}

use surface::*;

#[test]
fn backing_size_scales_by_pixel_ratio() {
    assert_eq!(backing_size(800.0, 450.0, 2.0), Some((1600, 900)));
    assert_eq!(backing_size(800.0, 450.0, 1.0), Some((800, 450)));
    // bogus ratios fall back to 1
    assert_eq!(backing_size(300.0, 200.0, 0.0), Some((300, 200)));
    assert_eq!(backing_size(300.0, 200.0, f64::NAN), Some((300, 200)));
}

#[test]
fn hidden_canvas_keeps_its_backing_size() {
    assert_eq!(backing_size(0.0, 450.0, 2.0), None);
    assert_eq!(backing_size(800.0, 0.0, 1.0), None);
}

#[test]
fn container_resize_changes_backing_size() {
    let before = backing_size(640.0, 480.0, 1.5);
    let after = backing_size(1024.0, 480.0, 1.5);
    assert_ne!(before, after);
    assert_eq!(after, Some((1536, 720)));
}

#[test]
fn dispose_without_gpu_init_releases_immediately() {
    let mut claim = CanvasClaim::default();
    assert!(claim.dispose());
    assert!(!claim.dispose());
}

#[test]
fn claim_outlives_dispose_while_gpu_init_is_in_flight() {
    let mut claim = CanvasClaim::default();
    claim.gpu_init_started();
    assert!(!claim.dispose());
    assert!(claim.gpu_init_pending());
    assert!(claim.gpu_init_settled());
    assert!(!claim.gpu_init_settled());
}

#[test]
fn gpu_init_finishing_on_a_live_viewer_keeps_the_claim() {
    let mut claim = CanvasClaim::default();
    claim.gpu_init_started();
    assert!(!claim.gpu_init_settled());
    assert!(claim.dispose());
}
