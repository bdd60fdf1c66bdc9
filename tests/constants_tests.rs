// Host-side tests for web frontend constants.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn frame_and_click_limits_are_sane() {
    assert!(CLICK_TOLERANCE_PX > 0.0 && CLICK_TOLERANCE_PX < 20.0);
    // must not swallow a whole fade phase in one frame
    assert!(MAX_FRAME_DT_SEC > 0.0);
    assert!(MAX_FRAME_DT_SEC < pano_core::constants::FADE_OUT_SEC);
}

#[test]
fn attach_marker_is_a_data_attribute() {
    assert!(CANVAS_ATTACHED_ATTR.starts_with("data-"));
}

#[test]
fn info_panel_ids_are_distinct() {
    assert_ne!(INFO_PANEL_ID, INFO_TITLE_ID);
    assert_ne!(INFO_PANEL_ID, INFO_BODY_ID);
    assert_ne!(INFO_TITLE_ID, INFO_BODY_ID);
}

#[test]
fn hotspot_cursor_differs_from_idle() {
    assert_ne!(CURSOR_HOTSPOT, CURSOR_DEFAULT);
    assert_ne!(CURSOR_EDIT, CURSOR_DEFAULT);
}
