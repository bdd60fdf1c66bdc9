/// Browser-side interaction tuning.
///
/// Engine tuning (sphere, camera, fades, icon limits) lives in
/// `pano_core::constants`; these only concern DOM input and the frame loop.
// Pointer travel (device px) below which a press/release counts as a click
pub const CLICK_TOLERANCE_PX: f32 = 6.0;

// Frame delta clamp so a backgrounded tab does not skip a whole fade
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Attribute marking a canvas as owned by a live viewer
pub const CANVAS_ATTACHED_ATTR: &str = "data-pano-attached";

// Info panel elements the host page may provide
pub const INFO_PANEL_ID: &str = "pano-info";
pub const INFO_TITLE_ID: &str = "pano-info-title";
pub const INFO_BODY_ID: &str = "pano-info-body";
pub const HIDDEN_CLASS: &str = "hidden";

// Cursor feedback over hotspots
pub const CURSOR_HOTSPOT: &str = "pointer";
pub const CURSOR_DRAG: &str = "grabbing";
pub const CURSOR_DEFAULT: &str = "grab";
pub const CURSOR_EDIT: &str = "crosshair";
