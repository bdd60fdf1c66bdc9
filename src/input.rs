use glam::Vec2;
use web_sys as web;

/// Outcome of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerRelease {
    /// Press and release close together: treat as a click at this position.
    Click(Vec2),
    /// The pointer travelled: the gesture was a look-around drag.
    DragEnd,
    /// Release without a matching press (e.g. pressed outside the canvas).
    Stray,
}

/// Tells clicks apart from drags by accumulated pointer travel.
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerTracker {
    down_at: Option<Vec2>,
    last: Vec2,
    travelled: f32,
}

impl PointerTracker {
    pub fn down(&mut self, at: Vec2) {
        self.down_at = Some(at);
        self.last = at;
        self.travelled = 0.0;
    }

    pub fn is_down(&self) -> bool {
        self.down_at.is_some()
    }

    /// Record a move; returns total travel since the press.
    pub fn moved(&mut self, at: Vec2) -> f32 {
        if self.down_at.is_some() {
            self.travelled += at.distance(self.last);
            self.last = at;
        }
        self.travelled
    }

    pub fn up(&mut self, at: Vec2, tolerance_px: f32) -> PointerRelease {
        let Some(_) = self.down_at.take() else {
            return PointerRelease::Stray;
        };
        let travelled = self.travelled + at.distance(self.last);
        self.travelled = 0.0;
        if travelled <= tolerance_px {
            PointerRelease::Click(at)
        } else {
            PointerRelease::DragEnd
        }
    }

    pub fn cancel(&mut self) {
        self.down_at = None;
        self.travelled = 0.0;
    }
}

/// Map a CSS-pixel client position into canvas backing-store pixels.
#[inline]
pub fn client_to_canvas_px(
    client: Vec2,
    rect_origin: Vec2,
    rect_size: Vec2,
    backing: Vec2,
) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    (client - rect_origin) / rect_size * backing
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    client_to_canvas_px(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}
