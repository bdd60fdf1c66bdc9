/// Backing-store size for a canvas laid out at `css_w`×`css_h` CSS pixels.
/// `None` while the canvas has no layout size (hidden or detached).
pub fn backing_size(css_w: f64, css_h: f64, dpr: f64) -> Option<(u32, u32)> {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let w = (css_w * dpr) as u32;
    let h = (css_h * dpr) as u32;
    (w > 0 && h > 0).then_some((w, h))
}

/// A viewer's hold on its canvas. Released once the viewer is disposed and no
/// GPU initialisation is still creating a surface on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanvasClaim {
    disposed: bool,
    gpu_init_pending: bool,
    released: bool,
}

impl CanvasClaim {
    pub fn gpu_init_started(&mut self) {
        self.gpu_init_pending = true;
    }

    pub fn gpu_init_pending(&self) -> bool {
        self.gpu_init_pending
    }

    /// Returns true if the caller should release the canvas now.
    pub fn dispose(&mut self) -> bool {
        self.disposed = true;
        self.try_release()
    }

    /// Returns true if the caller should release the canvas now.
    pub fn gpu_init_settled(&mut self) -> bool {
        self.gpu_init_pending = false;
        self.try_release()
    }

    fn try_release(&mut self) -> bool {
        if self.released || !self.disposed || self.gpu_init_pending {
            return false;
        }
        self.released = true;
        true
    }
}
