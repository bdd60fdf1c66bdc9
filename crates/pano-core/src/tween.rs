use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseInOut,
}

impl Easing {
    fn apply(self, x: f32) -> f32 {
        match self {
            Easing::Linear => x,
            Easing::EaseInOut => x * x * (3.0 - 2.0 * x),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenStep {
    Running(f32),
    Finished(f32),
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    token: CancelToken,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_sec: f32, token: CancelToken) -> Self {
        Self {
            from,
            to,
            duration: duration_sec.max(0.0),
            elapsed: 0.0,
            easing: Easing::Linear,
            token,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn value(&self) -> f32 {
        let x = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        };
        self.from + (self.to - self.from) * self.easing.apply(x)
    }

    pub fn advance(&mut self, dt_sec: f32) -> TweenStep {
        if self.token.is_cancelled() {
            return TweenStep::Cancelled;
        }
        self.elapsed += dt_sec.max(0.0);
        if self.elapsed >= self.duration {
            TweenStep::Finished(self.to)
        } else {
            TweenStep::Running(self.value())
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}
