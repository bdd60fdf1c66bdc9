use crate::config::ViewerConfig;
use crate::error::TourError;
use crate::model::Tour;
use crate::tween::{CancelToken, Easing, Tween, TweenStep};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeTimings {
    pub fade_out_sec: f32,
    pub settle_sec: f32,
    pub fade_in_sec: f32,
}

impl From<&ViewerConfig> for FadeTimings {
    fn from(c: &ViewerConfig) -> Self {
        Self {
            fade_out_sec: c.fade_out_sec,
            settle_sec: c.settle_sec,
            fade_in_sec: c.fade_in_sec,
        }
    }
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Transitioning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigateOutcome {
    Started,
    /// A transition is already running; the request was dropped.
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    /// Fade-out completed: the caller must make `0` the current scene now.
    SwapScene(String),
    Finished(String),
    Cancelled(String),
}

#[derive(Debug)]
enum Phase {
    FadeOut(Tween),
    Settle { remaining: f32 },
    FadeIn(Tween),
}

#[derive(Debug)]
struct Transition {
    target: String,
    phase: Phase,
    token: CancelToken,
}

/// Scene-to-scene transitions: fade out, swap, settle, fade in. At most one
/// runs at a time; requests made meanwhile are ignored.
#[derive(Debug)]
pub struct Navigator {
    transition: Option<Transition>,
    opacity: f32,
    timings: FadeTimings,
}

impl Navigator {
    pub fn new(timings: FadeTimings) -> Self {
        Self {
            transition: None,
            opacity: 1.0,
            timings,
        }
    }

    pub fn state(&self) -> NavState {
        if self.transition.is_some() {
            NavState::Transitioning
        } else {
            NavState::Idle
        }
    }

    /// Viewport opacity in 0..=1 for the renderer's fade uniform.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn target(&self) -> Option<&str> {
        self.transition.as_ref().map(|t| t.target.as_str())
    }

    /// Token of the running transition; cancelling it interrupts the fade on
    /// the next tick.
    pub fn token(&self) -> Option<CancelToken> {
        self.transition.as_ref().map(|t| t.token.clone())
    }

    pub fn navigate(&mut self, target: &str, tour: &Tour) -> Result<NavigateOutcome, TourError> {
        if let Some(t) = &self.transition {
            log::debug!("[nav] ignoring navigate({}) while heading to {}", target, t.target);
            return Ok(NavigateOutcome::Ignored);
        }
        if !tour.contains_scene(target) {
            log::error!("[nav] broken link: scene {} does not exist", target);
            return Err(TourError::UnknownScene(target.to_string()));
        }
        let token = CancelToken::new();
        let fade = Tween::new(1.0, 0.0, self.timings.fade_out_sec, token.clone())
            .with_easing(Easing::EaseInOut);
        self.transition = Some(Transition {
            target: target.to_string(),
            phase: Phase::FadeOut(fade),
            token,
        });
        log::info!("[nav] transition to {} started", target);
        Ok(NavigateOutcome::Started)
    }

    /// Stop the running transition right away. A swap that has not been
    /// emitted yet will not happen.
    pub fn cancel(&mut self) -> Option<NavEvent> {
        let t = self.transition.take()?;
        t.token.cancel();
        self.opacity = 1.0;
        log::info!("[nav] transition to {} cancelled", t.target);
        Some(NavEvent::Cancelled(t.target))
    }

    /// Advance the running transition by `dt_sec`. Each call moves through at
    /// most one phase boundary.
    pub fn tick(&mut self, dt_sec: f32) -> Option<NavEvent> {
        let t = self.transition.as_mut()?;
        if t.token.is_cancelled() {
            return self.cancel();
        }
        match &mut t.phase {
            Phase::FadeOut(tween) => match tween.advance(dt_sec) {
                TweenStep::Running(v) => {
                    self.opacity = v;
                    None
                }
                TweenStep::Finished(v) => {
                    self.opacity = v;
                    t.phase = Phase::Settle {
                        remaining: self.timings.settle_sec,
                    };
                    Some(NavEvent::SwapScene(t.target.clone()))
                }
                TweenStep::Cancelled => self.cancel(),
            },
            Phase::Settle { remaining } => {
                *remaining -= dt_sec.max(0.0);
                if *remaining <= 0.0 {
                    let fade = Tween::new(0.0, 1.0, self.timings.fade_in_sec, t.token.clone())
                        .with_easing(Easing::EaseInOut);
                    t.phase = Phase::FadeIn(fade);
                }
                None
            }
            Phase::FadeIn(tween) => match tween.advance(dt_sec) {
                TweenStep::Running(v) => {
                    self.opacity = v;
                    None
                }
                TweenStep::Finished(v) => {
                    self.opacity = v;
                    let done = self.transition.take().map(|t| t.target)?;
                    log::info!("[nav] transition to {} finished", done);
                    Some(NavEvent::Finished(done))
                }
                TweenStep::Cancelled => self.cancel(),
            },
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(FadeTimings::default())
    }
}
