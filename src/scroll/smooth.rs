//! Eased scroll interpolation driven from the host's animation-frame clock.
//!
//! Wheel input and programmatic jumps retarget an animation from the current animated
//! offset; each [`SmoothScroll::raf`] call advances it and notifies listeners when the
//! offset moved.

use crate::foundation::error::{ScrubError, ScrubResult};
use crate::scroll::source::{ListenerId, ScrollBus, ScrollSource};

/// Offset past which a scroll-to-top affordance is shown.
pub const SCROLL_TO_TOP_THRESHOLD: f64 = 400.0;

/// Exponential ease-out: `min(1, 1.001 - 2^(-10t))`.
pub fn expo_out(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

pub fn scroll_to_top_visible(offset: f64) -> bool {
    offset > SCROLL_TO_TOP_THRESHOLD
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmoothScrollOpts {
    /// Seconds for an animation to reach its target.
    pub duration: f64,
    /// Interpolate wheel input; when `false` wheel deltas jump immediately.
    pub smooth_wheel: bool,
    pub wheel_multiplier: f64,
}

impl Default for SmoothScrollOpts {
    fn default() -> Self {
        Self {
            duration: 1.2,
            smooth_wheel: true,
            wheel_multiplier: 1.0,
        }
    }
}

impl SmoothScrollOpts {
    pub fn validate(&self) -> ScrubResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ScrubError::validation(
                "smooth scroll duration must be finite and > 0",
            ));
        }
        if !self.wheel_multiplier.is_finite() {
            return Err(ScrubError::validation(
                "smooth scroll wheel_multiplier must be finite",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
}

impl Tween {
    fn progress(&self, now: f64) -> f64 {
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    fn sample(&self, now: f64) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * expo_out(t)
    }
}

/// Smooth-scroll driver. Times are in seconds on the host clock.
#[derive(Debug)]
pub struct SmoothScroll {
    opts: SmoothScrollOpts,
    animated: f64,
    target: f64,
    limit: f64,
    tween: Option<Tween>,
    bus: ScrollBus,
    destroyed: bool,
}

impl SmoothScroll {
    /// `limit` is the maximum scroll offset (document height minus viewport height).
    pub fn new(opts: SmoothScrollOpts, limit: f64) -> ScrubResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            animated: 0.0,
            target: 0.0,
            limit: limit.max(0.0),
            tween: None,
            bus: ScrollBus::new(),
            destroyed: false,
        })
    }

    pub fn opts(&self) -> &SmoothScrollOpts {
        &self.opts
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Update the scroll limit, e.g. after a document resize. Pulls the offset back in range.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.target = self.target.min(self.limit);
        if self.animated > self.limit {
            self.animated = self.limit;
            self.tween = None;
            self.bus.emit(self.animated);
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Apply a wheel delta (pixels, positive scrolls down).
    pub fn wheel(&mut self, delta: f64, now: f64) {
        if self.destroyed || !delta.is_finite() {
            return;
        }
        let to = self.target + delta * self.opts.wheel_multiplier;
        if self.opts.smooth_wheel {
            self.animate_to(to, self.opts.duration, now);
        } else {
            self.jump_to(to);
        }
    }

    /// Animate to `target`. `duration` of `None` uses the configured one; `Some(0.0)` jumps.
    pub fn scroll_to(&mut self, target: f64, duration: Option<f64>, now: f64) {
        if self.destroyed || !target.is_finite() {
            return;
        }
        match duration.unwrap_or(self.opts.duration) {
            d if d > 0.0 && d.is_finite() => self.animate_to(target, d, now),
            _ => self.jump_to(target),
        }
    }

    pub fn scroll_to_top(&mut self, now: f64) {
        self.scroll_to(0.0, None, now);
    }

    /// Advance the animation to `now`. Returns `true` when the offset changed.
    pub fn raf(&mut self, now: f64) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(tween) = self.tween else {
            return false;
        };
        let next = tween.sample(now);
        if tween.progress(now) >= 1.0 {
            self.tween = None;
        }
        if next == self.animated {
            return false;
        }
        self.animated = next;
        self.bus.emit(self.animated);
        true
    }

    /// Register a scroll listener. Ignored once destroyed.
    pub fn on(&self, listener: impl FnMut(f64) + 'static) -> Option<ListenerId> {
        (!self.destroyed).then(|| self.bus.on(listener))
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.bus.off(id)
    }

    /// Stop animating and drop every listener. Later input is ignored.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.tween = None;
        self.bus.clear();
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(0.0, self.limit)
    }

    fn animate_to(&mut self, to: f64, duration: f64, now: f64) {
        let to = self.clamp(to);
        self.target = to;
        if to == self.animated {
            self.tween = None;
            return;
        }
        self.tween = Some(Tween {
            from: self.animated,
            to,
            start: now,
            duration,
        });
    }

    fn jump_to(&mut self, to: f64) {
        let to = self.clamp(to);
        self.target = to;
        self.tween = None;
        if to != self.animated {
            self.animated = to;
            self.bus.emit(self.animated);
        }
    }
}

impl ScrollSource for SmoothScroll {
    fn scroll(&self) -> f64 {
        self.animated
    }

    fn bus(&self) -> &ScrollBus {
        &self.bus
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/smooth.rs"]
mod tests;
