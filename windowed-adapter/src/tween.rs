use windowed::{Engine, RenderBridge};

/// A small tween over scroll offsets for adapter-driven smooth scrolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: u64,
    pub to: u64,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: u64, to: u64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    pub fn sample(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0);
        let eased = self.easing.sample(t);

        let from = self.from as f32;
        let to = self.to as f32;
        let v = from + (to - from) * eased;
        v.max(0.0) as u64
    }

    /// Redirects an in-flight tween towards `new_to`, starting from the
    /// currently sampled position so the motion stays continuous.
    pub fn retarget(&mut self, now_ms: u64, new_to: u64, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    SmoothStep,
    EaseInOutCubic,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}

/// Drives an [`Engine`] through a tween.
///
/// Interpolated offsets are written to the bridge and fed back as ordinary
/// scroll signals, so the engine expands and evicts along the way exactly as
/// it would for user scrolling. Call [`TweenScroller::tick`] once per frame
/// and pump the engine afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct TweenScroller {
    tween: Option<Tween>,
}

impl TweenScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Cancels the active tween, leaving the offset wherever it is. Call this
    /// when the user takes over scrolling.
    pub fn cancel(&mut self) {
        self.tween = None;
    }

    pub fn start(&mut self, from: u64, to: u64, now_ms: u64, duration_ms: u64, easing: Easing) {
        self.tween = Some(Tween::new(from, to, now_ms, duration_ms, easing));
    }

    /// Redirects the active tween, or starts a fresh one from `fallback_from`
    /// when none is running.
    pub fn retarget(
        &mut self,
        fallback_from: u64,
        to: u64,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) {
        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, to, duration_ms),
            None => self.start(fallback_from, to, now_ms, duration_ms, easing),
        }
    }

    /// Advances the tween and feeds the sampled offset into the engine.
    /// Returns the offset while animating, `None` once finished.
    pub fn tick<T, B: RenderBridge<T>>(
        &mut self,
        engine: &mut Engine<T, B>,
        now_ms: u64,
    ) -> Option<u64> {
        let tween = self.tween?;
        let offset = tween.sample(now_ms);
        engine.bridge_mut().set_scroll_offset(offset);
        engine.on_scroll(offset);
        if tween.is_done(now_ms) {
            self.tween = None;
        }
        Some(offset)
    }
}
