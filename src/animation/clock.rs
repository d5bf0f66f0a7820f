use crate::traits::Animation;
use instant::Instant;
use std::cell::Cell;

/// Supplies monotonic elapsed time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `instant`, works on native and wasm targets
#[derive(Debug, Clone)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-stepped clock for tests and offline rendering
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms.max(0.0));
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Turns clock readings into frame deltas and ticks an animation with them
pub struct FrameDriver<C: Clock> {
    clock: C,
    last_frame_ms: Option<f64>,
    max_delta_ms: Option<f64>,
    frames: u64,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C, max_delta_ms: Option<f64>) -> Self {
        Self {
            clock,
            last_frame_ms: None,
            max_delta_ms,
            frames: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time since the previous frame, capped. The first frame has a delta of 0.
    pub fn next_delta(&mut self) -> f64 {
        let now = self.clock.now_ms();
        let delta = match self.last_frame_ms {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now);
        self.frames += 1;

        match self.max_delta_ms {
            Some(cap) if delta > cap => {
                log::debug!("frame delta {delta:.1}ms capped to {cap:.1}ms");
                cap
            }
            _ => delta,
        }
    }

    /// Run one frame against `target`
    pub fn tick<A: Animation + ?Sized>(&mut self, target: &mut A) -> bool {
        let delta = self.next_delta();
        target.advance(delta)
    }
}
