use gloo_timers::callback::Interval;

use crate::config;

/// Something that can call a closure once per tick until its handle is dropped.
pub trait TickSource {
    type Handle;

    fn every_tick(&self, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser ticks backed by `setInterval`. Dropping the `Interval` clears it.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalTicks;

impl TickSource for IntervalTicks {
    type Handle = Interval;

    fn every_tick(&self, tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(config::TICK_INTERVAL_MS, tick)
    }
}

/// Owns at most one running tick.
pub struct CountdownTicker<S: TickSource> {
    source: S,
    active: Option<S::Handle>,
}

impl<S: TickSource> CountdownTicker<S> {
    pub fn new(source: S) -> Self {
        Self { source, active: None }
    }

    /// Starts ticking. Returns false, leaving the running tick alone, if one is already active.
    pub fn start<F>(&mut self, tick: F) -> bool
    where
        F: FnMut() + 'static,
    {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(self.source.every_tick(Box::new(tick)));
        true
    }

    /// Stops the running tick, if any. Returns whether one was stopped.
    pub fn stop(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}
