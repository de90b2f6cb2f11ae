//! Wiring between scroll events, the countdown tick and the reveal of the
//! call to action.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use yew::Callback;

use crate::hero::countdown::{time_left, Clock, CountdownState};
use crate::hero::engine::{
    EdgeCallback, ScrollEngine, ScrollRegion, SnapSpec, TimelineSpec, TriggerCallbacks, TriggerSpec,
};
use crate::hero::ticker::{CountdownTicker, TickSource};
use crate::hero::timeline::{CompiledTimeline, Layer, Length, Position, PropsPatch, Timeline};

pub const LABEL_START: &str = "start";
pub const LABEL_MID: &str = "mid";
pub const LABEL_END: &str = "end";

/// Image and countdown fly in, settle at "mid", shrink into place at "end",
/// then `on_end` runs.
pub fn hero_timeline<F>(on_end: F) -> CompiledTimeline
where
    F: Fn() + 'static,
{
    Timeline::new()
        .add_label(LABEL_START)
        .from_to(
            Layer::Image,
            PropsPatch::new().scale(1.5).rotate(-20.0).y(Length::px(100.0)).opacity(0.0),
            PropsPatch::new().scale(1.2).rotate(0.0).y(Length::px(50.0)).opacity(1.0),
            1.0,
            Position::Sequential,
        )
        .from_to(
            Layer::Timer,
            PropsPatch::new().scale(3.0).rotate(-20.0).y(Length::px(100.0)).opacity(0.0),
            PropsPatch::new().scale(2.0).rotate(0.0).y(Length::px(50.0)).opacity(1.0),
            1.0,
            Position::WithPrevious,
        )
        .add_label(LABEL_MID)
        .to(
            Layer::Image,
            PropsPatch::new().scale(0.8).rotate(0.0).y(Length::px(0.0)).opacity(1.0),
            1.0,
            Position::Sequential,
        )
        .to(
            Layer::Timer,
            PropsPatch::new()
                .scale(1.5)
                .rotate(0.0)
                .y(Length::percent(50.0))
                .x_percent(-50.0)
                .opacity(1.0),
            1.0,
            Position::WithPrevious,
        )
        .add_label(LABEL_END)
        .call(on_end)
        .compile()
}

/// One-way gate for the call to action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealFlag {
    #[default]
    Hidden,
    Revealed,
}

impl RevealFlag {
    /// Returns true only on the Hidden -> Revealed transition.
    pub fn reveal(&mut self) -> bool {
        match self {
            RevealFlag::Hidden => {
                *self = RevealFlag::Revealed;
                true
            }
            RevealFlag::Revealed => false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        *self == RevealFlag::Revealed
    }
}

/// Publishes the countdown to the view, always from the current clock.
#[derive(Clone)]
pub struct CountdownFeed {
    pub target: DateTime<Utc>,
    pub clock: Clock,
    pub on_update: Callback<CountdownState>,
}

impl CountdownFeed {
    pub fn current(&self) -> CountdownState {
        time_left(&(self.clock)(), &self.target)
    }

    fn publish(&self) {
        self.on_update.emit(self.current());
    }
}

/// The scroll-bound behaviour of one mounted hero section.
pub struct HeroChoreography<S: TickSource> {
    ticker: Rc<RefCell<CountdownTicker<S>>>,
    reveal: Rc<Cell<RevealFlag>>,
    alive: Rc<Cell<bool>>,
}

impl<S: TickSource + 'static> HeroChoreography<S> {
    /// Registers the countdown trigger, then the pinned, snapping timeline.
    pub fn mount(
        engine: &mut dyn ScrollEngine,
        ticks: S,
        countdown: CountdownFeed,
        on_reveal: Callback<()>,
    ) -> Self {
        let ticker = Rc::new(RefCell::new(CountdownTicker::new(ticks)));
        let reveal = Rc::new(Cell::new(RevealFlag::Hidden));
        let alive = Rc::new(Cell::new(true));

        let start_ticking: EdgeCallback = {
            let ticker = ticker.clone();
            let alive = alive.clone();
            Rc::new(move || {
                if !alive.get() {
                    return;
                }
                countdown.publish();
                let feed = countdown.clone();
                let alive = alive.clone();
                if ticker.borrow_mut().start(move || {
                    if alive.get() {
                        feed.publish();
                    }
                }) {
                    log::debug!("countdown tick started");
                }
            })
        };
        let stop_ticking: EdgeCallback = {
            let ticker = ticker.clone();
            Rc::new(move || {
                if ticker.borrow_mut().stop() {
                    log::debug!("countdown tick stopped");
                }
            })
        };

        engine.register_trigger(TriggerSpec {
            region: ScrollRegion::hero(),
            callbacks: TriggerCallbacks {
                on_enter: Some(start_ticking.clone()),
                on_leave: Some(stop_ticking.clone()),
                on_enter_back: Some(start_ticking),
                on_leave_back: Some(stop_ticking),
            },
        });

        let timeline = {
            let reveal = reveal.clone();
            let alive = alive.clone();
            hero_timeline(move || {
                if !alive.get() {
                    return;
                }
                let mut flag = reveal.get();
                if flag.reveal() {
                    reveal.set(flag);
                    log::info!("hero timeline reached \"{}\", revealing call to action", LABEL_END);
                    on_reveal.emit(());
                }
            })
        };

        engine.build_timeline(TimelineSpec {
            region: ScrollRegion::hero(),
            timeline,
            pin: true,
            snap: Some(SnapSpec::to_labels()),
        });

        Self { ticker, reveal, alive }
    }

    /// Stops the tick and disposes every scroll binding. Callbacks that
    /// outlive this are inert.
    pub fn teardown(&self, engine: &mut dyn ScrollEngine) {
        self.alive.set(false);
        self.ticker.borrow_mut().stop();
        engine.dispose_all();
    }

    pub fn reveal_state(&self) -> RevealFlag {
        self.reveal.get()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.borrow().is_running()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::hero::engine::Edge;
    use crate::hero::ticker::fake::FakeTicks;
    use crate::hero::timeline::StyleProps;

    #[derive(Default)]
    struct FakeEngine {
        triggers: Vec<TriggerSpec>,
        timelines: Vec<TimelineSpec>,
        disposals: usize,
    }

    impl FakeEngine {
        fn edge(&self, edge: Edge) {
            for trigger in &self.triggers {
                trigger.callbacks.dispatch(edge);
            }
        }

        fn scrub(&self, from: f64, to: f64) {
            for spec in &self.timelines {
                for call in spec.timeline.crossed_calls(from, to) {
                    call();
                }
            }
        }
    }

    impl ScrollEngine for FakeEngine {
        fn register_trigger(&mut self, spec: TriggerSpec) {
            self.triggers.push(spec);
        }

        fn build_timeline(&mut self, spec: TimelineSpec) {
            self.timelines.push(spec);
        }

        fn dispose_all(&mut self) {
            self.triggers.clear();
            self.timelines.clear();
            self.disposals += 1;
        }
    }

    struct Harness {
        engine: FakeEngine,
        ticks: FakeTicks,
        now: Rc<Cell<DateTime<Utc>>>,
        updates: Rc<RefCell<Vec<CountdownState>>>,
        reveals: Rc<Cell<u32>>,
        choreography: HeroChoreography<FakeTicks>,
    }

    fn target() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 20, 10, 0, 0).unwrap()
    }

    fn mount() -> Harness {
        let mut engine = FakeEngine::default();
        let ticks = FakeTicks::default();
        let now = Rc::new(Cell::new(Utc.with_ymd_and_hms(2024, 12, 18, 10, 0, 0).unwrap()));
        let updates = Rc::new(RefCell::new(Vec::new()));
        let reveals = Rc::new(Cell::new(0));

        let feed = CountdownFeed {
            target: target(),
            clock: {
                let now = now.clone();
                Rc::new(move || now.get())
            },
            on_update: {
                let updates = updates.clone();
                Callback::from(move |state| updates.borrow_mut().push(state))
            },
        };
        let on_reveal = {
            let reveals = reveals.clone();
            Callback::from(move |_| reveals.set(reveals.get() + 1))
        };

        let choreography = HeroChoreography::mount(&mut engine, ticks.clone(), feed, on_reveal);
        Harness {
            engine,
            ticks,
            now,
            updates,
            reveals,
            choreography,
        }
    }

    fn layer(sampled: &[(Layer, StyleProps)], layer: Layer) -> StyleProps {
        sampled.iter().find(|(l, _)| *l == layer).map(|(_, s)| *s).unwrap()
    }

    #[test]
    fn registers_trigger_then_pinned_timeline() {
        let h = mount();
        assert_eq!(h.engine.triggers.len(), 1);
        assert_eq!(h.engine.triggers[0].region, ScrollRegion::hero());
        assert_eq!(h.engine.timelines.len(), 1);

        let spec = &h.engine.timelines[0];
        assert!(spec.pin);
        assert_eq!(spec.snap, Some(SnapSpec::to_labels()));
        assert_eq!(spec.region, ScrollRegion::hero());
        assert_eq!(spec.timeline.label_names(), vec![LABEL_START, LABEL_MID, LABEL_END]);
    }

    #[test]
    fn keyframes_match_the_sequence() {
        let timeline = hero_timeline(|| {});

        let start = timeline.sample(0.0);
        let image = layer(&start, Layer::Image);
        assert_eq!((image.scale, image.rotate_deg, image.opacity), (1.5, -20.0, 0.0));
        assert_eq!(image.y, Length::px(100.0));
        assert_eq!(layer(&start, Layer::Timer).scale, 3.0);

        let mid = timeline.sample(timeline.label_progress(LABEL_MID).unwrap());
        let image = layer(&mid, Layer::Image);
        assert!((image.scale - 1.2).abs() < 1e-9);
        assert_eq!(image.y, Length::px(50.0));
        assert!((layer(&mid, Layer::Timer).scale - 2.0).abs() < 1e-9);

        let end = timeline.sample(1.0);
        let image = layer(&end, Layer::Image);
        assert!((image.scale - 0.8).abs() < 1e-9);
        let timer = layer(&end, Layer::Timer);
        assert!((timer.scale - 1.5).abs() < 1e-9);
        assert_eq!(timer.y, Length::percent(50.0));
        assert_eq!(timer.x_percent, -50.0);
    }

    #[test]
    fn enter_ticks_and_leave_stops() {
        let h = mount();
        assert!(!h.choreography.is_ticking());

        h.engine.edge(Edge::Enter);
        assert!(h.choreography.is_ticking());
        assert_eq!(h.updates.borrow().last(), Some(&CountdownState { days: 2, hours: 0, minutes: 0 }));

        h.now.set(target() - Duration::hours(1));
        h.ticks.fire();
        assert_eq!(h.updates.borrow().last(), Some(&CountdownState { days: 0, hours: 1, minutes: 0 }));

        h.engine.edge(Edge::Leave);
        assert!(!h.choreography.is_ticking());
        let seen = h.updates.borrow().len();
        h.ticks.fire();
        assert_eq!(h.updates.borrow().len(), seen);
    }

    #[test]
    fn repeated_entries_keep_a_single_tick() {
        let h = mount();
        for _ in 0..4 {
            h.engine.edge(Edge::Enter);
            h.engine.edge(Edge::EnterBack);
            h.ticks.fire();
            h.engine.edge(Edge::Leave);
            h.engine.edge(Edge::EnterBack);
            h.engine.edge(Edge::LeaveBack);
        }
        assert_eq!(h.ticks.peak(), 1);
        assert_eq!(h.ticks.live(), 0);
    }

    #[test]
    fn reentry_reads_the_clock_afresh() {
        let h = mount();
        h.engine.edge(Edge::Enter);
        h.engine.edge(Edge::Leave);

        h.now.set(target() + Duration::days(1));
        h.engine.edge(Edge::EnterBack);
        assert_eq!(h.updates.borrow().last(), Some(&CountdownState::ZERO));
    }

    #[test]
    fn reveal_fires_once_at_end() {
        let h = mount();
        h.engine.scrub(0.0, 0.5);
        assert_eq!(h.reveals.get(), 0);
        assert_eq!(h.choreography.reveal_state(), RevealFlag::Hidden);

        h.engine.scrub(0.5, 1.0);
        assert_eq!(h.reveals.get(), 1);
        assert_eq!(h.choreography.reveal_state(), RevealFlag::Revealed);

        h.engine.scrub(1.0, 0.2);
        h.engine.scrub(0.2, 1.0);
        assert_eq!(h.reveals.get(), 1);
        assert!(h.choreography.reveal_state().is_revealed());
    }

    #[test]
    fn remount_starts_hidden() {
        let first = mount();
        first.engine.scrub(0.0, 1.0);
        assert!(first.choreography.reveal_state().is_revealed());

        let second = mount();
        assert_eq!(second.choreography.reveal_state(), RevealFlag::Hidden);
    }

    #[test]
    fn teardown_releases_everything() {
        let mut h = mount();
        h.engine.edge(Edge::Enter);
        let callbacks = h.engine.triggers[0].callbacks.clone();
        let end_calls = h.engine.timelines[0].timeline.crossed_calls(0.0, 1.0);

        h.choreography.teardown(&mut h.engine);
        assert_eq!(h.engine.disposals, 1);
        assert!(h.engine.triggers.is_empty() && h.engine.timelines.is_empty());
        assert_eq!(h.ticks.live(), 0);

        let seen = h.updates.borrow().len();
        callbacks.dispatch(Edge::EnterBack);
        h.ticks.fire();
        end_calls.iter().for_each(|call| call());
        assert_eq!(h.updates.borrow().len(), seen);
        assert_eq!(h.reveals.get(), 0);
        assert_eq!(h.ticks.live(), 0);
    }

    #[test]
    fn reveal_flag_is_one_way() {
        let mut flag = RevealFlag::default();
        assert!(flag.reveal());
        assert!(!flag.reveal());
        assert!(flag.is_revealed());
    }
}
