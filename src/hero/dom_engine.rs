//! `ScrollEngine` backed by window scroll events and inline styles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement};
use yew::NodeRef;

use crate::config;
use crate::hero::engine::{
    Edge, RegionTracker, ScrollEngine, ScrollRegion, TimelineSpec, TriggerCallbacks, TriggerSpec,
};
use crate::hero::timeline::{Layer, StyleProps};

const SNAP_FRAME_MS: u32 = 16;
const LISTENED_EVENTS: [&str; 2] = ["scroll", "resize"];

struct TriggerBinding {
    spec: TriggerSpec,
    tracker: RegionTracker,
}

struct TimelineBinding {
    spec: TimelineSpec,
    progress: f64,
}

#[derive(Default)]
struct EngineState {
    triggers: Vec<TriggerBinding>,
    timelines: Vec<TimelineBinding>,
    pinned: Option<ScrollRegion>,
    idle: Option<Timeout>,
    snapping: bool,
    // Bumped to cancel an in-flight snap.
    snap_generation: u64,
}

struct Shared {
    trigger: NodeRef,
    layers: Vec<(Layer, NodeRef)>,
    state: RefCell<EngineState>,
}

pub struct DomScrollEngine {
    shared: Rc<Shared>,
    listener: Option<Closure<dyn FnMut()>>,
}

impl DomScrollEngine {
    /// `trigger` is the element the scroll region is measured against; when a
    /// timeline pins, its parent becomes the pin spacer.
    pub fn new(trigger: NodeRef, layers: Vec<(Layer, NodeRef)>) -> Self {
        Self {
            shared: Rc::new(Shared {
                trigger,
                layers,
                state: RefCell::new(EngineState::default()),
            }),
            listener: None,
        }
    }

    fn ensure_listening(&mut self) {
        if self.listener.is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            log::warn!("no window, scroll engine stays idle");
            return;
        };

        let shared = Rc::downgrade(&self.shared);
        let listener = Closure::wrap(Box::new(move || {
            if let Some(shared) = shared.upgrade() {
                on_scroll(&shared);
            }
        }) as Box<dyn FnMut()>);

        for event in LISTENED_EVENTS {
            if window
                .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                .is_err()
            {
                gloo_console::error!("Failed to add scroll engine listener");
            }
        }
        self.listener = Some(listener);
    }
}

impl ScrollEngine for DomScrollEngine {
    fn register_trigger(&mut self, spec: TriggerSpec) {
        self.shared.state.borrow_mut().triggers.push(TriggerBinding {
            spec,
            tracker: RegionTracker::default(),
        });
        self.ensure_listening();
        self.shared.refresh();
    }

    fn build_timeline(&mut self, spec: TimelineSpec) {
        if spec.pin {
            self.shared.pin(spec.region);
        }
        self.shared.state.borrow_mut().timelines.push(TimelineBinding { spec, progress: 0.0 });
        self.ensure_listening();
        self.shared.refresh();
    }

    fn dispose_all(&mut self) {
        if let Some(listener) = self.listener.take() {
            if let Some(window) = web_sys::window() {
                for event in LISTENED_EVENTS {
                    if window
                        .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                        .is_err()
                    {
                        gloo_console::error!("Failed to remove scroll engine listener");
                    }
                }
            }
        }

        let pinned = {
            let mut state = self.shared.state.borrow_mut();
            state.triggers.clear();
            state.timelines.clear();
            state.idle = None;
            state.snapping = false;
            state.snap_generation += 1;
            state.pinned.take()
        };
        if pinned.is_some() {
            self.shared.unpin();
        }
    }
}

impl Drop for DomScrollEngine {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

fn on_scroll(shared: &Rc<Shared>) {
    shared.refresh();

    let mut state = shared.state.borrow_mut();
    let wants_snap = state.timelines.iter().any(|t| t.spec.snap.is_some());
    if !wants_snap || state.snapping {
        return;
    }
    // Replacing the pending timeout cancels it.
    let weak = Rc::downgrade(shared);
    state.idle = Some(Timeout::new(config::SNAP_IDLE_MS, move || {
        if let Some(shared) = weak.upgrade() {
            start_snap(&shared);
        }
    }));
}

fn start_snap(shared: &Rc<Shared>) {
    let Some((offset, viewport_height)) = shared.measure() else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    let (region, snap, from, to, generation) = {
        let mut state = shared.state.borrow_mut();
        let Some(binding) = state.timelines.iter().find(|t| t.spec.snap.is_some()) else {
            return;
        };
        let Some(snap) = binding.spec.snap else {
            return;
        };
        let region = binding.spec.region;
        let from = region.progress(offset, viewport_height);
        let Some(to) = binding.spec.timeline.nearest_label(from) else {
            return;
        };
        if (to - from).abs() < 1e-3 {
            return;
        }
        state.snapping = true;
        state.snap_generation += 1;
        (region, snap, from, to, state.snap_generation)
    };

    let scroll_x = window.scroll_x().unwrap_or(0.0);
    let start_y = window.scroll_y().unwrap_or(0.0);
    let target_y = start_y + (to - from) * region.length_px(viewport_height);
    let frames = ((snap.duration_secs(to - from) * 1000.0) / SNAP_FRAME_MS as f64).ceil().max(1.0) as u32;
    log::debug!("snapping scroll progress {:.3} -> {:.3} over {} frames", from, to, frames);

    let weak: Weak<Shared> = Rc::downgrade(shared);
    spawn_local(async move {
        for frame in 1..=frames {
            TimeoutFuture::new(SNAP_FRAME_MS).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if shared.state.borrow().snap_generation != generation {
                return;
            }
            let eased = snap.ease.apply(frame as f64 / frames as f64);
            window.scroll_to_with_x_and_y(scroll_x, start_y + (target_y - start_y) * eased);
        }
        if let Some(shared) = weak.upgrade() {
            let mut state = shared.state.borrow_mut();
            if state.snap_generation == generation {
                state.snapping = false;
            }
        }
    });
}

impl Shared {
    /// Scroll offset past the region start, and the viewport height.
    fn measure(&self) -> Option<(f64, f64)> {
        let window = web_sys::window()?;
        let viewport_height = window.inner_height().ok()?.as_f64()?;
        let trigger = self.trigger.cast::<Element>()?;
        let anchor = if self.state.borrow().pinned.is_some() {
            trigger.parent_element()?
        } else {
            trigger
        };
        Some((-anchor.get_bounding_client_rect().top(), viewport_height))
    }

    /// Re-evaluates every binding against the current scroll position. User
    /// callbacks run after the engine state is released.
    fn refresh(&self) {
        let Some((offset, viewport_height)) = self.measure() else {
            return;
        };

        let mut edges: Vec<(TriggerCallbacks, Edge)> = Vec::new();
        let mut calls = Vec::new();
        let mut styles = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            for binding in state.triggers.iter_mut() {
                let length = binding.spec.region.length_px(viewport_height);
                for edge in binding.tracker.update(offset, length) {
                    edges.push((binding.spec.callbacks.clone(), edge));
                }
            }
            for binding in state.timelines.iter_mut() {
                let progress = binding.spec.region.progress(offset, viewport_height);
                calls.extend(binding.spec.timeline.crossed_calls(binding.progress, progress));
                styles.extend(binding.spec.timeline.sample(progress));
                binding.progress = progress;
            }
        }

        for (layer, props) in styles {
            self.apply_style(layer, &props);
        }
        for (callbacks, edge) in edges {
            log::debug!("hero scroll region edge: {:?}", edge);
            callbacks.dispatch(edge);
        }
        for call in calls {
            call();
        }
    }

    fn apply_style(&self, layer: Layer, props: &StyleProps) {
        let Some(element) = self
            .layers
            .iter()
            .find(|(l, _)| *l == layer)
            .and_then(|(_, node)| node.cast::<HtmlElement>())
        else {
            return;
        };
        let style = element.style();
        let result = style
            .set_property("transform", &props.transform_css())
            .and_then(|_| style.set_property("opacity", &props.opacity.to_string()));
        if result.is_err() {
            log::warn!("could not style {:?} layer", layer);
        }
    }

    fn pin(&self, region: ScrollRegion) {
        let Some(trigger) = self.trigger.cast::<HtmlElement>() else {
            return;
        };
        let Some(spacer) = trigger
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("pinned element has no parent to use as a spacer");
            return;
        };

        let spacer_height = format!("calc(100vh + {}vh)", region.length_viewports * 100.0);
        let spacer_style = spacer.style();
        let trigger_style = trigger.style();
        let result = spacer_style
            .set_property("height", &spacer_height)
            .and_then(|_| spacer_style.set_property("position", "relative"))
            .and_then(|_| trigger_style.set_property("position", "sticky"))
            .and_then(|_| trigger_style.set_property("top", "0"));
        if result.is_err() {
            gloo_console::error!("Failed to pin hero section");
            return;
        }
        self.state.borrow_mut().pinned = Some(region);
    }

    fn unpin(&self) {
        let Some(trigger) = self.trigger.cast::<HtmlElement>() else {
            return;
        };
        let _ = trigger.style().remove_property("top");
        let _ = trigger.style().set_property("position", "relative");
        if let Some(spacer) = trigger
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
        {
            let _ = spacer.style().remove_property("height");
        }
    }
}
