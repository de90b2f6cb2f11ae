//! Keyframed, scroll-scrubbed animation timelines.
//!
//! A [`Timeline`] is built the way it reads: labels, tweens and calls appended
//! in order, each tween either following the previous one or starting with it.
//! [`Timeline::compile`] resolves every tween to absolute times and concrete
//! start/end styles, after which the timeline can be sampled at any progress.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// An animated layer of the hero section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Image,
    Timer,
}

/// A length that may mix pixels and a percentage of the element's own size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Length {
    pub px: f64,
    pub percent: f64,
}

impl Length {
    pub const fn px(px: f64) -> Self {
        Self { px, percent: 0.0 }
    }

    pub const fn percent(percent: f64) -> Self {
        Self { px: 0.0, percent }
    }

    fn lerp(self, to: Length, t: f64) -> Length {
        Length {
            px: lerp(self.px, to.px, t),
            percent: lerp(self.percent, to.percent, t),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.px == 0.0, self.percent == 0.0) {
            (_, true) => write!(f, "{}px", self.px),
            (true, false) => write!(f, "{}%", self.percent),
            (false, false) => write!(f, "calc({}px + {}%)", self.px, self.percent),
        }
    }
}

/// The animatable style of a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleProps {
    pub opacity: f64,
    pub scale: f64,
    pub rotate_deg: f64,
    pub y: Length,
    /// Horizontal offset as a percentage of the element's width. Layers are
    /// centred on their anchor, hence the -50 resting value.
    pub x_percent: f64,
}

impl Default for StyleProps {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            rotate_deg: 0.0,
            y: Length::default(),
            x_percent: -50.0,
        }
    }
}

impl StyleProps {
    pub fn lerp(&self, to: &StyleProps, t: f64) -> StyleProps {
        StyleProps {
            opacity: lerp(self.opacity, to.opacity, t),
            scale: lerp(self.scale, to.scale, t),
            rotate_deg: lerp(self.rotate_deg, to.rotate_deg, t),
            y: self.y.lerp(to.y, t),
            x_percent: lerp(self.x_percent, to.x_percent, t),
        }
    }

    pub fn transform_css(&self) -> String {
        format!(
            "translate({}%, -50%) translateY({}) rotate({}deg) scale({})",
            self.x_percent, self.y, self.rotate_deg, self.scale
        )
    }
}

/// A partial set of style properties; unset fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PropsPatch {
    opacity: Option<f64>,
    scale: Option<f64>,
    rotate_deg: Option<f64>,
    y: Option<Length>,
    x_percent: Option<f64>,
}

impl PropsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate_deg = Some(degrees);
        self
    }

    pub fn y(mut self, y: Length) -> Self {
        self.y = Some(y);
        self
    }

    pub fn x_percent(mut self, x_percent: f64) -> Self {
        self.x_percent = Some(x_percent);
        self
    }

    pub fn apply_to(&self, base: StyleProps) -> StyleProps {
        StyleProps {
            opacity: self.opacity.unwrap_or(base.opacity),
            scale: self.scale.unwrap_or(base.scale),
            rotate_deg: self.rotate_deg.unwrap_or(base.rotate_deg),
            y: self.y.unwrap_or(base.y),
            x_percent: self.x_percent.unwrap_or(base.x_percent),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    Power1Out,
    Power1InOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(2) / 2.0
                }
            }
        }
    }
}

/// Where a step is placed on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// At the current end of the timeline.
    Sequential,
    /// At the start time of the previously added tween.
    WithPrevious,
}

#[derive(Clone, Debug)]
struct Tween {
    layer: Layer,
    from: Option<PropsPatch>,
    to: PropsPatch,
    duration: f64,
    ease: Ease,
    position: Position,
}

enum Step {
    Label(&'static str),
    Tween(Tween),
    Call(Rc<dyn Fn()>),
}

#[derive(Default)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_label(mut self, name: &'static str) -> Self {
        self.steps.push(Step::Label(name));
        self
    }

    /// Animates `layer` between two explicit states. The `from` state is
    /// rendered immediately, before the playhead reaches the tween.
    pub fn from_to(
        mut self,
        layer: Layer,
        from: PropsPatch,
        to: PropsPatch,
        duration: f64,
        position: Position,
    ) -> Self {
        self.steps.push(Step::Tween(Tween {
            layer,
            from: Some(from),
            to,
            duration,
            ease: Ease::Power1Out,
            position,
        }));
        self
    }

    /// Animates `layer` from wherever earlier tweens left it.
    pub fn to(mut self, layer: Layer, to: PropsPatch, duration: f64, position: Position) -> Self {
        self.steps.push(Step::Tween(Tween {
            layer,
            from: None,
            to,
            duration,
            ease: Ease::Power1Out,
            position,
        }));
        self
    }

    pub fn call<F>(mut self, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.steps.push(Step::Call(Rc::new(f)));
        self
    }

    pub fn compile(self) -> CompiledTimeline {
        let mut end = 0.0_f64;
        let mut previous_start = 0.0_f64;
        let mut states: BTreeMap<Layer, StyleProps> = BTreeMap::new();
        let mut compiled = CompiledTimeline::default();

        for step in self.steps {
            match step {
                Step::Label(name) => compiled.labels.push((name, end)),
                Step::Call(f) => compiled.calls.push((end, f)),
                Step::Tween(tween) => {
                    let start = match tween.position {
                        Position::Sequential => end,
                        Position::WithPrevious => previous_start,
                    };
                    previous_start = start;
                    end = end.max(start + tween.duration);

                    let current = states.get(&tween.layer).copied().unwrap_or_default();
                    let from = match tween.from {
                        Some(patch) => patch.apply_to(current),
                        None => current,
                    };
                    let to = tween.to.apply_to(from);
                    states.insert(tween.layer, to);

                    compiled.tweens.push(ResolvedTween {
                        layer: tween.layer,
                        start,
                        duration: tween.duration,
                        from,
                        to,
                        ease: tween.ease,
                        immediate: tween.from.is_some(),
                    });
                }
            }
        }

        compiled.duration = end;
        compiled.layers = states.into_keys().collect();
        compiled
    }
}

#[derive(Clone, Debug)]
struct ResolvedTween {
    layer: Layer,
    start: f64,
    duration: f64,
    from: StyleProps,
    to: StyleProps,
    ease: Ease,
    immediate: bool,
}

#[derive(Default)]
pub struct CompiledTimeline {
    duration: f64,
    labels: Vec<(&'static str, f64)>,
    tweens: Vec<ResolvedTween>,
    calls: Vec<(f64, Rc<dyn Fn()>)>,
    layers: Vec<Layer>,
}

impl CompiledTimeline {
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn label_names(&self) -> Vec<&'static str> {
        self.labels.iter().map(|(name, _)| *name).collect()
    }

    /// Progress (0..=1) at which `name` sits.
    pub fn label_progress(&self, name: &str) -> Option<f64> {
        self.labels
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, time)| self.to_progress(*time))
    }

    /// The label closest to `progress`, as a progress value.
    pub fn nearest_label(&self, progress: f64) -> Option<f64> {
        self.labels
            .iter()
            .map(|(_, time)| self.to_progress(*time))
            .min_by(|a, b| (a - progress).abs().total_cmp(&(b - progress).abs()))
    }

    /// Style of every animated layer at `progress` (0..=1).
    pub fn sample(&self, progress: f64) -> Vec<(Layer, StyleProps)> {
        let time = progress.clamp(0.0, 1.0) * self.duration;
        self.layers
            .iter()
            .map(|&layer| (layer, self.sample_layer(layer, time)))
            .collect()
    }

    fn sample_layer(&self, layer: Layer, time: f64) -> StyleProps {
        let mut state = StyleProps::default();
        for tween in self.tweens.iter().filter(|t| t.layer == layer) {
            if time >= tween.start + tween.duration {
                state = tween.to;
            } else if time > tween.start {
                let t = (time - tween.start) / tween.duration;
                return tween.from.lerp(&tween.to, tween.ease.apply(t));
            } else {
                if tween.immediate {
                    state = tween.from;
                }
                break;
            }
        }
        state
    }

    /// Calls the playhead passes when moving forward from `from` to `to`.
    pub fn crossed_calls(&self, from: f64, to: f64) -> Vec<Rc<dyn Fn()>> {
        if to <= from {
            return Vec::new();
        }
        let (from, to) = (from * self.duration, to * self.duration);
        self.calls
            .iter()
            .filter(|(time, _)| from < *time && *time <= to)
            .map(|(_, f)| f.clone())
            .collect()
    }

    fn to_progress(&self, time: f64) -> f64 {
        if self.duration > 0.0 {
            time / self.duration
        } else {
            0.0
        }
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_stage(counter: Rc<Cell<u32>>) -> CompiledTimeline {
        Timeline::new()
            .add_label("start")
            .from_to(
                Layer::Image,
                PropsPatch::new().scale(2.0).opacity(0.0),
                PropsPatch::new().scale(1.0).opacity(1.0),
                1.0,
                Position::Sequential,
            )
            .from_to(
                Layer::Timer,
                PropsPatch::new().y(Length::px(100.0)),
                PropsPatch::new().y(Length::px(50.0)),
                1.0,
                Position::WithPrevious,
            )
            .add_label("mid")
            .to(Layer::Image, PropsPatch::new().scale(0.5), 1.0, Position::Sequential)
            .to(Layer::Timer, PropsPatch::new().y(Length::percent(50.0)), 1.0, Position::WithPrevious)
            .add_label("end")
            .call(move || counter.set(counter.get() + 1))
            .compile()
    }

    #[test]
    fn parallel_tweens_share_time() {
        let timeline = two_stage(Rc::default());
        assert!(approx(timeline.duration(), 2.0));
        assert_eq!(timeline.label_names(), vec!["start", "mid", "end"]);
        assert_eq!(timeline.label_progress("start"), Some(0.0));
        assert_eq!(timeline.label_progress("mid"), Some(0.5));
        assert_eq!(timeline.label_progress("end"), Some(1.0));
        assert_eq!(timeline.label_progress("missing"), None);
    }

    #[test]
    fn from_state_renders_before_playhead() {
        let timeline = two_stage(Rc::default());
        let sampled = timeline.sample(0.0);
        let image = sampled.iter().find(|(l, _)| *l == Layer::Image).unwrap().1;
        assert_eq!(image.scale, 2.0);
        assert_eq!(image.opacity, 0.0);
    }

    #[test]
    fn to_tween_starts_where_previous_ended() {
        let timeline = two_stage(Rc::default());
        let at_mid = timeline.sample(0.5);
        let image = at_mid.iter().find(|(l, _)| *l == Layer::Image).unwrap().1;
        assert!(approx(image.scale, 1.0));
        assert!(approx(image.opacity, 1.0));

        let at_end = timeline.sample(1.0);
        let image = at_end.iter().find(|(l, _)| *l == Layer::Image).unwrap().1;
        assert!(approx(image.scale, 0.5));
    }

    #[test]
    fn mixed_units_interpolate_per_component() {
        let timeline = two_stage(Rc::default());
        let at_end = timeline.sample(1.0);
        let timer = at_end.iter().find(|(l, _)| *l == Layer::Timer).unwrap().1;
        assert_eq!(timer.y, Length::percent(50.0));
        assert_eq!(timer.y.to_string(), "50%");

        let midway = timeline.sample(0.75);
        let timer = midway.iter().find(|(l, _)| *l == Layer::Timer).unwrap().1;
        assert!(timer.y.percent > 0.0 && timer.y.percent < 50.0);
        assert!(timer.y.px > 0.0 && timer.y.px < 50.0);
        assert!(timer.y.to_string().starts_with("calc("));
    }

    #[test]
    fn sampling_is_clamped() {
        let timeline = two_stage(Rc::default());
        assert_eq!(timeline.sample(-1.0), timeline.sample(0.0));
        assert_eq!(timeline.sample(7.0), timeline.sample(1.0));
    }

    #[test]
    fn calls_fire_on_forward_crossing_only() {
        let counter = Rc::new(Cell::new(0));
        let timeline = two_stage(counter.clone());

        assert!(timeline.crossed_calls(0.0, 0.99).is_empty());
        assert!(timeline.crossed_calls(1.0, 0.2).is_empty());
        let calls = timeline.crossed_calls(0.4, 1.0);
        assert_eq!(calls.len(), 1);
        calls.iter().for_each(|f| f());
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn nearest_label_snaps() {
        let timeline = two_stage(Rc::default());
        assert_eq!(timeline.nearest_label(0.2), Some(0.0));
        assert_eq!(timeline.nearest_label(0.3), Some(0.5));
        assert_eq!(timeline.nearest_label(0.9), Some(1.0));
        assert_eq!(Timeline::new().compile().nearest_label(0.5), None);
    }

    #[test]
    fn eases_hit_their_endpoints() {
        for ease in [Ease::Linear, Ease::Power1Out, Ease::Power1InOut] {
            assert!(approx(ease.apply(0.0), 0.0));
            assert!(approx(ease.apply(1.0), 1.0));
        }
        assert!(approx(Ease::Power1InOut.apply(0.5), 0.5));
        assert!(Ease::Power1Out.apply(0.25) > 0.25);
    }

    #[test]
    fn transform_css_composes_all_parts() {
        let props = PropsPatch::new()
            .scale(1.5)
            .rotate(-20.0)
            .y(Length::px(100.0))
            .apply_to(StyleProps::default());
        assert_eq!(
            props.transform_css(),
            "translate(-50%, -50%) translateY(100px) rotate(-20deg) scale(1.5)"
        );
    }
}
