use std::rc::Rc;

use crate::config;
use crate::hero::timeline::{CompiledTimeline, Ease};

pub type EdgeCallback = Rc<dyn Fn()>;

/// A scroll span that starts when the trigger's top meets the viewport's top
/// and runs for `length_viewports` viewport heights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRegion {
    pub length_viewports: f64,
}

impl ScrollRegion {
    pub fn hero() -> Self {
        Self {
            length_viewports: config::SCROLL_REGION_VIEWPORTS,
        }
    }

    pub fn length_px(&self, viewport_height: f64) -> f64 {
        self.length_viewports * viewport_height
    }

    /// Progress (0..=1) through the region for a scroll offset measured from
    /// the region's start.
    pub fn progress(&self, offset: f64, viewport_height: f64) -> f64 {
        let length = self.length_px(viewport_height);
        if length <= 0.0 {
            return if offset >= 0.0 { 1.0 } else { 0.0 };
        }
        (offset / length).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Default)]
pub struct TriggerCallbacks {
    pub on_enter: Option<EdgeCallback>,
    pub on_leave: Option<EdgeCallback>,
    pub on_enter_back: Option<EdgeCallback>,
    pub on_leave_back: Option<EdgeCallback>,
}

impl TriggerCallbacks {
    pub fn dispatch(&self, edge: Edge) {
        let callback = match edge {
            Edge::Enter => &self.on_enter,
            Edge::Leave => &self.on_leave,
            Edge::EnterBack => &self.on_enter_back,
            Edge::LeaveBack => &self.on_leave_back,
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

pub struct TriggerSpec {
    pub region: ScrollRegion,
    pub callbacks: TriggerCallbacks,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapSpec {
    pub ease: Ease,
    pub min_secs: f64,
    pub max_secs: f64,
}

// Seconds a snap would take to travel the whole timeline, before clamping.
const SNAP_SECS_PER_PROGRESS: f64 = 2.0;

impl SnapSpec {
    pub fn to_labels() -> Self {
        Self {
            ease: Ease::Power1InOut,
            min_secs: config::SNAP_MIN_SECS,
            max_secs: config::SNAP_MAX_SECS,
        }
    }

    pub fn duration_secs(&self, distance: f64) -> f64 {
        (distance.abs() * SNAP_SECS_PER_PROGRESS).clamp(self.min_secs, self.max_secs)
    }
}

/// A timeline whose playhead follows scroll progress through `region`.
pub struct TimelineSpec {
    pub region: ScrollRegion,
    pub timeline: CompiledTimeline,
    pub pin: bool,
    pub snap: Option<SnapSpec>,
}

/// Scroll choreography capability: the hero section configures it, never
/// drives it.
pub trait ScrollEngine {
    fn register_trigger(&mut self, spec: TriggerSpec);

    fn build_timeline(&mut self, spec: TimelineSpec);

    /// Drops every trigger and timeline and releases whatever the engine holds.
    fn dispose_all(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionPosition {
    #[default]
    Before,
    Inside,
    After,
}

/// Turns successive scroll offsets into region edge crossings.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegionTracker {
    position: RegionPosition,
}

impl RegionTracker {
    pub fn position(&self) -> RegionPosition {
        self.position
    }

    /// `offset` is measured from the region's start; `length` is the region's size.
    pub fn update(&mut self, offset: f64, length: f64) -> Vec<Edge> {
        let next = if offset < 0.0 {
            RegionPosition::Before
        } else if offset <= length {
            RegionPosition::Inside
        } else {
            RegionPosition::After
        };

        let edges = match (self.position, next) {
            (RegionPosition::Before, RegionPosition::Inside) => vec![Edge::Enter],
            (RegionPosition::Before, RegionPosition::After) => vec![Edge::Enter, Edge::Leave],
            (RegionPosition::Inside, RegionPosition::After) => vec![Edge::Leave],
            (RegionPosition::Inside, RegionPosition::Before) => vec![Edge::LeaveBack],
            (RegionPosition::After, RegionPosition::Inside) => vec![Edge::EnterBack],
            (RegionPosition::After, RegionPosition::Before) => {
                vec![Edge::EnterBack, Edge::LeaveBack]
            }
            _ => Vec::new(),
        };
        self.position = next;
        edges
    }
}
