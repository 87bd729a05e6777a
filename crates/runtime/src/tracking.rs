use std::collections::VecDeque;

/// What the AR tracker reports for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct TrackingState {
    pub marker_visible: bool,
    /// Column-major marker pose, when the tracker provides one.
    pub marker_pose: Option<[f64; 16]>,
}

impl TrackingState {
    pub fn visible() -> Self {
        Self {
            marker_visible: true,
            marker_pose: None,
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Marker-tracking collaborator polled once per frame.
pub trait MarkerTracker {
    /// Whether the camera source has produced frames yet.
    fn source_ready(&self) -> bool;

    /// Process the latest camera frame.
    fn update(&mut self) -> TrackingState;
}

/// Tracker that replays a fixed script of states, then holds the last one.
#[derive(Debug, Clone)]
pub struct ScriptedTracker {
    warmup_frames: u32,
    script: VecDeque<TrackingState>,
    last: TrackingState,
}

impl ScriptedTracker {
    /// Visibility-only script; no pose is reported.
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self::from_states(script.into_iter().map(|visible| TrackingState {
            marker_visible: visible,
            marker_pose: None,
        }))
    }

    pub fn from_states(script: impl IntoIterator<Item = TrackingState>) -> Self {
        Self {
            warmup_frames: 0,
            script: script.into_iter().collect(),
            last: TrackingState::hidden(),
        }
    }

    /// The source reports not-ready for the first `frames` polls.
    pub fn with_warmup(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }

    /// Call once per frame before `source_ready`; counts down the warmup.
    pub fn tick(&mut self) {
        self.warmup_frames = self.warmup_frames.saturating_sub(1);
    }
}

impl MarkerTracker for ScriptedTracker {
    fn source_ready(&self) -> bool {
        self.warmup_frames == 0
    }

    fn update(&mut self) -> TrackingState {
        if let Some(state) = self.script.pop_front() {
            self.last = state;
        }
        self.last
    }
}
