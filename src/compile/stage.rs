use crate::{
    animation::ease::Ease,
    compile::instruction::Callback,
    foundation::core::MsRange,
    style::diff::ValueDelta,
};

/// What a stage does when it is reached.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageAction {
    /// Pure timing point; dispatches the step's callbacks, if any.
    Marker {
        /// Step whose boundary this marker sits on.
        step: usize,
        /// Callbacks dispatched when the marker is reached.
        #[serde(skip)]
        callbacks: Vec<Callback>,
    },
    /// Instant write of a literal value.
    Set {
        /// Property key.
        property: String,
        /// Text written to every target.
        value: String,
    },
    /// Eased componentwise interpolation.
    Tween {
        /// Property key.
        property: String,
        /// Easing curve applied to linear progress.
        ease: Ease,
        /// Interpolated components, in order.
        deltas: Vec<ValueDelta>,
        /// Destination text, written verbatim when the tween completes.
        settled: String,
    },
}

/// One compiled, time-bounded unit of a timeline.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Stage {
    /// Offset from playback start.
    pub start_ms: u64,
    /// Length of the interpolation window (0 for instant stages).
    pub duration_ms: u64,
    /// Effect of the stage.
    #[serde(flatten)]
    pub action: StageAction,
}

impl Stage {
    /// Property written by this stage, `None` for markers.
    pub fn property(&self) -> Option<&str> {
        match &self.action {
            StageAction::Marker { .. } => None,
            StageAction::Set { property, .. } | StageAction::Tween { property, .. } => {
                Some(property)
            }
        }
    }

    /// Easing of a tween stage.
    pub fn ease(&self) -> Option<Ease> {
        match &self.action {
            StageAction::Tween { ease, .. } => Some(*ease),
            _ => None,
        }
    }

    /// Interpolation window `[start, start + duration)`.
    pub fn window(&self) -> MsRange {
        MsRange::at(self.start_ms, self.duration_ms)
    }

    /// Offset at which the stage is complete.
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    /// Text the property holds once the stage is complete.
    pub fn final_value(&self) -> Option<&str> {
        match &self.action {
            StageAction::Marker { .. } => None,
            StageAction::Set { value, .. } => Some(value),
            StageAction::Tween { settled, .. } => Some(settled),
        }
    }
}

/// Sorted stage list produced by one compilation.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Timeline {
    stages: Vec<Stage>,
}

impl Timeline {
    /// Build a timeline, ordering stages by `(start, duration)`.
    ///
    /// The sort is stable: ties keep their emission order.
    pub fn from_stages(mut stages: Vec<Stage>) -> Self {
        stages.sort_by_key(|s| (s.start_ms, s.duration_ms));
        Self { stages }
    }

    /// Stages in playback order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Consume the timeline, returning its stages.
    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Return `true` when the timeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Latest stage end offset.
    pub fn length_ms(&self) -> u64 {
        self.stages.iter().map(Stage::end_ms).max().unwrap_or(0)
    }
}
