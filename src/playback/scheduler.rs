use crate::{
    compile::{
        instruction::Callback,
        stage::{Stage, StageAction, Timeline},
    },
    foundation::core::TargetId,
    playback::target::PropertyWriter,
    style::diff::compose,
};

/// Progress tracker of one active interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    /// Clock reading at which the interpolation window opened.
    pub started_ms: u64,
    /// Ticks observed so far.
    pub frame_count: u64,
    /// Linear progress in `[0, 1]`.
    pub position: f64,
}

impl PlaybackState {
    /// Tracker for a window opening at `started_ms`.
    pub fn new(started_ms: u64) -> Self {
        Self {
            started_ms,
            frame_count: 0,
            position: 0.0,
        }
    }

    /// Advance toward 1 for a tick at `now_ms`, given the window end.
    ///
    /// The step closes the remaining distance in proportion to the observed
    /// average tick rate and the time left, so irregular ticks still land on
    /// 1 exactly at `end_ms`.
    pub fn step(&mut self, now_ms: u64, end_ms: u64) -> f64 {
        self.frame_count += 1;
        if now_ms >= end_ms {
            self.position = 1.0;
            return self.position;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms);
        if elapsed == 0 {
            return self.position;
        }
        let frames_per_ms = self.frame_count as f64 / elapsed as f64;
        let remaining_ms = (end_ms - now_ms) as f64;
        self.position += (1.0 - self.position) / frames_per_ms / remaining_ms;
        self.position = self.position.min(1.0);
        self.position
    }

    /// Return `true` once the interpolation has completed.
    pub fn is_done(&self) -> bool {
        self.position >= 1.0
    }
}

/// What the host should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Tick again after `after_ms`.
    Continue {
        /// Delay until the next tick.
        after_ms: u64,
    },
    /// The run is over; the completion callback has been invoked.
    Finished,
}

#[derive(Debug)]
struct Active {
    stage: usize,
    state: PlaybackState,
}

/// Per-run playback state machine, advanced by [`Playback::tick`].
///
/// Holds a cursor over the not-yet-reached stages and the set of active
/// interpolations. The clock origin is the first tick.
#[derive(Debug)]
pub struct Playback {
    targets: Vec<TargetId>,
    stages: Vec<Stage>,
    cursor: usize,
    active: Vec<Active>,
    origin_ms: Option<u64>,
    tick_interval_ms: u64,
    on_complete: Option<Callback>,
    finished: bool,
}

impl Playback {
    /// Prepare a run of `timeline` over `targets`.
    pub fn new(
        targets: Vec<TargetId>,
        timeline: Timeline,
        on_complete: Option<Callback>,
        tick_interval_ms: u64,
    ) -> Self {
        Self {
            targets,
            stages: timeline.into_stages(),
            cursor: 0,
            active: Vec::new(),
            origin_ms: None,
            tick_interval_ms: tick_interval_ms.max(1),
            on_complete,
            finished: false,
        }
    }

    /// Targets written by this run.
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// Number of interpolations currently in flight.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of stages not yet reached.
    pub fn pending_count(&self) -> usize {
        self.stages.len() - self.cursor
    }

    /// Return `true` once the run has completed or been stopped.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the run to clock reading `now_ms`.
    pub fn tick(&mut self, now_ms: u64, writer: &mut dyn PropertyWriter) -> Tick {
        if self.finished {
            return Tick::Finished;
        }
        let origin = *self.origin_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(origin);

        let mut due_callbacks = Vec::new();
        while let Some(stage) = self.stages.get(self.cursor) {
            if stage.start_ms > elapsed {
                break;
            }
            match &stage.action {
                StageAction::Marker { step, callbacks } => {
                    tracing::debug!(step, callbacks = callbacks.len(), "marker reached");
                    due_callbacks.extend(callbacks.iter().cloned());
                }
                StageAction::Set { property, value } => {
                    write_all(writer, &self.targets, property, value);
                }
                StageAction::Tween { property, .. } => {
                    tracing::debug!(
                        property = property.as_str(),
                        start_ms = stage.start_ms,
                        "tween started"
                    );
                    self.active.push(Active {
                        stage: self.cursor,
                        state: PlaybackState::new(origin.saturating_add(stage.start_ms)),
                    });
                }
            }
            self.cursor += 1;
        }

        for active in &mut self.active {
            let stage = &self.stages[active.stage];
            let StageAction::Tween {
                property,
                ease,
                deltas,
                settled,
            } = &stage.action
            else {
                continue;
            };
            let pos = active
                .state
                .step(now_ms, origin.saturating_add(stage.end_ms()));
            if pos >= 1.0 {
                write_all(writer, &self.targets, property, settled);
            } else {
                let value = compose(deltas, ease.apply(pos));
                write_all(writer, &self.targets, property, &value);
            }
        }
        self.active.retain(|a| !a.state.is_done());

        // Callbacks run after this tick's writes so values ending on the
        // same boundary are already in place.
        for cb in &due_callbacks {
            cb.call(&self.targets);
        }

        if !self.active.is_empty() {
            return Tick::Continue {
                after_ms: self.tick_interval_ms,
            };
        }
        if let Some(next) = self.stages.get(self.cursor) {
            let wake = origin.saturating_add(next.start_ms);
            return Tick::Continue {
                after_ms: wake.saturating_sub(now_ms),
            };
        }
        self.complete();
        Tick::Finished
    }

    /// Fast-forward the run to its end state and complete it.
    ///
    /// Active interpolations get their final value once; stages not yet
    /// reached write their final values without dispatching marker
    /// callbacks. A finished run is left untouched.
    pub fn stop(&mut self, writer: &mut dyn PropertyWriter) {
        if self.finished {
            return;
        }
        tracing::debug!(
            active = self.active.len(),
            pending = self.pending_count(),
            "stopping run"
        );
        for active in std::mem::take(&mut self.active) {
            let stage = &self.stages[active.stage];
            if let (Some(property), Some(value)) = (stage.property(), stage.final_value()) {
                write_all(writer, &self.targets, property, value);
            }
        }
        for stage in &self.stages[self.cursor..] {
            if let (Some(property), Some(value)) = (stage.property(), stage.final_value()) {
                write_all(writer, &self.targets, property, value);
            }
        }
        self.cursor = self.stages.len();
        self.complete();
    }

    fn complete(&mut self) {
        self.finished = true;
        tracing::debug!(targets = self.targets.len(), "run complete");
        if let Some(cb) = self.on_complete.take() {
            cb.call(&self.targets);
        }
    }
}

fn write_all(writer: &mut dyn PropertyWriter, targets: &[TargetId], property: &str, value: &str) {
    for target in targets {
        writer.write(target, property, value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
