use std::collections::BTreeMap;
use std::fmt;

use crate::{
    compile::{instruction::Callback, stage::Timeline},
    foundation::{
        clock::{Clock, SystemClock},
        config::Settings,
        core::TargetId,
    },
    playback::{
        scheduler::{Playback, Tick},
        target::PropertyWriter,
    },
};

/// Handle of a run registered with a [`Runner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

#[derive(Debug)]
struct Scheduled {
    playback: Playback,
    due_ms: u64,
}

/// Single-threaded host loop owning a writer, a clock and every live run.
///
/// Runs are independent; runs animating the same property on the same
/// target overwrite each other, last write per tick wins.
pub struct Runner<W, C = SystemClock> {
    writer: W,
    clock: C,
    settings: Settings,
    runs: BTreeMap<RunId, Scheduled>,
    next_id: u64,
}

impl<W: PropertyWriter> Runner<W, SystemClock> {
    /// Runner on the wall clock.
    pub fn new(writer: W, settings: Settings) -> Self {
        Self::with_clock(writer, SystemClock::new(), settings)
    }
}

impl<W: PropertyWriter, C: Clock> Runner<W, C> {
    /// Runner on an explicit clock.
    pub fn with_clock(writer: W, clock: C, settings: Settings) -> Self {
        Self {
            writer,
            clock,
            settings,
            runs: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Settings the runner was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The clock driving playback.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The property sink.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Mutable access to the property sink.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the runner, returning its sink.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Return `true` when no run is live.
    pub fn is_idle(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of live runs.
    pub fn live_runs(&self) -> usize {
        self.runs.len()
    }

    /// Register a run. Its first tick is deferred by `start_delay_ms`.
    pub fn play(
        &mut self,
        targets: Vec<TargetId>,
        timeline: Timeline,
        on_complete: Option<Callback>,
    ) -> RunId {
        let id = RunId(self.next_id);
        self.next_id += 1;
        let due_ms = self
            .clock
            .now_ms()
            .saturating_add(self.settings.start_delay_ms);
        tracing::debug!(
            run = %id,
            targets = targets.len(),
            stages = timeline.len(),
            due_ms,
            "run scheduled"
        );
        let playback = Playback::new(
            targets,
            timeline,
            on_complete,
            self.settings.tick_interval_ms,
        );
        self.runs.insert(id, Scheduled { playback, due_ms });
        id
    }

    /// Stop a live run, fast-forwarding it to its end state.
    ///
    /// Returns `false` when the run already finished or is unknown.
    pub fn stop(&mut self, id: RunId) -> bool {
        match self.runs.remove(&id) {
            Some(mut run) => {
                tracing::debug!(run = %id, "stop requested");
                run.playback.stop(&mut self.writer);
                true
            }
            None => false,
        }
    }

    /// Tick every run that is due.
    ///
    /// Returns the delay until the next wake-up, or `None` once idle.
    pub fn poll(&mut self) -> Option<u64> {
        let now = self.clock.now_ms();
        let mut finished = Vec::new();
        for (id, run) in &mut self.runs {
            if run.due_ms > now {
                continue;
            }
            match run.playback.tick(now, &mut self.writer) {
                Tick::Continue { after_ms } => run.due_ms = now.saturating_add(after_ms),
                Tick::Finished => finished.push(*id),
            }
        }
        for id in finished {
            tracing::debug!(run = %id, "run finished");
            self.runs.remove(&id);
        }
        self.runs
            .values()
            .map(|r| r.due_ms.saturating_sub(now))
            .min()
    }

    /// Drive every run to completion, sleeping on the clock between ticks.
    pub fn run_until_idle(&mut self) {
        while let Some(wait) = self.poll() {
            self.clock.sleep_ms(wait);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/runner.rs"]
mod tests;
