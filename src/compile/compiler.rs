use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    compile::{
        instruction::{Callback, Instruction},
        stage::{Stage, StageAction, Timeline},
    },
    style::{
        diff::{Diff, diff_values},
        parse::StyleMap,
    },
};

/// Knobs consumed by [`compile_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompileOptions {
    /// Length given to each step lacking an explicit duration when no
    /// total-duration hint is supplied.
    pub default_step_ms: u64,
    /// Easing used by steps that select none.
    pub default_ease: Ease,
    /// Fractional digits kept when rendering interpolated numbers.
    pub precision: u8,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_step_ms: 1000,
            default_ease: Ease::DEFAULT,
            precision: 4,
        }
    }
}

/// Compile an instruction stream with default options.
pub fn compile(instructions: &[Instruction], duration_hint: Option<u64>) -> Option<Timeline> {
    compile_with(&CompileOptions::default(), instructions, duration_hint)
}

/// Compile an instruction stream into a sorted [`Timeline`].
///
/// Returns `None` when the stream yields no steps at all.
#[tracing::instrument(skip(opts, instructions), fields(instructions = instructions.len()))]
pub fn compile_with(
    opts: &CompileOptions,
    instructions: &[Instruction],
    duration_hint: Option<u64>,
) -> Option<Timeline> {
    let mut composer = Composer::new(opts);
    for instruction in instructions {
        composer.feed(instruction);
    }
    composer.finish();

    if composer.steps.is_empty() {
        tracing::debug!("no steps, nothing to compile");
        return None;
    }

    let starts = composer.step_starts(duration_hint);
    let stages = composer.build_stages(&starts);
    tracing::debug!(
        steps = composer.steps.len(),
        stages = stages.len(),
        length_ms = starts.last().copied().unwrap_or(0),
        "compiled timeline"
    );
    Some(Timeline::from_stages(stages))
}

struct StepRecord {
    duration: Option<u64>,
    ease: Ease,
    callbacks: Vec<Callback>,
    has_properties: bool,
}

struct Declared {
    step: usize,
    text: String,
}

struct PropertyState {
    key: String,
    values: Vec<Declared>,
}

struct Composer<'o> {
    opts: &'o CompileOptions,
    steps: Vec<StepRecord>,
    props: Vec<PropertyState>,
    prop_index: BTreeMap<String, usize>,
    pending_ms: Option<u64>,
    pending_ease: Option<Ease>,
    pending_callbacks: Vec<Callback>,
}

impl<'o> Composer<'o> {
    fn new(opts: &'o CompileOptions) -> Self {
        Self {
            opts,
            steps: Vec::new(),
            props: Vec::new(),
            prop_index: BTreeMap::new(),
            pending_ms: None,
            pending_ease: None,
            pending_callbacks: Vec::new(),
        }
    }

    fn feed(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::StyleSnapshot(snapshot) => self.close_step(Some(snapshot)),
            Instruction::Duration(ms) => {
                if self.pending_ms.is_some() {
                    self.close_step(None);
                }
                self.pending_ms = Some(*ms);
            }
            Instruction::Easing(ease) => self.pending_ease = Some(*ease),
            Instruction::Callback(cb) => {
                self.pending_callbacks.push(cb.clone());
                // Without a pending duration the callback closes a step of
                // its own, sized like any other implicit step.
                if self.pending_ms.is_none() {
                    self.close_step(None);
                }
            }
        }
    }

    fn finish(&mut self) {
        if self.pending_ms.is_some() || !self.pending_callbacks.is_empty() {
            self.close_step(None);
        }
    }

    fn close_step(&mut self, snapshot: Option<&StyleMap>) {
        let step = self.steps.len();
        let mut has_properties = false;
        for (key, text) in snapshot.into_iter().flatten() {
            has_properties = true;
            let idx = match self.prop_index.get(key) {
                Some(&idx) => idx,
                None => {
                    self.props.push(PropertyState {
                        key: key.to_owned(),
                        values: Vec::new(),
                    });
                    self.prop_index.insert(key.to_owned(), self.props.len() - 1);
                    self.props.len() - 1
                }
            };
            self.props[idx].values.push(Declared {
                step,
                text: text.to_owned(),
            });
        }

        self.steps.push(StepRecord {
            duration: self.pending_ms.take(),
            ease: self.pending_ease.take().unwrap_or(self.opts.default_ease),
            callbacks: std::mem::take(&mut self.pending_callbacks),
            has_properties,
        });
    }

    /// Absolute start offset of every step, plus the total length as the
    /// final entry. Step `i` occupies `[starts[i], starts[i + 1])`.
    fn step_starts(&self, duration_hint: Option<u64>) -> Vec<u64> {
        let explicit: u64 = self.steps.iter().filter_map(|s| s.duration).sum();
        let implicit = self
            .steps
            .iter()
            .enumerate()
            .filter(|(i, s)| *i > 0 && s.duration.is_none())
            .count();

        let times: Vec<u64> = if implicit > 0 {
            let share = match duration_hint {
                Some(hint) => {
                    ((hint as f64 - explicit as f64) / implicit as f64)
                        .round()
                        .max(0.0) as u64
                }
                None => self.opts.default_step_ms,
            };
            self.steps
                .iter()
                .enumerate()
                .map(|(i, s)| s.duration.unwrap_or(if i == 0 { 0 } else { share }))
                .collect()
        } else {
            let scale = match duration_hint {
                Some(hint) if explicit > 0 => hint as f64 / explicit as f64,
                _ => 1.0,
            };
            self.steps
                .iter()
                .map(|s| s.duration.map_or(0, |t| (t as f64 * scale).round() as u64))
                .collect()
        };

        let mut starts = Vec::with_capacity(times.len() + 1);
        starts.push(0u64);
        for t in times {
            let last = starts[starts.len() - 1];
            starts.push(last.saturating_add(t));
        }
        starts
    }

    fn build_stages(&self, starts: &[u64]) -> Vec<Stage> {
        let mut stages = Vec::new();

        for prop in &self.props {
            if let [only] = prop.values.as_slice() {
                stages.push(Stage {
                    start_ms: starts[only.step + 1],
                    duration_ms: 0,
                    action: StageAction::Set {
                        property: prop.key.clone(),
                        value: only.text.clone(),
                    },
                });
                continue;
            }

            for (pair, w) in prop.values.windows(2).enumerate() {
                let (before, after) = (&w[0], &w[1]);
                let start_ms = starts[before.step + 1];
                let span_ms = starts[after.step + 1] - start_ms;

                match diff_values(&before.text, &after.text, self.opts.precision) {
                    Diff::Identical => {
                        // The first declared value still has to land once.
                        if pair == 0 {
                            stages.push(Stage {
                                start_ms,
                                duration_ms: 0,
                                action: StageAction::Set {
                                    property: prop.key.clone(),
                                    value: before.text.clone(),
                                },
                            });
                        }
                    }
                    Diff::Literal(value) => stages.push(Stage {
                        start_ms,
                        duration_ms: 0,
                        action: StageAction::Set {
                            property: prop.key.clone(),
                            value,
                        },
                    }),
                    Diff::Interpolate(deltas) => stages.push(Stage {
                        start_ms,
                        duration_ms: span_ms,
                        action: StageAction::Tween {
                            property: prop.key.clone(),
                            ease: self.steps[after.step].ease,
                            deltas,
                            settled: after.text.clone(),
                        },
                    }),
                }
            }
        }

        for (i, step) in self.steps.iter().enumerate() {
            if step.has_properties && step.callbacks.is_empty() {
                continue;
            }
            stages.push(Stage {
                start_ms: starts[i + 1],
                duration_ms: 0,
                action: StageAction::Marker {
                    step: i,
                    callbacks: step.callbacks.clone(),
                },
            });
        }

        stages
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
