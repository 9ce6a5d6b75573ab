use crate::{
    compile::{
        classify::{Arg, TargetResolver, classify},
        compiler::{CompileOptions, compile_with},
        instruction::{Callback, Instruction},
        stage::Timeline,
    },
    foundation::{clock::Clock, core::TargetId, error::TweenResult},
    playback::{
        runner::{RunId, Runner},
        target::PropertyWriter,
    },
};

/// An animation assembled across several calls.
///
/// Every [`Animation::with`] returns a new value and leaves the receiver
/// untouched, so a partial animation works as a template. Nothing is
/// compiled until [`Animation::compile`] or [`Animation::play_on`].
#[derive(Clone, Debug, Default)]
pub struct Animation {
    targets: Vec<TargetId>,
    instructions: Vec<Instruction>,
    duration_hint: Option<u64>,
}

impl Animation {
    /// Empty animation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `args` and append them.
    ///
    /// New targets are appended without duplicates; a duration hint in
    /// `args` replaces the current one.
    pub fn with(&self, args: &[Arg], resolver: &dyn TargetResolver) -> TweenResult<Self> {
        let classified = classify(args, resolver)?;
        let mut next = self.clone();
        for target in classified.targets {
            if !next.targets.contains(&target) {
                next.targets.push(target);
            }
        }
        next.instructions.extend(classified.instructions);
        if classified.duration_hint.is_some() {
            next.duration_hint = classified.duration_hint;
        }
        Ok(next)
    }

    /// Targets gathered so far.
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// Instruction stream gathered so far.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Current total-duration hint.
    pub fn duration_hint(&self) -> Option<u64> {
        self.duration_hint
    }

    /// Compile the accumulated stream. `None` when it yields no steps.
    pub fn compile(&self, opts: &CompileOptions) -> Option<Timeline> {
        compile_with(opts, &self.instructions, self.duration_hint)
    }

    /// Compile with the runner's settings and register a run.
    ///
    /// An animation that compiles to nothing is not played and
    /// `on_complete` is dropped.
    pub fn play_on<W: PropertyWriter, C: Clock>(
        &self,
        runner: &mut Runner<W, C>,
        on_complete: Option<Callback>,
    ) -> Option<RunId> {
        let timeline = self.compile(&runner.settings().compile_options())?;
        Some(runner.play(self.targets.clone(), timeline, on_complete))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/builder.rs"]
mod tests;
