use crate::{
    animation::ease::Ease,
    compile::instruction::{Callback, Instruction},
    foundation::{
        core::TargetId,
        error::{TweenError, TweenResult},
    },
    style::parse::parse_style_text,
};

/// A loosely-typed caller argument, before classification.
#[derive(Clone, Debug)]
pub enum Arg {
    /// Duration hint or step duration, in milliseconds.
    Number(f64),
    /// Target identifier or style text.
    Text(String),
    /// Easing selector.
    Ease(Ease),
    /// Step callback.
    Callback(Callback),
    /// Already-resolved target.
    Target(TargetId),
    /// Nested arguments, flattened in order.
    List(Vec<Arg>),
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<u64> for Arg {
    fn from(v: u64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Ease> for Arg {
    fn from(v: Ease) -> Self {
        Self::Ease(v)
    }
}

impl From<Callback> for Arg {
    fn from(v: Callback) -> Self {
        Self::Callback(v)
    }
}

impl From<TargetId> for Arg {
    fn from(v: TargetId) -> Self {
        Self::Target(v)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// Maps a textual identifier to a style-bearing target.
pub trait TargetResolver {
    /// Return the target named by `ident`, or `None` when the text is not a
    /// known target (it is then treated as style text).
    fn resolve(&self, ident: &str) -> Option<TargetId>;
}

/// Resolver that knows no targets; every text argument is style text.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTargets;

impl TargetResolver for NoTargets {
    fn resolve(&self, _ident: &str) -> Option<TargetId> {
        None
    }
}

/// Typed output of [`classify`].
#[derive(Clone, Debug, Default)]
pub struct Classified {
    /// Targets in first-mention order, without duplicates.
    pub targets: Vec<TargetId>,
    /// Instruction stream for the compiler.
    pub instructions: Vec<Instruction>,
    /// Total-duration hint, if one was given.
    pub duration_hint: Option<u64>,
}

/// Sort caller arguments into targets, a duration hint and instructions.
///
/// A number seen before any snapshot, easing or callback is the duration
/// hint; later numbers are step durations.
#[tracing::instrument(skip_all, fields(args = args.len()))]
pub fn classify(args: &[Arg], resolver: &dyn TargetResolver) -> TweenResult<Classified> {
    let mut state = ClassifyState {
        out: Classified::default(),
        started: false,
    };
    for arg in args {
        state.visit(arg, resolver)?;
    }
    tracing::debug!(
        targets = state.out.targets.len(),
        instructions = state.out.instructions.len(),
        hint = ?state.out.duration_hint,
        "classified arguments"
    );
    Ok(state.out)
}

struct ClassifyState {
    out: Classified,
    started: bool,
}

impl ClassifyState {
    fn visit(&mut self, arg: &Arg, resolver: &dyn TargetResolver) -> TweenResult<()> {
        match arg {
            Arg::List(items) => {
                for item in items {
                    self.visit(item, resolver)?;
                }
            }
            Arg::Number(v) => {
                let ms = to_millis(*v)?;
                if self.started {
                    self.out.instructions.push(Instruction::Duration(ms));
                } else {
                    self.out.duration_hint = Some(ms);
                    self.started = true;
                }
            }
            Arg::Text(text) => {
                if text.trim().is_empty() {
                    return Ok(());
                }
                match resolver.resolve(text) {
                    Some(target) => self.add_target(target),
                    None => {
                        self.out
                            .instructions
                            .push(Instruction::StyleSnapshot(parse_style_text(text)));
                        self.started = true;
                    }
                }
            }
            Arg::Target(target) => self.add_target(target.clone()),
            Arg::Ease(ease) => {
                self.out.instructions.push(Instruction::Easing(*ease));
                self.started = true;
            }
            Arg::Callback(cb) => {
                self.out.instructions.push(Instruction::Callback(cb.clone()));
                self.started = true;
            }
        }
        Ok(())
    }

    fn add_target(&mut self, target: TargetId) {
        if !self.out.targets.contains(&target) {
            self.out.targets.push(target);
        }
    }
}

fn to_millis(v: f64) -> TweenResult<u64> {
    if !v.is_finite() || v < 0.0 {
        return Err(TweenError::validation(format!(
            "duration must be a finite, non-negative number of milliseconds, got {v}"
        )));
    }
    Ok(v.round() as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/classify.rs"]
mod tests;
