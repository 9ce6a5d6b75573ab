//! JSON animation scripts for the `styletween` binary.
//!
//! ```json
//! { "targets": ["box"], "args": [500, "width: 10px", {"ease": "bounce.out"}, "width: 90px", {"log": "done"}] }
//! ```
//!
//! Each arg is a number, style text (or a target name), an easing
//! selector object, a log callback object, or a nested array.

use std::path::Path;

use crate::{
    animation::{builder::Animation, ease::EasingTable},
    compile::{
        classify::{Arg, TargetResolver},
        instruction::Callback,
    },
    foundation::{
        core::TargetId,
        error::{TweenError, TweenResult},
    },
};

/// Decoded animation script.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Targets animated by the script.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Loosely-typed arguments, classified like caller arguments.
    #[serde(default)]
    pub args: Vec<ScriptArg>,
}

/// One script argument.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum ScriptArg {
    /// Duration hint or step duration in milliseconds.
    Number(f64),
    /// Style text or target name.
    Text(String),
    /// `{"ease": "name.variant"}`.
    Ease(EaseArg),
    /// `{"log": "message"}`.
    Log(LogArg),
    /// Nested arguments.
    List(Vec<ScriptArg>),
}

/// Easing selector object.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EaseArg {
    /// Selector resolved against the easing table.
    pub ease: String,
}

/// Callback that logs a message when its step is reached.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogArg {
    /// Message logged at `info` level.
    pub log: String,
}

impl Script {
    /// Decode a script from JSON text.
    pub fn from_json_str(text: &str) -> TweenResult<Self> {
        serde_json::from_str(text).map_err(|e| TweenError::script(format!("parse script: {e}")))
    }

    /// Read and decode a script file.
    pub fn from_json_path(path: &Path) -> TweenResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TweenError::script(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Lower the script into classifier arguments.
    pub fn to_args(&self, table: &EasingTable) -> TweenResult<Vec<Arg>> {
        let mut out: Vec<Arg> = self
            .targets
            .iter()
            .map(|t| Arg::Target(TargetId::new(t.as_str())))
            .collect();
        for arg in &self.args {
            out.push(lower(arg, table)?);
        }
        Ok(out)
    }

    /// Build an [`Animation`] from the script.
    pub fn animation(
        &self,
        table: &EasingTable,
        resolver: &dyn TargetResolver,
    ) -> TweenResult<Animation> {
        Animation::new().with(&self.to_args(table)?, resolver)
    }
}

fn lower(arg: &ScriptArg, table: &EasingTable) -> TweenResult<Arg> {
    Ok(match arg {
        ScriptArg::Number(v) => Arg::Number(*v),
        ScriptArg::Text(s) => Arg::Text(s.clone()),
        ScriptArg::Ease(e) => Arg::Ease(table.resolve(&e.ease)?),
        ScriptArg::Log(l) => {
            let message = l.log.clone();
            Arg::Callback(Callback::labeled(l.log.clone(), move |targets| {
                tracing::info!(?targets, "{message}");
            }))
        }
        ScriptArg::List(items) => Arg::List(
            items
                .iter()
                .map(|a| lower(a, table))
                .collect::<TweenResult<_>>()?,
        ),
    })
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
