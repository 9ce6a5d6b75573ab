use std::path::Path;

use crate::{
    animation::ease::Ease,
    compile::compiler::CompileOptions,
    foundation::error::{TweenError, TweenResult},
};

/// Environment variable overriding [`Settings::tick_interval_ms`].
pub const ENV_TICK_MS: &str = "STYLETWEEN_TICK_MS";
/// Environment variable overriding [`Settings::start_delay_ms`].
pub const ENV_START_DELAY_MS: &str = "STYLETWEEN_START_DELAY_MS";
/// Environment variable overriding [`Settings::default_step_ms`].
pub const ENV_DEFAULT_STEP_MS: &str = "STYLETWEEN_DEFAULT_STEP_MS";
/// Environment variable overriding [`Settings::default_ease`].
pub const ENV_DEFAULT_EASE: &str = "STYLETWEEN_DEFAULT_EASE";

/// Runtime knobs for compilation and playback.
///
/// Sources, lowest to highest precedence: [`Default`], a JSON file
/// ([`Settings::from_json_path`]), environment overrides
/// ([`Settings::apply_env`]).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Delay between ticks while any interpolation is active.
    pub tick_interval_ms: u64,
    /// Delay between `play` and the first tick of a run.
    pub start_delay_ms: u64,
    /// Length of a step lacking an explicit duration when no hint is given.
    pub default_step_ms: u64,
    /// Easing used by steps that select none.
    pub default_ease: Ease,
    /// Fractional digits kept when rendering interpolated numbers.
    pub number_precision: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            start_delay_ms: 1,
            default_step_ms: 1000,
            default_ease: Ease::DEFAULT,
            number_precision: 4,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> TweenResult<Self> {
        let settings: Self = serde_json::from_str(text)
            .map_err(|e| TweenError::config(format!("parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file.
    pub fn from_json_path(path: &Path) -> TweenResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TweenError::config(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> TweenResult<Self> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    /// Apply `STYLETWEEN_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> TweenResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`, keyed by the `ENV_*`
    /// variable names. Unset keys leave the field untouched.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> TweenResult<()> {
        if let Some(v) = lookup(ENV_TICK_MS) {
            self.tick_interval_ms = parse_ms(ENV_TICK_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_START_DELAY_MS) {
            self.start_delay_ms = parse_ms(ENV_START_DELAY_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_DEFAULT_STEP_MS) {
            self.default_step_ms = parse_ms(ENV_DEFAULT_STEP_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_DEFAULT_EASE) {
            self.default_ease = v
                .trim()
                .parse()
                .map_err(|e| TweenError::config(format!("{ENV_DEFAULT_EASE}: {e}")))?;
        }
        self.validate()
    }

    /// Reject settings the scheduler cannot run with.
    pub fn validate(&self) -> TweenResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(TweenError::config("tick_interval_ms must be > 0"));
        }
        if self.number_precision > 12 {
            return Err(TweenError::config("number_precision must be <= 12"));
        }
        Ok(())
    }

    /// Compiler knobs derived from these settings.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            default_step_ms: self.default_step_ms,
            default_ease: self.default_ease,
            precision: self.number_precision,
        }
    }
}

fn parse_ms(key: &str, value: &str) -> TweenResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| TweenError::config(format!("{key}: expected milliseconds, got '{value}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
