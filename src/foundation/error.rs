/// Convenience result type used across styletween.
pub type TweenResult<T> = Result<T, TweenError>;

/// Top-level error taxonomy used at the crate's edges.
///
/// Compilation, diffing and playback never fail; they degrade. These
/// variants cover the surfaces that take untrusted input: easing names,
/// settings, scripts and argument classification.
#[derive(thiserror::Error, Debug)]
pub enum TweenError {
    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown or malformed easing selector.
    #[error("easing error: {0}")]
    Easing(String),

    /// Malformed animation script.
    #[error("script error: {0}")]
    Script(String),

    /// Invalid or unreadable settings.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TweenError {
    /// Build a [`TweenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TweenError::Easing`] value.
    pub fn easing(msg: impl Into<String>) -> Self {
        Self::Easing(msg.into())
    }

    /// Build a [`TweenError::Script`] value.
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Build a [`TweenError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TweenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
