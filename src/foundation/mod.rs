/// Time sources for playback.
pub mod clock;
/// Runtime settings and their sources.
pub mod config;
/// Shared identifier and window types.
pub mod core;
/// Error taxonomy.
pub mod error;
