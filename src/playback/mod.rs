/// Host loop driving live runs.
pub mod runner;
/// Per-run playback state machine.
pub mod scheduler;
/// Property sinks and the in-memory style sheet.
pub mod target;
