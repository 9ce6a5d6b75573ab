//! styletween animates textual style properties over time.
//!
//! An animation is described as a loose argument list (targets, style
//! snapshots, durations, easings, callbacks). It is classified into an
//! instruction stream, compiled into a time-sorted [`Timeline`] of stages,
//! and played back by an adaptive tick-driven scheduler:
//!
//! - Build an [`Animation`] from [`Arg`]s
//! - Compile it into a [`Timeline`], or compose timelines with [`StageGraph`]
//! - Play it on a [`Runner`] that writes into any [`PropertyWriter`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Easing curves and the animation builder.
pub mod animation;
/// Argument classification, timeline compilation and stage graphs.
pub mod compile;
/// Errors, settings, clocks and shared types.
pub mod foundation;
/// Real-time playback.
pub mod playback;
/// JSON animation scripts.
pub mod script;
/// Style text parsing and value diffing.
pub mod style;

pub use crate::animation::builder::Animation;
pub use crate::animation::ease::{Curve, Ease, EaseSet, EasingTable, Variant};
pub use crate::compile::classify::{Arg, Classified, NoTargets, TargetResolver, classify};
pub use crate::compile::compiler::{CompileOptions, compile, compile_with};
pub use crate::compile::graph::StageGraph;
pub use crate::compile::instruction::{Callback, Instruction};
pub use crate::compile::stage::{Stage, StageAction, Timeline};
pub use crate::foundation::clock::{Clock, ManualClock, SystemClock};
pub use crate::foundation::config::Settings;
pub use crate::foundation::core::{MsRange, TargetId};
pub use crate::foundation::error::{TweenError, TweenResult};
pub use crate::playback::runner::{RunId, Runner};
pub use crate::playback::scheduler::{Playback, PlaybackState, Tick};
pub use crate::playback::target::{PropertyWriter, StyleSheet};
pub use crate::script::Script;
pub use crate::style::diff::{Diff, Formatter, ValueDelta, compose, diff_values};
pub use crate::style::parse::{StyleMap, parse_style_text};
