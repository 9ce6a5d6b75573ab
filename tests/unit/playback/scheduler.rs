use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::compile::{compiler::compile, instruction::Instruction};
use crate::style::parse::parse_style_text;

#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, line: impl Into<String>) {
        self.0.lock().unwrap().push(line.into());
    }

    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl PropertyWriter for Log {
    fn write(&mut self, target: &TargetId, property: &str, value: &str) {
        self.push(format!("{target}.{property}={value}"));
    }
}

fn snap(text: &str) -> Instruction {
    Instruction::StyleSnapshot(parse_style_text(text))
}

fn counter() -> (Arc<AtomicUsize>, Callback) {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    (
        hits,
        Callback::new(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

fn boxed(timeline: Timeline, on_complete: Option<Callback>) -> Playback {
    Playback::new(vec![TargetId::new("box")], timeline, on_complete, 10)
}

#[test]
fn width_tween_hits_midpoint_and_end() {
    let tl = compile(&[snap("width:100px"), snap("width:200px")], Some(500)).unwrap();
    let mut run = boxed(tl, None);
    let mut log = Log::default();

    assert_eq!(run.tick(1000, &mut log), Tick::Continue { after_ms: 10 });
    assert_eq!(run.tick(1250, &mut log), Tick::Continue { after_ms: 10 });
    assert_eq!(run.tick(1500, &mut log), Tick::Finished);
    assert_eq!(
        log.lines(),
        vec!["box.width=100px", "box.width=150px", "box.width=200px"]
    );
    assert!(run.is_finished());
}

#[test]
fn stepper_lands_on_one_at_the_nominal_end() {
    let mut state = PlaybackState::new(0);
    let mut last = 0.0;
    for now in [3u64, 4, 40, 41, 42, 60] {
        let pos = state.step(now, 100);
        assert!(pos >= last && pos < 1.0, "pos {pos} at {now}");
        last = pos;
    }
    assert_eq!(state.step(100, 100), 1.0);
    assert!(state.is_done());
    assert_eq!(state.frame_count, 7);
}

#[test]
fn steady_ticks_advance_evenly() {
    let mut state = PlaybackState::new(0);
    for k in 1..=8u64 {
        let pos = state.step(k * 10, 100);
        assert!((pos - k as f64 / 9.0).abs() < 1e-12, "k={k} pos={pos}");
    }
}

#[test]
fn first_step_scales_with_elapsed_time() {
    let mut state = PlaybackState::new(0);
    assert_eq!(state.step(0, 100), 0.0);
    let pos = state.step(20, 100);
    assert!((pos - 0.125).abs() < 1e-12, "pos={pos}");
    assert_eq!(state.step(150, 100), 1.0);
}

#[test]
fn idle_gaps_sleep_until_the_next_stage() {
    let tl = Timeline::from_stages(vec![Stage {
        start_ms: 200,
        duration_ms: 0,
        action: StageAction::Set {
            property: "color".into(),
            value: "red".into(),
        },
    }]);
    let mut run = boxed(tl, None);
    let mut log = Log::default();

    assert_eq!(run.tick(50, &mut log), Tick::Continue { after_ms: 200 });
    assert_eq!(run.tick(120, &mut log), Tick::Continue { after_ms: 130 });
    assert!(log.lines().is_empty());
    assert_eq!(run.tick(250, &mut log), Tick::Finished);
    assert_eq!(log.lines(), vec!["box.color=red"]);
}

#[test]
fn marker_callbacks_run_after_same_tick_writes() {
    let log = Log::default();
    let cb_log = log.clone();
    let tl = compile(
        &[
            snap("x:0"),
            snap("x:10"),
            Instruction::Callback(Callback::new(move |targets| {
                cb_log.push(format!("callback({})", targets.len()));
            })),
        ],
        Some(100),
    )
    .unwrap();
    let mut run = boxed(tl, None);
    let mut writer = log.clone();

    run.tick(0, &mut writer);
    assert_eq!(run.tick(100, &mut writer), Tick::Finished);
    let lines = log.lines();
    assert_eq!(&lines[lines.len() - 2..], ["box.x=10", "callback(1)"]);
}

#[test]
fn completion_fires_exactly_once() {
    let (hits, done) = counter();
    let tl = compile(&[snap("o:0"), snap("o:1")], Some(20)).unwrap();
    let mut run = boxed(tl, Some(done));
    let mut log = Log::default();

    run.tick(0, &mut log);
    assert_eq!(run.tick(20, &mut log), Tick::Finished);
    assert_eq!(run.tick(30, &mut log), Tick::Finished);
    run.stop(&mut log);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_fast_forwards_without_marker_callbacks() {
    let (marker_hits, marker) = counter();
    let (done_hits, done) = counter();
    let tl = compile(
        &[
            snap("w:0px; h:0px"),
            Instruction::Duration(100),
            snap("w:100px"),
            Instruction::Callback(marker),
            Instruction::Duration(100),
            snap("h:50px"),
        ],
        None,
    )
    .unwrap();
    let mut run = boxed(tl, Some(done));
    let mut log = Log::default();

    run.tick(0, &mut log);
    run.tick(50, &mut log);
    assert_eq!(run.active_count(), 2);
    let before = log.lines().len();

    run.stop(&mut log);
    let tail: Vec<_> = log.lines().split_off(before);
    assert_eq!(tail, vec!["box.w=100px", "box.h=50px"]);
    assert_eq!(marker_hits.load(Ordering::SeqCst), 0);
    assert_eq!(done_hits.load(Ordering::SeqCst), 1);
    assert_eq!(run.pending_count(), 0);

    run.stop(&mut log);
    assert_eq!(done_hits.load(Ordering::SeqCst), 1);
    assert_eq!(log.lines().len(), before + 2);
}

#[test]
fn stop_before_first_tick_applies_final_state() {
    let tl = compile(&[snap("o:0"), snap("o:1"), snap("o:0.5")], None).unwrap();
    let mut run = boxed(tl, None);
    let mut log = Log::default();
    run.stop(&mut log);
    assert_eq!(log.lines(), vec!["box.o=1", "box.o=0.5"]);
    assert!(run.is_finished());
}

#[test]
fn every_target_receives_each_write() {
    let tl = compile(&[snap("o:0"), snap("o:1")], Some(10)).unwrap();
    let mut run = Playback::new(
        vec![TargetId::new("a"), TargetId::new("b")],
        tl,
        None,
        10,
    );
    let mut log = Log::default();
    run.tick(0, &mut log);
    assert_eq!(log.lines(), vec!["a.o=0", "b.o=0"]);
    assert_eq!(run.targets().len(), 2);
}
