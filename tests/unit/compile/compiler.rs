use super::*;
use crate::animation::ease::{Curve, Variant};
use crate::style::parse::parse_style_text;

fn snap(text: &str) -> Instruction {
    Instruction::StyleSnapshot(parse_style_text(text))
}

fn spans(tl: &Timeline) -> Vec<(u64, u64, Option<&str>)> {
    tl.stages()
        .iter()
        .map(|s| (s.start_ms, s.duration_ms, s.property()))
        .collect()
}

fn assert_fence_posts(tl: &Timeline) {
    let stages = tl.stages();
    assert!(stages.windows(2).all(|w| w[0].start_ms <= w[1].start_ms));
    for (i, a) in stages.iter().enumerate() {
        for b in &stages[i + 1..] {
            if a.property().is_some() && a.property() == b.property() {
                assert!(!a.window().overlaps(b.window()), "{a:?} overlaps {b:?}");
            }
        }
    }
}

#[test]
fn two_snapshots_over_hint_make_one_tween() {
    let tl = compile(&[snap("opacity:0"), snap("opacity:1")], Some(1000)).unwrap();
    assert_eq!(tl.len(), 1);
    let stage = &tl.stages()[0];
    assert_eq!((stage.start_ms, stage.duration_ms), (0, 1000));
    let StageAction::Tween {
        property,
        ease,
        deltas,
        settled,
    } = &stage.action
    else {
        panic!("expected tween, got {stage:?}");
    };
    assert_eq!(property, "opacity");
    assert_eq!(*ease, Ease::DEFAULT);
    assert_eq!(settled, "1");
    assert_eq!(deltas.len(), 1);
    assert_eq!((deltas[0].start, deltas[0].delta), (0.0, 1.0));
}

#[test]
fn implicit_steps_use_default_length_without_hint() {
    let tl = compile(&[snap("w:0"), snap("w:100"), snap("w:50")], None).unwrap();
    assert_eq!(
        spans(&tl),
        vec![(0, 1000, Some("w")), (1000, 1000, Some("w"))]
    );
    assert_eq!(tl.length_ms(), 2000);
}

#[test]
fn hint_remainder_is_shared_by_implicit_steps() {
    let tl = compile(
        &[
            snap("w:0px"),
            Instruction::Duration(200),
            snap("w:100px"),
            snap("w:50px"),
        ],
        Some(1000),
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 200, Some("w")), (200, 800, Some("w"))]);
}

#[test]
fn hint_smaller_than_explicit_total_clamps_to_zero() {
    let tl = compile(
        &[
            snap("w:0"),
            Instruction::Duration(800),
            snap("w:1"),
            snap("w:2"),
        ],
        Some(500),
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 800, Some("w")), (800, 0, Some("w"))]);
}

#[test]
fn fully_explicit_durations_scale_to_hint() {
    let tl = compile(
        &[
            Instruction::Duration(100),
            snap("w:0"),
            Instruction::Duration(100),
            snap("w:10"),
            Instruction::Duration(200),
            snap("w:20"),
        ],
        Some(800),
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(200, 200, Some("w")), (400, 400, Some("w"))]);
}

#[test]
fn fully_explicit_durations_are_verbatim_without_hint() {
    let tl = compile(
        &[
            snap("w:0"),
            Instruction::Duration(250),
            snap("w:10"),
        ],
        None,
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 250, Some("w"))]);
}

#[test]
fn skipped_steps_are_spanned() {
    let tl = compile(&[snap("a:0; b:0"), snap("b:5"), snap("a:10")], None).unwrap();
    assert_eq!(
        spans(&tl),
        vec![(0, 1000, Some("b")), (0, 2000, Some("a"))]
    );
    assert_fence_posts(&tl);
}

#[test]
fn easing_is_taken_from_the_later_step() {
    let bounce = Ease::new(Curve::Bounce, Variant::Out);
    let tl = compile(
        &[
            snap("x:0"),
            Instruction::Easing(bounce),
            snap("x:1"),
            snap("x:2"),
        ],
        None,
    )
    .unwrap();
    let eases: Vec<_> = tl.stages().iter().map(Stage::ease).collect();
    assert_eq!(eases, vec![Some(bounce), Some(Ease::DEFAULT)]);
}

#[test]
fn token_mismatch_becomes_instant_literal() {
    let tl = compile(&[snap("border:1px solid"), snap("border:2px")], Some(400)).unwrap();
    assert_eq!(tl.len(), 1);
    let stage = &tl.stages()[0];
    assert_eq!(stage.duration_ms, 0);
    assert_eq!(stage.ease(), None);
    assert_eq!(stage.final_value(), Some("2px"));
}

#[test]
fn once_declared_properties_land_at_their_step_boundary() {
    let tl = compile(&[snap("x:0; y:red"), snap("x:1")], Some(600)).unwrap();
    let y = tl
        .stages()
        .iter()
        .find(|s| s.property() == Some("y"))
        .unwrap();
    assert_eq!((y.start_ms, y.duration_ms), (0, 0));
    assert!(matches!(&y.action, StageAction::Set { value, .. } if value == "red"));
}

#[test]
fn identical_first_pair_still_applies_value() {
    let tl = compile(&[snap("o:1"), snap("o:1"), snap("o:0")], None).unwrap();
    assert_eq!(
        spans(&tl),
        vec![(0, 0, Some("o")), (1000, 1000, Some("o"))]
    );
    assert_eq!(tl.stages()[0].final_value(), Some("1"));
}

#[test]
fn second_pending_duration_forces_a_boundary() {
    let tl = compile(
        &[
            snap("x:0"),
            Instruction::Duration(300),
            Instruction::Duration(200),
            snap("x:1"),
        ],
        None,
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 500, Some("x")), (300, 0, None)]);
    assert!(matches!(
        tl.stages()[1].action,
        StageAction::Marker { step: 1, .. }
    ));
}

#[test]
fn callback_without_pending_duration_closes_an_implicit_step() {
    let tl = compile(
        &[
            snap("x:0"),
            snap("x:1"),
            Instruction::Callback(Callback::labeled("done", |_| {})),
        ],
        None,
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 1000, Some("x")), (2000, 0, None)]);
    let StageAction::Marker { step, callbacks } = &tl.stages()[1].action else {
        panic!("expected marker");
    };
    assert_eq!(*step, 2);
    assert_eq!(callbacks.len(), 1);
    assert_eq!(callbacks[0].label(), Some("done"));
}

#[test]
fn callback_step_shares_the_hint_with_other_implicit_steps() {
    let tl = compile(
        &[
            snap("o:0"),
            snap("o:1"),
            Instruction::Callback(Callback::new(|_| {})),
        ],
        Some(1000),
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 500, Some("o")), (1000, 0, None)]);
    assert_eq!(tl.length_ms(), 1000);
}

#[test]
fn callback_with_pending_duration_attaches_to_next_step() {
    let tl = compile(
        &[
            snap("x:0"),
            Instruction::Duration(400),
            Instruction::Callback(Callback::new(|_| {})),
            snap("x:1"),
        ],
        None,
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 400, Some("x")), (400, 0, None)]);
}

#[test]
fn trailing_duration_synthesizes_a_delay_step() {
    let tl = compile(
        &[snap("x:0"), snap("x:1"), Instruction::Duration(500)],
        None,
    )
    .unwrap();
    assert_eq!(spans(&tl), vec![(0, 1000, Some("x")), (1500, 0, None)]);
    assert_eq!(tl.length_ms(), 1500);
}

#[test]
fn empty_streams_compile_to_nothing() {
    assert!(compile(&[], Some(100)).is_none());
    assert!(compile(&[Instruction::Easing(Ease::linear())], None).is_none());
}

#[test]
fn ties_keep_first_declaration_order() {
    let tl = compile(&[snap("b:0; a:0"), snap("a:1; b:1")], None).unwrap();
    let props: Vec<_> = tl.stages().iter().filter_map(Stage::property).collect();
    assert_eq!(props, vec!["b", "a"]);
}

#[test]
fn options_override_defaults() {
    let opts = CompileOptions {
        default_step_ms: 250,
        default_ease: Ease::linear(),
        precision: 2,
    };
    let tl = compile_with(&opts, &[snap("x:0"), snap("x:1")], None).unwrap();
    assert_eq!(spans(&tl), vec![(0, 250, Some("x"))]);
    assert_eq!(tl.stages()[0].ease(), Some(Ease::linear()));
}

#[test]
fn long_mixed_stream_stays_ordered_per_property() {
    let tl = compile(
        &[
            snap("left:0px; color:#000; opacity:0"),
            Instruction::Duration(300),
            snap("left:100px; color:#f00"),
            Instruction::Easing(Ease::linear()),
            snap("opacity:1; color:#00f"),
            Instruction::Callback(Callback::new(|_| {})),
            Instruction::Duration(100),
            snap("left:0px; opacity:0.5"),
        ],
        Some(2000),
    )
    .unwrap();
    assert_fence_posts(&tl);
    assert_eq!(tl.length_ms(), 2000);
}
