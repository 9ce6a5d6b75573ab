use super::*;
use crate::animation::ease::{Curve, Variant};

struct Known(&'static [&'static str]);

impl TargetResolver for Known {
    fn resolve(&self, ident: &str) -> Option<TargetId> {
        self.0.contains(&ident).then(|| TargetId::new(ident))
    }
}

fn kinds(c: &Classified) -> Vec<&'static str> {
    c.instructions
        .iter()
        .map(|i| match i {
            Instruction::StyleSnapshot(_) => "snapshot",
            Instruction::Duration(_) => "duration",
            Instruction::Easing(_) => "easing",
            Instruction::Callback(_) => "callback",
        })
        .collect()
}

#[test]
fn leading_number_is_the_hint() {
    let args: Vec<Arg> = vec!["box".into(), 500u64.into(), "w:0".into(), 200u64.into(), "w:10".into()];
    let c = classify(&args, &Known(&["box"])).unwrap();
    assert_eq!(c.targets, vec![TargetId::new("box")]);
    assert_eq!(c.duration_hint, Some(500));
    assert_eq!(kinds(&c), vec!["snapshot", "duration", "snapshot"]);
    assert!(matches!(c.instructions[1], Instruction::Duration(200)));
}

#[test]
fn numbers_after_a_snapshot_are_durations() {
    let args: Vec<Arg> = vec!["w:0".into(), 300u64.into(), "w:1".into()];
    let c = classify(&args, &NoTargets).unwrap();
    assert_eq!(c.duration_hint, None);
    assert_eq!(kinds(&c), vec!["snapshot", "duration", "snapshot"]);
}

#[test]
fn easing_and_callbacks_are_told_apart_by_tag() {
    let ease = Ease::new(Curve::Quad, Variant::Out);
    let args: Vec<Arg> = vec![
        ease.into(),
        "w:0".into(),
        Callback::new(|_| {}).into(),
        100u64.into(),
    ];
    let c = classify(&args, &NoTargets).unwrap();
    assert_eq!(kinds(&c), vec!["easing", "snapshot", "callback", "duration"]);
    assert!(matches!(c.instructions[0], Instruction::Easing(e) if e == ease));
    assert_eq!(c.duration_hint, None);
}

#[test]
fn nested_lists_are_flattened_in_order() {
    let args: Vec<Arg> = vec![
        Arg::from(vec!["a", "b"]),
        Arg::List(vec![250u64.into(), Arg::List(vec!["x:1".into()])]),
    ];
    let c = classify(&args, &Known(&["a", "b"])).unwrap();
    assert_eq!(c.targets.len(), 2);
    assert_eq!(c.duration_hint, Some(250));
    assert_eq!(kinds(&c), vec!["snapshot"]);
}

#[test]
fn duplicate_targets_are_kept_once() {
    let args: Vec<Arg> = vec!["a".into(), TargetId::new("a").into(), "a".into()];
    let c = classify(&args, &Known(&["a"])).unwrap();
    assert_eq!(c.targets, vec![TargetId::new("a")]);
    assert!(c.instructions.is_empty());
}

#[test]
fn empty_text_is_ignored() {
    let args: Vec<Arg> = vec!["".into(), "  ".into(), 100u64.into()];
    let c = classify(&args, &NoTargets).unwrap();
    assert!(c.instructions.is_empty());
    assert_eq!(c.duration_hint, Some(100));
}

#[test]
fn negative_or_non_finite_numbers_are_rejected() {
    assert!(matches!(
        classify(&[Arg::Number(-1.0)], &NoTargets),
        Err(TweenError::Validation(_))
    ));
    assert!(classify(&[Arg::Number(f64::NAN)], &NoTargets).is_err());
}

#[test]
fn fractional_milliseconds_round() {
    let c = classify(&[Arg::Number(99.6)], &NoTargets).unwrap();
    assert_eq!(c.duration_hint, Some(100));
}
