use std::sync::OnceLock;

use regex::Regex;

use crate::style::parse::canonical_hex;

/// How an interpolated number is rendered back into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatter {
    /// Decimal number rounded to `precision` fractional digits, trailing
    /// zeros dropped (`150`, `0.25`, `-3.5`).
    Number {
        /// Fractional digits kept.
        precision: u8,
    },
    /// One colour channel as two lower-case hex digits, clamped to `[0, 255]`.
    HexByte,
}

impl Formatter {
    /// Render `v` as text.
    pub fn format(self, v: f64) -> String {
        match self {
            Self::Number { precision } => {
                let scale = 10f64.powi(i32::from(precision));
                let rounded = (v * scale).round() / scale;
                // Avoid printing "-0".
                let rounded = if rounded == 0.0 { 0.0 } else { rounded };
                format!("{rounded}")
            }
            Self::HexByte => {
                let byte = v.round().clamp(0.0, 255.0) as u8;
                format!("{byte:02x}")
            }
        }
    }
}

/// One interpolatable component of a property value.
///
/// Rendering is `prefix + formatter(start + y * delta) + postfix`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ValueDelta {
    /// Literal text emitted before the number.
    pub prefix: String,
    /// Literal text emitted after the number.
    pub postfix: String,
    /// Value at eased progress 0.
    pub start: f64,
    /// Change between eased progress 0 and 1.
    pub delta: f64,
    /// Number → text conversion.
    pub formatter: Formatter,
}

impl ValueDelta {
    /// Append this component at eased progress `y` to `out`.
    pub fn render_into(&self, y: f64, out: &mut String) {
        out.push_str(&self.prefix);
        out.push_str(&self.formatter.format(self.start + y * self.delta));
        out.push_str(&self.postfix);
    }
}

/// Compose a full property value from its components at eased progress `y`.
pub fn compose(deltas: &[ValueDelta], y: f64) -> String {
    let mut out = String::new();
    for d in deltas {
        d.render_into(y, &mut out);
    }
    out
}

/// Result of comparing two textual property values.
#[derive(Clone, Debug, PartialEq)]
pub enum Diff {
    /// Both sides are textually identical; no transition is needed.
    Identical,
    /// No componentwise pairing exists; swap to this text instantly.
    Literal(String),
    /// Componentwise interpolation, in component order.
    Interpolate(Vec<ValueDelta>),
}

struct NumericParts<'a> {
    prefix: &'a str,
    value: f64,
    suffix: &'a str,
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*?)(-?(?:\d+(?:\.\d*)?|\.\d+))(.*)$").expect("static pattern")
    })
}

/// Whitespace-separated components, with hex colours in canonical form.
fn tokens(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .map(|t| canonical_hex(t).unwrap_or_else(|| t.to_owned()))
        .collect()
}

fn split_numeric(token: &str) -> Option<NumericParts<'_>> {
    let caps = numeric_re().captures(token)?;
    let value = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(NumericParts {
        prefix: caps.get(1).map_or("", |m| m.as_str()),
        value,
        suffix: caps.get(3).map_or("", |m| m.as_str()),
    })
}

/// Compare two property values component by component.
///
/// Components are whitespace-separated tokens, compared after hex colours
/// are canonicalized. A differing pair of hex colours yields one delta per
/// differing channel; a differing pair of numeric tokens yields one delta.
/// Other differing tokens cannot be interpolated and keep their `from` text
/// while the transition runs. If nothing interpolatable remains, or the token
/// counts differ, the result is a [`Diff::Literal`] swap to `to`.
pub fn diff_values(from: &str, to: &str, precision: u8) -> Diff {
    let fa = tokens(from);
    let ta = tokens(to);
    if fa == ta {
        return Diff::Identical;
    }
    if fa.len() != ta.len() {
        return Diff::Literal(ta.join(" "));
    }

    let number = Formatter::Number { precision };
    let mut deltas = Vec::<ValueDelta>::new();
    let mut pending = String::new();

    for (i, (f, t)) in fa.iter().zip(&ta).enumerate() {
        let (f, t) = (f.as_str(), t.as_str());
        if i > 0 {
            pending.push(' ');
        }
        if f == t {
            pending.push_str(f);
            continue;
        }

        if let (Some(fh), Some(th)) = (canonical_hex(f), canonical_hex(t)) {
            pending.push('#');
            for k in [1, 3, 5] {
                let fc = &fh[k..k + 2];
                let tc = &th[k..k + 2];
                if fc == tc {
                    pending.push_str(fc);
                    continue;
                }
                let (Ok(a), Ok(b)) = (u8::from_str_radix(fc, 16), u8::from_str_radix(tc, 16))
                else {
                    pending.push_str(fc);
                    continue;
                };
                deltas.push(ValueDelta {
                    prefix: std::mem::take(&mut pending),
                    postfix: String::new(),
                    start: f64::from(a),
                    delta: f64::from(b) - f64::from(a),
                    formatter: Formatter::HexByte,
                });
            }
            continue;
        }

        match (split_numeric(f), split_numeric(t)) {
            (Some(fm), Some(tm)) if fm.value != tm.value => {
                pending.push_str(fm.prefix);
                deltas.push(ValueDelta {
                    prefix: std::mem::take(&mut pending),
                    postfix: fm.suffix.to_owned(),
                    start: fm.value,
                    delta: tm.value - fm.value,
                    formatter: number,
                });
            }
            // Not interpolatable: hold the starting text.
            _ => pending.push_str(f),
        }
    }

    match deltas.last_mut() {
        Some(last) => {
            last.postfix.push_str(&pending);
            Diff::Interpolate(deltas)
        }
        None => Diff::Literal(ta.join(" ")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/diff.rs"]
mod tests;
