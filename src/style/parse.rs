use std::ops::Index;
use std::sync::OnceLock;

use regex::Regex;

/// Normalized property key → trimmed textual value, in declaration order.
///
/// Style blocks hold a handful of keys, so lookups scan linearly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no key is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of `key`, if declared.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Return `true` when `key` is declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Append `key` unless it is already declared. Returns whether it was added.
    pub fn insert_if_absent(&mut self, key: String, value: String) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Replace the value of `key` in place, or append it.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    /// Keys and values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.into_iter()
    }
}

impl Index<&str> for StyleMap {
    type Output = String;

    fn index(&self, key: &str) -> &String {
        match self.entries.iter().find(|(k, _)| k == key) {
            Some((_, v)) => v,
            None => panic!("no style property '{key}'"),
        }
    }
}

impl<'a> IntoIterator for &'a StyleMap {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(entry_refs as fn(&'a (String, String)) -> (&'a str, &'a str))
    }
}

fn entry_refs((key, value): &(String, String)) -> (&str, &str) {
    (key.as_str(), value.as_str())
}

impl serde::Serialize for StyleMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

fn declaration_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\s*;)+\s*").expect("static pattern"))
}

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)#(?:[0-9a-f]{6}|[0-9a-f]{3})\b").expect("static pattern"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Parse a `key: value; key: value` block into a [`StyleMap`].
///
/// Keys are converted from kebab-case to camelCase, values have their
/// whitespace collapsed and their hex colours canonicalized. When a key
/// repeats, the first declaration wins. Declarations without a value are
/// dropped.
pub fn parse_style_text(text: &str) -> StyleMap {
    let trimmed = text.trim_matches(|c: char| c == ';' || c.is_whitespace());
    let mut out = StyleMap::new();
    if trimmed.is_empty() {
        return out;
    }

    for decl in declaration_split_re().split(trimmed) {
        let Some((key, value)) = decl.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        out.insert_if_absent(to_camel_case(key), normalize_value(value));
    }
    out
}

/// Collapse whitespace runs and canonicalize hex colours in a value.
pub fn normalize_value(value: &str) -> String {
    let collapsed = whitespace_re().replace_all(value.trim(), " ");
    hex_color_re()
        .replace_all(&collapsed, |caps: &regex::Captures<'_>| {
            canonical_hex(&caps[0]).unwrap_or_else(|| caps[0].to_ascii_lowercase())
        })
        .into_owned()
}

/// Lower-case a `#rgb`/`#rrggbb` token and expand the short form.
///
/// Returns `None` for anything that is not exactly a hex colour token.
pub fn canonical_hex(token: &str) -> Option<String> {
    let digits = token.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits = digits.to_ascii_lowercase();
    match digits.len() {
        6 => Some(format!("#{digits}")),
        3 => {
            let mut out = String::with_capacity(7);
            out.push('#');
            for c in digits.chars() {
                out.push(c);
                out.push(c);
            }
            Some(out)
        }
        _ => None,
    }
}

fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '-' {
            upper_next = true;
            continue;
        }
        if upper_next && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
        } else {
            if upper_next {
                out.push('-');
            }
            out.push(c);
        }
        upper_next = false;
    }
    if upper_next {
        out.push('-');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/style/parse.rs"]
mod tests;
