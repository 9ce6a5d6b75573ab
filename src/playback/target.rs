use std::collections::BTreeMap;

use crate::{
    compile::classify::TargetResolver,
    foundation::core::TargetId,
    style::parse::{StyleMap, parse_style_text},
};

/// Sink for composed property values.
///
/// Each call is one complete value; the scheduler never streams partial
/// text.
pub trait PropertyWriter {
    /// Set `property` of `target` to `value`.
    fn write(&mut self, target: &TargetId, property: &str, value: &str);
}

impl<W: PropertyWriter + ?Sized> PropertyWriter for &mut W {
    fn write(&mut self, target: &TargetId, property: &str, value: &str) {
        (**self).write(target, property, value);
    }
}

/// In-memory set of style-bearing targets.
///
/// Records the latest text written per target and property, and counts
/// writes. Registered targets are also what [`TargetResolver::resolve`]
/// recognizes.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    styles: BTreeMap<TargetId, StyleMap>,
    writes: u64,
}

impl StyleSheet {
    /// Empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target with no styles.
    pub fn with_target(mut self, id: impl Into<String>) -> Self {
        self.styles.entry(TargetId::new(id)).or_default();
        self
    }

    /// Register a target seeded from style text.
    pub fn with_style(mut self, id: impl Into<String>, text: &str) -> Self {
        let style = self.styles.entry(TargetId::new(id)).or_default();
        for (key, value) in &parse_style_text(text) {
            style.set(key, value);
        }
        self
    }

    /// Current text of `property` on `target`.
    pub fn get(&self, target: &TargetId, property: &str) -> Option<&str> {
        self.styles.get(target)?.get(property)
    }

    /// All properties of `target`.
    pub fn styles(&self, target: &TargetId) -> Option<&StyleMap> {
        self.styles.get(target)
    }

    /// Every registered target with its properties.
    pub fn targets(&self) -> &BTreeMap<TargetId, StyleMap> {
        &self.styles
    }

    /// Number of writes received so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl PropertyWriter for StyleSheet {
    fn write(&mut self, target: &TargetId, property: &str, value: &str) {
        tracing::trace!(%target, property, value, "write");
        self.writes += 1;
        self.styles
            .entry(target.clone())
            .or_default()
            .set(property, value);
    }
}

impl TargetResolver for StyleSheet {
    fn resolve(&self, ident: &str) -> Option<TargetId> {
        self.styles
            .get_key_value(ident.trim())
            .map(|(id, _)| id.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/target.rs"]
mod tests;
